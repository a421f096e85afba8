use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jarcheck_runner::{doctor, render_progress, render_table, Config, Harness};

mod console;

#[derive(Parser)]
#[command(name = "jarcheck", version, about = "Stage, launch and grade a folder of server jars")]
struct Cli {
    /// Config file; defaults apply when it does not exist
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (env-filter syntax); falls back to RUST_LOG
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive operator console (default)
    Console,

    /// Write a default jarcheck.toml
    Init,

    /// Check the Java runtime and input folders
    Doctor,

    /// Scan the jar folder into a fresh snapshot
    Scan,

    /// Show the saved snapshot
    Status,

    /// Regenerate the text log from the saved snapshot
    Export,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let base_dir = std::env::current_dir()?;
    let cfg_path = cli.config.clone().unwrap_or_else(|| Config::default_path(&base_dir));

    let cfg = Config::load_or_default(&cfg_path)?;
    let (mut harness, events) = Harness::open(base_dir.clone(), cfg);

    match cli.cmd.unwrap_or(Command::Console) {
        Command::Console => console::run_console(harness, events).await?,
        Command::Init => {
            if cfg_path.exists() {
                bail!("{} already exists", cfg_path.display());
            }
            Config::default().save_to(&cfg_path)?;
            println!("Wrote {}", cfg_path.display());
        }
        Command::Doctor => {
            for line in doctor(&base_dir, &harness.cfg)? {
                println!("{line}");
            }
            println!("OK");
        }
        Command::Scan => {
            let ok = harness.load_jars();
            finish(&mut harness, ok)?;
            print!("{}", render_table(harness.registry()));
        }
        Command::Status => {
            let ok = harness.open_snapshot();
            finish(&mut harness, ok)?;
            print!("{}", render_table(harness.registry()));
            println!("{}", render_progress(&harness.progress()));
        }
        Command::Export => {
            let ok = harness.open_snapshot() && harness.generate_log();
            finish(&mut harness, ok)?;
        }
    }

    Ok(())
}

/// Print the feedback of a one-shot command and turn a failure into a non-zero exit.
fn finish(harness: &mut Harness, ok: bool) -> anyhow::Result<()> {
    for line in harness.feedback_mut().take_unseen() {
        println!("{line}");
    }
    if !ok {
        bail!("command failed");
    }
    Ok(())
}
