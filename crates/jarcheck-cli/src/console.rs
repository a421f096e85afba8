use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use jarcheck_core::TestStatus;
use jarcheck_launcher::LaunchEvent;
use jarcheck_runner::{render_progress, render_table, Harness};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

const HELP: &str = "\
Commands:
  load                 scan the jar folder and start a fresh snapshot
  open                 reload the saved snapshot
  start                stage the first jar
  server               launch the staged jar
  stop                 stop the running server
  pass|fail|pending [notes...]
                       record a verdict for the current jar
  next                 stop the server and stage the next pending jar
  reset                empty the test folder
  table                show all jars
  progress             show progress
  log                  write the text log
  export               write the JSON snapshot
  help                 this text
  quit                 stop the server and exit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    Load,
    Open,
    Start,
    Server,
    Stop,
    Verdict { status: TestStatus, notes: String },
    Next,
    Reset,
    Table,
    Progress,
    Log,
    Export,
    Help,
    Quit,
}

/// `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let cmd = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "load" => ConsoleCommand::Load,
        "open" => ConsoleCommand::Open,
        "start" => ConsoleCommand::Start,
        "server" => ConsoleCommand::Server,
        "stop" => ConsoleCommand::Stop,
        "pass" | "fail" | "pending" => ConsoleCommand::Verdict {
            status: word.parse()?,
            notes: rest.to_string(),
        },
        "next" => ConsoleCommand::Next,
        "reset" => ConsoleCommand::Reset,
        "table" | "ls" => ConsoleCommand::Table,
        "progress" => ConsoleCommand::Progress,
        "log" => ConsoleCommand::Log,
        "export" => ConsoleCommand::Export,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(Some(cmd))
}

fn print_overview(harness: &Harness) {
    print!("{}", render_table(harness.registry()));
    println!("{}", render_progress(&harness.progress()));
}

fn dispatch(harness: &mut Harness, cmd: ConsoleCommand) {
    match cmd {
        ConsoleCommand::Load => {
            if harness.load_jars() {
                print_overview(harness);
            }
        }
        ConsoleCommand::Open => {
            if harness.open_snapshot() {
                print_overview(harness);
            }
        }
        ConsoleCommand::Start => {
            harness.start_test();
            print_overview(harness);
        }
        ConsoleCommand::Server => {
            harness.start_server();
        }
        ConsoleCommand::Stop => {
            harness.stop_server();
        }
        ConsoleCommand::Verdict { status, notes } => {
            if harness.update_status(status, &notes) {
                print_overview(harness);
            }
        }
        ConsoleCommand::Next => {
            harness.next_test();
            print_overview(harness);
        }
        ConsoleCommand::Reset => {
            harness.reset_workspace();
        }
        ConsoleCommand::Table => print_overview(harness),
        ConsoleCommand::Progress => println!("{}", render_progress(&harness.progress())),
        ConsoleCommand::Log => {
            harness.generate_log();
        }
        ConsoleCommand::Export => {
            harness.export_snapshot();
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
}

fn flush_feedback(harness: &mut Harness) {
    for line in harness.feedback_mut().take_unseen() {
        println!("| {line}");
    }
}

fn prompt() {
    print!("jarcheck> ");
    let _ = std::io::stdout().flush();
}

/// Interactive loop: operator commands from stdin, launcher events as they arrive.
pub async fn run_console(mut harness: Harness, mut events: UnboundedReceiver<LaunchEvent>) -> Result<()> {
    println!("jarcheck console in {} (type `help`)", harness.base_dir.display());
    drive(&mut harness, &mut events, BufReader::new(tokio::io::stdin())).await;
    shutdown(&mut harness, &mut events).await;
    Ok(())
}

/// Runs commands from `input` until it ends, `quit` or Ctrl-C.
///
/// Lines are decoded lossily so stray bytes in notes never end the session.
async fn drive<R>(harness: &mut Harness, events: &mut UnboundedReceiver<LaunchEvent>, mut input: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    prompt();
    loop {
        tokio::select! {
            // read_until keeps partial input in `buf` if another branch wins
            read = input.read_until(b'\n', &mut buf) => {
                match read {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf).into_owned();
                        buf.clear();
                        match parse_command(&line) {
                            Ok(Some(ConsoleCommand::Quit)) => break,
                            Ok(Some(cmd)) => dispatch(harness, cmd),
                            Ok(None) => {}
                            Err(msg) => println!("{msg}"),
                        }
                    }
                    Err(e) => {
                        harness.feedback_mut().error(format!("reading console input: {e}"));
                        break;
                    }
                }
            }
            Some(event) = events.recv() => {
                println!();
                harness.on_launch_event(event);
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
        flush_feedback(harness);
        prompt();
    }
}

async fn shutdown(harness: &mut Harness, events: &mut UnboundedReceiver<LaunchEvent>) {
    let was_running = harness.is_server_running();
    harness.shutdown();
    if was_running {
        // wait for the supervisor to confirm before the runtime goes away
        let grace = Duration::from_secs(harness.cfg.launch.stop_grace_secs + 2);
        let deadline = tokio::time::sleep(grace);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    let done = matches!(
                        event,
                        LaunchEvent::Stopped { .. } | LaunchEvent::Exited { .. } | LaunchEvent::KillFailed { .. }
                    );
                    harness.on_launch_event(event);
                    if done {
                        break;
                    }
                }
                _ = &mut deadline => {
                    harness.feedback_mut().error("server did not confirm shutdown");
                    break;
                }
            }
        }
    }
    println!();
    flush_feedback(harness);
}

#[cfg(test)]
mod tests {
    use super::*;
    use jarcheck_runner::Config;

    #[test]
    fn parses_verdicts_with_notes() {
        assert_eq!(
            parse_command("fail  crashed on world load ").unwrap(),
            Some(ConsoleCommand::Verdict { status: TestStatus::Fail, notes: "crashed on world load".into() })
        );
        assert_eq!(
            parse_command("PASS").unwrap(),
            Some(ConsoleCommand::Verdict { status: TestStatus::Pass, notes: String::new() })
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("launch").unwrap_err().contains("launch"));
    }

    #[test]
    fn lossy_notes_still_parse() {
        let line = String::from_utf8_lossy(b"fail caf\xe9 crash\n");
        assert_eq!(
            parse_command(&line).unwrap(),
            Some(ConsoleCommand::Verdict { status: TestStatus::Fail, notes: "caf\u{FFFD} crash".into() })
        );
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_the_session() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("jars")).unwrap();
        for name in ["a.jar", "b.jar"] {
            std::fs::write(dir.path().join("jars").join(name), b"PK").unwrap();
        }
        let (mut harness, mut events) = Harness::open(dir.path().to_path_buf(), Config::default());

        let input: &[u8] = b"load\nstart\nfail caf\xe9 crashed\nnext\n";
        drive(&mut harness, &mut events, input).await;

        let records = harness.registry().records();
        assert_eq!(records[0].status, TestStatus::Fail);
        assert_eq!(records[0].notes, "caf\u{FFFD} crashed");
        assert_eq!(harness.registry().current(), Some(1));
        assert!(dir.path().join("test/b.jar").is_file());
    }

    #[test]
    fn aliases() {
        assert_eq!(parse_command("exit").unwrap(), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("ls").unwrap(), Some(ConsoleCommand::Table));
        assert_eq!(parse_command("next").unwrap(), Some(ConsoleCommand::Next));
    }
}
