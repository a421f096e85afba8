use anyhow::{anyhow, Context, Result};
use std::process::Command;

/// Run a short command and return its combined output, trimmed.
///
/// stderr is included because `java -version` reports there.
pub fn run_cmd(dir: &std::path::Path, program: &str, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    let out = cmd.output().with_context(|| format!("run {} {:?}", program, args))?;
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    if !out.status.success() {
        return Err(anyhow!("command failed: {} {:?}\n{}", program, args, text.trim()));
    }
    Ok(text.trim().to_string())
}
