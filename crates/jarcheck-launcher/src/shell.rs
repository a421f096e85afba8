use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

/// Command that runs `script` through the platform shell with `workdir` as cwd.
///
/// stdout/stderr are inherited; stdin is detached so the operator console keeps it.
pub fn shell_command(workdir: &Path, script: &Path) -> Command {
    let script_arg = script.strip_prefix(workdir).unwrap_or(script);

    #[cfg(windows)]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.arg("/c").arg(script_arg);
        c
    };
    #[cfg(not(windows))]
    let mut cmd = {
        let mut c = Command::new("sh");
        c.arg(script_arg);
        c
    };

    cmd.current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}
