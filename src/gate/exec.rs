use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use crate::errors::VulnsnipError;
use super::allowlist::{CommandSpec, CommandTable};
use tracing::{debug, info, warn};

/// Runs allowlisted commands by identifier, never through a shell.
#[derive(Debug, Clone)]
pub struct CommandGate {
    table: CommandTable,
    timeout: Duration,
}

impl CommandGate {
    pub fn new(table: CommandTable, timeout: Duration) -> Self {
        Self { table, timeout }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look up `identifier` and run its fixed invocation, returning trimmed
    /// stdout. Unknown identifiers are rejected before any process exists.
    pub async fn execute(&self, identifier: &str) -> Result<String, VulnsnipError> {
        if identifier.is_empty() {
            return Err(VulnsnipError::Validation("Invalid command input.".into()));
        }

        let spec = self.table.lookup(identifier).ok_or_else(|| {
            let shown: String = identifier.chars().take(100).collect();
            warn!(identifier = %shown, "Rejected command not on allowlist");
            VulnsnipError::CommandRejected(identifier.to_string())
        })?;

        info!(id = %spec.id, executable = %spec.executable, "Executing allowlisted command");
        run(spec, self.timeout).await
    }
}

async fn read_all<R: AsyncRead + Unpin>(reader: Option<R>, stream: &'static str) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut r) = reader {
        if let Err(e) = r.read_to_end(&mut buf).await {
            warn!(stream, error = %e, "Failed to read command output");
        }
    }
    buf
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(raw) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!(pgid = raw, error = %e, "Failed to kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

/// Prefer stderr, then stdout, then `fallback`; trimmed.
fn diagnostic(stderr: &[u8], stdout: &[u8], fallback: String) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.trim().is_empty() {
        return stderr.trim().to_string();
    }
    let stdout = String::from_utf8_lossy(stdout);
    if !stdout.trim().is_empty() {
        return stdout.trim().to_string();
    }
    fallback.trim().to_string()
}

async fn run(spec: &CommandSpec, timeout: Duration) -> Result<String, VulnsnipError> {
    let mut command = Command::new(&spec.executable);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // Own process group, so descendants can be killed with the child
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|e| {
        warn!(id = %spec.id, error = %e, "Failed to spawn command");
        VulnsnipError::Execution(format!("spawn {} failed: {}", spec.executable, e))
    })?;
    let pid = child.id();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // The deadline covers exit and both pipes reaching EOF
    let finished = tokio::time::timeout(timeout, async {
        tokio::join!(
            child.wait(),
            read_all(stdout, "stdout"),
            read_all(stderr, "stderr"),
        )
    })
    .await;

    kill_process_group(pid);

    let (status, stdout, stderr) = match finished {
        Ok(done) => done,
        Err(_) => {
            if let Err(e) = child.kill().await {
                debug!(id = %spec.id, error = %e, "Child already exited before kill");
            }
            warn!(id = %spec.id, timeout_secs = timeout.as_secs_f64(), "Command timed out");
            return Err(VulnsnipError::Execution(format!(
                "command timed out after {}s",
                timeout.as_secs_f64()
            )));
        }
    };
    let status = status.map_err(|e| VulnsnipError::Execution(format!("wait failed: {}", e)))?;

    if status.success() {
        return Ok(String::from_utf8_lossy(&stdout).trim().to_string());
    }

    warn!(id = %spec.id, status = %status, "Command exited unsuccessfully");
    Err(VulnsnipError::Execution(diagnostic(
        &stderr,
        &stdout,
        format!("command exited with {}", status),
    )))
}
