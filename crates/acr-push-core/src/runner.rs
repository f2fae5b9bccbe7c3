//! 外部コマンドの実行
//!
//! `capture` は出力を回収して返し、`stream` は子プロセスの出力を
//! そのまま端末へ流す。どちらも非ゼロ終了を [`CommandError::Failed`]
//! として終了コード付きで返す。

use crate::error::{CommandError, Result};
use async_trait::async_trait;
use std::fmt;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// 実行するコマンドライン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// 表示用のクォート（安全な文字だけなら素通し）
fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | ',' | '@')
        });
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

/// capture 実行の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// 外部コマンド実行の抽象
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 出力をパイプで回収して実行
    async fn capture(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// 出力を端末へそのまま流して実行
    async fn stream(&self, spec: &CommandSpec) -> Result<()>;
}

/// 実プロセスを起動するランナー
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.get_args());
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn capture(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        tracing::debug!("Running: {}", spec);

        let mut cmd = Self::command(spec);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| spawn_error(spec, e))?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let code = exit_code(output.status);
            tracing::debug!(code, "Command failed: {}", spec);
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(CommandError::Failed {
                command: spec.to_string(),
                code,
                output: detail,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    async fn stream(&self, spec: &CommandSpec) -> Result<()> {
        tracing::debug!("Running: {}", spec);

        let mut cmd = Self::command(spec);
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        // 端末からの SIGINT は親だけが受け取り、子へは一度だけ転送する
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|e| spawn_error(spec, e))?;

        let mut forward = true;
        let status = loop {
            tokio::select! {
                status = child.wait() => {
                    break status.map_err(|e| CommandError::Io {
                        command: spec.to_string(),
                        source: e,
                    })?;
                }
                signal = tokio::signal::ctrl_c(), if forward => {
                    match signal {
                        Ok(()) => forward_interrupt(&child, spec),
                        Err(e) => {
                            tracing::warn!("Failed to listen for interrupts: {}", e);
                            forward = false;
                        }
                    }
                }
            }
        };

        if !status.success() {
            let code = exit_code(status);
            tracing::debug!(code, "Command failed: {}", spec);
            return Err(CommandError::Failed {
                command: spec.to_string(),
                code,
                output: String::new(),
            });
        }

        Ok(())
    }
}

fn spawn_error(spec: &CommandSpec, e: std::io::Error) -> CommandError {
    if e.kind() == std::io::ErrorKind::NotFound {
        CommandError::NotFound(spec.program().to_string())
    } else {
        CommandError::Io {
            command: spec.to_string(),
            source: e,
        }
    }
}

#[cfg(unix)]
fn forward_interrupt(child: &Child, spec: &CommandSpec) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return;
    };
    tracing::warn!("Interrupt received, forwarding to `{}`", spec);
    if let Err(e) = signal::killpg(Pid::from_raw(pid as i32), Signal::SIGINT) {
        tracing::debug!("Failed to send SIGINT to process group {}: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn forward_interrupt(_child: &Child, spec: &CommandSpec) {
    // コンソールの Ctrl-C は子プロセスにも届く
    tracing::warn!("Interrupt received, waiting for `{}` to exit", spec);
}

/// 終了ステータスを終了コードへ変換（シグナル終了は 128 + signo）
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
