use acr_push_config::LogLevel;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing_subscriber::EnvFilter;

/// ウィザード表示中に溜めているログ（None なら stderr へ直接書く）
static HELD: Mutex<Option<Vec<u8>>> = Mutex::new(None);

fn held() -> MutexGuard<'static, Option<Vec<u8>>> {
    HELD.lock().unwrap_or_else(PoisonError::into_inner)
}

/// stderr へのログ出力を初期化
pub fn init(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_writer(|| LogWriter)
        .with_env_filter(EnvFilter::new(level.as_filter()))
        .with_target(false)
        .init();
}

/// ログを stderr に出すか、保留中ならバッファに積む
struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(buffer) = held().as_mut() {
            buffer.extend_from_slice(buf);
            return Ok(buf.len());
        }
        io::stderr().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// 端末を TUI が使っている間ログを保留する
///
/// drop されると溜めたログを stderr へまとめて出力する。
pub fn hold() -> LogHold {
    held().get_or_insert_with(Vec::new);
    LogHold { _private: () }
}

pub struct LogHold {
    _private: (),
}

impl Drop for LogHold {
    fn drop(&mut self) {
        let Some(buffer) = held().take() else {
            return;
        };
        let mut stderr = io::stderr();
        let _ = stderr.write_all(&buffer);
        let _ = stderr.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_buffers_until_dropped() {
        let hold = hold();
        LogWriter.write_all(b"DEBUG Running: az acr list -o json\n").unwrap();
        assert_eq!(
            held().as_deref(),
            Some(&b"DEBUG Running: az acr list -o json\n"[..])
        );

        drop(hold);
        assert!(held().is_none());
    }
}
