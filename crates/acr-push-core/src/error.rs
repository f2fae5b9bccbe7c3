use thiserror::Error;

/// 外部コマンド実行のエラー
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("command not found: {0}")]
    NotFound(String),

    #[error("`{command}` exited with status {code}{}", format_output(.output))]
    Failed {
        command: String,
        code: i32,
        output: String,
    },

    #[error("failed to run `{command}`")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl CommandError {
    /// プロセス終了コードとしてそのまま返せる値
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::NotFound(_) => 127,
            CommandError::Failed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn format_output(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_passthrough() {
        let err = CommandError::Failed {
            command: "docker build".to_string(),
            code: 17,
            output: String::new(),
        };
        assert_eq!(err.exit_code(), 17);
        assert_eq!(err.to_string(), "`docker build` exited with status 17");
    }

    #[test]
    fn test_exit_code_never_zero() {
        let err = CommandError::Failed {
            command: "az acr show".to_string(),
            code: 0,
            output: "boom\n".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "`az acr show` exited with status 0: boom");
        assert_eq!(CommandError::NotFound("az".into()).exit_code(), 127);
    }
}
