use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CI モードに必要な設定が不足しています: {}", .0.join(", "))]
    MissingCiFields(Vec<String>),

    #[error(
        "ログレベルが不正です: {0}\n\
        指定可能な値: DEBUG, INFO, WARNING, ERROR, CRITICAL"
    )]
    InvalidLogLevel(String),

    #[error("{key} の値が不正です: {value}（true/false で指定してください）")]
    InvalidBool { key: String, value: String },

    #[error(".env ファイルを読み込めません: {}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// 設定エラーは使い方の誤りとして 2 で終了する
    pub fn exit_code(&self) -> i32 {
        2
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
