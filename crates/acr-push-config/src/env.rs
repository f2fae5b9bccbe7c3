//! 環境変数レイヤー
//!
//! プロセスの環境変数を `.env` ファイルより優先して束ねる。
//! キーは大文字に正規化して保持する。

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// 設定に使う環境変数のプレフィックス
pub const ENV_PREFIX: &str = "ACR_PUSH_";

/// 環境変数のスナップショット
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_uppercase(), v.into()))
                .collect(),
        }
    }

    /// 現在のプロセス環境（UTF-8 でない値は無視）
    pub fn from_process() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// `.env` ファイルを読み、その上にプロセス環境を重ねる
    ///
    /// ファイルが存在しない場合はプロセス環境のみ
    pub fn load(env_file: &Path) -> Result<Self> {
        let mut source = if env_file.is_file() {
            let content =
                std::fs::read_to_string(env_file).map_err(|e| ConfigError::EnvFile {
                    path: env_file.to_path_buf(),
                    source: e,
                })?;
            let entries = parse_env_file(&content);
            debug!(
                env_file = %env_file.display(),
                variable_count = entries.len(),
                "Loaded variables from .env file"
            );
            Self::from_vars(entries)
        } else {
            Self::default()
        };

        source.vars.extend(Self::from_process().vars);
        Ok(source)
    }

    /// `ACR_PUSH_` を除いた名前で値を取得（空文字は未設定扱い）
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = format!("{}{}", ENV_PREFIX, name.to_ascii_uppercase());
        self.vars
            .get(&key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// `.env` 形式をパース
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        // 空行とコメント行をスキップ
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entries.push((key.to_string(), unquote(value.trim()).to_string()));
        }
    }

    entries
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
