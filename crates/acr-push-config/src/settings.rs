//! 実行設定
//!
//! 優先順位: CLI フラグ > プロセス環境変数 > `.env` > デフォルト

use crate::env::EnvSource;
use crate::error::{ConfigError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// ログレベル（`ACR_PUSH_LOG_LEVEL`）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// tracing のフィルタ指定に変換
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// 設定項目とフラグ・環境変数名の対応
struct Field {
    name: &'static str,
    flag: &'static str,
    env: &'static str,
}

impl Field {
    const fn new(name: &'static str, flag: &'static str, env: &'static str) -> Self {
        Self { name, flag, env }
    }

    fn describe(&self) -> String {
        format!("{} ({} / ACR_PUSH_{})", self.name, self.flag, self.env)
    }
}

const ACR_NAME: Field = Field::new("acr_name", "--acr", "ACR_NAME");
const ACR_RESOURCE_GROUP: Field = Field::new("acr_resource_group", "--rg", "ACR_RESOURCE_GROUP");
const SUBSCRIPTION: Field = Field::new("subscription", "--subscription", "SUBSCRIPTION");
const TENANT_ID: Field = Field::new("tenant_id", "--tenant-id", "TENANT_ID");
const REPO_NAME: Field = Field::new("repo_name", "--repo", "REPO_NAME");
const TAG: Field = Field::new("tag", "--tag", "TAG");
const DOCKERFILE_PATH: Field = Field::new("dockerfile_path", "--dockerfile", "DOCKERFILE_PATH");
const BUILD_CONTEXT: Field = Field::new("build_context", "--context", "BUILD_CONTEXT");
const SKIP_LATEST: Field = Field::new("skip_latest", "--skip-latest", "SKIP_LATEST");
const PLATFORM: Field = Field::new("platform", "--platform", "PLATFORM");
const LOG_LEVEL: Field = Field::new("log_level", "--log-level", "LOG_LEVEL");

/// CLI フラグで指定された値（未指定は None）
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub acr_name: Option<String>,
    pub acr_resource_group: Option<String>,
    pub subscription: Option<String>,
    pub tenant_id: Option<String>,
    pub repo_name: Option<String>,
    pub tag: Option<String>,
    pub dockerfile_path: Option<PathBuf>,
    pub build_context: Option<PathBuf>,
    pub skip_latest: bool,
    pub platform: Option<String>,
    pub log_level: Option<String>,
}

/// 解決済みの実行設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub acr_name: Option<String>,
    pub acr_resource_group: Option<String>,
    pub subscription: Option<String>,
    pub tenant_id: Option<String>,
    pub repo_name: Option<String>,
    pub tag: Option<String>,
    pub dockerfile_path: Option<PathBuf>,
    pub build_context: Option<PathBuf>,
    pub skip_latest: bool,
    pub platform: Option<String>,
    pub log_level: LogLevel,
}

/// CI モードで必須項目がすべて揃った設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiSettings {
    pub acr_name: String,
    pub acr_resource_group: String,
    pub subscription: Option<String>,
    pub tenant_id: Option<String>,
    pub repo_name: String,
    pub tag: String,
    pub dockerfile_path: PathBuf,
    pub build_context: PathBuf,
    pub skip_latest: bool,
    pub platform: Option<String>,
}

impl Settings {
    /// フラグと環境変数から設定を解決
    pub fn resolve(overrides: SettingsOverrides, env: &EnvSource) -> Result<Self> {
        let text = |flag: Option<String>, field: &Field| -> Option<String> {
            flag.map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| env.get(field.env).map(str::to_string))
        };
        let path = |flag: Option<PathBuf>, field: &Field| -> Option<PathBuf> {
            flag.filter(|p| !p.as_os_str().is_empty())
                .or_else(|| env.get(field.env).map(PathBuf::from))
        };

        // --skip-latest はオンにしかできないので環境変数との OR を取る。
        // フラグがあれば環境変数は読まない
        let skip_latest = match env.get(SKIP_LATEST.env) {
            Some(value) if !overrides.skip_latest => parse_bool(SKIP_LATEST.env, value)?,
            _ => overrides.skip_latest,
        };

        let log_level = match text(overrides.log_level, &LOG_LEVEL) {
            Some(level) => level.parse()?,
            None => LogLevel::default(),
        };

        Ok(Self {
            acr_name: text(overrides.acr_name, &ACR_NAME),
            acr_resource_group: text(overrides.acr_resource_group, &ACR_RESOURCE_GROUP),
            subscription: text(overrides.subscription, &SUBSCRIPTION),
            tenant_id: text(overrides.tenant_id, &TENANT_ID),
            repo_name: text(overrides.repo_name, &REPO_NAME),
            tag: text(overrides.tag, &TAG),
            dockerfile_path: path(overrides.dockerfile_path, &DOCKERFILE_PATH),
            build_context: path(overrides.build_context, &BUILD_CONTEXT),
            skip_latest,
            platform: text(overrides.platform, &PLATFORM),
            log_level,
        })
    }

    /// CI モードの必須項目を検証
    ///
    /// 不足している項目はまとめて一つのエラーで返す
    pub fn require_ci_fields(&self) -> Result<CiSettings> {
        let mut missing = Vec::new();
        let mut check = |present: bool, field: &Field| {
            if !present {
                missing.push(field.describe());
            }
        };

        check(self.acr_name.is_some(), &ACR_NAME);
        check(self.acr_resource_group.is_some(), &ACR_RESOURCE_GROUP);
        check(self.repo_name.is_some(), &REPO_NAME);
        check(self.tag.is_some(), &TAG);
        check(self.dockerfile_path.is_some(), &DOCKERFILE_PATH);
        check(self.build_context.is_some(), &BUILD_CONTEXT);

        match (
            &self.acr_name,
            &self.acr_resource_group,
            &self.repo_name,
            &self.tag,
            &self.dockerfile_path,
            &self.build_context,
        ) {
            (Some(acr), Some(rg), Some(repo), Some(tag), Some(dockerfile), Some(context))
                if missing.is_empty() =>
            {
                Ok(CiSettings {
                    acr_name: acr.clone(),
                    acr_resource_group: rg.clone(),
                    subscription: self.subscription.clone(),
                    tenant_id: self.tenant_id.clone(),
                    repo_name: repo.clone(),
                    tag: tag.clone(),
                    dockerfile_path: dockerfile.clone(),
                    build_context: context.clone(),
                    skip_latest: self.skip_latest,
                    platform: self.platform.clone(),
                })
            }
            _ => Err(ConfigError::MissingCiFields(missing)),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: format!("ACR_PUSH_{}", key),
            value: value.to_string(),
        }),
    }
}
