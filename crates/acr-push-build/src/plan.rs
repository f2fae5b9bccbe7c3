//! ビルド・プッシュ計画

use crate::error::{BuildError, BuildResult};
use std::path::PathBuf;

/// 1回のビルド・プッシュで必要な値一式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// レジストリのログインサーバー（例: myacr.azurecr.io）
    pub registry_server: String,
    pub repository: String,
    pub tag: String,
    pub dockerfile: PathBuf,
    pub context: PathBuf,
    pub skip_latest: bool,
    pub platform: Option<String>,
}

impl BuildPlan {
    /// `<server>/<repository>:<tag>`
    pub fn versioned_ref(&self) -> String {
        format!("{}/{}:{}", self.registry_server, self.repository, self.tag)
    }

    /// `<server>/<repository>:latest`
    pub fn latest_ref(&self) -> String {
        format!("{}/{}:latest", self.registry_server, self.repository)
    }

    /// `latest` も付けてプッシュするか
    ///
    /// タグ自体が `latest` の場合は二重にプッシュしない。
    pub fn pushes_latest(&self) -> bool {
        !self.skip_latest && self.tag != "latest"
    }

    /// プッシュされる参照の一覧（プッシュ順）
    pub fn image_refs(&self) -> Vec<String> {
        let mut refs = vec![self.versioned_ref()];
        if self.pushes_latest() {
            refs.push(self.latest_ref());
        }
        refs
    }

    pub fn validate(&self) -> BuildResult<()> {
        validate_repository(&self.repository)?;
        validate_tag(&self.tag)
    }
}

/// Docker タグの検証
pub fn validate_tag(tag: &str) -> BuildResult<()> {
    // Docker タグの制約:
    // - 128文字以下
    // - 英数字、ピリオド、ハイフン、アンダースコアのみ
    // - 先頭はピリオドまたはハイフンではない

    if tag.is_empty() {
        return Err(BuildError::InvalidTag("(empty)".to_string()));
    }

    if tag.len() > 128 {
        return Err(BuildError::InvalidTag(format!(
            "Tag too long ({} characters, max 128)",
            tag.len()
        )));
    }

    if tag.starts_with('.') || tag.starts_with('-') {
        return Err(BuildError::InvalidTag(tag.to_string()));
    }

    if let Some(c) = tag
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_'))
    {
        return Err(BuildError::InvalidTag(format!(
            "Invalid character '{}' in tag: {}",
            c, tag
        )));
    }

    Ok(())
}

/// リポジトリ名の検証
///
/// 小文字英数字と `.` `_` `-` のコンポーネントを `/` で区切った形式。
pub fn validate_repository(repository: &str) -> BuildResult<()> {
    let invalid = || BuildError::InvalidRepository(repository.to_string());

    if repository.is_empty() {
        return Err(invalid());
    }

    for component in repository.split('/') {
        let starts_ok = component
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        let ends_ok = component
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        let chars_ok = component.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
        });

        if !(starts_ok && ends_ok && chars_ok) {
            return Err(invalid());
        }
    }

    Ok(())
}
