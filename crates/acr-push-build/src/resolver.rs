//! Dockerfile とビルドコンテキストの解決

use crate::error::{BuildError, BuildResult};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Dockerfile とコンテキストが存在するか確認
pub fn validate_docker_paths(dockerfile: &Path, context: &Path) -> BuildResult<()> {
    if !dockerfile.is_file() {
        return Err(BuildError::DockerfileNotFound(dockerfile.to_path_buf()));
    }
    if !context.is_dir() {
        return Err(BuildError::ContextNotFound(context.to_path_buf()));
    }
    Ok(())
}

/// `root` 以下の Dockerfile を探す
///
/// `Dockerfile` という名前のファイルと `*.dockerfile` が対象。
/// 隠しディレクトリは除外し、`root` からの相対パスをソートして返す。
pub fn find_dockerfiles(root: &Path) -> Vec<PathBuf> {
    let base = glob::Pattern::escape(&root.to_string_lossy());
    let mut found = BTreeSet::new();

    for pattern in ["**/Dockerfile", "**/*.dockerfile"] {
        let full = format!("{}/{}", base, pattern);
        let entries = match glob::glob(&full) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Invalid glob pattern {}: {}", full, e);
                continue;
            }
        };

        for path in entries.flatten() {
            if !path.is_file() {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            if is_hidden(relative) {
                continue;
            }
            found.insert(relative.to_path_buf());
        }
    }

    tracing::debug!("Found {} Dockerfile(s) under {}", found.len(), root.display());
    found.into_iter().collect()
}

fn is_hidden(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}
