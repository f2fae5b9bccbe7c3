use acr_push_core::CommandError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Dockerfile not found: {}", .0.display())]
    DockerfileNotFound(PathBuf),

    #[error("Build context directory not found: {}", .0.display())]
    ContextNotFound(PathBuf),

    #[error("docker not found. Please install Docker Desktop, OrbStack or the docker CLI")]
    DockerNotFound(#[source] CommandError),

    #[error("Docker daemon is not running")]
    DaemonUnavailable(#[source] CommandError),

    #[error("Docker build failed: {image}")]
    BuildFailed {
        image: String,
        #[source]
        source: CommandError,
    },

    #[error("Docker tag failed: {from} -> {to}")]
    TagFailed {
        from: String,
        to: String,
        #[source]
        source: CommandError,
    },

    #[error("Failed to push image: {image}")]
    PushFailed {
        image: String,
        #[source]
        source: CommandError,
    },

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Invalid repository name: {0}")]
    InvalidRepository(String),
}

impl BuildError {
    /// docker が見つからない場合はインストール案内に差し替える
    pub(crate) fn from_command(
        error: CommandError,
        wrap: impl FnOnce(CommandError) -> BuildError,
    ) -> Self {
        match error {
            CommandError::NotFound(_) => BuildError::DockerNotFound(error),
            other => wrap(other),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
