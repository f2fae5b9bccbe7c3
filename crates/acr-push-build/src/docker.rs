//! docker CLI wrapper

use crate::error::{BuildError, BuildResult};
use acr_push_core::{CommandRunner, CommandSpec};
use std::path::Path;

/// `docker build` の入力
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    pub image: &'a str,
    pub dockerfile: &'a Path,
    pub context: &'a Path,
    pub platform: Option<&'a str>,
}

impl BuildRequest<'_> {
    fn to_spec(self) -> CommandSpec {
        let mut spec = CommandSpec::new("docker").arg("build");
        if let Some(platform) = self.platform {
            spec = spec.arg("--platform").arg(platform);
        }
        spec.arg("-t")
            .arg(self.image)
            .arg("-f")
            .arg(self.dockerfile.to_string_lossy())
            .arg(self.context.to_string_lossy())
    }
}

/// docker CLI wrapper
pub struct DockerCli<R> {
    runner: R,
}

impl<R: CommandRunner> DockerCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn docker(args: &[&str]) -> CommandSpec {
        CommandSpec::new("docker").args(args.iter().copied())
    }

    /// docker CLI とデーモンが使えるか確認
    pub async fn ensure_available(&self) -> BuildResult<()> {
        self.runner
            .capture(&Self::docker(&["info"]))
            .await
            .map_err(|e| BuildError::from_command(e, BuildError::DaemonUnavailable))?;
        Ok(())
    }

    /// イメージをビルド（出力は端末へ流す）
    pub async fn build_image(&self, request: BuildRequest<'_>) -> BuildResult<()> {
        tracing::info!("Building image: {}", request.image);
        self.runner
            .stream(&request.to_spec())
            .await
            .map_err(|e| {
                BuildError::from_command(e, |source| BuildError::BuildFailed {
                    image: request.image.to_string(),
                    source,
                })
            })?;
        tracing::info!("Successfully built: {}", request.image);
        Ok(())
    }

    /// 既存イメージに別名タグを付ける
    pub async fn tag_image(&self, from: &str, to: &str) -> BuildResult<()> {
        self.runner
            .capture(&Self::docker(&["tag", from, to]))
            .await
            .map_err(|e| {
                BuildError::from_command(e, |source| BuildError::TagFailed {
                    from: from.to_string(),
                    to: to.to_string(),
                    source,
                })
            })?;
        Ok(())
    }

    /// イメージをプッシュ（出力は端末へ流す）
    pub async fn push_image(&self, image: &str) -> BuildResult<()> {
        self.runner
            .stream(&Self::docker(&["push", image]))
            .await
            .map_err(|e| {
                BuildError::from_command(e, |source| BuildError::PushFailed {
                    image: image.to_string(),
                    source,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acr_push_core::CommandError;
    use acr_push_core::testing::RecordingRunner;

    #[tokio::test]
    async fn test_build_args_without_platform() {
        let docker = DockerCli::new(RecordingRunner::new());
        docker
            .build_image(BuildRequest {
                image: "myacr.azurecr.io/web:1.0.0",
                dockerfile: Path::new("docker/Dockerfile"),
                context: Path::new("."),
                platform: None,
            })
            .await
            .unwrap();

        let calls = docker.runner().calls();
        assert_eq!(
            calls[0].line(),
            "docker build -t myacr.azurecr.io/web:1.0.0 -f docker/Dockerfile ."
        );
        assert!(calls[0].streamed);
    }

    #[tokio::test]
    async fn test_build_args_with_platform() {
        let docker = DockerCli::new(RecordingRunner::new());
        docker
            .build_image(BuildRequest {
                image: "r/web:1",
                dockerfile: Path::new("Dockerfile"),
                context: Path::new("app"),
                platform: Some("linux/amd64"),
            })
            .await
            .unwrap();

        assert_eq!(
            docker.runner().lines(),
            vec!["docker build --platform linux/amd64 -t r/web:1 -f Dockerfile app"]
        );
    }

    #[tokio::test]
    async fn test_daemon_unavailable() {
        let docker = DockerCli::new(RecordingRunner::new().fail("docker info", 1));
        let err = docker.ensure_available().await.unwrap_err();
        assert!(matches!(err, BuildError::DaemonUnavailable(_)));
        assert_eq!(err.to_string(), "Docker daemon is not running");
    }

    #[tokio::test]
    async fn test_push_failure_keeps_exit_code() {
        let docker = DockerCli::new(RecordingRunner::new().fail("docker push", 9));
        let err = docker.push_image("r/web:1").await.unwrap_err();
        match err {
            BuildError::PushFailed { ref image, ref source } => {
                assert_eq!(image, "r/web:1");
                assert!(matches!(source, CommandError::Failed { code: 9, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
