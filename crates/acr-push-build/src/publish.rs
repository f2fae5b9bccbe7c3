//! ビルドからプッシュまでの一連の処理

use crate::docker::{BuildRequest, DockerCli};
use crate::error::BuildResult;
use crate::plan::BuildPlan;
use crate::progress::StepProgress;
use acr_push_core::CommandRunner;
use colored::Colorize;

/// 計画どおりにビルドしてプッシュする
///
/// 順序は `docker info` → build → tag latest → push tag → push latest。
/// どこかで失敗した時点で止まり、以降のコマンドは実行しない。
/// プッシュした参照を順に返す。
pub async fn publish<R: CommandRunner>(
    docker: &DockerCli<R>,
    plan: &BuildPlan,
) -> BuildResult<Vec<String>> {
    plan.validate()?;

    let versioned = plan.versioned_ref();
    let latest = plan.latest_ref();

    let progress = StepProgress::new("Docker デーモンを確認中...");
    match docker.ensure_available().await {
        Ok(()) => progress.finish_success("Docker デーモン"),
        Err(e) => {
            progress.finish_error(&e.to_string());
            return Err(e);
        }
    }

    println!();
    println!("{}", "🔨 イメージをビルド中...".green().bold());
    println!("  Image: {}", versioned.cyan());
    println!("  Dockerfile: {}", plan.dockerfile.display());
    println!("  Context: {}", plan.context.display());
    if let Some(platform) = &plan.platform {
        println!("  Platform: {}", platform);
    }
    println!();

    docker
        .build_image(BuildRequest {
            image: &versioned,
            dockerfile: &plan.dockerfile,
            context: &plan.context,
            platform: plan.platform.as_deref(),
        })
        .await?;

    if plan.pushes_latest() {
        docker.tag_image(&versioned, &latest).await?;
        println!("  {} {}", "✓".green(), format!("Tagged {}", latest).dimmed());
    }

    println!();
    println!("{}", "📤 イメージをプッシュ中...".green().bold());

    let mut pushed = Vec::new();
    for image in plan.image_refs() {
        println!("  → {}", image.cyan());
        docker.push_image(&image).await?;
        pushed.push(image);
    }

    Ok(pushed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use acr_push_core::testing::RecordingRunner;
    use std::path::PathBuf;

    fn plan() -> BuildPlan {
        BuildPlan {
            registry_server: "myacr.azurecr.io".to_string(),
            repository: "web".to_string(),
            tag: "1.0.0".to_string(),
            dockerfile: PathBuf::from("Dockerfile"),
            context: PathBuf::from("."),
            skip_latest: false,
            platform: None,
        }
    }

    #[tokio::test]
    async fn test_publish_order() {
        let docker = DockerCli::new(RecordingRunner::new());
        let pushed = publish(&docker, &plan()).await.unwrap();

        assert_eq!(
            docker.runner().lines(),
            vec![
                "docker info",
                "docker build -t myacr.azurecr.io/web:1.0.0 -f Dockerfile .",
                "docker tag myacr.azurecr.io/web:1.0.0 myacr.azurecr.io/web:latest",
                "docker push myacr.azurecr.io/web:1.0.0",
                "docker push myacr.azurecr.io/web:latest",
            ]
        );
        assert_eq!(
            pushed,
            vec!["myacr.azurecr.io/web:1.0.0", "myacr.azurecr.io/web:latest"]
        );
    }

    #[tokio::test]
    async fn test_publish_skip_latest() {
        let docker = DockerCli::new(RecordingRunner::new());
        let plan = BuildPlan {
            skip_latest: true,
            platform: Some("linux/arm64".to_string()),
            ..plan()
        };
        publish(&docker, &plan).await.unwrap();

        let lines = docker.runner().lines();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| !l.contains(":latest")));
        assert_eq!(
            lines[1],
            "docker build --platform linux/arm64 -t myacr.azurecr.io/web:1.0.0 -f Dockerfile ."
        );
    }

    #[tokio::test]
    async fn test_build_failure_stops_before_push() {
        let docker = DockerCli::new(RecordingRunner::new().fail("docker build", 17));
        let err = publish(&docker, &plan()).await.unwrap_err();

        match err {
            BuildError::BuildFailed { ref source, .. } => assert_eq!(source.exit_code(), 17),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(docker.runner().lines().len(), 2);
    }

    #[tokio::test]
    async fn test_daemon_down_runs_nothing_else() {
        let docker = DockerCli::new(RecordingRunner::new().fail("docker info", 1));
        let err = publish(&docker, &plan()).await.unwrap_err();
        assert!(matches!(err, BuildError::DaemonUnavailable(_)));
        assert_eq!(docker.runner().lines(), vec!["docker info"]);
    }

    #[tokio::test]
    async fn test_invalid_tag_runs_no_commands() {
        let docker = DockerCli::new(RecordingRunner::new());
        let plan = BuildPlan {
            tag: "bad tag".to_string(),
            ..plan()
        };
        let err = publish(&docker, &plan).await.unwrap_err();
        assert!(matches!(err, BuildError::InvalidTag(_)));
        assert!(docker.runner().calls().is_empty());
    }
}
