//! ビルド・プッシュの実行

use acr_push_azure::{AccountInfo, AcrRegistry, AzureCli};
use acr_push_build::{BuildPlan, DockerCli, StepProgress, publish, validate_docker_paths};
use acr_push_config::Settings;
use acr_push_core::{CommandRunner, ProcessRunner};
use colored::Colorize;

use crate::tui::{self, Prefill, WizardState};

/// CI モード: 必要な値がすべて揃っている前提で一気に実行
pub async fn run_ci(settings: &Settings) -> anyhow::Result<()> {
    // 外部コマンドを起動する前に不足項目をまとめて報告する
    let ci = settings.require_ci_fields()?;

    println!("{}", "🚀 CI モードで実行します".green().bold());

    let az = AzureCli::new(ProcessRunner);
    prepare_account(&az, ci.tenant_id.as_deref(), ci.subscription.as_deref()).await?;
    let registry = resolve_registry(&az, &ci.acr_name, &ci.acr_resource_group).await?;

    let plan = BuildPlan {
        registry_server: registry.login_server.clone(),
        repository: ci.repo_name,
        tag: ci.tag,
        dockerfile: ci.dockerfile_path,
        context: ci.build_context,
        skip_latest: ci.skip_latest,
        platform: ci.platform,
    };

    login_and_publish(&az, &registry, &plan).await
}

/// 対話モード: 足りない値をウィザードで選ぶ
pub async fn run_interactive(settings: &Settings) -> anyhow::Result<()> {
    let az = AzureCli::new(ProcessRunner);
    prepare_account(
        &az,
        settings.tenant_id.as_deref(),
        settings.subscription.as_deref(),
    )
    .await?;

    let registry = match (&settings.acr_name, &settings.acr_resource_group) {
        (Some(name), Some(resource_group)) => {
            Some(resolve_registry(&az, name, resource_group).await?)
        }
        _ => None,
    };

    let prefill = Prefill {
        registry,
        repository: settings.repo_name.clone(),
        tag: settings.tag.clone(),
        dockerfile: settings.dockerfile_path.clone(),
        context: settings.build_context.clone(),
    };
    let state = WizardState::new(prefill)
        .with_options(settings.skip_latest, settings.platform.clone())
        .with_preferred_registry(settings.acr_name.clone());

    let root = std::env::current_dir()?;
    let Some(answers) = tui::run_wizard(&az, state, &root).await? else {
        println!("{}", "キャンセルしました。何もビルドしていません。".yellow());
        return Ok(());
    };

    let plan = BuildPlan {
        registry_server: answers.registry.login_server.clone(),
        repository: answers.repository,
        tag: answers.tag,
        dockerfile: answers.dockerfile,
        context: answers.context,
        skip_latest: settings.skip_latest,
        platform: settings.platform.clone(),
    };

    login_and_publish(&az, &answers.registry, &plan).await
}

/// Azure のログイン状態・テナント・サブスクリプションを整える
async fn prepare_account<R: CommandRunner>(
    az: &AzureCli<R>,
    tenant_id: Option<&str>,
    subscription: Option<&str>,
) -> anyhow::Result<AccountInfo> {
    let mut account = az.ensure_tenant(tenant_id).await?;

    if let Some(subscription) = subscription.filter(|s| !s.is_empty()) {
        az.set_subscription(Some(subscription)).await?;
        account = az.ensure_logged_in().await?;
    }

    println!(
        "  {} Azure: {} / {}",
        "✓".green(),
        account.tenant_label().cyan(),
        account.name.cyan()
    );
    if let Some(user) = &account.user {
        tracing::debug!("Signed in as {}", user.name);
    }

    Ok(account)
}

async fn resolve_registry<R: CommandRunner>(
    az: &AzureCli<R>,
    name: &str,
    resource_group: &str,
) -> anyhow::Result<AcrRegistry> {
    let progress = StepProgress::new(&format!("レジストリ {} を確認中...", name));
    match az.show_registry(name, resource_group).await {
        Ok(registry) => {
            progress.finish_success(&registry.login_server);
            Ok(registry)
        }
        Err(e) => {
            progress.finish_error(&e.to_string());
            Err(e.into())
        }
    }
}

/// レジストリにログインしてビルド・プッシュ
async fn login_and_publish<R: CommandRunner>(
    az: &AzureCli<R>,
    registry: &AcrRegistry,
    plan: &BuildPlan,
) -> anyhow::Result<()> {
    println!();
    println!("{}", "🔐 レジストリにログイン中...".green().bold());
    az.login_registry(&registry.name).await?;

    validate_docker_paths(&plan.dockerfile, &plan.context)?;

    let docker = DockerCli::new(ProcessRunner);
    let pushed = publish(&docker, plan).await?;

    println!();
    println!("{}", "✓ プッシュが完了しました".green().bold());
    for image in &pushed {
        println!("  • {}", image.cyan());
    }
    Ok(())
}

