mod commands;
mod logging;
mod tui;
mod utils;

use acr_push_config::{EnvSource, Settings, SettingsOverrides};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "acr-push")]
#[command(
    about = "Docker イメージをビルドして Azure Container Registry にプッシュ",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// イメージをビルドしてプッシュ（サブコマンド省略時と同じ）
    Run(RunArgs),
    /// バージョン情報を表示
    Version,
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    /// 非対話モード（必要な設定はすべてフラグか環境変数で指定）
    #[arg(long)]
    ci: bool,

    /// ACR 名 (ACR_PUSH_ACR_NAME)
    #[arg(long = "acr", value_name = "NAME")]
    acr_name: Option<String>,

    /// ACR のリソースグループ (ACR_PUSH_ACR_RESOURCE_GROUP)
    #[arg(long = "rg", value_name = "RESOURCE_GROUP")]
    resource_group: Option<String>,

    /// リポジトリ名 (ACR_PUSH_REPO_NAME)
    #[arg(long = "repo", value_name = "NAME")]
    repo: Option<String>,

    /// イメージタグ (ACR_PUSH_TAG)
    #[arg(long)]
    tag: Option<String>,

    /// Dockerfile のパス (ACR_PUSH_DOCKERFILE_PATH)
    #[arg(long, value_name = "PATH")]
    dockerfile: Option<PathBuf>,

    /// ビルドコンテキスト (ACR_PUSH_BUILD_CONTEXT)
    #[arg(long, value_name = "DIR")]
    context: Option<PathBuf>,

    /// ターゲットプラットフォーム (例: linux/amd64) (ACR_PUSH_PLATFORM)
    #[arg(long)]
    platform: Option<String>,

    /// latest タグを付けない (ACR_PUSH_SKIP_LATEST)
    #[arg(long)]
    skip_latest: bool,

    /// Azure サブスクリプション (ACR_PUSH_SUBSCRIPTION)
    #[arg(long)]
    subscription: Option<String>,

    /// Azure テナント ID (ACR_PUSH_TENANT_ID)
    #[arg(long)]
    tenant_id: Option<String>,

    /// ログレベル: DEBUG, INFO, WARNING, ERROR, CRITICAL (ACR_PUSH_LOG_LEVEL)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl RunArgs {
    fn into_overrides(self) -> SettingsOverrides {
        SettingsOverrides {
            acr_name: self.acr_name,
            acr_resource_group: self.resource_group,
            subscription: self.subscription,
            tenant_id: self.tenant_id,
            repo_name: self.repo,
            tag: self.tag,
            dockerfile_path: self.dockerfile,
            build_context: self.context,
            skip_latest: self.skip_latest,
            platform: self.platform,
            log_level: self.log_level,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(utils::exit_code_for(&e));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let args = match cli.command {
        Some(Commands::Version) => {
            println!("acr-push {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(Commands::Run(args)) => args,
        None => cli.run,
    };

    let ci = args.ci;
    let env = EnvSource::load(Path::new(".env"))?;
    let settings = Settings::resolve(args.into_overrides(), &env)?;

    // 通常のCLIコマンドはstderrにログ出力
    logging::init(settings.log_level);
    tracing::debug!(?settings, ci, "Resolved settings");

    if ci {
        commands::run::run_ci(&settings).await
    } else {
        commands::run::run_interactive(&settings).await
    }
}
