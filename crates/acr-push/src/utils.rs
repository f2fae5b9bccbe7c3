use acr_push_config::ConfigError;
use acr_push_core::CommandError;

/// エラーチェーンから終了コードを決める
///
/// 子プロセスの失敗はその終了コード、設定エラーは 2、それ以外は 1。
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<CommandError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return e.exit_code();
        }
    }
    1
}
