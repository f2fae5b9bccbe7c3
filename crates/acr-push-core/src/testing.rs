//! テスト用のランナー
//!
//! 実行されたコマンドを順番に記録し、コマンドの前方一致で
//! 応答（出力または失敗）を差し替える。

use crate::error::{CommandError, Result};
use crate::runner::{CommandOutput, CommandRunner, CommandSpec};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Response {
    Output(CommandOutput),
    Fail(i32),
}

/// 実行コマンドを記録するランナー
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<Vec<(String, Response)>>,
}

/// 記録された1回の実行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub spec: CommandSpec,
    pub streamed: bool,
}

impl Call {
    pub fn line(&self) -> String {
        self.spec.to_string()
    }
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// `prefix` で始まるコマンドに stdout を返す
    pub fn respond(self, prefix: &str, stdout: &str) -> Self {
        self.push(prefix, Response::Output(CommandOutput::from_stdout(stdout)))
    }

    /// `prefix` で始まるコマンドを終了コード `code` で失敗させる
    pub fn fail(self, prefix: &str, code: i32) -> Self {
        self.push(prefix, Response::Fail(code))
    }

    fn push(self, prefix: &str, response: Response) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push((prefix.to_string(), response));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// 記録されたコマンドライン（表示形式）
    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(Call::line).collect()
    }

    fn record(&self, spec: &CommandSpec, streamed: bool) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(Call {
            spec: spec.clone(),
            streamed,
        });

        let line = spec.to_string();
        let response = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone());

        match response {
            Some(Response::Fail(code)) => Err(CommandError::Failed {
                command: line,
                code,
                output: String::new(),
            }),
            Some(Response::Output(output)) => Ok(output),
            None => Ok(CommandOutput::default()),
        }
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn capture(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.record(spec, false)
    }

    async fn stream(&self, spec: &CommandSpec) -> Result<()> {
        self.record(spec, true).map(|_| ())
    }
}
