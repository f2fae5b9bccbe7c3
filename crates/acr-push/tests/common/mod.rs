use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_AZ: &str = r#"#!/bin/sh
echo "az $*" >> "$FAKE_CALL_LOG"
case "$*" in
  "account show"*)
    echo '{"id": "sub-1", "name": "Dev", "tenantId": "tenant-a"}'
    ;;
  "acr show"*)
    echo '{"name": "myacr", "resourceGroup": "rg", "loginServer": "myacr.azurecr.io"}'
    ;;
esac
exit 0
"#;

const FAKE_DOCKER: &str = r#"#!/bin/sh
echo "docker $*" >> "$FAKE_CALL_LOG"
if [ -n "$FAKE_DOCKER_FAIL" ] && [ "$1" = "$FAKE_DOCKER_FAIL" ]; then
  echo "fake docker $1 failed" >&2
  exit "${FAKE_DOCKER_EXIT:-1}"
fi
exit 0
"#;

/// 偽の `az` / `docker` を PATH に置いたテスト用プロジェクト
pub struct TestProject {
    pub root: TempDir,
    pub bin: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let project = Self {
            root: tempfile::tempdir().unwrap(),
            bin: tempfile::tempdir().unwrap(),
        };
        project.install("az", FAKE_AZ);
        project.install("docker", FAKE_DOCKER);
        project
    }

    /// az も docker もない環境
    #[allow(dead_code)]
    pub fn without_tools() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            bin: tempfile::tempdir().unwrap(),
        }
    }

    fn install(&self, name: &str, script: &str) {
        let path = self.bin.path().join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn write_dockerfile(&self, relative: &str) {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "FROM scratch\n").unwrap();
    }

    #[allow(dead_code)]
    pub fn write_env_file(&self, content: &str) {
        fs::write(self.root.path().join(".env"), content).unwrap();
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.path().join("calls.log")
    }

    /// 実行された外部コマンド（1行1コマンド）
    pub fn calls(&self) -> Vec<String> {
        read_lines(&self.log_path())
    }

    /// テスト対象のコマンド（環境変数は PATH と記録先のみ）
    pub fn command(&self) -> assert_cmd::Command {
        #[allow(deprecated)]
        let mut cmd = assert_cmd::Command::cargo_bin("acr-push").unwrap();
        cmd.current_dir(self.path())
            .env_clear()
            .env("PATH", self.bin.path())
            .env("FAKE_CALL_LOG", self.log_path());
        cmd
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
