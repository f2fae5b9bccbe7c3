//! ウィザードの状態遷移
//!
//! 描画や外部コマンドからは独立しており、キー入力と読み込み結果だけで
//! 状態が進む。

use acr_push_azure::AcrRegistry;
use acr_push_build::{suggest_tags, validate_repository, validate_tag};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// ウィザードのステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Registry,
    Repository,
    Tag,
    Dockerfile,
    Context,
    Confirm,
}

impl WizardStep {
    const INPUTS: [WizardStep; 5] = [
        WizardStep::Registry,
        WizardStep::Repository,
        WizardStep::Tag,
        WizardStep::Dockerfile,
        WizardStep::Context,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Registry => "レジストリを選択",
            WizardStep::Repository => "リポジトリを選択",
            WizardStep::Tag => "タグを選択",
            WizardStep::Dockerfile => "Dockerfile を選択",
            WizardStep::Context => "ビルドコンテキストを選択",
            WizardStep::Confirm => "確認",
        }
    }
}

/// フラグ・環境変数で既に決まっている値
#[derive(Debug, Clone, Default)]
pub struct Prefill {
    pub registry: Option<AcrRegistry>,
    pub repository: Option<String>,
    pub tag: Option<String>,
    pub dockerfile: Option<PathBuf>,
    pub context: Option<PathBuf>,
}

impl Prefill {
    fn has(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Registry => self.registry.is_some(),
            WizardStep::Repository => self.repository.is_some(),
            WizardStep::Tag => self.tag.is_some(),
            WizardStep::Dockerfile => self.dockerfile.is_some(),
            WizardStep::Context => self.context.is_some(),
            WizardStep::Confirm => false,
        }
    }
}

/// 確定したウィザードの入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardAnswers {
    pub registry: AcrRegistry,
    pub repository: String,
    pub tag: String,
    pub dockerfile: PathBuf,
    pub context: PathBuf,
}

/// 既存リポジトリと最新の semver タグ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    pub name: String,
    pub latest: Option<String>,
}

impl RepositoryEntry {
    fn label(&self) -> String {
        format!(
            "{} - {}",
            self.name,
            self.latest.as_deref().unwrap_or("no-tags")
        )
    }
}

/// ステップに入るときに必要な読み込み
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Registries,
    Repositories { registry: String },
    Tags { registry: String, repository: String },
    Dockerfiles,
}

impl LoadRequest {
    pub fn message(&self) -> String {
        match self {
            LoadRequest::Registries => "レジストリ一覧を取得中...".to_string(),
            LoadRequest::Repositories { registry } => {
                format!("{} のリポジトリを取得中...", registry)
            }
            LoadRequest::Tags { repository, .. } => format!("{} のタグを取得中...", repository),
            LoadRequest::Dockerfiles => "Dockerfile を検索中...".to_string(),
        }
    }
}

/// 読み込み結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    Registries(Vec<AcrRegistry>),
    Repositories(Vec<RepositoryEntry>),
    Tags(Vec<String>),
    Dockerfiles(Vec<PathBuf>),
}

/// 選択肢の値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceValue {
    Registry(AcrRegistry),
    Text(String),
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: ChoiceValue,
}

impl Choice {
    fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: ChoiceValue::Text(value.into()),
        }
    }

    fn custom(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: ChoiceValue::Custom,
        }
    }
}

/// キー入力の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    Continue,
    Confirmed(WizardAnswers),
    Cancelled,
}

/// ウィザードの状態
#[derive(Debug, Clone)]
pub struct WizardState {
    step: WizardStep,
    prefill: Prefill,
    registry: Option<AcrRegistry>,
    repository: Option<String>,
    tag: Option<String>,
    dockerfile: Option<PathBuf>,
    context: Option<PathBuf>,
    known_repositories: Vec<String>,
    preferred_registry: Option<String>,
    choices: Vec<Choice>,
    selected: usize,
    input: Option<String>,
    pending: Option<LoadRequest>,
    message: Option<String>,
    skip_latest: bool,
    platform: Option<String>,
}

impl WizardState {
    pub fn new(prefill: Prefill) -> Self {
        let mut state = Self {
            step: WizardStep::Registry,
            registry: prefill.registry.clone(),
            repository: prefill.repository.clone(),
            tag: prefill.tag.clone(),
            dockerfile: prefill.dockerfile.clone(),
            context: prefill.context.clone(),
            prefill,
            known_repositories: Vec::new(),
            preferred_registry: None,
            choices: Vec::new(),
            selected: 0,
            input: None,
            pending: None,
            message: None,
            skip_latest: false,
            platform: None,
        };
        state.enter(state.next_missing(None));
        state
    }

    /// 確認画面に表示する追加オプション
    pub fn with_options(mut self, skip_latest: bool, platform: Option<String>) -> Self {
        self.skip_latest = skip_latest;
        self.platform = platform;
        self
    }

    /// レジストリ一覧でこの名前を初期選択にする
    pub fn with_preferred_registry(mut self, name: Option<String>) -> Self {
        self.preferred_registry = name;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn pending(&self) -> Option<&LoadRequest> {
        self.pending.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn take_pending(&mut self) -> Option<LoadRequest> {
        self.pending.take()
    }

    /// ステップ番号（表示用、1 始まり）と入力ステップ数
    pub fn progress(&self) -> (usize, usize) {
        let index = WizardStep::INPUTS
            .iter()
            .position(|s| *s == self.step)
            .unwrap_or(WizardStep::INPUTS.len());
        (index + 1, WizardStep::INPUTS.len())
    }

    /// 確認画面の項目
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
        vec![
            (
                "Registry",
                show(self.registry.as_ref().map(|r| r.login_server.clone())),
            ),
            ("Repository", show(self.repository.clone())),
            ("Tag", show(self.tag.clone())),
            (
                "Dockerfile",
                show(self.dockerfile.as_ref().map(|p| p.display().to_string())),
            ),
            (
                "Context",
                show(self.context.as_ref().map(|p| p.display().to_string())),
            ),
            ("Skip latest", self.skip_latest.to_string()),
            ("Platform", show(self.platform.clone())),
        ]
    }

    fn value_is_set(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Registry => self.registry.is_some(),
            WizardStep::Repository => self.repository.is_some(),
            WizardStep::Tag => self.tag.is_some(),
            WizardStep::Dockerfile => self.dockerfile.is_some(),
            WizardStep::Context => self.context.is_some(),
            WizardStep::Confirm => false,
        }
    }

    /// `after` より後で未入力の最初のステップ（すべて揃っていれば Confirm）
    fn next_missing(&self, after: Option<WizardStep>) -> WizardStep {
        WizardStep::INPUTS
            .into_iter()
            .filter(|s| after.is_none_or(|a| *s > a))
            .find(|s| !self.value_is_set(*s))
            .unwrap_or(WizardStep::Confirm)
    }

    /// ステップに入り、選択肢を用意する
    fn enter(&mut self, step: WizardStep) {
        self.step = step;
        self.choices.clear();
        self.selected = 0;
        self.input = None;
        self.pending = None;

        match step {
            WizardStep::Registry => self.pending = Some(LoadRequest::Registries),
            WizardStep::Repository => {
                if let Some(registry) = &self.registry {
                    self.pending = Some(LoadRequest::Repositories {
                        registry: registry.name.clone(),
                    });
                }
            }
            WizardStep::Tag => {
                let request = match (&self.registry, &self.repository) {
                    (Some(registry), Some(repository))
                        if self.prefill.repository.is_some()
                            || self.known_repositories.contains(repository) =>
                    {
                        Some(LoadRequest::Tags {
                            registry: registry.name.clone(),
                            repository: repository.clone(),
                        })
                    }
                    _ => None,
                };
                match request {
                    Some(request) => self.pending = Some(request),
                    // 新規リポジトリにはタグがない
                    None => self.apply_loaded(Loaded::Tags(Vec::new())),
                }
            }
            WizardStep::Dockerfile => self.pending = Some(LoadRequest::Dockerfiles),
            WizardStep::Context => {
                self.choices = vec![
                    Choice::text("カレントディレクトリ (.)", "."),
                    Choice::custom("パスを入力"),
                ];
            }
            WizardStep::Confirm => {}
        }
    }

    /// 読み込み結果を選択肢に反映
    pub fn apply_loaded(&mut self, loaded: Loaded) {
        self.pending = None;
        self.selected = 0;

        self.choices = match loaded {
            Loaded::Registries(registries) => {
                if registries.is_empty() {
                    self.message = Some("利用できるレジストリが見つかりません".to_string());
                }
                if let Some(preferred) = &self.preferred_registry
                    && let Some(index) = registries.iter().position(|r| &r.name == preferred)
                {
                    self.selected = index;
                }
                registries
                    .into_iter()
                    .map(|r| Choice {
                        label: format!("{} ({}) - {}", r.name, r.resource_group, r.login_server),
                        value: ChoiceValue::Registry(r),
                    })
                    .collect()
            }
            Loaded::Repositories(entries) => {
                self.known_repositories = entries.iter().map(|e| e.name.clone()).collect();
                let mut choices: Vec<Choice> = entries
                    .iter()
                    .map(|e| Choice::text(e.label(), e.name.clone()))
                    .collect();
                choices.push(Choice::custom("新しいリポジトリ名を入力"));
                choices
            }
            Loaded::Tags(existing) => {
                let mut choices: Vec<Choice> = suggest_tags(&existing)
                    .into_iter()
                    .map(|tag| Choice::text(tag.clone(), tag))
                    .collect();
                choices.push(Choice::custom("カスタムタグを入力"));
                choices
            }
            Loaded::Dockerfiles(paths) => {
                let mut choices: Vec<Choice> = paths
                    .iter()
                    .map(|p| {
                        let path = p.display().to_string();
                        Choice::text(path.clone(), path)
                    })
                    .collect();
                choices.push(Choice::custom("パスを入力"));
                choices
            }
        };
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, key: KeyEvent) -> WizardAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return WizardAction::Cancelled;
        }

        if self.input.is_some() {
            self.handle_input_key(key.code);
            return WizardAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return WizardAction::Cancelled,
            KeyCode::Backspace => self.back(),
            _ if self.pending.is_some() => {}
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.choices.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                if self.step == WizardStep::Confirm {
                    if let Some(answers) = self.answers() {
                        return WizardAction::Confirmed(answers);
                    }
                } else {
                    self.select();
                }
            }
            _ => {}
        }

        WizardAction::Continue
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        let Some(buffer) = self.input.as_mut() else {
            return;
        };

        match code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                self.input = None;
                self.message = None;
            }
            KeyCode::Enter => {
                let value = buffer.trim().to_string();
                if value.is_empty() {
                    self.message = Some("値を入力してください".to_string());
                    return;
                }
                if let Err(e) = self.check_custom(&value) {
                    self.message = Some(e);
                    return;
                }
                self.input = None;
                self.commit(value);
            }
            _ => {}
        }
    }

    fn check_custom(&self, value: &str) -> Result<(), String> {
        match self.step {
            WizardStep::Repository => validate_repository(value).map_err(|e| e.to_string()),
            WizardStep::Tag => validate_tag(value).map_err(|e| e.to_string()),
            _ => Ok(()),
        }
    }

    fn select(&mut self) {
        let Some(choice) = self.choices.get(self.selected).cloned() else {
            return;
        };

        match choice.value {
            ChoiceValue::Registry(registry) => {
                self.message = None;
                self.registry = Some(registry);
                self.advance();
            }
            ChoiceValue::Text(value) => self.commit(value),
            ChoiceValue::Custom => {
                self.message = None;
                self.input = Some(String::new());
            }
        }
    }

    fn commit(&mut self, value: String) {
        self.message = None;
        match self.step {
            WizardStep::Repository => self.repository = Some(value),
            WizardStep::Tag => self.tag = Some(value),
            WizardStep::Dockerfile => self.dockerfile = Some(PathBuf::from(value)),
            WizardStep::Context => self.context = Some(PathBuf::from(value)),
            WizardStep::Registry | WizardStep::Confirm => return,
        }
        self.advance();
    }

    fn advance(&mut self) {
        let next = self.next_missing(Some(self.step));
        self.enter(next);
    }

    /// 直前の入力ステップへ戻る（フラグで決まったステップは飛ばす）
    ///
    /// 戻った先以降の値は初期値に戻す。
    fn back(&mut self) {
        let Some(target) = WizardStep::INPUTS
            .into_iter()
            .rev()
            .find(|s| *s < self.step && !self.prefill.has(*s))
        else {
            return;
        };

        for step in WizardStep::INPUTS.into_iter().filter(|s| *s >= target) {
            self.reset(step);
        }
        self.message = None;
        self.enter(target);
    }

    fn reset(&mut self, step: WizardStep) {
        match step {
            WizardStep::Registry => self.registry = self.prefill.registry.clone(),
            WizardStep::Repository => self.repository = self.prefill.repository.clone(),
            WizardStep::Tag => self.tag = self.prefill.tag.clone(),
            WizardStep::Dockerfile => self.dockerfile = self.prefill.dockerfile.clone(),
            WizardStep::Context => self.context = self.prefill.context.clone(),
            WizardStep::Confirm => {}
        }
    }

    /// すべての値が揃っていれば確定値を返す
    pub fn answers(&self) -> Option<WizardAnswers> {
        Some(WizardAnswers {
            registry: self.registry.clone()?,
            repository: self.repository.clone()?,
            tag: self.tag.clone()?,
            dockerfile: self.dockerfile.clone()?,
            context: self.context.clone()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn registry(name: &str) -> AcrRegistry {
        AcrRegistry {
            name: name.to_string(),
            resource_group: "rg".to_string(),
            login_server: format!("{}.azurecr.io", name),
        }
    }

    fn type_text(state: &mut WizardState, text: &str) {
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_full_walkthrough() {
        let mut state = WizardState::new(Prefill::default());
        assert_eq!(state.step(), WizardStep::Registry);
        assert_eq!(state.take_pending(), Some(LoadRequest::Registries));

        state.apply_loaded(Loaded::Registries(vec![registry("a"), registry("b")]));
        state.handle_key(key(KeyCode::Char('j')));
        state.handle_key(key(KeyCode::Enter));

        assert_eq!(state.step(), WizardStep::Repository);
        assert_eq!(
            state.take_pending(),
            Some(LoadRequest::Repositories {
                registry: "b".to_string()
            })
        );
        state.apply_loaded(Loaded::Repositories(vec![
            RepositoryEntry {
                name: "api".to_string(),
                latest: None,
            },
            RepositoryEntry {
                name: "web".to_string(),
                latest: Some("1.4.2".to_string()),
            },
        ]));
        assert_eq!(state.choices()[0].label, "api - no-tags");
        assert_eq!(state.choices()[1].label, "web - 1.4.2");
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Enter));

        assert_eq!(state.step(), WizardStep::Tag);
        assert_eq!(
            state.take_pending(),
            Some(LoadRequest::Tags {
                registry: "b".to_string(),
                repository: "web".to_string()
            })
        );
        state.apply_loaded(Loaded::Tags(vec!["1.4.2".to_string(), "latest".to_string()]));
        let labels: Vec<_> = state.choices().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["1.4.3", "1.5.0", "2.0.0", "カスタムタグを入力"]);
        state.handle_key(key(KeyCode::Enter));

        assert_eq!(state.step(), WizardStep::Dockerfile);
        assert_eq!(state.take_pending(), Some(LoadRequest::Dockerfiles));
        state.apply_loaded(Loaded::Dockerfiles(vec![PathBuf::from("Dockerfile")]));
        state.handle_key(key(KeyCode::Enter));

        assert_eq!(state.step(), WizardStep::Context);
        state.handle_key(key(KeyCode::Enter));

        assert_eq!(state.step(), WizardStep::Confirm);
        let action = state.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            WizardAction::Confirmed(WizardAnswers {
                registry: registry("b"),
                repository: "web".to_string(),
                tag: "1.4.3".to_string(),
                dockerfile: PathBuf::from("Dockerfile"),
                context: PathBuf::from("."),
            })
        );
    }

    #[test]
    fn test_prefilled_steps_are_skipped() {
        let prefill = Prefill {
            registry: Some(registry("a")),
            repository: Some("web".to_string()),
            tag: None,
            dockerfile: Some(PathBuf::from("Dockerfile")),
            context: None,
        };
        let mut state = WizardState::new(prefill);

        assert_eq!(state.step(), WizardStep::Tag);
        assert!(matches!(state.take_pending(), Some(LoadRequest::Tags { .. })));
        state.apply_loaded(Loaded::Tags(Vec::new()));
        state.handle_key(key(KeyCode::Enter));

        // Dockerfile は指定済み
        assert_eq!(state.step(), WizardStep::Context);
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.step(), WizardStep::Confirm);
        assert_eq!(state.answers().unwrap().tag, "0.0.1");
    }

    #[test]
    fn test_all_prefilled_goes_to_confirm() {
        let prefill = Prefill {
            registry: Some(registry("a")),
            repository: Some("web".to_string()),
            tag: Some("1.0.0".to_string()),
            dockerfile: Some(PathBuf::from("Dockerfile")),
            context: Some(PathBuf::from(".")),
        };
        let mut state = WizardState::new(prefill);
        assert_eq!(state.step(), WizardStep::Confirm);
        assert!(state.pending().is_none());

        // 戻る先がないので確認画面のまま
        state.handle_key(key(KeyCode::Backspace));
        assert_eq!(state.step(), WizardStep::Confirm);
        assert!(matches!(
            state.handle_key(key(KeyCode::Enter)),
            WizardAction::Confirmed(_)
        ));
    }

    #[test]
    fn test_new_repository_skips_tag_lookup() {
        let prefill = Prefill {
            registry: Some(registry("a")),
            ..Prefill::default()
        };
        let mut state = WizardState::new(prefill);
        assert_eq!(state.step(), WizardStep::Repository);
        state.take_pending();
        state.apply_loaded(Loaded::Repositories(Vec::new()));

        // 選択肢は「新しいリポジトリ名を入力」のみ
        assert_eq!(state.choices().len(), 1);
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.input(), Some(""));

        type_text(&mut state, "Bad");
        state.handle_key(key(KeyCode::Enter));
        assert!(state.message().is_some());
        assert_eq!(state.step(), WizardStep::Repository);

        for _ in 0..3 {
            state.handle_key(key(KeyCode::Backspace));
        }
        type_text(&mut state, "svc/new-api");
        state.handle_key(key(KeyCode::Enter));

        assert_eq!(state.step(), WizardStep::Tag);
        assert!(state.pending().is_none());
        assert_eq!(state.choices()[0].label, "0.0.1");
    }

    #[test]
    fn test_custom_tag_input() {
        let prefill = Prefill {
            registry: Some(registry("a")),
            repository: Some("web".to_string()),
            ..Prefill::default()
        };
        let mut state = WizardState::new(prefill);
        state.apply_loaded(Loaded::Tags(vec!["0.9.0".to_string()]));
        state.handle_key(key(KeyCode::Up));
        for _ in 0..3 {
            state.handle_key(key(KeyCode::Down));
        }
        state.handle_key(key(KeyCode::Enter));
        assert!(state.input().is_some());

        // 入力中の q は文字として扱う
        type_text(&mut state, "rc-q1");
        assert_eq!(state.input(), Some("rc-q1"));
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.step(), WizardStep::Dockerfile);
    }

    #[test]
    fn test_back_resets_later_values() {
        let mut state = WizardState::new(Prefill::default());
        state.apply_loaded(Loaded::Registries(vec![registry("a")]));
        state.handle_key(key(KeyCode::Enter));
        state.apply_loaded(Loaded::Repositories(vec![RepositoryEntry {
            name: "web".to_string(),
            latest: None,
        }]));
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.step(), WizardStep::Tag);

        state.handle_key(key(KeyCode::Backspace));
        assert_eq!(state.step(), WizardStep::Repository);
        assert!(state.summary().iter().any(|(k, v)| *k == "Repository" && v == "-"));

        state.handle_key(key(KeyCode::Backspace));
        assert_eq!(state.step(), WizardStep::Registry);
        assert_eq!(state.take_pending(), Some(LoadRequest::Registries));
        assert!(state.answers().is_none());
    }

    #[test]
    fn test_back_skips_prefilled_steps() {
        let prefill = Prefill {
            repository: Some("web".to_string()),
            tag: Some("1.0.0".to_string()),
            ..Prefill::default()
        };
        let mut state = WizardState::new(prefill);
        state.apply_loaded(Loaded::Registries(vec![registry("a")]));
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.step(), WizardStep::Dockerfile);

        state.handle_key(key(KeyCode::Backspace));
        assert_eq!(state.step(), WizardStep::Registry);
        assert_eq!(state.answers(), None);
        assert!(state.summary().iter().any(|(k, v)| *k == "Tag" && v == "1.0.0"));
    }

    #[test]
    fn test_cancel_keys() {
        let mut state = WizardState::new(Prefill::default());
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), WizardAction::Cancelled);
        assert_eq!(state.handle_key(key(KeyCode::Esc)), WizardAction::Cancelled);
        assert_eq!(
            state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            WizardAction::Cancelled
        );
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let mut state = WizardState::new(Prefill::default());
        assert!(state.pending().is_some());
        assert_eq!(state.handle_key(key(KeyCode::Enter)), WizardAction::Continue);
        assert_eq!(state.step(), WizardStep::Registry);
    }

    #[test]
    fn test_preferred_registry_is_preselected() {
        let mut state =
            WizardState::new(Prefill::default()).with_preferred_registry(Some("b".to_string()));
        state.apply_loaded(Loaded::Registries(vec![registry("a"), registry("b")]));
        assert_eq!(state.selected(), 1);
    }

    #[test]
    fn test_empty_registry_list() {
        let mut state = WizardState::new(Prefill::default());
        state.apply_loaded(Loaded::Registries(Vec::new()));
        assert!(state.message().is_some());
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.step(), WizardStep::Registry);
    }
}
