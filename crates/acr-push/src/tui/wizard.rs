//! ビルド設定ウィザード

use acr_push_azure::RegistryCatalog;
use acr_push_build::{find_dockerfiles, max_semver};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::path::Path;

use crate::logging;

use super::state::{
    LoadRequest, Loaded, RepositoryEntry, WizardAction, WizardAnswers, WizardState, WizardStep,
};
use super::terminal::{TerminalSession, Tui};

/// ウィザードを実行
///
/// 確定した場合は入力値、キャンセルされた場合は None を返す。
pub async fn run_wizard<C: RegistryCatalog + ?Sized>(
    catalog: &C,
    mut state: WizardState,
    root: &Path,
) -> anyhow::Result<Option<WizardAnswers>> {
    // 画面を戻すまでログは溜めておく（drop 順で端末の後に吐き出される）
    let _logs = logging::hold();
    let mut session = TerminalSession::start()?;
    let result = event_loop(session.terminal(), catalog, &mut state, root).await;
    session.finish()?;
    result
}

async fn event_loop<C: RegistryCatalog + ?Sized>(
    terminal: &mut Tui,
    catalog: &C,
    state: &mut WizardState,
    root: &Path,
) -> anyhow::Result<Option<WizardAnswers>> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| draw_ui(f, state))?;

        if let Some(request) = state.take_pending() {
            let loaded = load(catalog, request, root).await?;
            state.apply_loaded(loaded);
            continue;
        }

        let Some(event) = events.next().await else {
            return Ok(None);
        };

        if let Event::Key(key) = event?
            && key.kind == KeyEventKind::Press
        {
            match state.handle_key(key) {
                WizardAction::Continue => {}
                WizardAction::Confirmed(answers) => return Ok(Some(answers)),
                WizardAction::Cancelled => return Ok(None),
            }
        }
    }
}

/// ステップの選択肢を読み込む
pub(crate) async fn load<C: RegistryCatalog + ?Sized>(
    catalog: &C,
    request: LoadRequest,
    root: &Path,
) -> anyhow::Result<Loaded> {
    let loaded = match request {
        LoadRequest::Registries => Loaded::Registries(catalog.registries().await?),
        LoadRequest::Repositories { registry } => {
            let mut entries = Vec::new();
            for name in catalog.repositories(&registry).await? {
                let tags = tags_or_empty(catalog, &registry, &name).await;
                let latest = max_semver(&tags)
                    .map(|(major, minor, patch)| format!("{}.{}.{}", major, minor, patch));
                entries.push(RepositoryEntry { name, latest });
            }
            Loaded::Repositories(entries)
        }
        LoadRequest::Tags {
            registry,
            repository,
        } => Loaded::Tags(tags_or_empty(catalog, &registry, &repository).await),
        LoadRequest::Dockerfiles => Loaded::Dockerfiles(find_dockerfiles(root)),
    };
    Ok(loaded)
}

async fn tags_or_empty<C: RegistryCatalog + ?Sized>(
    catalog: &C,
    registry: &str,
    repository: &str,
) -> Vec<String> {
    catalog
        .tags(registry, repository)
        .await
        .unwrap_or_else(|e| {
            tracing::debug!("Failed to list tags of {}: {}", repository, e);
            Vec::new()
        })
}

fn draw_ui(frame: &mut Frame, state: &WizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_content(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &WizardState) {
    let text = if state.step() == WizardStep::Confirm {
        "ACR Push ウィザード".to_string()
    } else {
        let (current, total) = state.progress();
        format!("ACR Push ウィザード ({}/{})", current, total)
    };

    let title = Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn draw_content(frame: &mut Frame, area: Rect, state: &WizardState) {
    if let Some(request) = state.pending() {
        draw_loading(frame, area, &request.message());
        return;
    }

    match state.step() {
        WizardStep::Confirm => draw_confirmation(frame, area, state),
        _ if state.input().is_some() => draw_input(frame, area, state),
        _ => draw_choices(frame, area, state),
    }
}

fn draw_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_choices(frame: &mut Frame, area: Rect, state: &WizardState) {
    let mut items: Vec<ListItem> = state
        .choices()
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let (marker, style) = if i == state.selected() {
                (
                    "> ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default())
            };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}", marker, choice.label),
                style,
            )))
        })
        .collect();

    if let Some(message) = state.message() {
        items.push(ListItem::new(""));
        items.push(ListItem::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red),
        ))));
    }

    let list = List::new(items).block(
        Block::default()
            .title(format!("{} (↑↓で移動)", state.step().title()))
            .borders(Borders::ALL),
    );
    frame.render_widget(list, area);
}

fn draw_input(frame: &mut Frame, area: Rect, state: &WizardState) {
    let mut text = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(
                state.input().unwrap_or_default(),
                Style::default().fg(Color::Green),
            ),
            Span::styled("_", Style::default().fg(Color::Gray)),
        ]),
    ];

    if let Some(message) = state.message() {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(state.step().title())
            .borders(Borders::ALL),
    );
    frame.render_widget(paragraph, area);
}

fn draw_confirmation(frame: &mut Frame, area: Rect, state: &WizardState) {
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "以下の設定でビルド・プッシュします：",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (label, value) in state.summary() {
        text.push(Line::from(vec![
            Span::raw(format!("{:<12}", format!("{}:", label))),
            Span::styled(value, Style::default().fg(Color::Cyan)),
        ]));
    }

    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Enterで確定、Backspaceで戻る",
        Style::default().fg(Color::Yellow),
    )));

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("確認"));
    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &WizardState) {
    let help_text = if state.input().is_some() {
        "Enter: 決定 | Esc: 一覧に戻る | Ctrl-C: 終了"
    } else if state.step() == WizardStep::Confirm {
        "Enter: 確定 | Backspace: 戻る | q/Esc: 終了"
    } else {
        "↑↓/jk: 選択 | Enter: 次へ | Backspace: 戻る | q/Esc: 終了"
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
