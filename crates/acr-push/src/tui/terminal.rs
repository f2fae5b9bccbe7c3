use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io::{self, Stdout};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// raw モードと代替スクリーンに切り替える
pub fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// 端末を元の状態に戻す
pub fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// 端末を使っている間のセッション
///
/// パニックで巻き戻された場合も含め、drop 時に必ず端末を戻す。
pub struct TerminalSession<B: Backend> {
    terminal: Terminal<B>,
    restore: fn(&mut Terminal<B>) -> io::Result<()>,
    restored: bool,
}

impl TerminalSession<CrosstermBackend<Stdout>> {
    pub fn start() -> io::Result<Self> {
        Ok(Self::with_restore(setup_terminal()?, restore_terminal))
    }
}

impl<B: Backend> TerminalSession<B> {
    pub fn with_restore(
        terminal: Terminal<B>,
        restore: fn(&mut Terminal<B>) -> io::Result<()>,
    ) -> Self {
        Self {
            terminal,
            restore,
            restored: false,
        }
    }

    pub fn terminal(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// 明示的に端末を戻す（エラーを呼び出し元へ返す）
    pub fn finish(mut self) -> io::Result<()> {
        self.restored = true;
        (self.restore)(&mut self.terminal)
    }
}

impl<B: Backend> Drop for TerminalSession<B> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = (self.restore)(&mut self.terminal) {
            tracing::debug!("Failed to restore terminal: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static RESTORED: AtomicUsize = AtomicUsize::new(0);

    fn count_restore(_terminal: &mut Terminal<TestBackend>) -> io::Result<()> {
        RESTORED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn session() -> TerminalSession<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        TerminalSession::with_restore(terminal, count_restore)
    }

    #[test]
    fn test_session_restores_on_panic_and_once_on_finish() {
        let before = RESTORED.load(Ordering::SeqCst);

        let result = std::panic::catch_unwind(|| {
            let mut session = session();
            session.terminal().draw(|_| {}).unwrap();
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(RESTORED.load(Ordering::SeqCst), before + 1);

        session().finish().unwrap();
        assert_eq!(RESTORED.load(Ordering::SeqCst), before + 2);
    }
}
