//! Interactive settings panel.

use std::io::{self, Write};

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{debug, info};

use llamachat_storage::Storage;
use llamachat_tui_core::{is_quit, Event, EventHandler};
use llamachat_tui_dialog::{SettingsDialog, SettingsResult};

/// Restore the terminal to its normal state.
pub fn restore_terminal() {
    // Best effort - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        crossterm::cursor::Show
    );
    let _ = io::stdout().flush();
}

/// Install a panic hook that restores the terminal before printing the panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));
}

/// Open the settings panel over `store` until it is saved or dismissed.
pub async fn run<S: Storage>(store: S) -> anyhow::Result<SettingsResult> {
    install_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut dialog = SettingsDialog::new(store);
    let mut events = EventHandler::new();
    let event_loop = events.start();

    let result = run_dialog(&mut terminal, &mut dialog, &mut events).await;

    event_loop.stop().await;
    restore_terminal();
    result
}

/// Drive `dialog` from `events` until it signals closure.
pub async fn run_dialog<B: Backend, S: Storage>(
    terminal: &mut Terminal<B>,
    dialog: &mut SettingsDialog<S>,
    events: &mut EventHandler,
) -> anyhow::Result<SettingsResult> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            dialog.render(frame, area);
        })?;

        let Some(event) = events.next().await else {
            debug!("Event stream ended");
            return Ok(dialog.close());
        };

        let result = match event {
            Event::Key(key) if is_quit(&key) => dialog.close(),
            Event::Key(key) => dialog.handle_key(key),
            Event::Mouse(mouse) => dialog.handle_mouse(mouse),
            Event::Paste(text) => {
                dialog.handle_paste(&text);
                SettingsResult::None
            }
            Event::Resize(..) => SettingsResult::None,
        };

        match result {
            SettingsResult::None => {}
            SettingsResult::Saved => {
                info!("Settings saved from panel");
                return Ok(result);
            }
            SettingsResult::Closed => {
                info!("Settings panel dismissed");
                return Ok(result);
            }
        }
    }
}
