//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tiendactl_core::{Database, Notice};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::app::App;
use crate::event::{handle_key, poll_event, HandleResult};
use crate::ui;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the tabbed store UI until the operator quits.
///
/// `notices` must be the receiving end of the notifier `db` reports through.
pub async fn run(db: &mut Database, notices: UnboundedReceiver<Notice>) -> Result<()> {
    let mut terminal = init_terminal()?;

    let mut app = App::new(db.config().describe());
    app.active_panel_mut().refresh(db).await;

    let result = run_loop(&mut terminal, &mut app, db, notices).await;

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;
    db.disconnect().await;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    db: &mut Database,
    mut notices: UnboundedReceiver<Notice>,
) -> Result<()> {
    loop {
        while let Ok(notice) = notices.try_recv() {
            app.push_notice(notice);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(event) = poll_event(Duration::from_millis(100))? {
            match event {
                // Windows also reports releases
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Any key closes the modal on top
                    if app.has_overlay() {
                        app.dismiss_overlay();
                        continue;
                    }

                    match handle_key(app, key) {
                        HandleResult::Quit => break,
                        HandleResult::Continue => {}
                        action => dispatch(app, db, action).await,
                    }
                }
                Event::Resize(_, _) => {
                    // Terminal resized, will be handled on next draw
                }
                _ => {}
            }
        }
    }

    info!("leaving UI");
    Ok(())
}

/// Run a store operation on the active panel
async fn dispatch(app: &mut App, db: &mut Database, action: HandleResult) {
    let notifier = db.notifier();
    let panel = app.active_panel_mut();

    match action {
        HandleResult::Refresh => panel.refresh(db).await,
        HandleResult::ApplyFilter => panel.apply_filter(db).await,
        HandleResult::Save => {
            panel.save(db, notifier.as_ref()).await;
        }
        HandleResult::Update => {
            panel.update(db, notifier.as_ref()).await;
        }
        HandleResult::Delete => {
            panel.delete(db, notifier.as_ref()).await;
        }
        HandleResult::Clear => panel.clear(db, notifier.as_ref()).await,
        HandleResult::Continue | HandleResult::Quit => {}
    }
}
