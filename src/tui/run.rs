//! Dashboard TUI entry point and setup.

use std::{io, path::Path};

use chrono::NaiveDate;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::error::FlowResult;
use crate::tui::dashboard::DashboardApp;

/// Load the workspace, then hand the terminal to the dashboard until the user quits.
///
/// An unreadable or corrupt workspace is reported as an ordinary error before raw mode
/// and the alternate screen are entered, so the shell is never left in raw mode.
pub fn run_dashboard(db_path: &Path, today: NaiveDate) -> FlowResult<()> {
    let mut app = DashboardApp::new(db_path, today)?;
    info!(path = %db_path.display(), "starting dashboard");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}
