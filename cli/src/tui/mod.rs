pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use todolite_core::{FileKeyValueStore, Filter, LoadReport, TodoState};
use tracing::{error, info};

use crate::tui::app::{App, InputMode};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(state: TodoState<FileKeyValueStore>, report: LoadReport) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(tasks = state.snapshot().len(), "starting tui");
    let mut app = App::new(state, report);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "tui exited with an error");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.refresh_if_dirty();
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') => app.toggle_selected(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                KeyCode::Char('a') => app.enter_add_mode(),
                KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
                KeyCode::Char('c') => app.clear_completed(),
                KeyCode::Char('f') => app.cycle_filter(),
                KeyCode::Char('1') => app.set_filter(Filter::All),
                KeyCode::Char('2') => app.set_filter(Filter::Active),
                KeyCode::Char('3') => app.set_filter(Filter::Completed),
                _ => {}
            },
            InputMode::Adding | InputMode::Editing => match key.code {
                KeyCode::Enter => app.submit(),
                KeyCode::Esc => app.cancel(),
                KeyCode::Tab => app.blur(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
}
