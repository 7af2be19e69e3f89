pub mod app;
pub mod ui;

use std::io;

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
use taskmaster_core::KeyValueStore;

use crate::tui::app::{App, InputMode};

pub fn run<S: KeyValueStore + Clone>(storage: S) -> Result<()> {
    // Load before touching the terminal so storage errors print normally.
    let mut app = App::new(storage)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend, S: KeyValueStore>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => {
                app.message = None;
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char(' ') | KeyCode::Enter => app.toggle_status(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_task(),
                    KeyCode::Char('a') => app.enter_add_mode(),
                    KeyCode::Char('e') => app.enter_edit_mode(),
                    KeyCode::Char('/') => app.enter_search_mode(),
                    KeyCode::Char('s') => app.cycle_status_filter(),
                    KeyCode::Char('p') => app.cycle_priority_filter(),
                    KeyCode::Char('x') => app.clear_completed(),
                    KeyCode::Char('C') => app.set_all_completed(true),
                    KeyCode::Char('R') => app.set_all_completed(false),
                    KeyCode::Char('D') => app.enter_confirm_clear_all(),
                    KeyCode::Char('t') => app.toggle_theme(),
                    _ => {}
                }
            }
            InputMode::ConfirmClearAll => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_clear_all(true),
                _ => app.confirm_clear_all(false),
            },
            InputMode::Adding | InputMode::Editing(_) | InputMode::Searching => match key.code {
                KeyCode::Enter => app.submit_command(),
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
}
