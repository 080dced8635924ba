use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::form::SettingsForm;
use crate::graphql::GraphqlClient;
use crate::model::ConsoleEndpoint;
use crate::port::SettingsPort;
use crate::store::LocalStore;

mod app;
mod fields;
mod input;
mod render;

use self::app::FormApp;

pub(crate) fn run() -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let store = LocalStore::discover(&std::env::current_dir().context("get current dir")?)?;
    let (console, token) = store.require_console_and_token()?;
    crate::logging::init_file(&store.log_path())?;

    let client = GraphqlClient::new(console.clone(), token)?;
    let (form, fetched_at) = load_form(&store, &console, &client)?;
    let mut app = FormApp::new(form, fetched_at);
    tracing::info!(repository_id = %console.repository_id, "terminal form opened");

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = run_loop(&mut terminal, &mut app, &store, &console, &client);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    // Unsaved drafts survive the session, same as with `repoconf settings edit`.
    let persisted = persist(&store, &console, &app);
    res.and(persisted)
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut FormApp,
    store: &LocalStore,
    console: &ConsoleEndpoint,
    port: &dyn SettingsPort,
) -> Result<()> {
    loop {
        terminal.draw(|f| render::draw(f, app)).context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    let Some(command) = app.handle_key(k) else {
                        continue;
                    };
                    // The call blocks; show that it started.
                    terminal.draw(|f| render::draw(f, app)).context("draw")?;
                    if app.perform(command, port) {
                        persist(store, console, app)?;
                    }
                }
                _ => {}
            }
        }
    }
}

fn load_form(
    store: &LocalStore,
    console: &ConsoleEndpoint,
    port: &dyn SettingsPort,
) -> Result<(SettingsForm, String)> {
    if let Some(record) = store.get_form(console)?
        && record.repository_id == console.repository_id
    {
        let fetched_at = record.fetched_at.clone();
        return Ok((SettingsForm::from_record(record), fetched_at));
    }
    let form = SettingsForm::load(port, &console.repository_id)?;
    let fetched_at = now_ts()?;
    store.put_form(console, &form.to_record(&fetched_at))?;
    Ok((form, fetched_at))
}

fn persist(store: &LocalStore, console: &ConsoleEndpoint, app: &FormApp) -> Result<()> {
    store
        .put_form(console, &app.form.to_record(&app.fetched_at))
        .context("persist settings form")
}

fn now_ts() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")
}
