//! contacts-tui - Terminal UI for the contact manager
//!
//! Single screen: the contact list ordered by a selectable field, with an
//! add-contact dialog and delete on the selected row.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use contacts_tui::{
    app::{event::{EventHandler, TuiEvent}, reduce, resolve_key, Action, AppState},
    services::{describe_failure, ServiceHandle},
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui::{self, ContactForm},
    TuiError,
};
use libcontacts::config::resolve_data_path;
use libcontacts::logging::{self, LogTarget};
use libcontacts::{Config, ContactsError, SortOrder};

#[derive(Parser, Debug)]
#[command(name = "contacts-tui")]
#[command(version, about = "Manage contacts from the terminal")]
#[command(long_about = r#"Manage contacts from the terminal.

Contacts are stored in a local SQLite database and listed in the chosen
order. Press F1 inside the application for key bindings.

EXAMPLES:
    # Open the default database
    contacts-tui

    # Use another database, ordered by phone number
    contacts-tui --db ~/work/Contact.db --sort phone-number

    # Debug logging to a custom file
    contacts-tui --log-level debug --log-file /tmp/contacts.log

ENVIRONMENT:
    CONTACTS_CONFIG       Configuration file path
    CONTACTS_LOG_FORMAT   Log format: text, json, pretty
    CONTACTS_LOG_LEVEL    Log level: error, warn, info, debug, trace
    CONTACTS_TUI_TICK_MS  Event poll interval in milliseconds
    NO_COLOR              Disable colors
"#)]
struct Cli {
    /// Configuration file (defaults to the XDG config location)
    #[arg(short, long, value_name = "FILE", env = "CONTACTS_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overriding the configured path
    #[arg(long, value_name = "FILE")]
    db: Option<String>,

    /// Initial sort order: first-name, last-name, phone-number
    #[arg(short, long, value_name = "ORDER")]
    sort: Option<SortOrder>,

    /// Log file (defaults to contacts.log in the data directory)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Minimum log level
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Load the configuration file and apply command-line overrides
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) if path.exists() => Config::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            Some(path) => {
                return Err(ContactsError::InvalidInput(format!(
                    "config file not found: {}",
                    path.display()
                ))
                .into())
            }
            None => Config::load().context("Failed to load config")?,
        };

        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
        if let Some(sort) = self.sort {
            config.session.default_sort = sort;
        }

        Ok(config)
    }

    fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(resolve_data_path()?.join("contacts.log")),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Exit code of the innermost typed error, 1 for anything else
fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<TuiError>() {
        e.exit_code()
    } else if let Some(e) = error.downcast_ref::<ContactsError>() {
        e.exit_code()
    } else {
        1
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut log_config = logging::config_from_env();
    if let Some(level) = &cli.log_level {
        log_config.level = level.clone();
    }
    let log_path = cli.log_path()?;
    log_config
        .with_target(LogTarget::File(log_path.clone()))
        .init()
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let config = cli.resolve_config()?;
    let services = ServiceHandle::new(&config).context("Failed to open contacts")?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, &services);

    restore_terminal(terminal)?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Terminal UI exited with error");
    }
    result
}

fn run_app(terminal: &mut Tui, services: &ServiceHandle) -> Result<()> {
    let mut state = reduce(AppState::new(), Action::ViewUpdated(services.view_state()));

    // Holding this receiver keeps the live query running
    let views = services.subscribe();
    let failures = services.subscribe_failures();

    let mut form = ContactForm::new();
    let event_handler = EventHandler::new(state.config.tick_rate_ms);

    loop {
        // The bridge only signals change; the controller's latest snapshot wins
        if views.try_iter().last().is_some() {
            state = reduce(state, Action::ViewUpdated(services.view_state()));
        }

        for failure in failures.try_iter() {
            state = reduce(state, Action::ShowError(describe_failure(&failure)));
        }

        form.sync(&state.view);

        terminal.draw(|frame| {
            ui::render(frame, &state, &mut form);
        })?;

        let action = match event_handler.next()? {
            TuiEvent::Key(key) => match resolve_key(&state, key) {
                Some(action) => action,
                None if state.editing() => match form.input(state.focus, key) {
                    Some(content) => Action::Dispatch(state.focus.event(content)),
                    None => Action::Tick,
                },
                None => Action::Tick,
            },
            other => other.into(),
        };

        if let Action::Dispatch(ref event) = action {
            services.dispatch(event.clone());
            state = reduce(state, action);
            // Form changes are applied synchronously by the controller
            state = reduce(state, Action::ViewUpdated(services.view_state()));
        } else {
            state = reduce(state, action);
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
