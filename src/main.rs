mod api;
mod app;
mod config;
mod model;
mod pages;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::{ApiClient, ContactApi};
use app::{App, Popup};
use config::AppConfig;
use theme::{EnvSystemPreference, ThemePreference, ThemeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

#[derive(Parser, Debug)]
#[command(name = "picaton")]
#[command(version)]
#[command(about = "Business cards, projects and contacts from the terminal")]
struct Args {
    /// Set the display theme and exit
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,

    /// Print the current display theme and exit
    #[arg(long)]
    print_theme: bool,

    /// Open the contact profile of this user
    #[arg(short, long)]
    user: Option<String>,

    /// Save a user to your contacts and exit
    #[arg(long, value_name = "USER_ID")]
    save_contact: Option<String>,

    /// Card to save with --save-contact (defaults to none)
    #[arg(long, value_name = "CARD_ID", requires = "save_contact")]
    card: Option<String>,

    /// Remove a saved contact and exit
    #[arg(long, value_name = "CONTACT_ID")]
    delete_contact: Option<String>,

    /// Override the API base URL from config.toml
    #[arg(long)]
    api_url: Option<String>,

    /// Override the signed-in user from config.toml
    #[arg(long)]
    user_id: Option<String>,
}

impl Args {
    fn is_one_shot(&self) -> bool {
        self.theme.is_some()
            || self.print_theme
            || self.save_contact.is_some()
            || self.delete_contact.is_some()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // TUI owns the terminal, so its logs go to a file instead
    let _guard = init_logging(!args.is_one_shot());

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(url) = &args.api_url {
        config.api_url = url.clone();
    }
    if let Some(user_id) = &args.user_id {
        config.user_id = Some(user_id.clone());
    }

    // Handle CLI-only commands
    if let Some(choice) = args.theme {
        return set_theme(choice);
    }

    if args.print_theme {
        let store = ThemeStore::open_default(&EnvSystemPreference);
        println!("{}", store.get());
        return Ok(());
    }

    if let Some(target) = &args.save_contact {
        return save_contact(&config, target, args.card.as_deref()).await;
    }

    if let Some(contact_id) = &args.delete_contact {
        return delete_contact(&config, contact_id).await;
    }

    // Run TUI
    run_tui(config, args.user).await
}

fn init_logging(to_file: bool) -> Option<WorkerGuard> {
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

    if to_file {
        if let Some(dir) = dirs::data_local_dir().map(|d| d.join("picaton")) {
            if std::fs::create_dir_all(&dir).is_ok() {
                let appender = tracing_appender::rolling::never(dir, "picaton.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                registry
                    .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
                    .init();
                return Some(guard);
            }
        }
        // Nowhere to write; stay quiet rather than draw over the TUI
        registry.init();
        return None;
    }

    registry
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    None
}

fn set_theme(choice: ThemeArg) -> Result<()> {
    let mut store = ThemeStore::open_default(&EnvSystemPreference);
    match choice {
        ThemeArg::Light => store.set(ThemePreference::Light),
        ThemeArg::Dark => store.set(ThemePreference::Dark),
        ThemeArg::Toggle => store.toggle(),
    }
    println!("{}", store.get());
    Ok(())
}

fn signed_in_user(config: &AppConfig) -> Result<&str> {
    config
        .user_id
        .as_deref()
        .context("No user_id configured (set it in config.toml or pass --user-id)")
}

async fn save_contact(config: &AppConfig, target: &str, card_id: Option<&str>) -> Result<()> {
    let owner = signed_in_user(config)?;
    let api = ApiClient::from_config(config)?;

    let contact = api
        .save_contact(owner, target, card_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save contact {}: {}", target, e);
            e
        })
        .context("Could not save contact")?;

    println!("{}", serde_json::to_string(&contact)?);
    Ok(())
}

async fn delete_contact(config: &AppConfig, contact_id: &str) -> Result<()> {
    let api = ApiClient::from_config(config)?;

    api.delete_contact(contact_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete contact {}: {}", contact_id, e);
            e
        })
        .context("Could not delete contact")?;

    println!("Deleted contact {}", contact_id);
    Ok(())
}

async fn run_tui(config: AppConfig, target_user: Option<String>) -> Result<()> {
    let theme = ThemeStore::open_default(&EnvSystemPreference);
    let mut app = App::new(config, theme, target_user)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    // First frame shows the loaders while the pages fetch
    terminal.draw(|f| ui::draw(f, app))?;
    app.load().await;

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None && !app.is_editing() => {
                            return Ok(())
                        }
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key).await {
                                app.set_status(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        app.tick();
    }
}
