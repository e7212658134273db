mod api;
mod app;
mod cache;
mod commands;
mod config;
mod event;
mod i18n;
mod logging;
mod prefs;
mod query;
mod table;
mod ui;
mod validation;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::cache::Store;
use crate::event::EventHandler;
use crate::i18n::Language;
use crate::prefs::PreferenceStore;
use crate::ui::views::Services;
use crate::ui::Theme;

#[derive(Parser, Debug)]
#[command(name = "upcon")]
#[command(about = "A terminal console for users and posts over a REST API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/upcon/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL, overriding the config file
  #[arg(short, long)]
  base_url: Option<String>,

  /// Theme for this run; the stored preference is used otherwise
  #[arg(short, long, value_enum)]
  theme: Option<Theme>,

  /// Language for this run; the stored preference is used otherwise
  #[arg(short, long, value_enum)]
  lang: Option<Language>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }

  // Without a log file the console still works; say so before the UI takes
  // over the terminal
  let _guard = match prefs::data_dir().and_then(|dir| logging::init(&dir.join("logs"))) {
    Ok(guard) => Some(guard),
    Err(e) => {
      eprintln!("upcon: logging disabled: {e}");
      None
    }
  };

  // A missing preferences database only costs persistence
  let prefs = match PreferenceStore::open_default() {
    Ok(prefs) => Some(prefs),
    Err(e) => {
      warn!(error = %e, "Preferences unavailable");
      None
    }
  };
  let theme = args
    .theme
    .or_else(|| prefs.as_ref().and_then(|p| p.theme().ok().flatten()))
    .unwrap_or_default();
  let language = args
    .lang
    .or_else(|| prefs.as_ref().and_then(|p| p.language().ok().flatten()))
    .unwrap_or_default();

  let client = ApiClient::new(&config.api)?;
  info!(base_url = %client.base_url(), "Starting upcon");
  let store = Store::new(&client, config.cache.into());
  let events = EventHandler::new(app::TICK_RATE);
  let services = Services::new(store, events.notifier(), config.tables.clone());

  // Initialize and run the app
  let mut app = app::App::new(config.display_title(), services, prefs, theme, language);
  app.run(events).await?;

  info!("Exiting");
  Ok(())
}
