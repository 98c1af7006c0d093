//! Application context for the Pillbox CLI.
//!
//! Bundles the parsed arguments with the lazily loaded config file so
//! handlers don't re-read it or thread paths around.

use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use pillbox_core::{JsonFileStore, ScheduleStore};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::{read_config, PillboxConfig};
use crate::dispatcher::FileDispatcher;
use crate::ui::UiContext;

use super::clock::resolve_clock;
use super::outcome::report_outcome;
use super::resolver::{resolve_config_path, resolve_data_dir};

/// The engine as the CLI runs it.
pub type Store = ScheduleStore<JsonFileStore, FileDispatcher>;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<PillboxConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// UI context for a command, honoring its `--json` flag.
    pub fn ui(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }

    /// The config file, or defaults when it does not exist yet.
    pub fn config(&self) -> anyhow::Result<&PillboxConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if path.exists() {
                read_config(&path)
            } else {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(PillboxConfig::default())
            }
        })
    }

    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_data_dir(self.cli, self.config()?)
    }

    /// Open the store in the resolved data directory.
    pub fn open_store(&self, ui: &UiContext) -> anyhow::Result<Store> {
        let dir = self.data_dir()?;
        let timezone = self.config()?.ui.timezone.clone();
        self.open_store_at(ui, &dir, timezone.as_deref())
    }

    /// Open the store in `dir` and bring it up to date.
    ///
    /// Loading reconciles pending reminders. If the process was not running
    /// at midnight, the missed daily reset is applied here.
    pub fn open_store_at(
        &self,
        ui: &UiContext,
        dir: &Path,
        timezone: Option<&str>,
    ) -> anyhow::Result<Store> {
        let (mut store, outcome) = ScheduleStore::open(
            JsonFileStore::new(dir),
            FileDispatcher::open(dir),
            resolve_clock(timezone)?,
        );
        debug!(dir = %dir.display(), scheduled = outcome.scheduled, "Opened schedule store");
        report_outcome(ui, &outcome);

        let today = store.now().date();
        if store.reset_due(today) {
            info!(%today, "Applying missed daily reset");
            let outcome = store.reset_daily();
            report_outcome(ui, &outcome);
        }
        Ok(store)
    }
}
