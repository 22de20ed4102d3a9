use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use schedule_core::accounts::AccountBook;
use schedule_core::change::Change;
use schedule_core::config::ScheduleConfig;
use schedule_core::session::Session;
use schedule_core::storage::{FileStorage, Storage};
use tracing::debug;

/// Everything a command needs: settings, the backing store and today's date.
pub struct Context {
    pub config: ScheduleConfig,
    pub storage: Rc<dyn Storage>,
    pub today: NaiveDate,
}

impl Context {
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = ScheduleConfig::load()?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }

        let storage = FileStorage::new(config.data_path());
        debug!(dir = %storage.dir().display(), "Using data directory");

        Ok(Context {
            config,
            storage: Rc::new(storage),
            today: Local::now().date_naive(),
        })
    }

    pub fn accounts(&self) -> Result<AccountBook> {
        Ok(AccountBook::load(Rc::clone(&self.storage))?)
    }

    /// Open the signed-in user's session.
    pub fn session(&self) -> Result<Session> {
        let accounts = self.accounts()?;

        if accounts.current().is_none() {
            anyhow::bail!(
                "Not signed in.\n\n\
                Sign in with:\n  \
                schedule login\n\n\
                Or create an account with:\n  \
                schedule register"
            );
        }

        let mut session = Session::open(&accounts, Rc::clone(&self.storage), &self.config, self.today)?;
        session.subscribe(|change: &Change| debug!(?change, "Schedule changed"));
        Ok(session)
    }
}

/// Parse YYYY-MM-DD, defaulting to `today`.
pub fn parse_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match input {
        None => Ok(today),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s)),
    }
}

/// Print a line in the "success" style.
pub fn done(message: impl std::fmt::Display) {
    println!("{}", format!("  {}", message).green());
}
