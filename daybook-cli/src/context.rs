//! Client configuration plus the logged-in session built from it.

use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDate};
use daybook_core::config::ClientConfig;
use daybook_core::{Session, User};

use crate::client::HttpTransport;

pub const PASSWORD_ENV: &str = "DAYBOOK_PASSWORD";
pub const NEW_PASSWORD_ENV: &str = "DAYBOOK_NEW_PASSWORD";

pub struct Context {
    pub config: ClientConfig,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = ClientConfig::load().context("Failed to load client config")?;
        Ok(Context { config })
    }

    pub fn save(&self) -> Result<()> {
        self.config.save().context("Failed to save client config")
    }

    pub fn transport(&self) -> Result<HttpTransport> {
        HttpTransport::new(&self.config.server_url)
    }

    pub fn shown_date(&self) -> NaiveDate {
        self.config.shown_date_or(Local::now().date_naive())
    }

    /// Log the configured user back in for this command.
    pub fn session(&self) -> Result<Session<HttpTransport>> {
        let name = self.config.user.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Not logged in.\n\n\
                Log in with:\n  \
                daybook login <name>"
            )
        })?;

        let user = User::new(name, password(&format!("  Password for {name}"))?);
        Session::login(self.transport()?, user)?.ok_or_else(|| {
            anyhow::anyhow!("Invalid credentials for {name}. Log in again with: daybook login {name}")
        })
    }
}

/// The password from the environment, or a hidden prompt.
pub fn password(prompt: &str) -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    rpassword::prompt_password(format!("{prompt}: ")).context("Failed to read password")
}

/// A password being set: from `env`, or asked for twice.
pub fn new_password(env: &str) -> Result<String> {
    if let Ok(password) = std::env::var(env) {
        return Ok(password);
    }

    loop {
        let first = rpassword::prompt_password("  New password: ")?;
        let second = rpassword::prompt_password("  Repeat password: ")?;
        if first == second {
            return Ok(first);
        }
        eprintln!("  Passwords do not match, try again");
    }
}
