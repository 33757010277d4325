//! Runtime configuration loaded from the environment.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use teloxide::types::UserId;

/// Fixed reply sent to anyone who is not the configured operator.
pub const ACCESS_DENIED: &str = "⛔ Access denied";

/// Everything the bot needs to run, read once at startup.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub bot_token: String,
    pub authorized_user: UserId,
    pub repo_path: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?;
        let authorized_user = env::var("AUTHORIZED_USER_ID")
            .context("AUTHORIZED_USER_ID must be set")?
            .parse::<u64>()
            .context("AUTHORIZED_USER_ID must be a numeric Telegram user id")?;
        let repo_path = env::var("SITE_REPO_PATH").context("SITE_REPO_PATH must be set")?;
        Ok(Self {
            bot_token,
            authorized_user: UserId(authorized_user),
            repo_path: PathBuf::from(repo_path),
        })
    }

    /// The single-operator gate. Only the configured user id may drive the
    /// bot; everyone else gets [`ACCESS_DENIED`] and no session state.
    pub fn is_authorized(&self, user: UserId) -> bool {
        user == self.authorized_user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BotConfig {
        BotConfig {
            bot_token: "token".to_string(),
            authorized_user: UserId(4242),
            repo_path: PathBuf::from("/tmp/site"),
        }
    }

    #[test]
    fn test_only_the_operator_is_authorized() {
        let config = config();
        assert!(config.is_authorized(UserId(4242)));
        assert!(!config.is_authorized(UserId(4243)));
        assert!(!config.is_authorized(UserId(0)));
    }

    #[test]
    fn test_denial_message_is_fixed() {
        assert_eq!(ACCESS_DENIED, "⛔ Access denied");
    }
}
