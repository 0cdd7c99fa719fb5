use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level config (logbook.toml + LOGBOOK_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogbookConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token. Empty means unconfigured; startup aborts.
    #[serde(default)]
    pub bot_token: String,
    /// Prefix for text commands, e.g. `!clockin`.
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Channel where clock-in/out and status commands are accepted.
    #[serde(default = "default_logbook_channel")]
    pub logbook_channel_id: u64,
    /// Channel where reporting commands are accepted.
    #[serde(default = "default_reports_channel")]
    pub reports_channel_id: u64,
    /// Channel where role-management commands are accepted.
    #[serde(default = "default_admin_channel")]
    pub admin_channel_id: u64,
    /// Role granting full administrative access.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
    /// Role granting override access (but not admin-channel access).
    #[serde(default = "default_higherups_role")]
    pub higherups_role: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            command_prefix: default_prefix(),
            logbook_channel_id: default_logbook_channel(),
            reports_channel_id: default_reports_channel(),
            admin_channel_id: default_admin_channel(),
            admin_role: default_admin_role(),
            higherups_role: default_higherups_role(),
        }
    }
}

/// One scheduled reminder broadcast, fired daily at `time` (HH:MM, local).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub time: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// IANA timezone all schedule times and displayed clocks use.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Daily reminder broadcasts (sent to the logbook channel).
    #[serde(default = "default_reminders")]
    pub reminders: Vec<ReminderConfig>,
    /// Daily auto-clockout sweeps (HH:MM, local).
    #[serde(default = "default_sweeps")]
    pub sweeps: Vec<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            reminders: default_reminders(),
            sweeps: default_sweeps(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}
fn default_logbook_channel() -> u64 {
    1435553972202246286
}
fn default_reports_channel() -> u64 {
    1435554028145741834
}
fn default_admin_channel() -> u64 {
    1456045677862846638
}
fn default_admin_role() -> String {
    "admin".to_string()
}
fn default_higherups_role() -> String {
    "higherups".to_string()
}
fn default_timezone() -> String {
    "Asia/Manila".to_string()
}

fn default_reminders() -> Vec<ReminderConfig> {
    vec![
        ReminderConfig {
            time: "05:58".to_string(),
            message: "***\u{1f514} MORNING TSUNAMI IS COMING!***\nAutoclockout in **2 minutes**."
                .to_string(),
        },
        ReminderConfig {
            time: "17:58".to_string(),
            message: "***\u{1f514} EVENING TSUNAMI IS COMING!***\nAutoclockout in **2 minutes**."
                .to_string(),
        },
    ]
}

fn default_sweeps() -> Vec<String> {
    vec!["06:00".to_string(), "18:00".to_string()]
}

impl LogbookConfig {
    /// Load config from a TOML file with LOGBOOK_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./logbook.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("logbook.toml");

        let config: LogbookConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("LOGBOOK_").split("_"))
            .extract()
            .map_err(|e| crate::error::LogbookError::Config(e.to_string()))?;

        Ok(config)
    }

    /// The one fatal startup check: a bot token must be present.
    pub fn require_token(&self) -> crate::error::Result<()> {
        if self.discord.bot_token.trim().is_empty() {
            return Err(crate::error::LogbookError::NoToken);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let config = LogbookConfig::default();
        assert_eq!(config.discord.command_prefix, "!");
        assert_eq!(config.discord.admin_role, "admin");
        assert_eq!(config.discord.higherups_role, "higherups");
        assert_eq!(config.schedule.timezone, "Asia/Manila");
        assert_eq!(config.schedule.reminders.len(), 2);
        assert_eq!(config.schedule.sweeps, vec!["06:00", "18:00"]);
    }

    #[test]
    fn empty_token_is_rejected() {
        let config = LogbookConfig::default();
        assert!(config.require_token().is_err());

        let mut config = LogbookConfig::default();
        config.discord.bot_token = "abc123".to_string();
        assert!(config.require_token().is_ok());
    }
}
