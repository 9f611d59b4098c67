//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::game::constants::DEFAULT_HISTORY_LEN;

/// Stake amounts are whole units; they're decorative and never settled.
pub type Stake = u32;

pub const DEFAULT_STAKES: [Stake; 4] = [10, 20, 50, 100];

/// How called numbers end up marked on the player's card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkPolicy {
    /// The player clicks each called number.
    Manual,
    /// Called numbers on the card are marked as they're drawn.
    Auto,
}

impl std::fmt::Display for MarkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkPolicy::Manual => write!(f, "manual"),
            MarkPolicy::Auto => write!(f, "auto"),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Stake amounts the player can pick from; the first is the default
    pub stakes: Vec<Stake>,

    /// Seconds on the seat selection countdown
    pub selection_secs: u32,

    /// Seconds on the game countdown
    pub game_secs: u32,

    /// Seconds between auto-calls
    pub call_interval_secs: u32,

    /// Seconds the round outcome stays up before going back to selection
    pub post_round_secs: u32,

    /// Chance that any given seat shows as taken
    pub taken_probability: f64,

    /// How many recent calls the history strip shows
    pub history_len: usize,

    pub mark_policy: MarkPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stakes: DEFAULT_STAKES.to_vec(),
            selection_secs: 30,
            game_secs: 30,
            call_interval_secs: 3,
            post_round_secs: 3,
            taken_probability: 0.3,
            history_len: DEFAULT_HISTORY_LEN,
            mark_policy: MarkPolicy::Manual,
        }
    }
}

impl SessionConfig {
    /// Load configuration from `CHEWATA_*` environment variables, falling
    /// back to defaults for anything unset or unparsable.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration doesn't validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let stakes = std::env::var("CHEWATA_STAKES")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect::<Vec<Stake>>()
            })
            .filter(|stakes| !stakes.is_empty())
            .unwrap_or(defaults.stakes);

        let mark_policy = std::env::var("CHEWATA_MARK_POLICY")
            .ok()
            .and_then(|v| match v.to_lowercase().as_str() {
                "manual" => Some(MarkPolicy::Manual),
                "auto" => Some(MarkPolicy::Auto),
                _ => None,
            })
            .unwrap_or(defaults.mark_policy);

        let config = Self {
            stakes,
            selection_secs: parse_env_or("CHEWATA_SELECTION_SECS", defaults.selection_secs),
            game_secs: parse_env_or("CHEWATA_GAME_SECS", defaults.game_secs),
            call_interval_secs: parse_env_or(
                "CHEWATA_CALL_INTERVAL_SECS",
                defaults.call_interval_secs,
            ),
            post_round_secs: parse_env_or("CHEWATA_POST_ROUND_SECS", defaults.post_round_secs),
            taken_probability: parse_env_or(
                "CHEWATA_TAKEN_PROBABILITY",
                defaults.taken_probability,
            ),
            history_len: parse_env_or("CHEWATA_HISTORY_LEN", defaults.history_len),
            mark_policy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stakes.is_empty() {
            return Err(ConfigError::Invalid {
                field: "stakes".to_string(),
                reason: "Must offer at least one stake".to_string(),
            });
        }

        if self.stakes.contains(&0) {
            return Err(ConfigError::Invalid {
                field: "stakes".to_string(),
                reason: "Stakes must be greater than 0".to_string(),
            });
        }

        for (field, secs) in [
            ("selection_secs", self.selection_secs),
            ("game_secs", self.game_secs),
            ("call_interval_secs", self.call_interval_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    reason: "Must be at least 1 second".to_string(),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.taken_probability) {
            return Err(ConfigError::Invalid {
                field: "taken_probability".to_string(),
                reason: format!("Must be within [0, 1], got {}", self.taken_probability),
            });
        }

        Ok(())
    }

    /// The stake a fresh session starts with.
    #[must_use]
    pub fn default_stake(&self) -> Stake {
        self.stakes.first().copied().unwrap_or(DEFAULT_STAKES[0])
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_env(key: &str, value: &str) {
        // SAFETY: env tests run under #[serial]
        unsafe { std::env::set_var(key, value) };
    }

    fn clear_env(key: &str) {
        // SAFETY: env tests run under #[serial]
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_stake(), 10);
        assert_eq!(config.mark_policy, MarkPolicy::Manual);
    }

    #[test]
    fn test_validation_empty_stakes() {
        let config = SessionConfig {
            stakes: Vec::new(),
            ..SessionConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stakes"));
    }

    #[test]
    fn test_validation_zero_game_secs() {
        let config = SessionConfig {
            game_secs: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "game_secs"
        ));
    }

    #[test]
    fn test_validation_probability_out_of_range() {
        let config = SessionConfig {
            taken_probability: 1.5,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_post_round_delay_is_allowed() {
        let config = SessionConfig {
            post_round_secs: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde() {
        let config = SessionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"mark_policy\":\"manual\""));
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        set_env("CHEWATA_STAKES", "5, 15,25");
        set_env("CHEWATA_MARK_POLICY", "AUTO");
        set_env("CHEWATA_GAME_SECS", "45");
        let config = SessionConfig::from_env().unwrap();
        clear_env("CHEWATA_STAKES");
        clear_env("CHEWATA_MARK_POLICY");
        clear_env("CHEWATA_GAME_SECS");

        assert_eq!(config.stakes, vec![5, 15, 25]);
        assert_eq!(config.default_stake(), 5);
        assert_eq!(config.mark_policy, MarkPolicy::Auto);
        assert_eq!(config.game_secs, 45);
        assert_eq!(config.selection_secs, 30);
    }

    #[test]
    #[serial]
    fn test_from_env_unparsable_values_use_defaults() {
        set_env("CHEWATA_STAKES", "abc");
        set_env("CHEWATA_MARK_POLICY", "sometimes");
        set_env("CHEWATA_SELECTION_SECS", "soon");
        let config = SessionConfig::from_env();
        clear_env("CHEWATA_STAKES");
        clear_env("CHEWATA_MARK_POLICY");
        clear_env("CHEWATA_SELECTION_SECS");

        let config = config.unwrap();
        assert_eq!(config.stakes, DEFAULT_STAKES.to_vec());
        assert_eq!(config.mark_policy, MarkPolicy::Manual);
        assert_eq!(config.selection_secs, 30);
    }
}
