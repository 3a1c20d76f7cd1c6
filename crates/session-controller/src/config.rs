//! Session controller configuration.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults; nothing here is required, so `Config::default()` is a valid
//! production configuration.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::errors::SessionError;

/// Default data-channel topic for chat messages.
pub const DEFAULT_CHAT_TOPIC: &str = "chat";

/// Default data-channel topic for recording status updates.
pub const DEFAULT_RECORDING_TOPIC: &str = "recording-status";

/// Default bounded timeout for a chat transmit, in milliseconds.
pub const DEFAULT_CHAT_SEND_TIMEOUT_MS: u64 = 10_000;

/// Default session actor mailbox depth.
pub const DEFAULT_MAILBOX_BUFFER: usize = 256;

/// Session controller configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data-channel topic used for chat messages (default: "chat").
    pub chat_topic: String,

    /// Data-channel topic carrying recording status (default:
    /// "recording-status").
    pub recording_topic: String,

    /// Bounded timeout applied to each chat transmit.
    pub chat_send_timeout: Duration,

    /// Session actor mailbox depth. Transport callbacks never block on it;
    /// events arriving while it is full are deferred, not dropped.
    pub mailbox_buffer: usize,

    /// Preferred audio input device id; the first enumerated device is used
    /// when unset or not found.
    pub preferred_audio_input: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chat_topic: DEFAULT_CHAT_TOPIC.to_string(),
            recording_topic: DEFAULT_RECORDING_TOPIC.to_string(),
            chat_send_timeout: Duration::from_millis(DEFAULT_CHAT_SEND_TIMEOUT_MS),
            mailbox_buffer: DEFAULT_MAILBOX_BUFFER,
            preferred_audio_input: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, SessionError> {
        let chat_topic = vars
            .get("SC_CHAT_TOPIC")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CHAT_TOPIC.to_string());

        let recording_topic = vars
            .get("SC_RECORDING_TOPIC")
            .cloned()
            .unwrap_or_else(|| DEFAULT_RECORDING_TOPIC.to_string());

        let chat_send_timeout_ms = match vars.get("SC_CHAT_SEND_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                SessionError::Config(format!("SC_CHAT_SEND_TIMEOUT_MS is not a number: {raw}"))
            })?,
            None => DEFAULT_CHAT_SEND_TIMEOUT_MS,
        };

        let mailbox_buffer = match vars.get("SC_MAILBOX_BUFFER") {
            Some(raw) => {
                let parsed = raw.parse::<usize>().map_err(|_| {
                    SessionError::Config(format!("SC_MAILBOX_BUFFER is not a number: {raw}"))
                })?;
                if parsed == 0 {
                    return Err(SessionError::Config(
                        "SC_MAILBOX_BUFFER must be at least 1".to_string(),
                    ));
                }
                parsed
            }
            None => DEFAULT_MAILBOX_BUFFER,
        };

        let preferred_audio_input = vars
            .get("SC_PREFERRED_AUDIO_INPUT")
            .filter(|v| !v.is_empty())
            .cloned();

        Ok(Config {
            chat_topic,
            recording_topic,
            chat_send_timeout: Duration::from_millis(chat_send_timeout_ms),
            mailbox_buffer,
            preferred_audio_input,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(&HashMap::new()).expect("defaults should load");

        assert_eq!(config.chat_topic, DEFAULT_CHAT_TOPIC);
        assert_eq!(config.recording_topic, DEFAULT_RECORDING_TOPIC);
        assert_eq!(
            config.chat_send_timeout,
            Duration::from_millis(DEFAULT_CHAT_SEND_TIMEOUT_MS)
        );
        assert_eq!(config.mailbox_buffer, DEFAULT_MAILBOX_BUFFER);
        assert!(config.preferred_audio_input.is_none());
    }

    #[test]
    fn test_from_vars_custom_values() {
        let vars = HashMap::from([
            ("SC_CHAT_TOPIC".to_string(), "room-chat".to_string()),
            ("SC_RECORDING_TOPIC".to_string(), "rec".to_string()),
            ("SC_CHAT_SEND_TIMEOUT_MS".to_string(), "2500".to_string()),
            ("SC_MAILBOX_BUFFER".to_string(), "64".to_string()),
            (
                "SC_PREFERRED_AUDIO_INPUT".to_string(),
                "headset-1".to_string(),
            ),
        ]);

        let config = Config::from_vars(&vars).expect("config should load");

        assert_eq!(config.chat_topic, "room-chat");
        assert_eq!(config.recording_topic, "rec");
        assert_eq!(config.chat_send_timeout, Duration::from_millis(2500));
        assert_eq!(config.mailbox_buffer, 64);
        assert_eq!(config.preferred_audio_input.as_deref(), Some("headset-1"));
    }

    #[test]
    fn test_from_vars_rejects_bad_timeout() {
        let vars = HashMap::from([(
            "SC_CHAT_SEND_TIMEOUT_MS".to_string(),
            "soon".to_string(),
        )]);
        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[test]
    fn test_from_vars_rejects_zero_mailbox() {
        let vars = HashMap::from([("SC_MAILBOX_BUFFER".to_string(), "0".to_string())]);
        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[test]
    fn test_empty_preferred_input_treated_as_unset() {
        let vars = HashMap::from([("SC_PREFERRED_AUDIO_INPUT".to_string(), String::new())]);
        let config = Config::from_vars(&vars).expect("config should load");
        assert!(config.preferred_audio_input.is_none());
    }
}
