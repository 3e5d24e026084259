use std::env;
use std::time::Duration;

use tracing::warn;

/// Overall request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Connection timeout used when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_TIMEOUT_SECS: &str = "FETCHR_HTTP_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "FETCHR_HTTP_CONNECT_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "FETCHR_USER_AGENT";

/// `fetchr/<crate version>`.
pub fn default_user_agent() -> String {
    format!("fetchr/{}", env!("CARGO_PKG_VERSION"))
}

/// Client settings for [`ReqwestTransport`](crate::ReqwestTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

impl TransportSettings {
    /// Defaults overridden by `FETCHR_HTTP_TIMEOUT_SECS`,
    /// `FETCHR_HTTP_CONNECT_TIMEOUT_SECS` and `FETCHR_USER_AGENT`.
    ///
    /// Unparsable or zero durations are logged and ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: duration_from_env(ENV_TIMEOUT_SECS).unwrap_or(defaults.timeout),
            connect_timeout: duration_from_env(ENV_CONNECT_TIMEOUT_SECS).unwrap_or(defaults.connect_timeout),
            user_agent: env::var(ENV_USER_AGENT)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.user_agent),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn duration_from_env(name: &str) -> Option<Duration> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Some(Duration::from_secs(seconds)),
        _ => {
            warn!(variable = name, value = %raw, "ignoring invalid duration");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = TransportSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert!(settings.user_agent.starts_with("fetchr/"));
    }

    #[test]
    fn reads_overrides_from_env() {
        temp_env::with_vars(
            [
                (ENV_TIMEOUT_SECS, Some("5")),
                (ENV_CONNECT_TIMEOUT_SECS, Some(" 2 ")),
                (ENV_USER_AGENT, Some("custom-agent/1.0")),
            ],
            || {
                let settings = TransportSettings::from_env();
                assert_eq!(settings.timeout, Duration::from_secs(5));
                assert_eq!(settings.connect_timeout, Duration::from_secs(2));
                assert_eq!(settings.user_agent, "custom-agent/1.0");
            },
        );
    }

    #[test]
    fn invalid_env_values_fall_back_to_defaults() {
        temp_env::with_vars(
            [
                (ENV_TIMEOUT_SECS, Some("soon")),
                (ENV_CONNECT_TIMEOUT_SECS, Some("0")),
                (ENV_USER_AGENT, Some("   ")),
            ],
            || {
                assert_eq!(TransportSettings::from_env(), TransportSettings::default());
            },
        );
    }
}
