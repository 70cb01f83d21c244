//! Configuration Module
//!
//! Handles loading housekeeping intervals and thresholds from environment variables.

use std::env;

use chrono::TimeDelta;

/// Minimum keep-alive period of the game client, in seconds.
pub const CLIENT_MIN_PING_INTERVAL: u64 = 300;

/// Housekeeping configuration parameters.
///
/// All durations are in seconds and can be configured via environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval between subscription-expiry sweeps
    pub subscription_sweep_interval: u64,
    /// Silence after which a connected session counts as a ghost
    pub keepalive_threshold: u64,
    /// Interval between ghost eviction sweeps
    pub ghost_sweep_interval: u64,
    /// Interval between status cache invalidations
    pub status_refresh_interval: u64,
    /// Interval between tournament match checks
    pub match_sweep_interval: u64,
    /// How long an empty tournament match survives
    pub match_grace_period: u64,
    /// Channel that receives match disposal broadcasts
    pub lobby_channel: String,
    /// Admin HTTP server port
    pub admin_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SUBSCRIPTION_SWEEP_INTERVAL` - default: 1800
    /// - `KEEPALIVE_THRESHOLD` - default: 300
    /// - `GHOST_SWEEP_INTERVAL` - default: keep-alive threshold / 3
    /// - `STATUS_REFRESH_INTERVAL` - default: 300
    /// - `MATCH_SWEEP_INTERVAL` - default: 300
    /// - `MATCH_GRACE_PERIOD` - default: 3600
    /// - `LOBBY_CHANNEL` - default: "#lobby"
    /// - `ADMIN_PORT` - default: 3000
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let keepalive_threshold = parse_var("KEEPALIVE_THRESHOLD", defaults.keepalive_threshold);

        Self {
            subscription_sweep_interval: parse_var(
                "SUBSCRIPTION_SWEEP_INTERVAL",
                defaults.subscription_sweep_interval,
            ),
            keepalive_threshold,
            ghost_sweep_interval: parse_var("GHOST_SWEEP_INTERVAL", keepalive_threshold / 3),
            status_refresh_interval: parse_var(
                "STATUS_REFRESH_INTERVAL",
                defaults.status_refresh_interval,
            ),
            match_sweep_interval: parse_var("MATCH_SWEEP_INTERVAL", defaults.match_sweep_interval),
            match_grace_period: parse_var("MATCH_GRACE_PERIOD", defaults.match_grace_period),
            lobby_channel: env::var("LOBBY_CHANNEL").unwrap_or(defaults.lobby_channel),
            admin_port: parse_var("ADMIN_PORT", defaults.admin_port),
        }
    }

    pub fn keepalive(&self) -> TimeDelta {
        seconds_saturating(self.keepalive_threshold)
    }

    pub fn match_grace(&self) -> TimeDelta {
        seconds_saturating(self.match_grace_period)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subscription_sweep_interval: 30 * 60,
            keepalive_threshold: CLIENT_MIN_PING_INTERVAL,
            ghost_sweep_interval: CLIENT_MIN_PING_INTERVAL / 3,
            status_refresh_interval: 5 * 60,
            match_sweep_interval: 5 * 60,
            match_grace_period: 60 * 60,
            lobby_channel: "#lobby".to_string(),
            admin_port: 3000,
        }
    }
}

/// Converts whole seconds, clamping values chrono cannot represent.
fn seconds_saturating(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
