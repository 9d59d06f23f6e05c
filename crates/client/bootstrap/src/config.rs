//! Client runtime configuration structures and loaders.
use std::env;

use tokio::time::Duration;

use client_frontend_core::ReplayTiming;

/// Configuration required to bootstrap a battle session and UI.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Battle level requested when starting a fresh battle.
    pub battle_level: u32,
    /// Per-event replay cadence in milliseconds.
    pub replay_cadence_ms: u64,
    /// Floating text lifetime in milliseconds.
    pub float_lifetime_ms: u64,
    /// Post-replay buffer for ledger state propagation, in milliseconds.
    pub sync_buffer_ms: u64,
    /// Pause before leaving the battle screen after victory/defeat.
    pub redirect_delay_ms: u64,
    /// Message log capacity.
    pub message_capacity: usize,
    /// Session event channel depth.
    pub event_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let timing = ReplayTiming::default();
        Self {
            battle_level: 1,
            replay_cadence_ms: timing.cadence.as_millis() as u64,
            float_lifetime_ms: timing.float_lifetime.as_millis() as u64,
            sync_buffer_ms: timing.sync_buffer.as_millis() as u64,
            redirect_delay_ms: timing.redirect_delay.as_millis() as u64,
            message_capacity: 64,
            event_buffer: 16,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_LEVEL` - Level for freshly started battles (default: 1)
    /// - `REPLAY_CADENCE_MS` - Per-event playback delay (default: 1000)
    /// - `REPLAY_FLOAT_LIFETIME_MS` - Floating text lifetime (default: 1500)
    /// - `REPLAY_SYNC_BUFFER_MS` - Ledger propagation buffer (default: 1000)
    /// - `REPLAY_REDIRECT_DELAY_MS` - End-of-battle redirect pause (default: 2000)
    /// - `CLI_MESSAGE_CAPACITY` - Message log capacity (default: 64)
    /// - `CLI_EVENT_BUFFER` - Session event queue size (default: 16)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(level) = read_env::<u32>("BATTLE_LEVEL") {
            config.battle_level = level.max(1);
        }
        if let Some(cadence) = read_env::<u64>("REPLAY_CADENCE_MS") {
            config.replay_cadence_ms = cadence.max(1);
        }
        if let Some(lifetime) = read_env::<u64>("REPLAY_FLOAT_LIFETIME_MS") {
            config.float_lifetime_ms = lifetime;
        }
        if let Some(buffer) = read_env::<u64>("REPLAY_SYNC_BUFFER_MS") {
            config.sync_buffer_ms = buffer;
        }
        if let Some(delay) = read_env::<u64>("REPLAY_REDIRECT_DELAY_MS") {
            config.redirect_delay_ms = delay;
        }
        if let Some(capacity) = read_env::<usize>("CLI_MESSAGE_CAPACITY") {
            config.message_capacity = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("CLI_EVENT_BUFFER") {
            config.event_buffer = capacity.max(1);
        }

        config
    }

    /// Replay timing with this configuration's overrides applied.
    ///
    /// The sprite mood revert stays at its built-in value; it is an aesthetic
    /// constant, not an operational one.
    pub fn replay_timing(&self) -> ReplayTiming {
        ReplayTiming {
            cadence: Duration::from_millis(self.replay_cadence_ms),
            float_lifetime: Duration::from_millis(self.float_lifetime_ms),
            sync_buffer: Duration::from_millis(self.sync_buffer_ms),
            redirect_delay: Duration::from_millis(self.redirect_delay_ms),
            ..ReplayTiming::default()
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_replay_timing() {
        let config = ClientConfig::default();
        let timing = config.replay_timing();
        assert_eq!(timing.cadence, Duration::from_millis(1000));
        assert_eq!(timing.float_lifetime, Duration::from_millis(1500));
        assert_eq!(timing.sync_buffer, Duration::from_millis(1000));
        assert_eq!(timing.redirect_delay, Duration::from_millis(2000));
    }
}
