//! Output settings carried across track changes
//!
//! Volume is linear (0.0-1.0), matching what media elements expect.
//! Mute preserves the volume level so unmuting restores it.

/// Slowest accepted playback rate
pub const MIN_PLAYBACK_RATE: f32 = 0.25;

/// Fastest accepted playback rate
pub const MAX_PLAYBACK_RATE: f32 = 4.0;

/// Volume, mute and rate owned by the player, not by any single item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputSettings {
    /// Volume level (0.0-1.0)
    volume: f32,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Playback speed multiplier
    rate: f32,
}

impl OutputSettings {
    /// Create new output settings
    ///
    /// Out-of-range values are clamped; non-finite values fall back to defaults.
    pub fn new(volume: f32, rate: f32) -> Self {
        let mut settings = Self::default();
        settings.set_volume(volume);
        settings.set_rate(rate);
        settings
    }

    /// Set volume level (clamped to 0.0-1.0)
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Get current volume level
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Mute or unmute
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Set playback rate (clamped to the supported range)
    pub fn set_rate(&mut self, rate: f32) {
        if rate.is_finite() {
            self.rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        }
    }

    /// Get playback rate
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Volume the output should actually use
    ///
    /// Returns 0.0 if muted, otherwise the volume level
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            rate: 1.0,
        }
    }
}
