use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Planner tuning knobs. Every job manifest may override any subset;
/// the defaults reproduce the house pacing for study videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Silence between a text board appearing and its narration starting.
    pub audio_lead_gap_seconds: f64,
    /// Hold after each narration clip ends.
    pub pause_after_audio_seconds: f64,
    /// Silence before the source narration replays in the repeat phase.
    pub pause_before_repeat_seconds: f64,
    /// A section never runs shorter than this, whatever the clip length.
    pub sentence_display_floor_seconds: f64,
    pub typing_speed_min_seconds: f64,
    pub typing_speed_max_seconds: f64,
    /// Used when a text has no characters to pace against.
    pub default_typing_speed_seconds: f64,
    /// Music level relative to unity, 0.0 (silent) to 1.0 (full).
    pub music_volume_level: f64,
    pub music_fade_seconds: f64,
    /// Duration of each of the intro and outro blocks.
    pub bookend_seconds: f64,
    /// Floating shapes per bookend.
    pub decoration_count: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            frame_width: 1920,
            frame_height: 1080,
            audio_lead_gap_seconds: 0.3,
            pause_after_audio_seconds: 2.0,
            pause_before_repeat_seconds: 1.0,
            sentence_display_floor_seconds: 1.0,
            typing_speed_min_seconds: 0.02,
            typing_speed_max_seconds: 0.08,
            default_typing_speed_seconds: 0.05,
            music_volume_level: 0.1,
            music_fade_seconds: 2.0,
            bookend_seconds: 4.0,
            decoration_count: 6,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            bail!(
                "frame dimensions must be non-zero, got {}x{}",
                self.frame_width,
                self.frame_height
            );
        }
        for (name, value) in [
            ("audio_lead_gap_seconds", self.audio_lead_gap_seconds),
            ("pause_after_audio_seconds", self.pause_after_audio_seconds),
            (
                "pause_before_repeat_seconds",
                self.pause_before_repeat_seconds,
            ),
            ("music_fade_seconds", self.music_fade_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be finite and >= 0, got {value}");
            }
        }
        for (name, value) in [
            (
                "sentence_display_floor_seconds",
                self.sentence_display_floor_seconds,
            ),
            ("typing_speed_min_seconds", self.typing_speed_min_seconds),
            ("typing_speed_max_seconds", self.typing_speed_max_seconds),
            (
                "default_typing_speed_seconds",
                self.default_typing_speed_seconds,
            ),
            ("bookend_seconds", self.bookend_seconds),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{name} must be finite and > 0, got {value}");
            }
        }
        if self.typing_speed_min_seconds > self.typing_speed_max_seconds {
            bail!(
                "typing speed band is inverted: min {} > max {}",
                self.typing_speed_min_seconds,
                self.typing_speed_max_seconds
            );
        }
        if !self.music_volume_level.is_finite()
            || !(0.0..=1.0).contains(&self.music_volume_level)
        {
            bail!(
                "music_volume_level must be within 0.0..=1.0, got {}",
                self.music_volume_level
            );
        }
        Ok(())
    }
}
