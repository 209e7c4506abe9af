use serde::Serialize;

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::schema::VoiceClip;

/// The three sub-phases of a sentence segment, in playback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionRole {
    Source,
    Target,
    SourceRepeat,
}

/// Timing for one section: when the text board appears, when its
/// narration starts, and how long the whole section runs. Text and
/// audio deliberately overlap within a section; sections themselves
/// never overlap. All offsets are relative to the sentence start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionTiming {
    pub role: SectionRole,
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub text_start_seconds: f64,
    pub text_duration_seconds: f64,
    pub audio_start_seconds: f64,
    pub audio_duration_seconds: f64,
    /// Reveal speed for the typed text variant, seconds per character.
    pub typing_seconds_per_char: f64,
}

impl SectionTiming {
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// One sentence's timing table, produced by [`plan_sentence_timing`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingTable {
    pub sections: Vec<SectionTiming>,
    pub total_seconds: f64,
}

impl TimingTable {
    pub fn section(&self, role: SectionRole) -> &SectionTiming {
        self.sections
            .iter()
            .find(|section| section.role == role)
            .expect("timing table always holds all three sections")
    }
}

/// Derive the per-character typing speed for a text, clamped into the
/// configured band so the reveal neither finishes instantly nor outlasts
/// the narration.
fn typing_speed(config: &PlannerConfig, text: &str, audio_duration: f64) -> f64 {
    let char_count = text.chars().count();
    if char_count == 0 {
        return config.default_typing_speed_seconds;
    }

    let raw = (audio_duration - config.audio_lead_gap_seconds) / char_count as f64;
    raw.clamp(
        config.typing_speed_min_seconds,
        config.typing_speed_max_seconds,
    )
}

/// Compute the timing table for one sentence: source section, target
/// section, then a repeat of the source narration. Fails when either
/// clip reports a non-positive measured duration.
pub fn plan_sentence_timing(
    config: &PlannerConfig,
    source_clip: &VoiceClip,
    target_clip: &VoiceClip,
    source_text: &str,
    target_text: &str,
) -> Result<TimingTable, PlanError> {
    for clip in [source_clip, target_clip] {
        if !clip.duration_seconds.is_finite() || clip.duration_seconds <= 0.0 {
            return Err(PlanError::invalid_input(format!(
                "voice clip '{}' has non-positive duration {}",
                clip.asset.path.display(),
                clip.duration_seconds
            )));
        }
    }

    let lead = config.audio_lead_gap_seconds;
    let pause = config.pause_after_audio_seconds;
    let floor = config.sentence_display_floor_seconds;

    let source_speed = typing_speed(config, source_text, source_clip.duration_seconds);
    let target_speed = typing_speed(config, target_text, target_clip.duration_seconds);

    // Source: text at t=0, narration after a short lead gap.
    let source_duration = (lead + source_clip.duration_seconds + pause).max(floor);
    let source = SectionTiming {
        role: SectionRole::Source,
        start_seconds: 0.0,
        duration_seconds: source_duration,
        text_start_seconds: 0.0,
        text_duration_seconds: source_duration,
        audio_start_seconds: lead,
        audio_duration_seconds: source_clip.duration_seconds,
        typing_seconds_per_char: source_speed,
    };

    // Target mirrors the source pattern, starting where it ended.
    let target_start = source.end_seconds();
    let target_duration = (lead + target_clip.duration_seconds + pause).max(floor);
    let target = SectionTiming {
        role: SectionRole::Target,
        start_seconds: target_start,
        duration_seconds: target_duration,
        text_start_seconds: target_start,
        text_duration_seconds: target_duration,
        audio_start_seconds: target_start + lead,
        audio_duration_seconds: target_clip.duration_seconds,
        typing_seconds_per_char: target_speed,
    };

    // Repeat: the source narration plays again after a longer pause.
    // The board is already familiar, so no typing reveal here.
    let repeat_start = target.end_seconds();
    let repeat_duration =
        (config.pause_before_repeat_seconds + source_clip.duration_seconds + pause).max(floor);
    let repeat = SectionTiming {
        role: SectionRole::SourceRepeat,
        start_seconds: repeat_start,
        duration_seconds: repeat_duration,
        text_start_seconds: repeat_start,
        text_duration_seconds: repeat_duration,
        audio_start_seconds: repeat_start + config.pause_before_repeat_seconds,
        audio_duration_seconds: source_clip.duration_seconds,
        typing_seconds_per_char: source_speed,
    };

    let total_seconds = source.duration_seconds + target.duration_seconds + repeat.duration_seconds;
    Ok(TimingTable {
        sections: vec![source, target, repeat],
        total_seconds,
    })
}

/// Looping/trimming plan for laying music under a timeline. `loop_count`
/// is the total number of plays; the concatenation is trimmed to exactly
/// `trim_to_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MusicPlan {
    pub loop_count: u32,
    pub trim_to_seconds: f64,
}

impl MusicPlan {
    /// Realized duration before the trim is applied.
    pub fn pre_trim_seconds(&self, asset_duration: f64) -> f64 {
        self.loop_count as f64 * asset_duration
    }
}

/// Plan how many times a music asset must play to cover
/// `target_total_seconds`, never under-running before the trim.
pub fn plan_music_timing(
    music_asset_seconds: f64,
    target_total_seconds: f64,
) -> Result<MusicPlan, PlanError> {
    if !music_asset_seconds.is_finite() || music_asset_seconds <= 0.0 {
        return Err(PlanError::asset_unavailable(format!(
            "music asset has non-positive duration {music_asset_seconds}"
        )));
    }
    if !target_total_seconds.is_finite() || target_total_seconds < 0.0 {
        return Err(PlanError::invalid_input(format!(
            "music target duration must be >= 0, got {target_total_seconds}"
        )));
    }

    let loop_count = if music_asset_seconds >= target_total_seconds {
        1
    } else {
        (target_total_seconds / music_asset_seconds).ceil() as u32
    };

    Ok(MusicPlan {
        loop_count,
        trim_to_seconds: target_total_seconds,
    })
}
