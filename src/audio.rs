use serde::Serialize;

use crate::error::PlanError;
use crate::schema::{AssetRef, MusicAsset, VoiceClip};
use crate::timing::{MusicPlan, SectionRole, TimingTable};

/// One time-bounded audio placement. `gain_db` is relative to unity;
/// `loop_count` > 1 means the renderer concatenates that many plays and
/// trims the result to `duration_seconds`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioEvent {
    pub asset: AssetRef,
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub gain_db: f64,
    pub fade_in_seconds: f64,
    pub fade_out_seconds: f64,
    pub loop_count: u32,
}

impl AudioEvent {
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// The narration mix for one segment. Event start times are relative to
/// the segment until the assembler shifts them into the global timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTrack {
    pub events: Vec<AudioEvent>,
    pub duration_seconds: f64,
}

impl AudioTrack {
    pub fn silent(duration_seconds: f64) -> Self {
        Self {
            events: Vec::new(),
            duration_seconds,
        }
    }
}

fn voice_event(clip: &VoiceClip, start_seconds: f64) -> AudioEvent {
    AudioEvent {
        asset: clip.asset.clone(),
        start_seconds,
        duration_seconds: clip.duration_seconds,
        gain_db: 0.0,
        fade_in_seconds: 0.0,
        fade_out_seconds: 0.0,
        loop_count: 1,
    }
}

/// Place the narration clips at their planned offsets: source, target,
/// then the source again in the repeat section. The repeat reuses the
/// already-synthesized source asset. Narration in different languages
/// must never overlap; the section layout guarantees it and this mixer
/// re-checks before returning.
pub fn mix_segment_audio(
    timing: &TimingTable,
    source_clip: &VoiceClip,
    target_clip: &VoiceClip,
) -> Result<AudioTrack, PlanError> {
    for clip in [source_clip, target_clip] {
        if !clip.duration_seconds.is_finite() || clip.duration_seconds <= 0.0 {
            return Err(PlanError::invalid_input(format!(
                "voice clip '{}' has non-positive duration {}",
                clip.asset.path.display(),
                clip.duration_seconds
            )));
        }
    }

    let events = vec![
        voice_event(
            source_clip,
            timing.section(SectionRole::Source).audio_start_seconds,
        ),
        voice_event(
            target_clip,
            timing.section(SectionRole::Target).audio_start_seconds,
        ),
        voice_event(
            source_clip,
            timing.section(SectionRole::SourceRepeat).audio_start_seconds,
        ),
    ];

    for pair in events.windows(2) {
        if pair[1].start_seconds < pair[0].end_seconds() {
            return Err(PlanError::invalid_input(format!(
                "narration events overlap: one ends at {:.3}s, next starts at {:.3}s",
                pair[0].end_seconds(),
                pair[1].start_seconds
            )));
        }
    }

    Ok(AudioTrack {
        events,
        duration_seconds: timing.total_seconds,
    })
}

/// Convert a unity-relative volume level into a gain. 1.0 keeps unity;
/// lower levels attenuate by `20 * (1 - level)` dB so music sits under
/// the narration.
pub fn volume_level_to_gain_db(volume_level: f64) -> f64 {
    -20.0 * (1.0 - volume_level)
}

/// Realize a music plan as a single event spanning `target_seconds`:
/// looped, trimmed, faded at both ends, and attenuated. Fades shrink to
/// half the target when they would otherwise overlap.
pub fn mix_background_music(
    music: &MusicAsset,
    plan: &MusicPlan,
    target_seconds: f64,
    volume_level: f64,
    fade_seconds: f64,
) -> Result<AudioEvent, PlanError> {
    if !music.duration_seconds.is_finite() || music.duration_seconds <= 0.0 {
        return Err(PlanError::asset_unavailable(format!(
            "music asset '{}' has non-positive duration {}",
            music.asset.path.display(),
            music.duration_seconds
        )));
    }
    if plan.pre_trim_seconds(music.duration_seconds) + 1e-9 < target_seconds {
        return Err(PlanError::invalid_input(format!(
            "music plan under-runs the timeline: {} loops of {}s cover {:.3}s < {:.3}s",
            plan.loop_count,
            music.duration_seconds,
            plan.pre_trim_seconds(music.duration_seconds),
            target_seconds
        )));
    }

    let fade = if 2.0 * fade_seconds > target_seconds {
        target_seconds / 2.0
    } else {
        fade_seconds
    };

    Ok(AudioEvent {
        asset: music.asset.clone(),
        start_seconds: 0.0,
        duration_seconds: target_seconds,
        gain_db: volume_level_to_gain_db(volume_level),
        fade_in_seconds: fade,
        fade_out_seconds: fade,
        loop_count: plan.loop_count,
    })
}
