use serde::Serialize;

use crate::audio::{mix_background_music, mix_segment_audio, AudioEvent, AudioTrack};
use crate::compositor::{build_bookend_layers, build_segment_layers, BookendKind, VisualLayer};
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::schema::{AssetRef, MusicAsset, SentenceClips, SentencePair};
use crate::timing::{plan_music_timing, plan_sentence_timing};

const DURATION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentKind {
    Intro,
    Sentence { index: usize },
    Outro,
}

/// One contiguous block of the timeline. Layer and audio-event start
/// times are global (already shifted by the segment's offset).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    #[serde(flatten)]
    pub kind: SegmentKind,
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub layers: Vec<VisualLayer>,
    pub audio: AudioTrack,
}

/// The finished render plan: intro, one segment per sentence, outro,
/// plus an optional music bed spanning the whole run. Built once per
/// pipeline run and handed to the renderer; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub frame_width: u32,
    pub frame_height: u32,
    pub total_seconds: f64,
    pub segments: Vec<Segment>,
    /// Laid beneath every narration event. Absent when music acquisition
    /// came up empty; narration-only timelines are still valid.
    pub music: Option<AudioEvent>,
}

impl Timeline {
    /// Structural invariants: contiguous segments, per-segment
    /// audio/visual parity, and a music bed that ends with the video.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut cursor = 0.0;
        for segment in &self.segments {
            if (segment.start_seconds - cursor).abs() > DURATION_TOLERANCE {
                return Err(PlanError::invalid_input(format!(
                    "segment expected to start at {cursor:.6}s, found {:.6}s",
                    segment.start_seconds
                )));
            }
            if (segment.audio.duration_seconds - segment.duration_seconds).abs()
                > DURATION_TOLERANCE
            {
                return Err(PlanError::invalid_input(format!(
                    "segment audio runs {:.6}s but video runs {:.6}s",
                    segment.audio.duration_seconds, segment.duration_seconds
                )));
            }
            cursor += segment.duration_seconds;
        }

        if (cursor - self.total_seconds).abs() > DURATION_TOLERANCE {
            return Err(PlanError::invalid_input(format!(
                "segments sum to {cursor:.6}s but total is {:.6}s",
                self.total_seconds
            )));
        }

        if let Some(music) = &self.music {
            if (music.duration_seconds - self.total_seconds).abs() > DURATION_TOLERANCE {
                return Err(PlanError::invalid_input(format!(
                    "music bed runs {:.6}s but timeline runs {:.6}s",
                    music.duration_seconds, self.total_seconds
                )));
            }
        }

        Ok(())
    }
}

/// Builds the global timeline from fully-resolved collaborator outputs.
/// Pure and deterministic: the same inputs, config, and seed always
/// produce a structurally identical timeline.
#[derive(Debug, Clone)]
pub struct TimelineAssembler {
    config: PlannerConfig,
    seed: u64,
}

impl TimelineAssembler {
    pub fn new(config: PlannerConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    pub fn assemble(
        &self,
        sentences: &[SentencePair],
        clips: &[SentenceClips],
        backgrounds: &[AssetRef],
        music: Option<&MusicAsset>,
        title: &str,
        subtitle: &str,
    ) -> Result<Timeline, PlanError> {
        if sentences.len() != clips.len() || sentences.len() != backgrounds.len() {
            return Err(PlanError::InputCardinality {
                sentences: sentences.len(),
                voice_clips: clips.len(),
                backgrounds: backgrounds.len(),
            });
        }

        let mut segments = Vec::with_capacity(sentences.len() + 2);
        let mut cursor = 0.0_f64;

        let intro = build_bookend_layers(&self.config, BookendKind::Intro, title, subtitle, self.seed);
        cursor = self.push_bookend(&mut segments, SegmentKind::Intro, intro, cursor);

        for ((sentence, sentence_clips), background) in
            sentences.iter().zip(clips).zip(backgrounds)
        {
            let timing = plan_sentence_timing(
                &self.config,
                &sentence_clips.source,
                &sentence_clips.target,
                &sentence.source_text,
                &sentence.target_text,
            )?;

            let mut layers = build_segment_layers(
                &self.config,
                &timing,
                background,
                sentence.index,
                &sentence.source_text,
                &sentence.target_text,
            )?;
            let mut audio =
                mix_segment_audio(&timing, &sentence_clips.source, &sentence_clips.target)?;

            shift_layers(&mut layers, cursor);
            shift_track(&mut audio, cursor);
            segments.push(Segment {
                kind: SegmentKind::Sentence {
                    index: sentence.index,
                },
                start_seconds: cursor,
                duration_seconds: timing.total_seconds,
                layers,
                audio,
            });
            cursor += timing.total_seconds;
        }

        let outro = build_bookend_layers(
            &self.config,
            BookendKind::Outro,
            "THANKS FOR WATCHING",
            "Subscribe for more!",
            self.seed,
        );
        cursor = self.push_bookend(&mut segments, SegmentKind::Outro, outro, cursor);

        let total_seconds = cursor;

        // Music is laid under the entire timeline, not per segment.
        // When acquisition produced nothing, degrade to narration only.
        let music = match music {
            Some(asset) => {
                let plan = plan_music_timing(asset.duration_seconds, total_seconds)?;
                Some(mix_background_music(
                    asset,
                    &plan,
                    total_seconds,
                    self.config.music_volume_level,
                    self.config.music_fade_seconds,
                )?)
            }
            None => {
                eprintln!("no background music supplied; timeline will be narration only");
                None
            }
        };

        let timeline = Timeline {
            frame_width: self.config.frame_width,
            frame_height: self.config.frame_height,
            total_seconds,
            segments,
            music,
        };
        timeline.validate()?;
        Ok(timeline)
    }

    fn push_bookend(
        &self,
        segments: &mut Vec<Segment>,
        kind: SegmentKind,
        mut layers: Vec<VisualLayer>,
        cursor: f64,
    ) -> f64 {
        let duration = self.config.bookend_seconds;
        shift_layers(&mut layers, cursor);
        segments.push(Segment {
            kind,
            start_seconds: cursor,
            duration_seconds: duration,
            layers,
            audio: AudioTrack::silent(duration),
        });
        cursor + duration
    }
}

fn shift_layers(layers: &mut [VisualLayer], by_seconds: f64) {
    for layer in layers {
        layer.start_seconds += by_seconds;
    }
}

fn shift_track(track: &mut AudioTrack, by_seconds: f64) {
    for event in &mut track.events {
        event.start_seconds += by_seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::{SegmentKind, TimelineAssembler};
    use crate::config::PlannerConfig;
    use crate::error::PlanError;
    use crate::schema::{AssetRef, Language, MusicAsset, SentenceClips, SentencePair, VoiceClip};

    const TOLERANCE: f64 = 1e-6;

    fn sentence(index: usize) -> SentencePair {
        SentencePair {
            source_text: format!("Sentence number {index}"),
            target_text: format!("문장 {index}"),
            index,
        }
    }

    fn clips(index: usize, source_seconds: f64, target_seconds: f64) -> SentenceClips {
        SentenceClips {
            source: VoiceClip {
                language: Language::Source,
                asset: AssetRef::new(format!("audio/s{index}_en.wav")),
                duration_seconds: source_seconds,
            },
            target: VoiceClip {
                language: Language::Target,
                asset: AssetRef::new(format!("audio/s{index}_ko.wav")),
                duration_seconds: target_seconds,
            },
        }
    }

    fn background(index: usize) -> AssetRef {
        AssetRef::new(format!("images/bg{index}.jpg"))
    }

    #[test]
    fn segments_are_contiguous_and_totals_reconcile() {
        let assembler = TimelineAssembler::new(PlannerConfig::default(), 0);
        let sentences = [sentence(0), sentence(1)];
        let all_clips = [clips(0, 2.0, 2.5), clips(1, 1.2, 1.7)];
        let backgrounds = [background(0), background(1)];
        let music = MusicAsset {
            asset: AssetRef::new("music/calm.mp3"),
            duration_seconds: 7.0,
        };

        let timeline = assembler
            .assemble(
                &sentences,
                &all_clips,
                &backgrounds,
                Some(&music),
                "DAILY ENGLISH",
                "Learn with Us",
            )
            .expect("assemble should succeed");

        timeline.validate().expect("timeline should validate");
        assert_eq!(timeline.segments.len(), 4);
        assert_eq!(timeline.segments[0].kind, SegmentKind::Intro);
        assert_eq!(
            timeline.segments[3].kind,
            SegmentKind::Outro
        );

        let sum: f64 = timeline
            .segments
            .iter()
            .map(|segment| segment.duration_seconds)
            .sum();
        assert!((sum - timeline.total_seconds).abs() < TOLERANCE);

        let music_event = timeline.music.as_ref().expect("music should be present");
        assert!((music_event.duration_seconds - timeline.total_seconds).abs() < TOLERANCE);
    }

    #[test]
    fn sentence_layers_are_shifted_by_cumulative_offset() {
        let config = PlannerConfig::default();
        let assembler = TimelineAssembler::new(config.clone(), 0);
        let timeline = assembler
            .assemble(
                &[sentence(0)],
                &[clips(0, 2.0, 2.5)],
                &[background(0)],
                None,
                "t",
                "s",
            )
            .expect("assemble should succeed");

        let segment = &timeline.segments[1];
        assert!((segment.start_seconds - config.bookend_seconds).abs() < TOLERANCE);
        for layer in &segment.layers {
            assert!(layer.start_seconds + TOLERANCE >= segment.start_seconds);
        }
        for event in &segment.audio.events {
            assert!(event.start_seconds + TOLERANCE >= segment.start_seconds);
        }
    }

    #[test]
    fn empty_sentence_list_yields_bookends_only() {
        let assembler = TimelineAssembler::new(PlannerConfig::default(), 0);
        let timeline = assembler
            .assemble(&[], &[], &[], None, "t", "s")
            .expect("assemble should succeed");

        assert_eq!(timeline.segments.len(), 2);
        assert!(timeline.music.is_none());
        timeline.validate().expect("timeline should validate");
    }

    #[test]
    fn mismatched_cardinalities_fail_before_any_planning() {
        let assembler = TimelineAssembler::new(PlannerConfig::default(), 0);
        let sentences = [sentence(0), sentence(1), sentence(2)];
        let all_clips = [clips(0, 1.0, 1.0), clips(1, 1.0, 1.0)];
        let backgrounds = [background(0), background(1), background(2)];

        let error = assembler
            .assemble(&sentences, &all_clips, &backgrounds, None, "t", "s")
            .unwrap_err();
        assert_eq!(
            error,
            PlanError::InputCardinality {
                sentences: 3,
                voice_clips: 2,
                backgrounds: 3,
            }
        );
    }

    #[test]
    fn assembly_is_a_pure_function_of_its_inputs() {
        let config = PlannerConfig::default();
        let sentences = [sentence(0), sentence(1)];
        let all_clips = [clips(0, 2.0, 2.5), clips(1, 0.8, 1.1)];
        let backgrounds = [background(0), background(1)];
        let music = MusicAsset {
            asset: AssetRef::new("music/calm.mp3"),
            duration_seconds: 11.0,
        };

        let first = TimelineAssembler::new(config.clone(), 42)
            .assemble(
                &sentences,
                &all_clips,
                &backgrounds,
                Some(&music),
                "t",
                "s",
            )
            .expect("assemble should succeed");
        let second = TimelineAssembler::new(config, 42)
            .assemble(
                &sentences,
                &all_clips,
                &backgrounds,
                Some(&music),
                "t",
                "s",
            )
            .expect("assemble should succeed");

        assert_eq!(first, second);
    }

    #[test]
    fn broken_music_asset_aborts_assembly() {
        let assembler = TimelineAssembler::new(PlannerConfig::default(), 0);
        let music = MusicAsset {
            asset: AssetRef::new("music/calm.mp3"),
            duration_seconds: -1.0,
        };
        let error = assembler
            .assemble(&[], &[], &[], Some(&music), "t", "s")
            .unwrap_err();
        assert!(matches!(error, PlanError::AssetUnavailable { .. }));
    }
}
