use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;

/// Opaque handle to an asset resolved by an upstream collaborator
/// (image/music acquisition, TTS). The core never opens the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef {
    pub path: PathBuf,
}

impl AssetRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Source,
    Target,
}

/// One sentence pair as ingested. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentencePair {
    pub source_text: String,
    pub target_text: String,
    pub index: usize,
}

/// A synthesized narration clip for one language of one sentence.
/// `duration_seconds` is measured by the TTS collaborator, never assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceClip {
    pub language: Language,
    pub asset: AssetRef,
    pub duration_seconds: f64,
}

impl VoiceClip {
    pub fn validate(&self) -> Result<()> {
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            bail!(
                "voice clip '{}' has non-positive duration {}",
                self.asset.path.display(),
                self.duration_seconds
            );
        }
        Ok(())
    }
}

/// Both narration clips for one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceClips {
    pub source: VoiceClip,
    pub target: VoiceClip,
}

/// Background music as acquired, with a measured duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicAsset {
    pub asset: AssetRef,
    pub duration_seconds: f64,
}

// ---- job manifest ----
//
// The job manifest is the boundary with the excluded collaborators:
// ingestion, TTS, and acquisition all ran upstream and recorded their
// results here, so the core can stay pure and synchronous.

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobManifest {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    pub sentences: Vec<JobSentence>,
    #[serde(default)]
    pub music: Option<JobAudioAsset>,
    #[serde(default)]
    pub config: PlannerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSentence {
    pub source: String,
    pub target: String,
    pub source_clip: JobAudioAsset,
    pub target_clip: JobAudioAsset,
    pub background: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobAudioAsset {
    pub path: PathBuf,
    pub duration_seconds: f64,
}

impl JobAudioAsset {
    pub fn validate(&self, label: &str) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            bail!("{label} path cannot be empty");
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            bail!(
                "{label} duration must be > 0, got {}",
                self.duration_seconds
            );
        }
        Ok(())
    }
}

impl JobManifest {
    pub fn sentence_pairs(&self) -> Vec<SentencePair> {
        self.sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| SentencePair {
                source_text: sentence.source.clone(),
                target_text: sentence.target.clone(),
                index,
            })
            .collect()
    }

    pub fn sentence_clips(&self) -> Vec<SentenceClips> {
        self.sentences
            .iter()
            .map(|sentence| SentenceClips {
                source: VoiceClip {
                    language: Language::Source,
                    asset: AssetRef::new(sentence.source_clip.path.clone()),
                    duration_seconds: sentence.source_clip.duration_seconds,
                },
                target: VoiceClip {
                    language: Language::Target,
                    asset: AssetRef::new(sentence.target_clip.path.clone()),
                    duration_seconds: sentence.target_clip.duration_seconds,
                },
            })
            .collect()
    }

    pub fn backgrounds(&self) -> Vec<AssetRef> {
        self.sentences
            .iter()
            .map(|sentence| AssetRef::new(sentence.background.clone()))
            .collect()
    }

    pub fn music_asset(&self) -> Option<MusicAsset> {
        self.music.as_ref().map(|music| MusicAsset {
            asset: AssetRef::new(music.path.clone()),
            duration_seconds: music.duration_seconds,
        })
    }
}

fn default_title() -> String {
    "Daily English Study".to_owned()
}

fn default_subtitle() -> String {
    "Learn with Us".to_owned()
}

#[cfg(test)]
mod tests {
    use super::{AssetRef, JobManifest, Language, VoiceClip};

    #[test]
    fn job_manifest_parses_with_defaults() {
        let manifest: JobManifest = serde_yaml::from_str(
            r#"
sentences:
  - source: "Is this seat taken?"
    target: "이 자리 있나요?"
    source_clip: { path: audio/s0_en.wav, duration_seconds: 1.8 }
    target_clip: { path: audio/s0_ko.wav, duration_seconds: 2.1 }
    background: images/cafe.jpg
"#,
        )
        .expect("manifest should parse");

        assert_eq!(manifest.title, "Daily English Study");
        assert!(manifest.music.is_none());
        assert_eq!(manifest.sentences.len(), 1);
        assert_eq!(manifest.config.frame_width, 1920);

        let pairs = manifest.sentence_pairs();
        assert_eq!(pairs[0].index, 0);
        let clips = manifest.sentence_clips();
        assert_eq!(clips[0].source.language, Language::Source);
        assert_eq!(clips[0].target.language, Language::Target);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<JobManifest, _> = serde_yaml::from_str(
            r#"
sentences: []
transition_style: crossfade
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_duration_voice_clip_fails_validation() {
        let clip = VoiceClip {
            language: Language::Source,
            asset: AssetRef::new("audio/s0_en.wav"),
            duration_seconds: 0.0,
        };
        assert!(clip.validate().is_err());
    }
}
