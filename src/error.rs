use std::fmt;

/// Planner failures the caller is expected to distinguish. Everything
/// else (I/O, parsing) travels as plain `anyhow` context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// An input value is malformed, for example a non-positive measured
    /// clip duration.
    InvalidInput { message: String },
    /// The per-sentence input lists disagree in length, so no pairing
    /// of sentence, clips, and background exists.
    InputCardinality {
        sentences: usize,
        voice_clips: usize,
        backgrounds: usize,
    },
    /// A required asset is missing or unusable.
    AssetUnavailable { asset: String },
}

impl PlanError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn asset_unavailable(asset: impl Into<String>) -> Self {
        Self::AssetUnavailable {
            asset: asset.into(),
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { message } => write!(f, "invalid input: {message}"),
            Self::InputCardinality {
                sentences,
                voice_clips,
                backgrounds,
            } => write!(
                f,
                "input lists disagree: {sentences} sentences, {voice_clips} voice clip pairs, \
                 {backgrounds} backgrounds"
            ),
            Self::AssetUnavailable { asset } => write!(f, "asset unavailable: {asset}"),
        }
    }
}

impl std::error::Error for PlanError {}

/// Walk an `anyhow` chain and surface the planner error, if one caused
/// it. Lets the CLI keep wrapping errors with context while callers can
/// still branch on the underlying kind.
pub fn find_plan_error(error: &anyhow::Error) -> Option<&PlanError> {
    error.chain().find_map(|cause| cause.downcast_ref())
}
