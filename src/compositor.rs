use serde::Serialize;

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::schema::AssetRef;
use crate::timing::{SectionRole, TimingTable};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A layer's screen position as a pure function of elapsed layer time.
/// Kept as tagged data rather than closures so the plan stays
/// serializable and the renderer evaluates it per frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionFn {
    Static {
        at: Vec2,
    },
    Linear {
        from: Vec2,
        to: Vec2,
        duration_seconds: f64,
    },
    Sinusoidal {
        center: Vec2,
        amplitude_px: f32,
        frequency_hz: f32,
        phase: f32,
        axis: Axis,
    },
}

impl PositionFn {
    pub fn at(&self, t: f64) -> Vec2 {
        match self {
            Self::Static { at } => *at,
            Self::Linear {
                from,
                to,
                duration_seconds,
            } => {
                let progress = if *duration_seconds <= 0.0 {
                    1.0
                } else {
                    (t / duration_seconds).clamp(0.0, 1.0) as f32
                };
                Vec2 {
                    x: from.x + (to.x - from.x) * progress,
                    y: from.y + (to.y - from.y) * progress,
                }
            }
            Self::Sinusoidal {
                center,
                amplitude_px,
                frequency_hz,
                phase,
                axis,
            } => {
                let angle = std::f32::consts::TAU * frequency_hz * t as f32 + phase;
                let offset = amplitude_px * angle.sin();
                match axis {
                    Axis::Horizontal => Vec2 {
                        x: center.x + offset,
                        y: center.y,
                    },
                    Axis::Vertical => Vec2 {
                        x: center.x,
                        y: center.y + offset,
                    },
                }
            }
        }
    }
}

/// A layer's opacity as a pure function of elapsed layer time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpacityFn {
    Static {
        value: f32,
    },
    FadeIn {
        fade_seconds: f64,
    },
    /// Ramp to `peak`, hold, then ramp back down before the layer ends.
    FadeInOut {
        fade_in_seconds: f64,
        fade_out_seconds: f64,
        peak: f32,
    },
}

impl OpacityFn {
    pub fn at(&self, t: f64, layer_duration: f64) -> f32 {
        match self {
            Self::Static { value } => *value,
            Self::FadeIn { fade_seconds } => {
                if *fade_seconds <= 0.0 {
                    1.0
                } else {
                    (t / fade_seconds).clamp(0.0, 1.0) as f32
                }
            }
            Self::FadeInOut {
                fade_in_seconds,
                fade_out_seconds,
                peak,
            } => {
                let rise = if *fade_in_seconds <= 0.0 {
                    1.0
                } else {
                    (t / fade_in_seconds).clamp(0.0, 1.0)
                };
                let remaining = layer_duration - t;
                let fall = if *fade_out_seconds <= 0.0 {
                    1.0
                } else {
                    (remaining / fade_out_seconds).clamp(0.0, 1.0)
                };
                peak * rise.min(fall) as f32
            }
        }
    }
}

/// A layer's uniform scale as a pure function of elapsed layer time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScaleFn {
    Static { value: f32 },
    /// Continuous slow zoom so full-frame stills never read as frozen.
    LinearZoom { from: f32, rate_per_second: f32 },
}

impl ScaleFn {
    pub fn at(&self, t: f64) -> f32 {
        match self {
            Self::Static { value } => *value,
            Self::LinearZoom {
                from,
                rate_per_second,
            } => from + rate_per_second * t as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardPlacement {
    Top,
    Center,
    Bottom,
}

/// Pre-measured, wrapped text content. Computed once per distinct text;
/// a reused occurrence clones the value instead of re-measuring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBoard {
    pub lines: Vec<String>,
    pub font_px: u32,
    pub width_px: u32,
    pub height_px: u32,
    pub placement: BoardPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reveal {
    Typed { seconds_per_char: f64 },
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientStyle {
    Diagonal,
    Circles,
    Lines,
    Dots,
    Wave,
}

const GRADIENT_STYLES: [GradientStyle; 5] = [
    GradientStyle::Diagonal,
    GradientStyle::Circles,
    GradientStyle::Lines,
    GradientStyle::Dots,
    GradientStyle::Wave,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecorShape {
    pub radius_px: f32,
}

/// One affordance inside the call-to-action cluster, laid out relative
/// to the cluster origin so the whole group repositions as a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CtaItem {
    pub label: String,
    pub offset_px: Vec2,
    pub width_px: u32,
    pub height_px: u32,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerKind {
    Background { asset: AssetRef },
    GradientBackdrop { style: GradientStyle },
    HeaderBadge { text: String },
    TextBoard { board: TextBoard, reveal: Reveal },
    Decoration { shape: DecorShape },
    CallToAction { items: Vec<CtaItem> },
}

/// One positioned, time-bounded drawable. Within a segment the layers
/// paint in ascending `z_index`; the background is always lowest and
/// decorations highest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualLayer {
    pub id: String,
    pub z_index: i32,
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub position: PositionFn,
    pub opacity: OpacityFn,
    pub scale: ScaleFn,
    #[serde(flatten)]
    pub kind: LayerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookendKind {
    Intro,
    Outro,
}

const HEADER_FONT_PX: u32 = 40;
const SOURCE_FONT_PX: u32 = 50;
const TARGET_FONT_PX: u32 = 45;
const TITLE_FONT_PX: u32 = 80;
const SUBTITLE_FONT_PX: u32 = 40;
const BOARD_FADE_SECONDS: f64 = 0.5;
const BACKGROUND_ZOOM_RATE: f32 = 0.02;
const MAX_BOARD_WIDTH_FRACTION: f32 = 0.8;

// Average glyph advance as a fraction of the font size. The renderer
// owns real glyph metrics; the plan only needs stable box sizes.
const LATIN_ADVANCE: f32 = 0.56;
const LINE_HEIGHT_FACTOR: f32 = 1.3;

/// Build the full visual stack for one sentence segment. Layer times are
/// relative to the segment start; the assembler shifts them into place.
pub fn build_segment_layers(
    config: &PlannerConfig,
    timing: &TimingTable,
    background: &AssetRef,
    sentence_ordinal: usize,
    source_text: &str,
    target_text: &str,
) -> Result<Vec<VisualLayer>, PlanError> {
    if background.is_empty() {
        return Err(PlanError::asset_unavailable(format!(
            "no background asset for sentence {sentence_ordinal}"
        )));
    }

    let total = timing.total_seconds;
    let mut layers = Vec::with_capacity(6);

    layers.push(VisualLayer {
        id: "background".to_owned(),
        z_index: 0,
        start_seconds: 0.0,
        duration_seconds: total,
        position: PositionFn::Static { at: Vec2::default() },
        opacity: OpacityFn::Static { value: 1.0 },
        scale: ScaleFn::LinearZoom {
            from: 1.0,
            rate_per_second: BACKGROUND_ZOOM_RATE,
        },
        kind: LayerKind::Background {
            asset: background.clone(),
        },
    });

    let header_text = format!("#{}", sentence_ordinal + 1);
    let header_board = make_text_board(config, &header_text, HEADER_FONT_PX, BoardPlacement::Top);
    layers.push(VisualLayer {
        id: "header".to_owned(),
        z_index: 10,
        start_seconds: 0.0,
        duration_seconds: total,
        position: PositionFn::Static {
            at: board_position(config, &header_board),
        },
        opacity: OpacityFn::Static { value: 0.9 },
        scale: ScaleFn::Static { value: 1.0 },
        kind: LayerKind::HeaderBadge { text: header_text },
    });

    // The boards are measured once and the same content value is reused
    // for the repeat occurrence.
    let source_board = make_text_board(config, source_text, SOURCE_FONT_PX, BoardPlacement::Center);
    let target_board = make_text_board(config, target_text, TARGET_FONT_PX, BoardPlacement::Bottom);

    let source_section = timing.section(SectionRole::Source);
    let target_section = timing.section(SectionRole::Target);
    let repeat_section = timing.section(SectionRole::SourceRepeat);

    layers.push(text_board_layer(
        config,
        "source-board",
        20,
        source_board.clone(),
        Reveal::Typed {
            seconds_per_char: source_section.typing_seconds_per_char,
        },
        source_section.text_start_seconds,
        source_section.text_duration_seconds,
    ));
    layers.push(text_board_layer(
        config,
        "target-board",
        21,
        target_board.clone(),
        Reveal::Typed {
            seconds_per_char: target_section.typing_seconds_per_char,
        },
        target_section.text_start_seconds,
        target_section.text_duration_seconds,
    ));
    layers.push(text_board_layer(
        config,
        "source-board-repeat",
        22,
        source_board,
        Reveal::Static,
        repeat_section.text_start_seconds,
        repeat_section.text_duration_seconds,
    ));
    layers.push(text_board_layer(
        config,
        "target-board-repeat",
        23,
        target_board,
        Reveal::Static,
        repeat_section.text_start_seconds,
        repeat_section.text_duration_seconds,
    ));

    layers.sort_by_key(|layer| layer.z_index);
    Ok(layers)
}

fn text_board_layer(
    config: &PlannerConfig,
    id: &str,
    z_index: i32,
    board: TextBoard,
    reveal: Reveal,
    start_seconds: f64,
    duration_seconds: f64,
) -> VisualLayer {
    VisualLayer {
        id: id.to_owned(),
        z_index,
        start_seconds,
        duration_seconds,
        position: PositionFn::Static {
            at: board_position(config, &board),
        },
        opacity: OpacityFn::FadeInOut {
            fade_in_seconds: BOARD_FADE_SECONDS,
            fade_out_seconds: BOARD_FADE_SECONDS,
            peak: 1.0,
        },
        scale: ScaleFn::Static { value: 1.0 },
        kind: LayerKind::TextBoard { board, reveal },
    }
}

/// Build an intro or outro block: seeded gradient backdrop, title and
/// subtitle boards, floating decorative shapes, and for the outro a
/// grouped call-to-action cluster.
pub fn build_bookend_layers(
    config: &PlannerConfig,
    kind: BookendKind,
    title: &str,
    subtitle: &str,
    seed: u64,
) -> Vec<VisualLayer> {
    let duration = config.bookend_seconds;
    let salt = match kind {
        BookendKind::Intro => 0x6C4F_2A91_u64,
        BookendKind::Outro => 0xD3E1_77B5_u64,
    };
    let mut layers = Vec::new();

    let style_pick = hash_u64(seed ^ salt) as usize % GRADIENT_STYLES.len();
    layers.push(VisualLayer {
        id: "backdrop".to_owned(),
        z_index: 0,
        start_seconds: 0.0,
        duration_seconds: duration,
        position: PositionFn::Static { at: Vec2::default() },
        opacity: OpacityFn::Static { value: 1.0 },
        scale: ScaleFn::Static { value: 1.0 },
        kind: LayerKind::GradientBackdrop {
            style: GRADIENT_STYLES[style_pick],
        },
    });

    let title_board = make_text_board(config, title, TITLE_FONT_PX, BoardPlacement::Center);
    let title_position = board_position(config, &title_board);
    layers.push(VisualLayer {
        id: "title".to_owned(),
        z_index: 20,
        start_seconds: 0.0,
        duration_seconds: duration,
        position: PositionFn::Static { at: title_position },
        opacity: OpacityFn::FadeIn { fade_seconds: 1.0 },
        scale: ScaleFn::Static { value: 1.0 },
        kind: LayerKind::TextBoard {
            board: title_board,
            reveal: Reveal::Static,
        },
    });

    // Subtitle slides up while fading in, half a second behind the title.
    let subtitle_board = make_text_board(config, subtitle, SUBTITLE_FONT_PX, BoardPlacement::Bottom);
    let subtitle_rest = board_position(config, &subtitle_board);
    layers.push(VisualLayer {
        id: "subtitle".to_owned(),
        z_index: 21,
        start_seconds: 0.5,
        duration_seconds: (duration - 0.5).max(0.0),
        position: PositionFn::Linear {
            from: Vec2 {
                x: subtitle_rest.x,
                y: subtitle_rest.y + 40.0,
            },
            to: subtitle_rest,
            duration_seconds: 0.6,
        },
        opacity: OpacityFn::FadeIn { fade_seconds: 1.0 },
        scale: ScaleFn::Static { value: 1.0 },
        kind: LayerKind::TextBoard {
            board: subtitle_board,
            reveal: Reveal::Static,
        },
    });

    if kind == BookendKind::Outro {
        layers.push(call_to_action_layer(config, duration));
    }

    for index in 0..config.decoration_count {
        layers.push(decoration_layer(config, seed, salt, index, duration));
    }

    layers.sort_by_key(|layer| layer.z_index);
    layers
}

fn call_to_action_layer(config: &PlannerConfig, duration: f64) -> VisualLayer {
    // Internal offsets are relative to the cluster origin, so moving the
    // layer moves the whole group.
    let items = vec![
        CtaItem {
            label: "SUBSCRIBE".to_owned(),
            offset_px: Vec2 { x: 0.0, y: 0.0 },
            width_px: 280,
            height_px: 56,
            emphasized: true,
        },
        CtaItem {
            label: "LIKE".to_owned(),
            offset_px: Vec2 { x: 20.0, y: 80.0 },
            width_px: 110,
            height_px: 36,
            emphasized: false,
        },
        CtaItem {
            label: "NOTIFY".to_owned(),
            offset_px: Vec2 { x: 150.0, y: 80.0 },
            width_px: 130,
            height_px: 36,
            emphasized: false,
        },
    ];

    let cluster_width = 280.0;
    VisualLayer {
        id: "call-to-action".to_owned(),
        z_index: 30,
        start_seconds: 1.0,
        duration_seconds: (duration - 1.0).max(0.0),
        position: PositionFn::Static {
            at: Vec2 {
                x: (config.frame_width as f32 - cluster_width) / 2.0,
                y: config.frame_height as f32 * 0.55,
            },
        },
        opacity: OpacityFn::FadeIn { fade_seconds: 0.8 },
        scale: ScaleFn::Static { value: 1.0 },
        kind: LayerKind::CallToAction { items },
    }
}

fn decoration_layer(
    config: &PlannerConfig,
    seed: u64,
    salt: u64,
    index: u32,
    duration: f64,
) -> VisualLayer {
    let draw = |lane: u64| {
        let mixed = hash_u64(seed ^ salt ^ ((index as u64 + 1) << 8) ^ (lane << 40));
        unit_from_hash(mixed)
    };

    let width = config.frame_width as f32;
    let height = config.frame_height as f32;
    let center = Vec2 {
        x: width * (0.1 + 0.8 * draw(1)),
        y: height * (0.1 + 0.8 * draw(2)),
    };
    let amplitude_px = 20.0 + 40.0 * draw(3);
    let frequency_hz = 0.2 + 0.3 * draw(4);
    let phase = std::f32::consts::TAU * draw(5);
    let axis = if draw(6) < 0.5 {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };
    let radius_px = 24.0 + 72.0 * draw(7);

    VisualLayer {
        id: format!("decoration-{index}"),
        z_index: 40 + index as i32,
        start_seconds: 0.0,
        duration_seconds: duration,
        position: PositionFn::Sinusoidal {
            center,
            amplitude_px,
            frequency_hz,
            phase,
            axis,
        },
        opacity: OpacityFn::FadeInOut {
            fade_in_seconds: 0.6,
            fade_out_seconds: 0.6,
            peak: 0.1 + 0.2 * draw(8),
        },
        scale: ScaleFn::Static { value: 1.0 },
        kind: LayerKind::Decoration {
            shape: DecorShape { radius_px },
        },
    }
}

// ---- text measurement ----

fn char_advance(c: char) -> f32 {
    if is_wide(c) {
        1.0
    } else {
        LATIN_ADVANCE
    }
}

// Full-width ranges (Hangul, CJK ideographs, full-width forms) occupy a
// whole em; everything else uses the average Latin advance.
fn is_wide(c: char) -> bool {
    matches!(c,
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FE30}'..='\u{FE4F}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}')
}

fn text_width_px(text: &str, font_px: u32) -> u32 {
    let units: f32 = text.chars().map(char_advance).sum();
    (units * font_px as f32).ceil() as u32
}

/// Wrap on word boundaries against `max_width_px`, falling back to a
/// hard character break only when a single word exceeds the line.
pub fn wrap_text(text: &str, font_px: u32, max_width_px: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };

        if text_width_px(&candidate, font_px) <= max_width_px {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width_px(word, font_px) <= max_width_px {
            current = word.to_owned();
        } else {
            for piece in hard_break(word, font_px, max_width_px) {
                lines.push(piece);
            }
            if let Some(last) = lines.pop() {
                current = last;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn hard_break(word: &str, font_px: u32, max_width_px: u32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if !current.is_empty() && text_width_px(&candidate, font_px) > max_width_px {
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Measure and wrap a text into a board sized against 80% of the frame
/// width.
pub fn make_text_board(
    config: &PlannerConfig,
    text: &str,
    font_px: u32,
    placement: BoardPlacement,
) -> TextBoard {
    let max_width_px = (config.frame_width as f32 * MAX_BOARD_WIDTH_FRACTION) as u32;
    let lines = wrap_text(text, font_px, max_width_px);
    let width_px = lines
        .iter()
        .map(|line| text_width_px(line, font_px))
        .max()
        .unwrap_or(0)
        .min(max_width_px);
    let line_height = (font_px as f32 * LINE_HEIGHT_FACTOR).ceil() as u32;
    let height_px = line_height * lines.len() as u32;

    TextBoard {
        lines,
        font_px,
        width_px,
        height_px,
        placement,
    }
}

/// Top-left pixel position for a board: placement preset picks the
/// vertical band, horizontal is always centered.
pub fn board_position(config: &PlannerConfig, board: &TextBoard) -> Vec2 {
    let width = config.frame_width as f32;
    let height = config.frame_height as f32;
    let x = (width - board.width_px as f32) / 2.0;
    let y = match board.placement {
        BoardPlacement::Top => height / 6.0,
        BoardPlacement::Center => (height - board.height_px as f32) / 2.0,
        BoardPlacement::Bottom => height - height / 4.0,
    };
    Vec2 { x, y }
}

// Deterministic stateless hashing; style variety comes from the caller's
// explicit seed, never from ambient RNG state.
fn hash_u64(mut value: u64) -> u64 {
    value ^= value >> 33;
    value = value.wrapping_mul(0xff51_afd7_ed55_8ccd);
    value ^= value >> 33;
    value = value.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    value ^= value >> 33;
    value
}

fn unit_from_hash(hash: u64) -> f32 {
    (hash as f64 / u64::MAX as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::{
        build_bookend_layers, build_segment_layers, make_text_board, wrap_text, Axis,
        BoardPlacement, BookendKind, LayerKind, OpacityFn, PositionFn, Reveal, Vec2,
    };
    use crate::config::PlannerConfig;
    use crate::error::PlanError;
    use crate::schema::{AssetRef, Language, VoiceClip};
    use crate::timing::plan_sentence_timing;

    fn sample_timing(config: &PlannerConfig) -> crate::timing::TimingTable {
        let source = VoiceClip {
            language: Language::Source,
            asset: AssetRef::new("audio/en.wav"),
            duration_seconds: 2.0,
        };
        let target = VoiceClip {
            language: Language::Target,
            asset: AssetRef::new("audio/ko.wav"),
            duration_seconds: 2.5,
        };
        plan_sentence_timing(
            config,
            &source,
            &target,
            "Can I try this on?",
            "이거 입어봐도 될까요?",
        )
        .expect("timing should plan")
    }

    #[test]
    fn segment_has_one_background_and_ascending_z() {
        let config = PlannerConfig::default();
        let timing = sample_timing(&config);
        let layers = build_segment_layers(
            &config,
            &timing,
            &AssetRef::new("images/shop.jpg"),
            0,
            "Can I try this on?",
            "이거 입어봐도 될까요?",
        )
        .expect("layers should build");

        let backgrounds = layers
            .iter()
            .filter(|layer| matches!(layer.kind, LayerKind::Background { .. }))
            .count();
        assert_eq!(backgrounds, 1);
        assert!(layers.windows(2).all(|pair| pair[0].z_index <= pair[1].z_index));
        assert_eq!(layers[0].z_index, 0);
    }

    #[test]
    fn repeat_board_reuses_identical_content() {
        let config = PlannerConfig::default();
        let timing = sample_timing(&config);
        let layers = build_segment_layers(
            &config,
            &timing,
            &AssetRef::new("images/shop.jpg"),
            0,
            "Can I try this on?",
            "이거 입어봐도 될까요?",
        )
        .expect("layers should build");

        let board_of = |id: &str| {
            layers
                .iter()
                .find(|layer| layer.id == id)
                .map(|layer| match &layer.kind {
                    LayerKind::TextBoard { board, .. } => board.clone(),
                    other => panic!("expected text board, got {other:?}"),
                })
                .expect("layer should exist")
        };

        assert_eq!(board_of("source-board"), board_of("source-board-repeat"));
        assert_eq!(board_of("target-board"), board_of("target-board-repeat"));

        let first = layers.iter().find(|l| l.id == "source-board").unwrap();
        let second = layers
            .iter()
            .find(|l| l.id == "source-board-repeat")
            .unwrap();
        assert!(second.start_seconds > first.start_seconds);
        assert!(matches!(
            second.kind,
            LayerKind::TextBoard {
                reveal: Reveal::Static,
                ..
            }
        ));
    }

    #[test]
    fn missing_background_is_asset_unavailable() {
        let config = PlannerConfig::default();
        let timing = sample_timing(&config);
        let error = build_segment_layers(&config, &timing, &AssetRef::new(""), 0, "a", "b")
            .unwrap_err();
        assert!(matches!(error, PlanError::AssetUnavailable { .. }));
    }

    #[test]
    fn bookend_is_deterministic_per_seed() {
        let config = PlannerConfig::default();
        let first = build_bookend_layers(&config, BookendKind::Intro, "DAILY", "ENGLISH", 7);
        let second = build_bookend_layers(&config, BookendKind::Intro, "DAILY", "ENGLISH", 7);
        assert_eq!(first, second);

        let other = build_bookend_layers(&config, BookendKind::Intro, "DAILY", "ENGLISH", 8);
        assert_ne!(first, other);
    }

    #[test]
    fn outro_carries_a_grouped_call_to_action() {
        let config = PlannerConfig::default();
        let intro = build_bookend_layers(&config, BookendKind::Intro, "t", "s", 1);
        assert!(!intro
            .iter()
            .any(|layer| matches!(layer.kind, LayerKind::CallToAction { .. })));

        let outro = build_bookend_layers(&config, BookendKind::Outro, "t", "s", 1);
        let cta = outro
            .iter()
            .find(|layer| matches!(layer.kind, LayerKind::CallToAction { .. }))
            .expect("outro should include the call to action");
        match &cta.kind {
            LayerKind::CallToAction { items } => {
                assert_eq!(items.len(), 3);
                assert!(items.iter().any(|item| item.label == "SUBSCRIBE"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        // 40px font, 0.56 advance: each char ~22.4px.
        let lines = wrap_text("the quick brown fox jumps", 40, 300);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(!line.starts_with(' ') && !line.ends_with(' '));
            assert!(super::text_width_px(line, 40) <= 300);
        }
    }

    #[test]
    fn over_long_word_falls_back_to_hard_break() {
        let word = "a".repeat(60);
        let lines = wrap_text(&word, 40, 300);
        assert!(lines.len() > 1);
        let rejoined: String = lines.concat();
        assert_eq!(rejoined, word);
    }

    #[test]
    fn empty_text_still_yields_a_sized_board() {
        let config = PlannerConfig::default();
        let board = make_text_board(&config, "", 50, BoardPlacement::Center);
        assert_eq!(board.lines.len(), 1);
        assert!(board.height_px > 0);
    }

    #[test]
    fn wide_chars_count_double_width() {
        let latin = super::text_width_px("ab", 40);
        let hangul = super::text_width_px("아메", 40);
        assert!(hangul > latin);
    }

    #[test]
    fn boards_are_horizontally_centered() {
        let config = PlannerConfig::default();
        for placement in [
            BoardPlacement::Top,
            BoardPlacement::Center,
            BoardPlacement::Bottom,
        ] {
            let board = make_text_board(&config, "hello there", 50, placement);
            let at = super::board_position(&config, &board);
            let expected = (config.frame_width as f32 - board.width_px as f32) / 2.0;
            assert!((at.x - expected).abs() < 0.5);
        }
    }

    #[test]
    fn sinusoidal_position_oscillates_around_center() {
        let position = PositionFn::Sinusoidal {
            center: Vec2 { x: 100.0, y: 200.0 },
            amplitude_px: 30.0,
            frequency_hz: 0.25,
            phase: 0.0,
            axis: Axis::Vertical,
        };
        let at_zero = position.at(0.0);
        assert!((at_zero.y - 200.0).abs() < 1e-3);
        // Quarter period of 0.25 Hz is 1s; sine peaks there.
        let at_peak = position.at(1.0);
        assert!((at_peak.y - 230.0).abs() < 1e-3);
        assert!((at_peak.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn fade_in_out_holds_peak_between_fades() {
        let opacity = OpacityFn::FadeInOut {
            fade_in_seconds: 0.5,
            fade_out_seconds: 0.5,
            peak: 1.0,
        };
        assert!(opacity.at(0.0, 4.0) < 1e-3);
        assert!((opacity.at(2.0, 4.0) - 1.0).abs() < 1e-3);
        assert!(opacity.at(4.0, 4.0) < 1e-3);
    }
}
