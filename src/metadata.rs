use chrono::NaiveDate;
use serde::Serialize;

use crate::schema::{AssetRef, SentencePair};

/// Upload metadata for the finished video. Rendering the sidecar text
/// file is the CLI's job; this stays a pure function of the inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

const TAGS: &[&str] = &[
    "learn english",
    "english study",
    "daily english",
    "english sentences",
    "english for beginners",
    "영어공부",
    "영어회화",
    "매일영어",
    "기초영어",
    "bilingual study",
    "language learning",
];

pub fn generate_upload_metadata(
    sentences: &[SentencePair],
    total_seconds: f64,
    date: NaiveDate,
) -> UploadMetadata {
    let count = sentences.len();
    let title = format!(
        "Daily English Study {} - Learn {count} Essential Phrases",
        date.format("%Y.%m.%d")
    );

    let mut sentence_list = String::new();
    for sentence in sentences {
        sentence_list.push_str(&format!(
            "{}. {}\n   → {}\n",
            sentence.index + 1,
            sentence.source_text,
            sentence.target_text
        ));
    }
    if sentence_list.is_empty() {
        sentence_list.push_str("(intro and outro only)\n");
    }

    let minutes = (total_seconds / 60.0).floor() as u64;
    let seconds = (total_seconds % 60.0).round() as u64;
    let description = format!(
        "🌟 Daily English Study 🌟\n\n\
         Learn {count} essential English sentences with Korean translations.\n\
         Each sentence plays twice: listen, read along, then repeat.\n\n\
         📋 Today's sentences:\n{sentence_list}\n\
         ⏱ Runtime: {minutes}:{seconds:02}\n\n\
         🔔 Subscribe for daily lessons!"
    );

    UploadMetadata {
        title,
        description,
        tags: TAGS.iter().map(|tag| (*tag).to_owned()).collect(),
    }
}

impl UploadMetadata {
    /// Sidecar text layout: title, description, comma-joined tags.
    pub fn to_sidecar_text(&self) -> String {
        format!(
            "Title:\n{}\n\nDescription:\n{}\n\nTags:\n{}\n",
            self.title,
            self.description,
            self.tags.join(", ")
        )
    }
}

/// What the thumbnail collaborator needs: one representative background
/// and the sentence count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThumbnailBrief {
    pub background: Option<AssetRef>,
    pub sentence_count: usize,
}

pub fn thumbnail_brief(backgrounds: &[AssetRef], sentence_count: usize) -> ThumbnailBrief {
    ThumbnailBrief {
        background: backgrounds.first().cloned(),
        sentence_count,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{generate_upload_metadata, thumbnail_brief};
    use crate::schema::{AssetRef, SentencePair};

    fn sentences() -> Vec<SentencePair> {
        vec![
            SentencePair {
                source_text: "How much is this?".to_owned(),
                target_text: "이거 얼마예요?".to_owned(),
                index: 0,
            },
            SentencePair {
                source_text: "I'll take it".to_owned(),
                target_text: "이걸로 할게요".to_owned(),
                index: 1,
            },
        ]
    }

    #[test]
    fn title_carries_date_and_count() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let metadata = generate_upload_metadata(&sentences(), 34.2, date);
        assert!(metadata.title.contains("2026.08.25"));
        assert!(metadata.title.contains("2 Essential"));
    }

    #[test]
    fn description_lists_every_sentence_and_runtime() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let metadata = generate_upload_metadata(&sentences(), 95.0, date);
        assert!(metadata.description.contains("1. How much is this?"));
        assert!(metadata.description.contains("이걸로 할게요"));
        assert!(metadata.description.contains("1:35"));
    }

    #[test]
    fn sidecar_text_has_all_three_blocks() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let text = generate_upload_metadata(&sentences(), 34.2, date).to_sidecar_text();
        assert!(text.starts_with("Title:\n"));
        assert!(text.contains("\nDescription:\n"));
        assert!(text.contains("\nTags:\n"));
    }

    #[test]
    fn thumbnail_brief_uses_first_background() {
        let backgrounds = vec![AssetRef::new("a.jpg"), AssetRef::new("b.jpg")];
        let brief = thumbnail_brief(&backgrounds, 2);
        assert_eq!(brief.background, Some(AssetRef::new("a.jpg")));
        assert_eq!(brief.sentence_count, 2);

        let empty = thumbnail_brief(&[], 0);
        assert!(empty.background.is_none());
    }
}
