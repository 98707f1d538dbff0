//! Emotion tags accepted for narration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Emotion requested for a narration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
}

impl Emotion {
    /// Every supported emotion, in display order.
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Surprised,
    ];

    /// Lowercase tag for this emotion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
            Emotion::Surprised => "surprised",
        }
    }

    /// Parse a tag, falling back to `Neutral` for anything unrecognized.
    ///
    /// Matching is exact: tags are lowercase.
    pub fn parse_lenient(tag: &str) -> Emotion {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == tag)
            .unwrap_or_else(|| {
                warn!("Emotion '{}' not in supported list, using 'neutral'", tag);
                Emotion::Neutral
            })
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_parse() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::parse_lenient(emotion.as_str()), emotion);
        }
    }

    #[test]
    fn test_unknown_tags_fall_back_to_neutral() {
        assert_eq!(Emotion::parse_lenient("martian"), Emotion::Neutral);
        assert_eq!(Emotion::parse_lenient(""), Emotion::Neutral);
        assert_eq!(Emotion::parse_lenient("Happy"), Emotion::Neutral);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Emotion::Fearful).unwrap(), "\"fearful\"");
    }
}
