//! Feedback-style framing for narrated answers.

use serde::{Deserialize, Serialize};

/// Sentence placed before the answer.
pub const FEEDBACK_OPENING: &str =
    "Hi there! I've reviewed your document and here's my feedback. ";

/// Sentence placed after the answer.
pub const FEEDBACK_CLOSING: &str = " I hope this feedback is helpful. Feel free to reach out if you have any questions or need clarification on any points. Keep up the great work!";

/// Wrap `text` as personal feedback.
pub fn transform_to_feedback_style(text: &str) -> String {
    let mut feedback =
        String::with_capacity(FEEDBACK_OPENING.len() + text.len() + FEEDBACK_CLOSING.len());
    feedback.push_str(FEEDBACK_OPENING);
    feedback.push_str(text);
    feedback.push_str(FEEDBACK_CLOSING);
    feedback
}

/// How an answer is delivered as audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioStyle {
    /// Read the answer as-is.
    #[default]
    Direct,
    /// Frame the answer with [`transform_to_feedback_style`].
    Feedback,
}

impl AudioStyle {
    /// Text to narrate for `response` in this style.
    pub fn narration_text(&self, response: &str) -> String {
        match self {
            AudioStyle::Direct => response.to_string(),
            AudioStyle::Feedback => transform_to_feedback_style(response),
        }
    }

    /// Short tag used in output file names.
    pub fn suffix(&self) -> &'static str {
        match self {
            AudioStyle::Direct => "direct",
            AudioStyle::Feedback => "feedback",
        }
    }
}

impl std::str::FromStr for AudioStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(AudioStyle::Direct),
            "feedback" => Ok(AudioStyle::Feedback),
            _ => Err(format!("Unknown audio style: {} (expected direct or feedback)", s)),
        }
    }
}

impl std::fmt::Display for AudioStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}
