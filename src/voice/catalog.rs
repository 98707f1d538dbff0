//! Preset voices shipped by the voice service.

/// Preset used when nothing else is selected.
pub const DEFAULT_PRESET: &str = "Rachel";

/// Named preset voices and their service identifiers, in display order.
pub static PRESET_VOICES: &[(&str, &str)] = &[
    ("Rachel", "21m00Tcm4TlvDq8ikWAM"),
    ("Drew", "29vD33N1CtxCmqQRPOHJ"),
    ("Clyde", "2EiwWnXFnvU5JabPnv8n"),
    ("Paul", "5Q0t7uMcjvnagumLfvZi"),
    ("Domi", "AZnzlk1XvdvUeBnXmlld"),
    ("Dave", "CYw3kZ02Hs0563khs1Fj"),
    ("Fin", "D38z5RcWu1voky8WS1ja"),
    ("Sarah", "EXAVITQu4vr4xnSDxMaL"),
    ("Antoni", "ErXwobaYiN019PkySvjV"),
    ("Thomas", "GBv7mTt0atIp3Br8iCZE"),
    ("Charlie", "IKne3meq5aSn9XLyUdCD"),
    ("George", "JBFqnCBsd6RMkjVDRZzb"),
    ("Emily", "LcfcDJNUP1GQjkzn1xUU"),
    ("Elli", "MF3mGyEYCl7XYWbV9V6O"),
    ("Callum", "N2lVS1w4EtoT3dr4eOWO"),
    ("Patrick", "ODq5zmih8GrVes37Dizd"),
    ("Harry", "SOYHLrjzK2X1ezoPC6cr"),
    ("Liam", "TX3LPaxmHKxFdv7VOQHJ"),
    ("Dorothy", "ThT5KcBeYPX3keUQqHPh"),
    ("Josh", "TxGEqnHWrfWFTfGW9XjX"),
    ("Arnold", "VR6AewLTigWG4xSOukaG"),
    ("Charlotte", "XB0fDUnXU5powFXDhCwa"),
    ("Alice", "Xb7hH8MSUJpSbSDYk0k2"),
    ("Matilda", "XrExE9yKIg1WjnnlVkGX"),
    ("James", "ZQe5CZNOzWyzPSCn5a3c"),
    ("Joseph", "Zlb1dXrM653N07WRdFW3"),
    ("Jeremy", "bVMeCyTHy58xNoL34h3p"),
    ("Michael", "flq6f7yk4E4fJM5XTYuZ"),
    ("Ethan", "g5CIjZEefAph4nQFvHAz"),
    ("Chris", "iP95p4xoKVk53GoZ742B"),
    ("Gigi", "jBpfuIE2acCO8z3wKNLl"),
    ("Freya", "jsCqWAovK2LkecY7zXl4"),
    ("Brian", "nPczCjzI2devNBz1zQrb"),
    ("Grace", "oWAxZDx7w5VEj9dCyTzz"),
    ("Daniel", "onwK4e9ZLuTAKqWW03F9"),
    ("Lily", "pFZP5JQG7iQjIQuC4Bku"),
    ("Serena", "pMsXgVXv3BLzUgSXRplE"),
    ("Adam", "pNInz6obpgDQGcFmaJgB"),
    ("Nicole", "piTKgcLEGmPE4e6mEKli"),
    ("Bill", "pqHfZKP75CvOlQylNhV4"),
    ("Jessie", "t0jbNlBVZ17f02VDIeMI"),
    ("Sam", "yoZ06aMxZJJ28mfd3POQ"),
    ("Glinda", "z9fAnlkpzviPz146aGWa"),
    ("Giovanni", "zcAOhNBS3c14rBihAFp1"),
    ("Mimi", "zrHiDhphv9ZnVXBqCLjz"),
];

/// Look up a preset voice identifier by name.
pub fn preset_voice_id(name: &str) -> Option<&'static str> {
    PRESET_VOICES
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, id)| *id)
}

/// Names of all preset voices.
pub fn preset_voice_names() -> impl Iterator<Item = &'static str> {
    PRESET_VOICES.iter().map(|(name, _)| *name)
}

/// Which voice to narrate with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSelection {
    /// A preset voice by catalog name.
    Preset(String),
    /// A previously cloned voice by service identifier.
    Cloned(String),
}

impl VoiceSelection {
    /// Resolve to `(voice_id, label)`. Unknown preset names fall back to the default preset.
    pub fn resolve(&self) -> (String, String) {
        match self {
            VoiceSelection::Cloned(id) => (id.clone(), "Cloned Voice".to_string()),
            VoiceSelection::Preset(name) => match preset_voice_id(name) {
                Some(id) => (id.to_string(), name.clone()),
                None => {
                    tracing::warn!("Unknown preset voice '{}', using {}", name, DEFAULT_PRESET);
                    (
                        default_preset_id().to_string(),
                        format!("{} (Default)", DEFAULT_PRESET),
                    )
                }
            },
        }
    }
}

fn default_preset_id() -> &'static str {
    PRESET_VOICES[0].1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_is_unique() {
        let names: HashSet<_> = preset_voice_names().collect();
        let ids: HashSet<_> = PRESET_VOICES.iter().map(|(_, id)| *id).collect();
        assert_eq!(names.len(), PRESET_VOICES.len());
        assert_eq!(ids.len(), PRESET_VOICES.len());
        assert_eq!(PRESET_VOICES.len(), 45);
    }

    #[test]
    fn test_default_preset_present() {
        assert_eq!(preset_voice_id(DEFAULT_PRESET), Some(default_preset_id()));
        assert_eq!(preset_voice_id("Nobody"), None);
    }

    #[test]
    fn test_selection_resolution() {
        let (id, label) = VoiceSelection::Preset("Adam".to_string()).resolve();
        assert_eq!((id.as_str(), label.as_str()), ("pNInz6obpgDQGcFmaJgB", "Adam"));

        let (id, label) = VoiceSelection::Cloned("v-1".to_string()).resolve();
        assert_eq!((id.as_str(), label.as_str()), ("v-1", "Cloned Voice"));

        let (id, label) = VoiceSelection::Preset("Nobody".to_string()).resolve();
        assert_eq!(id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(label, "Rachel (Default)");
    }
}
