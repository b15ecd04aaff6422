use serde::{Deserialize, Serialize};

/// Sample rate of the PCM audio the service returns (24 kHz mono).
pub const SOURCE_SAMPLE_RATE: u32 = 24_000;

/// Decoded audio returned from synthesis: signed 16-bit little-endian PCM.
#[derive(Debug, Clone)]
pub struct AudioData {
    pub pcm_data: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// One of the service's prebuilt voices. The set is fixed at compile time;
/// voices are never created or destroyed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub name: &'static str,
    pub gender: Gender,
    pub preview_text: &'static str,
}

/// The full prebuilt voice roster.
pub static VOICES: [Voice; 5] = [
    Voice {
        name: "Kore",
        gender: Gender::Female,
        preview_text: "Hello, my name is Kore.",
    },
    Voice {
        name: "Puck",
        gender: Gender::Male,
        preview_text: "Hello, my name is Puck.",
    },
    Voice {
        name: "Charon",
        gender: Gender::Male,
        preview_text: "Hello, my name is Charon.",
    },
    Voice {
        name: "Fenrir",
        gender: Gender::Male,
        preview_text: "Hello, my name is Fenrir.",
    },
    Voice {
        name: "Zephyr",
        gender: Gender::Female,
        preview_text: "Hello, my name is Zephyr.",
    },
];

/// Look up a voice by name, case-insensitively.
pub fn find_voice(name: &str) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_has_five_voices_in_two_categories() {
        assert_eq!(VOICES.len(), 5);
        let female = VOICES.iter().filter(|v| v.gender == Gender::Female).count();
        let male = VOICES.iter().filter(|v| v.gender == Gender::Male).count();
        assert_eq!(female, 2);
        assert_eq!(male, 3);
    }

    #[test]
    fn find_voice_is_case_insensitive() {
        assert_eq!(find_voice("kore").map(|v| v.name), Some("Kore"));
        assert_eq!(find_voice("ZEPHYR").map(|v| v.name), Some("Zephyr"));
        assert!(find_voice("Nova").is_none());
    }
}
