//! Escaping and prosody markup for synthesis payloads.
//!
//! The service accepts either plain escaped text or a `<speak>` envelope.
//! A request at default rate and pitch is sent as plain text so that the
//! common case carries no markup at all.

pub const DEFAULT_RATE: u16 = 100;
pub const DEFAULT_PITCH: i16 = 0;

pub const MIN_RATE: u16 = 50;
pub const MAX_RATE: u16 = 200;
pub const MIN_PITCH: i16 = -20;
pub const MAX_PITCH: i16 = 20;

/// Rate/pitch adjustments for a synthesis request. `rate` is an absolute
/// percentage (100 = normal speed); `pitch` is a signed percentage offset
/// from the voice default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prosody {
    pub rate: u16,
    pub pitch: i16,
}

impl Default for Prosody {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
        }
    }
}

impl Prosody {
    /// Build a prosody clamped to the supported ranges.
    pub fn new(rate: u16, pitch: i16) -> Self {
        Self {
            rate: rate.clamp(MIN_RATE, MAX_RATE),
            pitch: pitch.clamp(MIN_PITCH, MAX_PITCH),
        }
    }

    pub fn is_default(&self) -> bool {
        self.rate == DEFAULT_RATE && self.pitch == DEFAULT_PITCH
    }
}

/// Escape the characters the markup grammar reserves. Ampersand goes first
/// so already-produced entities are not escaped twice.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Build the payload sent to the synthesis service. Escaped text is
/// returned unwrapped when both parameters are at their defaults;
/// otherwise it is wrapped in a prosody envelope carrying only the
/// non-default attributes. Positive pitch gets an explicit leading `+`
/// (relative-change syntax); negative and zero values keep their natural
/// form.
pub fn build_payload(text: &str, prosody: &Prosody) -> String {
    let escaped = escape_markup(text);

    if prosody.is_default() {
        return escaped;
    }

    let mut attrs = String::new();
    if prosody.rate != DEFAULT_RATE {
        attrs.push_str(&format!(" rate=\"{}%\"", prosody.rate));
    }
    if prosody.pitch != DEFAULT_PITCH {
        if prosody.pitch > 0 {
            attrs.push_str(&format!(" pitch=\"+{}%\"", prosody.pitch));
        } else {
            attrs.push_str(&format!(" pitch=\"{}%\"", prosody.pitch));
        }
    }

    format!("<speak><prosody{attrs}>{escaped}</prosody></speak>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prosody_returns_escaped_text_unwrapped() {
        let payload = build_payload("Hi", &Prosody::default());
        assert_eq!(payload, "Hi");
    }

    #[test]
    fn escapes_reserved_characters() {
        let payload = build_payload("a & b < c > \"d\" 'e'", &Prosody::default());
        assert_eq!(payload, "a &amp; b &lt; c &gt; &quot;d&quot; &apos;e&apos;");
    }

    #[test]
    fn ampersand_escaped_before_other_entities() {
        // If '&' were escaped last, "&lt;" would become "&amp;lt;".
        assert_eq!(escape_markup("<&>"), "&lt;&amp;&gt;");
    }

    #[test]
    fn custom_rate_only_emits_rate_attribute() {
        let payload = build_payload("Hi", &Prosody::new(150, 0));
        assert_eq!(payload, "<speak><prosody rate=\"150%\">Hi</prosody></speak>");
    }

    #[test]
    fn positive_pitch_carries_explicit_sign() {
        let payload = build_payload("Hi", &Prosody::new(100, 5));
        assert_eq!(payload, "<speak><prosody pitch=\"+5%\">Hi</prosody></speak>");
    }

    #[test]
    fn negative_pitch_is_never_double_signed() {
        let payload = build_payload("Hi", &Prosody::new(100, -3));
        assert_eq!(payload, "<speak><prosody pitch=\"-3%\">Hi</prosody></speak>");
        assert!(!payload.contains("+-"));
        assert!(!payload.contains("--"));
    }

    #[test]
    fn both_attributes_emitted_when_both_custom() {
        let payload = build_payload("Hi", &Prosody::new(80, 10));
        assert_eq!(
            payload,
            "<speak><prosody rate=\"80%\" pitch=\"+10%\">Hi</prosody></speak>"
        );
    }

    #[test]
    fn prosody_new_clamps_to_supported_ranges() {
        let p = Prosody::new(500, -90);
        assert_eq!(p.rate, MAX_RATE);
        assert_eq!(p.pitch, MIN_PITCH);
    }
}
