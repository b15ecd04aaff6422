use utter_core::speech::markup::{Prosody, MAX_PITCH, MAX_RATE, MIN_PITCH, MIN_RATE};
use utter_core::speech::tts::types::{find_voice, Voice, VOICES};
use utter_core::Settings;

/// What the app is doing right now. `Previewing` spans the preview request
/// and its playback, scoped to the voice being previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Loading,
    Playing,
    Previewing(&'static str),
}

/// The last successful generation, kept encoded for export.
pub struct LastAudio {
    pub base64: String,
    pub voice: &'static str,
}

pub struct TuiState {
    /// Index into [`VOICES`].
    pub selected_voice: usize,

    pub rate: u16,
    pub pitch: i16,

    pub activity: Activity,

    /// Dismissible error line (Esc clears it).
    pub error: Option<String>,

    /// Informational line, e.g. the path of a saved WAV.
    pub notice: Option<String>,

    pub last_audio: Option<LastAudio>,

    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(settings: &Settings) -> Self {
        let selected_voice = find_voice(&settings.default_voice)
            .and_then(|v| VOICES.iter().position(|c| c.name == v.name))
            .unwrap_or(0);

        Self {
            selected_voice,
            rate: settings.rate.clamp(MIN_RATE, MAX_RATE),
            pitch: settings.pitch.clamp(MIN_PITCH, MAX_PITCH),
            activity: Activity::Idle,
            error: None,
            notice: None,
            last_audio: None,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn selected(&self) -> &'static Voice {
        &VOICES[self.selected_voice]
    }

    pub fn cycle_voice(&mut self) {
        self.selected_voice = (self.selected_voice + 1) % VOICES.len();
    }

    pub fn adjust_rate(&mut self, delta: i16) {
        let rate = (self.rate as i16).saturating_add(delta);
        self.rate = rate.clamp(MIN_RATE as i16, MAX_RATE as i16) as u16;
    }

    pub fn adjust_pitch(&mut self, delta: i16) {
        self.pitch = self.pitch.saturating_add(delta).clamp(MIN_PITCH, MAX_PITCH);
    }

    pub fn prosody(&self) -> Prosody {
        Prosody::new(self.rate, self.pitch)
    }

    /// Gate and start a generation request. Returns true when the caller
    /// should dispatch to the service; rejections either set an error
    /// (empty text) or are silent (already busy).
    pub fn begin_generation(&mut self, text: &str) -> bool {
        if self.activity != Activity::Idle {
            return false;
        }
        if text.trim().is_empty() {
            self.error = Some("Please enter some text to generate speech.".to_string());
            return false;
        }
        self.error = None;
        self.notice = None;
        self.activity = Activity::Loading;
        true
    }

    /// Gate and start a preview of the selected voice. Mutually exclusive
    /// with any other in-flight or playing activity.
    pub fn begin_preview(&mut self) -> Option<&'static Voice> {
        if self.activity != Activity::Idle {
            return None;
        }
        let voice = self.selected();
        self.error = None;
        self.notice = None;
        self.activity = Activity::Previewing(voice.name);
        Some(voice)
    }

    /// A generation decoded and started playing.
    pub fn playback_started(&mut self) {
        if self.activity == Activity::Loading {
            self.activity = Activity::Playing;
        }
    }

    /// Playback ended, by natural completion or manual stop.
    pub fn playback_done(&mut self) {
        self.activity = Activity::Idle;
    }

    /// A request or playback attempt failed; clear in-progress flags and
    /// surface the message.
    pub fn fail(&mut self, message: String) {
        self.activity = Activity::Idle;
        self.error = Some(message);
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.activity, Activity::Loading | Activity::Previewing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TuiState {
        TuiState::new(&Settings::default())
    }

    #[test]
    fn default_settings_preselect_zephyr() {
        assert_eq!(state().selected().name, "Zephyr");
    }

    #[test]
    fn empty_text_sets_error_and_stays_idle() {
        let mut s = state();
        assert!(!s.begin_generation("   \t\n"));
        assert_eq!(s.activity, Activity::Idle);
        assert!(s.error.is_some());
    }

    #[test]
    fn generation_moves_idle_to_loading_to_playing_to_idle() {
        let mut s = state();
        assert!(s.begin_generation("Hi"));
        assert_eq!(s.activity, Activity::Loading);
        s.playback_started();
        assert_eq!(s.activity, Activity::Playing);
        s.playback_done();
        assert_eq!(s.activity, Activity::Idle);
    }

    #[test]
    fn requests_are_rejected_while_one_is_in_flight() {
        let mut s = state();
        assert!(s.begin_generation("Hi"));
        assert!(!s.begin_generation("Hi again"));
        assert!(s.begin_preview().is_none());
    }

    #[test]
    fn preview_is_scoped_to_the_selected_voice() {
        let mut s = state();
        s.cycle_voice();
        let voice = s.begin_preview().unwrap();
        assert_eq!(s.activity, Activity::Previewing(voice.name));
        // A second preview is refused while the first is in flight.
        assert!(s.begin_preview().is_none());
    }

    #[test]
    fn preview_is_refused_while_a_generation_plays() {
        let mut s = state();
        assert!(s.begin_generation("Hi"));
        s.playback_started();
        assert!(s.begin_preview().is_none());
        assert_eq!(s.activity, Activity::Playing);
    }

    #[test]
    fn failure_clears_flags_and_surfaces_the_message() {
        let mut s = state();
        assert!(s.begin_generation("Hi"));
        s.fail("boom".to_string());
        assert_eq!(s.activity, Activity::Idle);
        assert_eq!(s.error.as_deref(), Some("boom"));
        // Recovered: generating again works.
        assert!(s.begin_generation("Hi"));
        assert!(s.error.is_none());
    }

    #[test]
    fn rate_and_pitch_clamp_to_their_ranges() {
        let mut s = state();
        for _ in 0..100 {
            s.adjust_rate(5);
            s.adjust_pitch(1);
        }
        assert_eq!(s.rate, MAX_RATE);
        assert_eq!(s.pitch, MAX_PITCH);
        for _ in 0..100 {
            s.adjust_rate(-5);
            s.adjust_pitch(-1);
        }
        assert_eq!(s.rate, MIN_RATE);
        assert_eq!(s.pitch, MIN_PITCH);
    }

    #[test]
    fn cycling_voices_wraps_around() {
        let mut s = state();
        let start = s.selected_voice;
        for _ in 0..VOICES.len() {
            s.cycle_voice();
        }
        assert_eq!(s.selected_voice, start);
    }
}
