use log::{ debug, warn };
use serde::{ Deserialize, Serialize };
use super::VoiceError;

pub const UNSUPPORTED_SYNTHESIS: &str = "La síntesis de voz no es compatible con este navegador";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
    #[serde(default)]
    pub default: bool,
}

impl Voice {
    pub fn is_spanish(&self) -> bool {
        let lang = self.lang.to_lowercase();
        lang == "es" || lang.starts_with("es-") || lang.starts_with("es_")
    }
}

/// Identifies one utterance. The platform receives it inside the
/// [`Utterance`] and the host hands it back with every event it triggers.
pub type UtteranceId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub lang: String,
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Platform speech synthesizer. Completion is reported back through
/// [`SynthesisEvent`]s.
pub trait SynthesisPlatform {
    fn is_supported(&self) -> bool;
    fn speak(&mut self, utterance: &Utterance) -> Result<(), VoiceError>;
    fn cancel(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    Start,
    End,
    Error(String),
}

/// Text-to-speech state. Holds at most one utterance: speaking again cancels
/// the one in progress.
pub struct TextToSpeech<P: SynthesisPlatform> {
    platform: P,
    language: String,
    utterance: UtteranceId,
    speaking: bool,
    voices: Vec<Voice>,
    selected_voice: Option<Voice>,
    error: Option<String>,
}

impl<P: SynthesisPlatform> TextToSpeech<P> {
    pub fn new(platform: P, language: impl Into<String>) -> Self {
        Self {
            platform,
            language: language.into(),
            utterance: 0,
            speaking: false,
            voices: Vec::new(),
            selected_voice: None,
            error: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Id of the most recently spoken utterance; 0 before the first one.
    pub fn utterance(&self) -> UtteranceId {
        self.utterance
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        self.selected_voice.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Called when the platform finishes loading its voice list. Picks a
    /// Spanish voice as default unless the user already chose one.
    pub fn on_voices_changed(&mut self, voices: Vec<Voice>) {
        let keep_selection = self.selected_voice
            .as_ref()
            .map(|selected| voices.iter().any(|v| v.name == selected.name))
            .unwrap_or(false);
        if !keep_selection {
            self.selected_voice = voices.iter().find(|v| v.is_spanish()).cloned();
        }
        debug!("{} synthesis voices available", voices.len());
        self.voices = voices;
    }

    /// Selects a voice by name. Unknown names leave the selection unchanged.
    pub fn set_voice(&mut self, name: &str) -> bool {
        match self.voices.iter().find(|v| v.name == name) {
            Some(voice) => {
                self.selected_voice = Some(voice.clone());
                true
            }
            None => false,
        }
    }

    pub fn speak(&mut self, text: &str) {
        if !self.platform.is_supported() {
            self.error = Some(UNSUPPORTED_SYNTHESIS.to_string());
            return;
        }
        if text.trim().is_empty() {
            return;
        }
        if self.speaking {
            self.cancel();
        }
        self.utterance += 1;
        let utterance = Utterance {
            id: self.utterance,
            text: text.to_string(),
            lang: self.selected_voice
                .as_ref()
                .map(|v| v.lang.clone())
                .unwrap_or_else(|| self.language.clone()),
            voice: self.selected_voice.clone(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        };
        match self.platform.speak(&utterance) {
            Ok(()) => {
                self.error = None;
                self.speaking = true;
            }
            Err(e) => {
                warn!("Speech synthesis failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn cancel(&mut self) {
        self.platform.cancel();
        self.speaking = false;
    }

    /// Applies a platform event. A cancelled utterance still reports its end,
    /// so events for anything but the latest utterance are dropped.
    pub fn handle_event(&mut self, utterance: UtteranceId, event: SynthesisEvent) {
        if utterance != self.utterance {
            debug!("Ignoring {:?} from superseded utterance {}", event, utterance);
            return;
        }
        match event {
            SynthesisEvent::Start => {
                self.speaking = true;
            }
            SynthesisEvent::End => {
                self.speaking = false;
            }
            SynthesisEvent::Error(message) => {
                warn!("Speech synthesis error: {}", message);
                self.error = Some(message);
                self.speaking = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::UnsupportedPlatform;

    #[derive(Default)]
    struct FakeSynth {
        spoken: Vec<Utterance>,
        cancels: usize,
    }

    impl SynthesisPlatform for FakeSynth {
        fn is_supported(&self) -> bool {
            true
        }

        fn speak(&mut self, utterance: &Utterance) -> Result<(), VoiceError> {
            self.spoken.push(utterance.clone());
            Ok(())
        }

        fn cancel(&mut self) {
            self.cancels += 1;
        }
    }

    fn voice(name: &str, lang: &str) -> Voice {
        Voice { name: name.into(), lang: lang.into(), default: false }
    }

    #[test]
    fn speaking_twice_cancels_the_first_utterance() {
        let mut tts = TextToSpeech::new(FakeSynth::default(), "es-ES");
        tts.speak("hola");
        tts.speak("adiós");

        assert!(tts.is_speaking());
        assert_eq!(tts.platform.cancels, 1);
        assert_eq!(tts.platform.spoken.len(), 2);
        assert_eq!(tts.platform.spoken[1].text, "adiós");
    }

    #[test]
    fn spanish_voice_becomes_default() {
        let mut tts = TextToSpeech::new(FakeSynth::default(), "es-ES");
        tts.on_voices_changed(vec![voice("Samantha", "en-US"), voice("Mónica", "es-ES")]);

        assert_eq!(tts.selected_voice().map(|v| v.name.as_str()), Some("Mónica"));
        tts.speak("hola");
        assert_eq!(tts.platform.spoken[0].lang, "es-ES");
    }

    #[test]
    fn no_spanish_voice_means_no_default() {
        let mut tts = TextToSpeech::new(FakeSynth::default(), "es-ES");
        tts.on_voices_changed(vec![voice("Samantha", "en-US")]);
        assert!(tts.selected_voice().is_none());
    }

    #[test]
    fn user_selection_survives_voice_reload() {
        let mut tts = TextToSpeech::new(FakeSynth::default(), "es-ES");
        let voices = vec![voice("Mónica", "es-ES"), voice("Samantha", "en-US")];
        tts.on_voices_changed(voices.clone());
        assert!(tts.set_voice("Samantha"));
        assert!(!tts.set_voice("Nadie"));

        tts.on_voices_changed(voices);
        assert_eq!(tts.selected_voice().map(|v| v.name.as_str()), Some("Samantha"));
    }

    #[test]
    fn end_event_clears_speaking() {
        let mut tts = TextToSpeech::new(FakeSynth::default(), "es-ES");
        tts.speak("hola");
        tts.handle_event(tts.utterance(), SynthesisEvent::End);
        assert!(!tts.is_speaking());
    }

    #[test]
    fn end_of_cancelled_utterance_keeps_the_current_one_speaking() {
        let mut tts = TextToSpeech::new(FakeSynth::default(), "es-ES");
        tts.speak("primero");
        let first = tts.utterance();
        tts.speak("segundo");
        assert_eq!(tts.platform.cancels, 1);

        tts.handle_event(first, SynthesisEvent::End);
        assert!(tts.is_speaking());

        tts.speak("tercero");
        assert_eq!(tts.platform.cancels, 2);
        let ids: Vec<_> = tts.platform.spoken.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn unsupported_platform_reports_error() {
        let mut tts = TextToSpeech::new(UnsupportedPlatform, "es-ES");
        tts.speak("hola");
        assert!(!tts.is_speaking());
        assert_eq!(tts.error(), Some(UNSUPPORTED_SYNTHESIS));
    }
}
