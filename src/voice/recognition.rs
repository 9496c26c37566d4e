use log::{ debug, warn };
use super::VoiceError;

pub const UNSUPPORTED_RECOGNITION: &str =
    "El reconocimiento de voz no es compatible con este navegador";

/// Identifies one recognition session. The platform receives it on `start`
/// and the host hands it back with every event of that session.
pub type SessionId = u64;

/// Platform speech recognizer. Results arrive later as [`RecognitionEvent`]s.
pub trait RecognitionPlatform {
    fn is_supported(&self) -> bool;
    fn start(&mut self, session: SessionId, language: &str) -> Result<(), VoiceError>;
    fn stop(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Result {
        transcript: String,
        is_final: bool,
    },
    Error(String),
    End,
}

/// Speech-to-text state over a single platform recognizer.
pub struct SpeechToText<P: RecognitionPlatform> {
    platform: P,
    language: String,
    session: SessionId,
    listening: bool,
    final_transcript: String,
    interim_transcript: String,
    error: Option<String>,
}

impl<P: RecognitionPlatform> SpeechToText<P> {
    pub fn new(platform: P, language: impl Into<String>) -> Self {
        Self {
            platform,
            language: language.into(),
            session: 0,
            listening: false,
            final_transcript: String::new(),
            interim_transcript: String::new(),
            error: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Id of the most recently started session; 0 before the first start.
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Finalized text followed by whatever the recognizer is still guessing.
    pub fn transcript(&self) -> String {
        match (self.final_transcript.is_empty(), self.interim_transcript.is_empty()) {
            (_, true) => self.final_transcript.clone(),
            (true, false) => self.interim_transcript.clone(),
            (false, false) => format!("{} {}", self.final_transcript, self.interim_transcript),
        }
    }

    /// Starts a recognition session. Unsupported platforms only record an
    /// error; a second start while listening does nothing.
    pub fn start(&mut self) {
        if !self.platform.is_supported() {
            self.error = Some(UNSUPPORTED_RECOGNITION.to_string());
            return;
        }
        if self.listening {
            debug!("Speech recognition already active (session {})", self.session);
            return;
        }
        self.final_transcript.clear();
        self.interim_transcript.clear();
        self.error = None;
        self.session += 1;
        match self.platform.start(self.session, &self.language) {
            Ok(()) => {
                self.listening = true;
            }
            Err(e) => {
                warn!("Speech recognition failed to start: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn stop(&mut self) {
        if self.listening {
            self.platform.stop();
            self.listening = false;
        }
    }

    /// Applies a platform event. Events tagged with an older session are
    /// dropped: a stopped session may still report its end after a new one
    /// has started.
    pub fn handle_event(&mut self, session: SessionId, event: RecognitionEvent) {
        if session != self.session {
            debug!("Ignoring {:?} from stale recognition session {}", event, session);
            return;
        }
        match event {
            RecognitionEvent::Result { transcript, is_final } => {
                let text = transcript.trim();
                if is_final {
                    if !text.is_empty() {
                        if !self.final_transcript.is_empty() {
                            self.final_transcript.push(' ');
                        }
                        self.final_transcript.push_str(text);
                    }
                    self.interim_transcript.clear();
                } else {
                    self.interim_transcript = text.to_string();
                }
            }
            RecognitionEvent::Error(message) => {
                warn!("Speech recognition error: {}", message);
                self.error = Some(message);
                self.listening = false;
            }
            RecognitionEvent::End => {
                self.listening = false;
            }
        }
    }

    /// Hands over the finalized transcript once the session has ended.
    pub fn take_final_transcript(&mut self) -> Option<String> {
        if self.listening || self.final_transcript.is_empty() {
            return None;
        }
        self.interim_transcript.clear();
        Some(std::mem::take(&mut self.final_transcript))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::UnsupportedPlatform;

    #[derive(Default)]
    struct FakeRecognizer {
        starts: Vec<(SessionId, String)>,
        stops: usize,
    }

    impl RecognitionPlatform for FakeRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        fn start(&mut self, session: SessionId, language: &str) -> Result<(), VoiceError> {
            self.starts.push((session, language.to_string()));
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn final_result(text: &str) -> RecognitionEvent {
        RecognitionEvent::Result { transcript: text.into(), is_final: true }
    }

    #[test]
    fn unsupported_start_sets_error_only() {
        let mut stt = SpeechToText::new(UnsupportedPlatform, "es-ES");
        stt.start();

        assert!(!stt.is_supported());
        assert!(!stt.is_listening());
        assert_eq!(stt.error(), Some(UNSUPPORTED_RECOGNITION));
    }

    #[test]
    fn second_start_is_ignored_while_listening() {
        let mut stt = SpeechToText::new(FakeRecognizer::default(), "es-ES");
        stt.start();
        stt.start();

        assert!(stt.is_listening());
        assert_eq!(stt.platform.starts, vec![(1, "es-ES".to_string())]);
    }

    #[test]
    fn transcript_accumulates_final_results() {
        let mut stt = SpeechToText::new(FakeRecognizer::default(), "es-ES");
        stt.start();
        let session = stt.session();
        stt.handle_event(session, final_result("quiero ver"));
        stt.handle_event(session, RecognitionEvent::Result {
            transcript: "los pre".into(),
            is_final: false,
        });
        assert_eq!(stt.transcript(), "quiero ver los pre");

        stt.handle_event(session, final_result("los precios"));
        assert_eq!(stt.transcript(), "quiero ver los precios");

        assert!(stt.take_final_transcript().is_none());
        stt.handle_event(session, RecognitionEvent::End);
        assert_eq!(stt.take_final_transcript().as_deref(), Some("quiero ver los precios"));
        assert_eq!(stt.transcript(), "");
    }

    #[test]
    fn error_event_ends_session() {
        let mut stt = SpeechToText::new(FakeRecognizer::default(), "es-ES");
        stt.start();
        stt.handle_event(stt.session(), RecognitionEvent::Error("no-speech".into()));

        assert!(!stt.is_listening());
        assert_eq!(stt.error(), Some("no-speech"));
    }

    #[test]
    fn stop_only_reaches_platform_when_listening() {
        let mut stt = SpeechToText::new(FakeRecognizer::default(), "es-ES");
        stt.stop();
        stt.start();
        stt.stop();
        stt.stop();

        assert_eq!(stt.platform.stops, 1);
    }

    #[test]
    fn late_end_from_stopped_session_does_not_end_the_new_one() {
        let mut stt = SpeechToText::new(FakeRecognizer::default(), "es-ES");
        stt.start();
        let first = stt.session();
        stt.stop();
        stt.start();
        let second = stt.session();
        assert_ne!(first, second);

        stt.handle_event(second, final_result("hola"));
        stt.handle_event(first, RecognitionEvent::End);
        assert!(stt.is_listening());
        assert!(stt.take_final_transcript().is_none());

        stt.start();
        assert_eq!(stt.platform.starts.len(), 2);

        stt.handle_event(first, final_result("ruido"));
        stt.handle_event(second, RecognitionEvent::End);
        assert_eq!(stt.take_final_transcript().as_deref(), Some("hola"));
    }

    #[test]
    fn started_sessions_use_current_language() {
        let mut stt = SpeechToText::new(FakeRecognizer::default(), "es-ES");
        stt.set_language("en-US");
        stt.start();
        assert_eq!(stt.platform.starts[0].1, "en-US");
    }
}
