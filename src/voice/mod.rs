pub mod recognition;
pub mod synthesis;

use thiserror::Error;
use self::synthesis::Utterance;

pub use self::recognition::RecognitionPlatform;
pub use self::synthesis::SynthesisPlatform;

pub use recognition::{ RecognitionEvent, SessionId, SpeechToText };
pub use synthesis::{ SynthesisEvent, TextToSpeech, UtteranceId, Voice };

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("speech API not supported on this platform")]
    Unsupported,
    #[error("speech platform error: {0}")]
    Platform(String),
}

impl<T: RecognitionPlatform + ?Sized> RecognitionPlatform for Box<T> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn start(&mut self, session: SessionId, language: &str) -> Result<(), VoiceError> {
        (**self).start(session, language)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

impl<T: SynthesisPlatform + ?Sized> SynthesisPlatform for Box<T> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), VoiceError> {
        (**self).speak(utterance)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }
}

/// Platform with no speech support at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl RecognitionPlatform for UnsupportedPlatform {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&mut self, _session: SessionId, _language: &str) -> Result<(), VoiceError> {
        Err(VoiceError::Unsupported)
    }

    fn stop(&mut self) {}
}

impl SynthesisPlatform for UnsupportedPlatform {
    fn is_supported(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: &Utterance) -> Result<(), VoiceError> {
        Err(VoiceError::Unsupported)
    }

    fn cancel(&mut self) {}
}

/// Terminal "speaker": prints utterances instead of voicing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSpeaker;

impl SynthesisPlatform for ConsoleSpeaker {
    fn is_supported(&self) -> bool {
        true
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), VoiceError> {
        println!("[voz:{}] {}", utterance.lang, utterance.text);
        Ok(())
    }

    fn cancel(&mut self) {}
}
