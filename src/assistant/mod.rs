pub mod commands;
pub mod replies;

use crate::models::chat::{ NewMessage, SentimentLabel };
use crate::models::preferences::{ PreferencesPatch, Theme };
use crate::navigation::{ scroll_to_section, PageDocument, ScrollSpy };
use crate::sentiment::{ analyze_or_fallback, SentimentAnalyzer };
use crate::store::{ session_started_at, ConversationStore };
use crate::voice::{
    RecognitionEvent,
    RecognitionPlatform,
    SessionId,
    SpeechToText,
    SynthesisEvent,
    SynthesisPlatform,
    TextToSpeech,
    UtteranceId,
    Voice,
};
use commands::{ Command, HELP_TEXT };
use log::{ debug, info };
use std::sync::Arc;

pub type BoxedRecognizer = Box<dyn RecognitionPlatform + Send>;
pub type BoxedSynthesizer = Box<dyn SynthesisPlatform + Send>;

/// What a submission produced, for the host to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    /// False for session-level commands whose output must not enter the
    /// transcript (it would break the welcome-only reset).
    pub recorded: bool,
}

/// Drives the chat widget: owns the store, the page and the voice adapters,
/// and routes each submission to a command or to a canned reply.
pub struct ChatAssistant {
    store: ConversationStore,
    analyzer: Arc<dyn SentimentAnalyzer>,
    document: PageDocument,
    scroll_spy: ScrollSpy,
    speech_to_text: SpeechToText<BoxedRecognizer>,
    text_to_speech: TextToSpeech<BoxedSynthesizer>,
}

impl ChatAssistant {
    pub fn new(
        store: ConversationStore,
        analyzer: Arc<dyn SentimentAnalyzer>,
        document: PageDocument,
        recognizer: BoxedRecognizer,
        synthesizer: BoxedSynthesizer
    ) -> Self {
        let language = voice_language(&store.user_preferences().language);
        let mut assistant = Self {
            store,
            analyzer,
            document,
            scroll_spy: ScrollSpy::default(),
            speech_to_text: SpeechToText::new(recognizer, language.clone()),
            text_to_speech: TextToSpeech::new(synthesizer, language),
        };
        assistant.refresh_navigation();
        assistant
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn speech_to_text(&self) -> &SpeechToText<BoxedRecognizer> {
        &self.speech_to_text
    }

    pub fn text_to_speech(&self) -> &TextToSpeech<BoxedSynthesizer> {
        &self.text_to_speech
    }

    /// Re-derives the navigation state after the page scrolled.
    pub fn refresh_navigation(&mut self) {
        let state = self.scroll_spy.observe(&self.document);
        self.store.set_navigation(state);
    }

    pub fn scroll_page_to(&mut self, y: f64) {
        self.document.scroll_to(y);
        self.refresh_navigation();
    }

    /// Handles one line typed (or dictated) into the widget. Blank input is
    /// ignored and yields `None`.
    pub async fn submit(&mut self, input: &str) -> Option<Reply> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.store.set_input_value("");

        let reply = match commands::parse(text) {
            Some(command) => self.run_command(text, command).await,
            None => self.answer(text).await,
        };
        if reply.recorded && self.store.user_preferences().voice_enabled {
            self.text_to_speech.speak(&reply.content);
        }
        Some(reply)
    }

    async fn tagged_user_message(&self, text: &str) -> (NewMessage, SentimentLabel) {
        let sentiment = analyze_or_fallback(self.analyzer.as_ref(), text).await;
        debug!(
            "Message sentiment: {} (score {:.2}, confidence {:.2})",
            sentiment.label,
            sentiment.score,
            sentiment.confidence
        );
        (NewMessage::user(text).with_sentiment(sentiment.to_sentiment()), sentiment.label)
    }

    async fn answer(&mut self, text: &str) -> Reply {
        self.store.set_is_loading(true);
        let (message, label) = self.tagged_user_message(text).await;
        self.store.add_message(message);

        let mut content = String::new();
        if label == SentimentLabel::Negative {
            content.push_str(replies::NEGATIVE_PREFIX);
        }
        content.push_str(replies::reply_for(text));
        self.store.add_message(NewMessage::assistant(content.clone()));
        self.store.set_is_loading(false);

        Reply { content, recorded: true }
    }

    async fn record_exchange(&mut self, text: &str, content: String) -> Reply {
        let (message, _) = self.tagged_user_message(text).await;
        self.store.add_message(message);
        self.store.add_message(NewMessage::system(content.clone()));
        Reply { content, recorded: true }
    }

    fn unrecorded(content: String) -> Reply {
        Reply { content, recorded: false }
    }

    /// Applies a preference patch and keeps the speech engines on the
    /// preferred language.
    pub fn update_preferences(&mut self, patch: PreferencesPatch) {
        self.store.update_user_preferences(patch);
        let language = voice_language(&self.store.user_preferences().language);
        if language != self.speech_to_text.language() {
            info!("Speech language set to {}", language);
            self.speech_to_text.set_language(language.clone());
            self.text_to_speech.set_language(language);
        }
    }

    fn history_listing(&self) -> String {
        let ids = self.store.session_ids();
        if ids.is_empty() {
            return "Todavía no hay conversaciones guardadas.".to_string();
        }
        let lines: Vec<String> = ids
            .iter()
            .map(|id| {
                let count = self.store.conversation_history().get(id).map_or(0, |m| m.len());
                match session_started_at(id) {
                    Some(started) =>
                        format!("{} ({}, {} mensajes)", id, started.format("%Y-%m-%d %H:%M"), count),
                    None => format!("{} ({} mensajes)", id, count),
                }
            })
            .collect();
        format!("Conversaciones guardadas:\n{}", lines.join("\n"))
    }

    async fn run_command(&mut self, text: &str, command: Command) -> Reply {
        info!("Running chat command {:?}", command);
        match command {
            Command::GoTo(section) if section.is_empty() => {
                self.record_exchange(
                    text,
                    "Indica a qué sección quieres ir, por ejemplo: /ir precios".into()
                ).await
            }
            Command::GoTo(section) => {
                let content = if scroll_to_section(&mut self.document, &section) {
                    self.refresh_navigation();
                    format!("Te llevé a la sección «{}».", section)
                } else {
                    format!("No encontré la sección «{}» en esta página.", section)
                };
                self.record_exchange(text, content).await
            }
            Command::NewSession => {
                let id = self.store.start_new_session().to_string();
                Self::unrecorded(format!("Nueva conversación iniciada ({}).", id))
            }
            Command::Clear => {
                self.store.clear_messages();
                Self::unrecorded("Conversación borrada.".into())
            }
            Command::History => Self::unrecorded(self.history_listing()),
            Command::Load(id) => {
                if self.store.load_session(&id) {
                    Self::unrecorded(format!("Conversación {} restaurada.", id))
                } else {
                    Self::unrecorded(format!("No existe la conversación «{}».", id))
                }
            }
            Command::Theme(name) => {
                let content = match name.parse::<Theme>() {
                    Ok(theme) => {
                        self.update_preferences(PreferencesPatch {
                            theme: Some(theme),
                            ..Default::default()
                        });
                        format!("Tema cambiado a {}.", theme)
                    }
                    Err(_) => "Temas disponibles: claro, oscuro, sistema.".to_string(),
                };
                self.record_exchange(text, content).await
            }
            Command::Voice(arg) => {
                let enabled = match arg.to_lowercase().as_str() {
                    "on" | "si" | "sí" | "activar" => Some(true),
                    "off" | "no" | "desactivar" => Some(false),
                    _ => None,
                };
                let content = match enabled {
                    Some(enabled) => {
                        if !enabled {
                            self.text_to_speech.cancel();
                        }
                        self.update_preferences(PreferencesPatch {
                            voice_enabled: Some(enabled),
                            ..Default::default()
                        });
                        if enabled {
                            "Respuestas habladas activadas.".to_string()
                        } else {
                            "Respuestas habladas desactivadas.".to_string()
                        }
                    }
                    None => "Usa /voz on o /voz off.".to_string(),
                };
                self.record_exchange(text, content).await
            }
            Command::Help => self.record_exchange(text, HELP_TEXT.to_string()).await,
            Command::Unknown(name) => {
                let content = format!("No conozco el comando /{}.\n{}", name, HELP_TEXT);
                self.record_exchange(text, content).await
            }
        }
    }

    pub fn start_listening(&mut self) {
        self.speech_to_text.start();
    }

    pub fn stop_listening(&mut self) {
        self.speech_to_text.stop();
    }

    pub fn handle_recognition_event(&mut self, session: SessionId, event: RecognitionEvent) {
        self.speech_to_text.handle_event(session, event);
    }

    pub fn handle_synthesis_event(&mut self, utterance: UtteranceId, event: SynthesisEvent) {
        self.text_to_speech.handle_event(utterance, event);
    }

    pub fn on_voices_changed(&mut self, voices: Vec<Voice>) {
        self.text_to_speech.on_voices_changed(voices);
    }

    /// Feeds a finished dictation into the normal submission path.
    pub async fn submit_voice_transcript(&mut self) -> Option<Reply> {
        let transcript = self.speech_to_text.take_final_transcript()?;
        self.submit(&transcript).await
    }
}

/// Maps the preference language to a BCP-47 tag for the speech engines.
fn voice_language(language: &str) -> String {
    match language {
        "es" => "es-ES".to_string(),
        "en" => "en-US".to_string(),
        other => other.to_string(),
    }
}
