pub mod snapshot;
pub mod storage;

use crate::models::chat::{ ChatMessage, NewMessage, Role };
use crate::models::navigation::NavigationState;
use crate::models::preferences::{ PreferencesPatch, UserPreferences };
use chrono::{ DateTime, TimeZone, Utc };
use log::{ debug, error, info, warn };
use snapshot::PersistedState;
use std::collections::BTreeMap;
use std::sync::Arc;
use storage::StateStorage;
use uuid::Uuid;

pub const DEFAULT_NAMESPACE: &str = "chatbot-storage";
pub const WELCOME_MESSAGE_ID: &str = "welcome";
pub const DEFAULT_WELCOME: &str =
    "¡Hola! Soy el asistente virtual. ¿En qué puedo ayudarte hoy? Escribe /ayuda para ver los comandos.";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub namespace: String,
    pub welcome_message: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            welcome_message: DEFAULT_WELCOME.to_string(),
        }
    }
}

/// Owns the chat widget state. Every mutation of the persisted subset
/// (messages, history, preferences, session id) is written through to storage.
pub struct ConversationStore {
    storage: Arc<dyn StateStorage>,
    namespace: String,
    welcome: ChatMessage,
    is_open: bool,
    messages: Vec<ChatMessage>,
    input_value: String,
    is_loading: bool,
    session_id: String,
    conversation_history: BTreeMap<String, Vec<ChatMessage>>,
    user_preferences: UserPreferences,
    navigation: NavigationState,
}

impl ConversationStore {
    /// Builds the store and rehydrates the persisted subset from `storage`.
    /// Unreadable snapshots are logged and replaced by fresh state.
    pub fn new(storage: Arc<dyn StateStorage>, config: StoreConfig) -> Self {
        let welcome = ChatMessage {
            id: WELCOME_MESSAGE_ID.to_string(),
            role: Role::Assistant,
            content: config.welcome_message,
            timestamp: Utc::now(),
            sentiment: None,
            avatar: None,
        };
        let mut store = Self {
            storage,
            namespace: config.namespace,
            welcome: welcome.clone(),
            is_open: false,
            messages: vec![welcome],
            input_value: String::new(),
            is_loading: false,
            session_id: String::new(),
            conversation_history: BTreeMap::new(),
            user_preferences: UserPreferences::default(),
            navigation: NavigationState::default(),
        };
        store.session_id = store.next_session_id();
        store.rehydrate();
        store
    }

    fn rehydrate(&mut self) {
        let payload = match self.storage.load(&self.namespace) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("No persisted chat state under '{}'", self.namespace);
                return;
            }
            Err(e) => {
                warn!("Failed to read persisted chat state: {}", e);
                return;
            }
        };
        let state = match snapshot::decode(&payload) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring persisted chat state under '{}': {}", self.namespace, e);
                return;
            }
        };

        let mut messages = state.messages;
        match messages.first() {
            Some(first) if first.id == WELCOME_MESSAGE_ID => {
                self.welcome = first.clone();
            }
            _ => messages.insert(0, self.welcome.clone()),
        }
        self.messages = messages;
        self.conversation_history = state.conversation_history;
        self.user_preferences = state.user_preferences;
        if !state.session_id.is_empty() {
            self.session_id = state.session_id;
        }
        info!(
            "Restored chat session {} ({} messages, {} archived sessions)",
            self.session_id,
            self.messages.len(),
            self.conversation_history.len()
        );
    }

    fn persist(&self) {
        let state = PersistedState {
            messages: self.messages.clone(),
            conversation_history: self.conversation_history.clone(),
            user_preferences: self.user_preferences.clone(),
            session_id: self.session_id.clone(),
        };
        let result = snapshot
            ::encode(&state)
            .and_then(|payload| self.storage.save(&self.namespace, &payload));
        if let Err(e) = result {
            error!("Failed to persist chat state under '{}': {}", self.namespace, e);
        }
    }

    fn generate_message_id(now: DateTime<Utc>) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("msg-{}-{}", now.timestamp_millis(), &suffix[..9])
    }

    fn is_session_id_taken(&self, id: &str) -> bool {
        id == self.session_id || self.conversation_history.contains_key(id)
    }

    /// `session-<millis>`, bumped forward until it collides with neither the
    /// current id nor an archived one.
    fn next_session_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let candidate = format!("session-{}", millis);
            if !self.is_session_id_taken(&candidate) {
                return candidate;
            }
            millis += 1;
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn welcome_message(&self) -> &ChatMessage {
        &self.welcome
    }

    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn conversation_history(&self) -> &BTreeMap<String, Vec<ChatMessage>> {
        &self.conversation_history
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.conversation_history.keys().cloned().collect()
    }

    pub fn user_preferences(&self) -> &UserPreferences {
        &self.user_preferences
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    /// Appends a message. Order follows call order; the random id suffix keeps
    /// ids distinct when two calls land on the same millisecond.
    pub fn add_message(&mut self, message: NewMessage) -> &ChatMessage {
        let now = Utc::now();
        let message = ChatMessage {
            id: Self::generate_message_id(now),
            role: message.role,
            content: message.content,
            timestamp: now,
            sentiment: message.sentiment,
            avatar: message.avatar,
        };
        debug!("Appending {} message {}", message.role, message.id);
        self.messages.push(message);
        self.persist();
        let last = self.messages.len() - 1;
        &self.messages[last]
    }

    pub fn clear_messages(&mut self) {
        self.messages = vec![self.welcome.clone()];
        self.persist();
    }

    pub fn set_input_value(&mut self, value: impl Into<String>) {
        self.input_value = value.into();
    }

    pub fn set_is_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn update_user_preferences(&mut self, patch: PreferencesPatch) {
        self.user_preferences.merge(patch);
        self.persist();
    }

    /// Archives the current session, then starts a fresh one holding only the
    /// welcome message.
    pub fn start_new_session(&mut self) -> &str {
        self.conversation_history.insert(self.session_id.clone(), self.messages.clone());
        let previous = std::mem::take(&mut self.session_id);
        self.session_id = self.next_session_id();
        self.messages = vec![self.welcome.clone()];
        self.persist();
        info!("Archived session {} and started {}", previous, self.session_id);
        &self.session_id
    }

    pub fn save_current_session(&mut self) {
        self.conversation_history.insert(self.session_id.clone(), self.messages.clone());
        self.persist();
    }

    /// Switches to an archived session. Unknown ids leave the state untouched;
    /// the return value tells whether anything changed.
    pub fn load_session(&mut self, session_id: &str) -> bool {
        let Some(messages) = self.conversation_history.get(session_id) else {
            debug!("Session {} not found in history", session_id);
            return false;
        };
        self.messages = messages.clone();
        self.session_id = session_id.to_string();
        self.persist();
        true
    }

    pub fn set_navigation(&mut self, navigation: NavigationState) {
        self.navigation = navigation;
    }

    /// Drops the persisted record and returns every field to its default.
    pub fn reset(&mut self) {
        if let Err(e) = self.storage.remove(&self.namespace) {
            error!("Failed to remove persisted chat state: {}", e);
        }
        self.is_open = false;
        self.messages = vec![self.welcome.clone()];
        self.input_value.clear();
        self.is_loading = false;
        self.conversation_history.clear();
        self.user_preferences = UserPreferences::default();
        self.navigation = NavigationState::default();
        self.session_id = self.next_session_id();
    }
}

/// Parses the millisecond stamp out of a `session-<millis>` id.
pub fn session_started_at(session_id: &str) -> Option<DateTime<Utc>> {
    let millis = session_id.strip_prefix("session-")?.parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}
