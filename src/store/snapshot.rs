use crate::models::chat::ChatMessage;
use crate::models::preferences::UserPreferences;
use crate::store::storage::StorageError;
use serde::{ Serialize, Deserialize };
use std::collections::BTreeMap;

pub const SNAPSHOT_VERSION: u32 = 1;

/// The persisted subset of the conversation store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub conversation_history: BTreeMap<String, Vec<ChatMessage>>,
    #[serde(default)]
    pub user_preferences: UserPreferences,
    #[serde(default)]
    pub session_id: String,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a PersistedState,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

pub fn encode(state: &PersistedState) -> Result<String, StorageError> {
    let envelope = EnvelopeRef {
        state,
        version: SNAPSHOT_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes a stored envelope. Version 0 snapshots predate `expansionMode`
/// and `position`; serde defaults fill those in.
pub fn decode(payload: &str) -> Result<PersistedState, StorageError> {
    let envelope: Envelope = serde_json::from_str(payload)?;
    if envelope.version > SNAPSHOT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: envelope.version,
            supported: SNAPSHOT_VERSION,
        });
    }
    Ok(envelope.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::{ ExpansionMode, Theme };

    #[test]
    fn encode_wraps_state_with_current_version() {
        let state = PersistedState {
            session_id: "session-1".into(),
            ..Default::default()
        };
        let json: serde_json::Value = serde_json::from_str(&encode(&state).unwrap()).unwrap();

        assert_eq!(json["version"], SNAPSHOT_VERSION);
        assert_eq!(json["state"]["sessionId"], "session-1");
        assert!(json["state"]["conversationHistory"].is_object());
    }

    #[test]
    fn decode_accepts_version_zero_snapshot() {
        let payload = r#"{
            "state": {
                "messages": [],
                "conversationHistory": {},
                "userPreferences": { "theme": "light", "language": "es" },
                "sessionId": "session-42"
            }
        }"#;
        let state = decode(payload).unwrap();

        assert_eq!(state.session_id, "session-42");
        assert_eq!(state.user_preferences.theme, Theme::Light);
        assert_eq!(state.user_preferences.expansion_mode, ExpansionMode::Compact);
    }

    #[test]
    fn decode_rejects_future_versions() {
        let payload = r#"{"state":{},"version":99}"#;
        assert!(matches!(
            decode(payload),
            Err(StorageError::UnsupportedVersion { found: 99, .. })
        ));
    }
}
