use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Storage Args ---
    /// Directory holding persisted chat state (one JSON file per namespace).
    #[arg(long, env = "CHAT_STORAGE_DIR", default_value = ".landing-chat")]
    pub storage_dir: String,

    /// Namespace of the persisted chat record.
    #[arg(long, env = "CHAT_STORAGE_NAMESPACE", default_value = "chatbot-storage")]
    pub storage_namespace: String,

    /// Keep state in memory only; nothing is written to disk.
    #[arg(long, env = "CHAT_EPHEMERAL", default_value = "false")]
    pub ephemeral: bool,

    /// Welcome message shown as the first message of every session.
    #[arg(long, env = "CHAT_WELCOME_MESSAGE")] // No default, the store has its own
    pub welcome_message: Option<String>,

    // --- Sentiment Args ---
    /// Sentiment analyzer (local, remote). Remote falls back to local on failure.
    #[arg(long, env = "SENTIMENT_MODE", default_value = "local")]
    pub sentiment_mode: String,

    /// Base URL of the sentiment service (e.g., http://localhost:3000)
    #[arg(long, env = "SENTIMENT_BASE_URL")]
    pub sentiment_base_url: Option<String>,

    /// API key for the sentiment service. Required when SENTIMENT_MODE=remote.
    #[arg(long, env = "SENTIMENT_API_KEY", default_value = "")]
    pub sentiment_api_key: String,

    // --- Page Args ---
    /// Path to the page layout JSON. The built-in landing page layout is used when unset.
    #[arg(long, env = "PAGE_LAYOUT_PATH")]
    pub page_layout_path: Option<String>,

    // --- General App Args ---
    /// Never print spoken replies, even when voice output is enabled in preferences.
    #[arg(long, env = "MUTE_VOICE", default_value = "false")]
    pub mute_voice: bool,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
