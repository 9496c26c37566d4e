pub mod assistant;
pub mod cli;
pub mod config;
pub mod models;
pub mod navigation;
pub mod sentiment;
pub mod store;
pub mod voice;

use assistant::{ BoxedSynthesizer, ChatAssistant };
use cli::Args;
use config::page;
use log::info;
use models::chat::{ ChatMessage, Role };
use navigation::PageDocument;
use sentiment::{ new_analyzer, SentimentConfig };
use std::error::Error;
use std::sync::Arc;
use store::storage::{ FileStorage, MemoryStorage, StateStorage };
use store::{ ConversationStore, StoreConfig, DEFAULT_WELCOME };
use tokio::io::{ AsyncBufReadExt, BufReader };
use voice::{ ConsoleSpeaker, UnsupportedPlatform };

fn build_assistant(args: &Args) -> Result<ChatAssistant, Box<dyn Error + Send + Sync>> {
    let storage: Arc<dyn StateStorage> = if args.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(FileStorage::new(&args.storage_dir))
    };
    let store = ConversationStore::new(storage, StoreConfig {
        namespace: args.storage_namespace.clone(),
        welcome_message: args.welcome_message.clone().unwrap_or_else(|| DEFAULT_WELCOME.to_string()),
    });

    let sentiment_config = SentimentConfig {
        mode: args.sentiment_mode
            .parse()
            .map_err(|e| format!("Invalid sentiment mode: {}", e))?,
        base_url: args.sentiment_base_url.clone(),
        api_key: Some(args.sentiment_api_key.clone()).filter(|k| !k.is_empty()),
    };
    let analyzer = new_analyzer(&sentiment_config)?;

    let layout = match &args.page_layout_path {
        Some(path) => page::load_layout(path)?,
        None => page::default_layout(),
    };

    let synthesizer: BoxedSynthesizer = if args.mute_voice {
        Box::new(UnsupportedPlatform)
    } else {
        Box::new(ConsoleSpeaker)
    };

    Ok(
        ChatAssistant::new(
            store,
            analyzer,
            PageDocument::from_layout(layout),
            Box::new(UnsupportedPlatform),
            synthesizer
        )
    )
}

fn print_message(message: &ChatMessage) {
    let who = match message.role {
        Role::User => "tú",
        Role::Assistant => "asistente",
        Role::System => "sistema",
    };
    println!("[{}] {}", who, message.content);
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Storage: {}", if args.ephemeral { "memory" } else { args.storage_dir.as_str() });
    info!("Storage Namespace: {}", args.storage_namespace);
    info!("Sentiment Mode: {}", args.sentiment_mode);
    info!(
        "Sentiment Base URL: {}",
        args.sentiment_base_url.as_deref().unwrap_or("adapter default")
    );
    info!("Page Layout: {}", args.page_layout_path.as_deref().unwrap_or("built-in"));
    info!("-------------------------");

    let mut assistant = build_assistant(&args)?;
    assistant.store_mut().set_open(true);
    for message in assistant.store().messages() {
        print_message(message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed == "/salir" || trimmed == "/exit" {
            break;
        }
        assistant.store_mut().set_input_value(trimmed);
        match assistant.submit(trimmed).await {
            Some(reply) => {
                println!("[asistente] {}", reply.content);
                let navigation = assistant.store().navigation();
                if let Some(active) = &navigation.active_section {
                    info!("Active section: {} (visible: {:?})", active, navigation.visible_sections);
                }
            }
            None => continue,
        }
    }

    assistant.store_mut().set_open(false);
    if assistant.store().messages().len() > 1 {
        assistant.store_mut().save_current_session();
    } else {
        info!("Nothing to archive for session {}", assistant.store().session_id());
    }
    Ok(())
}
