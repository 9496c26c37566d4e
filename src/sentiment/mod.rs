pub mod lexicon;
pub mod remote;

use async_trait::async_trait;
use crate::models::chat::{ Sentiment, SentimentLabel };
use log::warn;
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use self::remote::RemoteSentimentClient;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("sentiment API key is not configured")]
    MissingCredential,
    #[error("invalid sentiment endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("sentiment request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sentiment service returned HTTP {0}")]
    Status(u16),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f32,
    #[serde(default)]
    pub confidence: f32,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
            confidence: 0.0,
        }
    }

    /// Pins score and confidence into [0, 1]; remote services are not trusted to.
    pub fn clamped(self) -> Self {
        Self {
            label: self.label,
            score: self.score.clamp(0.0, 1.0),
            confidence: self.confidence.clamp(0.0, 1.0),
        }
    }

    pub fn to_sentiment(&self) -> Sentiment {
        Sentiment {
            label: self.label,
            score: self.score,
        }
    }
}

#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, SentimentError>;

    fn name(&self) -> &'static str;
}

/// The offline keyword scorer behind the analyzer trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconAnalyzer;

#[async_trait]
impl SentimentAnalyzer for LexiconAnalyzer {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        Ok(lexicon::score(text))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentMode {
    Local,
    Remote,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseSentimentModeError {
    message: String,
}

impl fmt::Display for ParseSentimentModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseSentimentModeError {}

impl FromStr for SentimentMode {
    type Err = ParseSentimentModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "lexicon" => Ok(SentimentMode::Local),
            "remote" | "api" => Ok(SentimentMode::Remote),
            _ =>
                Err(ParseSentimentModeError {
                    message: format!("Invalid sentiment mode: '{}'", s),
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub mode: SentimentMode,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            mode: SentimentMode::Local,
            base_url: None,
            api_key: None,
        }
    }
}

pub fn new_analyzer(config: &SentimentConfig) -> Result<Arc<dyn SentimentAnalyzer>, SentimentError> {
    let analyzer: Arc<dyn SentimentAnalyzer> = match config.mode {
        SentimentMode::Local => Arc::new(LexiconAnalyzer),
        SentimentMode::Remote => Arc::new(RemoteSentimentClient::from_config(config)?),
    };
    Ok(analyzer)
}

/// Runs `analyzer`, falling back to the lexicon scorer on any failure.
pub async fn analyze_or_fallback(analyzer: &dyn SentimentAnalyzer, text: &str) -> SentimentResult {
    match analyzer.analyze(text).await {
        Ok(result) => result,
        Err(e) => {
            warn!("{} sentiment analysis failed, using lexicon: {}", analyzer.name(), e);
            lexicon::score(text)
        }
    }
}
