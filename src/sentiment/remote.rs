use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::Serialize;
use url::Url;
use super::{ SentimentAnalyzer, SentimentConfig, SentimentError, SentimentResult };

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const ANALYZE_ROUTE: &str = "api/analyze-sentiment";

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Client for the external sentiment endpoint.
#[derive(Debug, Clone)]
pub struct RemoteSentimentClient {
    http: HttpClient,
    endpoint: Url,
    api_key: Option<String>,
}

impl RemoteSentimentClient {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Result<Self, SentimentError> {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint = Self::endpoint_for(&base).map_err(|e|
            SentimentError::InvalidEndpoint(format!("{}: {}", base, e))
        )?;

        Ok(Self {
            http: HttpClient::new(),
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Joins the route under the base URL, keeping any path prefix: both
    /// `http://host/app` and `http://host/app/` resolve below `/app/`.
    fn endpoint_for(base: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.join(ANALYZE_ROUTE)
    }

    pub fn from_config(config: &SentimentConfig) -> Result<Self, SentimentError> {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SentimentAnalyzer for RemoteSentimentClient {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        let api_key = self.api_key.as_deref().ok_or(SentimentError::MissingCredential)?;

        debug!("Requesting sentiment from {}", self.endpoint);
        let resp = self.http
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&AnalyzeRequest { text })
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SentimentError::Status(status.as_u16()));
        }

        let result = resp.json::<SentimentResult>().await?;
        Ok(result.clamped())
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
