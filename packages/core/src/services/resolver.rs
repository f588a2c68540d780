use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::AppError;
use crate::search::SearchFilter;
use crate::services::dedup::remove_duplicates;

/// A resolver record exactly as the API returned it.
pub type VncInfo = Map<String, Value>;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct ResolverClient {
    base_url: String,
    http: Client,
}

impl ResolverClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| AppError::Config(format!("HTTP client: {}", err)))?;

        Ok(Self {
            base_url: config.api_url.clone(),
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<VncInfo>,
}

impl ResolverClient {
    /// `GET /search` with the given filters, deduplicated per ip.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<VncInfo>, AppError> {
        if filter.is_empty() {
            return Err(AppError::MissingFilter);
        }

        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&filter.query_pairs())
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;

        let body = ensure_success(response)
            .await?
            .json::<SearchResponse>()
            .await
            .map_err(|err| AppError::Parse(err.to_string()))?;

        let found = body.result.len();
        let results = remove_duplicates(body.result);
        tracing::debug!(found, unique = results.len(), "Resolver search returned");

        Ok(results)
    }

    /// `GET /random`: one randomly picked record.
    pub async fn random(&self) -> Result<VncInfo, AppError> {
        let url = format!("{}/random", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;

        ensure_success(response)
            .await?
            .json::<VncInfo>()
            .await
            .map_err(|err| AppError::Parse(err.to_string()))
    }
}

async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let response_text = response.text().await.unwrap_or_default();

    Err(AppError::ApiRequestFailed {
        status: status.as_u16(),
        url,
        response_text,
    })
}
