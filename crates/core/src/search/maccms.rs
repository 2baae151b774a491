//! HTTP fetcher for sources exposing the MacCMS collection API.
//!
//! A search is `GET {endpoint}?ac=videolist&wd={keyword}`, answered with
//! `{"code": 1, "msg": "...", "list": [{"vod_id": .., "vod_name": .., ..}]}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::catalog::SourceDescriptor;
use crate::config::SearchConfig;

use super::{FetchError, RawRecord, SourceFetcher};

const DEFAULT_USER_AGENT: &str = concat!("reelhub/", env!("CARGO_PKG_VERSION"));

/// Pause between attempts on a transient failure.
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Fetcher speaking the MacCMS `provide/vod` JSON API.
pub struct MacCmsFetcher {
    client: Client,
    retry: u32,
}

impl MacCmsFetcher {
    pub fn new(config: &SearchConfig) -> Result<Self, FetchError> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retry: config.retry,
        })
    }

    fn build_request(
        &self,
        source: &SourceDescriptor,
        keyword: &str,
        timeout: Duration,
    ) -> reqwest::RequestBuilder {
        self.client
            .get(&source.endpoint)
            .query(&[("ac", "videolist"), ("wd", keyword)])
            .timeout(timeout)
    }

    async fn fetch_once(
        &self,
        source: &SourceDescriptor,
        keyword: &str,
        timeout: Duration,
    ) -> Result<Vec<RawRecord>, FetchError> {
        let response = self
            .build_request(source, keyword, timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        parse_response(&body, source)
    }
}

#[async_trait]
impl SourceFetcher for MacCmsFetcher {
    fn name(&self) -> &str {
        "maccms"
    }

    async fn fetch(
        &self,
        source: &SourceDescriptor,
        keyword: &str,
        timeout: Duration,
    ) -> Result<Vec<RawRecord>, FetchError> {
        let deadline = Instant::now() + timeout;
        let mut attempt = 0;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(FetchError::Timeout(timeout));
            }

            match self.fetch_once(source, keyword, remaining).await {
                Err(e) if e.is_transient() && attempt < self.retry => {
                    attempt += 1;
                    debug!(
                        source = %source.code,
                        attempt = attempt,
                        error = %e,
                        "Retrying source"
                    );
                    tokio::time::sleep(RETRY_BACKOFF.min(remaining)).await;
                }
                Err(FetchError::Timeout(_)) => return Err(FetchError::Timeout(timeout)),
                result => return result,
            }
        }
    }
}

fn map_transport_error(e: reqwest::Error, timeout: Duration) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(timeout)
    } else if e.is_connect() || e.is_request() {
        FetchError::Connection(e.to_string())
    } else {
        FetchError::Decode(e.to_string())
    }
}

/// Parse a MacCMS response body into raw records for `source`.
fn parse_response(body: &str, source: &SourceDescriptor) -> Result<Vec<RawRecord>, FetchError> {
    let response: MacCmsResponse = serde_json::from_str(body).map_err(|e| {
        FetchError::Decode(format!(
            "{} (body starts with {:?})",
            e,
            body.chars().take(80).collect::<String>()
        ))
    })?;

    if let Some(code) = &response.code {
        if !is_success_code(code) {
            return Err(FetchError::Upstream(
                response
                    .msg
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("code {}", code)),
            ));
        }
    }

    Ok(response
        .list
        .unwrap_or_default()
        .into_iter()
        .map(|vod| RawRecord {
            source_code: source.code.clone(),
            source_name: source.name.clone(),
            vod_id: id_to_string(&vod.vod_id),
            title: vod.vod_name.unwrap_or_default(),
            poster_url: vod.vod_pic.unwrap_or_default(),
            remarks: vod.vod_remarks.unwrap_or_default(),
            type_name: vod.type_name.unwrap_or_default(),
        })
        .collect())
}

fn is_success_code(code: &Value) -> bool {
    match code {
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s.trim() == "1",
        _ => false,
    }
}

fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

// MacCMS API response types
#[derive(Debug, Deserialize)]
struct MacCmsResponse {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    list: Option<Vec<MacCmsVod>>,
}

#[derive(Debug, Deserialize)]
struct MacCmsVod {
    #[serde(default)]
    vod_id: Value,
    #[serde(default)]
    vod_name: Option<String>,
    #[serde(default)]
    vod_pic: Option<String>,
    #[serde(default)]
    vod_remarks: Option<String>,
    #[serde(default)]
    type_name: Option<String>,
}
