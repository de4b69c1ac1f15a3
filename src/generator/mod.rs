use anyhow::Context;
use log::{error, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};

use crate::config::{ApiSettings, ResponseKeys, Settings};
use crate::record::AddressRecord;

const UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// HTTP client for the remote address-generation API
pub struct AddressClient {
    client: Client,
    api: ApiSettings,
}

impl AddressClient {
    pub fn new(api: ApiSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .default_headers(Self::default_headers(&api.content_type)?)
                .build()?,
            api,
        })
    }

    fn default_headers(content_type: &str) -> anyhow::Result<HeaderMap> {
        let mut map = HeaderMap::new();
        map.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type)
                .with_context(|| format!("invalid content type [{content_type}]"))?,
        );
        map.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        map.insert(USER_AGENT, HeaderValue::from_static(UA));
        Ok(map)
    }

    /// Request one generated address.
    ///
    /// Returns `Ok(None)` on a non-200 status. Transport errors and
    /// unparsable bodies propagate as `Err`. No retry on purpose:
    /// a failed attempt just means one row less.
    pub async fn generate(&self) -> anyhow::Result<Option<Value>> {
        let response = self
            .client
            .post(&self.api.url)
            .body(serde_json::to_vec(&self.request_body())?)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("address request failed, status code [{}]", status.as_u16());
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    fn request_body(&self) -> Value {
        let request = &self.api.request;
        let mut body = Map::new();
        body.insert(
            request.city_key.clone(),
            Value::String(request.city_value.clone()),
        );
        body.insert(
            request.method_key.clone(),
            Value::String(request.method_value.clone()),
        );
        body.insert(
            request.path_key.clone(),
            Value::String(request.path_value.clone()),
        );
        Value::Object(body)
    }
}

/// Runs the generation loop and accumulates the extracted records.
pub struct AddressCollector {
    client: AddressClient,
    keys: ResponseKeys,
    count: usize,
}

impl AddressCollector {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            client: AddressClient::new(settings.api.clone())?,
            keys: settings.api.response.clone(),
            count: settings.generator_count,
        })
    }

    /// Attempt `generator_count` generations and return the records in
    /// request order. Failed or malformed attempts are skipped, never
    /// retried, so the result may be shorter than the configured count.
    pub async fn collect(&self) -> anyhow::Result<Vec<AddressRecord>> {
        let mut records = Vec::new();
        for attempt in 1..=self.count {
            info!("[{}/{}] requesting address...", attempt, self.count);
            let Some(response) = self.client.generate().await? else {
                continue;
            };
            match AddressRecord::from_response(response, &self.keys) {
                Some(record) => records.push(record),
                None => warn!(
                    "[{}/{}] response has no [{}] object, skipping",
                    attempt, self.count, self.keys.root
                ),
            }
        }
        Ok(records)
    }
}
