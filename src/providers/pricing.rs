use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use crate::config;
use crate::error::{Result, TrackerError};
use crate::models::{PriceResponse, SetInfo};
use crate::providers::PriceSource;

/// Blocking HTTP client for the pricing provider.
///
/// Every request carries the bearer token and the configured timeout; a
/// request that exceeds the timeout surfaces as [`TrackerError::Http`].
pub struct PricingClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl PricingClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config::USER_AGENT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> Result<RequestBuilder> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            TrackerError::NotConfigured("pricing API key is not configured".to_string())
        })?;
        Ok(self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(key)
            .header("Content-Type", "application/json"))
    }

    fn send_json<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::UpstreamStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.json::<T>()?)
    }
}

impl PriceSource for PricingClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn search_price(&self, name: &str, set_id: &str, number: &str) -> Result<PriceResponse> {
        log::info!("Fetching price for {} ({}/{})", name, set_id, number);
        let request = self.get("/prices")?.query(&[
            ("name", name),
            ("setId", set_id),
            ("number", number),
            ("limit", "1"),
        ]);
        self.send_json(request)
    }

    fn price_by_id(&self, provider_card_id: &str) -> Result<PriceResponse> {
        log::info!("Fetching price for provider card {}", provider_card_id);
        let request = self.get("/prices")?.query(&[("id", provider_card_id)]);
        self.send_json(request)
    }

    fn list_sets(&self) -> Result<Vec<SetInfo>> {
        log::info!("Fetching sets from {}/sets", self.base_url);
        let body: Value = self.send_json(self.get("/sets")?)?;
        parse_sets(&body)
    }
}

/// Accept either `{ "data": [...] }` or a bare array; drop entries lacking an
/// id or a name.
pub(crate) fn parse_sets(body: &Value) -> Result<Vec<SetInfo>> {
    let items = body
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| body.as_array())
        .ok_or_else(|| {
            TrackerError::InvalidArgument("Unexpected sets response format".to_string())
        })?;

    Ok(items
        .iter()
        .filter_map(|item| {
            let id = item.get("id").and_then(Value::as_str)?.trim();
            let name = item.get("name").and_then(Value::as_str)?.trim();
            if id.is_empty() || name.is_empty() {
                None
            } else {
                Some(SetInfo::new(id, name))
            }
        })
        .collect())
}
