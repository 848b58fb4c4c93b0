use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config;
use crate::error::{Result, TrackerError};
use crate::models::{ArtworkCard, ImageFormat, ImageQuality};
use crate::providers::ArtworkSource;

lazy_static! {
    static ref IMAGE_SUFFIX: Regex =
        Regex::new(r"/(small|large|high|medium|low)\.(png|jpg|webp)$").unwrap();
}

/// Build an asset URL for the requested quality and format.
///
/// Any existing `/{quality}.{format}` suffix is stripped first, so the
/// function accepts both bare asset paths and already-suffixed URLs.
pub fn construct_image_url(base: &str, quality: ImageQuality, format: ImageFormat) -> Option<String> {
    if base.trim().is_empty() {
        return None;
    }
    let clean = IMAGE_SUFFIX.replace(base, "");
    Some(format!("{}/{}.{}", clean, quality.as_str(), format.as_str()))
}

/// Blocking HTTP client for the artwork provider.
pub struct ArtworkClient {
    base_url: String,
    client: Client,
}

impl ArtworkClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config::USER_AGENT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ArtworkSource for ArtworkClient {
    fn card(&self, card_id: &str) -> Result<Option<ArtworkCard>> {
        let url = format!("{}/cards/{}", self.base_url, card_id);
        log::debug!("Fetching artwork card: {}", url);

        let response = self.client.get(&url).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<ArtworkCard>()?)),
            status => Err(TrackerError::UpstreamStatus {
                status: status.as_u16(),
                url,
            }),
        }
    }

    fn search(&self, query: &str, page: u32, per_page: u32) -> Result<Vec<ArtworkCard>> {
        let url = format!("{}/cards", self.base_url);
        log::debug!("Searching artwork cards for '{}'", query);

        let page = page.to_string();
        let per_page = per_page.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("name", query),
                ("sort:field", "name"),
                ("sort:order", "ASC"),
                ("pagination:page", page.as_str()),
                ("pagination:itemsPerPage", per_page.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json::<Vec<ArtworkCard>>()?)
    }
}
