use crate::config::SiteConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Sponsor {
    pub id: String,
    pub name: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    pub level: SponsorLevel,
}

/// Partnership tiers, highest first. Derived `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorLevel {
    Diamond,
    Platinum,
    Gold,
    Silver,
}

impl SponsorLevel {
    pub const ALL: [SponsorLevel; 4] = [
        SponsorLevel::Diamond,
        SponsorLevel::Platinum,
        SponsorLevel::Gold,
        SponsorLevel::Silver,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            SponsorLevel::Diamond => "Diamond Partner",
            SponsorLevel::Platinum => "Platinum Partner",
            SponsorLevel::Gold => "Gold Partner",
            SponsorLevel::Silver => "Silver Partner",
        }
    }
}

#[derive(Debug, Deserialize)]
struct SponsorsResponse {
    sponsors: Vec<Sponsor>,
}

#[derive(Debug, Clone, Default)]
pub struct SponsorsState {
    pub sponsors: Vec<Sponsor>,
    pub is_loading: bool,
    pub error: Option<String>,
}

struct Inner {
    state: SponsorsState,
    has_loaded: bool,
}

/// One-shot fetcher for the site's sponsors listing. Errors are recorded in
/// the state, never propagated.
pub struct SponsorsService {
    client: Client,
    url: String,
    inner: Mutex<Inner>,
}

impl SponsorsService {
    pub fn new(config: &SiteConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            url: config.sponsors_url.clone(),
            inner: Mutex::new(Inner {
                state: SponsorsState::default(),
                has_loaded: false,
            }),
        }
    }

    pub fn state(&self) -> SponsorsState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Fetch the listing once. Later calls are no-ops while data is present;
    /// a failed attempt can be repeated.
    pub async fn fetch(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.has_loaded && !inner.state.sponsors.is_empty() {
                return;
            }
            if inner.state.is_loading {
                return;
            }
            inner.state.is_loading = true;
            inner.state.error = None;
        }

        let result = self.fetch_listing().await;

        let mut inner = self.inner.lock().unwrap();
        match result {
            Ok(mut sponsors) => {
                sponsors.sort_by_key(|s| s.level);
                tracing::debug!(count = sponsors.len(), "sponsors loaded");
                inner.state.sponsors = sponsors;
                inner.has_loaded = true;
            }
            Err(err) => {
                tracing::warn!(error = %err, "sponsors fetch failed");
                inner.state.error = Some(err.to_string());
            }
        }
        inner.state.is_loading = false;
    }

    /// Drop the loaded flag and fetch again.
    pub async fn force_refresh(&self) {
        self.inner.lock().unwrap().has_loaded = false;
        self.fetch().await;
    }

    async fn fetch_listing(&self) -> Result<Vec<Sponsor>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("sponsors request failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("sponsors fetch failed ({})", status);
        }
        let parsed: SponsorsResponse = resp
            .json()
            .await
            .context("failed to parse sponsors response")?;
        Ok(parsed.sponsors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sponsor_deserializes_wire_keys() {
        let sponsor: Sponsor = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "name": "Acme",
            "imageURL": "https://example.com/acme.png",
            "websiteURL": "https://acme.example.com",
            "level": "gold"
        }))
        .unwrap();
        assert_eq!(sponsor.image_url, "https://example.com/acme.png");
        assert_eq!(sponsor.level, SponsorLevel::Gold);
    }

    #[test]
    fn test_level_order_is_highest_first() {
        assert!(SponsorLevel::Diamond < SponsorLevel::Platinum);
        assert!(SponsorLevel::Platinum < SponsorLevel::Gold);
        assert!(SponsorLevel::Gold < SponsorLevel::Silver);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let result: std::result::Result<SponsorLevel, _> =
            serde_json::from_value(serde_json::json!("bronze"));
        assert!(result.is_err());
    }
}
