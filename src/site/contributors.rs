use crate::config::SiteConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Contributor {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Contributor {
    /// Remote avatar URL. Inline `data:` payloads are skipped; the terminal
    /// can only reference remote resources.
    pub fn avatar_url(&self) -> Option<&str> {
        let avatar = self.avatar.as_deref()?;
        if avatar.starts_with("data:") {
            None
        } else {
            Some(avatar)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContributorsResponse {
    contributors: Vec<Contributor>,
}

#[derive(Debug, Clone, Default)]
pub struct ContributorsState {
    pub contributors: Vec<Contributor>,
    pub is_loading: bool,
    pub error: Option<String>,
}

struct Inner {
    state: ContributorsState,
    has_loaded: bool,
}

/// One-shot fetcher for the site's contributors listing.
pub struct ContributorsService {
    client: Client,
    url: String,
    inner: Mutex<Inner>,
}

impl ContributorsService {
    pub fn new(config: &SiteConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            url: config.contributors_url.clone(),
            inner: Mutex::new(Inner {
                state: ContributorsState::default(),
                has_loaded: false,
            }),
        }
    }

    pub fn state(&self) -> ContributorsState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Fetch the listing once. Later calls are no-ops while data is present;
    /// a failed attempt can be repeated.
    pub async fn fetch(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.has_loaded && !inner.state.contributors.is_empty() {
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
            Ok(contributors) => {
                tracing::debug!(count = contributors.len(), "contributors loaded");
                inner.state.contributors = contributors;
                inner.has_loaded = true;
            }
            Err(err) => {
                tracing::warn!(error = %err, "contributors fetch failed");
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

    async fn fetch_listing(&self) -> Result<Vec<Contributor>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("contributors request failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("contributors fetch failed ({})", status);
        }
        let parsed: ContributorsResponse = resp
            .json()
            .await
            .context("failed to parse contributors response")?;
        Ok(parsed.contributors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url_skips_inline_data() {
        let contributor: Contributor = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "name": "Wei",
            "role": "Translator",
            "avatar": "data:image/png;base64,AAAA"
        }))
        .unwrap();
        assert_eq!(contributor.avatar_url(), None);
    }

    #[test]
    fn test_avatar_url_passes_through_remote() {
        let contributor: Contributor = serde_json::from_value(serde_json::json!({
            "id": "c2",
            "name": "Lin",
            "role": "Editor",
            "url": "https://github.com/lin",
            "avatar": "https://example.com/lin.png"
        }))
        .unwrap();
        assert_eq!(contributor.avatar_url(), Some("https://example.com/lin.png"));
    }

    #[test]
    fn test_optional_fields_absent() {
        let contributor: Contributor = serde_json::from_value(serde_json::json!({
            "id": "c3",
            "name": "Anon",
            "role": "Reviewer"
        }))
        .unwrap();
        assert_eq!(contributor.url, None);
        assert_eq!(contributor.avatar_url(), None);
    }
}
