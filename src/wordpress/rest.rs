use super::types::Post;
use crate::config::WordPressConfig;
use crate::feed::{FetchError, PostPage, PostSource};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;

/// Client for the WP REST `posts` collection.
pub struct WordPressRest {
    client: Client,
    base_url: String,
    category: i64,
    per_page: u32,
}

impl WordPressRest {
    pub fn new(config: &WordPressConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .default_headers(headers)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            category: config.category,
            per_page: config.per_page,
        }
    }

    /// Fetch one page of posts. This backend answers HTTP 400 for a page past
    /// the end; `has_more` is derived from the `X-WP-TotalPages` header.
    pub async fn fetch_posts(&self, page: u32) -> Result<PostPage, FetchError> {
        let url = format!(
            "{}/wp-json/wp/v2/posts?categories={}&page={}&per_page={}&_embed=true",
            self.base_url, self.category, page, self.per_page
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if status.as_u16() == 400 {
            return Err(FetchError::NoMorePages);
        }
        if !status.is_success() {
            return Err(FetchError::Server(status.as_u16()));
        }

        let total_pages = resp
            .headers()
            .get("x-wp-totalpages")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let posts: Vec<Post> = resp
            .json()
            .await
            .map_err(|e| FetchError::Decoding(e.to_string()))?;

        let has_more = page < total_pages && !posts.is_empty();
        Ok(PostPage { posts, has_more })
    }
}

#[async_trait]
impl PostSource for WordPressRest {
    async fn fetch_page(&self, page: u32) -> Result<PostPage, FetchError> {
        self.fetch_posts(page).await
    }
}
