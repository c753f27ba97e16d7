use super::{SearchBackend, SearchResponse};
use crate::config::ServerConfig;
use crate::error::{SearchError, SearchResult};
use async_trait::async_trait;

pub struct HttpSearchClient {
    search_url: String,
    client: reqwest::Client,
}

impl HttpSearchClient {
    pub fn new(config: &ServerConfig) -> SearchResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "tweetsent/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            search_url: config.search_url(),
            client,
        })
    }

    fn request_url(&self, query: &str) -> String {
        format!("{}?q={}", self.search_url, urlencoding::encode(query))
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, query: &str) -> SearchResult<SearchResponse> {
        let url = self.request_url(query);
        tracing::debug!(%url, "sending search request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }

        // Decode separately so a bad label shows up as a decode error
        // rather than an opaque transport one.
        let body = response.text().await?;
        let parsed = SearchResponse::from_json(&body)?;
        tracing::debug!(
            tweets = parsed.tweets.len(),
            frequencies = parsed.most_frequent.as_ref().map_or(0, Vec::len),
            "search response decoded"
        );
        Ok(parsed)
    }
}
