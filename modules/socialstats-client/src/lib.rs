pub mod error;
pub mod types;

pub use error::{Result, SocialStatsError};
pub use types::{CommunityResponse, CreatorStats, PostStats, PostsData};

use std::time::Duration;

use chrono::NaiveDate;
use types::ApiEnvelope;

const BASE_URL: &str = "https://instagram-statistics-api.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "instagram-statistics-api.p.rapidapi.com";

const PAGE_SIZE: u32 = 20;

/// Client for the social statistics provider. One instance covers both
/// Instagram and TikTok; the platform is selected per call via the
/// `socialTypes` filter ("INST" / "TT").
pub struct SocialStatsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SocialStatsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", RAPIDAPI_HOST)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SocialStatsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Search creators by provider tag, sorted by descending average
    /// engagement rate. `social_type` is "INST" or "TT".
    pub async fn search_creators_by_tag(
        &self,
        social_type: &str,
        tag: &str,
    ) -> Result<Vec<CreatorStats>> {
        tracing::info!(social_type, tag, "Statistics API tag search");
        self.search(social_type, &[("tags", tag)]).await
    }

    /// Free-text creator search, the fallback when a tag search comes back
    /// empty.
    pub async fn search_creators_by_query(
        &self,
        social_type: &str,
        query: &str,
    ) -> Result<Vec<CreatorStats>> {
        tracing::info!(social_type, query, "Statistics API query search");
        self.search(social_type, &[("q", query)]).await
    }

    async fn search(
        &self,
        social_type: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<CreatorStats>> {
        let per_page = PAGE_SIZE.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("page", "1"),
            ("perPage", per_page.as_str()),
            ("sort", "-avgER"),
            ("socialTypes", social_type),
            ("trackTotal", "true"),
        ];
        params.extend_from_slice(extra);

        let envelope: ApiEnvelope<Vec<CreatorStats>> = self.get_json("/search", &params).await?;
        if envelope.meta.code != 200 {
            return Err(SocialStatsError::Meta(envelope.meta.code));
        }
        Ok(envelope.data.unwrap_or_default())
    }

    /// Resolve a creator's provider id from their canonical profile URL.
    /// Returns Ok(None) when the provider has no record for the profile.
    pub async fn resolve_cid(&self, profile_url: &str) -> Result<Option<String>> {
        tracing::info!(profile_url, "Statistics API community lookup");

        let resp: CommunityResponse = self
            .get_json("/community", &[("url", profile_url)])
            .await?;
        Ok(resp.cid().map(str::to_string))
    }

    /// Fetch a creator's posts within a date range, newest first. Dates use
    /// the provider's dd.mm.yyyy format.
    pub async fn fetch_posts(
        &self,
        cid: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PostStats>> {
        let from = from.format("%d.%m.%Y").to_string();
        let to = to.format("%d.%m.%Y").to_string();
        tracing::info!(cid, %from, %to, "Statistics API posts fetch");

        let envelope: ApiEnvelope<PostsData> = self
            .get_json(
                "/posts",
                &[
                    ("cid", cid),
                    ("from", from.as_str()),
                    ("to", to.as_str()),
                    ("type", "posts"),
                    ("sort", "date"),
                ],
            )
            .await?;

        if envelope.meta.code != 200 {
            return Err(SocialStatsError::Meta(envelope.meta.code));
        }
        Ok(envelope.data.map(|d| d.posts).unwrap_or_default())
    }
}
