use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use creatorpulse_common::{Platform, PostType};
use socialstats_client::{PostStats, SocialStatsClient};

use crate::ingest::map_post_type;

/// Window of post history pulled per creator.
const POST_LOOKBACK_DAYS: i64 = 90;

// --- Candidate types ---

/// A creator surfaced by discovery, real or synthetic.
#[derive(Debug, Clone)]
pub struct CreatorCandidate {
    pub handle: String,
    pub display_name: String,
    pub platform: Platform,
    pub follower_count: i64,
    pub bio: String,
    pub avatar_url: String,
    /// Provider creator id; absent on synthetic candidates.
    pub cid: Option<String>,
    pub avg_er: Option<f64>,
    pub quality_score: Option<f64>,
}

/// A normalized post record, real or synthetic, before persistence.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub external_id: String,
    pub platform: Platform,
    pub post_type: PostType,
    pub caption: String,
    pub media_url: String,
    pub thumbnail_url: String,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub views: i64,
    pub posted_at: Option<DateTime<Utc>>,
    pub engagement_rate: f64,
}

// --- ContentProvider trait ---

/// The social statistics provider boundary. Discovery and ingestion depend
/// on this trait; the live implementation is [`StatsProvider`], tests use
/// the fixture implementation.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn search_by_tag(
        &self,
        platform: Platform,
        tag: &str,
    ) -> Result<Vec<CreatorCandidate>>;

    async fn search_by_query(
        &self,
        platform: Platform,
        query: &str,
    ) -> Result<Vec<CreatorCandidate>>;

    async fn resolve_cid(&self, platform: Platform, handle: &str) -> Result<Option<String>>;

    /// Posts from the trailing lookback window, normalized. May exceed the
    /// ingestion cap; callers truncate.
    async fn recent_posts(&self, platform: Platform, cid: &str) -> Result<Vec<PostRecord>>;
}

// --- Live implementation ---

pub struct StatsProvider {
    client: SocialStatsClient,
}

impl StatsProvider {
    pub fn new(client: SocialStatsClient) -> Self {
        Self { client }
    }
}

fn candidate_from_stats(
    platform: Platform,
    creator: socialstats_client::CreatorStats,
) -> CreatorCandidate {
    let handle = creator.screen_name.unwrap_or_default();
    CreatorCandidate {
        display_name: creator.name.clone().unwrap_or_else(|| handle.clone()),
        handle,
        platform,
        follower_count: creator.users_count.unwrap_or(0),
        bio: String::new(),
        avatar_url: creator.image.unwrap_or_default(),
        cid: creator.cid,
        avg_er: creator.avg_er,
        quality_score: creator.quality_score,
    }
}

fn record_from_stats(platform: Platform, post: &PostStats) -> PostRecord {
    PostRecord {
        external_id: post.external_id().unwrap_or_default().to_string(),
        platform,
        post_type: map_post_type(platform, post.post_type.as_deref()),
        caption: post.text.clone().unwrap_or_default(),
        media_url: post
            .video_link
            .clone()
            .or_else(|| post.post_image.clone())
            .unwrap_or_default(),
        thumbnail_url: post.post_image.clone().unwrap_or_default(),
        likes: post.likes.unwrap_or(0),
        comments: post.comments.unwrap_or(0),
        shares: post.re_posts.unwrap_or(0),
        views: post.view_count(),
        posted_at: post
            .date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc)),
        engagement_rate: post.er.map(|er| er * 100.0).unwrap_or(0.0),
    }
}

#[async_trait]
impl ContentProvider for StatsProvider {
    async fn search_by_tag(
        &self,
        platform: Platform,
        tag: &str,
    ) -> Result<Vec<CreatorCandidate>> {
        let creators = self
            .client
            .search_creators_by_tag(platform.social_type(), tag)
            .await?;
        Ok(creators
            .into_iter()
            .map(|c| candidate_from_stats(platform, c))
            .collect())
    }

    async fn search_by_query(
        &self,
        platform: Platform,
        query: &str,
    ) -> Result<Vec<CreatorCandidate>> {
        let creators = self
            .client
            .search_creators_by_query(platform.social_type(), query)
            .await?;
        Ok(creators
            .into_iter()
            .map(|c| candidate_from_stats(platform, c))
            .collect())
    }

    async fn resolve_cid(&self, platform: Platform, handle: &str) -> Result<Option<String>> {
        let url = platform.profile_url(handle);
        Ok(self.client.resolve_cid(&url).await?)
    }

    async fn recent_posts(&self, platform: Platform, cid: &str) -> Result<Vec<PostRecord>> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(POST_LOOKBACK_DAYS);
        let posts = self.client.fetch_posts(cid, from, to).await?;
        Ok(posts
            .iter()
            .map(|p| record_from_stats(platform, p))
            .collect())
    }
}
