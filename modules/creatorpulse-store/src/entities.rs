use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use creatorpulse_common::{HookType, InsightType, Platform, PostType, Sentiment};

// --- Users ---

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub niche: Option<String>,
    pub platforms: Vec<Platform>,
    pub social_handle: Option<String>,
    pub onboarded: bool,
    pub created_at: DateTime<Utc>,
}

// --- Tracked creators ---

#[derive(Debug, Clone, Serialize)]
pub struct TrackedCreator {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: Platform,
    pub handle: String,
    pub display_name: String,
    pub follower_count: i64,
    pub bio: String,
    pub avatar_url: String,
    pub cid: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for upserting a tracked creator. The row is keyed on
/// (user_id, platform, handle); profile fields are refreshed on conflict.
#[derive(Debug, Clone)]
pub struct NewTrackedCreator {
    pub user_id: Uuid,
    pub platform: Platform,
    pub handle: String,
    pub display_name: String,
    pub follower_count: i64,
    pub bio: String,
    pub avatar_url: String,
    pub cid: Option<String>,
}

// --- Posts ---

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub platform: Platform,
    pub external_id: String,
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
    pub created_at: DateTime<Utc>,
}

/// Parameters for upserting a post, keyed on (platform, external_id).
/// Re-ingesting refreshes counts and engagement, never duplicates.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub creator_id: Uuid,
    pub platform: Platform,
    pub external_id: String,
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

// --- Post analyses ---

#[derive(Debug, Clone, Serialize)]
pub struct PostAnalysis {
    pub id: Uuid,
    pub post_id: Uuid,
    pub hook_type: HookType,
    pub content_format: String,
    pub topic: String,
    pub why_it_worked: String,
    pub sentiment: Sentiment,
    pub key_takeaways: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPostAnalysis {
    pub post_id: Uuid,
    pub hook_type: HookType,
    pub content_format: String,
    pub topic: String,
    pub why_it_worked: String,
    pub sentiment: Sentiment,
    pub key_takeaways: Vec<String>,
}

/// A post joined with its analysis, as sampled by insight generation.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedPost {
    pub post: Post,
    pub analysis: PostAnalysis,
}

// --- Niche insights ---

#[derive(Debug, Clone, Serialize)]
pub struct NicheInsight {
    pub id: Uuid,
    pub user_id: Uuid,
    pub insight_type: InsightType,
    pub insight_text: String,
    pub data_points: i32,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNicheInsight {
    pub insight_type: InsightType,
    pub insight_text: String,
    pub data_points: i32,
}

// --- Generated posts ---

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: Platform,
    pub content_format: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub format_tips: String,
    pub posting_tips: String,
    pub topic: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGeneratedPost {
    pub user_id: Uuid,
    pub platform: Platform,
    pub content_format: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub format_tips: String,
    pub posting_tips: String,
    pub topic: Option<String>,
}
