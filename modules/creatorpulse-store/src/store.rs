use async_trait::async_trait;
use uuid::Uuid;

use creatorpulse_common::{Platform, PulseError};

use crate::entities::*;

type Result<T> = std::result::Result<T, PulseError>;

/// Persistence boundary for the dashboard pipeline.
///
/// Implemented by [`crate::PgStore`] for production and
/// [`crate::MemoryStore`] for tests and local development. The uniqueness
/// invariants ((user, platform, handle) per creator, (platform, external_id)
/// per post, one analysis per post) are enforced by the implementation, not
/// by callers.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    // Users
    async fn ensure_user(&self, email: &str) -> Result<User>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn complete_onboarding(
        &self,
        user_id: Uuid,
        niche: &str,
        platforms: &[Platform],
        social_handle: Option<&str>,
    ) -> Result<User>;

    // Tracked creators
    async fn upsert_creator(&self, new: NewTrackedCreator) -> Result<TrackedCreator>;
    async fn touch_creator_sync(&self, id: Uuid) -> Result<()>;
    async fn delete_creator(&self, id: Uuid) -> Result<()>;
    async fn creators_for_user(&self, user_id: Uuid) -> Result<Vec<TrackedCreator>>;

    // Posts
    async fn upsert_post(&self, new: NewPost) -> Result<Post>;
    /// Posts belonging to the user with no analysis row, in insertion order.
    async fn unanalyzed_posts(&self, user_id: Uuid, limit: i64) -> Result<Vec<Post>>;
    /// Posts with an analysis, ordered by descending engagement rate. The
    /// ordering biases the insight sample toward top performers.
    async fn analyzed_posts_by_engagement(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AnalyzedPost>>;

    // Analyses
    async fn insert_analysis(&self, new: NewPostAnalysis) -> Result<PostAnalysis>;

    // Insights
    /// Replace the user's full insight set: delete everything, insert the
    /// new rows, as one transactional unit. Concurrent regeneration for the
    /// same user is not guarded; callers are single-user and low-frequency.
    async fn replace_insights(
        &self,
        user_id: Uuid,
        inserts: Vec<NewNicheInsight>,
    ) -> Result<u64>;
    async fn recent_insights(&self, user_id: Uuid, limit: i64) -> Result<Vec<NicheInsight>>;

    // Generated posts
    async fn insert_generated_post(&self, new: NewGeneratedPost) -> Result<GeneratedPost>;
    async fn generated_posts(&self, user_id: Uuid, limit: i64) -> Result<Vec<GeneratedPost>>;
}
