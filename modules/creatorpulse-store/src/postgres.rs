// Postgres implementation of the dashboard store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use creatorpulse_common::{
    HookType, InsightType, Platform, PostType, PulseError, Sentiment,
};

use crate::entities::*;
use crate::store::DashboardStore;

type Result<T> = std::result::Result<T, PulseError>;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(db_err)?;
        Ok(Self::new(pool))
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PulseError::Database(e.to_string()))?;
        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> PulseError {
    PulseError::Database(e.to_string())
}

fn parse_platform(tag: &str) -> Result<Platform> {
    Platform::from_tag(tag)
        .ok_or_else(|| PulseError::Database(format!("unknown platform tag: {tag}")))
}

fn string_list(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

// --- Row types ---

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    display_name: Option<String>,
    niche: Option<String>,
    platforms: serde_json::Value,
    social_handle: Option<String>,
    onboarded: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = PulseError;

    fn try_from(row: UserRow) -> Result<User> {
        let tags: Vec<String> = string_list(&row.platforms);
        let platforms = tags.iter().filter_map(|t| Platform::from_tag(t)).collect();
        Ok(User {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            niche: row.niche,
            platforms,
            social_handle: row.social_handle,
            onboarded: row.onboarded,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CreatorRow {
    id: Uuid,
    user_id: Uuid,
    platform: String,
    handle: String,
    display_name: String,
    follower_count: i64,
    bio: String,
    avatar_url: String,
    cid: Option<String>,
    last_synced: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CreatorRow> for TrackedCreator {
    type Error = PulseError;

    fn try_from(row: CreatorRow) -> Result<TrackedCreator> {
        Ok(TrackedCreator {
            id: row.id,
            user_id: row.user_id,
            platform: parse_platform(&row.platform)?,
            handle: row.handle,
            display_name: row.display_name,
            follower_count: row.follower_count,
            bio: row.bio,
            avatar_url: row.avatar_url,
            cid: row.cid,
            last_synced: row.last_synced,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    creator_id: Uuid,
    platform: String,
    external_id: String,
    post_type: String,
    caption: String,
    media_url: String,
    thumbnail_url: String,
    likes: i64,
    comments: i64,
    shares: i64,
    views: i64,
    posted_at: Option<DateTime<Utc>>,
    engagement_rate: f64,
    created_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = PulseError;

    fn try_from(row: PostRow) -> Result<Post> {
        Ok(Post {
            id: row.id,
            creator_id: row.creator_id,
            platform: parse_platform(&row.platform)?,
            external_id: row.external_id,
            post_type: PostType::from_tag(&row.post_type).unwrap_or(PostType::Static),
            caption: row.caption,
            media_url: row.media_url,
            thumbnail_url: row.thumbnail_url,
            likes: row.likes,
            comments: row.comments,
            shares: row.shares,
            views: row.views,
            posted_at: row.posted_at,
            engagement_rate: row.engagement_rate,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AnalysisRow {
    id: Uuid,
    post_id: Uuid,
    hook_type: String,
    content_format: String,
    topic: String,
    why_it_worked: String,
    sentiment: String,
    key_takeaways: serde_json::Value,
    analyzed_at: DateTime<Utc>,
}

impl From<AnalysisRow> for PostAnalysis {
    fn from(row: AnalysisRow) -> PostAnalysis {
        PostAnalysis {
            id: row.id,
            post_id: row.post_id,
            hook_type: HookType::from_tag(&row.hook_type),
            content_format: row.content_format,
            topic: row.topic,
            why_it_worked: row.why_it_worked,
            sentiment: Sentiment::from_tag(&row.sentiment),
            key_takeaways: string_list(&row.key_takeaways),
            analyzed_at: row.analyzed_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InsightRow {
    id: Uuid,
    user_id: Uuid,
    insight_type: String,
    insight_text: String,
    data_points: i32,
    generated_at: DateTime<Utc>,
}

impl From<InsightRow> for NicheInsight {
    fn from(row: InsightRow) -> NicheInsight {
        NicheInsight {
            id: row.id,
            user_id: row.user_id,
            insight_type: InsightType::from_tag(&row.insight_type),
            insight_text: row.insight_text,
            data_points: row.data_points,
            generated_at: row.generated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GeneratedRow {
    id: Uuid,
    user_id: Uuid,
    platform: String,
    content_format: String,
    caption: String,
    hashtags: serde_json::Value,
    format_tips: String,
    posting_tips: String,
    topic: Option<String>,
    generated_at: DateTime<Utc>,
}

impl TryFrom<GeneratedRow> for GeneratedPost {
    type Error = PulseError;

    fn try_from(row: GeneratedRow) -> Result<GeneratedPost> {
        Ok(GeneratedPost {
            id: row.id,
            user_id: row.user_id,
            platform: parse_platform(&row.platform)?,
            content_format: row.content_format,
            caption: row.caption,
            hashtags: string_list(&row.hashtags),
            format_tips: row.format_tips,
            posting_tips: row.posting_tips,
            topic: row.topic,
            generated_at: row.generated_at,
        })
    }
}

const POST_COLUMNS: &str = "id, creator_id, platform, external_id, post_type, caption, \
     media_url, thumbnail_url, likes, comments, shares, views, posted_at, \
     engagement_rate, created_at";

#[async_trait]
impl DashboardStore for PgStore {
    async fn ensure_user(&self, email: &str) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email) VALUES ($1)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, display_name, niche, platforms, social_handle,
                      onboarded, created_at
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        row.try_into()
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, display_name, niche, platforms, social_handle, \
             onboarded, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(User::try_from).transpose()
    }

    async fn complete_onboarding(
        &self,
        user_id: Uuid,
        niche: &str,
        platforms: &[Platform],
        social_handle: Option<&str>,
    ) -> Result<User> {
        let tags: Vec<&str> = platforms.iter().map(|p| p.as_str()).collect();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET niche = $2, platforms = $3, social_handle = $4, onboarded = TRUE
            WHERE id = $1
            RETURNING id, email, display_name, niche, platforms, social_handle,
                      onboarded, created_at
            "#,
        )
        .bind(user_id)
        .bind(niche)
        .bind(serde_json::json!(tags))
        .bind(social_handle)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or_else(|| PulseError::NotFound(format!("user {user_id}")))?;
        row.try_into()
    }

    async fn upsert_creator(&self, new: NewTrackedCreator) -> Result<TrackedCreator> {
        let row = sqlx::query_as::<_, CreatorRow>(
            r#"
            INSERT INTO tracked_creators
                (user_id, platform, handle, display_name, follower_count, bio,
                 avatar_url, cid)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, platform, handle) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                follower_count = EXCLUDED.follower_count,
                bio = EXCLUDED.bio,
                avatar_url = EXCLUDED.avatar_url,
                cid = COALESCE(EXCLUDED.cid, tracked_creators.cid)
            RETURNING id, user_id, platform, handle, display_name, follower_count,
                      bio, avatar_url, cid, last_synced, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.platform.as_str())
        .bind(&new.handle)
        .bind(&new.display_name)
        .bind(new.follower_count)
        .bind(&new.bio)
        .bind(&new.avatar_url)
        .bind(&new.cid)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        row.try_into()
    }

    async fn touch_creator_sync(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE tracked_creators SET last_synced = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(PulseError::NotFound(format!("creator {id}")));
        }
        Ok(())
    }

    async fn delete_creator(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tracked_creators WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(PulseError::NotFound(format!("creator {id}")));
        }
        Ok(())
    }

    async fn creators_for_user(&self, user_id: Uuid) -> Result<Vec<TrackedCreator>> {
        let rows = sqlx::query_as::<_, CreatorRow>(
            "SELECT id, user_id, platform, handle, display_name, follower_count, \
             bio, avatar_url, cid, last_synced, created_at \
             FROM tracked_creators WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(TrackedCreator::try_from).collect()
    }

    async fn upsert_post(&self, new: NewPost) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts
                (creator_id, platform, external_id, post_type, caption, media_url,
                 thumbnail_url, likes, comments, shares, views, posted_at,
                 engagement_rate)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (platform, external_id) DO UPDATE SET
                likes = EXCLUDED.likes,
                comments = EXCLUDED.comments,
                shares = EXCLUDED.shares,
                views = EXCLUDED.views,
                engagement_rate = EXCLUDED.engagement_rate
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(new.creator_id)
        .bind(new.platform.as_str())
        .bind(&new.external_id)
        .bind(new.post_type.as_str())
        .bind(&new.caption)
        .bind(&new.media_url)
        .bind(&new.thumbnail_url)
        .bind(new.likes)
        .bind(new.comments)
        .bind(new.shares)
        .bind(new.views)
        .bind(new.posted_at)
        .bind(new.engagement_rate)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        row.try_into()
    }

    async fn unanalyzed_posts(&self, user_id: Uuid, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.creator_id, p.platform, p.external_id, p.post_type,
                   p.caption, p.media_url, p.thumbnail_url, p.likes, p.comments,
                   p.shares, p.views, p.posted_at, p.engagement_rate, p.created_at
            FROM posts p
            JOIN tracked_creators c ON c.id = p.creator_id
            LEFT JOIN post_analyses a ON a.post_id = p.id
            WHERE c.user_id = $1 AND a.id IS NULL
            ORDER BY p.created_at, p.id
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(Post::try_from).collect()
    }

    async fn analyzed_posts_by_engagement(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AnalyzedPost>> {
        #[derive(sqlx::FromRow)]
        struct JoinedRow {
            #[sqlx(flatten)]
            post: PostRow,
            analysis_id: Uuid,
            hook_type: String,
            content_format: String,
            topic: String,
            why_it_worked: String,
            sentiment: String,
            key_takeaways: serde_json::Value,
            analyzed_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, JoinedRow>(
            r#"
            SELECT p.id, p.creator_id, p.platform, p.external_id, p.post_type,
                   p.caption, p.media_url, p.thumbnail_url, p.likes, p.comments,
                   p.shares, p.views, p.posted_at, p.engagement_rate, p.created_at,
                   a.id AS analysis_id, a.hook_type, a.content_format, a.topic,
                   a.why_it_worked, a.sentiment, a.key_takeaways, a.analyzed_at
            FROM posts p
            JOIN tracked_creators c ON c.id = p.creator_id
            JOIN post_analyses a ON a.post_id = p.id
            WHERE c.user_id = $1
            ORDER BY p.engagement_rate DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                let post_id = row.post.id;
                Ok(AnalyzedPost {
                    analysis: PostAnalysis {
                        id: row.analysis_id,
                        post_id,
                        hook_type: HookType::from_tag(&row.hook_type),
                        content_format: row.content_format,
                        topic: row.topic,
                        why_it_worked: row.why_it_worked,
                        sentiment: Sentiment::from_tag(&row.sentiment),
                        key_takeaways: string_list(&row.key_takeaways),
                        analyzed_at: row.analyzed_at,
                    },
                    post: row.post.try_into()?,
                })
            })
            .collect()
    }

    async fn insert_analysis(&self, new: NewPostAnalysis) -> Result<PostAnalysis> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO post_analyses
                (post_id, hook_type, content_format, topic, why_it_worked,
                 sentiment, key_takeaways)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, post_id, hook_type, content_format, topic,
                      why_it_worked, sentiment, key_takeaways, analyzed_at
            "#,
        )
        .bind(new.post_id)
        .bind(new.hook_type.as_str())
        .bind(&new.content_format)
        .bind(&new.topic)
        .bind(&new.why_it_worked)
        .bind(new.sentiment.as_str())
        .bind(serde_json::json!(new.key_takeaways))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn replace_insights(
        &self,
        user_id: Uuid,
        inserts: Vec<NewNicheInsight>,
    ) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM niche_insights WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let count = inserts.len() as u64;
        for insert in inserts {
            sqlx::query(
                "INSERT INTO niche_insights (user_id, insight_type, insight_text, data_points) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(user_id)
            .bind(insert.insight_type.as_str())
            .bind(&insert.insight_text)
            .bind(insert.data_points)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(count)
    }

    async fn recent_insights(&self, user_id: Uuid, limit: i64) -> Result<Vec<NicheInsight>> {
        let rows = sqlx::query_as::<_, InsightRow>(
            "SELECT id, user_id, insight_type, insight_text, data_points, generated_at \
             FROM niche_insights WHERE user_id = $1 \
             ORDER BY generated_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(NicheInsight::from).collect())
    }

    async fn insert_generated_post(&self, new: NewGeneratedPost) -> Result<GeneratedPost> {
        let row = sqlx::query_as::<_, GeneratedRow>(
            r#"
            INSERT INTO generated_posts
                (user_id, platform, content_format, caption, hashtags, format_tips,
                 posting_tips, topic)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, platform, content_format, caption, hashtags,
                      format_tips, posting_tips, topic, generated_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.platform.as_str())
        .bind(&new.content_format)
        .bind(&new.caption)
        .bind(serde_json::json!(new.hashtags))
        .bind(&new.format_tips)
        .bind(&new.posting_tips)
        .bind(&new.topic)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        row.try_into()
    }

    async fn generated_posts(&self, user_id: Uuid, limit: i64) -> Result<Vec<GeneratedPost>> {
        let rows = sqlx::query_as::<_, GeneratedRow>(
            "SELECT id, user_id, platform, content_format, caption, hashtags, \
             format_tips, posting_tips, topic, generated_at \
             FROM generated_posts WHERE user_id = $1 \
             ORDER BY generated_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(GeneratedPost::try_from).collect()
    }
}
