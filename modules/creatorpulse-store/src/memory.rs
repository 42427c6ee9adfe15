use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use creatorpulse_common::{Platform, PulseError};

use crate::entities::*;
use crate::store::DashboardStore;

type Result<T> = std::result::Result<T, PulseError>;

/// In-memory implementation of [`DashboardStore`] for tests and local
/// development. Mirrors the Postgres schema's uniqueness constraints.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    creators: Vec<TrackedCreator>,
    posts: Vec<Post>,
    analyses: Vec<PostAnalysis>,
    insights: Vec<NicheInsight>,
    generated: Vec<GeneratedPost>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built user, for test setup.
    pub fn seed_user(&self, user: User) {
        self.inner.lock().unwrap().users.insert(user.id, user);
    }
}

impl Inner {
    fn user_post_ids(&self, user_id: Uuid) -> Vec<Uuid> {
        let creator_ids: Vec<Uuid> = self
            .creators
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.id)
            .collect();
        self.posts
            .iter()
            .filter(|p| creator_ids.contains(&p.creator_id))
            .map(|p| p.id)
            .collect()
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn ensure_user(&self, email: &str) -> Result<User> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.values().find(|u| u.email == email) {
            return Ok(user.clone());
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            display_name: None,
            niche: None,
            platforms: Vec::new(),
            social_handle: None,
            onboarded: false,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn complete_onboarding(
        &self,
        user_id: Uuid,
        niche: &str,
        platforms: &[Platform],
        social_handle: Option<&str>,
    ) -> Result<User> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| PulseError::NotFound(format!("user {user_id}")))?;
        user.niche = Some(niche.to_string());
        user.platforms = platforms.to_vec();
        user.social_handle = social_handle.map(str::to_string);
        user.onboarded = true;
        Ok(user.clone())
    }

    async fn upsert_creator(&self, new: NewTrackedCreator) -> Result<TrackedCreator> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.creators.iter_mut().find(|c| {
            c.user_id == new.user_id && c.platform == new.platform && c.handle == new.handle
        }) {
            existing.display_name = new.display_name;
            existing.follower_count = new.follower_count;
            existing.bio = new.bio;
            existing.avatar_url = new.avatar_url;
            if new.cid.is_some() {
                existing.cid = new.cid;
            }
            return Ok(existing.clone());
        }
        let creator = TrackedCreator {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            platform: new.platform,
            handle: new.handle,
            display_name: new.display_name,
            follower_count: new.follower_count,
            bio: new.bio,
            avatar_url: new.avatar_url,
            cid: new.cid,
            last_synced: None,
            created_at: Utc::now(),
        };
        inner.creators.push(creator.clone());
        Ok(creator)
    }

    async fn touch_creator_sync(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let creator = inner
            .creators
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| PulseError::NotFound(format!("creator {id}")))?;
        creator.last_synced = Some(Utc::now());
        Ok(())
    }

    async fn delete_creator(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.creators.len();
        inner.creators.retain(|c| c.id != id);
        if inner.creators.len() == before {
            return Err(PulseError::NotFound(format!("creator {id}")));
        }
        let orphaned: Vec<Uuid> = inner
            .posts
            .iter()
            .filter(|p| p.creator_id == id)
            .map(|p| p.id)
            .collect();
        inner.posts.retain(|p| p.creator_id != id);
        inner.analyses.retain(|a| !orphaned.contains(&a.post_id));
        Ok(())
    }

    async fn creators_for_user(&self, user_id: Uuid) -> Result<Vec<TrackedCreator>> {
        let inner = self.inner.lock().unwrap();
        let mut creators: Vec<TrackedCreator> = inner
            .creators
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        creators.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(creators)
    }

    async fn upsert_post(&self, new: NewPost) -> Result<Post> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner
            .posts
            .iter_mut()
            .find(|p| p.platform == new.platform && p.external_id == new.external_id)
        {
            existing.likes = new.likes;
            existing.comments = new.comments;
            existing.shares = new.shares;
            existing.views = new.views;
            existing.engagement_rate = new.engagement_rate;
            return Ok(existing.clone());
        }
        let post = Post {
            id: Uuid::new_v4(),
            creator_id: new.creator_id,
            platform: new.platform,
            external_id: new.external_id,
            post_type: new.post_type,
            caption: new.caption,
            media_url: new.media_url,
            thumbnail_url: new.thumbnail_url,
            likes: new.likes,
            comments: new.comments,
            shares: new.shares,
            views: new.views,
            posted_at: new.posted_at,
            engagement_rate: new.engagement_rate,
            created_at: Utc::now(),
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn unanalyzed_posts(&self, user_id: Uuid, limit: i64) -> Result<Vec<Post>> {
        let inner = self.inner.lock().unwrap();
        let post_ids = inner.user_post_ids(user_id);
        let posts = inner
            .posts
            .iter()
            .filter(|p| post_ids.contains(&p.id))
            .filter(|p| !inner.analyses.iter().any(|a| a.post_id == p.id))
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(posts)
    }

    async fn analyzed_posts_by_engagement(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AnalyzedPost>> {
        let inner = self.inner.lock().unwrap();
        let post_ids = inner.user_post_ids(user_id);
        let mut joined: Vec<AnalyzedPost> = inner
            .posts
            .iter()
            .filter(|p| post_ids.contains(&p.id))
            .filter_map(|p| {
                inner
                    .analyses
                    .iter()
                    .find(|a| a.post_id == p.id)
                    .map(|a| AnalyzedPost {
                        post: p.clone(),
                        analysis: a.clone(),
                    })
            })
            .collect();
        joined.sort_by(|a, b| {
            b.post
                .engagement_rate
                .partial_cmp(&a.post.engagement_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        joined.truncate(limit as usize);
        Ok(joined)
    }

    async fn insert_analysis(&self, new: NewPostAnalysis) -> Result<PostAnalysis> {
        let mut inner = self.inner.lock().unwrap();
        if inner.analyses.iter().any(|a| a.post_id == new.post_id) {
            return Err(PulseError::Database(format!(
                "post {} already has an analysis",
                new.post_id
            )));
        }
        let analysis = PostAnalysis {
            id: Uuid::new_v4(),
            post_id: new.post_id,
            hook_type: new.hook_type,
            content_format: new.content_format,
            topic: new.topic,
            why_it_worked: new.why_it_worked,
            sentiment: new.sentiment,
            key_takeaways: new.key_takeaways,
            analyzed_at: Utc::now(),
        };
        inner.analyses.push(analysis.clone());
        Ok(analysis)
    }

    async fn replace_insights(
        &self,
        user_id: Uuid,
        inserts: Vec<NewNicheInsight>,
    ) -> Result<u64> {
        // Delete and insert under one lock guard; no caller can observe the
        // intermediate empty state.
        let mut inner = self.inner.lock().unwrap();
        inner.insights.retain(|i| i.user_id != user_id);
        let now = Utc::now();
        let count = inserts.len() as u64;
        for insert in inserts {
            inner.insights.push(NicheInsight {
                id: Uuid::new_v4(),
                user_id,
                insight_type: insert.insight_type,
                insight_text: insert.insight_text,
                data_points: insert.data_points,
                generated_at: now,
            });
        }
        Ok(count)
    }

    async fn recent_insights(&self, user_id: Uuid, limit: i64) -> Result<Vec<NicheInsight>> {
        let inner = self.inner.lock().unwrap();
        let mut insights: Vec<NicheInsight> = inner
            .insights
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        insights.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        insights.truncate(limit as usize);
        Ok(insights)
    }

    async fn insert_generated_post(&self, new: NewGeneratedPost) -> Result<GeneratedPost> {
        let mut inner = self.inner.lock().unwrap();
        let post = GeneratedPost {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            platform: new.platform,
            content_format: new.content_format,
            caption: new.caption,
            hashtags: new.hashtags,
            format_tips: new.format_tips,
            posting_tips: new.posting_tips,
            topic: new.topic,
            generated_at: Utc::now(),
        };
        inner.generated.push(post.clone());
        Ok(post)
    }

    async fn generated_posts(&self, user_id: Uuid, limit: i64) -> Result<Vec<GeneratedPost>> {
        let inner = self.inner.lock().unwrap();
        let mut posts: Vec<GeneratedPost> = inner
            .generated
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatorpulse_common::{HookType, PostType, Sentiment};

    fn new_post(creator_id: Uuid, external_id: &str, likes: i64) -> NewPost {
        NewPost {
            creator_id,
            platform: Platform::Instagram,
            external_id: external_id.to_string(),
            post_type: PostType::Reel,
            caption: "caption".to_string(),
            media_url: String::new(),
            thumbnail_url: String::new(),
            likes,
            comments: 0,
            shares: 0,
            views: 0,
            posted_at: None,
            engagement_rate: 1.0,
        }
    }

    async fn seed_creator(store: &MemoryStore) -> (Uuid, Uuid) {
        let user = store.ensure_user("test@example.com").await.unwrap();
        let creator = store
            .upsert_creator(NewTrackedCreator {
                user_id: user.id,
                platform: Platform::Instagram,
                handle: "fitness_guru".to_string(),
                display_name: "Fitness Guru".to_string(),
                follower_count: 10_000,
                bio: String::new(),
                avatar_url: String::new(),
                cid: None,
            })
            .await
            .unwrap();
        (user.id, creator.id)
    }

    #[tokio::test]
    async fn post_upsert_is_keyed_on_platform_and_external_id() {
        let store = MemoryStore::new();
        let (_, creator_id) = seed_creator(&store).await;

        let first = store.upsert_post(new_post(creator_id, "abc", 10)).await.unwrap();
        let second = store.upsert_post(new_post(creator_id, "abc", 99)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.likes, 99);
    }

    #[tokio::test]
    async fn creator_upsert_never_duplicates() {
        let store = MemoryStore::new();
        let (user_id, creator_id) = seed_creator(&store).await;

        let again = store
            .upsert_creator(NewTrackedCreator {
                user_id,
                platform: Platform::Instagram,
                handle: "fitness_guru".to_string(),
                display_name: "Renamed".to_string(),
                follower_count: 20_000,
                bio: String::new(),
                avatar_url: String::new(),
                cid: Some("INST:1".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(again.id, creator_id);
        assert_eq!(again.follower_count, 20_000);
        assert_eq!(store.creators_for_user(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn second_analysis_for_a_post_is_rejected() {
        let store = MemoryStore::new();
        let (_, creator_id) = seed_creator(&store).await;
        let post = store.upsert_post(new_post(creator_id, "abc", 10)).await.unwrap();

        let analysis = NewPostAnalysis {
            post_id: post.id,
            hook_type: HookType::Question,
            content_format: "reel".to_string(),
            topic: "fitness".to_string(),
            why_it_worked: "hook".to_string(),
            sentiment: Sentiment::Educational,
            key_takeaways: vec![],
        };
        store.insert_analysis(analysis.clone()).await.unwrap();
        assert!(store.insert_analysis(analysis).await.is_err());
    }

    #[tokio::test]
    async fn replace_insights_removes_prior_set() {
        let store = MemoryStore::new();
        let user = store.ensure_user("test@example.com").await.unwrap();

        let insight = |text: &str| NewNicheInsight {
            insight_type: creatorpulse_common::InsightType::Hook,
            insight_text: text.to_string(),
            data_points: 3,
        };

        store.replace_insights(user.id, vec![insight("old")]).await.unwrap();
        let count = store
            .replace_insights(user.id, vec![insight("new a"), insight("new b")])
            .await
            .unwrap();

        assert_eq!(count, 2);
        let current = store.recent_insights(user.id, 10).await.unwrap();
        assert_eq!(current.len(), 2);
        assert!(current.iter().all(|i| i.insight_text.starts_with("new")));
    }
}
