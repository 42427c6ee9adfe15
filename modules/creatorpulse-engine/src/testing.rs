//! Fixture implementations of the collaborator traits for tests.
//!
//! `FixtureModel` replays a scripted sequence of completion replies and
//! records every prompt it receives; `FixtureContentProvider` serves canned
//! search/post results or scripted failures. Both stand in for the live
//! clients behind the same traits, so pipeline code cannot tell the
//! difference.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use ai_client::CompletionModel;
use creatorpulse_common::{HookType, InsightType, Platform, PostType, Sentiment};
use creatorpulse_store::{
    AnalyzedPost, DashboardStore, MemoryStore, NewNicheInsight, NewPost, NewTrackedCreator,
    NicheInsight, Post, PostAnalysis,
};

use crate::provider::{ContentProvider, CreatorCandidate, PostRecord};

// --- FixtureModel ---

enum Reply {
    Text(String),
    Error(String),
}

#[derive(Default)]
pub struct FixtureModel {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl FixtureModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Text(text.into()));
        self
    }

    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Error(message.into()));
        self
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for FixtureModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Error(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("FixtureModel has no scripted reply left")),
        }
    }
}

// --- FixtureContentProvider ---

#[derive(Default)]
pub struct FixtureContentProvider {
    tag_results: Vec<CreatorCandidate>,
    query_results: Vec<CreatorCandidate>,
    cid: Option<String>,
    posts: Vec<PostRecord>,
    fail_search: bool,
    fail_posts: bool,
}

impl FixtureContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag_results(mut self, results: Vec<CreatorCandidate>) -> Self {
        self.tag_results = results;
        self
    }

    pub fn with_query_results(mut self, results: Vec<CreatorCandidate>) -> Self {
        self.query_results = results;
        self
    }

    pub fn with_cid(mut self, cid: &str) -> Self {
        self.cid = Some(cid.to_string());
        self
    }

    pub fn with_posts(mut self, posts: Vec<PostRecord>) -> Self {
        self.posts = posts;
        self
    }

    pub fn with_search_failure(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn with_posts_failure(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    /// A minimal real-looking candidate.
    pub fn candidate(platform: Platform, handle: &str) -> CreatorCandidate {
        CreatorCandidate {
            handle: handle.to_string(),
            display_name: handle.to_string(),
            platform,
            follower_count: 0,
            bio: String::new(),
            avatar_url: String::new(),
            cid: None,
            avg_er: Some(3.2),
            quality_score: Some(0.8),
        }
    }

    /// A minimal normalized post record.
    pub fn post(platform: Platform, external_id: &str) -> PostRecord {
        PostRecord {
            external_id: external_id.to_string(),
            platform,
            post_type: match platform {
                Platform::Instagram => PostType::Reel,
                Platform::Tiktok => PostType::Video,
            },
            caption: "Scripted caption for tests".to_string(),
            media_url: String::new(),
            thumbnail_url: String::new(),
            likes: 100,
            comments: 10,
            shares: 5,
            views: 1_000,
            posted_at: Some(Utc::now()),
            engagement_rate: 2.5,
        }
    }
}

#[async_trait]
impl ContentProvider for FixtureContentProvider {
    async fn search_by_tag(
        &self,
        _platform: Platform,
        _tag: &str,
    ) -> Result<Vec<CreatorCandidate>> {
        if self.fail_search {
            return Err(anyhow!("scripted search failure"));
        }
        Ok(self.tag_results.clone())
    }

    async fn search_by_query(
        &self,
        _platform: Platform,
        _query: &str,
    ) -> Result<Vec<CreatorCandidate>> {
        if self.fail_search {
            return Err(anyhow!("scripted search failure"));
        }
        Ok(self.query_results.clone())
    }

    async fn resolve_cid(&self, _platform: Platform, _handle: &str) -> Result<Option<String>> {
        Ok(self.cid.clone())
    }

    async fn recent_posts(&self, _platform: Platform, _cid: &str) -> Result<Vec<PostRecord>> {
        if self.fail_posts {
            return Err(anyhow!("scripted posts failure"));
        }
        Ok(self.posts.clone())
    }
}

// --- Entity builders ---

pub fn stored_post(platform: Platform, external_id: &str) -> Post {
    Post {
        id: Uuid::new_v4(),
        creator_id: Uuid::new_v4(),
        platform,
        external_id: external_id.to_string(),
        post_type: match platform {
            Platform::Instagram => PostType::Reel,
            Platform::Tiktok => PostType::Video,
        },
        caption: "Stored caption".to_string(),
        media_url: String::new(),
        thumbnail_url: String::new(),
        likes: 100,
        comments: 10,
        shares: 5,
        views: 1_000,
        posted_at: Some(Utc::now()),
        engagement_rate: 2.5,
        created_at: Utc::now(),
    }
}

pub fn analyzed_post(platform: Platform, external_id: &str) -> AnalyzedPost {
    let post = stored_post(platform, external_id);
    let analysis = PostAnalysis {
        id: Uuid::new_v4(),
        post_id: post.id,
        hook_type: HookType::Question,
        content_format: "short-form video".to_string(),
        topic: "testing".to_string(),
        why_it_worked: "Strong hook.".to_string(),
        sentiment: Sentiment::Educational,
        key_takeaways: vec!["lead with the hook".to_string()],
        analyzed_at: Utc::now(),
    };
    AnalyzedPost { post, analysis }
}

pub fn new_insight(text: &str) -> NewNicheInsight {
    NewNicheInsight {
        insight_type: InsightType::Hook,
        insight_text: text.to_string(),
        data_points: 3,
    }
}

pub fn insight(text: &str) -> NicheInsight {
    NicheInsight {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        insight_type: InsightType::Hook,
        insight_text: text.to_string(),
        data_points: 3,
        generated_at: Utc::now(),
    }
}

/// Seed an onboarded user with one tracked creator and `posts` unanalyzed
/// posts, returning the user id.
pub async fn seeded_user_with_posts(
    store: &MemoryStore,
    platform: Platform,
    posts: usize,
) -> Uuid {
    let user = store.ensure_user("seeded@example.com").await.unwrap();
    store
        .complete_onboarding(user.id, "Fitness & Health", &[platform], None)
        .await
        .unwrap();

    let creator = store
        .upsert_creator(NewTrackedCreator {
            user_id: user.id,
            platform,
            handle: "seeded_creator".to_string(),
            display_name: "Seeded Creator".to_string(),
            follower_count: 10_000,
            bio: String::new(),
            avatar_url: String::new(),
            cid: Some("INST:seed".to_string()),
        })
        .await
        .unwrap();

    for i in 0..posts {
        store
            .upsert_post(NewPost {
                creator_id: creator.id,
                platform,
                external_id: format!("seed_{i}"),
                post_type: match platform {
                    Platform::Instagram => PostType::Reel,
                    Platform::Tiktok => PostType::Video,
                },
                caption: format!("Seeded caption {i}"),
                media_url: String::new(),
                thumbnail_url: String::new(),
                likes: 100 + i as i64,
                comments: 10,
                shares: 5,
                views: 1_000,
                posted_at: Some(Utc::now()),
                engagement_rate: 1.0 + i as f64,
            })
            .await
            .unwrap();
    }

    user.id
}
