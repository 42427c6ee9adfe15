//! Post draft generation from the user's current insight set.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use ai_client::{extract_json_object, CompletionModel};
use creatorpulse_common::{Platform, PulseError};
use creatorpulse_store::{DashboardStore, GeneratedPost, NewGeneratedPost, NicheInsight};

use crate::prompts;

/// Insights fed into one generation, newest first.
const GENERATION_INSIGHT_COUNT: i64 = 10;

/// Hashtag cap enforced on persistence regardless of what the model returns.
const MAX_HASHTAGS: usize = 15;

/// Optional user steering for a generation.
#[derive(Debug, Clone, Default)]
pub struct PostPreferences {
    pub content_format: Option<String>,
    pub topic: Option<String>,
}

/// A parsed draft as returned by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedDraft {
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(rename = "formatTips", default)]
    pub format_tips: String,
    #[serde(rename = "postingTips", default)]
    pub posting_tips: String,
    #[serde(rename = "suggestedFormat", default)]
    pub suggested_format: String,
}

/// Generate a draft from the supplied insights. Does not validate caller
/// preconditions: an empty insight list still produces a model call. A
/// response that cannot be parsed fails with an error whose message reaches
/// the user verbatim.
pub async fn generate_post(
    model: &dyn CompletionModel,
    niche: &str,
    platform: Platform,
    insights: &[NicheInsight],
    preferences: &PostPreferences,
) -> Result<GeneratedDraft, PulseError> {
    let prompt = prompts::generation_prompt(niche, platform.as_str(), insights, preferences);
    let text = model
        .complete(&prompt)
        .await
        .map_err(|e| PulseError::Provider(e.to_string()))?;

    extract_json_object(&text).ok_or(PulseError::ParseResponse("generation"))
}

/// Full user-facing flow: enforce preconditions, generate, persist.
pub async fn generate_and_save(
    store: &dyn DashboardStore,
    model: &dyn CompletionModel,
    user_id: Uuid,
    platform: Platform,
    preferences: PostPreferences,
) -> Result<GeneratedPost, PulseError> {
    let user = store
        .get_user(user_id)
        .await?
        .ok_or_else(|| PulseError::NotFound(format!("user {user_id}")))?;
    let niche = user
        .niche
        .filter(|n| !n.trim().is_empty())
        .ok_or(PulseError::NoNiche)?;

    let insights = store
        .recent_insights(user_id, GENERATION_INSIGHT_COUNT)
        .await?;
    if insights.is_empty() {
        return Err(PulseError::NoInsights);
    }

    let draft = generate_post(model, &niche, platform, &insights, &preferences).await?;

    let content_format = if draft.suggested_format.is_empty() {
        preferences.content_format.clone().unwrap_or_default()
    } else {
        draft.suggested_format.clone()
    };

    let mut hashtags = draft.hashtags;
    hashtags.truncate(MAX_HASHTAGS);

    let saved = store
        .insert_generated_post(NewGeneratedPost {
            user_id,
            platform,
            content_format,
            caption: draft.caption,
            hashtags,
            format_tips: draft.format_tips,
            posting_tips: draft.posting_tips,
            topic: preferences.topic,
        })
        .await?;

    info!(%user_id, %platform, draft_id = %saved.id, "Post draft generated");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatorpulse_store::MemoryStore;

    use crate::testing::{new_insight, FixtureModel};

    const DRAFT_JSON: &str = r#"{
  "caption": "Stop guessing. Start growing. Here's the routine... Save this!",
  "hashtags": ["fitness", "growth", "routine"],
  "formatTips": "Film vertical, cut every 2 seconds",
  "postingTips": "Post at 7am weekdays",
  "suggestedFormat": "reel"
}"#;

    async fn onboarded_user_with_insights(store: &MemoryStore) -> Uuid {
        let user = store.ensure_user("gen@example.com").await.unwrap();
        store
            .complete_onboarding(user.id, "Fitness & Health", &[Platform::Instagram], None)
            .await
            .unwrap();
        store
            .replace_insights(
                user.id,
                vec![
                    new_insight("Question hooks win"),
                    new_insight("Reels outperform"),
                ],
            )
            .await
            .unwrap();
        user.id
    }

    #[tokio::test]
    async fn draft_round_trips_through_the_store() {
        let store = MemoryStore::new();
        let user_id = onboarded_user_with_insights(&store).await;

        let model = FixtureModel::new().then_text(DRAFT_JSON);
        let saved = generate_and_save(
            &store,
            &model,
            user_id,
            Platform::Instagram,
            PostPreferences::default(),
        )
        .await
        .unwrap();

        assert!(saved.caption.starts_with("Stop guessing."));
        assert_eq!(saved.hashtags, vec!["fitness", "growth", "routine"]);
        assert_eq!(saved.content_format, "reel");

        let listed = store.generated_posts(user_id, 20).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn every_generation_appends_a_new_row() {
        let store = MemoryStore::new();
        let user_id = onboarded_user_with_insights(&store).await;

        for _ in 0..2 {
            let model = FixtureModel::new().then_text(DRAFT_JSON);
            generate_and_save(
                &store,
                &model,
                user_id,
                Platform::Instagram,
                PostPreferences::default(),
            )
            .await
            .unwrap();
        }
        assert_eq!(store.generated_posts(user_id, 20).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fenced_draft_parses_like_bare_json() {
        let store = MemoryStore::new();
        let user_id = onboarded_user_with_insights(&store).await;

        let fenced = format!("```json\n{DRAFT_JSON}\n```");
        let model = FixtureModel::new().then_text(fenced);
        let saved = generate_and_save(
            &store,
            &model,
            user_id,
            Platform::Instagram,
            PostPreferences::default(),
        )
        .await
        .unwrap();
        assert_eq!(saved.content_format, "reel");
    }

    #[tokio::test]
    async fn unparseable_draft_surfaces_the_error() {
        let store = MemoryStore::new();
        let user_id = onboarded_user_with_insights(&store).await;

        let model = FixtureModel::new().then_text("no json here, sorry");
        let err = generate_and_save(
            &store,
            &model,
            user_id,
            Platform::Instagram,
            PostPreferences::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse generation response");
        assert!(store.generated_posts(user_id, 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_insights_fail_before_the_model_is_called() {
        let store = MemoryStore::new();
        let user = store.ensure_user("noinsights@example.com").await.unwrap();
        store
            .complete_onboarding(user.id, "Travel", &[Platform::Tiktok], None)
            .await
            .unwrap();

        let model = FixtureModel::new();
        let err = generate_and_save(
            &store,
            &model,
            user.id,
            Platform::Tiktok,
            PostPreferences::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PulseError::NoInsights));
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn hashtags_are_capped_at_fifteen() {
        let store = MemoryStore::new();
        let user_id = onboarded_user_with_insights(&store).await;

        let tags: Vec<String> = (0..30).map(|i| format!("tag{i}")).collect();
        let response = serde_json::json!({
            "caption": "c",
            "hashtags": tags,
            "formatTips": "",
            "postingTips": "",
            "suggestedFormat": "static"
        })
        .to_string();

        let model = FixtureModel::new().then_text(response);
        let saved = generate_and_save(
            &store,
            &model,
            user_id,
            Platform::Instagram,
            PostPreferences::default(),
        )
        .await
        .unwrap();
        assert_eq!(saved.hashtags.len(), 15);
    }

    #[tokio::test]
    async fn generate_post_alone_does_not_validate_insights() {
        // The low-level call runs even with zero insights; precondition
        // enforcement belongs to generate_and_save.
        let model = FixtureModel::new().then_text(DRAFT_JSON);
        let draft = generate_post(
            &model,
            "Travel",
            Platform::Tiktok,
            &[],
            &PostPreferences::default(),
        )
        .await
        .unwrap();
        assert!(!draft.caption.is_empty());
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn preferred_format_is_used_when_model_omits_one() {
        let store = MemoryStore::new();
        let user_id = onboarded_user_with_insights(&store).await;

        let response = r#"{"caption": "c", "hashtags": [], "formatTips": "",
            "postingTips": "", "suggestedFormat": ""}"#;
        let model = FixtureModel::new().then_text(response);
        let saved = generate_and_save(
            &store,
            &model,
            user_id,
            Platform::Instagram,
            PostPreferences {
                content_format: Some("carousel".to_string()),
                topic: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(saved.content_format, "carousel");
    }
}
