//! Niche insight aggregation: one batch prompt over the user's analyzed
//! posts, replacing the full insight set on success.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use ai_client::{extract_json_array, CompletionModel};
use creatorpulse_common::{InsightType, PulseError};
use creatorpulse_store::{DashboardStore, NewNicheInsight};

use crate::prompts;

/// Minimum analyzed posts before insights mean anything.
pub const MIN_ANALYZED_POSTS: usize = 3;

/// Sample cap. Ordered by engagement descending, so the model sees the top
/// performers; the product question is "what's working".
const INSIGHT_SAMPLE_SIZE: i64 = 50;

#[derive(Debug, Deserialize)]
struct InsightResponse {
    #[serde(rename = "insightType")]
    insight_type: String,
    #[serde(rename = "insightText")]
    insight_text: String,
    #[serde(rename = "dataPoints", default)]
    data_points: Option<i64>,
}

/// Regenerate the user's niche insights from their analyzed posts.
///
/// Fails fast, before any model call, when the user has no niche or
/// fewer than [`MIN_ANALYZED_POSTS`] analyzed posts. On success the prior
/// insight set is fully replaced; returns the number of inserted insights.
pub async fn generate_insights_for_user(
    store: &dyn DashboardStore,
    model: &dyn CompletionModel,
    user_id: Uuid,
) -> Result<u64, PulseError> {
    let user = store
        .get_user(user_id)
        .await?
        .ok_or_else(|| PulseError::NotFound(format!("user {user_id}")))?;
    let niche = user
        .niche
        .filter(|n| !n.trim().is_empty())
        .ok_or(PulseError::NoNiche)?;

    let samples = store
        .analyzed_posts_by_engagement(user_id, INSIGHT_SAMPLE_SIZE)
        .await?;
    if samples.len() < MIN_ANALYZED_POSTS {
        return Err(PulseError::NotEnoughAnalyzedPosts);
    }

    let prompt = prompts::insights_prompt(&niche, &samples);
    let text = model
        .complete(&prompt)
        .await
        .map_err(|e| PulseError::Provider(e.to_string()))?;

    let parsed: Vec<InsightResponse> =
        extract_json_array(&text).ok_or(PulseError::ParseResponse("insights"))?;

    let inserts: Vec<NewNicheInsight> = parsed
        .into_iter()
        .map(|i| NewNicheInsight {
            insight_type: InsightType::from_tag(&i.insight_type),
            insight_text: i.insight_text,
            data_points: i.data_points.unwrap_or(0) as i32,
        })
        .collect();

    let count = store.replace_insights(user_id, inserts).await?;
    info!(%user_id, %niche, count, "Insights regenerated");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatorpulse_common::Platform;
    use creatorpulse_store::MemoryStore;

    use crate::analysis::analyze_unanalyzed_posts;
    use crate::testing::{seeded_user_with_posts, FixtureModel};

    const INSIGHTS_JSON: &str = r#"[
  {"insightType": "hook", "insightText": "Question hooks outperform by 2x", "dataPoints": 4},
  {"insightType": "format", "insightText": "Reels beat static posts", "dataPoints": 6},
  {"insightType": "timing", "insightText": "Morning posts win"},
  {"insightType": "topic", "insightText": "Routines resonate", "dataPoints": 3},
  {"insightType": "engagement", "insightText": "CTAs lift comments", "dataPoints": 5}
]"#;

    fn analysis_json() -> String {
        r#"{"hookType": "question", "contentFormat": "reel", "topic": "fitness",
            "whyItWorked": "hook", "sentiment": "educational", "keyTakeaways": []}"#
            .to_string()
    }

    async fn seeded_analyzed_user(store: &MemoryStore, posts: usize) -> Uuid {
        let user_id = seeded_user_with_posts(store, Platform::Instagram, posts).await;
        let mut model = FixtureModel::new();
        for _ in 0..posts {
            model = model.then_text(analysis_json());
        }
        analyze_unanalyzed_posts(store, &model, user_id).await.unwrap();
        user_id
    }

    #[tokio::test]
    async fn no_niche_fails_before_any_model_call() {
        let store = MemoryStore::new();
        let user = store.ensure_user("bare@example.com").await.unwrap();
        let model = FixtureModel::new();

        let err = generate_insights_for_user(&store, &model, user.id)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User has no niche set");
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn fewer_than_three_analyzed_posts_fails_fast() {
        let store = MemoryStore::new();
        let user_id = seeded_analyzed_user(&store, 2).await;
        let model = FixtureModel::new();

        let err = generate_insights_for_user(&store, &model, user_id)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Need at least 3 analyzed posts to generate insights"
        );
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn success_replaces_the_prior_insight_set() {
        let store = MemoryStore::new();
        let user_id = seeded_analyzed_user(&store, 3).await;

        // First generation.
        let model = FixtureModel::new().then_text(INSIGHTS_JSON);
        let count = generate_insights_for_user(&store, &model, user_id)
            .await
            .unwrap();
        assert_eq!(count, 5);

        // Second generation with a different set; the first must be gone.
        let replacement = r#"[
  {"insightType": "hook", "insightText": "Fresh insight A", "dataPoints": 3},
  {"insightType": "format", "insightText": "Fresh insight B", "dataPoints": 3}
]"#;
        let model = FixtureModel::new().then_text(replacement);
        let count = generate_insights_for_user(&store, &model, user_id)
            .await
            .unwrap();
        assert_eq!(count, 2);

        let current = store.recent_insights(user_id, 50).await.unwrap();
        assert_eq!(current.len(), 2);
        assert!(current.iter().all(|i| i.insight_text.starts_with("Fresh")));
    }

    #[tokio::test]
    async fn missing_data_points_default_to_zero() {
        let store = MemoryStore::new();
        let user_id = seeded_analyzed_user(&store, 3).await;

        let model = FixtureModel::new().then_text(INSIGHTS_JSON);
        generate_insights_for_user(&store, &model, user_id)
            .await
            .unwrap();

        let current = store.recent_insights(user_id, 50).await.unwrap();
        let timing = current
            .iter()
            .find(|i| i.insight_type == InsightType::Timing)
            .unwrap();
        assert_eq!(timing.data_points, 0);
    }

    #[tokio::test]
    async fn unparseable_response_fails_the_whole_call() {
        let store = MemoryStore::new();
        let user_id = seeded_analyzed_user(&store, 3).await;

        // Pre-existing insights must survive a failed regeneration.
        let model = FixtureModel::new().then_text(INSIGHTS_JSON);
        generate_insights_for_user(&store, &model, user_id)
            .await
            .unwrap();

        let model = FixtureModel::new().then_text("I could not produce insights today.");
        let err = generate_insights_for_user(&store, &model, user_id)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse insights response");
        assert_eq!(store.recent_insights(user_id, 50).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn fenced_array_parses_like_bare_array() {
        let store = MemoryStore::new();
        let user_id = seeded_analyzed_user(&store, 3).await;

        let fenced = format!("```json\n{INSIGHTS_JSON}\n```");
        let model = FixtureModel::new().then_text(fenced);
        let count = generate_insights_for_user(&store, &model, user_id)
            .await
            .unwrap();
        assert_eq!(count, 5);
    }

    #[tokio::test]
    async fn prompt_embeds_niche_and_sample_count() {
        let store = MemoryStore::new();
        let user_id = seeded_analyzed_user(&store, 4).await;

        let model = FixtureModel::new().then_text(INSIGHTS_JSON);
        generate_insights_for_user(&store, &model, user_id)
            .await
            .unwrap();

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("these 4 posts"));
        assert!(prompts[0].contains("\"Fitness & Health\" niche"));
        assert!(prompts[0].contains("1. [instagram/"));
    }
}
