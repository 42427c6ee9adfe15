//! Per-post analysis orchestration: select unanalyzed posts, call the
//! completion model once per post, persist each structured judgment.

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use ai_client::{extract_json_object, CompletionModel};
use creatorpulse_common::{HookType, PulseError, Sentiment};
use creatorpulse_store::{DashboardStore, NewPostAnalysis, Post, PostAnalysis};

use crate::prompts;

/// Posts analyzed per invocation. Each one costs a model round-trip, so the
/// batch stays small and a user can re-trigger to work through a backlog.
const ANALYSIS_BATCH_SIZE: i64 = 10;

/// Response schema for the per-post analysis call.
#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(rename = "hookType")]
    hook_type: String,
    #[serde(rename = "contentFormat", default)]
    content_format: String,
    #[serde(default)]
    topic: String,
    #[serde(rename = "whyItWorked", default)]
    why_it_worked: String,
    #[serde(default)]
    sentiment: String,
    #[serde(rename = "keyTakeaways", default)]
    key_takeaways: Vec<String>,
}

/// Analyze up to [`ANALYSIS_BATCH_SIZE`] of the user's posts that have no
/// analysis yet.
///
/// Calls are issued one at a time; the batch never puts more than one
/// concurrent request on the model. A failed call or unparseable response
/// skips that post and the batch continues; the returned list holds only
/// the analyses that were actually persisted.
pub async fn analyze_unanalyzed_posts(
    store: &dyn DashboardStore,
    model: &dyn CompletionModel,
    user_id: Uuid,
) -> Result<Vec<PostAnalysis>, PulseError> {
    let posts = store.unanalyzed_posts(user_id, ANALYSIS_BATCH_SIZE).await?;
    if posts.is_empty() {
        info!(%user_id, "No unanalyzed posts");
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    for post in &posts {
        match analyze_post(model, post).await {
            Ok(new) => match store.insert_analysis(new).await {
                Ok(analysis) => results.push(analysis),
                Err(e) => {
                    warn!(post_id = %post.id, error = %e, "Failed to persist analysis");
                }
            },
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "Failed to analyze post");
            }
        }
    }

    info!(
        %user_id,
        analyzed = results.len(),
        batch = posts.len(),
        "Analysis batch complete"
    );
    Ok(results)
}

async fn analyze_post(
    model: &dyn CompletionModel,
    post: &Post,
) -> Result<NewPostAnalysis, PulseError> {
    let prompt = prompts::analysis_prompt(post);
    let text = model
        .complete(&prompt)
        .await
        .map_err(|e| PulseError::Provider(e.to_string()))?;

    let parsed: AnalysisResponse =
        extract_json_object(&text).ok_or(PulseError::ParseResponse("analysis"))?;

    Ok(NewPostAnalysis {
        post_id: post.id,
        hook_type: HookType::from_tag(&parsed.hook_type),
        content_format: parsed.content_format,
        topic: parsed.topic,
        why_it_worked: parsed.why_it_worked,
        sentiment: Sentiment::from_tag(&parsed.sentiment),
        key_takeaways: parsed.key_takeaways,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatorpulse_common::Platform;
    use creatorpulse_store::MemoryStore;

    use crate::testing::{seeded_user_with_posts, FixtureModel};

    fn analysis_json(hook: &str) -> String {
        format!(
            r#"{{
  "hookType": "{hook}",
  "contentFormat": "short-form video",
  "topic": "fitness",
  "whyItWorked": "Strong hook. Clear payoff.",
  "sentiment": "educational",
  "keyTakeaways": ["lead with the hook"]
}}"#
        )
    }

    #[tokio::test]
    async fn failed_post_is_skipped_and_batch_continues() {
        let store = MemoryStore::new();
        let user_id = seeded_user_with_posts(&store, Platform::Instagram, 2).await;

        let model = FixtureModel::new()
            .then_text("This is not JSON at all")
            .then_text(analysis_json("question"));

        let results = analyze_unanalyzed_posts(&store, &model, user_id)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hook_type, HookType::Question);

        // The failed post stays unanalyzed for the next batch.
        assert_eq!(store.unanalyzed_posts(user_id, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn model_error_is_tolerated_per_post() {
        let store = MemoryStore::new();
        let user_id = seeded_user_with_posts(&store, Platform::Instagram, 2).await;

        let model = FixtureModel::new()
            .then_error("connection reset")
            .then_text(analysis_json("story"));

        let results = analyze_unanalyzed_posts(&store, &model, user_id)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hook_type, HookType::Story);
    }

    #[tokio::test]
    async fn fenced_json_parses_like_bare_json() {
        let store = MemoryStore::new();
        let user_id = seeded_user_with_posts(&store, Platform::Instagram, 1).await;

        let fenced = format!("```json\n{}\n```", analysis_json("listicle"));
        let model = FixtureModel::new().then_text(fenced);

        let results = analyze_unanalyzed_posts(&store, &model, user_id)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hook_type, HookType::Listicle);
    }

    #[tokio::test]
    async fn unrecognized_tags_fall_back_instead_of_persisting_raw() {
        let store = MemoryStore::new();
        let user_id = seeded_user_with_posts(&store, Platform::Instagram, 1).await;

        let response = r#"{"hookType": "clickbait", "contentFormat": "", "topic": "",
            "whyItWorked": "", "sentiment": "sarcastic", "keyTakeaways": []}"#;
        let model = FixtureModel::new().then_text(response);

        let results = analyze_unanalyzed_posts(&store, &model, user_id)
            .await
            .unwrap();
        assert_eq!(results[0].hook_type, HookType::Other);
        assert_eq!(results[0].sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn missing_takeaways_default_to_empty() {
        let store = MemoryStore::new();
        let user_id = seeded_user_with_posts(&store, Platform::Instagram, 1).await;

        let response = r#"{"hookType": "question", "contentFormat": "f", "topic": "t",
            "whyItWorked": "w", "sentiment": "positive"}"#;
        let model = FixtureModel::new().then_text(response);

        let results = analyze_unanalyzed_posts(&store, &model, user_id)
            .await
            .unwrap();
        assert!(results[0].key_takeaways.is_empty());
    }

    #[tokio::test]
    async fn zero_eligible_posts_returns_empty_without_model_calls() {
        let store = MemoryStore::new();
        let user = store.ensure_user("empty@example.com").await.unwrap();
        let model = FixtureModel::new();

        let results = analyze_unanalyzed_posts(&store, &model, user.id)
            .await
            .unwrap();
        assert!(results.is_empty());
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn analyzed_posts_are_excluded_from_later_batches() {
        let store = MemoryStore::new();
        let user_id = seeded_user_with_posts(&store, Platform::Instagram, 1).await;

        let model = FixtureModel::new().then_text(analysis_json("question"));
        analyze_unanalyzed_posts(&store, &model, user_id)
            .await
            .unwrap();

        // Second run sees nothing and makes no calls.
        let model = FixtureModel::new();
        let results = analyze_unanalyzed_posts(&store, &model, user_id)
            .await
            .unwrap();
        assert!(results.is_empty());
        assert!(model.prompts().is_empty());
    }
}
