//! Prompt construction for the three completion-model consumers. Each
//! prompt embeds all instructions in a single user turn and demands bare
//! JSON; responses still get the two-phase recovery parse since models
//! routinely wrap output in code fences anyway.

use creatorpulse_store::{AnalyzedPost, NicheInsight, Post};

use crate::generator::PostPreferences;

/// Caption excerpt length used in the insight batch summaries.
const SUMMARY_CAPTION_CHARS: usize = 100;

pub fn analysis_prompt(post: &Post) -> String {
    format!(
        r#"Analyze this {platform} {post_type} post. Return JSON only, no markdown.

Caption: "{caption}"
Engagement Rate: {engagement:.2}%
Format: {post_type}

Return this exact JSON structure:
{{
  "hookType": "question|bold_statement|story|statistic|controversial|how_to|listicle|behind_the_scenes|other",
  "contentFormat": "description of the content format and style",
  "topic": "main topic/theme",
  "whyItWorked": "2-3 sentence explanation of why this post performed well",
  "sentiment": "positive|negative|neutral|inspirational|educational|entertaining",
  "keyTakeaways": ["takeaway 1", "takeaway 2", "takeaway 3"]
}}"#,
        platform = post.platform,
        post_type = post.post_type,
        caption = post.caption,
        engagement = post.engagement_rate,
    )
}

/// One line per sampled post: position, platform/format, hook, engagement,
/// and a caption excerpt.
pub fn post_summary_line(index: usize, sample: &AnalyzedPost) -> String {
    let excerpt: String = sample
        .post
        .caption
        .chars()
        .take(SUMMARY_CAPTION_CHARS)
        .collect();
    format!(
        "{n}. [{platform}/{post_type}] Hook: {hook} | ER: {engagement:.2}% | \"{excerpt}...\"",
        n = index + 1,
        platform = sample.post.platform,
        post_type = sample.post.post_type,
        hook = sample.analysis.hook_type,
        engagement = sample.post.engagement_rate,
    )
}

pub fn insights_prompt(niche: &str, samples: &[AnalyzedPost]) -> String {
    let summary = samples
        .iter()
        .enumerate()
        .map(|(i, s)| post_summary_line(i, s))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a social media analyst. Analyze these {count} posts from the "{niche}" niche and generate actionable insights.

Posts:
{summary}

Return a JSON array of insights. Each insight should have:
{{
  "insightType": "format|timing|hook|topic|engagement",
  "insightText": "Clear, actionable insight with specific data (e.g., 'Carousel posts get 2.3x more engagement than static posts in your niche')",
  "dataPoints": number_of_posts_supporting_this
}}

Generate 5-8 insights. Be specific with numbers and percentages. JSON array only, no markdown."#,
        count = samples.len(),
    )
}

pub fn generation_prompt(
    niche: &str,
    platform: &str,
    insights: &[NicheInsight],
    preferences: &PostPreferences,
) -> String {
    let insight_lines = insights
        .iter()
        .enumerate()
        .map(|(i, insight)| {
            format!(
                "{}. [{}] {}",
                i + 1,
                insight.insight_type,
                insight.insight_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut preference_lines = String::new();
    if let Some(format) = &preferences.content_format {
        preference_lines.push_str(&format!("\nPreferred format: {format}"));
    }
    if let Some(topic) = &preferences.topic {
        preference_lines.push_str(&format!("\nTopic/angle: {topic}"));
    }

    format!(
        r#"You are a social media content strategist for the "{niche}" niche. Create a ready-to-publish {platform} post using these insights about what performs well:

{insight_lines}{preference_lines}

The caption must open with a scroll-stopping hook and close with a call-to-action.

Return this exact JSON structure, JSON only, no markdown:
{{
  "caption": "the full post caption",
  "hashtags": ["up to 15 relevant hashtags without the # prefix"],
  "formatTips": "how to shoot and structure this post",
  "postingTips": "when to post and how to maximize reach",
  "suggestedFormat": "reel|carousel|static|story|video"
}}"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use creatorpulse_common::{HookType, Platform, PostType};

    #[test]
    fn analysis_prompt_formats_engagement_to_two_decimals() {
        let mut post = testing::stored_post(Platform::Instagram, "abc");
        post.engagement_rate = 4.5;
        post.post_type = PostType::Carousel;
        let prompt = analysis_prompt(&post);
        assert!(prompt.contains("Engagement Rate: 4.50%"));
        assert!(prompt.contains("instagram carousel post"));
        assert!(prompt.contains("\"hookType\""));
    }

    #[test]
    fn summary_lines_are_one_indexed_and_truncated() {
        let mut sample = testing::analyzed_post(Platform::Tiktok, "xyz");
        sample.post.caption = "x".repeat(300);
        sample.post.engagement_rate = 7.1;
        sample.analysis.hook_type = HookType::Question;

        let line = post_summary_line(0, &sample);
        assert!(line.starts_with("1. [tiktok/video] Hook: question | ER: 7.10%"));
        // 100 chars of caption plus the ellipsis marker
        assert!(line.contains(&format!("\"{}...\"", "x".repeat(100))));
    }

    #[test]
    fn generation_prompt_includes_optional_preferences() {
        let insights = vec![testing::insight("Hooks with questions outperform")];
        let prefs = PostPreferences {
            content_format: Some("reel".to_string()),
            topic: Some("morning routines".to_string()),
        };
        let prompt = generation_prompt("Fitness & Health", "instagram", &insights, &prefs);
        assert!(prompt.contains("1. [hook] Hooks with questions outperform"));
        assert!(prompt.contains("Preferred format: reel"));
        assert!(prompt.contains("Topic/angle: morning routines"));

        let bare = generation_prompt(
            "Fitness & Health",
            "instagram",
            &insights,
            &PostPreferences::default(),
        );
        assert!(!bare.contains("Preferred format:"));
        assert!(!bare.contains("Topic/angle:"));
    }
}
