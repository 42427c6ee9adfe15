//! Creator discovery: niche → provider tag translation plus the
//! tag-search → query-search → fixture fallback chain.

use tracing::warn;

use creatorpulse_common::Platform;

use crate::fixtures;
use crate::provider::{ContentProvider, CreatorCandidate};

/// Niche names offered at onboarding mapped to the provider's tag slugs.
/// Anything else goes through [`slugify`].
const NICHE_TAGS: &[(&str, &str)] = &[
    ("Fitness & Health", "fitness"),
    ("Cooking & Food", "food-and-cooking"),
    ("Tech Reviews", "technology-and-science"),
    ("Fashion & Style", "fashion"),
    ("Beauty & Skincare", "beauty"),
    ("Travel", "travel"),
    ("Personal Finance", "finance-and-economics"),
    ("Gaming", "gaming"),
    ("Photography", "photography"),
    ("Lifestyle", "lifestyle"),
    ("Education", "education"),
    ("Comedy & Entertainment", "humor-and-fun-and-happiness"),
    ("Music", "music"),
    ("Art & Design", "art-and-artists"),
    ("Parenting", "family"),
    ("Pets & Animals", "animals"),
    ("Sports", "sports-with-a-ball"),
    ("DIY & Crafts", "diy-and-design"),
    ("Business & Entrepreneurship", "business-and-careers"),
    ("Motivation & Self-Help", "shows"),
];

/// Translate a niche into a provider tag.
pub fn niche_to_tag(niche: &str) -> String {
    NICHE_TAGS
        .iter()
        .find(|(name, _)| *name == niche)
        .map(|(_, tag)| (*tag).to_string())
        .unwrap_or_else(|| slugify(niche))
}

/// Lowercase a niche and collapse whitespace/ampersand runs into single
/// hyphens: "Vegan Meal Prep" → "vegan-meal-prep".
fn slugify(niche: &str) -> String {
    let mut out = String::new();
    let mut pending_hyphen = false;
    for ch in niche.to_lowercase().chars() {
        if ch.is_whitespace() || ch == '&' {
            pending_hyphen = !out.is_empty();
        } else {
            if pending_hyphen {
                out.push('-');
                pending_hyphen = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Search each requested platform for creators in the niche. The per-platform
/// results are concatenated as-is: no dedup, no cross-platform re-sort.
pub async fn discover_creators(
    provider: &dyn ContentProvider,
    niche: &str,
    platforms: &[Platform],
) -> Vec<CreatorCandidate> {
    let mut results = Vec::new();
    for platform in platforms {
        results.extend(discover_on_platform(provider, niche, *platform).await);
    }
    results
}

/// Tag search first; on empty or error, one query-search retry with the raw
/// niche; on empty or error again, synthetic candidates. Never empty.
async fn discover_on_platform(
    provider: &dyn ContentProvider,
    niche: &str,
    platform: Platform,
) -> Vec<CreatorCandidate> {
    let tag = niche_to_tag(niche);

    match provider.search_by_tag(platform, &tag).await {
        Ok(creators) if !creators.is_empty() => return creators,
        Ok(_) => {
            warn!(%platform, %tag, "Tag search returned no results, trying query search");
        }
        Err(e) => {
            warn!(%platform, %tag, error = %e, "Tag search failed, trying query search");
        }
    }

    match provider.search_by_query(platform, niche).await {
        Ok(creators) if !creators.is_empty() => return creators,
        Ok(_) => {
            warn!(%platform, niche, "Query search returned no results, using fixture creators");
        }
        Err(e) => {
            warn!(%platform, niche, error = %e, "Query search failed, using fixture creators");
        }
    }

    fixtures::mock_creators(platform, niche)
}
