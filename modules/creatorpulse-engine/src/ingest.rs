//! Post ingestion: cid resolution, post fetching with fixture fallback,
//! post-type normalization, and the tracked-creator sync flow.

use tracing::{info, warn};
use uuid::Uuid;

use creatorpulse_common::{Platform, PostType, PulseError};
use creatorpulse_store::{DashboardStore, NewPost, NewTrackedCreator, TrackedCreator};

use crate::fixtures;
use crate::provider::{ContentProvider, CreatorCandidate, PostRecord};

/// Hard cap on posts ingested per creator in one sync.
pub const MAX_POSTS_PER_CREATOR: usize = 12;

/// Normalize a provider post-type string into the closed format taxonomy.
/// TikTok content is always video; Instagram types are matched by substring
/// since the provider's vocabulary is not stable.
pub fn map_post_type(platform: Platform, raw: Option<&str>) -> PostType {
    match platform {
        Platform::Tiktok => PostType::Video,
        Platform::Instagram => {
            let raw = raw.unwrap_or_default().to_lowercase();
            if raw.contains("reel") || raw.contains("video") {
                PostType::Reel
            } else if raw.contains("carousel") || raw.contains("album") {
                PostType::Carousel
            } else if raw.contains("story") || raw.contains("stories") {
                PostType::Story
            } else {
                PostType::Static
            }
        }
    }
}

/// Engagement rate recomputed from raw counts against the creator's
/// follower count, as a percentage.
pub fn engagement_from_counts(likes: i64, comments: i64, shares: i64, followers: i64) -> f64 {
    if followers <= 0 {
        return 0.0;
    }
    (likes + comments + shares) as f64 / followers as f64 * 100.0
}

/// Fetch up to [`MAX_POSTS_PER_CREATOR`] normalized posts for a creator.
///
/// A missing cid is resolved through the profile-URL lookup first. Every
/// failure path (unresolvable cid, provider error, empty result) degrades
/// to synthetic posts so downstream analysis always has material.
pub async fn fetch_recent_posts(
    provider: &dyn ContentProvider,
    platform: Platform,
    handle: &str,
    cid: Option<&str>,
) -> Vec<PostRecord> {
    let cid = match cid {
        Some(cid) => Some(cid.to_string()),
        None => match provider.resolve_cid(platform, handle).await {
            Ok(cid) => cid,
            Err(e) => {
                warn!(%platform, handle, error = %e, "cid lookup failed");
                None
            }
        },
    };

    let Some(cid) = cid else {
        warn!(%platform, handle, "Could not resolve creator cid, using fixture posts");
        return fixtures::mock_posts(platform, handle);
    };

    match provider.recent_posts(platform, &cid).await {
        Ok(posts) if !posts.is_empty() => {
            posts.into_iter().take(MAX_POSTS_PER_CREATOR).collect()
        }
        Ok(_) => {
            warn!(%platform, handle, "Provider returned no posts, using fixture posts");
            fixtures::mock_posts(platform, handle)
        }
        Err(e) => {
            warn!(%platform, handle, error = %e, "Post fetch failed, using fixture posts");
            fixtures::mock_posts(platform, handle)
        }
    }
}

#[derive(Debug)]
pub struct SyncOutcome {
    pub creator: TrackedCreator,
    pub posts_ingested: usize,
}

/// Track (or refresh) a creator and ingest their recent posts.
///
/// When the creator's follower count is known, engagement is recomputed
/// from raw counts and overrides the provider-reported rate.
pub async fn sync_creator(
    store: &dyn DashboardStore,
    provider: &dyn ContentProvider,
    user_id: Uuid,
    candidate: &CreatorCandidate,
) -> Result<SyncOutcome, PulseError> {
    let creator = store
        .upsert_creator(NewTrackedCreator {
            user_id,
            platform: candidate.platform,
            handle: candidate.handle.clone(),
            display_name: candidate.display_name.clone(),
            follower_count: candidate.follower_count,
            bio: candidate.bio.clone(),
            avatar_url: candidate.avatar_url.clone(),
            cid: candidate.cid.clone(),
        })
        .await?;

    let records = fetch_recent_posts(
        provider,
        candidate.platform,
        &candidate.handle,
        creator.cid.as_deref(),
    )
    .await;

    let mut posts_ingested = 0;
    for record in records {
        let engagement_rate = if creator.follower_count > 0 {
            engagement_from_counts(
                record.likes,
                record.comments,
                record.shares,
                creator.follower_count,
            )
        } else {
            record.engagement_rate
        };

        store
            .upsert_post(NewPost {
                creator_id: creator.id,
                platform: record.platform,
                external_id: record.external_id,
                post_type: record.post_type,
                caption: record.caption,
                media_url: record.media_url,
                thumbnail_url: record.thumbnail_url,
                likes: record.likes,
                comments: record.comments,
                shares: record.shares,
                views: record.views,
                posted_at: record.posted_at,
                engagement_rate,
            })
            .await?;
        posts_ingested += 1;
    }

    store.touch_creator_sync(creator.id).await?;
    info!(
        creator = %creator.handle,
        platform = %creator.platform,
        posts_ingested,
        "Creator synced"
    );

    Ok(SyncOutcome {
        creator,
        posts_ingested,
    })
}

/// Stop tracking a creator. Fails with NotFound before any mutation when
/// the id does not exist.
pub async fn untrack_creator(store: &dyn DashboardStore, id: Uuid) -> Result<(), PulseError> {
    store.delete_creator(id).await?;
    info!(%id, "Creator untracked");
    Ok(())
}
