//! Synthetic creator and post data, substituted whenever the statistics
//! provider fails or returns nothing. Discovery and ingestion must always
//! hand the caller something renderable, so these generators never return
//! an empty list.
//!
//! Generation is seeded from the niche/handle so identical inputs produce
//! identical fixture sets; tests can assert exact shapes without flakiness.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use creatorpulse_common::{Platform, PostType};

use crate::provider::{CreatorCandidate, PostRecord};

pub const MOCK_CREATOR_COUNT: usize = 10;
pub const MOCK_POST_COUNT: usize = 8;

const MAX_HANDLE_LEN: usize = 25;

const INSTAGRAM_CREATOR_NAMES: [&str; 10] = [
    "fitness_guru",
    "healthy_habits",
    "workout_daily",
    "mindful_moves",
    "strength_lab",
    "clean_eats",
    "yoga_flow",
    "run_wild",
    "lift_heavy",
    "wellness_warrior",
];

const TIKTOK_CREATOR_NAMES: [&str; 10] = [
    "trending_tips",
    "viral_vibes",
    "content_king",
    "niche_master",
    "growth_hacker",
    "daily_inspo",
    "creator_life",
    "trend_setter",
    "viral_coach",
    "social_spark",
];

const INSTAGRAM_CAPTIONS: [&str; 8] = [
    "5 things I wish I knew when starting out! Which one surprises you the most? Drop a comment below",
    "This changed everything for me. Here's the exact process I follow every single day",
    "POV: You finally figure out what works. Save this for later!",
    "Stop doing this ONE thing and watch your results transform. Swipe to see the difference",
    "Behind the scenes of my morning routine. It's not what you think...",
    "The algorithm doesn't want you to see this. Share before it gets taken down!",
    "I asked 100 people what their biggest struggle is. Here's what they said",
    "Unpopular opinion: most advice in this space is completely wrong. Here's why",
];

const TIKTOK_CAPTIONS: [&str; 8] = [
    "Wait for it... this hack changed my life! #fyp #viral",
    "I can't believe this actually works. Try it yourself! #lifehack",
    "Replying to @user here's exactly how I did it step by step",
    "Day 30 of posting until I go viral. Today's the day?",
    "POV: when you finally crack the code. Stitch this!",
    "3 secrets nobody tells you about this. Number 2 is wild",
    "Tell me you're into this without telling me. I'll go first",
    "This trend but make it educational. You're welcome!",
];

const INSTAGRAM_TYPE_CYCLE: [PostType; 5] = [
    PostType::Reel,
    PostType::Carousel,
    PostType::Static,
    PostType::Reel,
    PostType::Carousel,
];

/// Stable seed derived from the generation inputs (FNV-1a).
fn seed_for(parts: &[&str]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for part in parts {
        for byte in part.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash ^= 0xff;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn display_name_from(handle: &str) -> String {
    handle
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn niche_suffix(niche: &str) -> String {
    niche
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Ten synthetic creator candidates for a niche.
pub fn mock_creators(platform: Platform, niche: &str) -> Vec<CreatorCandidate> {
    mock_creators_seeded(platform, niche, seed_for(&[platform.as_str(), niche]))
}

pub fn mock_creators_seeded(platform: Platform, niche: &str, seed: u64) -> Vec<CreatorCandidate> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (names, follower_range, bio) = match platform {
        Platform::Instagram => (
            &INSTAGRAM_CREATOR_NAMES,
            10_000..510_000,
            format!("{niche} content creator | Sharing tips & inspiration"),
        ),
        Platform::Tiktok => (
            &TIKTOK_CREATOR_NAMES,
            50_000..1_050_000,
            format!("{niche} creator | Going viral one video at a time"),
        ),
    };
    let suffix = niche_suffix(niche);

    names
        .iter()
        .take(MOCK_CREATOR_COUNT)
        .map(|name| {
            let mut handle = format!("{name}_{suffix}");
            if handle.len() > MAX_HANDLE_LEN {
                let mut end = MAX_HANDLE_LEN;
                while !handle.is_char_boundary(end) {
                    end -= 1;
                }
                handle.truncate(end);
            }
            CreatorCandidate {
                handle,
                display_name: display_name_from(name),
                platform,
                follower_count: rng.random_range(follower_range.clone()),
                bio: bio.clone(),
                avatar_url: String::new(),
                cid: None,
                avg_er: None,
                quality_score: None,
            }
        })
        .collect()
}

/// Eight synthetic posts for a creator.
pub fn mock_posts(platform: Platform, handle: &str) -> Vec<PostRecord> {
    mock_posts_seeded(platform, handle, seed_for(&[platform.as_str(), handle]))
}

pub fn mock_posts_seeded(platform: Platform, handle: &str, seed: u64) -> Vec<PostRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let now = Utc::now();

    (0..MOCK_POST_COUNT)
        .map(|i| {
            let (external_id, post_type, caption, likes, comments, shares, views, er) =
                match platform {
                    Platform::Instagram => (
                        format!("mock_{handle}_{i}"),
                        INSTAGRAM_TYPE_CYCLE[i % INSTAGRAM_TYPE_CYCLE.len()],
                        INSTAGRAM_CAPTIONS[i % INSTAGRAM_CAPTIONS.len()],
                        rng.random_range(500..50_500),
                        rng.random_range(50..2_050),
                        rng.random_range(10..1_010),
                        rng.random_range(5_000..205_000),
                        rng.random_range(1.0..9.0),
                    ),
                    Platform::Tiktok => (
                        format!("mock_tt_{handle}_{i}"),
                        PostType::Video,
                        TIKTOK_CAPTIONS[i % TIKTOK_CAPTIONS.len()],
                        rng.random_range(1_000..101_000),
                        rng.random_range(100..5_100),
                        rng.random_range(50..3_050),
                        rng.random_range(10_000..510_000),
                        rng.random_range(2.0..14.0),
                    ),
                };
            PostRecord {
                external_id,
                platform,
                post_type,
                caption: caption.to_string(),
                media_url: String::new(),
                thumbnail_url: String::new(),
                likes,
                comments,
                shares,
                views,
                posted_at: Some(now - Duration::days(i as i64 * 2)),
                engagement_rate: er,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creators_are_deterministic_for_same_inputs() {
        let a = mock_creators(Platform::Instagram, "Fitness & Health");
        let b = mock_creators(Platform::Instagram, "Fitness & Health");
        assert_eq!(a.len(), MOCK_CREATOR_COUNT);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.handle, y.handle);
            assert_eq!(x.follower_count, y.follower_count);
        }
    }

    #[test]
    fn handles_are_capped_at_25_chars() {
        let creators = mock_creators(Platform::Tiktok, "Business & Entrepreneurship");
        for c in &creators {
            assert!(c.handle.len() <= 25, "handle too long: {}", c.handle);
        }
    }

    #[test]
    fn tiktok_mock_posts_are_all_video() {
        let posts = mock_posts(Platform::Tiktok, "viral_vibes");
        assert_eq!(posts.len(), MOCK_POST_COUNT);
        assert!(posts.iter().all(|p| p.post_type == PostType::Video));
        assert!(posts.iter().all(|p| p.external_id.starts_with("mock_tt_")));
    }

    #[test]
    fn instagram_mock_posts_cycle_formats() {
        let posts = mock_posts(Platform::Instagram, "fitness_guru");
        assert_eq!(posts[0].post_type, PostType::Reel);
        assert_eq!(posts[1].post_type, PostType::Carousel);
        assert_eq!(posts[2].post_type, PostType::Static);
        assert!(posts.iter().all(|p| !p.caption.is_empty()));
    }
}
