use serde::{Deserialize, Serialize};

// --- Platforms ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Tiktok,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "instagram" => Some(Platform::Instagram),
            "tiktok" => Some(Platform::Tiktok),
            _ => None,
        }
    }

    /// Canonical profile URL used by the statistics provider's community lookup.
    pub fn profile_url(&self, handle: &str) -> String {
        match self {
            Platform::Instagram => format!("https://instagram.com/{handle}"),
            Platform::Tiktok => format!("https://www.tiktok.com/@{handle}"),
        }
    }

    /// Provider `socialTypes` filter value for creator search.
    pub fn social_type(&self) -> &'static str {
        match self {
            Platform::Instagram => "INST",
            Platform::Tiktok => "TT",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Post format taxonomy ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Reel,
    Carousel,
    Static,
    Story,
    Video,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Reel => "reel",
            PostType::Carousel => "carousel",
            PostType::Static => "static",
            PostType::Story => "story",
            PostType::Video => "video",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "reel" => Some(PostType::Reel),
            "carousel" => Some(PostType::Carousel),
            "static" => Some(PostType::Static),
            "story" => Some(PostType::Story),
            "video" => Some(PostType::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Analysis vocabulary ---

/// Opening technique of a post, as judged by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookType {
    Question,
    BoldStatement,
    Story,
    Statistic,
    Controversial,
    HowTo,
    Listicle,
    BehindTheScenes,
    Other,
}

impl HookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookType::Question => "question",
            HookType::BoldStatement => "bold_statement",
            HookType::Story => "story",
            HookType::Statistic => "statistic",
            HookType::Controversial => "controversial",
            HookType::HowTo => "how_to",
            HookType::Listicle => "listicle",
            HookType::BehindTheScenes => "behind_the_scenes",
            HookType::Other => "other",
        }
    }

    /// Parse a model-supplied tag. The model is asked for the closed
    /// vocabulary but is not trusted to comply; anything unrecognized
    /// lands on `Other` instead of persisting an arbitrary string.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "question" => HookType::Question,
            "bold_statement" => HookType::BoldStatement,
            "story" => HookType::Story,
            "statistic" => HookType::Statistic,
            "controversial" => HookType::Controversial,
            "how_to" => HookType::HowTo,
            "listicle" => HookType::Listicle,
            "behind_the_scenes" => HookType::BehindTheScenes,
            _ => HookType::Other,
        }
    }
}

impl std::fmt::Display for HookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Inspirational,
    Educational,
    Entertaining,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Inspirational => "inspirational",
            Sentiment::Educational => "educational",
            Sentiment::Entertaining => "entertaining",
        }
    }

    /// Unrecognized model output falls back to `Neutral`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            "inspirational" => Sentiment::Inspirational,
            "educational" => Sentiment::Educational,
            "entertaining" => Sentiment::Entertaining,
            _ => Sentiment::Neutral,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Format,
    Timing,
    Hook,
    Topic,
    Engagement,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Format => "format",
            InsightType::Timing => "timing",
            InsightType::Hook => "hook",
            InsightType::Topic => "topic",
            InsightType::Engagement => "engagement",
        }
    }

    /// Unrecognized model output falls back to `Engagement`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "format" => InsightType::Format,
            "timing" => InsightType::Timing,
            "hook" => InsightType::Hook,
            "topic" => InsightType::Topic,
            "engagement" => InsightType::Engagement,
            _ => InsightType::Engagement,
        }
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Niches ---

/// The niches offered during onboarding. Users may also type a free-text
/// niche; discovery slugifies anything not in the tag map.
pub const NICHES: &[&str] = &[
    "Fitness & Health",
    "Cooking & Food",
    "Tech Reviews",
    "Fashion & Style",
    "Beauty & Skincare",
    "Travel",
    "Personal Finance",
    "Gaming",
    "Photography",
    "Lifestyle",
    "Education",
    "Comedy & Entertainment",
    "Music",
    "Art & Design",
    "Parenting",
    "Pets & Animals",
    "Sports",
    "DIY & Crafts",
    "Business & Entrepreneurship",
    "Motivation & Self-Help",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_type_round_trips_known_tags() {
        assert_eq!(HookType::from_tag("bold_statement"), HookType::BoldStatement);
        assert_eq!(HookType::from_tag("HOW_TO"), HookType::HowTo);
        assert_eq!(HookType::BehindTheScenes.as_str(), "behind_the_scenes");
    }

    #[test]
    fn unknown_tags_fall_back() {
        assert_eq!(HookType::from_tag("clickbait"), HookType::Other);
        assert_eq!(Sentiment::from_tag("melancholic"), Sentiment::Neutral);
        assert_eq!(InsightType::from_tag("virality"), InsightType::Engagement);
    }

    #[test]
    fn profile_urls_match_provider_format() {
        assert_eq!(
            Platform::Instagram.profile_url("fitness_guru"),
            "https://instagram.com/fitness_guru"
        );
        assert_eq!(
            Platform::Tiktok.profile_url("trending_tips"),
            "https://www.tiktok.com/@trending_tips"
        );
    }
}
