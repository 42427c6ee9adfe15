use serde::Deserialize;

/// Envelope wrapping every statistics API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub meta: Meta,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub code: i64,
}

/// A creator row from the `/search` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatorStats {
    #[serde(rename = "screenName")]
    pub screen_name: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "usersCount")]
    pub users_count: Option<i64>,
    pub image: Option<String>,
    /// Provider creator id, e.g. "INST:12345" or "TT:12345".
    pub cid: Option<String>,
    #[serde(rename = "avgER")]
    pub avg_er: Option<f64>,
    #[serde(rename = "qualityScore")]
    pub quality_score: Option<f64>,
}

/// `/community` payload. The cid occasionally appears at the top level
/// instead of under `data`, so both shapes are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct CommunityResponse {
    pub data: Option<CommunityData>,
    pub cid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommunityData {
    pub cid: Option<String>,
}

impl CommunityResponse {
    pub fn cid(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.cid.as_deref())
            .or(self.cid.as_deref())
    }
}

/// `/posts` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PostsData {
    #[serde(default)]
    pub posts: Vec<PostStats>,
}

/// A single post row from the `/posts` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PostStats {
    #[serde(rename = "socialPostID")]
    pub social_post_id: Option<String>,
    #[serde(rename = "postID")]
    pub post_id: Option<String>,
    pub text: Option<String>,
    /// Raw provider type string, e.g. "REEL", "carousel_container", "video".
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    #[serde(rename = "videoLink")]
    pub video_link: Option<String>,
    #[serde(rename = "postImage")]
    pub post_image: Option<String>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    #[serde(rename = "rePosts")]
    pub re_posts: Option<i64>,
    #[serde(rename = "videoViews")]
    pub video_views: Option<i64>,
    pub views: Option<i64>,
    pub date: Option<String>,
    /// Provider engagement ratio (0..1), multiplied by 100 downstream.
    pub er: Option<f64>,
}

impl PostStats {
    /// The provider's post id, whichever field is populated.
    pub fn external_id(&self) -> Option<&str> {
        self.social_post_id.as_deref().or(self.post_id.as_deref())
    }

    /// Play count for video posts, falling back to generic views.
    pub fn view_count(&self) -> i64 {
        self.video_views.or(self.views).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn community_cid_prefers_nested_field() {
        let resp: CommunityResponse =
            serde_json::from_str(r#"{"data":{"cid":"TT:1"},"cid":"TT:2"}"#).unwrap();
        assert_eq!(resp.cid(), Some("TT:1"));

        let resp: CommunityResponse = serde_json::from_str(r#"{"cid":"TT:2"}"#).unwrap();
        assert_eq!(resp.cid(), Some("TT:2"));
    }

    #[test]
    fn post_external_id_prefers_social_post_id() {
        let post: PostStats =
            serde_json::from_str(r#"{"socialPostID":"a","postID":"b"}"#).unwrap();
        assert_eq!(post.external_id(), Some("a"));

        let post: PostStats = serde_json::from_str(r#"{"postID":"b"}"#).unwrap();
        assert_eq!(post.external_id(), Some("b"));
    }
}
