//! Onboarding: record the user's niche, target platforms, and optional
//! handle. No external calls are involved.

use tracing::info;
use uuid::Uuid;

use creatorpulse_common::{Platform, PulseError};
use creatorpulse_store::{DashboardStore, User};

pub async fn complete_onboarding(
    store: &dyn DashboardStore,
    user_id: Uuid,
    niche: &str,
    platforms: &[Platform],
    social_handle: Option<&str>,
) -> Result<User, PulseError> {
    if niche.trim().is_empty() {
        return Err(PulseError::Validation("Niche is required".to_string()));
    }
    if platforms.is_empty() {
        return Err(PulseError::Validation(
            "At least one platform is required".to_string(),
        ));
    }

    let user = store
        .complete_onboarding(user_id, niche, platforms, social_handle)
        .await?;
    info!(%user_id, niche, "Onboarding complete");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatorpulse_store::MemoryStore;

    #[tokio::test]
    async fn onboarding_sets_niche_platforms_and_flag() {
        let store = MemoryStore::new();
        let user = store.ensure_user("new@example.com").await.unwrap();
        assert!(!user.onboarded);

        let updated = complete_onboarding(
            &store,
            user.id,
            "Travel",
            &[Platform::Instagram, Platform::Tiktok],
            Some("wanderer"),
        )
        .await
        .unwrap();

        assert!(updated.onboarded);
        assert_eq!(updated.niche.as_deref(), Some("Travel"));
        assert_eq!(updated.platforms.len(), 2);
        assert_eq!(updated.social_handle.as_deref(), Some("wanderer"));
    }

    #[tokio::test]
    async fn blank_niche_is_rejected() {
        let store = MemoryStore::new();
        let user = store.ensure_user("new@example.com").await.unwrap();

        let err = complete_onboarding(&store, user.id, "  ", &[Platform::Instagram], None)
            .await
            .unwrap_err();
        assert!(matches!(err, PulseError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_platform_list_is_rejected() {
        let store = MemoryStore::new();
        let user = store.ensure_user("new@example.com").await.unwrap();

        let err = complete_onboarding(&store, user.id, "Travel", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, PulseError::Validation(_)));
    }
}
