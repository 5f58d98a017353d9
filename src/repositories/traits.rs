use crate::domain::Network;
use crate::error::StoreResult;
use crate::models::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Repository for users and their public profiles.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a login account.
    async fn create_user(&self, username: &str) -> StoreResult<User>;

    /// Delete a user; records owned by the user are removed with it.
    async fn delete_user(&self, id: i64) -> StoreResult<()>;

    /// Create a profile. Handles are unique.
    async fn create_profile(&self, handle: &str, user_id: Option<i64>) -> StoreResult<Profile>;

    /// Retrieve a single profile by ID.
    async fn get_profile(&self, id: i64) -> StoreResult<Profile>;

    /// Retrieve a single profile by handle.
    async fn get_profile_by_handle(&self, handle: &str) -> StoreResult<Profile>;
}

/// Repository for activity feed items and the reactions attached to them.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn create_activity(
        &self,
        profile_id: i64,
        url: &str,
        metadata: serde_json::Value,
    ) -> StoreResult<Activity>;

    async fn get_activity(&self, id: i64) -> StoreResult<Activity>;

    async fn create_like(&self, profile_id: i64, activity_id: i64) -> StoreResult<Like>;

    async fn likes_for_activity(&self, activity_id: i64) -> StoreResult<Vec<Like>>;

    async fn create_flag(&self, profile_id: i64, activity_id: i64) -> StoreResult<Flag>;

    async fn flags_for_activity(&self, activity_id: i64) -> StoreResult<Vec<Flag>>;

    async fn create_comment(
        &self,
        profile_id: i64,
        activity_id: i64,
        comment: &str,
    ) -> StoreResult<Comment>;

    /// Comments on an activity, oldest first.
    async fn comments_for_activity(&self, activity_id: i64) -> StoreResult<Vec<Comment>>;
}

/// Repository for tip payments.
#[async_trait]
pub trait TipRepository: Send + Sync {
    async fn create_tip(
        &self,
        comments_priv: &str,
        network: Network,
        value_in_eth: f64,
    ) -> StoreResult<Tip>;

    /// Tips carrying `comments_priv` on `network`.
    async fn tips_for(&self, comments_priv: &str, network: Network) -> StoreResult<Vec<Tip>>;
}

/// Repository for trust bonus records.
#[async_trait]
pub trait TrustScoreRepository: Send + Sync {
    /// Insert a record. A second record for the same user fails with
    /// [`crate::error::StoreError::UniqueViolation`].
    async fn create_trust_score(&self, score: &TrustScore) -> StoreResult<TrustScore>;

    /// The record owned by `user_id`, if one exists.
    async fn trust_score_for_user(&self, user_id: i64) -> StoreResult<Option<TrustScore>>;

    /// Overwrite the scores of an existing record.
    async fn update_trust_score(&self, score: &TrustScore) -> StoreResult<TrustScore>;
}

/// Repository for town square offers and the actions taken on them.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn create_offer(&self, offer: &Offer) -> StoreResult<Offer>;

    async fn get_offer(&self, id: i64) -> StoreResult<Offer>;

    /// Public offers whose window contains `now`, ordered by id.
    async fn current_offers(&self, now: DateTime<Utc>) -> StoreResult<Vec<Offer>>;

    /// Bump the view counter and return the updated offer.
    async fn increment_view_count(&self, id: i64) -> StoreResult<Offer>;

    async fn record_offer_action(
        &self,
        profile_id: i64,
        offer_id: i64,
        what: OfferActionKind,
    ) -> StoreResult<OfferAction>;

    async fn actions_for_offer(&self, offer_id: i64) -> StoreResult<Vec<OfferAction>>;
}

/// Repository for announcements.
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create_announcement(&self, announcement: &Announcement)
        -> StoreResult<Announcement>;

    /// Announcements whose window contains `now`, highest rank first.
    async fn current_announcements(&self, now: DateTime<Utc>) -> StoreResult<Vec<Announcement>>;
}

/// Repository for grants.
#[async_trait]
pub trait GrantRepository: Send + Sync {
    /// Insert a grant under its own id.
    async fn create_grant(&self, grant: &Grant) -> StoreResult<Grant>;

    async fn get_grant(&self, id: i64) -> StoreResult<Grant>;

    /// Persist the title and metadata of an existing grant.
    async fn save_grant(&self, grant: &Grant) -> StoreResult<Grant>;
}

/// Repository for initial token distribution claims.
#[async_trait]
pub trait TokenDistributionRepository: Send + Sync {
    /// Remove every claim. Returns the number of rows removed.
    async fn delete_all_distributions(&self) -> StoreResult<usize>;

    async fn create_distribution(
        &self,
        profile_id: i64,
        claim_total: Decimal,
    ) -> StoreResult<InitialTokenDistribution>;

    /// All claims, ordered by id.
    async fn list_distributions(&self) -> StoreResult<Vec<InitialTokenDistribution>>;
}

/// Everything the town square views read and write.
pub trait TownSquareStore:
    AccountRepository
    + ActivityRepository
    + TipRepository
    + TrustScoreRepository
    + OfferRepository
    + AnnouncementRepository
{
}

impl<T> TownSquareStore for T where
    T: AccountRepository
        + ActivityRepository
        + TipRepository
        + TrustScoreRepository
        + OfferRepository
        + AnnouncementRepository
{
}

/// Everything the token distribution import touches.
pub trait DistributionStore: AccountRepository + TokenDistributionRepository {}

impl<T> DistributionStore for T where T: AccountRepository + TokenDistributionRepository {}
