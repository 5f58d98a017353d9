//! Data models for the gas dashboard, the town square and the import jobs.
//!
//! Records mirror the platform's tables; derived values (URLs, display
//! strings, `current` windows) live next to the record they describe.

pub mod accounts;
pub mod gas;
pub mod grant;
pub mod token_distribution;
pub mod townsquare;
pub mod trust_score;

pub use accounts::{Activity, Profile, Tip, User};
pub use gas::{max_gas_price, ConfTimePoint, GasAdvisory, GasHistoryPoint, HistorySeries};
pub use grant::Grant;
pub use token_distribution::InitialTokenDistribution;
pub use townsquare::{
    Announcement, AnnouncementKind, AnnouncementStyle, Comment, Flag, Like, Offer, OfferAction,
    OfferActionKind, OfferKind, OfferStyle,
};
pub use trust_score::TrustScore;
