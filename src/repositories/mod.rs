mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{
    AccountRepository, ActivityRepository, AnnouncementRepository, DistributionStore,
    GrantRepository, OfferRepository, TipRepository, TokenDistributionRepository,
    TownSquareStore, TrustScoreRepository,
};
