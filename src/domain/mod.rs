//! Domain value objects and types.
//!
//! Type-safe wrappers for the small vocabulary shared across views, models
//! and import jobs: history breakdowns, subgraph grant ids, payment networks
//! and URL slugs. Validation happens at construction time.

pub mod breakdown;
pub mod errors;
pub mod grant_id;
pub mod network;
pub mod slug;

pub use breakdown::Breakdown;
pub use errors::ValidationError;
pub use grant_id::GrantId;
pub use network::Network;
pub use slug::slugify;
