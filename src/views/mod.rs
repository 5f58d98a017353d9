//! View handlers.
//!
//! Each handler gathers its data through the provider and repository traits
//! and returns a [`TemplateResponse`] with a typed context.

pub mod context;
pub mod gas;
pub mod render;
pub mod townsquare;

pub use context::*;
pub use gas::{GasViews, DEFAULT_CONFIRM_TIME_MINUTES_TARGET, HISTORY_LINES};
pub use render::{JsonRenderer, RenderedView, Renderer, TemplateResponse};
pub use townsquare::{CommentNotifier, TownSquareViews, TracingCommentNotifier};
