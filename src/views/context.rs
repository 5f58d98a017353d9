//! Typed template contexts, one per view.

use crate::domain::Breakdown;
use crate::models::{
    Announcement, Comment, ConfTimePoint, GasAdvisory, HistorySeries, Offer, OfferAction,
    TrustScore,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Context of `gas.html`.
#[derive(Debug, Clone, Serialize)]
pub struct GasContext {
    pub title: &'static str,
    pub card_desc: &'static str,
    pub eth_to_usd: f64,
    pub start_gas_cost: f64,
    pub gas_advisories: Vec<GasAdvisory>,
    pub conf_time_spread: Vec<ConfTimePoint>,
    pub hide_send_tip: bool,
}

/// Context of the static gas pages (FAQ, faucet list).
#[derive(Debug, Clone, Serialize)]
pub struct StaticPageContext {
    pub title: &'static str,
    pub card_desc: &'static str,
    pub hide_send_tip: bool,
}

/// A platform action whose gas cost the calculator estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasAction {
    pub name: &'static str,
    pub target: &'static str,
    pub persona: &'static str,
    pub product: &'static str,
}

/// Actions listed by the gas calculator.
pub const GAS_CALCULATOR_ACTIONS: [GasAction; 7] = [
    GasAction {
        name: "New Bounty",
        target: "/new",
        persona: "funder",
        product: "bounties",
    },
    GasAction {
        name: "Fulfill Bounty",
        target: "issue/fulfill",
        persona: "developer",
        product: "bounties",
    },
    GasAction {
        name: "Increase Funding",
        target: "issue/increase",
        persona: "funder",
        product: "bounties",
    },
    GasAction {
        name: "Accept Submission",
        target: "issue/accept",
        persona: "funder",
        product: "bounties",
    },
    GasAction {
        name: "Cancel Funding",
        target: "issue/cancel",
        persona: "funder",
        product: "bounties",
    },
    GasAction {
        name: "Send tip",
        target: "tip/send/2/",
        persona: "funder",
        product: "tips",
    },
    GasAction {
        name: "Receive tip",
        target: "tip/receive",
        persona: "developer",
        product: "tips",
    },
];

/// Context of `gas_calculator.html`.
#[derive(Debug, Clone, Serialize)]
pub struct GasCalculatorContext {
    pub title: &'static str,
    pub card_desc: &'static str,
    pub actions: Vec<GasAction>,
    pub conf_time_spread: Vec<ConfTimePoint>,
    pub eth_to_usd: f64,
    pub start_gas_cost: f64,
    pub hide_send_tip: bool,
}

/// Context of `gas_history.html`.
///
/// `lines` and `gas_histories` are keyed by the confirmation-time line in
/// minutes.
#[derive(Debug, Clone, Serialize)]
pub struct GasHistoryContext {
    pub title: &'static str,
    pub card_desc: &'static str,
    pub max: f64,
    pub lines: BTreeMap<u32, &'static str>,
    pub gas_histories: BTreeMap<u32, HistorySeries>,
    pub breakdown: Breakdown,
    pub breakdown_ui: &'static str,
    pub granularity_options: Vec<Breakdown>,
}

/// An offer together with its derived links.
#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    #[serde(flatten)]
    pub offer: Offer,
    pub display: String,
    pub view_url: String,
    pub absolute_url: String,
    pub go_url: String,
    pub decline_url: String,
}

impl From<Offer> for OfferView {
    fn from(offer: Offer) -> Self {
        Self {
            display: offer.to_string(),
            view_url: offer.view_url(),
            absolute_url: offer.absolute_url(),
            go_url: offer.go_url(),
            decline_url: offer.decline_url(),
            offer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OffersContext {
    pub offers: Vec<OfferView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferContext {
    pub offer: OfferView,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferActionContext {
    pub action: OfferAction,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementsContext {
    pub announcements: Vec<Announcement>,
}

/// A comment with the values the town square shows next to it.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub display: String,
    pub profile_handle: String,
    pub tip_able: bool,
    pub url: String,
    pub tip_count_eth: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityCommentsContext {
    pub activity_id: i64,
    pub comments: Vec<CommentView>,
    pub likes: usize,
    pub flags: usize,
}

/// Result of a like or a flag.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionContext {
    pub id: i64,
    pub activity_id: i64,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrustScoreContext {
    pub user_id: i64,
    pub trust_score: Option<TrustScore>,
}
