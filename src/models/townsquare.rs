//! Town square records: reactions to activity items, comments, offers and
//! announcements.

use crate::domain::{slugify, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Maximum length of an offer's `from_name`.
pub const FROM_NAME_MAX_LEN: usize = 50;

/// Number of numbered background styles (`back0` ..= `back33`).
pub const NUM_BACKGROUNDS: u8 = 33;

/// A like is an indication of a favored activity feed item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
    pub id: i64,
    pub profile_id: i64,
    pub activity_id: i64,
    pub created_on: DateTime<Utc>,
}

impl Like {
    pub fn describe(&self, handle: &str) -> String {
        format!("Like of {} by {}", self.activity_id, handle)
    }
}

/// A flag marks an activity feed item for moderation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flag {
    pub id: i64,
    pub profile_id: i64,
    pub activity_id: i64,
    pub created_on: DateTime<Utc>,
}

impl Flag {
    pub fn describe(&self, handle: &str) -> String {
        format!("Flag of {} by {}", self.activity_id, handle)
    }
}

/// A comment on an activity feed item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub profile_id: i64,
    pub activity_id: i64,
    pub comment: String,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl Comment {
    /// The `comments_priv` marker tips carry when they were sent on this comment.
    pub fn tip_reference(&self) -> String {
        format!("comment:{}", self.id)
    }

    pub fn describe(&self, handle: &str) -> String {
        format!(
            "Comment of {} by {}: {}",
            self.activity_id, handle, self.comment
        )
    }
}

/// Offer cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    Secret,
    Random,
    Daily,
    Weekly,
    Monthly,
    Other,
}

impl OfferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secret => "secret",
            Self::Random => "random",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Other => "other",
        }
    }
}

impl FromStr for OfferKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secret" => Ok(Self::Secret),
            "random" => Ok(Self::Random),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "other" => Ok(Self::Other),
            other => Err(ValidationError::InvalidChoice {
                field: "offer key",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual style of an offer card: a flat color or a numbered background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OfferStyle {
    #[default]
    Red,
    Green,
    Blue,
    Background(u8),
}

impl FromStr for OfferStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidChoice {
            field: "offer style",
            value: s.to_string(),
        };

        match s {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            _ => {
                let digits = s
                    .strip_prefix("back")
                    .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
                    .filter(|n| *n == "0" || !n.starts_with('0'))
                    .ok_or_else(invalid)?;
                let n: u8 = digits.parse().map_err(|_| invalid())?;
                if n > NUM_BACKGROUNDS {
                    return Err(invalid());
                }
                Ok(Self::Background(n))
            }
        }
    }
}

impl fmt::Display for OfferStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Green => f.write_str("green"),
            Self::Blue => f.write_str("blue"),
            Self::Background(n) => write!(f, "back{}", n),
        }
    }
}

impl Serialize for OfferStyle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OfferStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A timed promotional entry shown on the town square.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    pub id: i64,
    pub from_name: String,
    pub from_link: String,
    pub title: String,
    pub desc: String,
    pub url: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub key: OfferKind,
    pub style: OfferStyle,

    /// Kudos token acting as the offer's persona; cleared if the token goes away
    pub persona_id: Option<i64>,
    pub created_by: Option<i64>,

    /// Is this available publicly yet?
    pub public: bool,
    pub view_count: i64,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl Offer {
    /// A public offer with no views; `id` is assigned by the store.
    pub fn new(
        key: OfferKind,
        title: impl Into<String>,
        url: impl Into<String>,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            from_name: String::new(),
            from_link: String::new(),
            title: title.into(),
            desc: String::new(),
            url: url.into(),
            valid_from,
            valid_to,
            key,
            style: OfferStyle::default(),
            persona_id: None,
            created_by: None,
            public: true,
            view_count: 0,
            created_on: now,
            modified_on: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.from_name.chars().count() > FROM_NAME_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "from_name",
                max: FROM_NAME_MAX_LEN,
            });
        }
        Ok(())
    }

    /// `valid_from <= now < valid_to` and published.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.public && self.valid_from <= now && now < self.valid_to
    }

    pub fn view_url(&self) -> String {
        format!("/action/{}/{}", self.id, slugify(&self.title))
    }

    pub fn absolute_url(&self) -> String {
        format!("{}?preview=1", self.view_url())
    }

    pub fn go_url(&self) -> String {
        format!("{}/go", self.view_url())
    }

    pub fn decline_url(&self) -> String {
        format!("{}/decline", self.view_url())
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.key, self.title)
    }
}

/// What a profile did with an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferActionKind {
    Click,
    Completion,
    Decline,
}

impl OfferActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Completion => "completion",
            Self::Decline => "decline",
        }
    }
}

impl FromStr for OfferActionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "completion" => Ok(Self::Completion),
            "decline" => Ok(Self::Decline),
            other => Err(ValidationError::InvalidChoice {
                field: "offer action",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OfferActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable log row of a profile interacting with an offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferAction {
    pub id: i64,
    pub profile_id: i64,
    pub offer_id: i64,
    pub what: OfferActionKind,
    pub created_on: DateTime<Utc>,
}

impl OfferAction {
    pub fn describe(&self, handle: &str, offer_title: &str) -> String {
        format!("{} => {} => {}", handle, self.what, offer_title)
    }
}

/// Where an announcement is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    Townsquare,
    Header,
    Footer,
}

impl AnnouncementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Townsquare => "townsquare",
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }
}

impl FromStr for AnnouncementKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "townsquare" => Ok(Self::Townsquare),
            "header" => Ok(Self::Header),
            "footer" => Ok(Self::Footer),
            other => Err(ValidationError::InvalidChoice {
                field: "announcement key",
                value: other.to_string(),
            }),
        }
    }
}

/// Bootstrap color utility the announcement is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStyle {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    Info,
    Light,
    Dark,
    White,
}

impl AnnouncementStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::White => "white",
        }
    }
}

impl FromStr for AnnouncementStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "success" => Ok(Self::Success),
            "danger" => Ok(Self::Danger),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "white" => Ok(Self::White),
            other => Err(ValidationError::InvalidChoice {
                field: "announcement style",
                value: other.to_string(),
            }),
        }
    }
}

/// A timed, ranked message displayed to users on the town square.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: i64,
    pub key: AnnouncementKind,
    pub title: String,
    pub desc: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub rank: i64,
    pub style: AnnouncementStyle,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl Announcement {
    pub fn new(
        key: AnnouncementKind,
        title: impl Into<String>,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            key,
            title: title.into(),
            desc: String::new(),
            valid_from,
            valid_to,
            rank: 0,
            style: AnnouncementStyle::default(),
            created_on: now,
            modified_on: now,
        }
    }

    /// `valid_from <= now < valid_to`.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now && now < self.valid_to
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.created_on, self.title)
    }
}
