use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnouncementId(pub String);

impl AnnouncementId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementKind {
    Meeting,
    FeeCollection,
    PriceUpdate,
    #[serde(other)]
    General,
}

impl AnnouncementKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Meeting => "Toplantı",
            Self::FeeCollection => "Ücretlerin Toplanması",
            Self::PriceUpdate => "Ehliyet Fiyatlarının Güncellenmesi",
            Self::General => "Genel Duyuru",
        }
    }
}

/// Admin-posted notice shown to every school, ranked by `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
    #[serde(default)]
    pub order: u32,
    #[serde(rename = "createdAt", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}
