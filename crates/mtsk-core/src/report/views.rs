use crate::aggregation::Quota;
use crate::domain::{Announcement, AnnouncementId, AnnouncementKind, SchoolId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportLayout {
    /// One column per license class.
    #[default]
    Full,
    /// Difference classes collapsed into a single `FARK` column.
    Compact,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassCountEntry {
    pub column: &'static str,
    pub column_label: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolReportEntry {
    pub school_id: SchoolId,
    pub name: String,
    pub classes: Vec<ClassCountEntry>,
    pub total_candidates: u64,
    pub total_fee: Decimal,
    pub quota: Quota,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailedReportView {
    pub layout: ReportLayout,
    pub rows: Vec<SchoolReportEntry>,
    pub total_candidates: u64,
    pub total_fee: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementView {
    pub id: AnnouncementId,
    pub content: String,
    pub kind: AnnouncementKind,
    pub kind_label: &'static str,
    pub order: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Announcement> for AnnouncementView {
    fn from(announcement: &Announcement) -> Self {
        Self {
            id: announcement.id.clone(),
            content: announcement.content.clone(),
            kind: announcement.kind,
            kind_label: announcement.kind.label(),
            order: announcement.order,
            created_at: announcement.created_at,
        }
    }
}

/// Operator's own standing next to the network-wide totals.
#[derive(Debug, Clone, Serialize)]
pub struct SchoolStanding {
    pub school_id: SchoolId,
    pub name: String,
    pub candidates: u64,
    pub fee: Decimal,
    pub quota: Quota,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub total_candidates: u64,
    pub total_fee: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<SchoolStanding>,
    pub announcements: Vec<AnnouncementView>,
}
