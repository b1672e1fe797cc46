//! Adapter from the realtime database export into domain records.

mod normalizer;
mod parser;

use crate::announcements::sort_announcements;
use crate::domain::{
    Announcement, AnnouncementId, CandidateCounts, FeeTable, LicenseClass, School, SchoolId,
};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use parser::{RawAnnouncement, RawSchool};

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "failed to read backend snapshot: {}", err),
            SnapshotError::Json(err) => write!(f, "invalid backend snapshot JSON: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Schools, fees and announcements as one consistent read of the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendSnapshot {
    pub schools: Vec<School>,
    pub fees: FeeTable,
    /// Sorted by `order`.
    pub announcements: Vec<Announcement>,
}

impl BackendSnapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let raw = parser::parse_snapshot(reader)?;

        let mut schools: Vec<School> = raw
            .schools
            .unwrap_or_default()
            .into_iter()
            .map(|(id, school)| school_from_raw(id, school))
            .collect();
        schools.sort_by(by_school_id);

        let fees = raw
            .license_fees
            .map(|fees| fee_table_from_raw(&fees))
            .unwrap_or_default();

        let announcements: Vec<Announcement> = raw
            .announcements
            .unwrap_or_default()
            .into_iter()
            .map(|(id, announcement)| announcement_from_raw(id, announcement))
            .collect();

        Ok(Self {
            schools,
            fees,
            announcements: sort_announcements(&announcements),
        })
    }
}

/// Numeric ids in numeric order, then any other id (such as `admin`) by text.
fn by_school_id(left: &School, right: &School) -> Ordering {
    match (
        left.id.as_str().parse::<u64>(),
        right.id.as_str().parse::<u64>(),
    ) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => left.id.cmp(&right.id),
    }
}

fn school_from_raw(id: String, raw: RawSchool) -> School {
    let candidates = raw
        .candidates
        .map(|counts| candidates_from_raw(&id, &counts))
        .unwrap_or_default();

    School {
        id: SchoolId(id),
        name: raw.name.unwrap_or_default(),
        email: raw.email.unwrap_or_default(),
        candidates,
    }
}

fn candidates_from_raw(school_id: &str, raw: &BTreeMap<String, Value>) -> CandidateCounts {
    raw.iter()
        .filter_map(|(tag, value)| {
            let Some(class) = LicenseClass::from_tag(tag) else {
                debug!(school_id, tag = %tag, "ignoring unknown license class");
                return None;
            };
            normalizer::count_from_value(value).map(|count| (class, count))
        })
        .collect()
}

/// Fee entries keyed by class tag. Unknown tags and non-numeric values are
/// skipped; negative fees clamp to zero.
pub fn fee_table_from_raw(raw: &BTreeMap<String, Value>) -> FeeTable {
    raw.iter()
        .filter_map(|(tag, value)| {
            let Some(class) = LicenseClass::from_tag(tag) else {
                debug!(tag = %tag, "ignoring fee for unknown license class");
                return None;
            };
            normalizer::fee_from_value(value).map(|fee| (class, fee))
        })
        .collect()
}

fn announcement_from_raw(id: String, raw: RawAnnouncement) -> Announcement {
    Announcement {
        id: AnnouncementId(id),
        content: raw.content.unwrap_or_default(),
        kind: normalizer::kind_from_tag(raw.kind.as_deref()),
        order: normalizer::order_from_value(raw.order.as_ref()),
        created_at: normalizer::timestamp_from_value(raw.created_at.as_ref()),
    }
}
