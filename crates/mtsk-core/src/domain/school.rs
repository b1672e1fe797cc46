use super::license::LicenseClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Backend key reserved for the administrator account; never a reporting tenant.
pub const ADMIN_SCHOOL_ID: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolId(pub String);

impl SchoolId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate counts keyed by license class.
///
/// The mapping may be partially populated. [`CandidateCounts::count`] is the
/// single read path and yields `0` for any class without an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateCounts(BTreeMap<LicenseClass, u32>);

impl CandidateCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every class present with an explicit zero.
    pub fn zeroed() -> Self {
        LicenseClass::ordered()
            .into_iter()
            .map(|class| (class, 0))
            .collect()
    }

    pub fn count(&self, class: LicenseClass) -> u32 {
        self.0.get(&class).copied().unwrap_or(0)
    }

    pub fn with(mut self, class: LicenseClass, count: u32) -> Self {
        self.0.insert(class, count);
        self
    }

    pub fn set(&mut self, class: LicenseClass, count: u32) {
        self.0.insert(class, count);
    }

    pub fn is_recorded(&self, class: LicenseClass) -> bool {
        self.0.contains_key(&class)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded entries only, in class order.
    pub fn iter(&self) -> impl Iterator<Item = (LicenseClass, u32)> + '_ {
        self.0.iter().map(|(class, count)| (*class, *count))
    }
}

impl FromIterator<(LicenseClass, u32)> for CandidateCounts {
    fn from_iter<T: IntoIterator<Item = (LicenseClass, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A driving-school tenant and its current enrolment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub candidates: CandidateCounts,
}

impl School {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: SchoolId::new(id),
            name: name.into(),
            email: email.into(),
            candidates: CandidateCounts::new(),
        }
    }

    pub fn with_candidates(mut self, candidates: CandidateCounts) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn is_admin_account(&self) -> bool {
        self.id.as_str() == ADMIN_SCHOOL_ID
    }
}
