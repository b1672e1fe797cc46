//! Pure reductions over school snapshots.
//!
//! Nothing here performs I/O or mutates its inputs; every function is total over
//! its domain so callers can recompute on each backend snapshot.

mod quota;

pub use quota::{quota, Quota, B_CLASS_CAP, DIFFERENCE_CLASS_CAP};

use crate::domain::{CandidateCounts, FeeTable, LicenseClass, School};
use rust_decimal::Decimal;

/// Candidates across every school and every known class.
pub fn total_candidates(schools: &[School]) -> u64 {
    schools.iter().map(school_candidates).sum()
}

/// Candidates of a single school across every known class.
pub fn school_candidates(school: &School) -> u64 {
    LicenseClass::ordered()
        .into_iter()
        .map(|class| u64::from(school.candidates.count(class)))
        .sum()
}

pub fn difference_candidates(school: &School) -> u64 {
    LicenseClass::difference_classes()
        .into_iter()
        .map(|class| u64::from(school.candidates.count(class)))
        .sum()
}

pub fn total_fee(schools: &[School], fees: &FeeTable) -> Decimal {
    schools.iter().map(|school| school_fee(school, fees)).sum()
}

pub fn school_fee(school: &School, fees: &FeeTable) -> Decimal {
    LicenseClass::ordered()
        .into_iter()
        .map(|class| Decimal::from(school.candidates.count(class)) * fees.fee(class))
        .sum()
}

/// Per-class series in enumeration order, zero-filled.
pub fn class_breakdown(school: &School) -> [(LicenseClass, u32); LicenseClass::COUNT] {
    LicenseClass::ordered().map(|class| (class, school.candidates.count(class)))
}

/// Returns a copy of `school` with one class adjusted by `delta`, floored at zero.
pub fn apply_delta(school: &School, class: LicenseClass, delta: i64) -> School {
    let current = i64::from(school.candidates.count(class));
    let next = current
        .saturating_add(delta)
        .clamp(0, i64::from(u32::MAX)) as u32;

    let mut updated = school.clone();
    updated.candidates.set(class, next);
    updated
}

/// Administrative reset: every school ends up with an explicit zero per class.
pub fn reset_candidates(schools: &[School]) -> Vec<School> {
    schools
        .iter()
        .map(|school| school.clone().with_candidates(CandidateCounts::zeroed()))
        .collect()
}
