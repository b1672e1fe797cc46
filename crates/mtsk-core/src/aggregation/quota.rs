use crate::domain::{LicenseClass, School};
use serde::Serialize;

/// Class B enrolment cap per school. Fixed policy; changing it is a new engine version.
pub const B_CLASS_CAP: i64 = 30;

/// Shared cap across FARK_A1, FARK_A2 and BAKANLIK_A1. Fixed policy like [`B_CLASS_CAP`].
pub const DIFFERENCE_CLASS_CAP: i64 = 15;

/// Remaining capacity before a school hits its caps.
///
/// Values go negative once a school is over quota; clamping or highlighting is
/// left to whoever renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quota {
    pub b_quota: i64,
    pub difference_quota: i64,
}

impl Quota {
    pub const fn is_exceeded(&self) -> bool {
        self.b_quota < 0 || self.difference_quota < 0
    }
}

pub fn quota(school: &School) -> Quota {
    let b_count = i64::from(school.candidates.count(LicenseClass::B));
    let difference_count = super::difference_candidates(school) as i64;

    Quota {
        b_quota: B_CLASS_CAP - b_count,
        difference_quota: DIFFERENCE_CLASS_CAP - difference_count,
    }
}
