mod announcement;
mod fees;
mod license;
mod school;

pub use announcement::{Announcement, AnnouncementId, AnnouncementKind, MoveDirection};
pub use fees::FeeTable;
pub use license::LicenseClass;
pub use school::{CandidateCounts, School, SchoolId, ADMIN_SCHOOL_ID};
