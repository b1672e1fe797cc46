mod summary;
pub mod views;

pub use summary::{DetailedReport, ReportColumn, SchoolRow};
pub use views::{DashboardOverview, DetailedReportView, ReportLayout};
