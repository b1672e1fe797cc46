//! Candidate tracking core for the MTSK driving-school dashboard.
//!
//! [`aggregation`] and [`announcements`] are pure and hold no state. The
//! [`service`] module pairs them with an injected [`store::DashboardStore`].

pub mod aggregation;
pub mod announcements;
pub mod config;
pub mod domain;
pub mod error;
pub mod report;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod telemetry;
