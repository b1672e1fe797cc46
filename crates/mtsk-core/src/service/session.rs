use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::SchoolId;

/// Decides who may perform administrative writes.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    admin_email: String,
}

impl AccessPolicy {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    pub fn is_admin(&self, email: &str) -> bool {
        same_email(&self.admin_email, email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorRole {
    Admin,
    School,
}

/// Context for one logged-in operator, from login until logout.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub email: String,
    pub role: OperatorRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<SchoolId>,
    pub opened_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == OperatorRole::Admin
    }
}

pub(crate) fn same_email(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}
