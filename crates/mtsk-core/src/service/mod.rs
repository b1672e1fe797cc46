//! Session-scoped operations that pair the aggregation engine with the store.

pub mod router;
mod session;


pub use router::dashboard_router;
pub use session::{AccessPolicy, OperatorRole, Session};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::aggregation::{apply_delta, reset_candidates};
use crate::announcements::{move_announcement, order_updates};
use crate::domain::{
    Announcement, AnnouncementId, FeeTable, LicenseClass, MoveDirection, School, SchoolId,
};
use crate::report::{DashboardOverview, DetailedReport};
use crate::store::{DashboardStore, StoreError};

use session::same_email;

/// Dashboard operations over an injected store.
pub struct DashboardService<S> {
    store: Arc<S>,
    policy: AccessPolicy,
}

impl<S> DashboardService<S>
where
    S: DashboardStore + 'static,
{
    pub fn new(store: Arc<S>, policy: AccessPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Resolve an already-authenticated e-mail to its school and open a session.
    pub fn open_session(&self, email: &str) -> Result<Session, ServiceError> {
        let school_id = self
            .store
            .schools()?
            .into_iter()
            .find(|school| same_email(&school.email, email))
            .map(|school| school.id);

        let role = if self.policy.is_admin(email) {
            OperatorRole::Admin
        } else if school_id.is_some() {
            OperatorRole::School
        } else {
            warn!(email, "no school registered for operator");
            return Err(ServiceError::UnknownOperator(email.trim().to_string()));
        };

        debug!(email, ?role, "session opened");
        Ok(Session {
            email: email.trim().to_string(),
            role,
            school_id,
            opened_at: Utc::now(),
        })
    }

    pub fn close_session(&self, session: Session) {
        let duration = Utc::now() - session.opened_at;
        debug!(
            email = %session.email,
            seconds = duration.num_seconds(),
            "session closed"
        );
    }

    pub fn overview(&self, session: &Session) -> Result<DashboardOverview, ServiceError> {
        let schools = self.store.schools()?;
        let fees = self.store.fee_table()?;
        let announcements = self.store.announcements()?;
        let operator = session
            .school_id
            .as_ref()
            .and_then(|id| schools.iter().find(|school| &school.id == id));

        Ok(DashboardOverview::build(
            operator,
            &schools,
            &fees,
            &announcements,
        ))
    }

    pub fn detailed_report(&self, _session: &Session) -> Result<DetailedReport, ServiceError> {
        let schools = self.store.schools()?;
        let fees = self.store.fee_table()?;
        Ok(DetailedReport::build(&schools, &fees))
    }

    /// Adjust the operator's own count for one class and persist it.
    ///
    /// The delta is applied inside the store, so concurrent changes for the
    /// same school do not overwrite each other.
    pub fn change_candidates(
        &self,
        session: &Session,
        class: LicenseClass,
        delta: i64,
    ) -> Result<School, ServiceError> {
        let school_id = session
            .school_id
            .as_ref()
            .ok_or(ServiceError::Forbidden {
                action: "change candidates",
            })?;
        let updated = self
            .store
            .update_school(school_id, |school| apply_delta(school, class, delta))
            .map_err(|err| match err {
                StoreError::NotFound(_) => ServiceError::SchoolNotFound(school_id.clone()),
                other => ServiceError::Store(other),
            })?;

        info!(
            school_id = %updated.id,
            class = %class,
            delta,
            count = updated.candidates.count(class),
            "candidate count updated"
        );
        Ok(updated)
    }

    /// Merge the given fees into the stored table; unlisted classes keep their fee.
    pub fn update_fees(&self, session: &Session, fees: FeeTable) -> Result<FeeTable, ServiceError> {
        self.require_admin(session, "update license fees")?;
        let merged = self.store.merge_fee_table(&fees.normalized())?;
        info!(email = %session.email, classes = fees.iter().count(), "license fees updated");
        Ok(merged)
    }

    /// Zero every school's counts. Returns how many schools were reset.
    pub fn reset_candidates(&self, session: &Session) -> Result<usize, ServiceError> {
        self.require_admin(session, "reset candidates")?;
        let reset = reset_candidates(&self.store.schools()?);
        for school in &reset {
            self.store.write_candidates(&school.id, &school.candidates)?;
        }
        info!(email = %session.email, schools = reset.len(), "all candidate counts reset");
        Ok(reset.len())
    }

    pub fn announcements(&self, _session: &Session) -> Result<Vec<Announcement>, ServiceError> {
        Ok(self.store.announcements()?)
    }

    /// Move one announcement and persist the renumbered ordering.
    pub fn move_announcement(
        &self,
        session: &Session,
        id: &AnnouncementId,
        direction: MoveDirection,
    ) -> Result<Vec<Announcement>, ServiceError> {
        self.require_admin(session, "reorder announcements")?;
        let current = self.store.announcements()?;
        if !current.iter().any(|announcement| &announcement.id == id) {
            return Err(ServiceError::AnnouncementNotFound(id.clone()));
        }

        let moved = move_announcement(&current, id, direction);
        if moved != current {
            self.store.write_announcement_orders(&order_updates(&moved))?;
            info!(announcement_id = %id, ?direction, "announcement order updated");
        }
        Ok(moved)
    }

    fn require_admin(&self, session: &Session, action: &'static str) -> Result<(), ServiceError> {
        if session.is_admin() {
            Ok(())
        } else {
            warn!(email = %session.email, action, "rejected non-admin request");
            Err(ServiceError::Forbidden { action })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("operator is not allowed to {action}")]
    Forbidden { action: &'static str },
    #[error("request does not identify an operator")]
    MissingOperator,
    #[error("no school is registered for {0}")]
    UnknownOperator(String),
    #[error("school {0} not found")]
    SchoolNotFound(SchoolId),
    #[error("announcement {0} not found")]
    AnnouncementNotFound(AnnouncementId),
    #[error(transparent)]
    Store(#[from] StoreError),
}
