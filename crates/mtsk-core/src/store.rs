use std::sync::{Mutex, MutexGuard};

use crate::announcements::sort_announcements;
use crate::domain::{Announcement, AnnouncementId, CandidateCounts, FeeTable, School, SchoolId};
use crate::snapshot::BackendSnapshot;

/// Read/write capability onto the hosted realtime database.
///
/// Injected into [`crate::service::DashboardService`] so the engine never
/// reaches for a global handle.
pub trait DashboardStore: Send + Sync {
    fn schools(&self) -> Result<Vec<School>, StoreError>;
    fn fee_table(&self) -> Result<FeeTable, StoreError>;
    /// Announcements sorted by `order`.
    fn announcements(&self) -> Result<Vec<Announcement>, StoreError>;
    fn write_candidates(
        &self,
        school_id: &SchoolId,
        candidates: &CandidateCounts,
    ) -> Result<(), StoreError>;
    /// Read-modify-write of one school as a single atomic step.
    fn update_school<F>(&self, school_id: &SchoolId, update: F) -> Result<School, StoreError>
    where
        F: FnOnce(&School) -> School;
    /// Merge `updates` into the stored table and return the result.
    fn merge_fee_table(&self, updates: &FeeTable) -> Result<FeeTable, StoreError>;
    fn write_announcement_orders(&self, orders: &[(AnnouncementId, u32)])
        -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store seeded from a backend export.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<BackendSnapshot>,
}

impl InMemoryStore {
    pub fn new(snapshot: BackendSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
        }
    }

    pub fn snapshot(&self) -> Result<BackendSnapshot, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BackendSnapshot>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl DashboardStore for InMemoryStore {
    fn schools(&self) -> Result<Vec<School>, StoreError> {
        Ok(self.lock()?.schools.clone())
    }

    fn fee_table(&self) -> Result<FeeTable, StoreError> {
        Ok(self.lock()?.fees.clone())
    }

    fn announcements(&self) -> Result<Vec<Announcement>, StoreError> {
        Ok(self.lock()?.announcements.clone())
    }

    fn write_candidates(
        &self,
        school_id: &SchoolId,
        candidates: &CandidateCounts,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let school = guard
            .schools
            .iter_mut()
            .find(|school| &school.id == school_id)
            .ok_or_else(|| StoreError::NotFound(format!("school {school_id}")))?;
        school.candidates = candidates.clone();
        Ok(())
    }

    fn update_school<F>(&self, school_id: &SchoolId, update: F) -> Result<School, StoreError>
    where
        F: FnOnce(&School) -> School,
    {
        let mut guard = self.lock()?;
        let school = guard
            .schools
            .iter_mut()
            .find(|school| &school.id == school_id)
            .ok_or_else(|| StoreError::NotFound(format!("school {school_id}")))?;
        let updated = update(school);
        school.candidates = updated.candidates.clone();
        Ok(updated)
    }

    fn merge_fee_table(&self, updates: &FeeTable) -> Result<FeeTable, StoreError> {
        let mut guard = self.lock()?;
        let merged = guard.fees.merged(updates);
        guard.fees = merged.clone();
        Ok(merged)
    }

    fn write_announcement_orders(
        &self,
        orders: &[(AnnouncementId, u32)],
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if let Some((missing, _)) = orders
            .iter()
            .find(|(id, _)| !guard.announcements.iter().any(|a| &a.id == id))
        {
            return Err(StoreError::NotFound(format!("announcement {missing}")));
        }

        for (id, order) in orders {
            if let Some(announcement) = guard.announcements.iter_mut().find(|a| &a.id == id) {
                announcement.order = *order;
            }
        }
        let sorted = sort_announcements(&guard.announcements);
        guard.announcements = sorted;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnnouncementKind, LicenseClass};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn seeded() -> InMemoryStore {
        let announcement = |id: &str, order| Announcement {
            id: AnnouncementId::new(id),
            content: id.to_string(),
            kind: AnnouncementKind::Meeting,
            order,
            created_at: Utc::now(),
        };
        InMemoryStore::new(BackendSnapshot {
            schools: vec![School::new("1", "ÖZEL BİGA TEKSÜR MTSK", "teksur@biga.com")],
            fees: FeeTable::reference(),
            announcements: vec![announcement("a", 0), announcement("b", 1)],
        })
    }

    #[test]
    fn writes_candidates_for_known_schools() {
        let store = seeded();
        let counts = CandidateCounts::new().with(LicenseClass::B, 3);
        store
            .write_candidates(&SchoolId::new("1"), &counts)
            .expect("write succeeds");
        assert_eq!(store.schools().expect("read")[0].candidates, counts);

        match store.write_candidates(&SchoolId::new("9"), &counts) {
            Err(StoreError::NotFound(_)) => {}
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn concurrent_school_updates_are_serialized() {
        let store = std::sync::Arc::new(seeded());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        store
                            .update_school(&SchoolId::new("1"), |school| {
                                crate::aggregation::apply_delta(school, LicenseClass::C, 1)
                            })
                            .expect("update succeeds");
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().expect("worker finished");
        }

        assert_eq!(
            store.schools().expect("read")[0].candidates.count(LicenseClass::C),
            2000
        );
    }

    #[test]
    fn fee_merges_keep_unlisted_classes() {
        let store = seeded();
        let merged = store
            .merge_fee_table(&FeeTable::new().with(LicenseClass::B, Decimal::from(16_000)))
            .expect("merge succeeds");

        assert_eq!(merged.fee(LicenseClass::B), Decimal::from(16_000));
        assert_eq!(merged.fee(LicenseClass::A1), Decimal::from(12_000));
        assert_eq!(store.fee_table().expect("read"), merged);
    }

    #[test]
    fn order_writes_resort_announcements() {
        let store = seeded();
        store
            .write_announcement_orders(&[
                (AnnouncementId::new("b"), 0),
                (AnnouncementId::new("a"), 1),
            ])
            .expect("orders written");
        let ids: Vec<_> = store
            .announcements()
            .expect("read")
            .into_iter()
            .map(|a| a.id.0)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn order_writes_with_unknown_ids_change_nothing() {
        let store = seeded();
        let result = store.write_announcement_orders(&[
            (AnnouncementId::new("a"), 5),
            (AnnouncementId::new("ghost"), 0),
        ]);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.announcements().expect("read")[0].order, 0);
    }
}
