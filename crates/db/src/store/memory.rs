use std::collections::BTreeMap;

use agency_core::search::{matches_filter, newest_first, ListFilter};
use agency_core::submission::{NewSubmission, Submission, SubmissionStatus};
use agency_core::types::DbId;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::SubmissionStore;
use crate::error::StoreResult;

#[derive(Default)]
struct Inner {
    next_id: DbId,
    rows: BTreeMap<DbId, Submission>,
}

/// Process-local [`SubmissionStore`]. Contents are lost on restart.
#[derive(Default)]
pub struct MemorySubmissionStore {
    inner: RwLock<Inner>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matching rows, newest first.
    async fn sorted_matches(&self, filter: &ListFilter) -> Vec<Submission> {
        let inner = self.inner.read().await;
        let mut items: Vec<_> = inner
            .rows
            .values()
            .filter(|s| matches_filter(s, filter))
            .cloned()
            .collect();
        items.sort_by(newest_first);
        items
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn create(&self, input: &NewSubmission) -> StoreResult<Submission> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let submission = Submission {
            id: inner.next_id,
            name: input.name.clone(),
            email: input.email.clone(),
            subject: input.subject.clone(),
            message: input.message.clone(),
            status: SubmissionStatus::New,
            ip_address: input.ip_address.clone(),
            location: input.location.clone(),
            notes: String::new(),
            created_at: chrono::Utc::now(),
        };
        inner.rows.insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Submission>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[DbId]) -> StoreResult<Vec<Submission>> {
        let inner = self.inner.read().await;
        let mut items: Vec<_> = inner
            .rows
            .values()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect();
        items.sort_by(newest_first);
        Ok(items)
    }

    async fn list(
        &self,
        filter: &ListFilter,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Submission>> {
        let items = self.sorted_matches(filter).await;
        Ok(items
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn list_all(&self, filter: &ListFilter) -> StoreResult<Vec<Submission>> {
        Ok(self.sorted_matches(filter).await)
    }

    async fn count(&self, filter: &ListFilter) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        let n = inner
            .rows
            .values()
            .filter(|s| matches_filter(s, filter))
            .count();
        Ok(n as i64)
    }

    async fn update_status(
        &self,
        id: DbId,
        status: SubmissionStatus,
    ) -> StoreResult<Option<Submission>> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.get_mut(&id).map(|s| {
            s.status = status;
            s.clone()
        }))
    }

    async fn update_notes(&self, id: DbId, notes: &str) -> StoreResult<Option<Submission>> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.get_mut(&id).map(|s| {
            s.notes = notes.to_string();
            s.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[DbId]) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let removed = ids
            .iter()
            .filter(|id| inner.rows.remove(id).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn status_counts(&self) -> StoreResult<Vec<(SubmissionStatus, i64)>> {
        let inner = self.inner.read().await;
        Ok(SubmissionStatus::ALL
            .into_iter()
            .map(|status| {
                let n = inner.rows.values().filter(|s| s.status == status).count();
                (status, n as i64)
            })
            .collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use agency_core::submission::Location;

    use super::*;

    fn new_submission(name: &str) -> NewSubmission {
        NewSubmission {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            subject: "Website".into(),
            message: "Please call back".into(),
            ip_address: "127.0.0.1".into(),
            location: Location::local(),
        }
    }

    async fn seeded(n: usize) -> (MemorySubmissionStore, Vec<DbId>) {
        let store = MemorySubmissionStore::new();
        let mut ids = Vec::new();
        for i in 0..n {
            let s = store.create(&new_submission(&format!("Client{i}"))).await.unwrap();
            ids.push(s.id);
        }
        (store, ids)
    }

    #[tokio::test]
    async fn create_defaults_status_and_notes() {
        let (store, ids) = seeded(1).await;
        let s = store.find_by_id(ids[0]).await.unwrap().unwrap();
        assert_eq!(s.status, SubmissionStatus::New);
        assert!(s.notes.is_empty());
        assert_eq!(s.location, Location::local());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let (store, ids) = seeded(5).await;
        let page = store.list(&ListFilter::default(), 2, 1).await.unwrap();
        let got: Vec<_> = page.iter().map(|s| s.id).collect();
        assert_eq!(got, vec![ids[3], ids[2]]);
        assert_eq!(store.count(&ListFilter::default()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn delete_many_counts_only_existing_rows() {
        let (store, ids) = seeded(3).await;
        assert!(store.delete(ids[0]).await.unwrap());
        assert!(!store.delete(ids[0]).await.unwrap());

        let deleted = store.delete_many(&[ids[0], ids[1], ids[2], 999]).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.delete_many(&[ids[1], ids[2]]).await.unwrap(), 0);
        assert_eq!(store.count(&ListFilter::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn updates_return_none_for_missing_ids() {
        let (store, ids) = seeded(1).await;
        assert!(store
            .update_status(42, SubmissionStatus::Closed)
            .await
            .unwrap()
            .is_none());
        assert!(store.update_notes(42, "x").await.unwrap().is_none());

        store.update_notes(ids[0], "first").await.unwrap();
        let s = store.update_notes(ids[0], "second").await.unwrap().unwrap();
        assert_eq!(s.notes, "second");
    }

    #[tokio::test]
    async fn status_counts_include_zeroes() {
        let (store, ids) = seeded(3).await;
        store
            .update_status(ids[1], SubmissionStatus::Quoted)
            .await
            .unwrap();
        let counts = store.status_counts().await.unwrap();
        assert_eq!(
            counts,
            vec![
                (SubmissionStatus::New, 2),
                (SubmissionStatus::Contacted, 0),
                (SubmissionStatus::Quoted, 1),
                (SubmissionStatus::Closed, 0),
            ]
        );
    }
}
