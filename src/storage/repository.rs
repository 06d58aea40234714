//! The student repository.
//!
//! Holds the working set of records and persists the whole collection
//! through a [`KeyValueStore`] on every change.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::models::{NewStudent, StudentId, StudentRecord};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

/// Default key the roster is stored under.
pub const DEFAULT_KEY: &str = "@meditrackr_students";

/// Single authority over the persisted roster.
///
/// Every write persists the new collection first and only then replaces the
/// working set, so a failed write leaves the working set untouched.
pub struct StudentRepository<S> {
    store: S,
    key: String,
    students: Vec<StudentRecord>,
}

impl<S: KeyValueStore> StudentRepository<S> {
    /// Open the repository and load the stored collection.
    ///
    /// A missing key is an empty roster; unreadable data is an error.
    pub async fn open(store: S, key: impl Into<String>) -> StorageResult<Self> {
        let mut repo = Self {
            store,
            key: key.into(),
            students: Vec::new(),
        };
        repo.reload().await?;
        Ok(repo)
    }

    /// Replace the working set with the stored collection.
    pub async fn reload(&mut self) -> StorageResult<()> {
        self.students = match self.store.get(&self.key).await? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                    key: self.key.clone(),
                    source,
                })?
            }
            _ => Vec::new(),
        };

        info!(
            "Loaded {} students from '{}'",
            self.students.len(),
            self.key
        );
        Ok(())
    }

    /// Snapshot of the working set, in stored order.
    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    /// Find a record by identifier.
    pub fn find(&self, id: &StudentId) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.id() == id)
    }

    /// Validate and add a new student. Returns the stored record.
    pub async fn add(&mut self, details: NewStudent) -> StorageResult<StudentRecord> {
        self.add_at(details, Utc::now()).await
    }

    /// Add a new student created at a given time.
    pub async fn add_at(
        &mut self,
        details: NewStudent,
        created_at: DateTime<Utc>,
    ) -> StorageResult<StudentRecord> {
        let id = self.next_id(created_at);
        let record = StudentRecord::new(id, details, created_at)?;

        let mut students = self.students.clone();
        students.push(record.clone());
        self.save(students).await?;

        info!(
            "Added student {} ({}) to class {}",
            record.id(),
            record.name(),
            record.class_number()
        );
        Ok(record)
    }

    /// Replace a student's details, keeping the identifier and creation time.
    pub async fn update(
        &mut self,
        id: &StudentId,
        details: NewStudent,
    ) -> StorageResult<StudentRecord> {
        let index = self.position(id)?;
        let record = self.students[index].replaced_with(details)?;

        let mut students = self.students.clone();
        students[index] = record.clone();
        self.save(students).await?;

        info!("Updated student {}", id);
        Ok(record)
    }

    /// Delete a student. Returns the removed record.
    pub async fn delete(&mut self, id: &StudentId) -> StorageResult<StudentRecord> {
        let index = self.position(id)?;

        let mut students = self.students.clone();
        let removed = students.remove(index);
        self.save(students).await?;

        info!("Deleted student {}", id);
        Ok(removed)
    }

    fn position(&self, id: &StudentId) -> StorageResult<usize> {
        self.students
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| StorageError::NotFound(id.clone()))
    }

    /// Timestamp-based id, moved forward by a millisecond until unused.
    fn next_id(&self, at: DateTime<Utc>) -> StudentId {
        let mut at = at;
        let mut id = StudentId::from_timestamp(at);

        while self.find(&id).is_some() {
            at += Duration::milliseconds(1);
            id = StudentId::from_timestamp(at);
        }

        id
    }

    async fn save(&mut self, students: Vec<StudentRecord>) -> StorageResult<()> {
        let raw = serde_json::to_string(&students)?;
        self.store.set(&self.key, raw).await?;

        debug!("Saved {} students to '{}'", students.len(), self.key);
        self.students = students;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::details;
    use crate::models::BmiCategory;
    use crate::storage::store::MemoryStore;
    use crate::storage::FileStore;
    use chrono::TimeZone;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    const FIXTURE: &str = include_str!("../../fixtures/students.json");

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    async fn empty_repo() -> StudentRepository<MemoryStore> {
        assert_ok!(StudentRepository::open(MemoryStore::default(), DEFAULT_KEY).await)
    }

    #[tokio::test]
    async fn test_open_empty_store() {
        let repo = empty_repo().await;
        assert!(repo.students().is_empty());
    }

    #[tokio::test]
    async fn test_open_fixture() {
        let store = MemoryStore::with_value(DEFAULT_KEY, FIXTURE);
        let repo = assert_ok!(StudentRepository::open(store, DEFAULT_KEY).await);

        assert_eq!(repo.students().len(), 5);
        let first = repo.find(&StudentId::from("1717400000000")).unwrap();
        assert_eq!(first.name(), "Aarav Sharma");
        assert_eq!(first.bmi(), 22.9);
        assert_eq!(first.bmi_category(), BmiCategory::Normal);
    }

    #[tokio::test]
    async fn test_corrupt_data_is_an_error() {
        let store = MemoryStore::with_value(DEFAULT_KEY, "{not json");
        let Err(err) = StudentRepository::open(store, DEFAULT_KEY).await else {
            panic!("expected corrupt data error");
        };

        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_invalid_stored_record_is_corrupt() {
        let stored = r#"[
            {"id": "1", "name": "Ghost", "class": 0, "rollNo": 1, "weight": 0,
             "height": 0, "age": 8, "createdAt": "2024-03-01T09:00:00Z"},
            {"id": "2", "name": "Flat", "class": 3, "rollNo": 2, "weight": 50,
             "height": 0, "age": 9, "createdAt": "2024-03-01T09:00:00Z"}
        ]"#;
        let store = MemoryStore::with_value(DEFAULT_KEY, stored);

        let Err(err) = StudentRepository::open(store, DEFAULT_KEY).await else {
            panic!("expected invalid records to be rejected");
        };

        match err {
            StorageError::Corrupt { key, source } => {
                assert_eq!(key, DEFAULT_KEY);
                assert!(source.to_string().contains("class must be between 1 and 10"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_persists_collection() {
        let mut repo = empty_repo().await;

        let record = assert_ok!(repo.add_at(details("Nila", 2, 21.0), at(1_000)).await);

        assert_eq!(record.id().as_str(), "1000");
        assert_eq!(repo.students().len(), 1);

        let raw = repo.store.raw(DEFAULT_KEY).await.unwrap();
        assert!(raw.contains("\"name\":\"Nila\""));
    }

    #[tokio::test]
    async fn test_ids_are_unique_within_same_millisecond() {
        let mut repo = empty_repo().await;

        let a = assert_ok!(repo.add_at(details("A", 1, 20.0), at(5_000)).await);
        let b = assert_ok!(repo.add_at(details("B", 1, 20.0), at(5_000)).await);

        assert_eq!(a.id().as_str(), "5000");
        assert_eq!(b.id().as_str(), "5001");
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_details() {
        let mut repo = empty_repo().await;

        let err = assert_err!(repo.add(details("", 1, 20.0)).await);

        assert!(matches!(err, StorageError::Invalid(_)));
        assert!(repo.students().is_empty());
        assert!(repo.store.raw(DEFAULT_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let mut repo = empty_repo().await;
        let original = assert_ok!(repo.add_at(details("Omar", 4, 19.0), at(7_000)).await);

        let updated = assert_ok!(repo.update(original.id(), details("Omar", 5, 26.0)).await);

        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.created_at(), original.created_at());
        assert_eq!(updated.class_number(), 5);
        assert_eq!(updated.bmi_category(), BmiCategory::Overweight);
        assert_eq!(repo.find(original.id()), Some(&updated));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let mut repo = empty_repo().await;

        let missing = StudentId::from("42");
        let err = assert_err!(repo.update(&missing, details("X", 1, 20.0)).await);
        assert!(matches!(err, StorageError::NotFound(id) if id.as_str() == "42"));
    }

    #[tokio::test]
    async fn test_delete() {
        let mut repo = empty_repo().await;
        let keep = assert_ok!(repo.add_at(details("Keep", 1, 20.0), at(1)).await);
        let leaving = assert_ok!(repo.add_at(details("Leaving", 1, 20.0), at(2)).await);

        let removed = assert_ok!(repo.delete(leaving.id()).await);

        assert_eq!(removed.name(), "Leaving");
        assert_eq!(repo.students(), &[keep]);
        assert_err!(repo.delete(leaving.id()).await);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_working_set() {
        let mut repo = empty_repo().await;
        let existing = assert_ok!(repo.add_at(details("Stay", 3, 22.0), at(10)).await);

        repo.store.fail_writes(true);

        assert_err!(repo.add_at(details("Lost", 3, 22.0), at(11)).await);
        assert_err!(repo.delete(existing.id()).await);
        assert_eq!(repo.students(), &[existing]);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();

        let mut repo =
            assert_ok!(StudentRepository::open(FileStore::new(dir.path()), DEFAULT_KEY).await);
        assert_ok!(repo.add_at(details("Ishaan", 7, 24.6), at(100)).await);
        assert_ok!(repo.add_at(details("Kavya", 8, 17.9), at(200)).await);

        let reopened =
            assert_ok!(StudentRepository::open(FileStore::new(dir.path()), DEFAULT_KEY).await);

        assert_eq!(reopened.students(), repo.students());
        assert!(dir.path().join("meditrackr_students.json").exists());
    }
}
