//! In-memory adapters for the record repository ports.
//!
//! Used by tests and by local runs without a configured database. Each
//! collection sits behind its own `RwLock`; records keep insertion order so
//! listings match the oldest-first order of the Diesel adapters.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    EvidenceRepository, RecordRepository, ReportRepository, RepositoryError, UserRepository,
};
use crate::domain::{CaseId, Email, Evidence, Record, Report, User};

/// Generic in-memory store for any [`Record`].
#[derive(Debug)]
pub struct MemoryRecordRepository<R> {
    records: RwLock<Vec<R>>,
}

impl<R> Default for MemoryRecordRepository<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<R: Record> MemoryRecordRepository<R> {
    async fn retain_count<F>(&self, mut keep: F) -> u64
    where
        F: FnMut(&R) -> bool + Send,
    {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| keep(record));
        (before - records.len()) as u64
    }

    async fn filtered<F>(&self, mut include: F) -> Vec<R>
    where
        F: FnMut(&R) -> bool + Send,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| include(record))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl<R: Record> RecordRepository<R> for MemoryRecordRepository<R> {
    async fn insert(&self, record: &R) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(RepositoryError::conflict(format!(
                "{} {} already exists",
                R::LABEL,
                record.id()
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<R>, RepositoryError> {
        Ok(self.records.read().await.clone())
    }

    async fn find(&self, id: &R::Id) -> Result<Option<R>, RepositoryError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.id() == *id)
            .cloned())
    }

    async fn update(&self, record: &R) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &R::Id) -> Result<bool, RepositoryError> {
        Ok(self.retain_count(|record| record.id() != *id).await > 0)
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        Ok(self.retain_count(|_| false).await)
    }
}

/// Delegate the base port to an inner [`MemoryRecordRepository`].
macro_rules! delegate_record_repository {
    ($name:ident, $record:ty) => {
        #[async_trait]
        impl RecordRepository<$record> for $name {
            async fn insert(&self, record: &$record) -> Result<(), RepositoryError> {
                self.inner.insert(record).await
            }

            async fn list(&self) -> Result<Vec<$record>, RepositoryError> {
                self.inner.list().await
            }

            async fn find(
                &self,
                id: &<$record as Record>::Id,
            ) -> Result<Option<$record>, RepositoryError> {
                self.inner.find(id).await
            }

            async fn update(&self, record: &$record) -> Result<bool, RepositoryError> {
                self.inner.update(record).await
            }

            async fn delete(&self, id: &<$record as Record>::Id) -> Result<bool, RepositoryError> {
                self.inner.delete(id).await
            }

            async fn delete_all(&self) -> Result<u64, RepositoryError> {
                self.inner.delete_all().await
            }
        }
    };
}

/// In-memory evidence store.
#[derive(Debug, Default)]
pub struct MemoryEvidenceRepository {
    inner: MemoryRecordRepository<Evidence>,
}

delegate_record_repository!(MemoryEvidenceRepository, Evidence);

#[async_trait]
impl EvidenceRepository for MemoryEvidenceRepository {
    async fn list_by_case(&self, case_id: &CaseId) -> Result<Vec<Evidence>, RepositoryError> {
        let mut items = self.inner.filtered(|item| item.case_id == *case_id).await;
        items.sort_by_key(|item| item.collected_at);
        Ok(items)
    }

    async fn delete_by_case(&self, case_id: &CaseId) -> Result<u64, RepositoryError> {
        Ok(self.inner.retain_count(|item| item.case_id != *case_id).await)
    }
}

/// In-memory report store.
#[derive(Debug, Default)]
pub struct MemoryReportRepository {
    inner: MemoryRecordRepository<Report>,
}

delegate_record_repository!(MemoryReportRepository, Report);

#[async_trait]
impl ReportRepository for MemoryReportRepository {
    async fn delete_by_case(&self, case_id: &CaseId) -> Result<u64, RepositoryError> {
        Ok(self.inner.retain_count(|report| report.case_id != *case_id).await)
    }
}

/// In-memory user store enforcing unique emails.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    inner: MemoryRecordRepository<User>,
}

fn email_taken(users: &[User], user: &User) -> bool {
    users
        .iter()
        .any(|existing| existing.email == user.email && existing.id != user.id)
}

fn email_conflict() -> RepositoryError {
    RepositoryError::conflict("email already registered")
}

#[async_trait]
impl RecordRepository<User> for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        // Uniqueness is checked under the same guard as the push.
        let mut users = self.inner.records.write().await;
        if users.iter().any(|existing| existing.id == user.id) {
            return Err(RepositoryError::conflict(format!(
                "{} {} already exists",
                User::LABEL,
                user.id
            )));
        }
        if email_taken(&users, user) {
            return Err(email_conflict());
        }
        users.push(user.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.inner.list().await
    }

    async fn find(&self, id: &crate::domain::UserId) -> Result<Option<User>, RepositoryError> {
        self.inner.find(id).await
    }

    async fn update(&self, user: &User) -> Result<bool, RepositoryError> {
        let mut users = self.inner.records.write().await;
        if email_taken(&users, user) {
            return Err(email_conflict());
        }
        match users.iter_mut().find(|existing| existing.id == user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &crate::domain::UserId) -> Result<bool, RepositoryError> {
        self.inner.delete(id).await
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.inner.delete_all().await
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .inner
            .filtered(|user| user.email == *email)
            .await
            .into_iter()
            .next())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.records.read().await.len() as u64)
    }
}
