//! In-memory storage adapter, used by tests and by `--memory` mode.

use std::sync::Arc;

use async_trait::async_trait;
use cfql_core::{Filter, Value};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::company::Company;
use crate::error::{DbError, DbResult};
use crate::storage::{Storage, StorageTx};

/// Keeps all companies in a mutex-guarded vector. A transaction holds the
/// lock for its whole lifetime and works on a staged copy of the data, so a
/// dropped transaction leaves no trace and a commit publishes everything at
/// once.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    companies: Vec<Company>,
    seq: i64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    type Tx = MemoryTx;

    async fn begin(&self) -> DbResult<MemoryTx> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.companies.clone();
        let seq = guard.seq;
        Ok(MemoryTx { guard, staged, seq })
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    staged: Vec<Company>,
    seq: i64,
}

#[async_trait]
impl StorageTx for MemoryTx {
    /// Only the expressions the service itself builds are interpreted here.
    async fn get(&mut self, filter: &Filter) -> DbResult<Vec<Company>> {
        match filter.expression.as_str() {
            "" => Ok(self.staged.clone()),
            "id = $1" => match filter.arguments.first() {
                Some(Value::Integer(id)) => {
                    Ok(self.staged.iter().filter(|c| c.id == *id).cloned().collect())
                }
                _ => Err(DbError::BadRequest(
                    "id filter expects one integer argument".to_string(),
                )),
            },
            "name = $1" => match filter.arguments.first() {
                Some(Value::Text(name)) => Ok(self
                    .staged
                    .iter()
                    .filter(|c| c.name == *name)
                    .cloned()
                    .collect()),
                _ => Err(DbError::BadRequest(
                    "name filter expects one text argument".to_string(),
                )),
            },
            other => Err(DbError::OperationNotSupported(format!(
                "memory storage cannot evaluate filter {other:?}"
            ))),
        }
    }

    async fn create(&mut self, company: &Company) -> DbResult<i64> {
        if self.staged.iter().any(|c| c.name == company.name) {
            return Err(DbError::AlreadyExists);
        }
        self.seq += 1;
        let mut created = company.clone();
        created.id = self.seq;
        self.staged.push(created);
        Ok(self.seq)
    }

    async fn update(&mut self, company: &Company) -> DbResult<()> {
        match self.staged.iter_mut().find(|c| c.id == company.id) {
            Some(existing) => {
                *existing = company.clone();
                Ok(())
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn delete(&mut self, id: i64) -> DbResult<()> {
        let before = self.staged.len();
        self.staged.retain(|c| c.id != id);
        if self.staged.len() == before {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn commit(mut self) -> DbResult<()> {
        self.guard.companies = std::mem::take(&mut self.staged);
        self.guard.seq = self.seq;
        Ok(())
    }
}
