//! The company service: CRUD operations with read-check-write semantics,
//! each running inside a single storage transaction.

use cfql_core::{Filter, Value};

use crate::company::Company;
use crate::error::{DbError, DbResult};
use crate::storage::{Storage, StorageTx};

#[derive(Clone)]
pub struct Companies<S> {
    storage: S,
}

impl<S: Storage> Companies<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// List companies matching an already-compiled filter.
    pub async fn get(&self, filter: &Filter) -> DbResult<Vec<Company>> {
        let mut tx = self.storage.begin().await?;
        let companies = tx.get(filter).await?;
        tx.commit().await?;
        Ok(companies)
    }

    /// Create a company and return its id. Re-creating a record identical to
    /// an existing one returns the existing id; a name collision with
    /// different data is a conflict.
    pub async fn create(&self, company: Company) -> DbResult<i64> {
        let mut tx = self.storage.begin().await?;
        let existing = tx
            .get(&Filter::raw(
                "name = $1",
                vec![Value::Text(company.name.clone())],
            ))
            .await?;
        if let Some(found) = existing.first() {
            if company.same_record(found) {
                return Ok(found.id);
            }
            return Err(DbError::AlreadyExists);
        }
        let id = tx.create(&company).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Update an existing company. Updating to the data already stored is a
    /// no-op success.
    pub async fn update(&self, company: Company) -> DbResult<()> {
        let mut tx = self.storage.begin().await?;
        let existing = tx
            .get(&Filter::raw("id = $1", vec![Value::Integer(company.id)]))
            .await?;
        let found = existing.first().ok_or(DbError::NotFound)?;
        if company == *found {
            return Ok(());
        }
        tx.update(&company).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Delete an existing company.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = self.storage.begin().await?;
        let existing = tx
            .get(&Filter::raw("id = $1", vec![Value::Integer(id)]))
            .await?;
        if existing.is_empty() {
            return Err(DbError::NotFound);
        }
        tx.delete(id).await?;
        tx.commit().await?;
        Ok(())
    }
}
