//! Storage backends for the company registry.
//!
//! Both backends speak the same transactional contract: `begin` opens a
//! transaction, all reads and writes go through the returned [`StorageTx`],
//! and nothing becomes visible to other callers until `commit`. Dropping an
//! uncommitted transaction rolls it back.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;
use cfql_core::Filter;

use crate::company::Company;
use crate::error::DbResult;

#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    type Tx: StorageTx + Send;

    async fn begin(&self) -> DbResult<Self::Tx>;
}

#[async_trait]
pub trait StorageTx: Send {
    /// List companies matching the compiled filter, ordered by name.
    async fn get(&mut self, filter: &Filter) -> DbResult<Vec<Company>>;

    /// Insert a new company and return its id.
    async fn create(&mut self, company: &Company) -> DbResult<i64>;

    async fn update(&mut self, company: &Company) -> DbResult<()>;

    async fn delete(&mut self, id: i64) -> DbResult<()>;

    async fn commit(self) -> DbResult<()>;
}
