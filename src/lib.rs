pub mod company;
pub mod error;
pub mod server;
pub mod service;
pub mod storage;

pub use company::Company;
pub use error::{DbError, DbResult};
pub use server::{create_router, CountryGate};
pub use service::Companies;
pub use storage::{MemoryStorage, PgStorage, Storage, StorageTx};
