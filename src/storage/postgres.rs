//! PostgreSQL storage adapter.

use async_trait::async_trait;
use cfql_core::{Filter, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};

use crate::company::Company;
use crate::error::DbResult;
use crate::storage::{Storage, StorageTx};

#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database behind `dsn` and return a storage handle.
    pub async fn connect(dsn: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(dsn).await?;
        Ok(Self { pool })
    }

    /// Create the companies table if it does not exist yet.
    pub async fn initialize(&self) -> DbResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS companies (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                country TEXT NOT NULL DEFAULT '',
                website TEXT NOT NULL DEFAULT '',
                phone TEXT NOT NULL DEFAULT ''
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for PgStorage {
    type Tx = PgTx;

    async fn begin(&self) -> DbResult<PgTx> {
        Ok(PgTx {
            tx: self.pool.begin().await?,
        })
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StorageTx for PgTx {
    async fn get(&mut self, filter: &Filter) -> DbResult<Vec<Company>> {
        let mut sql =
            String::from("SELECT id, name, code, country, website, phone FROM companies");
        if !filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.expression);
        }
        sql.push_str(" ORDER BY name");
        tracing::debug!(query = %sql, "executing query");

        let mut query = sqlx::query_as::<_, Company>(&sql);
        for argument in &filter.arguments {
            query = match argument {
                Value::Integer(n) => query.bind(n),
                Value::Float(x) => query.bind(x),
                Value::Text(s) => query.bind(s),
            };
        }
        Ok(query.fetch_all(&mut *self.tx).await?)
    }

    async fn create(&mut self, company: &Company) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO companies (name, code, country, website, phone) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&company.name)
        .bind(&company.code)
        .bind(&company.country)
        .bind(&company.website)
        .bind(&company.phone)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(id)
    }

    async fn update(&mut self, company: &Company) -> DbResult<()> {
        sqlx::query(
            "UPDATE companies SET name = $1, code = $2, country = $3, website = $4, phone = $5 \
             WHERE id = $6",
        )
        .bind(&company.name)
        .bind(&company.code)
        .bind(&company.country)
        .bind(&company.website)
        .bind(&company.phone)
        .bind(company.id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self) -> DbResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
