pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod schema;

use std::{fmt, str::FromStr, sync::Arc};

use appointments_core::repository::AppointmentRepository;
use eyre::{Result, eyre};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::{memory::MemoryAppointmentRepository, postgres::PgAppointmentRepository};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Backend selected through `STORAGE_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageType {
    #[default]
    Memory,
    Postgres,
}

impl FromStr for StorageType {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageType::Memory),
            "postgres" => Ok(StorageType::Postgres),
            other => Err(eyre!("unsupported storage type: {other}")),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Memory => write!(f, "memory"),
            StorageType::Postgres => write!(f, "postgres"),
        }
    }
}

/// Builds the repository for `storage`. Postgres needs `database_url` and gets
/// its schema created before the repository is handed out.
pub async fn create_repository(
    storage: StorageType,
    database_url: Option<&str>,
) -> Result<Arc<dyn AppointmentRepository>> {
    info!("Using {} storage", storage);

    match storage {
        StorageType::Memory => Ok(Arc::new(MemoryAppointmentRepository::new())),
        StorageType::Postgres => {
            let database_url =
                database_url.ok_or_else(|| eyre!("DATABASE_URL is required for postgres storage"))?;
            let pool = create_pool(database_url).await?;
            schema::initialize_database(&pool).await?;
            Ok(Arc::new(PgAppointmentRepository::new(pool)))
        }
    }
}
