pub mod entities;
mod store;

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub use store::SeaOrmStore;

/// Connect to the database and return a SeaORM [`DatabaseConnection`].
pub async fn connect(db_url: &str, max_connections: u32) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(db_url.to_owned());
    opts.max_connections(max_connections).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    log::info!("connected to database with up to {max_connections} connections");
    Ok(db)
}
