//! Connectivity probes for `/health` and `meteohidro check`

use sqlx::PgConnection;

use super::{DbError, PoolManager};

/// Check out a connection and run `SELECT 1`.
pub async fn ping(pool: &PoolManager) -> Result<(), DbError> {
    let mut conn = pool.acquire().await?;
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&mut *conn)
        .await?;
    pool.release(conn);
    Ok(())
}

/// The search path in effect on this session.
pub async fn current_search_path(conn: &mut PgConnection) -> Result<String, DbError> {
    let path = sqlx::query_scalar::<_, String>("SELECT current_setting('search_path')")
        .fetch_one(conn)
        .await?;
    Ok(path)
}

/// Server version string, e.g. `16.2`.
pub async fn server_version(conn: &mut PgConnection) -> Result<String, DbError> {
    let version = sqlx::query_scalar::<_, String>("SELECT current_setting('server_version')")
        .fetch_one(conn)
        .await?;
    Ok(version)
}
