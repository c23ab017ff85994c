/// Postgres plumbing for TaskFlow
///
/// # Modules
///
/// - `pool`: connection pool creation, health check and shutdown
/// - `migrations`: embedded schema migrations
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::db::{migrations::run_migrations, pool::{create_pool, PoolConfig}};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(PoolConfig::new(std::env::var("DATABASE_URL")?)).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod migrations;
pub mod pool;
