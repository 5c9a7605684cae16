use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Object, Pool, PoolConfig, RecyclingMethod, Runtime, SslMode, Timeouts};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::Row;
use tracing::{debug, error, info, warn};

use crate::{
    config::DatabaseConfig,
    error::{ApiError, ApiResult},
    models::{CakeResponse, CakesResponse, CreateCakeRequest, UpdateCakeRequest},
    service::CakeService,
};

const CAKE_COLUMNS: &str = "id, title, description";

/// Cake store backed by a deadpool-managed PostgreSQL pool.
#[derive(Clone)]
pub struct PostgresCakeService {
    pool: Pool,
}

impl PostgresCakeService {
    /// Build the pool and check that it can hand out a working connection.
    pub async fn connect(config: DatabaseConfig) -> ApiResult<Self> {
        info!("Creating PostgreSQL connection pool for host: {}:{}", config.host, config.port);

        let pool = Self::create_pool(config)?;

        let service = PostgresCakeService { pool };
        service.test_connection().await?;

        Ok(service)
    }

    fn create_pool(config: DatabaseConfig) -> ApiResult<Pool> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = config.password;

        pg_config.ssl_mode = Some(ssl_mode_for(&config.ssl_mode));

        pg_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts = Timeouts {
            wait: Some(config.connection_timeout),
            create: Some(config.connection_timeout),
            recycle: Some(config.connection_timeout),
        };
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::Database(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::Database(format!("Connection pool creation failed: {}", e))
        })
    }

    async fn get_connection(&self) -> ApiResult<Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    async fn test_connection(&self) -> ApiResult<()> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database connection test failed: {}", e);
            ApiError::Database(format!("Connection test failed: {}", e))
        })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// Create the `cakes` table if it does not exist yet.
    pub async fn migrate(&self) -> ApiResult<()> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let cakes_table = r#"
            CREATE TABLE IF NOT EXISTS cakes (
                id BIGSERIAL PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(cakes_table, &[]).await.map_err(|e| {
            error!("Failed to create cakes table: {}", e);
            ApiError::Database(format!("Cakes table creation failed: {}", e))
        })?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

fn ssl_mode_for(mode: &str) -> SslMode {
    match mode {
        "disable" => SslMode::Disable,
        "prefer" => SslMode::Prefer,
        "require" => SslMode::Require,
        other => {
            warn!("Unknown SSL mode '{}', defaulting to 'require'", other);
            SslMode::Require
        }
    }
}

fn cake_from_row(row: &Row) -> CakeResponse {
    CakeResponse {
        id: row.get(0),
        title: row.get(1),
        description: row.get(2),
    }
}

#[async_trait]
impl CakeService for PostgresCakeService {
    async fn get_cakes(&self) -> ApiResult<CakesResponse> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {} FROM cakes ORDER BY id", CAKE_COLUMNS);

        let rows = client.query(query.as_str(), &[]).await.map_err(ApiError::from)?;

        Ok(CakesResponse::new(rows.iter().map(cake_from_row).collect()))
    }

    async fn get_cake_by_id(&self, id: i64) -> ApiResult<CakeResponse> {
        let client = self.get_connection().await?;
        let query = format!("SELECT {} FROM cakes WHERE id = $1", CAKE_COLUMNS);

        let row = client.query_opt(query.as_str(), &[&id]).await.map_err(ApiError::from)?;

        row.as_ref()
            .map(cake_from_row)
            .ok_or_else(|| ApiError::cake_not_found(id))
    }

    async fn create_cake(&self, request: CreateCakeRequest) -> ApiResult<CakeResponse> {
        let request = request.normalized();
        let client = self.get_connection().await?;

        let query = format!(
            "INSERT INTO cakes (title, description) VALUES ($1, $2) RETURNING {}",
            CAKE_COLUMNS
        );

        let row = client
            .query_one(query.as_str(), &[&request.title, &request.description])
            .await
            .map_err(ApiError::from)?;

        let cake = cake_from_row(&row);
        info!("Created cake with id: {}", cake.id);
        Ok(cake)
    }

    async fn update_cake(&self, id: i64, request: UpdateCakeRequest) -> ApiResult<CakeResponse> {
        let request = request.normalized();
        let client = self.get_connection().await?;

        let query = format!(
            "UPDATE cakes SET title = $1, description = $2, updated_at = NOW() WHERE id = $3 RETURNING {}",
            CAKE_COLUMNS
        );

        let row = client
            .query_opt(query.as_str(), &[&request.title, &request.description, &id])
            .await
            .map_err(ApiError::from)?;

        match row {
            Some(row) => {
                info!("Updated cake with id: {}", id);
                Ok(cake_from_row(&row))
            }
            None => Err(ApiError::cake_not_found(id)),
        }
    }

    async fn delete_cake(&self, id: i64) -> ApiResult<()> {
        let client = self.get_connection().await?;

        let rows_affected = client
            .execute("DELETE FROM cakes WHERE id = $1", &[&id])
            .await
            .map_err(ApiError::from)?;

        if rows_affected == 0 {
            info!("Cake with id {} already absent, nothing to delete", id);
        } else {
            info!("Deleted cake with id: {}", id);
        }
        Ok(())
    }

    async fn health_check(&self) -> ApiResult<()> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database health check failed: {}", e);
            ApiError::Database(format!("Health check failed: {}", e))
        })?;

        debug!("Database health check successful");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssl_mode_mapping() {
        assert!(matches!(ssl_mode_for("disable"), SslMode::Disable));
        assert!(matches!(ssl_mode_for("prefer"), SslMode::Prefer));
        assert!(matches!(ssl_mode_for("require"), SslMode::Require));
        assert!(matches!(ssl_mode_for("bogus"), SslMode::Require));
    }

    #[test]
    fn test_create_pool_does_not_connect_eagerly() {
        let config = DatabaseConfig::from_connection_string(
            "postgres://baker:pw@127.0.0.1:1/cakes?sslmode=disable",
            2,
            std::time::Duration::from_secs(1),
        )
        .unwrap();

        let pool = PostgresCakeService::create_pool(config).unwrap();
        assert_eq!(pool.status().max_size, 2);
    }

    #[test]
    fn test_create_pool_from_url_without_password() {
        let config = DatabaseConfig::from_connection_string(
            "postgresql://baker@[::1]:5433/cakes?sslmode=require",
            3,
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        config.validate().unwrap();

        let pool = PostgresCakeService::create_pool(config).unwrap();
        assert_eq!(pool.status().max_size, 3);
    }
}
