use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use tokio_postgres::config::{Host, SslMode};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub request_timeout: Duration,
    /// `None` selects the in-memory cake store
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: Option<String>,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let environment = match lookup("ENV").unwrap_or_else(|| "local".to_string()).as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Local,
        };

        let request_timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a valid number of seconds")?;

        let database = DatabaseConfig::from_lookup(&lookup)?;

        let config = Config {
            port,
            environment,
            request_timeout: Duration::from_secs(request_timeout_secs),
            database,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        if let Some(ref database) = self.database {
            database.validate()?;
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Returns `Ok(None)` when neither DATABASE_URL nor DATABASE_NAME is set.
    pub fn from_lookup<F>(lookup: &F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(connection_string) = lookup("DATABASE_URL") {
            let (max_connections, connection_timeout) = pool_settings(lookup)?;
            return Self::from_connection_string(&connection_string, max_connections, connection_timeout)
                .map(Some);
        }

        let Some(database) = lookup("DATABASE_NAME") else {
            return Ok(None);
        };

        let host = lookup("DATABASE_HOST").unwrap_or_else(|| "localhost".to_string());

        let port = lookup("DATABASE_PORT")
            .unwrap_or_else(|| "5432".to_string())
            .parse::<u16>()
            .context("DATABASE_PORT must be a valid port number")?;

        let username = lookup("DATABASE_USERNAME")
            .context("DATABASE_USERNAME environment variable is required when DATABASE_NAME is set")?;

        let password = lookup("DATABASE_PASSWORD")
            .context("DATABASE_PASSWORD environment variable is required when DATABASE_NAME is set")?;

        let ssl_mode = lookup("DATABASE_SSL_MODE").unwrap_or_else(|| "prefer".to_string());

        let (max_connections, connection_timeout) = pool_settings(lookup)?;

        Ok(Some(DatabaseConfig {
            host,
            port,
            database,
            username,
            password: Some(password),
            ssl_mode,
            max_connections,
            connection_timeout,
        }))
    }

    /// Parse a libpq-style connection string, URL (`postgres://user:pw@host:port/db?sslmode=require`)
    /// or `key=value` form, with the same parser the connection pool uses.
    pub fn from_connection_string(
        connection_string: &str,
        max_connections: u32,
        connection_timeout: Duration,
    ) -> Result<Self> {
        let parsed = connection_string
            .parse::<tokio_postgres::Config>()
            .context("DATABASE_URL is not a valid PostgreSQL connection string")?;

        let username = parsed
            .get_user()
            .context("DATABASE_URL must include a user name")?
            .to_string();

        let host = match parsed.get_hosts().first() {
            Some(Host::Tcp(host)) => host.clone(),
            #[cfg(unix)]
            Some(Host::Unix(path)) => path.to_string_lossy().into_owned(),
            None => "localhost".to_string(),
        };

        let port = parsed.get_ports().first().copied().unwrap_or(5432);

        // libpq falls back to the user name when no database is given
        let database = parsed.get_dbname().unwrap_or(username.as_str()).to_string();

        let password = parsed
            .get_password()
            .map(|password| String::from_utf8_lossy(password).into_owned());

        let ssl_mode = match parsed.get_ssl_mode() {
            SslMode::Disable => "disable",
            SslMode::Require => "require",
            _ => "prefer",
        }
        .to_string();

        Ok(DatabaseConfig {
            host,
            port,
            database,
            username,
            password,
            ssl_mode,
            max_connections,
            connection_timeout,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("Database host cannot be empty");
        }

        if self.port == 0 {
            anyhow::bail!("Database port must be greater than 0");
        }

        if self.database.trim().is_empty() {
            anyhow::bail!("Database name cannot be empty");
        }

        if self.username.trim().is_empty() {
            anyhow::bail!("Database username cannot be empty");
        }

        // tokio-postgres understands no other modes
        match self.ssl_mode.as_str() {
            "disable" | "prefer" | "require" => {}
            _ => anyhow::bail!("Invalid SSL mode. Must be one of: disable, prefer, require"),
        }

        if self.max_connections == 0 {
            anyhow::bail!("Max connections must be greater than 0");
        }

        if self.connection_timeout.is_zero() {
            anyhow::bail!("Connection timeout must be greater than 0");
        }

        Ok(())
    }
}

/// Pool size and connection timeout; only read once a database is configured.
fn pool_settings<F>(lookup: &F) -> Result<(u32, Duration)>
where
    F: Fn(&str) -> Option<String>,
{
    let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
        .unwrap_or_else(|| "10".to_string())
        .parse::<u32>()
        .context("DATABASE_MAX_CONNECTIONS must be a valid number")?;

    let connection_timeout_secs = lookup("DATABASE_CONNECTION_TIMEOUT")
        .unwrap_or_else(|| "30".to_string())
        .parse::<u64>()
        .context("DATABASE_CONNECTION_TIMEOUT must be a valid number of seconds")?;

    Ok((max_connections, Duration::from_secs(connection_timeout_secs)))
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Environment::Local)
    }
}
