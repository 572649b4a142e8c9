use std::env;
use std::path::PathBuf;

use url::Url;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://cart.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub page: Option<PathBuf>,
    pub log_level: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let config = Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            page: env::var("CART_PAGE").ok().map(PathBuf::from),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(
        mut self,
        database_url: Option<String>,
        page: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if page.is_some() {
            self.page = page;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL is not set"));
        }

        let url = Url::parse(&self.database_url)
            .map_err(|e| anyhow::anyhow!("DATABASE_URL is not a valid URL: {}", e))?;
        if url.scheme() != "sqlite" {
            return Err(anyhow::anyhow!("DATABASE_URL must start with 'sqlite:'"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(database_url: &str) -> Config {
        Config {
            database_url: database_url.to_string(),
            page: None,
            log_level: "info".to_string(),
            environment: "test".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_sqlite_urls() {
        assert!(config("sqlite://cart.db").validate().is_ok());
        assert!(config("sqlite::memory:").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        assert!(config("postgres://localhost/cart").validate().is_err());
        assert!(config("").validate().is_err());
        assert!(config("cart.db").validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let overridden = config("sqlite://cart.db")
            .with_overrides(
                Some("sqlite::memory:".to_string()),
                Some(PathBuf::from("index.html")),
            )
            .unwrap();

        assert_eq!(overridden.database_url, "sqlite::memory:");
        assert_eq!(overridden.page, Some(PathBuf::from("index.html")));
    }
}
