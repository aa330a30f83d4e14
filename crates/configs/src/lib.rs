use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// MongoDB connection settings. `url` and `name` have no usable default and
/// must come from the file or from `MONGO_URL` / `MONGO_DB`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_enterprise_collection")]
    pub enterprise_collection: String,
    #[serde(default = "default_category_collection")]
    pub category_collection: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub seed_categories: bool,
    /// Serve from the in-process store instead of MongoDB.
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            name: String::new(),
            enterprise_collection: default_enterprise_collection(),
            category_collection: default_category_collection(),
            connect_timeout_secs: default_connect_timeout(),
            seed_categories: true,
            in_memory: false,
        }
    }
}

fn default_enterprise_collection() -> String { "Enterprise".into() }
fn default_category_collection() -> String { "Categoria".into() }
fn default_connect_timeout() -> u64 { 10 }
fn default_true() -> bool { true }

/// Load `CONFIG_PATH` (default `config.toml`). A missing file yields defaults
/// so that the environment alone can configure the process.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => parse(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.normalize_with(env_lookup)?;
        self.database.validate()?;
        Ok(())
    }

    /// Fill unset values from `lookup` (the process environment in production).
    pub fn normalize_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.server.normalize(&lookup)?;
        self.database.normalize(&lookup);
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.host.trim().is_empty() {
            self.host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT must be an integer in 1..=65535, got {port}"))?;
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    fn normalize<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.url.trim().is_empty() {
            if let Some(url) = lookup("MONGO_URL") {
                self.url = url;
            }
        }
        if self.name.trim().is_empty() {
            if let Some(name) = lookup("MONGO_DB") {
                self.name = name;
            }
        }
        self.url = self.url.trim().to_string();
        self.name = self.name.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.enterprise_collection.trim().is_empty() || self.category_collection.trim().is_empty() {
            return Err(anyhow!("database collection names must not be empty"));
        }
        if self.in_memory {
            return Ok(());
        }
        if self.url.is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or MONGO_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.url must start with mongodb:// or mongodb+srv://"));
        }
        if self.name.is_empty() {
            return Err(anyhow!("database.name is empty; set it in config.toml or MONGO_DB"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("database.connect_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn parses_full_file() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "mongodb://localhost:27017"
            name = "booking"
            enterprise_collection = "Empresas"
            seed_categories = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.enterprise_collection, "Empresas");
        assert_eq!(cfg.database.category_collection, "Categoria");
        assert!(!cfg.database.seed_categories);
        assert!(cfg.database.validate().is_ok());
    }

    #[test]
    fn env_fills_missing_connection_settings() {
        let mut cfg = AppConfig::default();
        cfg.normalize_with(lookup_from(&[("MONGO_URL", "mongodb://db:27017"), ("MONGO_DB", "booking")]))
            .unwrap();
        assert_eq!(cfg.database.url, "mongodb://db:27017");
        assert_eq!(cfg.database.name, "booking");
        assert!(cfg.database.validate().is_ok());
    }

    #[test]
    fn file_values_take_precedence_over_env() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "mongodb://file:27017".into();
        cfg.normalize_with(lookup_from(&[("MONGO_URL", "mongodb://env:27017")])).unwrap();
        assert_eq!(cfg.database.url, "mongodb://file:27017");
    }

    #[test]
    fn missing_url_or_name_fails_fast() {
        let mut cfg = AppConfig::default();
        cfg.normalize_with(lookup_from(&[("MONGO_DB", "booking")])).unwrap();
        assert!(cfg.database.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.normalize_with(lookup_from(&[("MONGO_URL", "mongodb://db:27017")])).unwrap();
        let err = cfg.database.validate().unwrap_err();
        assert!(err.to_string().contains("database.name"));
    }

    #[test]
    fn rejects_non_mongo_scheme() {
        let mut cfg = DatabaseConfig::default();
        cfg.url = "postgres://localhost/db".into();
        cfg.name = "booking".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn in_memory_skips_connection_checks() {
        let cfg = DatabaseConfig { in_memory: true, ..DatabaseConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn server_port_from_env_and_zero_worker_threads() {
        let mut cfg = AppConfig::default();
        cfg.server.worker_threads = Some(0);
        cfg.normalize_with(lookup_from(&[("SERVER_PORT", "8181")])).unwrap();
        assert_eq!(cfg.server.port, 8181);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8181");

        let mut bad = AppConfig::default();
        assert!(bad.normalize_with(lookup_from(&[("SERVER_PORT", "http")])).is_err());
    }
}
