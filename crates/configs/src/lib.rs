use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub cache: CacheConfig,
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

/// Backing table settings: file name, data directory, deployment region label.
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub region: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { name: String::new(), data_dir: default_data_dir(), region: String::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: false, capacity: default_cache_capacity(), ttl_secs: default_cache_ttl() }
    }
}

fn default_data_dir() -> String { "data".to_string() }
fn default_cache_capacity() -> u64 { 10_000 }
fn default_cache_ttl() -> u64 { 60 }

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load from `CONFIG_PATH`/`config.toml`, then normalize and validate.
    /// A missing file falls back to defaults plus env vars; a malformed file
    /// is an error.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.table.normalize_from_env();
        self.table.validate()?;
        self.cache.normalize_from_env();
        self.cache.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow!("SERVER_PORT must be a valid port number"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl TableConfig {
    /// Fill missing fields from env vars when the TOML omits them.
    pub fn normalize_from_env(&mut self) {
        if self.name.trim().is_empty() {
            if let Ok(name) = std::env::var("TABLE_NAME") {
                self.name = name;
            }
        }
        if self.region.trim().is_empty() {
            if let Ok(region) = std::env::var("TABLE_REGION") {
                self.region = region;
            }
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = dir;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("table.name is empty; set it in config.toml or the TABLE_NAME env var"));
        }
        if self.name.contains('/') || self.name.contains("..") {
            return Err(anyhow!("table.name must be a plain file stem, not a path"));
        }
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("table.data_dir is empty"));
        }
        Ok(())
    }
}

impl CacheConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(v) = std::env::var("USE_CACHE") {
            self.enabled = v == "true" || v == "1";
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.capacity == 0 {
            return Err(anyhow!("cache.capacity must be >= 1 when the cache is enabled"));
        }
        Ok(())
    }
}
