use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
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
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub key: String,
}

/// Fallback admin secret for local development. Startup warns when it is in
/// effect; set `ADMIN_KEY` (or `[admin].key`) to replace it.
pub const DEV_ADMIN_KEY: &str = "dev-admin-change-me";

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_counters_path")]
    pub counters_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { counters_path: default_counters_path() }
    }
}

fn default_counters_path() -> String {
    "data/counters.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeepaliveConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_keepalive_interval")]
    pub interval_secs: u64,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self { url: None, interval_secs: default_keepalive_interval() }
    }
}

fn default_keepalive_interval() -> u64 {
    300
}

/// One catalog entry: a registration program and its capacity limit.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProgramEntry {
    pub id: String,
    pub limit: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Built-in catalog used when the config file provides no `[[programs]]`.
pub fn default_programs() -> Vec<ProgramEntry> {
    vec![
        ProgramEntry { id: "week1".into(), limit: 5, name: Some("Week 1".into()) },
        ProgramEntry { id: "week2".into(), limit: 24, name: Some("Week 2".into()) },
        ProgramEntry { id: "summerA".into(), limit: 18, name: Some("Summer Session A".into()) },
    ]
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) and apply env overrides. A
    /// missing file is not an error: defaults apply and the environment still
    /// wins for the values it provides.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env()?;
        self.admin.normalize_from_env();
        self.storage.normalize();
        self.keepalive.normalize_from_env()?;
        if self.programs.is_empty() {
            self.programs = default_programs();
        }
        for p in &self.programs {
            if p.id.trim().is_empty() {
                return Err(anyhow!("programs entries must have a non-empty id"));
            }
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        // SERVER_PORT takes precedence, then the PaaS-style bare PORT.
        let env_port = std::env::var("SERVER_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|p| p.parse::<u16>().ok());
        if let Some(p) = env_port {
            self.port = p;
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        Ok(())
    }
}

impl AdminConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(key) = std::env::var("ADMIN_KEY") {
            if !key.trim().is_empty() {
                self.key = key;
            }
        }
        if self.key.trim().is_empty() {
            self.key = DEV_ADMIN_KEY.to_string();
        }
    }

    /// True when the development fallback secret is in effect.
    pub fn is_dev_key(&self) -> bool {
        self.key == DEV_ADMIN_KEY
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if let Ok(path) = std::env::var("COUNTERS_PATH") {
            if !path.trim().is_empty() {
                self.counters_path = path;
            }
        }
        if self.counters_path.trim().is_empty() {
            self.counters_path = default_counters_path();
        }
    }
}

impl KeepaliveConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("KEEPALIVE_URL") {
            if !url.trim().is_empty() {
                self.url = Some(url);
            }
        }
        if self.interval_secs == 0 {
            return Err(anyhow!("keepalive.interval_secs must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_builtin_catalog() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().expect("defaults validate");
        let ids: Vec<&str> = cfg.programs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["week1", "week2", "summerA"]);
        assert_eq!(cfg.programs[0].limit, 5);
        assert_eq!(cfg.programs[1].limit, 24);
        assert_eq!(cfg.programs[2].limit, 18);
        assert_eq!(cfg.storage.counters_path, "data/counters.json");
    }

    #[test]
    fn parses_programs_from_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [[programs]]
            id = "spring"
            limit = 12
            name = "Spring Camp"

            [[programs]]
            id = "fall"
            limit = 3
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.programs.len(), 2);
        assert_eq!(cfg.programs[0].name.as_deref(), Some("Spring Camp"));
        assert_eq!(cfg.programs[1].name, None);
        assert_eq!(cfg.programs[1].limit, 3);
    }

    #[test]
    fn rejects_blank_program_id() {
        let mut cfg = AppConfig::default();
        cfg.programs = vec![ProgramEntry { id: "  ".into(), limit: 1, name: None }];
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_zero_keepalive_interval() {
        let mut cfg = AppConfig::default();
        cfg.keepalive.interval_secs = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }
}
