use crate::engine::{MatchingConfig, RuleTables};
use crate::extract::OcrConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub rules: RuleTables,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

impl DatabaseConfig {
    /// 隐去连接串中的密码，用于日志
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((userinfo, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match userinfo.split_once(':') {
            Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
            None => self.url.clone(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .finish()
    }
}

/// 上传文件的临时目录与大小上限
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_bytes: 20 * 1024 * 1024,
        }
    }
}

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/quote_budget";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            },
            upload: UploadConfig::default(),
            ocr: OcrConfig::default(),
            matching: MatchingConfig::default(),
            rules: RuleTables::default(),
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置 (SERVER_HOST / SERVER_PORT / DATABASE_URL)
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
            },
            ..Self::default()
        }
    }

    /// 分层加载：默认值 -> 可选的 budget.toml -> BUDGET__* 环境变量
    ///
    /// 例如 `BUDGET__MATCHING__THRESHOLD=0.4`、`BUDGET__SERVER__PORT=8080`。
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("budget")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, config::ConfigError> {
        // 只为必填段设默认值；其余段依赖 serde(default)，避免数组被逐元素合并
        let defaults = Self::from_env();
        config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(
                config::Environment::with_prefix("BUDGET")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
