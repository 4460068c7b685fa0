//! YAML 配置加载器，支持环境变量替换
//!
//! `${VAR}` 与 `${VAR:default}` 占位符在反序列化之前按环境变量替换，
//! 未设置且无默认值的变量替换为空字符串。

use dotenvy::dotenv;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// 替换 YAML 中的环境变量占位符
fn replace_vars(yaml_content: &str) -> String {
    // 忽略 dotenv 加载错误（例如生产环境可能没有 .env 文件）
    let _ = dotenv();

    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Z0-9_]+)(?::([^\}]*))?\}").expect("Invalid regex pattern")
    });

    re.replace_all(yaml_content, |caps: &regex::Captures| {
        let default = caps.get(2).map_or("", |m| m.as_str());
        env::var(&caps[1]).unwrap_or_else(|_| default.to_string())
    })
    .into_owned()
}

/// 从文件加载 YAML 配置
pub fn load_from_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&content)
}

/// 从字符串加载 YAML 配置
pub fn load_from_str<T: DeserializeOwned>(yaml_content: &str) -> Result<T, ConfigError> {
    let replaced = replace_vars(yaml_content);
    Ok(serde_yaml::from_str(&replaced)?)
}

/// 编译时嵌入 YAML 文件
#[macro_export]
macro_rules! include_yaml {
    ($path:expr, $t:ty) => {
        $crate::config::load_from_str::<$t>(include_str!($path))
    };
    ($path:expr) => {
        $crate::config::load_from_str::<$crate::config::AppConfig>(include_str!($path))
    };
}

pub use include_yaml;

/// 应用配置，所有字段均有默认值
///
/// ```yaml
/// locales:
///   dir: ${VERBA_LOCALES:./locales}
///   default: en
/// server:
///   addr: 0.0.0.0:8080
/// log:
///   level: info
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub locales: LocalesConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_from_file(path)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocalesConfig {
    /// 字典目录，文件名（不含扩展名）即语言标签
    pub dir: PathBuf,
    /// 协商失败时使用的语言，未设置时按文件名顺序取第一个
    pub default: Option<String>,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./locales"),
            default: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// 日志配置，对应 `verba-logger` 的 `LoggerConfig`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// 日志级别或 env-filter 指令，如 `info,verba_core=debug`
    pub level: String,
    pub dir: PathBuf,
    pub file_prefix: String,
    pub console: bool,
    pub file: bool,
    pub max_files: Option<i16>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("./logs"),
            file_prefix: "verba.log".to_string(),
            console: true,
            file: false,
            max_files: None,
        }
    }
}
