use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::pages::Timeouts;
use crate::workflow::RetryPolicy;

/// 程序配置
///
/// 优先级（低到高）：默认值 → TOML 文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 公司注册处入口 URL
    pub registry_url: String,
    /// 连接已打开浏览器的调试端口，未设置时自行启动浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件，未设置时由 chromiumoxide 自动查找
    pub chrome_executable: Option<PathBuf>,
    /// 自行启动浏览器时是否无头
    pub headless: bool,
    /// 普通页面等待上限（秒）
    pub page_timeout_secs: u64,
    /// 搜索结果等待上限（秒）
    pub result_timeout_secs: u64,
    /// 瞬时错误的最大重试次数
    pub max_retries: u32,
    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,
    /// 每批处理的标识符数量，也是每次结账勾选的文件数
    pub batch_size: usize,
    pub username: String,
    pub password: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: "https://www.icris.cr.gov.hk/csci/".to_string(),
            browser_debug_port: None,
            chrome_executable: None,
            headless: true,
            page_timeout_secs: 30,
            result_timeout_secs: 5,
            max_retries: 2,
            retry_delay_ms: 500,
            batch_size: 10,
            username: String::new(),
            password: String::new(),
            output_log_file: "icris_output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 读取配置文件（可选），再叠加环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::ConfigFileUnreadable {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Self::from_toml_str(&content, &path.display().to_string())?
            }
            None => Self::default(),
        };
        Ok(base.with_env())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })
    }

    /// 用环境变量覆盖已有的值
    pub fn with_env(self) -> Self {
        Self {
            registry_url: std::env::var("ICRIS_URL").unwrap_or(self.registry_url),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).or(self.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from).or(self.chrome_executable),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.headless),
            page_timeout_secs: std::env::var("PAGE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.page_timeout_secs),
            result_timeout_secs: std::env::var("RESULT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.result_timeout_secs),
            max_retries: std::env::var("MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_retries),
            retry_delay_ms: std::env::var("RETRY_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.retry_delay_ms),
            batch_size: std::env::var("BATCH_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.batch_size),
            username: std::env::var("ICRIS_USERNAME").unwrap_or(self.username),
            password: std::env::var("ICRIS_PASSWORD").unwrap_or(self.password),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        Ok(())
    }

    /// 登录需要凭据；连接到已登录的浏览器时不需要
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok((self.username.trim(), &self.password))
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            page: Duration::from_secs(self.page_timeout_secs),
            results: Duration::from_secs(self.result_timeout_secs),
            popup: Duration::from_secs(self.page_timeout_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
