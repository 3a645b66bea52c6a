//! 错误类型
//!
//! - `PageError`：页面交互失败，区分可重试（导航）与不可重试（业务）两类
//! - `ResolveError`：搜索结果消歧失败
//! - `ConfigError`：配置 / 输入校验失败

use chromiumoxide::error::CdpError;
use thiserror::Error;

use crate::models::Candidate;

/// 页面交互错误
#[derive(Debug, Clone, Error)]
pub enum PageError {
    /// 找不到页面元素或页面未在限定时间内响应（可重试）
    #[error("导航失败: {0}")]
    Navigation(String),
    /// 该实体没有所请求类型的文件
    #[error("没有可购买的文件: {0}")]
    UnavailableDocument(String),
    /// 网站拒绝加入购物车，或加入操作未在限定时间内确认
    #[error("购物车操作失败: {0}")]
    Cart(String),
    /// 浏览器会话被远端终止，后续所有操作都不可能成功
    #[error("浏览器会话已丢失: {0}")]
    SessionLost(String),
}

impl PageError {
    /// 是否属于可在本地重试的瞬时错误
    pub fn is_transient(&self) -> bool {
        matches!(self, PageError::Navigation(_))
    }

    pub fn is_session_lost(&self) -> bool {
        matches!(self, PageError::SessionLost(_))
    }

    pub fn navigation(what: impl Into<String>) -> Self {
        PageError::Navigation(what.into())
    }
}

impl From<CdpError> for PageError {
    fn from(err: CdpError) -> Self {
        match err {
            CdpError::Ws(_) | CdpError::ChannelSendError(_) => {
                PageError::SessionLost(err.to_string())
            }
            other => PageError::Navigation(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Navigation(format!("页面返回数据无法解析: {}", err))
    }
}

/// 页面操作结果类型
pub type PageResult<T> = Result<T, PageError>;

/// 搜索结果消歧失败
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("没有找到匹配的公司")]
    NotFound,
    #[error("存在 {} 个候选公司，无法自动确定", .0.len())]
    Ambiguous(Vec<Candidate>),
    #[error("公司 {} ({}) 已不再存续", .0.name, .0.registry_number)]
    Dissolved(Candidate),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("未知的文件类型 '{name}'，可选: {known}")]
    UnknownDocumentType { name: String, known: String },
    #[error("购买数量必须大于 0")]
    InvalidQuantity,
    #[error("批次大小必须大于 0")]
    InvalidBatchSize,
    #[error("标识符不能为空 (第 {line} 行)")]
    EmptyIdentifier { line: usize },
    #[error("文件类型匹配规则无效: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("缺少登录凭据，请设置 ICRIS_USERNAME / ICRIS_PASSWORD")]
    MissingCredentials,
    #[error("无法读取配置文件 {path}: {reason}")]
    ConfigFileUnreadable { path: String, reason: String },
    #[error("TOML 配置解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
