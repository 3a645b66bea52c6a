use serde::Serialize;
use std::fmt::Display;

use crate::error::ConfigError;

/// 标识符类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// 公司名称
    Name,
    /// 公司注册编号（CR No.），只包含数字
    RegistryNumber,
}

/// 公司标识符：已登记的公司名称或公司注册编号
///
/// 读入后不可修改；构造时去掉首尾空白。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// 解析单个标识符，空白字符串视为无效
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Self::parse_line(raw, 1)
    }

    pub(crate) fn parse_line(raw: &str, line: usize) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyIdentifier { line });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 纯数字按注册编号搜索，其余按名称搜索
    pub fn kind(&self) -> IdentifierKind {
        if self.0.chars().all(|c| c.is_ascii_digit()) {
            IdentifierKind::RegistryNumber
        } else {
            IdentifierKind::Name
        }
    }

    /// 用于匹配的规范形式（大小写折叠）
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// 名称精确匹配（忽略大小写与首尾空白）
    pub fn matches_name(&self, name: &str) -> bool {
        self.normalized() == name.trim().to_lowercase()
    }

    /// 注册编号精确匹配
    pub fn matches_number(&self, registry_number: &str) -> bool {
        self.0 == registry_number.trim()
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
