//! 标识符处理上下文
//!
//! 封装"我正在处理第几个标识符"这一信息，只用于日志

use std::fmt::Display;

use crate::models::Identifier;

#[derive(Debug, Clone)]
pub struct IdentifierCtx {
    pub identifier: Identifier,

    /// 在整个批次中的序号（从1开始）
    pub index: usize,

    /// 批次中的标识符总数
    pub total: usize,
}

impl IdentifierCtx {
    pub fn new(identifier: Identifier, index: usize, total: usize) -> Self {
        Self {
            identifier,
            index,
            total,
        }
    }
}

impl Display for IdentifierCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{} {}]", self.index, self.total, self.identifier)
    }
}
