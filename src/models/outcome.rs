//! 单个标识符的处理结果
//!
//! `Outcome` 记录后不再修改；`StatusRecord` 是最终报告中的一行。

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Display;

use crate::models::{Candidate, Identifier};

/// 流程阶段（仅涉及会话交互的阶段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Searching,
    Picking,
    AddingToCart,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Searching => "搜索",
            Stage::Picking => "选择文件",
            Stage::AddingToCart => "加入购物车",
        };
        f.write_str(name)
    }
}

/// 购物车引用：已加入购物车的文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartReference {
    pub registry_number: String,
    /// 每份已加入的文件，非空
    pub items: Vec<String>,
    pub requested: u32,
}

impl CartReference {
    pub fn carted(&self) -> usize {
        self.items.len()
    }
}

impl Display for CartReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.registry_number, self.items.join(";"))
    }
}

/// 失败原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    /// 瞬时错误重试耗尽
    Transient {
        stage: Stage,
        attempts: u32,
        last_error: String,
    },
    UnavailableDocument(String),
    Cart(String),
    /// 精确匹配的公司已不再存续
    Dissolved { registry_number: String, name: String },
    SessionLost,
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Transient {
                stage,
                attempts,
                last_error,
            } => write!(f, "{}阶段尝试 {} 次仍失败: {}", stage, attempts, last_error),
            FailureReason::UnavailableDocument(msg) => write!(f, "没有可购买的文件: {}", msg),
            FailureReason::Cart(msg) => write!(f, "购物车操作失败: {}", msg),
            FailureReason::Dissolved {
                registry_number,
                name,
            } => write!(f, "公司 {} ({}) 已不再存续", name, registry_number),
            FailureReason::SessionLost => write!(f, "浏览器会话已丢失，未处理"),
        }
    }
}

/// 结果类别（报告中的 outcome 列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeKind {
    Success,
    Ambiguous,
    NotFound,
    Failed,
}

impl Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutcomeKind::Success => "Success",
            OutcomeKind::Ambiguous => "Ambiguous",
            OutcomeKind::NotFound => "NotFound",
            OutcomeKind::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// 单个标识符的最终结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success {
        registry_number: String,
        cart_reference: CartReference,
    },
    Ambiguous {
        candidates: Vec<Candidate>,
    },
    NotFound,
    Failed(FailureReason),
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success { .. } => OutcomeKind::Success,
            Outcome::Ambiguous { .. } => OutcomeKind::Ambiguous,
            Outcome::NotFound => OutcomeKind::NotFound,
            Outcome::Failed(_) => OutcomeKind::Failed,
        }
    }

    pub fn is_session_lost(&self) -> bool {
        matches!(self, Outcome::Failed(FailureReason::SessionLost))
    }

    /// 给调用方看的说明文字
    pub fn detail(&self) -> String {
        match self {
            Outcome::Success { cart_reference, .. } => {
                let carted = cart_reference.carted();
                if carted < cart_reference.requested as usize {
                    format!(
                        "已加入购物车 {}/{} 份（可用文件不足）: {}",
                        carted, cart_reference.requested, cart_reference
                    )
                } else {
                    format!("已加入购物车 {} 份: {}", carted, cart_reference)
                }
            }
            Outcome::Ambiguous { candidates } => {
                let names = candidates
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ");
                format!("{} 个候选: {}", candidates.len(), names)
            }
            Outcome::NotFound => "登记册中没有匹配记录".to_string(),
            Outcome::Failed(reason) => reason.to_string(),
        }
    }
}

/// 报告中的一行
#[derive(Debug, Clone)]
pub struct StatusRecord {
    pub identifier: Identifier,
    pub outcome: Outcome,
    pub timestamp: DateTime<Local>,
}

impl StatusRecord {
    pub fn new(identifier: Identifier, outcome: Outcome) -> Self {
        Self {
            identifier,
            outcome,
            timestamp: Local::now(),
        }
    }

    /// 会话丢失后未处理的标识符
    pub fn session_lost(identifier: Identifier) -> Self {
        Self::new(identifier, Outcome::Failed(FailureReason::SessionLost))
    }
}
