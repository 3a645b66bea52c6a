//! # ICRIS Automation
//!
//! 在香港公司注册处网上查册中心（ICRIS）批量查找公司并把文件加入购物车
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有浏览器资源，只暴露 `Session` 原语
//! - `ChromeSession` - 基于 chromiumoxide 的会话实现
//!
//! ### ② 页面层（Pages）
//! - `pages/` - 每个网站画面一个类型，只暴露该画面上有效的操作
//! - `Registry` - 记录当前画面，实现 `Navigator`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个标识符"的完整处理流程
//! - `PurchaseFlow` - 状态机（搜索 → 消歧 → 选择文件 → 加入购物车）与有限重试
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_driver` - 顺序处理一批标识符
//! - `orchestrator/app` - 会话生命周期、分批、结账与收尾
//!
//! `report` 把结果整理成表格，`browser` 负责建立并登录会话。
//!
//! ## 模块结构

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod pages;
pub mod report;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ConfigError, PageError, PageResult, ResolveError};
pub use infrastructure::{ChromeSession, Session};
pub use models::{Identifier, Outcome, OutcomeKind, RequestSpec, StatusRecord};
pub use orchestrator::{App, BatchDriver, BatchRun, RunOptions};
pub use pages::{CartCheckout, Navigator, Registry};
pub use report::Report;
pub use workflow::{IdentifierCtx, PurchaseFlow, RetryPolicy};
