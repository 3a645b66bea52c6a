//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用生命周期
//! - 建立会话（启动或连接浏览器并登录）
//! - 把全部标识符交给 `BatchDriver`
//! - 清空购物车、登出
//! - 输出报告（文本、JSON、Excel）并关闭浏览器
//!
//! ### `batch_driver` - 批量驱动器
//! - 在一个会话上顺序处理标识符，按 `batch_size` 分批
//! - 每批之后可选结账（`CartCheckout`）
//! - 每个标识符一条 `StatusRecord`，顺序与输入一致
//! - 会话丢失时放弃其余标识符
//!
//! ## 层次关系
//!
//! ```text
//! app (分批、结账、收尾)
//!     ↓
//! batch_driver (处理 Vec<Identifier>)
//!     ↓
//! workflow::PurchaseFlow (处理单个 Identifier)
//!     ↓
//! pages (Navigator / Registry)
//!     ↓
//! infrastructure (Session)
//! ```

pub mod app;
pub mod batch_driver;

pub use app::{write_outputs, App, RunOptions};
pub use batch_driver::{abandon, BatchDriver, BatchRun};
