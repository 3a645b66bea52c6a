//! 浏览器会话接口 - 基础设施层
//!
//! 页面层只通过这组原语操作浏览器；每个等待都带显式超时。

use async_trait::async_trait;
use std::time::Duration;

use crate::error::PageResult;

/// 浏览器自动化会话
///
/// 由调用方建立并负责关闭；同一时间只允许一个流程使用。
/// 选择器均为 CSS 选择器。
#[async_trait]
pub trait Session: Send + Sync {
    /// 打开指定 URL
    async fn goto(&self, url: &str) -> PageResult<()>;

    /// 等待元素出现，超时返回 `PageError::Navigation`
    async fn wait_for(&self, selector: &str, timeout: Duration) -> PageResult<()>;

    /// 匹配选择器的元素数量
    async fn count(&self, selector: &str) -> PageResult<usize>;

    async fn click(&self, selector: &str) -> PageResult<()>;

    /// 点击第 `index` 个匹配元素
    async fn click_nth(&self, selector: &str, index: usize) -> PageResult<()>;

    /// 点击第一个文本包含 `needle` 的匹配元素
    async fn click_text(&self, selector: &str, needle: &str) -> PageResult<()>;

    /// 点击表格第 `row` 行第 `column` 个单元格中的链接
    async fn click_cell_link(&self, table: &str, row: usize, column: usize) -> PageResult<()>;

    /// 清空输入框并输入文本
    async fn type_text(&self, selector: &str, text: &str) -> PageResult<()>;

    async fn select_value(&self, selector: &str, value: &str) -> PageResult<()>;

    async fn select_index(&self, selector: &str, index: usize) -> PageResult<()>;

    /// 表格每一行（`tr`）的单元格（`td`）文本，已去除首尾空白
    async fn table_rows(&self, table: &str) -> PageResult<Vec<Vec<String>>>;

    async fn text_of(&self, selector: &str) -> PageResult<String>;

    /// 是否存在文本包含 `needle` 的匹配元素
    async fn has_text(&self, selector: &str, needle: &str) -> PageResult<bool>;

    /// 切换到新弹出的窗口
    async fn switch_to_popup(&self, timeout: Duration) -> PageResult<()>;

    /// 关闭当前弹出窗口并回到上一个窗口
    async fn close_popup(&self) -> PageResult<()>;

    /// 之后出现的 confirm / alert 对话框一律接受
    async fn accept_dialogs(&self) -> PageResult<()>;

    /// 会话是否仍然可用
    async fn is_alive(&self) -> bool;
}
