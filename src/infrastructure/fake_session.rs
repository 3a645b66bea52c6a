//! 测试用的脚本化会话：元素、表格与文本都是静态配置

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{PageError, PageResult};
use crate::infrastructure::Session;

#[derive(Default)]
struct FakeState {
    present: HashSet<String>,
    counts: HashMap<String, usize>,
    tables: HashMap<String, Vec<Vec<String>>>,
    texts: HashMap<String, String>,
    popup_opens: bool,
    popup_depth: usize,
    lost: bool,
    actions: Vec<String>,
}

#[derive(Default)]
pub struct FakeSession {
    state: Mutex<FakeState>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(self, selector: &str) -> Self {
        self.state.lock().unwrap().present.insert(selector.to_string());
        self
    }

    pub fn with_count(self, selector: &str, count: usize) -> Self {
        self.state
            .lock()
            .unwrap()
            .counts
            .insert(selector.to_string(), count);
        self
    }

    pub fn with_table(self, selector: &str, rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect();
        {
            let mut state = self.state.lock().unwrap();
            state.present.insert(selector.to_string());
            state.tables.insert(selector.to_string(), rows);
        }
        self
    }

    pub fn with_text(self, selector: &str, text: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.present.insert(selector.to_string());
            state.texts.insert(selector.to_string(), text.to_string());
        }
        self
    }

    pub fn with_popups(self) -> Self {
        self.state.lock().unwrap().popup_opens = true;
        self
    }

    pub fn lost(self) -> Self {
        self.state.lock().unwrap().lost = true;
        self
    }

    /// 已执行的交互动作，例如 `click:<selector>`
    pub fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    fn record(&self, action: String) -> PageResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.lost {
            return Err(PageError::SessionLost("fake session closed".into()));
        }
        state.actions.push(action);
        Ok(())
    }

    fn is_present(&self, selector: &str) -> bool {
        let state = self.state.lock().unwrap();
        // 逗号分隔的选择器任一存在即可
        selector
            .split(',')
            .map(str::trim)
            .any(|s| state.present.contains(s) || state.counts.get(s).copied().unwrap_or(0) > 0)
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn goto(&self, url: &str) -> PageResult<()> {
        self.record(format!("goto:{}", url))
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> PageResult<()> {
        self.record(format!("wait:{}", selector))?;
        if self.is_present(selector) {
            Ok(())
        } else {
            Err(PageError::Navigation(format!("等待元素 {} 超时", selector)))
        }
    }

    async fn count(&self, selector: &str) -> PageResult<usize> {
        let state = self.state.lock().unwrap();
        if let Some(n) = state.counts.get(selector) {
            return Ok(*n);
        }
        Ok(usize::from(state.present.contains(selector)))
    }

    async fn click(&self, selector: &str) -> PageResult<()> {
        if !self.is_present(selector) {
            return Err(PageError::Navigation(format!("找不到元素: {}", selector)));
        }
        self.record(format!("click:{}", selector))
    }

    async fn click_nth(&self, selector: &str, index: usize) -> PageResult<()> {
        self.record(format!("click_nth:{}:{}", selector, index))
    }

    async fn click_text(&self, selector: &str, needle: &str) -> PageResult<()> {
        self.record(format!("click_text:{}:{}", selector, needle))
    }

    async fn click_cell_link(&self, table: &str, row: usize, column: usize) -> PageResult<()> {
        self.record(format!("click_cell:{}:{}:{}", table, row, column))
    }

    async fn type_text(&self, selector: &str, text: &str) -> PageResult<()> {
        self.record(format!("type:{}:{}", selector, text))
    }

    async fn select_value(&self, selector: &str, value: &str) -> PageResult<()> {
        self.record(format!("select:{}:{}", selector, value))
    }

    async fn select_index(&self, selector: &str, index: usize) -> PageResult<()> {
        self.record(format!("select_index:{}:{}", selector, index))
    }

    async fn table_rows(&self, table: &str) -> PageResult<Vec<Vec<String>>> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .ok_or_else(|| PageError::Navigation(format!("找不到表格: {}", table)))
    }

    async fn text_of(&self, selector: &str) -> PageResult<String> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .texts
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn has_text(&self, selector: &str, needle: &str) -> PageResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .texts
            .get(selector)
            .map(|t| t.contains(needle))
            .unwrap_or(false))
    }

    async fn switch_to_popup(&self, _timeout: Duration) -> PageResult<()> {
        self.record("popup:open".to_string())?;
        let mut state = self.state.lock().unwrap();
        if state.popup_opens {
            state.popup_depth += 1;
            Ok(())
        } else {
            Err(PageError::Navigation("弹出窗口未出现".into()))
        }
    }

    async fn close_popup(&self) -> PageResult<()> {
        self.record("popup:close".to_string())?;
        let mut state = self.state.lock().unwrap();
        state.popup_depth = state.popup_depth.saturating_sub(1);
        Ok(())
    }

    async fn accept_dialogs(&self) -> PageResult<()> {
        self.record("accept_dialogs".to_string())
    }

    async fn is_alive(&self) -> bool {
        !self.state.lock().unwrap().lost
    }
}
