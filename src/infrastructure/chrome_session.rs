//! Chrome 会话 - 基础设施层
//!
//! 持有浏览器与窗口栈，只暴露 `Session` 原语；不认识任何网站页面。

use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::error::{PageError, PageResult};
use crate::infrastructure::Session;

/// 基于 chromiumoxide 的会话实现
///
/// 窗口栈的最后一个元素是当前活动窗口，栈底窗口永远不会被关闭。
pub struct ChromeSession {
    browser: Browser,
    windows: Mutex<Vec<Page>>,
    /// 通过 `launch` 启动的浏览器由本进程关闭，连接到的外部浏览器不关闭
    owns_browser: bool,
    poll_interval: Duration,
}

impl ChromeSession {
    pub fn new(browser: Browser, page: Page, owns_browser: bool) -> Self {
        Self {
            browser,
            windows: Mutex::new(vec![page]),
            owns_browser,
            poll_interval: Duration::from_millis(250),
        }
    }

    /// 当前活动窗口
    pub async fn active_page(&self) -> PageResult<Page> {
        self.windows
            .lock()
            .await
            .last()
            .cloned()
            .ok_or_else(|| PageError::SessionLost("没有可用的浏览器窗口".to_string()))
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> PageResult<JsonValue> {
        let page = self.active_page().await?;
        let result = page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> PageResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 执行返回布尔值的动作脚本，返回 false 时视为元素缺失
    async fn run_action(&self, js_code: String, what: impl FnOnce() -> String) -> PageResult<()> {
        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(PageError::Navigation(what()))
        }
    }

    /// 关闭浏览器（仅限本进程启动的浏览器）
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        if !self.owns_browser {
            debug!("浏览器为外部实例，保留不关闭");
            return Ok(());
        }
        self.browser.close().await?;
        let _ = self.browser.wait().await;
        Ok(())
    }
}

fn js_str(value: &str) -> PageResult<String> {
    Ok(serde_json::to_string(value)?)
}

#[async_trait]
impl Session for ChromeSession {
    async fn goto(&self, url: &str) -> PageResult<()> {
        let page = self.active_page().await?;
        page.goto(url).await?;
        debug!("已导航到: {}", url);
        Ok(())
    }

    async fn wait_for(&self, selector: &str, limit: Duration) -> PageResult<()> {
        let started = Instant::now();
        loop {
            match self.count(selector).await {
                Ok(n) if n > 0 => return Ok(()),
                Err(e) if e.is_session_lost() => return Err(e),
                // 页面跳转期间执行上下文会被销毁，继续轮询
                _ => {}
            }
            if started.elapsed() >= limit {
                return Err(PageError::Navigation(format!(
                    "等待元素 {} 超时 ({:?})",
                    selector, limit
                )));
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn count(&self, selector: &str) -> PageResult<usize> {
        let js = format!("document.querySelectorAll({}).length", js_str(selector)?);
        self.eval_as(js).await
    }

    async fn click(&self, selector: &str) -> PageResult<()> {
        let page = self.active_page().await?;
        page.find_element(selector).await?.click().await?;
        Ok(())
    }

    async fn click_nth(&self, selector: &str, index: usize) -> PageResult<()> {
        let js = format!(
            r#"(() => {{
                const els = document.querySelectorAll({sel});
                if (els.length <= {index}) return false;
                els[{index}].scrollIntoView();
                els[{index}].click();
                return true;
            }})()"#,
            sel = js_str(selector)?,
            index = index
        );
        self.run_action(js, || format!("找不到第 {} 个元素: {}", index + 1, selector))
            .await
    }

    async fn click_text(&self, selector: &str, needle: &str) -> PageResult<()> {
        let js = format!(
            r#"(() => {{
                const needle = {needle};
                const el = Array.from(document.querySelectorAll({sel}))
                    .find(e => e.innerText.replace(/\u00a0/g, ' ').includes(needle));
                if (!el) return false;
                el.scrollIntoView();
                el.click();
                return true;
            }})()"#,
            sel = js_str(selector)?,
            needle = js_str(needle)?
        );
        self.run_action(js, || format!("找不到包含 '{}' 的元素: {}", needle, selector))
            .await
    }

    async fn click_cell_link(&self, table: &str, row: usize, column: usize) -> PageResult<()> {
        let js = format!(
            r#"(() => {{
                const table = document.querySelector({sel});
                if (!table) return false;
                const tr = table.querySelectorAll('tr')[{row}];
                if (!tr) return false;
                const td = tr.querySelectorAll('td')[{column}];
                const link = td && td.querySelector('a');
                if (!link) return false;
                link.scrollIntoView();
                link.click();
                return true;
            }})()"#,
            sel = js_str(table)?,
            row = row,
            column = column
        );
        self.run_action(js, || {
            format!("表格 {} 第 {} 行第 {} 列没有链接", table, row, column + 1)
        })
        .await
    }

    async fn type_text(&self, selector: &str, text: &str) -> PageResult<()> {
        let clear = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.value = '';
                return true;
            }})()"#,
            sel = js_str(selector)?
        );
        self.run_action(clear, || format!("找不到输入框: {}", selector))
            .await?;

        let page = self.active_page().await?;
        page.find_element(selector)
            .await?
            .click()
            .await?
            .type_str(text)
            .await?;
        Ok(())
    }

    async fn select_value(&self, selector: &str, value: &str) -> PageResult<()> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                const option = Array.from(el.options).find(o => o.value === {value});
                if (!option) return false;
                el.value = option.value;
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            sel = js_str(selector)?,
            value = js_str(value)?
        );
        self.run_action(js, || format!("下拉框 {} 中没有选项 '{}'", selector, value))
            .await
    }

    async fn select_index(&self, selector: &str, index: usize) -> PageResult<()> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el || el.options.length <= {index}) return false;
                el.selectedIndex = {index};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            sel = js_str(selector)?,
            index = index
        );
        self.run_action(js, || format!("下拉框 {} 没有第 {} 项", selector, index + 1))
            .await
    }

    async fn table_rows(&self, table: &str) -> PageResult<Vec<Vec<String>>> {
        let js = format!(
            r#"(() => {{
                const table = document.querySelector({sel});
                if (!table) return null;
                return Array.from(table.querySelectorAll('tr')).map(tr =>
                    Array.from(tr.querySelectorAll('td'))
                        .map(td => td.innerText.replace(/\u00a0/g, ' ').trim()));
            }})()"#,
            sel = js_str(table)?
        );
        let rows: Option<Vec<Vec<String>>> = self.eval_as(js).await?;
        rows.ok_or_else(|| PageError::Navigation(format!("找不到表格: {}", table)))
    }

    async fn text_of(&self, selector: &str) -> PageResult<String> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                return el ? el.innerText : null;
            }})()"#,
            sel = js_str(selector)?
        );
        let text: Option<String> = self.eval_as(js).await?;
        text.ok_or_else(|| PageError::Navigation(format!("找不到元素: {}", selector)))
    }

    async fn has_text(&self, selector: &str, needle: &str) -> PageResult<bool> {
        let js = format!(
            r#"Array.from(document.querySelectorAll({sel}))
                .some(e => e.innerText.replace(/\u00a0/g, ' ').includes({needle}))"#,
            sel = js_str(selector)?,
            needle = js_str(needle)?
        );
        self.eval_as(js).await
    }

    async fn switch_to_popup(&self, limit: Duration) -> PageResult<()> {
        let started = Instant::now();
        loop {
            let known: Vec<_> = self
                .windows
                .lock()
                .await
                .iter()
                .map(|p| p.target_id().clone())
                .collect();

            let pages = self.browser.pages().await?;
            if let Some(popup) = pages
                .into_iter()
                .find(|p| !known.contains(p.target_id()))
            {
                debug!("已切换到弹出窗口");
                self.windows.lock().await.push(popup);
                return Ok(());
            }

            if started.elapsed() >= limit {
                return Err(PageError::Navigation(format!(
                    "弹出窗口未在 {:?} 内出现",
                    limit
                )));
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn close_popup(&self) -> PageResult<()> {
        let popup = {
            let mut windows = self.windows.lock().await;
            if windows.len() <= 1 {
                return Ok(());
            }
            windows.pop()
        };
        if let Some(page) = popup {
            // 确认后网站可能已自行关闭窗口
            if let Err(e) = page.close().await {
                debug!("关闭弹出窗口失败（可能已关闭）: {}", e);
            }
        }
        Ok(())
    }

    async fn accept_dialogs(&self) -> PageResult<()> {
        self.eval("window.confirm = () => true; window.alert = () => {}; true")
            .await?;
        Ok(())
    }

    async fn is_alive(&self) -> bool {
        let Ok(page) = self.active_page().await else {
            return false;
        };
        matches!(
            timeout(Duration::from_secs(5), page.evaluate("1")).await,
            Ok(Ok(_))
        )
    }
}
