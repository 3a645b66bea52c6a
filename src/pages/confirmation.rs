//! 加入购物车后弹出的确认窗口

use tracing::{debug, warn};

use crate::error::{PageError, PageResult};
use crate::pages::PageContext;

const OK_BUTTON: &str = "input[type='button'][value='OK']";
const BODY: &str = "body";

/// 网站拒绝加入购物车时窗口中出现的字样（小写）
const REJECTION_MARKERS: [&str; 4] = [
    "not available",
    "already in your shopping cart",
    "exceed",
    "not allowed",
];

pub struct ConfirmationPage<'a> {
    cx: PageContext<'a>,
}

impl<'a> ConfirmationPage<'a> {
    pub fn new(cx: PageContext<'a>) -> Self {
        Self { cx }
    }

    /// 确认加入购物车，之后关闭弹出窗口
    ///
    /// 确认按钮未在限定时间内出现或网站给出拒绝信息时返回 `PageError::Cart`。
    pub async fn acknowledge(&self, item: &str) -> PageResult<String> {
        let result = self.confirm(item).await;
        if !matches!(result, Err(PageError::SessionLost(_))) {
            if let Err(e) = self.cx.session.close_popup().await {
                warn!("关闭确认窗口失败: {}", e);
                if e.is_session_lost() {
                    return Err(e);
                }
            }
        }
        result
    }

    async fn confirm(&self, item: &str) -> PageResult<String> {
        let session = self.cx.session;
        let waited = session.wait_for(OK_BUTTON, self.cx.timeouts.popup).await;

        if let Some(reason) = self.rejection().await? {
            return Err(PageError::Cart(format!("网站拒绝加入 {}: {}", item, reason)));
        }

        match waited {
            Ok(()) => {}
            Err(PageError::Navigation(_)) => {
                return Err(PageError::Cart(format!("{} 的加入操作未被确认", item)));
            }
            Err(other) => return Err(other),
        }

        session.click(OK_BUTTON).await.map_err(|e| match e {
            PageError::Navigation(msg) => PageError::Cart(msg),
            other => other,
        })?;
        debug!("已确认加入购物车: {}", item);
        Ok(item.to_string())
    }

    async fn rejection(&self) -> PageResult<Option<String>> {
        let text = match self.cx.session.text_of(BODY).await {
            Ok(text) => text,
            Err(PageError::Navigation(_)) => return Ok(None),
            Err(other) => return Err(other),
        };
        let lower = text.to_lowercase();
        Ok(REJECTION_MARKERS
            .iter()
            .find(|marker| lower.contains(*marker))
            .map(|_| {
                text.lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or_default()
                    .to_string()
            }))
    }
}
