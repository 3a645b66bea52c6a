//! 主菜单：登录后每个画面顶部都有

use tracing::{debug, warn};

use crate::error::{PageError, PageResult};
use crate::infrastructure::Session;
use crate::pages::{CheckoutPage, PageContext, SearchPage};

/// 顶层菜单项
pub(crate) const TOP_MENU: &str = "div.m0l0i";
/// 二级菜单项
pub(crate) const SUB_MENU: &str = "div.m0l1i";

const IMAGE_RECORD: &str = "Image Record (including Document Index)";
const CHECKOUT: &str = "Check out Shopping Cart";
const LOGOUT: &str = "Logout";

/// 登录表单与入口页的注册用户链接：出现即说明已被登出
const SIGNED_OUT_MARKERS: [&str; 2] = [
    "input[name='username']",
    "img[src='images/registered_01.gif']",
];
const BODY: &str = "body";
const EXPIRY_NOTICES: [&str; 3] = ["session has expired", "session expired", "session timeout"];

/// 网站是否已结束本次登录（登录表单、入口页或会话过期提示）
pub(crate) async fn signed_out(session: &dyn Session) -> PageResult<bool> {
    for marker in SIGNED_OUT_MARKERS {
        if session.count(marker).await? > 0 {
            return Ok(true);
        }
    }
    let body = match session.text_of(BODY).await {
        Ok(text) => text.to_lowercase(),
        Err(e) if e.is_session_lost() => return Err(e),
        Err(_) => return Ok(false),
    };
    Ok(EXPIRY_NOTICES.iter().any(|notice| body.contains(notice)))
}

pub struct MainMenu<'a> {
    cx: PageContext<'a>,
}

impl<'a> MainMenu<'a> {
    pub fn new(cx: PageContext<'a>) -> Self {
        Self { cx }
    }

    pub fn context(&self) -> PageContext<'a> {
        self.cx
    }

    /// 打开 "Image Record" 搜索页
    pub async fn open_search(&self) -> PageResult<SearchPage<'a>> {
        self.open_submenu(IMAGE_RECORD).await?;
        let page = SearchPage::new(self.cx);
        page.wait_ready().await?;
        Ok(page)
    }

    /// 打开购物车结账页
    pub async fn open_checkout(&self) -> PageResult<CheckoutPage<'a>> {
        self.open_submenu(CHECKOUT).await?;
        Ok(CheckoutPage::new(self.cx))
    }

    pub async fn logout(&self) -> PageResult<()> {
        let session = self.cx.session;
        self.wait_ready().await?;
        // 网站会弹出确认对话框
        session.accept_dialogs().await?;
        session.click_text(TOP_MENU, LOGOUT).await?;
        debug!("已点击登出");
        Ok(())
    }

    async fn open_submenu(&self, item: &str) -> PageResult<()> {
        self.wait_ready().await?;
        self.cx.session.click_text(SUB_MENU, item).await?;
        debug!("菜单: {}", item);
        Ok(())
    }

    /// 等待顶层菜单；菜单不在且页面已是登录前画面时返回 `SessionLost`
    async fn wait_ready(&self) -> PageResult<()> {
        let session = self.cx.session;
        if let Err(e) = session.wait_for(TOP_MENU, self.cx.timeouts.page).await {
            if e.is_transient() && signed_out(session).await? {
                warn!("主菜单消失，网站已结束登录");
                return Err(PageError::SessionLost("网站已结束登录会话".into()));
            }
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fake_session::FakeSession;
    use crate::pages::Timeouts;

    #[tokio::test]
    async fn logout_accepts_dialog_before_clicking() {
        let session = FakeSession::new().with_element(TOP_MENU);
        let menu = MainMenu::new(PageContext::new(&session, Timeouts::default()));

        tokio_test::assert_ok!(menu.logout().await);

        let actions = session.actions();
        let accept = actions.iter().position(|a| a == "accept_dialogs").unwrap();
        let click = actions
            .iter()
            .position(|a| a == &format!("click_text:{}:{}", TOP_MENU, LOGOUT))
            .unwrap();
        assert!(accept < click);
    }

    #[tokio::test]
    async fn menu_missing_is_navigation_error() {
        let session = FakeSession::new();
        let menu = MainMenu::new(PageContext::new(&session, Timeouts::default()));

        let err = menu.open_search().await.err().unwrap();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn login_form_means_session_lost() {
        let session = FakeSession::new().with_element("input[name='username']");
        let menu = MainMenu::new(PageContext::new(&session, Timeouts::default()));

        let err = menu.open_search().await.err().unwrap();
        assert!(err.is_session_lost());
        assert!(!session.actions().iter().any(|a| a.starts_with("click_text:")));
    }

    #[tokio::test]
    async fn expiry_notice_is_case_insensitive() {
        let session =
            FakeSession::new().with_text(BODY, "Your Session Has Expired. Please login again.");

        assert!(signed_out(&session).await.unwrap());
        assert!(!signed_out(&FakeSession::new().with_element(TOP_MENU)).await.unwrap());
    }
}
