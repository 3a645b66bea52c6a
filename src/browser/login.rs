//! 登录：入口页 → 注册用户登录窗口 → 主菜单

use std::time::Duration;
use tracing::{debug, info};

use crate::error::PageResult;
use crate::infrastructure::Session;

const REGISTERED_USER: &str = "img[src='images/registered_01.gif']";
const USERNAME: &str = "input[name='username']";
const PASSWORD: &str = "input[name='password']";
/// 使用条款的确认勾选框（CHKBOX_01 ~ CHKBOX_09）
const TERMS_CHECKBOXES: &str = "input[id^='CHKBOX_0']";
const SUBMIT: &str = "input[value='Accept, Submit & Login']";
const MAIN_MENU: &str = "div.m0l0i";

/// 用注册用户身份登录，成功后主菜单可用
pub async fn sign_in(
    session: &dyn Session,
    entry_url: &str,
    username: &str,
    password: &str,
    timeout: Duration,
) -> PageResult<()> {
    info!("🔐 正在登录公司注册处...");
    session.goto(entry_url).await?;
    session.wait_for(REGISTERED_USER, timeout).await?;
    session.click(REGISTERED_USER).await?;
    // 登录表单在新窗口中打开
    session.switch_to_popup(timeout).await?;

    session.wait_for(USERNAME, timeout).await?;
    session.type_text(USERNAME, username).await?;
    session.type_text(PASSWORD, password).await?;

    let checkboxes = session.count(TERMS_CHECKBOXES).await?;
    for index in 0..checkboxes {
        session.click_nth(TERMS_CHECKBOXES, index).await?;
    }
    debug!("已勾选 {} 个条款确认框", checkboxes);

    session.click(SUBMIT).await?;
    session.wait_for(MAIN_MENU, timeout).await?;
    info!("✓ 登录成功");
    Ok(())
}
