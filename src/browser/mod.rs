//! 浏览器会话的建立与登录
//!
//! 核心流程只接收已登录的 `Session`；建立和关闭都在这里完成。

pub mod connection;
pub mod launch;
pub mod login;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::infrastructure::ChromeSession;

pub use connection::connect_to_browser;
pub use launch::launch_browser;
pub use login::sign_in;

/// 打开浏览器（连接或启动）并登录
pub async fn open_session(config: &Config) -> Result<ChromeSession> {
    let (username, password) = config.credentials()?;

    let session = match config.browser_debug_port {
        Some(port) => {
            let (browser, page) = connect_to_browser(port, "about:blank").await?;
            ChromeSession::new(browser, page, false)
        }
        None => {
            let (browser, page) = launch_browser(
                "about:blank",
                config.headless,
                config.chrome_executable.as_deref(),
            )
            .await?;
            ChromeSession::new(browser, page, true)
        }
    };

    sign_in(
        &session,
        &config.registry_url,
        username,
        password,
        config.timeouts().page,
    )
    .await
    .context("登录公司注册处失败")?;

    info!("✓ 会话已建立");
    Ok(session)
}
