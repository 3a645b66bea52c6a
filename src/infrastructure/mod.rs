//! 基础设施层：持有浏览器资源，只暴露会话原语

pub mod chrome_session;
#[cfg(test)]
pub(crate) mod fake_session;
pub mod session;

pub use chrome_session::ChromeSession;
pub use session::Session;
