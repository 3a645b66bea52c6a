//! 页面层（Page Representation）
//!
//! 每个网站画面对应一个页面类型，只暴露该画面上有效的操作：
//!
//! ```text
//! MainMenu ──open_search──▶ SearchPage ──submit──▶ ResultListPage
//!     │                                                  │ open
//!     │                                                  ▼
//!     │                     CartPage ◀──cart── DocumentPickerPage
//!     │                        │ add
//!     │                        ▼
//!     │                  ConfirmationPage（弹出窗口）
//!     └──open_checkout──▶ CheckoutPage
//! ```
//!
//! 页面对象只持有会话引用与超时设置，不保存跨画面的状态；
//! 当前显示哪个画面由 `Registry` 以 `ScreenKind` 记录。

pub mod cart;
pub mod checkout;
pub mod confirmation;
pub mod document_picker;
pub mod menu;
pub mod registry;
pub mod result_list;
pub mod search;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::PageResult;
use crate::infrastructure::Session;
use crate::models::{CartReference, Candidate, Identifier, RequestSpec, SearchResult};

pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use confirmation::ConfirmationPage;
pub use document_picker::{DocumentPickerPage, DocumentRow, PickerHandle};
pub use menu::MainMenu;
pub use registry::Registry;
pub use result_list::{resolve, ResultListPage};
pub use search::SearchPage;

/// 各类等待的上限
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// 普通页面元素
    pub page: Duration,
    /// 搜索结果列表
    pub results: Duration,
    /// 加入购物车后的确认窗口
    pub popup: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(30),
            results: Duration::from_secs(5),
            popup: Duration::from_secs(30),
        }
    }
}

/// 页面对象共享的上下文
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub session: &'a dyn Session,
    pub timeouts: Timeouts,
}

impl<'a> PageContext<'a> {
    pub fn new(session: &'a dyn Session, timeouts: Timeouts) -> Self {
        Self { session, timeouts }
    }
}

/// 画面类型
///
/// 只记录操作结束后停留的画面：搜索页提交后即是结果列表，
/// 加入购物车的确认窗口关闭后仍回到文件索引。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    /// 只保证主菜单可用（登录后或某次操作中途失败后）
    Home,
    ResultList,
    DocumentPicker,
    Checkout,
}

/// 当前画面及其可用操作
pub enum Screen<'a> {
    Home(MainMenu<'a>),
    ResultList(ResultListPage<'a>),
    DocumentPicker(DocumentPickerPage<'a>),
    Checkout(CheckoutPage<'a>),
}

impl<'a> Screen<'a> {
    pub fn of(kind: ScreenKind, cx: PageContext<'a>) -> Self {
        match kind {
            ScreenKind::Home => Screen::Home(MainMenu::new(cx)),
            ScreenKind::ResultList => Screen::ResultList(ResultListPage::new(cx)),
            ScreenKind::DocumentPicker => Screen::DocumentPicker(DocumentPickerPage::new(cx)),
            ScreenKind::Checkout => Screen::Checkout(CheckoutPage::new(cx)),
        }
    }

    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Home(_) => ScreenKind::Home,
            Screen::ResultList(_) => ScreenKind::ResultList,
            Screen::DocumentPicker(_) => ScreenKind::DocumentPicker,
            Screen::Checkout(_) => ScreenKind::Checkout,
        }
    }

    /// 主菜单在每个画面上都可用
    pub fn menu(&self) -> MainMenu<'a> {
        let cx = match self {
            Screen::Home(p) => p.context(),
            Screen::ResultList(p) => p.context(),
            Screen::DocumentPicker(p) => p.context(),
            Screen::Checkout(p) => p.context(),
        };
        MainMenu::new(cx)
    }
}

/// 流程引擎依赖的页面操作
///
/// 每个方法都会先导航到所需画面，因此可以在失败后直接重试。
#[async_trait]
pub trait Navigator: Send + Sync {
    /// 搜索标识符，返回结果列表中的全部候选
    async fn search(&self, identifier: &Identifier) -> PageResult<SearchResult>;

    /// 打开实体的文件索引，挑出所请求类型的文件
    async fn choose(&self, entity: &Candidate, spec: &RequestSpec) -> PageResult<PickerHandle>;

    /// 把已挑出的文件加入购物车
    async fn add_to_cart(&self, handle: &PickerHandle, quantity: u32) -> PageResult<CartReference>;

    /// 会话是否仍然可用
    async fn session_alive(&self) -> bool;
}

/// 批次结账：勾选购物车中前 `batch_size` 份文件，推进到扣款确认页面
#[async_trait]
pub trait CartCheckout: Send + Sync {
    /// 返回勾选的份数；购物车为空时为 0
    async fn checkout(&self, batch_size: usize) -> PageResult<usize>;
}
