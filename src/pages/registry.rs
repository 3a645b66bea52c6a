//! 公司注册处网站：记录当前画面，按需导航
//!
//! 每个操作开始时先把当前画面记为 `Home`，成功后才记下新画面；
//! 中途失败的操作因此总是从主菜单重新开始。

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{PageError, PageResult};
use crate::infrastructure::Session;
use crate::models::{CartReference, Candidate, Identifier, RequestSpec, SearchResult};
use crate::pages::menu::signed_out;
use crate::pages::{
    CartCheckout, DocumentPickerPage, MainMenu, Navigator, PageContext, PickerHandle,
    ResultListPage, Screen, ScreenKind, Timeouts,
};

pub struct Registry<S: Session> {
    session: S,
    timeouts: Timeouts,
    current: Mutex<ScreenKind>,
}

impl<S: Session> Registry<S> {
    /// 会话必须已经登录并停在主菜单可用的画面
    pub fn new(session: S, timeouts: Timeouts) -> Self {
        Self {
            session,
            timeouts,
            current: Mutex::new(ScreenKind::Home),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    pub async fn current(&self) -> ScreenKind {
        *self.current.lock().await
    }

    fn cx(&self) -> PageContext<'_> {
        PageContext::new(&self.session, self.timeouts)
    }

    async fn take_screen(&self) -> Screen<'_> {
        let kind = std::mem::replace(&mut *self.current.lock().await, ScreenKind::Home);
        let screen = Screen::of(kind, self.cx());
        debug!("当前画面: {:?}", screen.kind());
        screen
    }

    async fn enter(&self, kind: ScreenKind) {
        *self.current.lock().await = kind;
    }

    /// 按注册编号重新搜索并打开文件索引
    async fn reopen(&self, registry_number: &str) -> PageResult<DocumentPickerPage<'_>> {
        debug!("重新打开 {} 的文件索引", registry_number);
        let number = Identifier::parse(registry_number)
            .map_err(|e| PageError::navigation(e.to_string()))?;
        let search = MainMenu::new(self.cx()).open_search().await?;
        let result = search.submit(&number).await?;
        let entity = result
            .candidates
            .into_iter()
            .find(|c| c.registry_number == registry_number)
            .ok_or_else(|| {
                PageError::navigation(format!("重新搜索 {} 时找不到该公司", registry_number))
            })?;
        ResultListPage::new(self.cx()).open(&entity).await
    }

    pub async fn clear_cart(&self) -> PageResult<()> {
        let page = self.take_screen().await.menu().open_checkout().await?;
        page.clear().await?;
        self.enter(ScreenKind::Checkout).await;
        Ok(())
    }

    pub async fn logout(&self) -> PageResult<()> {
        self.take_screen().await.menu().logout().await
    }
}

#[async_trait]
impl<S: Session> CartCheckout for Registry<S> {
    async fn checkout(&self, batch_size: usize) -> PageResult<usize> {
        let page = self.take_screen().await.menu().open_checkout().await?;
        let selected = page.checkout(batch_size).await?;
        self.enter(ScreenKind::Checkout).await;
        Ok(selected)
    }
}

#[async_trait]
impl<S: Session> Navigator for Registry<S> {
    async fn search(&self, identifier: &Identifier) -> PageResult<SearchResult> {
        let search = self.take_screen().await.menu().open_search().await?;
        let result = search.submit(identifier).await?;
        self.enter(ScreenKind::ResultList).await;
        Ok(result)
    }

    async fn choose(&self, entity: &Candidate, spec: &RequestSpec) -> PageResult<PickerHandle> {
        let picker = match self.take_screen().await {
            Screen::ResultList(list) => list.open(entity).await?,
            _ => self.reopen(&entity.registry_number).await?,
        };
        let handle = picker.choose(entity, spec).await?;
        self.enter(ScreenKind::DocumentPicker).await;
        Ok(handle)
    }

    async fn add_to_cart(&self, handle: &PickerHandle, quantity: u32) -> PageResult<CartReference> {
        let picker = match self.take_screen().await {
            Screen::DocumentPicker(page) => page,
            _ => {
                let page = self.reopen(&handle.registry_number).await?;
                page.show_all_years().await?;
                page
            }
        };
        let reference = picker.cart().add(handle, quantity).await?;
        self.enter(ScreenKind::DocumentPicker).await;
        Ok(reference)
    }

    /// 浏览器仍在且网站没有结束登录
    async fn session_alive(&self) -> bool {
        if !self.session.is_alive().await {
            return false;
        }
        match signed_out(&self.session).await {
            Ok(true) => {
                warn!("网站已显示登录画面，会话已结束");
                false
            }
            Ok(false) => true,
            Err(e) => !e.is_session_lost(),
        }
    }
}
