//! 把已挑出的文件加入购物车

use tracing::{debug, info, warn};

use crate::error::{PageError, PageResult};
use crate::models::CartReference;
use crate::pages::document_picker::{COL_CART_LINK, DOCUMENT_TABLE};
use crate::pages::{ConfirmationPage, DocumentPickerPage, DocumentRow, PageContext, PickerHandle};

pub struct CartPage<'a> {
    cx: PageContext<'a>,
}

impl<'a> CartPage<'a> {
    pub fn new(cx: PageContext<'a>) -> Self {
        Self { cx }
    }

    /// 加入 `min(quantity, 可用份数)` 份文件
    ///
    /// 第一份之前的错误原样返回（可能可重试）；已有文件加入后出错时
    /// 转为 `PageError::Cart`，避免重试导致重复加入。
    pub async fn add(&self, handle: &PickerHandle, quantity: u32) -> PageResult<CartReference> {
        let mut items = Vec::new();

        for document in handle.documents.iter().take(quantity as usize) {
            match self.add_one(handle, document).await {
                Ok(item) => items.push(item),
                Err(e) if items.is_empty() || e.is_session_lost() => return Err(e),
                Err(e) => {
                    warn!("已加入 {} 份后失败: {}", items.len(), e);
                    return Err(PageError::Cart(format!(
                        "已加入 {} 份后失败: {}",
                        items.len(),
                        e
                    )));
                }
            }
        }

        if items.is_empty() {
            return Err(PageError::UnavailableDocument(format!(
                "{} 没有可加入的 {}",
                handle.registry_number, handle.document_type
            )));
        }

        if items.len() < quantity as usize {
            info!(
                "{} 只有 {}/{} 份 {}",
                handle.registry_number,
                items.len(),
                quantity,
                handle.document_type
            );
        }

        Ok(CartReference {
            registry_number: handle.registry_number.clone(),
            items,
            requested: quantity,
        })
    }

    async fn add_one(&self, handle: &PickerHandle, document: &DocumentRow) -> PageResult<String> {
        let session = self.cx.session;
        if handle.page_count > 1 {
            DocumentPickerPage::new(self.cx)
                .goto_index_page(document.page)
                .await?;
        } else {
            session.wait_for(DOCUMENT_TABLE, self.cx.timeouts.page).await?;
        }

        session
            .click_cell_link(DOCUMENT_TABLE, document.row, COL_CART_LINK)
            .await?;
        debug!("已点击加入购物车: {}", document.name);

        // 点击之后网站可能已经接受，不再视为可重试
        session
            .switch_to_popup(self.cx.timeouts.popup)
            .await
            .map_err(|e| match e {
                PageError::Navigation(msg) => PageError::Cart(format!("确认窗口未出现: {}", msg)),
                other => other,
            })?;

        ConfirmationPage::new(self.cx)
            .acknowledge(&document.name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fake_session::FakeSession;
    use crate::models::DocumentType;
    use crate::pages::Timeouts;

    const OK_BUTTON: &str = "input[type='button'][value='OK']";

    fn handle(rows: &[usize]) -> PickerHandle {
        PickerHandle {
            registry_number: "1234567".into(),
            document_type: DocumentType::AnnualReturn,
            documents: rows
                .iter()
                .map(|&row| DocumentRow {
                    page: 0,
                    row,
                    name: format!("ANNUAL RETURN row {}", row),
                })
                .collect(),
            page_count: 1,
        }
    }

    #[tokio::test]
    async fn carts_up_to_available_documents() {
        let session = FakeSession::new()
            .with_element(DOCUMENT_TABLE)
            .with_element(OK_BUTTON)
            .with_popups();
        let page = CartPage::new(PageContext::new(&session, Timeouts::default()));

        let reference = page.add(&handle(&[2, 4]), 3).await.unwrap();

        assert_eq!(reference.carted(), 2);
        assert_eq!(reference.requested, 3);
        let clicks: Vec<_> = session
            .actions()
            .into_iter()
            .filter(|a| a.starts_with("click_cell:"))
            .collect();
        assert_eq!(clicks.len(), 2);
    }

    #[tokio::test]
    async fn respects_requested_quantity() {
        let session = FakeSession::new()
            .with_element(DOCUMENT_TABLE)
            .with_element(OK_BUTTON)
            .with_popups();
        let page = CartPage::new(PageContext::new(&session, Timeouts::default()));

        let reference = page.add(&handle(&[2, 3, 4]), 1).await.unwrap();
        assert_eq!(reference.items, vec!["ANNUAL RETURN row 2".to_string()]);
    }

    #[tokio::test]
    async fn missing_popup_is_cart_error() {
        let session = FakeSession::new()
            .with_element(DOCUMENT_TABLE)
            .with_element(OK_BUTTON);
        let page = CartPage::new(PageContext::new(&session, Timeouts::default()));

        let err = page.add(&handle(&[2]), 1).await.unwrap_err();
        assert!(matches!(err, PageError::Cart(_)));
    }

    #[tokio::test]
    async fn index_not_shown_is_transient() {
        let session = FakeSession::new().with_popups();
        let page = CartPage::new(PageContext::new(&session, Timeouts::default()));

        let err = page.add(&handle(&[2]), 1).await.unwrap_err();
        assert!(err.is_transient());
    }
}
