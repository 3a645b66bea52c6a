//! 搜索页：按公司名称或注册编号搜索

use tracing::debug;

use crate::error::PageResult;
use crate::models::{Identifier, IdentifierKind, SearchResult};
use crate::pages::{PageContext, ResultListPage};

const BY_NAME: &str = "input[name='radioButton'][value='BYNAME']";
const BY_NUMBER: &str = "input[name='radioButton'][value='BYCRNO']";
const NAME_FIELD: &str = "input[type='text'][name='companyName']";
const NUMBER_FIELD: &str = "input[type='text'][name='CRNo']";
const SUBMIT: &str = "input[type='button'][value='Search']";

pub struct SearchPage<'a> {
    cx: PageContext<'a>,
}

impl<'a> SearchPage<'a> {
    pub fn new(cx: PageContext<'a>) -> Self {
        Self { cx }
    }

    pub(crate) async fn wait_ready(&self) -> PageResult<()> {
        self.cx.session.wait_for(BY_NAME, self.cx.timeouts.page).await
    }

    /// 提交搜索并读取结果列表
    ///
    /// 没有匹配记录时返回空结果，不视为错误。
    pub async fn submit(&self, identifier: &Identifier) -> PageResult<SearchResult> {
        let session = self.cx.session;
        let (radio, field) = match identifier.kind() {
            IdentifierKind::Name => (BY_NAME, NAME_FIELD),
            IdentifierKind::RegistryNumber => (BY_NUMBER, NUMBER_FIELD),
        };

        self.wait_ready().await?;
        session.click(radio).await?;
        session.type_text(field, identifier.as_str()).await?;
        session.click(SUBMIT).await?;
        debug!("已提交搜索: {}", identifier);

        ResultListPage::new(self.cx).candidates().await
    }
}
