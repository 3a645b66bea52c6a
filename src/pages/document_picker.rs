//! 公司资料页与文件索引页
//!
//! 文件索引可能分多页显示；挑选结果记录每份文件所在的页与行，
//! 加入购物车时据此重新定位。

use serde::Serialize;
use tracing::debug;

use crate::error::{PageError, PageResult};
use crate::models::{Candidate, DocumentType, RequestSpec};
use crate::pages::{CartPage, PageContext};

const PROCEED: &str = "input[type='submit'][value='Proceed to Document Index']";
const FILING_YEAR: &str = "select[name='filing_year']";
const GO_BUTTONS: &str = "input[type='submit'][value='GO']";
const PAGE_MENU: &str = "select[name='SelectPage']";
const PAGE_OPTIONS: &str = "select[name='SelectPage'] option";
pub(crate) const DOCUMENT_TABLE: &str = "table[dwcopytype='CopyTableRow']";

/// 文件表格前两行是表头
const HEADER_ROWS: usize = 2;
pub(crate) const COL_CART_LINK: usize = 0;
const COL_DOCUMENT: usize = 4;

const GO_FILING_YEAR: usize = 0;
const GO_PAGE: usize = 1;

/// 文件索引中的一份文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRow {
    /// 所在页（从 0 开始）
    pub page: usize,
    /// 在文件表格中的行号（含表头）
    pub row: usize,
    pub name: String,
}

/// 挑选结果：按索引顺序排列的可购买文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerHandle {
    pub registry_number: String,
    pub document_type: DocumentType,
    pub documents: Vec<DocumentRow>,
    pub page_count: usize,
}

/// 在一页文件表格中找出属于所请求类型的文件
pub fn matching_rows(rows: &[Vec<String>], page: usize, spec: &RequestSpec) -> Vec<DocumentRow> {
    rows.iter()
        .enumerate()
        .skip(HEADER_ROWS)
        .filter(|(_, cells)| cells.len() > COL_DOCUMENT)
        .filter(|(_, cells)| spec.matches_document(&cells[COL_DOCUMENT]))
        .map(|(row, cells)| DocumentRow {
            page,
            row,
            name: cells[COL_DOCUMENT].clone(),
        })
        .collect()
}

pub struct DocumentPickerPage<'a> {
    cx: PageContext<'a>,
}

impl<'a> DocumentPickerPage<'a> {
    pub fn new(cx: PageContext<'a>) -> Self {
        Self { cx }
    }

    pub fn context(&self) -> PageContext<'a> {
        self.cx
    }

    /// 公司资料页 → 文件索引
    pub(crate) async fn proceed_from_company_info(&self) -> PageResult<()> {
        let session = self.cx.session;
        session.wait_for(PROCEED, self.cx.timeouts.page).await?;
        session.click(PROCEED).await?;
        session.wait_for(FILING_YEAR, self.cx.timeouts.page).await
    }

    /// 挑出所请求类型的文件，最多 `spec.quantity` 份
    ///
    /// 一份都没有时返回 `PageError::UnavailableDocument`。
    pub async fn choose(&self, entity: &Candidate, spec: &RequestSpec) -> PageResult<PickerHandle> {
        self.show_all_years().await?;
        let page_count = self.page_count().await?;
        let wanted = spec.quantity as usize;

        let mut documents = Vec::new();
        for page in 0..page_count {
            if documents.len() >= wanted {
                break;
            }
            if page_count > 1 {
                self.goto_index_page(page).await?;
            }
            let rows = self.cx.session.table_rows(DOCUMENT_TABLE).await?;
            let found = matching_rows(&rows, page, spec);
            debug!("文件索引第 {} 页: {} 份 {}", page + 1, found.len(), spec.document_type);
            documents.extend(found.into_iter().take(wanted - documents.len()));
        }

        if documents.is_empty() {
            return Err(PageError::UnavailableDocument(format!(
                "{} 的文件索引中没有 {}",
                entity, spec.document_type
            )));
        }

        Ok(PickerHandle {
            registry_number: entity.registry_number.clone(),
            document_type: spec.document_type,
            documents,
            page_count,
        })
    }

    /// 年份选 "全部" 并刷新
    pub(crate) async fn show_all_years(&self) -> PageResult<()> {
        let session = self.cx.session;
        session.wait_for(FILING_YEAR, self.cx.timeouts.page).await?;
        session.select_value(FILING_YEAR, "all").await?;
        session.click_nth(GO_BUTTONS, GO_FILING_YEAR).await?;
        session.wait_for(DOCUMENT_TABLE, self.cx.timeouts.page).await
    }

    /// 没有分页下拉框时视为一页
    async fn page_count(&self) -> PageResult<usize> {
        Ok(self.cx.session.count(PAGE_OPTIONS).await?.max(1))
    }

    pub(crate) async fn goto_index_page(&self, page: usize) -> PageResult<()> {
        let session = self.cx.session;
        session.wait_for(PAGE_MENU, self.cx.timeouts.page).await?;
        session.select_index(PAGE_MENU, page).await?;
        session.click_nth(GO_BUTTONS, GO_PAGE).await?;
        session.wait_for(DOCUMENT_TABLE, self.cx.timeouts.page).await
    }

    pub fn cart(&self) -> CartPage<'a> {
        CartPage::new(self.cx)
    }
}
