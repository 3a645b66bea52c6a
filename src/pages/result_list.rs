//! 搜索结果列表与消歧规则

use tracing::debug;

use crate::error::{PageError, PageResult, ResolveError};
use crate::models::{Candidate, EntityStatus, Identifier, SearchResult};
use crate::pages::{DocumentPickerPage, PageContext};

pub(crate) const RESULTS_TABLE: &str = "table.data";
const NO_MATCH_BANNER: &str = "font.sameasbody";
const NO_MATCH_TEXT: &str = "NO MATCHING RECORD FOUND";

const COL_NUMBER: usize = 1;
const COL_NAME: usize = 2;
const COL_STATUS: usize = 5;

/// 从结果表格的行中提取候选实体
///
/// 单元格不足的行（表头、分隔行）以及注册编号为空的行会被跳过。
pub fn parse_candidates(rows: &[Vec<String>]) -> Vec<Candidate> {
    rows.iter()
        .enumerate()
        .filter(|(_, cells)| cells.len() > COL_STATUS)
        .filter(|(_, cells)| {
            let number = cells[COL_NUMBER].trim();
            !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
        })
        .map(|(row, cells)| Candidate {
            registry_number: cells[COL_NUMBER].trim().to_string(),
            name: cells[COL_NAME].trim().to_string(),
            status: EntityStatus::parse(&cells[COL_STATUS]),
            row,
        })
        .collect()
}

/// 在搜索结果中确定唯一的实体
///
/// 规则：
/// 1. 没有候选 → `NotFound`
/// 2. 名称（忽略大小写）或注册编号完全相同的候选为精确匹配
/// 3. 没有精确匹配时，仅当只有一个候选才接受它，否则 `Ambiguous`
/// 4. 在上一步的候选中优先取存续公司：恰好一个则接受，
///    多个则 `Ambiguous`，一个都没有则 `Dissolved`
pub fn resolve(identifier: &Identifier, result: &SearchResult) -> Result<Candidate, ResolveError> {
    if result.is_empty() {
        return Err(ResolveError::NotFound);
    }

    let exact: Vec<&Candidate> = result
        .candidates
        .iter()
        .filter(|c| identifier.matches_name(&c.name) || identifier.matches_number(&c.registry_number))
        .collect();

    let pool = if !exact.is_empty() {
        exact
    } else if result.len() == 1 {
        result.candidates.iter().collect()
    } else {
        return Err(ResolveError::Ambiguous(result.candidates.clone()));
    };

    let live: Vec<&Candidate> = pool.iter().copied().filter(|c| c.status.is_live()).collect();
    match live.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(ResolveError::Dissolved(pool[0].clone())),
        many => Err(ResolveError::Ambiguous(
            many.iter().map(|c| (*c).clone()).collect(),
        )),
    }
}

pub struct ResultListPage<'a> {
    cx: PageContext<'a>,
}

impl<'a> ResultListPage<'a> {
    pub fn new(cx: PageContext<'a>) -> Self {
        Self { cx }
    }

    pub fn context(&self) -> PageContext<'a> {
        self.cx
    }

    /// 读取结果列表；出现 "没有匹配记录" 提示时返回空结果
    pub async fn candidates(&self) -> PageResult<SearchResult> {
        let session = self.cx.session;
        let either = format!("{}, {}", RESULTS_TABLE, NO_MATCH_BANNER);
        session.wait_for(&either, self.cx.timeouts.results).await?;

        if session.has_text(NO_MATCH_BANNER, NO_MATCH_TEXT).await? {
            debug!("搜索没有匹配记录");
            return Ok(SearchResult::empty());
        }

        let rows = session.table_rows(RESULTS_TABLE).await?;
        let candidates = parse_candidates(&rows);
        debug!("结果列表共 {} 个候选", candidates.len());
        Ok(SearchResult::new(candidates))
    }

    /// 打开候选实体的公司资料页，再进入文件索引
    pub async fn open(&self, entity: &Candidate) -> PageResult<DocumentPickerPage<'a>> {
        let session = self.cx.session;
        session.wait_for(RESULTS_TABLE, self.cx.timeouts.page).await?;
        session
            .click_cell_link(RESULTS_TABLE, entity.row, COL_NAME)
            .await
            .map_err(|e| match e {
                PageError::Navigation(msg) => {
                    PageError::Navigation(format!("无法打开 {}: {}", entity, msg))
                }
                other => other,
            })?;

        let picker = DocumentPickerPage::new(self.cx);
        picker.proceed_from_company_info().await?;
        Ok(picker)
    }
}
