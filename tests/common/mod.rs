//! 测试用的脚本化 Navigator
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use icris_automation::models::{
    CartReference, Candidate, EntityStatus, Identifier, RequestSpec, SearchResult,
};
use icris_automation::pages::{CartCheckout, DocumentRow, Navigator, PickerHandle};
use icris_automation::{PageError, PageResult};

#[derive(Default)]
struct State {
    results: HashMap<String, Vec<Candidate>>,
    documents: HashMap<String, usize>,
    search_failures: HashMap<String, VecDeque<PageError>>,
    choose_failures: HashMap<String, VecDeque<PageError>>,
    add_failures: HashMap<String, VecDeque<PageError>>,
    lose_session_at: Option<usize>,
    alive_checks: usize,
    lost: bool,
    checkout_fails: bool,
    calls: Vec<String>,
}

#[derive(Default)]
pub struct FakeNavigator {
    state: Mutex<State>,
}

pub fn live(number: &str, name: &str) -> Candidate {
    Candidate {
        registry_number: number.to_string(),
        name: name.to_string(),
        status: EntityStatus::Live,
        row: 1,
    }
}

pub fn dissolved(number: &str, name: &str) -> Candidate {
    Candidate {
        status: EntityStatus::Inactive("Dissolved".to_string()),
        ..live(number, name)
    }
}

pub fn ids(raw: &[&str]) -> Vec<Identifier> {
    raw.iter().map(|r| Identifier::parse(r).unwrap()).collect()
}

impl FakeNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 搜索 `identifier` 时返回的候选
    pub fn with_search(self, identifier: &str, candidates: Vec<Candidate>) -> Self {
        self.state
            .lock()
            .unwrap()
            .results
            .insert(identifier.to_string(), candidates);
        self
    }

    /// 公司文件索引中所请求类型的文件份数
    pub fn with_documents(self, registry_number: &str, count: usize) -> Self {
        self.state
            .lock()
            .unwrap()
            .documents
            .insert(registry_number.to_string(), count);
        self
    }

    /// 成功之前先依次返回这些错误
    pub fn fail_search(self, identifier: &str, errors: Vec<PageError>) -> Self {
        self.state
            .lock()
            .unwrap()
            .search_failures
            .insert(identifier.to_string(), errors.into());
        self
    }

    pub fn fail_choose(self, registry_number: &str, errors: Vec<PageError>) -> Self {
        self.state
            .lock()
            .unwrap()
            .choose_failures
            .insert(registry_number.to_string(), errors.into());
        self
    }

    pub fn fail_add(self, registry_number: &str, errors: Vec<PageError>) -> Self {
        self.state
            .lock()
            .unwrap()
            .add_failures
            .insert(registry_number.to_string(), errors.into());
        self
    }

    /// 第 `check` 次（从 1 开始）存活检查起会话丢失
    pub fn lose_session_at(self, check: usize) -> Self {
        self.state.lock().unwrap().lose_session_at = Some(check);
        self
    }

    /// 结账总是失败
    pub fn fail_checkout(self) -> Self {
        self.state.lock().unwrap().checkout_fails = true;
        self
    }

    /// 已发生的页面操作，例如 `search:Company X`
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn enter(
        &self,
        call: String,
        key: &str,
        pick: impl FnOnce(&mut State) -> &mut HashMap<String, VecDeque<PageError>>,
    ) -> PageResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.lost {
            return Err(PageError::SessionLost("fake session closed".into()));
        }
        state.calls.push(call);
        let failure = pick(&mut *state).get_mut(key).and_then(|q| q.pop_front());
        if let Some(err) = failure {
            if err.is_session_lost() {
                state.lost = true;
            }
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl Navigator for FakeNavigator {
    async fn search(&self, identifier: &Identifier) -> PageResult<SearchResult> {
        let key = identifier.as_str();
        self.enter(format!("search:{}", key), key, |s| &mut s.search_failures)?;
        let state = self.state.lock().unwrap();
        Ok(SearchResult::new(
            state.results.get(key).cloned().unwrap_or_default(),
        ))
    }

    async fn choose(&self, entity: &Candidate, spec: &RequestSpec) -> PageResult<PickerHandle> {
        let key = entity.registry_number.as_str();
        self.enter(format!("choose:{}", key), key, |s| &mut s.choose_failures)?;
        let available = self
            .state
            .lock()
            .unwrap()
            .documents
            .get(key)
            .copied()
            .unwrap_or(0);
        if available == 0 {
            return Err(PageError::UnavailableDocument(format!(
                "{} 没有 {}",
                entity, spec.document_type
            )));
        }
        let documents = (0..available.min(spec.quantity as usize))
            .map(|i| DocumentRow {
                page: 0,
                row: i + 2,
                name: format!("{} #{}", spec.document_type, i + 1),
            })
            .collect();
        Ok(PickerHandle {
            registry_number: entity.registry_number.clone(),
            document_type: spec.document_type,
            documents,
            page_count: 1,
        })
    }

    async fn add_to_cart(&self, handle: &PickerHandle, quantity: u32) -> PageResult<CartReference> {
        let key = handle.registry_number.as_str();
        self.enter(format!("add:{}", key), key, |s| &mut s.add_failures)?;
        Ok(CartReference {
            registry_number: handle.registry_number.clone(),
            items: handle
                .documents
                .iter()
                .take(quantity as usize)
                .map(|d| d.name.clone())
                .collect(),
            requested: quantity,
        })
    }

    async fn session_alive(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        state.alive_checks += 1;
        if let Some(at) = state.lose_session_at {
            if state.alive_checks >= at {
                state.lost = true;
            }
        }
        !state.lost
    }
}

#[async_trait]
impl CartCheckout for FakeNavigator {
    async fn checkout(&self, batch_size: usize) -> PageResult<usize> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("checkout:{}", batch_size));
        if state.checkout_fails {
            return Err(PageError::Navigation("找不到 Save and Checkout".into()));
        }
        let carted = state.calls.iter().filter(|c| c.starts_with("add:")).count();
        Ok(carted.min(batch_size))
    }
}
