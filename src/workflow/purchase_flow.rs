//! 单个标识符的购买流程 - 流程层
//!
//! 状态机：
//!
//! ```text
//! Searching → Disambiguating → Picking → AddingToCart → Finished
//!     └────────────┴──────────────┴───────────┴──────→ Finished(失败)
//! ```
//!
//! 涉及会话的每个状态转换在瞬时（导航）错误时重试，最多 `max_retries` 次；
//! 其余错误直接结束该标识符的流程。流程总是产生且只产生一个 `Outcome`。

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{PageError, PageResult, ResolveError};
use crate::models::{
    Candidate, FailureReason, Outcome, RequestSpec, SearchResult, Stage,
};
use crate::pages::{resolve, Navigator, PickerHandle};
use crate::workflow::IdentifierCtx;

/// 瞬时错误的重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 首次尝试之外的最大重试次数
    pub max_retries: u32,
    /// 两次尝试之间的等待
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_millis(500),
        }
    }
}

enum Step {
    Searching,
    Disambiguating(SearchResult),
    Picking(Candidate),
    AddingToCart(Candidate, PickerHandle),
    Finished(Outcome),
}

/// 购买流程
///
/// - 不持有会话，只通过 `Navigator` 操作页面
/// - 每次 `run` 的状态在返回时丢弃
pub struct PurchaseFlow<'a, N: Navigator + ?Sized> {
    navigator: &'a N,
    spec: &'a RequestSpec,
    retry: RetryPolicy,
}

impl<'a, N: Navigator + ?Sized> PurchaseFlow<'a, N> {
    pub fn new(navigator: &'a N, spec: &'a RequestSpec, retry: RetryPolicy) -> Self {
        Self {
            navigator,
            spec,
            retry,
        }
    }

    pub async fn run(&self, ctx: &IdentifierCtx) -> Outcome {
        let mut step = Step::Searching;
        loop {
            step = match step {
                Step::Searching => {
                    info!("{} 🔍 搜索中...", ctx);
                    let searched = self
                        .attempt(Stage::Searching, ctx, || {
                            self.navigator.search(&ctx.identifier)
                        })
                        .await;
                    match searched {
                        Ok(result) => Step::Disambiguating(result),
                        Err(outcome) => Step::Finished(outcome),
                    }
                }

                Step::Disambiguating(result) => match resolve(&ctx.identifier, &result) {
                    Ok(entity) => {
                        info!("{} ✓ 确定公司: {}", ctx, entity);
                        Step::Picking(entity)
                    }
                    Err(e) => {
                        info!("{} {}", ctx, e);
                        Step::Finished(e.into())
                    }
                },

                Step::Picking(entity) => {
                    let picked = self
                        .attempt(Stage::Picking, ctx, || {
                            self.navigator.choose(&entity, self.spec)
                        })
                        .await;
                    match picked {
                        Ok(handle) => {
                            info!(
                                "{} 📄 找到 {} 份 {}",
                                ctx,
                                handle.documents.len(),
                                handle.document_type
                            );
                            Step::AddingToCart(entity, handle)
                        }
                        Err(outcome) => Step::Finished(outcome),
                    }
                }

                Step::AddingToCart(entity, handle) => {
                    let carted = self
                        .attempt(Stage::AddingToCart, ctx, || {
                            self.navigator.add_to_cart(&handle, self.spec.quantity)
                        })
                        .await;
                    match carted {
                        Ok(cart_reference) => Step::Finished(Outcome::Success {
                            registry_number: entity.registry_number,
                            cart_reference,
                        }),
                        Err(outcome) => Step::Finished(outcome),
                    }
                }

                Step::Finished(outcome) => return outcome,
            };
        }
    }

    /// 执行一次状态转换，瞬时错误按策略重试
    async fn attempt<T, F, Fut>(&self, stage: Stage, ctx: &IdentifierCtx, mut op: F) -> Result<T, Outcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PageResult<T>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempts <= self.retry.max_retries => {
                    warn!(
                        "{} ⚠️ {}阶段第 {} 次尝试失败，{:?} 后重试: {}",
                        ctx, stage, attempts, self.retry.delay, e
                    );
                    sleep(self.retry.delay).await;
                }
                Err(e) => {
                    warn!("{} ❌ {}阶段失败: {}", ctx, stage, e);
                    return Err(failure(stage, attempts, e));
                }
            }
        }
    }
}

fn failure(stage: Stage, attempts: u32, err: PageError) -> Outcome {
    let reason = match err {
        PageError::Navigation(last_error) => FailureReason::Transient {
            stage,
            attempts,
            last_error,
        },
        PageError::UnavailableDocument(msg) => FailureReason::UnavailableDocument(msg),
        PageError::Cart(msg) => FailureReason::Cart(msg),
        PageError::SessionLost(_) => FailureReason::SessionLost,
    };
    Outcome::Failed(reason)
}

impl From<ResolveError> for Outcome {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound => Outcome::NotFound,
            ResolveError::Ambiguous(candidates) => Outcome::Ambiguous { candidates },
            ResolveError::Dissolved(entity) => Outcome::Failed(FailureReason::Dissolved {
                registry_number: entity.registry_number,
                name: entity.name,
            }),
        }
    }
}
