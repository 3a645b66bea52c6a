//! 批量驱动器 - 编排层
//!
//! 在同一个会话上严格按顺序处理标识符，每个标识符产生一条 `StatusRecord`。
//! 单个标识符失败不影响后续标识符；会话丢失时其余未开始的标识符全部记为
//! `Failed(SessionLost)`，不再尝试任何导航。
//!
//! `run_chunks` 把标识符分成 `batch_size` 一批，每批之后可选结账；
//! 结账失败只记录日志，不改变已记录的结果。

use tracing::{error, info, warn};

use crate::models::{Identifier, OutcomeKind, RequestSpec, StatusRecord};
use crate::pages::{CartCheckout, Navigator};
use crate::utils::logging::{log_batch_complete, log_batch_start};
use crate::workflow::{IdentifierCtx, PurchaseFlow, RetryPolicy};

/// 一次批量运行的结果
#[derive(Debug, Clone)]
pub struct BatchRun {
    /// 与输入顺序一致，一个标识符一条
    pub records: Vec<StatusRecord>,
    pub session_lost: bool,
}

impl BatchRun {
    pub fn success_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.kind() == OutcomeKind::Success)
            .count()
    }
}

pub struct BatchDriver<'a, N: Navigator + ?Sized> {
    navigator: &'a N,
    spec: &'a RequestSpec,
    retry: RetryPolicy,
}

impl<'a, N: Navigator + ?Sized> BatchDriver<'a, N> {
    pub fn new(navigator: &'a N, spec: &'a RequestSpec, retry: RetryPolicy) -> Self {
        Self {
            navigator,
            spec,
            retry,
        }
    }

    pub async fn run(&self, identifiers: &[Identifier]) -> BatchRun {
        self.run_chunk(identifiers, 0, identifiers.len()).await
    }

    /// 分批处理全部标识符
    ///
    /// 传入 `checkout` 时，每批有文件加入购物车后结账一次。
    /// 某批中会话丢失后，其余批次的标识符全部记为 `SessionLost`。
    pub async fn run_chunks(
        &self,
        identifiers: &[Identifier],
        batch_size: usize,
        checkout: Option<&dyn CartCheckout>,
    ) -> BatchRun {
        let batch_size = batch_size.max(1);
        let total = identifiers.len();
        let total_batches = total.div_ceil(batch_size);
        let mut records = Vec::with_capacity(total);

        for (batch_idx, chunk) in identifiers.chunks(batch_size).enumerate() {
            let start = batch_idx * batch_size;
            log_batch_start(batch_idx + 1, total_batches, start + 1, start + chunk.len(), total);

            let run = self.run_chunk(chunk, start, total).await;
            let carted = run.success_count();
            log_batch_complete(batch_idx + 1, carted, chunk.len());
            records.extend(run.records);

            if run.session_lost {
                records.extend(abandon(&identifiers[start + chunk.len()..]));
                return BatchRun {
                    records,
                    session_lost: true,
                };
            }

            if let Some(cashier) = checkout.filter(|_| carted > 0) {
                match cashier.checkout(batch_size).await {
                    Ok(selected) => info!("💳 第 {} 批结账: {} 份文件", batch_idx + 1, selected),
                    Err(e) => error!("第 {} 批结账失败: {}", batch_idx + 1, e),
                }
            }
        }

        BatchRun {
            records,
            session_lost: false,
        }
    }

    /// 处理整批中的一段，`offset` 与 `total` 只用于进度显示
    pub async fn run_chunk(&self, identifiers: &[Identifier], offset: usize, total: usize) -> BatchRun {
        let flow = PurchaseFlow::new(self.navigator, self.spec, self.retry);
        let mut records = Vec::with_capacity(identifiers.len());
        let mut session_lost = false;

        for (idx, identifier) in identifiers.iter().enumerate() {
            if session_lost {
                records.push(StatusRecord::session_lost(identifier.clone()));
                continue;
            }

            if !self.navigator.session_alive().await {
                error!("💥 浏览器会话已丢失，剩余 {} 个标识符不再处理", identifiers.len() - idx);
                session_lost = true;
                records.push(StatusRecord::session_lost(identifier.clone()));
                continue;
            }

            let ctx = IdentifierCtx::new(identifier.clone(), offset + idx + 1, total);
            let outcome = flow.run(&ctx).await;

            match outcome.kind() {
                OutcomeKind::Success => info!("{} ✅ {}", ctx, outcome.detail()),
                _ => warn!("{} {}: {}", ctx, outcome.kind(), outcome.detail()),
            }

            if outcome.is_session_lost() {
                error!("{} 💥 处理过程中会话丢失", ctx);
                session_lost = true;
            }
            records.push(StatusRecord::new(identifier.clone(), outcome));
        }

        BatchRun {
            records,
            session_lost,
        }
    }
}

/// 会话丢失后，为尚未开始的标识符生成记录
pub fn abandon(identifiers: &[Identifier]) -> Vec<StatusRecord> {
    identifiers
        .iter()
        .cloned()
        .map(StatusRecord::session_lost)
        .collect()
}
