//! 应用生命周期 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：运行日志文件、建立并登录浏览器会话
//! 2. **处理**：交给 `BatchDriver` 分批处理，需要时每批结账
//! 3. **收尾**：清空购物车、登出
//! 4. **输出**：报告写出后再关闭浏览器；写出失败不影响关闭
//!
//! 唯一持有浏览器会话的模块。

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::ChromeSession;
use crate::models::{Identifier, OutcomeKind, RequestSpec};
use crate::orchestrator::batch_driver::BatchDriver;
use crate::pages::{CartCheckout, Registry};
use crate::report::Report;
use crate::utils::logging::{
    append_log, init_log_file, log_identifiers_loaded, log_startup, print_final_stats,
};

/// 本次运行的可选步骤
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// 每批处理完后结账
    pub purchase: bool,
    /// 全部处理完后清空购物车
    pub clear_cart: bool,
    /// 全部处理完后登出
    pub logout: bool,
    /// JSON 结果文件
    pub export: Option<PathBuf>,
    /// Excel 结果文件
    pub excel: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            purchase: false,
            clear_cart: false,
            logout: true,
            export: None,
            excel: None,
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    spec: RequestSpec,
    options: RunOptions,
    registry: Registry<ChromeSession>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config, spec: RequestSpec, options: RunOptions) -> Result<Self> {
        config.validate()?;

        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(spec.document_type.label(), spec.quantity, config.batch_size);

        let session = browser::open_session(&config).await?;
        let registry = Registry::new(session, config.timeouts());

        Ok(Self {
            config,
            spec,
            options,
            registry,
        })
    }

    /// 处理全部标识符并返回报告；浏览器在返回前关闭
    pub async fn run(self, identifiers: Vec<Identifier>) -> Result<Report> {
        if identifiers.is_empty() {
            warn!("⚠️ 没有需要处理的标识符，程序结束");
        }
        log_identifiers_loaded(identifiers.len(), self.config.batch_size);

        let checkout = self
            .options
            .purchase
            .then_some(&self.registry as &dyn CartCheckout);
        let run = BatchDriver::new(&self.registry, &self.spec, self.config.retry_policy())
            .run_chunks(&identifiers, self.config.batch_size, checkout)
            .await;

        if run.session_lost {
            error!("💥 浏览器会话已丢失，跳过收尾步骤");
        } else {
            self.finish().await;
        }

        let report = Report::build(&run.records);
        let written = write_outputs(&report, &self.config.output_log_file, &self.options).await;

        let success = report.count(OutcomeKind::Success);
        print_final_stats(
            success,
            report.len() - success,
            report.len(),
            &self.config.output_log_file,
        );

        if let Err(e) = self.registry.into_session().shutdown().await {
            warn!("关闭浏览器失败: {}", e);
        }

        written?;
        Ok(report)
    }

    /// 清空购物车与登出，失败只记录日志
    async fn finish(&self) {
        if self.options.clear_cart {
            if let Err(e) = self.registry.clear_cart().await {
                warn!("清空购物车失败: {}", e);
            }
        }
        if self.options.logout {
            match self.registry.logout().await {
                Ok(()) => info!("👋 已登出"),
                Err(e) => warn!("登出失败: {}", e),
            }
        }
    }

}

/// 打印报告、追加到运行日志并按需导出
///
/// 各项互不影响：某项失败时其余各项照常写出，返回第一个错误。
pub async fn write_outputs(report: &Report, log_file: &str, options: &RunOptions) -> Result<()> {
    println!("\n{}", report);

    let mut failures = Vec::new();

    if let Err(e) = append_log(log_file, &report.to_string()) {
        failures.push(e);
    }

    if let Some(path) = &options.export {
        match report.to_json() {
            Ok(json) => {
                if let Err(e) = write_file(path, json.into_bytes()).await {
                    failures.push(e);
                }
            }
            Err(e) => failures.push(e.into()),
        }
    }

    if let Some(path) = &options.excel {
        match report.to_xlsx() {
            Ok(bytes) => {
                if let Err(e) = write_file(path, bytes).await {
                    failures.push(e);
                }
            }
            Err(e) => failures.push(e.into()),
        }
    }

    for e in &failures {
        error!("写出结果失败: {:#}", e);
    }
    match failures.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn write_file(path: &Path, bytes: Vec<u8>) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("无法写入结果文件: {}", path.display()))?;
    info!("📁 结果已导出至: {}", path.display());
    Ok(())
}
