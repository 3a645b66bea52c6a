use anyhow::{Context, Result};
/// 日志工具模块
///
/// 提供日志初始化、运行日志文件与进度输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化 tracing
///
/// 优先使用 `RUST_LOG`，否则 `verbose` 时为 debug，默认 info。
/// 重复调用不会报错（测试中常见）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

/// 初始化运行日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n文件购买日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法创建日志文件: {}", log_file_path))?;
    Ok(())
}

/// 向运行日志文件追加内容
pub fn append_log(log_file_path: &str, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `document_type`: 文件类型
/// - `quantity`: 每个公司购买份数
/// - `batch_size`: 每批标识符数量
pub fn log_startup(document_type: &str, quantity: u32, batch_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 公司注册处文件购买");
    info!("📄 文件类型: {} × {}", document_type, quantity);
    info!("📊 每批数量: {}", batch_size);
    info!("{}", "=".repeat(60));
}

/// 记录标识符加载信息
pub fn log_identifiers_loaded(total: usize, batch_size: usize) {
    info!("✓ 共 {} 个标识符", total);
    info!("📋 将以每批 {} 个的方式处理", batch_size);
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始序号
/// - `end`: 结束序号
/// - `total`: 标识符总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批标识符: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 未成功: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_characters() {
        assert_eq!(truncate_text("公司注册处", 2), "公司...");
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn log_file_header_then_append() {
        let path = std::env::temp_dir().join(format!("icris-log-{}.txt", std::process::id()));
        let path = path.to_str().unwrap().to_string();

        init_log_file(&path).unwrap();
        append_log(&path, "row\n").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("文件购买日志"));
        assert!(content.ends_with("row\n"));
    }
}
