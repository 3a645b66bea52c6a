//! 命令行参数

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::ConfigError;
use crate::models::{DocumentType, RequestSpec};
use crate::orchestrator::RunOptions;

#[derive(Parser, Debug)]
#[command(
    name = "icris",
    version,
    about = "在香港公司注册处网上查册中心批量把公司文件加入购物车",
    after_help = "Examples:\n  icris companies.txt \"Annual Return\" 3\n  icris 1234567 NAR1 --visible\n  icris companies.txt \"Annual Return\" 1 --purchase --export result.json\n  icris Companies.docx NAR1 2 --excel status.xlsx"
)]
pub struct Cli {
    /// 标识符列表文件（每行或 .docx 每段一个公司名称或注册编号），或单个标识符
    pub input: String,

    /// 文件类型名称或表格代号，例如 "Annual Return" / NAR1
    pub document_type: DocumentType,

    /// 每个公司购买的份数
    #[arg(default_value_t = 1)]
    pub quantity: u32,

    /// 使用可见的浏览器窗口
    #[arg(short = 'b', long)]
    pub visible: bool,

    /// 连接到已打开的浏览器调试端口，而不是自行启动
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// 每批处理完后结账（只推进到扣款确认页面）
    #[arg(short, long)]
    pub purchase: bool,

    /// 处理完成后保持登录
    #[arg(short = 'l', long)]
    pub stay_logged_in: bool,

    /// 处理完成后清空购物车
    #[arg(short = 'd', long)]
    pub clear_cart: bool,

    /// 把结果导出为 JSON 文件
    #[arg(short, long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// 把结果导出为 Excel 文件（成功 / 失败按颜色区分）
    #[arg(short = 'x', long, value_name = "FILE")]
    pub excel: Option<PathBuf>,

    /// TOML 配置文件
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 命令行参数覆盖配置
    pub fn apply(&self, mut config: Config) -> Config {
        if self.visible {
            config.headless = false;
        }
        if let Some(port) = self.port {
            config.browser_debug_port = Some(port);
        }
        if self.verbose {
            config.verbose_logging = true;
        }
        config
    }

    pub fn request_spec(&self) -> Result<RequestSpec, ConfigError> {
        RequestSpec::new(self.document_type, self.quantity)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            purchase: self.purchase,
            clear_cart: self.clear_cart,
            logout: !self.stay_logged_in,
            export: self.export.clone(),
            excel: self.excel.clone(),
        }
    }
}
