use anyhow::Result;
use clap::Parser;

use icris_automation::cli::Cli;
use icris_automation::config::Config;
use icris_automation::models::load_identifiers;
use icris_automation::orchestrator::App;
use icris_automation::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = cli.apply(Config::load(cli.config.as_deref())?);

    // 初始化日志
    logging::init(config.verbose_logging);

    let spec = cli.request_spec()?;
    let identifiers = load_identifiers(&cli.input).await?;

    // 初始化并运行应用
    let _report = App::initialize(config, spec, cli.run_options())
        .await?
        .run(identifiers)
        .await?;

    Ok(())
}
