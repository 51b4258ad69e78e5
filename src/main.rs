use anyhow::Result;
use pagedeleted_stats::bot::Bot;
use pagedeleted_stats::command_line::CommandLine;
use pagedeleted_stats::config::BotConfig;
use pagedeleted_stats::discovery::PageDiscovery;
use pagedeleted_stats::failure_log::FailureLog;
use pagedeleted_stats::publish::{Publisher, StdoutPublisher, WikiPublisher};
use pagedeleted_stats::rate_limit::RateLimit;
use pagedeleted_stats::sparql::{QueryExecutor, WdqsEndpoint};
use pagedeleted_stats::template::TemplateStore;
use tracing_subscriber::EnvFilter;

fn publisher(config: &BotConfig, dry_run: bool) -> Result<Box<dyn Publisher>> {
    if dry_run {
        return Ok(Box::new(StdoutPublisher));
    }
    let (user, password) = config.credentials()?;
    Ok(Box::new(WikiPublisher::new(
        &config.api_url(),
        &config.report_page(),
        &config.edit_summary(),
        &user,
        &password,
    )))
}

async fn run(command_line: CommandLine) -> Result<()> {
    let config_path = match command_line.config {
        Some(path) => path,
        None => BotConfig::default_path()?,
    };
    let config = BotConfig::load(&config_path)?;

    let endpoint = WdqsEndpoint::new(
        &config.sparql_url(),
        &config.user_agent(),
        config.query_timeout(),
    )?;
    let executor = QueryExecutor::new(
        endpoint,
        RateLimit::new(config.query_delay()),
        FailureLog::new(&config.failure_log_path()),
    );
    let bot = Bot::new(
        executor,
        TemplateStore::new(&config.template_dir()),
        publisher(&config, command_line.dry_run)?,
    );

    let discovery = PageDiscovery::new(
        &config.api_url(),
        config.page_namespace(),
        &config.page_prefix(),
    );
    let text = bot
        .run_discovered(command_line.section, discovery.pages())
        .await?;
    if command_line.section.is_some() {
        println!("{text}");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let command_line = CommandLine::parse(std::env::args().skip(1))?;
    if let Err(e) = run(command_line).await {
        tracing::error!("{e:#}");
        return Err(e.into());
    }
    Ok(())
}
