//! ytanalytics command line
//!
//! Validates report queries locally, authorises with Google and saves
//! the results.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ytanalytics::query::parse_date;
use ytanalytics::{
    AnalyticsClient, Config, ExportFormat, GroupItemQuery, GroupQuery, OAuth2Client, Registry,
    ReportOptions, ReportQuery, Secrets,
};

#[derive(Parser, Debug)]
#[command(name = "ytanalytics")]
#[command(author, version, about = "YouTube Analytics reporting client", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Ignore saved tokens and run the browser flow again
    #[arg(long)]
    reauthorise: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrieve a report
    Report(ReportArgs),
    /// List analytics groups
    Groups {
        /// Group IDs; the channel's own groups when omitted
        #[arg(long = "id", value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(long)]
        page_token: Option<String>,
    },
    /// List the items in a group
    GroupItems { group_id: String },
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[arg(long, value_delimiter = ',')]
    dimensions: Vec<String>,

    /// Filter as key==value; may be repeated
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    #[arg(long, value_delimiter = ',')]
    metrics: Vec<String>,

    /// Sort keys; prefix with '-' for descending order
    #[arg(long = "sort", value_delimiter = ',', allow_hyphen_values = true)]
    sort_options: Vec<String>,

    /// 0 for unlimited results
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    max_results: i64,

    #[arg(long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    #[arg(long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,

    #[arg(long, default_value = "USD")]
    currency: String,

    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    start_index: i64,

    #[arg(long)]
    include_historical_data: bool,

    /// Print the request URL without sending it
    #[arg(long)]
    dry_run: bool,

    /// Save the report here instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, default_value = "json")]
    format: ExportFormat,

    #[arg(long)]
    overwrite: bool,
}

impl ReportArgs {
    fn options(&self) -> ReportOptions {
        ReportOptions {
            dimensions: self.dimensions.clone(),
            filters: self.filters.iter().cloned().collect::<BTreeMap<_, _>>(),
            metrics: self.metrics.clone(),
            sort_options: self.sort_options.clone(),
            max_results: self.max_results,
            start_date: self.start_date,
            end_date: self.end_date,
            currency: self.currency.clone(),
            start_index: self.start_index,
            include_historical_data: self.include_historical_data,
        }
    }
}

fn parse_filter(value: &str) -> Result<(String, String), String> {
    match value.split_once("==") {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => Err(format!("expected key==value, got '{}'", value)),
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn connect(config: &Config, reauthorise: bool) -> Result<AnalyticsClient> {
    let secrets = Secrets::load_from(&config.secrets_file)
        .with_context(|| format!("failed to load secrets from {}", config.secrets_file))?;
    let oauth = OAuth2Client::new(config, secrets)?;
    oauth.authorise(reauthorise).await?;
    Ok(AnalyticsClient::new(config.clone(), Arc::new(oauth))?)
}

async fn run_report(config: &Config, reauthorise: bool, args: &ReportArgs) -> Result<()> {
    let mut query = ReportQuery::new(args.options());

    if args.dry_run {
        let rtype = query.validate(Registry::global(), config.scopes())?;
        info!("Report type: {}", rtype.name());
        println!("{}", query.build_url_at(&config.reports_url()));
        return Ok(());
    }

    let client = connect(config, reauthorise).await?;
    let report = client.retrieve_report(query).await?;
    let (rows, columns) = report.shape();
    info!(
        "Retrieved '{}' report with {} rows and {} columns",
        report.report_type(),
        rows,
        columns
    );

    match &args.output {
        Some(path) => {
            report.export(path, args.format, args.overwrite)?;
        }
        None => println!("{}", serde_json::to_string_pretty(report.resource())?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;
    init_tracing(cli.debug || config.debug);

    match &cli.command {
        Command::Report(args) => run_report(&config, cli.reauthorise, args).await?,
        Command::Groups { ids, page_token } => {
            let client = connect(&config, cli.reauthorise).await?;
            let groups = client
                .fetch_groups(&GroupQuery::new(ids.clone(), page_token.clone()))
                .await?;
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Command::GroupItems { group_id } => {
            if group_id.is_empty() {
                bail!("a group ID is required");
            }
            let client = connect(&config, cli.reauthorise).await?;
            let items = client
                .fetch_group_items(&GroupItemQuery::new(group_id.clone()))
                .await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }

    Ok(())
}
