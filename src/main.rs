use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use tududi_inbox::config::InboxConfig;
use tududi_inbox::inbox::{InboxProcessingService, InboxSource};
use tududi_inbox::rules::AuxContext;

#[derive(Debug, Parser)]
#[command(name = "tududi-inbox")]
#[command(about = "Suggest how to file captured inbox items")]
struct Cli {
    /// Project the item already belongs to
    #[arg(long, value_name = "NAME")]
    project: Option<String>,

    /// The item belongs to no project
    #[arg(long, conflicts_with = "project")]
    no_project: bool,

    /// Item content. Without it, one item is read per line of stdin
    #[arg(value_parser = non_blank)]
    content: Vec<String>,
}

impl Cli {
    fn aux(&self) -> AuxContext {
        match (&self.project, self.no_project) {
            (Some(name), _) => AuxContext::with_project(name.clone()),
            (None, true) => AuxContext::without_project(),
            (None, false) => AuxContext::default(),
        }
    }
}

fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("content must not be blank".to_string())
    } else {
        Ok(value.to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries one suggestion per line.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = InboxConfig::from_env().context("reading configuration")?;
    let service = InboxProcessingService::from_config(&config).context("building rule registry")?;
    tracing::info!(
        rules = service.evaluator().registry().len(),
        builtin = config.include_builtin_rules,
        rules_path = ?config.rules_path,
        "Inbox classifier ready"
    );

    let aux = cli.aux();

    if !cli.content.is_empty() {
        classify_and_print(&service, &cli.content.join(" "), &aux)?;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        classify_and_print(&service, line, &aux)?;
    }

    Ok(())
}

fn classify_and_print(
    service: &InboxProcessingService,
    content: &str,
    aux: &AuxContext,
) -> anyhow::Result<()> {
    let (_, suggestion) = service.capture(content, InboxSource::Api, aux)?;
    println!("{}", serde_json::to_string(&suggestion)?);
    Ok(())
}
