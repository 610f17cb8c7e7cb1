use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use biops::{
    client_for, diff_queries, recovery_command, BiopsError, Datasource, DiffTag, FieldDiff,
    ListFilter, Provider, ProviderKind, ProviderStore, Result, UpdateRequest, NO_CHANGE,
};
use tabled::{settings::Style, Table, Tabled};

#[derive(Parser)]
#[command(name = "biops")]
#[command(about = "A CLI tool for BI operations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the providers file
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Provider commands
    Provider {
        #[command(subcommand)]
        action: ProviderAction,
    },

    /// Datasource commands
    Datasource {
        #[command(subcommand)]
        action: DatasourceAction,
    },

    /// Query commands
    Query {
        #[command(subcommand)]
        action: QueryAction,
    },
}

#[derive(Subcommand)]
enum ProviderAction {
    /// List all providers
    List,

    /// Add a provider and make it the active one
    Add {
        /// Name of the provider
        #[arg(long)]
        name: Option<String>,

        /// Type of the provider (redash or metabase)
        #[arg(long = "type")]
        kind: Option<ProviderKind>,

        /// Base URL of the provider, without scheme
        #[arg(long)]
        url: Option<String>,

        /// Credential for the provider
        #[arg(long)]
        credential: Option<String>,
    },

    /// Delete a provider
    Delete { name: String },

    /// Switch the active provider
    Use { name: String },
}

#[derive(Subcommand)]
enum DatasourceAction {
    /// List datasources of the active provider
    List,
}

#[derive(Subcommand)]
enum QueryAction {
    /// List saved queries of the active provider
    List {
        /// Fetch every page, not just the first
        #[arg(long)]
        all: bool,

        /// Delay between page requests in milliseconds
        #[arg(long)]
        delay: Option<u64>,

        /// Keep only queries bound to this datasource id
        #[arg(long)]
        datasource: Option<String>,

        /// Keep only queries with this exact name
        #[arg(long)]
        name: Option<String>,

        /// Keep only queries whose name matches this regex
        #[arg(long)]
        name_regexp: Option<String>,

        /// Keep only queries whose SQL matches this regex
        #[arg(long)]
        query_regexp: Option<String>,
    },

    /// Update a saved query (dry-run unless --apply is given)
    Update {
        /// Query id
        id: String,

        /// Write the change remotely instead of only showing the diff
        #[arg(long)]
        apply: bool,

        /// Reassign the query to this datasource id
        #[arg(long)]
        data_source: Option<String>,

        /// Replace the SQL wholesale with this text
        #[arg(long)]
        query: Option<String>,

        /// Ordered find/replace regex pairs applied to the SQL
        #[arg(long, num_args = 2.., value_names = ["FIND", "REPLACE"])]
        query_replace: Option<Vec<String>>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("biops=debug,info")
    } else {
        EnvFilter::new("biops=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "✗ Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = ProviderStore::resolve(cli.file)?;

    match cli.command {
        Commands::Provider { action } => match action {
            ProviderAction::List => cmd_provider_list(&store),
            ProviderAction::Add {
                name,
                kind,
                url,
                credential,
            } => cmd_provider_add(&store, name, kind, url, credential),
            ProviderAction::Delete { name } => {
                store.delete(&name)?;
                println!("Deleted provider {}", name);
                Ok(())
            }
            ProviderAction::Use { name } => {
                store.use_provider(&name)?;
                println!("Using provider {}", name);
                Ok(())
            }
        },

        Commands::Datasource { action } => match action {
            DatasourceAction::List => cmd_datasource_list(&store).await,
        },

        Commands::Query { action } => match action {
            QueryAction::List {
                all,
                delay,
                datasource,
                name,
                name_regexp,
                query_regexp,
            } => {
                let filter = ListFilter {
                    all,
                    data_source: datasource,
                    name,
                    name_regexp,
                    query_regexp,
                    delay_ms: delay,
                };
                cmd_query_list(&store, &filter).await
            }
            QueryAction::Update {
                id,
                apply,
                data_source,
                query,
                query_replace,
            } => {
                let request = UpdateRequest {
                    apply,
                    data_source,
                    query,
                    query_replace,
                };
                cmd_query_update(&store, &id, &request).await
            }
        },
    }
}

fn cmd_provider_list(store: &ProviderStore) -> Result<()> {
    println!("All providers:");
    for provider in store.load()? {
        let marker = if provider.current { "*" } else { " " };
        println!("{} {} type: {}", marker, provider.name, provider.kind);
    }
    Ok(())
}

fn cmd_provider_add(
    store: &ProviderStore,
    name: Option<String>,
    kind: Option<ProviderKind>,
    url: Option<String>,
    credential: Option<String>,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => {
            let n = prompt("Name of the provider (default: provider)")?;
            if n.is_empty() {
                "provider".to_string()
            } else {
                n
            }
        }
    };
    let kind = match kind {
        Some(k) => k,
        None => prompt("Type of the provider (redash/metabase)")?.parse()?,
    };
    let url = match url {
        Some(u) => u,
        None => prompt("URL of the provider")?,
    };
    let credential = match credential {
        Some(c) => c,
        None => prompt("Credential for the provider")?,
    };

    store.add(Provider {
        name: name.clone(),
        kind,
        url,
        credential,
        current: true,
    })?;
    println!("Added provider {} of type {}", name, kind);
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    let mut editor =
        rustyline::DefaultEditor::new().map_err(|e| BiopsError::Configuration(e.to_string()))?;
    let line = editor
        .readline(&format!("{}: ", label))
        .map_err(|e| BiopsError::Configuration(e.to_string()))?;
    Ok(line.trim().to_string())
}

#[derive(Tabled)]
struct DatasourceRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    kind: String,
}

impl From<Datasource> for DatasourceRow {
    fn from(d: Datasource) -> Self {
        Self {
            id: d.id,
            name: d.name,
            kind: d.kind,
        }
    }
}

async fn cmd_datasource_list(store: &ProviderStore) -> Result<()> {
    let provider = store.current()?;
    let client = client_for(&provider)?;
    let datasources = client.list_datasources().await?;

    let rows: Vec<DatasourceRow> = datasources.into_iter().map(Into::into).collect();
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
    Ok(())
}

async fn cmd_query_list(store: &ProviderStore, filter: &ListFilter) -> Result<()> {
    let provider = store.current()?;
    info!("Listing queries on {}", provider.name);
    let client = client_for(&provider)?;
    let queries = client.list_queries(filter).await?;

    for query in &queries {
        println!("{}", query.id);
    }
    Ok(())
}

async fn cmd_query_update(store: &ProviderStore, id: &str, request: &UpdateRequest) -> Result<()> {
    let provider = store.current()?;
    let client = client_for(&provider)?;
    let (original, modified) = client.update_query(id, request).await?;

    let groups = diff_queries(&original, &modified);
    if groups.is_empty() {
        println!("{}", NO_CHANGE);
        return Ok(());
    }
    print_diff(&groups);

    if request.apply {
        println!("Applied. To revert, run:");
        println!("  biops {}", recovery_command(&modified, &original));
    } else {
        println!("Dry-run only. Re-run with --apply to write this change.");
    }
    Ok(())
}

fn print_diff(groups: &[FieldDiff]) {
    for group in groups {
        println!("{}", format!("--- {}", group.field).bold());
        println!("{}", format!("+++ {}", group.field).bold());
        for line in &group.lines {
            match line.tag {
                DiffTag::Context => println!(" {}", line.text),
                DiffTag::Removed => println!("{}", format!("-{}", line.text).red()),
                DiffTag::Added => println!("{}", format!("+{}", line.text).green()),
            }
        }
        println!();
    }
}
