mod config;
mod error;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use runtime::{McpToolHost, OllamaBackend, Session, ToolDescriptor, ToolHost, console};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, ConfigError};
use error::{Error, Result};

const CONFIG_FILE: &str = "toolchat.toml";
const LEGACY_CONFIG_FILE: &str = "config.json";

#[derive(Parser)]
#[command(name = "toolchat")]
#[command(about = "Chat with a local model that can call MCP tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, or JSON by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Model to use instead of the first configured one
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config)?;

    match cli.command {
        Some(Commands::Chat { model }) => cmd_chat(&config, model).await,
        None => cmd_chat(&config, None).await,
    }
}

async fn cmd_chat(config: &Config, model: Option<String>) -> Result<()> {
    let model_name = model
        .clone()
        .unwrap_or_else(|| config.default_model().name.clone());
    println!("Starting tool chat with {model_name}...");
    println!("{}", "-".repeat(60));

    let tools = bootstrap(config).await?;
    print_catalog(tools.catalog())?;

    let backend = OllamaBackend::from_models(&config.models)
        .ok_or(ConfigError::NoModels)?
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build();
    info!(
        model = model_name.as_str(),
        timeout_secs = config.request_timeout_secs,
        window = config.history_window,
        "backend ready"
    );

    let mut session = Session::new(backend, tools)
        .with_directives(config.directive_set())
        .with_window(config.history_window);
    if let Some(model) = model {
        session = session.with_model(model);
    }

    console::banner(io::stdout())?;
    let outcome = console::run(&mut session, io::stdin().lock(), io::stdout()).await;

    session.into_tools().shutdown().await;
    Ok(outcome?)
}

async fn bootstrap(config: &Config) -> Result<McpToolHost> {
    let (command, args) = config.tool_host_command();
    let mut tools = McpToolHost::spawn(command, args).await?;
    tools.bootstrap().await?;
    Ok(tools)
}

fn print_catalog(catalog: &[ToolDescriptor]) -> Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "\nAvailable tools from the tool host:")?;
    if catalog.is_empty() {
        writeln!(stdout, "  (none)")?;
    }
    for tool in catalog {
        writeln!(stdout, "  - {}: {}", tool.name, tool.description)?;
    }
    Ok(())
}

fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::load(path)?);
    }

    let toml = PathBuf::from(CONFIG_FILE);
    let json = PathBuf::from(LEGACY_CONFIG_FILE);
    if toml.exists() {
        Ok(Config::load(toml)?)
    } else if json.exists() {
        Ok(Config::load(json)?)
    } else {
        Err(Error::ConfigNotFound { toml, json })
    }
}
