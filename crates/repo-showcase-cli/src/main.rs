//! repo-showcase: fetch a GitHub showcase from the command line.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use repo_showcase::{build_requests, AcquisitionStore, FallbackCoordinator, OwnerHandle};
use repo_showcase_cli::{build_config, render_json, render_text, Overrides};

#[derive(Parser)]
#[command(
    name = "repo-showcase",
    about = "Fetch the pinned (or most-starred) repositories of a GitHub user",
    version
)]
struct Cli {
    /// GitHub token. Also reads SHOWCASE_GITHUB_TOKEN, then GITHUB_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,

    /// REST API base URL. Also reads SHOWCASE_API_BASE.
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// GraphQL endpoint. Also reads SHOWCASE_GRAPHQL_URL.
    #[arg(long, global = true)]
    graphql_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the showcase for a user.
    Fetch {
        /// GitHub login.
        user: String,

        /// Print a JSON projection instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the upstream requests for a user as JSON without sending them.
    Requests {
        /// GitHub login.
        user: String,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   repo-showcase completions bash > ~/.local/share/bash-completion/completions/repo-showcase
    ///   repo-showcase completions zsh > ~/.zfunc/_repo-showcase
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let overrides = Overrides {
        token: cli.token,
        api_base: cli.api_base,
        graphql_url: cli.graphql_url,
        timeout_ms: cli.timeout_ms,
    };

    match cli.command {
        Commands::Fetch { user, json } => {
            let handle = parse_handle(&user)?;
            let config = build_config(&overrides);
            if !config.has_credential() {
                tracing::info!("No token configured; using the public repository listing");
            }

            let coordinator =
                FallbackCoordinator::with_http(config).context("failed to build HTTP client")?;
            let store = AcquisitionStore::new(coordinator);
            store.bind(handle.as_str());
            store.settled().await;

            let view = store.view();
            if json {
                println!("{}", render_json(&handle, &view)?);
            } else {
                print!("{}", render_text(&handle, &view));
            }

            if view.error.is_some() {
                std::process::exit(1);
            }
        }

        Commands::Requests { user } => {
            let handle = parse_handle(&user)?;
            let config = build_config(&overrides);
            let requests = build_requests(&handle, &config)?;
            println!("{}", serde_json::to_string_pretty(&requests)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "repo-showcase", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn parse_handle(raw: &str) -> anyhow::Result<OwnerHandle> {
    OwnerHandle::parse(raw).context("user must not be blank")
}
