use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use synapse_core_sdk::{
    analysis,
    catalog::{Provider, DEFAULT_PROVIDER},
    config::{ServerConfig, DEFAULT_ADDR, DEFAULT_TIMEOUT_SECS},
    error::ServiceError,
    logging,
    models::ScenarioRequest,
    question, server, telemetry,
    upstream::Endpoints,
};

/**
 * \brief CLI entry: run the service or call it directly from a terminal.
 */
#[derive(Parser, Debug)]
#[command(name = "synapse", version, about = "Moral dilemma scoring over hosted LLMs")]
struct Cli {
    /** \brief Debug-level logs. */
    #[arg(short, long, global = true)]
    verbose: bool,

    /** \brief Log format: text or json. */
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(flatten)]
    upstream: UpstreamArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct UpstreamArgs {
    #[arg(long, global = true, env = "SYNAPSE_OPENROUTER_URL")]
    openrouter_url: Option<String>,
    #[arg(long, global = true, env = "SYNAPSE_TOGETHER_URL")]
    together_url: Option<String>,
    #[arg(long, global = true, env = "SYNAPSE_GROQ_URL")]
    groq_url: Option<String>,
    /** \brief HTTP-Referer sent to OpenRouter. */
    #[arg(long, global = true, env = "SYNAPSE_REFERER")]
    referer: Option<String>,
    /** \brief Per upstream request, seconds. */
    #[arg(long, global = true, env = "SYNAPSE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
    /** \brief Append attempt outcomes to logs/synapse.log. */
    #[arg(long, global = true, env = "SYNAPSE_TELEMETRY")]
    telemetry: bool,
}

impl UpstreamArgs {
    fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::default();
        if let Some(url) = &self.openrouter_url {
            endpoints.openrouter = url.clone();
        }
        if let Some(url) = &self.together_url {
            endpoints.together = url.clone();
        }
        if let Some(url) = &self.groq_url {
            endpoints.groq = url.clone();
        }
        if let Some(referer) = &self.referer {
            endpoints.referer = referer.clone();
        }
        endpoints
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /**
     * \brief Serve the JSON API and the static client.
     */
    Serve {
        #[arg(long, env = "SYNAPSE_ADDR", default_value = DEFAULT_ADDR)]
        addr: String,
        #[arg(long, env = "SYNAPSE_UI_DIR")]
        ui_dir: Option<PathBuf>,
        /** \brief Operator key for GET /api/prompt. */
        #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
        server_key: Option<String>,
    },

    /**
     * \brief Generate one dilemma.
     */
    Question {
        #[arg(long, env = "SYNAPSE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long, default_value = "openrouter")]
        provider: String,
    },

    /**
     * \brief Score an answer to a scenario and print the JSON assessment.
     */
    Analyze {
        #[arg(long, env = "SYNAPSE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long, default_value = "openrouter")]
        provider: String,
        #[arg(long)]
        scenario: String,
        #[arg(long)]
        response: String,
    },

    /** \brief List providers and their fallback models. */
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, &cli.log_format)?;
    telemetry::set_enabled(cli.upstream.telemetry);

    let mut config = ServerConfig {
        endpoints: cli.upstream.endpoints(),
        timeout_secs: cli.upstream.timeout_secs,
        telemetry_enabled: cli.upstream.telemetry,
        ..ServerConfig::default()
    };

    match cli.command {
        Commands::Serve {
            addr,
            ui_dir,
            server_key,
        } => {
            config.addr = addr;
            if let Some(dir) = ui_dir {
                config.ui_dir = dir;
            }
            config.server_openrouter_key = server_key;
            server::run(&config).await?;
        }
        Commands::Question { api_key, provider } => {
            let client = config.build_client()?;
            let result = question::generate(&client, api_key.as_deref(), &provider)
                .await
                .map_err(explain)?;
            println!("{}", result.question);
            eprintln!("(provider={} model={})", result.provider, result.model);
        }
        Commands::Analyze {
            api_key,
            provider,
            scenario,
            response,
        } => {
            let client = config.build_client()?;
            let request = ScenarioRequest {
                scenario,
                user_response: response,
            };
            let assessment = analysis::analyze(&client, api_key.as_deref(), &provider, &request)
                .await
                .map_err(explain)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&assessment).context("encode assessment failed")?
            );
        }
        Commands::Providers => {
            for provider in Provider::ALL {
                let marker = if provider == DEFAULT_PROVIDER {
                    " (default)"
                } else {
                    ""
                };
                println!("{}{}", provider, marker);
                for model in provider.models() {
                    println!("  {}", model);
                }
            }
        }
    }

    Ok(())
}

fn explain(e: ServiceError) -> anyhow::Error {
    match e {
        ServiceError::CredentialMissing => {
            anyhow::anyhow!("no API key, pass --api-key or set SYNAPSE_API_KEY")
        }
        other => anyhow::Error::new(other),
    }
}
