use std::sync::Arc;

use clap::Parser;
use librate::{spawn_sampler, RateCounter};
use libserver::{ConfigError, ServerConfig, DEFAULT_PORT, PORT_ENV_VAR};

#[derive(Debug, Parser)]
#[command(name = "rpsd")]
#[command(about = "HTTP server with live requests-per-second tracking", long_about = None)]
struct Cli {
    /// Port to listen on (overridden by the APP_PORT environment variable)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return 2;
        }
    }
    1
}

#[tokio::main]
async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::resolve(cli.port)?;

    let counter = Arc::new(RateCounter::new());
    let (sampler_shutdown, sampler) = spawn_sampler(counter.clone());

    tracing::info!(port = config.port, env_var = PORT_ENV_VAR, "starting rpsd");
    libserver::serve(&config, counter).await?;

    // serve returned after ctrl-c; stop the sampler as well
    let _ = sampler_shutdown.send(true);
    let _ = sampler.await;
    Ok(())
}
