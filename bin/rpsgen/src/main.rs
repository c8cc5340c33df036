use clap::Parser;
use libloadgen::{LoadOptions, DEFAULT_CONCURRENCY, DEFAULT_REQUESTS, DEFAULT_URL};

#[derive(Debug, Parser)]
#[command(name = "rpsgen")]
#[command(about = "Send many concurrent HTTP GET requests and summarize the outcome", long_about = None)]
struct Cli {
    /// Number of requests to send
    #[arg(short = 'n', long = "number", default_value_t = DEFAULT_REQUESTS)]
    number: u32,

    /// Number of concurrent requests
    #[arg(short = 'c', long = "concurrent", default_value_t = DEFAULT_CONCURRENCY)]
    concurrent: u32,

    /// URL to send requests to
    #[arg(short = 'u', long = "url", default_value = DEFAULT_URL)]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    println!("Sending {} requests to {}", cli.number, cli.url);
    println!("Concurrency: {}", cli.concurrent);
    println!("{}", "-".repeat(60));

    let options = LoadOptions {
        url: cli.url,
        requests: cli.number,
        concurrency: cli.concurrent,
    };

    // request failures land in the summary, never in the exit code
    let summary = libloadgen::run_with(&options, |outcome| println!("{outcome}")).await?;

    println!("{}", "-".repeat(60));
    println!("{summary}");
    Ok(())
}
