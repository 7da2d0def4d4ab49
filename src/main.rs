//! Pipeline driver for the uniscore scoring operators.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uniscore::config::UniEvalConfig;
use uniscore::operators::{
    MetricSelection, OperatorParams, OperatorRegistry, UniEvalScorer,
};
use uniscore::storage::JsonlStorage;
use uniscore::unieval::Device;

#[derive(Parser, Debug)]
#[command(
    name = "uniscore",
    version,
    about = "Score generated text with the UniEval evaluation model"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a JSONL dataset and write it back with score columns appended
    Run(RunArgs),

    /// List the operators the driver can run
    Operators,

    /// Print an operator's description
    Describe {
        /// Operator name
        name: String,

        /// Language code ("zh" for Chinese, anything else for English)
        #[arg(long, default_value = "en")]
        lang: String,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input JSONL file, one record per line
    #[arg(long)]
    input: PathBuf,

    /// Output JSONL file; defaults to rewriting the input file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Operator to run
    #[arg(long, default_value = UniEvalScorer::NAME)]
    operator: String,

    /// Comma-separated metrics to compute
    #[arg(long, default_value = "fluency,naturalness,understandability")]
    metrics: String,

    /// Device hint for the evaluation model (e.g. cuda, cuda:1, cpu); auto-detected when unset
    #[arg(long)]
    device: Option<String>,

    /// Column holding reference text. Accepted for operator compatibility;
    /// the UniEval scorer evaluates reference-free and ignores it.
    #[arg(long, default_value = "instruction")]
    input_key: String,

    /// Column holding the generated text to score
    #[arg(long, default_value = "output")]
    output_key: String,

    /// Rows per evaluator request (reserved; rows are currently sent one at a time)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Base URL of the UniEval inference service
    #[arg(long, env = "UNISCORE_UNIEVAL_URL")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run_operator(args).await,
        Command::Operators => {
            list_operators();
            Ok(())
        }
        Command::Describe { name, lang } => describe_operator(&name, &lang),
    }
}

async fn run_operator(args: RunArgs) -> anyhow::Result<()> {
    let mut unieval = UniEvalConfig::from_env()?;
    if let Some(endpoint) = args.endpoint {
        unieval.base_url = endpoint;
    }

    let metrics = MetricSelection::from_list(&args.metrics)?;
    let device = Device::resolve(args.device.as_deref());
    if args.batch_size.is_some() {
        tracing::warn!("--batch-size is reserved; rows are scored one at a time");
    }

    tracing::info!(
        "Running {} on {} (device {})",
        args.operator,
        args.input.display(),
        device
    );

    let registry = OperatorRegistry::builtin();
    let operator = registry.build(
        &args.operator,
        &OperatorParams {
            unieval,
            metrics,
            device,
        },
    )?;

    let storage = match args.output {
        Some(output) => JsonlStorage::new(args.input, output),
        None => JsonlStorage::in_place(args.input),
    };
    operator
        .run(&storage, &args.input_key, &args.output_key)
        .await?;

    println!("Wrote {}", storage.output_path().display());
    Ok(())
}

fn list_operators() {
    let registry = OperatorRegistry::builtin();
    println!("Operators:");
    println!();
    for name in registry.names() {
        println!("  {name}");
    }
}

fn describe_operator(name: &str, lang: &str) -> anyhow::Result<()> {
    let registry = OperatorRegistry::builtin();
    let operator = registry.build(
        name,
        &OperatorParams {
            unieval: UniEvalConfig::default(),
            metrics: MetricSelection::default(),
            device: Device::cpu(),
        },
    )?;
    println!("{}", operator.description(lang));
    Ok(())
}
