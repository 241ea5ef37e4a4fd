use anyhow::Result;
use clap::Parser;
use mocha_eval::lerc::RemoteLerc;
use mocha_eval::load::EvalInputs;
use mocha_eval::pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mocha-eval", version, about = "Score QA predictions with LERC, BLEU-1, and METEOR")]
struct Cli {
    /// JSONL questions file with "id", "context", "question", and "metadata" keys.
    #[arg(short = 'q', long = "questions_file")]
    questions_file: PathBuf,

    /// JSONL answers file with "id" and "references" keys.
    #[arg(short = 'a', long = "answers_file")]
    answers_file: PathBuf,

    /// JSONL predictions file with "id" and "candidate" keys.
    #[arg(short = 'p', long = "predictions_file")]
    predictions_file: PathBuf,

    /// JSON file the aggregated metrics are written to.
    #[arg(short = 'm', long = "metrics_file")]
    metrics_file: PathBuf,

    /// Batch size for LERC scoring.
    #[arg(short = 'b', long = "batch_size", default_value_t = 32)]
    batch_size: usize,

    /// CUDA device for LERC scoring; -1 runs on CPU.
    #[arg(short = 'd', long, default_value_t = -1, allow_negative_numbers = true)]
    device: i32,

    /// Maximum input length passed to the LERC scorer.
    #[arg(long = "max_length", default_value_t = 512)]
    max_length: usize,

    /// Base URL of the LERC inference service.
    #[arg(long = "scorer_url", default_value = "http://127.0.0.1:8000")]
    scorer_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let inputs = EvalInputs::load(&cli.questions_file, &cli.answers_file, &cli.predictions_file)?;
    let scorer = RemoteLerc::new(cli.scorer_url, cli.device, cli.max_length)?;
    pipeline::calculate_metrics(&inputs, &scorer, cli.batch_size, &cli.metrics_file).await
}
