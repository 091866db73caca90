mod display;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use cuisinier_ai::{ArtifactPaths, DEFAULT_MIN_OVERLAP, FallbackIndex, Predictor};
use cuisinier_core::{Selection, VEGETABLES};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "cuisinier",
    about = "Guess a cuisine from the vegetables you have",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    artifacts: ArtifactArgs,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args, Debug)]
struct ArtifactArgs {
    /// Classifier: linear-model JSON, or `.onnx` with the `onnx` feature
    #[arg(long, env = "CUISINIER_MODEL", default_value = "models/model.json", global = true)]
    model: PathBuf,
    /// Fitted ingredient binarizer classes
    #[arg(
        long,
        env = "CUISINIER_INGREDIENT_ENCODER",
        default_value = "models/mlb_ingredients.json",
        global = true
    )]
    ingredient_encoder: PathBuf,
    /// Fitted cuisine binarizer classes
    #[arg(
        long,
        env = "CUISINIER_CUISINE_ENCODER",
        default_value = "models/mlb_cuisine.json",
        global = true
    )]
    cuisine_encoder: PathBuf,
    /// Training corpus (JSON array of recipes) for the fallback index
    #[arg(long, env = "CUISINIER_CORPUS", default_value = "data/train.json", global = true)]
    corpus: PathBuf,
    /// Download the model from here if it is missing
    #[arg(long, env = "CUISINIER_MODEL_URL", global = true)]
    model_url: Option<String>,
    /// Shared vegetables a fallback match needs
    #[arg(long, env = "CUISINIER_MIN_OVERLAP", default_value_t = DEFAULT_MIN_OVERLAP, global = true)]
    min_overlap: usize,
}

impl ArtifactArgs {
    fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model.clone(),
            ingredient_encoder: self.ingredient_encoder.clone(),
            cuisine_encoder: self.cuisine_encoder.clone(),
            corpus: self.corpus.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict a cuisine (at most 10 vegetables; extras are dropped)
    Predict {
        /// Vegetables, e.g. `tomato onion "green beans"`
        vegetables: Vec<String>,
        /// Print JSON instead of a card
        #[arg(long)]
        json: bool,
    },
    /// List the vegetables you can choose from
    Vocab,
    /// Show the cuisine -> vegetables fallback index built from the corpus
    Index,
    /// Download the model artifact
    FetchModel {
        /// Source URL (defaults to --model-url)
        #[arg(long)]
        url: Option<String>,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("cuisinier v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Predict { vegetables, json } => {
            let selection = Selection::new(&vegetables)?;

            if let Some(url) = &cli.artifacts.model_url {
                cuisinier_ai::ensure_artifact(url, &cli.artifacts.model)
                    .await
                    .context("fetching model")?;
            }
            let predictor = Predictor::load(&cli.artifacts.paths())?
                .with_min_overlap(cli.artifacts.min_overlap);

            let prediction = predictor.predict(&selection);
            if json {
                let out = serde_json::json!({
                    "chosen": selection,
                    "prediction": prediction,
                    "text": prediction.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", display::render_prediction(&selection, &prediction));
            }
        }
        Command::Vocab => {
            for veg in VEGETABLES {
                println!("{veg}");
            }
        }
        Command::Index => {
            let index = FallbackIndex::from_corpus_file(&cli.artifacts.corpus, VEGETABLES)?;
            print!("{}", display::render_index(&index));
        }
        Command::FetchModel { url } => {
            let url = url
                .or(cli.artifacts.model_url)
                .context("no URL given: pass --url or set CUISINIER_MODEL_URL")?;
            let fetched = cuisinier_ai::ensure_artifact(&url, &cli.artifacts.model).await?;
            if fetched {
                println!("Downloaded {}", cli.artifacts.model.display());
            } else {
                println!("{} already present", cli.artifacts.model.display());
            }
        }
    }

    Ok(())
}
