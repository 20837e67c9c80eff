//! phish-train - fit the vectorizer and forest from two labeled URL lists

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use phish_core::constants::{
    APP_VERSION, DEFAULT_DATASET_PATH, DEFAULT_LEGITIMATE_PATH, DEFAULT_MAX_DEPTH,
    DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_MODEL_PATH, DEFAULT_N_TREES, DEFAULT_PHISHING_PATH,
    DEFAULT_SEED, DEFAULT_VECTORIZER_PATH,
};
use phish_core::logic::features::TEXT_FEATURE_COUNT;
use phish_core::logic::model::ForestParams;
use phish_core::logic::text::TfidfParams;
use phish_core::logic::training::{train, TrainingConfig};

/// Train the phishing URL classifier
#[derive(Parser, Debug, Clone)]
#[command(name = "phish-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct TrainArgs {
    /// CSV of phishing URLs (needs a `url` column)
    #[arg(long, env = "PHISHING_PATH", default_value = DEFAULT_PHISHING_PATH)]
    pub phishing: PathBuf,

    /// CSV of legitimate URLs (needs a `url` column)
    #[arg(long, env = "LEGITIMATE_PATH", default_value = DEFAULT_LEGITIMATE_PATH)]
    pub legitimate: PathBuf,

    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_out: PathBuf,

    #[arg(long, env = "VECTORIZER_PATH", default_value = DEFAULT_VECTORIZER_PATH)]
    pub vectorizer_out: PathBuf,

    /// Combined dataset export
    #[arg(long, env = "SAMPLE_DATASET_PATH", default_value = DEFAULT_DATASET_PATH)]
    pub dataset_out: PathBuf,

    #[arg(long, default_value_t = DEFAULT_N_TREES)]
    pub trees: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[arg(long, default_value_t = DEFAULT_MIN_SAMPLES_SPLIT)]
    pub min_samples_split: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Vocabulary cap, at most the number of text slots
    #[arg(long, default_value_t = TEXT_FEATURE_COUNT)]
    pub max_ngrams: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl TrainArgs {
    fn into_config(self) -> anyhow::Result<TrainingConfig> {
        if self.max_ngrams == 0 || self.max_ngrams > TEXT_FEATURE_COUNT {
            anyhow::bail!(
                "--max-ngrams must be between 1 and {}, got {}",
                TEXT_FEATURE_COUNT,
                self.max_ngrams
            );
        }
        if self.trees == 0 {
            anyhow::bail!("--trees must be at least 1");
        }
        if self.min_samples_split < 2 {
            anyhow::bail!(
                "--min-samples-split must be at least 2, got {}",
                self.min_samples_split
            );
        }
        Ok(TrainingConfig {
            phishing_path: self.phishing,
            legitimate_path: self.legitimate,
            model_path: self.model_out,
            vectorizer_path: self.vectorizer_out,
            dataset_path: self.dataset_out,
            forest: ForestParams {
                n_trees: self.trees,
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                seed: self.seed,
                ..ForestParams::default()
            },
            text: TfidfParams {
                max_features: Some(self.max_ngrams),
                ..TfidfParams::for_layout()
            },
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = TrainArgs::parse();
    let json = args.json;
    log::info!("Starting phish-train v{}", APP_VERSION);

    let config = args.into_config()?;
    let report = train(&config).context("training failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Model id:          {}", report.model_id);
        println!(
            "Samples:           {} ({} phishing, {} legitimate)",
            report.samples, report.phishing, report.legitimate
        );
        println!("Vocabulary:        {} n-grams", report.vocabulary_size);
        println!("Trees:             {}", report.n_trees);
        println!("Training accuracy: {:.4}", report.training_accuracy);
        println!("Model:             {}", report.model_path.display());
        println!("Vectorizer:        {}", report.vectorizer_path.display());
        println!("Dataset:           {}", report.dataset_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> TrainArgs {
        let mut argv = vec!["phish-train"];
        argv.extend_from_slice(extra);
        TrainArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_build_config() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config.forest.n_trees, DEFAULT_N_TREES);
        assert_eq!(config.text.max_features, Some(TEXT_FEATURE_COUNT));
    }

    #[test]
    fn test_zero_trees_rejected() {
        assert!(parse(&["--trees", "0"]).into_config().is_err());
    }

    #[test]
    fn test_min_samples_split_below_two_rejected() {
        assert!(parse(&["--min-samples-split", "1"]).into_config().is_err());
        assert!(parse(&["--min-samples-split", "2"]).into_config().is_ok());
    }

    #[test]
    fn test_max_ngrams_bounds() {
        assert!(parse(&["--max-ngrams", "0"]).into_config().is_err());
        assert!(parse(&["--max-ngrams", "33"]).into_config().is_err());
    }
}
