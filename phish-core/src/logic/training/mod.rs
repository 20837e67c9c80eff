//! Training Module - offline pipeline producing the serving artifacts
//!
//! load → extract → vectorize → concatenate → fit → save. Any failing step
//! aborts the run; nothing is checkpointed.

pub mod config;
pub mod pipeline;

pub use config::TrainingConfig;
pub use pipeline::{build_matrix, fit_models, train, TrainedModels, TrainingReport};
