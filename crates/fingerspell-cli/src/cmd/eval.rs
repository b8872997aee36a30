use clap::Args;
use fingerspell_core::dataset;
use fingerspell_core::model::Model;
use std::process;
use tracing::{error, info};

use crate::reports;

#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
    /// Model payload to score.
    pub model: String,

    /// Labeled dataset: JSON array of {label, x: [63 floats]}.
    pub dataset: String,

    /// Keep the motion letters (J/Z) the trainer excludes by default.
    #[arg(long, default_value_t = false)]
    pub include_motion: bool,
}

pub fn run(args: EvalArgs) {
    let model = Model::load_from_file(&args.model).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });
    let dataset = dataset::load(&args.dataset, args.include_motion).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });

    info!(
        "Scoring {} samples against model {}",
        dataset.samples.len(),
        model.short_fingerprint()
    );
    let report = dataset::evaluate(&model, &dataset);
    reports::print_eval_report(&report, dataset.skipped);
}
