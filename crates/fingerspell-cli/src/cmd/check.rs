use clap::Args;
use fingerspell_core::model::Model;
use std::process;
use tracing::error;

use crate::reports;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Model payload to validate.
    pub model: String,
}

pub fn run(args: CheckArgs) {
    match Model::load_from_file(&args.model) {
        Ok(model) => {
            reports::print_model_summary(&model);
            println!("\n✅ Model OK");
        }
        Err(e) => {
            error!("❌ Model rejected: {}", e);
            process::exit(1);
        }
    }
}
