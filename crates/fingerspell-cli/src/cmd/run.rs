use clap::Args;
use fingerspell_core::config::Calibration;
use fingerspell_core::messages::CAPTURE_ORIGIN;
use fingerspell_core::model::Model;
use fingerspell_core::replay;
use fingerspell_core::session::SessionBuildParams;
use std::process;
use tracing::{error, info, warn};

use crate::reports;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Recorded capture: `.jsonl` of channel envelopes or `.csv` rows.
    pub input: String,

    /// Model payload; omitted or invalid falls back to the rule table.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Origin tag expected on channel envelopes (JSONL input only).
    #[arg(long, default_value = CAPTURE_ORIGIN)]
    pub origin: String,

    /// Spell in uppercase.
    #[arg(long, default_value_t = false)]
    pub caps: bool,

    /// Force mirroring on/off instead of following reported handedness.
    #[arg(long)]
    pub mirror: Option<bool>,

    #[command(flatten)]
    pub calibration: Calibration,
}

pub fn run(args: RunArgs, calibration: Calibration) {
    // A broken model file is a degraded mode, not a fatal error: the
    // geometric rule table takes over for the whole run.
    let model = args.model.as_deref().and_then(|path| {
        info!("🧠 Loading model: {}", path);
        match Model::load_from_file(path) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!("⚠️  Model unavailable ({}). Falling back to rules.", e);
                None
            }
        }
    });

    let mut session = SessionBuildParams::builder()
        .calibration(calibration)
        .model(model)
        .mirror_override(args.mirror)
        .caps(args.caps)
        .build()
        .build_session()
        .unwrap_or_else(|e| {
            error!("❌ {}", e);
            process::exit(1);
        });

    info!("▶️  Replaying {}", args.input);
    let result = if args.input.ends_with(".csv") {
        replay::replay_csv(&args.input, &mut session)
    } else {
        replay::replay_jsonl(&args.input, &args.origin, &mut session)
    };

    let report = result.unwrap_or_else(|e| {
        error!("❌ Replay failed: {}", e);
        process::exit(1);
    });

    reports::print_replay_report(&report, &session);
    println!("\nFinal text: {:?}", report.final_text);
}
