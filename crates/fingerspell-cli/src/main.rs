use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use fingerspell_core::config::Calibration;
use tracing::{info, warn};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Calibration file (JSON); flags override individual fields.
    #[arg(global = true, long)]
    calibration_file: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded capture through a full recognition session.
    Run(cmd::run::RunArgs),
    /// Validate a model payload and print its shape.
    Check(cmd::check::CheckArgs),
    /// Score a model against a labeled dataset.
    Eval(cmd::eval::EvalArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let mut calibration = match &cli.calibration_file {
        Some(path) => match Calibration::load_from_file(path) {
            Ok(calibration) => {
                info!("⚙️  Calibration loaded from {}", path);
                calibration
            }
            Err(e) => {
                warn!("⚠️  {}. Using defaults.", e);
                Calibration::default()
            }
        },
        None => Calibration::default(),
    };

    match cli.command {
        Commands::Run(args) => {
            let sub_matches = matches.subcommand_matches("run").unwrap();
            calibration.merge_from_cli(&args.calibration, sub_matches);
            cmd::run::run(args, calibration);
        }
        Commands::Check(args) => cmd::check::run(args),
        Commands::Eval(args) => cmd::eval::run(args),
    }
}
