use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Runtime tunables for the recognizer pipeline.
///
/// Every knob has a CLI flag and a JSON key; a calibration file may set any
/// subset and the rest fall back to defaults. Flags passed on the command
/// line win over the file (see [`Calibration::merge_from_cli`]).
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// How long a letter must be held before it commits, in milliseconds.
    #[arg(long, default_value_t = 1200)]
    pub dwell_ms: u64,

    /// Minimum smoothed confidence for a letter to count as a decision.
    #[arg(long, default_value_t = 0.85)]
    pub letter_gate: f32,

    /// Minimum smoothed confidence for a control gesture (space/delete).
    #[arg(long, default_value_t = 0.70)]
    pub control_gate: f32,

    /// Margin (in normalized hand units) separating an extended finger
    /// from a curled one; inside the margin the finger reads as partial.
    #[arg(long, default_value_t = 0.04)]
    pub state_margin: f32,

    /// Tip-to-tip distance (normalized hand units) under which two
    /// fingertips count as touching.
    #[arg(long, default_value_t = 0.25)]
    pub touch_radius: f32,

    /// Horizontal margin used to tell a tucked thumb from a spread one.
    #[arg(long, default_value_t = 0.12)]
    pub thumb_margin: f32,

    /// How far above the knuckle row (in normalized hand units) the thumb
    /// tip must rise for a fist to read as thumbs-up instead of 'A'.
    #[arg(long, default_value_t = 0.5)]
    pub thumb_rise: f32,

    /// How far along the palm (index knuckle toward pinky, normalized
    /// hand units) a crossed thumb may reach before an 'S' fist reads as
    /// the fully-wrapped delete gesture.
    #[arg(long, default_value_t = 0.25)]
    pub wrap_reach: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            dwell_ms: 1200,
            letter_gate: 0.85,
            control_gate: 0.70,
            state_margin: 0.04,
            touch_radius: 0.25,
            thumb_margin: 0.12,
            thumb_rise: 0.5,
            wrap_reach: 0.25,
        }
    }
}

impl Calibration {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read calibration file: {}", e))?;
        let calibration: Calibration = serde_json::from_str(&content)
            .map_err(|e| format!("failed to parse calibration JSON: {}", e))?;
        calibration.validate()?;
        Ok(calibration)
    }

    /// Reject values that would make the pipeline misbehave silently.
    pub fn validate(&self) -> Result<(), String> {
        if self.dwell_ms == 0 {
            return Err("dwell_ms must be positive".into());
        }
        for (name, gate) in [
            ("letter_gate", self.letter_gate),
            ("control_gate", self.control_gate),
        ] {
            if !gate.is_finite() || !(0.0..=1.0).contains(&gate) {
                return Err(format!("{} must be within [0, 1], got {}", name, gate));
            }
        }
        for (name, v) in [
            ("state_margin", self.state_margin),
            ("touch_radius", self.touch_radius),
            ("thumb_margin", self.thumb_margin),
            ("thumb_rise", self.thumb_rise),
            ("wrap_reach", self.wrap_reach),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{} must be non-negative, got {}", name, v));
            }
        }
        Ok(())
    }

    /// Overlay CLI-provided values on top of `self` (typically a file
    /// load), touching only flags the user actually passed.
    pub fn merge_from_cli(&mut self, cli: &Calibration, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(dwell_ms, "dwell_ms");
        update_if_present!(letter_gate, "letter_gate");
        update_if_present!(control_gate, "control_gate");
        update_if_present!(state_margin, "state_margin");
        update_if_present!(touch_radius, "touch_radius");
        update_if_present!(thumb_margin, "thumb_margin");
        update_if_present!(thumb_rise, "thumb_rise");
        update_if_present!(wrap_reach, "wrap_reach");
    }
}
