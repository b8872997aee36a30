//! One-line status snapshots for the run loop.

use std::fmt;

use crate::channel::ChannelStats;

/// Point-in-time view of a running pipeline, cheap to format and log.
#[derive(Debug, Clone, Default)]
pub struct PipelineStatus {
    pub frames: u64,
    pub decisions: u64,
    pub commits: u64,
    pub buffer: String,
    pub holding: Option<String>,
    pub hold_progress: f32,
    pub channel: ChannelStats,
    /// "model <fingerprint>" or "rules".
    pub mode: String,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} decisions={} commits={} buffer={:?}",
            self.frames, self.decisions, self.commits, self.buffer
        )?;
        if let Some(label) = &self.holding {
            write!(f, " hold={}:{:.0}%", label, self.hold_progress * 100.0)?;
        }
        write!(f, " mode={}", self.mode)?;
        if self.channel.rejected_total() > 0 {
            write!(f, " drops={}", self.channel.rejected_total())?;
        }
        Ok(())
    }
}
