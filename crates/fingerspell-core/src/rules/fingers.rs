//! Per-finger pose extraction from a normalized frame.
//!
//! Image-space y grows downward, so "raised" means a smaller y. All
//! comparisons happen in normalized hand units (wrist at origin,
//! wrist-to-middle-knuckle span = 1).

use fingerspell_protocol::config::Calibration;
use fingerspell_protocol::landmarks::{
    FINGER_JOINTS, INDEX_MCP, PINKY_MCP, THUMB_IP, THUMB_TIP,
};

use crate::features::NormalizedFrame;

/// Pose of one non-thumb finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerState {
    /// Tip clearly above the PIP joint: the finger is raised.
    Extended,
    /// Tip clearly below the PIP joint: folded into the palm.
    Curled,
    /// In between: hooked or curved (the C/O/X family).
    Partial,
}

/// Coarse thumb placement relative to the palm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbPose {
    /// Spread away from the index-finger edge of the palm.
    Out,
    /// Pointing up alongside the fist.
    Up,
    /// Lying over the palm or the folded fingers.
    Across,
}

pub const INDEX: usize = 0;
pub const MIDDLE: usize = 1;
pub const RING: usize = 2;
pub const PINKY: usize = 3;

/// Everything the letter rules need to know about one hand pose.
#[derive(Debug, Clone, Copy)]
pub struct HandShape {
    pub fingers: [FingerState; 4],
    pub thumb: ThumbPose,
    /// Signed thumb-tip offset along the palm axis, measured from the
    /// index knuckle toward the pinky knuckle. Negative = outside the
    /// palm on the index side.
    pub thumb_along: f32,
    /// Palm width along the same axis (index MCP to pinky MCP).
    pub palm_width: f32,
    /// Knuckle positions along the palm axis, index first (always 0.0).
    /// The fist letters T/N/M read the thumb position against these.
    pub knuckle_cols: [f32; 4],
}

impl HandShape {
    pub fn of(frame: &NormalizedFrame, calibration: &Calibration) -> Self {
        let margin = calibration.state_margin;

        let mut fingers = [FingerState::Partial; 4];
        for (slot, joints) in FINGER_JOINTS.iter().enumerate() {
            let pip = frame.point(joints[1]);
            let tip = frame.point(joints[3]);
            fingers[slot] = if tip.y < pip.y - margin {
                FingerState::Extended
            } else if tip.y > pip.y + margin {
                FingerState::Curled
            } else {
                FingerState::Partial
            };
        }

        let index_mcp = frame.point(INDEX_MCP);
        let pinky_mcp = frame.point(PINKY_MCP);
        let thumb_tip = frame.point(THUMB_TIP);
        let thumb_ip = frame.point(THUMB_IP);

        // Palm axis runs index -> pinky; its sign depends on which way
        // the hand faces, so all offsets are projected onto it.
        let axis = pinky_mcp.x - index_mcp.x;
        let dir = if axis >= 0.0 { 1.0 } else { -1.0 };
        let palm_width = axis * dir;
        let thumb_along = (thumb_tip.x - index_mcp.x) * dir;
        let mut knuckle_cols = [0.0; 4];
        for (slot, joints) in FINGER_JOINTS.iter().enumerate() {
            knuckle_cols[slot] = (frame.point(joints[0]).x - index_mcp.x) * dir;
        }

        let thumb = if thumb_along < -calibration.thumb_margin {
            ThumbPose::Out
        } else if thumb_tip.y < thumb_ip.y - margin
            && thumb_along < calibration.thumb_margin
        {
            ThumbPose::Up
        } else {
            ThumbPose::Across
        };

        Self {
            fingers,
            thumb,
            thumb_along,
            palm_width,
            knuckle_cols,
        }
    }

    pub fn extended_count(&self) -> usize {
        self.fingers
            .iter()
            .filter(|s| **s == FingerState::Extended)
            .count()
    }

    pub fn curled_count(&self) -> usize {
        self.fingers
            .iter()
            .filter(|s| **s == FingerState::Curled)
            .count()
    }

    pub fn partial_count(&self) -> usize {
        self.fingers
            .iter()
            .filter(|s| **s == FingerState::Partial)
            .count()
    }

    pub fn is_fist(&self) -> bool {
        self.curled_count() == 4
    }

    /// True when every finger is at least partly bent (C/O candidates).
    pub fn all_bent(&self) -> bool {
        self.fingers
            .iter()
            .all(|s| matches!(s, FingerState::Curled | FingerState::Partial))
    }
}
