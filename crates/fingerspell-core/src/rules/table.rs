//! The letter rule table: hand shape -> letter or control gesture.
//!
//! Rules are evaluated top to bottom with the most specific shape first,
//! so a pose that satisfies several predicates resolves to the narrowest
//! match. Letters needing motion (J, Z) or camera-facing orientation
//! (G, H, P, Q) have no rule; the network covers those when loaded.

use fingerspell_protocol::config::Calibration;
use fingerspell_protocol::landmarks::{
    INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, THUMB_TIP,
};

use crate::consts::{DELETE_LABEL, SPACE_LABEL};
use crate::features::NormalizedFrame;
use crate::rules::fingers::{FingerState, HandShape, ThumbPose, MIDDLE, RING};

/// One matched rule. `control` marks the word-level gestures that stay
/// active even when the network handles letters. A rule fires
/// deterministically, so a hit carries no confidence estimate of its own;
/// its prediction reports 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleHit {
    pub label: &'static str,
    pub control: bool,
}

fn letter(label: &'static str) -> Option<RuleHit> {
    Some(RuleHit {
        label,
        control: false,
    })
}

fn control(label: &'static str) -> Option<RuleHit> {
    Some(RuleHit {
        label,
        control: true,
    })
}

pub fn evaluate(
    frame: &NormalizedFrame,
    shape: &HandShape,
    calibration: &Calibration,
) -> Option<RuleHit> {
    let margin = calibration.state_margin;
    let touch = calibration.touch_radius;

    let [index, middle, ring, pinky] = shape.fingers;
    let ext = FingerState::Extended;
    let curl = FingerState::Curled;

    let thumb_tip = frame.point(THUMB_TIP);
    let index_tip = frame.point(INDEX_TIP);
    let middle_tip = frame.point(MIDDLE_TIP);
    let index_pip = frame.point(INDEX_PIP);
    let middle_pip = frame.point(MIDDLE_PIP);

    let thumb_index_gap = thumb_tip.distance_to(&index_tip);
    let thumb_middle_gap = thumb_tip.distance_to(&middle_tip);

    // All four fingers raised: flat hand family.
    if shape.extended_count() == 4 {
        if shape.thumb == ThumbPose::Out {
            return control(SPACE_LABEL);
        }
        return letter("B");
    }

    // Three fingers raised.
    if index != ext && middle == ext && ring == ext && pinky == ext && thumb_index_gap < touch {
        return letter("F");
    }
    if index == ext && middle == ext && ring == ext && pinky == curl {
        return letter("W");
    }

    // Index + middle pair, ring and pinky folded.
    if index == ext && middle == ext && ring == curl && pinky == curl {
        // Crossed tips invert the knuckle order.
        let crossed = (index_tip.x - middle_tip.x)
            * (frame.point(INDEX_MCP).x - frame.point(MIDDLE_MCP).x)
            < 0.0;
        if crossed {
            return letter("R");
        }
        if thumb_tip.distance_to(&middle_pip) < touch {
            return letter("K");
        }
        if index_tip.distance_to(&middle_tip) < touch {
            return letter("U");
        }
        return letter("V");
    }

    // Lone index raised.
    if index == ext && middle != ext && ring != ext && pinky != ext {
        if shape.thumb == ThumbPose::Out {
            return letter("L");
        }
        if thumb_middle_gap < touch {
            return letter("D");
        }
    }

    // Lone pinky raised.
    if pinky == ext && index == curl && middle == curl && ring == curl {
        if shape.thumb == ThumbPose::Out {
            return letter("Y");
        }
        return letter("I");
    }

    // Closed fist family: the thumb position tells the letters apart.
    if shape.is_fist() && shape.thumb != ThumbPose::Out {
        // In a fist the PIP knuckles form the top ridge and the tips
        // tuck in below; the thumb sits somewhere between.
        let ridge_y = index_pip.y;
        let tips_y = index_tip.y;
        let tucked_high = thumb_tip.y <= ridge_y + margin;
        let along = shape.thumb_along;
        let cols = shape.knuckle_cols;

        // A raised thumb clear of the knuckle ridge is thumbs-up, the
        // alternate word separator; beside the ridge it is the letter A.
        if shape.thumb == ThumbPose::Up && along <= 0.0 {
            let rise = frame.point(INDEX_MCP).y - thumb_tip.y;
            if rise > calibration.thumb_rise {
                return control(SPACE_LABEL);
            }
            return letter("A");
        }
        if tucked_high && along > 0.0 && along < cols[MIDDLE] {
            return letter("T");
        }
        if tucked_high && along >= cols[MIDDLE] && along < cols[RING] {
            return letter("N");
        }
        if tucked_high && along >= cols[RING] {
            return letter("M");
        }
        if shape.thumb == ThumbPose::Across && thumb_tip.y >= tips_y - margin {
            return letter("E");
        }
        // Thumb crossing mid-height in front of the fingers: S while it
        // stays near the index side, delete once it wraps past
        // `wrap_reach` toward the pinky.
        if shape.thumb == ThumbPose::Across && along < calibration.wrap_reach {
            return letter("S");
        }
        return control(DELETE_LABEL);
    }

    // Round shapes: every finger at least partly bent, no closed fist.
    if shape.all_bent() {
        if thumb_index_gap < touch {
            return letter("O");
        }
        if shape.partial_count() >= 3 && thumb_index_gap < 4.0 * touch {
            return letter("C");
        }
    }

    // Hooked index over a fist.
    if index == FingerState::Partial
        && middle == curl
        && ring == curl
        && pinky == curl
        && shape.thumb != ThumbPose::Out
    {
        return letter("X");
    }

    None
}
