/// Length of a flattened feature vector: 21 landmarks x (x, y, z).
pub const FEATURE_SIZE: usize = 63;

/// How many recent predictions the smoother keeps.
/// A decision needs a strict majority of this window.
pub const SMOOTHING_WINDOW: usize = 10;

/// Label the trainer emits for the "open palm" word separator.
pub const SPACE_LABEL: &str = "SPACE";

/// Label the trainer emits for the "closed fist" backspace gesture.
pub const DELETE_LABEL: &str = "DELETE";

/// Letters the trainer excludes because they involve motion,
/// which a single-frame classifier cannot capture.
pub const MOTION_LETTERS: [&str; 2] = ["J", "Z"];
