use fingerspell_core::features::NormalizedFrame;
use fingerspell_protocol::landmarks::{
    Landmark, LandmarkFrame, HAND_LANDMARK_COUNT, MIDDLE_MCP, WRIST,
};
use proptest::prelude::*;

mod common;

// --- STRATEGIES ---

prop_compose! {
    /// A hand whose wrist-to-middle-knuckle span is comfortably nonzero,
    /// so the scale step stays well-conditioned.
    fn arb_hand()(
        coords in proptest::collection::vec(0.0f32..1.0, HAND_LANDMARK_COUNT * 3)
    ) -> LandmarkFrame {
        let mut points: Vec<Landmark> = coords
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect();
        points[MIDDLE_MCP] = Landmark::new(
            points[WRIST].x + 0.1,
            points[WRIST].y - 0.2,
            points[WRIST].z,
        );
        LandmarkFrame::try_from_points(&points).unwrap()
    }
}

fn transformed(frame: &LandmarkFrame, k: f32, t: [f32; 3]) -> LandmarkFrame {
    let points: Vec<Landmark> = frame
        .points()
        .iter()
        .map(|p| Landmark::new(k * p.x + t[0], k * p.y + t[1], k * p.z + t[2]))
        .collect();
    LandmarkFrame::try_from_points(&points).unwrap()
}

proptest! {
    #[test]
    fn normalization_ignores_scale_and_translation(
        frame in arb_hand(),
        k in 0.5f32..4.0,
        t in [-2.0f32..2.0, -2.0f32..2.0, -2.0f32..2.0],
    ) {
        let base = NormalizedFrame::from_frame(&frame, false).features();
        let moved = NormalizedFrame::from_frame(&transformed(&frame, k, t), false).features();
        for (a, b) in base.iter().zip(moved.iter()) {
            prop_assert!((a - b).abs() < 1e-3, "feature drifted: {} vs {}", a, b);
        }
    }

    #[test]
    fn mirror_flips_only_x(frame in arb_hand()) {
        let plain = NormalizedFrame::from_frame(&frame, false);
        let mirrored = NormalizedFrame::from_frame(&frame, true);
        for i in 0..HAND_LANDMARK_COUNT {
            prop_assert!((plain.point(i).x + mirrored.point(i).x).abs() < 1e-6);
            prop_assert_eq!(plain.point(i).y, mirrored.point(i).y);
            prop_assert_eq!(plain.point(i).z, mirrored.point(i).z);
        }
    }

    #[test]
    fn wrist_features_are_always_zero(frame in arb_hand(), mirror in any::<bool>()) {
        let features = NormalizedFrame::from_frame(&frame, mirror).features();
        prop_assert_eq!(features[0], 0.0);
        prop_assert_eq!(features[1], 0.0);
        prop_assert_eq!(features[2], 0.0);
    }

    #[test]
    fn features_are_finite_for_any_input(frame in arb_hand()) {
        let features = NormalizedFrame::from_frame(&frame, false).features();
        prop_assert!(features.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn normalizing_the_fixture_pose_is_deterministic() {
    let pose = common::Pose::new();
    let a = pose.normalized().features();
    let b = pose.normalized().features();
    assert_eq!(a, b);
}
