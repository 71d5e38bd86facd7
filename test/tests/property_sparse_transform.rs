//! Property test for the sparse transform algebra: merging a delta and then
//! its inverse always restores the original, across every combination of
//! present components.

use glam::{EulerRot, Quat, Vec3};
use proptest::prelude::*;

use ticksync_shared::SparseTransform;

const EPSILON: f32 = 1e-3;

fn translation() -> impl Strategy<Value = Vec3> {
    (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn rotation() -> impl Strategy<Value = Quat> {
    (-3.0f32..3.0, -3.0f32..3.0, -3.0f32..3.0)
        .prop_map(|(x, y, z)| Quat::from_euler(EulerRot::XYZ, x, y, z))
}

// Factors stay away from zero so the reciprocal is well-conditioned.
fn scale() -> impl Strategy<Value = Vec3> {
    (0.2f32..5.0, 0.2f32..5.0, 0.2f32..5.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn sparse_transform() -> impl Strategy<Value = SparseTransform> {
    (0u8..8, translation(), rotation(), scale()).prop_map(|(mask, t, r, s)| {
        let mut transform = SparseTransform::new();
        if mask & 0x1 != 0 {
            transform.set_translation(t);
        }
        if mask & 0x2 != 0 {
            transform.set_rotation(r);
        }
        if mask & 0x4 != 0 {
            transform.set_scale(s);
        }
        transform
    })
}

proptest! {
    #[test]
    fn merge_then_inverse_merge_restores_the_original(
        a in sparse_transform(),
        b in sparse_transform(),
    ) {
        let mut merged = a;
        merged.merge(&b);
        merged.merge(&b.invert());

        prop_assert!(
            merged.approx_eq(&a, EPSILON),
            "a={a:?} b={b:?} result={merged:?}"
        );
    }

    #[test]
    fn inverting_twice_is_the_identity(t in sparse_transform()) {
        let twice = t.invert().invert();
        prop_assert!(twice.approx_eq(&t, EPSILON));
    }

    #[test]
    fn merge_never_clears_presence_bits(
        a in sparse_transform(),
        b in sparse_transform(),
    ) {
        let mut merged = a;
        merged.merge(&b);
        prop_assert_eq!(merged.components(), a.components() | b.components());
    }
}
