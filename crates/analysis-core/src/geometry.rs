//! Joint-angle geometry.

use postura_pose_model::Point2D;

/// Arms shorter than this are treated as coincident with the vertex.
pub const MIN_ARM_LENGTH: f64 = 1e-6;

/// The angle at a vertex is undefined for these inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DegenerateGeometry {
    #[error("an arm joint coincides with the vertex joint")]
    CoincidentPoints,

    #[error("joint coordinates are not finite")]
    NonFinite,
}

/// Angle in degrees at `vertex` between the rays towards `arm_a` and
/// `arm_b`, in `[0, 180]`.
///
/// ```
/// use postura_analysis_core::geometry::angle_at;
/// use postura_pose_model::Point2D;
///
/// let right = angle_at(
///     Point2D::new(0.0, 0.0),
///     Point2D::new(4.0, 0.0),
///     Point2D::new(0.0, 3.0),
/// )
/// .unwrap();
/// assert!((right - 90.0).abs() < 1e-9);
/// ```
pub fn angle_at(
    vertex: Point2D,
    arm_a: Point2D,
    arm_b: Point2D,
) -> Result<f64, DegenerateGeometry> {
    if !(vertex.is_finite() && arm_a.is_finite() && arm_b.is_finite()) {
        return Err(DegenerateGeometry::NonFinite);
    }

    let (ax, ay) = arm_a.offset_from(&vertex);
    let (bx, by) = arm_b.offset_from(&vertex);
    let len_a = ax.hypot(ay);
    let len_b = bx.hypot(by);

    if len_a < MIN_ARM_LENGTH || len_b < MIN_ARM_LENGTH {
        return Err(DegenerateGeometry::CoincidentPoints);
    }

    let cos = (ax * bx + ay * by) / (len_a * len_b);
    if !cos.is_finite() {
        return Err(DegenerateGeometry::NonFinite);
    }

    // Rounding can push |cos| a hair past 1 for collinear arms.
    Ok(cos.clamp(-1.0, 1.0).acos().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn collinear_with_vertex_between_is_straight() {
        let angle = angle_at(p(0.0, 0.0), p(-5.0, 0.0), p(3.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);

        let tilted = angle_at(p(1.0, 1.0), p(0.0, 0.0), p(3.0, 3.0)).unwrap();
        assert!((tilted - 180.0).abs() < 1e-4);
    }

    #[test]
    fn right_angle() {
        let angle = angle_at(p(10.0, 10.0), p(10.0, 0.0), p(25.0, 10.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn same_direction_is_zero() {
        let angle = angle_at(p(0.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)).unwrap();
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        assert_eq!(
            angle_at(p(1.0, 1.0), p(1.0, 1.0), p(2.0, 2.0)),
            Err(DegenerateGeometry::CoincidentPoints)
        );
        assert_eq!(
            angle_at(p(1.0, 1.0), p(0.0, 0.0), p(1.0, 1.0)),
            Err(DegenerateGeometry::CoincidentPoints)
        );
    }

    #[test]
    fn nan_input_is_degenerate() {
        assert_eq!(
            angle_at(p(f64::NAN, 0.0), p(1.0, 0.0), p(0.0, 1.0)),
            Err(DegenerateGeometry::NonFinite)
        );
    }

    fn coord() -> impl Strategy<Value = f64> {
        -2000.0f64..2000.0
    }

    proptest! {
        #[test]
        fn angle_is_bounded_and_symmetric(
            vx in coord(), vy in coord(),
            ax in coord(), ay in coord(),
            bx in coord(), by in coord(),
        ) {
            let (v, a, b) = (p(vx, vy), p(ax, ay), p(bx, by));
            prop_assume!(a.offset_from(&v).0.hypot(a.offset_from(&v).1) > 1e-3);
            prop_assume!(b.offset_from(&v).0.hypot(b.offset_from(&v).1) > 1e-3);

            let forward = angle_at(v, a, b).unwrap();
            let reverse = angle_at(v, b, a).unwrap();
            prop_assert!((0.0..=180.0).contains(&forward));
            prop_assert_eq!(forward, reverse);
        }

        #[test]
        fn angle_is_translation_invariant(
            dx in coord(), dy in coord(),
            theta in 0.1f64..3.0,
        ) {
            let a = p(100.0, 0.0);
            let b = p(100.0 * theta.cos(), 100.0 * theta.sin());
            let origin = angle_at(p(0.0, 0.0), a, b).unwrap();
            let shifted = angle_at(p(dx, dy), p(a.x + dx, a.y + dy), p(b.x + dx, b.y + dy)).unwrap();
            prop_assert!((origin - theta.to_degrees()).abs() < 1e-6);
            prop_assert!((origin - shifted).abs() < 1e-6);
        }
    }
}
