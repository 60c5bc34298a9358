//! Euler angle conversion for rotate orders.
//!
//! A rotate order `abc` applies `a` first, so the rotation is `Rc * Rb * Ra`.
//! That is glam's intrinsic `CBA` order with angles passed as `(c, b, a)`.

use glam::{DAffine3, DQuat, DVec3, EulerRot};
use spaceswitch_spec::RotateOrder;

/// glam order and the `[a, b, c]` axis indices of a rotate order.
fn euler_axes(order: RotateOrder) -> (EulerRot, [usize; 3]) {
    match order {
        RotateOrder::Xyz => (EulerRot::ZYX, [0, 1, 2]),
        RotateOrder::Yzx => (EulerRot::XZY, [1, 2, 0]),
        RotateOrder::Zxy => (EulerRot::YXZ, [2, 0, 1]),
        RotateOrder::Xzy => (EulerRot::YZX, [0, 2, 1]),
        RotateOrder::Yxz => (EulerRot::ZXY, [1, 0, 2]),
        RotateOrder::Zyx => (EulerRot::XYZ, [2, 1, 0]),
    }
}

/// Builds a quaternion from per-axis angles in degrees.
pub fn quat_from_degrees(order: RotateOrder, degrees: [f64; 3]) -> DQuat {
    let (rot, [a, b, c]) = euler_axes(order);
    DQuat::from_euler(
        rot,
        degrees[c].to_radians(),
        degrees[b].to_radians(),
        degrees[a].to_radians(),
    )
}

/// Decomposes a quaternion into per-axis angles in degrees.
pub fn degrees_from_quat(order: RotateOrder, rotation: DQuat) -> [f64; 3] {
    let (rot, [a, b, c]) = euler_axes(order);
    let (first, second, third) = rotation.to_euler(rot);
    let mut degrees = [0.0; 3];
    degrees[c] = first.to_degrees();
    degrees[b] = second.to_degrees();
    degrees[a] = third.to_degrees();
    degrees
}

/// Local matrix from translate, rotate (degrees) and scale channels.
pub fn local_matrix(
    translate: [f64; 3],
    rotate: [f64; 3],
    scale: [f64; 3],
    order: RotateOrder,
) -> DAffine3 {
    DAffine3::from_scale_rotation_translation(
        DVec3::from_array(scale),
        quat_from_degrees(order, rotate),
        DVec3::from_array(translate),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: [RotateOrder; 6] = [
        RotateOrder::Xyz,
        RotateOrder::Yzx,
        RotateOrder::Zxy,
        RotateOrder::Xzy,
        RotateOrder::Yxz,
        RotateOrder::Zyx,
    ];

    #[test]
    fn test_xyz_applies_x_first() {
        let q = quat_from_degrees(RotateOrder::Xyz, [30.0, 40.0, 50.0]);
        let expected = DQuat::from_rotation_z(50f64.to_radians())
            * DQuat::from_rotation_y(40f64.to_radians())
            * DQuat::from_rotation_x(30f64.to_radians());
        assert!(q.abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn test_zxy_applies_z_first() {
        let q = quat_from_degrees(RotateOrder::Zxy, [10.0, 20.0, 30.0]);
        let expected = DQuat::from_rotation_y(20f64.to_radians())
            * DQuat::from_rotation_x(10f64.to_radians())
            * DQuat::from_rotation_z(30f64.to_radians());
        assert!(q.abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn test_degrees_survive_every_order() {
        let angles = [25.0, -35.0, 70.0];
        for order in ORDERS {
            let back = degrees_from_quat(order, quat_from_degrees(order, angles));
            for axis in 0..3 {
                assert!(
                    (back[axis] - angles[axis]).abs() < 1e-9,
                    "{order}: {back:?} != {angles:?}"
                );
            }
        }
    }

    #[test]
    fn test_orders_disagree_on_same_angles() {
        let angles = [30.0, 45.0, 60.0];
        let xyz = quat_from_degrees(RotateOrder::Xyz, angles);
        let zyx = quat_from_degrees(RotateOrder::Zyx, angles);
        assert!(!xyz.abs_diff_eq(zyx, 1e-6));
    }
}
