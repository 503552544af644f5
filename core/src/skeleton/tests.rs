//! Tests for the body hierarchy and joint angles

use glam::{Mat4, Vec3};

use super::*;
use crate::geometry_cache::GeometryCache;
use crate::procedural::ShapeKind;
use crate::test_utils::RecordingContext;

const EPSILON: f32 = 1e-5;

fn origin(t: Transform) -> Vec3 {
    t.transform_point(Vec3::ZERO)
}

fn posed(angles: &JointAngles) -> Skeleton {
    let mut skeleton = Skeleton::new();
    skeleton.update(angles);
    skeleton
}

fn pivot(skeleton: &Skeleton, part: Part) -> Transform {
    skeleton.transform(part).unwrap().pivot
}

fn model(skeleton: &Skeleton, part: Part) -> Transform {
    skeleton.transform(part).unwrap().model
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_node_and_primitive_counts() {
    let skeleton = Skeleton::new();
    // 9 head/body/tail parts + 4 legs × (mount + 3 links)
    assert_eq!(skeleton.nodes().len(), 25);
    assert_eq!(skeleton.primitives().count(), 21);
}

#[test]
fn test_parents_precede_children() {
    let skeleton = Skeleton::new();
    for (i, node) in skeleton.nodes().iter().enumerate() {
        if let Some(parent) = node.parent {
            assert!(parent < i, "{:?} stored before its parent", node.part);
            assert_eq!(Some(skeleton.nodes()[parent].part), node.part.parent());
        } else {
            assert_eq!(node.part, Part::Body);
        }
    }
}

#[test]
fn test_only_tail_is_cylinder() {
    let skeleton = Skeleton::new();
    for (part, primitive) in skeleton.primitives() {
        if part == Part::Tail {
            assert_eq!(primitive.shape, ShapeKind::cylinder());
        } else {
            assert_eq!(primitive.shape, ShapeKind::Cube);
        }
    }
}

// ============================================================================
// Pivot chaining
// ============================================================================

#[test]
fn test_child_composes_on_parent_pivot() {
    let skeleton = posed(&JointAngles {
        body: 12.0,
        ..Default::default()
    });

    let expected = pivot(&skeleton, Part::Body).translate(Vec3::new(0.075, 0.225, -0.1));
    assert!(
        pivot(&skeleton, Part::Head)
            .matrix()
            .abs_diff_eq(expected.matrix(), EPSILON)
    );
}

#[test]
fn test_parent_scale_not_inherited() {
    let skeleton = Skeleton::new();
    let head = pivot(&skeleton, Part::Head).matrix();

    // Body scale is (0.5, 0.3, 0.65); the head frame must stay unit length
    for axis in [head.x_axis, head.y_axis, head.z_axis] {
        assert!((axis.truncate().length() - 1.0).abs() < EPSILON);
    }
}

#[test]
fn test_model_is_pivot_times_own_scale() {
    let skeleton = Skeleton::new();
    let body = skeleton.transform(Part::Body).unwrap();
    let expected = body.pivot.matrix() * Mat4::from_scale(Vec3::new(0.5, 0.3, 0.65));
    assert!(body.model.matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn test_leg_mount_uses_limb_unit() {
    let skeleton = Skeleton::new();
    let mount = pivot(&skeleton, Part::LegMount(Leg::FrontLeft)).matrix();
    for axis in [mount.x_axis, mount.y_axis, mount.z_axis] {
        assert!((axis.truncate().length() - LIMB_UNIT).abs() < EPSILON);
    }
    assert!(skeleton.node(Part::LegMount(Leg::FrontLeft)).unwrap().primitive.is_none());
}

#[test]
fn test_lower_leg_attaches_one_limb_unit_down() {
    let skeleton = posed(&JointAngles {
        legs: [LegAngles {
            upper: 40.0,
            lower: -20.0,
            paw: 10.0,
        }; 4],
        ..Default::default()
    });

    for leg in Leg::ALL {
        let upper = pivot(&skeleton, Part::UpperLeg(leg));
        let lower = origin(pivot(&skeleton, Part::LowerLeg(leg)));
        assert!(lower.abs_diff_eq(upper.transform_point(Vec3::Y), EPSILON));
        let hip = origin(upper);
        assert!(((lower - hip).length() - LIMB_UNIT).abs() < EPSILON);
    }
}

#[test]
fn test_legs_hang_below_body_at_rest() {
    let skeleton = Skeleton::new();
    for leg in Leg::ALL {
        let mount = origin(pivot(&skeleton, Part::LegMount(leg)));
        let knee = origin(pivot(&skeleton, Part::LowerLeg(leg)));
        let paw = origin(pivot(&skeleton, Part::Paw(leg)));
        assert!(knee.y < mount.y);
        assert!(paw.y < knee.y);
    }
}

#[test]
fn test_front_legs_ahead_of_back_legs() {
    let skeleton = Skeleton::new();
    let front = origin(pivot(&skeleton, Part::LegMount(Leg::FrontLeft)));
    let back = origin(pivot(&skeleton, Part::LegMount(Leg::BackLeft)));
    assert!(front.z < back.z);
}

// ============================================================================
// Joint propagation
// ============================================================================

#[test]
fn test_body_bend_moves_descendants() {
    let rest = Skeleton::new();
    let bent = posed(&JointAngles {
        body: 25.0,
        ..Default::default()
    });

    // The body pivot itself stays put
    assert!(
        origin(pivot(&rest, Part::Body)).abs_diff_eq(origin(pivot(&bent, Part::Body)), EPSILON)
    );

    for part in [
        Part::Tail,
        Part::Head,
        Part::LegMount(Leg::BackLeft),
        Part::Paw(Leg::BackRight),
    ] {
        let a = origin(model(&rest, part));
        let b = origin(model(&bent, part));
        assert!(a.distance(b) > 1e-3, "{:?} did not follow the body", part);
    }
}

#[test]
fn test_upper_leg_moves_only_its_chain() {
    let rest = Skeleton::new();
    let mut angles = JointAngles::default();
    angles.leg_mut(Leg::FrontLeft).upper = 30.0;
    let moved = posed(&angles);

    let upper_rest = origin(pivot(&rest, Part::UpperLeg(Leg::FrontLeft)));
    let upper_moved = origin(pivot(&moved, Part::UpperLeg(Leg::FrontLeft)));
    assert!(upper_rest.abs_diff_eq(upper_moved, EPSILON));

    let paw_rest = origin(pivot(&rest, Part::Paw(Leg::FrontLeft)));
    let paw_moved = origin(pivot(&moved, Part::Paw(Leg::FrontLeft)));
    assert!(paw_rest.distance(paw_moved) > 1e-3);

    let other_rest = model(&rest, Part::Paw(Leg::FrontRight));
    let other_moved = model(&moved, Part::Paw(Leg::FrontRight));
    assert_eq!(other_rest, other_moved);
}

#[test]
fn test_mouth_moves_floor_only() {
    let rest = Skeleton::new();
    let open = posed(&JointAngles {
        mouth: 15.0,
        ..Default::default()
    });

    assert_eq!(model(&rest, Part::MouthRoof), model(&open, Part::MouthRoof));
    assert_ne!(model(&rest, Part::MouthFloor), model(&open, Part::MouthFloor));
}

#[test]
fn test_primitive_matrices_follow_nodes() {
    let skeleton = posed(&JointAngles {
        tail: 20.0,
        ..Default::default()
    });
    let node = skeleton.node(Part::Tail).unwrap();
    let primitive = node.primitive.as_ref().unwrap();

    assert_eq!(primitive.transform(), node.transform.model);
    assert_eq!(
        primitive.normal_matrix(),
        node.transform.model.normal_matrix()
    );
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_draw_all_parts() {
    let skeleton = Skeleton::new();
    let mut cache = GeometryCache::new();
    let mut ctx = RecordingContext::new();

    assert_eq!(skeleton.draw(&mut cache, &mut ctx), 21);
    // 20 cubes drawn per face + 1 cylinder
    assert_eq!(ctx.draws.len(), 20 * 6 + 1);
    assert_eq!(cache.upload_count(), 2);
}

#[test]
fn test_draw_skips_failed_part() {
    let skeleton = Skeleton::new();
    let mut cache = GeometryCache::new();
    let mut ctx = RecordingContext::new();
    ctx.fail_next = 1;

    // The body's cube upload fails; the next cube part retries and succeeds
    assert_eq!(skeleton.draw(&mut cache, &mut ctx), 20);
}

// ============================================================================
// Joint angles
// ============================================================================

#[test]
fn test_joint_get_set_roundtrip_all() {
    let mut angles = JointAngles::default();
    for (i, joint) in Joint::ALL.iter().enumerate() {
        angles.set(*joint, i as f32 + 1.0);
    }
    for (i, joint) in Joint::ALL.iter().enumerate() {
        assert_eq!(angles.get(*joint), i as f32 + 1.0, "{}", joint);
    }
}

#[test]
fn test_joint_set_clamped() {
    let mut angles = JointAngles::default();
    assert_eq!(angles.set_clamped(Joint::Tail, 500.0), JOINT_LIMIT);
    assert_eq!(angles.set_clamped(Joint::Tail, -500.0), -JOINT_LIMIT);
    assert_eq!(angles.set_clamped(Joint::Tail, f32::NAN), -JOINT_LIMIT);
    assert_eq!(angles.set_clamped(Joint::Paw(Leg::BackLeft), 12.5), 12.5);
}

#[test]
fn test_joint_reset() {
    let mut angles = JointAngles::default();
    assert!(angles.is_rest_pose());
    angles.set(Joint::Lower(Leg::FrontRight), 5.0);
    assert!(!angles.is_rest_pose());
    angles.reset();
    assert!(angles.is_rest_pose());
}

#[test]
fn test_joint_display() {
    assert_eq!(Joint::Body.to_string(), "body");
    assert_eq!(Joint::Upper(Leg::BackRight).to_string(), "back-right upper");
}
