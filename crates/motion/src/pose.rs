use glam::{EulerRot, Quat, Vec3};
use perch_kernel::Host;

/// Target rotation for one rig joint, in degrees (x pitch, y yaw, z roll).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointTarget {
    pub joint: &'static str,
    pub degrees: Vec3,
}

const fn target(joint: &'static str, x: f32, y: f32, z: f32) -> JointTarget {
    JointTarget {
        joint,
        degrees: Vec3::new(x, y, z),
    }
}

/// Leg rotations of the seated pose.
pub const SEATED_POSE: [JointTarget; 6] = [
    target("RightUpLeg", 100.0, 15.0, 0.0),
    target("RightLeg", -130.0, 15.0, 0.0),
    target("RightFoot", 30.0, 15.0, 0.0),
    target("LeftUpLeg", 100.0, -15.0, 0.0),
    target("LeftLeg", -130.0, -15.0, 0.0),
    target("LeftFoot", 30.0, 15.0, 0.0),
];

/// Euler angles of `rotation` in degrees, x pitch, y yaw, z roll.
pub fn euler_degrees(rotation: Quat) -> Vec3 {
    let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Inverse of [`euler_degrees`].
pub fn quat_from_degrees(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::ZYX,
        degrees.z.to_radians(),
        degrees.y.to_radians(),
        degrees.x.to_radians(),
    )
}

/// Start rotation of a joint and the delta to its seated target.
#[derive(Debug, Clone, PartialEq)]
pub struct JointTransition {
    pub joint: &'static str,
    pub start: Vec3,
    pub delta: Vec3,
}

impl JointTransition {
    /// Rotation in degrees at blend `factor` (0 = start, 1 = target).
    pub fn at(&self, factor: f32) -> Vec3 {
        self.start + self.delta * factor
    }
}

/// Joint rotations captured when a sit-down starts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointBlend {
    transitions: Vec<JointTransition>,
}

impl JointBlend {
    /// Read the current rotation of every joint in `pose` from the rig.
    pub fn capture(host: &impl Host, pose: &[JointTarget]) -> Self {
        let transitions = pose
            .iter()
            .map(|t| {
                let start = euler_degrees(host.joint_rotation(t.joint));
                JointTransition {
                    joint: t.joint,
                    start,
                    delta: t.degrees - start,
                }
            })
            .collect();
        Self { transitions }
    }

    /// Write the blended rotation of every captured joint to the rig.
    pub fn apply(&self, host: &mut impl Host, factor: f32) {
        for t in &self.transitions {
            host.set_joint_rotation(t.joint, quat_from_degrees(t.at(factor)));
        }
    }

    pub fn transitions(&self) -> &[JointTransition] {
        &self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_kernel::SimHost;

    fn same_rotation(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() > 1.0 - 1e-5
    }

    #[test]
    fn degrees_round_trip() {
        let d = Vec3::new(30.0, 15.0, -10.0);
        let back = euler_degrees(quat_from_degrees(d));
        assert!((back - d).length() < 1e-3);
    }

    #[test]
    fn capture_reads_rig_and_targets_pose() {
        let mut host = SimHost::new();
        host.set_joint_rotation("RightFoot", quat_from_degrees(Vec3::new(10.0, 0.0, 0.0)));
        let blend = JointBlend::capture(&host, &SEATED_POSE);
        assert_eq!(blend.transitions().len(), SEATED_POSE.len());

        let foot = &blend.transitions()[2];
        assert_eq!(foot.joint, "RightFoot");
        assert!((foot.start - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);
        assert!((foot.at(1.0) - Vec3::new(30.0, 15.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn apply_endpoints() {
        let mut host = SimHost::new();
        let blend = JointBlend::capture(&host, &SEATED_POSE);

        blend.apply(&mut host, 0.0);
        for t in &SEATED_POSE {
            assert!(same_rotation(host.joint_rotation(t.joint), Quat::IDENTITY));
        }

        blend.apply(&mut host, 1.0);
        for t in &SEATED_POSE {
            assert!(same_rotation(
                host.joint_rotation(t.joint),
                quat_from_degrees(t.degrees)
            ));
        }
    }
}
