//! Builds the per-part transforms of the robot for one frame.
//!
//! Every part is the same unit cube; only its model matrix differs. Matrices
//! are composed by post-multiplication, so the last operation listed is the
//! first one applied to the cube's vertices.

use crate::animation::AnimationState;
use crate::camera::Camera;
use glam::{Mat4, Vec3};

/// Number of parts drawn per frame.
pub const PART_COUNT: usize = 10;

/// Limb swing is amplified by this factor before becoming a rotation angle.
const SWING_GAIN: f32 = 10.0;
/// Fixed elbow bend of the arms, in radians.
const ARM_BEND: f32 = 0.7;

const BODY_OFFSET: Vec3 = Vec3::new(0.0, 0.2, 0.0);
const BODY_SCALE: Vec3 = Vec3::new(0.35, 0.6, 0.4);
const HEAD_OFFSET: Vec3 = Vec3::new(0.0, 0.6, 0.0);
const HEAD_SCALE: Vec3 = Vec3::new(0.25, 0.25, 0.2);
const LEG_SCALE: Vec3 = Vec3::new(0.17, 0.2, 0.12);
const ARM_SCALE: Vec3 = Vec3::new(0.14, 0.22, 0.12);

/// A drawable piece of the robot, listed in draw order by [`BodyPart::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Body,
    Head,
    LeftUpperLeg,
    LeftLowerLeg,
    RightUpperLeg,
    RightLowerLeg,
    LeftUpperArm,
    LeftLowerArm,
    RightUpperArm,
    RightLowerArm,
}

impl BodyPart {
    pub const ALL: [BodyPart; PART_COUNT] = [
        BodyPart::Body,
        BodyPart::Head,
        BodyPart::LeftUpperLeg,
        BodyPart::LeftLowerLeg,
        BodyPart::RightUpperLeg,
        BodyPart::RightLowerLeg,
        BodyPart::LeftUpperArm,
        BodyPart::LeftLowerArm,
        BodyPart::RightUpperArm,
        BodyPart::RightLowerArm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Body => "body",
            BodyPart::Head => "head",
            BodyPart::LeftUpperLeg => "left upper leg",
            BodyPart::LeftLowerLeg => "left lower leg",
            BodyPart::RightUpperLeg => "right upper leg",
            BodyPart::RightLowerLeg => "right lower leg",
            BodyPart::LeftUpperArm => "left upper arm",
            BodyPart::LeftLowerArm => "left lower arm",
            BodyPart::RightUpperArm => "right upper arm",
            BodyPart::RightLowerArm => "right lower arm",
        }
    }

    /// Attachment point of a limb, relative to the robot origin.
    fn limb_position(self) -> Vec3 {
        match self {
            BodyPart::LeftUpperLeg => Vec3::new(0.0, -0.2, -0.1),
            BodyPart::LeftLowerLeg => Vec3::new(0.0, -0.4, -0.1),
            BodyPart::RightUpperLeg => Vec3::new(0.0, -0.2, 0.1),
            BodyPart::RightLowerLeg => Vec3::new(0.0, -0.4, 0.1),
            BodyPart::LeftUpperArm => Vec3::new(0.0, 0.3, -0.3),
            BodyPart::LeftLowerArm => Vec3::new(0.0, 0.13, -0.45),
            BodyPart::RightUpperArm => Vec3::new(0.0, 0.3, 0.3),
            BodyPart::RightLowerArm => Vec3::new(0.0, 0.13, 0.45),
            BodyPart::Body | BodyPart::Head => Vec3::ZERO,
        }
    }

    /// Model matrix of this part for the given swing angle.
    pub fn model_matrix(self, world: Mat4, swing_angle: f32) -> Mat4 {
        let swing = swing_angle * SWING_GAIN;
        let left_axis = Vec3::new(0.0, 1.0, -1.0);
        let right_axis = Vec3::new(0.0, 1.0, 1.0);

        match self {
            BodyPart::Body => {
                world * Mat4::from_translation(BODY_OFFSET) * Mat4::from_scale(BODY_SCALE)
            }
            BodyPart::Head => {
                world * Mat4::from_translation(HEAD_OFFSET) * Mat4::from_scale(HEAD_SCALE)
            }
            BodyPart::LeftUpperLeg | BodyPart::LeftLowerLeg => {
                world
                    * rotate(left_axis, swing)
                    * Mat4::from_translation(self.limb_position())
                    * Mat4::from_scale(LEG_SCALE)
            }
            BodyPart::RightUpperLeg | BodyPart::RightLowerLeg => {
                world
                    * rotate(left_axis, -swing)
                    * Mat4::from_translation(self.limb_position())
                    * Mat4::from_scale(LEG_SCALE)
            }
            BodyPart::LeftUpperArm | BodyPart::LeftLowerArm => {
                world
                    * rotate(left_axis, -swing)
                    * Mat4::from_translation(self.limb_position())
                    * Mat4::from_rotation_x(ARM_BEND)
                    * Mat4::from_scale(ARM_SCALE)
            }
            BodyPart::RightUpperArm | BodyPart::RightLowerArm => {
                world
                    * rotate(right_axis, -swing)
                    * Mat4::from_translation(self.limb_position())
                    * Mat4::from_rotation_x(-ARM_BEND)
                    * Mat4::from_scale(ARM_SCALE)
            }
        }
    }
}

fn rotate(axis: Vec3, angle: f32) -> Mat4 {
    Mat4::from_axis_angle(axis.normalize(), angle)
}

/// One draw: a part, its model matrix and the combined projection * view * model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartDraw {
    pub part: BodyPart,
    pub model: Mat4,
    pub pvm: Mat4,
}

/// All draws of one frame in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub draws: [PartDraw; PART_COUNT],
}

impl DrawList {
    pub fn iter(&self) -> impl Iterator<Item = &PartDraw> {
        self.draws.iter()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn get(&self, part: BodyPart) -> Option<&PartDraw> {
        self.draws.iter().find(|d| d.part == part)
    }
}

/// World transform of the whole robot.
///
/// The robot stands still unless `spin` is set, in which case it turns about
/// +Y by the accumulated body rotation.
pub fn world_transform(state: &AnimationState, spin: bool) -> Mat4 {
    if spin {
        Mat4::from_rotation_y(state.body_rotation)
    } else {
        Mat4::IDENTITY
    }
}

/// Compose every part of the robot for the current frame.
pub fn compose(state: &AnimationState, camera: &Camera, world: Mat4) -> DrawList {
    let view_proj = camera.view_projection();
    let draws = BodyPart::ALL.map(|part| {
        let model = part.model_matrix(world, state.swing_angle);
        PartDraw {
            part,
            model,
            pvm: view_proj * model,
        }
    });
    DrawList { draws }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationConfig;
    use glam::Vec4;

    fn origin_of(m: Mat4) -> Vec3 {
        m.w_axis.truncate()
    }

    #[test]
    fn draw_order_is_fixed() {
        let list = compose(&AnimationState::default(), &Camera::default(), Mat4::IDENTITY);
        let parts: Vec<BodyPart> = list.iter().map(|d| d.part).collect();
        assert_eq!(parts, BodyPart::ALL.to_vec());
        assert_eq!(list.len(), 10);
    }

    #[test]
    fn body_and_head_ignore_swing() {
        let a = BodyPart::Body.model_matrix(Mat4::IDENTITY, 0.05);
        let b = BodyPart::Body.model_matrix(Mat4::IDENTITY, -0.05);
        assert_eq!(a, b);

        let body = BodyPart::Body.model_matrix(Mat4::IDENTITY, 0.0);
        assert_eq!(origin_of(body), Vec3::new(0.0, 0.2, 0.0));
        let corner = body * Vec4::new(0.5, 0.5, 0.5, 1.0);
        assert!(corner.abs_diff_eq(Vec4::new(0.175, 0.5, 0.2, 1.0), 1e-6));

        let head = BodyPart::Head.model_matrix(Mat4::IDENTITY, 0.0);
        assert_eq!(origin_of(head), Vec3::new(0.0, 0.6, 0.0));
        let corner = head * Vec4::new(0.5, 0.5, 0.5, 1.0);
        assert!(corner.abs_diff_eq(Vec4::new(0.125, 0.725, 0.1, 1.0), 1e-6));
    }

    #[test]
    fn legs_at_rest_sit_at_their_attachment_points() {
        for part in [
            BodyPart::LeftUpperLeg,
            BodyPart::LeftLowerLeg,
            BodyPart::RightUpperLeg,
            BodyPart::RightLowerLeg,
        ] {
            let m = part.model_matrix(Mat4::IDENTITY, 0.0);
            assert!(origin_of(m).abs_diff_eq(part.limb_position(), 1e-6));
            assert!(m.x_axis.truncate().abs_diff_eq(Vec3::new(0.17, 0.0, 0.0), 1e-6));
        }
    }

    #[test]
    fn legs_swing_in_opposite_directions() {
        let angle = 0.05;
        let left = BodyPart::LeftUpperLeg.model_matrix(Mat4::IDENTITY, angle);
        let right = BodyPart::RightUpperLeg.model_matrix(Mat4::IDENTITY, angle);

        let axis = Vec3::new(0.0, 1.0, -1.0).normalize();
        let expected_left = Mat4::from_axis_angle(axis, 0.5)
            * Mat4::from_translation(Vec3::new(0.0, -0.2, -0.1))
            * Mat4::from_scale(LEG_SCALE);
        let expected_right = Mat4::from_axis_angle(axis, -0.5)
            * Mat4::from_translation(Vec3::new(0.0, -0.2, 0.1))
            * Mat4::from_scale(LEG_SCALE);
        assert!(left.abs_diff_eq(expected_left, 1e-6));
        assert!(right.abs_diff_eq(expected_right, 1e-6));
    }

    #[test]
    fn arms_bend_after_translation() {
        let angle = -0.03;
        let left = BodyPart::LeftLowerArm.model_matrix(Mat4::IDENTITY, angle);
        let right = BodyPart::RightLowerArm.model_matrix(Mat4::IDENTITY, angle);

        let expected_left = Mat4::from_axis_angle(Vec3::new(0.0, 1.0, -1.0).normalize(), 0.3)
            * Mat4::from_translation(Vec3::new(0.0, 0.13, -0.45))
            * Mat4::from_rotation_x(0.7)
            * Mat4::from_scale(ARM_SCALE);
        let expected_right = Mat4::from_axis_angle(Vec3::new(0.0, 1.0, 1.0).normalize(), 0.3)
            * Mat4::from_translation(Vec3::new(0.0, 0.13, 0.45))
            * Mat4::from_rotation_x(-0.7)
            * Mat4::from_scale(ARM_SCALE);
        assert!(left.abs_diff_eq(expected_left, 1e-6));
        assert!(right.abs_diff_eq(expected_right, 1e-6));
    }

    #[test]
    fn arm_bend_does_not_move_attachment_point() {
        let m = BodyPart::LeftUpperArm.model_matrix(Mat4::IDENTITY, 0.0);
        assert!(origin_of(m).abs_diff_eq(Vec3::new(0.0, 0.3, -0.3), 1e-6));
    }

    #[test]
    fn pvm_is_projection_view_model() {
        let camera = Camera::default();
        let state = AnimationState::default();
        let list = compose(&state, &camera, Mat4::IDENTITY);
        for d in list.iter() {
            let expected = camera.projection_matrix() * camera.view_matrix() * d.model;
            assert!(d.pvm.abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn world_is_identity_without_spin() {
        let cfg = AnimationConfig::default();
        let mut state = AnimationState::new(&cfg);
        for _ in 0..100 {
            state.tick(std::time::Duration::from_millis(20), &cfg);
        }
        assert_eq!(world_transform(&state, false), Mat4::IDENTITY);
        let spun = world_transform(&state, true);
        assert!(spun.abs_diff_eq(Mat4::from_rotation_y(state.body_rotation), 1e-6));
    }

    #[test]
    fn world_transform_applies_to_every_part() {
        let state = AnimationState::default();
        let world = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let list = compose(&state, &Camera::default(), world);
        let head = list.get(BodyPart::Head).unwrap();
        assert!(origin_of(head.model).abs_diff_eq(Vec3::new(1.0, 0.6, 0.0), 1e-6));
    }
}
