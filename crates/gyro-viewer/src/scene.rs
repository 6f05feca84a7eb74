//! The cube scene: static geometry plus the rotation state advanced once
//! per frame.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Angle adjustment applied per frame while a direction key is held.
pub const KEY_STEP_DEG: f32 = 2.0;

/// Bounds for the startup speed draw, in degrees/frame.
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.1..=2.0;

/// Angles reset to zero once their magnitude passes this.
const WRAP_LIMIT_DEG: f32 = 360.0;

/// Direction keys held during the current frame.
#[derive(Debug, Copy, Clone, Default)]
pub struct ArrowInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Current rotation angles and the fixed per-frame speeds.
///
/// Angles stay in (-360, 360]; speeds are drawn once at startup and never
/// change.
#[derive(Debug, Copy, Clone)]
pub struct RotationState {
    pub angle_x: f32,
    pub angle_y: f32,
    pub speed_x: f32,
    pub speed_y: f32,
}

/// Owns the rotation state and the cube's static geometry description.
pub struct CubeScene {
    rotation: RotationState,
}

impl CubeScene {
    pub fn new(speed_x: f32, speed_y: f32) -> Self {
        Self {
            rotation: RotationState {
                angle_x: 0.0,
                angle_y: 0.0,
                speed_x,
                speed_y,
            },
        }
    }

    /// Current `(angle_x, angle_y)` in degrees.
    pub fn angles(&self) -> (f32, f32) {
        (self.rotation.angle_x, self.rotation.angle_y)
    }

    /// Advances the rotation by one frame: held keys first, then the
    /// autonomous speed, unconditionally.
    ///
    /// An angle whose magnitude ends up past 360 is reset to exactly zero.
    /// The overshoot is discarded rather than folded back, so the cube
    /// visibly snaps at the limit.
    pub fn advance(&mut self, input: ArrowInput) {
        let r = &mut self.rotation;

        if input.up {
            r.angle_x -= KEY_STEP_DEG;
        }
        if input.down {
            r.angle_x += KEY_STEP_DEG;
        }
        if input.left {
            r.angle_y -= KEY_STEP_DEG;
        }
        if input.right {
            r.angle_y += KEY_STEP_DEG;
        }

        r.angle_x += r.speed_x;
        r.angle_y += r.speed_y;

        if r.angle_x > WRAP_LIMIT_DEG || r.angle_x < -WRAP_LIMIT_DEG {
            r.angle_x = 0.0;
        }
        if r.angle_y > WRAP_LIMIT_DEG || r.angle_y < -WRAP_LIMIT_DEG {
            r.angle_y = 0.0;
        }
    }

    /// Builds `projection * view * model` with
    /// `model = rotate_x(angle_x) * rotate_y(angle_y)`.
    pub fn composite(&self, projection: Mat4, view: Mat4) -> Mat4 {
        let model = Mat4::from_rotation_x(self.rotation.angle_x.to_radians())
            * Mat4::from_rotation_y(self.rotation.angle_y.to_radians());
        projection * view * model
    }
}

/// Cube vertex: position + flat face color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

const fn v(position: [f32; 3], color: [f32; 3]) -> CubeVertex {
    CubeVertex { position, color }
}

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
const MAGENTA: [f32; 3] = [1.0, 0.0, 1.0];
const CYAN: [f32; 3] = [0.0, 1.0, 1.0];

/// 4 vertices per face, 6 faces, one flat color each.
pub const CUBE_VERTICES: [CubeVertex; 24] = [
    // back face: red
    v([-0.5, -0.5, -0.5], RED),
    v([0.5, -0.5, -0.5], RED),
    v([0.5, 0.5, -0.5], RED),
    v([-0.5, 0.5, -0.5], RED),
    // front face: green
    v([-0.5, -0.5, 0.5], GREEN),
    v([0.5, -0.5, 0.5], GREEN),
    v([0.5, 0.5, 0.5], GREEN),
    v([-0.5, 0.5, 0.5], GREEN),
    // left face: blue
    v([-0.5, 0.5, 0.5], BLUE),
    v([-0.5, 0.5, -0.5], BLUE),
    v([-0.5, -0.5, -0.5], BLUE),
    v([-0.5, -0.5, 0.5], BLUE),
    // right face: yellow
    v([0.5, 0.5, 0.5], YELLOW),
    v([0.5, 0.5, -0.5], YELLOW),
    v([0.5, -0.5, -0.5], YELLOW),
    v([0.5, -0.5, 0.5], YELLOW),
    // bottom face: magenta
    v([-0.5, -0.5, -0.5], MAGENTA),
    v([0.5, -0.5, -0.5], MAGENTA),
    v([0.5, -0.5, 0.5], MAGENTA),
    v([-0.5, -0.5, 0.5], MAGENTA),
    // top face: cyan
    v([-0.5, 0.5, -0.5], CYAN),
    v([0.5, 0.5, -0.5], CYAN),
    v([0.5, 0.5, 0.5], CYAN),
    v([-0.5, 0.5, 0.5], CYAN),
];

/// Two triangles per face.
pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 2, 3, 0, // back
    4, 5, 6, 6, 7, 4, // front
    8, 9, 10, 10, 11, 8, // left
    12, 13, 14, 14, 15, 12, // right
    16, 17, 18, 18, 19, 16, // bottom
    20, 21, 22, 22, 23, 20, // top
];

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    fn scene(speed_x: f32, speed_y: f32) -> CubeScene {
        CubeScene::new(speed_x, speed_y)
    }

    // ── rotation wrap ─────────────────────────────────────────────────────

    #[test]
    fn crossing_positive_limit_snaps_to_zero() {
        let mut s = scene(2.0, 0.0);
        s.rotation.angle_x = 359.0;
        s.advance(ArrowInput::default());
        // 361 > 360: the whole overshoot is discarded, not folded back.
        assert_eq!(s.angles().0, 0.0);
    }

    #[test]
    fn crossing_negative_limit_snaps_to_zero() {
        let mut s = scene(0.0, 1.0);
        s.rotation.angle_x = -359.5;
        s.advance(ArrowInput { up: true, ..Default::default() });
        // -359.5 - 2.0 = -361.5 < -360.
        assert_eq!(s.angles().0, 0.0);
    }

    #[test]
    fn exactly_the_limit_does_not_snap() {
        let mut s = scene(1.0, 0.0);
        s.rotation.angle_x = 359.0;
        s.advance(ArrowInput::default());
        // 360 is still in range; the reset fires only past the limit.
        assert_eq!(s.angles().0, 360.0);

        s.advance(ArrowInput::default());
        assert_eq!(s.angles().0, 0.0);
    }

    #[test]
    fn angles_stay_in_range_over_many_frames() {
        let mut s = scene(1.9, 0.7);
        for _ in 0..2000 {
            s.advance(ArrowInput { right: true, ..Default::default() });
            let (x, y) = s.angles();
            assert!(x > -360.0 && x <= 360.0, "angle_x out of range: {x}");
            assert!(y > -360.0 && y <= 360.0, "angle_y out of range: {y}");
        }
    }

    // ── advance ───────────────────────────────────────────────────────────

    #[test]
    fn ten_frames_without_input_accumulate_the_speeds() {
        let mut s = scene(1.0, 1.5);
        for _ in 0..10 {
            s.advance(ArrowInput::default());
        }
        assert_eq!(s.angles(), (10.0, 15.0));
    }

    #[test]
    fn held_keys_step_by_two_degrees() {
        let mut s = scene(0.0, 0.0);
        s.advance(ArrowInput { up: true, right: true, ..Default::default() });
        assert_eq!(s.angles(), (-2.0, 2.0));

        s.advance(ArrowInput { down: true, left: true, ..Default::default() });
        assert_eq!(s.angles(), (0.0, 0.0));
    }

    #[test]
    fn speed_applies_even_while_keys_are_held() {
        let mut s = scene(0.5, 0.0);
        s.advance(ArrowInput { down: true, ..Default::default() });
        assert_eq!(s.angles().0, 2.5);
    }

    // ── composite ─────────────────────────────────────────────────────────

    #[test]
    fn composite_at_zero_angles_is_projection_times_view() {
        let s = scene(1.0, 1.0);
        let projection = Mat4::perspective_rh(45f32.to_radians(), 1.5, 0.1, 100.0);
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));

        assert_eq!(s.composite(projection, view), projection * view);
    }

    #[test]
    fn composite_applies_x_rotation_before_y() {
        let mut s = scene(0.0, 0.0);
        s.rotation.angle_x = 30.0;
        s.rotation.angle_y = 60.0;

        let expected = Mat4::from_rotation_x(30f32.to_radians())
            * Mat4::from_rotation_y(60f32.to_radians());
        assert_eq!(s.composite(Mat4::IDENTITY, Mat4::IDENTITY), expected);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn indices_address_valid_vertices() {
        assert_eq!(CUBE_VERTICES.len(), 24);
        assert_eq!(CUBE_INDICES.len(), 36);
        assert!(CUBE_INDICES.iter().all(|&i| (i as usize) < CUBE_VERTICES.len()));
    }

    #[test]
    fn each_face_is_flat_colored() {
        for face in CUBE_VERTICES.chunks(4) {
            assert!(face.iter().all(|v| v.color == face[0].color));
        }
    }
}
