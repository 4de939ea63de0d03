//! Arcball Camera Controller
//!
//! Pointer drags are projected onto a virtual hemisphere and turned into
//! incremental rotations that accumulate into the camera orientation. Wheel
//! input scales a target orbit radius that the current radius eases towards
//! once per frame.

use crate::math3d::{Quat, Vec2, Vec3};

/// Closest allowed orbit radius, in planet radii.
pub const MIN_RADIUS: f32 = 1.5;
/// Farthest allowed orbit radius, in planet radii.
pub const MAX_RADIUS: f32 = 1500.0;

/// Radius multiplier per wheel notch
const ZOOM_STEP: f32 = 1.1;

/// Fraction of the current radius kept each tick.
/// Applied per call, so the easing speed follows the frame rate.
const RADIUS_DECAY: f32 = 0.9;

/// Camera orientation and orbit distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub orientation: Quat,
    pub radius_target: f32,
    pub radius_current: f32,
}

impl CameraState {
    /// Orientation is renormalized and the radius clamped into range.
    pub fn new(orientation: Quat, radius: f32) -> Self {
        let radius = clamp_radius(radius);
        Self {
            orientation: orientation.normalize(),
            radius_target: radius,
            radius_current: radius,
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Quat::IDENTITY, 2.0)
    }
}

fn clamp_radius(radius: f32) -> f32 {
    if radius.is_finite() {
        radius.clamp(MIN_RADIUS, MAX_RADIUS)
    } else {
        MIN_RADIUS
    }
}

/// Pointer drag in progress
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub previous: Vec2,
    pub current: Vec2,
}

/// Map a pointer position (window pixels) onto the unit arcball.
///
/// Inside the inscribed disc the point is lifted onto the hemisphere; outside
/// it is pulled onto the disc's rim with zero depth.
pub fn arcball_vector(pointer: Vec2, viewport: Vec2) -> Vec3 {
    let x = pointer.x / viewport.x.max(1.0) * 2.0 - 1.0;
    let y = 1.0 - pointer.y / viewport.y.max(1.0) * 2.0;
    let dot = x * x + y * y;
    if dot < 1.0 {
        Vec3::new(x, y, (1.0 - dot).sqrt())
    } else {
        let len = dot.sqrt();
        Vec3::new(x / len, y / len, 0.0)
    }
}

/// Shortest-arc rotation taking `from` onto `to`, normalized.
/// Collapses to the identity for opposite or degenerate vectors.
pub fn rotation_between(from: Vec3, to: Vec3) -> Quat {
    let w = (from.length_squared() * to.length_squared()).sqrt() + from.dot(&to);
    Quat::from_vec_scalar(from.cross(&to), w).normalize()
}

pub struct ArcballController {
    camera: CameraState,
    drag: DragState,
    viewport: Vec2,
}

impl ArcballController {
    pub fn new(camera: CameraState, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            camera,
            drag: DragState::default(),
            viewport: Vec2::new(viewport_width as f32, viewport_height as f32),
        }
    }

    #[inline]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    #[cfg(test)]
    #[inline]
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    /// Start tracking a drag. No rotation is applied until the pointer moves.
    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.drag = DragState {
            active: true,
            previous: pointer,
            current: pointer,
        };
        tracing::debug!(x = pointer.x, y = pointer.y, "drag started");
    }

    /// Rotate by the arc between the last and the new pointer position.
    /// Ignored unless a drag is active.
    pub fn update_drag(&mut self, pointer: Vec2) {
        if !self.drag.active {
            return;
        }
        self.drag.previous = self.drag.current;
        self.drag.current = pointer;

        // Both ends are taken into world space by the current orientation so
        // successive increments compose in the same frame.
        let orientation = self.camera.orientation;
        let prev = orientation.rotate(arcball_vector(self.drag.previous, self.viewport));
        let curr = orientation.rotate(arcball_vector(self.drag.current, self.viewport));

        let increment = rotation_between(curr, prev);
        self.camera.orientation = (increment * orientation).normalize();
    }

    /// Stop applying rotation. Safe to call when no drag is active.
    pub fn end_drag(&mut self) {
        if self.drag.active {
            tracing::debug!("drag ended");
        }
        self.drag = DragState::default();
    }

    /// Scale the target radius by `1.1^sign(delta)`.
    /// A step that would leave `[MIN_RADIUS, MAX_RADIUS]` is dropped.
    pub fn apply_zoom_delta(&mut self, delta: f32) {
        let step = if delta > 0.0 {
            ZOOM_STEP
        } else if delta < 0.0 {
            1.0 / ZOOM_STEP
        } else {
            return;
        };

        let candidate = self.camera.radius_target * step;
        if (MIN_RADIUS..=MAX_RADIUS).contains(&candidate) {
            self.camera.radius_target = candidate;
        } else {
            tracing::debug!(candidate, "zoom step out of range, ignored");
        }
    }

    /// Ease the current radius towards the target and return the new state.
    pub fn tick(&mut self) -> CameraState {
        self.camera.radius_current =
            self.camera.radius_current * RADIUS_DECAY + self.camera.radius_target * (1.0 - RADIUS_DECAY);
        self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: u32 = 800;
    const H: u32 = 600;

    fn controller() -> ArcballController {
        ArcballController::new(CameraState::default(), W, H)
    }

    #[test]
    fn test_arcball_center_is_pole() {
        let v = arcball_vector(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0));
        assert!(v.approx_eq(&Vec3::Z, 1e-6));
    }

    #[test]
    fn test_arcball_outside_disc_lands_on_rim() {
        let v = arcball_vector(Vec2::new(800.0, 0.0), Vec2::new(800.0, 600.0));
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert_eq!(v.z, 0.0);
        assert!(v.x > 0.0 && v.y > 0.0);
    }

    #[test]
    fn test_arcball_far_outside_viewport_is_finite() {
        let v = arcball_vector(Vec2::new(-5000.0, 9000.0), Vec2::new(800.0, 600.0));
        assert!(v.is_finite());
        assert!((v.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_between_identical_is_identity() {
        let v = Vec3::new(0.3, 0.4, 0.866).normalize();
        assert!(rotation_between(v, v).approx_eq(&Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn test_rotation_between_opposite_is_identity() {
        assert_eq!(rotation_between(Vec3::Z, -Vec3::Z), Quat::IDENTITY);
    }

    #[test]
    fn test_rotation_between_maps_from_onto_to() {
        let from = Vec3::new(1.0, 0.2, 0.1).normalize();
        let to = Vec3::new(-0.3, 0.9, 0.2).normalize();
        let q = rotation_between(from, to);
        assert!(q.rotate(from).approx_eq(&to, 1e-5));
    }

    #[test]
    fn test_begin_drag_applies_no_rotation() {
        let mut c = controller();
        let before = c.camera().orientation;
        c.begin_drag(Vec2::new(100.0, 100.0));
        assert_eq!(c.camera().orientation, before);
        assert!(c.drag().active);
    }

    #[test]
    fn test_update_without_drag_is_noop() {
        let mut c = controller();
        c.update_drag(Vec2::new(10.0, 10.0));
        assert_eq!(c.camera().orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_no_rotation_after_release() {
        let mut c = controller();
        c.begin_drag(Vec2::new(400.0, 300.0));
        c.update_drag(Vec2::new(420.0, 300.0));
        c.end_drag();
        let released = c.camera().orientation;
        c.update_drag(Vec2::new(600.0, 100.0));
        c.update_drag(Vec2::new(50.0, 500.0));
        assert_eq!(c.camera().orientation, released);
        assert!(!c.drag().active);
    }

    #[test]
    fn test_small_horizontal_drag_rotates_about_vertical_axis() {
        let mut c = controller();
        let center = Vec2::new(W as f32 / 2.0, H as f32 / 2.0);
        c.begin_drag(center);
        c.update_drag(Vec2::new(center.x + 10.0, center.y));

        let q = c.camera().orientation;
        assert!(q.x.abs() < 1e-6, "{:?}", q);
        assert!(q.z.abs() < 1e-6, "{:?}", q);
        assert!(q.y.abs() > 0.0);

        // Arc between the hemisphere pole and a point 20/W across
        let expected = (20.0 / W as f32).asin();
        let angle = q.angle();
        assert!(angle > 0.0);
        assert!((angle - expected).abs() < 1e-3, "{} vs {}", angle, expected);
    }

    #[test]
    fn test_zoom_out_and_in() {
        let mut c = controller();
        c.apply_zoom_delta(1.0);
        assert!((c.camera().radius_target - 2.2).abs() < 1e-5);
        c.apply_zoom_delta(-3.0);
        assert!((c.camera().radius_target - 2.0).abs() < 1e-5);
        c.apply_zoom_delta(0.0);
        assert!((c.camera().radius_target - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_converges_to_bounds() {
        let mut c = controller();
        for _ in 0..200 {
            c.apply_zoom_delta(-1.0);
        }
        let near = c.camera().radius_target;
        assert!(near >= MIN_RADIUS && near < MIN_RADIUS * ZOOM_STEP);

        for _ in 0..500 {
            c.apply_zoom_delta(1.0);
        }
        let far = c.camera().radius_target;
        assert!(far <= MAX_RADIUS && far > MAX_RADIUS / ZOOM_STEP);
    }

    #[test]
    fn test_tick_eases_monotonically_without_overshoot() {
        let mut camera = CameraState::new(Quat::IDENTITY, 2.0);
        camera.radius_target = 10.0;
        let mut c = ArcballController::new(camera, W, H);

        let mut last = c.camera().radius_current;
        for _ in 0..10 {
            let state = c.tick();
            assert!(state.radius_current > last);
            assert!(state.radius_current < 10.0);
            last = state.radius_current;
        }
    }

    #[test]
    fn test_camera_state_new_clamps() {
        let s = CameraState::new(Quat::new(0.0, 0.0, 0.0, 3.0), 0.1);
        assert_eq!(s.radius_current, MIN_RADIUS);
        assert_eq!(s.orientation, Quat::IDENTITY);
        assert_eq!(CameraState::new(Quat::IDENTITY, f32::NAN).radius_target, MIN_RADIUS);
    }

    proptest! {
        #[test]
        fn prop_orientation_stays_unit(
            moves in prop::collection::vec((-200.0f32..1000.0, -200.0f32..800.0), 1..60),
        ) {
            let mut c = ArcballController::new(
                CameraState::new(Quat::new(0.379, 0.271, 0.082, -0.881), 2.0),
                W,
                H,
            );
            c.begin_drag(Vec2::new(moves[0].0, moves[0].1));
            for &(x, y) in &moves {
                c.update_drag(Vec2::new(x, y));
                prop_assert!((c.camera().orientation.length() - 1.0).abs() < 1e-4);
            }
        }

        #[test]
        fn prop_zoom_never_leaves_range(steps in prop::collection::vec(-1.0f32..1.0, 0..400)) {
            let mut c = controller();
            for s in steps {
                c.apply_zoom_delta(s);
                let r = c.camera().radius_target;
                prop_assert!(r >= MIN_RADIUS && r <= MAX_RADIUS);
                let current = c.tick().radius_current;
                prop_assert!(current >= MIN_RADIUS && current <= MAX_RADIUS);
            }
        }
    }
}
