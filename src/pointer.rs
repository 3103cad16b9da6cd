//! Pointer-to-world projection and device gesture tracking.
//!
//! Converts 2D device coordinates into a world-space point on the particle
//! plane (z = 0) for attract/repel interaction, independent of the input
//! device. The mouse path is throttled to ~30 updates per second; touch is
//! unthrottled but gated by press-duration semantics:
//!
//! - short tap (< 500 ms): transient attract pulse, auto-reverting after 1 s
//! - sustained press (>= 500 ms, without moving): repel until release

use crate::camera::Camera;
use crate::config::PointerMode;
use glam::{Vec3, Vec4, Vec4Swizzles};
use std::time::{Duration, Instant};

/// Minimum interval between mouse-driven world-point updates.
pub const MOUSE_THROTTLE: Duration = Duration::from_millis(33);

/// Press duration that switches a touch from tap to sustained press.
pub const LONG_PRESS: Duration = Duration::from_millis(500);

/// How long a tap's attract pulse lasts before reverting.
pub const ATTRACT_PULSE: Duration = Duration::from_millis(1000);

/// Ray directions closer to parallel with the particle plane than this are
/// rejected rather than divided through.
const RAY_Z_EPSILON: f32 = 1e-6;

/// Viewport rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    /// Left edge in device pixels.
    pub x: f32,
    /// Top edge in device pixels.
    pub y: f32,
    /// Width in device pixels.
    pub width: f32,
    /// Height in device pixels.
    pub height: f32,
}

impl ViewRect {
    /// Rect anchored at the origin.
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// Project device coordinates onto the particle plane (z = 0).
///
/// Converts to normalized device coordinates (Y inverted), unprojects
/// through the camera's inverse view-projection to form a ray from the
/// camera, and intersects it with the plane. Returns `None` for degenerate
/// rects or rays nearly parallel to the plane instead of dividing by a
/// near-zero Z component.
pub fn project(device_x: f32, device_y: f32, rect: ViewRect, camera: &Camera) -> Option<Vec3> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }

    let ndc_x = ((device_x - rect.x) / rect.width) * 2.0 - 1.0;
    let ndc_y = -((device_y - rect.y) / rect.height) * 2.0 + 1.0;

    let inverse = camera.view_projection().inverse();
    let world = inverse * Vec4::new(ndc_x, ndc_y, 0.5, 1.0);
    if world.w.abs() < RAY_Z_EPSILON {
        return None;
    }
    let world = world.xyz() / world.w;

    let dir = (world - camera.position).normalize();
    if dir.z.abs() < RAY_Z_EPSILON {
        return None;
    }
    let distance = -camera.position.z / dir.z;
    Some(camera.position + dir * distance)
}

/// A pointer-mode change produced by touch gesture tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureChange {
    /// Switch the interaction mode.
    SetMode(PointerMode),
}

/// Device-independent pointer state: mouse throttling and touch gestures.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last_mouse_update: Option<Instant>,
    press_started: Option<Instant>,
    press_moved: bool,
    long_press_active: bool,
    attract_until: Option<Instant>,
}

impl PointerTracker {
    /// Create an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a mouse move, rate-limited to [`MOUSE_THROTTLE`].
    ///
    /// Returns the projected world point when the update is accepted.
    pub fn mouse_move(
        &mut self,
        now: Instant,
        device_x: f32,
        device_y: f32,
        rect: ViewRect,
        camera: &Camera,
    ) -> Option<Vec3> {
        if let Some(last) = self.last_mouse_update {
            if now.duration_since(last) < MOUSE_THROTTLE {
                return None;
            }
        }
        let point = project(device_x, device_y, rect, camera)?;
        self.last_mouse_update = Some(now);
        Some(point)
    }

    /// Begin a touch press.
    pub fn touch_start(&mut self, now: Instant) {
        self.press_started = Some(now);
        self.press_moved = false;
        self.long_press_active = false;
    }

    /// A touch moved; movement cancels the pending sustained press.
    pub fn touch_move(&mut self) {
        self.press_moved = true;
    }

    /// End a touch press. A short tap fires a transient attract pulse;
    /// releasing a sustained press turns interaction off.
    pub fn touch_end(&mut self, now: Instant) -> Option<GestureChange> {
        let started = self.press_started.take()?;
        if self.long_press_active {
            self.long_press_active = false;
            return Some(GestureChange::SetMode(PointerMode::Off));
        }
        if now.duration_since(started) < LONG_PRESS {
            self.attract_until = Some(now + ATTRACT_PULSE);
            return Some(GestureChange::SetMode(PointerMode::Attract));
        }
        Some(GestureChange::SetMode(PointerMode::Off))
    }

    /// Poll time-based gesture transitions; call once per tick.
    ///
    /// Promotes a held press to repel after [`LONG_PRESS`] and reverts an
    /// expired attract pulse.
    pub fn poll(&mut self, now: Instant) -> Option<GestureChange> {
        if let Some(started) = self.press_started {
            if !self.long_press_active
                && !self.press_moved
                && now.duration_since(started) >= LONG_PRESS
            {
                self.long_press_active = true;
                return Some(GestureChange::SetMode(PointerMode::Repel));
            }
        }
        if let Some(until) = self.attract_until {
            if now >= until {
                self.attract_until = None;
                return Some(GestureChange::SetMode(PointerMode::Off));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_camera() -> Camera {
        let mut camera = Camera::new();
        camera.set_viewport(800, 600);
        camera
    }

    #[test]
    fn test_viewport_center_projects_to_origin() {
        let camera = centered_camera();
        let rect = ViewRect::sized(800.0, 600.0);
        let point = project(400.0, 300.0, rect, &camera).unwrap();
        assert!(point.x.abs() < 1e-3, "x = {}", point.x);
        assert!(point.y.abs() < 1e-3, "y = {}", point.y);
        assert!(point.z.abs() < 1e-3, "z = {}", point.z);
    }

    #[test]
    fn test_projection_direction_signs() {
        let camera = centered_camera();
        let rect = ViewRect::sized(800.0, 600.0);

        let right = project(700.0, 300.0, rect, &camera).unwrap();
        assert!(right.x > 0.0);

        // Device Y grows downward; world Y grows upward.
        let below = project(400.0, 550.0, rect, &camera).unwrap();
        assert!(below.y < 0.0);
    }

    #[test]
    fn test_rect_offset_is_subtracted() {
        let camera = centered_camera();
        let offset_rect = ViewRect {
            x: 100.0,
            y: 50.0,
            width: 800.0,
            height: 600.0,
        };
        let point = project(500.0, 350.0, offset_rect, &camera).unwrap();
        assert!(point.x.abs() < 1e-3);
        assert!(point.y.abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_rect_rejected() {
        let camera = centered_camera();
        assert!(project(0.0, 0.0, ViewRect::sized(0.0, 600.0), &camera).is_none());
    }

    #[test]
    fn test_mouse_throttle() {
        let camera = centered_camera();
        let rect = ViewRect::sized(800.0, 600.0);
        let mut tracker = PointerTracker::new();
        let t0 = Instant::now();

        assert!(tracker.mouse_move(t0, 400.0, 300.0, rect, &camera).is_some());
        // Inside the throttle window: dropped.
        assert!(tracker
            .mouse_move(t0 + Duration::from_millis(10), 410.0, 300.0, rect, &camera)
            .is_none());
        // Past the window: accepted.
        assert!(tracker
            .mouse_move(t0 + Duration::from_millis(40), 420.0, 300.0, rect, &camera)
            .is_some());
    }

    #[test]
    fn test_short_tap_pulses_attract_then_reverts() {
        let mut tracker = PointerTracker::new();
        let t0 = Instant::now();

        tracker.touch_start(t0);
        assert_eq!(tracker.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            tracker.touch_end(t0 + Duration::from_millis(200)),
            Some(GestureChange::SetMode(PointerMode::Attract))
        );

        // Pulse still active shortly after release.
        assert_eq!(tracker.poll(t0 + Duration::from_millis(700)), None);
        // Reverts once the pulse expires.
        assert_eq!(
            tracker.poll(t0 + Duration::from_millis(1300)),
            Some(GestureChange::SetMode(PointerMode::Off))
        );
    }

    #[test]
    fn test_sustained_press_repels_until_release() {
        let mut tracker = PointerTracker::new();
        let t0 = Instant::now();

        tracker.touch_start(t0);
        assert_eq!(
            tracker.poll(t0 + Duration::from_millis(600)),
            Some(GestureChange::SetMode(PointerMode::Repel))
        );
        // No repeated promotion while held.
        assert_eq!(tracker.poll(t0 + Duration::from_millis(900)), None);
        assert_eq!(
            tracker.touch_end(t0 + Duration::from_millis(1200)),
            Some(GestureChange::SetMode(PointerMode::Off))
        );
    }

    #[test]
    fn test_movement_cancels_long_press() {
        let mut tracker = PointerTracker::new();
        let t0 = Instant::now();

        tracker.touch_start(t0);
        tracker.touch_move();
        assert_eq!(tracker.poll(t0 + Duration::from_millis(800)), None);
    }
}
