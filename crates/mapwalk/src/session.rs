//! The whole interactive state in one place, advanced once per executed frame.

use crate::{
    camera::Camera,
    clock::TARGET_TICK_HZ,
    error::ConfigError,
    input::{InputEvent, Key, KeyState},
    measure::{MeasurementStore, Toggle},
    mode::{Mode, ModeController, ModeIcon},
    ray::{pick_ground, Viewport},
    walk::{MoveInput, Player, WalkTracker, PLAYER_SPEED},
    MapSquare, MAP_HALF_EXTENT,
};
use glam::{Mat4, Vec2, Vec3};
use std::time::Duration;

/// Default camera pan speed in map units per second.
pub const CAMERA_SPEED: f32 = 5.0;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub tick_rate_hz: f64,
    pub player_speed: f32,
    pub camera_speed: f32,
    pub map_half_extent: f32,
    /// Initial framebuffer size; replaced by resize events.
    pub viewport: Viewport,
    pub icon: ModeIcon,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.tick_rate_hz;
        let representable = rate.is_finite()
            && rate > 0.0
            && Duration::try_from_secs_f64(rate.recip()).is_ok();
        if !representable {
            return Err(ConfigError::TickRate(rate));
        }

        for (name, value) in [
            ("player speed", self.player_speed),
            ("camera speed", self.camera_speed),
            ("map half extent", self.map_half_extent),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Viewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: TARGET_TICK_HZ,
            player_speed: PLAYER_SPEED,
            camera_speed: CAMERA_SPEED,
            map_half_extent: MAP_HALF_EXTENT,
            viewport: Viewport::new(1920, 1080),
            icon: ModeIcon::default(),
        }
    }
}

pub struct Session {
    config: SessionConfig,
    map: MapSquare,
    modes: ModeController,
    camera: Camera,
    player: Player,
    walk: WalkTracker,
    markers: MeasurementStore,
    keys: KeyState,
    viewport: Viewport,
    should_close: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let modes = ModeController::new();
        let camera = modes.initial_camera();
        let player = Player::default();
        let walk = WalkTracker::new(player.position);

        Ok(Self {
            map: MapSquare::new(config.map_half_extent),
            viewport: config.viewport,
            config,
            modes,
            camera,
            player,
            walk,
            markers: MeasurementStore::new(),
            keys: KeyState::new(),
            should_close: false,
        })
    }

    /// One simulation step: apply the queued events in arrival order, then
    /// advance movement by `dt` seconds.
    pub fn update<I>(&mut self, events: I, dt: f32)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            self.handle_event(event);
        }

        if self.modes.is_walking() {
            let input = self.move_input();
            self.player
                .step(input, self.config.player_speed, dt, &self.map);
            self.walk.record(self.player.position);
        }

        self.pan_camera(dt);
    }

    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => {
                if self.keys.press(key) {
                    self.on_key_down(key);
                }
            }
            InputEvent::KeyReleased(key) => self.keys.release(key),
            InputEvent::Click(pixel) => {
                if self.config.icon.contains(pixel) {
                    self.toggle_mode();
                } else if self.modes.is_measuring() {
                    self.click_ground(pixel);
                }
            }
            InputEvent::Resized { width, height } => {
                if width > 0 && height > 0 {
                    self.viewport = Viewport::new(width, height);
                    log::debug!("Viewport resized to {}x{}", width, height);
                }
            }
            InputEvent::FocusLost => self.keys.clear(),
            InputEvent::CloseRequested => self.should_close = true,
        }
    }

    fn on_key_down(&mut self, key: Key) {
        match key {
            Key::ToggleMode => {
                self.toggle_mode();
            }
            Key::ClearMarkers if self.modes.is_measuring() => {
                log::info!("Cleared {} markers", self.markers.len());
                self.markers.clear();
            }
            Key::Quit => self.should_close = true,
            _ => {}
        }
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.modes.toggle(&mut self.camera)
    }

    /// Casts `pixel` onto the ground and toggles a marker there. Misses and
    /// hits outside the map change nothing.
    pub fn click_ground(&mut self, pixel: Vec2) -> Option<Toggle> {
        let Some(hit) = pick_ground(pixel, self.projection(), self.view(), self.viewport) else {
            log::debug!("Click at ({:.0}, {:.0}) missed the ground", pixel.x, pixel.y);
            return None;
        };

        if !self.map.contains(hit) {
            log::debug!("Click landed off the map at ({:.2}, {:.2})", hit.x, hit.z);
            return None;
        }

        let outcome = self.markers.toggle_at(hit);
        match outcome {
            Toggle::Added(index) => log::info!(
                "Marker #{} at ({:.2}, {:.2}) | path {:.2}",
                index,
                hit.x,
                hit.z,
                self.markers.total_length()
            ),
            Toggle::Removed(index, p) => log::info!(
                "Removed marker #{} at ({:.2}, {:.2}) | path {:.2}",
                index,
                p.x,
                p.z,
                self.markers.total_length()
            ),
        }
        Some(outcome)
    }

    fn move_input(&self) -> MoveInput {
        MoveInput {
            forward: self.keys.is_held(Key::MoveForward),
            back: self.keys.is_held(Key::MoveBack),
            left: self.keys.is_held(Key::MoveLeft),
            right: self.keys.is_held(Key::MoveRight),
        }
    }

    fn pan_camera(&mut self, dt: f32) {
        let step = self.config.camera_speed * dt;
        let axis = |neg: Key, pos: Key| {
            (self.keys.is_held(pos) as i32 - self.keys.is_held(neg) as i32) as f32
        };

        let dx = axis(Key::PanLeft, Key::PanRight) * step;
        let dz = axis(Key::PanUp, Key::PanDown) * step;
        self.camera.pan(dx, dz);

        self.camera.position = self.modes.mode().camera_bounds().clamp(self.camera.position);
    }

    pub fn view(&self) -> Mat4 {
        self.camera.view()
    }

    pub fn projection(&self) -> Mat4 {
        Camera::projection(self.viewport.aspect())
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Pixel position of a world point, if it is in front of the camera.
    pub fn world_to_pixel(&self, p: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * p.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width as f32,
            (1.0 - ndc.y) * 0.5 * self.viewport.height as f32,
        ))
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn walked_distance(&self) -> f32 {
        self.walk.total()
    }

    #[inline]
    pub fn markers(&self) -> &MeasurementStore {
        &self.markers
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn map(&self) -> MapSquare {
        self.map
    }

    #[inline]
    pub fn icon(&self) -> ModeIcon {
        self.config.icon
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn mode_label(&self) -> String {
        format!("Mode: {}", self.mode().label())
    }

    pub fn walked_label(&self) -> String {
        format!("Distance walked: {:.2}", self.walked_distance())
    }

    pub fn measured_label(&self) -> String {
        format!(
            "Measured: {:.2} ({} markers)",
            self.markers.total_length(),
            self.markers.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 75.0;

    fn session() -> Session {
        Session::new(SessionConfig::default()).expect("valid config")
    }

    fn idle(s: &mut Session, frames: usize) {
        for _ in 0..frames {
            s.update(std::iter::empty::<InputEvent>(), DT);
        }
    }

    fn enter_measuring(s: &mut Session) {
        s.update(
            [
                InputEvent::KeyPressed(Key::ToggleMode),
                InputEvent::KeyReleased(Key::ToggleMode),
            ],
            DT,
        );
        assert_eq!(s.mode(), Mode::Measuring);
    }

    #[test]
    fn walking_forward_for_one_second() {
        let mut s = session();
        s.update([InputEvent::KeyPressed(Key::MoveForward)], DT);
        idle(&mut s, 74);

        assert!((s.walked_distance() - 5.0).abs() < 1e-3, "walked {}", s.walked_distance());
        assert!((s.player().position.z + 5.0).abs() < 1e-3);
        assert!(s.player().position.z >= -MAP_HALF_EXTENT);
    }

    #[test]
    fn walking_long_stops_at_map_edge() {
        let mut s = session();
        s.update([InputEvent::KeyPressed(Key::MoveForward)], DT);
        idle(&mut s, 299);

        assert_eq!(s.player().position.z, -MAP_HALF_EXTENT);
        assert!((s.walked_distance() - MAP_HALF_EXTENT).abs() < 1e-3);
    }

    #[test]
    fn movement_keys_are_inert_while_measuring() {
        let mut s = session();
        enter_measuring(&mut s);

        s.update([InputEvent::KeyPressed(Key::MoveRight)], DT);
        idle(&mut s, 30);
        assert_eq!(s.player().position, Vec3::ZERO);
        assert_eq!(s.walked_distance(), 0.0);
    }

    #[test]
    fn held_toggle_key_switches_once() {
        let mut s = session();
        s.update(
            [
                InputEvent::KeyPressed(Key::ToggleMode),
                InputEvent::KeyPressed(Key::ToggleMode),
            ],
            DT,
        );
        s.update([InputEvent::KeyPressed(Key::ToggleMode)], DT);
        assert_eq!(s.mode(), Mode::Measuring);

        s.update(
            [
                InputEvent::KeyReleased(Key::ToggleMode),
                InputEvent::KeyPressed(Key::ToggleMode),
            ],
            DT,
        );
        assert_eq!(s.mode(), Mode::Walking);
    }

    #[test]
    fn icon_click_toggles_without_marking() {
        let mut s = session();
        let icon = s.icon();
        let inside = icon.min + icon.size * 0.5;

        s.update([InputEvent::Click(inside)], DT);
        assert_eq!(s.mode(), Mode::Measuring);
        assert!(s.markers().is_empty());

        s.update([InputEvent::Click(inside)], DT);
        assert_eq!(s.mode(), Mode::Walking);
        assert!(s.markers().is_empty());
    }

    #[test]
    fn clicks_are_ignored_while_walking() {
        let mut s = session();
        let center = s.viewport().center();
        s.update([InputEvent::Click(center)], DT);
        assert!(s.markers().is_empty());
    }

    #[test]
    fn click_adds_then_removes_marker() {
        let mut s = session();
        enter_measuring(&mut s);

        let center = s.viewport().center();
        let expected = pick_ground(center, s.projection(), s.view(), s.viewport()).unwrap();

        s.update([InputEvent::Click(center)], DT);
        assert_eq!(s.markers().len(), 1);
        assert!((s.markers().points()[0] - expected).length() < 1e-4);

        s.update([InputEvent::Click(center)], DT);
        assert!(s.markers().is_empty());
        assert_eq!(s.markers().total_length(), 0.0);
    }

    #[test]
    fn three_collinear_clicks_measure_ten() {
        let mut s = session();
        enter_measuring(&mut s);

        let targets = [
            Vec3::new(-5.0, 0.0, 4.0),
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(5.0, 0.0, 4.0),
        ];
        let clicks: Vec<_> = targets
            .iter()
            .map(|&p| InputEvent::Click(s.world_to_pixel(p).expect("visible")))
            .collect();
        s.update(clicks, DT);

        assert_eq!(s.markers().len(), 3);
        for (got, want) in s.markers().points().iter().zip(targets) {
            assert!((*got - want).length() < 1e-2, "{got:?} vs {want:?}");
        }
        assert!((s.markers().total_length() - 10.0).abs() < 2e-2);
    }

    #[test]
    fn markers_survive_mode_round_trip() {
        let mut s = session();
        enter_measuring(&mut s);
        let center = s.viewport().center();
        s.update([InputEvent::Click(center)], DT);

        s.toggle_mode();
        s.toggle_mode();
        assert_eq!(s.markers().len(), 1);
    }

    #[test]
    fn off_map_click_is_ignored() {
        let mut s = session();
        enter_measuring(&mut s);

        s.update([InputEvent::KeyPressed(Key::PanRight)], DT);
        idle(&mut s, 300);
        assert_eq!(s.camera().position.x, 15.0);

        let center = s.viewport().center();
        assert_eq!(s.click_ground(center), None);
        assert!(s.markers().is_empty());
    }

    #[test]
    fn camera_clamp_depends_on_mode() {
        let mut s = session();
        s.update([InputEvent::KeyPressed(Key::PanDown)], DT);
        idle(&mut s, 300);
        assert_eq!(s.camera().position.z, 15.0);

        s.update([InputEvent::KeyReleased(Key::PanDown)], DT);
        enter_measuring(&mut s);
        s.update([InputEvent::KeyPressed(Key::PanDown)], DT);
        idle(&mut s, 300);
        assert_eq!(s.camera().position.z, 20.0);
    }

    #[test]
    fn camera_restored_per_mode() {
        let mut s = session();
        s.update([InputEvent::KeyPressed(Key::PanLeft)], DT);
        idle(&mut s, 20);
        s.update([InputEvent::KeyReleased(Key::PanLeft)], DT);
        let walk_pos = s.camera().position;

        enter_measuring(&mut s);
        s.update([InputEvent::KeyPressed(Key::PanUp)], DT);
        idle(&mut s, 20);
        s.update([InputEvent::KeyReleased(Key::PanUp)], DT);
        let measure_pos = s.camera().position;

        s.toggle_mode();
        assert_eq!(s.camera().position, walk_pos);
        s.toggle_mode();
        assert_eq!(s.camera().position, measure_pos);
    }

    #[test]
    fn clear_key_only_works_while_measuring() {
        let mut s = session();
        enter_measuring(&mut s);
        let center = s.viewport().center();
        s.update([InputEvent::Click(center)], DT);
        s.toggle_mode();

        s.update([InputEvent::KeyPressed(Key::ClearMarkers)], DT);
        assert_eq!(s.markers().len(), 1);

        s.update([InputEvent::KeyReleased(Key::ClearMarkers)], DT);
        s.toggle_mode();
        s.update([InputEvent::KeyPressed(Key::ClearMarkers)], DT);
        assert!(s.markers().is_empty());
    }

    #[test]
    fn quit_and_close_set_flag() {
        let mut s = session();
        assert!(!s.should_close());
        s.update([InputEvent::KeyPressed(Key::Quit)], DT);
        assert!(s.should_close());

        let mut s = session();
        s.update([InputEvent::CloseRequested], DT);
        assert!(s.should_close());
    }

    #[test]
    fn resize_updates_viewport_and_ignores_zero() {
        let mut s = session();
        s.update([InputEvent::Resized { width: 800, height: 600 }], DT);
        assert_eq!(s.viewport(), Viewport::new(800, 600));

        s.update([InputEvent::Resized { width: 0, height: 0 }], DT);
        assert_eq!(s.viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig {
            tick_rate_hz: 0.0,
            ..SessionConfig::default()
        };
        assert_eq!(Session::new(config).err(), Some(ConfigError::TickRate(0.0)));

        let config = SessionConfig {
            tick_rate_hz: f64::NAN,
            ..SessionConfig::default()
        };
        assert!(matches!(Session::new(config).err(), Some(ConfigError::TickRate(_))));

        let config = SessionConfig {
            player_speed: -1.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::new(config).err(),
            Some(ConfigError::NonPositive { name: "player speed", .. })
        ));
    }

    #[test]
    fn tick_rate_with_unrepresentable_interval_is_rejected() {
        let config = SessionConfig {
            tick_rate_hz: 1e-20,
            ..SessionConfig::default()
        };
        assert_eq!(Session::new(config).err(), Some(ConfigError::TickRate(1e-20)));

        // Slow but representable rates still build a clock.
        let config = SessionConfig {
            tick_rate_hz: 0.5,
            ..SessionConfig::default()
        };
        let s = Session::new(config).expect("valid config");
        let clock = crate::FrameClock::new(s.config().tick_rate_hz, std::time::Instant::now());
        assert_eq!(clock.interval(), Duration::from_secs(2));
    }

    #[test]
    fn focus_loss_drops_keys_pressed_earlier_in_the_frame() {
        let mut s = session();
        s.update(
            [InputEvent::KeyPressed(Key::MoveForward), InputEvent::FocusLost],
            DT,
        );
        let stopped_at = s.player().position;
        let walked = s.walked_distance();

        idle(&mut s, 10);
        assert_eq!(s.player().position, stopped_at);
        assert_eq!(s.walked_distance(), walked);
    }

    #[test]
    fn focus_loss_stops_a_held_key() {
        let mut s = session();
        s.update([InputEvent::KeyPressed(Key::MoveRight)], DT);
        idle(&mut s, 5);
        s.update([InputEvent::FocusLost], DT);
        let x = s.player().position.x;
        idle(&mut s, 10);
        assert_eq!(s.player().position.x, x);

        // A fresh press after refocus moves again.
        s.update([InputEvent::KeyPressed(Key::MoveRight)], DT);
        assert!(s.player().position.x > x);
    }

    #[test]
    fn labels_format_totals() {
        let mut s = session();
        assert_eq!(s.mode_label(), "Mode: Walking");
        assert_eq!(s.walked_label(), "Distance walked: 0.00");
        enter_measuring(&mut s);
        assert_eq!(s.mode_label(), "Mode: Measuring");
        assert_eq!(s.measured_label(), "Measured: 0.00 (0 markers)");
    }
}
