use eframe::egui::{Pos2, Vec2};

/// Screen = offset + world * zoom, with screen coordinates relative to the canvas origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        (self.offset + world * self.zoom).to_pos2()
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.offset) / self.zoom
    }

    /// Scales the zoom by `factor` while keeping the world point under `screen` in place.
    pub fn zoom_at(&mut self, screen: Pos2, factor: f32, min_zoom: f32, max_zoom: f32) {
        let world = self.screen_to_world(screen);
        self.zoom = (self.zoom * factor).clamp(min_zoom, max_zoom);
        self.offset = screen.to_vec2() - world * self.zoom;
    }

    /// Offset that puts `world` in the middle of a `viewport`-sized canvas at the current zoom.
    pub fn offset_centering(&self, world: Vec2, viewport: Vec2) -> Vec2 {
        viewport * 0.5 - world * self.zoom
    }

    pub(crate) fn approach(&mut self, target: Vec2, speed: f32, settle_distance: f32) -> bool {
        let remaining = target - self.offset;
        if remaining.length() < settle_distance {
            self.offset = target;
            return true;
        }
        self.offset += remaining * speed;
        false
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn screen_world_round_trip() {
        let camera = Camera {
            offset: vec2(40.0, -12.0),
            zoom: 1.5,
        };
        let world = vec2(100.0, 20.0);
        let back = camera.screen_to_world(camera.world_to_screen(world));
        assert!((back - world).length() < 1e-4);
    }

    #[test]
    fn zoom_keeps_cursor_anchor() {
        let mut camera = Camera {
            offset: vec2(300.0, 200.0),
            zoom: 1.0,
        };
        let cursor = pos2(410.0, 260.0);
        let anchored = camera.screen_to_world(cursor);

        camera.zoom_at(cursor, 1.1, 0.2, 3.0);

        assert!((camera.world_to_screen(anchored) - cursor).length() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.zoom_at(pos2(0.0, 0.0), 1.1, 0.2, 3.0);
        }
        assert_eq!(camera.zoom, 3.0);
        for _ in 0..100 {
            camera.zoom_at(pos2(0.0, 0.0), 0.9, 0.2, 3.0);
        }
        assert_eq!(camera.zoom, 0.2);
    }

    #[test]
    fn approach_converges() {
        let mut camera = Camera::default();
        let target = vec2(500.0, -300.0);
        let mut steps = 0;
        while !camera.approach(target, 0.1, 1.0) {
            steps += 1;
            assert!(steps < 200);
        }
        assert_eq!(camera.offset, target);
    }
}
