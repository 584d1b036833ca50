//! The landing visual: a shadow, a line burst and the core icon spinning in.

use crate::constants::*;
use crate::draw::{Color, Draw, Region};
use crate::math::{angle, rand_len_vectors};
use crate::render::zoom::Zoom;
use crate::world::CoreInfo;

/// Pixel-to-world factor applied to region sizes.
const REGION_WORLD_SCALE: f32 = 0.25;

/// Draw the landing effect at `core`. No-op unless a landing is running.
pub fn draw_landing(draw: &mut dyn Draw, zoom: &Zoom, core: Option<&CoreInfo>) {
    if !zoom.is_landing() {
        return;
    }
    let Some(core) = core else {
        return;
    };

    let fract = zoom.landing_fraction().clamp(0.0, 1.0);
    let scl = zoom.landing_draw_scale();
    let (x, y) = (core.position.x, core.position.y);
    let icon = &core.icon;

    draw.color(Color::LIGHT_TRAIL);
    let shadow = icon.width * REGION_WORLD_SCALE * scl * 4.0 * fract;
    draw.rect(&Region::CIRCLE_SHADOW, x, y, shadow, shadow, 0.0);

    let burst = rand_len_vectors(LANDING_BURST_SEED, 1.0 - fract, LANDING_BURST_LINES, 1000.0 * scl * (1.0 - fract));
    for v in burst {
        draw.stroke(scl * v.fin);
        draw.line_angle(x + v.x, y + v.y, angle(v.x, v.y), (v.fin * 20.0 + 1.0) * scl);
    }

    draw.color(Color::WHITE);
    draw.mix_color(Color::WHITE, fract);
    draw.rect(
        icon,
        x,
        y,
        icon.width * REGION_WORLD_SCALE * scl,
        icon.height * REGION_WORLD_SCALE * scl,
        fract * LANDING_ICON_ROTATION,
    );
    draw.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{CallLog, RecordingDraw};
    use crate::tile::Team;
    use glam::Vec2;

    fn core() -> CoreInfo {
        CoreInfo {
            position: Vec2::new(40.0, 40.0),
            icon: Region::new("core-shard", 24.0, 24.0),
            team: Team::Sharded,
        }
    }

    #[test]
    fn test_idle_draws_nothing() {
        let log = CallLog::default();
        let mut draw = RecordingDraw::new(log.clone());
        draw_landing(&mut draw, &Zoom::new(1.0, CORE_LAND_LIFETIME), Some(&core()));
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_needs_a_core() {
        let log = CallLog::default();
        let mut draw = RecordingDraw::new(log.clone());
        let mut zoom = Zoom::new(1.0, CORE_LAND_LIFETIME);
        zoom.zoom_in(CORE_LAND_LIFETIME);
        draw_landing(&mut draw, &zoom, None);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_burst_has_fixed_line_count() {
        let log = CallLog::default();
        let mut draw = RecordingDraw::new(log.clone());
        let mut zoom = Zoom::new(1.0, CORE_LAND_LIFETIME);
        zoom.zoom_in(CORE_LAND_LIFETIME);
        zoom.step(30.0);
        draw_landing(&mut draw, &zoom, Some(&core()));

        let calls = log.calls();
        let lines = calls.iter().filter(|c| c.starts_with("draw.line")).count();
        assert_eq!(lines, LANDING_BURST_LINES);
        assert!(calls.iter().any(|c| c.starts_with("draw.rect(circle-shadow")));
        assert!(calls.iter().any(|c| c.starts_with("draw.rect(core-shard")));
    }

    #[test]
    fn test_icon_rotation_tracks_remaining_fraction() {
        let log = CallLog::default();
        let mut draw = RecordingDraw::new(log.clone());
        let mut zoom = Zoom::new(1.0, CORE_LAND_LIFETIME);
        zoom.zoom_in(CORE_LAND_LIFETIME);
        zoom.step(CORE_LAND_LIFETIME / 2.0);
        draw_landing(&mut draw, &zoom, Some(&core()));

        let icon = log
            .calls()
            .into_iter()
            .find(|c| c.starts_with("draw.rect(core-shard"))
            .unwrap();
        assert!(icon.ends_with("rot=67.5)"), "{icon}");
    }
}
