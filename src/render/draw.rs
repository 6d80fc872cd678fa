//! Scene renderer: draws every collection back to front onto a [`Canvas`].
//!
//! Layer order is fixed: background, stars, sacred geometry, bridge,
//! constellations, echo rings, runes, travelers, relics, particles, guardian.

use glam::{Affine2, Vec2};
use std::f32::consts::{PI, TAU};

use super::canvas::{Canvas, Stop};
use crate::camera::{CameraSystem, Layer};
use crate::color::Rgba;
use crate::runes::Glyph;
use crate::scene::{Relic, RelicKind, Scene};

const NIGHT_SKY: [Stop; 3] = [
    (0.0, Rgba::rgb8(0x1a, 0x1a, 0x3e)),
    (0.5, Rgba::rgb8(0x0f, 0x0f, 0x2a)),
    (1.0, Rgba::rgb8(0x0d, 0x0d, 0x1a)),
];

const VIOLET: Rgba = Rgba::rgb8(138, 43, 226);
const LAVENDER: Rgba = Rgba::rgb8(147, 112, 219);
const WARM_GOLD: Rgba = Rgba::rgb8(255, 215, 100);
const STARLIGHT: Rgba = Rgba::rgb8(255, 255, 200);

/// Redraw the whole scene
pub fn draw_scene(canvas: &mut Canvas, scene: &Scene) {
    canvas.clear();
    let camera = &scene.camera;

    draw_cosmos(canvas, camera.viewport());
    draw_stars(canvas, scene);
    draw_sacred_geometry(canvas, scene);
    draw_bridge(canvas, scene);
    draw_constellations(canvas, scene);
    draw_echo_rings(canvas, scene);
    draw_runes(canvas, scene);
    draw_travelers(canvas, scene);
    draw_relics(canvas, scene);
    draw_particles(canvas, scene);
    draw_guardian(canvas, scene);
}

/// Local-to-screen mapping of an object on `layer`
struct Frame {
    transform: Affine2,
    zoom: f32,
}

impl Frame {
    fn new(camera: &CameraSystem, layer: Layer, origin: Vec2, angle: f32) -> Self {
        Self {
            transform: camera.object_transform(layer, origin, angle),
            zoom: camera.zoom,
        }
    }

    fn point(&self, local: Vec2) -> Vec2 {
        self.transform.transform_point2(local)
    }

    fn len(&self, local: f32) -> f32 {
        local * self.zoom
    }
}

/// Stroke a rune glyph of height `size` centered on the frame's local `at`
fn draw_glyph(
    canvas: &mut Canvas,
    frame: &Frame,
    glyph: Glyph,
    at: Vec2,
    size: f32,
    width: f32,
    color: Rgba,
) {
    for stroke in glyph.strokes() {
        let points = stroke.iter().map(|&p| frame.point(at + Vec2::from(p) * size));
        canvas.polyline(points, width, color);
    }
}

fn draw_cosmos(canvas: &mut Canvas, viewport: Vec2) {
    canvas.fill_rect(Vec2::ZERO, viewport, NIGHT_SKY[2].1);
    canvas.radial_glow(
        Vec2::new(viewport.x * 0.5, viewport.y / 3.0),
        viewport.x.max(viewport.y),
        &NIGHT_SKY,
    );

    // Ethereal glow at the horizon
    canvas.radial_glow(
        Vec2::new(viewport.x * 0.5, viewport.y * 0.6),
        500.0,
        &[
            (0.0, VIOLET.with_alpha(0.08)),
            (0.5, Rgba::rgb8(100, 100, 200).with_alpha(0.04)),
            (1.0, Rgba::rgb8(80, 80, 180).with_alpha(0.0)),
        ],
    );
}

fn draw_stars(canvas: &mut Canvas, scene: &Scene) {
    let camera = &scene.camera;
    for star in &scene.backdrop.stars {
        let brightness = star.brightness * star.twinkle();
        canvas.fill_circle(
            camera.world_to_screen(star.position, Layer::Stars),
            star.size * camera.zoom,
            Rgba::WHITE.with_alpha(brightness * 0.6),
        );
    }
}

fn draw_sacred_geometry(canvas: &mut Canvas, scene: &Scene) {
    for pattern in &scene.backdrop.patterns {
        let frame = Frame::new(&scene.camera, Layer::World, pattern.center, pattern.rotation);
        let color = Rgba::OLD_GOLD.with_alpha(0.4 * pattern.alpha * scene.intensity);
        let width = frame.len(1.0);
        let sides = pattern.sides.max(3);
        let vertex = |i: usize, r: f32| Vec2::from_angle(i as f32 / sides as f32 * TAU) * r;

        canvas.polyline((0..=sides).map(|i| frame.point(vertex(i, pattern.radius))), width, color);
        canvas.stroke_circle(frame.point(Vec2::ZERO), frame.len(pattern.radius * 0.6), width, color);
        for i in 0..sides {
            canvas.line(
                frame.point(Vec2::ZERO),
                frame.point(vertex(i, pattern.radius * 0.6)),
                width,
                color,
            );
        }
    }
}

fn draw_bridge(canvas: &mut Canvas, scene: &Scene) {
    let bridge = &scene.backdrop.bridge;
    let frame = Frame::new(&scene.camera, Layer::World, bridge.origin, bridge.angle);
    let pulse = bridge.pulse();

    for (i, segment) in bridge.segments.iter().enumerate() {
        let (base, next, mix) = bridge.segment_colors(i);
        let edge = base.lerp(next, mix);
        let alpha = segment.alpha * pulse * scene.intensity;
        let half = segment.width * 0.5;
        let d = segment.distance;

        // Prismatic band across the bridge
        let corners = [
            frame.point(Vec2::new(d - 8.0, -half)),
            frame.point(Vec2::new(d + 8.0, -half)),
            frame.point(Vec2::new(d + 8.0, half)),
            frame.point(Vec2::new(d - 8.0, half)),
        ];
        canvas.fill_gradient_quad(
            corners,
            &[
                (0.0, edge.with_alpha(0.0)),
                (0.2, edge.with_alpha(alpha * 0.53)),
                (0.5, next.with_alpha(alpha * 0.8)),
                (0.8, edge.with_alpha(alpha * 0.53)),
                (1.0, edge.with_alpha(0.0)),
            ],
        );

        // Luminous edge
        canvas.line(
            frame.point(Vec2::new(d, -half)),
            frame.point(Vec2::new(d, half)),
            frame.len(2.0),
            next.with_alpha(alpha * 0.6),
        );
    }
}

fn draw_constellations(canvas: &mut Canvas, scene: &Scene) {
    let live_rings = scene.echo_rings.len();
    for constellation in &scene.backdrop.constellations {
        let frame = Frame::new(&scene.camera, Layer::Constellations, constellation.center, 0.0);
        let intensity = constellation.intensity(live_rings) * scene.intensity;

        canvas.polyline(
            constellation.stars.iter().map(|s| frame.point(s.offset)),
            frame.len(1.0),
            Rgba::OLD_GOLD.with_alpha(intensity * 0.3),
        );

        for star in &constellation.stars {
            let brightness = star.brightness * intensity;
            let center = frame.point(star.offset);
            canvas.radial_glow(
                center,
                frame.len(star.size * 4.0),
                &[
                    (0.0, STARLIGHT.with_alpha(brightness * 0.8)),
                    (0.5, Rgba::OLD_GOLD.with_alpha(brightness * 0.4)),
                    (1.0, Rgba::OLD_GOLD.with_alpha(0.0)),
                ],
            );
            canvas.fill_circle(center, frame.len(star.size), Rgba::WHITE.with_alpha(brightness));
        }
    }
}

fn draw_echo_rings(canvas: &mut Canvas, scene: &Scene) {
    let camera = &scene.camera;
    for ring in scene.echo_rings.iter().filter(|r| r.alpha > 0.0) {
        let center = camera.world_to_screen(ring.position, Layer::World);
        canvas.stroke_circle(
            center,
            ring.radius * camera.zoom,
            2.0 * scene.intensity * camera.zoom,
            ring.color.with_alpha(ring.alpha),
        );

        // Inner glow
        canvas.stroke_circle(
            center,
            ring.radius * 0.9 * camera.zoom,
            camera.zoom,
            Rgba::WHITE.with_alpha(ring.alpha * 0.4 * scene.intensity),
        );
    }
}

fn draw_runes(canvas: &mut Canvas, scene: &Scene) {
    for rune in &scene.runes {
        let alpha = rune.alpha * rune.shimmer() * scene.intensity;
        if alpha <= 0.0 {
            continue;
        }
        let frame = Frame::new(&scene.camera, Layer::World, rune.position, rune.rotation);

        // Soft halo under the strokes
        let halo = rune.color.with_alpha(alpha * 0.3);
        draw_glyph(canvas, &frame, rune.glyph, Vec2::ZERO, rune.size, frame.len(4.0), halo);
        let ink = rune.color.with_alpha(alpha);
        draw_glyph(canvas, &frame, rune.glyph, Vec2::ZERO, rune.size, frame.len(1.5), ink);
    }
}

fn draw_travelers(canvas: &mut Canvas, scene: &Scene) {
    let camera = &scene.camera;
    let limit_x = scene.params.traveler.limit_x;
    for traveler in &scene.travelers {
        let alpha = traveler.alpha * traveler.shimmer() * scene.intensity;
        if alpha <= 0.0 || traveler.position.x >= limit_x {
            continue;
        }
        let center = camera.world_to_screen(traveler.position, Layer::World);
        let size = traveler.size * camera.zoom;

        canvas.radial_glow(
            center,
            size,
            &[
                (0.0, Rgba::rgb8(220, 220, 255).with_alpha(alpha)),
                (0.5, Rgba::rgb8(180, 180, 240).with_alpha(alpha * 0.5)),
                (1.0, Rgba::rgb8(150, 150, 220).with_alpha(0.0)),
            ],
        );

        // Silhouette
        canvas.fill_ellipse(
            center,
            Vec2::new(size * 0.4, size * 0.6),
            0.0,
            Rgba::WHITE.with_alpha(alpha * 0.4),
        );
    }
}

fn draw_relics(canvas: &mut Canvas, scene: &Scene) {
    let now_ms = scene.clock.scene_ms();
    for relic in scene.relics.iter() {
        let alpha =
            relic.fade(now_ms, &scene.params.relic) * relic.pulse(now_ms) * scene.intensity;
        let frame = Frame::new(&scene.camera, Layer::World, relic.position, relic.rotation);
        draw_relic(canvas, &frame, relic, alpha);
    }
}

fn draw_relic(canvas: &mut Canvas, frame: &Frame, relic: &Relic, alpha: f32) {
    let size = relic.size;
    let gold = |a: f32| Rgba::OLD_GOLD.with_alpha(a * alpha);
    let center = frame.point(Vec2::ZERO);

    match relic.kind {
        RelicKind::Horn => {
            let spiral = (0..=20).map(|i| {
                let t = i as f32 / 20.0;
                frame.point(Vec2::from_angle(t * PI * 3.0) * t * size)
            });
            canvas.polyline(spiral, frame.len(2.0), gold(0.8));

            canvas.radial_glow(
                center,
                frame.len(size * 0.5),
                &[
                    (0.0, WARM_GOLD.with_alpha(0.6 * alpha)),
                    (1.0, Rgba::OLD_GOLD.with_alpha(0.0)),
                ],
            );
        }
        RelicKind::RuneCircle => {
            canvas.stroke_circle(
                center,
                frame.len(size),
                frame.len(2.0),
                LAVENDER.with_alpha(0.7 * alpha),
            );

            for i in 0..8 {
                let rim = Vec2::from_angle(i as f32 / 8.0 * TAU) * size;
                draw_glyph(canvas, frame, Glyph::new(i), rim, 14.0, frame.len(1.5), gold(0.8));
                canvas.line(center, frame.point(rim), frame.len(1.0), gold(0.5));
            }
        }
        RelicKind::Sigil => {
            let diamond = [
                Vec2::new(0.0, -size),
                Vec2::new(size * 0.7, 0.0),
                Vec2::new(0.0, size),
                Vec2::new(-size * 0.7, 0.0),
            ]
            .map(|p| frame.point(p));
            let veil = WARM_GOLD.with_alpha(0.15 * alpha);
            canvas.fill_polygon(&diamond, veil);
            canvas.polyline(diamond.iter().chain(&diamond[..1]).copied(), frame.len(2.0), gold(0.8));

            // Watching eye
            let eye = Vec2::new(frame.len(size * 0.4), frame.len(size * 0.25));
            canvas.fill_ellipse(center, eye, relic.rotation, veil);
            canvas.stroke_ellipse(center, eye, relic.rotation, frame.len(2.0), gold(0.8));
            canvas.fill_circle(center, frame.len(size * 0.15), gold(0.9));
        }
    }
}

fn draw_particles(canvas: &mut Canvas, scene: &Scene) {
    let camera = &scene.camera;
    for particle in scene.particles.iter().filter(|p| p.alpha > 0.0) {
        canvas.fill_circle(
            camera.world_to_screen(particle.position, Layer::World),
            particle.size * camera.zoom,
            particle.color.with_alpha(particle.alpha),
        );
    }
}

fn draw_guardian(canvas: &mut Canvas, scene: &Scene) {
    let guardian = &scene.guardian;
    let frame = Frame::new(&scene.camera, Layer::World, guardian.position, 0.0);
    let size = guardian.params.size;
    let glow = guardian.glow;
    let resonance = scene.resonance.low.clamp(0.0, 1.0);

    // Golden aura, swelling with the low end of the audio
    let aura = glow * scene.intensity * (1.0 + resonance);
    canvas.radial_glow(
        frame.point(Vec2::ZERO),
        frame.len(size * 3.0 * (1.0 + 0.5 * resonance)),
        &[
            (0.0, Rgba::OLD_GOLD.with_alpha(0.4 * aura)),
            (0.5, WARM_GOLD.with_alpha(0.2 * aura)),
            (1.0, Rgba::OLD_GOLD.with_alpha(0.0)),
        ],
    );

    // Sentinel body
    let body_center = frame.point(Vec2::new(0.0, 10.0));
    let body = Vec2::new(frame.len(size * 0.6), frame.len(size * 0.9));
    canvas.fill_radial(
        body_center,
        body,
        &[
            (0.0, Rgba::WHITE.with_alpha(0.9 * 0.9)),
            (0.5, Rgba::OLD_GOLD.with_alpha(0.7 * 0.9)),
            (1.0, Rgba::rgb8(150, 120, 200).with_alpha(0.5 * 0.9)),
        ],
    );

    let head = Vec2::new(0.0, -size * 0.7);
    canvas.fill_circle(
        frame.point(head),
        frame.len(size * 0.4),
        Rgba::rgb8(255, 240, 200).with_alpha(0.8 * 0.9),
    );

    // Luminous outline
    canvas.stroke_ellipse(
        body_center,
        body,
        0.0,
        frame.len(2.0),
        Rgba::OLD_GOLD.with_alpha(0.8 * glow),
    );

    // Listening runes circling the head
    let orbit = (scene.clock.scene_ms() * 0.001) as f32;
    for i in 0..6 {
        let angle = i as f32 / 6.0 * TAU + orbit;
        let at = head + Vec2::from_angle(angle) * size * 0.8;
        let color = Rgba::OLD_GOLD.with_alpha(0.6 * glow);
        draw_glyph(canvas, &frame, Glyph::new(i), at, 16.0, frame.len(1.5), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::params::{CameraParams, GuardianParams, SceneParams};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Instant;

    fn scene() -> Scene {
        Scene::new(
            SceneParams::default(),
            CameraParams::default(),
            GuardianParams::default(),
            Vec2::new(1280.0, 720.0),
            StdRng::seed_from_u64(21),
            Instant::now(),
        )
    }

    fn canvas() -> Canvas {
        Canvas::new(Vec2::new(1280.0, 720.0), 24)
    }

    #[test]
    fn test_draw_starts_from_a_cleared_canvas() {
        let scene = scene();
        let mut c = canvas();
        draw_scene(&mut c, &scene);
        let first = c.triangle_count();
        assert!(first > 0);

        draw_scene(&mut c, &scene);
        assert_eq!(c.triangle_count(), first);
    }

    #[test]
    fn test_background_covers_viewport_first() {
        let scene = scene();
        let mut c = canvas();
        draw_scene(&mut c, &scene);

        let first = &c.vertices()[..6];
        let positions: Vec<[f32; 2]> = first.iter().map(|v| v.position).collect();
        assert!(positions.contains(&[0.0, 0.0]));
        assert!(positions.contains(&[1280.0, 720.0]));
        assert!(first.iter().all(|v| v.color == NIGHT_SKY[2].1.to_array()));
    }

    #[test]
    fn test_burst_adds_geometry() {
        let mut scene = scene();
        let mut c = canvas();
        draw_scene(&mut c, &scene);
        let before = c.triangle_count();

        scene.trigger_burst(&SilentAudio);
        draw_scene(&mut c, &scene);
        assert!(c.triangle_count() > before);
    }

    #[test]
    fn test_every_relic_kind_draws() {
        let mut scene = scene();
        scene.trigger_burst(&SilentAudio);
        let relic = scene.relics.iter().next().cloned().unwrap();
        let frame = Frame::new(&scene.camera, Layer::World, relic.position, relic.rotation);

        for kind in RelicKind::ALL {
            let mut c = canvas();
            let relic = Relic { kind, ..relic.clone() };
            draw_relic(&mut c, &frame, &relic, 1.0);
            assert!(!c.is_empty(), "{:?} drew nothing", kind);
        }
    }

    #[test]
    fn test_zero_intensity_relic_is_invisible() {
        let mut scene = scene();
        scene.trigger_burst(&SilentAudio);
        let relic = scene.relics.iter().next().cloned().unwrap();
        let frame = Frame::new(&scene.camera, Layer::World, relic.position, relic.rotation);

        let mut c = canvas();
        draw_relic(&mut c, &frame, &relic, 0.0);
        assert!(c.is_empty());
    }

    #[test]
    fn test_geometry_stays_finite() {
        let mut scene = scene();
        scene.trigger_burst(&SilentAudio);
        scene.camera.toggle_birds_eye();
        for i in 1..=120 {
            scene.update(i as f64 * 16.0, &SilentAudio);
        }
        let mut c = canvas();
        draw_scene(&mut c, &scene);
        assert!(c
            .vertices()
            .iter()
            .all(|v| v.position.iter().chain(&v.color).all(|x| x.is_finite())));
    }
}
