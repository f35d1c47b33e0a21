// Brush engine: one stamping function per brush variant.
// Visual outcomes:
// - Standard/Calligraphy/Pixel paint opaque shapes straight into the layer.
// - Airbrush/Marker/Pencil/Watercolor/Neon build a small patch around the
//   pointer first, then blend it into the layer with the brush opacity.

use crate::layer::{Layer, Rect};
use crate::patch::Patch;
use crate::rng::Rng32;
use crate::types::{Color, Point};
use clap::ValueEnum;
use std::fmt;

/// Blur radius for watercolor bleed and neon glow (21-tap kernel), whatever the brush size.
pub const GLOW_BLUR_RADIUS: usize = 10;

/// Calligraphy nib angle when the stroke has no direction yet.
pub const DEFAULT_NIB_ANGLE: f32 = 45.0;

/// The closed set of brush variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum BrushKind {
    #[default]
    Standard,
    Airbrush,
    Calligraphy,
    Marker,
    Pencil,
    Watercolor,
    Neon,
    Pixel,
}

/// Signature every brush renderer shares.
pub type StampFn = fn(&mut Layer, &Stamp<'_>, &mut Rng32);

impl BrushKind {
    pub const ALL: [BrushKind; 8] = [
        BrushKind::Standard,
        BrushKind::Airbrush,
        BrushKind::Calligraphy,
        BrushKind::Marker,
        BrushKind::Pencil,
        BrushKind::Watercolor,
        BrushKind::Neon,
        BrushKind::Pixel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BrushKind::Standard => "standard",
            BrushKind::Airbrush => "airbrush",
            BrushKind::Calligraphy => "calligraphy",
            BrushKind::Marker => "marker",
            BrushKind::Pencil => "pencil",
            BrushKind::Watercolor => "watercolor",
            BrushKind::Neon => "neon",
            BrushKind::Pixel => "pixel",
        }
    }

    /// The next brush in `ALL`, wrapping around.
    pub fn next(self) -> BrushKind {
        let i = BrushKind::ALL.iter().position(|&k| k == self).unwrap_or(0);
        BrushKind::ALL[(i + 1) % BrushKind::ALL.len()]
    }

    /// Dispatch table: exactly one renderer per variant.
    pub fn renderer(self) -> StampFn {
        match self {
            BrushKind::Standard => stamp_standard,
            BrushKind::Airbrush => stamp_airbrush,
            BrushKind::Calligraphy => stamp_calligraphy,
            BrushKind::Marker => stamp_marker,
            BrushKind::Pencil => stamp_pencil,
            BrushKind::Watercolor => stamp_watercolor,
            BrushKind::Neon => stamp_neon,
            BrushKind::Pixel => stamp_pixel,
        }
    }

    /// Largest distance (per axis) from the stamp point that a stamp of
    /// `size` may touch.
    pub fn reach(self, size: i32) -> i32 {
        let size = size.max(1);
        match self {
            BrushKind::Standard | BrushKind::Calligraphy | BrushKind::Marker | BrushKind::Pencil => size,
            BrushKind::Airbrush => size.saturating_mul(2),
            BrushKind::Watercolor | BrushKind::Neon => size.saturating_mul(3),
            BrushKind::Pixel => pixel_cell(size),
        }
    }
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current brush configuration. Every setter clamps instead of rejecting.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushSettings {
    color: Color,
    kind: BrushKind,
    size: u32,
    opacity: f32,
    flow: f32,
    hardness: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            kind: BrushKind::Standard,
            size: 15,
            opacity: 1.0,
            flow: 1.0,
            hardness: 0.5,
        }
    }
}

/// Clamp into [0,1]; NaN falls to 0.
#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

impl BrushSettings {
    pub fn color(&self) -> Color { self.color }
    pub fn kind(&self) -> BrushKind { self.kind }
    pub fn size(&self) -> u32 { self.size }
    pub fn opacity(&self) -> f32 { self.opacity }
    pub fn flow(&self) -> f32 { self.flow }
    pub fn hardness(&self) -> f32 { self.hardness }

    pub fn set_color(&mut self, color: Color) { self.color = color; }
    pub fn set_kind(&mut self, kind: BrushKind) { self.kind = kind; }

    /// Floored to 1. Stamps are clipped to the canvas, so large sizes only
    /// cost as much as the canvas they cover.
    pub fn set_size(&mut self, size: i64) {
        self.size = u32::try_from(size.max(1)).unwrap_or(u32::MAX);
    }

    pub fn set_opacity(&mut self, opacity: f32) { self.opacity = unit(opacity); }
    pub fn set_flow(&mut self, flow: f32) { self.flow = unit(flow); }
    pub fn set_hardness(&mut self, hardness: f32) { self.hardness = unit(hardness); }

    /// Configured size scaled by pressure, rounded, floored to 1.
    pub fn effective_size(&self, pressure: f32) -> i32 {
        let scaled = (self.size as f32 * unit(pressure)).round();
        (scaled as i32).max(1)
    }
}

/// Everything one stamp needs besides the layer.
#[derive(Debug, Clone, Copy)]
pub struct Stamp<'a> {
    pub at: Point,
    pub size: i32,
    pub prev: Option<Point>, // previous stroke point, if the stroke has one
    pub settings: &'a BrushSettings,
}

/// Apply the configured brush once at `stamp.at`.
pub fn stamp(layer: &mut Layer, stamp: &Stamp<'_>, rng: &mut Rng32) {
    log::trace!("stamp {} at ({},{}) size {}", stamp.settings.kind, stamp.at.x, stamp.at.y, stamp.size);
    (stamp.settings.kind.renderer())(layer, stamp, rng);
}

#[inline]
fn rgb_f32(c: Color) -> [f32; 3] {
    c.channels().map(f32::from)
}

#[inline]
fn pixel_cell(size: i32) -> i32 {
    (size / 3).max(1)
}

/* ----------------------------- opaque brushes ----------------------------- */

fn stamp_standard(layer: &mut Layer, s: &Stamp<'_>, _rng: &mut Rng32) {
    layer.fill_disk(s.at, s.size, s.settings.color);
}

/// Nib angle in degrees from `prev` to `at`; 45° with no usable direction.
pub fn nib_angle(prev: Option<Point>, at: Point) -> f32 {
    match prev {
        Some(p) if p != at => {
            let (dx, dy) = ((at.x - p.x) as f32, (at.y - p.y) as f32);
            dy.atan2(dx).to_degrees()
        }
        _ => DEFAULT_NIB_ANGLE,
    }
}

/// Visual: a flat nib, thick across the stroke direction and thin along it.
fn stamp_calligraphy(layer: &mut Layer, s: &Stamp<'_>, _rng: &mut Rng32) {
    let angle = nib_angle(s.prev, s.at);
    layer.fill_ellipse(s.at, s.size, s.size / 3, angle, s.settings.color);
}

/// Visual: chunky pixel-art cells aligned to a fixed grid.
fn stamp_pixel(layer: &mut Layer, s: &Stamp<'_>, _rng: &mut Rng32) {
    let cell = pixel_cell(s.size);
    let gx = s.at.x.div_euclid(cell) * cell;
    let gy = s.at.y.div_euclid(cell) * cell;
    layer.fill_rect(Rect::new(gx, gy, gx + cell, gy + cell), s.settings.color);
}

/* ----------------------------- blended brushes ---------------------------- */

/// Visual: soft spray, densest in the middle.
fn stamp_airbrush(layer: &mut Layer, s: &Stamp<'_>, _rng: &mut Rng32) {
    let opacity = s.settings.opacity;
    let color = rgb_f32(s.settings.color);
    let Some(mut patch) = Patch::on_layer(layer, s.at, s.size.saturating_mul(2)) else { return };
    // Source-over from the outer ring inward, so each inner disk adds density
    // on top of the larger ones instead of being overwritten by them.
    for i in (0..3).rev() {
        let radius = (s.size as f32 * (i + 1) as f32 / 2.0) as i32;
        let disk_opacity = opacity * (3 - i) as f32 / 3.0;
        patch.composite_disk(s.at, radius, color, disk_opacity);
    }
    layer.blend(&patch, opacity);
}

/// Visual: translucent felt-tip; overlapping passes get darker.
fn stamp_marker(layer: &mut Layer, s: &Stamp<'_>, _rng: &mut Rng32) {
    let Some(mut patch) = Patch::on_layer(layer, s.at, s.size) else { return };
    patch.composite_disk(s.at, s.size, rgb_f32(s.settings.color), 1.0);
    layer.blend(&patch, s.settings.opacity * 0.7);
}

fn stamp_pencil(layer: &mut Layer, s: &Stamp<'_>, rng: &mut Rng32) {
    let Some(mut patch) = Patch::on_layer(layer, s.at, s.size) else { return };
    patch.composite_disk(s.at, s.size, rgb_f32(s.settings.color), 1.0);
    patch.darken_with(|| rng.below(50) as f32);
    layer.blend(&patch, s.settings.opacity);
}

/// Visual: blotchy, uneven pigment with bleeding edges.
fn stamp_watercolor(layer: &mut Layer, s: &Stamp<'_>, rng: &mut Rng32) {
    let opacity = s.settings.opacity;
    let base = rgb_f32(s.settings.color);
    let Some(mut patch) = Patch::on_layer(layer, s.at, s.size.saturating_mul(3)) else { return };
    for _ in 0..5 {
        let radius = (s.size as f32 * rng.range(0.5, 1.5)) as i32;
        let disk_opacity = opacity * rng.range(0.5, 1.0);
        let jittered = base.map(|c| (c * rng.range(0.9, 1.1)).clamp(0.0, 255.0).trunc());
        patch.composite_disk(s.at, radius, jittered, disk_opacity);
    }
    patch.blur(GLOW_BLUR_RADIUS);
    layer.blend(&patch, opacity * 0.7);
}

/// Visual: a bright core with a blurred halo of the brush colour.
fn stamp_neon(layer: &mut Layer, s: &Stamp<'_>, _rng: &mut Rng32) {
    let base = s.settings.color.channels();
    let Some(mut patch) = Patch::on_layer(layer, s.at, s.size.saturating_mul(3)) else { return };
    for i in 0..3 {
        let radius = (i64::from(s.size) * (3 - i) / 3) as i32;
        let boost = (50 * (i + 1)).min(255) as u8;
        let lit = base.map(|c| c.saturating_add(boost) as f32);
        patch.composite_disk(s.at, radius, lit, 1.0);
    }
    patch.blur(GLOW_BLUR_RADIUS);
    layer.blend(&patch, s.settings.opacity);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(kind: BrushKind, color: Color) -> BrushSettings {
        let mut s = BrushSettings::default();
        s.set_kind(kind);
        s.set_color(color);
        s
    }

    /// Every changed pixel must lie within `reach` of `at` on both axes.
    fn assert_bounded(before: &Layer, after: &Layer, at: Point, reach: i32, kind: BrushKind) {
        for y in 0..after.height() as i32 {
            for x in 0..after.width() as i32 {
                if before.get(x, y) != after.get(x, y) {
                    assert!(
                        (x - at.x).abs() <= reach && (y - at.y).abs() <= reach,
                        "{kind} touched ({x},{y}) outside reach {reach} of {at:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn every_brush_stays_in_its_neighbourhood() {
        let points = [Point::new(0, 0), Point::new(63, 0), Point::new(63, 47), Point::new(30, 47), Point::new(30, 20)];
        for kind in BrushKind::ALL {
            for &at in &points {
                for size in [1, 4, 9] {
                    let s = settings(kind, Color::rgb(200, 30, 90));
                    let mut layer = Layer::new(64, 48, Color::WHITE);
                    let before = layer.clone();
                    let mut rng = Rng32::from_seed(3);
                    stamp(&mut layer, &Stamp { at, size, prev: None, settings: &s }, &mut rng);
                    assert_bounded(&before, &layer, at, kind.reach(size), kind);
                    assert_ne!(layer, before, "{kind} at {at:?} size {size} painted nothing");
                }
            }
        }
    }

    #[test]
    fn fully_off_canvas_stamp_is_noop() {
        for kind in BrushKind::ALL {
            let s = settings(kind, Color::BLACK);
            let mut layer = Layer::new(16, 16, Color::WHITE);
            let before = layer.clone();
            let mut rng = Rng32::default();
            stamp(&mut layer, &Stamp { at: Point::new(-100, -100), size: 5, prev: None, settings: &s }, &mut rng);
            assert_eq!(layer, before, "{kind}");
        }
    }

    #[test]
    fn standard_is_opaque_disk() {
        let s = settings(BrushKind::Standard, Color::rgb(1, 2, 3));
        let mut layer = Layer::new(32, 32, Color::WHITE);
        stamp(&mut layer, &Stamp { at: Point::new(16, 16), size: 5, prev: None, settings: &s }, &mut Rng32::default());
        assert_eq!(layer.get(16, 16), Some(Color::rgb(1, 2, 3)));
        assert_eq!(layer.get(21, 16), Some(Color::rgb(1, 2, 3)));
        assert_eq!(layer.get(20, 20), Some(Color::WHITE));
    }

    #[test]
    fn marker_is_translucent() {
        let s = settings(BrushKind::Marker, Color::BLACK);
        let mut layer = Layer::new(32, 32, Color::WHITE);
        stamp(&mut layer, &Stamp { at: Point::new(16, 16), size: 4, prev: None, settings: &s }, &mut Rng32::default());
        let c = layer.get(16, 16).unwrap();
        assert!((76..=77).contains(&c.r), "got {c:?}");
        // corners of the patch are outside the disk and stay white
        assert_eq!(layer.get(12, 12), Some(Color::WHITE));
    }

    #[test]
    fn pixel_snaps_to_grid() {
        let s = settings(BrushKind::Pixel, Color::BLACK);
        let mut layer = Layer::new(32, 32, Color::WHITE);
        // size 9 -> cell 3; (7,5) snaps to cell (6,3)
        stamp(&mut layer, &Stamp { at: Point::new(7, 5), size: 9, prev: None, settings: &s }, &mut Rng32::default());
        let painted: Vec<(i32, i32)> = (0..32)
            .flat_map(|y| (0..32).map(move |x| (x, y)))
            .filter(|&(x, y)| layer.get(x, y) == Some(Color::BLACK))
            .collect();
        assert_eq!(painted.len(), 9);
        assert!(painted.iter().all(|&(x, y)| (6..9).contains(&x) && (3..6).contains(&y)));
    }

    #[test]
    fn calligraphy_angle_follows_direction() {
        assert_eq!(nib_angle(None, Point::new(3, 3)), DEFAULT_NIB_ANGLE);
        assert_eq!(nib_angle(Some(Point::new(3, 3)), Point::new(3, 3)), DEFAULT_NIB_ANGLE);
        assert_eq!(nib_angle(Some(Point::new(0, 0)), Point::new(10, 0)), 0.0);
        assert!((nib_angle(Some(Point::new(0, 0)), Point::new(0, 10)) - 90.0).abs() < 1e-4);

        // Horizontal motion: nib is long along x, thin along y
        let s = settings(BrushKind::Calligraphy, Color::BLACK);
        let mut layer = Layer::new(64, 64, Color::WHITE);
        let stamp_ = Stamp { at: Point::new(32, 32), size: 12, prev: Some(Point::new(20, 32)), settings: &s };
        stamp(&mut layer, &stamp_, &mut Rng32::default());
        assert_eq!(layer.get(43, 32), Some(Color::BLACK));
        assert_eq!(layer.get(32, 38), Some(Color::WHITE));
    }

    #[test]
    fn pencil_grain_is_uneven() {
        let s = settings(BrushKind::Pencil, Color::WHITE);
        let mut layer = Layer::new(32, 32, Color::BLACK);
        stamp(&mut layer, &Stamp { at: Point::new(16, 16), size: 6, prev: None, settings: &s }, &mut Rng32::from_seed(11));
        let mut values: Vec<u8> = (10..=22).map(|x| layer.get(x, 16).unwrap().r).collect();
        values.dedup();
        assert!(values.len() > 1, "pencil produced a flat line: {values:?}");
        assert!(values.iter().all(|&v| v > 205));
    }

    #[test]
    fn seeded_watercolor_repeats() {
        let s = settings(BrushKind::Watercolor, Color::rgb(20, 80, 200));
        let run = || {
            let mut layer = Layer::new(48, 48, Color::WHITE);
            let mut rng = Rng32::from_seed(42);
            stamp(&mut layer, &Stamp { at: Point::new(24, 24), size: 5, prev: None, settings: &s }, &mut rng);
            layer
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn neon_core_brighter_than_base() {
        let s = settings(BrushKind::Neon, Color::rgb(0, 0, 100));
        let mut layer = Layer::new(64, 64, Color::BLACK);
        stamp(&mut layer, &Stamp { at: Point::new(32, 32), size: 8, prev: None, settings: &s }, &mut Rng32::default());
        let core = layer.get(32, 32).unwrap();
        assert!(core.r > 0 && core.b > 100, "got {core:?}");
    }

    #[test]
    fn setters_clamp() {
        let mut s = BrushSettings::default();
        s.set_opacity(-0.5);
        assert_eq!(s.opacity(), 0.0);
        s.set_opacity(1.5);
        assert_eq!(s.opacity(), 1.0);
        s.set_flow(2.0);
        s.set_hardness(f32::NAN);
        assert_eq!((s.flow(), s.hardness()), (1.0, 0.0));
        s.set_size(0);
        assert_eq!(s.size(), 1);
        s.set_size(-7);
        assert_eq!(s.size(), 1);
        s.set_size(300);
        assert_eq!(s.size(), 300);
        s.set_size(1 << 40);
        assert_eq!(s.size(), u32::MAX);
    }

    #[test]
    fn huge_brushes_are_clipped_to_the_layer() {
        for kind in BrushKind::ALL {
            let mut s = settings(kind, Color::BLACK);
            s.set_size(300);
            let mut layer = Layer::new(64, 48, Color::WHITE);
            let at = Point::new(0, 0);
            let size = s.effective_size(1.0);
            assert_eq!(size, 300);
            stamp(&mut layer, &Stamp { at, size, prev: None, settings: &s }, &mut Rng32::from_seed(8));
            assert_ne!(layer.get(0, 0), Some(Color::WHITE), "{kind}");
        }
    }

    #[test]
    fn neon_glow_reaches_the_patch_edge_for_small_brushes() {
        let s = settings(BrushKind::Neon, Color::WHITE);
        let mut layer = Layer::new(64, 64, Color::BLACK);
        // size 2: core disk radius 2, patch half-width 6
        stamp(&mut layer, &Stamp { at: Point::new(32, 32), size: 2, prev: None, settings: &s }, &mut Rng32::default());
        let halo = layer.get(38, 32).unwrap();
        assert!(halo.r > 0, "glow stopped short of the patch edge: {halo:?}");
        assert!(layer.get(36, 32).unwrap().r > halo.r);
        assert_eq!(layer.get(39, 32), Some(Color::BLACK));
    }

    #[test]
    fn effective_size_rounds_and_floors() {
        let mut s = BrushSettings::default();
        s.set_size(15);
        assert_eq!(s.effective_size(1.0), 15);
        assert_eq!(s.effective_size(0.5), 8); // 7.5 rounds up
        assert_eq!(s.effective_size(0.0), 1);
        assert_eq!(s.effective_size(3.0), 15); // pressure clamps to 1
    }

    #[test]
    fn next_cycles_through_all() {
        let mut k = BrushKind::Standard;
        for _ in 0..BrushKind::ALL.len() {
            k = k.next();
        }
        assert_eq!(k, BrushKind::Standard);
        assert_eq!(BrushKind::Neon.next(), BrushKind::Pixel);
        assert_eq!(BrushKind::Pixel.next(), BrushKind::Standard);
    }
}
