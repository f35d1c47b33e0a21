// The raster target every brush draws into.
// A Layer is a fixed-size RGB buffer; all region writes are clipped against
// its edges before a single byte changes, so off-canvas stamps are no-ops.

use crate::patch::Patch;
use crate::types::{Color, FrameBuffer, Point};
use image::RgbImage;

/// Half-open pixel rectangle `[x0,x1) × [y0,y1)`. May extend off-canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Square covering `[c-hw, c+hw]` on both axes (inclusive), i.e. side 2·hw+1.
    pub fn around(center: Point, half_width: i32) -> Self {
        let hw = half_width.max(0);
        Self::new(
            center.x.saturating_sub(hw),
            center.y.saturating_sub(hw),
            center.x.saturating_add(hw).saturating_add(1),
            center.y.saturating_add(hw).saturating_add(1),
        )
    }

    pub fn width(&self) -> i32 {
        self.x1.saturating_sub(self.x0).max(0)
    }

    pub fn height(&self) -> i32 {
        self.y1.saturating_sub(self.y0).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersect with `[0,width) × [0,height)`. `None` when nothing is left.
    pub fn clip(&self, width: usize, height: usize) -> Option<Rect> {
        let r = Rect::new(
            self.x0.max(0),
            self.y0.max(0),
            self.x1.min(width as i32),
            self.y1.min(height as i32),
        );
        if r.is_empty() { None } else { Some(r) }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Is the offset (dx,dy) inside a disk of radius `r`? Radius 0 is the centre pixel.
#[inline]
pub(crate) fn in_disk(dx: i32, dy: i32, r: i32) -> bool {
    let (dx, dy, r) = (i64::from(dx), i64::from(dy), i64::from(r));
    dx * dx + dy * dy <= r * r
}

/// Is (dx,dy) inside an ellipse with semi-axes (a,b) rotated by `angle_deg`?
#[inline]
pub(crate) fn in_ellipse(dx: i32, dy: i32, a: f32, b: f32, angle_deg: f32) -> bool {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let (dx, dy) = (dx as f32, dy as f32);
    let u = dx * c + dy * s;     // along the major axis
    let v = -dx * s + dy * c;    // along the minor axis
    let (a, b) = (a.max(0.5), b.max(0.5)); // degenerate axes still draw a hairline
    (u * u) / (a * a) + (v * v) / (b * b) <= 1.0
}

/// One RGB raster layer, row-major, 3 bytes per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Layer {
    /// Allocate a `width × height` layer filled with `fill`.
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        let mut layer = Self { width, height, data: vec![0u8; width * height * 3] };
        layer.fill(fill);
        layer
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) * 3)
    }

    /// Read one sample; `None` outside the layer.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.offset(x, y)
            .map(|i| Color::rgb(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Write one sample; silently ignored outside the layer.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 3].copy_from_slice(&color.channels());
        }
    }

    pub fn fill(&mut self, color: Color) {
        let c = color.channels();
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&c);
        }
    }

    /// Opaque axis-aligned rectangle, clipped.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = rect.clip(self.width, self.height) else { return };
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                self.put(x, y, color);
            }
        }
    }

    /// Opaque filled disk, clipped.
    pub fn fill_disk(&mut self, center: Point, radius: i32, color: Color) {
        let radius = radius.max(0);
        let Some(r) = Rect::around(center, radius).clip(self.width, self.height) else { return };
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                if in_disk(x - center.x, y - center.y, radius) {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Opaque filled ellipse with semi-axes (a,b) rotated by `angle_deg`, clipped.
    pub fn fill_ellipse(&mut self, center: Point, a: i32, b: i32, angle_deg: f32, color: Color) {
        let reach = a.max(b).max(0);
        let Some(r) = Rect::around(center, reach).clip(self.width, self.height) else { return };
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                if in_ellipse(x - center.x, y - center.y, a as f32, b as f32, angle_deg) {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Composite `patch` over its own rectangle with global `alpha`.
    ///
    /// Per channel: `dst = (1 - alpha·cov)·dst + alpha·src·cov`, clamped to
    /// [0,255]. With full coverage this is exactly `(1-alpha)·dst + alpha·src`.
    /// The rectangle is clipped before any write; fully off-canvas is a no-op.
    pub fn blend(&mut self, patch: &Patch, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let Some(r) = patch.rect().clip(self.width, self.height) else { return };
        let origin = patch.origin();
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                let pi = (y - origin.y) as usize * patch.width() + (x - origin.x) as usize;
                let cov = patch.coverage()[pi];
                if cov <= 0.0 {
                    continue; // nothing painted here; leave the layer untouched
                }
                let src = patch.premultiplied()[pi];
                let keep = 1.0 - alpha * cov;
                let i = (y as usize * self.width + x as usize) * 3;
                for c in 0..3 {
                    let v = keep * self.data[i + c] as f32 + alpha * src[c];
                    self.data[i + c] = v.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    /// Overwrite this layer with `other` (same dimensions) without reallocating.
    pub fn copy_from(&mut self, other: &Layer) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.data.copy_from_slice(&other.data);
    }

    /// Pack into a window buffer as 0x00RRGGBB.
    /// Visual: the window shows exactly what the layer holds.
    pub fn write_frame(&self, frame: &mut FrameBuffer) {
        frame.width = self.width;
        frame.height = self.height;
        frame.pixels.clear();
        frame.pixels.extend(
            self.data.chunks_exact(3).map(|p| Color::rgb(p[0], p[1], p[2]).to_u32()),
        );
    }

    /// Copy into an `image` buffer for encoding.
    pub fn to_image(&self) -> RgbImage {
        // Dimensions always match the data length, so this cannot fail.
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let i = (y as usize * self.width + x as usize) * 3;
            image::Rgb([self.data[i], self.data[i + 1], self.data[i + 2]])
        })
    }
}
