// Scratch patch for the blend-based brushes.
// Brushes paint shapes into a patch (colour premultiplied by coverage), may
// roughen or blur it, then the layer composites the patch in one pass.
// Coverage 0 means "not painted", so pixels outside the brush footprint
// never darken the layer.

use crate::layer::{in_disk, Layer, Rect};
use crate::types::{Color, Point};

pub struct Patch {
    origin: Point,          // top-left pixel in layer coordinates
    width: usize,
    height: usize,
    color: Vec<[f32; 3]>,   // premultiplied by coverage, 0..255 scale
    coverage: Vec<f32>,     // 0..1
}

impl Patch {
    /// Empty (transparent) patch covering `rect`.
    pub fn new(rect: Rect) -> Self {
        let (w, h) = (rect.width() as usize, rect.height() as usize);
        Self {
            origin: Point::new(rect.x0, rect.y0),
            width: w,
            height: h,
            color: vec![[0.0; 3]; w * h],
            coverage: vec![0.0; w * h],
        }
    }

    /// Empty patch spanning `[c-hw, c+hw]` on both axes.
    pub fn around(center: Point, half_width: i32) -> Self {
        Self::new(Rect::around(center, half_width))
    }

    /// Like [`around`](Self::around), but only the part that lands on
    /// `layer` is allocated. `None` when the square misses the layer.
    pub fn on_layer(layer: &Layer, center: Point, half_width: i32) -> Option<Self> {
        Rect::around(center, half_width)
            .clip(layer.width(), layer.height())
            .map(Self::new)
    }

    /// Fully covered patch of a single colour.
    pub fn solid(rect: Rect, color: Color) -> Self {
        let mut p = Self::new(rect);
        let c = color.channels().map(f32::from);
        p.color.fill(c);
        p.coverage.fill(1.0);
        p
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width as i32,
            self.origin.y + self.height as i32,
        )
    }

    pub fn premultiplied(&self) -> &[[f32; 3]] {
        &self.color
    }

    pub fn coverage(&self) -> &[f32] {
        &self.coverage
    }

    /// Composite a disk of `color` at `opacity` (source-over) into the patch.
    /// Parts of the disk outside the patch are dropped.
    pub fn composite_disk(&mut self, center: Point, radius: i32, color: [f32; 3], opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }
        let radius = radius.max(0);
        let Some(r) = Rect::around(center, radius).clip_to(&self.rect()) else { return };
        let inv = 1.0 - opacity;
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                if !in_disk(x - center.x, y - center.y, radius) {
                    continue;
                }
                let i = self.index(x, y);
                for c in 0..3 {
                    self.color[i][c] = self.color[i][c] * inv + color[c].clamp(0.0, 255.0) * opacity;
                }
                self.coverage[i] = self.coverage[i] * inv + opacity;
            }
        }
    }

    /// Subtract per-channel noise from painted pixels, saturating at 0.
    /// `noise` is called once per channel of every painted pixel.
    /// Visual: a grainy, uneven graphite texture.
    pub fn darken_with(&mut self, mut noise: impl FnMut() -> f32) {
        for (px, &cov) in self.color.iter_mut().zip(&self.coverage) {
            if cov <= 0.0 {
                continue;
            }
            for c in px.iter_mut() {
                *c = (*c - noise() * cov).max(0.0);
            }
        }
    }

    /// Separable Gaussian blur with a `2·radius + 1` tap kernel over colour and
    /// coverage, transparent outside the patch.
    /// Visual: soft, bleeding edges (watercolor) or a glow halo (neon).
    pub fn blur(&mut self, radius: usize) {
        if radius == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        let kernel = gaussian_kernel(radius);
        let (w, h) = (self.width, self.height);
        let mut planes: [Vec<f32>; 4] = [
            self.color.iter().map(|c| c[0]).collect(),
            self.color.iter().map(|c| c[1]).collect(),
            self.color.iter().map(|c| c[2]).collect(),
            self.coverage.clone(),
        ];
        let mut tmp = vec![0.0f32; w * h];
        for plane in planes.iter_mut() {
            convolve_pass(plane, &mut tmp, w, h, &kernel, Axis::Horizontal);
            convolve_pass(&tmp, plane, w, h, &kernel, Axis::Vertical);
        }
        let [r, g, b, cov] = planes;
        for i in 0..w * h {
            self.color[i] = [r[i], g[i], b[i]];
            self.coverage[i] = cov[i].clamp(0.0, 1.0);
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y - self.origin.y) as usize * self.width + (x - self.origin.x) as usize
    }
}

impl Rect {
    fn clip_to(&self, bounds: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.x0.max(bounds.x0),
            self.y0.max(bounds.y0),
            self.x1.min(bounds.x1),
            self.y1.min(bounds.y1),
        );
        if r.is_empty() { None } else { Some(r) }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Normalised 1-D Gaussian weights for offsets `-radius..=radius`.
/// Sigma follows the usual rule for a kernel of that size:
/// `0.3·((taps - 1)/2 - 1) + 0.8`, i.e. 3.5 for 21 taps.
fn gaussian_kernel(radius: usize) -> Vec<f32> {
    let taps = 2 * radius + 1;
    let sigma = 0.3 * ((taps as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let s2 = 2.0 * sigma * sigma;
    let r = radius as isize;
    let mut weights: Vec<f32> = (-r..=r).map(|k| (-((k * k) as f32) / s2).exp()).collect();
    let total: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= total; // sum = 1 so flat regions keep their value
    }
    weights
}

/// One separable pass along `axis`; samples outside the patch count as zero.
fn convolve_pass(src: &[f32], dst: &mut [f32], w: usize, h: usize, kernel: &[f32], axis: Axis) {
    let (lines, len) = match axis {
        Axis::Horizontal => (h, w),
        Axis::Vertical => (w, h),
    };
    let at = |line: usize, k: usize| match axis {
        Axis::Horizontal => line * w + k,
        Axis::Vertical => k * w + line,
    };
    let r = kernel.len() / 2;

    for line in 0..lines {
        for k in 0..len {
            let lo = k.saturating_sub(r);
            let hi = (k + r).min(len - 1);
            let mut sum = 0.0f32;
            for j in lo..=hi {
                // kernel index of sample j relative to k
                sum += src[at(line, j)] * kernel[j + r - k];
            }
            dst[at(line, k)] = sum;
        }
    }
}
