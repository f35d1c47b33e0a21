// Gap filling between two pointer samples.
// Visual: fast hand motion still produces a continuous line instead of dots.

use crate::types::Point;

/// Samples closer than this are treated as a single dab.
pub const MIN_GAP: f32 = 2.0;

/// Intermediate stamp positions strictly between `from` and `to`.
///
/// Returns nothing when the points are less than [`MIN_GAP`] apart. Otherwise
/// `n = max(2, floor(dist / 2))` and the points at `t = i/n` for `i in 1..n`
/// are returned, truncated to whole pixels. Neither endpoint is included; the
/// caller has already stamped `to`.
pub fn interpolate(from: Point, to: Point) -> Vec<Point> {
    let (dx, dy) = ((to.x - from.x) as f64, (to.y - from.y) as f64);
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < MIN_GAP as f64 {
        return Vec::new();
    }
    let n = ((dist / MIN_GAP as f64) as usize).max(2);
    // from + d·i/n keeps integer-spaced samples exact (no 101.9999 -> 101)
    (1..n)
        .map(|i| {
            let step = |a: i32, d: f64| (a as f64 + d * i as f64 / n as f64) as i32;
            Point::new(step(from.x, dx), step(from.y, dy))
        })
        .collect()
}
