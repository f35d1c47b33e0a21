// The canvas engine: pointer events in, pixels + history out.
//
// Stroke state machine:
//   Idle    --draw(p)-->  Drawing   (stamp at p)
//   Drawing --draw(p)-->  Drawing   (stamp at p, fill the gap from the last point)
//   any     --lift----->  Idle      (snapshot pushed, redo cleared)
//
// Everything lives in one value: two engines in one process share nothing.

use crate::brush::{self, BrushKind, BrushSettings, Stamp};
use crate::config::Config;
use crate::error::Result;
use crate::history::{History, DEFAULT_CAPACITY};
use crate::interpolate::interpolate;
use crate::layer::Layer;
use crate::rng::Rng32;
use crate::types::{Color, FrameBuffer, Point, PointerEvent};
use image::ImageFormat;
use log::{debug, error, info};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Timing of stamping pointer events, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerfCounters {
    pub last_stroke_time_ms: f64,
    pub avg_stroke_time_ms: f64,
    pub stroke_count: u64,
}

impl PerfCounters {
    fn record(&mut self, elapsed: Duration) {
        let ms = elapsed.as_secs_f64() * 1000.0;
        self.stroke_count += 1;
        self.last_stroke_time_ms = ms;
        // running mean
        self.avg_stroke_time_ms += (ms - self.avg_stroke_time_ms) / self.stroke_count as f64;
    }
}

pub struct CanvasEngine {
    width: usize,
    height: usize,
    background: Color,
    layers: Vec<Layer>,
    active: usize,
    brush: BrushSettings,
    prev: Option<Point>, // Some while a stroke is active
    history: History<Layer>,
    rng: Rng32,
    perf: PerfCounters,
}

impl CanvasEngine {
    /// A `width × height` canvas filled with `background`, with the initial
    /// state already recorded in history. Zero dimensions are raised to 1.
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let base = Layer::new(width, height, background);
        Self {
            width,
            height,
            background,
            history: History::new(base.clone(), DEFAULT_CAPACITY),
            layers: vec![base],
            active: 0,
            brush: BrushSettings::default(),
            prev: None,
            rng: Rng32::default(),
            perf: PerfCounters::default(),
        }
    }

    /// Reseed brush texture randomness (pencil grain, watercolor).
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = Rng32::from_seed(seed);
        self
    }

    /// Replace the history with one of `capacity` entries, seeded with the
    /// current layer.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = History::new(self.layer().clone(), capacity);
        self
    }

    /// Build an engine from command-line configuration. Out-of-range numbers
    /// go through the clamping setters.
    pub fn from_config(cfg: &Config) -> Self {
        let mut engine = Self::new(cfg.width, cfg.height, cfg.background)
            .with_history_capacity(cfg.history);
        if let Some(seed) = cfg.seed {
            engine = engine.with_seed(seed);
        }
        engine.set_color(cfg.color);
        engine.set_brush(cfg.brush);
        engine.set_size(cfg.size);
        engine.set_opacity(cfg.opacity);
        engine
    }

    /* ------------------------------- pointer -------------------------------- */

    /// Feed one pointer sample.
    ///
    /// A drawing sample with a position stamps the brush there (and fills the
    /// gap from the previous sample). Anything else ends the stroke and
    /// records a snapshot, even when no stroke was active.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match (event.position, event.is_drawing) {
            (Some(p), true) => self.stroke_to(p, event.pressure),
            _ => self.end_stroke(),
        }
    }

    fn stroke_to(&mut self, raw: Point, pressure: f32) {
        let started = Instant::now();
        let at = Point::new(
            raw.x.clamp(0, self.width as i32 - 1),
            raw.y.clamp(0, self.height as i32 - 1),
        );
        let size = self.brush.effective_size(pressure);
        let prev = self.prev;
        if prev.is_none() {
            debug!("stroke start at ({},{}) with {}", at.x, at.y, self.brush.kind());
        }

        let layer = &mut self.layers[self.active];
        let stamp = Stamp { at, size, prev, settings: &self.brush };
        brush::stamp(layer, &stamp, &mut self.rng);
        if let Some(from) = prev {
            for mid in interpolate(from, at) {
                brush::stamp(layer, &Stamp { at: mid, ..stamp }, &mut self.rng);
            }
        }

        self.prev = Some(at);
        self.perf.record(started.elapsed());
    }

    fn end_stroke(&mut self) {
        if let Some(last) = self.prev.take() {
            debug!("stroke end at ({},{})", last.x, last.y);
        }
        self.commit();
    }

    fn commit(&mut self) {
        self.history.push(self.layers[self.active].clone());
        debug!("snapshot pushed, history {}", self.history.len());
    }

    /* ------------------------------- commands ------------------------------- */

    /// Fill the active layer with the background colour and snapshot it.
    pub fn clear(&mut self) {
        self.prev = None;
        self.layers[self.active].fill(self.background);
        self.commit();
        info!("canvas cleared");
    }

    /// Restore the previous snapshot; the layer as it is now becomes the
    /// next redo. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.prev = None;
        let layer = &mut self.layers[self.active];
        match self.history.undo(layer) {
            Some(state) => {
                layer.copy_from(state);
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone snapshot. The layer it replaces is
    /// pushed onto history, so a following undo returns to it. `false` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.prev = None;
        let layer = &mut self.layers[self.active];
        match self.history.redo(layer) {
            Some(state) => {
                *layer = state;
                true
            }
            None => false,
        }
    }

    /// Write the active layer to `path`; the format follows the extension
    /// (PNG when unknown). Missing directories are created. On failure the
    /// error is logged and `false` returned; nothing in memory changes.
    pub fn save(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.export(path) {
            Ok(()) => {
                info!("canvas saved to {}", path.display());
                true
            }
            Err(e) => {
                error!("Error saving canvas to {}: {e}", path.display());
                false
            }
        }
    }

    /// Like [`save`](Self::save) but returns the error. The file is encoded in
    /// memory and renamed into place, so a failure never leaves a partial file.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
        let mut encoded = Cursor::new(Vec::new());
        self.layer().to_image().write_to(&mut encoded, format)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let written = fs::write(&tmp, encoded.into_inner()).and_then(|()| fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /* -------------------------------- brush --------------------------------- */

    pub fn set_color(&mut self, color: Color) {
        self.brush.set_color(color);
    }

    pub fn set_brush(&mut self, kind: BrushKind) {
        self.brush.set_kind(kind);
    }

    /// Switch to the next brush in [`BrushKind::ALL`].
    pub fn cycle_brush(&mut self) -> BrushKind {
        let next = self.brush.kind().next();
        self.brush.set_kind(next);
        next
    }

    pub fn set_size(&mut self, size: i64) {
        self.brush.set_size(size);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.brush.set_opacity(opacity);
    }

    pub fn set_flow(&mut self, flow: f32) {
        self.brush.set_flow(flow);
    }

    pub fn set_hardness(&mut self, hardness: f32) {
        self.brush.set_hardness(hardness);
    }

    /* -------------------------------- output -------------------------------- */

    /// The active layer, read-only, for display or composition.
    pub fn layer(&self) -> &Layer {
        &self.layers[self.active]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn active_layer(&self) -> usize {
        self.active
    }

    /// Pack the active layer into a window buffer.
    pub fn render_into(&self, frame: &mut FrameBuffer) {
        self.layer().write_frame(frame);
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn perf(&self) -> PerfCounters {
        self.perf
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn is_drawing(&self) -> bool {
        self.prev.is_some()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
