// What you SEE:
// • A blank canvas window (white by default).
// • Hold Left Mouse: paint with the current brush. Release: the stroke is committed.
// • 1–8 pick a brush, B cycles brushes, +/- resize, [ / ] change opacity.
// • C clears, Z undoes, Y redoes, S saves to --output. ESC quits.

mod draw;

use air_canvas::{CanvasEngine, Config, Error, FrameBuffer, PointerEvent};
use clap::Parser;
use draw::{draw_crosshair, draw_text_5x7, Drawer, HostCommand};
use log::{debug, info, warn};
use std::path::Path;
use std::time::{Duration, Instant};

const OPACITY_STEP: f32 = 0.1;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cfg = Config::parse();
    info!(
        "Starting air-canvas {}x{} (history {}, output {})",
        cfg.width, cfg.height, cfg.history, cfg.output.display()
    );

    /* --- Canvas + window setup ---
       Visual: window opens showing the background colour. */
    let mut canvas = CanvasEngine::from_config(&cfg);
    let (w, h) = (canvas.width(), canvas.height());
    let mut drawer = Drawer::new("Air Canvas", w, h)?;

    /* --- Reusable screen buffer ---
       Visual: the layer plus overlays; this is what you actually see each frame. */
    let mut screen = FrameBuffer::new(w, h);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    // Only the press→release edge sends a lift, so hovering never floods history.
    let mut was_drawing = false;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Pointer → canvas
           Visual: the stroke grows under the cursor; releasing commits it. */
        let pos = drawer.mouse_pos();
        match (pos, drawer.left_mouse_down()) {
            (Some((mx, my)), true) => {
                canvas.handle_pointer(PointerEvent::draw(mx as i32, my as i32, 1.0));
                was_drawing = true;
            }
            _ if was_drawing => {
                canvas.handle_pointer(PointerEvent::lift());
                was_drawing = false;
            }
            _ => {}
        }

        /* 2) Keyboard commands */
        for cmd in drawer.commands() {
            apply(&mut canvas, cmd, &cfg.output);
        }

        /* 3) Compose the frame: layer first, then overlays on the copy */
        canvas.render_into(&mut screen);
        if let Some((mx, my)) = pos {
            let gap = canvas.brush().size().min(64) as i32;
            draw_crosshair(&mut screen, mx as i32, my as i32, gap, 0x00_FF_66_00);
        }

        let perf = canvas.perf();
        let brush = canvas.brush();
        let hud = format!(
            "{} | SIZE {} | OPACITY {:.0}% | {:.2} MS | UNDO {} | {}",
            brush.kind(),
            brush.size(),
            brush.opacity() * 100.0,
            perf.avg_stroke_time_ms,
            canvas.history_len() - 1,
            hud_fps_text
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        /* 4) Present to the window */
        drawer.present(&screen)?;

        /* 5) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {:.1}, strokes: {}", fps, perf.stroke_count);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("Window closed, bye");
    Ok(())
}

/// Route one keyboard command to the canvas.
fn apply(canvas: &mut CanvasEngine, cmd: HostCommand, output: &Path) {
    match cmd {
        HostCommand::Clear => canvas.clear(),
        HostCommand::Undo => {
            if !canvas.undo() { debug!("nothing to undo"); }
        }
        HostCommand::Redo => {
            if !canvas.redo() { debug!("nothing to redo"); }
        }
        HostCommand::Save => {
            if !canvas.save(output) { warn!("save to {} failed", output.display()); }
        }
        HostCommand::SelectBrush(kind) => canvas.set_brush(kind),
        HostCommand::CycleBrush => {
            let kind = canvas.cycle_brush();
            info!("brush: {kind}");
        }
        HostCommand::Grow => canvas.set_size(canvas.brush().size() as i64 + 1),
        HostCommand::Shrink => canvas.set_size(canvas.brush().size() as i64 - 1),
        HostCommand::MoreOpaque => canvas.set_opacity(canvas.brush().opacity() + OPACITY_STEP),
        HostCommand::LessOpaque => canvas.set_opacity(canvas.brush().opacity() - OPACITY_STEP),
    }
}
