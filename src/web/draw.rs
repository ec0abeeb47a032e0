// Canvas drawing for the range. Pure presentation: reads the session and the
// effect records, never mutates either.

use glam::DVec2;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::effects::{Effects, FlyingArrow, HitMark};
use crate::config::Ring;
use crate::render::{PullFeedback, power_color, power_percent};
use crate::session::GameSession;

// Bullseye outward: gold, red, blue, black, white.
const RING_COLORS: [&str; 5] = ["#ffd700", "#e63946", "#1d8fe1", "#2b2b2b", "#f2f2f2"];

/// "Play again" button on the game-over panel: x, y, w, h.
pub const RESET_BUTTON: (f64, f64, f64, f64) = (330.0, 300.0, 140.0, 44.0);

pub fn reset_button_contains(p: DVec2) -> bool {
    let (x, y, w, h) = RESET_BUTTON;
    p.x >= x && p.x <= x + w && p.y >= y && p.y <= y + h
}

pub fn frame(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    session: &GameSession,
    fx: &Effects,
    now: f64,
) -> Result<(), JsValue> {
    let layout = session.layout();
    let rings = &session.config().rings;

    backdrop(ctx, width, height)?;
    target(ctx, layout.target_center, rings, fx.ring_flash(now))?;
    for (mark, progress) in fx.points_texts(now) {
        points_text(ctx, layout.target_center, rings, mark, progress)?;
    }
    if let Some(pull) = fx.pull() {
        stretch_line(ctx, layout.bow_center, pull);
    }
    bow(ctx, layout.bow_center, fx.pull().filter(|_| fx.drawing()))?;
    if let Some(pull) = fx.pull() {
        power_indicator(ctx, layout.bow_center, pull)?;
    }
    for arrow in fx.arrows() {
        flying_arrow(ctx, arrow, now)?;
    }
    for progress in fx.miss_banners(now) {
        miss_banner(ctx, width, height, progress)?;
    }
    hud(ctx, fx.score(), fx.shots())?;
    if let Some(final_score) = fx.game_over(now) {
        game_over_panel(ctx, width, height, final_score)?;
    }
    Ok(())
}

fn backdrop(ctx: &CanvasRenderingContext2d, width: f64, height: f64) -> Result<(), JsValue> {
    let sky = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    sky.add_color_stop(0.0, "#87ceeb")?;
    sky.add_color_stop(0.7, "#cfe9c8")?;
    sky.add_color_stop(1.0, "#5b8c3a")?;
    ctx.set_fill_style_canvas_gradient(&sky);
    ctx.fill_rect(0.0, 0.0, width, height);
    Ok(())
}

fn target(
    ctx: &CanvasRenderingContext2d,
    center: DVec2,
    rings: &[Ring],
    flash: Option<usize>,
) -> Result<(), JsValue> {
    // outermost first so inner rings paint over it
    for (idx, ring) in rings.iter().enumerate().rev() {
        ctx.begin_path();
        ctx.arc(center.x, center.y, ring.radius, 0.0, std::f64::consts::TAU)?;
        ctx.set_fill_style_str(RING_COLORS[idx % RING_COLORS.len()]);
        ctx.fill();
        ctx.set_stroke_style_str("rgba(0,0,0,0.35)");
        ctx.set_line_width(1.5);
        ctx.stroke();
    }
    if let Some(idx) = flash {
        if let Some(ring) = rings.get(idx) {
            ctx.save();
            ctx.begin_path();
            ctx.arc(center.x, center.y, ring.radius, 0.0, std::f64::consts::TAU)?;
            ctx.set_shadow_blur(24.0);
            ctx.set_shadow_color("rgba(255,255,255,0.9)");
            ctx.set_stroke_style_str("#ffffff");
            ctx.set_line_width(5.0);
            ctx.stroke();
            ctx.restore();
        }
    }
    Ok(())
}

fn points_text(
    ctx: &CanvasRenderingContext2d,
    center: DVec2,
    rings: &[Ring],
    mark: &HitMark,
    progress: f64,
) -> Result<(), JsValue> {
    let radius = rings.get(mark.ring).map(|r| r.radius).unwrap_or(0.0);
    let lift = 40.0 * progress;
    let scale = if progress < 0.5 { 1.0 + 0.4 * progress } else { 1.2 - 0.8 * (progress - 0.5) };
    ctx.save();
    ctx.set_global_alpha((1.0 - progress).clamp(0.0, 1.0));
    ctx.translate(center.x, center.y - radius - 30.0 - lift)?;
    ctx.scale(scale, scale)?;
    ctx.set_font("bold 32px sans-serif");
    ctx.set_text_align("center");
    ctx.set_shadow_blur(10.0);
    ctx.set_shadow_color("rgba(255,215,0,0.8)");
    ctx.set_fill_style_str("#ffd700");
    ctx.fill_text(&format!("+{}", mark.points), 0.0, 0.0)?;
    ctx.restore();
    Ok(())
}

fn stretch_line(ctx: &CanvasRenderingContext2d, bow_center: DVec2, pull: &PullFeedback) {
    let dir = DVec2::new(pull.angle.cos(), pull.angle.sin());
    // string runs back toward the hand, opposite the aim
    let end = bow_center - dir * pull.stretch;
    ctx.set_stroke_style_str("rgba(80,50,20,0.8)");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(bow_center.x, bow_center.y);
    ctx.line_to(end.x, end.y);
    ctx.stroke();
}

fn bow(
    ctx: &CanvasRenderingContext2d,
    bow_center: DVec2,
    pull: Option<&PullFeedback>,
) -> Result<(), JsValue> {
    ctx.save();
    match pull {
        Some(p) => {
            let pos = bow_center + p.bow_offset;
            ctx.translate(pos.x, pos.y)?;
            ctx.scale(p.bow_scale, p.bow_scale)?;
            ctx.rotate(p.bow_rotation())?;
        }
        None => ctx.translate(bow_center.x, bow_center.y)?,
    }
    ctx.set_font("64px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text("🏹", 0.0, 0.0)?;
    ctx.restore();
    Ok(())
}

fn power_indicator(
    ctx: &CanvasRenderingContext2d,
    bow_center: DVec2,
    pull: &PullFeedback,
) -> Result<(), JsValue> {
    let percent = power_percent(pull.power);
    ctx.set_font("bold 18px 'Fira Code', monospace");
    ctx.set_text_align("center");
    ctx.set_text_baseline("alphabetic");
    ctx.set_fill_style_str(power_color(percent));
    ctx.fill_text(&format!("Power: {percent}%"), bow_center.x, bow_center.y + 90.0)
}

fn flying_arrow(ctx: &CanvasRenderingContext2d, arrow: &FlyingArrow, now: f64) -> Result<(), JsValue> {
    let pos = arrow.position(now);
    ctx.save();
    ctx.translate(pos.x, pos.y)?;
    ctx.rotate(arrow.angle)?;
    ctx.set_stroke_style_str("#5a3a1a");
    ctx.set_line_width(3.0);
    ctx.begin_path();
    ctx.move_to(-24.0, 0.0);
    ctx.line_to(12.0, 0.0);
    ctx.stroke();
    // head
    ctx.set_fill_style_str("#555555");
    ctx.begin_path();
    ctx.move_to(20.0, 0.0);
    ctx.line_to(10.0, -5.0);
    ctx.line_to(10.0, 5.0);
    ctx.close_path();
    ctx.fill();
    // fletching
    ctx.set_stroke_style_str("#d62828");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(-24.0, 0.0);
    ctx.line_to(-30.0, -6.0);
    ctx.move_to(-24.0, 0.0);
    ctx.line_to(-30.0, 6.0);
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn miss_banner(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    progress: f64,
) -> Result<(), JsValue> {
    // fade in while growing, then shrink away
    let (alpha, scale) = if progress < 0.5 {
        (progress * 2.0, 0.5 + 1.4 * progress)
    } else {
        ((1.0 - progress) * 2.0, 1.2 - 0.8 * (progress - 0.5))
    };
    ctx.save();
    ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
    ctx.translate(width / 2.0, height / 2.0)?;
    ctx.scale(scale, scale)?;
    ctx.set_font("bold 48px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_shadow_blur(20.0);
    ctx.set_shadow_color("rgba(255,68,68,0.8)");
    ctx.set_fill_style_str("#ff4444");
    ctx.fill_text("MISS!", 0.0, 0.0)?;
    ctx.restore();
    Ok(())
}

fn hud(ctx: &CanvasRenderingContext2d, score: u32, shots: u32) -> Result<(), JsValue> {
    ctx.set_font("bold 22px 'Fira Code', monospace");
    ctx.set_text_align("left");
    ctx.set_text_baseline("alphabetic");
    ctx.set_fill_style_str("#1b1b1b");
    ctx.fill_text(&format!("Score: {score}"), 20.0, 34.0)?;
    ctx.fill_text(&format!("Arrows: {shots}"), 200.0, 34.0)
}

fn game_over_panel(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    final_score: u32,
) -> Result<(), JsValue> {
    ctx.set_fill_style_str("rgba(0,0,0,0.55)");
    ctx.fill_rect(0.0, 0.0, width, height);

    let cx = width / 2.0;
    let cy = height / 2.0;
    ctx.set_text_align("center");
    ctx.set_text_baseline("alphabetic");
    ctx.set_fill_style_str("#ffffff");
    ctx.set_stroke_style_str("#000000");
    ctx.set_line_width(6.0);
    ctx.set_font("56px sans-serif");
    ctx.stroke_text("GAME OVER", cx, cy - 60.0)?;
    ctx.fill_text("GAME OVER", cx, cy - 60.0)?;
    ctx.set_font("26px 'Fira Code', monospace");
    ctx.fill_text(&format!("Final score: {final_score}"), cx, cy - 10.0)?;

    let (x, y, w, h) = RESET_BUTTON;
    ctx.set_fill_style_str("#6bcf7f");
    ctx.fill_rect(x, y, w, h);
    ctx.set_fill_style_str("#0f2a14");
    ctx.set_font("bold 18px sans-serif");
    ctx.fill_text("Play again", x + w / 2.0, y + h / 2.0 + 6.0)?;
    ctx.set_fill_style_str("#dddddd");
    ctx.set_font("14px 'Fira Code', monospace");
    ctx.fill_text("or press R", cx, y + h + 24.0)
}
