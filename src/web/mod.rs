//! Browser front end: canvas, input wiring and the frame loop.
//!
//! Listeners only translate DOM events into `InputEvent`s and queue them on the
//! session. The `requestAnimationFrame` loop drains the queue, feeds the
//! resulting render events into `Effects` and redraws.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::config::GameConfig;
use crate::session::{GameSession, InputEvent, Layout, Phase};

mod draw;
pub mod effects;

use effects::Effects;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 500;
pub const BOW_CENTER: DVec2 = DVec2::new(130.0, 250.0);
pub const TARGET_CENTER: DVec2 = DVec2::new(500.0, 250.0);

struct FrontEnd {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    session: GameSession,
    effects: Effects,
}

thread_local! {
    static FRONT: RefCell<Option<FrontEnd>> = RefCell::new(None);
}

fn with_front(f: impl FnOnce(&mut FrontEnd)) {
    FRONT.with(|cell| {
        if let Some(front) = cell.borrow_mut().as_mut() {
            f(front);
        }
    });
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Client coordinates to canvas pixels, accounting for CSS scaling.
fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> DVec2 {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
    DVec2::new(
        (client_x as f64 - rect.left()) * sx,
        (client_y as f64 - rect.top()) * sy,
    )
}

/// Queue a reset once the game-over panel is on screen. Returns false while
/// the last arrows are still in the air.
fn request_reset(front: &mut FrontEnd) -> bool {
    if !front.effects.replay_offered(now_ms()) {
        return false;
    }
    front.session.push(InputEvent::Reset);
    true
}

/// Pointer went down at `p`: either grabs the bow or presses "Play again".
fn pointer_down(front: &mut FrontEnd, p: DVec2) -> bool {
    if front.session.phase() == Phase::Ended {
        return draw::reset_button_contains(p) && request_reset(front);
    }
    if front.session.grabs_bow(p) {
        front.session.push(InputEvent::GestureStart(p));
        return true;
    }
    false
}

/// Mount the range and start the frame loop.
///
/// Listeners and the loop are registered once per page. Calling this again
/// swaps in a fresh session with the new config and keeps the existing
/// wiring.
pub fn start(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Create / reuse the range canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("ar-range-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("ar-range-canvas");
        c.set_width(CANVAS_WIDTH);
        c.set_height(CANVAS_HEIGHT);
        c.set_attribute("style", "display:block; margin:24px auto; max-width:100%; border-radius:18px; border:2px solid #222; box-shadow:0 0 32px 0 rgba(0,0,0,0.18); touch-action:none; user-select:none;").ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let session = GameSession::new(
        config,
        Layout { bow_center: BOW_CENTER, target_center: TARGET_CENTER },
    );
    let state = session.state();
    let front = FrontEnd {
        canvas: canvas.clone(),
        ctx,
        effects: Effects::new(state.score, state.shots_remaining),
        session,
    };
    let restarted = FRONT.with(|f| f.replace(Some(front)).is_some());
    if restarted {
        info!("range restarted, {} arrows", state.shots_remaining);
        return Ok(());
    }
    info!("range ready, {} arrows", state.shots_remaining);

    // Mouse: press on the bow, track and release anywhere on the page
    {
        let canvas_down = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let p = canvas_point(&canvas_down, evt.client_x(), evt.client_y());
            with_front(|front| {
                if pointer_down(front, p) {
                    evt.prevent_default();
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas_move = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let p = canvas_point(&canvas_move, evt.client_x(), evt.client_y());
            with_front(|front| front.session.push(InputEvent::GestureMove(p)));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas_up = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let p = canvas_point(&canvas_up, evt.client_x(), evt.client_y());
            with_front(|front| front.session.push(InputEvent::GestureEnd(Some(p))));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch: same flow, first touch point only
    {
        let canvas_touch = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            let Some(touch) = evt.touches().get(0) else {
                return;
            };
            let p = canvas_point(&canvas_touch, touch.client_x(), touch.client_y());
            with_front(|front| {
                if pointer_down(front, p) {
                    evt.prevent_default();
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas_touch = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            let Some(touch) = evt.touches().get(0) else {
                return;
            };
            let p = canvas_point(&canvas_touch, touch.client_x(), touch.client_y());
            with_front(|front| front.session.push(InputEvent::GestureMove(p)));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas_touch = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            // no lifted touch reported -> release falls back to the draw origin
            let p = evt
                .changed_touches()
                .get(0)
                .map(|t| canvas_point(&canvas_touch, t.client_x(), t.client_y()));
            with_front(|front| front.session.push(InputEvent::GestureEnd(p)));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // R restarts a finished round
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key().eq_ignore_ascii_case("r") {
                with_front(|front| {
                    request_reset(front);
                });
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_front(|front| frame_tick(front, ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame_tick(front: &mut FrontEnd, now: f64) {
    for event in front.session.drain() {
        front.effects.apply(&event, now);
    }
    front.effects.tick(now);
    let width = front.canvas.width() as f64;
    let height = front.canvas.height() as f64;
    if let Err(e) = draw::frame(&front.ctx, width, height, &front.session, &front.effects, now) {
        warn!("frame draw failed: {e:?}");
    }
}
