//! Browser host: mounts the hero visual on a `<canvas>`.
//!
//! `pointermove` on the window feeds the pointer, an
//! `IntersectionObserver` gates rendering and the background video, and
//! `requestAnimationFrame` drives ticks. The canvas backing store follows
//! its CSS size times the device pixel ratio.

use std::{cell::RefCell, rc::Rc};

use js_sys::{Array, Object};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    HtmlCanvasElement, HtmlMediaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, PointerEvent,
};
use web_time::Instant;

use crate::{
    hero::HeroVisual,
    input::InputEvent,
    media::{AutoplayController, MediaCommand, VisibilityGate},
    options::Options,
    renderer::GpuBackend,
};

/// Share of an element that must be on screen to count as visible.
const VISIBLE_RATIO: f32 = 0.1;

struct BackgroundVideo {
    element: HtmlMediaElement,
    gate: VisibilityGate,
    autoplay: AutoplayController,
}

struct WebState {
    hero: Option<HeroVisual<GpuBackend>>,
    canvas: HtmlCanvasElement,
    size: (u32, u32),
    started: Instant,
    gate: VisibilityGate,
    video: Option<BackgroundVideo>,
    frame_request: Option<i32>,
}

type Shared = Rc<RefCell<WebState>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type IntersectionCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// A running hero. Call [`stop`](Self::stop) (or free it) to unmount.
#[wasm_bindgen]
pub struct WebHandle {
    state: Shared,
    frame: FrameCallback,
    observer: IntersectionObserver,
    pointer_move: Closure<dyn FnMut(PointerEvent)>,
    _intersection: IntersectionCallback,
}

#[wasm_bindgen]
impl WebHandle {
    /// Unmount: stop the frame loop, detach listeners, pause the video.
    /// Idempotent.
    pub fn stop(&self) {
        self.observer.disconnect();
        let window = web_sys::window();
        {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            if let (Some(window), Some(id)) =
                (&window, state.frame_request.take())
            {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(mut hero) = state.hero.take() {
                hero.unmount();
            }
            if let Some(video) = &state.video {
                let _ = video.element.pause();
            }
        }
        if let Some(window) = &window {
            let _ = window.remove_event_listener_with_callback(
                "pointermove",
                self.pointer_move.as_ref().unchecked_ref(),
            );
        }
        let _ = self.frame.borrow_mut().take();
    }
}

impl Drop for WebHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Mount the hero on the canvas with id `canvas_id`.
///
/// `video_selector` names an optional background `<video>` that plays
/// while on screen. `options_toml` overrides the default options.
///
/// # Errors
///
/// Rejects with a message string if the page elements are missing, the
/// options fail to parse, or the GPU context cannot be created.
#[wasm_bindgen]
pub async fn start(
    canvas_id: String,
    video_selector: Option<String>,
    options_toml: Option<String>,
) -> Result<WebHandle, JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| host_error("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| host_error("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| host_error(&format!("no element #{canvas_id}")))?
        .dyn_into()
        .map_err(|_| host_error(&format!("#{canvas_id} is not a canvas")))?;

    let options = match options_toml {
        Some(toml) => Options::from_toml(&toml).map_err(|e| host_error(&e.to_string()))?,
        None => Options::default(),
    };

    let video = match video_selector {
        Some(selector) => document
            .query_selector(&selector)?
            .and_then(|el| el.dyn_into::<HtmlMediaElement>().ok())
            .map(|element| BackgroundVideo {
                element,
                gate: VisibilityGate::new(VISIBLE_RATIO),
                autoplay: AutoplayController::new(),
            }),
        None => None,
    };

    let size = fit_canvas(&window, &canvas);
    let hero = HeroVisual::with_surface(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        size,
        options,
    )
    .await
    .map_err(|e| host_error(&e.to_string()))?;

    let state: Shared = Rc::new(RefCell::new(WebState {
        hero: Some(hero),
        canvas: canvas.clone(),
        size,
        started: Instant::now(),
        gate: VisibilityGate::new(VISIBLE_RATIO),
        video,
        frame_request: None,
    }));

    let pointer_move = pointer_listener(&state);
    window.add_event_listener_with_callback(
        "pointermove",
        pointer_move.as_ref().unchecked_ref(),
    )?;

    let intersection = intersection_listener(&state);
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(f64::from(VISIBLE_RATIO)));
    let observer = IntersectionObserver::new_with_options(
        intersection.as_ref().unchecked_ref(),
        &init,
    )?;
    observer.observe(&canvas);
    if let Some(video) = &state.borrow().video {
        observer.observe(&video.element);
    }

    let frame = frame_loop(&state);
    let first = schedule(&window, &frame);
    state.borrow_mut().frame_request = first;

    Ok(WebHandle {
        state,
        frame,
        observer,
        pointer_move,
        _intersection: intersection,
    })
}

fn host_error(msg: &str) -> JsValue {
    log::error!("{msg}");
    JsValue::from_str(msg)
}

/// Match the canvas backing store to its CSS size; returns the new size.
fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
    let ratio = window.device_pixel_ratio();
    let width = (f64::from(canvas.client_width()) * ratio).round().max(0.0) as u32;
    let height = (f64::from(canvas.client_height()) * ratio).round().max(0.0) as u32;
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }
    (width, height)
}

fn pointer_listener(state: &Shared) -> Closure<dyn FnMut(PointerEvent)> {
    let state = Rc::clone(state);
    Closure::new(move |event: PointerEvent| {
        let mut guard = state.borrow_mut();
        let state = &mut *guard;
        let ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let rect = state.canvas.get_bounding_client_rect();
        let x = ((f64::from(event.client_x()) - rect.left()) * ratio) as f32;
        let y = ((f64::from(event.client_y()) - rect.top()) * ratio) as f32;
        if let Some(hero) = &mut state.hero {
            hero.handle_event(InputEvent::PointerMoved { x, y });
        }
    })
}

fn intersection_listener(state: &Shared) -> IntersectionCallback {
    let shared = Rc::clone(state);
    Closure::new(move |entries: Array, _observer: IntersectionObserver| {
        let mut guard = shared.borrow_mut();
        let state = &mut *guard;
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            let target = entry.target();
            let intersecting = entry.is_intersecting();
            let ratio = entry.intersection_ratio() as f32;

            if Object::is(&target, &state.canvas) {
                if let Some(visible) = state.gate.observe(intersecting, ratio) {
                    if let Some(hero) = &mut state.hero {
                        hero.handle_event(InputEvent::VisibilityChanged {
                            visible,
                        });
                    }
                }
            } else if let Some(video) = &mut state.video {
                if !Object::is(&target, &video.element) {
                    continue;
                }
                let command = video
                    .gate
                    .observe(intersecting, ratio)
                    .and_then(|visible| video.autoplay.on_visibility(visible));
                if let Some(command) = command {
                    run_media_command(&shared, video, command);
                }
            }
        }
    })
}

fn run_media_command(
    shared: &Shared,
    video: &mut BackgroundVideo,
    command: MediaCommand,
) {
    match command {
        MediaCommand::Pause => {
            if let Err(e) = video.element.pause() {
                log::debug!("pause failed: {e:?}");
            }
        }
        MediaCommand::Play => {
            let promise = match video.element.play() {
                Ok(promise) => promise,
                Err(e) => {
                    video.autoplay.play_rejected(describe(&e));
                    return;
                }
            };
            let shared = Rc::clone(shared);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = JsFuture::from(promise).await;
                let mut guard = shared.borrow_mut();
                let Some(video) = guard.video.as_mut() else {
                    return;
                };
                let follow_up = match outcome {
                    Ok(_) => video.autoplay.play_resolved(),
                    Err(reason) => {
                        video.autoplay.play_rejected(describe(&reason));
                        None
                    }
                };
                if let Some(command) = follow_up {
                    run_media_command(&shared, video, command);
                }
            });
        }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn frame_loop(state: &Shared) -> FrameCallback {
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let next = Rc::clone(&frame);
    let state = Rc::clone(state);
    *frame.borrow_mut() = Some(Closure::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut guard = state.borrow_mut();
        let state = &mut *guard;
        let Some(hero) = &mut state.hero else {
            return;
        };
        let size = fit_canvas(&window, &state.canvas);
        if size != state.size {
            state.size = size;
            hero.handle_event(InputEvent::Resized {
                width: size.0,
                height: size.1,
            });
        }
        let _ = hero.tick(state.started.elapsed().as_secs_f32());
        state.frame_request = schedule(&window, &next);
    }));
    frame
}

fn schedule(window: &web_sys::Window, frame: &FrameCallback) -> Option<i32> {
    let frame = frame.borrow();
    let callback = frame.as_ref()?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}
