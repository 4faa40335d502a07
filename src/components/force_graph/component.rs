//! Leptos component wrapping the growing-graph canvas.
//!
//! The component creates an HTML canvas element, builds the scene once the
//! canvas is mounted, and registers the scene's activities on a
//! `requestAnimationFrame` scheduler. Background drag pans and the wheel
//! zooms; both hold off the auto-fit camera for a while.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::scheduler::AnimationFrames;
use super::state::{self, GraphScene};

type SharedScene = Rc<RefCell<GraphScene>>;

/// Live layout numbers, published after every simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutStatus {
	/// Node count.
	pub nodes: usize,
	/// Alpha after the latest tick.
	pub alpha: f64,
}

/// Renders the self-growing graph on a canvas element.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and resize automatically with
/// the window. Explicit `width`/`height` override automatic sizing. Pass a
/// `status` signal to observe the layout as it runs.
#[component]
pub fn GrowingGraphCanvas(
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] status: Option<WriteSignal<LayoutStatus>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let scene: Rc<RefCell<Option<SharedScene>>> = Rc::new(RefCell::new(None));
	let frames: Rc<RefCell<Option<AnimationFrames>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (scene_init, frames_init, resize_cb_init) = (scene.clone(), frames.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if scene_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("grove-graph: canvas has no 2d context");
			return;
		};

		let mut built = match GraphScene::new(&config, w, h) {
			Ok(built) => built,
			Err(e) => {
				warn!("grove-graph: cannot start scene: {}", e);
				return;
			}
		};
		if let Some(status) = status {
			built.simulation.on_tick(move |event, graph| {
				status.set(LayoutStatus {
					nodes: graph.len(),
					alpha: event.alpha,
				});
			});
		}
		let shared = Rc::new(RefCell::new(built));
		*scene_init.borrow_mut() = Some(shared.clone());

		if fullscreen {
			let (scene_resize, canvas_resize) = (shared.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				scene_resize.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let scheduler = AnimationFrames::new();
		state::schedule(&shared, &scheduler, Rc::new(ctx));
		*frames_init.borrow_mut() = Some(scheduler);
	});

	let scene_md = scene.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		with_scene(&scene_md, |s| s.viewport.begin_pan(x, y, js_sys::Date::now()));
	};

	let scene_mm = scene.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		with_scene(&scene_mm, |s| {
			if s.viewport.is_dragging() {
				s.viewport.pan_to(x, y, js_sys::Date::now());
			}
		});
	};

	let scene_mu = scene.clone();
	let on_mouseup = move |_: MouseEvent| {
		with_scene(&scene_mu, |s| s.viewport.end_pan(js_sys::Date::now()));
	};

	let scene_ml = scene.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_scene(&scene_ml, |s| {
			if s.viewport.is_dragging() {
				s.viewport.end_pan(js_sys::Date::now());
			}
		});
	};

	let scene_wh = scene.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let delta_y = ev.delta_y();
		with_scene(&scene_wh, |s| s.wheel(delta_y, x, y, js_sys::Date::now()));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="growing-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab; background: #000;"
		/>
	}
}

fn with_scene(slot: &Rc<RefCell<Option<SharedScene>>>, f: impl FnOnce(&mut GraphScene)) {
	if let Some(scene) = slot.borrow().as_ref() {
		f(&mut scene.borrow_mut());
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	let read = |value: Result<JsValue, JsValue>, fallback: f64| {
		value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(read(window.inner_width(), 800.0), read(window.inner_height(), 600.0))
}

/// Event position relative to the canvas' top-left corner.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
