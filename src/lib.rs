//! grove-graph: a self-growing force-directed tree on an HTML canvas.
//!
//! This crate provides a WASM canvas component that starts from a single
//! root node, periodically buds new children off random nodes, lays them out
//! with a force simulation and keeps the whole tree in view with an
//! auto-fitting camera.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Pulled in only for its `js` feature, which lets `rand` seed from the browser.
use getrandom as _;

pub mod components;
pub mod error;

pub use components::force_graph::{GraphConfig, GraphScene, GrowingGraphCanvas, LayoutStatus};
pub use error::Error;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("grove-graph: logging initialized");
}

/// Load configuration from a script element with id="graph-config".
///
/// The element is optional; a missing element, or one that fails to parse
/// or validate, yields the defaults.
pub fn load_config() -> GraphConfig {
	let Some(text) = config_text() else {
		return GraphConfig::default();
	};
	match GraphConfig::from_json(&text) {
		Ok(config) => {
			info!(
				"grove-graph: loaded config (max {} nodes, seed {:?})",
				config.growth.max_nodes, config.seed
			);
			config
		}
		Err(e) => {
			warn!("grove-graph: ignoring graph config: {}", e);
			GraphConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Reads the page configuration and renders the growing graph fullscreen.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let (status, set_status) = signal(LayoutStatus::default());
	let summary = move || {
		let LayoutStatus { nodes, alpha } = status.get();
		format!("{} nodes, alpha {:.3}", nodes, alpha)
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Grove" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GrowingGraphCanvas config=config fullscreen=true status=set_status />
			<div class="graph-overlay">
				<h1>"Grove"</h1>
				<p class="subtitle">"Scroll to zoom. Drag to pan."</p>
				<p class="status">{summary}</p>
			</div>
		</div>
	}
}
