//! Self-growing force-directed tree rendered on an HTML canvas.
//!
//! A single root node sits in the middle of the canvas. Every few frames a
//! new bud sprouts from a random node; a velocity-Verlet force layout pushes
//! the buds apart and an auto-fit camera keeps the whole tree in view until
//! the node cap is reached.
//!
//! - [`graph`]: append-only node and link collections
//! - [`simulation`]: force layout stepping
//! - [`growth`]: periodic bud creation
//! - [`camera`]: viewport transform, gestures and auto-fit
//! - [`render`]: frame painting through a [`render::Surface`]
//! - [`scheduler`]: repeating per-frame tasks
//!
//! # Example
//!
//! ```ignore
//! use grove_graph::{GraphConfig, GrowingGraphCanvas};
//!
//! view! { <GrowingGraphCanvas config=GraphConfig::default() fullscreen=true /> }
//! ```

pub mod camera;
mod component;
pub mod config;
pub mod geometry;
pub mod graph;
pub mod growth;
mod quadtree;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod state;
#[cfg(test)]
mod testing;
pub mod theme;

pub use component::{GrowingGraphCanvas, LayoutStatus};
pub use config::GraphConfig;
pub use state::GraphScene;
pub use theme::Theme;
