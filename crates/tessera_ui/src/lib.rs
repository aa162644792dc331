//! # TESSERA UI
//!
//! Immediate-mode GUI core with docking:
//! - Widgets are function calls; state lives in id-keyed pools
//! - Row-based layout with fixed, fill and relative widths
//! - Stylesheets with classes, per-id rules and state animations
//! - Split-tree docking, tab groups and dockspaces
//! - One jump-linked command buffer per frame, replayed in z-order
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      FRAME PIPELINE                     │
//! ├────────────────────────────────────────────────────────┤
//! │  Input Events → Widget Calls → Requests → Z-Sort        │
//! │       ↓              ↓             ↓          ↓         │
//! │  Hover/Focus    Layout+Style   Dock Tree  Jump Patch    │
//! │                      ↓                        ↓         │
//! │                 Command Buffer ─────────▶ Renderer      │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tessera_ui::{Context, ContextConfig, FrameHints, Options, Rect};
//! use tessera_ui::render::RecordingRenderer;
//!
//! let mut ctx = Context::new(ContextConfig::default());
//! ctx.begin(FrameHints::default());
//! if ctx.begin_window("Inspector", Rect::new(10.0, 10.0, 240.0, 180.0), Options::NONE) {
//!     ctx.layout_row(&[80.0, -1.0], 0.0);
//!     let _ = ctx.layout_next();
//!     ctx.end_window();
//! }
//! ctx.end(true);
//!
//! let mut renderer = RecordingRenderer::new();
//! assert!(ctx.render(&mut renderer) > 0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod command;
pub mod config;
pub mod container;
pub mod context;
pub mod dock;
pub mod error;
pub mod font;
pub mod input;
pub mod layout;
pub mod render;
pub mod request;
pub mod style;

pub use animation::{Animator, Easing};
pub use command::{Clipping, Command, CommandBuffer};
pub use config::ContextConfig;
pub use container::{Container, ContainerRef, Options};
pub use context::Context;
pub use dock::{Dock, DockError, DockPosition};
pub use error::{UiError, UiResult};
pub use font::{FontId, FontMetrics};
pub use input::{FrameHints, InputEvent, MouseButton};
pub use layout::{Rect, Vec2};
pub use render::Renderer;
pub use request::Request;
pub use style::{Color, ElementType, Style, StyleSheet, StyleState};
pub use tessera_core::{Handle, Id};
