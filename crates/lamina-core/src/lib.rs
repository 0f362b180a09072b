//! Core systems for Lamina.
//!
//! This crate provides the foundational components of the Lamina action-sheet
//! toolkit:
//!
//! - **Signal/Slot System**: Type-safe notification of sheet collaborators
//! - **Geometry**: Plain point/size/rect/inset value types used by layout
//!
//! # Signal/Slot Example
//!
//! ```
//! use lamina_core::Signal;
//!
//! let layout_changed = Signal::<f32>::new();
//!
//! let conn_id = layout_changed.connect(|height| {
//!     println!("content height is now {height}");
//! });
//!
//! layout_changed.emit(138.0);
//! layout_changed.disconnect(conn_id);
//! ```

mod geometry;
mod signal;

pub use geometry::{Edge, EdgeInsets, Point, Rect, Size};
pub use signal::{ConnectionId, Signal};
