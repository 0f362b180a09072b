//! Lamina - a renderer-agnostic action-sheet component.
//!
//! An action sheet composes a header, a list of selectable items, and a list
//! of action buttons, presented from a source view or bar-button anchor and
//! dismissed automatically or manually, with per-row selection callbacks.
//! This crate implements the composition, layout, and presentation state
//! machinery; drawing is left to the host via the
//! [`RowCellFactory`] contract and the presenters' geometry accessors.
//!
//! # Example
//!
//! ```
//! use lamina::{
//!     default_presenter, ActionSheet, Anchor, DeviceClass, PresentationContext, Rect, Row,
//! };
//!
//! let mut sheet = ActionSheet::new(
//!     vec![
//!         Row::heading("Share"),
//!         Row::item("Copy link"),
//!         Row::item("Save image"),
//!         Row::cancel_button("Cancel"),
//!     ],
//!     default_presenter(DeviceClass::Phone),
//! );
//!
//! sheet.row_selected.connect(|row| {
//!     println!("selected {}", row.title());
//! });
//!
//! let context = PresentationContext::new(Rect::new(0.0, 0.0, 320.0, 640.0));
//! sheet.present(context, Anchor::View(Rect::ZERO), || {});
//! ```

mod appearance;
mod dispatch;
mod layout;
mod presenter;
mod render;
mod row;
mod sheet;

pub use appearance::{Appearance, RowAppearance, StyleHint};
pub use dispatch::DispatchState;
pub use layout::{section_height, SheetLayout};
pub use presenter::{
    default_presenter, ease, Anchor, ArrowDirection, Completion, DeviceClass, Easing,
    PopoverPresenter, PresentationContext, SheetPresenter, StandardPresenter, Transition,
    TransitionState,
};
pub use render::{RowCellFactory, SectionCells};
pub use row::{ButtonKind, Row, RowId, RowKind, TapBehavior};
pub use sheet::ActionSheet;

pub use lamina_core::{ConnectionId, Edge, EdgeInsets, Point, Rect, Signal, Size};
