//! Row model for action sheets.
//!
//! A sheet is composed of [`Row`]s. Each row is either an *item* (the upper,
//! list-like section) or a *button* (the lower, action section); which one is
//! decided once, at construction, by the row's [`RowKind`]. Rows are never
//! re-classified after that.
//!
//! There is no row hierarchy to subclass: a row kind is a tagged variant
//! with an associated style slot in the sheet's
//! [`Appearance`](crate::Appearance), selected at construction.
//!
//! # Example
//!
//! ```
//! use lamina::{Row, TapBehavior};
//!
//! let rows = vec![
//!     Row::heading("Volume"),
//!     Row::item("Muted").with_tap_behavior(TapBehavior::Stay),
//!     Row::item("Full volume"),
//!     Row::ok_button("OK"),
//!     Row::cancel_button("Cancel"),
//! ];
//! assert!(rows[3].is_button());
//! assert!(!rows[1].is_button());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::appearance::RowAppearance;

/// Opaque identity of a row, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(u64);

impl RowId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a tap on a row does once the selection has been dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapBehavior {
    /// Dismiss the sheet first, then invoke the selection callback from the
    /// dismissal-completion continuation.
    #[default]
    Dismiss,

    /// Invoke the selection callback immediately and keep the sheet open;
    /// the tap triggers a reload instead of a dismissal so toggled row state
    /// becomes visible.
    Stay,
}

/// The flavor of an action button.
///
/// Button kinds carry no behavior of their own; they select a style slot in
/// the sheet's appearance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Confirms the sheet's effect.
    Ok,
    /// Closes the sheet without applying anything.
    Cancel,
    /// An OK button for a destructive effect, styled as such.
    Destructive,
}

/// The kind of a row, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A selectable row in the items section.
    Item,
    /// A non-interactive heading row in the items section.
    Heading,
    /// An action button in the buttons section.
    Button(ButtonKind),
}

impl RowKind {
    /// Whether rows of this kind belong to the buttons section.
    pub fn is_button(&self) -> bool {
        matches!(self, RowKind::Button(_))
    }
}

/// A single selectable entity in an action sheet.
#[derive(Debug, Clone)]
pub struct Row {
    id: RowId,
    kind: RowKind,
    title: String,
    subtitle: Option<String>,
    enabled: bool,
    tap_behavior: TapBehavior,
    appearance: Option<RowAppearance>,
}

impl Row {
    fn new(kind: RowKind, title: impl Into<String>) -> Self {
        Self {
            id: RowId::next(),
            kind,
            title: title.into(),
            subtitle: None,
            enabled: true,
            tap_behavior: TapBehavior::Dismiss,
            appearance: None,
        }
    }

    /// Create a selectable item row.
    pub fn item(title: impl Into<String>) -> Self {
        Self::new(RowKind::Item, title)
    }

    /// Create a non-interactive heading row.
    ///
    /// Headings keep the sheet open when tapped and start out disabled.
    pub fn heading(title: impl Into<String>) -> Self {
        let mut row = Self::new(RowKind::Heading, title);
        row.enabled = false;
        row.tap_behavior = TapBehavior::Stay;
        row
    }

    /// Create an OK button row.
    pub fn ok_button(title: impl Into<String>) -> Self {
        Self::new(RowKind::Button(ButtonKind::Ok), title)
    }

    /// Create a cancel button row.
    pub fn cancel_button(title: impl Into<String>) -> Self {
        Self::new(RowKind::Button(ButtonKind::Cancel), title)
    }

    /// Create a destructive button row.
    ///
    /// Behaves like an OK button with a "red alert" style slot.
    pub fn destructive_button(title: impl Into<String>) -> Self {
        Self::new(RowKind::Button(ButtonKind::Destructive), title)
    }

    // =========================================================================
    // Builder Pattern Methods
    // =========================================================================

    /// Set the subtitle using builder pattern.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the tap behavior using builder pattern.
    pub fn with_tap_behavior(mut self, behavior: TapBehavior) -> Self {
        self.tap_behavior = behavior;
        self
    }

    /// Set a per-row appearance override using builder pattern.
    ///
    /// Overrides the sheet-level appearance slot for this row only.
    pub fn with_appearance(mut self, appearance: RowAppearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    /// Mark the row disabled using builder pattern.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The row's opaque identity.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// The row's kind.
    pub fn kind(&self) -> RowKind {
        self.kind
    }

    /// Whether this row belongs to the buttons section.
    pub fn is_button(&self) -> bool {
        self.kind.is_button()
    }

    /// The row's title text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The row's subtitle text, if any.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Whether the row is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether the row is enabled.
    ///
    /// Takes visible effect on the next reload/refresh.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The row's tap behavior.
    pub fn tap_behavior(&self) -> TapBehavior {
        self.tap_behavior
    }

    /// The per-row appearance override, if any.
    pub fn appearance_override(&self) -> Option<&RowAppearance> {
        self.appearance.as_ref()
    }

    /// Stable reuse key for the renderer's cell-reuse machinery.
    pub fn reuse_key(&self) -> &'static str {
        match self.kind {
            RowKind::Item => "lamina.item",
            RowKind::Heading => "lamina.heading",
            RowKind::Button(ButtonKind::Ok) => "lamina.button.ok",
            RowKind::Button(ButtonKind::Cancel) => "lamina.button.cancel",
            RowKind::Button(ButtonKind::Destructive) => "lamina.button.destructive",
        }
    }
}
