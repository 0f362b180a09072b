//! Appearance model for action sheets.
//!
//! The core never draws anything; appearance values exist so layout can read
//! row heights and so the renderer can map each row onto fonts and colors.
//! Everything here is serializable so hosts can load a theme from
//! configuration.
//!
//! Resolution is a single path: a row-level override if one is present,
//! otherwise the sheet-level slot for the row's kind. There is deliberately
//! no second, legacy resolution route.

use serde::{Deserialize, Serialize};

use crate::row::{ButtonKind, Row, RowKind};

/// A styling hint the renderer may map to fonts/colors.
///
/// The core itself never interprets these beyond carrying them around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleHint {
    /// Regular row styling.
    #[default]
    Normal,
    /// Subdued, non-interactive heading styling.
    Heading,
    /// Cancel-button styling (typically emphasized).
    Cancel,
    /// Destructive-action styling (typically a red alert tone).
    Destructive,
}

/// Appearance of a single row: its display height plus a style hint.
///
/// Layout reads only `height`; the rest is passed through unmodified to the
/// row-rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowAppearance {
    /// The row's display height.
    pub height: f32,
    /// Styling hint for the renderer.
    #[serde(default)]
    pub style: StyleHint,
}

impl RowAppearance {
    /// Create a row appearance with the given height and default styling.
    pub fn with_height(height: f32) -> Self {
        Self {
            height,
            style: StyleHint::default(),
        }
    }

    /// Set the style hint using builder pattern.
    pub fn with_style(mut self, style: StyleHint) -> Self {
        self.style = style;
        self
    }
}

/// Sheet-level appearance defaults, one slot per row kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Appearance {
    /// Appearance for plain item rows.
    pub item: RowAppearance,
    /// Appearance for heading rows.
    pub heading: RowAppearance,
    /// Appearance for OK buttons.
    pub ok_button: RowAppearance,
    /// Appearance for cancel buttons.
    pub cancel_button: RowAppearance,
    /// Appearance for destructive buttons.
    pub destructive_button: RowAppearance,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            item: RowAppearance::with_height(50.0),
            heading: RowAppearance::with_height(25.0).with_style(StyleHint::Heading),
            ok_button: RowAppearance::with_height(50.0),
            cancel_button: RowAppearance::with_height(50.0).with_style(StyleHint::Cancel),
            destructive_button: RowAppearance::with_height(50.0)
                .with_style(StyleHint::Destructive),
        }
    }
}

impl Appearance {
    /// Resolve the effective appearance for a row.
    ///
    /// The row's own override wins; otherwise the slot for its kind applies.
    pub fn resolve(&self, row: &Row) -> RowAppearance {
        if let Some(custom) = row.appearance_override() {
            return *custom;
        }
        match row.kind() {
            RowKind::Item => self.item,
            RowKind::Heading => self.heading,
            RowKind::Button(ButtonKind::Ok) => self.ok_button,
            RowKind::Button(ButtonKind::Cancel) => self.cancel_button,
            RowKind::Button(ButtonKind::Destructive) => self.destructive_button,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_kind_slot() {
        let appearance = Appearance::default();

        assert_eq!(appearance.resolve(&Row::item("a")).height, 50.0);
        assert_eq!(appearance.resolve(&Row::heading("a")).height, 25.0);
        assert_eq!(
            appearance.resolve(&Row::cancel_button("a")).style,
            StyleHint::Cancel
        );
        assert_eq!(
            appearance.resolve(&Row::destructive_button("a")).style,
            StyleHint::Destructive
        );
    }

    #[test]
    fn test_row_override_beats_sheet_default() {
        let appearance = Appearance::default();
        let row = Row::item("tall").with_appearance(RowAppearance::with_height(72.0));

        assert_eq!(appearance.resolve(&row).height, 72.0);
    }

    #[test]
    fn test_appearance_round_trips_through_config() {
        let mut appearance = Appearance::default();
        appearance.item.height = 44.0;

        let json = serde_json::to_string(&appearance).unwrap();
        let loaded: Appearance = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, appearance);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let loaded: Appearance =
            serde_json::from_str(r#"{"item": {"height": 60.0}}"#).unwrap();
        assert_eq!(loaded.item.height, 60.0);
        assert_eq!(loaded.cancel_button, Appearance::default().cancel_button);
    }
}
