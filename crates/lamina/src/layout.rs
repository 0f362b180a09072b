//! Layout computation for action sheets.
//!
//! [`SheetLayout`] is the shared content-geometry resource: a value snapshot
//! of header, items-section, and buttons-section heights. It is recomputed
//! wholesale by [`ActionSheet::refresh`](crate::ActionSheet::refresh) — there
//! is no incremental layout path, so section heights can never drift from
//! the rows they are derived from.

use lamina_core::Size;

use crate::appearance::Appearance;
use crate::row::Row;

/// Total display height of a run of rows under the given appearance.
///
/// Always an exact sum of resolved per-row heights.
pub fn section_height(rows: &[Row], appearance: &Appearance) -> f32 {
    rows.iter().map(|row| appearance.resolve(row).height).sum()
}

/// A computed layout snapshot for a sheet.
///
/// Produced by the refresh engine and consumed by presenters and renderers.
/// All fields describe content geometry only; margins and on-screen position
/// are the presenter's business.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SheetLayout {
    /// Height of the header section (zero when absent).
    pub header_height: f32,
    /// Whether the header section is shown at all.
    pub header_visible: bool,
    /// Total height of the items section.
    pub items_height: f32,
    /// Total height of the buttons section.
    pub buttons_height: f32,
    /// Whether the buttons section is shown at all.
    pub buttons_visible: bool,
    /// Spacing between adjacent visible sections.
    pub section_spacing: f32,
}

impl SheetLayout {
    /// Compute a fresh layout from current sheet content.
    pub fn compute(
        items: &[Row],
        buttons: &[Row],
        header_height: Option<f32>,
        appearance: &Appearance,
        section_spacing: f32,
    ) -> Self {
        let buttons_height = section_height(buttons, appearance);
        Self {
            header_height: header_height.unwrap_or(0.0),
            header_visible: header_height.is_some(),
            items_height: section_height(items, appearance),
            buttons_height,
            buttons_visible: !buttons.is_empty(),
            section_spacing,
        }
    }

    /// Number of visible sections (header, items, buttons).
    ///
    /// The items section is always counted: an empty items list renders as a
    /// zero-height list view, not a removed one.
    fn visible_sections(&self) -> u32 {
        1 + u32::from(self.header_visible) + u32::from(self.buttons_visible)
    }

    /// Total content height: visible sections plus the spacing between them.
    ///
    /// Hidden sections contribute nothing, including their spacing.
    pub fn content_height(&self) -> f32 {
        let mut height = self.items_height;
        if self.header_visible {
            height += self.header_height;
        }
        if self.buttons_visible {
            height += self.buttons_height;
        }
        height + self.section_spacing * (self.visible_sections() - 1) as f32
    }

    /// Content size at the given width.
    pub fn content_size(&self, width: f32) -> Size {
        Size::new(width, self.content_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::RowAppearance;

    fn item(height: f32) -> Row {
        Row::item("item").with_appearance(RowAppearance::with_height(height))
    }

    fn button(height: f32) -> Row {
        Row::ok_button("ok").with_appearance(RowAppearance::with_height(height))
    }

    #[test]
    fn test_section_height_is_sum_of_row_heights() {
        let appearance = Appearance::default();
        let rows = vec![item(44.0), item(44.0), item(30.0)];
        assert_eq!(section_height(&rows, &appearance), 118.0);
        assert_eq!(section_height(&[], &appearance), 0.0);
    }

    #[test]
    fn test_two_items_one_button_no_header() {
        let items = vec![item(44.0), item(44.0)];
        let buttons = vec![button(50.0)];
        let layout =
            SheetLayout::compute(&items, &buttons, None, &Appearance::default(), 15.0);

        assert_eq!(layout.items_height, 88.0);
        assert_eq!(layout.buttons_height, 50.0);
        assert!(layout.buttons_visible);
        assert!(!layout.header_visible);
        assert_eq!(layout.header_height, 0.0);
        // items + buttons + one inter-section gap
        assert_eq!(layout.content_height(), 88.0 + 50.0 + 15.0);
    }

    #[test]
    fn test_no_buttons_hides_section_and_contributes_nothing() {
        let items = vec![item(44.0)];
        let layout = SheetLayout::compute(&items, &[], None, &Appearance::default(), 15.0);

        assert!(!layout.buttons_visible);
        assert_eq!(layout.buttons_height, 0.0);
        assert_eq!(layout.content_height(), 44.0);
    }

    #[test]
    fn test_header_adds_height_and_gap() {
        let items = vec![item(40.0)];
        let layout =
            SheetLayout::compute(&items, &[], Some(60.0), &Appearance::default(), 10.0);

        assert!(layout.header_visible);
        assert_eq!(layout.content_height(), 60.0 + 40.0 + 10.0);
    }

    #[test]
    fn test_heights_come_from_appearance_slots() {
        let mut appearance = Appearance::default();
        appearance.item.height = 44.0;
        appearance.cancel_button.height = 56.0;

        let items = vec![Row::item("a"), Row::item("b")];
        let buttons = vec![Row::cancel_button("c")];
        let layout = SheetLayout::compute(&items, &buttons, None, &appearance, 15.0);

        assert_eq!(layout.items_height, 88.0);
        assert_eq!(layout.buttons_height, 56.0);
    }

    #[test]
    fn test_empty_sheet_has_zero_content() {
        let layout = SheetLayout::compute(&[], &[], None, &Appearance::default(), 15.0);
        assert_eq!(layout.content_height(), 0.0);
        assert_eq!(layout.content_size(300.0), Size::new(300.0, 0.0));
    }
}
