//! Selection controller: owns the rendered paths and maps a dropdown choice
//! onto per-path styles and viewport framing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{NamedPath, PathCollection, PathStyle};

/// Selector value meaning "nothing chosen yet".
pub const NONE_VALUE: &str = "";
/// Selector value meaning "show every path".
pub const ALL_VALUE: &str = "ALL";

/// Rendering capabilities the controller needs from a map widget.
///
/// Handles are opaque to the controller; labels are the text bound to a
/// path when it was drawn.
pub trait MapSurface {
    type Handle: Copy + Eq + fmt::Debug;

    fn draw_path(&mut self, path: &NamedPath, style: &PathStyle) -> Self::Handle;
    fn set_style(&mut self, handle: Self::Handle, style: &PathStyle);
    fn fit_viewport_to(&mut self, handle: Self::Handle);
    fn label(&self, handle: Self::Handle) -> Option<String>;
    fn rendered(&self) -> Vec<Self::Handle>;
}

/// A dropdown-like control that lists selectable values.
pub trait SelectorControl {
    fn add_entry(&mut self, value: &str, label: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorEntry {
    pub value: String,
    pub label: String,
}

impl SelectorControl for Vec<SelectorEntry> {
    fn add_entry(&mut self, value: &str, label: &str) {
        self.push(SelectorEntry {
            value: value.to_string(),
            label: label.to_string(),
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    None,
    All,
    Named(String),
}

/// Order of path entries in the selector, after the two fixed entries.
///
/// Sorting compares names byte-wise and is stable, so duplicate names keep
/// their collection order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrder {
    Collection,
    Ascending,
    /// Newest first for date-stamped flight logs.
    #[default]
    Descending,
}

impl EntryOrder {
    pub fn arrange<'a>(self, collection: &'a PathCollection) -> Vec<&'a str> {
        let mut names: Vec<&str> = collection.iter().map(NamedPath::name).collect();
        match self {
            EntryOrder::Collection => {}
            EntryOrder::Ascending => names.sort(),
            EntryOrder::Descending => names.sort_by(|a, b| b.cmp(a)),
        }
        names
    }
}

pub struct SelectionController<S: MapSurface, C: SelectorControl> {
    collection: PathCollection,
    surface: S,
    selector: C,
    state: SelectionState,
}

impl<S: MapSurface, C: SelectorControl> SelectionController<S, C> {
    /// Draws every path at the default style, then fills the selector with
    /// the two fixed entries followed by one entry per path.
    pub fn new(collection: PathCollection, mut surface: S, mut selector: C, order: EntryOrder) -> Self {
        let style = PathStyle::default_stroke();
        for path in &collection {
            surface.draw_path(path, &style);
        }

        selector.add_entry(NONE_VALUE, "Select a flight");
        selector.add_entry(ALL_VALUE, "All flights");
        for name in order.arrange(&collection) {
            selector.add_entry(name, name);
        }

        tracing::debug!("rendered {} path(s)", collection.len());
        Self {
            collection,
            surface,
            selector,
            state: SelectionState::None,
        }
    }

    /// Re-derives every path's style from `choice`. Unknown choices reset the
    /// map exactly like `ALL`.
    pub fn apply_selection(&mut self, choice: &str) -> &SelectionState {
        let handles = self.surface.rendered();

        let next = match choice {
            NONE_VALUE => SelectionState::None,
            ALL_VALUE => SelectionState::All,
            name => {
                let matching: Vec<S::Handle> = handles
                    .iter()
                    .copied()
                    .filter(|&h| self.surface.label(h).as_deref() == Some(name))
                    .collect();
                if let Some(&first) = matching.first() {
                    self.highlight(&handles, &matching, first);
                    self.state = SelectionState::Named(name.to_string());
                    return &self.state;
                }
                tracing::warn!("selection {name:?} matches no rendered path, resetting");
                SelectionState::All
            }
        };

        self.reset(&handles);
        self.state = next;
        &self.state
    }

    pub fn current_state(&self) -> &SelectionState {
        &self.state
    }

    pub fn collection(&self) -> &PathCollection {
        &self.collection
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn selector(&self) -> &C {
        &self.selector
    }

    fn reset(&mut self, handles: &[S::Handle]) {
        let style = PathStyle::default_stroke();
        for &handle in handles {
            self.surface.set_style(handle, &style);
        }
    }

    fn highlight(&mut self, handles: &[S::Handle], matching: &[S::Handle], focus: S::Handle) {
        let highlight = PathStyle::highlight();
        let hidden = PathStyle::hidden();
        for &handle in handles {
            let style = if matching.contains(&handle) {
                &highlight
            } else {
                &hidden
            };
            self.surface.set_style(handle, style);
        }
        self.surface.fit_viewport_to(focus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, DEFAULT_COLOR, HIGHLIGHT_COLOR};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Draw(usize, String),
        Style(usize, PathStyle),
        Fit(usize),
    }

    #[derive(Default)]
    struct RecordingSurface {
        labels: Vec<String>,
        styles: Vec<PathStyle>,
        calls: Vec<Call>,
    }

    impl RecordingSurface {
        fn fits(&self) -> Vec<usize> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Fit(h) => Some(*h),
                    _ => None,
                })
                .collect()
        }
    }

    impl MapSurface for RecordingSurface {
        type Handle = usize;

        fn draw_path(&mut self, path: &NamedPath, style: &PathStyle) -> usize {
            let handle = self.labels.len();
            self.labels.push(path.name().to_string());
            self.styles.push(style.clone());
            self.calls.push(Call::Draw(handle, path.name().to_string()));
            handle
        }

        fn set_style(&mut self, handle: usize, style: &PathStyle) {
            self.styles[handle] = style.clone();
            self.calls.push(Call::Style(handle, style.clone()));
        }

        fn fit_viewport_to(&mut self, handle: usize) {
            self.calls.push(Call::Fit(handle));
        }

        fn label(&self, handle: usize) -> Option<String> {
            self.labels.get(handle).cloned()
        }

        fn rendered(&self) -> Vec<usize> {
            (0..self.labels.len()).collect()
        }
    }

    fn collection(names: &[&str]) -> PathCollection {
        names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                NamedPath::new(*name, vec![Coordinate::new(50.0 + i as f64, 19.0)])
            })
            .collect()
    }

    fn controller(
        names: &[&str],
        order: EntryOrder,
    ) -> SelectionController<RecordingSurface, Vec<SelectorEntry>> {
        SelectionController::new(
            collection(names),
            RecordingSurface::default(),
            Vec::new(),
            order,
        )
    }

    fn values(c: &SelectionController<RecordingSurface, Vec<SelectorEntry>>) -> Vec<&str> {
        c.selector().iter().map(|e| e.value.as_str()).collect()
    }

    #[test]
    fn initial_render_draws_every_path_at_default_style() {
        let c = controller(&["a", "b"], EntryOrder::Collection);
        assert_eq!(c.current_state(), &SelectionState::None);
        assert_eq!(
            c.surface().calls,
            vec![Call::Draw(0, "a".into()), Call::Draw(1, "b".into())]
        );
        assert!(c.surface().styles.iter().all(|s| *s == PathStyle::default_stroke()));
    }

    #[test]
    fn selector_starts_with_sentinels() {
        let c = controller(&["a"], EntryOrder::Descending);
        assert_eq!(values(&c), ["", "ALL", "a"]);
        assert_eq!(c.selector()[0].label, "Select a flight");
        assert_eq!(c.selector()[1].label, "All flights");
    }

    #[test]
    fn entry_order_policies() {
        let names = ["2024-03", "2024-01", "2024-02"];
        assert_eq!(
            values(&controller(&names, EntryOrder::Collection))[2..],
            ["2024-03", "2024-01", "2024-02"]
        );
        assert_eq!(
            values(&controller(&names, EntryOrder::Ascending))[2..],
            ["2024-01", "2024-02", "2024-03"]
        );
        assert_eq!(
            values(&controller(&names, EntryOrder::Descending))[2..],
            ["2024-03", "2024-02", "2024-01"]
        );
    }

    #[test]
    fn named_selection_highlights_hides_and_fits_once() {
        let mut c = controller(&["a", "b", "c"], EntryOrder::Collection);
        let state = c.apply_selection("b").clone();

        assert_eq!(state, SelectionState::Named("b".into()));
        let styles = &c.surface().styles;
        assert_eq!(styles[1].color, HIGHLIGHT_COLOR);
        assert_eq!(styles[1].opacity, 1.0);
        assert_eq!(styles[0].opacity, 0.0);
        assert_eq!(styles[2].opacity, 0.0);
        assert_eq!(c.surface().fits(), [1]);
    }

    #[test]
    fn all_resets_every_path_without_fitting() {
        let mut c = controller(&["a", "b"], EntryOrder::Collection);
        c.apply_selection("a");
        let fits_before = c.surface().fits().len();

        assert_eq!(c.apply_selection("ALL"), &SelectionState::All);
        assert!(c.surface().styles.iter().all(|s| *s == PathStyle::default_stroke()));
        assert_eq!(c.surface().fits().len(), fits_before);
    }

    #[test]
    fn empty_choice_returns_to_none() {
        let mut c = controller(&["a"], EntryOrder::Collection);
        c.apply_selection("a");
        assert_eq!(c.apply_selection(""), &SelectionState::None);
        assert_eq!(c.surface().styles[0].color, DEFAULT_COLOR);
        assert_eq!(c.surface().styles[0].opacity, 1.0);
    }

    #[test]
    fn unknown_choice_behaves_like_all() {
        let mut via_all = controller(&["a", "b"], EntryOrder::Collection);
        let mut via_stale = controller(&["a", "b"], EntryOrder::Collection);
        via_all.apply_selection("a");
        via_stale.apply_selection("a");

        via_all.apply_selection("ALL");
        via_stale.apply_selection("nonexistent");

        assert_eq!(via_stale.current_state(), &SelectionState::All);
        assert_eq!(via_all.surface().styles, via_stale.surface().styles);
        assert_eq!(via_all.surface().calls, via_stale.surface().calls);
    }

    #[test]
    fn label_match_is_case_sensitive() {
        let mut c = controller(&["Flight"], EntryOrder::Collection);
        assert_eq!(c.apply_selection("flight"), &SelectionState::All);
        assert!(c.surface().fits().is_empty());
    }

    #[test]
    fn duplicate_names_are_highlighted_together() {
        let mut c = controller(&["dup", "other", "dup"], EntryOrder::Collection);
        c.apply_selection("dup");
        let styles = &c.surface().styles;
        assert_eq!(styles[0].color, HIGHLIGHT_COLOR);
        assert_eq!(styles[2].color, HIGHLIGHT_COLOR);
        assert_eq!(styles[1].opacity, 0.0);
        assert_eq!(c.surface().fits(), [0]);
    }

    #[test]
    fn switching_selection_rederives_all_styles() {
        let mut c = controller(&["a", "b"], EntryOrder::Collection);
        c.apply_selection("a");
        c.apply_selection("b");
        let styles = &c.surface().styles;
        assert_eq!(styles[0].opacity, 0.0);
        assert_eq!(styles[1].color, HIGHLIGHT_COLOR);
        assert_eq!(c.surface().fits(), [0, 1]);
    }

    #[test]
    fn empty_collection_still_offers_sentinels() {
        let mut c = controller(&[], EntryOrder::Descending);
        assert_eq!(values(&c), ["", "ALL"]);
        assert_eq!(c.apply_selection("ALL"), &SelectionState::All);
    }
}
