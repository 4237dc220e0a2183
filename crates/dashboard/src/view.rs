//! The submissions table: rows, local filter and selection.
//!
//! Selection is tracked per row. Everything derived from it (state, count,
//! the ids a bulk action acts on) only looks at rows visible under the
//! current filter. Rows hidden by the filter keep their flag and count
//! again once they are visible.

use std::collections::HashSet;

use agency_core::search::{matches_filter, ListFilter};
use agency_core::submission::Submission;
use agency_core::types::DbId;

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub submission: Submission,
    pub selected: bool,
}

impl Row {
    fn new(submission: Submission) -> Self {
        Self {
            submission,
            selected: false,
        }
    }

    pub fn id(&self) -> DbId {
        self.submission.id
    }
}

/// Selection over the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unselected,
    PartiallySelected { count: usize },
    FullySelected { count: usize },
}

impl SelectionState {
    pub fn count(self) -> usize {
        match self {
            SelectionState::Unselected => 0,
            SelectionState::PartiallySelected { count }
            | SelectionState::FullySelected { count } => count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    rows: Vec<Row>,
    filter: ListFilter,
}

impl ListView {
    pub fn new(submissions: Vec<Submission>) -> Self {
        Self {
            rows: submissions.into_iter().map(Row::new).collect(),
            filter: ListFilter::default(),
        }
    }

    /// Every loaded row, visible or not.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: DbId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    /// Rows that pass the current filter, in load order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows
            .iter()
            .filter(|r| matches_filter(&r.submission, &self.filter))
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    pub fn selection_state(&self) -> SelectionState {
        let (visible, selected) = self
            .visible_rows()
            .fold((0, 0), |(v, s), r| (v + 1, s + usize::from(r.selected)));
        match selected {
            0 => SelectionState::Unselected,
            n if n == visible => SelectionState::FullySelected { count: n },
            n => SelectionState::PartiallySelected { count: n },
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selection_state().count()
    }

    /// Ids a bulk action applies to: selected and visible.
    pub fn selected_ids(&self) -> Vec<DbId> {
        self.visible_rows()
            .filter(|r| r.selected)
            .map(Row::id)
            .collect()
    }

    pub fn bulk_bar_visible(&self) -> bool {
        self.selection_state() != SelectionState::Unselected
    }

    /// "3 items selected", or `None` while nothing is selected.
    pub fn selection_label(&self) -> Option<String> {
        match self.selected_count() {
            0 => None,
            1 => Some("1 item selected".to_string()),
            n => Some(format!("{n} items selected")),
        }
    }

    /// Flip one visible row. Returns `false` if the row is not visible.
    pub fn toggle_row(&mut self, id: DbId) -> bool {
        let filter = &self.filter;
        match self
            .rows
            .iter_mut()
            .find(|r| r.id() == id && matches_filter(&r.submission, filter))
        {
            Some(row) => {
                row.selected = !row.selected;
                true
            }
            None => false,
        }
    }

    /// Header checkbox. Clears the visible rows when all of them are
    /// selected, otherwise selects every visible row.
    pub fn toggle_all(&mut self) {
        let select = !matches!(self.selection_state(), SelectionState::FullySelected { .. });
        let filter = &self.filter;
        for row in self
            .rows
            .iter_mut()
            .filter(|r| matches_filter(&r.submission, filter))
        {
            row.selected = select;
        }
    }

    /// Clear every flag, hidden rows included.
    pub fn cancel(&mut self) {
        for row in &mut self.rows {
            row.selected = false;
        }
    }

    pub fn set_filter(&mut self, filter: ListFilter) {
        self.filter = filter;
    }

    /// Replace the loaded rows. Rows that survive keep their flag.
    pub fn replace_rows(&mut self, submissions: Vec<Submission>) {
        let selected: HashSet<DbId> = self
            .rows
            .iter()
            .filter(|r| r.selected)
            .map(Row::id)
            .collect();
        self.rows = submissions
            .into_iter()
            .map(|s| Row {
                selected: selected.contains(&s.id),
                submission: s,
            })
            .collect();
    }

    /// Drop rows by id. Returns how many were removed.
    pub fn remove_rows(&mut self, ids: &[DbId]) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| !ids.contains(&r.id()));
        before - self.rows.len()
    }

    /// Swap in a fresher copy of a loaded submission, keeping its flag.
    pub fn update_row(&mut self, submission: Submission) -> bool {
        match self.rows.iter_mut().find(|r| r.id() == submission.id) {
            Some(row) => {
                row.submission = submission;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use agency_core::submission::{Location, SubmissionStatus};
    use chrono::{TimeZone, Utc};

    use super::*;

    pub(crate) fn submission(id: DbId) -> Submission {
        Submission {
            id,
            name: format!("Client {id}"),
            email: format!("client{id}@example.com"),
            subject: "Landing page".into(),
            message: "Need a quote".into(),
            status: SubmissionStatus::New,
            ip_address: "127.0.0.1".into(),
            location: Location::local(),
            notes: String::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::minutes(id),
        }
    }

    pub(crate) fn view_of(n: i64) -> ListView {
        ListView::new((1..=n).map(submission).collect())
    }

    #[test]
    fn starts_unselected_with_hidden_bar() {
        let view = view_of(3);
        assert_eq!(view.selection_state(), SelectionState::Unselected);
        assert!(!view.bulk_bar_visible());
        assert_eq!(view.selection_label(), None);
    }

    #[test]
    fn select_all_then_deselect_one_is_partial() {
        let mut view = view_of(4);
        view.toggle_all();
        assert_eq!(view.selection_state(), SelectionState::FullySelected { count: 4 });

        view.toggle_row(2);
        assert_eq!(
            view.selection_state(),
            SelectionState::PartiallySelected { count: 3 }
        );
        assert_eq!(view.selection_label().as_deref(), Some("3 items selected"));

        view.toggle_row(2);
        assert_eq!(view.selection_state(), SelectionState::FullySelected { count: 4 });
    }

    #[test]
    fn toggle_all_twice_clears() {
        let mut view = view_of(3);
        view.toggle_all();
        view.toggle_all();
        assert_eq!(view.selection_state(), SelectionState::Unselected);
    }

    #[test]
    fn toggle_all_from_partial_selects_everything() {
        let mut view = view_of(3);
        view.toggle_row(1);
        view.toggle_all();
        assert_eq!(view.selection_state(), SelectionState::FullySelected { count: 3 });
    }

    #[test]
    fn selecting_every_row_individually_is_full() {
        let mut view = view_of(2);
        view.toggle_row(1);
        assert_eq!(view.selection_label().as_deref(), Some("1 item selected"));
        view.toggle_row(2);
        assert_eq!(view.selection_state(), SelectionState::FullySelected { count: 2 });
    }

    #[test]
    fn cancel_clears_from_any_state() {
        let mut view = view_of(5);
        view.toggle_row(1);
        view.toggle_row(4);
        view.cancel();
        assert_eq!(view.selection_state(), SelectionState::Unselected);
        assert_eq!(view.selected_count(), 0);
        assert!(!view.bulk_bar_visible());
        assert!(view.rows().iter().all(|r| !r.selected));
    }

    #[test]
    fn hidden_rows_keep_flags_but_leave_the_count() {
        let mut view = view_of(3);
        view.toggle_row(1);
        view.toggle_row(3);

        view.set_filter(ListFilter {
            query: Some("Client 3".into()),
            status: None,
        });
        assert_eq!(view.visible_count(), 1);
        assert_eq!(view.selection_state(), SelectionState::FullySelected { count: 1 });
        assert_eq!(view.selected_ids(), vec![3]);

        // Select-all acts on the visible set only.
        view.toggle_all();
        assert_eq!(view.selection_state(), SelectionState::Unselected);
        assert!(view.row(1).unwrap().selected);

        view.set_filter(ListFilter::default());
        assert_eq!(view.selected_ids(), vec![1]);
    }

    #[test]
    fn hidden_rows_cannot_be_toggled() {
        let mut view = view_of(2);
        view.set_filter(ListFilter {
            query: None,
            status: Some(SubmissionStatus::Closed),
        });
        assert!(!view.toggle_row(1));
        assert_eq!(view.selection_state(), SelectionState::Unselected);
    }

    #[test]
    fn replace_rows_keeps_surviving_flags() {
        let mut view = view_of(3);
        view.toggle_row(1);
        view.toggle_row(2);

        view.replace_rows(vec![submission(2), submission(3), submission(4)]);
        assert_eq!(view.selected_ids(), vec![2]);
    }

    #[test]
    fn remove_rows_reports_removed() {
        let mut view = view_of(3);
        assert_eq!(view.remove_rows(&[1, 3, 99]), 2);
        assert_eq!(view.rows().len(), 1);
    }
}
