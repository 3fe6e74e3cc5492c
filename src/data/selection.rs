use std::collections::BTreeSet;

use super::model::LineSet;

// ---------------------------------------------------------------------------
// Row selection: which snapshots of an ensemble take part in the average
// ---------------------------------------------------------------------------

/// Set of selected row indices. An empty set selects nothing.
pub type RowSelection = BTreeSet<usize>;

/// Initialise a [`RowSelection`] with every row selected.
pub fn select_all(lines: &LineSet) -> RowSelection {
    (0..lines.row_count()).collect()
}

/// Restrict a line set to the selected rows, preserving file order.
///
/// Indices past the last row are ignored. Selecting nothing gives an empty
/// set, which the broadener rejects.
pub fn apply_selection(lines: &LineSet, selection: &RowSelection) -> LineSet {
    if selection.len() == lines.row_count() && selection.iter().all(|&i| i < lines.row_count()) {
        // everything selected
        return lines.clone();
    }
    let rows = lines
        .rows()
        .enumerate()
        .filter(|(i, _)| selection.contains(i))
        .map(|(_, row)| row.to_vec())
        .collect();
    LineSet::from_rows(rows, lines.source_unit())
}
