//! Table presentation: the pure filter/sort/paginate pipeline, row actions
//! and the long-press state machine behind the row context menu.

mod pipeline;
mod press;

pub use pipeline::{Searchable, SortOrder, TableState};
pub use press::{Position, PressOutcome, PressTracker};

/// Per-row actions offered by the row buttons and the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
  View,
  Edit,
  Delete,
}

impl RowAction {
  pub const ALL: [RowAction; 3] = [RowAction::View, RowAction::Edit, RowAction::Delete];

  /// Shortcut key in the table views.
  pub fn key(self) -> char {
    match self {
      RowAction::View => 'v',
      RowAction::Edit => 'e',
      RowAction::Delete => 'd',
    }
  }
}
