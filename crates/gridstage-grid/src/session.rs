//! The single in-place cell edit session.
//!
//! At most one cell is ever being typed into; the session is a sum type so
//! two simultaneous edits are unrepresentable. Opening a new cell while one
//! is active saves (never cancels) the previous draft. Saving coerces the
//! draft against the cell's original value; cancelling discards it without
//! touching the overlay.

use std::time::{Duration, Instant};

use gridstage_core::Value;

use crate::coerce::coerce_draft;

/// Debounce window separating single-click-to-edit from double-click
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(250);

/// A saved draft, coerced and ready for the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct SavedEdit {
    pub original_index: usize,
    pub column: String,
    pub value: Value,
}

/// Edit session state machine. Terminal state is always `Idle`; the session
/// is a reusable transient, it never "completes".
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        original_index: usize,
        column: String,
        /// Value the cell held when editing began; drives draft coercion
        original: Value,
        draft: String,
    },
}

impl EditSession {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing { .. })
    }

    /// The cell currently being edited, if any
    pub fn editing_cell(&self) -> Option<(usize, &str)> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing {
                original_index,
                column,
                ..
            } => Some((*original_index, column)),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { draft, .. } => Some(draft),
        }
    }

    /// Begin editing a cell. If another cell is active its draft is saved
    /// first and returned for the caller to stage; re-clicking the active
    /// cell is a no-op. The draft starts as the cell's display text, empty
    /// for NULL.
    pub fn begin(
        &mut self,
        original_index: usize,
        column: impl Into<String>,
        current: Value,
    ) -> Option<SavedEdit> {
        let column = column.into();
        if self.editing_cell() == Some((original_index, column.as_str())) {
            return None;
        }
        let prior = self.save();
        let draft = if current.is_null() {
            String::new()
        } else {
            current.to_string()
        };
        *self = EditSession::Editing {
            original_index,
            column,
            original: current,
            draft,
        };
        prior
    }

    /// Replace the draft text while editing. Ignored when idle.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let EditSession::Editing { draft, .. } = self {
            *draft = text.into();
        }
    }

    /// Save the active draft and return to idle. Returns the coerced edit
    /// for the caller to stage, or `None` when already idle. Triggered by
    /// the confirm key, focus loss, results scrolling, or pagination.
    pub fn save(&mut self) -> Option<SavedEdit> {
        match std::mem::take(self) {
            EditSession::Idle => None,
            EditSession::Editing {
                original_index,
                column,
                original,
                draft,
            } => Some(SavedEdit {
                original_index,
                column,
                value: coerce_draft(&original, &draft),
            }),
        }
    }

    /// Discard the active draft and return to idle without staging anything.
    pub fn cancel(&mut self) {
        *self = EditSession::Idle;
    }
}

/// A cell the user clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub original_index: usize,
    pub column: String,
}

/// Outcome of registering a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDecision {
    /// Wait out the debounce window; poll later
    Pending,
    /// Second click inside the window - open the editor now
    Edit,
}

/// Disambiguates single-click-to-edit from double-click-to-edit.
///
/// Both gestures open the editor; the debounce exists only so a second
/// click can take the double-click path instead of confirming the first.
/// Pure over caller-supplied instants so gesture timing is testable.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    pending: Option<(CellRef, Instant)>,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::with_window(DOUBLE_CLICK_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Register a click on a cell.
    pub fn click(&mut self, cell: CellRef, at: Instant) -> ClickDecision {
        if let Some((pending_cell, clicked_at)) = self.pending.take() {
            if pending_cell == cell && at.duration_since(clicked_at) <= self.window {
                return ClickDecision::Edit;
            }
        }
        self.pending = Some((cell, at));
        ClickDecision::Pending
    }

    /// Confirm a pending single click whose debounce window has elapsed.
    /// Returns the cell to open, at most once per click.
    pub fn poll(&mut self, now: Instant) -> Option<CellRef> {
        match &self.pending {
            Some((_, clicked_at)) if now.duration_since(*clicked_at) > self.window => {
                self.pending.take().map(|(cell, _)| cell)
            }
            _ => None,
        }
    }

    /// Drop any pending click (e.g. the pointer left the grid)
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
