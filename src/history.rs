//! Action log with a replay cursor.
//!
//! The log is kept alongside a [`GameState`](crate::game::GameState): every
//! applied action is recorded, [`ActionLog::previous`] hands back the action to
//! undo, and [`ActionLog::next`] the action to redo. Recording after stepping
//! back discards the redo tail.

use crate::action::Action;
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionLog {
    actions: Vec<Action>,
    /// Number of actions currently applied (the cursor sits just after them).
    applied: usize,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_previous(&self) -> bool {
        self.applied > 0
    }

    pub fn has_next(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// Append `action` after the cursor, dropping anything that was undone.
    pub fn record(&mut self, action: Action) {
        self.actions.truncate(self.applied);
        self.actions.push(action);
        self.applied += 1;
    }

    /// Step back, returning the action to undo.
    pub fn previous(&mut self) -> Option<Action> {
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        Some(self.actions[self.applied])
    }

    /// Step forward, returning the action to redo.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Action> {
        let action = *self.actions.get(self.applied)?;
        self.applied += 1;
        Some(action)
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.applied = 0;
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Copy of the full record, including any undone tail.
    pub fn export_record(&self) -> Vec<Action> {
        self.actions.clone()
    }

    /// Replace the log with `record`, cursor at the start (nothing applied).
    pub fn import_record(&mut self, record: Vec<Action>) {
        self.actions = record;
        self.applied = 0;
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.actions)?)
    }

    /// Parse a JSON record; any malformed entry rejects the whole record.
    pub fn from_json(json: &str) -> Result<Self> {
        let actions: Vec<Action> = serde_json::from_str(json).map_err(|e| Error::InvalidRecord {
            reason: e.to_string(),
        })?;
        let mut log = Self::new();
        log.import_record(actions);
        Ok(log)
    }
}
