// ============================================================================
// keys.rs — ArcadeKit
// Logical game keys and the fixed raw-code -> logical-key mapping.
// ============================================================================

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

// ======================== Logical Keys ========================

/// Abstract game input, decoupled from whatever raw key codes the host uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalKey {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
}

impl LogicalKey {
    pub const COUNT: usize = 6;

    /// Every key in ordinal order.
    pub const ALL: [LogicalKey; LogicalKey::COUNT] = [
        LogicalKey::Up,
        LogicalKey::Down,
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Confirm,
        LogicalKey::Cancel,
    ];

    /// Stable ordinal used to index the per-key tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicalKey::Up => "Up",
            LogicalKey::Down => "Down",
            LogicalKey::Left => "Left",
            LogicalKey::Right => "Right",
            LogicalKey::Confirm => "Confirm",
            LogicalKey::Cancel => "Cancel",
        }
    }
}

// ======================== Key Map ========================

/// Fixed mapping from host key codes to logical keys. Codes that are not in the
/// map are ignored by the tracker.
#[derive(Clone, Debug)]
pub struct KeyMap<C> {
    bindings: HashMap<C, LogicalKey>,
}

impl<C: Eq + Hash> KeyMap<C> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `code` to `key`. A later binding for the same code replaces the
    /// earlier one.
    pub fn with(mut self, code: C, key: LogicalKey) -> Self {
        self.bindings.insert(code, key);
        self
    }

    pub fn get(&self, code: &C) -> Option<LogicalKey> {
        self.bindings.get(code).copied()
    }

    /// Raw codes bound to `key`, in no particular order.
    pub fn codes_for(&self, key: LogicalKey) -> impl Iterator<Item = &C> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, bound)| **bound == key)
            .map(|(code, _)| code)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<C: Eq + Hash> Default for KeyMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Eq + Hash> FromIterator<(C, LogicalKey)> for KeyMap<C> {
    fn from_iter<I: IntoIterator<Item = (C, LogicalKey)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
