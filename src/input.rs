// ============================================================================
// input.rs — ArcadeKit
// Keyboard state tracking: held keys, one-frame press pulses, and suppression
// of key-repeat until release.
// ============================================================================

use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::keys::{KeyMap, LogicalKey};

// ======================== Tables ========================

/// The three per-key tables. They always sit behind the tracker's single lock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyTables {
    held: [bool; LogicalKey::COUNT],
    just_pressed: [bool; LogicalKey::COUNT],
    suppressed: [bool; LogicalKey::COUNT],
}

impl KeyTables {
    fn advance(&mut self) {
        for i in 0..LogicalKey::COUNT {
            if self.suppressed[i] && !self.held[i] {
                self.suppressed[i] = false;
            } else if self.just_pressed[i] {
                self.suppressed[i] = true;
                self.just_pressed[i] = false;
            }
            if !self.suppressed[i] && self.held[i] {
                self.just_pressed[i] = true;
            }
        }
    }

    fn frame(&self) -> KeyFrame {
        KeyFrame {
            held: self.held,
            just_pressed: self.just_pressed,
        }
    }
}

// ======================== Frame Snapshot ========================

/// Read-only view of one frame, taken atomically under the tracker lock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyFrame {
    held: [bool; LogicalKey::COUNT],
    just_pressed: [bool; LogicalKey::COUNT],
}

impl KeyFrame {
    pub fn is_pressed(&self, key: LogicalKey) -> bool {
        self.held[key.index()]
    }

    pub fn is_just_pressed(&self, key: LogicalKey) -> bool {
        self.just_pressed[key.index()]
    }

    pub fn pressed_keys(&self) -> impl Iterator<Item = LogicalKey> + '_ {
        LogicalKey::ALL.into_iter().filter(|k| self.is_pressed(*k))
    }

    pub fn just_pressed_keys(&self) -> impl Iterator<Item = LogicalKey> + '_ {
        LogicalKey::ALL.into_iter().filter(|k| self.is_just_pressed(*k))
    }
}

// ======================== Tracker ========================

/// Per-key held / just-pressed / suppressed tracking.
///
/// Raw key events may arrive from any thread through [`on_key_down`] and
/// [`on_key_up`]. The game loop calls [`advance_frame`] once per frame and then
/// queries. A single mutex guards all three tables, so an event is applied
/// either wholly before or wholly after a frame pass.
///
/// [`on_key_down`]: KeyStateTracker::on_key_down
/// [`on_key_up`]: KeyStateTracker::on_key_up
/// [`advance_frame`]: KeyStateTracker::advance_frame
pub struct KeyStateTracker<C> {
    map: KeyMap<C>,
    tables: Mutex<KeyTables>,
}

impl<C: Eq + Hash> KeyStateTracker<C> {
    pub fn new(map: KeyMap<C>) -> Self {
        Self {
            map,
            tables: Mutex::new(KeyTables::default()),
        }
    }

    pub fn key_map(&self) -> &KeyMap<C> {
        &self.map
    }

    /// Record a raw key-down. Returns the logical key it maps to, if any.
    pub fn on_key_down(&self, code: &C) -> Option<LogicalKey> {
        let Some(key) = self.map.get(code) else {
            log::trace!("Ignoring unmapped key-down");
            return None;
        };
        self.lock().held[key.index()] = true;
        Some(key)
    }

    /// Record a raw key-up. Returns the logical key it maps to, if any.
    pub fn on_key_up(&self, code: &C) -> Option<LogicalKey> {
        let Some(key) = self.map.get(code) else {
            log::trace!("Ignoring unmapped key-up");
            return None;
        };
        let mut tables = self.lock();
        tables.held[key.index()] = false;
        tables.suppressed[key.index()] = false;
        Some(key)
    }

    /// Resolve press pulses for the new frame and return its snapshot.
    ///
    /// Per key: a suppressed key that is no longer held is re-armed; otherwise
    /// a pending pulse is consumed and suppression armed. Then an unsuppressed
    /// held key starts a pulse.
    pub fn advance_frame(&self) -> KeyFrame {
        let mut tables = self.lock();
        tables.advance();
        tables.frame()
    }

    pub fn is_pressed(&self, key: LogicalKey) -> bool {
        self.lock().held[key.index()]
    }

    pub fn is_just_pressed(&self, key: LogicalKey) -> bool {
        self.lock().just_pressed[key.index()]
    }

    /// Snapshot of the current frame without advancing.
    pub fn frame(&self) -> KeyFrame {
        self.lock().frame()
    }

    /// Forget every key, e.g. when the window loses focus and key-ups will
    /// never arrive.
    pub fn release_all(&self) {
        *self.lock() = KeyTables::default();
        log::debug!("Released all tracked keys");
    }

    // The tables are plain booleans, so a poisoned lock still guards valid state.
    fn lock(&self) -> MutexGuard<'_, KeyTables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
