//! Shared selection state linking the dashboard views.
//!
//! A [`Store`] is a cheap, cloneable handle (single-threaded, `Rc` based).
//! Views read it with [`Store::get_state`], report user input through
//! [`Store::set_state`], and react through [`Store::subscribe`].
//!
//! Notification is synchronous. A listener that calls `set_state` runs the
//! nested update (with its own notification pass) to completion before the
//! outer pass continues, and every listener is handed the state as it is at
//! the moment it is called.
//!
//! Listeners are owned by the store, so a listener that keeps a [`Store`]
//! clone keeps the store alive forever. Listeners that write back should
//! capture [`Store::downgrade`] instead.
//!
//! ```
//! use climate_dash::store::{SelectionPatch, SelectionState, Store};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let store = Store::new(SelectionState::default());
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let sub = store.subscribe(move |s| sink.borrow_mut().push(s.clone()));
//!
//! store.set_state(SelectionPatch::new().country("DEU"));
//! assert_eq!(seen.borrow().len(), 2); // once on subscribe, once on change
//! sub.unsubscribe();
//! ```

use crate::models::IndicatorWindow;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Nested notification passes allowed before further ones are dropped.
pub const MAX_NOTIFY_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_country_iso3: Option<String>,
    pub selected_year: Option<i32>,
    pub indicator_window: IndicatorWindow,
}

impl SelectionState {
    /// Selected ISO3, with a blank code read as no selection.
    pub fn selected_country(&self) -> Option<&str> {
        self.selected_country_iso3
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Field-by-field merge; fields the patch leaves unset are kept.
    pub fn merged(&self, patch: &SelectionPatch) -> SelectionState {
        SelectionState {
            selected_country_iso3: patch
                .selected_country_iso3
                .clone()
                .unwrap_or_else(|| self.selected_country_iso3.clone()),
            selected_year: patch.selected_year.unwrap_or(self.selected_year),
            indicator_window: patch.indicator_window.unwrap_or(self.indicator_window),
        }
    }
}

/// Partial update for [`SelectionState`].
///
/// The outer `Option` says whether the field is touched at all; for nullable
/// fields the inner `Option` is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionPatch {
    pub selected_country_iso3: Option<Option<String>>,
    pub selected_year: Option<Option<i32>>,
    pub indicator_window: Option<IndicatorWindow>,
}

impl SelectionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a country; a blank code clears the selection instead.
    pub fn country(mut self, iso3: impl Into<String>) -> Self {
        let iso3 = iso3.into();
        self.selected_country_iso3 = Some(Some(iso3).filter(|s| !s.trim().is_empty()));
        self
    }

    pub fn clear_country(mut self) -> Self {
        self.selected_country_iso3 = Some(None);
        self
    }

    pub fn year(mut self, year: Option<i32>) -> Self {
        self.selected_year = Some(year);
        self
    }

    pub fn window(mut self, window: IndicatorWindow) -> Self {
        self.indicator_window = Some(window);
        self
    }

    /// Patch that sets every field to the startup defaults.
    pub fn reset() -> Self {
        Self::new()
            .clear_country()
            .year(None)
            .window(IndicatorWindow::Full)
    }
}

type Listener = Rc<dyn Fn(&SelectionState)>;

struct Inner {
    state: RefCell<SelectionState>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_id: Cell<u64>,
    depth: Cell<usize>,
}

impl Inner {
    fn is_subscribed(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|(lid, _)| *lid == id)
    }

    fn remove(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

/// Restores the notification depth even if a listener panics.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
    prev: usize,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.prev);
    }
}

#[derive(Clone)]
pub struct Store {
    inner: Rc<Inner>,
}

impl Store {
    pub fn new(initial: SelectionState) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                depth: Cell::new(0),
            }),
        }
    }

    /// Snapshot of the current selection.
    pub fn get_state(&self) -> SelectionState {
        self.inner.state.borrow().clone()
    }

    /// Merge `patch` into the state and notify listeners if any field changed.
    ///
    /// The merged state is stored even when nothing changed. Returns whether
    /// a change was detected.
    pub fn set_state(&self, patch: SelectionPatch) -> bool {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let next = state.merged(&patch);
            let changed = next != *state;
            *state = next;
            changed
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Back to the startup defaults (nothing selected, full window).
    pub fn reset(&self) -> bool {
        self.set_state(SelectionPatch::reset())
    }

    /// Register `listener` and call it once right away with the current state.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SelectionState) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let listener: Listener = Rc::new(listener);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::clone(&listener)));

        let state = self.get_state();
        listener(&state);

        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Handle that does not keep the store alive.
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self) {
        let depth = self.inner.depth.get();
        if depth >= MAX_NOTIFY_DEPTH {
            log::warn!(
                "selection store: notification nested {depth} levels deep, skipping further listeners"
            );
            return;
        }
        self.inner.depth.set(depth + 1);
        let _guard = DepthGuard {
            depth: &self.inner.depth,
            prev: depth,
        };

        // Snapshot so listeners may (un)subscribe while we iterate.
        let snapshot: Vec<(u64, Listener)> = self.inner.listeners.borrow().clone();
        for (id, listener) in snapshot {
            if !self.inner.is_subscribed(id) {
                continue;
            }
            let state = self.get_state();
            listener(&state);
        }
    }
}

/// Non-owning [`Store`] handle, for listeners that call back into the store.
#[derive(Clone)]
pub struct WeakStore {
    inner: Weak<Inner>,
}

impl WeakStore {
    /// `None` once every [`Store`] handle has been dropped.
    pub fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

/// Handle returned by [`Store::subscribe`]. Dropping it keeps the listener
/// registered; call [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    store: Weak<Inner>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.store.upgrade() {
            inner.remove(self.id);
        }
    }
}
