//! Interactive session state observed by the coupling.

use std::sync::Arc;

use common::id_type;
use lineage::{CellId, LineageGraph};
use parking_lot::Mutex;

id_type!(ListenerId);

pub type CellListener = Arc<dyn Fn(Option<CellId>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    entries: Mutex<Vec<(ListenerId, CellListener)>>,
}

impl Listeners {
    fn add(&self, listener: CellListener) -> ListenerId {
        let id = ListenerId::unique();
        self.entries.lock().push((id, listener));
        id
    }

    fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let len = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != len
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    // Listeners run without the lock held; they may add or remove listeners.
    fn notify(&self, cell: Option<CellId>) {
        let snapshot: Vec<CellListener> = self
            .entries
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(cell);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listeners({})", self.len())
    }
}

/// A cell selection that notifies its listeners when it changes.
#[derive(Debug, Default)]
struct ObservedCell {
    value: Mutex<Option<CellId>>,
    listeners: Listeners,
}

impl ObservedCell {
    fn get(&self) -> Option<CellId> {
        *self.value.lock()
    }

    fn set(&self, cell: Option<CellId>) {
        {
            let mut value = self.value.lock();
            if *value == cell {
                return;
            }
            *value = cell;
        }

        self.listeners.notify(cell);
    }
}

/// Cell with keyboard focus.
#[derive(Debug, Default)]
pub struct FocusModel {
    focused: ObservedCell,
}

impl FocusModel {
    pub fn focused(&self) -> Option<CellId> {
        self.focused.get()
    }

    /// Notifies listeners only if the focus actually changes.
    pub fn focus(&self, cell: Option<CellId>) {
        self.focused.set(cell);
    }

    pub fn add_listener(&self, listener: CellListener) -> ListenerId {
        self.focused.listeners.add(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.focused.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.focused.listeners.len()
    }
}

/// Cell under the pointer.
#[derive(Debug, Default)]
pub struct HighlightModel {
    highlighted: ObservedCell,
}

impl HighlightModel {
    pub fn highlighted(&self) -> Option<CellId> {
        self.highlighted.get()
    }

    /// Notifies listeners only if the highlight actually changes.
    pub fn highlight(&self, cell: Option<CellId>) {
        self.highlighted.set(cell);
    }

    pub fn add_listener(&self, listener: CellListener) -> ListenerId {
        self.highlighted.listeners.add(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.highlighted.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.highlighted.listeners.len()
    }
}

/// Broadcasts "navigate to cell" requests to every open view.
///
/// Unlike focus and highlight there is no state to compare against: every
/// request is delivered, including repeated requests for the same cell.
#[derive(Debug, Default)]
pub struct NavigationHandler {
    last_target: Mutex<Option<CellId>>,
    listeners: Listeners,
}

impl NavigationHandler {
    pub fn navigate_to(&self, cell: CellId) {
        *self.last_target.lock() = Some(cell);
        self.listeners.notify(Some(cell));
    }

    pub fn last_target(&self) -> Option<CellId> {
        *self.last_target.lock()
    }

    pub fn add_listener(&self, listener: CellListener) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// One lineage graph opened for interactive work.
#[derive(Debug)]
pub struct Session {
    name: String,
    graph: Arc<LineageGraph>,
    focus: FocusModel,
    highlight: HighlightModel,
    navigation: NavigationHandler,
}

impl Session {
    pub fn new(name: impl Into<String>, graph: Arc<LineageGraph>) -> Self {
        Self {
            name: name.into(),
            graph,
            focus: FocusModel::default(),
            highlight: HighlightModel::default(),
            navigation: NavigationHandler::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &Arc<LineageGraph> {
        &self.graph
    }

    pub fn focus(&self) -> &FocusModel {
        &self.focus
    }

    pub fn highlight(&self) -> &HighlightModel {
        &self.highlight
    }

    pub fn navigation(&self) -> &NavigationHandler {
        &self.navigation
    }
}
