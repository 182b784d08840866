use crate::loader::{FileRecord, LoadSnapshot, RecordId};
use crate::render::{render, GridView};
use crate::search::filter_records;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Working set and filtered view. Both are only ever swapped for a new
/// snapshot, never edited in place.
#[derive(Debug)]
pub struct ViewerStore {
    working_set: Arc<Vec<Arc<FileRecord>>>,
    filtered: Arc<Vec<Arc<FileRecord>>>,
    query: String,
    total_records: usize,
    load_state: LoadState,
}

impl Default for ViewerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerStore {
    pub fn new() -> Self {
        Self {
            working_set: Arc::new(Vec::new()),
            filtered: Arc::new(Vec::new()),
            query: String::new(),
            total_records: 0,
            load_state: LoadState::Idle,
        }
    }

    pub fn begin_load(&mut self) {
        self.load_state = LoadState::Loading;
    }

    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.load_state = LoadState::Failed(message.into());
    }

    /// Installs a finished load and shows it unfiltered.
    pub fn replace_working_set(&mut self, snapshot: LoadSnapshot) {
        self.working_set = Arc::new(snapshot.records);
        self.total_records = snapshot.total_records;
        self.load_state = LoadState::Loaded;
        self.query.clear();
        self.refilter();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = Arc::new(filter_records(&self.working_set, &self.query));
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn working_set(&self) -> Arc<Vec<Arc<FileRecord>>> {
        Arc::clone(&self.working_set)
    }

    pub fn filtered(&self) -> Arc<Vec<Arc<FileRecord>>> {
        Arc::clone(&self.filtered)
    }

    pub fn file_count(&self) -> usize {
        self.working_set.len()
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn find(&self, id: RecordId) -> Option<Arc<FileRecord>> {
        self.working_set.iter().find(|r| r.id == id).cloned()
    }

    pub fn grid(&self) -> GridView {
        render(&self.filtered)
    }
}
