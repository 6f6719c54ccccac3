use serde::{Deserialize, Serialize};

/// One registered save folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub path: String,
    #[serde(default)]
    pub game_name: String,
}

impl SaveRecord {
    pub fn new(path: impl Into<String>, game_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            game_name: game_name.into(),
        }
    }
}

/// Ordered list of records; paths are unique by exact string match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    records: Vec<SaveRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SaveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SaveRecord> {
        self.records.get(index)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.records.iter().any(|r| r.path == path)
    }

    /// Appends unless the path is empty or already present. Returns the new index.
    pub fn push(&mut self, record: SaveRecord) -> Option<usize> {
        if record.path.is_empty() || self.contains_path(&record.path) {
            return None;
        }
        self.records.push(record);
        Some(self.records.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Option<SaveRecord> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    pub(crate) fn insert(&mut self, index: usize, record: SaveRecord) {
        let at = index.min(self.records.len());
        self.records.insert(at, record);
    }

    pub(crate) fn pop(&mut self) -> Option<SaveRecord> {
        self.records.pop()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SaveRecord> {
        self.records.iter()
    }
}

impl From<Vec<SaveRecord>> for Registry {
    fn from(records: Vec<SaveRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a SaveRecord;
    type IntoIter = std::slice::Iter<'a, SaveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
