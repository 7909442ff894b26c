use contracts::domain::common::ResourceRecord;

/// In-memory mirror of the last successful list call.
///
/// Always replaced wholesale; there is no incremental patching.
#[derive(Debug, Clone)]
pub struct EntityStore<R: ResourceRecord> {
    records: Vec<R>,
}

impl<R: ResourceRecord> Default for EntityStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: ResourceRecord> EntityStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, records: Vec<R>) {
        self.records = records;
    }

    pub fn find_by_id(&self, id: i64) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
