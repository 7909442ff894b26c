use std::collections::BTreeMap;
use std::rc::Rc;

/// One filter control of a list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDef {
    /// Query parameter name
    pub name: &'static str,
    /// Prefix used when describing active filters ("Client")
    pub label: &'static str,
}

impl FilterDef {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }
}

/// Current filter criteria of a list screen.
///
/// Lives for the page session only. [`FilterState::to_query`] is the single
/// place where empty criteria are dropped.
#[derive(Default)]
pub struct FilterState {
    entries: BTreeMap<String, String>,
    on_change: Option<Rc<dyn Fn()>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback invoked by [`FilterState::reset`].
    ///
    /// It runs while the caller still holds the state; it must only schedule
    /// work, not read the filters back synchronously.
    pub fn set_on_change(&mut self, callback: Rc<dyn Fn()>) {
        self.on_change = Some(callback);
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn get_all(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }

    pub fn to_query(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Clear every entry and notify the change callback
    pub fn reset(&mut self) {
        for value in self.entries.values_mut() {
            value.clear();
        }
        if let Some(callback) = &self.on_change {
            callback();
        }
    }

    pub fn active_count(&self) -> usize {
        self.to_query().len()
    }
}

/// Human summary of the active filters.
///
/// Up to two filters are listed ("Client: Acme, Status: draft"), more are
/// counted ("3 filters"). `None` when no filter is active.
pub fn describe_filters(query: &BTreeMap<String, String>, defs: &[FilterDef]) -> Option<String> {
    let parts: Vec<String> = defs
        .iter()
        .filter_map(|def| query.get(def.name).map(|v| format!("{}: {}", def.label, v)))
        .collect();
    match parts.len() {
        0 => None,
        1 | 2 => Some(parts.join(", ")),
        n => Some(format!("{} filters", n)),
    }
}
