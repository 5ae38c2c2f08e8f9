use crate::domain::model::{Entry, EntryId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

pub const SAMPLE_NAMES: [&str; 10] = [
    "陈大明", "林美玲", "王小虎", "张志伟", "李淑芬", "黄俊杰", "吴若雅", "蔡宗翰", "郑雅婷", "刘建宏",
];

/// Sample roster plus one repeat of the first name, so duplicate
/// flagging has something to show.
pub fn sample_names_with_duplicate() -> Vec<String> {
    SAMPLE_NAMES
        .iter()
        .chain(SAMPLE_NAMES.first())
        .map(|s| s.to_string())
        .collect()
}

/// Ordered participant list for one session.
///
/// Ids come from a monotonic counter that survives removals and clears,
/// so an id is unique for the roster's whole lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Self::new();
        roster.add_names(names);
        roster
    }

    /// Appends one entry per non-blank name and returns the new ids in order.
    pub fn add_names<I, S>(&mut self, names: I) -> Vec<EntryId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = Vec::new();
        for name in names {
            let name: String = name.into();
            if name.trim().is_empty() {
                continue;
            }
            let id = EntryId(self.next_id);
            self.next_id += 1;
            self.entries.push(Entry::new(id, name));
            added.push(id);
        }
        tracing::debug!("Added {} entries, roster size {}", added.len(), self.entries.len());
        added
    }

    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_duplicate_names(&self) -> BTreeSet<String> {
        find_duplicate_names(&self.entries)
    }

    pub fn is_duplicate(&self, name: &str) -> bool {
        self.entries.iter().filter(|e| e.name == name).take(2).count() > 1
    }

    /// Collapses same-named entries, keeping the first in roster order.
    /// Returns how many entries were dropped.
    pub fn remove_duplicates(&mut self) -> usize {
        let before = self.entries.len();
        self.entries = remove_duplicates(&self.entries);
        before - self.entries.len()
    }
}

/// Names that occur two or more times, compared exactly (case-sensitive).
pub fn find_duplicate_names(entries: &[Entry]) -> BTreeSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.name.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}

pub fn remove_duplicates(entries: &[Entry]) -> Vec<Entry> {
    let mut seen: HashSet<&str> = HashSet::new();
    entries
        .iter()
        .filter(|e| seen.insert(e.name.as_str()))
        .cloned()
        .collect()
}
