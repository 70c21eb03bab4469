//! In-memory collaborators.
//!
//! [`MemoryData`] answers dotted data addresses from a JSON document and
//! [`MemoryContent`] records content assignments. Together with
//! [`MiniJinjaProvider`](pict_template::MiniJinjaProvider) they make a view
//! usable without a host, which is how headless renders and tests run.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::context::{ContentAssignment, DataProvider};

fn index(segment: &str) -> Option<usize> {
    segment.parse().ok()
}

/// A JSON document addressed with dotted paths.
///
/// `"AppData.Books.0.Title"` walks object keys and, for numeric segments,
/// array indices.
///
/// ```rust
/// use pict_view::{DataProvider, MemoryData};
/// use serde_json::json;
///
/// let data = MemoryData::from_value(json!({
///     "AppData": {"Books": [{"Title": "Dune"}]}
/// }));
/// assert_eq!(data.get_data_by_address("AppData.Books.0.Title"), Some(json!("Dune")));
/// assert_eq!(data.get_data_by_address("AppData.Authors"), None);
/// ```
#[derive(Debug)]
pub struct MemoryData {
    root: RefCell<Value>,
}

impl Default for MemoryData {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryData {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    pub fn from_value(root: Value) -> Self {
        Self {
            root: RefCell::new(root),
        }
    }

    /// Writes `value` at `address`, creating intermediate objects.
    ///
    /// Returns false when the path runs through a scalar or an out-of-range
    /// array index.
    pub fn set_data_by_address(&self, address: &str, value: Value) -> bool {
        let mut root = self.root.borrow_mut();
        let mut current = &mut *root;
        let segments: Vec<&str> = address.split('.').collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return false,
        };

        for segment in parents {
            current = match current {
                Value::Object(map) => map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new())),
                Value::Array(items) => match index(segment).and_then(|i| items.get_mut(i)) {
                    Some(item) => item,
                    None => return false,
                },
                _ => return false,
            };
        }

        match current {
            Value::Object(map) => {
                map.insert(last.to_string(), value);
                true
            }
            Value::Array(items) => match index(last).and_then(|i| items.get_mut(i)) {
                Some(item) => {
                    *item = value;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Returns a copy of the whole document.
    pub fn snapshot(&self) -> Value {
        self.root.borrow().clone()
    }
}

impl DataProvider for MemoryData {
    fn get_data_by_address(&self, address: &str) -> Option<Value> {
        let root = self.root.borrow();
        let mut current = &*root;
        for segment in address.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(index(segment)?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }
}

/// Records content assignments.
#[derive(Debug, Default)]
pub struct MemoryContent {
    assignments: RefCell<Vec<(String, String)>>,
    current: RefCell<HashMap<String, String>>,
}

impl MemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest content assigned to `address`.
    pub fn content(&self, address: &str) -> Option<String> {
        self.current.borrow().get(address).cloned()
    }

    /// Every assignment in order.
    pub fn assignments(&self) -> Vec<(String, String)> {
        self.assignments.borrow().clone()
    }

    /// Number of assignments made to `address`.
    pub fn assignment_count(&self, address: &str) -> usize {
        self.assignments
            .borrow()
            .iter()
            .filter(|(assigned, _)| assigned == address)
            .count()
    }

    pub fn clear(&self) {
        self.assignments.borrow_mut().clear();
        self.current.borrow_mut().clear();
    }
}

impl ContentAssignment for MemoryContent {
    fn assign_content(&self, address: &str, content: &str) {
        self.assignments
            .borrow_mut()
            .push((address.to_string(), content.to_string()));
        self.current
            .borrow_mut()
            .insert(address.to_string(), content.to_string());
    }
}
