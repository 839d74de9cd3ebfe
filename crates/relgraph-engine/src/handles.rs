// Dweve Relgraph - Relational Data to Property Graph Conversion
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cross-phase node handle store.
//!
//! When the node phase commits an identified node, its graph id is recorded
//! under `(resource ordinal, identifier)`. The relationship phase rebuilds
//! the same identifier maps (the node sub-plans are pure modulo user
//! wrappers) and binds them to the recorded ids, so relationship endpoints
//! refer to the exact nodes written for the same resource, including
//! non-merge nodes that have no value identity.

use parking_lot::Mutex;
use relgraph_core::GraphId;
use std::collections::HashMap;

/// Graph ids of committed identified nodes, keyed by resource ordinal and
/// local identifier.
#[derive(Debug, Default)]
pub struct NodeHandleStore {
    inner: Mutex<HashMap<(u64, String), GraphId>>,
}

impl NodeHandleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the graph id for an identified node.
    pub fn record(&self, ordinal: u64, identifier: &str, id: GraphId) {
        self.inner
            .lock()
            .insert((ordinal, identifier.to_string()), id);
    }

    /// Look up the graph id of an identified node.
    pub fn lookup(&self, ordinal: u64, identifier: &str) -> Option<GraphId> {
        self.inner
            .lock()
            .get(&(ordinal, identifier.to_string()))
            .copied()
    }

    /// Number of recorded handles.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Forget everything (iterator replaced or schema reloaded).
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let store = NodeHandleStore::new();
        store.record(0, "flower", 41);
        store.record(0, "species", 42);
        store.record(1, "flower", 43);

        assert_eq!(store.lookup(0, "flower"), Some(41));
        assert_eq!(store.lookup(1, "flower"), Some(43));
        assert_eq!(store.lookup(2, "flower"), None);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_clear() {
        let store = NodeHandleStore::new();
        store.record(0, "a", 1);
        store.clear();
        assert!(store.is_empty());
    }
}
