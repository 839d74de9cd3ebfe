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

//! The resource contract: a typed record consumed by the factory graph.

use crate::elements::Node;
use crate::value::Value;
use std::collections::BTreeMap;

/// A single record from the input stream.
///
/// The `entity_type` string selects which compiled entity plan applies.
/// Storage adapters (tabular files, SQL result sets, ...) implement this
/// trait; the engine and the factories only ever see the trait.
pub trait Resource: Send {
    /// The dispatch type of this resource.
    fn entity_type(&self) -> &str;

    /// Read an attribute value. Returns `None` when the key is absent.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write an attribute value (wrappers may rewrite records in place).
    fn set(&mut self, key: &str, value: Value);

    /// The keys currently held by this resource, for debugging.
    fn keys(&self) -> Vec<String>;
}

impl std::fmt::Debug for dyn Resource + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Resource(type={})", self.entity_type())
    }
}

/// Per-resource scratchpad shared by the factories of one entity plan.
///
/// Holds the local identifier map (nodes produced under a named identifier)
/// and free-form values a wrapper's pre-processor leaves for its
/// post-processor. Rebuilt for every (resource, phase) pair.
#[derive(Debug, Clone, Default)]
pub struct Supplies {
    nodes: BTreeMap<String, Node>,
    values: BTreeMap<String, Value>,
}

impl Supplies {
    /// Create an empty scratchpad.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node under its local identifier.
    pub fn put_node(&mut self, identifier: impl Into<String>, node: Node) {
        self.nodes.insert(identifier.into(), node);
    }

    /// Look up a node by local identifier.
    pub fn node(&self, identifier: &str) -> Option<&Node> {
        self.nodes.get(identifier)
    }

    /// Mutable lookup, used by the engine to annotate graph handles.
    pub fn node_mut(&mut self, identifier: &str) -> Option<&mut Node> {
        self.nodes.get_mut(identifier)
    }

    /// Iterate over all identified nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Store a free-form value (pre- to post-processor handoff).
    pub fn put_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Read a free-form value.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Drop all recorded state.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
    }
}

/// A plain in-memory resource: an entity type plus a key/value map.
///
/// This is the reference implementation of [`Resource`] and the record type
/// produced by simple adapters and test fixtures.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordResource {
    entity_type: String,
    values: BTreeMap<String, Value>,
}

impl RecordResource {
    /// Create an empty record of the given entity type.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style value insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl Resource for RecordResource {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
