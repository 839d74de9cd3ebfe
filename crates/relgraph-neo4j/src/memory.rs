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

//! In-memory reference implementation of the graph client contracts.
//!
//! Implements the five bulk operations natively with atomic transactions:
//! a transaction stages a copy of the store and swaps it in on commit.
//! Used as the reference backend in tests and available for dry runs.

use crate::client::{GraphClient, GraphTransaction, OpOutcome};
use crate::error::{GraphError, GraphResult};
use crate::ops::GraphOp;
use parking_lot::Mutex;
use relgraph_core::{GraphId, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// A node as stored in the memory graph.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNode {
    /// Internal id.
    pub id: GraphId,
    /// Labels, in creation order.
    pub labels: Vec<String>,
    /// Property map.
    pub properties: BTreeMap<String, Value>,
}

/// A relationship as stored in the memory graph.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRelationship {
    /// Internal id.
    pub id: GraphId,
    /// Start node id.
    pub start: GraphId,
    /// End node id.
    pub end: GraphId,
    /// Relationship type.
    pub rel_type: String,
    /// Property map.
    pub properties: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
struct Store {
    next_id: GraphId,
    nodes: Vec<StoredNode>,
    relationships: Vec<StoredRelationship>,
    op_log: Vec<String>,
}

impl Store {
    fn allocate_id(&mut self) -> GraphId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn node_matches(node: &StoredNode, labels: &[String], conditions: &BTreeMap<String, Value>) -> bool {
        labels.iter().all(|l| node.labels.contains(l))
            && conditions
                .iter()
                .all(|(k, v)| node.properties.get(k) == Some(v))
    }
}

/// An in-memory property graph.
///
/// Cloning shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    inner: Arc<Mutex<Store>>,
}

impl MemoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// All nodes, in commit order.
    pub fn nodes(&self) -> Vec<StoredNode> {
        self.inner.lock().nodes.clone()
    }

    /// All relationships, in commit order.
    pub fn relationships(&self) -> Vec<StoredRelationship> {
        self.inner.lock().relationships.clone()
    }

    /// Number of stored nodes.
    pub fn node_count(&self) -> usize {
        self.inner.lock().nodes.len()
    }

    /// Number of stored relationships.
    pub fn relationship_count(&self) -> usize {
        self.inner.lock().relationships.len()
    }

    /// Nodes carrying the given label.
    pub fn nodes_with_label(&self, label: &str) -> Vec<StoredNode> {
        self.inner
            .lock()
            .nodes
            .iter()
            .filter(|n| n.labels.iter().any(|l| l == label))
            .cloned()
            .collect()
    }

    /// Nodes carrying the label and property value.
    pub fn find_nodes(&self, label: &str, key: &str, value: &Value) -> Vec<StoredNode> {
        self.inner
            .lock()
            .nodes
            .iter()
            .filter(|n| n.labels.iter().any(|l| l == label) && n.properties.get(key) == Some(value))
            .cloned()
            .collect()
    }

    /// Relationships of the given type.
    pub fn relationships_of_type(&self, rel_type: &str) -> Vec<StoredRelationship> {
        self.inner
            .lock()
            .relationships
            .iter()
            .filter(|r| r.rel_type == rel_type)
            .cloned()
            .collect()
    }

    /// The committed operation log, for asserting ordering behaviour.
    pub fn op_log(&self) -> Vec<String> {
        self.inner.lock().op_log.clone()
    }

    /// Drop all stored data.
    pub fn clear(&self) {
        *self.inner.lock() = Store::default();
    }
}

impl GraphClient for MemoryGraph {
    fn begin<'a>(&'a self, _timeout: Duration) -> GraphResult<Box<dyn GraphTransaction + 'a>> {
        let staged = self.inner.lock().clone();
        Ok(Box::new(MemoryTransaction {
            target: Arc::clone(&self.inner),
            staged,
        }))
    }
}

struct MemoryTransaction {
    target: Arc<Mutex<Store>>,
    staged: Store,
}

impl GraphTransaction for MemoryTransaction {
    fn execute(&mut self, op: &GraphOp) -> GraphResult<OpOutcome> {
        let mut ids = Vec::new();
        match op {
            GraphOp::MergeNodes {
                primary_label,
                primary_key,
                labels,
                rows,
            } => {
                for row in rows {
                    let value = row.get(primary_key).ok_or_else(|| {
                        GraphError::fatal(format!(
                            "merge row is missing its primary property '{}'",
                            primary_key
                        ))
                    })?;
                    let existing = self.staged.nodes.iter_mut().find(|n| {
                        n.labels.iter().any(|l| l == primary_label)
                            && n.properties.get(primary_key) == Some(value)
                    });
                    match existing {
                        Some(node) => {
                            node.properties
                                .extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
                            for label in labels {
                                if !node.labels.contains(label) {
                                    node.labels.push(label.clone());
                                }
                            }
                            ids.push(node.id);
                        }
                        None => {
                            let id = self.staged.allocate_id();
                            self.staged.nodes.push(StoredNode {
                                id,
                                labels: labels.clone(),
                                properties: row.clone(),
                            });
                            ids.push(id);
                        }
                    }
                }
                self.staged
                    .op_log
                    .push(format!("merge_nodes:{}:{}", primary_label, rows.len()));
            }
            GraphOp::CreateNodes { labels, rows } => {
                for row in rows {
                    let id = self.staged.allocate_id();
                    self.staged.nodes.push(StoredNode {
                        id,
                        labels: labels.clone(),
                        properties: row.clone(),
                    });
                    ids.push(id);
                }
                self.staged.op_log.push(format!(
                    "create_nodes:{}:{}",
                    labels.join("|"),
                    rows.len()
                ));
            }
            GraphOp::MatchNodes { pattern } => {
                for node in &self.staged.nodes {
                    if Store::node_matches(node, &pattern.labels, &pattern.conditions) {
                        ids.push(node.id);
                    }
                }
                self.staged
                    .op_log
                    .push(format!("match_nodes:{}", pattern.labels.join("|")));
            }
            GraphOp::MergeRelationships {
                rel_type,
                primary_key,
                rows,
            } => {
                for row in rows {
                    let value = row.properties.get(primary_key).ok_or_else(|| {
                        GraphError::fatal(format!(
                            "merge row is missing its primary property '{}'",
                            primary_key
                        ))
                    })?;
                    let existing = self.staged.relationships.iter_mut().find(|r| {
                        r.rel_type == *rel_type
                            && r.start == row.start
                            && r.end == row.end
                            && r.properties.get(primary_key) == Some(value)
                    });
                    match existing {
                        Some(rel) => {
                            rel.properties
                                .extend(row.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
                            ids.push(rel.id);
                        }
                        None => {
                            self.check_endpoints(row.start, row.end)?;
                            let id = self.staged.allocate_id();
                            self.staged.relationships.push(StoredRelationship {
                                id,
                                start: row.start,
                                end: row.end,
                                rel_type: rel_type.clone(),
                                properties: row.properties.clone(),
                            });
                            ids.push(id);
                        }
                    }
                }
                self.staged
                    .op_log
                    .push(format!("merge_relationships:{}:{}", rel_type, rows.len()));
            }
            GraphOp::CreateRelationships { rel_type, rows } => {
                for row in rows {
                    self.check_endpoints(row.start, row.end)?;
                    let id = self.staged.allocate_id();
                    self.staged.relationships.push(StoredRelationship {
                        id,
                        start: row.start,
                        end: row.end,
                        rel_type: rel_type.clone(),
                        properties: row.properties.clone(),
                    });
                    ids.push(id);
                }
                self.staged
                    .op_log
                    .push(format!("create_relationships:{}:{}", rel_type, rows.len()));
            }
        }
        Ok(OpOutcome { ids })
    }

    fn commit(self: Box<Self>) -> GraphResult<()> {
        *self.target.lock() = self.staged;
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        // Staged state is simply dropped.
    }
}

impl MemoryTransaction {
    fn check_endpoints(&self, start: GraphId, end: GraphId) -> GraphResult<()> {
        for id in [start, end] {
            if !self.staged.nodes.iter().any(|n| n.id == id) {
                return Err(GraphError::fatal(format!(
                    "relationship endpoint {} does not exist",
                    id
                )));
            }
        }
        Ok(())
    }
}
