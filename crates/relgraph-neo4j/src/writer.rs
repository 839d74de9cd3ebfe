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

//! The batched graph writer.
//!
//! Consumes one batch subgraph and commits it in a single transaction:
//!
//! 1. Merge nodes, grouped by `(primary label, primary key, label set)`,
//!    deduplicated by merge identity with last-writer-wins property folding.
//! 2. Create non-merge nodes, grouped by label set.
//! 3. Resolve each distinct match pattern with one bulk `MATCH`.
//! 4. Resolve relationship endpoints (created nodes by identity or
//!    intra-batch tag, committed nodes by graph id, patterns by their match
//!    results with cartesian expansion), then merge and create the
//!    relationship groups.
//!
//! All node operations run before any relationship operation. A failing
//! transaction rolls the whole batch back; transient errors are retried
//! with exponential backoff up to a bound, then surface as a write failure.

use crate::client::{GraphClient, GraphTransaction};
use crate::cypher::queries::RelRow;
use crate::error::{GraphError, GraphResult, WriteError, WriteResult};
use crate::ops::GraphOp;
use parking_lot::Mutex;
use relgraph_core::{
    Endpoint, GraphId, Node, NodeIdentity, NodeMatch, Relationship, Subgraph, Value,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Writer tuning knobs.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Per-transaction timeout.
    pub transaction_timeout: Duration,
    /// Maximum number of retries after a transient error.
    pub retry_max: u32,
    /// Base backoff between retries; doubles per attempt.
    pub retry_backoff: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            transaction_timeout: Duration::from_secs(30),
            retry_max: 3,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

/// What a committed batch produced.
#[derive(Debug, Clone, Default)]
pub struct CommitReceipt {
    /// Graph ids of the committed nodes, keyed by merge identity (or local
    /// tag for non-merge nodes).
    pub handles: HashMap<NodeIdentity, GraphId>,
    /// Nodes written in this batch.
    pub nodes_written: usize,
    /// Relationships written in this batch.
    pub relationships_written: usize,
}

/// Translates batch subgraphs into graph operations and commits them.
pub struct GraphWriter {
    client: Arc<dyn GraphClient>,
    config: WriterConfig,
    // Single-entry commit slot: transactions to the logical session are
    // serialised even when the driver parallelises network I/O.
    commit_slot: Mutex<()>,
}

impl GraphWriter {
    /// Create a writer over a client.
    pub fn new(client: Arc<dyn GraphClient>, config: WriterConfig) -> Self {
        Self {
            client,
            config,
            commit_slot: Mutex::new(()),
        }
    }

    /// The client this writer commits through.
    pub fn client(&self) -> &Arc<dyn GraphClient> {
        &self.client
    }

    /// Commit one batch, retrying transient failures with backoff.
    pub fn commit_batch(&self, batch: &Subgraph) -> WriteResult<CommitReceipt> {
        if batch.is_empty() {
            return Ok(CommitReceipt::default());
        }
        let mut attempt: u32 = 0;
        loop {
            match self.try_commit(batch) {
                Ok(receipt) => return Ok(receipt),
                Err(error) if error.is_transient() && attempt < self.config.retry_max => {
                    attempt += 1;
                    let backoff = self.config.retry_backoff * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        attempt,
                        max = self.config.retry_max,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %error,
                        "transient graph error; retrying batch"
                    );
                    std::thread::sleep(backoff);
                }
                Err(error) if error.is_transient() => {
                    return Err(WriteError::RetriesExhausted {
                        attempts: attempt + 1,
                        source: error,
                    });
                }
                Err(error) => return Err(WriteError::Graph(error)),
            }
        }
    }

    fn try_commit(&self, batch: &Subgraph) -> GraphResult<CommitReceipt> {
        let _slot = self.commit_slot.lock();
        let mut tx = self.client.begin(self.config.transaction_timeout)?;

        let result = self.run_passes(tx.as_mut(), batch);
        match result {
            Ok(receipt) => {
                tx.commit()?;
                Ok(receipt)
            }
            Err(error) => {
                tx.rollback();
                Err(error)
            }
        }
    }

    fn run_passes(
        &self,
        tx: &mut dyn GraphTransaction,
        batch: &Subgraph,
    ) -> GraphResult<CommitReceipt> {
        let mut receipt = CommitReceipt::default();

        self.write_nodes(tx, batch, &mut receipt)?;
        if !batch.relationships().is_empty() {
            self.write_relationships(tx, batch, &mut receipt)?;
        }

        debug!(
            nodes = receipt.nodes_written,
            relationships = receipt.relationships_written,
            "batch passes complete"
        );
        Ok(receipt)
    }

    fn write_nodes(
        &self,
        tx: &mut dyn GraphTransaction,
        batch: &Subgraph,
        receipt: &mut CommitReceipt,
    ) -> GraphResult<()> {
        // Group keys preserve first-seen order so the emitted operation
        // sequence is deterministic.
        let mut merge_order: Vec<(String, String, Vec<String>)> = Vec::new();
        let mut merge_groups: HashMap<(String, String, Vec<String>), Vec<Node>> = HashMap::new();
        let mut create_order: Vec<Vec<String>> = Vec::new();
        let mut create_groups: HashMap<Vec<String>, Vec<&Node>> = HashMap::new();

        for node in batch.nodes() {
            if node.is_merge() {
                let (Some(label), Some(key)) = (node.primary_label(), node.primary_key()) else {
                    warn!("merge node without primary label; skipping");
                    continue;
                };
                let group_key = (label.to_string(), key.to_string(), node.labels.clone());
                if !merge_groups.contains_key(&group_key) {
                    merge_order.push(group_key.clone());
                }
                let group = merge_groups.entry(group_key).or_default();
                // Fold batch-internal duplicates (last writer wins).
                match group.iter_mut().find(|n| n.identity() == node.identity()) {
                    Some(existing) => existing.absorb(node.clone()),
                    None => group.push(node.clone()),
                }
            } else {
                if !create_groups.contains_key(&node.labels) {
                    create_order.push(node.labels.clone());
                }
                create_groups
                    .entry(node.labels.clone())
                    .or_default()
                    .push(node);
            }
        }

        for group_key in &merge_order {
            let nodes = &merge_groups[group_key];
            let rows: Vec<BTreeMap<String, Value>> =
                nodes.iter().map(|n| n.properties.clone()).collect();
            let outcome = tx.execute(&GraphOp::MergeNodes {
                primary_label: group_key.0.clone(),
                primary_key: group_key.1.clone(),
                labels: group_key.2.clone(),
                rows,
            })?;
            if outcome.ids.len() != nodes.len() {
                return Err(GraphError::fatal(format!(
                    "merge on :{} returned {} ids for {} rows",
                    group_key.0,
                    outcome.ids.len(),
                    nodes.len()
                )));
            }
            receipt.nodes_written += nodes.len();
            for (node, id) in nodes.iter().zip(outcome.ids) {
                receipt.handles.insert(node.identity(), id);
            }
        }

        for labels in &create_order {
            let nodes = &create_groups[labels];
            let rows: Vec<BTreeMap<String, Value>> =
                nodes.iter().map(|n| n.properties.clone()).collect();
            let outcome = tx.execute(&GraphOp::CreateNodes {
                labels: labels.clone(),
                rows,
            })?;
            if outcome.ids.len() != nodes.len() {
                return Err(GraphError::fatal(format!(
                    "create on :{} returned {} ids for {} rows",
                    labels.join(":"),
                    outcome.ids.len(),
                    nodes.len()
                )));
            }
            receipt.nodes_written += nodes.len();
            for (node, id) in nodes.iter().zip(outcome.ids) {
                receipt.handles.insert(node.identity(), id);
            }
        }

        Ok(())
    }

    fn write_relationships(
        &self,
        tx: &mut dyn GraphTransaction,
        batch: &Subgraph,
        receipt: &mut CommitReceipt,
    ) -> GraphResult<()> {
        // Resolve every distinct match pattern once per batch.
        let mut pattern_results: HashMap<NodeMatch, Vec<GraphId>> = HashMap::new();
        // Merge-node endpoints committed in an earlier batch resolve by
        // their primary property.
        let mut identity_results: HashMap<NodeIdentity, Vec<GraphId>> = HashMap::new();

        for relationship in batch.relationships() {
            for endpoint in [&relationship.start, &relationship.end] {
                match endpoint {
                    Endpoint::Match(pattern) => {
                        if !pattern_results.contains_key(pattern) {
                            let outcome = tx.execute(&GraphOp::MatchNodes {
                                pattern: pattern.clone(),
                            })?;
                            pattern_results.insert(pattern.clone(), outcome.ids);
                        }
                    }
                    Endpoint::Node(node) => {
                        if node.graph_id.is_none()
                            && node.is_merge()
                            && !receipt.handles.contains_key(&node.identity())
                        {
                            let identity = node.identity();
                            if !identity_results.contains_key(&identity) {
                                let outcome = tx.execute(&GraphOp::MatchNodes {
                                    pattern: primary_pattern(node),
                                })?;
                                identity_results.insert(identity, outcome.ids);
                            }
                        }
                    }
                }
            }
        }

        let resolve = |endpoint: &Endpoint| -> Option<Vec<GraphId>> {
            match endpoint {
                Endpoint::Match(pattern) => pattern_results.get(pattern).cloned(),
                Endpoint::Node(node) => {
                    if let Some(id) = node.graph_id {
                        return Some(vec![id]);
                    }
                    if let Some(id) = receipt.handles.get(&node.identity()) {
                        return Some(vec![*id]);
                    }
                    if let Some(ids) = identity_results.get(&node.identity()) {
                        return Some(ids.clone());
                    }
                    None
                }
            }
        };

        // Partition expanded relationships by (type, merge).
        let mut merge_order: Vec<(String, String)> = Vec::new();
        let mut merge_groups: HashMap<(String, String), Vec<RelRow>> = HashMap::new();
        let mut merge_seen: HashMap<(String, String, GraphId, GraphId, Value), usize> =
            HashMap::new();
        let mut create_order: Vec<String> = Vec::new();
        let mut create_groups: HashMap<String, Vec<RelRow>> = HashMap::new();

        for relationship in batch.relationships() {
            let Some(starts) = resolve(&relationship.start) else {
                warn_unresolved(relationship);
                continue;
            };
            let Some(ends) = resolve(&relationship.end) else {
                warn_unresolved(relationship);
                continue;
            };
            // A pattern matching zero nodes yields zero relationships.
            if starts.is_empty() || ends.is_empty() {
                continue;
            }

            match (relationship.primary_key(), relationship.primary_value()) {
                (Some(key), Some(value)) => {
                    let group_key = (relationship.rel_type.clone(), key.to_string());
                    if !merge_groups.contains_key(&group_key) {
                        merge_order.push(group_key.clone());
                    }
                    let group = merge_groups.entry(group_key.clone()).or_default();
                    for start in &starts {
                        for end in &ends {
                            let dedup_key = (
                                group_key.0.clone(),
                                group_key.1.clone(),
                                *start,
                                *end,
                                value.clone(),
                            );
                            match merge_seen.get(&dedup_key) {
                                Some(&index) => {
                                    // Last writer wins within the batch.
                                    group[index]
                                        .properties
                                        .extend(relationship.properties.clone());
                                }
                                None => {
                                    merge_seen.insert(dedup_key, group.len());
                                    group.push(RelRow {
                                        start: *start,
                                        end: *end,
                                        properties: relationship.properties.clone(),
                                    });
                                }
                            }
                        }
                    }
                }
                _ => {
                    let rel_type = relationship.rel_type.clone();
                    if !create_groups.contains_key(&rel_type) {
                        create_order.push(rel_type.clone());
                    }
                    let group = create_groups.entry(rel_type).or_default();
                    for start in &starts {
                        for end in &ends {
                            group.push(RelRow {
                                start: *start,
                                end: *end,
                                properties: relationship.properties.clone(),
                            });
                        }
                    }
                }
            }
        }

        for group_key in &merge_order {
            let rows = &merge_groups[group_key];
            if rows.is_empty() {
                continue;
            }
            tx.execute(&GraphOp::MergeRelationships {
                rel_type: group_key.0.clone(),
                primary_key: group_key.1.clone(),
                rows: rows.clone(),
            })?;
            receipt.relationships_written += rows.len();
        }
        for rel_type in &create_order {
            let rows = &create_groups[rel_type];
            if rows.is_empty() {
                continue;
            }
            tx.execute(&GraphOp::CreateRelationships {
                rel_type: rel_type.clone(),
                rows: rows.clone(),
            })?;
            receipt.relationships_written += rows.len();
        }

        Ok(())
    }
}

fn primary_pattern(node: &Node) -> NodeMatch {
    let mut conditions = BTreeMap::new();
    if let (Some(key), Some(value)) = (node.primary_key(), node.primary_value()) {
        conditions.insert(key.to_string(), value.clone());
    }
    let labels = node
        .primary_label()
        .map(|l| vec![l.to_string()])
        .unwrap_or_default();
    NodeMatch::new(labels, conditions)
}

fn warn_unresolved(relationship: &Relationship) {
    warn!(
        rel_type = relationship.rel_type.as_str(),
        "relationship endpoint could not be resolved; dropping"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGraph;
    use relgraph_core::Attribute;

    fn writer(graph: &MemoryGraph) -> GraphWriter {
        GraphWriter::new(Arc::new(graph.clone()), WriterConfig::default())
    }

    fn merge_node(label: &str, key: &str, value: Value) -> Node {
        Node::from_attributes(
            vec![label.to_string()],
            vec![Attribute::new(key, value)],
            Some(key.to_string()),
        )
    }

    #[test]
    fn test_commit_empty_batch_is_noop() {
        let graph = MemoryGraph::new();
        let receipt = writer(&graph).commit_batch(&Subgraph::new()).unwrap();
        assert_eq!(receipt.nodes_written, 0);
        assert!(graph.op_log().is_empty());
    }

    #[test]
    fn test_nodes_committed_with_handles() {
        let graph = MemoryGraph::new();
        let mut batch = Subgraph::new();
        let species = merge_node("Species", "Name", Value::from("setosa"));
        let identity = species.identity();
        batch.add_node(species);
        batch.add_node(Node::new(vec!["Flower".to_string()], BTreeMap::new()));

        let receipt = writer(&graph).commit_batch(&batch).unwrap();
        assert_eq!(receipt.nodes_written, 2);
        assert_eq!(graph.node_count(), 2);
        assert!(receipt.handles.contains_key(&identity));
    }

    #[test]
    fn test_merge_dedup_within_batch() {
        let graph = MemoryGraph::new();
        // Two merge-identical nodes in one batch commit as a single node,
        // with last-writer-wins property folding.
        let a = merge_node("Species", "Name", Value::from("setosa"));
        let mut b = merge_node("Species", "Name", Value::from("setosa"));
        b.properties
            .insert("kingdom".to_string(), Value::from("Plantae"));
        let mut batch = Subgraph::new();
        batch.add_node(a);
        batch.add_node(b);

        let receipt = writer(&graph).commit_batch(&batch).unwrap();
        assert_eq!(receipt.nodes_written, 1);
        let nodes = graph.find_nodes("Species", "Name", &Value::from("setosa"));
        assert_eq!(nodes.len(), 1);
        assert_eq!(
            nodes[0].properties.get("kingdom"),
            Some(&Value::from("Plantae"))
        );
    }

    #[test]
    fn test_nodes_commit_before_relationships() {
        let graph = MemoryGraph::new();
        let mut batch = Subgraph::new();
        let a = merge_node("A", "k", Value::Int(1));
        let b = merge_node("B", "k", Value::Int(2));
        batch.add_node(a.clone());
        batch.add_node(b.clone());
        batch.add_relationship(Relationship::from_attributes(
            Endpoint::Node(a),
            "r",
            Endpoint::Node(b),
            vec![],
            None,
        ));

        writer(&graph).commit_batch(&batch).unwrap();
        let log = graph.op_log();
        let node_pos = log.iter().position(|l| l.starts_with("merge_nodes")).unwrap();
        let rel_pos = log
            .iter()
            .position(|l| l.starts_with("create_relationships"))
            .unwrap();
        assert!(node_pos < rel_pos);
        assert_eq!(graph.relationship_count(), 1);
    }

    #[test]
    fn test_match_pattern_cartesian_expansion() {
        let graph = MemoryGraph::new();

        // Pre-populate two Species nodes.
        let mut seed = Subgraph::new();
        seed.add_node(merge_node("Species", "Name", Value::from("setosa")));
        seed.add_node(merge_node("Species", "Name", Value::from("versicolor")));
        writer(&graph).commit_batch(&seed).unwrap();

        // One person likes every species (label-only pattern).
        let mut batch = Subgraph::new();
        let person = merge_node("Person", "ID", Value::Int(1));
        batch.add_node(person.clone());
        batch.add_relationship(Relationship::from_attributes(
            Endpoint::Node(person),
            "likes",
            Endpoint::Match(NodeMatch::new(vec!["Species".to_string()], BTreeMap::new())),
            vec![],
            None,
        ));
        writer(&graph).commit_batch(&batch).unwrap();

        assert_eq!(graph.relationships_of_type("likes").len(), 2);
    }

    #[test]
    fn test_match_returning_zero_nodes_yields_zero_relationships() {
        let graph = MemoryGraph::new();
        let mut batch = Subgraph::new();
        let person = merge_node("Person", "ID", Value::Int(2));
        batch.add_node(person.clone());
        let mut conditions = BTreeMap::new();
        conditions.insert("Name".to_string(), Value::from("virginica"));
        batch.add_relationship(Relationship::from_attributes(
            Endpoint::Node(person),
            "likes",
            Endpoint::Match(NodeMatch::new(vec!["Species".to_string()], conditions)),
            vec![],
            None,
        ));

        let receipt = writer(&graph).commit_batch(&batch).unwrap();
        assert_eq!(receipt.relationships_written, 0);
        assert_eq!(graph.relationship_count(), 0);
    }

    #[test]
    fn test_parallel_edges_vs_merged_edges() {
        let graph = MemoryGraph::new();
        let a = merge_node("A", "k", Value::Int(1));
        let b = merge_node("B", "k", Value::Int(2));

        let mut batch = Subgraph::new();
        batch.add_node(a.clone());
        batch.add_node(b.clone());
        // Two non-merge relationships: parallel edges.
        for _ in 0..2 {
            let mut sg = Subgraph::new();
            sg.add_relationship(Relationship::from_attributes(
                Endpoint::Node(a.clone()),
                "plain",
                Endpoint::Node(b.clone()),
                vec![],
                None,
            ));
            batch = batch.union(sg);
        }
        // Two merge relationships with the same primary value: one edge.
        for _ in 0..2 {
            let mut sg = Subgraph::new();
            sg.add_relationship(Relationship::from_attributes(
                Endpoint::Node(a.clone()),
                "keyed",
                Endpoint::Node(b.clone()),
                vec![Attribute::new("pk", Value::Int(7))],
                Some("pk".to_string()),
            ));
            batch = batch.union(sg);
        }

        writer(&graph).commit_batch(&batch).unwrap();
        assert_eq!(graph.relationships_of_type("plain").len(), 2);
        assert_eq!(graph.relationships_of_type("keyed").len(), 1);
    }

    #[test]
    fn test_endpoint_by_graph_id() {
        let graph = MemoryGraph::new();
        let mut seed = Subgraph::new();
        let a = merge_node("A", "k", Value::Int(1));
        let b = merge_node("B", "k", Value::Int(2));
        seed.add_node(a.clone());
        seed.add_node(b.clone());
        let receipt = writer(&graph).commit_batch(&seed).unwrap();

        // Relationship-only batch with endpoints bound by graph id, as the
        // engine produces in the relationship phase.
        let mut bound_a = a.clone();
        bound_a.graph_id = receipt.handles.get(&a.identity()).copied();
        let mut bound_b = b.clone();
        bound_b.graph_id = receipt.handles.get(&b.identity()).copied();

        let mut batch = Subgraph::new();
        batch.add_relationship(Relationship::from_attributes(
            Endpoint::Node(bound_a),
            "r",
            Endpoint::Node(bound_b),
            vec![],
            None,
        ));
        writer(&graph).commit_batch(&batch).unwrap();
        assert_eq!(graph.relationship_count(), 1);
        // No new nodes were created by the relationship batch.
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_merge_endpoint_resolved_by_primary_property() {
        let graph = MemoryGraph::new();
        let mut seed = Subgraph::new();
        let a = merge_node("A", "k", Value::Int(1));
        let b = merge_node("B", "k", Value::Int(2));
        seed.add_node(a.clone());
        seed.add_node(b.clone());
        writer(&graph).commit_batch(&seed).unwrap();

        // Endpoints without graph ids: fresh value-identical merge nodes.
        let mut batch = Subgraph::new();
        batch.add_relationship(Relationship::from_attributes(
            Endpoint::Node(merge_node("A", "k", Value::Int(1))),
            "r",
            Endpoint::Node(merge_node("B", "k", Value::Int(2))),
            vec![],
            None,
        ));
        writer(&graph).commit_batch(&batch).unwrap();
        assert_eq!(graph.relationship_count(), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_unresolvable_endpoint_drops_relationship() {
        let graph = MemoryGraph::new();
        let mut batch = Subgraph::new();
        // Non-merge endpoint that is not part of the batch and carries no
        // graph id: the relationship is dropped, not an error.
        let ghost = Node::new(vec!["Ghost".to_string()], BTreeMap::new());
        let anchor = merge_node("A", "k", Value::Int(1));
        batch.add_node(anchor.clone());
        batch.add_relationship(Relationship::from_attributes(
            Endpoint::Node(anchor),
            "r",
            Endpoint::Node(ghost),
            vec![],
            None,
        ));
        let receipt = writer(&graph).commit_batch(&batch).unwrap();
        assert_eq!(receipt.relationships_written, 0);
        assert_eq!(graph.relationship_count(), 0);
    }

    // ==================== Retry behaviour ====================

    struct FlakyClient {
        inner: MemoryGraph,
        failures_left: Mutex<u32>,
    }

    impl GraphClient for FlakyClient {
        fn begin<'a>(
            &'a self,
            timeout: Duration,
        ) -> GraphResult<Box<dyn GraphTransaction + 'a>> {
            let mut failures = self.failures_left.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(GraphError::transient("injected connection failure"));
            }
            self.inner.begin(timeout)
        }
    }

    fn fast_config() -> WriterConfig {
        WriterConfig {
            transaction_timeout: Duration::from_secs(1),
            retry_max: 3,
            retry_backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_transient_errors_are_retried() {
        let graph = MemoryGraph::new();
        let client = Arc::new(FlakyClient {
            inner: graph.clone(),
            failures_left: Mutex::new(2),
        });
        let writer = GraphWriter::new(client, fast_config());

        let mut batch = Subgraph::new();
        batch.add_node(merge_node("A", "k", Value::Int(1)));
        writer.commit_batch(&batch).unwrap();
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_retry_exhaustion_fails() {
        let graph = MemoryGraph::new();
        let client = Arc::new(FlakyClient {
            inner: graph.clone(),
            failures_left: Mutex::new(10),
        });
        let writer = GraphWriter::new(client, fast_config());

        let mut batch = Subgraph::new();
        batch.add_node(merge_node("A", "k", Value::Int(1)));
        let err = writer.commit_batch(&batch).unwrap_err();
        assert!(matches!(err, WriteError::RetriesExhausted { attempts: 4, .. }));
        assert_eq!(graph.node_count(), 0);
    }
}
