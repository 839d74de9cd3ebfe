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

//! In-memory graph element model: attributes, nodes, relationships, match
//! patterns and subgraphs.
//!
//! Two equality relations matter here:
//!
//! - **Merge identity**: a node with a primary key is identified by
//!   `(primary label, key name, key value)`; a relationship with a primary
//!   key by `(start identity, end identity, type, key name, key value)`.
//!   Two merge-identical elements collapse into one on subgraph union and
//!   on commit.
//! - **Local identity**: elements without a primary key are identified by a
//!   process-unique tag (`uid`) and never collapse.

use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

fn next_uid() -> u64 {
    NEXT_UID.fetch_add(1, Ordering::Relaxed)
}

/// A graph node identifier as assigned by the backing store.
pub type GraphId = i64;

/// An immutable `(key, value)` pair produced by an attribute factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: Value,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Merge identity of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeIdentity {
    /// Upsert identity: `(primary label, key name, key value)`.
    Merge {
        /// The primary label.
        label: String,
        /// The primary key property name.
        key: String,
        /// The primary key property value.
        value: Value,
    },
    /// Whole-object identity for nodes without a primary key.
    Local(u64),
}

/// A node to be written to the graph.
///
/// The first label is the primary label. A node is a *merge target* iff a
/// primary key is set; the primary key value always also lives in
/// `properties`.
#[derive(Debug, Clone)]
pub struct Node {
    uid: u64,
    /// Ordered labels; the first one is the primary label.
    pub labels: Vec<String>,
    /// Property map, including the primary key property when merging.
    pub properties: BTreeMap<String, Value>,
    primary_key: Option<String>,
    /// Identity in the backing graph, once known (set after a commit or a
    /// cross-phase handle lookup).
    pub graph_id: Option<GraphId>,
}

impl Node {
    /// Create a node from labels and properties, without a primary key.
    pub fn new(labels: Vec<String>, properties: BTreeMap<String, Value>) -> Self {
        Self {
            uid: next_uid(),
            labels,
            properties,
            primary_key: None,
            graph_id: None,
        }
    }

    /// Create a node from constructed attributes.
    ///
    /// `primary_key`, when set, must name one of the attributes.
    pub fn from_attributes(
        labels: Vec<String>,
        attributes: Vec<Attribute>,
        primary_key: Option<String>,
    ) -> Self {
        let properties = attributes.into_iter().map(|a| (a.key, a.value)).collect();
        Self {
            uid: next_uid(),
            labels,
            properties,
            primary_key,
            graph_id: None,
        }
    }

    /// The process-unique ephemeral tag of this node.
    pub fn uid(&self) -> u64 {
        self.uid
    }

    /// True if this node is a merge target.
    pub fn is_merge(&self) -> bool {
        self.primary_key.is_some()
    }

    /// The primary key property name, if merging.
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// The primary label (first label), only meaningful when merging.
    pub fn primary_label(&self) -> Option<&str> {
        if self.is_merge() {
            self.labels.first().map(String::as_str)
        } else {
            None
        }
    }

    /// The primary key property value, if merging.
    pub fn primary_value(&self) -> Option<&Value> {
        self.primary_key
            .as_ref()
            .and_then(|k| self.properties.get(k))
    }

    /// Drop the primary key, turning the node into an unconditional create.
    pub fn clear_primary_key(&mut self) {
        self.primary_key = None;
    }

    /// The merge identity of this node.
    pub fn identity(&self) -> NodeIdentity {
        match (self.primary_label(), self.primary_key(), self.primary_value()) {
            (Some(label), Some(key), Some(value)) => NodeIdentity::Merge {
                label: label.to_string(),
                key: key.to_string(),
                value: value.clone(),
            },
            _ => NodeIdentity::Local(self.uid),
        }
    }

    /// Fold another node's properties into this one (last writer wins).
    pub fn absorb(&mut self, other: Node) {
        for label in other.labels {
            if !self.labels.contains(&label) {
                self.labels.push(label);
            }
        }
        self.properties.extend(other.properties);
        if self.graph_id.is_none() {
            self.graph_id = other.graph_id;
        }
    }
}

/// A pattern over existing graph nodes: all labels and all property
/// conditions must hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeMatch {
    /// Labels the matched nodes must carry.
    pub labels: Vec<String>,
    /// Property equality conditions.
    pub conditions: BTreeMap<String, Value>,
}

impl NodeMatch {
    /// Create a new match pattern.
    pub fn new(labels: Vec<String>, conditions: BTreeMap<String, Value>) -> Self {
        Self { labels, conditions }
    }
}

/// One endpoint of a relationship.
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// A node produced in this conversion (possibly already committed, in
    /// which case `graph_id` is set).
    Node(Node),
    /// A pattern resolved against the graph at commit time.
    Match(NodeMatch),
}

impl Endpoint {
    /// Identity used for relationship merge-identity and deduplication.
    pub fn identity_key(&self) -> EndpointKey {
        match self {
            Endpoint::Node(n) => match n.graph_id {
                Some(id) => EndpointKey::Graph(id),
                None => EndpointKey::Node(n.identity()),
            },
            Endpoint::Match(m) => EndpointKey::Pattern(m.clone()),
        }
    }
}

/// Hashable identity of a relationship endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndpointKey {
    /// A node already bound to a graph identity.
    Graph(GraphId),
    /// An uncommitted node, by merge identity or local tag.
    Node(NodeIdentity),
    /// A match pattern.
    Pattern(NodeMatch),
}

/// Merge identity of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelIdentity {
    /// Upsert identity over endpoints, type and primary key.
    Merge {
        /// Start endpoint identity.
        start: EndpointKey,
        /// End endpoint identity.
        end: EndpointKey,
        /// Relationship type.
        rel_type: String,
        /// Primary key property name.
        key: String,
        /// Primary key property value.
        value: Value,
    },
    /// Whole-object identity for relationships without a primary key.
    Local(u64),
}

/// A relationship to be written to the graph.
#[derive(Debug, Clone)]
pub struct Relationship {
    uid: u64,
    /// Start endpoint.
    pub start: Endpoint,
    /// End endpoint.
    pub end: Endpoint,
    /// Relationship type.
    pub rel_type: String,
    /// Property map, including the primary key property when merging.
    pub properties: BTreeMap<String, Value>,
    primary_key: Option<String>,
}

impl Relationship {
    /// Create a relationship from constructed attributes.
    pub fn from_attributes(
        start: Endpoint,
        rel_type: impl Into<String>,
        end: Endpoint,
        attributes: Vec<Attribute>,
        primary_key: Option<String>,
    ) -> Self {
        let properties = attributes.into_iter().map(|a| (a.key, a.value)).collect();
        Self {
            uid: next_uid(),
            start,
            end,
            rel_type: rel_type.into(),
            properties,
            primary_key,
        }
    }

    /// The process-unique ephemeral tag of this relationship.
    pub fn uid(&self) -> u64 {
        self.uid
    }

    /// True if this relationship is a merge target.
    pub fn is_merge(&self) -> bool {
        self.primary_key.is_some()
    }

    /// The primary key property name, if merging.
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// The primary key property value, if merging.
    pub fn primary_value(&self) -> Option<&Value> {
        self.primary_key
            .as_ref()
            .and_then(|k| self.properties.get(k))
    }

    /// The merge identity of this relationship.
    pub fn identity(&self) -> RelIdentity {
        match (self.primary_key(), self.primary_value()) {
            (Some(key), Some(value)) => RelIdentity::Merge {
                start: self.start.identity_key(),
                end: self.end.identity_key(),
                rel_type: self.rel_type.clone(),
                key: key.to_string(),
                value: value.clone(),
            },
            _ => RelIdentity::Local(self.uid),
        }
    }

    /// Fold another relationship's properties into this one.
    pub fn absorb(&mut self, other: Relationship) {
        self.properties.extend(other.properties);
    }
}

/// An arbitrary collection of nodes and relationships.
///
/// Union deduplicates by merge identity and folds property maps with
/// last-writer-wins semantics; insertion order is preserved otherwise.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    nodes: Vec<Node>,
    relationships: Vec<Relationship>,
}

impl Subgraph {
    /// Create an empty subgraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a subgraph holding a single node.
    pub fn from_node(node: Node) -> Self {
        Self {
            nodes: vec![node],
            relationships: Vec::new(),
        }
    }

    /// Build a subgraph holding a single relationship.
    pub fn from_relationship(relationship: Relationship) -> Self {
        Self {
            nodes: Vec::new(),
            relationships: vec![relationship],
        }
    }

    /// The nodes in this subgraph.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The relationships in this subgraph.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// True if the subgraph holds no nodes and no relationships.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }

    /// Number of nodes plus relationships.
    pub fn len(&self) -> usize {
        self.nodes.len() + self.relationships.len()
    }

    /// Add a node, merging it into an identity-equal node if one exists.
    pub fn add_node(&mut self, node: Node) {
        let identity = node.identity();
        if let NodeIdentity::Merge { .. } = identity {
            if let Some(existing) = self.nodes.iter_mut().find(|n| n.identity() == identity) {
                existing.absorb(node);
                return;
            }
        }
        self.nodes.push(node);
    }

    /// Add a relationship, merging it into an identity-equal one if present.
    pub fn add_relationship(&mut self, relationship: Relationship) {
        let identity = relationship.identity();
        if let RelIdentity::Merge { .. } = identity {
            if let Some(existing) = self
                .relationships
                .iter_mut()
                .find(|r| r.identity() == identity)
            {
                existing.absorb(relationship);
                return;
            }
        }
        self.relationships.push(relationship);
    }

    /// Union another subgraph into this one.
    pub fn union_with(&mut self, other: Subgraph) {
        for node in other.nodes {
            self.add_node(node);
        }
        for relationship in other.relationships {
            self.add_relationship(relationship);
        }
    }

    /// Union two subgraphs into a new one.
    pub fn union(mut self, other: Subgraph) -> Subgraph {
        self.union_with(other);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_node(label: &str, key: &str, value: Value) -> Node {
        Node::from_attributes(
            vec![label.to_string()],
            vec![Attribute::new(key, value)],
            Some(key.to_string()),
        )
    }

    // ==================== Node tests ====================

    #[test]
    fn test_node_uids_unique() {
        let a = Node::new(vec!["A".into()], BTreeMap::new());
        let b = Node::new(vec!["A".into()], BTreeMap::new());
        assert_ne!(a.uid(), b.uid());
    }

    #[test]
    fn test_node_merge_identity() {
        let a = merge_node("Species", "Name", Value::from("setosa"));
        let b = merge_node("Species", "Name", Value::from("setosa"));
        assert_eq!(a.identity(), b.identity());
        assert!(a.is_merge());
        assert_eq!(a.primary_label(), Some("Species"));
        assert_eq!(a.primary_value(), Some(&Value::from("setosa")));
    }

    #[test]
    fn test_node_local_identity() {
        let a = Node::new(vec!["Flower".into()], BTreeMap::new());
        let b = Node::new(vec!["Flower".into()], BTreeMap::new());
        assert_ne!(a.identity(), b.identity());
        assert!(!a.is_merge());
        assert_eq!(a.primary_label(), None);
    }

    #[test]
    fn test_clear_primary_key_downgrades() {
        let mut n = merge_node("Species", "Name", Value::from("setosa"));
        n.clear_primary_key();
        assert!(!n.is_merge());
        assert!(matches!(n.identity(), NodeIdentity::Local(_)));
        // The property itself stays.
        assert_eq!(n.properties.get("Name"), Some(&Value::from("setosa")));
    }

    #[test]
    fn test_node_absorb_last_writer_wins() {
        let mut a = Node::from_attributes(
            vec!["Species".into()],
            vec![
                Attribute::new("Name", "setosa"),
                Attribute::new("kingdom", "plant"),
            ],
            Some("Name".to_string()),
        );
        let b = Node::from_attributes(
            vec!["Species".into(), "BioEntity".into()],
            vec![
                Attribute::new("Name", "setosa"),
                Attribute::new("kingdom", "Plantae"),
            ],
            Some("Name".to_string()),
        );
        a.absorb(b);
        assert_eq!(a.properties.get("kingdom"), Some(&Value::from("Plantae")));
        assert_eq!(a.labels, vec!["Species".to_string(), "BioEntity".to_string()]);
    }

    // ==================== Subgraph tests ====================

    #[test]
    fn test_union_collapses_merge_nodes() {
        let mut sg = Subgraph::new();
        sg.add_node(merge_node("Species", "Name", Value::from("setosa")));
        sg.add_node(merge_node("Species", "Name", Value::from("setosa")));
        sg.add_node(merge_node("Species", "Name", Value::from("versicolor")));
        assert_eq!(sg.nodes().len(), 2);
    }

    #[test]
    fn test_union_keeps_local_nodes_apart() {
        let mut sg = Subgraph::new();
        sg.add_node(Node::new(vec!["Flower".into()], BTreeMap::new()));
        sg.add_node(Node::new(vec!["Flower".into()], BTreeMap::new()));
        assert_eq!(sg.nodes().len(), 2);
    }

    #[test]
    fn test_union_with_subgraph() {
        let mut a = Subgraph::from_node(merge_node("S", "k", Value::Int(1)));
        let b = Subgraph::from_node(merge_node("S", "k", Value::Int(1)));
        a.union_with(b);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_merge_relationships_collapse() {
        let start = merge_node("A", "k", Value::Int(1));
        let end = merge_node("B", "k", Value::Int(2));
        let r1 = Relationship::from_attributes(
            Endpoint::Node(start.clone()),
            "likes",
            Endpoint::Node(end.clone()),
            vec![Attribute::new("since", 1999i64)],
            Some("since".to_string()),
        );
        let r2 = Relationship::from_attributes(
            Endpoint::Node(start),
            "likes",
            Endpoint::Node(end),
            vec![Attribute::new("since", 1999i64)],
            Some("since".to_string()),
        );
        let mut sg = Subgraph::new();
        sg.add_relationship(r1);
        sg.add_relationship(r2);
        assert_eq!(sg.relationships().len(), 1);
    }

    #[test]
    fn test_non_merge_relationships_stay_parallel() {
        let start = merge_node("A", "k", Value::Int(1));
        let end = merge_node("B", "k", Value::Int(2));
        let mk = || {
            Relationship::from_attributes(
                Endpoint::Node(start.clone()),
                "likes",
                Endpoint::Node(end.clone()),
                vec![],
                None,
            )
        };
        let mut sg = Subgraph::new();
        sg.add_relationship(mk());
        sg.add_relationship(mk());
        assert_eq!(sg.relationships().len(), 2);
    }

    #[test]
    fn test_relationship_identity_uses_endpoints() {
        let a = merge_node("A", "k", Value::Int(1));
        let b = merge_node("B", "k", Value::Int(2));
        let c = merge_node("B", "k", Value::Int(3));
        let r_ab = Relationship::from_attributes(
            Endpoint::Node(a.clone()),
            "r",
            Endpoint::Node(b),
            vec![Attribute::new("pk", 1i64)],
            Some("pk".to_string()),
        );
        let r_ac = Relationship::from_attributes(
            Endpoint::Node(a),
            "r",
            Endpoint::Node(c),
            vec![Attribute::new("pk", 1i64)],
            Some("pk".to_string()),
        );
        assert_ne!(r_ab.identity(), r_ac.identity());
    }

    #[test]
    fn test_match_pattern_equality() {
        let mut conds = BTreeMap::new();
        conds.insert("Name".to_string(), Value::from("setosa"));
        let a = NodeMatch::new(vec!["Species".into()], conds.clone());
        let b = NodeMatch::new(vec!["Species".into()], conds);
        assert_eq!(a, b);
    }
}
