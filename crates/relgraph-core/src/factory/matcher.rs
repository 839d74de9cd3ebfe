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

//! Relationship endpoint matchers.
//!
//! A matcher resolves one side of a relationship: either a node produced
//! earlier in the same resource's plan (by local identifier), or a pattern
//! over existing graph nodes (resolved in bulk by the writer at commit
//! time).

use crate::elements::{Node, NodeMatch};
use crate::error::ConstructResult;
use crate::factory::attribute::AttributeFactory;
use crate::resource::{Resource, Supplies};
use std::collections::BTreeMap;
use tracing::debug;

/// One endpoint matcher of a relationship factory.
pub enum Matcher {
    /// Look up a node under a local identifier in the resource supplies.
    Identifier(String),
    /// Match existing graph nodes by labels and property conditions.
    Pattern {
        /// Label expressions.
        labels: Vec<AttributeFactory>,
        /// Condition expressions; the attribute key is the property name.
        conditions: Vec<AttributeFactory>,
    },
}

/// The resolved endpoints for one side of a relationship.
#[derive(Debug, Clone)]
pub enum MatchedEndpoints {
    /// Concrete nodes known in this resource's plan.
    Nodes(Vec<Node>),
    /// A pattern the writer resolves against the graph.
    Pattern(NodeMatch),
    /// Nothing matched; the relationship is skipped.
    Empty,
}

impl Matcher {
    /// Resolve this matcher against the current resource.
    pub fn resolve(
        &self,
        resource: &mut dyn Resource,
        supplies: &mut Supplies,
    ) -> ConstructResult<MatchedEndpoints> {
        match self {
            Self::Identifier(name) => match supplies.node(name) {
                Some(node) => Ok(MatchedEndpoints::Nodes(vec![node.clone()])),
                None => {
                    // The identified node was skipped for this resource;
                    // the relationship is silently dropped.
                    debug!(identifier = name.as_str(), "identifier not supplied; skipping");
                    Ok(MatchedEndpoints::Empty)
                }
            },
            Self::Pattern { labels, conditions } => {
                let mut resolved_conditions = BTreeMap::new();
                let mut skipped = 0usize;
                for condition in conditions {
                    match condition.construct(resource, supplies)? {
                        Some(attr) => {
                            resolved_conditions.insert(attr.key, attr.value);
                        }
                        None => skipped += 1,
                    }
                }
                // All configured conditions were skipped by wrappers: match
                // nothing rather than everything.
                if resolved_conditions.is_empty() && skipped > 0 {
                    return Ok(MatchedEndpoints::Empty);
                }

                let mut resolved_labels = Vec::new();
                for label in labels {
                    if let Some(attr) = label.construct(resource, supplies)? {
                        if !attr.value.is_null() {
                            resolved_labels.push(attr.value.to_string());
                        }
                    }
                }
                if resolved_labels.is_empty() && resolved_conditions.is_empty() {
                    return Ok(MatchedEndpoints::Empty);
                }

                Ok(MatchedEndpoints::Pattern(NodeMatch::new(
                    resolved_labels,
                    resolved_conditions,
                )))
            }
        }
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(name) => write!(f, "Identifier({})", name),
            Self::Pattern { labels, conditions } => {
                write!(f, "Pattern({} labels, {} conditions)", labels.len(), conditions.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Decision;
    use crate::resource::RecordResource;
    use crate::value::Value;
    use std::sync::Arc;

    fn ctx() -> (RecordResource, Supplies) {
        (
            RecordResource::new("Person").with("FavoriteFlower", "setosa"),
            Supplies::new(),
        )
    }

    #[test]
    fn test_identifier_hit() {
        let (mut r, mut s) = ctx();
        let node = Node::new(vec!["Person".to_string()], BTreeMap::new());
        let uid = node.uid();
        s.put_node("person", node);

        let matcher = Matcher::Identifier("person".to_string());
        match matcher.resolve(&mut r, &mut s).unwrap() {
            MatchedEndpoints::Nodes(nodes) => {
                assert_eq!(nodes.len(), 1);
                assert_eq!(nodes[0].uid(), uid);
            }
            other => panic!("expected nodes, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_miss_is_silent() {
        let (mut r, mut s) = ctx();
        let matcher = Matcher::Identifier("absent".to_string());
        assert!(matches!(
            matcher.resolve(&mut r, &mut s).unwrap(),
            MatchedEndpoints::Empty
        ));
    }

    #[test]
    fn test_pattern_resolution() {
        let (mut r, mut s) = ctx();
        let matcher = Matcher::Pattern {
            labels: vec![AttributeFactory::Static {
                key: String::new(),
                value: Value::from("Species"),
            }],
            conditions: vec![AttributeFactory::Dynamic {
                key: "Name".to_string(),
                entity_attr: "FavoriteFlower".to_string(),
            }],
        };
        match matcher.resolve(&mut r, &mut s).unwrap() {
            MatchedEndpoints::Pattern(pattern) => {
                assert_eq!(pattern.labels, vec!["Species".to_string()]);
                assert_eq!(
                    pattern.conditions.get("Name"),
                    Some(&Value::from("setosa"))
                );
            }
            other => panic!("expected pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_all_conditions_skipped_matches_nothing() {
        let (mut r, mut s) = ctx();
        let matcher = Matcher::Pattern {
            labels: vec![AttributeFactory::Static {
                key: String::new(),
                value: Value::from("Species"),
            }],
            conditions: vec![AttributeFactory::Wrapped {
                name: "SKIP".to_string(),
                inner: Box::new(AttributeFactory::Static {
                    key: "Name".to_string(),
                    value: Value::from("x"),
                }),
                pre: Some(Arc::new(|_, _, _| Ok(Decision::Skip))),
                post: None,
                args: vec![],
            }],
        };
        assert!(matches!(
            matcher.resolve(&mut r, &mut s).unwrap(),
            MatchedEndpoints::Empty
        ));
    }

    #[test]
    fn test_label_only_pattern() {
        let (mut r, mut s) = ctx();
        let matcher = Matcher::Pattern {
            labels: vec![AttributeFactory::Static {
                key: String::new(),
                value: Value::from("Species"),
            }],
            conditions: vec![],
        };
        match matcher.resolve(&mut r, &mut s).unwrap() {
            MatchedEndpoints::Pattern(pattern) => {
                assert!(pattern.conditions.is_empty());
            }
            other => panic!("expected pattern, got {:?}", other),
        }
    }
}
