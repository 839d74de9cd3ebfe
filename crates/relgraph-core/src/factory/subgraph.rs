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

//! Subgraph factories: nodes, relationships, supply chains and wrappers.

use crate::elements::{Attribute, Endpoint, Node, Relationship, Subgraph};
use crate::error::{ConstructError, ConstructResult};
use crate::factory::attribute::AttributeFactory;
use crate::factory::matcher::{MatchedEndpoints, Matcher};
use crate::registry::{Decision, PreprocessorFn, SubgraphPostprocessorFn, SubgraphWrapper};
use crate::resource::{Resource, Supplies};
use crate::value::Value;
use std::sync::Arc;
use tracing::warn;

/// Outcome of evaluating a list of attribute factories.
enum Attributes {
    /// All factories produced a value.
    Complete(Vec<Attribute>),
    /// A pre-processor skipped one of them; the enclosing factory must
    /// produce nothing.
    Skipped,
}

fn construct_attributes(
    factories: &[AttributeFactory],
    resource: &mut dyn Resource,
    supplies: &mut Supplies,
) -> ConstructResult<Attributes> {
    let mut attributes = Vec::with_capacity(factories.len());
    for factory in factories {
        match factory.construct(resource, supplies)? {
            Some(attribute) => attributes.push(attribute),
            None => return Ok(Attributes::Skipped),
        }
    }
    Ok(Attributes::Complete(attributes))
}

/// Evaluate label factories to label strings. Null labels are dropped; a
/// skipped label factory aborts the element.
fn construct_labels(
    factories: &[AttributeFactory],
    resource: &mut dyn Resource,
    supplies: &mut Supplies,
) -> ConstructResult<Option<Vec<String>>> {
    let mut labels = Vec::with_capacity(factories.len());
    for factory in factories {
        match factory.construct(resource, supplies)? {
            Some(attribute) => {
                if !attribute.value.is_null() {
                    labels.push(attribute.value.to_string());
                }
            }
            None => return Ok(None),
        }
    }
    Ok(Some(labels))
}

/// Factory producing one node per resource.
pub struct NodeFactory {
    /// Label factories; the first label is the primary label.
    pub labels: Vec<AttributeFactory>,
    /// Attribute factories, in declaration order.
    pub attrs: Vec<AttributeFactory>,
    /// Name of the primary (merge key) attribute, if declared.
    pub primary_key: Option<String>,
    /// Local identifier under which the node is recorded in the supplies.
    pub identifier: Option<String>,
}

impl NodeFactory {
    /// Construct the node for this resource.
    pub fn construct(
        &self,
        resource: &mut dyn Resource,
        supplies: &mut Supplies,
    ) -> ConstructResult<Subgraph> {
        let labels = match construct_labels(&self.labels, resource, supplies)? {
            Some(labels) => labels,
            None => return Ok(Subgraph::new()),
        };
        if labels.is_empty() {
            warn!(
                entity_type = resource.entity_type(),
                "node produced no labels; skipping"
            );
            return Ok(Subgraph::new());
        }

        let attributes = match construct_attributes(&self.attrs, resource, supplies)? {
            Attributes::Complete(attributes) => attributes,
            Attributes::Skipped => return Ok(Subgraph::new()),
        };

        let mut primary_key = self.primary_key.clone();
        if let Some(key) = &primary_key {
            let value = attributes.iter().find(|a| &a.key == key).map(|a| &a.value);
            if value.map_or(true, Value::is_null) {
                warn!(
                    entity_type = resource.entity_type(),
                    key = key.as_str(),
                    "primary attribute is null; creating node instead of merging"
                );
                primary_key = None;
            }
        }

        let node = Node::from_attributes(labels, attributes, primary_key);
        if let Some(identifier) = &self.identifier {
            supplies.put_node(identifier.clone(), node.clone());
        }
        Ok(Subgraph::from_node(node))
    }
}

/// Factory producing zero or more relationships per resource.
///
/// When a matcher yields several candidate nodes, one relationship is
/// produced per element of the cartesian product of the two endpoint sets.
pub struct RelationshipFactory {
    /// Start endpoint matcher.
    pub start: Matcher,
    /// Relationship type factory.
    pub rel_type: AttributeFactory,
    /// End endpoint matcher.
    pub end: Matcher,
    /// Attribute factories, in declaration order.
    pub attrs: Vec<AttributeFactory>,
    /// Name of the primary (merge key) attribute, if declared.
    pub primary_key: Option<String>,
}

impl RelationshipFactory {
    /// Construct the relationships for this resource.
    pub fn construct(
        &self,
        resource: &mut dyn Resource,
        supplies: &mut Supplies,
    ) -> ConstructResult<Subgraph> {
        let start = self.start.resolve(resource, supplies)?;
        let end = self.end.resolve(resource, supplies)?;
        let (start, end) = match (start, end) {
            (MatchedEndpoints::Empty, _) | (_, MatchedEndpoints::Empty) => {
                return Ok(Subgraph::new());
            }
            (start, end) => (start, end),
        };

        let rel_type = match self.rel_type.construct(resource, supplies)? {
            Some(attribute) if !attribute.value.is_null() => attribute.value.to_string(),
            _ => return Ok(Subgraph::new()),
        };

        let attributes = match construct_attributes(&self.attrs, resource, supplies)? {
            Attributes::Complete(attributes) => attributes,
            Attributes::Skipped => return Ok(Subgraph::new()),
        };

        let mut primary_key = self.primary_key.clone();
        if let Some(key) = &primary_key {
            let value = attributes.iter().find(|a| &a.key == key).map(|a| &a.value);
            if value.map_or(true, Value::is_null) {
                warn!(
                    rel_type = rel_type.as_str(),
                    key = key.as_str(),
                    "primary attribute is null; creating relationship instead of merging"
                );
                primary_key = None;
            }
        }

        let starts = endpoint_candidates(start);
        let ends = endpoint_candidates(end);
        let mut subgraph = Subgraph::new();
        for s in &starts {
            for e in &ends {
                subgraph.add_relationship(Relationship::from_attributes(
                    s.clone(),
                    rel_type.clone(),
                    e.clone(),
                    attributes.clone(),
                    primary_key.clone(),
                ));
            }
        }
        Ok(subgraph)
    }
}

fn endpoint_candidates(matched: MatchedEndpoints) -> Vec<Endpoint> {
    match matched {
        MatchedEndpoints::Nodes(nodes) => nodes.into_iter().map(Endpoint::Node).collect(),
        MatchedEndpoints::Pattern(pattern) => vec![Endpoint::Match(pattern)],
        MatchedEndpoints::Empty => Vec::new(),
    }
}

/// A subgraph-producing factory, optionally wrapped.
pub enum SubgraphFactory {
    /// A node block.
    Node(NodeFactory),
    /// A relationship block.
    Relationship(RelationshipFactory),
    /// Pre-/post-processor wrappers around an inner factory.
    Wrapped {
        /// Wrapper name, for diagnostics.
        name: String,
        /// The wrapped factory.
        inner: Box<SubgraphFactory>,
        /// Optional pre-processor.
        pre: Option<PreprocessorFn>,
        /// Optional post-processor.
        post: Option<SubgraphPostprocessorFn>,
        /// Static arguments from the schema.
        args: Vec<Value>,
    },
    /// A user-registered full wrapper.
    Full {
        /// The wrapper object, owning the wrapped factory.
        wrapper: Arc<dyn SubgraphWrapper>,
    },
    /// A wrapper of the wrong category was applied; the inner factory runs
    /// unchanged. Behaviour of mismatches is declared undefined.
    Mismatched {
        /// Wrapper name, for diagnostics.
        name: String,
        /// Family of the misapplied binding.
        family: &'static str,
        /// The wrapped factory.
        inner: Box<SubgraphFactory>,
    },
}

impl SubgraphFactory {
    /// Construct a subgraph from the resource.
    pub fn construct(
        &self,
        resource: &mut dyn Resource,
        supplies: &mut Supplies,
    ) -> ConstructResult<Subgraph> {
        match self {
            Self::Node(factory) => factory.construct(resource, supplies),
            Self::Relationship(factory) => factory.construct(resource, supplies),
            Self::Wrapped {
                name,
                inner,
                pre,
                post,
                args,
            } => {
                if let Some(pre) = pre {
                    if pre(resource, supplies, args)? == Decision::Skip {
                        return Ok(Subgraph::new());
                    }
                }
                let product = inner.construct(resource, supplies)?;
                match post {
                    Some(post) => post(product, supplies, args)
                        .map_err(|e| ConstructError::wrapper(name.clone(), e.to_string())),
                    None => Ok(product),
                }
            }
            Self::Full { wrapper } => wrapper.construct(resource, supplies),
            Self::Mismatched {
                name,
                family,
                inner,
            } => {
                warn!(
                    wrapper = name.as_str(),
                    family, "wrapper category mismatch on subgraph factory; passing through"
                );
                inner.construct(resource, supplies)
            }
        }
    }
}

impl std::fmt::Debug for SubgraphFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(_) => write!(f, "NodeFactory"),
            Self::Relationship(_) => write!(f, "RelationshipFactory"),
            Self::Wrapped { name, inner, .. } => write!(f, "{}({:?})", name, inner),
            Self::Full { .. } => write!(f, "FullWrapper"),
            Self::Mismatched { name, inner, .. } => write!(f, "Mismatched:{}({:?})", name, inner),
        }
    }
}

/// An ordered chain of subgraph factories, processed one after the other.
///
/// The products are unioned; nodes recorded under identifiers stay visible
/// to later factories in the chain through the supplies.
#[derive(Debug, Default)]
pub struct SupplyChain {
    /// Factories in textual order.
    pub factories: Vec<SubgraphFactory>,
}

impl SupplyChain {
    /// Create a chain from factories.
    pub fn new(factories: Vec<SubgraphFactory>) -> Self {
        Self { factories }
    }

    /// True when the chain holds no factories.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Run every factory in order and union the products.
    pub fn construct(
        &self,
        resource: &mut dyn Resource,
        supplies: &mut Supplies,
    ) -> ConstructResult<Subgraph> {
        let mut subgraph = Subgraph::new();
        for factory in &self.factories {
            let product = factory.construct(resource, supplies)?;
            subgraph.union_with(product);
        }
        Ok(subgraph)
    }
}
