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

//! Typed AST for the conversion schema language.

use crate::value::Value;

/// A value expression on the right-hand side of an attribute line, inside a
/// label list, or as a wrapper argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    /// A literal scalar.
    Literal(Value),
    /// A dynamic read from the current resource: `Entity.attribute`.
    EntityAttr {
        /// The entity qualifier (informational; reads go to the current
        /// resource).
        entity: String,
        /// The attribute key to read.
        attr: String,
    },
    /// A wrapper call around an inner expression: `NAME(expr, args...)`.
    Call {
        /// The wrapper name, resolved against the registry at compile time.
        name: String,
        /// Arguments; the first is the wrapped expression, the rest are
        /// static literals.
        args: Vec<ValueExpr>,
        /// Source line of the call, for error reporting.
        line: usize,
    },
}

/// One attribute line: `- name = expr` or `+ name = expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrSpec {
    /// The property key.
    pub name: String,
    /// The value expression.
    pub value: ValueExpr,
    /// True when declared with `+` (merge key).
    pub primary: bool,
    /// Source line.
    pub line: usize,
}

/// A wrapper application around a node or relationship block.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperSpec {
    /// Registered wrapper name.
    pub name: String,
    /// Static arguments.
    pub args: Vec<ValueExpr>,
    /// Source line.
    pub line: usize,
}

/// A relationship endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointSpec {
    /// Reference to a node declared above under a local identifier.
    Identifier(String),
    /// `MATCH(labels..., key = expr, ...)` against existing graph nodes.
    Match {
        /// Label expressions.
        labels: Vec<ValueExpr>,
        /// Property equality conditions.
        conditions: Vec<(String, ValueExpr)>,
    },
}

/// A `NODE(...)` block.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    /// Label expressions, in order; the first is the primary label.
    pub labels: Vec<ValueExpr>,
    /// Optional local identifier for relationship references.
    pub identifier: Option<String>,
    /// Attribute lines, in order.
    pub attrs: Vec<AttrSpec>,
    /// Wrapper applications, outermost first.
    pub wrappers: Vec<WrapperSpec>,
    /// Source line of the block header.
    pub line: usize,
}

/// A `RELATIONSHIP(...)` block.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipSpec {
    /// Start endpoint.
    pub start: EndpointSpec,
    /// Relationship type expression.
    pub rel_type: ValueExpr,
    /// End endpoint.
    pub end: EndpointSpec,
    /// Attribute lines, in order.
    pub attrs: Vec<AttrSpec>,
    /// Wrapper applications, outermost first.
    pub wrappers: Vec<WrapperSpec>,
    /// Source line of the block header.
    pub line: usize,
}

/// A sub-block of an entity: either a node or a relationship, in textual
/// order.
#[derive(Debug, Clone, PartialEq)]
pub enum SubBlock {
    /// A node block.
    Node(NodeSpec),
    /// A relationship block.
    Relationship(RelationshipSpec),
}

/// An `ENTITY("Type"):` block.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    /// The entity type this plan applies to.
    pub entity_type: String,
    /// Sub-blocks in textual order.
    pub blocks: Vec<SubBlock>,
    /// Source line of the header.
    pub line: usize,
}

/// A parsed schema document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaAst {
    /// The entity blocks, in textual order.
    pub entities: Vec<EntitySpec>,
}
