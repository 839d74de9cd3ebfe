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

//! Core data model, schema language and factory graph for relgraph.
//!
//! This crate hosts everything that is independent of a concrete graph
//! database and of the execution engine:
//!
//! - The scalar [`Value`] model and the graph element model
//!   ([`Node`], [`Relationship`], [`NodeMatch`], [`Subgraph`]).
//! - The [`Resource`] and [`ResourceIterator`] contracts implemented by
//!   storage adapters.
//! - The conversion schema language ([`schema`]): an indentation-structured
//!   declarative mapping from entity types to nodes and relationships,
//!   compiled once into executable entity plans.
//! - The factory graph ([`factory`]): the runtime tree of attribute, node,
//!   relationship and matcher factories, optionally wrapped by registered
//!   pre-/post-processors.
//! - The process-wide wrapper [`registry`] and the [`SharedState`] facility
//!   for cross-worker state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod elements;
mod error;
pub mod factory;
mod iterator;
pub mod registry;
mod resource;
pub mod schema;
mod state;
mod value;

pub use elements::{
    Attribute, Endpoint, EndpointKey, GraphId, Node, NodeIdentity, NodeMatch, RelIdentity,
    Relationship, Subgraph,
};
pub use error::{ConstructError, ConstructResult, SchemaError, SchemaErrorKind, SchemaResult};
pub use iterator::{IteratorChain, ResourceIterator, VecIterator};
pub use resource::{RecordResource, Resource, Supplies};
pub use state::{SharedState, GRAPH_DRIVER};
pub use value::Value;
