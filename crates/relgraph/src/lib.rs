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

//! # Relgraph - Relational Data to Property Graph Conversion
//!
//! Relgraph converts rows of relational data (tables, data frames, query
//! results) into a Neo4j property graph, driven by a declarative conversion
//! schema. The schema names which entity types become which nodes and
//! relationships, how attributes are projected, which attribute is the
//! merge key, and how to match pre-existing graph nodes by pattern.
//!
//! ## Quick Start
//!
//! ```rust
//! use relgraph::{Converter, ConverterConfig, MemoryGraph, RecordResource, VecIterator};
//! use std::sync::Arc;
//!
//! let schema = r#"
//! ENTITY("Flower"):
//!     NODE("Flower") flower:
//!         - sepal_length = Flower.sepal_length
//!     NODE("Species", "BioEntity") species:
//!         + Name = Flower.species
//!     RELATIONSHIP(flower, "is", species):
//! "#;
//!
//! let rows = vec![
//!     RecordResource::new("Flower")
//!         .with("sepal_length", 5.1)
//!         .with("species", "setosa"),
//!     RecordResource::new("Flower")
//!         .with("sepal_length", 4.9)
//!         .with("species", "setosa"),
//! ];
//!
//! let graph = MemoryGraph::new();
//! let converter = Converter::new(
//!     schema,
//!     Box::new(VecIterator::new(rows)),
//!     Arc::new(graph.clone()),
//!     ConverterConfig::serialised(),
//! )
//! .unwrap();
//! converter.run().unwrap();
//!
//! // Two flowers, one merged species, two "is" relationships.
//! assert_eq!(graph.nodes_with_label("Flower").len(), 2);
//! assert_eq!(graph.nodes_with_label("Species").len(), 1);
//! assert_eq!(graph.relationship_count(), 2);
//! ```
//!
//! ## Crates
//!
//! - [`relgraph_core`]: data model, schema language, factory graph,
//!   wrapper registry and shared state.
//! - [`relgraph_neo4j`]: Cypher generation, graph client contracts, the
//!   batched writer and the in-memory reference graph.
//! - [`relgraph_engine`]: the two-phase, batched, parallel engine.
//!
//! This crate re-exports the public surface of all three, plus a unified
//! [`Error`] type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;

pub use error::{Error, Result};

// Core: values, graph elements, contracts, schema, registry, state.
pub use relgraph_core::{
    factory, registry, schema, Attribute, ConstructError, ConstructResult, Endpoint, EndpointKey,
    GraphId, IteratorChain, Node, NodeIdentity, NodeMatch, RecordResource, RelIdentity,
    Relationship, Resource, ResourceIterator, SchemaError, SchemaErrorKind, SchemaResult,
    SharedState, Subgraph, Supplies, Value, VecIterator, GRAPH_DRIVER,
};

// Neo4j: client contracts, writer, cypher model, reference backend.
pub use relgraph_neo4j::{
    cypher, CommitReceipt, CypherScript, CypherStatement, CypherValue, GraphClient, GraphError,
    GraphOp, GraphResult, GraphTransaction, GraphWriter, MemoryGraph, OpOutcome, StatementType,
    StoredNode, StoredRelationship, WriteError, WriteResult, WriterConfig,
};

// Engine: converter, configuration, progress, cancellation.
pub use relgraph_engine::{
    BatchState, CancellationToken, Checkpoint, ConfigError, ConversionStats, Converter,
    ConverterConfig, ConverterConfigBuilder, EngineError, EngineResult, Phase, ProgressEvent,
    ProgressSink,
};
