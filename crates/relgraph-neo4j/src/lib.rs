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

//! Graph-write protocol for relgraph: Cypher generation, client contracts
//! and the batched writer.
//!
//! The writer consumes batch subgraphs and commits them as single
//! transactions of typed bulk operations ([`GraphOp`]): merge/create nodes,
//! resolve match patterns, merge/create relationships, in that order. Every
//! operation renders to a parameterised `UNWIND` Cypher statement for
//! driver adapters; the bundled [`MemoryGraph`] executes the operations
//! natively and serves as the reference backend.
//!
//! ```
//! use relgraph_core::{Attribute, Node, Subgraph, Value};
//! use relgraph_neo4j::{GraphWriter, MemoryGraph, WriterConfig};
//! use std::sync::Arc;
//!
//! let graph = MemoryGraph::new();
//! let writer = GraphWriter::new(Arc::new(graph.clone()), WriterConfig::default());
//!
//! let mut batch = Subgraph::new();
//! batch.add_node(Node::from_attributes(
//!     vec!["Species".to_string()],
//!     vec![Attribute::new("Name", "setosa")],
//!     Some("Name".to_string()),
//! ));
//! writer.commit_batch(&batch).unwrap();
//! assert_eq!(graph.node_count(), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod client;
pub mod cypher;
mod error;
mod memory;
mod ops;
mod writer;

pub use client::{GraphClient, GraphTransaction, OpOutcome};
pub use cypher::{CypherScript, CypherStatement, CypherValue, StatementType};
pub use error::{GraphError, GraphResult, WriteError, WriteResult};
pub use memory::{MemoryGraph, StoredNode, StoredRelationship};
pub use ops::GraphOp;
pub use writer::{CommitReceipt, GraphWriter, WriterConfig};
