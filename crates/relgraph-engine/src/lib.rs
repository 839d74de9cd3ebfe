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

//! Two-phase parallel execution engine for relgraph conversions.
//!
//! The [`Converter`] compiles a conversion schema once, then traverses the
//! resource iterator twice: the node phase commits every node sub-plan, the
//! relationship phase re-runs node sub-plans to rebuild local identifiers
//! and commits the relationship sub-plans. Work is batched; batches are the
//! unit of commit, retry and resume.
//!
//! ```
//! use relgraph_core::{RecordResource, VecIterator};
//! use relgraph_engine::{Converter, ConverterConfig};
//! use relgraph_neo4j::MemoryGraph;
//! use std::sync::Arc;
//!
//! let schema = r#"
//! ENTITY("Flower"):
//!     NODE("Species") species:
//!         + Name = Flower.species
//! "#;
//! let rows = vec![RecordResource::new("Flower").with("species", "setosa")];
//! let graph = MemoryGraph::new();
//! let converter = Converter::new(
//!     schema,
//!     Box::new(VecIterator::new(rows)),
//!     Arc::new(graph.clone()),
//!     ConverterConfig::serialised(),
//! )
//! .unwrap();
//! converter.run().unwrap();
//! assert_eq!(graph.node_count(), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod batcher;
mod cancel;
mod checkpoint;
mod config;
mod converter;
mod error;
mod handles;
mod phase;
mod progress;

pub use cancel::CancellationToken;
pub use checkpoint::Checkpoint;
pub use config::{ConverterConfig, ConverterConfigBuilder};
pub use converter::{BatchState, ConversionStats, Converter};
pub use error::{ConfigError, EngineError, EngineResult};
pub use phase::Phase;
pub use progress::{ProgressEvent, ProgressSink};
