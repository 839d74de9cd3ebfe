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

//! The conversion engine: a two-phase, batched, parallel pipeline from a
//! resource iterator into the graph.
//!
//! Phase ordering is a strict barrier: every node batch commits before the
//! first relationship batch is dispatched, so relationships can match nodes
//! created by other entity types. Within the relationship phase, node
//! sub-plans are re-run per resource to rebuild local identifiers and
//! supplies; their outputs are bound to the node handles recorded during
//! the node phase instead of being committed again.

use crate::batcher::{Batch, Batcher};
use crate::cancel::CancellationToken;
use crate::checkpoint::Checkpoint;
use crate::config::ConverterConfig;
use crate::error::{ConfigError, EngineError, EngineResult};
use crate::handles::NodeHandleStore;
use crate::phase::Phase;
use crate::progress::ProgressEvent;
use parking_lot::Mutex;
use rayon::iter::{ParallelBridge, ParallelIterator};
use relgraph_core::schema::{compile_schema, CompiledSchema, EntityPlan};
use relgraph_core::{
    NodeIdentity, Resource, ResourceIterator, SharedState, Subgraph, Supplies, GRAPH_DRIVER,
};
use relgraph_neo4j::{GraphClient, GraphWriter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Lifecycle of one batch, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Not yet claimed by a worker.
    Pending,
    /// Claimed by a worker.
    Claimed,
    /// Subgraphs are being built from the batch's resources.
    Building,
    /// Handed to the writer.
    Writing,
    /// Transaction acknowledged.
    Committed,
    /// Transient write error; the writer is backing off.
    Retry,
    /// Retries exhausted or fatal error.
    Failed,
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Building => "building",
            Self::Writing => "writing",
            Self::Committed => "committed",
            Self::Retry => "retry",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Counters reported after a run.
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    /// Resources evaluated across both phases.
    pub resources_processed: usize,
    /// Nodes written to the graph.
    pub nodes_written: usize,
    /// Relationships written to the graph.
    pub relationships_written: usize,
    /// Batches committed across both phases.
    pub batches_committed: usize,
    /// True when the run stopped due to cancellation.
    pub cancelled: bool,
}

#[derive(Default)]
struct StatCounters {
    resources: AtomicUsize,
    nodes: AtomicUsize,
    relationships: AtomicUsize,
    batches: AtomicUsize,
}

impl StatCounters {
    fn record(&self, resources: usize, nodes: usize, relationships: usize) {
        self.resources.fetch_add(resources, Ordering::Relaxed);
        self.nodes.fetch_add(nodes, Ordering::Relaxed);
        self.relationships.fetch_add(relationships, Ordering::Relaxed);
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, cancelled: bool) -> ConversionStats {
        ConversionStats {
            resources_processed: self.resources.load(Ordering::Relaxed),
            nodes_written: self.nodes.load(Ordering::Relaxed),
            relationships_written: self.relationships.load(Ordering::Relaxed),
            batches_committed: self.batches.load(Ordering::Relaxed),
            cancelled,
        }
    }
}

/// Drives a full conversion: compiled schema, resource iterator, writer.
pub struct Converter {
    schema: Arc<CompiledSchema>,
    iterator: Mutex<Box<dyn ResourceIterator>>,
    client: Arc<dyn GraphClient>,
    writer: GraphWriter,
    config: ConverterConfig,
    checkpoint: Checkpoint,
    handles: NodeHandleStore,
    cancel: CancellationToken,
}

impl Converter {
    /// Compile the schema and set up the engine.
    ///
    /// Fails fast on schema errors, configuration errors and unreachable
    /// graph stores; no conversion work happens here.
    pub fn new(
        schema: &str,
        iterator: Box<dyn ResourceIterator>,
        client: Arc<dyn GraphClient>,
        config: ConverterConfig,
    ) -> EngineResult<Self> {
        config.validate()?;
        let schema = Arc::new(compile_schema(schema)?);
        client
            .verify_connectivity()
            .map_err(EngineError::Connection)?;
        let writer = GraphWriter::new(Arc::clone(&client), config.writer_config());
        Ok(Self {
            schema,
            iterator: Mutex::new(iterator),
            client,
            writer,
            config,
            checkpoint: Checkpoint::new(),
            handles: NodeHandleStore::new(),
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the resource iterator. Clears the checkpoint.
    pub fn set_iterator(&mut self, iterator: Box<dyn ResourceIterator>) {
        self.iterator = Mutex::new(iterator);
        self.checkpoint.clear();
        self.handles.clear();
    }

    /// Recompile the schema from new text. Clears the checkpoint.
    pub fn reload_schema(&mut self, schema: &str) -> EngineResult<()> {
        self.schema = Arc::new(compile_schema(schema)?);
        self.checkpoint.clear();
        self.handles.clear();
        Ok(())
    }

    /// A token external code can use to cancel the run cooperatively.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The checkpoint (committed batch indices per phase).
    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    /// Run the conversion: node phase, then relationship phase.
    ///
    /// On failure or cancellation the checkpoint is preserved; invoking
    /// `run` again resumes by skipping committed batches.
    pub fn run(&self) -> EngineResult<ConversionStats> {
        self.cancel.reset();
        // Wrapper bodies reach the driver through the shared-state slot.
        SharedState::set(GRAPH_DRIVER, Arc::new(Arc::clone(&self.client)));

        let stats = StatCounters::default();
        for phase in [Phase::Nodes, Phase::Relationships] {
            if self.cancel.is_cancelled() {
                break;
            }
            self.run_phase(phase, &stats)?;
        }

        let stats = stats.snapshot(self.cancel.is_cancelled());
        info!(
            resources = stats.resources_processed,
            nodes = stats.nodes_written,
            relationships = stats.relationships_written,
            cancelled = stats.cancelled,
            "conversion finished"
        );
        self.emit(ProgressEvent::RunFinished {
            stats: stats.clone(),
        });
        Ok(stats)
    }

    fn run_phase(&self, phase: Phase, stats: &StatCounters) -> EngineResult<()> {
        let resources_hint = {
            let mut iterator = self.iterator.lock();
            iterator.reset_to_first();
            iterator.len_hint()
        };
        info!(phase = %phase, "starting phase");
        self.emit(ProgressEvent::PhaseStarted {
            phase,
            resources_hint,
        });

        let (workers, batch_size) = if self.config.parallel {
            (self.config.workers, self.config.batch_size)
        } else {
            // Serialised mode: strict iterator order.
            (1, 1)
        };
        let batcher = Batcher::new(&self.iterator, batch_size);

        if workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| ConfigError::new(format!("worker pool: {}", e)))?;
            pool.install(|| {
                batcher
                    .par_bridge()
                    .try_for_each(|batch| self.process_batch(phase, batch, stats))
            })?;
        } else {
            for batch in batcher {
                self.process_batch(phase, batch, stats)?;
            }
        }

        info!(
            phase = %phase,
            batches = self.checkpoint.committed_count(phase),
            "phase drained"
        );
        Ok(())
    }

    fn process_batch(&self, phase: Phase, batch: Batch, stats: &StatCounters) -> EngineResult<()> {
        let index = batch.index;
        if self.checkpoint.is_committed(phase, index) {
            debug!(batch = index, phase = %phase, "batch already committed; skipping");
            return Ok(());
        }
        if self.cancel.is_cancelled() {
            return Ok(());
        }
        debug!(batch = index, phase = %phase, state = %BatchState::Building, "batch claimed");

        let mut subgraph = Subgraph::new();
        let mut ident_records: Vec<(u64, String, NodeIdentity)> = Vec::new();
        let mut resources = 0usize;

        for (ordinal, mut resource) in batch.resources {
            if self.cancel.is_cancelled() {
                debug!(batch = index, "cancelled mid-build; abandoning batch");
                return Ok(());
            }
            let Some(plan) = self.schema.plan(resource.entity_type()) else {
                continue;
            };
            let contributed = match phase {
                Phase::Nodes => {
                    self.build_nodes(plan, ordinal, resource.as_mut(), &mut subgraph, &mut ident_records)?
                }
                Phase::Relationships => {
                    self.build_relationships(plan, ordinal, resource.as_mut(), &mut subgraph)?
                }
            };
            if contributed {
                resources += 1;
            }
        }

        debug!(batch = index, phase = %phase, state = %BatchState::Writing, size = subgraph.len(), "batch built");
        let receipt = self.writer.commit_batch(&subgraph).map_err(|source| {
            self.cancel.cancel();
            debug!(batch = index, phase = %phase, state = %BatchState::Failed, "batch failed");
            EngineError::ConversionFailed {
                phase,
                batch: index,
                source,
            }
        })?;

        if phase == Phase::Nodes {
            for (ordinal, identifier, identity) in ident_records {
                if let Some(id) = receipt.handles.get(&identity) {
                    self.handles.record(ordinal, &identifier, *id);
                }
            }
        }

        self.checkpoint.mark_committed(phase, index);
        stats.record(resources, receipt.nodes_written, receipt.relationships_written);
        debug!(batch = index, phase = %phase, state = %BatchState::Committed, "batch committed");
        self.emit(ProgressEvent::BatchCommitted {
            phase,
            batch_index: index,
            resources,
            nodes: receipt.nodes_written,
            relationships: receipt.relationships_written,
        });
        Ok(())
    }

    fn build_nodes(
        &self,
        plan: &EntityPlan,
        ordinal: u64,
        resource: &mut dyn Resource,
        subgraph: &mut Subgraph,
        ident_records: &mut Vec<(u64, String, NodeIdentity)>,
    ) -> EngineResult<bool> {
        if plan.nodes.is_empty() {
            return Ok(false);
        }
        let mut supplies = Supplies::new();
        let product = plan
            .nodes
            .construct(resource, &mut supplies)
            .map_err(|e| self.fail_resource(e))?;
        for (identifier, node) in supplies.nodes() {
            ident_records.push((ordinal, identifier.to_string(), node.identity()));
        }
        subgraph.union_with(product);
        Ok(true)
    }

    fn build_relationships(
        &self,
        plan: &EntityPlan,
        ordinal: u64,
        resource: &mut dyn Resource,
        subgraph: &mut Subgraph,
    ) -> EngineResult<bool> {
        if plan.relationships.is_empty() {
            return Ok(false);
        }
        let mut supplies = Supplies::new();
        if !plan.nodes.is_empty() {
            // Re-run the node sub-plans only to rebuild identifiers and
            // supplies; the product is not committed.
            plan.nodes
                .construct(resource, &mut supplies)
                .map_err(|e| self.fail_resource(e))?;
            let identifiers: Vec<String> =
                supplies.nodes().map(|(name, _)| name.to_string()).collect();
            for identifier in identifiers {
                if let Some(id) = self.handles.lookup(ordinal, &identifier) {
                    if let Some(node) = supplies.node_mut(&identifier) {
                        node.graph_id = Some(id);
                    }
                }
            }
        }
        let product = plan
            .relationships
            .construct(resource, &mut supplies)
            .map_err(|e| self.fail_resource(e))?;
        subgraph.union_with(product);
        Ok(true)
    }

    fn fail_resource(&self, error: relgraph_core::ConstructError) -> EngineError {
        self.cancel.cancel();
        EngineError::ResourceAccess(error)
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sink) = &self.config.progress_sink {
            sink(&event);
        }
    }
}
