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

//! Progress reporting hooks.
//!
//! Display (progress bars, dashboards) is the caller's concern; the engine
//! only emits events to an optional sink callback.

use crate::converter::ConversionStats;
use crate::phase::Phase;
use std::sync::Arc;

/// An event emitted by the engine during a run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A phase is about to traverse the iterator.
    PhaseStarted {
        /// The phase.
        phase: Phase,
        /// Iterator length hint, if known.
        resources_hint: Option<usize>,
    },
    /// A batch reached the committed state.
    BatchCommitted {
        /// The phase.
        phase: Phase,
        /// The committed batch's index.
        batch_index: usize,
        /// Resources evaluated in the batch.
        resources: usize,
        /// Nodes written by the batch.
        nodes: usize,
        /// Relationships written by the batch.
        relationships: usize,
    },
    /// The run finished (successfully or cancelled).
    RunFinished {
        /// Final statistics.
        stats: ConversionStats,
    },
}

/// Callback receiving [`ProgressEvent`]s; called from worker threads.
pub type ProgressSink = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;
