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

//! Per-phase commit checkpointing.
//!
//! The engine records which batch indices committed successfully. On
//! re-invocation with the same iterator, committed batches are skipped;
//! replacing the iterator or reloading the schema clears the record.

use crate::phase::Phase;
use parking_lot::Mutex;
use std::collections::HashSet;

/// The set of committed batch indices, per phase.
#[derive(Debug, Default)]
pub struct Checkpoint {
    committed: Mutex<[HashSet<usize>; 2]>,
}

impl Checkpoint {
    /// Create an empty checkpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the batch already committed in a previous invocation.
    pub fn is_committed(&self, phase: Phase, batch_index: usize) -> bool {
        self.committed.lock()[phase.index()].contains(&batch_index)
    }

    /// Record a committed batch.
    pub fn mark_committed(&self, phase: Phase, batch_index: usize) {
        self.committed.lock()[phase.index()].insert(batch_index);
    }

    /// Number of committed batches in a phase.
    pub fn committed_count(&self, phase: Phase) -> usize {
        self.committed.lock()[phase.index()].len()
    }

    /// Forget everything (iterator replaced or schema reloaded).
    pub fn clear(&self) {
        let mut committed = self.committed.lock();
        committed[0].clear();
        committed[1].clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_query() {
        let cp = Checkpoint::new();
        assert!(!cp.is_committed(Phase::Nodes, 0));
        cp.mark_committed(Phase::Nodes, 0);
        assert!(cp.is_committed(Phase::Nodes, 0));
        // Phases are independent.
        assert!(!cp.is_committed(Phase::Relationships, 0));
    }

    #[test]
    fn test_clear() {
        let cp = Checkpoint::new();
        cp.mark_committed(Phase::Nodes, 1);
        cp.mark_committed(Phase::Relationships, 2);
        cp.clear();
        assert_eq!(cp.committed_count(Phase::Nodes), 0);
        assert_eq!(cp.committed_count(Phase::Relationships), 0);
    }
}
