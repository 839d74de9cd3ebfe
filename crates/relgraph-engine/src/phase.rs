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

//! The two conversion phases.

/// One of the two ordered passes over the resource iterator.
///
/// The node phase must fully commit before the relationship phase starts,
/// so that relationships can match nodes created by other entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// First pass: only node sub-plans are evaluated and committed.
    Nodes,
    /// Second pass: node sub-plans are re-run to rebuild local identifiers
    /// (outputs discarded), then relationship sub-plans are committed.
    Relationships,
}

impl Phase {
    /// Stable index, used by the checkpoint.
    pub fn index(self) -> usize {
        match self {
            Self::Nodes => 0,
            Self::Relationships => 1,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nodes => write!(f, "nodes"),
            Self::Relationships => write!(f, "relationships"),
        }
    }
}
