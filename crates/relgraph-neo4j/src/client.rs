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

//! Graph client and transaction contracts.
//!
//! The concrete database driver is an external collaborator; the writer
//! only depends on these traits. A transaction is atomic: every executed
//! operation becomes visible on `commit` and is discarded on `rollback`.

use crate::error::GraphResult;
use crate::ops::GraphOp;
use relgraph_core::GraphId;
use std::time::Duration;

/// Result of executing one [`GraphOp`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpOutcome {
    /// Internal ids of the touched elements.
    ///
    /// For node merge/create operations the ids align with the input rows;
    /// for match operations they are the matched nodes; for relationship
    /// operations the written relationships.
    pub ids: Vec<GraphId>,
}

/// An open transaction against the graph.
pub trait GraphTransaction {
    /// Execute one bulk operation inside this transaction.
    fn execute(&mut self, op: &GraphOp) -> GraphResult<OpOutcome>;

    /// Commit everything executed so far.
    fn commit(self: Box<Self>) -> GraphResult<()>;

    /// Abort the transaction, discarding all executed operations.
    fn rollback(self: Box<Self>);
}

/// A connection to a graph database.
///
/// Implementations must be shareable across worker threads; the writer
/// serialises transactions through its commit slot, so at most one
/// transaction is open at a time.
pub trait GraphClient: Send + Sync {
    /// Open a transaction. `timeout` bounds the server-side execution
    /// time; exceeding it is reported as a transient error.
    fn begin<'a>(&'a self, timeout: Duration) -> GraphResult<Box<dyn GraphTransaction + 'a>>;

    /// Verify that the backing store is reachable.
    fn verify_connectivity(&self) -> GraphResult<()> {
        Ok(())
    }
}
