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

//! Error types for graph clients and the batch writer.

use thiserror::Error;

/// An error reported by a graph client.
///
/// Transient errors (timeouts, lost connections, transient server states)
/// are retried by the writer with bounded backoff; fatal errors are not.
#[derive(Debug, Clone, Error)]
pub enum GraphError {
    /// A retryable failure.
    #[error("transient graph error: {0}")]
    Transient(String),

    /// A non-retryable failure.
    #[error("graph error: {0}")]
    Fatal(String),

    /// An identifier that cannot be used in Cypher.
    #[error("invalid Cypher identifier: '{0}'")]
    InvalidIdentifier(String),
}

impl GraphError {
    /// True when the writer should retry this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Create a transient error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient(message.into())
    }

    /// Create a fatal error.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal(message.into())
    }
}

/// Result type for graph client operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// A batch write that could not be completed.
#[derive(Debug, Clone, Error)]
pub enum WriteError {
    /// Retries were exhausted on a transient error.
    #[error("conversion failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Number of attempts made (initial try plus retries).
        attempts: u32,
        /// The last error observed.
        source: GraphError,
    },

    /// A non-retryable graph error.
    #[error("conversion failed: {0}")]
    Graph(#[from] GraphError),
}

/// Result type for writer operations.
pub type WriteResult<T> = Result<T, WriteError>;
