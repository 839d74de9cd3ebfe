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

//! Engine error taxonomy.
//!
//! Schema and configuration errors are fatal before any work starts.
//! Resource-access errors and exhausted write retries halt the engine with
//! the checkpoint preserved, so the run can be resumed after the operator
//! fixes the wrapper, the data or the database.

use crate::phase::Phase;
use relgraph_core::{ConstructError, SchemaError};
use relgraph_neo4j::{GraphError, WriteError};
use thiserror::Error;

/// An invalid engine configuration.
#[derive(Debug, Clone, Error)]
#[error("configuration error: {message}")]
pub struct ConfigError {
    /// What is wrong.
    pub message: String,
}

impl ConfigError {
    /// Create a new configuration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An error that stopped a conversion run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The schema failed to parse or compile.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The graph database was not reachable at engine construction.
    #[error("graph connection failed: {0}")]
    Connection(GraphError),

    /// A user wrapper or a resource accessor failed on a specific
    /// resource. The enclosing batch was not committed.
    #[error("resource access error: {0}")]
    ResourceAccess(#[from] ConstructError),

    /// A batch could not be committed; the checkpoint is preserved and the
    /// engine halted.
    #[error("conversion failed: batch {batch} in {phase} phase: {source}")]
    ConversionFailed {
        /// The phase the batch belonged to.
        phase: Phase,
        /// The failed batch index.
        batch: usize,
        /// The underlying write failure.
        source: WriteError,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new("workers must be at least 1");
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn test_conversion_failed_display() {
        let err = EngineError::ConversionFailed {
            phase: Phase::Nodes,
            batch: 3,
            source: WriteError::Graph(GraphError::fatal("boom")),
        };
        let msg = err.to_string();
        assert!(msg.contains("batch 3"));
        assert!(msg.contains("nodes"));
    }

    #[test]
    fn test_from_schema_error() {
        let err: EngineError = SchemaError::parse("bad", 1).into();
        assert!(matches!(err, EngineError::Schema(_)));
    }
}
