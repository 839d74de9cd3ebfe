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

//! A unified error type over the relgraph crates.

use relgraph_core::{ConstructError, SchemaError};
use relgraph_engine::{ConfigError, EngineError};
use relgraph_neo4j::{GraphError, WriteError};
use thiserror::Error;

/// Any error from the relgraph crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema parsing or compilation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Factory construction failed on a resource.
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// Engine configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The graph client reported an error.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A batch write failed.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// The engine halted.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type using the unified [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: Error = SchemaError::parse("bad", 1).into();
        assert!(matches!(err, Error::Schema(_)));

        let err: Error = GraphError::transient("timeout").into();
        assert!(matches!(err, Error::Graph(_)));

        let err: Error = EngineError::Config(ConfigError::new("x")).into();
        assert!(matches!(err, Error::Engine(_)));
    }
}
