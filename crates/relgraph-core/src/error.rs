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

//! Error types for schema compilation and factory construction.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred while compiling a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// Malformed brackets, indentation or literal.
    Parse,
    /// Wrapper name not present in the registry.
    UnknownSymbol,
    /// Reference to an undeclared identifier, duplicate identifier,
    /// multiple primary attributes and similar logical errors.
    Semantic,
}

impl fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "SchemaParseError"),
            Self::UnknownSymbol => write!(f, "SchemaUnknownSymbol"),
            Self::Semantic => write!(f, "SchemaSemanticError"),
        }
    }
}

/// An error raised while parsing or compiling a conversion schema.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}: {message}")]
pub struct SchemaError {
    /// The kind of error.
    pub kind: SchemaErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based, 0 when unknown).
    pub line: usize,
    /// Column number (1-based, optional).
    pub column: Option<usize>,
    /// Additional context (e.g. "in entity 'Flower'").
    pub context: Option<String>,
}

impl SchemaError {
    /// Create a new error.
    pub fn new(kind: SchemaErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column: None,
            context: None,
        }
    }

    /// Add column information.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        Self::new(SchemaErrorKind::Parse, message, line)
    }

    /// Create an unknown-symbol error.
    pub fn unknown_symbol(message: impl Into<String>, line: usize) -> Self {
        Self::new(SchemaErrorKind::UnknownSymbol, message, line)
    }

    /// Create a semantic error.
    pub fn semantic(message: impl Into<String>, line: usize) -> Self {
        Self::new(SchemaErrorKind::Semantic, message, line)
    }
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// An error raised while constructing graph elements from a resource.
///
/// These surface as resource-access failures: the enclosing batch is not
/// committed and the engine halts so the operator can fix the wrapper or
/// the data and resume.
#[derive(Debug, Clone, Error)]
pub enum ConstructError {
    /// The resource does not expose a requested attribute.
    #[error("attribute '{attribute}' is missing on entity of type '{entity_type}'")]
    MissingAttribute {
        /// Entity type of the offending resource.
        entity_type: String,
        /// The attribute that was requested.
        attribute: String,
    },

    /// A user wrapper failed.
    #[error("wrapper '{name}' failed: {message}")]
    Wrapper {
        /// Registered wrapper name.
        name: String,
        /// Failure description from the wrapper body.
        message: String,
    },

    /// Any other construction failure.
    #[error("{0}")]
    Other(String),
}

impl ConstructError {
    /// Create a wrapper failure error.
    pub fn wrapper(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Wrapper {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a generic construction error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Result type for factory construction.
pub type ConstructResult<T> = Result<T, ConstructError>;
