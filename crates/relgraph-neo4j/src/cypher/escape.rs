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

//! Escaping rules for Cypher identifiers, labels, relationship types and
//! string literals.
//!
//! Simple identifiers (alphanumerics and underscores, not starting with a
//! digit) are emitted as-is; anything else is wrapped in backticks with
//! backticks doubled. Control characters are rejected outright since no
//! quoting makes them safe.

use crate::error::{GraphError, GraphResult};

/// True when the identifier can appear unquoted in Cypher.
pub fn is_safe_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escape an identifier (property key, variable name).
pub fn escape_identifier(identifier: &str) -> GraphResult<String> {
    if identifier.is_empty() {
        return Err(GraphError::InvalidIdentifier(identifier.to_string()));
    }
    if identifier.chars().any(char::is_control) {
        return Err(GraphError::InvalidIdentifier(identifier.to_string()));
    }
    if is_safe_identifier(identifier) {
        Ok(identifier.to_string())
    } else {
        Ok(format!("`{}`", identifier.replace('`', "``")))
    }
}

/// Escape a node label.
pub fn escape_label(label: &str) -> GraphResult<String> {
    escape_identifier(label)
}

/// Escape a relationship type.
pub fn escape_relationship_type(rel_type: &str) -> GraphResult<String> {
    escape_identifier(rel_type)
}

/// Render a label set as a `:A:B` suffix.
pub fn label_string(labels: &[String]) -> GraphResult<String> {
    let mut out = String::new();
    for label in labels {
        out.push(':');
        out.push_str(&escape_label(label)?);
    }
    Ok(out)
}

/// Quote a string literal in single quotes, escaping backslashes and
/// quotes.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
