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

//! Cypher statement and parameter value types.

use chrono::{NaiveDate, NaiveDateTime};
use relgraph_core::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Cypher parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CypherValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    String(String),
    /// Calendar date, rendered as `date('...')`.
    Date(NaiveDate),
    /// Date and time, rendered as `datetime('...')`.
    DateTime(NaiveDateTime),
    /// List value.
    List(Vec<CypherValue>),
    /// Map value.
    Map(BTreeMap<String, CypherValue>),
}

impl From<&Value> for CypherValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CypherValue::Null,
            Value::Bool(b) => CypherValue::Bool(*b),
            Value::Int(n) => CypherValue::Int(*n),
            Value::Float(n) => CypherValue::Float(*n),
            Value::String(s) => CypherValue::String(s.clone()),
            Value::Date(d) => CypherValue::Date(*d),
            Value::DateTime(dt) => CypherValue::DateTime(*dt),
        }
    }
}

impl From<Value> for CypherValue {
    fn from(value: Value) -> Self {
        CypherValue::from(&value)
    }
}

impl From<i64> for CypherValue {
    fn from(v: i64) -> Self {
        CypherValue::Int(v)
    }
}

impl From<&str> for CypherValue {
    fn from(v: &str) -> Self {
        CypherValue::String(v.to_string())
    }
}

impl CypherValue {
    /// Render this value as a Cypher literal.
    pub fn to_cypher_literal(&self) -> String {
        match self {
            CypherValue::Null => "null".to_string(),
            CypherValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            CypherValue::Int(n) => n.to_string(),
            CypherValue::Float(n) => {
                if n.is_nan() {
                    "0.0/0.0".to_string()
                } else if n.is_infinite() {
                    if *n > 0.0 { "1.0/0.0" } else { "-1.0/0.0" }.to_string()
                } else {
                    let s = n.to_string();
                    if s.contains('.') || s.contains('e') || s.contains('E') {
                        s
                    } else {
                        format!("{}.0", s)
                    }
                }
            }
            CypherValue::String(s) => super::escape::quote_string(s),
            CypherValue::Date(d) => format!("date('{}')", d),
            CypherValue::DateTime(dt) => format!("datetime('{}')", dt.format("%Y-%m-%dT%H:%M:%S")),
            CypherValue::List(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.to_cypher_literal()).collect();
                format!("[{}]", inner.join(", "))
            }
            CypherValue::Map(map) => {
                let pairs: Vec<String> = map
                    .iter()
                    .map(|(k, v)| {
                        let key = super::escape::escape_identifier(k)
                            .unwrap_or_else(|_| format!("`{}`", k.replace('`', "``")));
                        format!("{}: {}", key, v.to_cypher_literal())
                    })
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
        }
    }
}

/// The role of a statement inside a batch transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    /// Bulk node MERGE.
    MergeNodes,
    /// Bulk node CREATE.
    CreateNodes,
    /// Bulk node MATCH.
    MatchNodes,
    /// Bulk relationship MERGE.
    MergeRelationships,
    /// Bulk relationship CREATE.
    CreateRelationships,
}

/// A single Cypher statement with its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CypherStatement {
    /// The Cypher query text, with `$name` parameter placeholders.
    pub query: String,
    /// Parameter values.
    pub parameters: BTreeMap<String, CypherValue>,
    /// The statement's role.
    pub statement_type: StatementType,
}

impl CypherStatement {
    /// Create a new statement.
    pub fn new(query: impl Into<String>, statement_type: StatementType) -> Self {
        Self {
            query: query.into(),
            parameters: BTreeMap::new(),
            statement_type,
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<CypherValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Render the statement with parameter values substituted inline.
    ///
    /// Useful for offline script export, where parameterized execution is
    /// not available.
    pub fn render_inline(&self) -> String {
        let mut result = self.query.clone();
        for (name, value) in &self.parameters {
            let placeholder = format!("${}", name);
            result = result.replace(&placeholder, &value.to_cypher_literal());
        }
        result
    }
}

/// An ordered collection of statements, renderable as an executable script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CypherScript {
    /// The statements, in execution order.
    pub statements: Vec<CypherStatement>,
}

impl CypherScript {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement.
    pub fn add(&mut self, statement: CypherStatement) {
        self.statements.push(statement);
    }

    /// Render the whole script with inlined parameters, one statement per
    /// line, `;`-terminated.
    pub fn render(&self) -> String {
        self.statements
            .iter()
            .map(|s| format!("{};", s.render_inline()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize the script (queries and parameters) as JSON, for replay
    /// through a driver that supports parameterized execution.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True when the script holds no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
