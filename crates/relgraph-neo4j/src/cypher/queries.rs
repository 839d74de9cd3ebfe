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

//! Parameterised `UNWIND` bulk query builders.
//!
//! One statement per batch group: merge-nodes per `(primary label, key)`
//! group, create-nodes per label set, one match per distinct pattern, and
//! merge/create-relationships per type. Each statement returns the internal
//! ids of the touched elements, aligned with the input rows.

use crate::cypher::escape::{escape_identifier, escape_relationship_type, label_string};
use crate::cypher::statements::{CypherStatement, CypherValue, StatementType};
use crate::error::GraphResult;
use relgraph_core::{GraphId, NodeMatch, Value};
use std::collections::BTreeMap;

/// A property map row.
pub type Row = BTreeMap<String, Value>;

fn rows_parameter(rows: &[Row]) -> CypherValue {
    CypherValue::List(
        rows.iter()
            .map(|row| {
                CypherValue::Map(
                    row.iter()
                        .map(|(k, v)| (k.clone(), CypherValue::from(v)))
                        .collect(),
                )
            })
            .collect(),
    )
}

/// Bulk `UNWIND ... MERGE` for nodes sharing a primary label and key.
pub fn unwind_merge_nodes_query(
    primary_label: &str,
    primary_key: &str,
    labels: &[String],
    rows: &[Row],
) -> GraphResult<CypherStatement> {
    let extra_labels: Vec<String> = labels
        .iter()
        .filter(|l| l.as_str() != primary_label)
        .cloned()
        .collect();

    let mut query = format!(
        "UNWIND $rows AS row\nMERGE (n:{} {{{}: row.{}}})\nSET n += row",
        escape_identifier(primary_label)?,
        escape_identifier(primary_key)?,
        escape_identifier(primary_key)?,
    );
    if !extra_labels.is_empty() {
        query.push_str("\nSET n");
        query.push_str(&label_string(&extra_labels)?);
    }
    query.push_str("\nRETURN id(n)");

    Ok(CypherStatement::new(query, StatementType::MergeNodes)
        .with_param("rows", rows_parameter(rows)))
}

/// Bulk `UNWIND ... CREATE` for nodes sharing a label set.
pub fn unwind_create_nodes_query(labels: &[String], rows: &[Row]) -> GraphResult<CypherStatement> {
    let query = format!(
        "UNWIND $rows AS row\nCREATE (n{})\nSET n += row\nRETURN id(n)",
        label_string(labels)?
    );
    Ok(CypherStatement::new(query, StatementType::CreateNodes)
        .with_param("rows", rows_parameter(rows)))
}

/// Bulk `MATCH` for one pattern: all labels and all property conditions.
pub fn match_nodes_query(pattern: &NodeMatch) -> GraphResult<CypherStatement> {
    let mut statement_params: BTreeMap<String, CypherValue> = BTreeMap::new();
    let mut condition_parts = Vec::new();
    for (i, (key, value)) in pattern.conditions.iter().enumerate() {
        let param = format!("c{}", i);
        condition_parts.push(format!("{}: ${}", escape_identifier(key)?, param));
        statement_params.insert(param, CypherValue::from(value));
    }

    let conditions = if condition_parts.is_empty() {
        String::new()
    } else {
        format!(" {{{}}}", condition_parts.join(", "))
    };
    let query = format!(
        "MATCH (n{}{})\nRETURN id(n)",
        label_string(&pattern.labels)?,
        conditions
    );

    let mut statement = CypherStatement::new(query, StatementType::MatchNodes);
    statement.parameters = statement_params;
    Ok(statement)
}

/// One relationship row: resolved endpoint ids plus properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RelRow {
    /// Internal id of the start node.
    pub start: GraphId,
    /// Internal id of the end node.
    pub end: GraphId,
    /// Relationship properties.
    pub properties: Row,
}

fn rel_rows_parameter(rows: &[RelRow]) -> CypherValue {
    CypherValue::List(
        rows.iter()
            .map(|row| {
                let mut map = BTreeMap::new();
                map.insert("start".to_string(), CypherValue::Int(row.start));
                map.insert("end".to_string(), CypherValue::Int(row.end));
                map.insert(
                    "properties".to_string(),
                    CypherValue::Map(
                        row.properties
                            .iter()
                            .map(|(k, v)| (k.clone(), CypherValue::from(v)))
                            .collect(),
                    ),
                );
                CypherValue::Map(map)
            })
            .collect(),
    )
}

/// Bulk `UNWIND ... MERGE` for relationships sharing a type and primary key.
pub fn unwind_merge_relationships_query(
    rel_type: &str,
    primary_key: &str,
    rows: &[RelRow],
) -> GraphResult<CypherStatement> {
    let query = format!(
        "UNWIND $rows AS row\n\
         MATCH (a) WHERE id(a) = row.start\n\
         MATCH (b) WHERE id(b) = row.end\n\
         MERGE (a)-[r:{} {{{}: row.properties.{}}}]->(b)\n\
         SET r += row.properties\n\
         RETURN id(r)",
        escape_relationship_type(rel_type)?,
        escape_identifier(primary_key)?,
        escape_identifier(primary_key)?,
    );
    Ok(
        CypherStatement::new(query, StatementType::MergeRelationships)
            .with_param("rows", rel_rows_parameter(rows)),
    )
}

/// Bulk `UNWIND ... CREATE` for relationships sharing a type.
pub fn unwind_create_relationships_query(
    rel_type: &str,
    rows: &[RelRow],
) -> GraphResult<CypherStatement> {
    let query = format!(
        "UNWIND $rows AS row\n\
         MATCH (a) WHERE id(a) = row.start\n\
         MATCH (b) WHERE id(b) = row.end\n\
         CREATE (a)-[r:{}]->(b)\n\
         SET r += row.properties\n\
         RETURN id(r)",
        escape_relationship_type(rel_type)?,
    );
    Ok(
        CypherStatement::new(query, StatementType::CreateRelationships)
            .with_param("rows", rel_rows_parameter(rows)),
    )
}
