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

//! The typed graph operations a batch transaction is made of.
//!
//! The writer emits these instead of raw Cypher so that any backend can
//! execute them: a Bolt-driver adapter renders them with
//! [`GraphOp::to_statement`], while the in-memory reference graph executes
//! them natively.

use crate::cypher::queries::{
    match_nodes_query, unwind_create_nodes_query, unwind_create_relationships_query,
    unwind_merge_nodes_query, unwind_merge_relationships_query, RelRow, Row,
};
use crate::cypher::statements::CypherStatement;
use crate::error::GraphResult;
use relgraph_core::NodeMatch;

/// One bulk operation inside a batch transaction.
#[derive(Debug, Clone)]
pub enum GraphOp {
    /// Merge nodes on a primary label and key, then set remaining
    /// properties and additional labels.
    MergeNodes {
        /// The label merged on.
        primary_label: String,
        /// The property key merged on.
        primary_key: String,
        /// Full label set of the group.
        labels: Vec<String>,
        /// One property map per node; the ids returned align with these.
        rows: Vec<Row>,
    },
    /// Create nodes unconditionally.
    CreateNodes {
        /// Label set of the group.
        labels: Vec<String>,
        /// One property map per node.
        rows: Vec<Row>,
    },
    /// Match existing nodes by labels and property conditions.
    MatchNodes {
        /// The pattern to resolve.
        pattern: NodeMatch,
    },
    /// Merge relationships on endpoints, type and primary key.
    MergeRelationships {
        /// Relationship type.
        rel_type: String,
        /// The property key merged on.
        primary_key: String,
        /// One row per relationship.
        rows: Vec<RelRow>,
    },
    /// Create relationships unconditionally (parallel edges allowed).
    CreateRelationships {
        /// Relationship type.
        rel_type: String,
        /// One row per relationship.
        rows: Vec<RelRow>,
    },
}

impl GraphOp {
    /// Render this operation as a parameterised Cypher statement.
    pub fn to_statement(&self) -> GraphResult<CypherStatement> {
        match self {
            Self::MergeNodes {
                primary_label,
                primary_key,
                labels,
                rows,
            } => unwind_merge_nodes_query(primary_label, primary_key, labels, rows),
            Self::CreateNodes { labels, rows } => unwind_create_nodes_query(labels, rows),
            Self::MatchNodes { pattern } => match_nodes_query(pattern),
            Self::MergeRelationships {
                rel_type,
                primary_key,
                rows,
            } => unwind_merge_relationships_query(rel_type, primary_key, rows),
            Self::CreateRelationships { rel_type, rows } => {
                unwind_create_relationships_query(rel_type, rows)
            }
        }
    }

    /// Short name of the operation kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MergeNodes { .. } => "merge_nodes",
            Self::CreateNodes { .. } => "create_nodes",
            Self::MatchNodes { .. } => "match_nodes",
            Self::MergeRelationships { .. } => "merge_relationships",
            Self::CreateRelationships { .. } => "create_relationships",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_core::Value;
    use std::collections::BTreeMap;

    #[test]
    fn test_ops_render_to_statements() {
        let mut row = Row::new();
        row.insert("Name".to_string(), Value::from("setosa"));
        let op = GraphOp::MergeNodes {
            primary_label: "Species".to_string(),
            primary_key: "Name".to_string(),
            labels: vec!["Species".to_string()],
            rows: vec![row],
        };
        assert_eq!(op.kind(), "merge_nodes");
        assert!(op.to_statement().unwrap().query.contains("MERGE"));

        let op = GraphOp::MatchNodes {
            pattern: NodeMatch::new(vec!["Species".to_string()], BTreeMap::new()),
        };
        assert!(op.to_statement().unwrap().query.starts_with("MATCH"));
    }
}
