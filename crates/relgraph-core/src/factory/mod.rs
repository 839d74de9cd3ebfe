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

//! The factory graph: runtime units that turn resources into graph
//! elements.
//!
//! Every factory exposes one operation, `construct(resource, supplies)`.
//! Wrappers compose by holding a child factory; a pre-processor deciding to
//! skip short-circuits the child and yields an empty product.

mod attribute;
mod matcher;
mod subgraph;

pub use attribute::AttributeFactory;
pub use matcher::{MatchedEndpoints, Matcher};
pub use subgraph::{NodeFactory, RelationshipFactory, SubgraphFactory, SupplyChain};
