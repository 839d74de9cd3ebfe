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

//! The resource iterator contract.
//!
//! The engine traverses the iterator twice (once per phase), so iterators
//! must be restartable: `reset_to_first` rewinds to the beginning and is
//! idempotent. The sequence must be identical across traversals.

use crate::resource::{RecordResource, Resource};

/// A restartable, finite sequence of resources.
pub trait ResourceIterator: Send {
    /// Advance to the next resource, or `None` when the range is traversed.
    fn next_resource(&mut self) -> Option<Box<dyn Resource>>;

    /// Rewind to the first element. Idempotent.
    fn reset_to_first(&mut self);

    /// Total number of resources, if cheaply known.
    fn len_hint(&self) -> Option<usize>;
}

/// An iterator over an owned list of records.
#[derive(Debug, Clone)]
pub struct VecIterator {
    records: Vec<RecordResource>,
    position: usize,
}

impl VecIterator {
    /// Create an iterator over the given records.
    pub fn new(records: Vec<RecordResource>) -> Self {
        Self {
            records,
            position: 0,
        }
    }
}

impl ResourceIterator for VecIterator {
    fn next_resource(&mut self) -> Option<Box<dyn Resource>> {
        let record = self.records.get(self.position)?.clone();
        self.position += 1;
        Some(Box::new(record))
    }

    fn reset_to_first(&mut self) {
        self.position = 0;
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.records.len())
    }
}

/// Concatenates several iterators into one sequence.
pub struct IteratorChain {
    iterators: Vec<Box<dyn ResourceIterator>>,
    current: usize,
}

impl IteratorChain {
    /// Create a chain over the given iterators, in order.
    pub fn new(iterators: Vec<Box<dyn ResourceIterator>>) -> Self {
        Self {
            iterators,
            current: 0,
        }
    }
}

impl ResourceIterator for IteratorChain {
    fn next_resource(&mut self) -> Option<Box<dyn Resource>> {
        while self.current < self.iterators.len() {
            if let Some(resource) = self.iterators[self.current].next_resource() {
                return Some(resource);
            }
            self.current += 1;
        }
        None
    }

    fn reset_to_first(&mut self) {
        self.current = 0;
        for iterator in &mut self.iterators {
            iterator.reset_to_first();
        }
    }

    fn len_hint(&self) -> Option<usize> {
        self.iterators.iter().map(|i| i.len_hint()).sum()
    }
}
