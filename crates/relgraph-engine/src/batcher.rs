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

//! Groups the resource stream into batches.
//!
//! The iterator is advanced serially under a lock; batches are then handed
//! to workers. Every resource carries an ordinal (its position in the
//! stream), which is stable across the two phases because iterators
//! produce the same sequence on every traversal.

use parking_lot::Mutex;
use relgraph_core::{Resource, ResourceIterator};

/// One unit of work: a batch index plus its resources with ordinals.
pub struct Batch {
    /// Position of this batch in the stream, the checkpoint key.
    pub index: usize,
    /// The resources, each with its stream ordinal.
    pub resources: Vec<(u64, Box<dyn Resource>)>,
}

/// Serially pulls resources from the iterator, `batch_size` at a time.
pub struct Batcher<'a> {
    iterator: &'a Mutex<Box<dyn ResourceIterator>>,
    batch_size: usize,
    next_index: usize,
    next_ordinal: u64,
    exhausted: bool,
}

impl<'a> Batcher<'a> {
    /// Create a batcher over a shared iterator.
    pub fn new(iterator: &'a Mutex<Box<dyn ResourceIterator>>, batch_size: usize) -> Self {
        Self {
            iterator,
            batch_size,
            next_index: 0,
            next_ordinal: 0,
            exhausted: false,
        }
    }
}

impl Iterator for Batcher<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.exhausted {
            return None;
        }
        let mut resources = Vec::with_capacity(self.batch_size);
        {
            let mut iterator = self.iterator.lock();
            for _ in 0..self.batch_size {
                match iterator.next_resource() {
                    Some(resource) => {
                        resources.push((self.next_ordinal, resource));
                        self.next_ordinal += 1;
                    }
                    None => {
                        self.exhausted = true;
                        break;
                    }
                }
            }
        }
        if resources.is_empty() {
            return None;
        }
        let batch = Batch {
            index: self.next_index,
            resources,
        };
        self.next_index += 1;
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_core::{RecordResource, VecIterator};

    fn iterator(n: usize) -> Mutex<Box<dyn ResourceIterator>> {
        let records: Vec<RecordResource> = (0..n)
            .map(|i| RecordResource::new("A").with("i", i as i64))
            .collect();
        Mutex::new(Box::new(VecIterator::new(records)))
    }

    #[test]
    fn test_batching_splits_evenly() {
        let it = iterator(6);
        let batches: Vec<Batch> = Batcher::new(&it, 2).collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].index, 0);
        assert_eq!(batches[2].index, 2);
        assert!(batches.iter().all(|b| b.resources.len() == 2));
    }

    #[test]
    fn test_batching_with_remainder() {
        let it = iterator(5);
        let batches: Vec<Batch> = Batcher::new(&it, 2).collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].resources.len(), 1);
    }

    #[test]
    fn test_ordinals_are_sequential() {
        let it = iterator(4);
        let batches: Vec<Batch> = Batcher::new(&it, 3).collect();
        let ordinals: Vec<u64> = batches
            .iter()
            .flat_map(|b| b.resources.iter().map(|(o, _)| *o))
            .collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_iterator_yields_no_batches() {
        let it = iterator(0);
        assert_eq!(Batcher::new(&it, 10).count(), 0);
    }

    #[test]
    fn test_ordinals_stable_across_traversals() {
        let it = iterator(3);
        let first: Vec<u64> = Batcher::new(&it, 2)
            .flat_map(|b| b.resources.into_iter().map(|(o, _)| o))
            .collect();
        it.lock().reset_to_first();
        let second: Vec<u64> = Batcher::new(&it, 2)
            .flat_map(|b| b.resources.into_iter().map(|(o, _)| o))
            .collect();
        assert_eq!(first, second);
    }
}
