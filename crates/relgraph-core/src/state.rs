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

//! Named cross-worker shared state.
//!
//! Slots are registered before an engine run and are visible to wrapper
//! bodies on every worker. The engine publishes the built-in
//! [`GRAPH_DRIVER`] slot itself. Values are shared as-is: thread safety of
//! the slot contents is the owner's responsibility.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the built-in slot holding the graph client for ad-hoc queries
/// from wrapper bodies.
pub const GRAPH_DRIVER: &str = "graph_driver";

static STATE: Lazy<RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// The process-wide shared state table.
pub struct SharedState;

impl SharedState {
    /// Store a value under `name`, replacing any previous value.
    pub fn set(name: &str, value: Arc<dyn Any + Send + Sync>) {
        STATE.write().insert(name.to_string(), value);
    }

    /// Fetch the value stored under `name`.
    pub fn get(name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        STATE.read().get(name).cloned()
    }

    /// Fetch and downcast the value stored under `name`.
    ///
    /// Returns `None` when the slot is absent or holds a different type.
    pub fn get_as<T: Send + Sync + 'static>(name: &str) -> Option<Arc<T>> {
        Self::get(name).and_then(|value| value.downcast::<T>().ok())
    }

    /// Remove the slot `name`.
    pub fn remove(name: &str) {
        STATE.write().remove(name);
    }

    /// The names of all registered slots.
    pub fn names() -> Vec<String> {
        STATE.read().keys().cloned().collect()
    }

    /// Remove every slot. Intended for test isolation.
    pub fn clear() {
        STATE.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        SharedState::set("state_test_counter", Arc::new(41i64));
        let v = SharedState::get_as::<i64>("state_test_counter");
        assert_eq!(v.as_deref(), Some(&41));
    }

    #[test]
    fn test_get_wrong_type() {
        SharedState::set("state_test_string", Arc::new("hello".to_string()));
        assert!(SharedState::get_as::<i64>("state_test_string").is_none());
        assert!(SharedState::get_as::<String>("state_test_string").is_some());
    }

    #[test]
    fn test_missing_slot() {
        assert!(SharedState::get("state_test_absent").is_none());
    }

    #[test]
    fn test_remove() {
        SharedState::set("state_test_remove", Arc::new(1i64));
        SharedState::remove("state_test_remove");
        assert!(SharedState::get("state_test_remove").is_none());
    }

    #[test]
    fn test_shared_mutation_is_visible() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        SharedState::set("state_test_shared", Arc::new(AtomicUsize::new(0)));

        let slot = SharedState::get_as::<AtomicUsize>("state_test_shared").unwrap();
        slot.fetch_add(5, Ordering::SeqCst);

        let again = SharedState::get_as::<AtomicUsize>("state_test_shared").unwrap();
        assert_eq!(again.load(Ordering::SeqCst), 5);
    }
}
