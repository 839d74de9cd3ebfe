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

//! Process-wide catalog of named wrapper bindings.
//!
//! Wrapper names used in a schema (`IF_HAS_BOSS(NODE(...)):`) are resolved
//! against this registry when the schema is compiled. Compilation takes a
//! [`RegistrySnapshot`], so re-registering a name mid-run cannot perturb an
//! in-flight conversion.
//!
//! Registration is idempotent by name: re-registering replaces the previous
//! binding and logs a warning.

use crate::elements::{Attribute, Subgraph};
use crate::error::ConstructResult;
use crate::factory::{AttributeFactory, SubgraphFactory};
use crate::resource::{Resource, Supplies};
use crate::value::Value;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a pre-processor: continue into the wrapped factory, or skip
/// it entirely (the "null resource" signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Pass the resource on to the wrapped factory.
    Proceed,
    /// Short-circuit: the wrapped factory produces nothing.
    Skip,
}

/// A pre-processor: may rewrite the resource in place, stash values in the
/// supplies for its post-processor, and decide whether to proceed.
pub type PreprocessorFn = Arc<
    dyn Fn(&mut dyn Resource, &mut Supplies, &[Value]) -> ConstructResult<Decision> + Send + Sync,
>;

/// An attribute post-processor: maps the produced attribute to another one.
pub type AttributePostprocessorFn =
    Arc<dyn Fn(Attribute, &mut Supplies, &[Value]) -> ConstructResult<Attribute> + Send + Sync>;

/// A subgraph post-processor: maps the produced subgraph to another one.
pub type SubgraphPostprocessorFn =
    Arc<dyn Fn(Subgraph, &mut Supplies, &[Value]) -> ConstructResult<Subgraph> + Send + Sync>;

/// A full wrapper around an attribute factory.
///
/// Implementations own the wrapped factory and have complete control over
/// construction.
pub trait AttributeWrapper: Send + Sync {
    /// Produce an attribute, or `None` to skip.
    fn construct(
        &self,
        resource: &mut dyn Resource,
        supplies: &mut Supplies,
    ) -> ConstructResult<Option<Attribute>>;
}

/// A full wrapper around a node/relationship/subgraph factory.
pub trait SubgraphWrapper: Send + Sync {
    /// Produce a subgraph (possibly empty).
    fn construct(
        &self,
        resource: &mut dyn Resource,
        supplies: &mut Supplies,
    ) -> ConstructResult<Subgraph>;
}

/// Constructor for a full attribute wrapper: receives the wrapped factory
/// and the static arguments from the schema.
pub type AttributeWrapperCtor =
    Arc<dyn Fn(AttributeFactory, Vec<Value>) -> Arc<dyn AttributeWrapper> + Send + Sync>;

/// Constructor for a full subgraph wrapper.
pub type SubgraphWrapperCtor =
    Arc<dyn Fn(SubgraphFactory, Vec<Value>) -> Arc<dyn SubgraphWrapper> + Send + Sync>;

/// A named binding in the registry. One of the five wrapper families.
#[derive(Clone)]
pub enum WrapperBinding {
    /// Attribute pre-processor.
    AttributePreprocessor(PreprocessorFn),
    /// Attribute post-processor.
    AttributePostprocessor(AttributePostprocessorFn),
    /// Subgraph pre-processor.
    SubgraphPreprocessor(PreprocessorFn),
    /// Subgraph post-processor.
    SubgraphPostprocessor(SubgraphPostprocessorFn),
    /// Full wrapper around an attribute factory.
    FullAttribute(AttributeWrapperCtor),
    /// Full wrapper around a subgraph factory.
    FullSubgraph(SubgraphWrapperCtor),
}

impl WrapperBinding {
    /// Name of the binding family, for diagnostics.
    pub fn family(&self) -> &'static str {
        match self {
            Self::AttributePreprocessor(_) => "attribute preprocessor",
            Self::AttributePostprocessor(_) => "attribute postprocessor",
            Self::SubgraphPreprocessor(_) => "subgraph preprocessor",
            Self::SubgraphPostprocessor(_) => "subgraph postprocessor",
            Self::FullAttribute(_) => "attribute wrapper",
            Self::FullSubgraph(_) => "subgraph wrapper",
        }
    }
}

impl std::fmt::Debug for WrapperBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WrapperBinding({})", self.family())
    }
}

static REGISTRY: Lazy<RwLock<HashMap<String, WrapperBinding>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn register(name: &str, binding: WrapperBinding) {
    let mut registry = REGISTRY.write();
    if let Some(previous) = registry.insert(name.to_string(), binding) {
        warn!(
            name,
            previous = previous.family(),
            "wrapper name registered twice; previous binding replaced"
        );
    } else {
        debug!(name, "registered wrapper");
    }
}

/// Register an attribute pre-processor under `name`.
pub fn register_attribute_preprocessor<F>(name: &str, f: F)
where
    F: Fn(&mut dyn Resource, &mut Supplies, &[Value]) -> ConstructResult<Decision>
        + Send
        + Sync
        + 'static,
{
    register(name, WrapperBinding::AttributePreprocessor(Arc::new(f)));
}

/// Register an attribute post-processor under `name`.
pub fn register_attribute_postprocessor<F>(name: &str, f: F)
where
    F: Fn(Attribute, &mut Supplies, &[Value]) -> ConstructResult<Attribute>
        + Send
        + Sync
        + 'static,
{
    register(name, WrapperBinding::AttributePostprocessor(Arc::new(f)));
}

/// Register a subgraph pre-processor under `name`.
pub fn register_subgraph_preprocessor<F>(name: &str, f: F)
where
    F: Fn(&mut dyn Resource, &mut Supplies, &[Value]) -> ConstructResult<Decision>
        + Send
        + Sync
        + 'static,
{
    register(name, WrapperBinding::SubgraphPreprocessor(Arc::new(f)));
}

/// Register a subgraph post-processor under `name`.
pub fn register_subgraph_postprocessor<F>(name: &str, f: F)
where
    F: Fn(Subgraph, &mut Supplies, &[Value]) -> ConstructResult<Subgraph> + Send + Sync + 'static,
{
    register(name, WrapperBinding::SubgraphPostprocessor(Arc::new(f)));
}

/// Register a full attribute wrapper constructor under `name`.
pub fn register_attribute_wrapper<F>(name: &str, ctor: F)
where
    F: Fn(AttributeFactory, Vec<Value>) -> Arc<dyn AttributeWrapper> + Send + Sync + 'static,
{
    register(name, WrapperBinding::FullAttribute(Arc::new(ctor)));
}

/// Register a full subgraph wrapper constructor under `name`.
pub fn register_subgraph_wrapper<F>(name: &str, ctor: F)
where
    F: Fn(SubgraphFactory, Vec<Value>) -> Arc<dyn SubgraphWrapper> + Send + Sync + 'static,
{
    register(name, WrapperBinding::FullSubgraph(Arc::new(ctor)));
}

/// Remove every registered binding. Intended for test isolation.
pub fn clear_registry() {
    REGISTRY.write().clear();
}

/// An immutable snapshot of the registry taken at schema compile time.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    bindings: HashMap<String, WrapperBinding>,
}

impl RegistrySnapshot {
    /// Snapshot the current process-wide registry.
    pub fn current() -> Self {
        Self {
            bindings: REGISTRY.read().clone(),
        }
    }

    /// Resolve a wrapper name.
    pub fn resolve(&self, name: &str) -> Option<&WrapperBinding> {
        self.bindings.get(name)
    }

    /// Number of bindings in the snapshot.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when no bindings are registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        register_attribute_postprocessor("REGISTRY_TEST_UPPER", |attr, _, _| {
            Ok(Attribute::new(
                attr.key,
                attr.value.to_string().to_uppercase(),
            ))
        });
        let snapshot = RegistrySnapshot::current();
        let binding = snapshot.resolve("REGISTRY_TEST_UPPER");
        assert!(matches!(
            binding,
            Some(WrapperBinding::AttributePostprocessor(_))
        ));
    }

    #[test]
    fn test_reregistration_replaces() {
        register_subgraph_preprocessor("REGISTRY_TEST_TWICE", |_, _, _| Ok(Decision::Proceed));
        register_subgraph_postprocessor("REGISTRY_TEST_TWICE", |sg, _, _| Ok(sg));
        let snapshot = RegistrySnapshot::current();
        assert!(matches!(
            snapshot.resolve("REGISTRY_TEST_TWICE"),
            Some(WrapperBinding::SubgraphPostprocessor(_))
        ));
    }

    #[test]
    fn test_snapshot_is_frozen() {
        register_subgraph_preprocessor("REGISTRY_TEST_FROZEN_A", |_, _, _| Ok(Decision::Proceed));
        let snapshot = RegistrySnapshot::current();
        register_subgraph_preprocessor("REGISTRY_TEST_FROZEN_B", |_, _, _| Ok(Decision::Proceed));
        // The snapshot does not see bindings registered after it was taken.
        assert!(snapshot.resolve("REGISTRY_TEST_FROZEN_B").is_none());
        assert!(snapshot.resolve("REGISTRY_TEST_FROZEN_A").is_some());
    }

    #[test]
    fn test_unknown_name() {
        let snapshot = RegistrySnapshot::current();
        assert!(snapshot.resolve("REGISTRY_TEST_NO_SUCH_NAME").is_none());
    }
}
