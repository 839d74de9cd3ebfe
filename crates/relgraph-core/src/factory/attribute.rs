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

//! Attribute factories: produce one [`Attribute`] from a resource.

use crate::elements::Attribute;
use crate::error::{ConstructError, ConstructResult};
use crate::registry::{
    AttributePostprocessorFn, AttributeWrapper, Decision, PreprocessorFn,
};
use crate::resource::{Resource, Supplies};
use crate::value::Value;
use std::sync::Arc;
use tracing::warn;

/// A factory producing a single attribute (or a label, when `key` is empty).
///
/// `construct` returns `Ok(None)` when a pre-processor decided to skip; the
/// enclosing node/relationship factory then produces nothing.
pub enum AttributeFactory {
    /// A literal value from the schema.
    Static {
        /// Property key; empty for label factories.
        key: String,
        /// The literal value.
        value: Value,
    },
    /// A dynamic read from the current resource.
    Dynamic {
        /// Property key; empty for label factories.
        key: String,
        /// The resource attribute to read.
        entity_attr: String,
    },
    /// Pre-/post-processor wrappers around an inner factory.
    Wrapped {
        /// Wrapper name, for diagnostics.
        name: String,
        /// The wrapped factory.
        inner: Box<AttributeFactory>,
        /// Optional pre-processor.
        pre: Option<PreprocessorFn>,
        /// Optional post-processor.
        post: Option<AttributePostprocessorFn>,
        /// Static arguments from the schema.
        args: Vec<Value>,
    },
    /// A user-registered full wrapper.
    Full {
        /// The wrapper object, owning the wrapped factory.
        wrapper: Arc<dyn AttributeWrapper>,
    },
    /// A wrapper of the wrong category was applied; the inner factory runs
    /// unchanged. Behaviour of mismatches is declared undefined.
    Mismatched {
        /// Wrapper name, for diagnostics.
        name: String,
        /// Family of the misapplied binding.
        family: &'static str,
        /// The wrapped factory.
        inner: Box<AttributeFactory>,
    },
}

impl AttributeFactory {
    /// Construct an attribute from the resource.
    pub fn construct(
        &self,
        resource: &mut dyn Resource,
        supplies: &mut Supplies,
    ) -> ConstructResult<Option<Attribute>> {
        match self {
            Self::Static { key, value } => Ok(Some(Attribute::new(key.clone(), value.clone()))),
            Self::Dynamic { key, entity_attr } => match resource.get(entity_attr) {
                Some(value) => Ok(Some(Attribute::new(key.clone(), value))),
                None => Err(ConstructError::MissingAttribute {
                    entity_type: resource.entity_type().to_string(),
                    attribute: entity_attr.clone(),
                }),
            },
            Self::Wrapped {
                name,
                inner,
                pre,
                post,
                args,
            } => {
                if let Some(pre) = pre {
                    if pre(resource, supplies, args)? == Decision::Skip {
                        return Ok(None);
                    }
                }
                let product = inner.construct(resource, supplies)?;
                match (product, post) {
                    (Some(attribute), Some(post)) => {
                        let processed = post(attribute, supplies, args).map_err(|e| {
                            ConstructError::wrapper(name.clone(), e.to_string())
                        })?;
                        Ok(Some(processed))
                    }
                    (product, _) => Ok(product),
                }
            }
            Self::Full { wrapper } => wrapper.construct(resource, supplies),
            Self::Mismatched {
                name,
                family,
                inner,
            } => {
                warn!(
                    wrapper = name.as_str(),
                    family, "wrapper category mismatch on attribute factory; passing through"
                );
                inner.construct(resource, supplies)
            }
        }
    }

    /// The attribute key this factory produces, when statically known.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Static { key, .. } | Self::Dynamic { key, .. } => Some(key.as_str()),
            Self::Wrapped { inner, .. } | Self::Mismatched { inner, .. } => inner.key(),
            Self::Full { .. } => None,
        }
    }
}

impl std::fmt::Debug for AttributeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static { key, value } => write!(f, "Static({}={})", key, value),
            Self::Dynamic { key, entity_attr } => write!(f, "Dynamic({}<-{})", key, entity_attr),
            Self::Wrapped { name, inner, .. } => write!(f, "{}({:?})", name, inner),
            Self::Full { .. } => write!(f, "FullWrapper"),
            Self::Mismatched { name, inner, .. } => write!(f, "Mismatched:{}({:?})", name, inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::RecordResource;

    fn ctx() -> (RecordResource, Supplies) {
        (
            RecordResource::new("Flower").with("species", "setosa"),
            Supplies::new(),
        )
    }

    #[test]
    fn test_static_factory() {
        let (mut r, mut s) = ctx();
        let factory = AttributeFactory::Static {
            key: "kingdom".to_string(),
            value: Value::from("Plantae"),
        };
        let attr = factory.construct(&mut r, &mut s).unwrap().unwrap();
        assert_eq!(attr.key, "kingdom");
        assert_eq!(attr.value, Value::from("Plantae"));
    }

    #[test]
    fn test_dynamic_factory() {
        let (mut r, mut s) = ctx();
        let factory = AttributeFactory::Dynamic {
            key: "Name".to_string(),
            entity_attr: "species".to_string(),
        };
        let attr = factory.construct(&mut r, &mut s).unwrap().unwrap();
        assert_eq!(attr.key, "Name");
        assert_eq!(attr.value, Value::from("setosa"));
    }

    #[test]
    fn test_dynamic_factory_missing_attribute() {
        let (mut r, mut s) = ctx();
        let factory = AttributeFactory::Dynamic {
            key: "x".to_string(),
            entity_attr: "nope".to_string(),
        };
        let err = factory.construct(&mut r, &mut s).unwrap_err();
        assert!(matches!(err, ConstructError::MissingAttribute { .. }));
    }

    #[test]
    fn test_wrapped_postprocessor() {
        let (mut r, mut s) = ctx();
        let factory = AttributeFactory::Wrapped {
            name: "UPPER".to_string(),
            inner: Box::new(AttributeFactory::Dynamic {
                key: "Name".to_string(),
                entity_attr: "species".to_string(),
            }),
            pre: None,
            post: Some(Arc::new(|attr, _, _| {
                Ok(Attribute::new(
                    attr.key,
                    attr.value.to_string().to_uppercase(),
                ))
            })),
            args: vec![],
        };
        let attr = factory.construct(&mut r, &mut s).unwrap().unwrap();
        assert_eq!(attr.value, Value::from("SETOSA"));
    }

    #[test]
    fn test_wrapped_preprocessor_skip() {
        let (mut r, mut s) = ctx();
        let factory = AttributeFactory::Wrapped {
            name: "SKIP".to_string(),
            inner: Box::new(AttributeFactory::Static {
                key: "x".to_string(),
                value: Value::Int(1),
            }),
            pre: Some(Arc::new(|_, _, _| Ok(Decision::Skip))),
            post: Some(Arc::new(|_, _, _| {
                panic!("post-processor must not run after a skip")
            })),
            args: vec![],
        };
        assert!(factory.construct(&mut r, &mut s).unwrap().is_none());
    }

    #[test]
    fn test_preprocessor_receives_static_args() {
        let (mut r, mut s) = ctx();
        let factory = AttributeFactory::Wrapped {
            name: "ONLY_IF".to_string(),
            inner: Box::new(AttributeFactory::Static {
                key: "x".to_string(),
                value: Value::Int(1),
            }),
            pre: Some(Arc::new(|_, _, args| {
                if args == [Value::from("yes")] {
                    Ok(Decision::Proceed)
                } else {
                    Ok(Decision::Skip)
                }
            })),
            post: None,
            args: vec![Value::from("yes")],
        };
        assert!(factory.construct(&mut r, &mut s).unwrap().is_some());
    }

    #[test]
    fn test_mismatched_passes_through() {
        let (mut r, mut s) = ctx();
        let factory = AttributeFactory::Mismatched {
            name: "NODE_ONLY".to_string(),
            family: "subgraph postprocessor",
            inner: Box::new(AttributeFactory::Static {
                key: "x".to_string(),
                value: Value::Int(7),
            }),
        };
        let attr = factory.construct(&mut r, &mut s).unwrap().unwrap();
        assert_eq!(attr.value, Value::Int(7));
    }

    #[test]
    fn test_key() {
        let factory = AttributeFactory::Wrapped {
            name: "W".to_string(),
            inner: Box::new(AttributeFactory::Static {
                key: "inner_key".to_string(),
                value: Value::Int(1),
            }),
            pre: None,
            post: None,
            args: vec![],
        };
        assert_eq!(factory.key(), Some("inner_key"));
    }
}
