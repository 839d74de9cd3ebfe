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

//! Compiles a parsed schema into executable entity plans.
//!
//! Wrapper names are resolved against a frozen [`RegistrySnapshot`] taken
//! when compilation starts, so re-registrations during a run cannot perturb
//! an in-flight conversion. Wrapper category mismatches (an attribute
//! wrapper around a node factory, say) are not rejected: a warning is
//! logged and the wrapper is applied as a pass-through, since the behaviour
//! is declared undefined.

use crate::error::{SchemaError, SchemaResult};
use crate::factory::{
    AttributeFactory, Matcher, NodeFactory, RelationshipFactory, SubgraphFactory, SupplyChain,
};
use crate::registry::{RegistrySnapshot, WrapperBinding};
use crate::schema::ast::{
    AttrSpec, EndpointSpec, EntitySpec, NodeSpec, RelationshipSpec, SubBlock, ValueExpr,
    WrapperSpec,
};
use crate::schema::parser::parse_schema;
use crate::value::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A compiled conversion schema: one entity plan per entity type.
#[derive(Debug, Default)]
pub struct CompiledSchema {
    plans: HashMap<String, EntityPlan>,
}

/// The executable plan for one entity type.
#[derive(Debug)]
pub struct EntityPlan {
    /// The entity type this plan applies to.
    pub entity_type: String,
    /// Node sub-plans, in textual order.
    pub nodes: SupplyChain,
    /// Relationship sub-plans, in textual order.
    pub relationships: SupplyChain,
}

impl CompiledSchema {
    /// Look up the plan for an entity type.
    pub fn plan(&self, entity_type: &str) -> Option<&EntityPlan> {
        self.plans.get(entity_type)
    }

    /// Entity types that produce nodes.
    pub fn node_mask(&self) -> HashSet<String> {
        self.plans
            .values()
            .filter(|p| !p.nodes.is_empty())
            .map(|p| p.entity_type.clone())
            .collect()
    }

    /// Entity types that produce relationships.
    pub fn relationship_mask(&self) -> HashSet<String> {
        self.plans
            .values()
            .filter(|p| !p.relationships.is_empty())
            .map(|p| p.entity_type.clone())
            .collect()
    }

    /// Number of entity plans.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// True when the schema declares no entities.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Compile schema text against the current process-wide registry.
pub fn compile_schema(schema: &str) -> SchemaResult<CompiledSchema> {
    compile_schema_with(schema, &RegistrySnapshot::current())
}

/// Compile schema text against an explicit registry snapshot.
pub fn compile_schema_with(
    schema: &str,
    registry: &RegistrySnapshot,
) -> SchemaResult<CompiledSchema> {
    let ast = parse_schema(schema)?;
    let mut plans = HashMap::new();

    for entity in &ast.entities {
        if plans.contains_key(&entity.entity_type) {
            return Err(SchemaError::semantic(
                format!(
                    "found two conflicting definitions of entity '{}'",
                    entity.entity_type
                ),
                entity.line,
            ));
        }
        let plan = compile_entity(entity, registry)?;
        debug!(
            entity_type = entity.entity_type.as_str(),
            nodes = plan.nodes.factories.len(),
            relationships = plan.relationships.factories.len(),
            "compiled entity plan"
        );
        plans.insert(entity.entity_type.clone(), plan);
    }

    Ok(CompiledSchema { plans })
}

fn compile_entity(entity: &EntitySpec, registry: &RegistrySnapshot) -> SchemaResult<EntityPlan> {
    let mut nodes = Vec::new();
    let mut relationships = Vec::new();
    let mut identifiers: HashSet<String> = HashSet::new();

    for block in &entity.blocks {
        match block {
            SubBlock::Node(spec) => {
                if let Some(identifier) = &spec.identifier {
                    if !identifiers.insert(identifier.clone()) {
                        return Err(SchemaError::semantic(
                            format!(
                                "conflicting definitions of identifier '{}'; an identifier must be unique",
                                identifier
                            ),
                            spec.line,
                        )
                        .with_context(format!("in entity '{}'", entity.entity_type)));
                    }
                }
                nodes.push(compile_node_block(spec, registry)?);
            }
            SubBlock::Relationship(spec) => {
                relationships.push(compile_relationship_block(spec, registry, &identifiers)?);
            }
        }
    }

    Ok(EntityPlan {
        entity_type: entity.entity_type.clone(),
        nodes: SupplyChain::new(nodes),
        relationships: SupplyChain::new(relationships),
    })
}

fn compile_node_block(
    spec: &NodeSpec,
    registry: &RegistrySnapshot,
) -> SchemaResult<SubgraphFactory> {
    let labels = spec
        .labels
        .iter()
        .map(|expr| compile_value(expr, String::new(), registry))
        .collect::<SchemaResult<Vec<_>>>()?;

    let (attrs, primary_key) = compile_attrs(&spec.attrs, registry)?;

    let factory = SubgraphFactory::Node(NodeFactory {
        labels,
        attrs,
        primary_key,
        identifier: spec.identifier.clone(),
    });
    apply_subgraph_wrappers(factory, &spec.wrappers, registry)
}

fn compile_relationship_block(
    spec: &RelationshipSpec,
    registry: &RegistrySnapshot,
    identifiers: &HashSet<String>,
) -> SchemaResult<SubgraphFactory> {
    let start = compile_endpoint(&spec.start, spec.line, registry, identifiers)?;
    let end = compile_endpoint(&spec.end, spec.line, registry, identifiers)?;
    let rel_type = compile_value(&spec.rel_type, String::new(), registry)?;
    let (attrs, primary_key) = compile_attrs(&spec.attrs, registry)?;

    let factory = SubgraphFactory::Relationship(RelationshipFactory {
        start,
        rel_type,
        end,
        attrs,
        primary_key,
    });
    apply_subgraph_wrappers(factory, &spec.wrappers, registry)
}

fn compile_endpoint(
    spec: &EndpointSpec,
    line: usize,
    registry: &RegistrySnapshot,
    identifiers: &HashSet<String>,
) -> SchemaResult<Matcher> {
    match spec {
        EndpointSpec::Identifier(name) => {
            if !identifiers.contains(name) {
                return Err(SchemaError::semantic(
                    format!(
                        "relationship references identifier '{}' which is not declared above",
                        name
                    ),
                    line,
                ));
            }
            Ok(Matcher::Identifier(name.clone()))
        }
        EndpointSpec::Match { labels, conditions } => {
            let labels = labels
                .iter()
                .map(|expr| compile_value(expr, String::new(), registry))
                .collect::<SchemaResult<Vec<_>>>()?;
            let conditions = conditions
                .iter()
                .map(|(name, expr)| compile_value(expr, name.clone(), registry))
                .collect::<SchemaResult<Vec<_>>>()?;
            Ok(Matcher::Pattern { labels, conditions })
        }
    }
}

fn compile_attrs(
    specs: &[AttrSpec],
    registry: &RegistrySnapshot,
) -> SchemaResult<(Vec<AttributeFactory>, Option<String>)> {
    let mut attrs = Vec::with_capacity(specs.len());
    let mut primary_key: Option<String> = None;

    for spec in specs {
        if spec.primary {
            if let Some(existing) = &primary_key {
                return Err(SchemaError::semantic(
                    format!(
                        "setting two or more primary keys for one graph element is not allowed; conflict: '{}' <-> '{}'",
                        existing, spec.name
                    ),
                    spec.line,
                ));
            }
            primary_key = Some(spec.name.clone());
        }
        attrs.push(compile_value(&spec.value, spec.name.clone(), registry)?);
    }

    Ok((attrs, primary_key))
}

/// Compile a value expression into an attribute factory carrying `key`.
fn compile_value(
    expr: &ValueExpr,
    key: String,
    registry: &RegistrySnapshot,
) -> SchemaResult<AttributeFactory> {
    match expr {
        ValueExpr::Literal(value) => Ok(AttributeFactory::Static {
            key,
            value: value.clone(),
        }),
        ValueExpr::EntityAttr { attr, .. } => Ok(AttributeFactory::Dynamic {
            key,
            entity_attr: attr.clone(),
        }),
        ValueExpr::Call { name, args, line } => {
            let (inner_expr, static_args) = split_call_args(name, args, *line)?;
            let inner = compile_value(inner_expr, key, registry)?;
            match registry.resolve(name) {
                Some(WrapperBinding::AttributePreprocessor(pre)) => {
                    Ok(AttributeFactory::Wrapped {
                        name: name.clone(),
                        inner: Box::new(inner),
                        pre: Some(pre.clone()),
                        post: None,
                        args: static_args,
                    })
                }
                Some(WrapperBinding::AttributePostprocessor(post)) => {
                    Ok(AttributeFactory::Wrapped {
                        name: name.clone(),
                        inner: Box::new(inner),
                        pre: None,
                        post: Some(post.clone()),
                        args: static_args,
                    })
                }
                Some(WrapperBinding::FullAttribute(ctor)) => Ok(AttributeFactory::Full {
                    wrapper: ctor(inner, static_args),
                }),
                Some(binding) => {
                    warn!(
                        wrapper = name.as_str(),
                        family = binding.family(),
                        "subgraph-family wrapper applied to an attribute; behaviour is undefined"
                    );
                    Ok(AttributeFactory::Mismatched {
                        name: name.clone(),
                        family: binding.family(),
                        inner: Box::new(inner),
                    })
                }
                None => Err(SchemaError::unknown_symbol(
                    format!(
                        "the wrapper '{}' is not registered; register your custom wrappers before compiling",
                        name
                    ),
                    *line,
                )),
            }
        }
    }
}

fn apply_subgraph_wrappers(
    factory: SubgraphFactory,
    wrappers: &[WrapperSpec],
    registry: &RegistrySnapshot,
) -> SchemaResult<SubgraphFactory> {
    // Wrappers are listed outermost first; fold from the innermost out.
    let mut factory = factory;
    for spec in wrappers.iter().rev() {
        let static_args = literal_args(&spec.args, &spec.name, spec.line)?;
        factory = match registry.resolve(&spec.name) {
            Some(WrapperBinding::SubgraphPreprocessor(pre)) => SubgraphFactory::Wrapped {
                name: spec.name.clone(),
                inner: Box::new(factory),
                pre: Some(pre.clone()),
                post: None,
                args: static_args,
            },
            Some(WrapperBinding::SubgraphPostprocessor(post)) => SubgraphFactory::Wrapped {
                name: spec.name.clone(),
                inner: Box::new(factory),
                pre: None,
                post: Some(post.clone()),
                args: static_args,
            },
            Some(WrapperBinding::FullSubgraph(ctor)) => SubgraphFactory::Full {
                wrapper: ctor(factory, static_args),
            },
            Some(binding) => {
                warn!(
                    wrapper = spec.name.as_str(),
                    family = binding.family(),
                    "attribute-family wrapper applied to a graph element; behaviour is undefined"
                );
                SubgraphFactory::Mismatched {
                    name: spec.name.clone(),
                    family: binding.family(),
                    inner: Box::new(factory),
                }
            }
            None => {
                return Err(SchemaError::unknown_symbol(
                    format!(
                        "the wrapper '{}' is not registered; register your custom wrappers before compiling",
                        spec.name
                    ),
                    spec.line,
                ));
            }
        };
    }
    Ok(factory)
}

/// Split a call's arguments into the wrapped expression and static literals.
fn split_call_args<'a>(
    name: &str,
    args: &'a [ValueExpr],
    line: usize,
) -> SchemaResult<(&'a ValueExpr, Vec<Value>)> {
    let inner = args.first().ok_or_else(|| {
        SchemaError::parse(format!("wrapper '{}' requires an argument", name), line)
    })?;
    let static_args = literal_args(&args[1..], name, line)?;
    Ok((inner, static_args))
}

fn literal_args(args: &[ValueExpr], name: &str, line: usize) -> SchemaResult<Vec<Value>> {
    args.iter()
        .map(|arg| match arg {
            ValueExpr::Literal(value) => Ok(value.clone()),
            _ => Err(SchemaError::semantic(
                format!("static arguments of wrapper '{}' must be literals", name),
                line,
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{self, Decision};

    const FLOWER_SCHEMA: &str = r#"
ENTITY("Flower"):
    NODE("Flower") flower:
        - sepal_length = Flower.sepal_length
    NODE("Species", "BioEntity") species:
        + Name = Flower.species
    RELATIONSHIP(flower, "is", species):
"#;

    #[test]
    fn test_compile_flower_schema() {
        let schema = compile_schema(FLOWER_SCHEMA).unwrap();
        assert_eq!(schema.len(), 1);
        let plan = schema.plan("Flower").unwrap();
        assert_eq!(plan.nodes.factories.len(), 2);
        assert_eq!(plan.relationships.factories.len(), 1);
        assert!(schema.node_mask().contains("Flower"));
        assert!(schema.relationship_mask().contains("Flower"));
    }

    #[test]
    fn test_masks_for_node_only_entity() {
        let schema = compile_schema(
            r#"
ENTITY("A"):
    NODE("A"):
        - x = A.x
"#,
        )
        .unwrap();
        assert!(schema.node_mask().contains("A"));
        assert!(!schema.relationship_mask().contains("A"));
    }

    #[test]
    fn test_unknown_entity_has_no_plan() {
        let schema = compile_schema(FLOWER_SCHEMA).unwrap();
        assert!(schema.plan("Person").is_none());
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let err = compile_schema(
            r#"
ENTITY("A"):
    NODE("A"):
        - x = A.x
ENTITY("A"):
    NODE("A"):
        - x = A.x
"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::SchemaErrorKind::Semantic);
        assert!(err.message.contains("conflicting definitions of entity"));
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let err = compile_schema(
            r#"
ENTITY("A"):
    NODE("A") a:
        - x = A.x
    NODE("B") a:
        - x = A.x
"#,
        )
        .unwrap_err();
        assert!(err.message.contains("identifier 'a'"));
    }

    #[test]
    fn test_undeclared_identifier_rejected() {
        let err = compile_schema(
            r#"
ENTITY("A"):
    NODE("A") a:
        - x = A.x
    RELATIONSHIP(a, "r", missing):
"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::SchemaErrorKind::Semantic);
        assert!(err.message.contains("'missing'"));
    }

    #[test]
    fn test_identifier_must_be_declared_above() {
        // `b` is declared, but only after the relationship refers to it.
        let err = compile_schema(
            r#"
ENTITY("A"):
    NODE("A") a:
        - x = A.x
    RELATIONSHIP(a, "r", b):
    NODE("B") b:
        - x = A.x
"#,
        )
        .unwrap_err();
        assert!(err.message.contains("not declared above"));
    }

    #[test]
    fn test_two_primary_keys_rejected() {
        let err = compile_schema(
            r#"
ENTITY("A"):
    NODE("A"):
        + x = A.x
        + y = A.y
"#,
        )
        .unwrap_err();
        assert!(err.message.contains("two or more primary keys"));
    }

    #[test]
    fn test_unknown_wrapper_rejected() {
        let err = compile_schema(
            r#"
ENTITY("A"):
    COMPILER_TEST_NO_SUCH_WRAPPER(NODE("A")):
        - x = A.x
"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::SchemaErrorKind::UnknownSymbol);
    }

    #[test]
    fn test_unknown_value_wrapper_rejected() {
        let err = compile_schema(
            r#"
ENTITY("A"):
    NODE("A"):
        - x = COMPILER_TEST_NO_SUCH_VALUE_WRAPPER(A.x)
"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::SchemaErrorKind::UnknownSymbol);
    }

    #[test]
    fn test_registered_wrapper_resolves() {
        registry::register_subgraph_preprocessor("COMPILER_TEST_PRE", |_, _, _| {
            Ok(Decision::Proceed)
        });
        let schema = compile_schema(
            r#"
ENTITY("A"):
    COMPILER_TEST_PRE(NODE("A")) a:
        - x = A.x
"#,
        )
        .unwrap();
        let plan = schema.plan("A").unwrap();
        assert!(matches!(
            plan.nodes.factories[0],
            SubgraphFactory::Wrapped { .. }
        ));
    }

    #[test]
    fn test_snapshot_freezes_resolution() {
        registry::register_subgraph_preprocessor("COMPILER_TEST_FROZEN", |_, _, _| {
            Ok(Decision::Proceed)
        });
        let snapshot = RegistrySnapshot::current();
        // Later re-registration must not affect compilation against the
        // earlier snapshot.
        let schema = compile_schema_with(
            r#"
ENTITY("A"):
    COMPILER_TEST_FROZEN(NODE("A")):
        - x = A.x
"#,
            &snapshot,
        )
        .unwrap();
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn test_category_mismatch_compiles_with_warning() {
        registry::register_attribute_postprocessor("COMPILER_TEST_ATTR_POST", |attr, _, _| {
            Ok(attr)
        });
        // Attribute postprocessor around a NODE: undefined behaviour, but
        // compilation succeeds and the plan passes through.
        let schema = compile_schema(
            r#"
ENTITY("A"):
    COMPILER_TEST_ATTR_POST(NODE("A")):
        - x = A.x
"#,
        )
        .unwrap();
        let plan = schema.plan("A").unwrap();
        assert!(matches!(
            plan.nodes.factories[0],
            SubgraphFactory::Mismatched { .. }
        ));
    }

    #[test]
    fn test_wrapper_static_args_must_be_literals() {
        registry::register_subgraph_preprocessor("COMPILER_TEST_ARGS", |_, _, _| {
            Ok(Decision::Proceed)
        });
        let err = compile_schema(
            r#"
ENTITY("A"):
    COMPILER_TEST_ARGS(NODE("A"), A.x):
        - x = A.x
"#,
        )
        .unwrap_err();
        assert!(err.message.contains("must be literals"));
    }

    #[test]
    fn test_match_endpoint_compiles() {
        let schema = compile_schema(
            r#"
ENTITY("Person"):
    NODE("Person") person:
        + ID = Person.ID
    RELATIONSHIP(person, "likes", MATCH("Species", Name = Person.FavoriteFlower)):
"#,
        )
        .unwrap();
        let plan = schema.plan("Person").unwrap();
        assert_eq!(plan.relationships.factories.len(), 1);
    }
}
