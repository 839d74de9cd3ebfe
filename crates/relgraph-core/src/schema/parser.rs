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

//! Parser for the conversion schema language.
//!
//! The language is indentation-structured:
//!
//! ```text
//! ENTITY("Flower"):
//!     NODE("Flower") flower:
//!         - sepal_length = Flower.sepal_length
//!     NODE("Species", "BioEntity") species:
//!         + Name = Flower.species
//!     RELATIONSHIP(flower, "is", species):
//! ```
//!
//! `-` marks a normal attribute, `+` the primary attribute (merge key).
//! A wrapper call may enclose a `NODE`/`RELATIONSHIP` block inline:
//! `IF_HAS_BOSS(RELATIONSHIP(person, "REPORTS_TO", MATCH("Person", ID = Person.ReportsTo))):`.
//! `#` starts a comment. The legacy `RELATION` keyword is accepted as an
//! alias of `RELATIONSHIP`.

use crate::error::{SchemaError, SchemaResult};
use crate::schema::ast::{
    AttrSpec, EndpointSpec, EntitySpec, NodeSpec, RelationshipSpec, SchemaAst, SubBlock,
    ValueExpr, WrapperSpec,
};
use crate::schema::token::{lex_line, strip_comment, Token, TokenKind};
use crate::value::Value;

/// Parse a schema document into its AST.
pub fn parse_schema(input: &str) -> SchemaResult<SchemaAst> {
    let mut ast = SchemaAst::default();
    let mut state = ParserState::default();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line);
        if line.trim().is_empty() {
            continue;
        }
        if line.contains('\t') {
            return Err(SchemaError::parse(
                "tabs are not allowed for indentation; use spaces",
                line_no,
            ));
        }
        let indent = line.len() - line.trim_start_matches(' ').len();
        let tokens = lex_line(line, line_no)?;
        if tokens.is_empty() {
            continue;
        }

        match tokens[0].kind {
            TokenKind::Entity => state.start_entity(&mut ast, tokens, indent, line_no)?,
            TokenKind::Plus | TokenKind::Minus => state.add_attr(tokens, indent, line_no)?,
            _ => state.start_block(tokens, indent, line_no)?,
        }
    }

    state.finish(&mut ast);
    Ok(ast)
}

#[derive(Default)]
struct ParserState {
    entity: Option<EntitySpec>,
    entity_indent: usize,
    block: Option<SubBlock>,
    block_indent: usize,
}

impl ParserState {
    fn close_block(&mut self) {
        if let (Some(entity), Some(block)) = (self.entity.as_mut(), self.block.take()) {
            entity.blocks.push(block);
        }
    }

    fn finish(&mut self, ast: &mut SchemaAst) {
        self.close_block();
        if let Some(entity) = self.entity.take() {
            ast.entities.push(entity);
        }
    }

    fn start_entity(
        &mut self,
        ast: &mut SchemaAst,
        tokens: Vec<Token>,
        indent: usize,
        line_no: usize,
    ) -> SchemaResult<()> {
        self.finish(ast);

        let mut cursor = Cursor::new(&tokens, line_no);
        cursor.expect(&TokenKind::Entity)?;
        cursor.expect(&TokenKind::LParen)?;
        let entity_type = match cursor.next()? {
            TokenKind::Str(s) => s.clone(),
            other => {
                return Err(SchemaError::parse(
                    format!("ENTITY type must be a string literal, found {}", other.describe()),
                    line_no,
                ));
            }
        };
        cursor.expect(&TokenKind::RParen)?;
        cursor.expect(&TokenKind::Colon)?;
        cursor.expect_end()?;

        self.entity = Some(EntitySpec {
            entity_type,
            blocks: Vec::new(),
            line: line_no,
        });
        self.entity_indent = indent;
        Ok(())
    }

    fn start_block(
        &mut self,
        tokens: Vec<Token>,
        indent: usize,
        line_no: usize,
    ) -> SchemaResult<()> {
        if self.entity.is_none() {
            return Err(SchemaError::parse(
                "NODE/RELATIONSHIP block outside of an ENTITY block",
                line_no,
            ));
        }
        if indent <= self.entity_indent {
            return Err(SchemaError::parse(
                "NODE/RELATIONSHIP block must be indented under its ENTITY",
                line_no,
            ));
        }
        self.close_block();

        let mut cursor = Cursor::new(&tokens, line_no);
        let mut block = parse_element(&mut cursor)?;

        // Optional local identifier before the colon.
        if let Some(TokenKind::Ident(_)) = cursor.peek() {
            let name = match cursor.next()? {
                TokenKind::Ident(name) => name.clone(),
                _ => unreachable!(),
            };
            match &mut block {
                SubBlock::Node(node) => node.identifier = Some(name),
                SubBlock::Relationship(_) => {
                    return Err(SchemaError::parse(
                        "an identifier is only allowed on NODE blocks",
                        line_no,
                    ));
                }
            }
        }

        cursor.expect(&TokenKind::Colon)?;
        cursor.expect_end()?;

        self.block = Some(block);
        self.block_indent = indent;
        Ok(())
    }

    fn add_attr(&mut self, tokens: Vec<Token>, indent: usize, line_no: usize) -> SchemaResult<()> {
        let block = self.block.as_mut().ok_or_else(|| {
            SchemaError::parse(
                "attribute line outside of a NODE/RELATIONSHIP block",
                line_no,
            )
        })?;
        if indent <= self.block_indent {
            return Err(SchemaError::parse(
                "attribute line must be indented under its block",
                line_no,
            ));
        }

        let mut cursor = Cursor::new(&tokens, line_no);
        let primary = match cursor.next()? {
            TokenKind::Plus => true,
            TokenKind::Minus => false,
            _ => unreachable!(),
        };
        let name = cursor.expect_ident()?;
        cursor.expect(&TokenKind::Equal)?;
        let value = parse_value_expr(&mut cursor)?;
        cursor.expect_end()?;

        let attr = AttrSpec {
            name,
            value,
            primary,
            line: line_no,
        };
        match block {
            SubBlock::Node(node) => node.attrs.push(attr),
            SubBlock::Relationship(rel) => rel.attrs.push(attr),
        }
        Ok(())
    }
}

/// Token cursor over a single line.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token], line: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            line,
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn next(&mut self) -> SchemaResult<&'a TokenKind> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| SchemaError::parse("unexpected end of line", self.line))?;
        self.pos += 1;
        Ok(&token.kind)
    }

    fn expect(&mut self, kind: &TokenKind) -> SchemaResult<()> {
        match self.tokens.get(self.pos) {
            Some(token) if &token.kind == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(SchemaError::parse(
                format!(
                    "expected {}, found {}",
                    kind.describe(),
                    token.kind.describe()
                ),
                self.line,
            )
            .with_column(token.column)),
            None => Err(SchemaError::parse(
                format!("expected {}, found end of line", kind.describe()),
                self.line,
            )),
        }
    }

    fn expect_ident(&mut self) -> SchemaResult<String> {
        match self.next()? {
            TokenKind::Ident(name) => Ok(name.clone()),
            other => Err(SchemaError::parse(
                format!("expected an identifier, found {}", other.describe()),
                self.line,
            )),
        }
    }

    fn expect_end(&self) -> SchemaResult<()> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(SchemaError::parse(
                format!(
                    "unexpected trailing {}",
                    self.tokens[self.pos].kind.describe()
                ),
                self.line,
            )
            .with_column(self.tokens[self.pos].column))
        }
    }
}

/// Parse a (possibly wrapper-enclosed) NODE or RELATIONSHIP element.
fn parse_element(cursor: &mut Cursor<'_>) -> SchemaResult<SubBlock> {
    match cursor.next()? {
        TokenKind::Node => parse_node(cursor).map(SubBlock::Node),
        TokenKind::Relationship => parse_relationship(cursor).map(SubBlock::Relationship),
        TokenKind::Ident(name) => {
            let wrapper_name = name.clone();
            let line = cursor.line;
            cursor.expect(&TokenKind::LParen)?;
            let mut block = parse_element(cursor)?;
            let mut args = Vec::new();
            loop {
                match cursor.next()? {
                    TokenKind::Comma => args.push(parse_value_expr(cursor)?),
                    TokenKind::RParen => break,
                    other => {
                        return Err(SchemaError::parse(
                            format!("expected ',' or ')', found {}", other.describe()),
                            line,
                        ));
                    }
                }
            }
            let wrapper = WrapperSpec {
                name: wrapper_name,
                args,
                line,
            };
            match &mut block {
                SubBlock::Node(node) => node.wrappers.insert(0, wrapper),
                SubBlock::Relationship(rel) => rel.wrappers.insert(0, wrapper),
            }
            Ok(block)
        }
        other => Err(SchemaError::parse(
            format!(
                "expected 'NODE', 'RELATIONSHIP' or a wrapper call, found {}",
                other.describe()
            ),
            cursor.line,
        )),
    }
}

fn parse_node(cursor: &mut Cursor<'_>) -> SchemaResult<NodeSpec> {
    let line = cursor.line;
    cursor.expect(&TokenKind::LParen)?;
    let mut labels = vec![parse_value_expr(cursor)?];
    loop {
        match cursor.next()? {
            TokenKind::Comma => labels.push(parse_value_expr(cursor)?),
            TokenKind::RParen => break,
            other => {
                return Err(SchemaError::parse(
                    format!("expected ',' or ')', found {}", other.describe()),
                    line,
                ));
            }
        }
    }
    Ok(NodeSpec {
        labels,
        identifier: None,
        attrs: Vec::new(),
        wrappers: Vec::new(),
        line,
    })
}

fn parse_relationship(cursor: &mut Cursor<'_>) -> SchemaResult<RelationshipSpec> {
    let line = cursor.line;
    cursor.expect(&TokenKind::LParen)?;
    let start = parse_endpoint(cursor)?;
    cursor.expect(&TokenKind::Comma)?;
    let rel_type = parse_value_expr(cursor)?;
    cursor.expect(&TokenKind::Comma)?;
    let end = parse_endpoint(cursor)?;
    cursor.expect(&TokenKind::RParen)?;
    Ok(RelationshipSpec {
        start,
        rel_type,
        end,
        attrs: Vec::new(),
        wrappers: Vec::new(),
        line,
    })
}

fn parse_endpoint(cursor: &mut Cursor<'_>) -> SchemaResult<EndpointSpec> {
    match cursor.next()? {
        TokenKind::Ident(name) => Ok(EndpointSpec::Identifier(name.clone())),
        TokenKind::Match => {
            let line = cursor.line;
            cursor.expect(&TokenKind::LParen)?;
            let mut labels = Vec::new();
            let mut conditions = Vec::new();
            loop {
                // A `name = expr` item is a condition; anything else is a
                // label expression.
                if let (Some(TokenKind::Ident(name)), Some(TokenKind::Equal)) = (
                    cursor.peek(),
                    cursor.tokens.get(cursor.pos + 1).map(|t| &t.kind),
                ) {
                    let name = name.clone();
                    cursor.pos += 2;
                    conditions.push((name, parse_value_expr(cursor)?));
                } else {
                    labels.push(parse_value_expr(cursor)?);
                }
                match cursor.next()? {
                    TokenKind::Comma => continue,
                    TokenKind::RParen => break,
                    other => {
                        return Err(SchemaError::parse(
                            format!("expected ',' or ')', found {}", other.describe()),
                            line,
                        ));
                    }
                }
            }
            if labels.is_empty() && conditions.is_empty() {
                return Err(SchemaError::parse("MATCH requires at least one label", line));
            }
            Ok(EndpointSpec::Match { labels, conditions })
        }
        other => Err(SchemaError::parse(
            format!(
                "expected an identifier or 'MATCH', found {}",
                other.describe()
            ),
            cursor.line,
        )),
    }
}

/// Parse a value expression: literal, `Entity.attr`, or wrapper call.
fn parse_value_expr(cursor: &mut Cursor<'_>) -> SchemaResult<ValueExpr> {
    let line = cursor.line;
    match cursor.next()? {
        TokenKind::Str(s) => Ok(ValueExpr::Literal(Value::String(s.clone()))),
        TokenKind::Int(n) => Ok(ValueExpr::Literal(Value::Int(*n))),
        TokenKind::Float(n) => Ok(ValueExpr::Literal(Value::Float(*n))),
        TokenKind::Bool(b) => Ok(ValueExpr::Literal(Value::Bool(*b))),
        TokenKind::Minus => match cursor.next()? {
            TokenKind::Int(n) => Ok(ValueExpr::Literal(Value::Int(-n))),
            TokenKind::Float(n) => Ok(ValueExpr::Literal(Value::Float(-n))),
            other => Err(SchemaError::parse(
                format!("expected a number after '-', found {}", other.describe()),
                line,
            )),
        },
        TokenKind::Ident(name) => {
            let name = name.clone();
            match cursor.peek() {
                Some(TokenKind::Dot) => {
                    cursor.pos += 1;
                    let attr = cursor.expect_ident()?;
                    Ok(ValueExpr::EntityAttr { entity: name, attr })
                }
                Some(TokenKind::LParen) => {
                    cursor.pos += 1;
                    let mut args = vec![parse_value_expr(cursor)?];
                    loop {
                        match cursor.next()? {
                            TokenKind::Comma => args.push(parse_value_expr(cursor)?),
                            TokenKind::RParen => break,
                            other => {
                                return Err(SchemaError::parse(
                                    format!("expected ',' or ')', found {}", other.describe()),
                                    line,
                                ));
                            }
                        }
                    }
                    Ok(ValueExpr::Call { name, args, line })
                }
                _ => Err(SchemaError::parse(
                    format!(
                        "expected a literal, 'Entity.attribute' or a wrapper call, found bare identifier '{}'",
                        name
                    ),
                    line,
                )),
            }
        }
        other => Err(SchemaError::parse(
            format!("expected a value expression, found {}", other.describe()),
            line,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOWER_SCHEMA: &str = r#"
ENTITY("Flower"):
    NODE("Flower") flower:
        - sepal_length = Flower.sepal_length
    NODE("Species", "BioEntity") species:
        + Name = Flower.species
    RELATIONSHIP(flower, "is", species):
"#;

    #[test]
    fn test_parse_flower_schema() {
        let ast = parse_schema(FLOWER_SCHEMA).unwrap();
        assert_eq!(ast.entities.len(), 1);
        let entity = &ast.entities[0];
        assert_eq!(entity.entity_type, "Flower");
        assert_eq!(entity.blocks.len(), 3);

        match &entity.blocks[0] {
            SubBlock::Node(node) => {
                assert_eq!(node.identifier.as_deref(), Some("flower"));
                assert_eq!(node.labels.len(), 1);
                assert_eq!(node.attrs.len(), 1);
                assert!(!node.attrs[0].primary);
            }
            _ => panic!("expected node block"),
        }
        match &entity.blocks[1] {
            SubBlock::Node(node) => {
                assert_eq!(node.labels.len(), 2);
                assert!(node.attrs[0].primary);
                assert_eq!(
                    node.attrs[0].value,
                    ValueExpr::EntityAttr {
                        entity: "Flower".to_string(),
                        attr: "species".to_string()
                    }
                );
            }
            _ => panic!("expected node block"),
        }
        match &entity.blocks[2] {
            SubBlock::Relationship(rel) => {
                assert_eq!(rel.start, EndpointSpec::Identifier("flower".to_string()));
                assert_eq!(
                    rel.rel_type,
                    ValueExpr::Literal(Value::String("is".to_string()))
                );
                assert!(rel.attrs.is_empty());
            }
            _ => panic!("expected relationship block"),
        }
    }

    #[test]
    fn test_parse_match_endpoint() {
        let schema = r#"
ENTITY("Person"):
    NODE("Person") person:
        + ID = Person.ID
    RELATIONSHIP(person, "likes", MATCH("Species", Name = Person.FavoriteFlower)):
"#;
        let ast = parse_schema(schema).unwrap();
        match &ast.entities[0].blocks[1] {
            SubBlock::Relationship(rel) => match &rel.end {
                EndpointSpec::Match { labels, conditions } => {
                    assert_eq!(labels.len(), 1);
                    assert_eq!(conditions.len(), 1);
                    assert_eq!(conditions[0].0, "Name");
                }
                _ => panic!("expected match endpoint"),
            },
            _ => panic!("expected relationship block"),
        }
    }

    #[test]
    fn test_parse_wrapper_around_relationship() {
        let schema = r#"
ENTITY("Person"):
    NODE("Person") person:
        + ID = Person.ID
    IF_HAS_BOSS(RELATIONSHIP(person, "REPORTS_TO", MATCH("Person", ID = Person.ReportsTo))):
"#;
        let ast = parse_schema(schema).unwrap();
        match &ast.entities[0].blocks[1] {
            SubBlock::Relationship(rel) => {
                assert_eq!(rel.wrappers.len(), 1);
                assert_eq!(rel.wrappers[0].name, "IF_HAS_BOSS");
            }
            _ => panic!("expected relationship block"),
        }
    }

    #[test]
    fn test_parse_nested_wrappers_outermost_first() {
        let schema = r#"
ENTITY("A"):
    OUTER(INNER(NODE("A"), 1), "two") a:
        - x = A.x
"#;
        let ast = parse_schema(schema).unwrap();
        match &ast.entities[0].blocks[0] {
            SubBlock::Node(node) => {
                let names: Vec<&str> = node.wrappers.iter().map(|w| w.name.as_str()).collect();
                assert_eq!(names, vec!["OUTER", "INNER"]);
                assert_eq!(node.wrappers[1].args, vec![ValueExpr::Literal(Value::Int(1))]);
                assert_eq!(node.identifier.as_deref(), Some("a"));
            }
            _ => panic!("expected node block"),
        }
    }

    #[test]
    fn test_parse_value_wrapper_call() {
        let schema = r#"
ENTITY("A"):
    NODE("A"):
        - x = UPPER(A.name, True)
"#;
        let ast = parse_schema(schema).unwrap();
        match &ast.entities[0].blocks[0] {
            SubBlock::Node(node) => match &node.attrs[0].value {
                ValueExpr::Call { name, args, .. } => {
                    assert_eq!(name, "UPPER");
                    assert_eq!(args.len(), 2);
                }
                _ => panic!("expected call"),
            },
            _ => panic!("expected node block"),
        }
    }

    #[test]
    fn test_parse_negative_literal() {
        let schema = r#"
ENTITY("A"):
    NODE("A"):
        - x = -3.5
"#;
        let ast = parse_schema(schema).unwrap();
        match &ast.entities[0].blocks[0] {
            SubBlock::Node(node) => {
                assert_eq!(node.attrs[0].value, ValueExpr::Literal(Value::Float(-3.5)));
            }
            _ => panic!("expected node block"),
        }
    }

    #[test]
    fn test_relation_alias_accepted() {
        let schema = r#"
ENTITY("A"):
    NODE("A") a:
        + id = A.id
    RELATION(a, "self", a):
"#;
        let ast = parse_schema(schema).unwrap();
        assert!(matches!(
            ast.entities[0].blocks[1],
            SubBlock::Relationship(_)
        ));
    }

    #[test]
    fn test_multiple_entities() {
        let schema = r#"
ENTITY("A"):
    NODE("A"):
        - x = A.x

ENTITY("B"):
    NODE("B"):
        - y = B.y
"#;
        let ast = parse_schema(schema).unwrap();
        assert_eq!(ast.entities.len(), 2);
        assert_eq!(ast.entities[1].entity_type, "B");
    }

    #[test]
    fn test_comments_are_ignored() {
        let schema = r#"
# conversion schema
ENTITY("A"):  # the A entity
    NODE("A"):
        - x = A.x  # projected attribute
"#;
        let ast = parse_schema(schema).unwrap();
        assert_eq!(ast.entities.len(), 1);
    }

    // ==================== Error cases ====================

    #[test]
    fn test_error_block_outside_entity() {
        let err = parse_schema("NODE(\"A\"):\n").unwrap_err();
        assert!(err.message.contains("outside"));
    }

    #[test]
    fn test_error_attr_outside_block() {
        let err = parse_schema("ENTITY(\"A\"):\n    - x = A.x\n").unwrap_err();
        assert!(err.message.contains("attribute line"));
    }

    #[test]
    fn test_error_missing_colon() {
        let err = parse_schema("ENTITY(\"A\")\n").unwrap_err();
        assert!(err.message.contains("':'"));
    }

    #[test]
    fn test_error_unbalanced_paren() {
        let err = parse_schema("ENTITY(\"A\"):\n    NODE(\"A\":\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_error_entity_type_not_string() {
        let err = parse_schema("ENTITY(Flower):\n").unwrap_err();
        assert!(err.message.contains("string literal"));
    }

    #[test]
    fn test_error_identifier_on_relationship() {
        let schema = r#"
ENTITY("A"):
    NODE("A") a:
        + id = A.id
    RELATIONSHIP(a, "r", a) rel:
"#;
        let err = parse_schema(schema).unwrap_err();
        assert!(err.message.contains("only allowed on NODE"));
    }

    #[test]
    fn test_error_unindented_block() {
        let schema = "ENTITY(\"A\"):\nNODE(\"A\"):\n";
        let err = parse_schema(schema).unwrap_err();
        assert!(err.message.contains("indented"));
    }

    #[test]
    fn test_error_tab_indentation() {
        let schema = "ENTITY(\"A\"):\n\tNODE(\"A\"):\n";
        let err = parse_schema(schema).unwrap_err();
        assert!(err.message.contains("tabs"));
    }

    #[test]
    fn test_error_bare_identifier_value() {
        let schema = "ENTITY(\"A\"):\n    NODE(\"A\"):\n        - x = species\n";
        let err = parse_schema(schema).unwrap_err();
        assert!(err.message.contains("bare identifier"));
    }
}
