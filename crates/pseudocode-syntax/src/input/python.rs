//! Tree-sitter based Python reader.

use crate::ir::*;
use crate::traits::{ReadError, Reader};
use tree_sitter::{Node, Parser, Tree};

/// Static instance of the Python reader for registry.
pub static PYTHON_READER: PythonReader = PythonReader;

/// Python reader using tree-sitter.
pub struct PythonReader;

impl Reader for PythonReader {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyw"]
    }

    fn read(&self, source: &str) -> Result<Program, ReadError> {
        read_python(source)
    }
}

/// Parse Python source into IR.
pub fn read_python(source: &str) -> Result<Program, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_python::language().into())
        .map_err(|err| ReadError::Language(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ReadError::Parse("failed to parse".into()))?;

    let ctx = ReadContext::new(source);
    ctx.read_program(&tree)
}

/// First error or missing node in document order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Statement and clause node kinds, as opposed to expressions used as
/// statements.
fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement")
        || kind.ends_with("_definition")
        || kind.ends_with("_clause")
        || kind == "decorator"
}

fn missing(node: &'static str, field: &'static str) -> ReadError {
    ReadError::MissingField { node, field }
}

struct ReadContext<'a> {
    source: &'a str,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// First source line of a node, for one-line summaries of compound statements.
    fn first_line(&self, node: Node) -> String {
        self.node_text(node)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .to_string()
    }

    fn field<'t>(
        &self,
        node: Node<'t>,
        kind: &'static str,
        field: &'static str,
    ) -> Result<Node<'t>, ReadError> {
        node.child_by_field_name(field)
            .ok_or_else(|| missing(kind, field))
    }

    /// Named children that carry content (comments are extras in tree-sitter
    /// and may show up anywhere).
    fn operands<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect()
    }

    fn read_program(&self, tree: &Tree) -> Result<Program, ReadError> {
        let root = tree.root_node();

        if let Some(err) = first_error(root) {
            let pos = err.start_position();
            return Err(ReadError::Syntax {
                line: pos.row + 1,
                column: pos.column + 1,
            });
        }

        Ok(Program::new(self.read_block_stmts(root)?))
    }

    fn read_stmt(&self, node: Node) -> Result<Stmt, ReadError> {
        tracing::trace!(kind = node.kind(), "reading statement");
        match node.kind() {
            "comment" => Ok(self.read_comment(node)),

            "expression_statement" => self.read_expression_statement(node),

            // arborium-python puts these directly under `block` / `module`
            "assignment" => self.read_assignment(node),
            "augmented_assignment" => self.read_augmented_assignment(node),

            "if_statement" => self.read_if_statement(node),
            "while_statement" => self.read_while_statement(node),
            "for_statement" => self.read_for_statement(node),

            "return_statement" => {
                let value = self.operands(node).first().map(|n| self.read_expr(*n));
                Ok(Stmt::return_stmt(value.transpose()?))
            }

            "function_definition" => self.read_function_definition(node),

            "decorated_definition" => {
                let definition = self.field(node, "decorated_definition", "definition")?;
                if definition.kind() != "function_definition" {
                    return Ok(Stmt::unsupported(
                        definition.kind(),
                        self.first_line(definition),
                    ));
                }
                let mut cursor = node.walk();
                let decorators: Vec<String> = node
                    .children(&mut cursor)
                    .filter(|c| c.kind() == "decorator")
                    .map(|c| self.node_text(c).trim().to_string())
                    .collect();
                match self.read_function_definition(definition)? {
                    Stmt::Function(mut func) => {
                        func.decorators = decorators;
                        Ok(Stmt::Function(func))
                    }
                    other => Ok(other),
                }
            }

            // pass, break, continue, import, class, try, with, raise, ...
            kind if is_statement_kind(kind) => Ok(Stmt::unsupported(kind, self.first_line(node))),

            // Bare expressions: calls, names, operators, literals
            _ => Ok(Stmt::expr(self.read_expr(node)?)),
        }
    }

    fn read_comment(&self, node: Node) -> Stmt {
        let text = self.node_text(node).trim_start_matches('#').trim();
        Stmt::Comment(text.to_string())
    }

    /// Comments that tree-sitter attached to `owner` between `from` and `to`
    /// (e.g. on the first line of a body, or before an `elif`).
    fn comments_between(&self, owner: Node, from: usize, to: usize) -> Vec<Stmt> {
        let mut cursor = owner.walk();
        owner
            .children(&mut cursor)
            .filter(|c| c.kind() == "comment" && c.start_byte() >= from && c.end_byte() <= to)
            .map(|c| self.read_comment(c))
            .collect()
    }

    /// Read a body block, keeping the comments `owner` holds in front of it.
    fn read_body(&self, owner: Node, from: usize, body: Node) -> Result<Vec<Stmt>, ReadError> {
        let mut stmts = self.comments_between(owner, from, body.start_byte());
        stmts.extend(self.read_block_stmts(body)?);
        Ok(stmts)
    }

    fn read_expression_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let children = self.operands(node);
        match children.as_slice() {
            [child] => match child.kind() {
                "assignment" => self.read_assignment(*child),
                "augmented_assignment" => self.read_augmented_assignment(*child),
                _ => Ok(Stmt::expr(self.read_expr(*child)?)),
            },
            // Bare tuple: `a, b`
            [_, ..] => Ok(Stmt::expr(Expr::other(
                "expression_list",
                self.node_text(node),
            ))),
            [] => Err(missing("expression_statement", "expression")),
        }
    }

    fn read_assignment(&self, node: Node) -> Result<Stmt, ReadError> {
        // `a = b = v` nests as assignment(a, assignment(b, v))
        let mut targets = Vec::new();
        let mut current = node;
        loop {
            let left = self.field(current, "assignment", "left")?;
            targets.push(self.read_expr(left)?);

            let Some(right) = current.child_by_field_name("right") else {
                // Bare annotation: `x: int`
                return Ok(Stmt::unsupported("annotation", self.first_line(node)));
            };

            if right.kind() == "assignment" {
                current = right;
            } else {
                let value = self.read_expr(right)?;
                return Ok(Stmt::Assign { targets, value });
            }
        }
    }

    fn read_augmented_assignment(&self, node: Node) -> Result<Stmt, ReadError> {
        let left = self.field(node, "augmented_assignment", "left")?;
        let right = self.field(node, "augmented_assignment", "right")?;
        let op_node = self.field(node, "augmented_assignment", "operator")?;

        let op_text = self.node_text(op_node);
        let op = BinaryOp::from_source(op_text.strip_suffix('=').unwrap_or(op_text));

        Ok(Stmt::aug_assign(
            self.read_expr(left)?,
            op,
            self.read_expr(right)?,
        ))
    }

    fn read_if_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let condition = self.field(node, "if_statement", "condition")?;
        let consequence = self.field(node, "if_statement", "consequence")?;

        let test = self.read_expr(condition)?;
        let body = self.read_body(node, node.start_byte(), consequence)?;

        // elif/else clauses are siblings here. Read them in order, then fold
        // them back into a chain from the last one.
        let mut cursor = node.walk();
        let alternatives: Vec<_> = node
            .children_by_field_name("alternative", &mut cursor)
            .collect();

        let mut clauses = Vec::with_capacity(alternatives.len());
        let mut prev_end = consequence.end_byte();
        for alt in alternatives {
            let mut leading = self.comments_between(node, prev_end, alt.start_byte());
            prev_end = alt.end_byte();
            match alt.kind() {
                "else_clause" => {
                    let block = self.field(alt, "else_clause", "body")?;
                    leading.extend(self.read_body(alt, alt.start_byte(), block)?);
                    clauses.push((None, leading));
                }
                "elif_clause" => {
                    let condition = self.field(alt, "elif_clause", "condition")?;
                    let block = self.field(alt, "elif_clause", "consequence")?;
                    leading.extend(self.read_body(alt, alt.start_byte(), block)?);
                    clauses.push((Some(self.read_expr(condition)?), leading));
                }
                _ => {}
            }
        }

        let mut orelse = None;
        for (condition, body) in clauses.into_iter().rev() {
            orelse = Some(match condition {
                Some(test) => vec![Stmt::if_stmt(test, body, orelse.take())],
                None => body,
            });
        }

        Ok(Stmt::if_stmt(test, body, orelse))
    }

    fn read_else_clause(&self, node: Node, body: Node) -> Result<Option<Vec<Stmt>>, ReadError> {
        match node.child_by_field_name("alternative") {
            Some(alt) if alt.kind() == "else_clause" => {
                let block = self.field(alt, "else_clause", "body")?;
                let mut stmts = self.comments_between(node, body.end_byte(), alt.start_byte());
                stmts.extend(self.read_body(alt, alt.start_byte(), block)?);
                Ok(Some(stmts))
            }
            _ => Ok(None),
        }
    }

    fn read_while_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let condition = self.field(node, "while_statement", "condition")?;
        let body = self.field(node, "while_statement", "body")?;

        Ok(Stmt::While {
            test: self.read_expr(condition)?,
            body: self.read_body(node, node.start_byte(), body)?,
            orelse: self.read_else_clause(node, body)?,
        })
    }

    fn read_for_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        if node.child(0).is_some_and(|c| c.kind() == "async") {
            return Ok(Stmt::unsupported("async_for", self.first_line(node)));
        }

        let left = self.field(node, "for_statement", "left")?;
        let right = self.field(node, "for_statement", "right")?;
        let body = self.field(node, "for_statement", "body")?;

        Ok(Stmt::For {
            target: self.read_expr(left)?,
            iter: self.read_expr(right)?,
            body: self.read_body(node, node.start_byte(), body)?,
            orelse: self.read_else_clause(node, body)?,
        })
    }

    fn read_function_definition(&self, node: Node) -> Result<Stmt, ReadError> {
        if node.child(0).is_some_and(|c| c.kind() == "async") {
            return Ok(Stmt::unsupported("async_function", self.first_line(node)));
        }

        let name = self.field(node, "function_definition", "name")?;
        let body = self.field(node, "function_definition", "body")?;

        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.read_parameters(p))
            .unwrap_or_default();

        Ok(Stmt::function(Function::new(
            self.node_text(name),
            params,
            self.read_body(node, node.start_byte(), body)?,
        )))
    }

    fn read_parameters(&self, node: Node) -> Vec<String> {
        let mut params = Vec::new();
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            match child.kind() {
                "identifier" => params.push(self.node_text(child).to_string()),
                // `*rest` and `**options` contribute their bare names
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    let name = self.node_text(child).trim_start_matches('*').trim();
                    params.push(name.to_string());
                }
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        params.push(self.node_text(name).to_string());
                    }
                }
                "typed_parameter" => {
                    // Name only, the annotation is dropped
                    if let Some(name) = child.child(0) {
                        params.push(self.node_text(name).to_string());
                    }
                }
                // `*` and `/` separators, punctuation, comments
                _ => {}
            }
        }

        params
    }

    fn read_block_stmts(&self, node: Node) -> Result<Vec<Stmt>, ReadError> {
        let mut stmts = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            stmts.push(self.read_stmt(child)?);
        }

        Ok(stmts)
    }

    fn read_expr(&self, node: Node) -> Result<Expr, ReadError> {
        match node.kind() {
            "integer" | "float" => Ok(Expr::number(self.node_text(node))),

            "string" => Ok(self.read_string(node)),

            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "none" => Ok(Expr::none()),

            "identifier" => Ok(Expr::ident(self.node_text(node))),

            "binary_operator" => {
                let left = self.field(node, "binary_operator", "left")?;
                let right = self.field(node, "binary_operator", "right")?;
                let op = self.field(node, "binary_operator", "operator")?;
                Ok(Expr::binary(
                    self.read_expr(left)?,
                    BinaryOp::from_source(self.node_text(op)),
                    self.read_expr(right)?,
                ))
            }

            "comparison_operator" => self.read_comparison_operator(node),

            "boolean_operator" => {
                let left = self.field(node, "boolean_operator", "left")?;
                let right = self.field(node, "boolean_operator", "right")?;
                let op = self.field(node, "boolean_operator", "operator")?;
                let op = match self.node_text(op) {
                    "and" => BoolOp::And,
                    _ => BoolOp::Or,
                };
                Ok(Expr::logical(
                    self.read_expr(left)?,
                    op,
                    self.read_expr(right)?,
                ))
            }

            "not_operator" => {
                let arg = self.field(node, "not_operator", "argument")?;
                Ok(Expr::unary(UnaryOp::Not, self.read_expr(arg)?))
            }

            "unary_operator" => {
                let op = self.field(node, "unary_operator", "operator")?;
                let arg = self.field(node, "unary_operator", "argument")?;
                let op = match self.node_text(op) {
                    "-" => UnaryOp::Neg,
                    "+" => UnaryOp::Pos,
                    other => UnaryOp::Other(other.to_string()),
                };
                Ok(Expr::unary(op, self.read_expr(arg)?))
            }

            "call" => self.read_call(node),

            "attribute" => {
                let object = self.field(node, "attribute", "object")?;
                let attribute = self.field(node, "attribute", "attribute")?;
                Ok(Expr::attribute(
                    self.read_expr(object)?,
                    self.node_text(attribute),
                ))
            }

            "subscript" => {
                let value = self.field(node, "subscript", "value")?;
                let mut cursor = node.walk();
                let indices: Vec<_> = node
                    .children_by_field_name("subscript", &mut cursor)
                    .collect();
                match indices.as_slice() {
                    [index] => Ok(Expr::subscript(
                        self.read_expr(value)?,
                        self.read_expr(*index)?,
                    )),
                    // a[i, j]
                    _ => Ok(Expr::other("subscript", self.node_text(node))),
                }
            }

            "list" => {
                let items = self
                    .operands(node)
                    .into_iter()
                    .map(|item| self.read_expr(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::List(items))
            }

            "parenthesized_expression" => match self.operands(node).first() {
                Some(inner) => Ok(Expr::paren(self.read_expr(*inner)?)),
                None => Err(missing("parenthesized_expression", "expression")),
            },

            // dict, tuple, comprehension, lambda, conditional expression,
            // f-string concatenation, walrus, ...
            kind => Ok(Expr::other(kind, self.node_text(node))),
        }
    }

    fn read_string(&self, node: Node) -> Expr {
        let text = self.node_text(node);

        let mut cursor = node.walk();
        let interpolated = node
            .children(&mut cursor)
            .any(|c| c.kind() == "interpolation");

        let body_start = text.find(['"', '\'']).unwrap_or(0);
        let prefix = &text[..body_start];
        if prefix.contains(['b', 'B']) {
            return Expr::other("string", text);
        }
        if interpolated || prefix.contains(['f', 'F']) {
            return self
                .read_fstring(node)
                .unwrap_or_else(|| Expr::other("string", text));
        }

        let quoted = &text[body_start..];
        let delimiter = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
            3
        } else {
            1
        };
        let inner = quoted
            .get(delimiter..quoted.len().saturating_sub(delimiter))
            .unwrap_or("");
        Expr::string(inner)
    }

    /// Lower `f"Hello, {name}!"` to `"Hello, " + name + "!"`.
    ///
    /// `None` when a replacement field carries a conversion or format spec,
    /// which concatenation cannot express.
    fn read_fstring(&self, node: Node) -> Option<Expr> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            match child.kind() {
                "string_content" | "escape_sequence" => text.push_str(self.node_text(child)),
                // `{{` / `}}`
                "escape_interpolation" => text.push_str(self.node_text(child).get(..1).unwrap_or("")),
                "interpolation" => {
                    let mut inner = child.walk();
                    let plain = child
                        .named_children(&mut inner)
                        .all(|c| !matches!(c.kind(), "type_conversion" | "format_specifier"));
                    if !plain {
                        return None;
                    }
                    let expression = child.child_by_field_name("expression")?;
                    if !text.is_empty() {
                        parts.push(Expr::string(std::mem::take(&mut text)));
                    }
                    parts.push(self.read_expr(expression).ok()?);
                }
                _ => {}
            }
        }
        if !text.is_empty() || parts.is_empty() {
            parts.push(Expr::string(text));
        }

        let mut parts = parts.into_iter();
        let first = parts.next()?;
        Some(parts.fold(first, |left, right| Expr::binary(left, BinaryOp::Add, right)))
    }

    fn read_comparison_operator(&self, node: Node) -> Result<Expr, ReadError> {
        // Operands are named children, operators are anonymous tokens
        // (`not in` and `is not` arrive as single aliased tokens).
        let mut cursor = node.walk();
        let mut left = None;
        let mut pending_op = None;
        let mut comparators = Vec::new();

        for child in node.children(&mut cursor) {
            if child.kind() == "comment" {
                continue;
            }
            if child.is_named() {
                let operand = self.read_expr(child)?;
                match (left.is_none(), pending_op.take()) {
                    (true, _) => left = Some(operand),
                    (false, Some(op)) => comparators.push(Comparator { op, right: operand }),
                    (false, None) => return Err(missing("comparison_operator", "operators")),
                }
            } else {
                pending_op = Some(CompareOp::from_source(child.kind()));
            }
        }

        let left = left.ok_or_else(|| missing("comparison_operator", "left operand"))?;
        Ok(Expr::Compare {
            left: Box::new(left),
            comparators,
        })
    }

    fn read_call(&self, node: Node) -> Result<Expr, ReadError> {
        let function = self.field(node, "call", "function")?;
        let callee = self.read_expr(function)?;

        let args = match node.child_by_field_name("arguments") {
            Some(arguments) if arguments.kind() == "argument_list" => {
                self.read_arguments(arguments)?
            }
            // f(x for x in xs)
            Some(generator) => vec![Expr::other(generator.kind(), self.node_text(generator))],
            None => Vec::new(),
        };

        Ok(Expr::call(callee, args))
    }

    fn read_arguments(&self, node: Node) -> Result<Vec<Expr>, ReadError> {
        self.operands(node)
            .into_iter()
            .map(|arg| {
                if arg.kind() == "keyword_argument" {
                    let name = self.field(arg, "keyword_argument", "name")?;
                    let value = self.field(arg, "keyword_argument", "value")?;
                    Ok(Expr::keyword(self.node_text(name), self.read_expr(value)?))
                } else {
                    self.read_expr(arg)
                }
            })
            .collect()
    }
}
