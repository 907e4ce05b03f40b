//! Intermediate representation for translated programs.
//!
//! Every reader lowers its concrete syntax tree to these types before a
//! writer renders them. The enums are closed: anything a reader does not
//! recognise is carried as [`Stmt::Unsupported`] or [`Expr::Other`] together
//! with its source text, so writers can flag it instead of dropping it.

use serde::{Deserialize, Serialize};

/// A whole program: the ordered top-level statements of one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

/// Statement shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `target = value`, or `a = b = value` with several targets.
    Assign { targets: Vec<Expr>, value: Expr },

    /// `target op= value`.
    AugAssign {
        target: Expr,
        op: BinaryOp,
        value: Expr,
    },

    /// `if test: body`, with `orelse` holding either the `else` block or a
    /// single nested `If` for an `elif`.
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Option<Vec<Stmt>>,
    },

    /// `for target in iter: body`.
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Option<Vec<Stmt>>,
    },

    /// `while test: body`.
    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Option<Vec<Stmt>>,
    },

    Function(Function),

    Return(Option<Expr>),

    /// Bare expression used as a statement.
    Expr(Expr),

    /// Line comment, without the leading marker.
    Comment(String),

    /// A statement outside the supported subset.
    Unsupported { kind: String, text: String },
}

/// A function definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Parameter names in declaration order.
    pub params: Vec<String>,
    /// Decorator source text, e.g. `@cache`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
    pub body: Vec<Stmt>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params,
            decorators: Vec::new(),
            body,
        }
    }
}

/// Expression shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),

    Ident(String),

    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `left op1 c1 op2 c2 ...`, kept flat as written.
    Compare {
        left: Box<Expr>,
        comparators: Vec<Comparator>,
    },

    Bool {
        left: Box<Expr>,
        op: BoolOp,
        right: Box<Expr>,
    },

    Unary { op: UnaryOp, operand: Box<Expr> },

    Call { callee: Box<Expr>, args: Vec<Expr> },

    /// `name=value` inside a call's argument list.
    Keyword { name: String, value: Box<Expr> },

    Attribute { object: Box<Expr>, name: String },

    Subscript { object: Box<Expr>, index: Box<Expr> },

    List(Vec<Expr>),

    /// Explicit parentheses from the source.
    Paren(Box<Expr>),

    /// An expression outside the supported subset, with its source text.
    Other { kind: String, text: String },
}

/// One `(operator, operand)` link of a comparison chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparator {
    pub op: CompareOp,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Numeric literal, verbatim.
    Number(String),
    /// Raw text between the quotes, escapes untouched.
    String(String),
    Bool(bool),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    /// Any other operator, as spelled in the source (`**`, `<<`, `@`, ...).
    Other(String),
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn source(&self) -> &str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Other(op) => op,
        }
    }

    pub fn from_source(op: &str) -> Self {
        match op {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "//" => BinaryOp::FloorDiv,
            "%" => BinaryOp::Mod,
            other => BinaryOp::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    /// `in`, `not in`, `is`, `is not`, ...
    Other(String),
}

impl CompareOp {
    pub fn from_source(op: &str) -> Self {
        match op {
            "==" => CompareOp::Eq,
            "!=" => CompareOp::NotEq,
            "<" => CompareOp::Lt,
            "<=" => CompareOp::LtE,
            ">" => CompareOp::Gt,
            ">=" => CompareOp::GtE,
            other => CompareOp::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    Other(String),
}

// Builders, mostly for tests and hand-built trees.

impl Stmt {
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign {
            targets: vec![target],
            value,
        }
    }

    pub fn aug_assign(target: Expr, op: BinaryOp, value: Expr) -> Self {
        Stmt::AugAssign { target, op, value }
    }

    pub fn if_stmt(test: Expr, body: Vec<Stmt>, orelse: Option<Vec<Stmt>>) -> Self {
        Stmt::If { test, body, orelse }
    }

    pub fn for_in(target: Expr, iter: Expr, body: Vec<Stmt>) -> Self {
        Stmt::For {
            target,
            iter,
            body,
            orelse: None,
        }
    }

    pub fn while_loop(test: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While {
            test,
            body,
            orelse: None,
        }
    }

    pub fn function(func: Function) -> Self {
        Stmt::Function(func)
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return(value)
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn unsupported(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Stmt::Unsupported {
            kind: kind.into(),
            text: text.into(),
        }
    }

    /// Short name of the statement shape, for logs.
    pub fn kind(&self) -> &str {
        match self {
            Stmt::Assign { .. } => "assign",
            Stmt::AugAssign { .. } => "aug_assign",
            Stmt::If { .. } => "if",
            Stmt::For { .. } => "for",
            Stmt::While { .. } => "while",
            Stmt::Function(_) => "function",
            Stmt::Return(_) => "return",
            Stmt::Expr(_) => "expr",
            Stmt::Comment(_) => "comment",
            Stmt::Unsupported { kind, .. } => kind,
        }
    }
}

impl Expr {
    pub fn number(text: impl Into<String>) -> Self {
        Expr::Literal(Literal::Number(text.into()))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(text.into()))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }

    pub fn none() -> Self {
        Expr::Literal(Literal::None)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            comparators: vec![Comparator { op, right }],
        }
    }

    pub fn logical(left: Expr, op: BoolOp, right: Expr) -> Self {
        Expr::Bool {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn keyword(name: impl Into<String>, value: Expr) -> Self {
        Expr::Keyword {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn attribute(object: Expr, name: impl Into<String>) -> Self {
        Expr::Attribute {
            object: Box::new(object),
            name: name.into(),
        }
    }

    pub fn subscript(object: Expr, index: Expr) -> Self {
        Expr::Subscript {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    pub fn paren(inner: Expr) -> Self {
        Expr::Paren(Box::new(inner))
    }

    pub fn other(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Expr::Other {
            kind: kind.into(),
            text: text.into(),
        }
    }

    /// Name of the called function when this is a call to a bare identifier.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::Ident(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether the expression combines operands with an infix operator.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Expr::Binary { .. } | Expr::Compare { .. } | Expr::Bool { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_source_spelling() {
        for op in ["+", "-", "*", "/", "//", "%", "**"] {
            assert_eq!(BinaryOp::from_source(op).source(), op);
        }
        assert_eq!(BinaryOp::from_source("**"), BinaryOp::Other("**".into()));
    }

    #[test]
    fn test_compare_op_from_source() {
        assert_eq!(CompareOp::from_source(">="), CompareOp::GtE);
        assert_eq!(
            CompareOp::from_source("not in"),
            CompareOp::Other("not in".into())
        );
    }

    #[test]
    fn test_callee_name() {
        let call = Expr::call(Expr::ident("print"), vec![Expr::number("1")]);
        assert_eq!(call.callee_name(), Some("print"));

        let method = Expr::call(Expr::attribute(Expr::ident("s"), "push"), vec![]);
        assert_eq!(method.callee_name(), None);
    }

    #[test]
    fn test_serde_shape() {
        let program = Program::new(vec![Stmt::assign(Expr::ident("x"), Expr::number("5"))]);
        let json = serde_json::to_value(&program).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "body": [
                    {"Assign": {"targets": [{"Ident": "x"}], "value": {"Literal": {"Number": "5"}}}}
                ]
            })
        );
        let back: Program = serde_json::from_value(json).unwrap();
        assert_eq!(back, program);
    }
}
