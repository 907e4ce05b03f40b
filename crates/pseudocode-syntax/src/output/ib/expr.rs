//! Inline expression rendering for IB pseudocode.
//!
//! Every function here is pure: an expression becomes a single line of text.
//! Operators outside the notation's vocabulary render as [`UNMAPPED`] so the
//! gap is visible at the spot where it occurs.

use crate::ir::*;

/// Placeholder token for an operator the notation has no word for.
pub const UNMAPPED: &str = "?";

/// Notation token for an arithmetic operator.
pub fn binary_op_token(op: &BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::FloorDiv => "div",
        BinaryOp::Mod => "mod",
        BinaryOp::Other(_) => UNMAPPED,
    }
}

/// Notation token for a comparison operator.
pub fn compare_op_token(op: &CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "=",
        CompareOp::NotEq => "≠",
        CompareOp::Lt => "<",
        CompareOp::LtE => "≤",
        CompareOp::Gt => ">",
        CompareOp::GtE => "≥",
        CompareOp::Other(_) => UNMAPPED,
    }
}

pub fn bool_op_token(op: BoolOp) -> &'static str {
    match op {
        BoolOp::And => "AND",
        BoolOp::Or => "OR",
    }
}

/// Render an expression as one line of pseudocode.
pub fn render_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal(lit) => write_literal(out, lit),

        Expr::Ident(name) => out.push_str(name),

        Expr::Binary { left, op, right } => {
            write_expr(out, left);
            out.push(' ');
            out.push_str(binary_op_token(op));
            out.push(' ');
            write_expr(out, right);
        }

        Expr::Compare { left, comparators } => {
            write_expr(out, left);
            for Comparator { op, right } in comparators {
                out.push(' ');
                out.push_str(compare_op_token(op));
                out.push(' ');
                write_expr(out, right);
            }
        }

        Expr::Bool { left, op, right } => {
            write_expr(out, left);
            out.push(' ');
            out.push_str(bool_op_token(*op));
            out.push(' ');
            write_expr(out, right);
        }

        Expr::Unary { op, operand } => {
            match op {
                UnaryOp::Not => out.push_str("NOT "),
                UnaryOp::Neg => out.push('-'),
                UnaryOp::Pos => out.push('+'),
                UnaryOp::Other(_) => out.push_str(UNMAPPED),
            }
            write_expr(out, operand);
        }

        Expr::Call { callee, args } => {
            write_expr(out, callee);
            out.push('(');
            write_list(out, args);
            out.push(')');
        }

        Expr::Keyword { name, value } => {
            out.push_str(name);
            out.push('=');
            write_expr(out, value);
        }

        Expr::Attribute { object, name } => {
            write_expr(out, object);
            out.push('.');
            out.push_str(name);
        }

        Expr::Subscript { object, index } => {
            write_expr(out, object);
            out.push('[');
            write_expr(out, index);
            out.push(']');
        }

        Expr::List(items) => {
            out.push('[');
            write_list(out, items);
            out.push(']');
        }

        Expr::Paren(inner) => {
            out.push('(');
            write_expr(out, inner);
            out.push(')');
        }

        Expr::Other { text, .. } => out.push_str(&single_line(text)),
    }
}

fn write_list(out: &mut String, items: &[Expr]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, item);
    }
}

fn write_literal(out: &mut String, lit: &Literal) {
    match lit {
        Literal::Number(text) => out.push_str(text),
        Literal::String(body) => {
            out.push('"');
            out.push_str(&quote_body(body));
            out.push('"');
        }
        Literal::Bool(true) => out.push_str("True"),
        Literal::Bool(false) => out.push_str("False"),
        Literal::None => out.push_str("None"),
    }
}

/// Re-quote a raw string body for double quotes, keeping it on one line.
fn quote_body(body: &str) -> String {
    let mut quoted = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                quoted.push('\\');
                if let Some(next) = chars.next() {
                    if next == '\'' {
                        // \' needs no escape inside double quotes
                        quoted.pop();
                    }
                    quoted.push(next);
                }
            }
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => {}
            c => quoted.push(c),
        }
    }
    quoted
}

/// Collapse multi-line source text onto one line.
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Source spellings of every operator in `expr` that rendered as [`UNMAPPED`].
pub fn unmapped_operators(expr: &Expr) -> Vec<String> {
    let mut gaps = Vec::new();
    collect_unmapped(expr, &mut gaps);
    gaps
}

fn collect_unmapped(expr: &Expr, gaps: &mut Vec<String>) {
    match expr {
        Expr::Literal(_) | Expr::Ident(_) | Expr::Other { .. } => {}
        Expr::Binary { left, op, right } => {
            collect_unmapped(left, gaps);
            if let BinaryOp::Other(src) = op {
                gaps.push(src.clone());
            }
            collect_unmapped(right, gaps);
        }
        Expr::Compare { left, comparators } => {
            collect_unmapped(left, gaps);
            for Comparator { op, right } in comparators {
                if let CompareOp::Other(src) = op {
                    gaps.push(src.clone());
                }
                collect_unmapped(right, gaps);
            }
        }
        Expr::Bool { left, right, .. } => {
            collect_unmapped(left, gaps);
            collect_unmapped(right, gaps);
        }
        Expr::Unary { op, operand } => {
            if let UnaryOp::Other(src) = op {
                gaps.push(src.clone());
            }
            collect_unmapped(operand, gaps);
        }
        Expr::Call { callee, args } => {
            collect_unmapped(callee, gaps);
            args.iter().for_each(|arg| collect_unmapped(arg, gaps));
        }
        Expr::List(items) => items.iter().for_each(|item| collect_unmapped(item, gaps)),
        Expr::Keyword { value: inner, .. }
        | Expr::Attribute { object: inner, .. }
        | Expr::Paren(inner) => collect_unmapped(inner, gaps),
        Expr::Subscript { object, index } => {
            collect_unmapped(object, gaps);
            collect_unmapped(index, gaps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::binary(left, op, right)
    }

    #[test]
    fn test_literals_and_names() {
        assert_eq!(render_expr(&Expr::number("3.14")), "3.14");
        assert_eq!(render_expr(&Expr::string("Pass")), "\"Pass\"");
        assert_eq!(render_expr(&Expr::bool(true)), "True");
        assert_eq!(render_expr(&Expr::none()), "None");
        assert_eq!(render_expr(&Expr::ident("score")), "score");
    }

    #[test]
    fn test_string_requoting() {
        assert_eq!(render_expr(&Expr::string("say \"hi\"")), r#""say \"hi\"""#);
        assert_eq!(render_expr(&Expr::string(r"it\'s")), r#""it's""#);
        assert_eq!(render_expr(&Expr::string(r"a\nb")), r#""a\nb""#);
        assert_eq!(render_expr(&Expr::string("line1\nline2")), r#""line1\nline2""#);
    }

    #[test]
    fn test_arithmetic_vocabulary() {
        let cases = [
            (BinaryOp::Add, "a + b"),
            (BinaryOp::Sub, "a - b"),
            (BinaryOp::Mul, "a * b"),
            (BinaryOp::Div, "a / b"),
            (BinaryOp::FloorDiv, "a div b"),
            (BinaryOp::Mod, "a mod b"),
            (BinaryOp::Other("**".into()), "a ? b"),
        ];
        for (op, expected) in cases {
            let expr = bin(Expr::ident("a"), op, Expr::ident("b"));
            assert_eq!(render_expr(&expr), expected);
            // Same operator, same token, every time.
            assert_eq!(render_expr(&expr), expected);
        }
    }

    #[test]
    fn test_comparison_vocabulary() {
        let cases = [
            (CompareOp::Eq, "="),
            (CompareOp::NotEq, "≠"),
            (CompareOp::Lt, "<"),
            (CompareOp::LtE, "≤"),
            (CompareOp::Gt, ">"),
            (CompareOp::GtE, "≥"),
            (CompareOp::Other("is".into()), "?"),
        ];
        for (op, token) in cases {
            assert_eq!(compare_op_token(&op), token);
        }
    }

    #[test]
    fn test_chained_comparison_flattens() {
        let expr = Expr::Compare {
            left: Box::new(Expr::ident("a")),
            comparators: vec![
                Comparator {
                    op: CompareOp::Lt,
                    right: Expr::ident("b"),
                },
                Comparator {
                    op: CompareOp::LtE,
                    right: Expr::ident("c"),
                },
            ],
        };
        assert_eq!(render_expr(&expr), "a < b ≤ c");
    }

    #[test]
    fn test_logical_operators() {
        let expr = Expr::logical(
            Expr::unary(UnaryOp::Not, Expr::ident("done")),
            BoolOp::And,
            Expr::compare(Expr::ident("x"), CompareOp::NotEq, Expr::number("0")),
        );
        assert_eq!(render_expr(&expr), "NOT done AND x ≠ 0");
    }

    #[test]
    fn test_deep_nesting() {
        let mut expr = Expr::ident("x");
        for i in 0..200 {
            expr = bin(expr, BinaryOp::Add, Expr::number(i.to_string()));
        }
        let text = render_expr(&expr);
        assert!(text.starts_with("x + 0 + 1 + 2"));
        assert!(text.ends_with("+ 199"));
    }

    #[test]
    fn test_structural_reconstruction() {
        let expr = Expr::call(
            Expr::attribute(Expr::ident("names"), "append"),
            vec![
                Expr::subscript(Expr::ident("A"), Expr::number("0")),
                Expr::List(vec![Expr::number("1"), Expr::number("2")]),
                Expr::keyword("key", Expr::paren(bin(Expr::ident("i"), BinaryOp::Mod, Expr::number("2")))),
            ],
        );
        assert_eq!(render_expr(&expr), "names.append(A[0], [1, 2], key=(i mod 2))");
    }

    #[test]
    fn test_other_collapses_lines() {
        let expr = Expr::other("dictionary", "{\n    \"a\": 1,\n    \"b\": 2\n}");
        assert_eq!(render_expr(&expr), "{ \"a\": 1, \"b\": 2 }");
    }

    #[test]
    fn test_unmapped_operators_are_collected() {
        let expr = Expr::compare(
            bin(Expr::ident("a"), BinaryOp::Other("**".into()), Expr::number("2")),
            CompareOp::Other("in".into()),
            Expr::call(Expr::ident("f"), vec![Expr::unary(UnaryOp::Other("~".into()), Expr::ident("b"))]),
        );
        assert_eq!(unmapped_operators(&expr), vec!["**", "in", "~"]);
        assert!(unmapped_operators(&Expr::ident("a")).is_empty());
    }
}
