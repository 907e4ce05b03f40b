//! IB pseudocode writer.
//!
//! Walks the IR depth-first and emits the IB Computer Science pseudocode
//! notation: `←` assignment, `IF … THEN` / `END IF`, `WHILE … DO` /
//! `END WHILE`, `loop … from … to …` / `end loop`, `FUNCTION` /
//! `END FUNCTION`, `OUTPUT` and `INPUT`.
//!
//! Loop terminators are lower-case while every other terminator is upper-case.
//! That is how the notation is written and consumers match it verbatim.
//!
//! Constructs outside the notation never abort the walk. Each becomes a line
//! starting with [`FLAG_MARKER`] (or, for an unmapped operator, an inline `?`)
//! and is recorded as a [`Flag`] in the result.

mod expr;

pub use expr::{
    UNMAPPED, binary_op_token, bool_op_token, compare_op_token, render_expr, single_line,
    unmapped_operators,
};

use crate::ir::*;
use crate::traits::{Flag, RenderOptions, Rendered, WriteError, Writer};

/// Static instance of the IB writer for registry.
pub static IB_WRITER: IbWriterImpl = IbWriterImpl;

/// Prefix of every flagged line.
pub const FLAG_MARKER: &str = "// ⚠";

/// IB writer implementing the Writer trait.
pub struct IbWriterImpl;

impl Writer for IbWriterImpl {
    fn language(&self) -> &'static str {
        "ib"
    }

    fn extension(&self) -> &'static str {
        "pseudo"
    }

    fn write(&self, program: &Program, options: &RenderOptions) -> Result<Rendered, WriteError> {
        IbWriter::emit(program, options)
    }
}

/// Render state for one translation run.
pub struct IbWriter<'o> {
    options: &'o RenderOptions,
    lines: Vec<String>,
    depth: usize,
    flags: Vec<Flag>,
}

impl<'o> IbWriter<'o> {
    pub fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
            depth: 0,
            flags: Vec::new(),
        }
    }

    /// Render a whole program.
    pub fn emit(program: &Program, options: &RenderOptions) -> Result<Rendered, WriteError> {
        let mut writer = IbWriter::new(options);
        writer.write_program(program)?;
        Ok(writer.finish())
    }

    fn finish(self) -> Rendered {
        Rendered {
            text: self.lines.join("\n"),
            flags: self.flags,
        }
    }

    fn write_program(&mut self, program: &Program) -> Result<(), WriteError> {
        for stmt in &program.body {
            self.write_stmt(stmt)?;
        }
        Ok(())
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let indent = " ".repeat(self.depth * self.options.indent_width);
        self.lines.push(format!("{indent}{}", text.as_ref()));
    }

    /// Attach a flag to the most recently emitted line.
    fn record(&mut self, construct: &str, detail: impl Into<String>) {
        let flag = Flag {
            line: self.lines.len(),
            construct: construct.to_string(),
            detail: detail.into(),
        };
        tracing::debug!(
            line = flag.line,
            construct = %flag.construct,
            detail = %flag.detail,
            "flagged construct"
        );
        self.flags.push(flag);
    }

    /// Emit a flagged placeholder line for an unsupported construct.
    fn flag_line(&mut self, construct: &str, detail: &str) {
        self.line(format!("{FLAG_MARKER} unsupported {construct}: {detail}"));
        self.record(construct, detail);
    }

    /// Record every unmapped operator in `expr` against the last line.
    fn note_gaps(&mut self, expr: &Expr) {
        for op in unmapped_operators(expr) {
            self.record("operator", format!("no notation for `{op}`"));
        }
    }

    /// Render a block body one level deeper.
    ///
    /// The depth is restored before returning, also when a nested statement
    /// fails.
    fn block(&mut self, construct: &'static str, body: &[Stmt]) -> Result<(), WriteError> {
        if body.is_empty() {
            return Err(WriteError::EmptyBody { construct });
        }
        self.depth += 1;
        let result = body.iter().try_for_each(|stmt| self.write_stmt(stmt));
        self.depth -= 1;
        result
    }

    fn write_stmt(&mut self, stmt: &Stmt) -> Result<(), WriteError> {
        tracing::trace!(depth = self.depth, kind = stmt.kind(), "writing statement");
        match stmt {
            Stmt::Assign { targets, value } => self.write_assign(targets, value),

            Stmt::AugAssign { target, op, value } => {
                self.write_aug_assign(target, op, value);
                Ok(())
            }

            Stmt::If { test, body, orelse } => self.write_if(test, body, orelse.as_deref()),

            Stmt::For {
                target,
                iter,
                body,
                orelse,
            } => {
                let var = render_expr(target);
                match range_bounds(iter) {
                    Some((start, bound)) => {
                        let start = start.map_or_else(|| "0".to_string(), render_expr);
                        self.line(format!("loop {var} from {start} to {}", last_index(bound)));
                        self.note_gaps(iter);
                    }
                    None => {
                        let detail = format!("for {var} in {}", render_expr(iter));
                        self.flag_line("for loop", &detail);
                    }
                }
                self.block("loop", body)?;
                self.line("end loop");
                self.write_loop_else(orelse.as_deref())
            }

            Stmt::While { test, body, orelse } => {
                self.line(format!("WHILE {} DO", render_expr(test)));
                self.note_gaps(test);
                self.block("WHILE", body)?;
                self.line("END WHILE");
                self.write_loop_else(orelse.as_deref())
            }

            Stmt::Function(func) => self.write_function(func),

            Stmt::Return(value) => {
                match value {
                    Some(value) => {
                        self.line(format!("RETURN {}", render_expr(value)));
                        self.note_gaps(value);
                    }
                    None => self.line("RETURN"),
                }
                Ok(())
            }

            Stmt::Expr(expr) => {
                self.write_expr_stmt(expr);
                Ok(())
            }

            Stmt::Comment(text) if text.is_empty() => {
                self.line("//");
                Ok(())
            }

            Stmt::Comment(text) => {
                self.line(format!("// {text}"));
                Ok(())
            }

            Stmt::Unsupported { kind, text } => {
                let construct = kind.replace('_', " ");
                self.flag_line(&construct, &single_line(text));
                Ok(())
            }
        }
    }

    fn write_assign(&mut self, targets: &[Expr], value: &Expr) -> Result<(), WriteError> {
        let (first, rest) = targets.split_first().ok_or(WriteError::NoAssignTarget)?;
        let first_text = render_expr(first);

        match self.input_prompt(value) {
            Some(prompt) => {
                if let Some(prompt) = prompt {
                    self.line(format!("OUTPUT {}", render_expr(prompt)));
                }
                self.line(format!("INPUT {first_text}"));
            }
            None => {
                self.line(format!("{first_text} ← {}", render_expr(value)));
                self.note_gaps(first);
                self.note_gaps(value);
            }
        }

        // `a = b = v` binds every target to the same value
        for target in rest {
            self.line(format!("{} ← {first_text}", render_expr(target)));
        }
        Ok(())
    }

    /// `Some(prompt)` when `value` is a call to an input primitive.
    fn input_prompt<'e>(&self, value: &'e Expr) -> Option<Option<&'e Expr>> {
        let Expr::Call { args, .. } = value else {
            return None;
        };
        let name = value.callee_name()?;
        if !self.options.is_input_function(name) {
            return None;
        }
        match args.as_slice() {
            [] => Some(None),
            [Expr::Keyword { .. }] => None,
            [prompt] => Some(Some(prompt)),
            _ => None,
        }
    }

    fn write_aug_assign(&mut self, target: &Expr, op: &BinaryOp, value: &Expr) {
        let target_text = render_expr(target);
        // Parenthesize so `x *= a + b` keeps its meaning once desugared.
        let value_text = if value.is_compound() {
            format!("({})", render_expr(value))
        } else {
            render_expr(value)
        };

        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                self.line(format!(
                    "{target_text} ← {target_text} {} {value_text}",
                    binary_op_token(op)
                ));
            }
            _ => {
                let detail = format!("{}=", op.source());
                self.line(format!(
                    "{target_text} ← {target_text} {UNMAPPED} {value_text}  {FLAG_MARKER} unsupported operator: {detail}"
                ));
                self.record("augmented assignment", detail);
            }
        }
        self.note_gaps(value);
    }

    fn write_if(
        &mut self,
        test: &Expr,
        body: &[Stmt],
        orelse: Option<&[Stmt]>,
    ) -> Result<(), WriteError> {
        self.line(format!("IF {} THEN", render_expr(test)));
        self.note_gaps(test);
        self.block("IF", body)?;

        // Flatten elif chains into sibling ELSE IF lines under one END IF.
        let mut orelse = orelse;
        while let Some(alt) = orelse {
            match alt {
                [
                    Stmt::If {
                        test,
                        body,
                        orelse: next,
                    },
                ] => {
                    self.line(format!("ELSE IF {} THEN", render_expr(test)));
                    self.note_gaps(test);
                    self.block("ELSE IF", body)?;
                    orelse = next.as_deref();
                }
                _ => {
                    self.line("ELSE");
                    self.block("ELSE", alt)?;
                    orelse = None;
                }
            }
        }

        self.line("END IF");
        Ok(())
    }

    fn write_loop_else(&mut self, orelse: Option<&[Stmt]>) -> Result<(), WriteError> {
        let Some(body) = orelse else {
            return Ok(());
        };
        self.flag_line("loop else clause", "else:");
        self.block("loop else", body)
    }

    fn write_function(&mut self, func: &Function) -> Result<(), WriteError> {
        if func.name.is_empty() {
            return Err(WriteError::UnnamedFunction);
        }
        for decorator in &func.decorators {
            self.flag_line("decorator", decorator);
        }
        self.line(format!("FUNCTION {}({})", func.name, func.params.join(", ")));
        self.block("FUNCTION", &func.body)?;
        self.line("END FUNCTION");
        Ok(())
    }

    fn write_expr_stmt(&mut self, expr: &Expr) {
        let is_output = expr
            .callee_name()
            .is_some_and(|name| self.options.is_output_function(name));
        let (true, Expr::Call { args, .. }) = (is_output, expr) else {
            self.flag_line("expression statement", &render_expr(expr));
            return;
        };

        let (keywords, positional): (Vec<&Expr>, Vec<&Expr>) = args
            .iter()
            .partition(|arg| matches!(arg, Expr::Keyword { .. }));

        let mut text = String::from("OUTPUT");
        if !positional.is_empty() {
            let rendered: Vec<String> = positional.iter().map(|arg| render_expr(arg)).collect();
            text.push(' ');
            text.push_str(&rendered.join(" , "));
        }

        if keywords.is_empty() {
            self.line(text);
        } else {
            let ignored: Vec<String> = keywords.iter().map(|arg| render_expr(arg)).collect();
            let detail = ignored.join(", ");
            self.line(format!(
                "{text}  {FLAG_MARKER} ignored keyword arguments: {detail}"
            ));
            self.record("output keyword arguments", detail);
        }
        for arg in positional {
            self.note_gaps(arg);
        }
    }
}

/// `(start, bound)` when `iter` is `range(bound)` or `range(start, bound)`.
fn range_bounds(iter: &Expr) -> Option<(Option<&Expr>, &Expr)> {
    let Expr::Call { args, .. } = iter else {
        return None;
    };
    if iter.callee_name() != Some("range") {
        return None;
    }
    if args.iter().any(|arg| matches!(arg, Expr::Keyword { .. })) {
        return None;
    }
    match args.as_slice() {
        [bound] => Some((None, bound)),
        [start, bound] => Some((Some(start), bound)),
        _ => None,
    }
}

/// Inclusive upper index for an exclusive bound: integer literals are folded,
/// anything else renders as `<bound> - 1`.
fn last_index(bound: &Expr) -> String {
    if let Expr::Literal(Literal::Number(text)) = bound {
        if let Ok(n) = text.replace('_', "").parse::<i64>() {
            return (n - 1).to_string();
        }
    }
    format!("{} - 1", render_expr(bound))
}
