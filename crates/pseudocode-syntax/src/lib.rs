//! Python to IB pseudocode translation.
//!
//! `pseudocode-syntax` parses a Python subset into a small IR and renders
//! that IR in the IB Computer Science pseudocode notation (`←`, `IF … THEN`,
//! `loop … from … to …`, `OUTPUT`). It maps syntax, not semantics: nothing
//! is type-checked or executed.
//!
//! # Architecture
//!
//! ```text
//! Source Language         IR              Target Notation
//! ────────────────    ─────────────    ────────────────────
//! Python          ───> Program ──────> IB pseudocode
//! (tree-sitter)         (ir)            (output::ib)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pseudocode_syntax::{RenderOptions, input, output};
//!
//! let ir = input::read_python("for i in range(0, 10):\n    print(i)\n")?;
//! let out = output::IbWriter::emit(&ir, &RenderOptions::default())?;
//! // => "loop i from 0 to 9\n    OUTPUT i\nend loop"
//! ```
//!
//! # Unsupported input
//!
//! Constructs outside the supported subset are never dropped. They render as
//! lines starting with `// ⚠` (or an inline `?` for an unmapped operator) and
//! are listed in [`Rendered::flags`], so a reviewer can find every gap.

pub mod ir;
pub mod registry;
pub mod traits;

pub mod input;
pub mod output;

// Re-exports: IR types
pub use ir::{
    BinaryOp, BoolOp, CompareOp, Comparator, Expr, Function, Literal, Program, Stmt, UnaryOp,
};

// Re-exports: Traits
pub use traits::{Flag, ReadError, Reader, RenderOptions, Rendered, WriteError, Writer};

// Re-exports: Registry
pub use registry::{
    reader_for_extension, reader_for_language, readers, register_reader, register_writer,
    writer_for_language, writers,
};

// Re-exports: Built-in readers
#[cfg(feature = "read-python")]
pub use input::python::PythonReader;
#[cfg(feature = "read-python")]
pub use input::read_python;

// Re-exports: Built-in writers
#[cfg(feature = "write-ib")]
pub use output::IbWriter;
#[cfg(feature = "write-ib")]
pub use output::ib::IbWriterImpl;
