//! Traits for language readers and writers.

use crate::ir::Program;
use serde::{Deserialize, Serialize};

/// Error that can occur when reading source code into IR.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to load grammar: {0}")]
    Language(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("{node} is missing its {field}")]
    MissingField {
        node: &'static str,
        field: &'static str,
    },
}

/// Error raised when the IR handed to a writer is structurally malformed.
///
/// Unsupported constructs never produce this; they are flagged in the output.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("{construct} has an empty body")]
    EmptyBody { construct: &'static str },

    #[error("assignment has no target")]
    NoAssignTarget,

    #[error("function definition has no name")]
    UnnamedFunction,
}

/// Knobs shared by writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Calls rendered as the `OUTPUT` primitive.
    pub output_functions: Vec<String>,
    /// Calls rendered as the `INPUT` primitive when assigned.
    pub input_functions: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            output_functions: vec!["print".to_string()],
            input_functions: vec!["input".to_string()],
        }
    }
}

impl RenderOptions {
    pub fn is_output_function(&self, name: &str) -> bool {
        self.output_functions.iter().any(|f| f == name)
    }

    pub fn is_input_function(&self, name: &str) -> bool {
        self.input_functions.iter().any(|f| f == name)
    }
}

/// A construct the writer could not translate faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// 1-based output line carrying the flag.
    pub line: usize,
    /// Short name of the construct, e.g. `for loop` or `operator`.
    pub construct: String,
    pub detail: String,
}

/// Writer output: the finalized text plus every flag raised while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    pub text: String,
    pub flags: Vec<Flag>,
}

impl Rendered {
    pub fn is_clean(&self) -> bool {
        self.flags.is_empty()
    }
}

/// A reader parses source code into the IR.
pub trait Reader: Send + Sync {
    /// Language identifier (e.g., "python").
    fn language(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["py"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse source code into the IR.
    fn read(&self, source: &str) -> Result<Program, ReadError>;
}

/// A writer renders the IR in a target notation.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "ib").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "pseudo").
    fn extension(&self) -> &'static str;

    /// Render the IR.
    fn write(&self, program: &Program, options: &RenderOptions) -> Result<Rendered, WriteError>;
}
