//! AST types for the rill language.
//!
//! The surface is deliberately small: assignments, pipelines, and the
//! expressions needed to feed them. There are no control-flow forms;
//! composition happens through pipes and jobs, not through syntax.

use std::fmt;

use crate::scheduler::{JobId, PipeId};

/// A parsed program: a sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable assignment: `NAME=expr`.
    Assignment(Assignment),
    /// A pipeline of one or more commands.
    Pipeline(Pipeline),
}

/// `NAME=expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub value: Expr,
}

/// `cmd a b | cmd c | ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

/// One stage of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub head: CommandHead,
    pub args: Vec<Arg>,
}

impl Command {
    /// A bare tool invocation with no arguments.
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            head: CommandHead::Tool(name.into()),
            args: Vec::new(),
        }
    }
}

/// What a command stage invokes.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandHead {
    /// A named tool: `seq`, `sum`, `fg`, ...
    Tool(String),
    /// A method stage on a handle variable: `$P:output`.
    Method {
        /// The variable holding the handle (without the `$`).
        target: String,
        method: PipeMethod,
    },
}

/// Methods understood on pipe handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeMethod {
    /// Read the full stream as stdout (blocks until close).
    Input,
    /// Send stdin lines into the pipe.
    Output,
    /// Close the pipe; readers see end-of-stream.
    Close,
}

impl PipeMethod {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            "close" => Some(Self::Close),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for PipeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Bare positional value: `seq 10000`.
    Positional(Expr),
    /// Named argument: `head n=3`.
    Named { key: String, value: Expr },
    /// Short flag: `-n`.
    ShortFlag(String),
    /// Long flag: `--cleanup`.
    LongFlag(String),
}

/// An expression (no operators; rill composes through pipes instead).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value.
    Literal(Value),
    /// `$NAME` or `${NAME}`.
    VarRef(String),
    /// Double-quoted string with `$VAR` interpolation.
    Interpolated(Vec<StringPart>),
    /// `$(pipeline)` — captures the pipeline's result.
    CommandSubst(Box<Pipeline>),
}

/// One segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Literal(String),
    Var(String),
}

/// Runtime values.
///
/// `Pipe` and `Job` are first-class handles: they come out of `$(pipe)`
/// and `$(... | bg)` and get passed back to method stages and `fg`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Pipe(PipeId),
    Job(JobId),
}

impl Value {
    /// Truthiness: null, false, 0, 0.0, and "" are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Pipe(_) | Value::Job(_) => true,
        }
    }

    /// Type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Pipe(_) => "pipe",
            Value::Job(_) => "job",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, ""),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::Pipe(id) => write!(f, "{}", id),
            Value::Job(id) => write!(f, "[{}]", id),
        }
    }
}
