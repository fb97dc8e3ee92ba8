//! ExecResult — the structured result of every command execution.
//!
//! Unlike traditional shells where `$?` is just an integer, every stage
//! in rill produces a full result: exit code, stdout, stderr, and an
//! optional structured value. The structured value is how handles
//! travel: `$(pipe)` carries a `Value::Pipe` and `$(... | bg)` carries
//! a `Value::Job`, so assignments capture the handle rather than its
//! printed form.

use crate::ast::Value;

/// The result of executing a command or pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i64,
    /// Raw standard output as a string (canonical for pipes).
    pub out: String,
    /// Raw standard error as a string.
    pub err: String,
    /// Structured value, when the command produced one.
    ///
    /// Takes precedence over `out` in command substitution, so handle
    /// values survive `X=$(...)` without a text round-trip.
    pub data: Option<Value>,
}

impl ExecResult {
    /// Create a successful result with output.
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
            data: None,
        }
    }

    /// Create a successful result with both text output and structured data.
    pub fn success_with_data(out: impl Into<String>, data: Value) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
            data: Some(data),
        }
    }

    /// Create a failed result with an error message.
    pub fn failure(code: i64, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
            data: None,
        }
    }

    /// Create a result from raw output streams.
    pub fn from_output(code: i64, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            out: stdout.into(),
            err: stderr.into(),
            data: None,
        }
    }

    /// True if the command succeeded (exit code 0).
    pub fn ok(&self) -> bool {
        self.code == 0
    }

    /// The value this result contributes to command substitution:
    /// structured data if present, otherwise stdout with the trailing
    /// newline removed.
    pub fn capture(&self) -> Value {
        match &self.data {
            Some(value) => value.clone(),
            None => Value::String(self.out.trim_end_matches('\n').to_string()),
        }
    }

    /// Get a field by name, for `$?` style introspection.
    pub fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "code" => Some(Value::Int(self.code)),
            "ok" => Some(Value::Bool(self.ok())),
            "out" => Some(Value::String(self.out.clone())),
            "err" => Some(Value::String(self.err.clone())),
            "data" => self.data.clone(),
            _ => None,
        }
    }
}

impl Default for ExecResult {
    fn default() -> Self {
        Self::success("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::PipeId;

    #[test]
    fn success_creates_ok_result() {
        let result = ExecResult::success("hello world");
        assert!(result.ok());
        assert_eq!(result.code, 0);
        assert_eq!(result.out, "hello world");
        assert!(result.err.is_empty());
    }

    #[test]
    fn failure_creates_non_ok_result() {
        let result = ExecResult::failure(1, "command not found");
        assert!(!result.ok());
        assert_eq!(result.code, 1);
        assert_eq!(result.err, "command not found");
    }

    #[test]
    fn capture_prefers_data() {
        let result = ExecResult::success_with_data("%pipe/1\n", Value::Pipe(PipeId(1)));
        assert_eq!(result.capture(), Value::Pipe(PipeId(1)));
    }

    #[test]
    fn capture_trims_trailing_newline() {
        let result = ExecResult::success("50005000\n");
        assert_eq!(result.capture(), Value::String("50005000".into()));
    }

    #[test]
    fn capture_keeps_interior_newlines() {
        let result = ExecResult::success("a\nb\n");
        assert_eq!(result.capture(), Value::String("a\nb".into()));
    }

    #[test]
    fn get_field_values() {
        let result = ExecResult::from_output(127, "stdout text", "stderr text");
        assert_eq!(result.get_field("code"), Some(Value::Int(127)));
        assert_eq!(result.get_field("ok"), Some(Value::Bool(false)));
        assert_eq!(result.get_field("out"), Some(Value::String("stdout text".into())));
        assert_eq!(result.get_field("err"), Some(Value::String("stderr text".into())));
        assert_eq!(result.get_field("nonexistent"), None);
    }
}
