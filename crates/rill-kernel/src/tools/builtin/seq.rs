//! seq — Print a sequence of integers.

use async_trait::async_trait;

use crate::ast::Value;
use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Seq tool: print integers from FIRST to LAST.
///
/// Forms: `seq LAST`, `seq FIRST LAST`, `seq FIRST STEP LAST`.
pub struct Seq;

#[async_trait]
impl Tool for Seq {
    fn name(&self) -> &str {
        "seq"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("seq", "Print a sequence of integers")
            .param(ParamSchema::required("last", "int", "Final number (inclusive)"))
            .param(ParamSchema::optional(
                "sep",
                "string",
                Value::String("\n".into()),
                "Separator between numbers",
            ))
    }

    async fn execute(&self, args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        let nums: Result<Vec<i64>, ExecResult> =
            args.positional.iter().map(as_int).collect();
        let nums = match nums {
            Ok(n) => n,
            Err(failure) => return failure,
        };

        let (first, step, last) = match nums.as_slice() {
            [last] => (1, 1, *last),
            [first, last] => (*first, 1, *last),
            [first, step, last] => (*first, *step, *last),
            _ => return ExecResult::failure(2, "seq: usage: seq [FIRST [STEP]] LAST"),
        };

        if step == 0 {
            return ExecResult::failure(1, "seq: step must not be zero");
        }

        let sep = args
            .get_string("sep")
            .unwrap_or_else(|| "\n".to_string());

        let mut values = Vec::new();
        let mut n = first;
        while (step > 0 && n <= last) || (step < 0 && n >= last) {
            values.push(n.to_string());
            // Past the edge of i64 there is nothing left in range.
            match n.checked_add(step) {
                Some(next) => n = next,
                None => break,
            }
        }

        if values.is_empty() {
            return ExecResult::success("");
        }
        ExecResult::success(format!("{}\n", values.join(&sep)))
    }
}

fn as_int(value: &Value) -> Result<i64, ExecResult> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::String(s) => s
            .parse()
            .map_err(|_| ExecResult::failure(1, format!("seq: invalid number: {}", s))),
        other => Err(ExecResult::failure(
            1,
            format!("seq: invalid number: {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_util::make_ctx;

    fn int_args(nums: &[i64]) -> ToolArgs {
        let mut args = ToolArgs::new();
        for n in nums {
            args.positional.push(Value::Int(*n));
        }
        args
    }

    #[tokio::test]
    async fn single_arg_counts_from_one() {
        let mut ctx = make_ctx();
        let result = Seq.execute(int_args(&[5]), &mut ctx).await;
        assert_eq!(result.out, "1\n2\n3\n4\n5\n");
    }

    #[tokio::test]
    async fn two_args_sets_first() {
        let mut ctx = make_ctx();
        let result = Seq.execute(int_args(&[3, 6]), &mut ctx).await;
        assert_eq!(result.out, "3\n4\n5\n6\n");
    }

    #[tokio::test]
    async fn three_args_sets_step() {
        let mut ctx = make_ctx();
        let result = Seq.execute(int_args(&[1, 2, 7]), &mut ctx).await;
        assert_eq!(result.out, "1\n3\n5\n7\n");
    }

    #[tokio::test]
    async fn negative_step_counts_down() {
        let mut ctx = make_ctx();
        let result = Seq.execute(int_args(&[3, -1, 1]), &mut ctx).await;
        assert_eq!(result.out, "3\n2\n1\n");
    }

    #[tokio::test]
    async fn empty_range_yields_no_output() {
        let mut ctx = make_ctx();
        let result = Seq.execute(int_args(&[5, 1]), &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "");
    }

    #[tokio::test]
    async fn zero_step_is_an_error() {
        let mut ctx = make_ctx();
        let result = Seq.execute(int_args(&[1, 0, 5]), &mut ctx).await;
        assert!(!result.ok());
        assert!(result.err.contains("step"));
    }

    #[tokio::test]
    async fn custom_separator() {
        let mut ctx = make_ctx();
        let mut args = int_args(&[3]);
        args.named.insert("sep".into(), Value::String(",".into()));
        let result = Seq.execute(args, &mut ctx).await;
        assert_eq!(result.out, "1,2,3\n");
    }

    #[tokio::test]
    async fn range_ending_at_i64_max_terminates() {
        let mut ctx = make_ctx();
        let result = Seq.execute(int_args(&[i64::MAX - 1, i64::MAX]), &mut ctx).await;
        assert!(result.ok());
        assert_eq!(
            result.out,
            format!("{}\n{}\n", i64::MAX - 1, i64::MAX)
        );
    }

    #[tokio::test]
    async fn no_args_is_usage_error() {
        let mut ctx = make_ctx();
        let result = Seq.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(result.code, 2);
        assert!(result.err.contains("usage"));
    }

    #[tokio::test]
    async fn non_numeric_arg_is_an_error() {
        let mut ctx = make_ctx();
        let mut args = ToolArgs::new();
        args.positional.push(Value::String("many".into()));
        let result = Seq.execute(args, &mut ctx).await;
        assert!(!result.ok());
        assert!(result.err.contains("invalid number"));
    }
}
