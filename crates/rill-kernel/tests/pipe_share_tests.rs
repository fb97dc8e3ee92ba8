//! End-to-end tests for shared pipes: one producer, many readers,
//! every reader sees the complete stream.

use rill_kernel::{Kernel, KernelConfig, Value};

fn make_kernel() -> Kernel {
    Kernel::new(KernelConfig::default()).expect("kernel should build")
}

// ═══════════════════════════════════════════════════════════════════
// The headline scenario: four readers, one producer
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn four_readers_each_see_the_full_stream() {
    let kernel = make_kernel();

    kernel.execute("P=$(pipe)").await.unwrap();
    kernel
        .execute("PRODUCER=$(seq 10000 | $P:output | bg)")
        .await
        .unwrap();

    // Readers attach while the producer is still writing. Replay
    // semantics make the timing irrelevant.
    for i in 1..=4 {
        kernel
            .execute(&format!("J{}=$($P:input | sum | bg)", i))
            .await
            .unwrap();
    }

    let produced = kernel.execute("fg $PRODUCER").await.unwrap();
    assert!(produced.ok(), "producer failed: {}", produced.err);

    kernel.execute("$P:close").await.unwrap();

    let mut total = 0i64;
    for i in 1..=4 {
        let result = kernel.execute(&format!("fg $J{}", i)).await.unwrap();
        assert!(result.ok(), "reader {} failed: {}", i, result.err);
        assert_eq!(result.data, Some(Value::Int(50_005_000)));
        total += result.out.trim().parse::<i64>().unwrap();
    }

    assert_eq!(total, 200_020_000);
}

#[tokio::test]
async fn reader_attached_after_close_still_sees_history() {
    let kernel = make_kernel();

    kernel.execute("P=$(pipe)").await.unwrap();
    kernel.execute("W=$(seq 100 | $P:output | bg)").await.unwrap();
    kernel.execute("fg $W").await.unwrap();
    kernel.execute("$P:close").await.unwrap();

    // Subscribe only after everything is written and closed.
    let result = kernel.execute("$P:input | sum").await.unwrap();
    assert!(result.ok());
    assert_eq!(result.out, "5050\n");
}

// ═══════════════════════════════════════════════════════════════════
// Pipe method edge cases
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn closed_empty_pipe_reads_as_empty() {
    let kernel = make_kernel();
    kernel.execute("P=$(pipe)").await.unwrap();
    kernel.execute("$P:close").await.unwrap();

    let result = kernel.execute("$P:input | sum").await.unwrap();
    assert!(result.ok());
    assert_eq!(result.out, "0\n");

    let count = kernel.execute("$P:input | count").await.unwrap();
    assert_eq!(count.out, "0\n");
}

#[tokio::test]
async fn writing_to_a_closed_pipe_fails() {
    let kernel = make_kernel();
    kernel.execute("P=$(pipe)").await.unwrap();
    kernel.execute("$P:close").await.unwrap();

    let result = kernel.execute("seq 3 | $P:output").await.unwrap();
    assert_eq!(result.code, 1);
    assert!(result.err.contains("closed"));
}

#[tokio::test]
async fn close_is_idempotent() {
    let kernel = make_kernel();
    kernel.execute("P=$(pipe)").await.unwrap();
    assert!(kernel.execute("$P:close").await.unwrap().ok());
    assert!(kernel.execute("$P:close").await.unwrap().ok());
}

#[tokio::test]
async fn two_producers_interleave_into_one_history() {
    let kernel = make_kernel();
    kernel.execute("P=$(pipe)").await.unwrap();
    kernel.execute("A=$(seq 50 | $P:output | bg)").await.unwrap();
    kernel.execute("B=$(seq 51 100 | $P:output | bg)").await.unwrap();
    kernel.execute("fg $A").await.unwrap();
    kernel.execute("fg $B").await.unwrap();
    kernel.execute("$P:close").await.unwrap();

    let result = kernel.execute("$P:input | sum").await.unwrap();
    assert_eq!(result.out, "5050\n");
}

#[tokio::test]
async fn method_on_unset_variable_fails() {
    let kernel = make_kernel();
    let result = kernel.execute("$NOPE:close").await.unwrap();
    assert_eq!(result.code, 1);
    assert!(result.err.contains("undefined variable"));
}

#[tokio::test]
async fn method_on_non_pipe_value_fails() {
    let kernel = make_kernel();
    kernel.execute("X=5").await.unwrap();
    let result = kernel.execute("$X:input").await.unwrap();
    assert_eq!(result.code, 1);
    assert!(result.err.contains("has no method"));
}

#[tokio::test]
async fn pipe_handle_interpolates_in_strings() {
    let kernel = make_kernel();
    kernel.execute("P=$(pipe)").await.unwrap();
    let result = kernel.execute(r#"echo "handle: $P""#).await.unwrap();
    assert_eq!(result.out, "handle: %pipe/1\n");
}
