//! End-to-end tests for bg/fg job control through kernel source.

use std::time::Duration;

use rill_kernel::{Kernel, KernelConfig, Value};
use tokio::time::timeout;

fn make_kernel() -> Kernel {
    Kernel::new(KernelConfig::default()).expect("kernel should build")
}

#[tokio::test]
async fn bg_returns_immediately_with_a_handle() {
    let kernel = make_kernel();

    let result = kernel.execute("seq 10 | sum | bg").await.unwrap();
    assert!(result.ok());
    assert!(matches!(result.data, Some(Value::Job(_))));
    assert!(result.out.starts_with('['));
}

#[tokio::test]
async fn fg_forwards_the_job_output() {
    let kernel = make_kernel();
    kernel.execute("J=$(seq 1000 | sum | bg)").await.unwrap();

    let result = kernel.execute("fg $J").await.unwrap();
    assert!(result.ok());
    assert_eq!(result.out, "500500\n");
    assert_eq!(result.data, Some(Value::Int(500_500)));
}

#[tokio::test]
async fn fg_inside_a_background_job_completes() {
    // A background job may itself foreground another job; waiting on
    // the outer job must not wedge on the inner one.
    let kernel = make_kernel();
    kernel.execute("B=$(seq 10 | sum | bg)").await.unwrap();
    kernel.execute("A=$(fg $B | count | bg)").await.unwrap();

    let result = timeout(Duration::from_secs(3), kernel.execute("fg $A"))
        .await
        .expect("nested fg should not hang")
        .unwrap();
    assert!(result.ok(), "nested fg failed: {}", result.err);
    assert_eq!(result.out, "1\n");
}

#[tokio::test]
async fn fg_twice_returns_the_cached_result() {
    let kernel = make_kernel();
    kernel.execute("J=$(seq 10 | sum | bg)").await.unwrap();

    let first = kernel.execute("fg $J").await.unwrap();
    let second = kernel.execute("fg $J").await.unwrap();
    assert_eq!(first.out, second.out);
    assert_eq!(first.data, second.data);
}

#[tokio::test]
async fn fg_on_a_failed_job_reports_the_failure() {
    let kernel = make_kernel();
    kernel.execute("J=$(seq 10 | nonsense | bg)").await.unwrap();

    let result = kernel.execute("fg $J").await.unwrap();
    assert_eq!(result.code, 127);
    assert!(result.err.contains("command not found"));

    // And $? reflects it.
    let status = kernel.execute("echo $?").await.unwrap();
    assert_eq!(status.out, "127\n");
}

#[tokio::test]
async fn fg_unknown_job_fails() {
    let kernel = make_kernel();
    let result = kernel.execute("fg 42").await.unwrap();
    assert_eq!(result.code, 1);
    assert!(result.err.contains("no such job"));
}

#[tokio::test]
async fn bg_in_the_middle_of_a_pipeline_is_rejected() {
    let kernel = make_kernel();
    let result = kernel.execute("seq 10 | bg | sum").await.unwrap();
    assert_eq!(result.code, 2);
    assert!(result.err.contains("final stage"));
}

#[tokio::test]
async fn bare_bg_is_rejected() {
    let kernel = make_kernel();
    let result = kernel.execute("bg").await.unwrap();
    assert_eq!(result.code, 2);
    assert!(result.err.contains("nothing to run"));
}

#[tokio::test]
async fn jobs_lists_background_pipelines() {
    let kernel = make_kernel();
    kernel.execute("J=$(sleep 0.5 | bg)").await.unwrap();

    let listing = kernel.execute("jobs").await.unwrap();
    assert!(listing.out.contains("Running sleep 0.5"));

    kernel.execute("fg $J").await.unwrap();
    let listing = kernel.execute("jobs").await.unwrap();
    assert!(listing.out.contains("Done sleep 0.5"));
}

#[tokio::test]
async fn wait_reports_every_job() {
    let kernel = make_kernel();
    kernel.execute("seq 10 | sum | bg").await.unwrap();
    kernel.execute("seq 20 | sum | bg").await.unwrap();

    let result = kernel.execute("wait").await.unwrap();
    assert!(result.ok());
    assert!(result.out.contains("[1] Done"));
    assert!(result.out.contains("[2] Done"));
}

#[tokio::test]
async fn wait_for_a_specific_job() {
    let kernel = make_kernel();
    kernel.execute("J=$(seq 10 | sum | bg)").await.unwrap();

    let result = kernel.execute("wait $J").await.unwrap();
    assert!(result.ok());
    assert!(result.out.contains("Done"));
}

#[tokio::test]
async fn background_job_sees_the_scope_at_spawn_time() {
    let kernel = make_kernel();
    kernel.execute("N=3").await.unwrap();
    kernel.execute("J=$(seq $N | sum | bg)").await.unwrap();
    // Reassigning afterwards must not affect the running job.
    kernel.execute("N=1000").await.unwrap();

    let result = kernel.execute("fg $J").await.unwrap();
    assert_eq!(result.out, "6\n");
}

#[tokio::test]
async fn job_handle_displays_in_brackets() {
    let kernel = make_kernel();
    kernel.execute("J=$(seq 5 | sum | bg)").await.unwrap();
    let result = kernel.execute(r#"echo "job $J""#).await.unwrap();
    assert_eq!(result.out, "job [1]\n");
}
