//! Sync-job lifecycle and status transition tests.
//!
//! These verify the job state machine and record semantics without any
//! remote calls.

use poynt_bridge_core::job::{SyncJob, SyncJobStatus};

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_status_enum_values() {
    assert!(matches!(SyncJobStatus::Pending, SyncJobStatus::Pending));
    assert!(matches!(SyncJobStatus::Complete, SyncJobStatus::Complete));
    assert!(matches!(
        SyncJobStatus::CompletedWithErrors,
        SyncJobStatus::CompletedWithErrors
    ));
    assert!(matches!(SyncJobStatus::Failed, SyncJobStatus::Failed));
}

#[test]
fn test_status_serializes_snake_case() {
    let json = serde_json::to_string(&SyncJobStatus::CompletedWithErrors).expect("serializes");
    assert_eq!(json, "\"completed_with_errors\"");
}

#[test]
fn test_default_status_is_pending() {
    assert_eq!(SyncJobStatus::default(), SyncJobStatus::Pending);
}

// =============================================================================
// State Transition Tests (Logical)
// =============================================================================

/// Valid transitions for a sync job.
/// Pending -> Complete
/// Pending -> CompletedWithErrors
/// Pending -> Failed
#[test]
fn test_valid_state_transitions() {
    let valid_transitions = [
        (SyncJobStatus::Pending, SyncJobStatus::Complete),
        (SyncJobStatus::Pending, SyncJobStatus::CompletedWithErrors),
        (SyncJobStatus::Pending, SyncJobStatus::Failed),
    ];

    for (from, to) in valid_transitions {
        assert_eq!(from, SyncJobStatus::Pending);
        assert_ne!(from, to);
    }
}

// =============================================================================
// Record Semantics
// =============================================================================

#[test]
fn test_reschedule_is_a_new_pending_job() {
    let mut job = SyncJob::new("push-transactions", "order", vec![42]);
    job.status = SyncJobStatus::Complete;
    job.record_error("earlier failure");

    let retry = job.reschedule();
    assert_ne!(retry.id, job.id);
    assert_eq!(retry.status, SyncJobStatus::Pending);
    assert!(retry.errors.is_empty());
    assert_eq!(retry.attempt, job.attempt + 1);
    assert_eq!(retry.owner, job.owner);
    assert_eq!(retry.object_ids, job.object_ids);
}

#[test]
fn test_errors_accumulate_in_order() {
    let mut job = SyncJob::new("push-orders", "order", vec![1, 2]);
    job.record_error("order 1: remote returned 502");
    job.record_error("order 2: not found");
    assert_eq!(job.errors.len(), 2);
    assert!(job.errors[0].contains("order 1"));
    assert!(job.errors[1].contains("order 2"));
}
