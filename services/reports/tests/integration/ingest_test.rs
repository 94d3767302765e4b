use std::sync::Arc;

use tokio::sync::mpsc;

use classnote_domain::assignment::{AssignmentStatus, ReportType};
use classnote_reports::domain::types::{Locale, RawReport};
use classnote_reports::error::ReportsServiceError;
use classnote_reports::infra::events::ChannelPublisher;
use classnote_reports::usecase::dispatch::PushDispatcher;
use classnote_reports::usecase::fanout::{FanoutWorker, NotifySubscribersUseCase};
use classnote_reports::usecase::ingest::IngestReportUseCase;
use classnote_reports::usecase::reconcile::ReconcileAssignmentUseCase;

use crate::helpers::{
    MemoryStore, MemoryUnitOfWork, RecordingProvider, RecordingPublisher, StaticSubscribers,
    due_at, raw_report, reporter, test_class, test_course, test_subscriber,
};

fn ingest(
    uow: MemoryUnitOfWork,
    events: RecordingPublisher,
) -> IngestReportUseCase<MemoryUnitOfWork, RecordingPublisher> {
    IngestReportUseCase {
        reconciler: ReconcileAssignmentUseCase { uow },
        events,
    }
}

// ── Creation ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_assignment_with_status_by_report_type() {
    for (report_type, expected) in [
        ("appeared", AssignmentStatus::Opened),
        ("changed", AssignmentStatus::Opened),
        ("disappeared", AssignmentStatus::Deleted),
    ] {
        let class = test_class("CS101", "2025S", None);
        let store = MemoryStore::with_classes(vec![class.clone()], vec![]);
        let usecase = ingest(MemoryUnitOfWork::new(store.clone()), RecordingPublisher::default());

        usecase
            .execute(reporter(), raw_report("CS101", "hw01", report_type))
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.assignments.len(), 1, "{report_type}");
        assert_eq!(state.assignments[0].status, expected, "{report_type}");
        assert_eq!(state.assignments[0].class_id, class.id);
    }
}

#[tokio::test]
async fn should_return_audit_row_for_reporter() {
    let class = test_class("CS101", "2025S", None);
    let store = MemoryStore::with_classes(vec![class], vec![]);
    let usecase = ingest(MemoryUnitOfWork::new(store.clone()), RecordingPublisher::default());
    let user = reporter();

    let report = usecase
        .execute(user, raw_report("CS101", "hw01", "appeared"))
        .await
        .unwrap();

    let state = store.snapshot();
    assert_eq!(state.reports, vec![report.clone()]);
    assert_eq!(report.user_id, user);
    assert_eq!(report.assignment_id, state.assignments[0].id);
    assert_eq!(report.report_type, ReportType::Appeared);
}

// ── Idempotence ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reach_same_state_when_report_repeats() {
    let store = MemoryStore::with_classes(vec![test_class("CS101", "2025S", None)], vec![]);
    let usecase = ingest(MemoryUnitOfWork::new(store.clone()), RecordingPublisher::default());

    let mut states = Vec::new();
    for _ in 0..3 {
        usecase
            .execute(
                reporter(),
                RawReport {
                    due_at: Some("2025-04-19T14:59:00Z".to_owned()),
                    ..raw_report("CS101", "hw01", "appeared")
                },
            )
            .await
            .unwrap();
        let a = store.snapshot().assignments[0].clone();
        states.push((a.id, a.status, a.open_at, a.due_at));
    }

    let state = store.snapshot();
    assert_eq!(state.assignments.len(), 1);
    assert_eq!(state.reports.len(), 3);
    assert!(states.windows(2).all(|w| w[0] == w[1]), "{states:?}");
}

// ── Partial update ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_open_at_when_change_carries_only_due_at() {
    let store = MemoryStore::with_classes(vec![test_class("CS101", "2025S", None)], vec![]);
    let usecase = ingest(MemoryUnitOfWork::new(store.clone()), RecordingPublisher::default());

    usecase
        .execute(
            reporter(),
            RawReport {
                open_at: Some("2025-04-12T00:00:00Z".to_owned()),
                ..raw_report("CS101", "hw01", "appeared")
            },
        )
        .await
        .unwrap();
    let opened = store.snapshot().assignments[0].open_at;

    usecase
        .execute(
            reporter(),
            RawReport {
                due_at: Some("2025-04-19T23:59:00+09:00".to_owned()),
                ..raw_report("CS101", "hw01", "changed")
            },
        )
        .await
        .unwrap();

    let a = &store.snapshot().assignments[0];
    assert!(opened.is_some());
    assert_eq!(a.open_at, opened);
    assert_eq!(a.due_at, Some(due_at()));
    assert_eq!(a.status, AssignmentStatus::Opened);
}

// ── Rejections ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_unknown_class_without_writing() {
    let store = MemoryStore::with_classes(vec![test_class("CS101", "2025S", None)], vec![]);
    let events = RecordingPublisher::default();
    let usecase = ingest(MemoryUnitOfWork::new(store.clone()), events.clone());

    let result = usecase
        .execute(reporter(), raw_report("MATH200", "hw01", "appeared"))
        .await;

    assert!(
        matches!(result, Err(ReportsServiceError::UnknownClass)),
        "expected UnknownClass, got {result:?}"
    );
    let state = store.snapshot();
    assert!(state.assignments.is_empty());
    assert!(state.reports.is_empty());
    assert!(events.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_invalid_input_before_touching_storage() {
    let store = MemoryStore::with_classes(vec![test_class("CS101", "2025S", None)], vec![]);
    let usecase = ingest(MemoryUnitOfWork::new(store.clone()), RecordingPublisher::default());

    let result = usecase
        .execute(reporter(), raw_report("CS101", "hw01", "renamed"))
        .await;

    assert!(matches!(result, Err(ReportsServiceError::InvalidInput(_))));
    assert!(store.snapshot().assignments.is_empty());
}

#[tokio::test]
async fn should_roll_back_assignment_when_audit_insert_fails() {
    let store = MemoryStore::with_classes(vec![test_class("CS101", "2025S", None)], vec![]);
    let events = RecordingPublisher::default();
    let usecase = ingest(
        MemoryUnitOfWork {
            fail_report_insert: true,
            ..MemoryUnitOfWork::new(store.clone())
        },
        events.clone(),
    );

    let result = usecase
        .execute(reporter(), raw_report("CS101", "hw01", "appeared"))
        .await;

    assert!(matches!(result, Err(ReportsServiceError::Internal(_))));
    assert!(store.snapshot().assignments.is_empty());
    assert!(events.events.lock().unwrap().is_empty());
}

// ── Class attribution ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_attribute_to_latest_term() {
    let old = test_class("CS101", "2024F", None);
    let current = test_class("CS101", "2025S", None);
    let store = MemoryStore::with_classes(vec![current.clone(), old], vec![]);
    let usecase = ingest(MemoryUnitOfWork::new(store.clone()), RecordingPublisher::default());

    usecase
        .execute(reporter(), raw_report("CS101", "hw01", "appeared"))
        .await
        .unwrap();

    assert_eq!(store.snapshot().assignments[0].class_id, current.id);
}

#[tokio::test]
async fn should_attribute_to_fall_over_spring_of_same_year() {
    let spring = test_class("CS101", "2025S", None);
    let fall = test_class("CS101", "2025F", None);
    let store = MemoryStore::with_classes(vec![spring, fall.clone()], vec![]);
    let usecase = ingest(MemoryUnitOfWork::new(store.clone()), RecordingPublisher::default());

    usecase
        .execute(reporter(), raw_report("CS101", "hw01", "appeared"))
        .await
        .unwrap();

    assert_eq!(store.snapshot().assignments[0].class_id, fall.id);
}

// ── Uniqueness race ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_winner_when_insert_races() {
    let class = test_class("CS101", "2025S", None);
    let store = MemoryStore::with_classes(vec![class.clone()], vec![]);

    // A concurrent report created the pair as deleted.
    let elsewhere = MemoryStore::with_classes(vec![class.clone()], vec![]);
    ingest(
        MemoryUnitOfWork::new(elsewhere.clone()),
        RecordingPublisher::default(),
    )
    .execute(reporter(), raw_report("CS101", "hw01", "disappeared"))
    .await
    .unwrap();
    let winner = elsewhere.snapshot().assignments[0].clone();

    let uow = MemoryUnitOfWork::new(store.clone());
    *uow.racing_insert.lock().unwrap() = Some(winner.clone());
    let usecase = ingest(uow, RecordingPublisher::default());

    let report = usecase
        .execute(reporter(), raw_report("CS101", "hw01", "appeared"))
        .await
        .unwrap();

    let state = store.snapshot();
    assert_eq!(state.assignments.len(), 1);
    assert_eq!(state.assignments[0].id, winner.id);
    assert_eq!(state.assignments[0].status, AssignmentStatus::Opened);
    assert_eq!(report.assignment_id, winner.id);
}

// ── Event emission ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_publish_change_with_course_title_after_commit() {
    let course = test_course("Compilers");
    let class = test_class("CS101", "2025S", Some(&course));
    let store = MemoryStore::with_classes(vec![class.clone()], vec![course]);
    let events = RecordingPublisher::default();
    let usecase = ingest(MemoryUnitOfWork::new(store.clone()), events.clone());

    usecase
        .execute(reporter(), raw_report("CS101", "hw01", "changed"))
        .await
        .unwrap();

    let published = events.events.lock().unwrap().clone();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].assignment, store.snapshot().assignments[0]);
    assert_eq!(published[0].report_type, ReportType::Changed);
    assert_eq!(published[0].course_title.as_deref(), Some("Compilers"));
}

// ── End to end ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_ingest_and_notify_both_devices_of_single_subscriber() {
    let course = test_course("Introduction to Programming");
    let class = test_class("CS101", "2025S", Some(&course));
    let store = MemoryStore::with_classes(vec![class.clone()], vec![course]);

    let student = reporter();
    let provider = RecordingProvider::default();
    let batches = provider.batches_handle();
    let worker = FanoutWorker {
        usecase: Arc::new(NotifySubscribersUseCase {
            subscribers: StaticSubscribers::new(
                class.id,
                vec![
                    test_subscriber(student, "token-phone"),
                    test_subscriber(student, "token-tablet"),
                ],
            ),
            dispatcher: PushDispatcher { provider },
            locale: Locale::En,
        }),
        concurrency: 2,
    };
    let (sender, receiver) = mpsc::channel(8);
    let worker = tokio::spawn(worker.run(receiver));
    let usecase = IngestReportUseCase {
        reconciler: ReconcileAssignmentUseCase {
            uow: MemoryUnitOfWork::new(store.clone()),
        },
        events: ChannelPublisher { sender },
    };

    let report = usecase
        .execute(
            reporter(),
            RawReport {
                due_at: Some("2025-04-19T14:59:00Z".to_owned()),
                ..raw_report("CS101", "hw01", "appeared")
            },
        )
        .await
        .unwrap();
    drop(usecase);
    worker.await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.assignments.len(), 1);
    let assignment = &state.assignments[0];
    assert_eq!(assignment.status, AssignmentStatus::Opened);
    assert_eq!(assignment.due_at, Some(due_at()));
    assert_eq!(state.reports.len(), 1);
    assert_eq!(state.reports[0].report_type, ReportType::Appeared);
    assert_eq!(report.assignment_id, assignment.id);

    let batches = batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    let (tokens, message) = &batches[0];
    assert_eq!(tokens, &["token-phone".to_owned(), "token-tablet".to_owned()]);
    assert_eq!(message.title, "Introduction to Programming");
    assert_eq!(message.body, "A new assignment has been posted");
    assert_eq!(message.data["assignmentId"], assignment.id.to_string());
}
