//! Role and invariant checks across the complaint and reply services.

use domains::query::status_counts;
use domains::{ComplaintId, ComplaintRepo, ComplaintStatus, DomainError};
use integration_tests::in_memory_services;

#[tokio::test]
async fn student_cannot_change_status_and_record_is_untouched() {
    let svc = in_memory_services();
    let john = svc.student("John Doe", "john@university.edu").await;
    let admin = svc.admin("Admin Smith", "admin@university.edu").await;
    let complaint = svc.complaints.create(&john, "Wifi", "Drops").await.unwrap();

    let err = svc
        .complaints
        .set_status(&john, complaint.id, ComplaintStatus::Resolved)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let stored = svc.complaints.get_by_id(&admin, complaint.id).await.unwrap();
    assert_eq!(stored, complaint);
}

#[tokio::test]
async fn student_cannot_reply_or_delete() {
    let svc = in_memory_services();
    let john = svc.student("John Doe", "john@university.edu").await;
    let complaint = svc.complaints.create(&john, "Wifi", "Drops").await.unwrap();

    let err = svc.replies.add(&john, complaint.id, "me too").await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = svc.complaints.delete(&john, complaint.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    assert!(svc.store.list_replies(complaint.id).await.unwrap().is_empty());
    assert!(svc.store.get_complaint(complaint.id).await.unwrap().is_some());
}

#[tokio::test]
async fn admin_cannot_submit_complaints() {
    let svc = in_memory_services();
    let admin = svc.admin("Admin Smith", "admin@university.edu").await;

    let err = svc.complaints.create(&admin, "Title", "Body").await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert!(svc.store.list_complaints().await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_fields_are_rejected_before_storage() {
    let svc = in_memory_services();
    let john = svc.student("John Doe", "john@university.edu").await;
    let admin = svc.admin("Admin Smith", "admin@university.edu").await;

    let err = svc.complaints.create(&john, "   ", "Body").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "title", .. }));
    let err = svc.complaints.create(&john, "Title", "").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "description", .. }));
    assert!(svc.store.list_complaints().await.unwrap().is_empty());

    let complaint = svc.complaints.create(&john, "Title", "Body").await.unwrap();
    let err = svc.replies.add(&admin, complaint.id, " \n").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "message", .. }));

    let unchanged = svc.complaints.get_by_id(&admin, complaint.id).await.unwrap();
    assert_eq!(unchanged.updated_at, complaint.updated_at);
}

#[tokio::test]
async fn students_only_see_their_own_complaints() {
    let svc = in_memory_services();
    let john = svc.student("John Doe", "john@university.edu").await;
    let jane = svc.student("Jane Student", "jane@university.edu").await;
    let johns = svc.complaints.create(&john, "Wifi", "Drops").await.unwrap();

    let err = svc.complaints.get_by_id(&jane, johns.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = svc
        .replies
        .list_by_complaint(&jane, johns.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = svc
        .complaints
        .list_by_student(&jane, john.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    assert!(svc.complaints.list_visible(&jane).await.unwrap().is_empty());
}

#[tokio::test]
async fn repeating_the_same_status_still_advances_updated_at() {
    let svc = in_memory_services();
    let john = svc.student("John Doe", "john@university.edu").await;
    let admin = svc.admin("Admin Smith", "admin@university.edu").await;
    let complaint = svc.complaints.create(&john, "Wifi", "Drops").await.unwrap();

    let first = svc
        .complaints
        .set_status(&admin, complaint.id, ComplaintStatus::Open)
        .await
        .unwrap();
    let second = svc
        .complaints
        .set_status(&admin, complaint.id, ComplaintStatus::Open)
        .await
        .unwrap();

    assert_eq!(second.status, ComplaintStatus::Open);
    assert!(first.updated_at > complaint.updated_at);
    assert!(second.updated_at > first.updated_at);
    assert!(second.updated_at >= second.created_at);
}

#[tokio::test]
async fn list_by_student_is_the_ordered_subset_of_all() {
    let svc = in_memory_services();
    let john = svc.student("John Doe", "john@university.edu").await;
    let jane = svc.student("Jane Student", "jane@university.edu").await;
    let admin = svc.admin("Admin Smith", "admin@university.edu").await;

    for (student, title) in [
        (&john, "one"),
        (&jane, "two"),
        (&john, "three"),
        (&jane, "four"),
        (&john, "five"),
    ] {
        svc.complaints.create(student, title, "details").await.unwrap();
    }

    let all = svc.complaints.list_all(&admin).await.unwrap();
    let ids: Vec<_> = all.iter().map(|c| c.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let expected: Vec<_> = all
        .iter()
        .filter(|c| c.student_id == john.id)
        .cloned()
        .collect();
    let johns = svc.complaints.list_by_student(&john, john.id).await.unwrap();
    assert_eq!(johns, expected);
    assert_eq!(
        johns.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
        vec!["one", "three", "five"]
    );

    // Admins may list any student.
    let janes = svc.complaints.list_by_student(&admin, jane.id).await.unwrap();
    assert_eq!(janes.len(), 2);

    let err = svc.complaints.list_all(&john).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn reply_to_missing_complaint_stores_nothing() {
    let svc = in_memory_services();
    let admin = svc.admin("Admin Smith", "admin@university.edu").await;
    let missing: ComplaintId = "C999".parse().unwrap();

    let err = svc.replies.add(&admin, missing, "hello").await.unwrap_err();
    assert_eq!(err.to_string(), "Complaint not found with ID C999");
    assert!(svc.store.list_replies(missing).await.unwrap().is_empty());

    let err = svc
        .complaints
        .set_status(&admin, missing, ComplaintStatus::Resolved)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn replies_come_back_in_insertion_order() {
    let svc = in_memory_services();
    let john = svc.student("John Doe", "john@university.edu").await;
    let admin = svc.admin("Admin Smith", "admin@university.edu").await;
    let complaint = svc.complaints.create(&john, "Lab", "Microscopes").await.unwrap();

    for message in ["first", "second", "third"] {
        svc.replies.add(&admin, complaint.id, message).await.unwrap();
    }

    let thread = svc
        .replies
        .list_by_complaint(&john, complaint.id)
        .await
        .unwrap();
    assert_eq!(
        thread.iter().map(|r| r.message.as_str()).collect::<Vec<_>>(),
        vec!["first", "second", "third"]
    );
    assert!(thread.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[tokio::test]
async fn status_counts_always_sum_to_total() {
    let svc = in_memory_services();
    let john = svc.student("John Doe", "john@university.edu").await;
    let jane = svc.student("Jane Student", "jane@university.edu").await;
    let admin = svc.admin("Admin Smith", "admin@university.edu").await;

    let a = svc.complaints.create(&john, "a", "a").await.unwrap();
    let b = svc.complaints.create(&jane, "b", "b").await.unwrap();
    svc.complaints.create(&jane, "c", "c").await.unwrap();
    svc.complaints
        .set_status(&admin, a.id, ComplaintStatus::Resolved)
        .await
        .unwrap();
    svc.complaints
        .set_status(&admin, b.id, ComplaintStatus::InProgress)
        .await
        .unwrap();

    let counts = svc.complaints.status_counts(&admin).await.unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.open + counts.in_progress + counts.resolved, counts.total);
    assert_eq!(counts.open, 1);
    assert_eq!(counts.in_progress, 1);
    assert_eq!(counts.resolved, 1);

    let janes = svc.complaints.status_counts(&jane).await.unwrap();
    assert_eq!(janes.total, 2);
    assert_eq!(janes.resolved, 0);

    let all = svc.store.list_complaints().await.unwrap();
    assert_eq!(status_counts(&all), counts);
}
