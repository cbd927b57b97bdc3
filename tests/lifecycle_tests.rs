//! Lifecycle workflows driven through the services over an in-memory store

mod common;

use std::str::FromStr;

use rust_decimal::Decimal;
use tokio_test::{assert_err, assert_ok};

use common::*;
use equipdesk_server::{
    error::AppError,
    lifecycle::acquisition::{approve, can_modify},
    models::{
        acquisition::{AcquisitionStatus, ApproveAcquisition, CreateAcquisition, UpdateAcquisition},
        checkout::{CheckInRequest, CheckoutStatus, CreateCheckout},
        equipment::EquipmentStatus,
        issue::{CreateIssue, IssueStatus, ResolveIssue},
        notification::{EntityRef, NotificationKind},
    },
    repository::LifecycleStore,
};

fn request(name: &str) -> CreateAcquisition {
    CreateAcquisition {
        equipment_name: name.to_string(),
        description: None,
        quantity: Some(2),
        provider_id: None,
        justification: Some("New training room".to_string()),
        urgency: None,
    }
}

fn amount(value: &str) -> ApproveAcquisition {
    ApproveAcquisition {
        amount: Decimal::from_str(value).unwrap(),
    }
}

#[tokio::test]
async fn acquisition_goes_from_request_to_delivery() {
    let store = seeded_store().await;
    let services = services(store.clone(), date(2024, 3, 1));

    let created = assert_ok!(services.acquisitions.create(&principal(TRAINER), request("Tripod")).await);
    assert_eq!(created.entity.status, AcquisitionStatus::Pending);
    assert_eq!(created.entity.requested_by, TRAINER);
    assert_eq!(created.entity.request_date, date(2024, 3, 1));

    services.notifications.deliver(&created.notifications).await;
    let staff_told: Vec<i32> = store.notifications().await.iter().map(|n| n.user_id).collect();
    assert_eq!(staff_told, vec![ADMIN, MANAGER]);

    let id = created.entity.id;
    let approved = assert_ok!(
        services
            .acquisitions
            .approve(&principal(MANAGER), id, amount("120.50"))
            .await
    );
    assert_eq!(approved.entity.status, AcquisitionStatus::Approved);
    assert_eq!(approved.entity.approved_by, Some(MANAGER));
    assert_eq!(approved.entity.amount, Some(Decimal::from_str("120.50").unwrap()));
    assert_eq!(approved.notifications[0].kind, NotificationKind::AcquisitionApproved);

    let delivered = assert_ok!(services.acquisitions.mark_delivered(&principal(ADMIN), id).await);
    assert_eq!(delivered.entity.status, AcquisitionStatus::Delivered);
    assert_eq!(delivered.entity.delivery_date, Some(date(2024, 3, 1)));
}

#[tokio::test]
async fn trainer_cannot_decide_on_acquisitions() {
    let store = seeded_store().await;
    let services = services(store, date(2024, 3, 1));
    let created = services
        .acquisitions
        .create(&principal(TRAINER), request("Whiteboard"))
        .await
        .unwrap();

    let result = services
        .acquisitions
        .approve(&principal(TRAINER), created.entity.id, amount("10"))
        .await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let result = services.acquisitions.reject(&principal(OTHER_TRAINER), created.entity.id).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let result = services.acquisitions.mark_delivered(&principal(TRAINER), created.entity.id).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));
}

#[tokio::test]
async fn decided_acquisition_is_frozen() {
    let store = seeded_store().await;
    let services = services(store, date(2024, 3, 1));
    let id = services
        .acquisitions
        .create(&principal(TRAINER), request("Speakers"))
        .await
        .unwrap()
        .entity
        .id;

    let rejected = services.acquisitions.reject(&principal(MANAGER), id).await.unwrap();
    assert_eq!(rejected.entity.status, AcquisitionStatus::Rejected);
    assert!(!can_modify(&principal(TRAINER), &rejected.entity));

    let result = services.acquisitions.approve(&principal(ADMIN), id, amount("5")).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let update = UpdateAcquisition {
        quantity: Some(3),
        ..Default::default()
    };
    let result = services.acquisitions.update(&principal(TRAINER), id, update).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let result = services.acquisitions.delete(&principal(ADMIN), id).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let result = services.acquisitions.mark_delivered(&principal(MANAGER), id).await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn negative_amount_leaves_request_pending() {
    let store = seeded_store().await;
    let services = services(store, date(2024, 3, 1));
    let id = services
        .acquisitions
        .create(&principal(TRAINER), request("Microphone"))
        .await
        .unwrap()
        .entity
        .id;

    let result = services.acquisitions.approve(&principal(MANAGER), id, amount("-1")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let current = services.acquisitions.get(&principal(MANAGER), id).await.unwrap();
    assert_eq!(current.status, AcquisitionStatus::Pending);
    assert_eq!(current.version, 1);
}

#[tokio::test]
async fn only_requester_or_administrator_edits_pending_request() {
    let store = seeded_store().await;
    let services = services(store, date(2024, 3, 1));
    let id = services
        .acquisitions
        .create(&principal(TRAINER), request("Cables"))
        .await
        .unwrap()
        .entity
        .id;

    let update = UpdateAcquisition {
        quantity: Some(5),
        ..Default::default()
    };
    let result = services.acquisitions.update(&principal(OTHER_TRAINER), id, update.clone()).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let updated = assert_ok!(services.acquisitions.update(&principal(TRAINER), id, update).await);
    assert_eq!(updated.quantity, 5);
    assert_eq!(updated.version, 2);

    let result = services.acquisitions.get(&principal(OTHER_TRAINER), id).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    assert_ok!(services.acquisitions.delete(&principal(ADMIN), id).await);
    let result = services.acquisitions.get(&principal(ADMIN), id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn stale_acquisition_snapshot_conflicts() {
    let store = seeded_store().await;
    let services = services(store.clone(), date(2024, 3, 1));
    let created = services
        .acquisitions
        .create(&principal(TRAINER), request("Laser pointer"))
        .await
        .unwrap();

    // A decision lands between our read and our write
    let snapshot = store.get_acquisition(created.entity.id).await.unwrap();
    services
        .acquisitions
        .approve(&principal(MANAGER), snapshot.id, amount("15"))
        .await
        .unwrap();

    let mut edited = snapshot.clone();
    edited.quantity = 4;
    let result = store.save_acquisition(&edited).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn second_approval_from_same_snapshot_conflicts() {
    let store = seeded_store().await;
    let services = services(store.clone(), date(2024, 3, 1));
    let created = services
        .acquisitions
        .create(&principal(TRAINER), request("Webcam"))
        .await
        .unwrap();

    // Both deciders read the same pending row
    let snapshot = store.get_acquisition(created.entity.id).await.unwrap();
    let by_manager = approve(&principal(MANAGER), &snapshot, Decimal::from(40), date(2024, 3, 1)).unwrap();
    let by_admin = approve(&principal(ADMIN), &snapshot, Decimal::from(55), date(2024, 3, 1)).unwrap();

    let saved = assert_ok!(store.save_acquisition(&by_manager.entity).await);
    assert_eq!(saved.approved_by, Some(MANAGER));

    let result = store.save_acquisition(&by_admin.entity).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = store.get_acquisition(snapshot.id).await.unwrap();
    assert_eq!(stored.status, AcquisitionStatus::Approved);
    assert_eq!(stored.approved_by, Some(MANAGER));
    assert_eq!(stored.amount, Some(Decimal::from(40)));
}

fn checkout_request(equipment_id: i32, user_id: i32) -> CreateCheckout {
    CreateCheckout {
        equipment_id,
        user_id,
        expected_return_date: date(2024, 3, 8),
        notes: None,
    }
}

#[tokio::test]
async fn checkout_and_return_move_equipment() {
    let store = seeded_store().await;
    let services = services(store.clone(), date(2024, 3, 1));

    let checked_out = assert_ok!(
        services
            .checkouts
            .check_out(&principal(MANAGER), checkout_request(CAMERA, TRAINER))
            .await
    );
    assert_eq!(checked_out.entity.status, CheckoutStatus::InProgress);
    assert_eq!(checked_out.entity.checked_out_by, MANAGER);
    assert_eq!(checked_out.entity.checkout_date, date(2024, 3, 1));
    assert_eq!(checked_out.notifications[0].kind, NotificationKind::CheckoutCreated);
    assert_eq!(
        store.get_equipment(CAMERA).await.unwrap().status,
        EquipmentStatus::CheckedOut
    );

    let id = checked_out.entity.id;
    let result = services
        .checkouts
        .check_in(&principal(TRAINER), id, CheckInRequest::default())
        .await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let returned = assert_ok!(
        services
            .checkouts
            .check_in(
                &principal(ADMIN),
                id,
                CheckInRequest {
                    notes: Some("Lens cap missing".to_string()),
                },
            )
            .await
    );
    assert_eq!(returned.entity.status, CheckoutStatus::Returned);
    assert_eq!(returned.entity.actual_return_date, Some(date(2024, 3, 1)));
    assert_eq!(returned.entity.checked_in_by, Some(ADMIN));
    assert_eq!(returned.entity.notes.as_deref(), Some("Lens cap missing"));
    assert_eq!(store.get_equipment(CAMERA).await.unwrap().status, EquipmentStatus::Available);

    // Returned twice: state is checked before the role
    let result = services
        .checkouts
        .check_in(&principal(TRAINER), id, CheckInRequest::default())
        .await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn equipment_is_lent_once_at_a_time() {
    let store = seeded_store().await;
    let services = services(store.clone(), date(2024, 3, 1));

    let manager = principal(MANAGER);
    let admin = principal(ADMIN);
    let (first, second) = tokio::join!(
        services
            .checkouts
            .check_out(&manager, checkout_request(PROJECTOR, TRAINER)),
        services
            .checkouts
            .check_out(&admin, checkout_request(PROJECTOR, OTHER_TRAINER)),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(AppError::Conflict(_)))));
    assert_eq!(
        services.checkouts.list(Some(CheckoutStatus::InProgress)).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn checkout_rejections() {
    let store = seeded_store().await;
    let services = services(store.clone(), date(2024, 3, 1));

    let result = services
        .checkouts
        .check_out(&principal(TRAINER), checkout_request(CAMERA, TRAINER))
        .await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let result = services
        .checkouts
        .check_out(&principal(MANAGER), checkout_request(BROKEN_LAPTOP, TRAINER))
        .await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    let result = services
        .checkouts
        .check_out(&principal(MANAGER), checkout_request(CAMERA, FORMER_TRAINER))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let mut late = checkout_request(CAMERA, TRAINER);
    late.expected_return_date = date(2024, 2, 29);
    let result = services.checkouts.check_out(&principal(MANAGER), late).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = services
        .checkouts
        .check_out(&principal(MANAGER), checkout_request(999, TRAINER))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // Nothing was reserved along the way
    assert_eq!(store.get_equipment(CAMERA).await.unwrap().status, EquipmentStatus::Available);
}

fn issue_report(title: &str) -> CreateIssue {
    CreateIssue {
        equipment_id: CAMERA,
        title: title.to_string(),
        description: Some("Does not power on".to_string()),
        priority: None,
    }
}

#[tokio::test]
async fn issue_is_handled_by_its_assignee() {
    let store = seeded_store().await;
    let services = services(store.clone(), date(2024, 4, 2));

    let reported = assert_ok!(services.issues.report(&principal(TRAINER), issue_report("Dead battery")).await);
    assert_eq!(reported.entity.status, IssueStatus::Reported);
    assert_eq!(reported.notifications[0].kind, NotificationKind::IssueReported);
    let id = reported.entity.id;

    let result = services
        .issues
        .resolve(
            &principal(ADMIN),
            id,
            ResolveIssue {
                resolution_notes: "Replaced".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    assert_err!(services.issues.take_charge(&principal(TRAINER), id).await);
    let taken = assert_ok!(services.issues.take_charge(&principal(MANAGER), id).await);
    assert_eq!(taken.entity.status, IssueStatus::InProgress);
    assert_eq!(taken.entity.assigned_to, Some(MANAGER));
    assert_eq!(taken.notifications[0].recipients.len(), 1);

    let result = services.issues.take_charge(&principal(ADMIN), id).await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    let result = services
        .issues
        .resolve(
            &principal(OTHER_TRAINER),
            id,
            ResolveIssue {
                resolution_notes: "Fixed".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Authorization(_))));

    let result = services
        .issues
        .resolve(
            &principal(MANAGER),
            id,
            ResolveIssue {
                resolution_notes: "   ".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let resolved = assert_ok!(
        services
            .issues
            .resolve(
                &principal(MANAGER),
                id,
                ResolveIssue {
                    resolution_notes: "Battery replaced".to_string(),
                },
            )
            .await
    );
    assert_eq!(resolved.entity.status, IssueStatus::Resolved);
    assert_eq!(resolved.entity.resolved_date, Some(date(2024, 4, 2)));
    assert_eq!(resolved.entity.resolution_notes.as_deref(), Some("Battery replaced"));

    services.notifications.deliver(&resolved.notifications).await;
    let told = store.notifications().await;
    let last = told.last().unwrap();
    assert_eq!(last.user_id, TRAINER);
    assert_eq!(last.entity, EntityRef::Issue(id));
}

#[tokio::test]
async fn issue_on_unknown_equipment_is_not_found() {
    let store = seeded_store().await;
    let services = services(store, date(2024, 4, 2));
    let mut report = issue_report("Missing");
    report.equipment_id = 404;

    let result = services.issues.report(&principal(TRAINER), report).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
