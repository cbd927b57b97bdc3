//! Acquisition lifecycle: `Pending -> {Approved, Rejected}`, `Approved -> Delivered`

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Transition;
use crate::{
    error::{AppError, AppResult},
    models::{
        acquisition::{Acquisition, AcquisitionStatus, CreateAcquisition, NewAcquisition, UpdateAcquisition},
        notification::{EntityRef, NotificationIntent, NotificationKind},
        principal::{Principal, Role},
    },
};

/// Edit and delete are allowed to the requester or an administrator, while pending
pub fn can_modify(principal: &Principal, acquisition: &Acquisition) -> bool {
    if acquisition.status != AcquisitionStatus::Pending {
        return false;
    }
    match principal.role {
        Role::Administrator => true,
        Role::Manager | Role::Trainer => principal.id == acquisition.requested_by,
    }
}

/// Approve and reject are allowed to managers and administrators, while pending
pub fn can_approve(principal: &Principal, acquisition: &Acquisition) -> bool {
    acquisition.status == AcquisitionStatus::Pending && principal.role.is_staff()
}

/// Build a pending acquisition requested by `principal`
pub fn create(principal: &Principal, input: &CreateAcquisition, today: NaiveDate) -> AppResult<NewAcquisition> {
    let equipment_name = input.equipment_name.trim();
    if equipment_name.is_empty() {
        return Err(AppError::Validation("Equipment name is required".to_string()));
    }
    let quantity = input.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".to_string()));
    }

    Ok(NewAcquisition {
        equipment_name: equipment_name.to_string(),
        description: input.description.clone(),
        quantity,
        provider_id: input.provider_id,
        justification: input.justification.clone(),
        urgency: input.urgency.unwrap_or_default(),
        requested_by: principal.id,
        request_date: today,
    })
}

/// Announce a freshly stored request to the staff
pub fn requested(acquisition: Acquisition) -> Transition<Acquisition> {
    let entity = EntityRef::Acquisition(acquisition.id);
    Transition::new(acquisition).notify(NotificationIntent::to_staff(NotificationKind::AcquisitionRequested, entity))
}

/// Apply edits to a pending acquisition
pub fn update(principal: &Principal, acquisition: &Acquisition, input: &UpdateAcquisition) -> AppResult<Acquisition> {
    ensure_modifiable(principal, acquisition)?;

    let mut next = acquisition.clone();
    if let Some(ref name) = input.equipment_name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Equipment name cannot be empty".to_string()));
        }
        next.equipment_name = name.to_string();
    }
    if let Some(quantity) = input.quantity {
        if quantity < 1 {
            return Err(AppError::Validation("Quantity must be at least 1".to_string()));
        }
        next.quantity = quantity;
    }
    if input.description.is_some() {
        next.description = input.description.clone();
    }
    if input.provider_id.is_some() {
        next.provider_id = input.provider_id;
    }
    if input.justification.is_some() {
        next.justification = input.justification.clone();
    }
    if let Some(urgency) = input.urgency {
        next.urgency = urgency;
    }
    Ok(next)
}

/// Delete is governed by the same predicate as edit
pub fn ensure_deletable(principal: &Principal, acquisition: &Acquisition) -> AppResult<()> {
    ensure_modifiable(principal, acquisition)
}

fn ensure_modifiable(principal: &Principal, acquisition: &Acquisition) -> AppResult<()> {
    if can_modify(principal, acquisition) {
        Ok(())
    } else {
        Err(AppError::Authorization(format!(
            "Not allowed to modify acquisition {} ({})",
            acquisition.id, acquisition.status
        )))
    }
}

fn ensure_approvable(principal: &Principal, acquisition: &Acquisition) -> AppResult<()> {
    if can_approve(principal, acquisition) {
        Ok(())
    } else {
        Err(AppError::Authorization(format!(
            "Not allowed to decide on acquisition {} ({})",
            acquisition.id, acquisition.status
        )))
    }
}

pub fn approve(
    principal: &Principal,
    acquisition: &Acquisition,
    amount: Decimal,
    today: NaiveDate,
) -> AppResult<Transition<Acquisition>> {
    ensure_approvable(principal, acquisition)?;
    if amount < Decimal::ZERO {
        return Err(AppError::Validation("Amount must be a non-negative value".to_string()));
    }

    let mut next = acquisition.clone();
    next.status = AcquisitionStatus::Approved;
    next.approved_by = Some(principal.id);
    next.approval_date = Some(today);
    next.amount = Some(amount);
    Ok(decided(next, NotificationKind::AcquisitionApproved))
}

pub fn reject(principal: &Principal, acquisition: &Acquisition, today: NaiveDate) -> AppResult<Transition<Acquisition>> {
    ensure_approvable(principal, acquisition)?;

    let mut next = acquisition.clone();
    next.status = AcquisitionStatus::Rejected;
    next.approved_by = Some(principal.id);
    next.approval_date = Some(today);
    Ok(decided(next, NotificationKind::AcquisitionRejected))
}

pub fn mark_delivered(
    principal: &Principal,
    acquisition: &Acquisition,
    today: NaiveDate,
) -> AppResult<Transition<Acquisition>> {
    principal.require_staff()?;
    if acquisition.status != AcquisitionStatus::Approved {
        return Err(AppError::InvalidState(format!(
            "Acquisition {} is {}, only approved acquisitions can be delivered",
            acquisition.id, acquisition.status
        )));
    }

    let mut next = acquisition.clone();
    next.status = AcquisitionStatus::Delivered;
    next.delivery_date = Some(today);
    Ok(decided(next, NotificationKind::AcquisitionDelivered))
}

fn decided(acquisition: Acquisition, kind: NotificationKind) -> Transition<Acquisition> {
    let intent = NotificationIntent::to_user(kind, EntityRef::Acquisition(acquisition.id), acquisition.requested_by);
    Transition::new(acquisition).notify(intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::acquisition::Urgency;
    use std::str::FromStr;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn pending(requested_by: i32) -> Acquisition {
        Acquisition {
            id: 1,
            equipment_name: "Projector".to_string(),
            description: None,
            quantity: 1,
            provider_id: None,
            justification: None,
            status: AcquisitionStatus::Pending,
            urgency: Urgency::Normal,
            requested_by,
            approved_by: None,
            amount: None,
            request_date: day(1),
            approval_date: None,
            delivery_date: None,
            version: 1,
        }
    }

    fn with_status(status: AcquisitionStatus) -> Acquisition {
        Acquisition { status, ..pending(7) }
    }

    const ALL_STATUSES: [AcquisitionStatus; 4] = [
        AcquisitionStatus::Pending,
        AcquisitionStatus::Approved,
        AcquisitionStatus::Rejected,
        AcquisitionStatus::Delivered,
    ];

    #[test]
    fn trainer_modifies_only_own_pending_request() {
        let own = Principal::new(7, Role::Trainer);
        let other = Principal::new(8, Role::Trainer);
        for status in ALL_STATUSES {
            let acquisition = with_status(status);
            assert_eq!(can_modify(&own, &acquisition), status == AcquisitionStatus::Pending);
            assert!(!can_modify(&other, &acquisition));
        }
    }

    #[test]
    fn administrator_modifies_any_pending_request() {
        let admin = Principal::new(1, Role::Administrator);
        assert!(can_modify(&admin, &pending(7)));
        assert!(!can_modify(&admin, &with_status(AcquisitionStatus::Approved)));
        assert!(ensure_deletable(&admin, &pending(7)).is_ok());
    }

    #[test]
    fn manager_is_treated_as_requester_for_edits() {
        let manager = Principal::new(3, Role::Manager);
        assert!(!can_modify(&manager, &pending(7)));
        assert!(can_modify(&manager, &pending(3)));
    }

    #[test]
    fn trainer_cannot_approve_own_request() {
        let trainer = Principal::new(7, Role::Trainer);
        let result = approve(&trainer, &pending(7), Decimal::from(100), day(2));
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }

    #[test]
    fn approve_records_decision() {
        let manager = Principal::new(2, Role::Manager);
        let transition = approve(&manager, &pending(7), Decimal::from_str("249.99").unwrap(), day(3)).unwrap();
        let next = &transition.entity;
        assert_eq!(next.status, AcquisitionStatus::Approved);
        assert_eq!(next.approved_by, Some(2));
        assert_eq!(next.approval_date, Some(day(3)));
        assert_eq!(next.amount, Some(Decimal::from_str("249.99").unwrap()));
        assert_eq!(
            transition.intents(),
            vec![NotificationIntent::to_user(NotificationKind::AcquisitionApproved, EntityRef::Acquisition(1), 7)]
        );
    }

    #[test]
    fn approve_accepts_zero_and_rejects_negative_amount() {
        let admin = Principal::new(1, Role::Administrator);
        assert!(approve(&admin, &pending(7), Decimal::ZERO, day(2)).is_ok());
        let result = approve(&admin, &pending(7), Decimal::from(-5), day(2));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn decisions_only_from_pending() {
        let admin = Principal::new(1, Role::Administrator);
        for status in ALL_STATUSES {
            let acquisition = with_status(status);
            let approved = approve(&admin, &acquisition, Decimal::ONE, day(2));
            let rejected = reject(&admin, &acquisition, day(2));
            assert_eq!(approved.is_ok(), status == AcquisitionStatus::Pending);
            assert_eq!(rejected.is_ok(), status == AcquisitionStatus::Pending);
            if let Ok(transition) = rejected {
                assert!(transition.entity.status.is_decided());
                assert_eq!(transition.entity.approved_by, Some(1));
                assert_eq!(transition.entity.approval_date, Some(day(2)));
            }
        }
    }

    #[test]
    fn manager_delivers_approved_acquisition() {
        let manager = Principal::new(2, Role::Manager);
        let approved = approve(&manager, &pending(7), Decimal::ONE, day(2)).unwrap().entity;
        let delivered = mark_delivered(&manager, &approved, day(9)).unwrap().entity;
        assert_eq!(delivered.status, AcquisitionStatus::Delivered);
        assert_eq!(delivered.delivery_date, Some(day(9)));
        assert_eq!(delivered.approved_by, Some(2));
    }

    #[test]
    fn delivery_requires_approval_and_staff() {
        let manager = Principal::new(2, Role::Manager);
        let trainer = Principal::new(7, Role::Trainer);
        assert!(matches!(
            mark_delivered(&manager, &pending(7), day(2)),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            mark_delivered(&manager, &with_status(AcquisitionStatus::Rejected), day(2)),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            mark_delivered(&trainer, &with_status(AcquisitionStatus::Approved), day(2)),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn update_validates_fields() {
        let trainer = Principal::new(7, Role::Trainer);
        let input = UpdateAcquisition { quantity: Some(0), ..Default::default() };
        assert!(matches!(update(&trainer, &pending(7), &input), Err(AppError::Validation(_))));

        let input = UpdateAcquisition {
            equipment_name: Some("  Laptop ".to_string()),
            urgency: Some(Urgency::High),
            ..Default::default()
        };
        let next = update(&trainer, &pending(7), &input).unwrap();
        assert_eq!(next.equipment_name, "Laptop");
        assert_eq!(next.urgency, Urgency::High);
        assert_eq!(next.status, AcquisitionStatus::Pending);
    }

    #[test]
    fn create_defaults_quantity_and_urgency() {
        let trainer = Principal::new(7, Role::Trainer);
        let input = CreateAcquisition {
            equipment_name: "Whiteboard".to_string(),
            description: None,
            quantity: None,
            provider_id: None,
            justification: None,
            urgency: None,
        };
        let new = create(&trainer, &input, day(4)).unwrap();
        assert_eq!(new.quantity, 1);
        assert_eq!(new.urgency, Urgency::Normal);
        assert_eq!(new.requested_by, 7);
        assert_eq!(new.request_date, day(4));
    }
}
