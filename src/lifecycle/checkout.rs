//! Checkout lifecycle: `InProgress -> Returned`, `InProgress -> Overdue -> Returned`

use chrono::NaiveDate;

use super::Transition;
use crate::{
    error::{AppError, AppResult},
    models::{
        checkout::{Checkout, CheckoutStatus, NewCheckout},
        equipment::{Equipment, EquipmentStatus},
        notification::{EntityRef, NotificationIntent, NotificationKind},
        principal::Principal,
        user::User,
    },
};

/// Lend `equipment` to `borrower` until `expected_return_date`.
///
/// The returned transition reserves the equipment; the reservation is a
/// conditional update so a concurrent check-out of the same item loses with
/// a conflict.
pub fn check_out(
    principal: &Principal,
    equipment: &Equipment,
    borrower: &User,
    expected_return_date: NaiveDate,
    notes: Option<String>,
    today: NaiveDate,
) -> AppResult<Transition<NewCheckout>> {
    principal.require_staff()?;

    match equipment.status {
        EquipmentStatus::Available => {}
        EquipmentStatus::CheckedOut => {
            return Err(AppError::Conflict(format!(
                "Equipment {} is already checked out",
                equipment.id
            )));
        }
        EquipmentStatus::Maintenance | EquipmentStatus::Retired => {
            return Err(AppError::InvalidState(format!(
                "Equipment {} is {} and cannot be checked out",
                equipment.id, equipment.status
            )));
        }
    }

    if !borrower.active {
        return Err(AppError::Validation(format!("User {} is not active", borrower.id)));
    }
    if expected_return_date < today {
        return Err(AppError::Validation(
            "Expected return date cannot be in the past".to_string(),
        ));
    }

    let checkout = NewCheckout {
        equipment_id: equipment.id,
        user_id: borrower.id,
        checkout_date: today,
        expected_return_date,
        checked_out_by: principal.id,
        notes,
    };
    Ok(Transition::new(checkout).equipment_status(
        equipment.id,
        EquipmentStatus::Available,
        EquipmentStatus::CheckedOut,
    ))
}

/// Tell the borrower about a stored checkout
pub fn checked_out(checkout: Checkout) -> Transition<Checkout> {
    let intent = NotificationIntent::to_user(
        NotificationKind::CheckoutCreated,
        EntityRef::Checkout(checkout.id),
        checkout.user_id,
    );
    Transition::new(checkout).notify(intent)
}

/// Register the return of a checkout, late or not
pub fn check_in(
    principal: &Principal,
    checkout: &Checkout,
    notes: Option<String>,
    today: NaiveDate,
) -> AppResult<Transition<Checkout>> {
    if !checkout.status.is_open() {
        return Err(AppError::InvalidState(format!(
            "Checkout {} has already been returned",
            checkout.id
        )));
    }
    principal.require_staff()?;

    let mut next = checkout.clone();
    next.status = CheckoutStatus::Returned;
    next.actual_return_date = Some(today);
    next.checked_in_by = Some(principal.id);
    if notes.is_some() {
        next.notes = notes;
    }
    Ok(Transition::new(next).equipment_status(
        checkout.equipment_id,
        EquipmentStatus::CheckedOut,
        EquipmentStatus::Available,
    ))
}

/// Overdue relabel for the sweep, `None` when the checkout is not eligible
pub fn mark_overdue(checkout: &Checkout, today: NaiveDate) -> Option<Transition<Checkout>> {
    if checkout.status != CheckoutStatus::InProgress || checkout.expected_return_date >= today {
        return None;
    }

    let mut next = checkout.clone();
    next.status = CheckoutStatus::Overdue;
    let intent = NotificationIntent::to_user(
        NotificationKind::CheckoutOverdue,
        EntityRef::Checkout(checkout.id),
        checkout.user_id,
    );
    Some(Transition::new(next).notify(intent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Effect;
    use crate::models::principal::Role;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn equipment(status: EquipmentStatus) -> Equipment {
        Equipment {
            id: 10,
            name: "Camera".to_string(),
            serial_number: None,
            category: None,
            status,
            room_id: None,
            provider_id: None,
            purchase_date: None,
            purchase_price: None,
            notes: None,
            crea_date: None,
            modif_date: None,
        }
    }

    fn borrower() -> User {
        User {
            id: 20,
            login: "borrower".to_string(),
            password: None,
            firstname: None,
            lastname: None,
            email: None,
            role: Role::Trainer,
            active: true,
            crea_date: None,
            modif_date: None,
        }
    }

    fn checkout(status: CheckoutStatus) -> Checkout {
        Checkout {
            id: 5,
            status,
            equipment_id: 10,
            user_id: 20,
            checkout_date: day(1),
            expected_return_date: day(1),
            actual_return_date: None,
            checked_out_by: 2,
            checked_in_by: None,
            notes: None,
            version: 1,
        }
    }

    #[test]
    fn staff_checks_out_available_equipment() {
        let manager = Principal::new(2, Role::Manager);
        let transition =
            check_out(&manager, &equipment(EquipmentStatus::Available), &borrower(), day(8), None, day(1)).unwrap();
        assert_eq!(transition.entity.checked_out_by, 2);
        assert_eq!(transition.entity.checkout_date, day(1));
        assert_eq!(
            transition.effects,
            vec![Effect::EquipmentStatus {
                equipment_id: 10,
                from: EquipmentStatus::Available,
                to: EquipmentStatus::CheckedOut,
            }]
        );
    }

    #[test]
    fn check_out_refusals() {
        let manager = Principal::new(2, Role::Manager);
        let trainer = Principal::new(7, Role::Trainer);
        let available = equipment(EquipmentStatus::Available);

        assert!(matches!(
            check_out(&trainer, &available, &borrower(), day(8), None, day(1)),
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            check_out(&manager, &equipment(EquipmentStatus::CheckedOut), &borrower(), day(8), None, day(1)),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            check_out(&manager, &equipment(EquipmentStatus::Maintenance), &borrower(), day(8), None, day(1)),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            check_out(&manager, &available, &borrower(), day(1), None, day(2)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn check_in_returns_open_checkouts() {
        let admin = Principal::new(1, Role::Administrator);
        for status in [CheckoutStatus::InProgress, CheckoutStatus::Overdue] {
            let transition = check_in(&admin, &checkout(status), Some("scratched lens".to_string()), day(6)).unwrap();
            let next = transition.entity;
            assert_eq!(next.status, CheckoutStatus::Returned);
            assert_eq!(next.actual_return_date, Some(day(6)));
            assert_eq!(next.checked_in_by, Some(1));
            assert_eq!(next.notes.as_deref(), Some("scratched lens"));
        }
    }

    #[test]
    fn check_in_of_returned_checkout_is_invalid_for_every_role() {
        let returned = checkout(CheckoutStatus::Returned);
        for role in [Role::Administrator, Role::Manager, Role::Trainer] {
            let result = check_in(&Principal::new(1, role), &returned, None, day(6));
            assert!(matches!(result, Err(AppError::InvalidState(_))));
        }
    }

    #[test]
    fn trainer_cannot_check_in() {
        let result = check_in(&Principal::new(7, Role::Trainer), &checkout(CheckoutStatus::InProgress), None, day(6));
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }

    #[test]
    fn overdue_only_after_expected_date() {
        let open = checkout(CheckoutStatus::InProgress);
        assert!(mark_overdue(&open, day(1)).is_none());
        let transition = mark_overdue(&open, day(2)).unwrap();
        assert_eq!(transition.entity.status, CheckoutStatus::Overdue);
        assert_eq!(transition.entity.expected_return_date, open.expected_return_date);
        assert_eq!(transition.entity.actual_return_date, None);
        assert!(mark_overdue(&transition.entity, day(3)).is_none());
        assert!(mark_overdue(&checkout(CheckoutStatus::Returned), day(3)).is_none());
    }
}
