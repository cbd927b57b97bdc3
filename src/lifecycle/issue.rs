//! Issue lifecycle: `Reported -> InProgress -> Resolved`

use chrono::NaiveDate;

use super::Transition;
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::Equipment,
        issue::{CreateIssue, Issue, IssueStatus, NewIssue},
        notification::{EntityRef, NotificationIntent, NotificationKind},
        principal::{Principal, Role},
    },
};

/// Any role may report an issue on existing equipment
pub fn report(principal: &Principal, equipment: &Equipment, input: &CreateIssue, today: NaiveDate) -> AppResult<NewIssue> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    Ok(NewIssue {
        equipment_id: equipment.id,
        title: title.to_string(),
        description: input.description.clone(),
        priority: input.priority.unwrap_or_default(),
        reported_by: principal.id,
        reported_date: today,
    })
}

pub fn reported(issue: Issue) -> Transition<Issue> {
    let entity = EntityRef::Issue(issue.id);
    Transition::new(issue).notify(NotificationIntent::to_staff(NotificationKind::IssueReported, entity))
}

pub fn take_charge(principal: &Principal, issue: &Issue) -> AppResult<Transition<Issue>> {
    principal.require_staff()?;
    if issue.status != IssueStatus::Reported {
        return Err(AppError::InvalidState(format!(
            "Issue {} is {}, only reported issues can be taken in charge",
            issue.id, issue.status
        )));
    }

    let mut next = issue.clone();
    next.status = IssueStatus::InProgress;
    next.assigned_to = Some(principal.id);
    let intent = NotificationIntent::to_user(NotificationKind::IssueAssigned, EntityRef::Issue(issue.id), issue.reported_by);
    Ok(Transition::new(next).notify(intent))
}

/// Only the assignee (or an administrator) may resolve
pub fn can_resolve(principal: &Principal, issue: &Issue) -> bool {
    match principal.role {
        Role::Administrator => true,
        Role::Manager | Role::Trainer => issue.assigned_to == Some(principal.id),
    }
}

pub fn resolve(
    principal: &Principal,
    issue: &Issue,
    resolution_notes: &str,
    today: NaiveDate,
) -> AppResult<Transition<Issue>> {
    if issue.status != IssueStatus::InProgress {
        return Err(AppError::InvalidState(format!(
            "Issue {} is {}, only issues in progress can be resolved",
            issue.id, issue.status
        )));
    }
    if !can_resolve(principal, issue) {
        return Err(AppError::Authorization(format!(
            "Issue {} is assigned to another user",
            issue.id
        )));
    }
    let notes = resolution_notes.trim();
    if notes.is_empty() {
        return Err(AppError::Validation("Resolution notes are required".to_string()));
    }

    let mut next = issue.clone();
    next.status = IssueStatus::Resolved;
    next.resolved_date = Some(today);
    next.resolution_notes = Some(notes.to_string());
    let intent = NotificationIntent::to_user(NotificationKind::IssueResolved, EntityRef::Issue(issue.id), issue.reported_by);
    Ok(Transition::new(next).notify(intent))
}
