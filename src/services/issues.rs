//! Equipment issue tracking

use std::sync::Arc;

use validator::Validate;

use crate::{
    clock::Clock,
    error::AppResult,
    lifecycle::{self, Outcome},
    models::{
        issue::{CreateIssue, Issue, IssueStatus, ResolveIssue},
        principal::Principal,
    },
    repository::LifecycleStore,
};

#[derive(Clone)]
pub struct IssuesService {
    store: Arc<dyn LifecycleStore>,
    clock: Arc<dyn Clock>,
}

impl IssuesService {
    pub fn new(store: Arc<dyn LifecycleStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn list(&self, status: Option<IssueStatus>) -> AppResult<Vec<Issue>> {
        self.store.list_issues(status).await
    }

    pub async fn get(&self, id: i32) -> AppResult<Issue> {
        self.store.get_issue(id).await
    }

    pub async fn report(&self, principal: &Principal, input: CreateIssue) -> AppResult<Outcome<Issue>> {
        input.validate()?;
        let equipment = self.store.get_equipment(input.equipment_id).await?;
        let new = lifecycle::issue::report(principal, &equipment, &input, self.clock.today())?;
        let stored = self.store.insert_issue(&new).await?;

        tracing::info!(issue_id = stored.id, equipment_id = stored.equipment_id, "Issue reported");
        let transition = lifecycle::issue::reported(stored);
        let notifications = transition.intents();
        Ok(Outcome::new(transition.entity, notifications))
    }

    pub async fn take_charge(&self, principal: &Principal, id: i32) -> AppResult<Outcome<Issue>> {
        let current = self.store.get_issue(id).await?;
        let transition = lifecycle::issue::take_charge(principal, &current)?;
        let saved = self.store.save_issue(&transition.entity).await?;

        tracing::info!(issue_id = id, assigned_to = principal.id, "Issue taken in charge");
        Ok(Outcome::new(saved, transition.intents()))
    }

    pub async fn resolve(&self, principal: &Principal, id: i32, input: ResolveIssue) -> AppResult<Outcome<Issue>> {
        let current = self.store.get_issue(id).await?;
        let transition =
            lifecycle::issue::resolve(principal, &current, &input.resolution_notes, self.clock.today())?;
        let saved = self.store.save_issue(&transition.entity).await?;

        tracing::info!(issue_id = id, resolved_by = principal.id, "Issue resolved");
        Ok(Outcome::new(saved, transition.intents()))
    }
}
