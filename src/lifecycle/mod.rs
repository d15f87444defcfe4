pub mod store;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{LeaveError, TransitionError, ValidationError};
use crate::model::leave::{BalanceSummary, LeaveRequest, LeaveStatus, LeaveType};
use crate::model::role::Role;
use store::LeaveStore;

/// Who is asking. Supplied per call by the identity layer; the manager
/// never authenticates anybody itself.
#[derive(Debug, Copy, Clone)]
pub struct Actor {
    pub employee_id: Option<u64>,
    pub role: Role,
}

impl Actor {
    pub fn owns(&self, record: &LeaveRequest) -> bool {
        self.employee_id == Some(record.employee_id)
    }
}

/// Knobs the core rules read but never hardcode.
#[derive(Debug, Clone)]
pub struct LifecyclePolicy {
    /// Appended to user-supplied CCs up to the cap of 2.
    pub default_cc: Vec<String>,
    /// Whether a CANCELLED record still accepts remarks.
    pub remarks_on_cancelled: bool,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            default_cc: vec!["hr@gmail.com".into(), "manager@gmail.com".into()],
            remarks_on_cancelled: true,
        }
    }
}

const MAX_CC_RECIPIENTS: usize = 2;

/// Concrete manager type the HTTP layer serves.
pub type LeaveService = LeaveLifecycleManager<store::MySqlLeaveStore>;

/// Creation input. `number_of_days` is derived from the date range; a
/// caller may supply it, but only a value equal to the inclusive day
/// count is accepted.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_id: u64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub leave_type: LeaveType,
    pub reason: String,
    pub applying_to: String,
    pub cc_to: Vec<String>,
    pub contact_details: String,
    pub attachment: Option<String>,
    pub number_of_days: Option<i64>,
}

/// Owns the leave-request set: validates new requests, enforces the legal
/// status transitions, keeps the remark trail append-only, and derives
/// per-employee balances from the APPROVED snapshot.
pub struct LeaveLifecycleManager<S> {
    store: S,
    policy: LifecyclePolicy,
}

impl<S: LeaveStore> LeaveLifecycleManager<S> {
    pub fn new(store: S, policy: LifecyclePolicy) -> Self {
        Self { store, policy }
    }

    /// Validates and stores a new request in PENDING state.
    pub async fn create(&self, input: NewLeaveRequest) -> Result<LeaveRequest, LeaveError> {
        if input.reason.trim().is_empty() {
            return Err(ValidationError::MissingField("reason").into());
        }
        if input.applying_to.trim().is_empty() {
            return Err(ValidationError::MissingField("applyingTo").into());
        }
        if input.contact_details.trim().is_empty() {
            return Err(ValidationError::MissingField("contactDetails").into());
        }
        if input.to_date < input.from_date {
            return Err(ValidationError::InvalidDateRange.into());
        }

        let contact = input.contact_details.trim();
        if contact.len() != 10 || !contact.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidContact.into());
        }

        let mut cc_to: Vec<String> = input
            .cc_to
            .iter()
            .map(|cc| cc.trim().to_string())
            .filter(|cc| !cc.is_empty())
            .collect();
        if cc_to.len() > MAX_CC_RECIPIENTS {
            return Err(ValidationError::TooManyRecipients.into());
        }
        // Pad with the configured defaults up to the cap.
        let remaining = MAX_CC_RECIPIENTS - cc_to.len();
        cc_to.extend(self.policy.default_cc.iter().take(remaining).cloned());

        // The day count is owned by the date range; a supplied value is only
        // accepted when it agrees, otherwise approved balances would drift.
        let number_of_days = LeaveRequest::inclusive_days(input.from_date, input.to_date);
        if input.number_of_days.is_some_and(|days| days != number_of_days) {
            return Err(ValidationError::InvalidDayCount.into());
        }

        let record = LeaveRequest {
            id: 0, // assigned by the store
            employee_id: input.employee_id,
            from_date: input.from_date,
            to_date: input.to_date,
            leave_type: input.leave_type,
            reason: input.reason.trim().to_string(),
            applying_to: input.applying_to.trim().to_string(),
            cc_to,
            contact_details: contact.to_string(),
            status: LeaveStatus::Pending,
            attachment: input.attachment,
            remarks: Vec::new(),
            number_of_days,
        };

        let record = self.store.insert(record).await?;
        info!(
            leave_id = record.id,
            employee_id = record.employee_id,
            "Leave request submitted"
        );
        Ok(record)
    }

    /// Moves a PENDING request to APPROVED or REJECTED. CANCELLED is never
    /// reachable through this path and PENDING is never a target.
    pub async fn transition(
        &self,
        id: u64,
        new_status: LeaveStatus,
        actor: &Actor,
        remark: Option<&str>,
    ) -> Result<LeaveRequest, LeaveError> {
        let mut record = self.fetch(id).await?;

        if record.status.is_terminal() {
            return Err(TransitionError::AlreadyTerminal.into());
        }

        match new_status {
            LeaveStatus::Cancelled => {
                return Err(TransitionError::UnauthorizedCancellation.into());
            }
            LeaveStatus::Pending => {
                return Err(TransitionError::InvalidTransition {
                    from: record.status,
                    to: new_status,
                }
                .into());
            }
            LeaveStatus::Approved | LeaveStatus::Rejected => {
                if !actor.role.can_approve() {
                    return Err(LeaveError::Unauthorized);
                }
                if record.status != LeaveStatus::Pending {
                    return Err(TransitionError::InvalidTransition {
                        from: record.status,
                        to: new_status,
                    }
                    .into());
                }
            }
        }

        record.status = new_status;
        if let Some(text) = remark {
            record.remarks.push(validated_remark(text)?);
        }

        self.store.update(&record).await?;
        info!(leave_id = id, status = %new_status, "Leave status updated");
        Ok(record)
    }

    /// Owner-only withdrawal to CANCELLED, legal from any non-terminal
    /// status. No remark is auto-appended.
    pub async fn withdraw(&self, id: u64, employee_id: u64) -> Result<LeaveRequest, LeaveError> {
        let mut record = self.fetch(id).await?;

        if record.status.is_terminal() {
            return Err(TransitionError::AlreadyTerminal.into());
        }
        if record.employee_id != employee_id {
            return Err(LeaveError::Unauthorized);
        }

        record.status = LeaveStatus::Cancelled;
        self.store.update(&record).await?;
        info!(leave_id = id, employee_id, "Leave request withdrawn");
        Ok(record)
    }

    /// Appends one remark. Owner and approvers only; whether a CANCELLED
    /// record still accepts remarks is a policy choice.
    pub async fn add_remark(
        &self,
        id: u64,
        remark: &str,
        actor: &Actor,
    ) -> Result<LeaveRequest, LeaveError> {
        let remark = validated_remark(remark)?;
        let mut record = self.fetch(id).await?;

        if record.status.is_terminal() && !self.policy.remarks_on_cancelled {
            return Err(TransitionError::AlreadyTerminal.into());
        }
        if !actor.role.can_approve() && !actor.owns(&record) {
            return Err(LeaveError::Unauthorized);
        }

        record.remarks.push(remark);
        self.store.update(&record).await?;
        info!(leave_id = id, "Remark added");
        Ok(record)
    }

    /// Approved days per leave type plus the grand total, recomputed from
    /// the current snapshot on every call.
    pub async fn compute_balance(&self, employee_id: u64) -> Result<BalanceSummary, LeaveError> {
        let mut days_by_type: BTreeMap<LeaveType, i64> = BTreeMap::new();
        let mut total_days = 0;

        for record in self.store.list_by_employee(employee_id).await? {
            if record.status != LeaveStatus::Approved {
                continue;
            }
            *days_by_type.entry(record.leave_type).or_insert(0) += record.number_of_days;
            total_days += record.number_of_days;
        }

        Ok(BalanceSummary {
            employee_id,
            days_by_type,
            total_days,
        })
    }

    /// Most recent non-CANCELLED request by from_date, if any.
    pub async fn latest_active(
        &self,
        employee_id: u64,
    ) -> Result<Option<LeaveRequest>, LeaveError> {
        let latest = self
            .store
            .list_by_employee(employee_id)
            .await?
            .into_iter()
            .filter(|r| !r.status.is_terminal())
            .max_by_key(|r| r.from_date);
        Ok(latest)
    }

    pub async fn get(&self, id: u64) -> Result<LeaveRequest, LeaveError> {
        self.fetch(id).await
    }

    pub async fn list(&self) -> Result<Vec<LeaveRequest>, LeaveError> {
        Ok(self.store.list().await?)
    }

    pub async fn list_for_employee(
        &self,
        employee_id: u64,
    ) -> Result<Vec<LeaveRequest>, LeaveError> {
        Ok(self.store.list_by_employee(employee_id).await?)
    }

    /// Administrative delete: unconditional and irreversible, ADMIN only.
    pub async fn delete(&self, id: u64, actor: &Actor) -> Result<(), LeaveError> {
        if actor.role != Role::Admin {
            return Err(LeaveError::Unauthorized);
        }
        if !self.store.delete(id).await? {
            return Err(LeaveError::NotFound(id));
        }
        info!(leave_id = id, "Leave request deleted");
        Ok(())
    }

    async fn fetch(&self, id: u64) -> Result<LeaveRequest, LeaveError> {
        self.store.get(id).await?.ok_or(LeaveError::NotFound(id))
    }
}

fn validated_remark(text: &str) -> Result<String, LeaveError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyRemark.into());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::store::MemoryLeaveStore;
    use super::*;
    use pretty_assertions::assert_eq;

    fn manager() -> LeaveLifecycleManager<MemoryLeaveStore> {
        LeaveLifecycleManager::new(MemoryLeaveStore::new(), LifecyclePolicy::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_request(employee_id: u64) -> NewLeaveRequest {
        NewLeaveRequest {
            employee_id,
            from_date: date(2024, 1, 10),
            to_date: date(2024, 1, 12),
            leave_type: LeaveType::Sick,
            reason: "flu".into(),
            applying_to: "lead@gmail.com".into(),
            cc_to: vec![],
            contact_details: "9876543210".into(),
            attachment: None,
            number_of_days: None,
        }
    }

    fn employee(id: u64) -> Actor {
        Actor {
            employee_id: Some(id),
            role: Role::Employee,
        }
    }

    fn approver() -> Actor {
        Actor {
            employee_id: None,
            role: Role::Approver,
        }
    }

    fn admin() -> Actor {
        Actor {
            employee_id: None,
            role: Role::Admin,
        }
    }

    #[actix_web::test]
    async fn create_starts_pending_with_inclusive_day_count() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();

        assert_eq!(record.status, LeaveStatus::Pending);
        assert_eq!(record.number_of_days, 3);
        assert_eq!(record.employee_id, 7);
        assert!(record.remarks.is_empty());
        assert_ne!(record.id, 0);
    }

    #[actix_web::test]
    async fn create_rejects_inverted_date_range() {
        let mgr = manager();
        let mut input = new_request(7);
        input.from_date = date(2024, 1, 12);
        input.to_date = date(2024, 1, 10);

        let err = mgr.create(input).await.unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Validation(ValidationError::InvalidDateRange)
        ));
        assert!(mgr.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn create_rejects_bad_contact_numbers() {
        let mgr = manager();
        for contact in ["12345", "12345678901", "98765x3210", ""] {
            let mut input = new_request(7);
            input.contact_details = contact.into();
            let err = mgr.create(input).await.unwrap_err();
            assert!(matches!(err, LeaveError::Validation(_)), "{contact:?}");
        }
    }

    #[actix_web::test]
    async fn create_requires_reason_and_approver() {
        let mgr = manager();

        let mut input = new_request(7);
        input.reason = "  ".into();
        let err = mgr.create(input).await.unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Validation(ValidationError::MissingField("reason"))
        ));

        let mut input = new_request(7);
        input.applying_to = String::new();
        let err = mgr.create(input).await.unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Validation(ValidationError::MissingField("applyingTo"))
        ));
    }

    #[actix_web::test]
    async fn cc_list_is_padded_to_two_with_defaults() {
        let mgr = manager();

        let record = mgr.create(new_request(7)).await.unwrap();
        assert_eq!(record.cc_to, vec!["hr@gmail.com", "manager@gmail.com"]);

        let mut input = new_request(7);
        input.cc_to = vec!["peer@gmail.com".into()];
        let record = mgr.create(input).await.unwrap();
        assert_eq!(record.cc_to, vec!["peer@gmail.com", "hr@gmail.com"]);

        let mut input = new_request(7);
        input.cc_to = vec!["a@gmail.com".into(), "b@gmail.com".into()];
        let record = mgr.create(input).await.unwrap();
        assert_eq!(record.cc_to, vec!["a@gmail.com", "b@gmail.com"]);
    }

    #[actix_web::test]
    async fn supplied_day_count_must_match_the_date_range() {
        let mgr = manager();

        // Negative and inflated counts never reach the store.
        for bogus in [-500, 0, 3650] {
            let mut input = new_request(7);
            input.number_of_days = Some(bogus);
            let err = mgr.create(input).await.unwrap_err();
            assert!(
                matches!(err, LeaveError::Validation(ValidationError::InvalidDayCount)),
                "{bogus}"
            );
        }
        assert!(mgr.list().await.unwrap().is_empty());

        // The matching count is accepted and feeds the balance as-is.
        let mut input = new_request(7);
        input.number_of_days = Some(3);
        let record = mgr.create(input).await.unwrap();
        assert_eq!(record.number_of_days, 3);

        mgr.transition(record.id, LeaveStatus::Approved, &approver(), None)
            .await
            .unwrap();
        assert_eq!(mgr.compute_balance(7).await.unwrap().total_days, 3);
    }

    #[actix_web::test]
    async fn more_than_two_ccs_is_rejected() {
        let mgr = manager();
        let mut input = new_request(7);
        input.cc_to = vec!["a@x.com".into(), "b@x.com".into(), "c@x.com".into()];

        let err = mgr.create(input).await.unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Validation(ValidationError::TooManyRecipients)
        ));
    }

    #[actix_web::test]
    async fn approver_can_approve_and_reject_pending_requests() {
        let mgr = manager();

        let record = mgr.create(new_request(7)).await.unwrap();
        let updated = mgr
            .transition(record.id, LeaveStatus::Approved, &approver(), None)
            .await
            .unwrap();
        assert_eq!(updated.status, LeaveStatus::Approved);

        let record = mgr.create(new_request(7)).await.unwrap();
        let updated = mgr
            .transition(record.id, LeaveStatus::Rejected, &admin(), Some("no cover"))
            .await
            .unwrap();
        assert_eq!(updated.status, LeaveStatus::Rejected);
        assert_eq!(updated.remarks, vec!["no cover"]);
    }

    #[actix_web::test]
    async fn employee_cannot_approve() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();

        let err = mgr
            .transition(record.id, LeaveStatus::Approved, &employee(7), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LeaveError::Unauthorized));
        assert_eq!(mgr.get(record.id).await.unwrap().status, LeaveStatus::Pending);
    }

    #[actix_web::test]
    async fn pending_is_never_a_transition_target() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();

        let err = mgr
            .transition(record.id, LeaveStatus::Pending, &approver(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Transition(TransitionError::InvalidTransition { .. })
        ));
    }

    #[actix_web::test]
    async fn cancellation_is_not_reachable_through_status_updates() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();

        let err = mgr
            .transition(record.id, LeaveStatus::Cancelled, &approver(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Transition(TransitionError::UnauthorizedCancellation)
        ));
    }

    #[actix_web::test]
    async fn approved_requests_cannot_be_re_decided() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();
        mgr.transition(record.id, LeaveStatus::Approved, &approver(), None)
            .await
            .unwrap();

        let err = mgr
            .transition(record.id, LeaveStatus::Rejected, &approver(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Transition(TransitionError::InvalidTransition {
                from: LeaveStatus::Approved,
                to: LeaveStatus::Rejected,
            })
        ));
    }

    #[actix_web::test]
    async fn owner_can_withdraw_from_any_non_terminal_status() {
        let mgr = manager();

        let record = mgr.create(new_request(7)).await.unwrap();
        let withdrawn = mgr.withdraw(record.id, 7).await.unwrap();
        assert_eq!(withdrawn.status, LeaveStatus::Cancelled);
        assert!(withdrawn.remarks.is_empty());

        let record = mgr.create(new_request(7)).await.unwrap();
        mgr.transition(record.id, LeaveStatus::Approved, &approver(), None)
            .await
            .unwrap();
        let withdrawn = mgr.withdraw(record.id, 7).await.unwrap();
        assert_eq!(withdrawn.status, LeaveStatus::Cancelled);
    }

    #[actix_web::test]
    async fn withdraw_by_non_owner_is_unauthorized() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();

        let err = mgr.withdraw(record.id, 8).await.unwrap_err();
        assert!(matches!(err, LeaveError::Unauthorized));
        assert_eq!(mgr.get(record.id).await.unwrap().status, LeaveStatus::Pending);
    }

    #[actix_web::test]
    async fn cancelled_records_are_frozen() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();
        mgr.withdraw(record.id, 7).await.unwrap();

        for target in [
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Pending,
            LeaveStatus::Cancelled,
        ] {
            let err = mgr
                .transition(record.id, target, &approver(), None)
                .await
                .unwrap_err();
            assert!(
                matches!(err, LeaveError::Transition(TransitionError::AlreadyTerminal)),
                "{target}"
            );
        }

        // Terminality wins even over the ownership check.
        let err = mgr.withdraw(record.id, 8).await.unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Transition(TransitionError::AlreadyTerminal)
        ));
        let err = mgr.withdraw(record.id, 7).await.unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Transition(TransitionError::AlreadyTerminal)
        ));
    }

    #[actix_web::test]
    async fn empty_remarks_are_rejected_and_leave_the_trail_unchanged() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();

        for text in ["", "   ", "\t\n"] {
            let err = mgr.add_remark(record.id, text, &approver()).await.unwrap_err();
            assert!(matches!(
                err,
                LeaveError::Validation(ValidationError::EmptyRemark)
            ));
        }
        assert!(mgr.get(record.id).await.unwrap().remarks.is_empty());
    }

    #[actix_web::test]
    async fn remarks_append_in_order_for_owner_and_approver() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();

        mgr.add_remark(record.id, "  awaiting documents ", &approver())
            .await
            .unwrap();
        mgr.add_remark(record.id, "uploaded them", &employee(7))
            .await
            .unwrap();

        let record = mgr.get(record.id).await.unwrap();
        assert_eq!(record.remarks, vec!["awaiting documents", "uploaded them"]);

        // A different employee has no business remarking here.
        let err = mgr
            .add_remark(record.id, "me too", &employee(8))
            .await
            .unwrap_err();
        assert!(matches!(err, LeaveError::Unauthorized));
    }

    #[actix_web::test]
    async fn cancelled_remarks_follow_policy() {
        let blocked = LeaveLifecycleManager::new(
            MemoryLeaveStore::new(),
            LifecyclePolicy {
                remarks_on_cancelled: false,
                ..LifecyclePolicy::default()
            },
        );
        let record = blocked.create(new_request(7)).await.unwrap();
        blocked.withdraw(record.id, 7).await.unwrap();

        let err = blocked
            .add_remark(record.id, "late note", &approver())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LeaveError::Transition(TransitionError::AlreadyTerminal)
        ));

        // Default policy keeps the original behavior: appends are allowed.
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();
        mgr.withdraw(record.id, 7).await.unwrap();
        let record = mgr
            .add_remark(record.id, "late note", &approver())
            .await
            .unwrap();
        assert_eq!(record.remarks, vec!["late note"]);
    }

    #[actix_web::test]
    async fn balance_counts_only_approved_records() {
        let mgr = manager();

        // APPROVED sick, 3 days.
        let sick = mgr.create(new_request(7)).await.unwrap();
        mgr.transition(sick.id, LeaveStatus::Approved, &approver(), None)
            .await
            .unwrap();

        // APPROVED casual, 1 day.
        let mut input = new_request(7);
        input.leave_type = LeaveType::Casual;
        input.from_date = date(2024, 2, 1);
        input.to_date = date(2024, 2, 1);
        let casual = mgr.create(input).await.unwrap();
        mgr.transition(casual.id, LeaveStatus::Approved, &approver(), None)
            .await
            .unwrap();

        // PENDING, REJECTED and CANCELLED records must not count.
        mgr.create(new_request(7)).await.unwrap();
        let rejected = mgr.create(new_request(7)).await.unwrap();
        mgr.transition(rejected.id, LeaveStatus::Rejected, &approver(), None)
            .await
            .unwrap();
        let cancelled = mgr.create(new_request(7)).await.unwrap();
        mgr.withdraw(cancelled.id, 7).await.unwrap();

        // Other employees are invisible here.
        let other = mgr.create(new_request(8)).await.unwrap();
        mgr.transition(other.id, LeaveStatus::Approved, &approver(), None)
            .await
            .unwrap();

        let balance = mgr.compute_balance(7).await.unwrap();
        assert_eq!(balance.total_days, 4);
        assert_eq!(balance.days_by_type.get(&LeaveType::Sick), Some(&3));
        assert_eq!(balance.days_by_type.get(&LeaveType::Casual), Some(&1));
        assert_eq!(balance.days_by_type.get(&LeaveType::Paid), None);
    }

    #[actix_web::test]
    async fn latest_active_skips_cancelled_records() {
        let mgr = manager();
        assert!(mgr.latest_active(7).await.unwrap().is_none());

        let older = mgr.create(new_request(7)).await.unwrap();

        let mut input = new_request(7);
        input.from_date = date(2024, 3, 1);
        input.to_date = date(2024, 3, 2);
        let newer = mgr.create(input).await.unwrap();

        let latest = mgr.latest_active(7).await.unwrap().unwrap();
        assert_eq!(latest.id, newer.id);

        mgr.withdraw(newer.id, 7).await.unwrap();
        let latest = mgr.latest_active(7).await.unwrap().unwrap();
        assert_eq!(latest.id, older.id);

        mgr.withdraw(older.id, 7).await.unwrap();
        assert!(mgr.latest_active(7).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn delete_is_admin_only_and_unconditional() {
        let mgr = manager();
        let record = mgr.create(new_request(7)).await.unwrap();
        mgr.transition(record.id, LeaveStatus::Approved, &approver(), None)
            .await
            .unwrap();

        let err = mgr.delete(record.id, &approver()).await.unwrap_err();
        assert!(matches!(err, LeaveError::Unauthorized));
        let err = mgr.delete(record.id, &employee(7)).await.unwrap_err();
        assert!(matches!(err, LeaveError::Unauthorized));

        mgr.delete(record.id, &admin()).await.unwrap();
        let err = mgr.get(record.id).await.unwrap_err();
        assert!(matches!(err, LeaveError::NotFound(_)));

        let err = mgr.delete(record.id, &admin()).await.unwrap_err();
        assert!(matches!(err, LeaveError::NotFound(_)));
    }

    #[actix_web::test]
    async fn unknown_ids_surface_as_not_found() {
        let mgr = manager();
        for result in [
            mgr.transition(99, LeaveStatus::Approved, &approver(), None)
                .await
                .map(|_| ()),
            mgr.withdraw(99, 7).await.map(|_| ()),
            mgr.add_remark(99, "hello", &approver()).await.map(|_| ()),
            mgr.get(99).await.map(|_| ()),
        ] {
            assert!(matches!(result.unwrap_err(), LeaveError::NotFound(99)));
        }
    }

    #[test]
    fn leave_type_parses_case_insensitively() {
        assert_eq!("sick".parse::<LeaveType>().unwrap(), LeaveType::Sick);
        assert_eq!("Sick Leave".parse::<LeaveType>().unwrap(), LeaveType::Sick);
        assert_eq!("MATERNITY".parse::<LeaveType>().unwrap(), LeaveType::Maternity);
        assert_eq!(LeaveType::Casual.to_string(), "CASUAL");
        assert!("vacation".parse::<LeaveType>().is_err());
    }

    #[test]
    fn status_round_trips_as_upper_case() {
        assert_eq!(LeaveStatus::Pending.to_string(), "PENDING");
        assert_eq!("cancelled".parse::<LeaveStatus>().unwrap(), LeaveStatus::Cancelled);
    }
}
