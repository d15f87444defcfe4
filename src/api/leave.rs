use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::LeaveError;
use crate::lifecycle::{LeaveService, NewLeaveRequest};
use crate::model::leave::{BalanceSummary, LeaveRequest, LeaveStatus, LeaveType};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeave {
    #[schema(example = "2026-01-10", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-01-12", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = "SICK")]
    pub leave_type: LeaveType,
    #[schema(example = "Down with flu")]
    pub reason: String,
    #[schema(example = "teamlead@gmail.com")]
    pub applying_to: String,
    /// Up to 2 addresses; padded with the configured defaults.
    #[serde(default)]
    pub cc_to: Vec<String>,
    #[schema(example = "9876543210")]
    pub contact_details: String,
    /// Reference returned by the file-upload collaborator, if any.
    pub attachment: Option<String>,
    pub number_of_days: Option<i64>,
}

#[derive(Deserialize, IntoParams)]
pub struct StatusQuery {
    /// Target status, APPROVED or REJECTED.
    pub status: String,
    /// Optional remark appended together with the decision.
    pub remark: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct RemarkQuery {
    pub remark: String,
}

fn employee_id_of(auth: &AuthUser) -> actix_web::Result<u64> {
    auth.employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))
}

/// Visibility guard: approvers see every record, an employee only their own.
fn require_visibility(auth: &AuthUser, record: &LeaveRequest) -> Result<(), LeaveError> {
    if auth.role.can_approve() || auth.employee_id == Some(record.employee_id) {
        Ok(())
    } else {
        Err(LeaveError::Unauthorized)
    }
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves/createLeave",
    request_body = CreateLeave,
    responses(
        (status = 200, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = employee_id_of(&auth)?;
    let payload = payload.into_inner();

    let record = manager
        .create(NewLeaveRequest {
            employee_id,
            from_date: payload.from_date,
            to_date: payload.to_date,
            leave_type: payload.leave_type,
            reason: payload.reason,
            applying_to: payload.applying_to,
            cc_to: payload.cc_to,
            contact_details: payload.contact_details,
            attachment: payload.attachment,
            number_of_days: payload.number_of_days,
        })
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave applied successfully",
        "leave": record
    })))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/getAllLeaves",
    responses(
        (status = 200, description = "All visible leave requests", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn all_leaves(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
) -> actix_web::Result<impl Responder> {
    // Approvers and admins see everything; an employee only their own rows.
    let leaves = if auth.role.can_approve() {
        manager.list().await?
    } else {
        manager.list_for_employee(employee_id_of(&auth)?).await?
    };

    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Approve / reject (approver)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/updateStatus/{id}",
    params(
        ("id" = u64, Path, description = "Leave request id"),
        StatusQuery
    ),
    responses(
        (status = 200, description = "Status updated", body = LeaveRequest),
        (status = 400, description = "Unknown or invalid target status"),
        (status = 403, description = "Cancellation reserved for the owner"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Illegal transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn update_status(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    path: web::Path<u64>,
    query: web::Query<StatusQuery>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let new_status: LeaveStatus = query.status.parse().map_err(|_| {
        actix_web::error::ErrorBadRequest(json!({
            "message": format!("'{}' is not a known leave status", query.status)
        }))
    })?;

    let record = manager
        .transition(leave_id, new_status, &auth.actor(), query.remark.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Leave #{leave_id} updated to {new_status}"),
        "leave": record
    })))
}

/* =========================
Withdraw (owner)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/CancelLeaveById/{id}",
    params(("id" = u64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave withdrawn", body = LeaveRequest),
        (status = 403, description = "Only the owning employee may withdraw"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let employee_id = employee_id_of(&auth)?;

    let record = manager.withdraw(leave_id, employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request cancelled",
        "leave": record
    })))
}

/* =========================
Remarks
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves/addRemark/{id}",
    params(
        ("id" = u64, Path, description = "Leave request id"),
        RemarkQuery
    ),
    responses(
        (status = 200, description = "Remark added", body = LeaveRequest),
        (status = 400, description = "Empty remark"),
        (status = 403, description = "Actor may not remark on this record"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn add_remark(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    path: web::Path<u64>,
    query: web::Query<RemarkQuery>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let record = manager
        .add_remark(leave_id, &query.remark, &auth.actor())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Remark added successfully",
        "leave": record
    })))
}

#[utoipa::path(
    get,
    path = "/api/leaves/getRemark/{id}",
    params(("id" = u64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Remark trail, oldest first", body = [String]),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_remarks(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let record = manager.get(path.into_inner()).await?;
    require_visibility(&auth, &record)?;

    Ok(HttpResponse::Ok().json(record.remarks))
}

/* =========================
Balance & current status
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/leaveBalance/{employeeId}",
    params(("employeeId" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Approved days per leave type", body = BalanceSummary),
        (status = 403, description = "Employees may only query their own balance")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_balance(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    if !auth.role.can_approve() && auth.employee_id != Some(employee_id) {
        return Err(LeaveError::Unauthorized.into());
    }

    let balance = manager.compute_balance(employee_id).await?;
    Ok(HttpResponse::Ok().json(balance))
}

#[utoipa::path(
    get,
    path = "/api/leaves/latestActive/{employeeId}",
    params(("employeeId" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Most recent non-cancelled request; null when none exists", body = LeaveRequest),
        (status = 403, description = "Employees may only query their own status")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn latest_active(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    if !auth.role.can_approve() && auth.employee_id != Some(employee_id) {
        return Err(LeaveError::Unauthorized.into());
    }

    let latest = manager.latest_active(employee_id).await?;
    Ok(HttpResponse::Ok().json(latest))
}

/* =========================
Address books for the apply form
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/applyingTo",
    responses(
        (status = 200, description = "Approver addresses a request can be applied to", body = [String]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn applying_to_list(
    _auth: AuthUser,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(&config.applying_to_addresses))
}

#[utoipa::path(
    get,
    path = "/api/leaves/ccToEmployees",
    responses(
        (status = 200, description = "Addresses offered in the CC picker", body = [String]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cc_employee_list(
    _auth: AuthUser,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(&config.cc_address_book))
}

/* =========================
Single record / admin delete
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    params(("id" = u64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let record = manager.get(path.into_inner()).await?;
    require_visibility(&auth, &record)?;

    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    delete,
    path = "/api/leaves/DeleteLeaveById/{id}",
    params(("id" = u64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    manager: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    manager.delete(leave_id, &auth.actor()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Leave #{leave_id} deleted")
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use actix_web::{Responder, body, test::TestRequest};
    use pretty_assertions::assert_eq;

    fn config_with_addresses() -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: "secret".into(),
            server_addr: String::new(),
            access_token_ttl: 900,
            refresh_token_ttl: 604_800,
            rate_login_per_min: 60,
            rate_refresh_per_min: 30,
            rate_protected_per_min: 1000,
            api_prefix: "/api".into(),
            default_cc_recipients: vec!["hr@gmail.com".into(), "manager@gmail.com".into()],
            allow_remarks_on_cancelled: true,
            applying_to_addresses: vec!["manager@gmail.com".into(), "hr@gmail.com".into()],
            cc_address_book: vec!["hr@gmail.com".into(), "manager@gmail.com".into()],
        }
    }

    fn any_user() -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "jdoe".into(),
            role: Role::Employee,
            employee_id: Some(7),
        }
    }

    async fn body_json(responder: impl Responder) -> serde_json::Value {
        let req = TestRequest::default().to_http_request();
        let resp = responder.respond_to(&req);
        let bytes = body::to_bytes(resp.into_body()).await.ok().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn address_books_come_from_configuration() {
        let config = web::Data::new(config_with_addresses());

        let applying_to = applying_to_list(any_user(), config.clone()).await.unwrap();
        assert_eq!(
            body_json(applying_to).await,
            json!(["manager@gmail.com", "hr@gmail.com"])
        );

        let cc = cc_employee_list(any_user(), config).await.unwrap();
        assert_eq!(
            body_json(cc).await,
            json!(["hr@gmail.com", "manager@gmail.com"])
        );
    }
}
