use crate::api::leave::CreateLeave;
use crate::model::leave::{BalanceSummary, LeaveRequest, LeaveStatus, LeaveType};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Portal API",
        version = "1.0.0",
        description = r#"
## Leave lifecycle service

Backend for the employee leave workflow:

- **Apply**: submit a leave request (goes in as PENDING, CC list padded
  with the configured default recipients up to 2)
- **Decide**: approvers move PENDING requests to APPROVED or REJECTED
- **Withdraw**: the owning employee cancels their own request
- **Remarks**: append-only annotation trail per request
- **Balance**: approved leave days per type, plus a grand total

### Security
All `/api` endpoints require **JWT Bearer authentication**. Roles:
ADMIN, APPROVER, EMPLOYEE.
"#,
    ),
    paths(
        crate::api::leave::create_leave,
        crate::api::leave::all_leaves,
        crate::api::leave::get_leave,
        crate::api::leave::update_status,
        crate::api::leave::cancel_leave,
        crate::api::leave::add_remark,
        crate::api::leave::get_remarks,
        crate::api::leave::leave_balance,
        crate::api::leave::latest_active,
        crate::api::leave::applying_to_list,
        crate::api::leave::cc_employee_list,
        crate::api::leave::delete_leave,
    ),
    components(schemas(
        CreateLeave,
        LeaveRequest,
        LeaveStatus,
        LeaveType,
        BalanceSummary,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave lifecycle APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
