#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Approver = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Approver),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Admins double as approvers for leave decisions.
    pub fn can_approve(self) -> bool {
        matches!(self, Role::Admin | Role::Approver)
    }
}
