//! Role policy. Row scoping to the organization happens in the repositories;
//! this decides what each role may do inside its organization.

use crate::database::models::UserRole;
use crate::types::{Operation, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Every row of the organization
    Granted,
    /// Only collaborations (and their briefings) assigned to the caller
    Assigned,
    Denied,
}

impl Access {
    pub fn is_denied(&self) -> bool {
        matches!(self, Access::Denied)
    }
}

pub fn authorize(role: UserRole, resource: Resource, operation: Operation) -> Access {
    use Operation::*;
    use Resource::*;

    match role {
        UserRole::AgencyAdmin => Access::Granted,
        UserRole::Brand => match (resource, operation) {
            (Company | Contact | Collaboration | Briefing | Dashboard, Select) => Access::Granted,
            _ => Access::Denied,
        },
        UserRole::Influencer => match (resource, operation) {
            (Collaboration | Briefing | Dashboard, Select) => Access::Assigned,
            (Collaboration, UpdateStatus) => Access::Assigned,
            _ => Access::Denied,
        },
    }
}

pub fn denied_message(resource: Resource, operation: Operation) -> String {
    format!("Insufficient permissions to {} {}", operation.verb(), resource.plural())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_do_everything() {
        for resource in [Resource::Company, Resource::BriefingTemplate, Resource::User, Resource::FormOptions] {
            for operation in [Operation::Select, Operation::Create, Operation::Update, Operation::Delete] {
                assert_eq!(authorize(UserRole::AgencyAdmin, resource, operation), Access::Granted);
            }
        }
    }

    #[test]
    fn brand_is_read_only() {
        assert_eq!(authorize(UserRole::Brand, Resource::Company, Operation::Select), Access::Granted);
        assert_eq!(authorize(UserRole::Brand, Resource::Collaboration, Operation::Select), Access::Granted);
        assert!(authorize(UserRole::Brand, Resource::Company, Operation::Create).is_denied());
        assert!(authorize(UserRole::Brand, Resource::Collaboration, Operation::UpdateStatus).is_denied());
        assert!(authorize(UserRole::Brand, Resource::BriefingTemplate, Operation::Select).is_denied());
        assert!(authorize(UserRole::Brand, Resource::User, Operation::Select).is_denied());
    }

    #[test]
    fn influencer_sees_only_assigned_work() {
        assert_eq!(authorize(UserRole::Influencer, Resource::Collaboration, Operation::Select), Access::Assigned);
        assert_eq!(authorize(UserRole::Influencer, Resource::Briefing, Operation::Select), Access::Assigned);
        assert_eq!(
            authorize(UserRole::Influencer, Resource::Collaboration, Operation::UpdateStatus),
            Access::Assigned
        );
        assert!(authorize(UserRole::Influencer, Resource::Collaboration, Operation::Update).is_denied());
        assert!(authorize(UserRole::Influencer, Resource::Company, Operation::Select).is_denied());
        assert!(authorize(UserRole::Influencer, Resource::Briefing, Operation::Create).is_denied());
    }

    #[test]
    fn denied_message_names_operation() {
        assert_eq!(
            denied_message(Resource::Company, Operation::Delete),
            "Insufficient permissions to delete companies"
        );
    }
}
