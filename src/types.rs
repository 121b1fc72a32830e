/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Operations a caller can attempt on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Select,
    Create,
    Update,
    Delete,
    UpdateStatus, // Status-only change of a collaboration
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Select => "view",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::UpdateStatus => "change the status of",
        }
    }
}

/// Organization-scoped resources guarded by the role policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Company,
    Contact,
    Collaboration,
    Briefing,
    BriefingTemplate,
    User,
    Dashboard,
    /// Company and influencer pick lists for the collaboration form
    FormOptions,
}

impl Resource {
    pub fn plural(&self) -> &'static str {
        match self {
            Resource::Company => "companies",
            Resource::Contact => "contacts",
            Resource::Collaboration => "collaborations",
            Resource::Briefing => "briefings",
            Resource::BriefingTemplate => "briefing templates",
            Resource::User => "users",
            Resource::Dashboard => "the dashboard",
            Resource::FormOptions => "form options",
        }
    }
}
