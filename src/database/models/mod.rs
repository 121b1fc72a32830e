pub mod briefing;
pub mod briefing_template;
pub mod collaboration;
pub mod company;
pub mod contact;
pub mod organization;
pub mod user_profile;

pub use briefing::Briefing;
pub use briefing_template::{BriefingTemplate, BriefingTemplateData};
pub use collaboration::{CollaborationDetailsRow, CollaborationStatus, CollaborationWithRelations};
pub use company::{Company, CompanyOverview, CompanyRef, CompanyWithContacts};
pub use contact::Contact;
pub use organization::Organization;
pub use user_profile::{InfluencerRef, UserProfile, UserRole};

/// Unknown enum text coming back from the database
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
