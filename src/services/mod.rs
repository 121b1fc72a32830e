pub mod briefing_service;
pub mod collaboration_service;
pub mod company_service;
pub mod contact_service;
pub mod dashboard_service;
pub mod template_service;
pub mod user_service;

pub use briefing_service::BriefingService;
pub use collaboration_service::{CollaborationListParams, CollaborationService};
pub use company_service::{CompanyListParams, CompanyService};
pub use contact_service::ContactService;
pub use dashboard_service::{DashboardParams, DashboardService};
pub use template_service::TemplateService;
pub use user_service::{UserListParams, UserService};
