//! Business capability layer
//!
//! Each service wraps one area of the backend, checks role and input before
//! calling out, and logs what it changed. Services never hold answers or
//! flow state; that belongs to `workflow`.

pub mod assignment_service;
pub mod auth_service;
pub mod dashboard;
pub mod lesson_plan_service;
pub mod message_service;
pub mod rewards_service;
pub mod roster_service;
pub mod spelling_service;

pub use assignment_service::AssignmentService;
pub use auth_service::AuthService;
pub use dashboard::{Dashboard, DashboardExtras, DashboardSummary, Scored};
pub use lesson_plan_service::LessonPlanService;
pub use message_service::MessageService;
pub use rewards_service::RewardsService;
pub use roster_service::RosterService;
pub use spelling_service::SpellingService;
