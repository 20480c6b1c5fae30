//! # Homeschool Hub client
//!
//! Command-line client for the Homeschool Hub backend. Students work through
//! and submit assignments; teachers generate assignments and lesson plans and
//! manage students, rewards and word lists.
//!
//! ## Layers
//!
//! ### ① Clients
//! - `clients/` - the only code that speaks HTTP
//! - `ApiClient` - one method per backend endpoint, bearer token from the session
//!
//! ### ② Services
//! - `services/` - one area of the backend each, role and input checks included
//! - `AuthService`, `AssignmentService`, `RewardsService`, `RosterService`,
//!   `MessageService`, `SpellingService`, `LessonPlanService`, `dashboard`
//!
//! ### ③ Workflow
//! - `workflow/` - the life of one assignment on screen
//! - `AnswerCollector` - answers while in progress
//! - `Readiness` / `validate` - whether every section is complete
//! - `serialize` - answers to the submission body
//! - `SubmissionFlow` - open → answer → submit → refresh
//! - `AssignmentView` - in-progress, completed and not-found views
//!
//! ### ④ Orchestration
//! - `orchestrator/app` - owns config, session and the submit gate
//! - `orchestrator/command` - command line parsing
//!
//! ## Module structure

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod session;
pub mod utils;
pub mod workflow;

pub use clients::ApiClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use orchestrator::{App, Command};
pub use session::{Session, SessionContext, SessionStore};
pub use workflow::{AssignmentView, SubmissionFlow, SubmitGate};
