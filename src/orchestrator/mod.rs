//! Orchestration layer
//!
//! ```text
//! App (config, session, ApiClient, SubmitGate)
//!     ↓
//! workflow::SubmissionFlow (one assignment)
//!     ↓
//! services (auth / assignments / rewards / roster / messages / spelling)
//!     ↓
//! clients::ApiClient (HTTP)
//! ```

pub mod app;
pub mod command;

pub use app::App;
pub use command::{Command, USAGE};
