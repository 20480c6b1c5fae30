//! Workflow layer
//!
//! Everything between "the student opened an assignment" and "the scored
//! result is on screen":
//!
//! ```text
//! collector → validator → serializer → submission_flow (ApiClient) → render
//! ```
//!
//! Only `submission_flow` talks to the network; the other modules are pure.

pub mod cancel;
pub mod collector;
pub mod render;
pub mod serializer;
pub mod submission_flow;
pub mod validator;

pub use cancel::{cancel_pair, run_cancellable, CancelHandle, CancelToken};
pub use collector::{AnswerCollector, AnswerSet};
pub use render::{AssignmentView, CompletedReport, InProgressView, OptionMark};
pub use serializer::serialize;
pub use submission_flow::{open_or_not_found, SubmissionFlow, SubmissionOutcome, SubmitGate};
pub use validator::{validate, Progress, Readiness};
