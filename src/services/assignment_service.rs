//! Assignment service - business capability layer

use tracing::{debug, info};

use crate::clients::ApiClient;
use crate::error::{AppError, AppResult};
use crate::models::{Assignment, AssignRequest, AssignmentRequest, Role, StudentAssignment, Subject};

/// Assignment lookups for students, generation and assignment for teachers
#[derive(Debug, Clone)]
pub struct AssignmentService {
    client: ApiClient,
}

impl AssignmentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> AppResult<Vec<StudentAssignment>> {
        self.client.session().require(Role::Student)?;
        let assignments = self.client.list_student_assignments().await?;
        debug!("Fetched {} assignments", assignments.len());
        Ok(assignments)
    }

    pub async fn get(&self, id: &str) -> AppResult<StudentAssignment> {
        self.client.session().require(Role::Student)?;
        self.client.get_student_assignment(id).await
    }

    /// Lookup through the full list; a miss is `NotFound`
    pub async fn find_in_list(&self, id: &str) -> AppResult<StudentAssignment> {
        self.list().await?.into_iter().find(|sa| sa.id() == id).ok_or_else(|| {
            AppError::from_status(
                format!("/student/assignments/{}", id),
                404,
                Some("Assignment not found".to_string()),
            )
        })
    }

    /// Generates an assignment from subject, grade and topic
    ///
    /// # Arguments
    /// - `request`: `coding_level` is mandatory for Learn to Code
    pub async fn generate(&self, request: &AssignmentRequest) -> AppResult<Assignment> {
        self.client.session().require(Role::Teacher)?;
        request.validate()?;
        if Subject::find(&request.subject).is_none() {
            debug!("Generating for unlisted subject '{}'", request.subject);
        }
        let assignment = self.client.generate_assignment(request).await?;
        info!("✨ Generated \"{}\"", assignment.title);
        Ok(assignment)
    }

    pub async fn list_templates(&self) -> AppResult<Vec<Assignment>> {
        self.client.session().require(Role::Teacher)?;
        self.client.list_assignments().await
    }

    pub async fn assign(&self, request: &AssignRequest) -> AppResult<()> {
        self.client.session().require(Role::Teacher)?;
        request.validate()?;
        self.client.assign_assignment(request).await?;
        info!(
            "📬 Assigned {} to {} student(s)",
            request.assignment_id,
            request.student_ids.len()
        );
        Ok(())
    }
}
