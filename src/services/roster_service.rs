//! Roster service - teacher's students and gradebook

use tracing::info;

use crate::clients::ApiClient;
use crate::error::AppResult;
use crate::models::{GradebookEntry, NewStudent, Role, Student};

#[derive(Debug, Clone)]
pub struct RosterService {
    client: ApiClient,
}

impl RosterService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn students(&self) -> AppResult<Vec<Student>> {
        self.client.session().require(Role::Teacher)?;
        self.client.list_students().await
    }

    pub async fn add_student(&self, student: &NewStudent) -> AppResult<Student> {
        self.client.session().require(Role::Teacher)?;
        student.validate()?;
        let created = self.client.create_student(student).await?;
        info!("🧒 Added {} ({})", created.full_name(), created.username);
        Ok(created)
    }

    pub async fn remove_student(&self, id: &str) -> AppResult<()> {
        self.client.session().require(Role::Teacher)?;
        self.client.delete_student(id).await?;
        Ok(())
    }

    pub async fn gradebook(&self) -> AppResult<Vec<GradebookEntry>> {
        self.client.session().require(Role::Teacher)?;
        self.client.gradebook().await
    }
}
