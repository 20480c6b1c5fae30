//! Lesson plans - business capability layer

use tracing::info;

use crate::clients::ApiClient;
use crate::error::AppResult;
use crate::models::{LessonPlan, LessonPlanRequest, Role};

#[derive(Debug, Clone)]
pub struct LessonPlanService {
    client: ApiClient,
}

impl LessonPlanService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Plans of the logged-in teacher
    pub async fn list(&self) -> AppResult<Vec<LessonPlan>> {
        self.client.session().require(Role::Teacher)?;
        self.client.list_lesson_plans().await
    }

    /// Generation can take a while; it runs under the normal request timeout
    pub async fn generate(&self, request: &LessonPlanRequest) -> AppResult<LessonPlan> {
        self.client.session().require(Role::Teacher)?;
        request.validate()?;
        let plan = self.client.generate_lesson_plan(request).await?;
        info!("📚 Generated lesson plan \"{}\"", plan.title);
        Ok(plan)
    }
}
