//! Homeschool Hub REST client
//!
//! Wraps every call the frontend makes against the backend. Each request runs
//! under the configured connect and total timeouts; authenticated calls
//! attach the bearer token from the shared session.

use crate::config::Config;
use crate::error::{AppError, AppResult, AuthError, ConfigError};
use crate::models::{
    Ack, AdjustmentResult, AssignRequest, Assignment, AssignmentRequest, AuthResponse,
    Conversation, GradebookEntry, LessonPlan, LessonPlanRequest, Message, NewMessage, NewStudent,
    PointsAdjustment, RedemptionResult, Reward, RewardDraft, SpellingWordList,
    SpellingWordListDraft, Student, StudentAssignment, StudentCredentials, StudentPoints,
    StudentPointsSummary, SubmissionPayload, SubmitResponse, TeacherCredentials,
    TeacherRegistration,
};
use crate::session::SessionContext;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Header carrying the client-generated submit key
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: SessionContext,
}

impl ApiClient {
    /// Builds the shared HTTP client
    ///
    /// # Arguments
    /// - `config`: backend URL and timeouts
    /// - `session`: read for the bearer token on every authenticated call
    pub fn new(config: &Config, session: SessionContext) -> AppResult<Self> {
        let base_url =
            Url::parse(&format!("{}/", config.api_base())).map_err(|e| ConfigError::InvalidValue {
                key: "backend_url".to_string(),
                value: config.backend_url.clone(),
                expected: format!("a valid URL ({})", e),
            })?;

        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    // ========== Student assignments ==========

    pub async fn list_student_assignments(&self) -> AppResult<Vec<StudentAssignment>> {
        self.get(&["student", "assignments"]).await
    }

    /// A 404 surfaces as `ApiError::NotFound`
    pub async fn get_student_assignment(&self, id: &str) -> AppResult<StudentAssignment> {
        self.get(&["student", "assignments", id]).await
    }

    /// Posts the answers
    ///
    /// # Arguments
    /// - `payload`: serialized answers
    /// - `idempotency_key`: identical across retries of the same submission
    ///
    /// # Returns
    /// The score computed by the backend
    pub async fn submit_assignment(
        &self,
        payload: &SubmissionPayload,
        idempotency_key: &str,
    ) -> AppResult<SubmitResponse> {
        let segments = ["student", "assignments", "submit"];
        let request = self
            .request(Method::POST, &segments, true)?
            .header(IDEMPOTENCY_HEADER, idempotency_key)
            .json(payload);
        self.execute(&endpoint(&segments), request).await
    }

    // ========== Auth ==========

    pub async fn login_teacher(&self, credentials: &TeacherCredentials) -> AppResult<AuthResponse> {
        self.post_public(&["auth", "teacher", "login"], credentials).await
    }

    pub async fn login_student(&self, credentials: &StudentCredentials) -> AppResult<AuthResponse> {
        self.post_public(&["auth", "student", "login"], credentials).await
    }

    pub async fn register_teacher(
        &self,
        registration: &TeacherRegistration,
    ) -> AppResult<AuthResponse> {
        self.post_public(&["auth", "teacher", "register"], registration).await
    }

    // ========== Rewards ==========

    pub async fn list_rewards(&self) -> AppResult<Vec<Reward>> {
        self.get(&["rewards"]).await
    }

    pub async fn create_reward(&self, draft: &RewardDraft) -> AppResult<Reward> {
        self.post(&["rewards"], draft).await
    }

    pub async fn update_reward(&self, id: &str, draft: &RewardDraft) -> AppResult<Reward> {
        self.put(&["rewards", id], draft).await
    }

    pub async fn delete_reward(&self, id: &str) -> AppResult<Ack> {
        self.delete(&["rewards", id]).await
    }

    pub async fn initialize_rewards(&self) -> AppResult<Ack> {
        let segments = ["teacher", "initialize-rewards"];
        let request = self.request(Method::POST, &segments, true)?;
        self.execute(&endpoint(&segments), request).await
    }

    pub async fn student_points(&self) -> AppResult<StudentPoints> {
        self.get(&["student", "points"]).await
    }

    pub async fn redeem_reward(&self, reward_id: &str) -> AppResult<RedemptionResult> {
        let segments = ["student", "redeem"];
        let request = self
            .request(Method::POST, &segments, true)?
            .query(&[("reward_id", reward_id)]);
        self.execute(&endpoint(&segments), request).await
    }

    pub async fn teacher_student_points(&self) -> AppResult<Vec<StudentPointsSummary>> {
        self.get(&["teacher", "student-points"]).await
    }

    pub async fn adjust_points(
        &self,
        adjustment: &PointsAdjustment,
    ) -> AppResult<AdjustmentResult> {
        self.post(&["teacher", "points"], adjustment).await
    }

    // ========== Teacher workflow ==========

    pub async fn list_students(&self) -> AppResult<Vec<Student>> {
        self.get(&["students"]).await
    }

    pub async fn create_student(&self, student: &NewStudent) -> AppResult<Student> {
        self.post(&["students"], student).await
    }

    pub async fn delete_student(&self, id: &str) -> AppResult<Ack> {
        self.delete(&["students", id]).await
    }

    pub async fn generate_assignment(&self, request: &AssignmentRequest) -> AppResult<Assignment> {
        self.post(&["assignments", "generate"], request).await
    }

    pub async fn list_assignments(&self) -> AppResult<Vec<Assignment>> {
        self.get(&["assignments"]).await
    }

    pub async fn assign_assignment(&self, request: &AssignRequest) -> AppResult<Ack> {
        self.post(&["assignments", "assign"], request).await
    }

    pub async fn gradebook(&self) -> AppResult<Vec<GradebookEntry>> {
        self.get(&["gradebook"]).await
    }

    pub async fn generate_lesson_plan(&self, request: &LessonPlanRequest) -> AppResult<LessonPlan> {
        self.post(&["lesson-plans", "generate"], request).await
    }

    pub async fn list_lesson_plans(&self) -> AppResult<Vec<LessonPlan>> {
        self.get(&["lesson-plans"]).await
    }

    // ========== Messaging ==========

    pub async fn conversations(&self) -> AppResult<Vec<Conversation>> {
        self.get(&["messages"]).await
    }

    pub async fn thread(&self, contact_id: &str) -> AppResult<Vec<Message>> {
        self.get(&["messages", contact_id]).await
    }

    pub async fn send_message(&self, message: &NewMessage) -> AppResult<Message> {
        self.post(&["messages"], message).await
    }

    // ========== Spelling word lists ==========

    pub async fn list_spelling_lists(&self) -> AppResult<Vec<SpellingWordList>> {
        self.get(&["spelling-word-lists"]).await
    }

    pub async fn create_spelling_list(
        &self,
        draft: &SpellingWordListDraft,
    ) -> AppResult<SpellingWordList> {
        self.post(&["spelling-word-lists"], draft).await
    }

    pub async fn update_spelling_list(
        &self,
        id: &str,
        draft: &SpellingWordListDraft,
    ) -> AppResult<SpellingWordList> {
        self.put(&["spelling-word-lists", id], draft).await
    }

    pub async fn delete_spelling_list(&self, id: &str) -> AppResult<Ack> {
        self.delete(&["spelling-word-lists", id]).await
    }

    // ========== Misc ==========

    pub async fn health(&self) -> AppResult<Value> {
        let segments = ["health"];
        let request = self.request(Method::GET, &segments, false)?;
        self.execute(&endpoint(&segments), request).await
    }

    // ========== Plumbing ==========

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> AppResult<T> {
        let request = self.request(Method::GET, segments, true)?;
        self.execute(&endpoint(segments), request).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> AppResult<T> {
        let request = self.request(Method::POST, segments, true)?.json(body);
        self.execute(&endpoint(segments), request).await
    }

    async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> AppResult<T> {
        let request = self.request(Method::POST, segments, false)?.json(body);
        self.execute(&endpoint(segments), request).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> AppResult<T> {
        let request = self.request(Method::PUT, segments, true)?.json(body);
        self.execute(&endpoint(segments), request).await
    }

    async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> AppResult<T> {
        let request = self.request(Method::DELETE, segments, true)?;
        self.execute(&endpoint(segments), request).await
    }

    /// Builds a request; authenticated calls fail fast without a session
    fn request(
        &self,
        method: Method,
        segments: &[&str],
        authenticated: bool,
    ) -> AppResult<RequestBuilder> {
        let url = self.url(segments)?;
        let mut builder = self.http.request(method, url);
        if authenticated {
            let token = self.session.token().ok_or(AuthError::NotLoggedIn)?;
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Path segments are percent-encoded individually
    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Other(format!("backend URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends and decodes; non-2xx bodies are classified by status and `detail`
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        debug!("➡️ {}", endpoint);
        let response = request
            .send()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;
        debug!("⬅️ {} {} ({} bytes)", status.as_u16(), endpoint, body.len());

        if !status.is_success() {
            return Err(AppError::from_status(endpoint, status.as_u16(), error_detail(&body)));
        }

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| AppError::json_parse_failed(endpoint, e))
    }
}

fn endpoint(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

/// Extracts `detail` from an error body, falling back to the raw text
fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        },
        _ => Some(crate::utils::logging::truncate_text(trimmed, 200)),
    }
}
