//! End-to-end tests against an in-process stub of the backend

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use homeschool_hub_client::error::{ApiError, AppError, AuthError, BusinessError, ValidationError};
use homeschool_hub_client::models::{
    AssignmentRequest, LessonPlanRequest, NewStudent, RewardDraft, Role, SpellingWordListDraft,
};
use homeschool_hub_client::services::{
    dashboard, AuthService, DashboardExtras, LessonPlanService, RewardsService, RosterService,
    SpellingService,
};
use homeschool_hub_client::workflow::{cancel_pair, open_or_not_found, CancelToken, OptionMark};
use homeschool_hub_client::{
    ApiClient, App, AssignmentView, Command, Config, SessionContext, SessionStore, SubmissionFlow,
    SubmitGate,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const STUDENT_TOKEN: &str = "tok-student";
const TEACHER_TOKEN: &str = "tok-teacher";

/// Mutable backend state, inspected by the tests afterwards
#[derive(Default)]
struct Backend {
    assignment: Value,
    completed: bool,
    score: Option<f64>,
    stored: Option<Value>,
    submit_failures: usize,
    submit_delay: Option<Duration>,
    fail_fetch_when_completed: bool,
    revoked: bool,
    submits: Vec<Value>,
    idempotency_keys: Vec<String>,
    points: i64,
    redeems: usize,
    /// Teacher-side calls as "METHOD /path"
    teacher_calls: Vec<String>,
}

type Shared = Arc<Mutex<Backend>>;

fn error(status: StatusCode, detail: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": detail })))
}

fn authorized(backend: &Backend, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", STUDENT_TOKEN);
    let presented = headers.get("authorization").and_then(|v| v.to_str().ok());
    !backend.revoked && presented == Some(expected.as_str())
}

fn student_assignment(backend: &Backend) -> Value {
    let stored = backend.stored.clone().unwrap_or(Value::Null);
    json!({
        "student_assignment_id": "sa-1",
        "assignment": backend.assignment,
        "completed": backend.completed,
        "score": backend.score,
        "submitted_at": if backend.completed { json!("2026-01-05T10:00:00Z") } else { Value::Null },
        "assigned_at": "2026-01-04T08:00:00",
        "answers": stored.get("answers").cloned().unwrap_or(Value::Null),
        "coding_answers": stored.get("coding_answers").cloned().unwrap_or(Value::Null),
    })
}

async fn student_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] != "pw" {
        return error(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": STUDENT_TOKEN,
            "token_type": "bearer",
            "user": {"id": "s-1", "first_name": "Ada", "last_name": "Lovelace", "username": body["username"], "teacher_id": "t-1"}
        })),
    )
}

async fn teacher_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] != "pw" {
        return error(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": TEACHER_TOKEN,
            "user": {"id": "t-1", "first_name": "Grace", "last_name": "Hopper", "email": body["email"]}
        })),
    )
}

fn record(state: &Shared, call: &str) {
    state.lock().unwrap().teacher_calls.push(call.to_string());
}

async fn students() -> Json<Value> {
    Json(json!([{"id": "s-1", "first_name": "Ada", "last_name": "Lovelace", "username": "ada", "teacher_id": "t-1"}]))
}

async fn create_student(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "POST /students");
    Json(json!({
        "id": "s-2", "first_name": body["first_name"], "last_name": body["last_name"],
        "username": body["username"], "teacher_id": "t-1"
    }))
}

async fn delete_student(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    record(&state, &format!("DELETE /students/{}", id));
    Json(json!({ "message": "Student deleted successfully" }))
}

async fn create_word_list(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "POST /spelling-word-lists");
    Json(json!({ "id": "wl-1", "student_id": body["student_id"], "name": body["name"], "words": body["words"] }))
}

async fn create_reward(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "POST /rewards");
    Json(json!({
        "id": "r-2", "title": body["title"], "description": body["description"],
        "points_cost": body["points_cost"], "teacher_id": "t-1"
    }))
}

async fn initialize_rewards(State(state): State<Shared>) -> Json<Value> {
    record(&state, "POST /teacher/initialize-rewards");
    Json(json!({ "message": "Default rewards initialized" }))
}

async fn delete_reward(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    record(&state, &format!("DELETE /rewards/{}", id));
    Json(json!({ "message": "Reward deleted successfully" }))
}

fn generated(body: &Value, id: &str) -> Value {
    json!({
        "id": id,
        "title": format!(
            "{} - {}",
            body["subject"].as_str().unwrap_or(""),
            body["topic"].as_str().unwrap_or("")
        ),
        "subject": body["subject"], "grade_level": body["grade_level"], "topic": body["topic"],
        "teacher_id": "t-1", "created_at": "2026-01-04T08:00:00"
    })
}

async fn generate_assignment(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "POST /assignments/generate");
    let mut assignment = generated(&body, "a-9");
    assignment["questions"] =
        json!([{"question": "2 + 3?", "options": ["4", "5"], "correct_answer": 1}]);
    Json(assignment)
}

async fn assignment_templates(State(state): State<Shared>) -> Json<Value> {
    record(&state, "GET /assignments");
    let request = json!({"subject": "Math", "grade_level": "1st Grade", "topic": "Adding"});
    Json(json!([generated(&request, "a-9")]))
}

async fn assign(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let students = body["student_ids"].as_array().map_or(0, Vec::len);
    let assignment_id = body["assignment_id"].as_str().unwrap_or("");
    record(&state, &format!("POST /assignments/assign {} x{}", assignment_id, students));
    Json(json!({ "message": format!("Assignment assigned to {} students", students) }))
}

async fn generate_lesson_plan(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "POST /lesson-plans/generate");
    let mut plan = generated(&body, "lp-1");
    plan["content"] = json!("1. Learning objectives\n2. Materials needed");
    Json(plan)
}

async fn lesson_plans(State(state): State<Shared>) -> Json<Value> {
    record(&state, "GET /lesson-plans");
    let request = json!({"subject": "Science", "grade_level": "2nd Grade", "topic": "Plants"});
    let mut plan = generated(&request, "lp-1");
    plan["content"] = json!("1. Learning objectives");
    Json(json!([plan]))
}

async fn gradebook() -> Json<Value> {
    Json(json!([{
        "student": {"id": "s-1", "first_name": "Ada", "last_name": "Lovelace", "username": "ada"},
        "assignments": [
            {"assignment_title": "Counting", "subject": "Math", "score": 90.0, "submitted_at": "2026-01-05T10:00:00Z"},
            {"assignment_title": "Plants", "subject": "Science", "score": null, "submitted_at": null}
        ]
    }]))
}

async fn class_points() -> Json<Value> {
    Json(json!([
        {"student_id": "s-1", "student_name": "Ada Lovelace", "total_points": 40, "transactions": []},
        {"student_id": "s-2", "total_points": 15}
    ]))
}

async fn list_assignments(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let backend = state.lock().unwrap();
    if !authorized(&backend, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    (StatusCode::OK, Json(json!([student_assignment(&backend)])))
}

async fn get_assignment(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let backend = state.lock().unwrap();
    if !authorized(&backend, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    if id != "sa-1" {
        return error(StatusCode::NOT_FOUND, "Assignment not found");
    }
    if backend.completed && backend.fail_fetch_when_completed {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    (StatusCode::OK, Json(student_assignment(&backend)))
}

async fn submit(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let delay = {
        let mut backend = state.lock().unwrap();
        if !authorized(&backend, &headers) {
            return error(StatusCode::UNAUTHORIZED, "Could not validate credentials");
        }
        let key = headers
            .get("idempotency-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        backend.idempotency_keys.push(key);
        backend.submits.push(body.clone());
        if backend.submit_failures > 0 {
            backend.submit_failures -= 1;
            return error(StatusCode::INTERNAL_SERVER_ERROR, "temporary failure");
        }
        backend.submit_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut backend = state.lock().unwrap();
    if backend.completed {
        return error(StatusCode::BAD_REQUEST, "Assignment already submitted");
    }
    let questions = backend.assignment["questions"].as_array().cloned().unwrap_or_default();
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| body["answers"].get(*i) == Some(&q["correct_answer"]))
        .count();
    let score = if questions.is_empty() {
        100.0
    } else {
        correct as f64 * 100.0 / questions.len() as f64
    };
    backend.completed = true;
    backend.score = Some(score);
    backend.stored = Some(body);
    (
        StatusCode::OK,
        Json(json!({
            "message": "Assignment submitted successfully",
            "score": score,
            "correct_answers": correct,
            "total_questions": questions.len()
        })),
    )
}

async fn points(State(state): State<Shared>) -> Json<Value> {
    let backend = state.lock().unwrap();
    Json(json!({ "total_points": backend.points, "transactions": [] }))
}

async fn rewards() -> Json<Value> {
    Json(json!([
        {"id": "r-1", "title": "Game time", "description": "30 minutes", "points_cost": 50, "active": true}
    ]))
}

async fn redeem(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut backend = state.lock().unwrap();
    backend.redeems += 1;
    let reward_id = query.get("reward_id").cloned().unwrap_or_default();
    Json(json!({ "message": format!("Redeemed {}", reward_id), "remaining_points": 0 }))
}

/// Starts the stub on a random port and returns its address
async fn spawn_backend(backend: Backend) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/api/auth/student/login", post(student_login))
        .route("/api/student/assignments", get(list_assignments))
        .route("/api/student/assignments/submit", post(submit))
        .route("/api/student/assignments/:id", get(get_assignment))
        .route("/api/student/points", get(points))
        .route("/api/student/redeem", post(redeem))
        .route("/api/rewards", get(rewards).post(create_reward))
        .route("/api/rewards/:id", delete(delete_reward))
        .route("/api/assignments", get(assignment_templates))
        .route("/api/assignments/generate", post(generate_assignment))
        .route("/api/assignments/assign", post(assign))
        .route("/api/lesson-plans", get(lesson_plans))
        .route("/api/lesson-plans/generate", post(generate_lesson_plan))
        .route("/api/auth/teacher/login", post(teacher_login))
        .route("/api/students", get(students).post(create_student))
        .route("/api/students/:id", delete(delete_student))
        .route("/api/spelling-word-lists", post(create_word_list))
        .route("/api/teacher/initialize-rewards", post(initialize_rewards))
        .route("/api/gradebook", get(gradebook))
        .route("/api/teacher/student-points", get(class_points))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, state)
}

fn config_for(address: &str, request_timeout_secs: u64) -> Config {
    let session_file: PathBuf =
        std::env::temp_dir().join(format!("homeschool-test-{}.json", uuid::Uuid::new_v4()));
    Config {
        backend_url: address.to_string(),
        session_file: session_file.display().to_string(),
        request_timeout_secs,
        connect_timeout_secs: 1,
        ..Config::default()
    }
}

/// Client with a student logged in against the stub
async fn logged_in_client(address: &str, request_timeout_secs: u64) -> ApiClient {
    let config = config_for(address, request_timeout_secs);
    let session = SessionContext::restore(SessionStore::new(&config.session_file)).await;
    let client = ApiClient::new(&config, session).unwrap();
    AuthService::new(client.clone()).login_student("ada", "pw").await.unwrap();
    client
}

fn one_question() -> Value {
    json!({
        "id": "a-1", "title": "Counting", "subject": "Math", "grade_level": "1st Grade", "topic": "Counting",
        "questions": [{"question": "2 + 2?", "options": ["3", "4", "5"], "correct_answer": 1}]
    })
}

fn backend_with(assignment: Value) -> Backend {
    Backend {
        assignment,
        ..Backend::default()
    }
}

async fn open_flow(client: &ApiClient, gate: &SubmitGate) -> SubmissionFlow {
    SubmissionFlow::open(client.clone(), gate.clone(), "sa-1", &CancelToken::never())
        .await
        .unwrap()
}

#[tokio::test]
async fn submit_scores_locks_and_shows_results() {
    let (address, state) = spawn_backend(backend_with(one_question())).await;
    let client = logged_in_client(&address, 5).await;
    let mut flow = open_flow(&client, &SubmitGate::new()).await;

    assert!(matches!(flow.render(), AssignmentView::InProgress(_)));
    assert!(flow.collector_mut().select_option(0, 1));

    let outcome = flow.submit(&CancelToken::never()).await.unwrap();
    assert_eq!(outcome.response.score, 100.0);
    assert!(outcome.refreshed);
    assert!(flow.assignment().completed);
    assert!(flow.collector().is_locked());
    assert!(!flow.collector_mut().select_option(0, 2));

    match flow.render() {
        AssignmentView::Completed(report) => {
            assert_eq!(report.score, Some(100.0));
            assert!(report.questions[0].is_correct);
            assert_eq!(report.questions[0].options[1].1, OptionMark::Correct);
            assert_eq!(report.questions[0].options[0].1, OptionMark::Neutral);
        }
        other => panic!("expected completed view, got {:?}", other),
    }

    let backend = state.lock().unwrap();
    assert_eq!(backend.submits.len(), 1);
    let payload = &backend.submits[0];
    assert_eq!(payload["student_assignment_id"], "sa-1");
    assert_eq!(payload["answers"], json!([1]));
    assert!(payload["coding_answers"].is_null());
}

#[tokio::test]
async fn wrong_answer_is_marked_incorrect() {
    let (address, _state) = spawn_backend(backend_with(one_question())).await;
    let client = logged_in_client(&address, 5).await;
    let mut flow = open_flow(&client, &SubmitGate::new()).await;

    flow.collector_mut().select_option(0, 2);
    let outcome = flow.submit(&CancelToken::never()).await.unwrap();
    assert_eq!(outcome.response.score, 0.0);

    match flow.render() {
        AssignmentView::Completed(report) => {
            assert!(!report.questions[0].is_correct);
            assert_eq!(report.questions[0].options[2].1, OptionMark::SelectedIncorrect);
            assert_eq!(report.questions[0].options[1].1, OptionMark::Correct);
            assert_eq!(report.correct_questions(), 0);
        }
        other => panic!("expected completed view, got {:?}", other),
    }
}

#[tokio::test]
async fn second_submit_is_refused_locally() {
    let (address, state) = spawn_backend(backend_with(one_question())).await;
    let client = logged_in_client(&address, 5).await;
    let mut flow = open_flow(&client, &SubmitGate::new()).await;

    flow.collector_mut().select_option(0, 1);
    flow.submit(&CancelToken::never()).await.unwrap();

    let err = flow.submit(&CancelToken::never()).await.unwrap_err();
    assert!(matches!(err, AppError::Business(BusinessError::AlreadySubmitted { .. })));
    assert_eq!(state.lock().unwrap().submits.len(), 1);
}

#[tokio::test]
async fn missing_assignment_opens_not_found_view() {
    let (address, _state) = spawn_backend(backend_with(one_question())).await;
    let client = logged_in_client(&address, 5).await;

    let opened = open_or_not_found(client, SubmitGate::new(), "nope", &CancelToken::never())
        .await
        .unwrap();
    match opened {
        Err(AssignmentView::NotFound { assignment_id }) => assert_eq!(assignment_id, "nope"),
        other => panic!(
            "expected not-found view, got {:?}",
            other.map(|flow| flow.assignment().id().to_string())
        ),
    }
}

#[tokio::test]
async fn rejected_token_requires_login() {
    let (address, state) = spawn_backend(backend_with(one_question())).await;
    let client = logged_in_client(&address, 5).await;
    state.lock().unwrap().revoked = true;

    let err = SubmissionFlow::open(client, SubmitGate::new(), "sa-1", &CancelToken::never())
        .await
        .unwrap_err();
    assert!(err.requires_login());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn server_error_keeps_answers_and_retry_reuses_key() {
    let mut backend = backend_with(one_question());
    backend.submit_failures = 1;
    let (address, state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 5).await;
    let mut flow = open_flow(&client, &SubmitGate::new()).await;
    flow.collector_mut().select_option(0, 1);

    let err = flow.submit(&CancelToken::never()).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(!flow.assignment().completed);
    assert!(!flow.collector().is_locked());
    assert_eq!(flow.collector().answered_questions(), 1);
    let pending = flow.pending_idempotency_key().map(str::to_string);
    assert!(pending.is_some());

    flow.submit(&CancelToken::never()).await.unwrap();
    assert!(flow.pending_idempotency_key().is_none());

    let backend = state.lock().unwrap();
    assert_eq!(backend.idempotency_keys.len(), 2);
    assert_eq!(backend.idempotency_keys[0], backend.idempotency_keys[1]);
    assert_eq!(Some(&backend.idempotency_keys[0]), pending.as_ref());
}

#[tokio::test]
async fn edited_answers_after_failure_get_a_new_key() {
    let mut backend = backend_with(one_question());
    backend.submit_failures = 1;
    let (address, state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 5).await;
    let mut flow = open_flow(&client, &SubmitGate::new()).await;

    flow.collector_mut().select_option(0, 0);
    assert!(flow.submit(&CancelToken::never()).await.is_err());
    let first = flow.pending_idempotency_key().map(str::to_string);

    flow.collector_mut().select_option(0, 1);
    let outcome = flow.submit(&CancelToken::never()).await.unwrap();
    assert_eq!(outcome.response.score, 100.0);

    let backend = state.lock().unwrap();
    assert_eq!(backend.submits[0]["answers"], json!([0]));
    assert_eq!(backend.submits[1]["answers"], json!([1]));
    assert_eq!(Some(&backend.idempotency_keys[0]), first.as_ref());
    assert_ne!(backend.idempotency_keys[0], backend.idempotency_keys[1]);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let mut backend = backend_with(one_question());
    backend.submit_delay = Some(Duration::from_secs(3));
    let (address, _state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 1).await;
    let mut flow = open_flow(&client, &SubmitGate::new()).await;
    flow.collector_mut().select_option(0, 1);

    let err = flow.submit(&CancelToken::never()).await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Timeout { .. })), "got {:?}", err);
    assert!(err.is_retryable());
    assert!(!flow.assignment().completed);
    assert_eq!(flow.collector().answered_questions(), 1);
}

#[tokio::test]
async fn cancelled_submit_leaves_flow_untouched() {
    let mut backend = backend_with(one_question());
    backend.submit_delay = Some(Duration::from_secs(5));
    let (address, _state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 10).await;
    let gate = SubmitGate::new();
    let mut flow = open_flow(&client, &gate).await;
    flow.collector_mut().select_option(0, 1);

    let (handle, token) = cancel_pair();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
    });

    let err = flow.submit(&token).await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Cancelled { .. })), "got {:?}", err);
    assert!(!flow.assignment().completed);
    assert!(!gate.is_in_flight("sa-1"));
    assert_eq!(flow.collector().answered_questions(), 1);
}

#[tokio::test]
async fn incomplete_coding_blocks_submit_before_network() {
    let assignment = json!({
        "id": "a-2", "title": "Loops", "subject": "Learn to Code", "grade_level": "3rd Grade", "topic": "Loops",
        "coding_exercises": [
            {"prompt": "Print 1 to 3", "language": "python"},
            {"prompt": "Sum a list", "language": "python"}
        ]
    });
    let (address, state) = spawn_backend(backend_with(assignment)).await;
    let client = logged_in_client(&address, 5).await;
    let mut flow = open_flow(&client, &SubmitGate::new()).await;
    assert!(flow.collector_mut().set_code(0, "for i in range(1, 4):\n    print(i)"));

    let err = flow.submit(&CancelToken::never()).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Please complete all 2 coding exercises before submitting."
    );
    assert!(!flow.readiness().is_ready());
    assert!(state.lock().unwrap().submits.is_empty());
}

#[tokio::test]
async fn concurrent_submit_of_same_assignment_is_refused() {
    let mut backend = backend_with(one_question());
    backend.submit_delay = Some(Duration::from_millis(500));
    let (address, state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 5).await;
    let gate = SubmitGate::new();

    let mut first = open_flow(&client, &gate).await;
    let mut second = open_flow(&client, &gate).await;
    first.collector_mut().select_option(0, 1);
    second.collector_mut().select_option(0, 1);

    let running = tokio::spawn(async move {
        first
            .submit(&CancelToken::never())
            .await
            .map(|o| o.response.score)
    });
    for _ in 0..100 {
        if gate.is_in_flight("sa-1") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(gate.is_in_flight("sa-1"));

    let err = second.submit(&CancelToken::never()).await.unwrap_err();
    assert!(matches!(err, AppError::Business(BusinessError::SubmitInFlight { .. })));

    assert_eq!(running.await.unwrap().unwrap(), 100.0);
    assert!(!gate.is_in_flight("sa-1"));
    assert_eq!(state.lock().unwrap().submits.len(), 1);
}

#[tokio::test]
async fn failed_refresh_completes_locally_from_snapshot() {
    let mut backend = backend_with(one_question());
    backend.fail_fetch_when_completed = true;
    let (address, _state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 5).await;
    let mut flow = open_flow(&client, &SubmitGate::new()).await;
    flow.collector_mut().select_option(0, 1);

    let outcome = flow.submit(&CancelToken::never()).await.unwrap();
    assert!(!outcome.refreshed);
    assert!(flow.assignment().completed);
    assert_eq!(flow.assignment().score, Some(100.0));

    match flow.render() {
        AssignmentView::Completed(report) => assert!(report.questions[0].is_correct),
        other => panic!("expected completed view, got {:?}", other),
    }
}

#[tokio::test]
async fn login_persists_session_and_bad_password_does_not() {
    let (address, _state) = spawn_backend(backend_with(one_question())).await;
    let config = config_for(&address, 5);
    let session = SessionContext::restore(SessionStore::new(&config.session_file)).await;
    let client = ApiClient::new(&config, session).unwrap();
    let auth = AuthService::new(client.clone());

    let err = auth.login_student("ada", "nope").await.unwrap_err();
    assert!(err.requires_login());
    assert!(!client.session().is_authenticated());

    let session = auth.login_student("ada", "pw").await.unwrap();
    assert_eq!(session.role, Role::Student);
    assert_eq!(session.user.display_name(), "Ada Lovelace");

    let restored = SessionContext::restore(SessionStore::new(&config.session_file)).await;
    assert_eq!(restored.role(), Some(Role::Student));
    assert_eq!(restored.token().as_deref(), Some(STUDENT_TOKEN));

    auth.logout().await.unwrap();
    assert!(!client.session().is_authenticated());
    let after_logout = SessionContext::restore(SessionStore::new(&config.session_file)).await;
    assert!(!after_logout.is_authenticated());
}

#[tokio::test]
async fn redeem_with_too_few_points_never_reaches_backend() {
    let mut backend = backend_with(one_question());
    backend.points = 20;
    let (address, state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 5).await;

    let err = RewardsService::new(client).redeem("r-1").await.unwrap_err();
    match err {
        AppError::Business(BusinessError::InsufficientPoints { cost, balance }) => {
            assert_eq!(cost, 50);
            assert_eq!(balance, 20);
        }
        other => panic!("expected insufficient points, got {:?}", other),
    }
    assert_eq!(state.lock().unwrap().redeems, 0);
}

#[tokio::test]
async fn redeem_with_enough_points_goes_through() {
    let mut backend = backend_with(one_question());
    backend.points = 60;
    let (address, state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 5).await;

    let result = RewardsService::new(client).redeem("r-1").await.unwrap();
    assert_eq!(result.message.as_deref(), Some("Redeemed r-1"));
    assert_eq!(state.lock().unwrap().redeems, 1);
}

#[tokio::test]
async fn student_dashboard_counts_completed_work() {
    let mut backend = backend_with(one_question());
    backend.points = 35;
    let (address, _state) = spawn_backend(backend).await;
    let client = logged_in_client(&address, 5).await;

    let before = dashboard::load(&client).await.unwrap();
    assert_eq!(before.summary.total, 1);
    assert_eq!(before.summary.pending, 1);
    assert_eq!(before.extras, DashboardExtras::Student { points: 35 });

    let mut flow = open_flow(&client, &SubmitGate::new()).await;
    flow.collector_mut().select_option(0, 1);
    flow.submit(&CancelToken::never()).await.unwrap();

    let after = dashboard::load(&client).await.unwrap();
    assert_eq!(after.summary.completed, 1);
    assert_eq!(after.summary.average_score, Some(100.0));
    assert_eq!(after.summary.recent[0].label, "Counting");
}

/// Client with a teacher logged in against the stub
async fn teacher_client(address: &str) -> ApiClient {
    let config = config_for(address, 5);
    let session = SessionContext::restore(SessionStore::new(&config.session_file)).await;
    let client = ApiClient::new(&config, session).unwrap();
    AuthService::new(client.clone())
        .login_teacher("grace@example.org", "pw")
        .await
        .unwrap();
    client
}

#[tokio::test]
async fn teacher_manages_students_and_word_lists() {
    let (address, state) = spawn_backend(Backend::default()).await;
    let client = teacher_client(&address).await;
    let roster = RosterService::new(client.clone());

    assert_eq!(roster.students().await.unwrap()[0].username, "ada");

    let added = roster
        .add_student(&NewStudent {
            first_name: "Alan".into(),
            last_name: "Turing".into(),
            username: "alan".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(added.full_name(), "Alan Turing");
    roster.remove_student(&added.id).await.unwrap();

    let spelling = SpellingService::new(client.clone());
    let short = SpellingWordListDraft::new("s-1", "Week 1", vec!["cat".to_string(); 9]);
    let err = spelling.create(&short).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::WordListSize { expected: 10 })));

    let words: Vec<String> = (1..=10).map(|i| format!("word{}", i)).collect();
    let list = spelling
        .create(&SpellingWordListDraft::new("s-1", "Week 1", words))
        .await
        .unwrap();
    assert_eq!(list.words.len(), 10);

    assert_eq!(
        state.lock().unwrap().teacher_calls,
        vec!["POST /students", "DELETE /students/s-2", "POST /spelling-word-lists"]
    );
}

#[tokio::test]
async fn teacher_reward_catalogue_is_checked_before_sending() {
    let (address, state) = spawn_backend(Backend::default()).await;
    let client = teacher_client(&address).await;
    let rewards = RewardsService::new(client);

    let free = RewardDraft {
        title: "Ice cream".into(),
        description: "One scoop".into(),
        points_cost: 0,
    };
    let err = rewards.create(&free).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::InvalidPoints { value: 0 })));

    let reward = rewards
        .create(&RewardDraft {
            points_cost: 25,
            ..free
        })
        .await
        .unwrap();
    assert_eq!(reward.points_cost, 25);

    let message = rewards.initialize_defaults().await.unwrap();
    assert_eq!(message.as_deref(), Some("Default rewards initialized"));

    assert_eq!(
        state.lock().unwrap().teacher_calls,
        vec!["POST /rewards", "POST /teacher/initialize-rewards"]
    );
}

#[tokio::test]
async fn teacher_dashboard_summarizes_gradebook() {
    let (address, _state) = spawn_backend(Backend::default()).await;
    let client = teacher_client(&address).await;

    let board = dashboard::load(&client).await.unwrap();
    assert_eq!(board.role, Role::Teacher);
    assert_eq!(board.summary.total, 2);
    assert_eq!(board.summary.completed, 1);
    assert_eq!(board.summary.average_score, Some(90.0));
    assert_eq!(
        board.extras,
        DashboardExtras::Teacher {
            students: 1,
            class_points: 55
        }
    );
    assert!(board.to_string().contains("Students: 1 (class points: 55)"));
}

#[tokio::test]
async fn student_cannot_use_teacher_services() {
    let (address, state) = spawn_backend(Backend::default()).await;
    let client = logged_in_client(&address, 5).await;

    let err = RosterService::new(client).students().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Auth(AuthError::WrongRole {
            required: Role::Teacher,
            actual: Role::Student
        })
    ));
    assert!(state.lock().unwrap().teacher_calls.is_empty());
}

#[tokio::test]
async fn lesson_plans_are_teacher_only_and_checked_before_sending() {
    let (address, state) = spawn_backend(Backend::default()).await;

    let student = logged_in_client(&address, 5).await;
    let err = LessonPlanService::new(student).list().await.unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::WrongRole { .. })));

    let plans = LessonPlanService::new(teacher_client(&address).await);
    let mut request = LessonPlanRequest {
        subject: "Science".into(),
        grade_level: "2nd Grade".into(),
        topic: " ".into(),
    };
    let err = plans.generate(&request).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::MissingFields { form: "lesson plan" })
    ));
    assert!(state.lock().unwrap().teacher_calls.is_empty());

    request.topic = "Plants".into();
    let plan = plans.generate(&request).await.unwrap();
    assert_eq!(plan.title, "Science - Plants");
    assert!(plan.content.starts_with("1. Learning objectives"));
    assert_eq!(plans.list().await.unwrap()[0].id, "lp-1");

    assert_eq!(
        state.lock().unwrap().teacher_calls,
        vec!["POST /lesson-plans/generate", "GET /lesson-plans"]
    );
}

#[tokio::test]
async fn teacher_commands_run_end_to_end() {
    let (address, state) = spawn_backend(Backend::default()).await;
    let mut config = config_for(&address, 5);
    config.output_log_file = std::env::temp_dir()
        .join(format!("homeschool-run-{}.log", uuid::Uuid::new_v4()))
        .display()
        .to_string();
    let app = App::initialize(config.clone()).await.unwrap();

    let commands = [
        Command::Login {
            role: Role::Teacher,
            identity: "grace@example.org".into(),
            password: "pw".into(),
        },
        Command::Generate(AssignmentRequest {
            subject: "Math".into(),
            grade_level: "1st Grade".into(),
            topic: "Adding".into(),
            coding_level: None,
            youtube_url: None,
        }),
        Command::Templates,
        Command::Assign {
            assignment_id: "a-9".into(),
            student_ids: vec!["s-1".into(), "s-2".into()],
        },
        Command::LessonPlan(LessonPlanRequest {
            subject: "Science".into(),
            grade_level: "2nd Grade".into(),
            topic: "Plants".into(),
        }),
        Command::RewardRm { id: "r-1".into() },
        Command::RewardsInit,
    ];
    for command in commands {
        app.run(command).await.unwrap();
    }

    let missing_level = Command::Generate(AssignmentRequest {
        subject: "Learn to Code".into(),
        grade_level: "3rd Grade".into(),
        topic: "Loops".into(),
        coding_level: None,
        youtube_url: None,
    });
    assert!(app.run(missing_level).await.is_err());

    assert_eq!(
        state.lock().unwrap().teacher_calls,
        vec![
            "POST /assignments/generate",
            "GET /assignments",
            "POST /assignments/assign a-9 x2",
            "POST /lesson-plans/generate",
            "DELETE /rewards/r-1",
            "POST /teacher/initialize-rewards",
        ]
    );

    std::fs::remove_file(&config.output_log_file).ok();
    std::fs::remove_file(&config.session_file).ok();
}
