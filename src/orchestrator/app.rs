//! Application - orchestration layer
//!
//! Owns the shared resources (config, session, HTTP client, submit gate),
//! builds services on demand and turns each command into output. No
//! business rules live here.

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use crate::clients::ApiClient;
use crate::config::Config;
use crate::models::{
    display_score, load_answer_sheet, AnswerSheet, AssignRequest, PointsAdjustment, Role,
    TeacherRegistration,
};
use crate::orchestrator::command::{Command, USAGE};
use crate::services::{
    dashboard, AssignmentService, AuthService, LessonPlanService, MessageService, RewardsService,
    RosterService, SpellingService,
};
use crate::session::{SessionContext, SessionStore};
use crate::utils::logging::{append_log_line, init_log_file, log_startup, truncate_text};
use crate::workflow::{cancel_pair, open_or_not_found, CancelHandle, CancelToken, SubmitGate};

/// Application root
pub struct App {
    config: Config,
    client: ApiClient,
    gate: SubmitGate,
}

impl App {
    /// Restores the session and builds the HTTP client
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        let session = SessionContext::restore(SessionStore::new(&config.session_file)).await;
        let client =
            ApiClient::new(&config, session).context("failed to set up the backend client")?;

        Ok(Self {
            config,
            client,
            gate: SubmitGate::new(),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Runs one command
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Help => print!("{}", USAGE),
            Command::Login { role, identity, password } => {
                let auth = AuthService::new(self.client.clone());
                let session = match role {
                    Role::Teacher => auth.login_teacher(&identity, &password).await?,
                    Role::Student => auth.login_student(&identity, &password).await?,
                };
                println!("Welcome, {}!", session.user.display_name());
            }
            Command::Register { email, password, first_name, last_name } => {
                let registration = TeacherRegistration {
                    email,
                    password,
                    first_name,
                    last_name,
                };
                let session = AuthService::new(self.client.clone())
                    .register_teacher(&registration)
                    .await?;
                println!("Account created. Welcome, {}!", session.user.display_name());
            }
            Command::Logout => {
                AuthService::new(self.client.clone()).logout().await?;
                println!("Logged out.");
            }
            Command::Reset => {
                AuthService::new(self.client.clone()).emergency_reset().await?;
                println!("Session cleared.");
            }
            Command::WhoAmI => match AuthService::new(self.client.clone()).whoami() {
                Some(session) => println!("{} ({})", session.user.display_name(), session.role),
                None => println!("Not logged in."),
            },
            Command::Assignments => self.list_assignments().await?,
            Command::Show { id } => self.show(&id).await?,
            Command::Submit { id, answers } => self.submit(&id, &answers).await?,
            Command::Rewards => self.list_rewards().await?,
            Command::Points => {
                let points = RewardsService::new(self.client.clone()).my_points().await?;
                println!("⭐ {} points", points.total_points);
                for tx in &points.transactions {
                    println!("   {:>6}  {}", tx.signed_points(), tx.description);
                }
            }
            Command::Redeem { reward_id } => {
                let result = RewardsService::new(self.client.clone()).redeem(&reward_id).await?;
                if let Some(message) = result.message {
                    println!("{}", message);
                }
                println!("Remaining points: {}", result.remaining_points);
            }
            Command::Gradebook => {
                let gradebook = RosterService::new(self.client.clone()).gradebook().await?;
                for entry in &gradebook {
                    println!("👤 {}", entry.student.full_name());
                    for graded in &entry.assignments {
                        let score = graded
                            .score
                            .map_or("not submitted".to_string(), |s| {
                                format!("{}%", display_score(s))
                            });
                        println!("   {} [{}] {}", graded.assignment_title, graded.subject, score);
                    }
                }
            }
            Command::Students => {
                for student in RosterService::new(self.client.clone()).students().await? {
                    println!("👤 {} (@{}) {}", student.full_name(), student.username, student.id);
                }
            }
            Command::StudentAdd(student) => {
                let created = RosterService::new(self.client.clone()).add_student(&student).await?;
                println!("Added {} (id {}).", created.full_name(), created.id);
            }
            Command::StudentRm { id } => {
                RosterService::new(self.client.clone()).remove_student(&id).await?;
                println!("Student removed.");
            }
            Command::Templates => {
                let templates = AssignmentService::new(self.client.clone()).list_templates().await?;
                for assignment in templates {
                    println!(
                        "📄 {} [{} · {}] {}",
                        assignment.title, assignment.subject, assignment.grade_level, assignment.id
                    );
                }
            }
            Command::Generate(request) => {
                let assignment = AssignmentService::new(self.client.clone())
                    .generate(&request)
                    .await?;
                println!("Generated \"{}\" (id {}).", assignment.title, assignment.id);
            }
            Command::LessonPlans => {
                for plan in LessonPlanService::new(self.client.clone()).list().await? {
                    println!("📚 {} [{}] {}", plan.title, plan.grade_level, plan.id);
                }
            }
            Command::LessonPlan(request) => {
                let plan = LessonPlanService::new(self.client.clone()).generate(&request).await?;
                println!("📚 {}\n\n{}", plan.title, plan.content);
            }
            Command::RewardAdd(draft) => {
                let reward = RewardsService::new(self.client.clone()).create(&draft).await?;
                println!("Created reward \"{}\" (id {}).", reward.title, reward.id);
            }
            Command::RewardRm { id } => {
                RewardsService::new(self.client.clone()).delete(&id).await?;
                println!("Reward removed.");
            }
            Command::RewardsInit => {
                let message = RewardsService::new(self.client.clone()).initialize_defaults().await?;
                println!("{}", message.unwrap_or_else(|| "Default rewards added.".to_string()));
            }
            Command::Assign { assignment_id, student_ids } => {
                let request = AssignRequest {
                    assignment_id,
                    student_ids,
                };
                AssignmentService::new(self.client.clone()).assign(&request).await?;
                println!("Assigned to {} student(s).", request.student_ids.len());
            }
            Command::Adjust { student_id, points, description } => {
                let adjustment = PointsAdjustment {
                    student_id,
                    points,
                    description,
                };
                let result = RewardsService::new(self.client.clone()).adjust(&adjustment).await?;
                println!("New total: {} points", result.new_total);
            }
            Command::WordLists => {
                for list in SpellingService::new(self.client.clone()).lists().await? {
                    let owner = list.student_name.as_deref().unwrap_or(&list.student_id);
                    println!("🔤 {} ({}): {}", list.name, owner, list.words.join(", "));
                }
            }
            Command::WordListAdd(draft) => {
                let list = SpellingService::new(self.client.clone()).create(&draft).await?;
                println!("Saved \"{}\" (id {}).", list.name, list.id);
            }
            Command::WordListEdit { id, draft } => {
                let list = SpellingService::new(self.client.clone()).update(&id, &draft).await?;
                println!("Updated \"{}\".", list.name);
            }
            Command::WordListRm { id } => {
                SpellingService::new(self.client.clone()).delete(&id).await?;
                println!("Word list removed.");
            }
            Command::Messages { contact_id: None } => {
                let conversations = MessageService::new(self.client.clone()).conversations().await?;
                for conversation in conversations {
                    let marker = if conversation.has_unread() { "●" } else { " " };
                    let preview = conversation
                        .last_message
                        .as_ref()
                        .map(|m| truncate_text(&m.content, 50))
                        .unwrap_or_default();
                    println!(
                        "{} {} ({}) {}",
                        marker, conversation.contact.name, conversation.contact.id, preview
                    );
                }
            }
            Command::Messages { contact_id: Some(contact_id) } => {
                let me = self.client.session().current().map(|s| s.user.id);
                for message in MessageService::new(self.client.clone()).thread(&contact_id).await? {
                    let who = if Some(&message.sender_id) == me.as_ref() { "me" } else { "them" };
                    println!("[{}] {}", who, message.content);
                }
            }
            Command::Send { contact_id, text } => {
                MessageService::new(self.client.clone()).send(&contact_id, &text).await?;
                println!("Message sent.");
            }
            Command::Dashboard => print!("{}", dashboard::load(&self.client).await?),
            Command::Health => {
                let status = self.client.health().await?;
                println!("Backend at {} is up: {}", self.config.api_base(), status);
            }
        }
        Ok(())
    }

    async fn list_assignments(&self) -> Result<()> {
        let assignments = AssignmentService::new(self.client.clone()).list().await?;
        if assignments.is_empty() {
            println!("No assignments yet.");
        }
        for sa in &assignments {
            let status = match (sa.completed, sa.score) {
                (true, Some(score)) => format!("✓ {}%", display_score(score)),
                (true, None) => "✓ submitted".to_string(),
                (false, _) => "• to do".to_string(),
            };
            println!("{:<14} {}  [{}] ({})", status, sa.title(), sa.assignment.subject, sa.id());
        }
        Ok(())
    }

    async fn show(&self, id: &str) -> Result<()> {
        self.client.session().require(Role::Student)?;
        let (_handle, token) = cancel_pair();
        match open_or_not_found(self.client.clone(), self.gate.clone(), id, &token).await? {
            Ok(flow) => print!("{}", flow.render()),
            Err(not_found) => print!("{}", not_found),
        }
        Ok(())
    }

    async fn submit(&self, id: &str, answers_path: &std::path::Path) -> Result<()> {
        self.client.session().require(Role::Student)?;
        let sheet = load_answer_sheet(answers_path).await?;

        let (handle, token) = cancel_pair();
        let ctrl_c = spawn_ctrl_c_canceller(handle);

        let result = self.submit_with(id, &sheet, &token).await;
        ctrl_c.abort();
        result
    }

    async fn submit_with(&self, id: &str, sheet: &AnswerSheet, token: &CancelToken) -> Result<()> {
        let opened = open_or_not_found(self.client.clone(), self.gate.clone(), id, token).await?;
        let mut flow = match opened {
            Ok(flow) => flow,
            Err(not_found) => {
                print!("{}", not_found);
                bail!("assignment {} not found", id);
            }
        };

        let applied = flow.apply_sheet(sheet)?;
        info!("📝 Applied {} answers from the answer sheet", applied);

        match flow.submit(token).await {
            Ok(outcome) => {
                println!("Assignment submitted! Score: {}%", display_score(outcome.response.score));
                if !outcome.refreshed {
                    warn!(
                        "⚠️ Showing local results; the backend could not be reached afterwards"
                    );
                }
                if let Err(e) = append_log_line(
                    &self.config.output_log_file,
                    &format!("submitted {} score {}", id, outcome.response.score),
                ) {
                    warn!("⚠️ {}", e);
                }
                print!("{}", flow.render());
                Ok(())
            }
            Err(e) => {
                if e.is_validation() {
                    print!("{}", flow.readiness());
                } else if e.is_retryable() {
                    error!("❌ {} (your answers were not submitted, try again)", e);
                }
                Err(e.into())
            }
        }
    }

    async fn list_rewards(&self) -> Result<()> {
        let service = RewardsService::new(self.client.clone());
        let balance = match self.client.session().role() {
            Some(Role::Student) => Some(service.my_points().await?.total_points),
            _ => None,
        };
        for reward in service.list().await? {
            let affordable = match balance {
                Some(points) if !reward.affordable_with(points) => "  (not enough points)",
                _ => "",
            };
            println!(
                "{} {} - {} pts{}\n     {}",
                reward.icon(),
                reward.title,
                reward.points_cost,
                affordable,
                reward.description
            );
        }
        Ok(())
    }
}

/// Cancels in-flight calls when the user presses Ctrl-C
fn spawn_ctrl_c_canceller(handle: CancelHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⏹ Cancelling...");
            handle.cancel();
        }
    })
}
