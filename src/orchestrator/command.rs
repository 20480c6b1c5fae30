//! Command line of the `homeschool` binary

use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

use crate::models::{
    AssignmentRequest, LessonPlanRequest, NewStudent, RewardDraft, Role, SpellingWordListDraft,
};

pub const USAGE: &str = "\
Usage: homeschool <command> [args]

Session
  login teacher <email> <password>
  login student <username> <password>
  register <email> <password> <first-name> <last-name>
  logout
  reset                      remove the stored session, even if corrupt
  whoami

Students
  assignments                list your assignments
  show <id>                  show one assignment (or its results)
  submit <id> --answers <file.toml>
  points                     balance and history
  redeem <reward-id>

Teachers
  gradebook
  students
  student-add <first-name> <last-name> <username> <password>
  student-rm <student-id>
  templates                  assignments you have generated
  generate --subject <s> --grade <g> --topic <t> [--level <1-4>] [--youtube <url>]
  assign <assignment-id> <student-id>...
  lesson-plans
  lesson-plan --subject <s> --grade <g> --topic <t>
  reward-add <points> <title> <description>
  reward-rm <reward-id>
  rewards-init               add the default reward catalogue
  adjust <student-id> <points> <description>
  word-lists                 spelling word lists
  word-list-add <student-id> <name> <word>...
  word-list-edit <list-id> <student-id> <name> <word>...
  word-list-rm <list-id>

Everyone
  rewards
  dashboard
  messages [contact-id]      conversations, or one thread
  send <contact-id> <text>
  health                     check the backend
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { role: Role, identity: String, password: String },
    Register { email: String, password: String, first_name: String, last_name: String },
    Logout,
    Reset,
    WhoAmI,
    Assignments,
    Show { id: String },
    Submit { id: String, answers: PathBuf },
    Rewards,
    Points,
    Redeem { reward_id: String },
    Gradebook,
    Students,
    StudentAdd(NewStudent),
    StudentRm { id: String },
    Templates,
    Generate(AssignmentRequest),
    Assign { assignment_id: String, student_ids: Vec<String> },
    LessonPlans,
    LessonPlan(LessonPlanRequest),
    RewardAdd(RewardDraft),
    RewardRm { id: String },
    RewardsInit,
    Adjust { student_id: String, points: i64, description: String },
    WordLists,
    WordListAdd(SpellingWordListDraft),
    WordListEdit { id: String, draft: SpellingWordListDraft },
    WordListRm { id: String },
    Messages { contact_id: Option<String> },
    Send { contact_id: String, text: String },
    Dashboard,
    Health,
    Help,
}

impl Command {
    /// Parses arguments without the program name
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let Some(name) = args.next() else {
            return Ok(Command::Help);
        };
        let mut next = |what: &str| args.next().ok_or_else(|| anyhow!("{} missing {}", name, what));

        let command = match name.as_str() {
            "login" => {
                let role: Role = next("role")?.parse().map_err(|e: String| anyhow!(e))?;
                let identity = next(match role {
                    Role::Teacher => "email",
                    Role::Student => "username",
                })?;
                Command::Login {
                    role,
                    identity,
                    password: next("password")?,
                }
            }
            "register" => Command::Register {
                email: next("email")?,
                password: next("password")?,
                first_name: next("first name")?,
                last_name: next("last name")?,
            },
            "logout" => Command::Logout,
            "reset" => Command::Reset,
            "whoami" => Command::WhoAmI,
            "assignments" => Command::Assignments,
            "show" => Command::Show { id: next("assignment id")? },
            "submit" => {
                let id = next("assignment id")?;
                let mut answers = None;
                while let Ok(flag) = next("flag") {
                    match flag.as_str() {
                        "--answers" | "-a" => {
                            answers = Some(PathBuf::from(next("--answers value")?))
                        }
                        other => bail!("Unknown argument: {}", other),
                    }
                }
                Command::Submit {
                    id,
                    answers: answers.ok_or_else(|| anyhow!("submit needs --answers <file.toml>"))?,
                }
            }
            "rewards" => Command::Rewards,
            "points" => Command::Points,
            "redeem" => Command::Redeem { reward_id: next("reward id")? },
            "gradebook" => Command::Gradebook,
            "students" => Command::Students,
            "student-add" => Command::StudentAdd(NewStudent {
                first_name: next("first name")?,
                last_name: next("last name")?,
                username: next("username")?,
                password: next("password")?,
            }),
            "student-rm" => Command::StudentRm { id: next("student id")? },
            "templates" => Command::Templates,
            "generate" => {
                let flags = AuthoringFlags::collect(&mut next)?;
                Command::Generate(AssignmentRequest {
                    subject: required("--subject", flags.subject)?,
                    grade_level: required("--grade", flags.grade_level)?,
                    topic: required("--topic", flags.topic)?,
                    coding_level: flags.coding_level,
                    youtube_url: flags.youtube_url,
                })
            }
            "lesson-plans" => Command::LessonPlans,
            "lesson-plan" => {
                let flags = AuthoringFlags::collect(&mut next)?;
                if flags.coding_level.is_some() || flags.youtube_url.is_some() {
                    bail!("lesson-plan takes only --subject, --grade and --topic");
                }
                Command::LessonPlan(LessonPlanRequest {
                    subject: required("--subject", flags.subject)?,
                    grade_level: required("--grade", flags.grade_level)?,
                    topic: required("--topic", flags.topic)?,
                })
            }
            "reward-add" => {
                let points_cost = whole_number(&next("points")?)?;
                let title = next("title")?;
                let description = std::iter::from_fn(|| next("description").ok())
                    .collect::<Vec<_>>()
                    .join(" ");
                Command::RewardAdd(RewardDraft {
                    title,
                    description,
                    points_cost,
                })
            }
            "reward-rm" => Command::RewardRm { id: next("reward id")? },
            "rewards-init" => Command::RewardsInit,
            "assign" => {
                let assignment_id = next("assignment id")?;
                let student_ids: Vec<String> =
                    std::iter::from_fn(|| next("student id").ok()).collect();
                Command::Assign {
                    assignment_id,
                    student_ids,
                }
            }
            "adjust" => {
                let student_id = next("student id")?;
                let points = whole_number(&next("points")?)?;
                let description = std::iter::from_fn(|| next("description").ok())
                    .collect::<Vec<_>>()
                    .join(" ");
                Command::Adjust {
                    student_id,
                    points,
                    description,
                }
            }
            "word-lists" => Command::WordLists,
            "word-list-add" => {
                let student_id = next("student id")?;
                let name = next("list name")?;
                let words = std::iter::from_fn(|| next("word").ok()).collect();
                Command::WordListAdd(SpellingWordListDraft::new(student_id, name, words))
            }
            "word-list-edit" => {
                let id = next("list id")?;
                let student_id = next("student id")?;
                let name = next("list name")?;
                let words = std::iter::from_fn(|| next("word").ok()).collect();
                Command::WordListEdit {
                    id,
                    draft: SpellingWordListDraft::new(student_id, name, words),
                }
            }
            "word-list-rm" => Command::WordListRm { id: next("list id")? },
            "messages" => Command::Messages {
                contact_id: next("contact id").ok(),
            },
            "send" => {
                let contact_id = next("contact id")?;
                let text = std::iter::from_fn(|| next("text").ok()).collect::<Vec<_>>().join(" ");
                Command::Send { contact_id, text }
            }
            "dashboard" => Command::Dashboard,
            "health" => Command::Health,
            "help" | "--help" | "-h" => Command::Help,
            other => bail!("Unknown command: {}\n\n{}", other, USAGE),
        };
        Ok(command)
    }
}

fn whole_number(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| anyhow!("points must be a whole number, got '{}'", raw))
}

/// `--subject/--grade/--topic` plus the assignment-only extras
#[derive(Debug, Default)]
struct AuthoringFlags {
    subject: Option<String>,
    grade_level: Option<String>,
    topic: Option<String>,
    coding_level: Option<u8>,
    youtube_url: Option<String>,
}

impl AuthoringFlags {
    fn collect(mut next: impl FnMut(&str) -> Result<String>) -> Result<Self> {
        let mut flags = Self::default();
        while let Ok(flag) = next("flag") {
            match flag.as_str() {
                "--subject" | "-s" => flags.subject = Some(next("--subject value")?),
                "--grade" | "-g" => flags.grade_level = Some(next("--grade value")?),
                "--topic" | "-t" => flags.topic = Some(next("--topic value")?),
                "--level" => {
                    let raw = next("--level value")?;
                    let level = raw
                        .parse()
                        .map_err(|_| anyhow!("--level must be 1 to 4, got '{}'", raw))?;
                    flags.coding_level = Some(level);
                }
                "--youtube" => flags.youtube_url = Some(next("--youtube value")?),
                other => bail!("Unknown argument: {}", other),
            }
        }
        Ok(flags)
    }
}

fn required(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| anyhow!("{} is required", flag))
}
