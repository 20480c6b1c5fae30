pub mod assignment;
pub mod grade;
pub mod lesson_plan;
pub mod loaders;
pub mod messaging;
pub mod rewards;
pub mod roster;
pub mod serde_helpers;
pub mod spelling_list;
pub mod student_assignment;
pub mod submission;
pub mod subject;
pub mod user;

pub use assignment::{
    Assignment, CodingExercise, DragDropPuzzle, DragItem, DropZone, LearnToReadContent, Question,
    SpellingExercise, SpellingExerciseType, WordActivity,
};
pub use grade::{display_score, LetterGrade};
pub use lesson_plan::{LessonPlan, LessonPlanRequest};
pub use loaders::{load_answer_sheet, AnswerSheet};
pub use messaging::{Contact, Conversation, Message, NewMessage};
pub use rewards::{
    AdjustmentResult, PointsAdjustment, PointsTransaction, RedemptionResult, Reward, RewardDraft,
    StudentPoints, StudentPointsSummary, TransactionType,
};
pub use roster::{
    AssignRequest, AssignmentRequest, GradebookEntry, GradedAssignment, NewStudent, Student,
};
pub use spelling_list::{SpellingWordList, SpellingWordListDraft, WORDS_PER_LIST};
pub use student_assignment::{StudentAssignment, SubmitResponse};
pub use submission::{Ack, SubmissionPayload};
pub use subject::Subject;
pub use user::{
    AuthResponse, Role, StudentCredentials, TeacherCredentials, TeacherRegistration, UserProfile,
};
