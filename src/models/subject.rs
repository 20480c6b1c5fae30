/// Subjects offered by the assignment generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    Math,
    Reading,
    /// Coding track, requires a coding level
    LearnToCode,
    /// Early reading with word activities
    LearningToRead,
    CriticalThinking,
    Science,
    History,
    English,
    Spelling,
}

static SUBJECTS: phf::Map<&'static str, Subject> = phf::phf_map! {
    "math" => Subject::Math,
    "reading" => Subject::Reading,
    "learn to code" => Subject::LearnToCode,
    "learning to read" => Subject::LearningToRead,
    "critical thinking skills" => Subject::CriticalThinking,
    "critical thinking" => Subject::CriticalThinking,
    "science" => Subject::Science,
    "history" => Subject::History,
    "english" => Subject::English,
    "spelling" => Subject::Spelling,
};

impl Subject {
    /// Label used by the backend
    pub fn name(self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Reading => "Reading",
            Subject::LearnToCode => "Learn to Code",
            Subject::LearningToRead => "Learning to Read",
            Subject::CriticalThinking => "Critical Thinking Skills",
            Subject::Science => "Science",
            Subject::History => "History",
            Subject::English => "English",
            Subject::Spelling => "Spelling",
        }
    }

    /// Case-insensitive lookup of a backend label
    pub fn find(label: &str) -> Option<Self> {
        SUBJECTS.get(label.trim().to_lowercase().as_str()).copied()
    }

    pub fn requires_coding_level(self) -> bool {
        self == Subject::LearnToCode
    }

    /// Heading shown above the assignment's passage
    pub fn passage_heading(self) -> &'static str {
        match self {
            Subject::LearnToCode => "Study Material",
            _ => "Reading Passage",
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
