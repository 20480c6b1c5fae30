/// Letter grade derived from a percentage score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// A ≥ 90, B ≥ 80, C ≥ 70, D ≥ 60, otherwise F
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            LetterGrade::A
        } else if score >= 80.0 {
            LetterGrade::B
        } else if score >= 70.0 {
            LetterGrade::C
        } else if score >= 60.0 {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }

    /// Short feedback line for the score card
    pub fn remark(self) -> &'static str {
        match self {
            LetterGrade::A => "Excellent work!",
            LetterGrade::B => "Great job!",
            LetterGrade::C => "Good effort.",
            LetterGrade::D => "Keep practicing.",
            LetterGrade::F => "Let's review this one together.",
        }
    }
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        };
        write!(f, "{}", letter)
    }
}

/// Score rounded the way it is displayed (`87.5` → `88`)
pub fn display_score(score: f64) -> i64 {
    score.round() as i64
}
