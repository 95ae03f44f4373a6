//! Text layout of the two export documents, independent of the PDF backend.

use crate::models::Question;

use super::ExportKind;

/// Words longer than this are broken up.
const LONG_WORD_CHARS: usize = 35;
/// Break interval inside a long word.
const BREAK_EVERY: usize = 15;
/// Invisible break opportunity; the renderer may wrap here.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

const OPTION_LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Letter for the option at `index`, `?` past `Z`.
pub fn option_letter(index: usize) -> char {
    OPTION_LETTERS.get(index).copied().unwrap_or('?')
}

/// One question block of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub heading: String,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

/// Glyph coverage of the font the export is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyphs {
    /// A built-in PDF font: WinAnsi characters only.
    Latin,
    /// An embedded TTF/OTF font.
    Unicode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub title: &'static str,
    pub entries: Vec<ExportEntry>,
}

impl ExportDocument {
    /// Lay out `questions` in their canonical option order. Labels stay
    /// bilingual only when the font can draw them.
    pub fn build(kind: ExportKind, questions: &[Question], glyphs: Glyphs) -> Self {
        let with_answers = kind == ExportKind::Answers;
        let entries = questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let kind_label = match glyphs {
                    Glyphs::Latin => question.kind().display_name(),
                    Glyphs::Unicode => question.kind().native_name(),
                };
                let heading = format!("{}. ({}) {}", i + 1, kind_label, question.text());
                ExportEntry {
                    heading: force_wrap(&heading),
                    options: option_lines(question, glyphs),
                    correct_answer: with_answers.then(|| {
                        force_wrap(&format!(
                            "Correct Answer: {}",
                            correct_answer_text(question, glyphs)
                        ))
                    }),
                    explanation: with_answers
                        .then(|| force_wrap(&format!("Explanation: {}", question.explanation()))),
                }
            })
            .collect();

        Self {
            title: kind.title(),
            entries,
        }
    }

    /// Every line of the document, in print order. Blank strings separate
    /// blocks.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for entry in &self.entries {
            lines.push(entry.heading.clone());
            lines.extend(entry.options.iter().cloned());
            lines.extend(entry.correct_answer.iter().cloned());
            lines.extend(entry.explanation.iter().cloned());
            lines.push(String::new());
        }
        lines
    }
}

fn true_false_lines(glyphs: Glyphs) -> [&'static str; 2] {
    match glyphs {
        Glyphs::Latin => ["(A) True", "(B) False"],
        Glyphs::Unicode => ["(A) 是 (True)", "(B) 非 (False)"],
    }
}

fn option_lines(question: &Question, glyphs: Glyphs) -> Vec<String> {
    match question {
        Question::TrueFalse { .. } => true_false_lines(glyphs)
            .iter()
            .map(|line| line.to_string())
            .collect(),
        Question::SingleChoice { options, .. } | Question::MultiAnswer { options, .. } => options
            .iter()
            .enumerate()
            .map(|(i, option)| force_wrap(&format!("({}) {}", option_letter(i), option)))
            .collect(),
    }
}

/// `(letter) text` of an option, or the bare text if it is not an option.
fn lettered(options: &[String], answer: &str) -> String {
    options
        .iter()
        .position(|option| option == answer)
        .map(|i| format!("({}) {}", option_letter(i), answer))
        .unwrap_or_else(|| answer.to_string())
}

/// The correct option(s) with their canonical letters.
fn correct_answer_text(question: &Question, glyphs: Glyphs) -> String {
    match question {
        Question::TrueFalse { correct_value, .. } => {
            let [yes, no] = true_false_lines(glyphs);
            let line = if *correct_value { yes } else { no };
            line.to_string()
        }
        Question::SingleChoice {
            options,
            correct_option,
            ..
        } => lettered(options, correct_option),
        Question::MultiAnswer {
            options,
            correct_options,
            ..
        } => {
            let mut answers: Vec<&String> = correct_options.iter().collect();
            answers.sort_by_key(|answer| {
                options
                    .iter()
                    .position(|option| option == *answer)
                    .unwrap_or(options.len())
            });
            answers
                .into_iter()
                .map(|answer| lettered(options, answer))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Insert a break opportunity every 15 characters into words longer than 35
/// characters, so URLs and unspaced scripts can wrap.
pub fn force_wrap(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            if word.chars().count() <= LONG_WORD_CHARS {
                return word.to_string();
            }
            word.chars()
                .collect::<Vec<_>>()
                .chunks(BREAK_EVERY)
                .map(|chunk| chunk.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join(&ZERO_WIDTH_SPACE.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn sample() -> Vec<Question> {
        vec![
            Question::SingleChoice {
                prompt: "Capital of France?".to_string(),
                options: vec!["Berlin".into(), "Paris".into(), "Rome".into()],
                correct_option: "Paris".to_string(),
                explanation: "Paris is the capital.".to_string(),
            },
            Question::TrueFalse {
                statement: "Water boils at 100C at sea level.".to_string(),
                correct_value: true,
                explanation: "Standard pressure.".to_string(),
            },
            Question::MultiAnswer {
                prompt: "Primes?".to_string(),
                options: vec!["2".into(), "4".into(), "5".into(), "9".into()],
                correct_options: BTreeSet::from(["5".to_string(), "2".to_string()]),
                explanation: "2 and 5 are prime.".to_string(),
            },
        ]
    }

    #[test]
    fn test_questions_export_has_no_answers() {
        let doc = ExportDocument::build(ExportKind::Questions, &sample(), Glyphs::Unicode);

        assert_eq!(doc.title, "AI Quiz Questions");
        assert_eq!(doc.entries[0].heading, "1. (單選題) Capital of France?");
        assert_eq!(doc.entries[0].options, vec!["(A) Berlin", "(B) Paris", "(C) Rome"]);
        assert_eq!(doc.entries[1].options, vec!["(A) 是 (True)", "(B) 非 (False)"]);
        assert!(doc.entries.iter().all(|e| e.correct_answer.is_none()));
        assert!(doc.entries.iter().all(|e| e.explanation.is_none()));
    }

    #[test]
    fn test_answers_export_letters_by_canonical_order() {
        let doc = ExportDocument::build(ExportKind::Answers, &sample(), Glyphs::Unicode);

        assert_eq!(doc.title, "AI Quiz Answers & Analysis");
        assert_eq!(
            doc.entries[0].correct_answer.as_deref(),
            Some("Correct Answer: (B) Paris")
        );
        assert_eq!(
            doc.entries[1].correct_answer.as_deref(),
            Some("Correct Answer: (A) 是 (True)")
        );
        assert_eq!(
            doc.entries[2].correct_answer.as_deref(),
            Some("Correct Answer: (A) 2, (C) 5")
        );
        assert_eq!(
            doc.entries[2].explanation.as_deref(),
            Some("Explanation: 2 and 5 are prime.")
        );
    }

    #[test]
    fn test_answer_outside_options_is_printed_bare() {
        let question = Question::SingleChoice {
            prompt: "Pick".to_string(),
            options: vec!["x".into(), "y".into()],
            correct_option: "z".to_string(),
            explanation: String::new(),
        };
        assert_eq!(correct_answer_text(&question, Glyphs::Unicode), "z");
    }

    #[test]
    fn test_latin_glyphs_use_english_labels() {
        let doc = ExportDocument::build(ExportKind::Answers, &sample(), Glyphs::Latin);

        assert_eq!(doc.entries[0].heading, "1. (Multiple Choice) Capital of France?");
        assert_eq!(doc.entries[1].options, vec!["(A) True", "(B) False"]);
        assert_eq!(
            doc.entries[1].correct_answer.as_deref(),
            Some("Correct Answer: (A) True")
        );
        assert!(doc.lines().iter().all(|line| line.is_ascii()));
    }

    #[test]
    fn test_lines_separate_blocks() {
        let doc = ExportDocument::build(ExportKind::Questions, &sample()[..1], Glyphs::Unicode);
        assert_eq!(
            doc.lines(),
            vec![
                "1. (單選題) Capital of France?",
                "(A) Berlin",
                "(B) Paris",
                "(C) Rome",
                ""
            ]
        );
    }

    #[test]
    fn test_force_wrap_long_words_only() {
        assert_eq!(force_wrap("short words stay"), "short words stay");

        let long = "x".repeat(40);
        let wrapped = force_wrap(&format!("see {}", long));
        assert_eq!(
            wrapped,
            format!(
                "see {}{z}{}{z}{}",
                &long[..15],
                &long[15..30],
                &long[30..],
                z = ZERO_WIDTH_SPACE
            )
        );

        let exactly = "y".repeat(35);
        assert_eq!(force_wrap(&exactly), exactly);
    }
}
