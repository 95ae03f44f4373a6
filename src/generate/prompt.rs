//! Prompt text and response schema for one question kind.

use serde_json::{Value, json};

use crate::models::QuestionKind;

/// Only this many characters of the document are sent to the model.
pub const MAX_PROMPT_CHARS: usize = 30_000;

pub fn build_prompt(kind: QuestionKind, count: u32, language: &str, text: &str) -> String {
    let type_name = kind.wire_id().replace('_', " ");
    let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();

    format!(
        r#"You are a professional quiz creator. Based on the text provided below, generate exactly {count} {type_name} questions.
All content you generate (questions, options, answers, explanations) must be strictly in the "{language}" language.
Return the result as a perfectly valid JSON object following the provided schema. Do not include any markdown formatting like ```json.

Text:
---
{excerpt}
---"#
    )
}

/// Schema of the JSON object expected back: one array property named after
/// the kind, whose items carry the kind's required fields.
pub fn response_schema(kind: QuestionKind) -> Value {
    let properties = match kind {
        QuestionKind::MultipleChoice => json!({
            "question": { "type": "STRING" },
            "options": { "type": "ARRAY", "items": { "type": "STRING" } },
            "answer": { "type": "STRING" },
            "explanation": { "type": "STRING" }
        }),
        QuestionKind::TrueFalse => json!({
            "statement": { "type": "STRING" },
            "answer": { "type": "BOOLEAN" },
            "explanation": { "type": "STRING" }
        }),
        QuestionKind::MultipleAnswer => json!({
            "question": { "type": "STRING" },
            "options": { "type": "ARRAY", "items": { "type": "STRING" } },
            "answers": { "type": "ARRAY", "items": { "type": "STRING" } },
            "explanation": { "type": "STRING" }
        }),
    };
    let required: Vec<String> = properties
        .as_object()
        .map(|fields| fields.keys().cloned().collect())
        .unwrap_or_default();
    let type_name = kind.wire_id().replace('_', " ");

    json!({
        "type": "OBJECT",
        "properties": {
            kind.wire_id(): {
                "type": "ARRAY",
                "description": format!("Array of {} questions.", type_name),
                "items": {
                    "type": "OBJECT",
                    "properties": properties,
                    "required": required
                }
            }
        }
    })
}
