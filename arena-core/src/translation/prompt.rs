use std::collections::BTreeMap;

use arena_model::Locale;
use serde_json::{Map, Value};

use crate::error::{ArenaError, Result};

/// Translated text per target locale, keyed by source column.
pub type Translations = BTreeMap<Locale, BTreeMap<String, String>>;

pub fn system_prompt() -> String {
    let targets: Vec<String> = Locale::TRANSLATED
        .iter()
        .map(|locale| format!("\"{}\" ({})", locale.code(), locale.english_name()))
        .collect();

    format!(
        "You translate content for a city guide. The user message is a JSON object \
         whose values are Spanish text. Translate every value into {targets}. \
         Keep proper nouns, street names and brand names as they are. \
         Answer with a single JSON object shaped like \
         {{\"en\": {{\"<field>\": \"<text>\"}}, \"pt\": {{\"<field>\": \"<text>\"}}}} \
         using exactly the keys you were given and nothing else.",
        targets = targets.join(" and ")
    )
}

/// The Spanish source fields as a JSON object.
pub fn user_prompt(sources: &BTreeMap<String, String>) -> Result<String> {
    let object: Map<String, Value> = sources
        .iter()
        .map(|(field, text)| (field.clone(), Value::String(text.clone())))
        .collect();
    Ok(serde_json::to_string_pretty(&Value::Object(object))?)
}

/// Slice from the first `{` to the last `}`, dropping code fences or prose
/// the model wrapped around the object.
fn outermost_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Parse the model reply, keeping only requested fields with non-blank text.
pub fn parse_reply(reply: &str, expected: &[&str]) -> Result<Translations> {
    let body = outermost_object(reply).ok_or_else(|| {
        ArenaError::Translation("LLM reply contained no JSON object".to_string())
    })?;

    let value: Value = serde_json::from_str(body).map_err(|e| {
        ArenaError::Translation(format!("LLM reply was not valid JSON: {e}"))
    })?;
    let Value::Object(root) = value else {
        return Err(ArenaError::Translation(
            "LLM reply was not a JSON object".to_string(),
        ));
    };

    let mut translations = Translations::new();
    for (key, entries) in &root {
        let Ok(locale) = key.parse::<Locale>() else {
            continue;
        };
        if locale == Locale::Es {
            continue;
        }
        let Value::Object(entries) = entries else {
            continue;
        };

        let fields: BTreeMap<String, String> = expected
            .iter()
            .filter_map(|field| {
                let text = entries.get(*field)?.as_str()?.trim();
                (!text.is_empty()).then(|| (field.to_string(), text.to_string()))
            })
            .collect();

        if !fields.is_empty() {
            translations.entry(locale).or_default().extend(fields);
        }
    }

    if translations.is_empty() {
        return Err(ArenaError::Translation(
            "LLM reply had no usable translations".to_string(),
        ));
    }
    Ok(translations)
}
