use std::collections::HashMap;

use thiserror::Error;

use crate::model::task::{ParsePriorityError, Priority};

/// Metadata keys understood in `key:value` arguments.
pub const KNOWN_KEYS: &[&str] = &["priority"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown key: '{0}'")]
    UnknownKey(String),

    #[error("Ambiguous key: '{key}' matches {candidates:?}")]
    AmbiguousKey { key: String, candidates: Vec<String> },

    #[error(transparent)]
    Priority(#[from] ParsePriorityError),
}

/// Text and optional priority pulled out of a free-form argument list such
/// as `Buy milk pri:h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub text: String,
    pub priority: Option<Priority>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic()) {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String, InputError> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(InputError::UnknownKey(key.to_string())),
        _ => Err(InputError::AmbiguousKey {
            key: key.to_string(),
            candidates: matches.iter().map(|m| m.to_string()).collect(),
        }),
    }
}

/// Splits arguments into task text and metadata. Tokens whose key is not a
/// known metadata key stay part of the text, so `Note: call back` survives.
/// So do tokens with an empty value (`PR:`) and abbreviated keys whose value
/// is not a priority (`pri:nt`); only the full `priority:` key insists on a
/// valid value. Text is not validated here; blank text is the store's call
/// to reject.
pub fn parse_task_input(args: &[String]) -> Result<TaskInput, InputError> {
    let mut text_parts = Vec::new();
    let mut priority = None;

    for arg in args {
        let parsed = parse_args(std::slice::from_ref(arg));
        let Some((key, value)) = parsed.metadata.into_iter().next() else {
            text_parts.push(arg.as_str());
            continue;
        };
        if value.is_empty() {
            text_parts.push(arg.as_str());
            continue;
        }
        let key = key.to_lowercase();
        match expand_key(&key, KNOWN_KEYS) {
            Ok(full_key) if full_key == "priority" => match value.parse::<Priority>() {
                Ok(p) => priority = Some(p),
                Err(_) if key != full_key => text_parts.push(arg.as_str()),
                Err(e) => return Err(e.into()),
            },
            Ok(_) | Err(InputError::UnknownKey(_)) => text_parts.push(arg.as_str()),
            Err(e) => return Err(e),
        }
    }

    Ok(TaskInput {
        text: text_parts.join(" "),
        priority,
    })
}

/// Same as [`parse_task_input`] for a single line typed into the TUI.
/// Splits on single spaces so runs of spaces inside the text survive.
pub fn parse_task_line(line: &str) -> Result<TaskInput, InputError> {
    let args: Vec<String> = line.trim().split(' ').map(|s| s.to_string()).collect();
    parse_task_input(&args)
}
