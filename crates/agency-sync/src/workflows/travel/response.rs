//! Interpretation of the Travel-Click import report.

use serde::Deserialize;
use serde_json::Value;

/// Message types that reach the operator.
const REPORTED_TYPES: &[&str] = &["ERROR"];

/// Marker pairs surrounding a person's full name inside agency messages.
const NAME_BOUNDARIES: &[(&str, &str)] = &[("Пользователь", "уже")];

#[derive(Debug, Deserialize)]
struct ImportReport {
    #[serde(rename = "fatalError", default)]
    fatal_error: Option<Value>,
    #[serde(default)]
    employees: Option<Vec<EmployeeReport>>,
}

#[derive(Debug, Deserialize)]
struct EmployeeReport {
    #[serde(rename = "tabNum", default)]
    tab_num: Option<Value>,
    #[serde(rename = "importMessages", default)]
    import_messages: Option<Vec<ImportMessage>>,
}

impl EmployeeReport {
    fn reported(&self) -> impl Iterator<Item = &ImportMessage> {
        self.import_messages
            .iter()
            .flatten()
            .filter(|message| is_reported(message.kind()))
    }
}

#[derive(Debug, Deserialize)]
struct ImportMessage {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl ImportMessage {
    fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or_default()
    }
}

/// What the agency said about a delivered batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAnalysis {
    /// The whole submission was rejected.
    Fatal(String),
    /// One line per reported message.
    Errors(Vec<String>),
    Clean,
}

impl ResponseAnalysis {
    /// Emits the analysis as a single log entry; a clean report logs nothing.
    pub fn report(&self) {
        match self {
            ResponseAnalysis::Fatal(message) => {
                tracing::error!("response contains a general processing error: '{message}'");
            }
            ResponseAnalysis::Errors(lines) => {
                tracing::error!("{}", render_error_report(lines));
            }
            ResponseAnalysis::Clean => {}
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("response is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn analyze(body: &[u8]) -> Result<ResponseAnalysis, ResponseError> {
    let decoded = std::str::from_utf8(body)?;
    let report: ImportReport = serde_json::from_str(decoded)?;

    if let Some(fatal) = report.fatal_error.as_ref().filter(|value| is_set(value)) {
        return Ok(ResponseAnalysis::Fatal(value_text(fatal)));
    }

    let lines: Vec<String> = report
        .employees
        .iter()
        .flatten()
        .flat_map(|employee| {
            let tab_num = employee.tab_num.as_ref().map(value_text).unwrap_or_default();
            employee.reported().map(move |message| {
                format!(
                    "For tab number '{}', message type '{}': {}.",
                    tab_num,
                    message.kind(),
                    scrub_personal_names(message.text.as_deref().unwrap_or_default())
                )
            })
        })
        .collect();

    if lines.is_empty() {
        Ok(ResponseAnalysis::Clean)
    } else {
        Ok(ResponseAnalysis::Errors(lines))
    }
}

/// Count header followed by the message lines.
pub fn render_error_report(lines: &[String]) -> String {
    let mut report = Vec::with_capacity(lines.len() + 1);
    report.push(format!(
        "Result of analysing erroneous records, lines '{}':",
        lines.len()
    ));
    report.extend(lines.iter().cloned());
    report.join("\n")
}

/// Removes the span between a known marker pair, keeping both markers.
pub fn scrub_personal_names(text: &str) -> String {
    for (opening, closing) in NAME_BOUNDARIES {
        let Some(found) = text.find(opening) else {
            continue;
        };
        let after_opening = found + opening.len();
        let separator = text[after_opening..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        let span_start = after_opening + separator;

        if let Some(offset) = text[span_start..].find(closing) {
            let span_end = span_start + offset;
            return format!("{}{}", &text[..span_start], &text[span_end..]);
        }
    }
    text.to_string()
}

fn is_reported(kind: &str) -> bool {
    REPORTED_TYPES.contains(&kind)
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
