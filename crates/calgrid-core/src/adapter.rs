//! Normalization of loosely-typed upstream records.
//!
//! Upstream payloads name the same concept several ways (`startTime`,
//! `time`, `startAt`, ...). Each concept has an ordered list of accepted
//! field names; the first present, non-null one wins. Everything downstream
//! of this module works on the strict types in [`crate::item`].

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{CoreError, ValidationError};
use crate::item::{CalendarItem, SpanRecord, TimedItem, MINUTES_PER_DAY};

const ID_FIELDS: &[&str] = &["id", "scheduleId", "taskId", "uuid"];
const TITLE_FIELDS: &[&str] = &["title", "name", "summary"];
const START_MINUTE_FIELDS: &[&str] = &["startMinute", "start_minute"];
const END_MINUTE_FIELDS: &[&str] = &["endMinute", "end_minute"];
const START_TIME_FIELDS: &[&str] = &["startTime", "start_time", "time", "startAt", "startDateTime"];
const END_TIME_FIELDS: &[&str] = &["endTime", "end_time", "endAt", "endDateTime"];
const DURATION_FIELDS: &[&str] = &["durationMinutes", "duration"];
const START_DATE_FIELDS: &[&str] = &["startDate", "start_date", "date", "startAt", "startDateTime"];
const END_DATE_FIELDS: &[&str] = &["endDate", "end_date", "date", "endAt", "endDateTime"];
const TASK_FIELDS: &[&str] = &["isTask", "is_task"];
const KIND_FIELDS: &[&str] = &["type", "kind"];
const DONE_FIELDS: &[&str] = &["completed", "done", "isCompleted"];
const REPEAT_FIELDS: &[&str] = &["isRepeat", "repeat", "isRecurring"];
const COLOR_FIELDS: &[&str] = &["colorKey", "color"];
const LABEL_FIELDS: &[&str] = &["labels", "tags"];
const ENVELOPE_FIELDS: &[&str] = &["items", "data", "schedules"];

/// Parse a payload into records: either a bare array or an object wrapping
/// one under `items`, `data` or `schedules`.
///
/// # Errors
/// Returns an error if the text is not JSON or holds no record array.
pub fn parse_records(json: &str) -> Result<Vec<Value>, CoreError> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(records) => Ok(records),
        other => probe(&other, ENVELOPE_FIELDS)
            .and_then(|(_, v)| v.as_array().cloned())
            .ok_or_else(|| {
                ValidationError::InvalidValue {
                    field: "payload".into(),
                    message: "expected an array of records".into(),
                }
                .into()
            }),
    }
}

/// Normalize one record for a time grid.
///
/// # Errors
/// Returns an error if the record has no id or no readable start time.
pub fn timed_item_from_value(value: &Value) -> Result<TimedItem, ValidationError> {
    let id = read_id(value)?;
    let start_minute = match read_minute(value, START_MINUTE_FIELDS, START_TIME_FIELDS) {
        Minute::Found(minute) => minute,
        Minute::Unreadable { field, raw } => {
            return Err(ValidationError::InvalidTime { field, value: raw })
        }
        Minute::Absent => {
            return Err(ValidationError::MissingField {
                field: "startMinute".into(),
            })
        }
    };
    let is_task = read_is_task(value);
    let end_minute = read_end_minute(value, start_minute);

    Ok(TimedItem {
        id,
        title: read_title(value),
        start_minute,
        end_minute: if is_task { None } else { end_minute },
        is_task,
        labels: read_labels(value),
        is_repeat: read_flag(value, REPEAT_FIELDS),
    })
}

/// Normalize one record for the week header strip.
///
/// # Errors
/// Returns an error if the record has no id or no readable start date.
pub fn span_record_from_value(value: &Value) -> Result<SpanRecord, ValidationError> {
    let (start_date, end_date) = read_date_range(value)?;
    let mut record = SpanRecord::new(read_id(value)?, read_title(value), start_date, end_date);
    record.color_key = read_string(value, COLOR_FIELDS);
    record.is_task = read_is_task(value);
    record.done = read_flag(value, DONE_FIELDS);
    record.is_repeat = read_flag(value, REPEAT_FIELDS);
    if record.is_task {
        record.end_date = record.start_date;
    }
    Ok(record)
}

/// Normalize one record for the month grid.
///
/// Times are optional here; an unreadable time is treated as no time.
///
/// # Errors
/// Returns an error if the record has no id or no readable start date.
pub fn calendar_item_from_value(value: &Value) -> Result<CalendarItem, ValidationError> {
    let (start_date, end_date) = read_date_range(value)?;
    let mut item = CalendarItem::new(read_id(value)?, read_title(value), start_date, end_date);
    item.start_minute = match read_minute(value, START_MINUTE_FIELDS, START_TIME_FIELDS) {
        Minute::Found(minute) => Some(minute),
        Minute::Unreadable { .. } | Minute::Absent => None,
    };
    item.end_minute = item
        .start_minute
        .and_then(|start| read_end_minute(value, start));
    item.color_key = read_string(value, COLOR_FIELDS);
    item.is_task = read_is_task(value);
    item.completed = read_flag(value, DONE_FIELDS);
    item.is_repeat = read_flag(value, REPEAT_FIELDS);
    Ok(item)
}

pub fn normalize_timed(values: &[Value]) -> Vec<TimedItem> {
    normalize(values, timed_item_from_value)
}

pub fn normalize_spans(values: &[Value]) -> Vec<SpanRecord> {
    normalize(values, span_record_from_value)
}

pub fn normalize_calendar(values: &[Value]) -> Vec<CalendarItem> {
    normalize(values, calendar_item_from_value)
}

/// Apply `convert` to every record, skipping the ones it rejects.
fn normalize<T>(values: &[Value], convert: fn(&Value) -> Result<T, ValidationError>) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match convert(value) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping record");
                None
            }
        })
        .collect()
}

/// Minutes since midnight from `HH:MM`, `HH:MM:SS`, or a date-time such as
/// `2024-01-05T09:30:00Z`. `24:00` is accepted as end of day.
pub fn parse_time_of_day(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let time = match raw.find(|c: char| c == 'T' || c == ' ') {
        Some(pos) if pos >= 8 => &raw[pos + 1..],
        _ => raw,
    };
    let mut parts = time.splitn(3, ':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = parts.next()?.get(..2)?.parse().ok()?;
    if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
        return None;
    }
    Some(hour * 60 + minute)
}

/// Calendar date from `YYYY-MM-DD`, ignoring anything after the date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

enum Minute {
    Found(u32),
    Unreadable { field: String, raw: String },
    Absent,
}

fn probe<'v>(value: &'v Value, fields: &[&'static str]) -> Option<(&'static str, &'v Value)> {
    fields
        .iter()
        .find_map(|&field| value.get(field).filter(|v| !v.is_null()).map(|v| (field, v)))
}

fn read_id(value: &Value) -> Result<String, ValidationError> {
    match probe(value, ID_FIELDS) {
        Some((_, Value::String(s))) if !s.is_empty() => Ok(s.clone()),
        Some((_, Value::Number(n))) => Ok(n.to_string()),
        Some((field, other)) => Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("expected a string or number, got {other}"),
        }),
        None => Err(ValidationError::MissingField { field: "id".into() }),
    }
}

fn read_title(value: &Value) -> String {
    read_string(value, TITLE_FIELDS).unwrap_or_default()
}

fn read_string(value: &Value, fields: &[&'static str]) -> Option<String> {
    probe(value, fields).and_then(|(_, v)| v.as_str().map(str::to_string))
}

fn read_flag(value: &Value, fields: &[&'static str]) -> bool {
    match probe(value, fields) {
        Some((_, Value::Bool(b))) => *b,
        Some((_, Value::Number(n))) => n.as_i64().is_some_and(|n| n != 0),
        Some((_, Value::String(s))) => matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

fn read_is_task(value: &Value) -> bool {
    read_flag(value, TASK_FIELDS)
        || read_string(value, KIND_FIELDS).is_some_and(|kind| kind.eq_ignore_ascii_case("task"))
}

fn read_labels(value: &Value) -> Vec<String> {
    let Some((_, Value::Array(labels))) = probe(value, LABEL_FIELDS) else {
        return Vec::new();
    };
    labels
        .iter()
        .filter_map(|label| match label {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => label.get("name").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

/// Numeric minute fields win over time strings.
fn read_minute(value: &Value, minute_fields: &[&'static str], time_fields: &[&'static str]) -> Minute {
    if let Some((field, v)) = probe(value, minute_fields) {
        return match v.as_u64() {
            Some(m) if m <= u64::from(MINUTES_PER_DAY) => Minute::Found(m as u32),
            _ => Minute::Unreadable {
                field: field.into(),
                raw: v.to_string(),
            },
        };
    }
    match probe(value, time_fields) {
        Some((field, Value::String(s))) => match parse_time_of_day(s) {
            Some(minute) => Minute::Found(minute),
            // A bare date under a date-time field carries no time.
            None if parse_date(s).is_some() && s.trim().len() == 10 => Minute::Absent,
            None => Minute::Unreadable {
                field: field.into(),
                raw: s.clone(),
            },
        },
        Some((field, other)) => Minute::Unreadable {
            field: field.into(),
            raw: other.to_string(),
        },
        None => Minute::Absent,
    }
}

/// Explicit end first, then start plus a duration.
fn read_end_minute(value: &Value, start_minute: u32) -> Option<u32> {
    if let Minute::Found(end) = read_minute(value, END_MINUTE_FIELDS, END_TIME_FIELDS) {
        return Some(end);
    }
    probe(value, DURATION_FIELDS)
        .and_then(|(_, v)| v.as_u64())
        .and_then(|d| u32::try_from(d).ok())
        .map(|d| start_minute.saturating_add(d))
}

fn read_date_range(value: &Value) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let (field, raw) = probe(value, START_DATE_FIELDS).ok_or_else(|| ValidationError::MissingField {
        field: "startDate".into(),
    })?;
    let start = raw
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| ValidationError::InvalidDate {
            field: field.into(),
            value: raw.to_string(),
        })?;
    let end = match probe(value, END_DATE_FIELDS) {
        Some((field, raw)) => raw
            .as_str()
            .and_then(parse_date)
            .ok_or_else(|| ValidationError::InvalidDate {
                field: field.into(),
                value: raw.to_string(),
            })?,
        None => start,
    };
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn time_parsing() {
        assert_eq!(parse_time_of_day("09:30"), Some(570));
        assert_eq!(parse_time_of_day("9:05"), Some(545));
        assert_eq!(parse_time_of_day("13:45:10"), Some(825));
        assert_eq!(parse_time_of_day("2024-01-05T09:30:00Z"), Some(570));
        assert_eq!(parse_time_of_day("2024-01-05 18:00"), Some(1080));
        assert_eq!(parse_time_of_day("24:00"), Some(1440));
        assert_eq!(parse_time_of_day("24:30"), None);
        assert_eq!(parse_time_of_day("noon"), None);
        assert_eq!(parse_time_of_day("2024-01-05"), None);
    }

    #[test]
    fn date_parsing() {
        assert_eq!(parse_date("2024-02-29"), Some(date(2024, 2, 29)));
        assert_eq!(parse_date("2024-02-29T10:00:00"), Some(date(2024, 2, 29)));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("tomorrow"), None);
    }

    #[test]
    fn timed_from_minutes_or_strings() {
        let item = timed_item_from_value(&json!({
            "id": 42, "title": "Standup", "startMinute": 540, "endMinute": 555,
            "labels": ["work", {"name": "daily"}], "isRepeat": true
        }))
        .unwrap();
        assert_eq!(item.id, "42");
        assert_eq!((item.start_minute, item.end_minute), (540, Some(555)));
        assert_eq!(item.labels, vec!["work", "daily"]);
        assert!(item.is_repeat);

        let item = timed_item_from_value(&json!({
            "scheduleId": "s1", "name": "Lunch", "startTime": "12:00", "duration": 45
        }))
        .unwrap();
        assert_eq!((item.start_minute, item.end_minute), (720, Some(765)));
    }

    #[test]
    fn timed_task_drops_end() {
        let item = timed_item_from_value(&json!({
            "taskId": "t", "title": "Call", "time": "15:00", "endTime": "15:10", "type": "TASK"
        }))
        .unwrap();
        assert!(item.is_task);
        assert_eq!(item.end_minute, None);
    }

    #[test]
    fn timed_rejects_missing_or_bad_start() {
        assert_eq!(
            timed_item_from_value(&json!({"id": "a", "title": "x"})),
            Err(ValidationError::MissingField {
                field: "startMinute".into()
            })
        );
        assert!(matches!(
            timed_item_from_value(&json!({"id": "a", "startTime": "later"})),
            Err(ValidationError::InvalidTime { .. })
        ));
        assert!(matches!(
            timed_item_from_value(&json!({"title": "no id", "startMinute": 10})),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn span_record_fields() {
        let record = span_record_from_value(&json!({
            "id": "trip", "title": "Trip", "startDate": "2024-01-10",
            "endDate": "2024-01-08", "colorKey": "travel", "done": "true", "isRecurring": true
        }))
        .unwrap();
        assert_eq!(record.start_date, date(2024, 1, 8));
        assert_eq!(record.end_date, date(2024, 1, 10));
        assert_eq!(record.color_key.as_deref(), Some("travel"));
        assert!(record.done);
        assert!(record.is_repeat);

        let task = span_record_from_value(&json!({
            "id": "t", "title": "Rent", "date": "2024-01-09", "endDate": "2024-01-12", "isTask": true
        }))
        .unwrap();
        assert_eq!(task.end_date, task.start_date);
    }

    #[test]
    fn calendar_item_is_lenient_about_time() {
        let item = calendar_item_from_value(&json!({
            "id": "a", "title": "A", "date": "2024-01-09", "startTime": "whenever"
        }))
        .unwrap();
        assert_eq!(item.start_minute, None);

        let item = calendar_item_from_value(&json!({
            "id": "b", "title": "B", "startAt": "2024-01-09T08:15:00", "endAt": "2024-01-09T09:00:00"
        }))
        .unwrap();
        assert_eq!(item.start_date, date(2024, 1, 9));
        assert_eq!(item.start_minute, Some(495));
        assert_eq!(item.end_minute, Some(540));
    }

    #[test]
    fn batch_skips_invalid_records() {
        let values = vec![
            json!({"id": "ok", "startDate": "2024-01-01"}),
            json!({"id": "bad", "startDate": "January"}),
            json!({"startDate": "2024-01-02"}),
        ];
        let records = normalize_spans(&values);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "ok");
    }

    #[test]
    fn payload_envelopes() {
        assert_eq!(parse_records(r#"[{"id": 1}]"#).unwrap().len(), 1);
        assert_eq!(parse_records(r#"{"data": [{"id": 1}, {"id": 2}]}"#).unwrap().len(), 2);
        assert!(parse_records(r#"{"nothing": true}"#).is_err());
        assert!(parse_records("not json").is_err());
    }
}
