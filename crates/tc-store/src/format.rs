//! Record encodings for the event log.

use std::fmt;

use serde::{Deserialize, Serialize};
use tc_core::{Event, Op, format_timestamp, parse_timestamp};

use crate::StoreError;

/// Separator between the timestamp and the rest of a text line.
const TEXT_SEPARATOR: &str = " - ";

/// How events are laid out in the log file.
///
/// ## Text
///
/// ```text
/// 20150101T08:00:00 - in planning
/// 20150101T12:30:00 - out
/// add 30
/// ```
///
/// ## Csv
///
/// Headerless `op,value[,comment]` records:
///
/// ```text
/// in,20150101T08:00:00,planning
/// out,20150101T12:30:00
/// add,30
/// ```
///
/// Adjustments are written as a non-negative magnitude under `add` or `sub`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Csv,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl LogFormat {
    /// Encodes one event as a complete, newline-terminated record.
    pub(crate) fn encode(self, event: &Event) -> Result<Vec<u8>, StoreError> {
        match self {
            Self::Text => Ok(encode_text(event).into_bytes()),
            Self::Csv => encode_csv(event),
        }
    }

    /// Decodes a whole log, stopping at the first malformed record.
    pub(crate) fn decode(self, content: &str) -> Result<Vec<Event>, StoreError> {
        match self {
            Self::Text => decode_text(content),
            Self::Csv => decode_csv(content),
        }
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> StoreError {
    StoreError::Parse {
        line,
        message: message.into(),
    }
}

// ========== Text ==========

fn encode_text(event: &Event) -> String {
    match event {
        Event::CheckIn { at, comment } | Event::CheckOut { at, comment } => {
            let mut line = format!("{}{TEXT_SEPARATOR}{}", format_timestamp(*at), event.op());
            if let Some(comment) = comment {
                line.push(' ');
                line.push_str(comment);
            }
            line.push('\n');
            line
        }
        Event::Adjust { minutes } => format!("{} {}\n", event.op(), minutes.unsigned_abs()),
    }
}

fn decode_text(content: &str) -> Result<Vec<Event>, StoreError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_text_line(line).map_err(|message| parse_error(idx + 1, message))
        })
        .collect()
}

fn parse_text_line(line: &str) -> Result<Event, String> {
    let line = line.trim();

    if let Some((stamp, rest)) = line.split_once(TEXT_SEPARATOR) {
        let at = parse_timestamp(stamp)
            .map_err(|e| format!("invalid timestamp {:?}: {e}", stamp.trim()))?;
        let rest = rest.trim();
        let (code, comment) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(code, comment)| (code, comment.trim()));
        let comment = (!comment.is_empty()).then(|| comment.to_string());

        return match code.parse::<Op>().map_err(|e| e.to_string())? {
            Op::In => Ok(Event::CheckIn { at, comment }),
            Op::Out => Ok(Event::CheckOut { at, comment }),
            op @ (Op::Add | Op::Sub) => Err(format!("{op} does not take a timestamp")),
        };
    }

    let (code, value) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("missing delimiter in {line:?}"))?;
    match code.parse::<Op>().map_err(|e| e.to_string())? {
        op @ (Op::Add | Op::Sub) => adjustment(op, value.trim()),
        op @ (Op::In | Op::Out) => Err(format!("{op} requires a timestamp")),
    }
}

fn adjustment(op: Op, value: &str) -> Result<Event, String> {
    let minutes: i64 = value
        .parse()
        .map_err(|_| format!("invalid minutes {value:?}"))?;
    let minutes = if op == Op::Sub {
        minutes
            .checked_neg()
            .ok_or_else(|| format!("invalid minutes {value:?}"))?
    } else {
        minutes
    };
    Ok(Event::Adjust { minutes })
}

// ========== Csv ==========

fn encode_csv(event: &Event) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let op = event.op();
    match event {
        Event::CheckIn { at, comment } | Event::CheckOut { at, comment } => {
            let stamp = format_timestamp(*at);
            match comment {
                Some(comment) => {
                    writer.write_record([op.as_str(), stamp.as_str(), comment.as_str()])?;
                }
                None => writer.write_record([op.as_str(), stamp.as_str()])?,
            }
        }
        Event::Adjust { minutes } => {
            writer.write_record([op.as_str(), minutes.unsigned_abs().to_string().as_str()])?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))
}

fn decode_csv(content: &str) -> Result<Vec<Event>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut events = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            let line = e.position().map_or(idx + 1, |p| line_number(p.line()));
            parse_error(line, e.to_string())
        })?;
        let line = record.position().map_or(idx + 1, |p| line_number(p.line()));
        events.push(parse_csv_record(&record).map_err(|message| parse_error(line, message))?);
    }
    Ok(events)
}

fn line_number(line: u64) -> usize {
    usize::try_from(line).unwrap_or(usize::MAX)
}

fn parse_csv_record(record: &csv::StringRecord) -> Result<Event, String> {
    if record.len() > 3 {
        return Err(format!("expected at most 3 columns, got {}", record.len()));
    }
    let (Some(code), Some(value)) = (record.get(0), record.get(1)) else {
        return Err("missing delimiter between op and value".to_string());
    };
    let comment = record
        .get(2)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string);

    match code.parse::<Op>().map_err(|e| e.to_string())? {
        op @ (Op::In | Op::Out) => {
            let at = parse_timestamp(value)
                .map_err(|e| format!("invalid timestamp {value:?}: {e}"))?;
            Ok(if op == Op::In {
                Event::CheckIn { at, comment }
            } else {
                Event::CheckOut { at, comment }
            })
        }
        op @ (Op::Add | Op::Sub) => adjustment(op, value),
    }
}
