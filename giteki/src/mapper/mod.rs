// Row mapper - the single point where an untyped row becomes a typed record

use crate::schema::NewEquipmentRecord;
use chrono::NaiveDate;
use std::fmt;

/// Caption of the first header column in the publisher's listings
/// ("name of the party granted construction-design certification").
pub const HEADER_CAPTION: &str = "工事設計認証を受けた者の氏名又は名称";

/// Format of the authorization date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of columns a data row carries.
pub const ROW_ARITY: usize = 8;

/// Why a row was skipped instead of being mapped to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Header,
    MalformedDate { value: String },
    ShortRow { len: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Header => write!(f, "header row"),
            SkipReason::MalformedDate { value } => write!(f, "unparsable date {value:?}"),
            SkipReason::ShortRow { len } => {
                write!(f, "row has {len} fields, expected {ROW_ARITY}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMapping {
    Record(NewEquipmentRecord),
    Skip(SkipReason),
}

/// Map one raw row from `file` onto a record.
///
/// Columns by position: certified name, equipment type, model, authorization
/// number, radio type, applied-regulation flag, authorization date, note.
/// Columns past the eighth are ignored.
pub fn map_row<S: AsRef<str>>(fields: &[S], file: &str) -> RowMapping {
    let is_header = fields
        .first()
        .map(|f| f.as_ref() == HEADER_CAPTION)
        .unwrap_or(false);
    if is_header {
        return RowMapping::Skip(SkipReason::Header);
    }
    if fields.len() < ROW_ARITY {
        return RowMapping::Skip(SkipReason::ShortRow { len: fields.len() });
    }

    let field = |i: usize| fields[i].as_ref().to_string();

    let auth_date = match parse_auth_date(fields[6].as_ref()) {
        Some(date) => date,
        None => {
            return RowMapping::Skip(SkipReason::MalformedDate { value: field(6) });
        }
    };

    RowMapping::Record(NewEquipmentRecord {
        certified_name: field(0),
        equipment_type: field(1),
        model: field(2),
        auth_number: field(3),
        radio_type: field(4),
        applied_regulation: field(5),
        auth_date,
        note: field(7),
        file: file.to_string(),
    })
}

/// Parse a `YYYY-MM-DD` date. chrono alone would also take unpadded fields,
/// signs and leading whitespace, so the shape is checked byte by byte first.
fn parse_auth_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
