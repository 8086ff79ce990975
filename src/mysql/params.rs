use chrono::{Datelike, NaiveDate, Timelike};

use crate::types::RowValues;

/// Convert a [`RowValues`] into a MySQL wire value.
#[must_use]
pub fn to_mysql_value(value: &RowValues) -> mysql_async::Value {
    match value {
        RowValues::Null => mysql_async::Value::NULL,
        RowValues::Int(i) => mysql_async::Value::Int(*i),
        RowValues::Float(f) => mysql_async::Value::Double(*f),
        RowValues::Text(s) => mysql_async::Value::Bytes(s.clone().into_bytes()),
        RowValues::Bool(b) => mysql_async::Value::Int(i64::from(*b)),
        RowValues::Timestamp(ts) => mysql_async::Value::Date(
            ts.year().unsigned_abs() as u16,
            ts.month() as u8,
            ts.day() as u8,
            ts.hour() as u8,
            ts.minute() as u8,
            ts.second() as u8,
            ts.nanosecond() / 1000,
        ),
        RowValues::JSON(json) => mysql_async::Value::Bytes(json.to_string().into_bytes()),
        RowValues::Blob(bytes) => mysql_async::Value::Bytes(bytes.clone()),
    }
}

/// Convert a MySQL wire value into a [`RowValues`].
///
/// Text-protocol strings arrive as bytes; valid UTF-8 becomes `Text`,
/// anything else stays `Blob`.
#[must_use]
pub fn from_mysql_value(value: mysql_async::Value) -> RowValues {
    match value {
        mysql_async::Value::NULL => RowValues::Null,
        mysql_async::Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text),
            Err(err) => RowValues::Blob(err.into_bytes()),
        },
        mysql_async::Value::Int(i) => RowValues::Int(i),
        mysql_async::Value::UInt(u) => RowValues::Int(u as i64),
        mysql_async::Value::Float(f) => RowValues::Float(f64::from(f)),
        mysql_async::Value::Double(d) => RowValues::Float(d),
        mysql_async::Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(hour),
                        u32::from(minute),
                        u32::from(second),
                        micros,
                    )
                })
                .map_or(RowValues::Null, RowValues::Timestamp)
        }
        mysql_async::Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let total_hours = u64::from(days) * 24 + u64::from(hours);
            let sign = if negative { "-" } else { "" };
            if micros == 0 {
                RowValues::Text(format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}"))
            } else {
                RowValues::Text(format!(
                    "{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
                ))
            }
        }
    }
}
