use crate::domain::AnnouncementKind;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Backend counts arrive as loose JSON numbers; negatives floor at zero and
/// fractions truncate. Anything non-numeric is dropped.
pub(crate) fn count_from_value(value: &Value) -> Option<u32> {
    if let Some(unsigned) = value.as_u64() {
        return Some(u32::try_from(unsigned).unwrap_or(u32::MAX));
    }
    if value.as_i64().is_some() {
        return Some(0);
    }
    value
        .as_f64()
        .filter(|float| float.is_finite())
        .map(|float| float.clamp(0.0, f64::from(u32::MAX)) as u32)
}

pub(crate) fn fee_from_value(value: &Value) -> Option<Decimal> {
    let fee = match value {
        Value::Number(number) => number
            .as_i64()
            .map(Decimal::from)
            .or_else(|| number.as_u64().map(Decimal::from))
            .or_else(|| number.as_f64().and_then(Decimal::from_f64)),
        Value::String(raw) => raw.trim().parse::<Decimal>().ok(),
        _ => None,
    }?;
    Some(fee.max(Decimal::ZERO))
}

pub(crate) fn order_from_value(value: Option<&Value>) -> u32 {
    value.and_then(count_from_value).unwrap_or(0)
}

pub(crate) fn kind_from_tag(tag: Option<&str>) -> AnnouncementKind {
    match tag.map(str::trim) {
        Some("meeting") => AnnouncementKind::Meeting,
        Some("fee_collection") => AnnouncementKind::FeeCollection,
        Some("price_update") => AnnouncementKind::PriceUpdate,
        _ => AnnouncementKind::General,
    }
}

pub(crate) fn timestamp_from_value(value: Option<&Value>) -> DateTime<Utc> {
    value
        .and_then(|raw| raw.as_i64().or_else(|| raw.as_f64().map(|f| f as i64)))
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default()
}
