use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;

/// Raw export of the realtime database root. Every section may be absent or `null`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSnapshot {
    #[serde(default)]
    pub(crate) schools: Option<BTreeMap<String, RawSchool>>,
    #[serde(default, rename = "licenseFees")]
    pub(crate) license_fees: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub(crate) announcements: Option<BTreeMap<String, RawAnnouncement>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSchool {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) candidates: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAnnouncement {
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub(crate) created_at: Option<Value>,
    #[serde(default)]
    pub(crate) order: Option<Value>,
}

pub(crate) fn parse_snapshot<R: Read>(reader: R) -> Result<RawSnapshot, serde_json::Error> {
    let raw: Option<RawSnapshot> = serde_json::from_reader(reader)?;
    Ok(raw.unwrap_or_default())
}
