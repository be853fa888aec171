//! XML encoding of a single [`Record`].
//!
//! The document shape is fixed:
//!
//! ```xml
//! <root>
//!   <var name="id" value="6c1f…"/>
//!   <var name="level" value="42"/>
//!   <objects>
//!     <object name="alpha"/>
//!     <object name="beta"/>
//!   </objects>
//! </root>
//! ```
//!
//! Variables are looked up by their `name` attribute, never by position, so
//! documents that list `level` before `id` decode the same way. Encoding always
//! writes `id` first.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocumentError;
use crate::record::{LEVEL_RANGE, Record};

const ID_VAR: &str = "id";
const LEVEL_VAR: &str = "level";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "root")]
struct RootXml {
    #[serde(rename = "var", default)]
    vars: Vec<VarXml>,
    #[serde(default)]
    objects: Option<ObjectsXml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VarXml {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ObjectsXml {
    #[serde(rename = "object", default)]
    objects: Vec<ObjectXml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ObjectXml {
    #[serde(rename = "@name")]
    name: String,
}

/// Serialize a record into its UTF-8 XML document.
///
/// # Errors
/// Returns [`DocumentError::Serialize`] if the XML writer rejects the payload.
pub fn encode(record: &Record) -> Result<Vec<u8>, DocumentError> {
    let root = RootXml {
        vars: vec![
            VarXml {
                name: ID_VAR.to_string(),
                value: record.id.hyphenated().to_string(),
            },
            VarXml {
                name: LEVEL_VAR.to_string(),
                value: record.level.to_string(),
            },
        ],
        objects: Some(ObjectsXml {
            objects: record
                .object_names
                .iter()
                .map(|name| ObjectXml { name: name.clone() })
                .collect(),
        }),
    };
    let xml = quick_xml::se::to_string(&root).map_err(|e| DocumentError::Serialize(e.to_string()))?;
    Ok(xml.into_bytes())
}

/// Parse an XML document back into a [`Record`].
///
/// An `objects` element without children yields an empty name list.
///
/// # Errors
/// Fails when the bytes are not well-formed UTF-8 XML, when either variable is
/// missing or repeated, when a variable other than `id`/`level` is present,
/// when `id` is not a UUID, when `level` is not an integer in
/// `1..=100`, or when the `objects` container is absent.
pub fn decode(bytes: &[u8]) -> Result<Record, DocumentError> {
    let text = std::str::from_utf8(bytes).map_err(|e| DocumentError::Syntax(e.to_string()))?;
    let root: RootXml =
        quick_xml::de::from_str(text).map_err(|e| DocumentError::Syntax(e.to_string()))?;

    if let Some(other) = root.vars.iter().find(|v| v.name != ID_VAR && v.name != LEVEL_VAR) {
        return Err(DocumentError::UnknownVariable(other.name.clone()));
    }
    let raw_id = lookup_var(&root.vars, ID_VAR)?;
    let id = Uuid::parse_str(raw_id.trim())
        .map_err(|_| DocumentError::InvalidId(raw_id.to_string()))?;

    let raw_level = lookup_var(&root.vars, LEVEL_VAR)?;
    let level: i64 = raw_level
        .trim()
        .parse()
        .map_err(|_| DocumentError::InvalidLevel(raw_level.to_string()))?;
    let level = u8::try_from(level)
        .ok()
        .filter(|l| LEVEL_RANGE.contains(l))
        .ok_or(DocumentError::LevelOutOfRange(level))?;

    let objects = root.objects.ok_or(DocumentError::MissingObjects)?;
    let object_names = objects.objects.into_iter().map(|o| o.name).collect();

    Ok(Record::new(id, level, object_names))
}

fn lookup_var<'a>(vars: &'a [VarXml], name: &'static str) -> Result<&'a str, DocumentError> {
    let mut matching = vars.iter().filter(|v| v.name == name);
    let var = matching.next().ok_or(DocumentError::MissingVariable(name))?;
    if matching.next().is_some() {
        return Err(DocumentError::DuplicateVariable(name));
    }
    Ok(var.value.as_str())
}
