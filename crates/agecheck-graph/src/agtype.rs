//! The `agtype` graph value, carried opaquely as text.

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueFormat, PgValueRef, Postgres};
use sqlx::{Decode, Encode, Type, TypeInfo};

/// Leading byte of AGE's binary send/recv format.
const AGTYPE_BINARY_VERSION: u8 = 1;

/// An AGE graph value (vertex, edge, path, map, scalar, ...).
///
/// The server's text rendering is kept verbatim, e.g.
/// `{"id": 844424930131969, "label": "Person", "properties": {"name": "Tom"}}::vertex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agtype(String);

impl Agtype {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Build an agtype parameter from a JSON value (maps become Cypher
    /// parameter maps).
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Agtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Type<Postgres> for Agtype {
    fn type_info() -> PgTypeInfo {
        // Resolved by name, so `ag_catalog` must be on the search path.
        PgTypeInfo::with_name("agtype")
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        ty.name().rsplit('.').next() == Some("agtype")
    }
}

impl<'q> Encode<'q, Postgres> for Agtype {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        buf.extend_from_slice(&encode_binary(&self.0));
        Ok(IsNull::No)
    }
}

impl<'r> Decode<'r, Postgres> for Agtype {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        match value.format() {
            PgValueFormat::Binary => decode_binary(value.as_bytes()?).map(Self),
            PgValueFormat::Text => Ok(Self(value.as_str()?.to_owned())),
        }
    }
}

fn encode_binary(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.push(AGTYPE_BINARY_VERSION);
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

fn decode_binary(bytes: &[u8]) -> Result<String, BoxDynError> {
    match bytes.split_first() {
        Some((&AGTYPE_BINARY_VERSION, text)) => Ok(std::str::from_utf8(text)?.to_owned()),
        Some((version, _)) => Err(format!("unsupported agtype binary version {version}").into()),
        None => Err("empty agtype value".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_renders_parameter_map() {
        let params = Agtype::from_json(&serde_json::json!({"name": "Tom"}));
        assert_eq!(params.as_str(), r#"{"name":"Tom"}"#);
    }

    #[test]
    fn from_json_escapes_quotes() {
        let params = Agtype::from_json(&serde_json::json!({"name": "O\"Brien"}));
        assert_eq!(params.as_str(), r#"{"name":"O\"Brien"}"#);
    }

    #[test]
    fn decode_binary_strips_version_byte() {
        let mut wire = vec![AGTYPE_BINARY_VERSION];
        wire.extend_from_slice(br#"{"id": 1, "label": "Person", "properties": {}}::vertex"#);
        let text = decode_binary(&wire).unwrap();
        assert_eq!(text, r#"{"id": 1, "label": "Person", "properties": {}}::vertex"#);
    }

    #[test]
    fn decode_binary_rejects_unknown_version() {
        assert!(decode_binary(&[2, b'1']).is_err());
        assert!(decode_binary(&[]).is_err());
    }

    #[test]
    fn encode_binary_prefixes_version_byte() {
        let text = r#"{"name":"Tom"}"#;
        let wire = encode_binary(text);
        assert_eq!(wire[0], AGTYPE_BINARY_VERSION);
        assert_eq!(wire.len(), text.len() + 1);
        assert_eq!(decode_binary(&wire).unwrap(), text);
    }

    #[test]
    fn compatible_matches_by_name() {
        assert!(Agtype::compatible(&PgTypeInfo::with_name("agtype")));
        assert!(!Agtype::compatible(&PgTypeInfo::with_name("jsonb")));
    }
}
