//! Structured-text codec
//!
//! A record is written as a flat document with exactly the keys `name`,
//! `title`, `subtitle`, `kind` and `delay`, in JSON, YAML or TOML.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{DecodeError, EncodeError, UnknownKindPolicy};
use crate::models::{ProxyKind, ProxyRecord};

/// Document syntax used by [`TextCodec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Json => "json",
            TextFormat::Yaml => "yaml",
            TextFormat::Toml => "toml",
        }
    }

    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<TextFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(TextFormat::Json),
            "yaml" | "yml" => Some(TextFormat::Yaml),
            "toml" => Some(TextFormat::Toml),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ProxyDocumentOut<'a> {
    name: &'a str,
    title: &'a str,
    subtitle: &'a str,
    kind: &'static str,
    delay: i32,
}

impl<'a> From<&'a ProxyRecord> for ProxyDocumentOut<'a> {
    fn from(record: &'a ProxyRecord) -> Self {
        Self {
            name: record.name(),
            title: record.title(),
            subtitle: record.subtitle(),
            kind: record.kind().name(),
            delay: record.delay(),
        }
    }
}

// Fields are optional here so absence can be reported per field.
#[derive(Deserialize)]
struct ProxyDocumentIn {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    delay: i32,
}

#[derive(Serialize)]
struct TomlListOut<'a> {
    proxies: Vec<ProxyDocumentOut<'a>>,
}

#[derive(Deserialize)]
struct TomlListIn {
    #[serde(default)]
    proxies: Vec<ProxyDocumentIn>,
}

/// Encoder/decoder for the text interchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextCodec {
    pub format: TextFormat,
    pub policy: UnknownKindPolicy,
}

impl TextCodec {
    pub fn new(format: TextFormat, policy: UnknownKindPolicy) -> Self {
        Self { format, policy }
    }

    /// Codec that coerces unknown kinds to `ProxyKind::Unknown`
    pub fn lenient(format: TextFormat) -> Self {
        Self::new(format, UnknownKindPolicy::Lenient)
    }

    /// Codec that rejects unknown kinds
    pub fn strict(format: TextFormat) -> Self {
        Self::new(format, UnknownKindPolicy::Strict)
    }

    pub fn encode(&self, record: &ProxyRecord) -> Result<String, EncodeError> {
        let doc = ProxyDocumentOut::from(record);
        match self.format {
            TextFormat::Json => {
                serde_json::to_string(&doc).map_err(|e| EncodeError::Text(e.to_string()))
            }
            TextFormat::Yaml => {
                serde_yaml::to_string(&doc).map_err(|e| EncodeError::Text(e.to_string()))
            }
            TextFormat::Toml => toml::to_string(&doc).map_err(|e| EncodeError::Text(e.to_string())),
        }
    }

    pub fn decode(&self, content: &str) -> Result<ProxyRecord, DecodeError> {
        let doc: ProxyDocumentIn = match self.format {
            TextFormat::Json => serde_json::from_str(content).map_err(malformed)?,
            TextFormat::Yaml => serde_yaml::from_str(content).map_err(malformed)?,
            TextFormat::Toml => toml::from_str(content).map_err(malformed)?,
        };
        self.record_from_document(doc)
    }

    /// Encode several records.
    ///
    /// JSON and YAML produce a top-level sequence. TOML has no top-level
    /// arrays, so records are written as a `[[proxies]]` array of tables.
    pub fn encode_list(&self, records: &[ProxyRecord]) -> Result<String, EncodeError> {
        let docs: Vec<ProxyDocumentOut> = records.iter().map(ProxyDocumentOut::from).collect();
        match self.format {
            TextFormat::Json => {
                serde_json::to_string(&docs).map_err(|e| EncodeError::Text(e.to_string()))
            }
            TextFormat::Yaml => {
                serde_yaml::to_string(&docs).map_err(|e| EncodeError::Text(e.to_string()))
            }
            TextFormat::Toml => toml::to_string(&TomlListOut { proxies: docs })
                .map_err(|e| EncodeError::Text(e.to_string())),
        }
    }

    pub fn decode_list(&self, content: &str) -> Result<Vec<ProxyRecord>, DecodeError> {
        let docs: Vec<ProxyDocumentIn> = match self.format {
            TextFormat::Json => serde_json::from_str(content).map_err(malformed)?,
            TextFormat::Yaml => serde_yaml::from_str(content).map_err(malformed)?,
            TextFormat::Toml => {
                let list: TomlListIn = toml::from_str(content).map_err(malformed)?;
                list.proxies
            }
        };
        debug!("Decoding {} {} records", docs.len(), self.format.as_str());
        docs.into_iter()
            .map(|doc| self.record_from_document(doc))
            .collect()
    }

    fn record_from_document(&self, doc: ProxyDocumentIn) -> Result<ProxyRecord, DecodeError> {
        let name = doc.name.ok_or(DecodeError::MissingField("name"))?;
        let title = doc.title.ok_or(DecodeError::MissingField("title"))?;
        let subtitle = doc.subtitle.ok_or(DecodeError::MissingField("subtitle"))?;
        let kind = self.resolve_kind(&name, doc.kind)?;

        Ok(ProxyRecord::new(name, title, subtitle, kind).with_delay(doc.delay))
    }

    fn resolve_kind(&self, name: &str, tag: Option<String>) -> Result<ProxyKind, DecodeError> {
        let tag = tag.unwrap_or_default();
        if let Some(kind) = ProxyKind::from_name(&tag) {
            return Ok(kind);
        }

        match self.policy {
            UnknownKindPolicy::Lenient => {
                warn!(
                    "Proxy `{}` has unknown kind {:?}, treating it as Unknown",
                    name, tag
                );
                Ok(ProxyKind::Unknown)
            }
            UnknownKindPolicy::Strict => Err(DecodeError::UnknownKind(tag)),
        }
    }
}

fn malformed<E: std::fmt::Display>(err: E) -> DecodeError {
    DecodeError::MalformedEncoding(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProxyRecord {
        ProxyRecord::new("us-west", "US West", "us.example.com", ProxyKind::Hysteria2)
            .with_delay(210)
    }

    #[test]
    fn test_json_exact_fields() {
        let json = TextCodec::default().encode(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"us-west","title":"US West","subtitle":"us.example.com","kind":"Hysteria2","delay":210}"#
        );
    }

    #[test]
    fn test_round_trip_each_format() {
        for format in [TextFormat::Json, TextFormat::Yaml, TextFormat::Toml] {
            let codec = TextCodec::strict(format);
            let text = codec.encode(&sample()).unwrap();
            assert_eq!(codec.decode(&text).unwrap(), sample(), "format {:?}", format);
        }
    }

    #[test]
    fn test_missing_delay_defaults_to_zero() {
        let record = TextCodec::default()
            .decode(r#"{"name":"n","title":"t","subtitle":"s","kind":"Direct"}"#)
            .unwrap();
        assert_eq!(record.delay(), 0);
        assert_eq!(record.kind(), ProxyKind::Direct);
    }

    #[test]
    fn test_missing_kind_follows_policy() {
        let doc = r#"{"name":"n","title":"t","subtitle":"s"}"#;
        let lenient = TextCodec::lenient(TextFormat::Json).decode(doc).unwrap();
        assert_eq!(lenient.kind(), ProxyKind::Unknown);

        let strict = TextCodec::strict(TextFormat::Json).decode(doc);
        assert_eq!(strict, Err(DecodeError::UnknownKind(String::new())));
    }

    #[test]
    fn test_missing_title_and_subtitle() {
        let codec = TextCodec::default();
        assert_eq!(
            codec.decode(r#"{"name":"n","subtitle":"s","kind":"Pass"}"#),
            Err(DecodeError::MissingField("title"))
        );
        assert_eq!(
            codec.decode(r#"{"name":"n","title":"t","kind":"Pass"}"#),
            Err(DecodeError::MissingField("subtitle"))
        );
    }

    #[test]
    fn test_null_name_is_missing() {
        let result = TextCodec::default()
            .decode(r#"{"name":null,"title":"t","subtitle":"s","kind":"Pass"}"#);
        assert_eq!(result, Err(DecodeError::MissingField("name")));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let result = TextCodec::default()
            .decode(r#"{"name":"n","title":"t","subtitle":"s","kind":"Pass","delay":"fast"}"#);
        assert!(matches!(result, Err(DecodeError::MalformedEncoding(_))));
    }

    #[test]
    fn test_extra_keys_ignored() {
        let record = TextCodec::default()
            .decode(r#"{"name":"n","title":"t","subtitle":"s","kind":"Ssh","delay":3,"alive":true}"#)
            .unwrap();
        assert_eq!(record, ProxyRecord::new("n", "t", "s", ProxyKind::Ssh).with_delay(3));
    }

    #[test]
    fn test_toml_list_layout() {
        let codec = TextCodec::lenient(TextFormat::Toml);
        let records = vec![sample(), ProxyRecord::new("GLOBAL", "GLOBAL", "", ProxyKind::Selector)];
        let text = codec.encode_list(&records).unwrap();

        assert!(text.contains("[[proxies]]"));
        assert_eq!(codec.decode_list(&text).unwrap(), records);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TextFormat::from_extension("YML"), Some(TextFormat::Yaml));
        assert_eq!(TextFormat::from_extension("json"), Some(TextFormat::Json));
        assert_eq!(TextFormat::from_extension("ini"), None);
    }
}
