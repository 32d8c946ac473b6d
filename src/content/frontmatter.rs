//! Front-matter parsing

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// Turn a scalar front-matter value into a string.
///
/// TOML datetimes arrive as a single-entry table wrapping the literal.
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(tagged.value),
        Value::Mapping(map) if map.len() == 1 => {
            map.into_iter().next().and_then(|(_, v)| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
        }
        _ => None,
    }
}

/// Deserialize any scalar (string, number, bool, datetime) as an optional string
fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string))
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items.into_iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
    })
}

/// Front-matter of a content file.
///
/// Known keys are typed; everything else is kept in `extra` in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "optional_scalar", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "optional_scalar", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(deserialize_with = "optional_scalar", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    // projects
    #[serde(
        rename = "type",
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_type: Option<String>,
    #[serde(deserialize_with = "optional_scalar", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(deserialize_with = "optional_scalar", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        rename = "githubRepo",
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub github_repo: Option<String>,

    // blogs
    #[serde(deserialize_with = "optional_scalar", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start_matches('\u{feff}');

        if let Some((yaml, body)) = split_fenced(content, "---") {
            return Ok(Self::parse_yaml(yaml, content, body));
        }

        if let Some((front, body)) = split_fenced(content, "+++") {
            let fm: FrontMatter = toml::from_str(front)
                .map_err(|e| anyhow!("Failed to parse TOML front-matter: {}", e))?;
            return Ok((fm, body));
        }

        if let Some((json, body)) = split_fenced(content, ";;;") {
            let fm = Self::parse_json_object(json)?;
            return Ok((fm, body));
        }

        if content.starts_with('{') {
            return Self::parse_leading_json(content);
        }

        // No front-matter found
        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml<'a>(yaml: &str, original: &'a str, body: &'a str) -> (Self, &'a str) {
        if yaml.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml) {
            Ok(fm) => (fm, body),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), original)
            }
        }
    }

    fn parse_json_object(json: &str) -> Result<Self> {
        let json = json.trim();
        if json.is_empty() {
            return Ok(FrontMatter::default());
        }
        // ;;; blocks may omit the surrounding braces
        let fm = if json.starts_with('{') {
            serde_json::from_str(json)
        } else {
            serde_json::from_str(&format!("{{{}}}", json))
        };
        fm.map_err(|e| anyhow!("Failed to parse JSON front-matter: {}", e))
    }

    fn parse_leading_json(content: &str) -> Result<(Self, &str)> {
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<FrontMatter>();
        match stream.next() {
            Some(Ok(fm)) => {
                let remaining = &content[stream.byte_offset()..];
                Ok((fm, remaining.trim_start_matches(['\n', '\r'])))
            }
            Some(Err(e)) => Err(anyhow!("Failed to parse JSON front-matter: {}", e)),
            None => Err(anyhow!("Invalid JSON front-matter")),
        }
    }

    /// Parse the date string for ordering purposes
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Split `fence\n...\nfence\n body` into the block between the fences and the body.
fn split_fenced<'a>(content: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let rest = content.strip_prefix(fence)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == fence {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((front, body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }

    None
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
