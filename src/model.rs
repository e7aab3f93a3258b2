//! Typed record tree for `resume_data.yaml`.
//!
//! Every field has a default so partial data always loads. Absent keys and
//! explicit nulls collapse to empty text, empty lists, or zero; scalar text
//! fields accept numbers and booleans in their textual form.
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResumeData {
    #[serde(deserialize_with = "nullable")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "nullable")]
    pub about: About,
    #[serde(deserialize_with = "nullable")]
    pub experience: Experience,
    #[serde(deserialize_with = "nullable")]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub email: String,
    #[serde(deserialize_with = "text")]
    pub phone: String,
    #[serde(deserialize_with = "text")]
    pub location: String,
    #[serde(deserialize_with = "nullable")]
    pub social: Social,
}

/// Social links; only the GitHub entry drives behavior.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Social {
    #[serde(deserialize_with = "text")]
    pub github: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct About {
    #[serde(deserialize_with = "text")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "nullable")]
    pub corporate: Vec<Company>,
    #[serde(deserialize_with = "nullable")]
    pub other: Vec<OtherItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Company {
    #[serde(deserialize_with = "text")]
    pub company: String,
    #[serde(deserialize_with = "nullable")]
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Position {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub duration: String,
    #[serde(deserialize_with = "text")]
    pub location: String,
    /// Employment type, e.g. "Full-time".
    #[serde(rename = "type", deserialize_with = "text")]
    pub kind: String,
    #[serde(deserialize_with = "text_list")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    pub daily_stack: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OtherItem {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub organization: String,
    #[serde(deserialize_with = "text")]
    pub duration: String,
    #[serde(rename = "type", deserialize_with = "text")]
    pub kind: String,
    #[serde(deserialize_with = "text_list")]
    pub key_learnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub language: String,
    #[serde(deserialize_with = "count")]
    pub stars: u64,
    #[serde(deserialize_with = "text")]
    pub url: String,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "text_list")]
    pub topics: Vec<String>,
}

impl ResumeData {
    /// GitHub identifier from `personal_info.social.github`, if non-blank.
    pub fn github_identifier(&self) -> Option<&str> {
        let github = self.personal_info.social.github.trim();
        (!github.is_empty()).then_some(github)
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).unwrap_or_default())
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.iter().filter_map(scalar_text).collect())
}

fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Textual form of a YAML scalar; `None` for null, sequences, and mappings.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
