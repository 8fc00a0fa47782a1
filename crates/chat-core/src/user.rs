//! The signed-in user.

use serde::{Deserialize, Deserializer, Serialize};

/// A user as stored in the persisted identity record.
///
/// Field names follow the record the marketplace entry view writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier. Some records carry it as a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// Display name.
    #[serde(default, deserialize_with = "string_or_number")]
    pub nombre: String,

    /// Email address.
    #[serde(default, deserialize_with = "string_or_number")]
    pub correo: String,

    /// Mobile phone number. Often stored as a bare number.
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub numero_celular: Option<String>,

    /// City.
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ciudad: Option<String>,
}

impl User {
    /// Create a user with the required fields.
    pub fn new(id: impl Into<String>, nombre: impl Into<String>, correo: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
            correo: correo.into(),
            ..Default::default()
        }
    }

    /// The key used to address this user on the backend.
    ///
    /// The id when present, otherwise the email. `None` when both are blank.
    pub fn user_key(&self) -> Option<&str> {
        [self.id.trim(), self.correo.trim()]
            .into_iter()
            .find(|key| !key.is_empty())
    }
}

/// A scalar field as the entry view may have written it.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null(()),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null(()) => None,
        }
    }
}

/// Strings, numbers and booleans as text; `null` as an empty string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.into_text().unwrap_or_default())
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.into_text())
}
