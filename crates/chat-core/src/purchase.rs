//! Purchase history rows.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Price of a purchase. The backend sends either a number or a preformatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Default for Amount {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A purchase made by the user. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Product name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub producto: String,

    /// Price paid.
    #[serde(default, deserialize_with = "null_as_default")]
    pub valor: Amount,

    /// Expiry date as sent by the backend.
    #[serde(default, rename = "fechaV", deserialize_with = "null_as_default")]
    pub fecha_v: String,

    /// Status of the purchase.
    #[serde(default, rename = "Estado", deserialize_with = "null_as_default")]
    pub estado: String,
}

/// A `null` cell reads as the field's default, so one incomplete row does
/// not lose the whole table.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_purchase() {
        let rows: Vec<PurchaseRecord> = serde_json::from_str(
            r#"[
                {"producto":"Netflix","valor":15000,"fechaV":"2025-06-30","Estado":"Activo"},
                {"producto":"Spotify","valor":"$9.900","fechaV":"2025-07-01T00:00:00.000Z","Estado":"Vencido"}
            ]"#,
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].producto, "Netflix");
        assert_eq!(rows[0].valor.to_string(), "15000");
        assert_eq!(rows[0].fecha_v, "2025-06-30");
        assert_eq!(rows[1].valor.to_string(), "$9.900");
        assert_eq!(rows[1].estado, "Vencido");
    }

    #[test]
    fn test_missing_fields_default() {
        let row: PurchaseRecord = serde_json::from_str(r#"{"producto":"Max"}"#).unwrap();
        assert_eq!(row.valor, Amount::default());
        assert!(row.estado.is_empty());
    }

    #[test]
    fn test_null_cells_keep_other_rows() {
        let rows: Vec<PurchaseRecord> = serde_json::from_str(
            r#"[
                {"producto":"Netflix","valor":15000,"fechaV":"2025-06-30","Estado":"Activo"},
                {"producto":"Spotify","valor":9900,"fechaV":null,"Estado":"Pendiente"},
                {"producto":null,"valor":null,"fechaV":"2025-08-01","Estado":null}
            ]"#,
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].producto, "Netflix");
        assert_eq!(rows[1].fecha_v, "");
        assert_eq!(rows[1].estado, "Pendiente");
        assert_eq!(rows[2].producto, "");
        assert_eq!(rows[2].valor, Amount::default());
        assert_eq!(rows[2].estado, "");
    }
}
