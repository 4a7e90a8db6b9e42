//! Request and response bodies of the API under test.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier assigned by the API.
///
/// The API returns database ids as JSON numbers, but some endpoints hand back strings; both are
/// kept as received so they can be echoed back verbatim (e.g. as `id_cliente`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// Body of every successful create call; only the `id` matters here.
#[derive(Debug, Deserialize)]
pub(crate) struct Created {
    #[serde(default)]
    pub id: Option<EntityId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Credenciales {
    pub correo: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdminPayload {
    pub correo: String,
    pub nombre: String,
    pub telefono: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecuperarPassword {
    pub correo: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientePayload {
    pub correo: String,
    pub nombre: String,
    pub telefono: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EquipoPayload {
    pub marca: String,
    pub modelo: String,
    pub estado: String,
    pub id_cliente: EntityId,
    pub observaciones: String,
    pub tipo: String,
}

/// A maintenance record. Only the identifiers are read; other columns are ignored.
///
/// Identifiers that are missing, null, blank or of another JSON type decode as `None`, so one
/// bad record never costs the rest of the list.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Mantenimiento {
    #[serde(default, deserialize_with = "usable_id")]
    pub id_unico: Option<EntityId>,
    #[serde(default, deserialize_with = "usable_id")]
    pub id_equipo: Option<EntityId>,
}

impl Mantenimiento {
    /// Decodes one list entry. Entries that are not records at all come back with no ids.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

fn usable_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<EntityId>, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(EntityId::deserialize(value)
        .ok()
        .filter(|id| !id.is_empty()))
}
