use std::fmt;

use mongodb::bson::{self, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::errors::ModelError;

/// Kind of legal identification held by the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalIdType {
    #[serde(rename = "física")]
    Fisica,
    #[serde(rename = "jurídica")]
    Juridica,
}

/// Enterprise document as stored in the `Enterprise` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enterprise {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tipo_cedula: LegalIdType,
    pub numero_cedula: String,
    pub nombre_empresa: String,
    pub categoria: String,
    pub direccion: String,
    pub correo_electronico: String,
    pub telefono: String,
    #[serde(default)]
    pub foto: Option<String>,
    #[serde(default)]
    pub horario: Option<String>,
    #[serde(default)]
    pub informacion_empresa: Option<String>,
    #[serde(default)]
    pub contrasena_hash: String,
}

impl Enterprise {
    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }

    pub fn from_document(doc: Document) -> Result<Self, bson::de::Error> {
        bson::from_document(doc)
    }
}

/// Public shape of an enterprise; never carries the credential hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseView {
    pub id_empresa: String,
    pub tipo_cedula: LegalIdType,
    pub numero_cedula: String,
    pub nombre_empresa: String,
    pub categoria: String,
    pub direccion: String,
    pub correo_electronico: String,
    pub telefono: String,
    pub foto: Option<String>,
    pub horario: Option<String>,
    pub informacion_empresa: Option<String>,
}

impl From<Enterprise> for EnterpriseView {
    fn from(e: Enterprise) -> Self {
        Self {
            id_empresa: e.id.map(|id| id.to_hex()).unwrap_or_default(),
            tipo_cedula: e.tipo_cedula,
            numero_cedula: e.numero_cedula,
            nombre_empresa: e.nombre_empresa,
            categoria: e.categoria,
            direccion: e.direccion,
            correo_electronico: e.correo_electronico,
            telefono: e.telefono,
            foto: e.foto,
            horario: e.horario,
            informacion_empresa: e.informacion_empresa,
        }
    }
}

/// Registration request. `contrasena` is only held long enough to be hashed.
#[derive(Clone, Deserialize)]
pub struct NewEnterprise {
    pub tipo_cedula: LegalIdType,
    pub numero_cedula: String,
    pub nombre_empresa: String,
    pub categoria: String,
    pub direccion: String,
    pub correo_electronico: String,
    pub telefono: String,
    #[serde(default)]
    pub foto: Option<String>,
    #[serde(default)]
    pub horario: Option<String>,
    #[serde(default)]
    pub informacion_empresa: Option<String>,
    pub contrasena: String,
}

pub const MIN_CREDENTIAL_LEN: usize = 8;

impl fmt::Debug for NewEnterprise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewEnterprise")
            .field("tipo_cedula", &self.tipo_cedula)
            .field("numero_cedula", &self.numero_cedula)
            .field("nombre_empresa", &self.nombre_empresa)
            .field("categoria", &self.categoria)
            .field("contrasena", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn require(value: &str, field: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("El campo '{field}' es obligatorio.")));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ModelError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ModelError::Validation("El correo electrónico no es válido.".into())),
    }
}

impl NewEnterprise {
    pub fn validate(&self) -> Result<(), ModelError> {
        require(&self.numero_cedula, "numero_cedula")?;
        require(&self.nombre_empresa, "nombre_empresa")?;
        require(&self.categoria, "categoria")?;
        require(&self.direccion, "direccion")?;
        require(&self.telefono, "telefono")?;
        validate_email(&self.correo_electronico)?;
        if self.contrasena.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(ModelError::Validation(format!(
                "La contraseña debe tener al menos {MIN_CREDENTIAL_LEN} caracteres."
            )));
        }
        Ok(())
    }

    /// Consume the request into a storable document; the store assigns `_id`.
    pub fn into_enterprise(self, contrasena_hash: String) -> Enterprise {
        Enterprise {
            id: None,
            tipo_cedula: self.tipo_cedula,
            numero_cedula: self.numero_cedula,
            nombre_empresa: self.nombre_empresa,
            categoria: self.categoria,
            direccion: self.direccion,
            correo_electronico: self.correo_electronico,
            telefono: self.telefono,
            foto: self.foto,
            horario: self.horario,
            informacion_empresa: self.informacion_empresa,
            contrasena_hash,
        }
    }
}

/// Partial update of public fields. Unknown fields are rejected so that
/// `_id` and the credential hash cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnterprisePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_cedula: Option<LegalIdType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_cedula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre_empresa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correo_electronico: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub informacion_empresa: Option<String>,
}

impl EnterprisePatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        let required = [
            (&self.numero_cedula, "numero_cedula"),
            (&self.nombre_empresa, "nombre_empresa"),
            (&self.direccion, "direccion"),
            (&self.telefono, "telefono"),
        ];
        for (value, field) in required {
            if let Some(v) = value {
                require(v, field)?;
            }
        }
        if let Some(email) = &self.correo_electronico {
            validate_email(email)?;
        }
        if let Some(categoria) = &self.categoria {
            if Category::from_display_name(categoria).is_none() {
                return Err(ModelError::Validation(format!(
                    "La categoría '{categoria}' no es válida. Use: {}",
                    Category::valid_options()
                )));
            }
        }
        Ok(())
    }

    /// Field set for a `$set` merge; only the fields present in the patch.
    pub fn to_set_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }
}
