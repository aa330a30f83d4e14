use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub api_status: String,
    #[schema(example = "ok")]
    pub database_status: String,
}

/// `{data, message, message_code}`; `data` carries the payload of each route.
#[derive(ToSchema)]
pub struct EnvelopeDoc {
    #[schema(example = "Success")]
    pub message: String,
    #[schema(example = "SUCCESS")]
    pub message_code: Option<String>,
}

#[derive(ToSchema)]
pub struct EnterpriseDoc {
    #[schema(example = "68674b8ef6585d5be64e81c3")]
    pub id_empresa: String,
    #[schema(example = "jurídica")]
    pub tipo_cedula: String,
    #[schema(example = "3001234567")]
    pub numero_cedula: String,
    #[schema(example = "Restaurante Ejemplo")]
    pub nombre_empresa: String,
    #[schema(example = "Restaurantes")]
    pub categoria: String,
    #[schema(example = "Calle 123, San José, Costa Rica")]
    pub direccion: String,
    #[schema(example = "info@restaurante.com")]
    pub correo_electronico: String,
    #[schema(example = "+506 8888 8888")]
    pub telefono: String,
    pub foto: Option<String>,
    #[schema(example = "Lunes a Domingo de 11am a 10pm")]
    pub horario: Option<String>,
    #[schema(example = "Restaurante especializado en comida tradicional.")]
    pub informacion_empresa: Option<String>,
}

#[derive(ToSchema)]
pub struct RegisterEnterpriseRequest {
    #[schema(example = "jurídica")]
    pub tipo_cedula: String,
    #[schema(example = "3001234567")]
    pub numero_cedula: String,
    #[schema(example = "Restaurante Ejemplo")]
    pub nombre_empresa: String,
    #[schema(example = "Restaurantes")]
    pub categoria: String,
    #[schema(example = "Calle 123, San José, Costa Rica")]
    pub direccion: String,
    #[schema(example = "info@restaurante.com")]
    pub correo_electronico: String,
    #[schema(example = "+506 8888 8888")]
    pub telefono: String,
    pub foto: Option<String>,
    pub horario: Option<String>,
    pub informacion_empresa: Option<String>,
    #[schema(example = "Passw0rd!")]
    pub contrasena: String,
}

#[derive(ToSchema)]
pub struct UpdateEnterpriseRequest {
    pub tipo_cedula: Option<String>,
    pub numero_cedula: Option<String>,
    pub nombre_empresa: Option<String>,
    #[schema(example = "Hoteles")]
    pub categoria: Option<String>,
    pub direccion: Option<String>,
    pub correo_electronico: Option<String>,
    #[schema(example = "+506 2222 2222")]
    pub telefono: Option<String>,
    pub foto: Option<String>,
    pub horario: Option<String>,
    pub informacion_empresa: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::root,
        crate::routes::health::health,
        crate::routes::enterprise::get_enterprise,
        crate::routes::enterprise::list_enterprises,
        crate::routes::enterprise::list_by_category,
        crate::routes::enterprise::register_enterprise,
        crate::routes::enterprise::update_enterprise,
        crate::routes::enterprise::delete_enterprise,
    ),
    components(
        schemas(
            HealthResponse,
            EnvelopeDoc,
            EnterpriseDoc,
            RegisterEnterpriseRequest,
            UpdateEnterpriseRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "empresas")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/health",
            "/api/v1/EMPRESA_ESPECIFICA/{id}",
            "/api/v1/EMPRESAS",
            "/api/v1/EMPRESA_FILTRO_POR_CATEGORIA/{id_categoria}",
            "/api/v1/REGISTRAR_EMPRESA",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let item = &doc.paths.paths["/api/v1/EMPRESA_ESPECIFICA/{id}"];
        assert_eq!(item.operations.len(), 3);
    }
}
