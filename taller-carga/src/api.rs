//! Typed client for the endpoints under load.
//!
//! Every endpoint call is a `#[transaction]`. The API answers 200 on success, and creates may
//! answer 201 instead. Any other status comes back as [`ApiError::Status`] and is counted as an
//! error in the run statistics.
use crate::model::{
    AdminPayload, ClientePayload, Created, Credenciales, EntityId, EquipoPayload, Mantenimiento,
    RecuperarPassword,
};
use carga::transaction;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Statuses accepted from reads, updates and deletes.
const ANSWERED: &[StatusCode] = &[StatusCode::OK];
/// Statuses accepted from creates.
const CREATED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED];
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body ({source}): {body}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },

    #[error("no id in response: {body}")]
    MissingId { body: String },

    #[error("invalid path {path}: {source}")]
    Url {
        path: String,
        source: url::ParseError,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// A response carrying one of the statuses the call accepts.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|source| ApiError::Decode {
            source,
            body: self.body.clone(),
        })
    }

    fn created_id(&self) -> Result<EntityId, ApiError> {
        let created: Created = self.json()?;
        match created.id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ApiError::MissingId {
                body: self.body.clone(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(host: Url) -> Self {
        Self::with_client(Client::new(), host)
    }

    pub fn with_client(http: Client, mut base: Url) -> Self {
        // Paths are joined relative to the base, which only works on a directory-like URL.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { http, base }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|source| ApiError::Url {
            path: path.to_string(),
            source,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse, ApiError> {
        self.send_accepting(request, ANSWERED).await
    }

    async fn send_accepting(
        &self,
        request: RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<ApiResponse, ApiError> {
        let res = request.send().await?;
        let status = res.status();
        let body = res.text().await?;
        accept(status, body, accepted)
    }

    /* Administrador */

    #[transaction]
    pub async fn login_admin(&self, body: &Credenciales) -> Result<ApiResponse, ApiError> {
        let url = self.url("api/admin/login")?;
        self.send(self.http.post(url).json(body)).await
    }

    #[transaction]
    pub async fn actualizar_admin(
        &self,
        id: &str,
        body: &AdminPayload,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/admin/{id}"))?;
        self.send(self.http.put(url).json(body)).await
    }

    #[transaction]
    pub async fn recuperar_password(
        &self,
        body: &RecuperarPassword,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url("api/admin/recuperar-password")?;
        self.send(self.http.post(url).json(body)).await
    }

    /* Cliente */

    #[transaction]
    pub async fn crear_cliente(&self, body: &ClientePayload) -> Result<EntityId, ApiError> {
        let url = self.url("api/cliente")?;
        self.send_accepting(self.http.post(url).json(body), CREATED)
            .await?
            .created_id()
    }

    #[transaction]
    pub async fn detalle_cliente(&self, id: &EntityId) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/cliente/{id}"))?;
        self.send(self.http.get(url)).await
    }

    #[transaction]
    pub async fn actualizar_cliente(
        &self,
        id: &EntityId,
        body: &ClientePayload,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/cliente/{id}"))?;
        self.send(self.http.put(url).json(body)).await
    }

    #[transaction]
    pub async fn eliminar_cliente(&self, id: &EntityId) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/cliente/{id}"))?;
        self.send(self.http.delete(url)).await
    }

    #[transaction]
    pub async fn listar_clientes(&self) -> Result<ApiResponse, ApiError> {
        let url = self.url("api/clientes")?;
        self.send(self.http.get(url)).await
    }

    /* Equipo */

    #[transaction]
    pub async fn crear_equipo(&self, body: &EquipoPayload) -> Result<EntityId, ApiError> {
        let url = self.url("api/equipo")?;
        self.send_accepting(self.http.post(url).json(body), CREATED)
            .await?
            .created_id()
    }

    #[transaction]
    pub async fn actualizar_equipo(
        &self,
        id: &EntityId,
        body: &EquipoPayload,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/equipo/{id}"))?;
        self.send(self.http.put(url).json(body)).await
    }

    #[transaction]
    pub async fn detalle_equipo(&self, id: &EntityId) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/equipo/{id}"))?;
        self.send(self.http.get(url)).await
    }

    #[transaction]
    pub async fn eliminar_equipo(&self, id: &EntityId) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/equipo/{id}"))?;
        self.send(self.http.delete(url)).await
    }

    /* Mantenimiento */

    #[transaction]
    pub async fn listar_mantenimientos(&self) -> Result<Vec<Mantenimiento>, ApiError> {
        let url = self.url("api/mantenimiento")?;
        let registros: Vec<serde_json::Value> = self.send(self.http.get(url)).await?.json()?;
        Ok(registros.into_iter().map(Mantenimiento::from_value).collect())
    }

    #[transaction]
    pub async fn mantenimiento_por_id(&self, id_unico: &EntityId) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/mantenimiento/{id_unico}"))?;
        self.send(self.http.get(url)).await
    }

    #[transaction]
    pub async fn mantenimientos_por_equipo(
        &self,
        id_equipo: &EntityId,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(&format!("api/mantenimiento/equipo/{id_equipo}"))?;
        self.send(self.http.get(url)).await
    }
}

fn accept(
    status: StatusCode,
    body: String,
    accepted: &[StatusCode],
) -> Result<ApiResponse, ApiError> {
    if accepted.contains(&status) {
        Ok(ApiResponse { status, body })
    } else {
        Err(ApiError::Status { status, body })
    }
}
