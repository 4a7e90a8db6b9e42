//! In-memory stand-in for the taller API.
//!
//! Serves the administrator, client, equipment and maintenance endpoints from a store held in
//! memory, records every request it receives and can be told to fail specific calls.
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

pub use axum::http::Method;

pub const SEED_ADMIN_ID: i64 = 1;
pub const SEED_ADMIN_CORREO: &str = "nuevo_correo@ejemplo.com";
pub const SEED_ADMIN_PASSWORD: &str = "nueva_password";

type Reply = (StatusCode, Json<Value>);

/// Calls the service should fail on purpose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Faults {
    /// `DELETE /api/cliente/{id}` answers 500.
    pub fail_cliente_delete: bool,
    /// Create calls answer 201 without an `id`.
    pub omit_created_id: bool,
    /// `GET /api/mantenimiento` answers 500.
    pub fail_mantenimiento_list: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct Admin {
    correo: String,
    nombre: String,
    telefono: String,
    password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct Cliente {
    correo: String,
    nombre: String,
    telefono: String,
}

/// Ids arrive as JSON numbers or numeric strings.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum AnyId {
    Number(i64),
    Text(String),
}

impl AnyId {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(id) => Some(*id),
            Self::Text(id) => id.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct EquipoBody {
    marca: String,
    modelo: String,
    estado: String,
    id_cliente: AnyId,
    observaciones: String,
    tipo: String,
}

#[derive(Clone, Debug, Serialize)]
struct Equipo {
    marca: String,
    modelo: String,
    estado: String,
    id_cliente: i64,
    observaciones: String,
    tipo: String,
}

#[derive(Debug)]
struct Store {
    admins: BTreeMap<i64, Admin>,
    clientes: BTreeMap<i64, Cliente>,
    equipos: BTreeMap<i64, Equipo>,
    mantenimientos: Vec<Value>,
    cliente_seq: i64,
    equipo_seq: i64,
    faults: Faults,
    requests: Vec<RecordedRequest>,
}

impl Default for Store {
    fn default() -> Self {
        let admin = Admin {
            correo: SEED_ADMIN_CORREO.to_string(),
            nombre: "Administrador".to_string(),
            telefono: "0000000000".to_string(),
            password: SEED_ADMIN_PASSWORD.to_string(),
        };
        Self {
            admins: BTreeMap::from([(SEED_ADMIN_ID, admin)]),
            clientes: BTreeMap::new(),
            equipos: BTreeMap::new(),
            mantenimientos: vec![],
            cliente_seq: 0,
            equipo_seq: 0,
            faults: Faults::default(),
            requests: vec![],
        }
    }
}

/// Handle to one mock API instance. Clones share the same store.
#[derive(Clone, Debug, Default)]
pub struct MockService {
    store: Arc<RwLock<Store>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds maintenance records as `(id_unico, id_equipo)` pairs.
    pub fn with_mantenimientos<I: IntoIterator<Item = (i64, i64)>>(self, records: I) -> Self {
        self.with_raw_mantenimientos(records.into_iter().map(|(id_unico, id_equipo)| {
            json!({
                "id_unico": id_unico,
                "id_equipo": id_equipo,
                "descripcion": format!("Revisión {id_unico}"),
            })
        }))
    }

    /// Seeds maintenance records served exactly as given, malformed ones included.
    pub fn with_raw_mantenimientos<I: IntoIterator<Item = Value>>(self, records: I) -> Self {
        self.write().mantenimientos.extend(records);
        self
    }

    pub fn set_faults(&self, faults: Faults) {
        self.write().faults = faults;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.read().requests.clone()
    }

    /// Requests with `method` whose path starts with `prefix`.
    pub fn count(&self, method: Method, prefix: &str) -> usize {
        self.read()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .count()
    }

    pub fn cliente_ids(&self) -> Vec<i64> {
        self.read().clientes.keys().copied().collect()
    }

    pub fn equipo_ids(&self) -> Vec<i64> {
        self.read().equipos.keys().copied().collect()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/admin/login", post(login))
            .route("/api/admin/recuperar-password", post(recuperar_password))
            .route("/api/admin/:id", put(actualizar_admin))
            .route("/api/cliente", post(crear_cliente))
            .route(
                "/api/cliente/:id",
                get(detalle_cliente)
                    .put(actualizar_cliente)
                    .delete(eliminar_cliente),
            )
            .route("/api/clientes", get(listar_clientes))
            .route("/api/equipo", post(crear_equipo))
            .route(
                "/api/equipo/:id",
                get(detalle_equipo)
                    .put(actualizar_equipo)
                    .delete(eliminar_equipo),
            )
            .route("/api/mantenimiento", get(listar_mantenimientos))
            .route("/api/mantenimiento/:id", get(mantenimiento_por_id))
            .route(
                "/api/mantenimiento/equipo/:id",
                get(mantenimientos_por_equipo),
            )
            .layer(middleware::from_fn_with_state(self.clone(), log_request))
            .layer(TraceLayer::new_for_http())
            .with_state(self.clone())
    }

    /// Serves on an ephemeral localhost port in the background.
    pub async fn spawn(&self) -> std::io::Result<SocketAddr> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = self.router();

        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                error!("Mock service stopped: {err}");
            }
        });

        debug!("Mock service listening on {addr}");
        Ok(addr)
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

pub async fn run(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Mock service listening on {addr}");
    axum::serve(listener, MockService::new().router()).await
}

async fn log_request(State(svc): State<MockService>, req: Request, next: Next) -> Response {
    counter!("mock_service_requests", "method" => req.method().to_string()).increment(1);
    svc.write().requests.push(RecordedRequest {
        method: req.method().clone(),
        path: req.uri().path().to_string(),
    });
    next.run(req).await
}

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn msg(status: StatusCode, msg: &str) -> Reply {
    reply(status, json!({ "msg": msg }))
}

fn with_id<T: Serialize>(id: i64, record: &T) -> Value {
    let mut value = serde_json::to_value(record).unwrap_or_else(|_| json!({}));
    if let Value::Object(fields) = &mut value {
        fields.insert("id".to_string(), json!(id));
    }
    value
}

/* Administrador */

#[derive(Deserialize)]
struct Credenciales {
    correo: String,
    password: String,
}

#[derive(Deserialize)]
struct Recuperacion {
    correo: String,
}

async fn login(State(svc): State<MockService>, Json(body): Json<Credenciales>) -> Reply {
    let store = svc.read();
    match store.admins.iter().find(|(_, a)| a.correo == body.correo) {
        Some((id, admin)) if admin.password == body.password => {
            reply(StatusCode::OK, json!({ "msg": "Login exitoso", "id": id }))
        }
        Some(_) => msg(StatusCode::UNAUTHORIZED, "Contraseña incorrecta"),
        None => msg(StatusCode::NOT_FOUND, "Administrador no encontrado"),
    }
}

async fn actualizar_admin(
    State(svc): State<MockService>,
    Path(id): Path<String>,
    Json(body): Json<Admin>,
) -> Reply {
    let mut store = svc.write();
    match id.parse::<i64>().ok().and_then(|id| store.admins.get_mut(&id)) {
        Some(admin) => {
            *admin = body;
            msg(StatusCode::OK, "Administrador actualizado")
        }
        None => msg(StatusCode::NOT_FOUND, "Administrador no encontrado"),
    }
}

async fn recuperar_password(
    State(svc): State<MockService>,
    Json(body): Json<Recuperacion>,
) -> Reply {
    let store = svc.read();
    if store.admins.values().any(|a| a.correo == body.correo) {
        msg(StatusCode::OK, "Correo de recuperación enviado")
    } else {
        msg(StatusCode::NOT_FOUND, "Administrador no encontrado")
    }
}

/* Cliente */

async fn crear_cliente(State(svc): State<MockService>, Json(body): Json<Cliente>) -> Reply {
    let mut store = svc.write();
    if store.clientes.values().any(|c| c.correo == body.correo) {
        return msg(StatusCode::BAD_REQUEST, "El correo ya está registrado");
    }

    store.cliente_seq += 1;
    let id = store.cliente_seq;
    let created = with_id(id, &body);
    store.clientes.insert(id, body);

    if store.faults.omit_created_id {
        msg(StatusCode::CREATED, "Registro exitoso")
    } else {
        reply(StatusCode::CREATED, created)
    }
}

async fn detalle_cliente(State(svc): State<MockService>, Path(id): Path<String>) -> Reply {
    let store = svc.read();
    match id.parse::<i64>().ok().and_then(|id| store.clientes.get(&id).map(|c| (id, c))) {
        Some((id, cliente)) => reply(StatusCode::OK, with_id(id, cliente)),
        None => msg(StatusCode::NOT_FOUND, "Cliente no encontrado"),
    }
}

async fn actualizar_cliente(
    State(svc): State<MockService>,
    Path(id): Path<String>,
    Json(body): Json<Cliente>,
) -> Reply {
    let mut store = svc.write();
    match id.parse::<i64>().ok().and_then(|id| store.clientes.get_mut(&id)) {
        Some(cliente) => {
            *cliente = body;
            msg(StatusCode::OK, "Cliente actualizado")
        }
        None => msg(StatusCode::NOT_FOUND, "Cliente no encontrado"),
    }
}

async fn eliminar_cliente(State(svc): State<MockService>, Path(id): Path<String>) -> Reply {
    let mut store = svc.write();
    if store.faults.fail_cliente_delete {
        return msg(StatusCode::INTERNAL_SERVER_ERROR, "Error al eliminar el cliente");
    }

    let Some(id) = id.parse::<i64>().ok().filter(|id| store.clientes.contains_key(id)) else {
        return msg(StatusCode::NOT_FOUND, "Cliente no encontrado");
    };
    if store.equipos.values().any(|e| e.id_cliente == id) {
        return msg(StatusCode::BAD_REQUEST, "El cliente tiene equipos asignados");
    }

    store.clientes.remove(&id);
    msg(StatusCode::OK, "Cliente eliminado")
}

async fn listar_clientes(State(svc): State<MockService>) -> Reply {
    let store = svc.read();
    let clientes: Vec<Value> = store
        .clientes
        .iter()
        .map(|(id, cliente)| with_id(*id, cliente))
        .collect();
    reply(StatusCode::OK, Value::Array(clientes))
}

/* Equipo */

fn equipo_from(body: EquipoBody, store: &Store) -> Result<Equipo, Reply> {
    let id_cliente = body
        .id_cliente
        .as_i64()
        .filter(|id| store.clientes.contains_key(id))
        .ok_or_else(|| msg(StatusCode::NOT_FOUND, "Cliente no encontrado"))?;

    Ok(Equipo {
        marca: body.marca,
        modelo: body.modelo,
        estado: body.estado,
        id_cliente,
        observaciones: body.observaciones,
        tipo: body.tipo,
    })
}

async fn crear_equipo(State(svc): State<MockService>, Json(body): Json<EquipoBody>) -> Reply {
    let mut store = svc.write();
    let equipo = match equipo_from(body, &store) {
        Ok(equipo) => equipo,
        Err(reply) => return reply,
    };

    store.equipo_seq += 1;
    let id = store.equipo_seq;
    let created = with_id(id, &equipo);
    store.equipos.insert(id, equipo);

    if store.faults.omit_created_id {
        msg(StatusCode::CREATED, "Registro exitoso")
    } else {
        reply(StatusCode::CREATED, created)
    }
}

async fn detalle_equipo(State(svc): State<MockService>, Path(id): Path<String>) -> Reply {
    let store = svc.read();
    match id.parse::<i64>().ok().and_then(|id| store.equipos.get(&id).map(|e| (id, e))) {
        Some((id, equipo)) => reply(StatusCode::OK, with_id(id, equipo)),
        None => msg(StatusCode::NOT_FOUND, "Equipo no encontrado"),
    }
}

async fn actualizar_equipo(
    State(svc): State<MockService>,
    Path(id): Path<String>,
    Json(body): Json<EquipoBody>,
) -> Reply {
    let mut store = svc.write();
    let Some(id) = id.parse::<i64>().ok().filter(|id| store.equipos.contains_key(id)) else {
        return msg(StatusCode::NOT_FOUND, "Equipo no encontrado");
    };
    let equipo = match equipo_from(body, &store) {
        Ok(equipo) => equipo,
        Err(reply) => return reply,
    };

    store.equipos.insert(id, equipo);
    msg(StatusCode::OK, "Equipo actualizado")
}

async fn eliminar_equipo(State(svc): State<MockService>, Path(id): Path<String>) -> Reply {
    let mut store = svc.write();
    match id.parse::<i64>().ok().and_then(|id| store.equipos.remove(&id)) {
        Some(_) => msg(StatusCode::OK, "Equipo eliminado"),
        None => msg(StatusCode::NOT_FOUND, "Equipo no encontrado"),
    }
}

/* Mantenimiento */

async fn listar_mantenimientos(State(svc): State<MockService>) -> Reply {
    let store = svc.read();
    if store.faults.fail_mantenimiento_list {
        return msg(StatusCode::INTERNAL_SERVER_ERROR, "Error al obtener los mantenimientos");
    }
    reply(StatusCode::OK, json!(store.mantenimientos))
}

/// Whether `record[field]` renders as `id`, for numeric and text ids alike.
fn id_matches(record: &Value, field: &str, id: &str) -> bool {
    match record.get(field) {
        Some(Value::Number(n)) => n.to_string() == id,
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

async fn mantenimiento_por_id(State(svc): State<MockService>, Path(id): Path<String>) -> Reply {
    let store = svc.read();
    match store
        .mantenimientos
        .iter()
        .find(|m| id_matches(m, "id_unico", &id))
    {
        Some(mantenimiento) => reply(StatusCode::OK, mantenimiento.clone()),
        None => msg(StatusCode::NOT_FOUND, "Mantenimiento no encontrado"),
    }
}

async fn mantenimientos_por_equipo(
    State(svc): State<MockService>,
    Path(id): Path<String>,
) -> Reply {
    let store = svc.read();
    let registros: Vec<Value> = store
        .mantenimientos
        .iter()
        .filter(|m| id_matches(m, "id_equipo", &id))
        .cloned()
        .collect();

    if registros.is_empty() {
        msg(StatusCode::NOT_FOUND, "No hay mantenimientos para el equipo")
    } else {
        reply(StatusCode::OK, Value::Array(registros))
    }
}
