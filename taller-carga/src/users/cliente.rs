use super::default_rng;
use crate::api::ApiClient;
use crate::cache::IdCache;
use crate::ids::generate_unique_email_with;
use crate::model::{ClientePayload, EntityId};
use carga::prelude::*;
use rand::rngs::SmallRng;
use tracing::{info, warn};

/// Clients each user registers before its first task.
pub const INITIAL_CLIENTES: usize = 4;

const NOMBRE: &str = "Nombre Cliente";
const TELEFONO: &str = "1234567890";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClienteTask {
    /// Create, read, update, list and delete, in that order.
    EjecutarTareas,
}

/// Client CRUD traffic.
///
/// Starts by registering [`INITIAL_CLIENTES`] clients, works on the ids it got back, and deletes
/// whatever is left when it stops.
#[derive(Debug)]
pub struct ClienteUser {
    api: ApiClient,
    clientes: IdCache,
    rng: SmallRng,
}

impl ClienteUser {
    pub fn new(api: ApiClient) -> Self {
        Self::with_rng(api, default_rng())
    }

    pub fn with_rng(api: ApiClient, rng: SmallRng) -> Self {
        Self {
            api,
            clientes: IdCache::new(),
            rng,
        }
    }

    pub fn clientes(&self) -> &IdCache {
        &self.clientes
    }

    pub async fn generar_clientes(&mut self) {
        for _ in 0..INITIAL_CLIENTES {
            self.registrar_cliente().await;
        }
    }

    /// Registers a client with a fresh email and caches its id.
    pub async fn registrar_cliente(&mut self) -> Option<EntityId> {
        let payload = ClientePayload {
            correo: generate_unique_email_with(&mut self.rng),
            nombre: NOMBRE.to_string(),
            telefono: TELEFONO.to_string(),
        };

        match self.api.crear_cliente(&payload).await {
            Ok(id) => {
                info!("Client registered with id {id}");
                self.clientes.push(id.clone());
                Some(id)
            }
            Err(err) => {
                warn!("Client registration failed: {err}");
                None
            }
        }
    }

    pub async fn detalle_cliente(&mut self) {
        let Some(id) = self.clientes.choose(&mut self.rng) else {
            info!("No clients registered to fetch details for");
            return;
        };

        match self.api.detalle_cliente(&id).await {
            Ok(_) => info!("Fetched details of client {id}"),
            Err(err) => warn!("Fetching client {id} failed: {err}"),
        }
    }

    pub async fn actualizar_cliente(&mut self) {
        let Some(id) = self.clientes.choose(&mut self.rng) else {
            info!("No clients registered to update");
            return;
        };

        let payload = ClientePayload {
            correo: "actualizado_cliente@ejemplo.com".to_string(),
            nombre: "Nombre Actualizado".to_string(),
            telefono: "0987654321".to_string(),
        };
        match self.api.actualizar_cliente(&id, &payload).await {
            Ok(_) => info!("Client {id} updated"),
            Err(err) => warn!("Updating client {id} failed: {err}"),
        }
    }

    pub async fn listar_clientes(&self) {
        match self.api.listar_clientes().await {
            Ok(_) => info!("Listed clients"),
            Err(err) => warn!("Listing clients failed: {err}"),
        }
    }

    pub async fn eliminar_cliente(&mut self) {
        let Some(id) = self.clientes.choose(&mut self.rng) else {
            info!("No clients registered to delete");
            return;
        };

        match self.api.eliminar_cliente(&id).await {
            Ok(_) => {
                self.clientes.remove(&id);
                info!("Client {id} deleted");
            }
            Err(err) => warn!("Deleting client {id} failed: {err}"),
        }
    }

    /// Deletes every cached client. Failures are logged and skipped; the cache ends up empty
    /// either way.
    pub async fn limpiar_clientes(&mut self) {
        if self.clientes.is_empty() {
            info!("No clients registered to clean up");
            return;
        }

        for id in self.clientes.take() {
            match self.api.eliminar_cliente(&id).await {
                Ok(_) => info!("Client {id} deleted"),
                Err(err) => warn!("Deleting client {id} failed: {err}"),
            }
        }
        info!("All clients cleaned up");
    }
}

impl User for ClienteUser {
    type Task = ClienteTask;

    const TASKS: &'static [(ClienteTask, u32)] = &[(ClienteTask::EjecutarTareas, 1)];

    const WAIT_TIME: WaitTime = WaitTime::between_secs(1, 40);

    async fn on_start(&mut self) {
        self.generar_clientes().await;
    }

    async fn run(&mut self, task: ClienteTask) {
        match task {
            ClienteTask::EjecutarTareas => {
                self.registrar_cliente().await;
                self.detalle_cliente().await;
                self.actualizar_cliente().await;
                self.listar_clientes().await;
                self.eliminar_cliente().await;
            }
        }
    }

    async fn on_stop(&mut self) {
        self.limpiar_clientes().await;
    }
}
