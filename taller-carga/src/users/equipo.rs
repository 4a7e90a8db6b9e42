use super::default_rng;
use crate::api::ApiClient;
use crate::cache::IdCache;
use crate::ids::{generate_equipo_id_with, generate_unique_email_with};
use crate::model::{ClientePayload, EntityId, EquipoPayload};
use carga::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{info, warn};

const CLIENTES_POR_RONDA: usize = 4;
const TIPO: &str = "laptop";

/// Upper bound of the made-up client id used when no client is cached.
const MAX_FALLBACK_CLIENTE_ID: i64 = 50;

/// Phase the equipment user runs on its next invocation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    CrearClientes,
    AsignarEquipos,
    ActualizarEquipo,
    DetalleEquipo,
    EliminarEquipo,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::CrearClientes,
        Step::AsignarEquipos,
        Step::ActualizarEquipo,
        Step::DetalleEquipo,
        Step::EliminarEquipo,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The following phase, wrapping after the last one.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EquipoTask {
    /// Run the current [`Step`] and advance.
    EjecutarTareas,
}

/// Equipment traffic, one phase per invocation.
///
/// Client ids and equipment ids are cached separately. Equipment is always registered as a
/// laptop.
#[derive(Debug)]
pub struct EquipoUser {
    api: ApiClient,
    clientes: IdCache,
    equipos: IdCache,
    step: Step,
    rng: SmallRng,
}

impl EquipoUser {
    pub fn new(api: ApiClient) -> Self {
        Self::with_rng(api, default_rng())
    }

    pub fn with_rng(api: ApiClient, rng: SmallRng) -> Self {
        Self {
            api,
            clientes: IdCache::new(),
            equipos: IdCache::new(),
            step: Step::default(),
            rng,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn clientes(&self) -> &IdCache {
        &self.clientes
    }

    pub fn equipos(&self) -> &IdCache {
        &self.equipos
    }

    /// Runs the current phase, then moves to the next one whatever the outcome.
    pub async fn ejecutar_tareas(&mut self) {
        let step = self.step;
        match step {
            Step::CrearClientes => self.generar_clientes().await,
            Step::AsignarEquipos => self.asignar_equipos().await,
            Step::ActualizarEquipo => self.actualizar_equipo().await,
            Step::DetalleEquipo => self.detalle_equipo().await,
            Step::EliminarEquipo => self.eliminar_equipo().await,
        }
        self.step = step.next();
    }

    async fn generar_clientes(&mut self) {
        for _ in 0..CLIENTES_POR_RONDA {
            let payload = ClientePayload {
                correo: generate_unique_email_with(&mut self.rng),
                nombre: "Cliente Prueba".to_string(),
                telefono: "1234567891".to_string(),
            };

            match self.api.crear_cliente(&payload).await {
                Ok(id) => {
                    info!("Client registered with id {id}");
                    self.clientes.push(id);
                }
                Err(err) => warn!("Client registration failed: {err}"),
            }
        }
    }

    async fn asignar_equipos(&mut self) {
        if self.clientes.is_empty() {
            info!("No clients generated to assign equipment to");
            return;
        }

        let clientes: Vec<EntityId> = self.clientes.iter().cloned().collect();
        for id_cliente in clientes {
            // The API assigns the real id; the local code only tags the log line.
            let codigo = generate_equipo_id_with(&mut self.rng, TIPO);
            let payload = EquipoPayload {
                marca: "Lenovo".to_string(),
                modelo: "ThinkPad".to_string(),
                estado: "Nuevo".to_string(),
                id_cliente: id_cliente.clone(),
                observaciones: "Sin observaciones".to_string(),
                tipo: TIPO.to_string(),
            };

            match self.api.crear_equipo(&payload).await {
                Ok(id) => {
                    info!("Equipment {codigo} registered for client {id_cliente} with id {id}");
                    self.equipos.push(id);
                }
                Err(err) => warn!("Equipment {codigo} registration for client {id_cliente} failed: {err}"),
            }
        }
    }

    async fn actualizar_equipo(&mut self) {
        let Some(id) = self.equipos.choose(&mut self.rng) else {
            info!("No equipment registered to update");
            return;
        };

        let id_cliente = match self.clientes.choose(&mut self.rng) {
            Some(id_cliente) => id_cliente,
            None => EntityId::Number(self.rng.gen_range(1..=MAX_FALLBACK_CLIENTE_ID)),
        };
        let payload = EquipoPayload {
            marca: "Dell".to_string(),
            modelo: "Latitude".to_string(),
            estado: "Usado".to_string(),
            id_cliente,
            observaciones: "Actualización de observaciones".to_string(),
            tipo: TIPO.to_string(),
        };

        match self.api.actualizar_equipo(&id, &payload).await {
            Ok(_) => info!("Equipment {id} updated"),
            Err(err) => warn!("Updating equipment {id} failed: {err}"),
        }
    }

    async fn detalle_equipo(&mut self) {
        let Some(id) = self.equipos.choose(&mut self.rng) else {
            info!("No equipment registered to fetch details for");
            return;
        };

        match self.api.detalle_equipo(&id).await {
            Ok(_) => info!("Fetched details of equipment {id}"),
            Err(err) => warn!("Fetching equipment {id} failed: {err}"),
        }
    }

    async fn eliminar_equipo(&mut self) {
        let Some(id) = self.equipos.choose(&mut self.rng) else {
            info!("No equipment registered to delete");
            return;
        };

        match self.api.eliminar_equipo(&id).await {
            Ok(_) => {
                self.equipos.remove(&id);
                info!("Equipment {id} deleted");
            }
            Err(err) => warn!("Deleting equipment {id} failed: {err}"),
        }
    }
}

impl User for EquipoUser {
    type Task = EquipoTask;

    const TASKS: &'static [(EquipoTask, u32)] = &[(EquipoTask::EjecutarTareas, 1)];

    const WAIT_TIME: WaitTime = WaitTime::between_secs(1, 5);

    async fn run(&mut self, task: EquipoTask) {
        match task {
            EquipoTask::EjecutarTareas => self.ejecutar_tareas().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_cycle_back_after_five() {
        let mut step = Step::default();
        assert_eq!(step, Step::CrearClientes);

        let mut seen = vec![];
        for _ in 0..Step::ALL.len() {
            seen.push(step);
            step = step.next();
        }

        assert_eq!(step, Step::CrearClientes);
        assert_eq!(seen, Step::ALL);
    }

    #[test]
    fn step_indices_follow_declaration() {
        for (index, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.index(), index);
        }
    }
}
