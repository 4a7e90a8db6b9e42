use super::default_rng;
use crate::api::ApiClient;
use crate::cache::IdCache;
use carga::prelude::*;
use rand::rngs::SmallRng;
use tracing::{error, info, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MantenimientoTask {
    PorId,
    PorEquipo,
    Todos,
}

/// Read-only maintenance traffic over the records that existed when the user started.
#[derive(Debug)]
pub struct MantenimientoUser {
    api: ApiClient,
    mantenimientos: IdCache,
    equipos: IdCache,
    rng: SmallRng,
}

impl MantenimientoUser {
    pub fn new(api: ApiClient) -> Self {
        Self::with_rng(api, default_rng())
    }

    pub fn with_rng(api: ApiClient, rng: SmallRng) -> Self {
        Self {
            api,
            mantenimientos: IdCache::new(),
            equipos: IdCache::new(),
            rng,
        }
    }

    pub fn mantenimientos(&self) -> &IdCache {
        &self.mantenimientos
    }

    pub fn equipos(&self) -> &IdCache {
        &self.equipos
    }

    /// Loads every record id, plus each equipment id once in first-seen order.
    ///
    /// Records missing an identifier still contribute the one they have.
    pub async fn cargar(&mut self) {
        let registros = match self.api.listar_mantenimientos().await {
            Ok(registros) => registros,
            Err(err) => {
                error!("Loading maintenance records failed: {err}");
                return;
            }
        };

        let incompletos = registros
            .iter()
            .filter(|m| m.id_unico.is_none() || m.id_equipo.is_none())
            .count();
        if incompletos > 0 {
            warn!("Skipped unusable identifiers in {incompletos} maintenance records");
        }

        self.mantenimientos = registros.iter().filter_map(|m| m.id_unico.clone()).collect();
        self.equipos = IdCache::unique(registros.into_iter().filter_map(|m| m.id_equipo));
        info!(
            "Loaded {} maintenance records over {} equipment",
            self.mantenimientos.len(),
            self.equipos.len()
        );
    }

    pub async fn por_id(&mut self) {
        let Some(id) = self.mantenimientos.choose(&mut self.rng) else {
            info!("No maintenance records available to fetch");
            return;
        };

        match self.api.mantenimiento_por_id(&id).await {
            Ok(_) => info!("Fetched maintenance record {id}"),
            Err(err) => warn!("Fetching maintenance record {id} failed: {err}"),
        }
    }

    pub async fn por_equipo(&mut self) {
        let Some(id) = self.equipos.choose(&mut self.rng) else {
            info!("No equipment available to fetch maintenance for");
            return;
        };

        match self.api.mantenimientos_por_equipo(&id).await {
            Ok(_) => info!("Fetched maintenance of equipment {id}"),
            Err(err) => warn!("Fetching maintenance of equipment {id} failed: {err}"),
        }
    }

    pub async fn todos(&self) {
        match self.api.listar_mantenimientos().await {
            Ok(registros) => info!("Listed {} maintenance records", registros.len()),
            Err(err) => warn!("Listing maintenance records failed: {err}"),
        }
    }
}

impl User for MantenimientoUser {
    type Task = MantenimientoTask;

    const TASKS: &'static [(MantenimientoTask, u32)] = &[
        (MantenimientoTask::PorId, 1),
        (MantenimientoTask::PorEquipo, 1),
        (MantenimientoTask::Todos, 1),
    ];

    const WAIT_TIME: WaitTime = WaitTime::between_secs(1, 5);

    async fn on_start(&mut self) {
        self.cargar().await;
    }

    async fn run(&mut self, task: MantenimientoTask) {
        match task {
            MantenimientoTask::PorId => self.por_id().await,
            MantenimientoTask::PorEquipo => self.por_equipo().await,
            MantenimientoTask::Todos => self.todos().await,
        }
    }
}
