use crate::api::ApiClient;
use crate::config::AdminConfig;
use carga::prelude::*;
use tracing::{info, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdminTask {
    Login,
    Actualizar,
    RecuperarPassword,
}

/// Administrator traffic: three independent calls, no local state.
#[derive(Clone, Debug)]
pub struct AdminUser {
    api: ApiClient,
    admin: AdminConfig,
}

impl AdminUser {
    pub fn new(api: ApiClient, admin: AdminConfig) -> Self {
        Self { api, admin }
    }

    pub async fn login(&self) {
        match self.api.login_admin(&self.admin.credenciales()).await {
            Ok(_) => info!("Admin login succeeded"),
            Err(err) => warn!("Admin login failed: {err}"),
        }
    }

    pub async fn actualizar(&self) {
        match self
            .api
            .actualizar_admin(&self.admin.id, &self.admin.payload())
            .await
        {
            Ok(_) => info!("Admin {} updated", self.admin.id),
            Err(err) => warn!("Admin {} update failed: {err}", self.admin.id),
        }
    }

    pub async fn recuperar_password(&self) {
        match self.api.recuperar_password(&self.admin.recuperacion()).await {
            Ok(_) => info!("Password recovery requested"),
            Err(err) => warn!("Password recovery failed: {err}"),
        }
    }
}

impl User for AdminUser {
    type Task = AdminTask;

    const TASKS: &'static [(AdminTask, u32)] = &[
        (AdminTask::Login, 1),
        (AdminTask::Actualizar, 1),
        (AdminTask::RecuperarPassword, 1),
    ];

    const WAIT_TIME: WaitTime = WaitTime::between_secs(1, 3);

    async fn run(&mut self, task: AdminTask) {
        match task {
            AdminTask::Login => self.login().await,
            AdminTask::Actualizar => self.actualizar().await,
            AdminTask::RecuperarPassword => self.recuperar_password().await,
        }
    }
}
