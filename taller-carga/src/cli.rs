//! Command-line entry point.
//!
//! ```text
//! taller-carga --host http://localhost:3000 -u 20 -r 5 -t 2m cliente
//! taller-carga -t 30s admin --admin-id 3 --correo otro@ejemplo.com
//! ```
use crate::api::ApiClient;
use crate::config::{
    AdminConfig, TargetConfig, DEFAULT_ADMIN_CORREO, DEFAULT_ADMIN_ID, DEFAULT_ADMIN_NOMBRE,
    DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_TELEFONO, DEFAULT_HOST,
};
use crate::error::CliError;
use crate::users::{AdminUser, ClienteUser, EquipoUser, MantenimientoUser};
use carga::core::{DEFAULT_SPAWN_RATE, DEFAULT_USERS};
use carga::prelude::*;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Default `RUST_LOG`-style filter when the environment sets none.
pub const DEFAULT_LOG_FILTER: &str = "taller_carga=info,carga=info";

#[derive(Parser, Debug)]
#[command(version, about = "Load tests for the taller equipment-maintenance API")]
pub struct Cli {
    /// Base URL of the API under test.
    #[arg(long, env = "TALLER_HOST", default_value = DEFAULT_HOST)]
    pub host: Url,

    #[command(flatten)]
    pub load: LoadSettings,

    /// Serve Prometheus metrics on this address during the run.
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,

    #[command(subcommand)]
    pub behavior: Behavior,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoadSettings {
    /// Simulated users to run.
    #[arg(short, long, default_value_t = DEFAULT_USERS.get())]
    pub users: usize,

    /// Users started per second.
    #[arg(short('r'), long, default_value_t = DEFAULT_SPAWN_RATE.get())]
    pub spawn_rate: u32,

    /// How long to run (`30s`, `5m`). Runs until Ctrl-C when omitted.
    #[arg(short('t'), long, value_parser = humantime::parse_duration)]
    pub run_time: Option<Duration>,

    /// Tasks each user runs before stopping on its own.
    #[arg(long)]
    pub iterations: Option<u64>,
}

impl LoadSettings {
    pub fn apply<S, T>(&self, scenario: S) -> S
    where
        S: ConfigurableScenario<T>,
        T: Send,
    {
        let scenario = scenario.users(self.users).spawn_rate(self.spawn_rate);
        let scenario = match self.run_time {
            Some(run_time) => scenario.duration(run_time),
            None => scenario,
        };
        match self.iterations {
            Some(iterations) => scenario.iterations(iterations),
            None => scenario,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Login, profile update and password recovery.
    Admin(AdminArgs),
    /// Client create, read, update, list and delete.
    Cliente,
    /// Client registration, equipment assignment and equipment CRUD.
    Equipo,
    /// Read-only maintenance queries.
    Mantenimiento,
}

impl Behavior {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin(_) => "admin",
            Self::Cliente => "cliente",
            Self::Equipo => "equipo",
            Self::Mantenimiento => "mantenimiento",
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AdminArgs {
    #[arg(long, default_value = DEFAULT_ADMIN_ID)]
    pub admin_id: String,

    #[arg(long, default_value = DEFAULT_ADMIN_CORREO)]
    pub correo: String,

    #[arg(long, default_value = DEFAULT_ADMIN_PASSWORD)]
    pub password: String,

    #[arg(long, default_value = DEFAULT_ADMIN_NOMBRE)]
    pub nombre: String,

    #[arg(long, default_value = DEFAULT_ADMIN_TELEFONO)]
    pub telefono: String,
}

impl From<AdminArgs> for AdminConfig {
    fn from(args: AdminArgs) -> Self {
        Self {
            id: args.admin_id,
            correo: args.correo,
            password: args.password,
            nombre: args.nombre,
            telefono: args.telefono,
        }
    }
}

impl Cli {
    pub fn target(&self) -> TargetConfig {
        let mut target = TargetConfig::new(self.host.clone());
        if let Behavior::Admin(args) = &self.behavior {
            target.admin = args.clone().into();
        }
        target
    }
}

/// Runs the selected behavior to completion and returns its statistics.
pub async fn run(cli: Cli) -> Result<RunStatistics, CliError> {
    if let Some(addr) = cli.metrics_addr {
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        info!("Serving metrics on {addr}");
    }

    let target = cli.target();
    let api = ApiClient::new(target.host.clone());
    let name = cli.behavior.name();
    info!("Running {name} against {}", target.host);

    let stats = match cli.behavior {
        Behavior::Admin(_) => {
            let admin = target.admin;
            cli.load
                .apply(Scenario::new(name, move || {
                    AdminUser::new(api.clone(), admin.clone())
                }))
                .await?
        }
        Behavior::Cliente => {
            cli.load
                .apply(Scenario::new(name, move || ClienteUser::new(api.clone())))
                .await?
        }
        Behavior::Equipo => {
            cli.load
                .apply(Scenario::new(name, move || EquipoUser::new(api.clone())))
                .await?
        }
        Behavior::Mantenimiento => {
            cli.load
                .apply(Scenario::new(name, move || MantenimientoUser::new(api.clone())))
                .await?
        }
    };

    Ok(stats)
}
