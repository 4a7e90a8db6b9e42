//! Load tests for the taller equipment-maintenance API.
//!
//! Four simulated users exercise the administrator, client, equipment and maintenance
//! endpoints. Each runs on the [`carga`] harness; see [`cli`] for the command-line entry point.
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod users;

pub use api::{ApiClient, ApiError};
pub use cache::IdCache;
pub use config::{AdminConfig, TargetConfig};
pub use model::EntityId;
pub use users::{AdminUser, ClienteUser, EquipoUser, MantenimientoUser};
