//! The four simulated users.
//!
//! Each owns its caches and random source outright; nothing is shared between instances.
mod admin;
mod cliente;
mod equipo;
mod mantenimiento;

pub use admin::{AdminTask, AdminUser};
pub use cliente::{ClienteTask, ClienteUser, INITIAL_CLIENTES};
pub use equipo::{EquipoTask, EquipoUser, Step};
pub use mantenimiento::{MantenimientoTask, MantenimientoUser};

use rand::rngs::SmallRng;
use rand::SeedableRng;

pub(crate) fn default_rng() -> SmallRng {
    SmallRng::from_entropy()
}
