use crate::model::{AdminPayload, Credenciales, RecuperarPassword};
use url::Url;

pub const DEFAULT_HOST: &str = "http://localhost:3000";
pub const DEFAULT_ADMIN_ID: &str = "1";
pub const DEFAULT_ADMIN_CORREO: &str = "nuevo_correo@ejemplo.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "nueva_password";
pub const DEFAULT_ADMIN_NOMBRE: &str = "Nuevo Nombre";
pub const DEFAULT_ADMIN_TELEFONO: &str = "0987654321";

/// Where the load goes.
#[derive(Clone, Debug)]
pub struct TargetConfig {
    pub host: Url,
    pub admin: AdminConfig,
}

impl TargetConfig {
    pub fn new(host: Url) -> Self {
        Self {
            host,
            admin: AdminConfig::default(),
        }
    }
}

/// The administrator account the admin user logs in as and keeps updating.
#[derive(Clone, Debug, PartialEq)]
pub struct AdminConfig {
    pub id: String,
    pub correo: String,
    pub password: String,
    pub nombre: String,
    pub telefono: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_ADMIN_ID.to_string(),
            correo: DEFAULT_ADMIN_CORREO.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
            nombre: DEFAULT_ADMIN_NOMBRE.to_string(),
            telefono: DEFAULT_ADMIN_TELEFONO.to_string(),
        }
    }
}

impl AdminConfig {
    pub fn credenciales(&self) -> Credenciales {
        Credenciales {
            correo: self.correo.clone(),
            password: self.password.clone(),
        }
    }

    pub fn payload(&self) -> AdminPayload {
        AdminPayload {
            correo: self.correo.clone(),
            nombre: self.nombre.clone(),
            telefono: self.telefono.clone(),
            password: self.password.clone(),
        }
    }

    pub fn recuperacion(&self) -> RecuperarPassword {
        RecuperarPassword {
            correo: self.correo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_admin_matches_documented_values() {
        let admin = AdminConfig::default();
        assert_eq!(admin.id, "1");
        assert_eq!(admin.credenciales().correo, "nuevo_correo@ejemplo.com");
        assert_eq!(admin.payload().telefono, "0987654321");
        assert_eq!(admin.recuperacion().correo, admin.correo);
    }

    #[test]
    fn default_host_parses() {
        let target = TargetConfig::new(Url::parse(DEFAULT_HOST).unwrap());
        assert_eq!(target.host.port(), Some(3000));
        assert_eq!(target.admin, AdminConfig::default());
    }
}
