//! Synthetic identifiers for create requests.
//!
//! Nothing here is globally unique: two users may draw the same value. The API rejects
//! duplicates with a non-success status, which the behaviors log like any other failure.
use rand::Rng;

const EMAIL_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const EQUIPO_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const EMAIL_RANDOM_LEN: usize = 10;
const EQUIPO_RANDOM_LEN: usize = 6;

/// Equipment kind, as far as identifier prefixes are concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EquipoTipo {
    Impresora,
    Laptop,
    Otro,
}

impl EquipoTipo {
    pub fn from_tipo(tipo: &str) -> Self {
        match tipo.to_lowercase().as_str() {
            "impresora" => Self::Impresora,
            "laptop" => Self::Laptop,
            _ => Self::Otro,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Impresora => "IMP",
            Self::Laptop => "LAP",
            Self::Otro => "EQU",
        }
    }
}

/// `cliente_<10 x [a-z0-9]>@ejemplo.com`
pub fn generate_unique_email() -> String {
    generate_unique_email_with(&mut rand::thread_rng())
}

pub fn generate_unique_email_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "cliente_{}@ejemplo.com",
        random_string(rng, EMAIL_CHARSET, EMAIL_RANDOM_LEN)
    )
}

/// Prefix chosen by `tipo` followed by 6 x `[A-Z0-9]`.
pub fn generate_equipo_id(tipo: &str) -> String {
    generate_equipo_id_with(&mut rand::thread_rng(), tipo)
}

pub fn generate_equipo_id_with<R: Rng + ?Sized>(rng: &mut R, tipo: &str) -> String {
    format!(
        "{}{}",
        EquipoTipo::from_tipo(tipo).prefix(),
        random_string(rng, EQUIPO_CHARSET, EQUIPO_RANDOM_LEN)
    )
}

fn random_string<R: Rng + ?Sized>(rng: &mut R, charset: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}
