mod jwks;

pub use jwks::{AuthError, JwksClient, Principal};
