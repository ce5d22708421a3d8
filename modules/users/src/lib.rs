// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::model;

// === MODULE DEFINITION ===
pub mod module;
pub use module::Users;

// === INTERNAL MODULES ===
// Exposed for integration tests and the server binary wiring.
// Other crates should stick to `contract`, `module` and `config`.
pub mod api;
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
