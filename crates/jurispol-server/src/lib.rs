//! JurisPol relay server: forwards chat turns to the provider, hosts the
//! frontend bundle, and ships a console client.

pub mod console;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
