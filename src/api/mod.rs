// Re-export the API module components
pub use self::{
    client::{SwanClient, GLOBAL_REGION},
    errors::{SwanApiError, TransportError},
    models::{DeploymentRequest, HardwareConfig, LoginResponse},
    transport::{endpoint_url, HttpTransport, Transport, USER_AGENT},
};

// Module declarations
mod client;
pub mod endpoints;
mod errors;
mod models;
mod transport;
