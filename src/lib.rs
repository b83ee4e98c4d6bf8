//! # Swan SDK
//!
//! A Rust client for the SwanHub compute-marketplace orchestrator.
//! It logs in with an API key, lists the hardware configurations on offer,
//! submits space deployments and fetches deployment and payment details.
//!
//! ## Features
//!
//! - **Hardware Catalog**: List hardware configurations and check region availability
//! - **Deployments**: Submit deployments, fetch their status and real URLs
//! - **Payments**: Retrieve provider payment information
//! - **Two Error Styles**: `try_*` methods return typed errors, the plain
//!   ones log and return `None`/`false`
//! - **Pluggable Transport**: Swap the HTTP layer through the [`api::Transport`] trait
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use swan::{
//!     api::{DeploymentRequest, SwanClient},
//!     config::Environment,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Log in against the calibration orchestrator
//! let client = SwanClient::new("my-api-key", true, Some(Environment::Calibration));
//!
//! // List the hardware on offer
//! for hardware in client.try_get_hardware_config()? {
//!     println!("{} ({}): {:?}", hardware.name, hardware.price, hardware.region);
//! }
//!
//! // Deploy a space
//! let request = DeploymentRequest::new(
//!     "C1ae.small",
//!     "North Carolina-US",
//!     1_700_000_000,
//!     3600,
//!     "https://example.com/spaces/demo",
//!     "0x0000000000000000000000000000000000000000",
//!     "0x00",
//! );
//! let response = client.try_deploy_task(&request)?;
//! println!("{response}");
//! # Ok(())
//! # }
//! ```

/// Orchestrator client, request/response models and the HTTP transport
pub mod api;

/// Orchestrator environment selection
pub mod config;

/// Request failure reporting
pub mod errors;
