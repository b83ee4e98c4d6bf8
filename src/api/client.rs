use std::{
    io::Write,
    path::Path,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use reqwest::Method;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

use crate::config::Environment;

use super::endpoints;
use super::errors::SwanApiError;
use super::models::{DeploymentRequest, HardwareConfig, LoginResponse};
use super::transport::{HttpTransport, Transport};

/// Region name that matches every hardware configuration.
pub const GLOBAL_REGION: &str = "Global";

/// Session-scoped client for the SwanHub orchestrator.
///
/// Every operation comes in two flavours: `try_*` returns the typed
/// [`SwanApiError`], the plain one logs the error and returns `None` or
/// `false` instead.
pub struct SwanClient<T = HttpTransport> {
    transport: T,
    api_key: String,
    environment: Environment,
    session_token: RwLock<Option<String>>,
    cached_hardware: RwLock<Option<Vec<HardwareConfig>>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl SwanClient<HttpTransport> {
    /// Creates a client over the default HTTP transport. `environment` of
    /// `None` targets production.
    ///
    /// Never fails: when `login` is set and the handshake fails, the error
    /// is logged and the client stays unauthenticated. Check
    /// [`SwanClient::is_authenticated`] afterwards.
    pub fn new(api_key: impl Into<String>, login: bool, environment: Option<Environment>) -> Self {
        Self::with_transport(HttpTransport::new(), api_key, login, environment)
    }
}

impl<T: Transport> SwanClient<T> {
    pub fn with_transport(
        transport: T,
        api_key: impl Into<String>,
        login: bool,
        environment: Option<Environment>,
    ) -> Self {
        let client = Self {
            transport,
            api_key: api_key.into(),
            environment: environment.unwrap_or_default(),
            session_token: RwLock::new(None),
            cached_hardware: RwLock::new(None),
        };
        if login {
            client.login();
        }
        client
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn base_url(&self) -> &str {
        self.environment.base_url()
    }

    pub fn session_token(&self) -> Option<String> {
        read(&self.session_token).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        read(&self.session_token).is_some()
    }

    /// Hardware list stored by the last successful catalog fetch.
    pub fn cached_hardware_config(&self) -> Option<Vec<HardwareConfig>> {
        read(&self.cached_hardware).clone()
    }

    /// Exchanges the API key for a session token and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`SwanApiError::Authentication`] when the orchestrator
    /// rejects the key, or a transport/shape error.
    pub fn try_login(&self) -> Result<String, SwanApiError> {
        let params = json!({ "api_key": self.api_key });
        let result = self.transport.request_with_params(
            Method::POST,
            endpoints::APIKEY_LOGIN,
            self.base_url(),
            &params,
            None,
            None,
        )?;

        let response = LoginResponse::from_value(&result);
        if response.status.is_none() {
            log::debug!("Unexpected login response: {result}");
            return Err(SwanApiError::malformed("status"));
        }
        if response.has_failed() {
            return Err(SwanApiError::Authentication(
                response
                    .message
                    .unwrap_or_else(|| "the orchestrator rejected the API key".to_owned()),
            ));
        }
        let token = response.data.ok_or_else(|| SwanApiError::malformed("data"))?;

        *write(&self.session_token) = Some(token.clone());
        log::info!("Logged in to {}", self.environment);
        Ok(token)
    }

    /// Returns `true` when a session token was obtained.
    pub fn login(&self) -> bool {
        match self.try_login() {
            Ok(_) => true,
            Err(e) => {
                log::error!("{e}");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Will return `Err` on transport failure or when the body has no
    /// `data.hardware` array. Entries that don't describe a hardware
    /// configuration are skipped with a warning.
    pub fn try_get_hardware_config(&self) -> Result<Vec<HardwareConfig>, SwanApiError> {
        let token = self.session_token();
        let mut response = self.transport.request_without_params(
            Method::GET,
            endpoints::CP_CONFIG,
            self.base_url(),
            token.as_deref(),
        )?;

        let Some(Value::Array(items)) = response.pointer_mut("/data/hardware").map(Value::take)
        else {
            return Err(SwanApiError::malformed("data.hardware"));
        };
        let hardware: Vec<HardwareConfig> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match HardwareConfig::from_value(item) {
                Ok(hardware) => Some(hardware),
                Err(e) => {
                    log::warn!("Skipping hardware entry {index}: {e}");
                    None
                }
            })
            .collect();

        log::debug!("Fetched {} hardware configurations", hardware.len());
        *write(&self.cached_hardware) = Some(hardware.clone());
        Ok(hardware)
    }

    /// `None` means availability is unknown, not that there is no hardware.
    pub fn get_hardware_config(&self) -> Option<Vec<HardwareConfig>> {
        match self.try_get_hardware_config() {
            Ok(hardware) => Some(hardware),
            Err(e) => {
                log::error!("Failed to fetch hardware configurations.");
                log::debug!("{e}");
                None
            }
        }
    }

    /// Checks that hardware `name` is offered in `region`. [`GLOBAL_REGION`]
    /// matches anything. The cached catalog is used when present, otherwise
    /// it is fetched; call [`SwanClient::get_hardware_config`] to refresh it.
    /// Duplicate names resolve to the first listed entry.
    ///
    /// # Errors
    ///
    /// Propagates a failed catalog fetch.
    pub fn try_hardware_available_in_region(
        &self,
        name: &str,
        region: &str,
    ) -> Result<bool, SwanApiError> {
        if region == GLOBAL_REGION {
            return Ok(true);
        }

        let hardware = match self.cached_hardware_config() {
            Some(hardware) => hardware,
            None => self.try_get_hardware_config()?,
        };
        let mut candidates = hardware.iter().filter(|h| h.name == name);
        let Some(first) = candidates.next() else {
            return Ok(false);
        };

        let duplicates = candidates.count();
        if duplicates > 0 {
            log::warn!(
                "Hardware {name} is listed {} times, using the first entry (id {})",
                duplicates + 1,
                first.id
            );
        }
        Ok(first.serves_region(region))
    }

    pub fn hardware_available_in_region(&self, name: &str, region: &str) -> bool {
        self.try_hardware_available_in_region(name, region)
            .unwrap_or_else(|e| {
                log::error!("Failed to verify {name} in {region}: {e}");
                false
            })
    }

    /// Submits a deployment. The hardware/region pair is verified first;
    /// when it is invalid nothing is sent.
    ///
    /// Not idempotent: each call creates a new deployment.
    ///
    /// # Errors
    ///
    /// Returns [`SwanApiError::Configuration`] for an unknown pair, or
    /// the catalog/deploy transport error.
    pub fn try_deploy_task(&self, request: &DeploymentRequest) -> Result<Value, SwanApiError> {
        if !self.try_hardware_available_in_region(&request.cfg_name, &request.region)? {
            return Err(SwanApiError::Configuration {
                cfg_name: request.cfg_name.clone(),
                region: request.region.clone(),
            });
        }

        let params = serde_json::to_value(request)?;
        let token = self.session_token();
        let response = self.transport.request_with_params(
            Method::POST,
            endpoints::DEPLOY_TASK,
            self.base_url(),
            &params,
            token.as_deref(),
            None,
        )?;

        log::info!(
            "Deployment of {} in {} submitted",
            request.cfg_name,
            request.region
        );
        Ok(response)
    }

    pub fn deploy_task(&self, request: &DeploymentRequest) -> Option<Value> {
        self.try_deploy_task(request)
            .map_err(|e| log::error!("Failed to deploy {}: {e}", request.cfg_name))
            .ok()
    }

    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub fn try_get_deployment_info(&self, task_uuid: &str) -> Result<Value, SwanApiError> {
        let token = self.session_token();
        let path = format!("{}{task_uuid}", endpoints::DEPLOYMENT_INFO);
        let response = self.transport.request_without_params(
            Method::GET,
            &path,
            self.base_url(),
            token.as_deref(),
        )?;
        Ok(response)
    }

    pub fn get_deployment_info(&self, task_uuid: &str) -> Option<Value> {
        self.try_get_deployment_info(task_uuid)
            .map_err(|e| log::error!("Failed to fetch deployment {task_uuid}: {e}"))
            .ok()
    }

    /// Saves the deployment info of `task_uuid` to `path` as 2-space
    /// indented JSON. The file is replaced atomically, so a reader never
    /// sees a partial document.
    ///
    /// # Errors
    ///
    /// Will return `Err` on fetch failure or if the file cannot be written.
    pub fn try_get_deployment_info_to_file(
        &self,
        task_uuid: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), SwanApiError> {
        let info = self.try_get_deployment_info(task_uuid)?;
        write_json_atomically(path.as_ref(), &info)
    }

    pub fn get_deployment_info_to_file(&self, task_uuid: &str, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_get_deployment_info_to_file(task_uuid, path) {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Failed to save deployment {task_uuid} to {}: {e}",
                    path.display()
                );
                false
            }
        }
    }

    /// URLs the deployment's jobs are served at, in job order. Jobs with no
    /// (or an empty) `job_real_uri` are skipped.
    ///
    /// # Errors
    ///
    /// Will return `Err` on fetch failure or when the body has no
    /// `data.jobs` array.
    pub fn try_get_real_url(&self, task_uuid: &str) -> Result<Vec<String>, SwanApiError> {
        let info = self.try_get_deployment_info(task_uuid)?;
        let jobs = info
            .pointer("/data/jobs")
            .and_then(Value::as_array)
            .ok_or_else(|| SwanApiError::malformed("data.jobs"))?;

        Ok(jobs
            .iter()
            .filter_map(|job| job.get("job_real_uri"))
            .filter_map(Value::as_str)
            .filter(|uri| !uri.is_empty())
            .map(str::to_owned)
            .collect())
    }

    pub fn get_real_url(&self, task_uuid: &str) -> Option<Vec<String>> {
        self.try_get_real_url(task_uuid)
            .map_err(|e| log::error!("Failed to collect URLs of {task_uuid}: {e}"))
            .ok()
    }

    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub fn try_get_payment_info(&self) -> Result<Value, SwanApiError> {
        let token = self.session_token();
        let response = self.transport.request_without_params(
            Method::GET,
            endpoints::PROVIDER_PAYMENTS,
            self.base_url(),
            token.as_deref(),
        )?;
        Ok(response)
    }

    pub fn get_payment_info(&self) -> Option<Value> {
        match self.try_get_payment_info() {
            Ok(info) => Some(info),
            Err(e) => {
                log::error!("An error occurred while fetching payment info");
                log::debug!("{e}");
                None
            }
        }
    }
}

fn write_json_atomically(path: &Path, value: &Value) -> Result<(), SwanApiError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.flush()?;
    #[cfg(unix)]
    file.as_file().set_permissions(output_permissions(path))?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Temp files are owner-only; keep the mode of the file being replaced,
/// or use the usual 0644 for a new one.
#[cfg(unix)]
fn output_permissions(path: &Path) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).map_or_else(
        |_| std::fs::Permissions::from_mode(0o644),
        |metadata| metadata.permissions(),
    )
}
