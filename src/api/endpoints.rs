//! Orchestrator endpoint paths, resolved against the client's base URL.

pub const APIKEY_LOGIN: &str = "/login_by_api_key";
pub const CP_CONFIG: &str = "/cp/machines";
pub const DEPLOY_TASK: &str = "/v2/task_deployment";
pub const DEPLOYMENT_INFO: &str = "/task_detail/";
pub const PROVIDER_PAYMENTS: &str = "/provider/payments";
