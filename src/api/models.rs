use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One hardware offering from the orchestrator's catalog.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HardwareConfig {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub hardware_type: String,
    pub region: Vec<String>,
    pub price: String,
    pub status: String,
}

impl HardwareConfig {
    /// # Errors
    ///
    /// Fails if `value` lacks one of the recognized fields or holds it
    /// with the wrong JSON type.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Dictionary view with the same keys the orchestrator uses.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "type": self.hardware_type,
            "region": self.region,
            "price": self.price,
            "status": self.status,
        })
    }

    pub fn is_available(&self) -> bool {
        self.status == "available"
    }

    pub fn serves_region(&self, region: &str) -> bool {
        self.region.iter().any(|r| r == region)
    }
}

/// Fields of a login reply. Each is kept only when it holds a string, so a
/// rejection carrying an odd `data` still reads as a rejection.
#[derive(Debug, Default, PartialEq)]
pub struct LoginResponse {
    pub status: Option<String>,
    pub data: Option<String>,
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);
        Self {
            status: text("status"),
            data: text("data"),
            message: text("message"),
        }
    }

    pub fn has_failed(&self) -> bool {
        self.status.as_deref() == Some("failed")
    }
}

/// Parameters of a space deployment. Built with [`DeploymentRequest::new`]
/// and sent as the JSON body of the deploy call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeploymentRequest {
    pub paid: f64,
    pub duration: u64,
    pub cfg_name: String,
    pub region: String,
    pub start_in: u64,
    #[serde(rename = "wallet")]
    pub wallet_address: String,
    pub tx_hash: String,
    pub job_source_uri: String,
}

impl DeploymentRequest {
    pub fn new(
        cfg_name: impl Into<String>,
        region: impl Into<String>,
        start_in: u64,
        duration: u64,
        job_source_uri: impl Into<String>,
        wallet_address: impl Into<String>,
        tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            paid: 0.0,
            duration,
            cfg_name: cfg_name.into(),
            region: region.into(),
            start_in,
            wallet_address: wallet_address.into(),
            tx_hash: tx_hash.into(),
            job_source_uri: job_source_uri.into(),
        }
    }

    #[must_use]
    pub fn with_paid(mut self, paid: f64) -> Self {
        self.paid = paid;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": 0,
            "name": "C1ae.small",
            "description": "CPU only · 2 vCPU · 2 GiB",
            "type": "CPU",
            "region": ["North Carolina-US"],
            "price": "0.0",
            "status": "available"
        })
    }

    #[test]
    fn test_hardware_projection_matches_source() {
        let hardware = HardwareConfig::from_value(sample()).unwrap();
        assert_eq!(hardware.hardware_type, "CPU");
        assert_eq!(hardware.to_value(), sample());
    }

    #[test]
    fn test_unrecognized_fields_are_dropped() {
        let mut raw = sample();
        raw["vendor"] = json!("acme");
        let hardware = HardwareConfig::from_value(raw).unwrap();
        assert_eq!(hardware.to_value(), sample());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("region");
        assert!(HardwareConfig::from_value(raw).is_err());
    }

    #[test]
    fn test_availability_and_region_helpers() {
        let mut hardware = HardwareConfig::from_value(sample()).unwrap();
        assert!(hardware.is_available());
        assert!(hardware.serves_region("North Carolina-US"));
        assert!(!hardware.serves_region("Quebec-CA"));

        hardware.status = "unavailable".into();
        assert!(!hardware.is_available());
    }

    #[test]
    fn test_deployment_request_body() {
        let request = DeploymentRequest::new(
            "G1ae.small",
            "Quebec-CA",
            1_700_000_000,
            3600,
            "https://example.com/space",
            "0xabc",
            "0xdef",
        )
        .with_paid(1.5);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "paid": 1.5,
                "duration": 3600,
                "cfg_name": "G1ae.small",
                "region": "Quebec-CA",
                "start_in": 1_700_000_000u64,
                "wallet": "0xabc",
                "tx_hash": "0xdef",
                "job_source_uri": "https://example.com/space"
            })
        );
    }

    #[test]
    fn test_paid_defaults_to_zero() {
        let request = DeploymentRequest::new("a", "Global", 0, 1, "uri", "w", "t");
        assert!(request.paid.abs() < f64::EPSILON);
    }

    #[test]
    fn test_login_failed_status() {
        let response = LoginResponse::from_value(&json!({"status": "failed", "message": "bad key"}));
        assert!(response.has_failed());
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("bad key"));
    }

    #[test]
    fn test_login_non_string_fields_are_ignored() {
        let response =
            LoginResponse::from_value(&json!({"status": "failed", "data": {}, "message": 42}));
        assert!(response.has_failed());
        assert_eq!(response.data, None);
        assert_eq!(response.message, None);
    }
}
