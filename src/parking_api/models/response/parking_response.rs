use crate::parking_api::error::FetchError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Envelope returned by `GET /parking`.
#[derive(Deserialize, Debug, Clone)]
pub struct ParkingResponse {
    pub success: bool,
    /// Only meaningful as a string when `success` is false.
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ParkingResponse {
    pub fn parse(contents: &str) -> Result<Self, FetchError> {
        serde_json::from_str(contents).map_err(|e| FetchError::Protocol {
            message: format!("Unable to deserialize response: {}", e),
        })
    }

    /// Unwraps the device record map, turning `success=false` into a
    /// protocol error carrying the server's message.
    pub fn into_data(self) -> Result<Map<String, Value>, FetchError> {
        if !self.success {
            return Err(FetchError::Protocol {
                message: self
                    .error
                    .and_then(|e| e.as_str().map(str::to_owned))
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        match self.data {
            Some(Value::Object(data)) => Ok(data),
            _ => Err(FetchError::Parse {
                message: "response has no data object".to_string(),
            }),
        }
    }
}
