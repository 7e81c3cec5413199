use crate::config::ParkingApiConfig;
use crate::parking_api::error::FetchError;
use crate::parking_api::models::parking_snapshot::ParkingSnapshot;
use crate::parking_api::models::response::parking_response::ParkingResponse;
use crate::parking_api::normalizer::normalize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, trace};

#[derive(Clone)]
pub struct ParkingClient {
    client: reqwest::Client,
    url: String,
}

impl ParkingClient {
    pub fn new(config: &ParkingApiConfig) -> anyhow::Result<Self> {
        Self::with_timeouts(
            &config.base_url,
            Duration::from_secs(config.connect_timeout_seconds),
            Duration::from_secs(config.read_timeout_seconds),
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .read_timeout(read_timeout)
                .build()?,
            url: format!("{}/parking", base_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ParkingApiTrait for ParkingClient {
    async fn fetch_parking_data(&self) -> Result<ParkingSnapshot, FetchError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            error!("Network request to {} failed: {}", self.url, e);
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Server error: {}", status);
            return Err(FetchError::Server {
                status: status.as_u16(),
            });
        }

        let contents = response.text().await?;
        trace!("Response: {}", contents);

        let data = ParkingResponse::parse(&contents)?.into_data()?;
        Ok(normalize(&data)?)
    }
}

/// One GET against the parking endpoint, normalized into a snapshot.
/// Single attempt; retrying is the scheduler's business.
pub trait ParkingApiTrait {
    fn fetch_parking_data(
        &self,
    ) -> impl std::future::Future<Output = Result<ParkingSnapshot, FetchError>> + Send;
}

impl<T> ParkingApiTrait for Arc<T>
where
    T: ParkingApiTrait + Send + Sync,
{
    async fn fetch_parking_data(&self) -> Result<ParkingSnapshot, FetchError> {
        self.as_ref().fetch_parking_data().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use pretty_assertions::assert_eq;

    async fn serve(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/api/parking", get(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn client(base_url: &str) -> ParkingClient {
        ParkingClient::with_timeouts(base_url, Duration::from_secs(2), Duration::from_secs(2))
            .unwrap()
    }

    const SCENARIO_A: &str = r#"{
        "success": true,
        "data": {
            "Devicemaster": {"isOnline": true},
            "Device1": {"Parking Status": "Open", "System Status": "online"},
            "Device2": {"Parking Status": "Occupied", "System Status": "online"}
        }
    }"#;

    #[tokio::test]
    async fn fetches_and_normalizes_snapshot() {
        let base_url = serve(StatusCode::OK, SCENARIO_A).await;
        let snapshot = client(&base_url).fetch_parking_data().await.unwrap();

        assert_eq!(snapshot.spots.len(), 2);
        assert!(snapshot.spots["1"].is_available());
        assert!(snapshot.spots["2"].is_occupied());
        assert!(snapshot.master.map(|m| m.is_online).unwrap_or(false));
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let base_url = serve(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let err = client(&base_url).fetch_parking_data().await.unwrap_err();
        assert_eq!(err, FetchError::Server { status: 500 });
    }

    #[tokio::test]
    async fn business_failure_is_protocol_error() {
        let base_url = serve(StatusCode::OK, r#"{"success":false,"error":"db down"}"#).await;
        let err = client(&base_url).fetch_parking_data().await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Protocol {
                message: "db down".to_string()
            }
        );
        assert_eq!(err.to_string(), "db down");
    }

    #[tokio::test]
    async fn malformed_field_is_parse_error() {
        let base_url = serve(
            StatusCode::OK,
            r#"{"success":true,"data":{"Device1":{"removed":"no"}}}"#,
        )
        .await;
        let err = client(&base_url).fetch_parking_data().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }), "{err:?}");
        assert!(err.to_string().starts_with("Error parsing data: "));
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/api", addr))
            .fetch_parking_data()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn slow_server_times_out_as_network_error() {
        let app = Router::new().route(
            "/api/parking",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                SCENARIO_A
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = ParkingClient::with_timeouts(
            &format!("http://{}/api", addr),
            Duration::from_millis(200),
            Duration::from_millis(200),
        )
        .unwrap();
        let err = client.fetch_parking_data().await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }), "{err:?}");
    }

    #[test]
    fn url_is_built_from_base() {
        let client = client("https://example.com/api/");
        assert_eq!(client.url(), "https://example.com/api/parking");
    }
}
