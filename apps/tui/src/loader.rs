use overlay_core::search::{parse_results, GeocodeResult};
use overlay_core::{DatasetDescriptor, DatasetId, LoadedLayer, MapEvent, MapState};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Sent with every request; the public geocoder rejects anonymous clients.
pub const USER_AGENT: &str = concat!("overlay-viewer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error(transparent)]
    Parse(#[from] overlay_core::Error),
}

/// Fetches dataset documents and geocoder results over HTTP.
#[derive(Debug, Clone)]
pub struct Loader {
    client: Client,
    geocoder_url: String,
}

impl Loader {
    pub fn new(geocoder_url: impl Into<String>) -> Result<Self, LoadError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            geocoder_url: geocoder_url.into(),
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, LoadError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    pub async fn fetch_layer(&self, descriptor: &DatasetDescriptor) -> Result<LoadedLayer, LoadError> {
        tracing::info!(dataset = %descriptor.id, url = %descriptor.url, "Fetching dataset");
        let text = self.get_text(&descriptor.url, &[]).await?;
        Ok(LoadedLayer::from_geojson_str(descriptor, &text)?)
    }

    pub async fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, LoadError> {
        tracing::info!(query, "Geocoding");
        let text = self
            .get_text(&self.geocoder_url, &[("format", "json"), ("q", query)])
            .await?;
        Ok(parse_results(&text)?)
    }
}

/// Completion event for one dataset fetch.
pub fn load_event(dataset: DatasetId, result: Result<LoadedLayer, LoadError>) -> MapEvent {
    match result {
        Ok(layer) => MapEvent::LayerLoaded(Box::new(layer)),
        Err(err) => MapEvent::LayerFailed {
            dataset,
            reason: err.to_string(),
        },
    }
}

/// Starts one background fetch per dataset not already requested.
pub fn spawn_layer_loads(
    loader: &Loader,
    catalog: Vec<DatasetDescriptor>,
    state: &mut MapState,
    tx: &UnboundedSender<MapEvent>,
) {
    for descriptor in catalog {
        if !state.begin_load(descriptor.id) {
            continue;
        }

        let loader = loader.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = loader.fetch_layer(&descriptor).await;
            // The receiver is gone once the UI has quit.
            tx.send(load_event(descriptor.id, result)).ok();
        });
    }
}

pub fn spawn_geocode(loader: &Loader, query: String, tx: &UnboundedSender<MapEvent>) {
    let loader = loader.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = loader.geocode(&query).await.map_err(|err| err.to_string());
        tx.send(MapEvent::SearchResolved(result)).ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    const SCHOOLS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"school_lev": "1AB"},
             "geometry": {"type": "Point", "coordinates": [80.70, 7.80]}}
        ]
    }"#;

    /// Answers a single request with a canned response and hands back the raw request.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> Result<(String, oneshot::Receiver<String>), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let read = socket.read(&mut buf).await.unwrap_or(0);
                request_tx
                    .send(String::from_utf8_lossy(&buf[..read]).to_string())
                    .ok();
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.ok();
            }
        });

        Ok((format!("http://{addr}"), request_rx))
    }

    #[tokio::test]
    async fn fetches_and_builds_a_layer() -> Result<(), Box<dyn std::error::Error>> {
        let (base, _request) = serve_once("200 OK", SCHOOLS).await?;
        let loader = Loader::new("http://127.0.0.1:9/search")?;
        let descriptor = DatasetId::Schools.descriptor(&base);

        let layer = loader.fetch_layer(&descriptor).await?;
        assert_eq!(layer.id, DatasetId::Schools);
        assert_eq!(layer.features.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_a_load_error() -> Result<(), Box<dyn std::error::Error>> {
        let (base, _request) = serve_once("404 Not Found", "missing").await?;
        let loader = Loader::new("http://127.0.0.1:9/search")?;
        let descriptor = DatasetId::Roads.descriptor(&base);

        let result = loader.fetch_layer(&descriptor).await;
        assert!(matches!(
            result,
            Err(LoadError::Status { status, .. }) if status == StatusCode::NOT_FOUND
        ));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_document_is_a_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let (base, _request) = serve_once("200 OK", "{not json").await?;
        let loader = Loader::new("http://127.0.0.1:9/search")?;

        let result = loader.fetch_layer(&DatasetId::Slope.descriptor(&base)).await;
        assert!(matches!(result, Err(LoadError::Parse(_))));
        Ok(())
    }

    #[tokio::test]
    async fn geocode_sends_query_and_user_agent() -> Result<(), Box<dyn std::error::Error>> {
        let (base, request) = serve_once(
            "200 OK",
            r#"[{"lat": "6.0329", "lon": "80.2168", "display_name": "Galle Fort"}]"#,
        )
        .await?;
        let loader = Loader::new(format!("{base}/search"))?;

        let results = loader.geocode("Galle Fort").await?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_name, "Galle Fort");

        let request = request.await?.to_lowercase();
        assert!(request.starts_with("get /search?format=json&q=galle+fort"));
        assert!(request.contains("user-agent: overlay-viewer/"));
        Ok(())
    }

    #[test]
    fn failed_fetch_becomes_layer_failed_event() {
        let err = LoadError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url: "http://example.org/Hospitals.geojson".to_string(),
        };
        let event = load_event(DatasetId::Hospitals, Err(err));
        assert!(matches!(
            event,
            MapEvent::LayerFailed { dataset: DatasetId::Hospitals, ref reason }
                if reason.contains("500")
        ));
    }
}
