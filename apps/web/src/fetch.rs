use overlay_core::search::{GeocodeResult, DEFAULT_GEOCODER_URL};
use overlay_core::{DatasetDescriptor, LoadedLayer, MapEvent};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

async fn fetch_response(url: &str) -> Result<Response, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts).map_err(|err| js_error(&err))?;
    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|err| js_error(&err))?;
    let response = value
        .dyn_into::<Response>()
        .map_err(|_| "fetch did not return a response".to_string())?;

    if !response.ok() {
        return Err(format!("HTTP {} from {url}", response.status()));
    }
    Ok(response)
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let response = fetch_response(url).await?;
    let body = response.text().map_err(|err| js_error(&err))?;
    let text = JsFuture::from(body).await.map_err(|err| js_error(&err))?;
    text.as_string()
        .ok_or_else(|| format!("{url} body is not text"))
}

/// Loads one dataset and turns the outcome into the matching map event.
pub async fn load_layer(descriptor: &DatasetDescriptor) -> MapEvent {
    let result = fetch_text(&descriptor.url)
        .await
        .and_then(|text| {
            LoadedLayer::from_geojson_str(descriptor, &text).map_err(|err| err.to_string())
        });

    match result {
        Ok(layer) => MapEvent::LayerLoaded(Box::new(layer)),
        Err(reason) => {
            web_sys::console::error_1(
                &format!("Failed to load {}: {reason}", descriptor.id.label()).into(),
            );
            MapEvent::LayerFailed {
                dataset: descriptor.id,
                reason,
            }
        }
    }
}

pub fn geocode_url(query: &str) -> String {
    let encoded: String = js_sys::encode_uri_component(query).into();
    format!("{DEFAULT_GEOCODER_URL}?format=json&q={encoded}")
}

/// Asks the geocoder for `query`; failures come back as a message.
pub async fn geocode(query: &str) -> MapEvent {
    let url = geocode_url(query);
    let result = async {
        let response = fetch_response(&url).await?;
        let body = response.json().map_err(|err| js_error(&err))?;
        let json = JsFuture::from(body).await.map_err(|err| js_error(&err))?;
        serde_wasm_bindgen::from_value::<Vec<GeocodeResult>>(json).map_err(|err| err.to_string())
    }
    .await;

    if let Err(reason) = &result {
        web_sys::console::error_1(&format!("Geocoding \"{query}\" failed: {reason}").into());
    }
    MapEvent::SearchResolved(result)
}
