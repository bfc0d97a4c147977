use folio_core::relay::{RelayResponse, RelayTransport};
use folio_core::RelayError;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// `fetch` against the relay endpoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl FetchTransport {
    fn headers() -> Result<Headers, JsValue> {
        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;
        headers.set("Accept", "application/json")?;
        Ok(headers)
    }

    async fn text(resp: &Response) -> Result<String, RelayError> {
        let text = JsFuture::from(resp.text().map_err(|e| RelayError::Decode(format!("{e:?}")))?)
            .await
            .map_err(|e| RelayError::Decode(format!("{e:?}")))?;
        text.as_string()
            .ok_or_else(|| RelayError::Decode("body is not a string".into()))
    }
}

impl RelayTransport for FetchTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<RelayResponse, RelayError> {
        let net = |e: JsValue| RelayError::Network(format!("{e:?}"));
        let window = web_sys::window().ok_or_else(|| RelayError::Network("no window".into()))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_headers(&Self::headers().map_err(net)?.into());
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body.to_string()));

        let request = Request::new_with_str_and_init(url, &opts).map_err(net)?;
        let resp_val = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(net)?;
        let resp: Response = resp_val
            .dyn_into()
            .map_err(|_| RelayError::Network("not a Response".into()))?;

        let status = resp.status();
        // error bodies still matter: the relay puts its message there
        let body = Self::text(&resp).await.unwrap_or_default();
        log::debug!("[relay] POST {} -> {}", url, status);
        Ok(RelayResponse { status, body })
    }
}
