//! Browser adapters for the core traits: `fetch` for HTTP, `localStorage`
//! for persisted flags, and DOM script injection for the analytics tag.
//!
//! Non-WASM builds get inert stand-ins so the crate still type-checks and
//! component tests can run natively.

use shamba_common::analytics::{TagCommand, TagHost};
use shamba_common::api::{ApiError, HttpResponse, HttpTransport};
use shamba_common::consent::KeyValueStore;

pub(crate) fn clog(msg: &str) {
    #[cfg(target_family = "wasm")]
    web_sys::console::log_1(&msg.into());
    #[cfg(not(target_family = "wasm"))]
    let _ = msg;
}

// ─── HTTP ────────────────────────────────────────────────────────────────────

/// `HttpTransport` over `window.fetch`, rooted at the configured API URL.
pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl HttpTransport for FetchTransport {
    async fn get(&self, path: &str) -> Result<HttpResponse, ApiError> {
        fetch(&format!("{}{}", self.base_url, path), "GET", None).await
    }

    async fn post_json(&self, path: &str, body: String) -> Result<HttpResponse, ApiError> {
        fetch(&format!("{}{}", self.base_url, path), "POST", Some(body)).await
    }
}

#[cfg(target_family = "wasm")]
async fn fetch(url: &str, method: &str, body: Option<String>) -> Result<HttpResponse, ApiError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let net = |what: &str, e: wasm_bindgen::JsValue| ApiError::Network(format!("{what}: {e:?}"));

    let opts = web_sys::RequestInit::new();
    opts.set_method(method);
    opts.set_mode(web_sys::RequestMode::Cors);
    let is_post = body.is_some();
    if let Some(b) = body {
        opts.set_body(&wasm_bindgen::JsValue::from_str(&b));
    }

    let request = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| net("Failed to create request", e))?;
    if is_post {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| net("Failed to set header", e))?;
    }

    let window = web_sys::window().ok_or_else(|| ApiError::Network("No window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| net("Fetch failed", e))?;
    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|_| ApiError::Network("Response is not a Response object".into()))?;

    let text = JsFuture::from(resp.text().map_err(|e| net("Failed to get text", e))?)
        .await
        .map_err(|e| net("Failed to read body", e))?;
    let body = text
        .as_string()
        .ok_or_else(|| ApiError::Decode("Response body is not a string".into()))?;

    tracing::debug!("{method} {url} -> {}", resp.status());
    Ok(HttpResponse::new(resp.status(), body))
}

#[cfg(not(target_family = "wasm"))]
async fn fetch(url: &str, method: &str, _body: Option<String>) -> Result<HttpResponse, ApiError> {
    Err(ApiError::Network(format!(
        "{method} {url}: fetch is only available in WASM"
    )))
}

// ─── localStorage ────────────────────────────────────────────────────────────

/// `KeyValueStore` over `window.localStorage`. Storage errors (private
/// mode, quota) degrade to "nothing stored".
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_family = "wasm")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(target_family = "wasm")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(target_family = "wasm"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(target_family = "wasm")]
        if let Some(storage) = local_storage() {
            if storage.set_item(key, value).is_err() {
                clog(&format!("[SHAMBA] Failed to persist {key}"));
            }
        }
        #[cfg(not(target_family = "wasm"))]
        let _ = (key, value);
    }

    fn remove(&self, key: &str) {
        #[cfg(target_family = "wasm")]
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
        #[cfg(not(target_family = "wasm"))]
        let _ = key;
    }
}

// ─── Analytics tag ───────────────────────────────────────────────────────────

/// `TagHost` that writes `<script>` elements into `<head>` and talks to the
/// global `gtag` function.
#[derive(Clone, Copy, Default)]
pub struct DomTagHost;

#[cfg(target_family = "wasm")]
const TAG_SCRIPT_ID: &str = "shamba-gtag";

#[cfg(target_family = "wasm")]
const GTAG_STUB_JS: &str = "window.dataLayer = window.dataLayer || [];\
    window.gtag = function(){ window.dataLayer.push(arguments); };\
    window.gtag('js', new Date());";

#[cfg(target_family = "wasm")]
mod dom {
    use wasm_bindgen::{JsCast, JsValue};

    pub fn append_script(configure: impl FnOnce(&web_sys::HtmlScriptElement)) -> Result<(), String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document")?;
        let script: web_sys::HtmlScriptElement = document
            .create_element("script")
            .map_err(|e| format!("create_element failed: {e:?}"))?
            .dyn_into()
            .map_err(|_| "Not a script element".to_string())?;
        configure(&script);
        let head = document.head().ok_or("No <head>")?;
        head.append_child(&script)
            .map_err(|e| format!("append_child failed: {e:?}"))?;
        Ok(())
    }

    pub fn gtag(args: &[JsValue]) -> Result<(), String> {
        let window = web_sys::window().ok_or("No window")?;
        let f = js_sys::Reflect::get(&window, &JsValue::from_str("gtag"))
            .map_err(|e| format!("gtag lookup failed: {e:?}"))?;
        let f: js_sys::Function = f.dyn_into().map_err(|_| "gtag stub missing".to_string())?;
        let array = js_sys::Array::new();
        for a in args {
            array.push(a);
        }
        f.apply(&JsValue::NULL, &array)
            .map_err(|e| format!("gtag call failed: {e:?}"))?;
        Ok(())
    }

    pub fn element_exists(id: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .is_some()
    }

    pub fn object(pairs: &[(String, String)]) -> JsValue {
        let obj = js_sys::Object::new();
        for (k, v) in pairs {
            let _ = js_sys::Reflect::set(&obj, &JsValue::from_str(k), &JsValue::from_str(v));
        }
        obj.into()
    }
}

impl TagHost for DomTagHost {
    fn create_stub(&self) {
        #[cfg(target_family = "wasm")]
        if let Err(e) = dom::append_script(|s| {
            let _ = s.set_text(GTAG_STUB_JS);
        }) {
            clog(&format!("[ANALYTICS] {e}"));
        }
    }

    fn inject_script(&self, url: &str) {
        #[cfg(target_family = "wasm")]
        if let Err(e) = dom::append_script(|s| {
            s.set_id(TAG_SCRIPT_ID);
            s.set_async(true);
            s.set_src(url);
        }) {
            clog(&format!("[ANALYTICS] {e}"));
        }
        #[cfg(not(target_family = "wasm"))]
        let _ = url;
    }

    fn configure(&self, tag_id: &str) {
        #[cfg(target_family = "wasm")]
        {
            let options = js_sys::Object::new();
            let _ = js_sys::Reflect::set(
                &options,
                &wasm_bindgen::JsValue::from_str("send_page_view"),
                &wasm_bindgen::JsValue::FALSE,
            );
            if let Err(e) = dom::gtag(&["config".into(), tag_id.into(), options.into()]) {
                clog(&format!("[ANALYTICS] {e}"));
            }
        }
        #[cfg(not(target_family = "wasm"))]
        let _ = tag_id;
    }

    fn is_installed(&self) -> bool {
        #[cfg(target_family = "wasm")]
        return dom::element_exists(TAG_SCRIPT_ID);
        #[cfg(not(target_family = "wasm"))]
        false
    }

    fn send(&self, command: &TagCommand) {
        #[cfg(target_family = "wasm")]
        {
            let result = match command {
                TagCommand::PageView { path } => dom::gtag(&[
                    "event".into(),
                    "page_view".into(),
                    dom::object(&[("page_path".to_string(), path.clone())]),
                ]),
                TagCommand::Event { name, params } => {
                    dom::gtag(&["event".into(), name.as_str().into(), dom::object(params)])
                }
            };
            if let Err(e) = result {
                clog(&format!("[ANALYTICS] {e}"));
            }
        }
        #[cfg(not(target_family = "wasm"))]
        tracing::debug!(?command, "Analytics command (offline mode)");
    }
}
