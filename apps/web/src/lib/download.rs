//! Browser file downloads for data exports.

use crate::app_lib::AppError;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

fn browser_error(err: &JsValue) -> AppError {
    AppError::Browser(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Offers `value` as a pretty-printed JSON file named `filename`.
pub fn save_json(filename: &str, value: &Value) -> Result<(), AppError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Serialization(err.to_string()))?;
    let parts = js_sys::Array::of1(&JsValue::from_str(&body));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|err| browser_error(&err))?;
    let href = Url::create_object_url_with_blob(&blob).map_err(|err| browser_error(&err))?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| AppError::Browser("document is not available".to_string()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|err| browser_error(&err))?
        .dyn_into()
        .map_err(|_| AppError::Browser("anchor element expected".to_string()))?;
    anchor.set_href(&href);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&href).map_err(|err| browser_error(&err))
}
