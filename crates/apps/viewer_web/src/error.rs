use catalog::CatalogError;
use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum ViewerError {
    NotConfigured,
    Http(String),
    Catalog(CatalogError),
    Json(serde_json::Error),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::NotConfigured => write!(f, "CMS connection is not configured"),
            ViewerError::Http(msg) => write!(f, "request failed: {msg}"),
            ViewerError::Catalog(err) => write!(f, "{err}"),
            ViewerError::Json(err) => write!(f, "invalid JSON: {err}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Catalog(err) => Some(err),
            ViewerError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for ViewerError {
    fn from(err: CatalogError) -> Self {
        ViewerError::Catalog(err)
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Json(err)
    }
}

impl From<gloo_net::Error> for ViewerError {
    fn from(err: gloo_net::Error) -> Self {
        ViewerError::Http(err.to_string())
    }
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
