pub mod endpoints;
pub mod router;
pub mod storage;

use thiserror::Error;
use tracing::debug;

use crate::handler::router::Router;
use crate::handler::storage::StorageError;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// Faults raised while a handler builds its response. They never reach the
/// client as a status code: the connection is dropped instead.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("missing path parameter `{0}`")]
    MissingParam(&'static str),

    #[error("missing request header `{0}`")]
    MissingHeader(&'static str),
}

pub type HandlerResult = Result<HttpResponse, HandlerError>;

/// Turns a matched request into a response.
///
/// Implemented for every `Fn(&HttpRequest) -> HandlerResult` that can be
/// shared across connection tasks.
pub trait Handler: Send + Sync {
    fn call(&self, req: &HttpRequest) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&HttpRequest) -> HandlerResult + Send + Sync,
{
    fn call(&self, req: &HttpRequest) -> HandlerResult {
        self(req)
    }
}

/// Resolves the request through the router and runs the matched handler.
/// Unmatched requests get a bare 404.
pub fn handle_request(router: &Router, req: HttpRequest) -> HandlerResult {
    match router.find(req.method, &req.path) {
        Some(matched) => {
            debug!(
                method = %req.method,
                path = %req.path,
                template = matched.route.template.as_str(),
                "route matched"
            );
            let req = req.with_path_params(matched.params);
            matched.route.call(&req)
        }
        None => {
            debug!(method = %req.method, path = %req.path, "no route matched");
            Ok(HttpResponse::not_found())
        }
    }
}
