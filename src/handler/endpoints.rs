//! The standard endpoints served by the binary.
//!
//! | method | template          | response                                         |
//! |--------|-------------------|--------------------------------------------------|
//! | GET    | `/`               | 200, empty body                                  |
//! | GET    | `/echo/{msg}`     | 200, `msg` as text, gzip when negotiated         |
//! | GET    | `/user-agent`     | 200, the `User-Agent` header (dropped if absent) |
//! | GET    | `/files/{name}`   | 200 with the file contents, or 404               |
//! | POST   | `/files/{name}`   | 201 after storing the request body               |

use std::sync::Arc;

use crate::handler::router::Router;
use crate::handler::storage::FileStorage;
use crate::handler::{HandlerError, HandlerResult};
use crate::http::encoding::Negotiation;
use crate::http::request::HttpRequest;
use crate::http::response::{CONTENT_TYPE, HttpResponse};

const TEXT_PLAIN: &str = "text/plain";
const OCTET_STREAM: &str = "application/octet-stream";
const USER_AGENT: &str = "User-Agent";

pub fn default_router(storage: Arc<dyn FileStorage>) -> Router {
    let mut router = Router::new();
    let reader = Arc::clone(&storage);

    router
        .get("/", root)
        .get("/echo/{msg}", echo)
        .get("/user-agent", user_agent)
        .get("/files/{name}", move |req: &HttpRequest| read_file(reader.as_ref(), req))
        .post("/files/{name}", move |req: &HttpRequest| write_file(storage.as_ref(), req));

    router
}

pub fn root(_req: &HttpRequest) -> HandlerResult {
    Ok(HttpResponse::ok())
}

pub fn echo(req: &HttpRequest) -> HandlerResult {
    let msg = param(req, "msg")?;

    Ok(HttpResponse::ok()
        .with_body(msg)
        .with_header(CONTENT_TYPE, TEXT_PLAIN)
        .with_negotiation(&Negotiation::for_request(req)))
}

pub fn user_agent(req: &HttpRequest) -> HandlerResult {
    let agent = req
        .header(USER_AGENT)
        .ok_or(HandlerError::MissingHeader(USER_AGENT))?;

    Ok(HttpResponse::ok()
        .with_body(agent)
        .with_header(CONTENT_TYPE, TEXT_PLAIN))
}

pub fn read_file(storage: &dyn FileStorage, req: &HttpRequest) -> HandlerResult {
    let name = param(req, "name")?;

    match storage.read(name)? {
        Some(contents) => Ok(HttpResponse::ok()
            .with_body(contents)
            .with_header(CONTENT_TYPE, OCTET_STREAM)),
        None => Ok(HttpResponse::not_found()),
    }
}

pub fn write_file(storage: &dyn FileStorage, req: &HttpRequest) -> HandlerResult {
    let name = param(req, "name")?;
    storage.write(name, &req.body)?;
    Ok(HttpResponse::created())
}

fn param<'a>(req: &'a HttpRequest, name: &'static str) -> Result<&'a str, HandlerError> {
    req.path_param(name).ok_or(HandlerError::MissingParam(name))
}
