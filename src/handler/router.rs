//! Template based route table.
//!
//! Routes are kept in registration order and matched by a linear scan, so the
//! first registered route that accepts a path wins over any later overlapping
//! one. A template is split on `/`; a segment of the form `{name}` captures one
//! non-empty path segment, any other segment must match verbatim.

use indexmap::IndexMap;
use std::fmt;
use tracing::{debug, warn};

use crate::handler::{Handler, HandlerResult};
use crate::http::HttpMethod;
use crate::http::request::HttpRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn compile(template: &str) -> Self {
        let segments = template
            .split('/')
            .map(|part| match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(part.to_string()),
            })
            .collect();

        Self {
            raw: template.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in template order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Matches the whole path and returns the captured parameters.
    pub fn captures(&self, path: &str) -> Option<IndexMap<String, String>> {
        let mut parts = path.split('/');
        let mut params = IndexMap::new();

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.insert(name.clone(), part.to_string());
                }
                _ => return None,
            }
        }

        // a leftover part means the path has more segments than the template
        if parts.next().is_some() {
            return None;
        }

        Some(params)
    }

    /// Same literal/placeholder layout, placeholder names ignored.
    pub fn same_shape(&self, other: &PathTemplate) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }
}

pub struct Route {
    pub method: HttpMethod,
    pub template: PathTemplate,
    handler: Box<dyn Handler>,
}

impl Route {
    pub fn call(&self, req: &HttpRequest) -> HandlerResult {
        self.handler.call(req)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .finish_non_exhaustive()
    }
}

/// A successful lookup: the route and the parameters captured from the path.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: IndexMap<String, String>,
}

/// Ordered table of routes. Populated during startup, read-only afterwards.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a route. A template with the same shape as an already
    /// registered one for the same method is ignored, the first one stays.
    pub fn add_route(
        &mut self,
        method: HttpMethod,
        template: &str,
        handler: impl Handler + 'static,
    ) -> &mut Self {
        let template = PathTemplate::compile(template);

        if self
            .routes
            .iter()
            .any(|r| r.method == method && r.template.same_shape(&template))
        {
            warn!(%method, template = template.as_str(), "duplicate route ignored");
            return self;
        }

        debug!(%method, template = template.as_str(), "route registered");
        self.routes.push(Route {
            method,
            template,
            handler: Box::new(handler),
        });
        self
    }

    pub fn get(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Get, template, handler)
    }

    pub fn post(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Post, template, handler)
    }

    pub fn put(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Put, template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Delete, template, handler)
    }

    pub fn patch(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Patch, template, handler)
    }

    pub fn head(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Head, template, handler)
    }

    pub fn options(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Options, template, handler)
    }

    pub fn trace(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Trace, template, handler)
    }

    pub fn connect(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Self {
        self.add_route(HttpMethod::Connect, template, handler)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route, in registration order, whose method and template accept the request.
    pub fn find(&self, method: HttpMethod, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|r| r.method == method)
            .find_map(|route| {
                route
                    .template
                    .captures(path)
                    .map(|params| RouteMatch { route, params })
            })
    }
}
