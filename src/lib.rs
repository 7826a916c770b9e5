//! A small HTTP/1.1 server: one request per connection, template routing and
//! gzip content negotiation.

pub mod config;
pub mod handler;
pub mod http;
pub mod net;
