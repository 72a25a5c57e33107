//! Rendering service boundary
//!
//! This module is the only place that talks to the external HTML-to-PDF
//! service:
//! - `RenderRequest` validates the HTML size before anything is sent
//! - `RenderClient` is the seam the engine and TOC renderers call through
//! - `HttpRenderClient` is the production implementation

mod client;
mod http;

pub use client::{RenderClient, RenderRequest};
pub use http::HttpRenderClient;
