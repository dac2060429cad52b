//! Picsum MCP Image Server Library
//!
//! This library exposes the picsum.photos image service as an MCP tool.

pub mod client;
pub mod greeting;
pub mod handler;
pub mod prompts;
pub mod server;

pub use client::{
    Base64ImageWrapper, HttpClient, HttpResponse, ImagePayload, ImageWrapper, ReqwestClient,
};
pub use greeting::GreetingService;
pub use handler::{
    ImageFormat, ImageHandler, ImageOutput, ImageParams, ImageRequest, ImageSpec, OutputKind,
    SeedInfo, ValidationError,
};
pub use server::PicsumServer;
