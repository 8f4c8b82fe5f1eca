//! # multiseek backend client
//!
//! Typed gateway to the multimodal search backend. The orchestrators in
//! `multiseek-core` only see the [`SearchBackend`] trait; [`HttpGateway`] is
//! the production implementation.
//!
//! ## Example
//!
//! ```no_run
//! use multiseek_backend_client::{GatewayConfig, HttpGateway, SearchBackend};
//! use multiseek_protocol::{Query, SearchOptions};
//!
//! # async fn run() -> multiseek_backend_client::Result<()> {
//! let gateway = HttpGateway::new(GatewayConfig::from_env())?;
//! let response = gateway
//!     .search(&Query::text("red car"), &SearchOptions::default())
//!     .await?;
//! println!("{} hits", response.total());
//! # Ok(())
//! # }
//! ```

mod backend;
mod client;
mod config;
mod error;
mod feed;
mod multipart;

pub use backend::SearchBackend;
pub use client::HttpGateway;
pub use config::API_URL_ENV_VAR;
pub use config::DEFAULT_API_URL;
pub use config::FeedSource;
pub use config::GatewayConfig;
pub use config::ImageSearchRoute;
pub use error::GatewayError;
pub use error::Result;
