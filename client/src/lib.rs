//! Client SDK for the Siren notification platform.
//!
//! # Overview
//! Two facades over the same I/O-free core (`siren-core`):
//! - [`SirenClient`]: blocking, built on `ureq`.
//! - [`AsyncSirenClient`]: non-blocking, built on `reqwest`.
//!
//! Both are constructed from a [`ClientConfig`] and expose the same domain
//! clients (messages, templates, users, webhooks, workflows). Every
//! operation returns [`Result`], whose error is either a structured
//! [`ApiError`] from the service or an [`SdkError`] for everything else.
//!
//! ```no_run
//! use siren::models::{Recipient, SendMessageRequest};
//! use siren::{ClientConfig, SirenClient};
//!
//! let config = ClientConfig::builder().api_key("sk_live").build()?;
//! let client = SirenClient::new(&config);
//! let id = client.messages().send(&SendMessageRequest {
//!     recipient: Recipient::user_id("user_123"),
//!     channel: "EMAIL".to_string(),
//!     body: Some("Your order has shipped".to_string()),
//!     template: None,
//!     template_variables: None,
//! })?;
//! println!("sent {id}");
//! client.close();
//! # Ok::<(), siren::SirenError>(())
//! ```

pub mod blocking;
pub mod config;
pub mod non_blocking;
pub mod transport;

pub use blocking::SirenClient;
pub use config::{ClientConfig, ClientConfigBuilder, Environment};
pub use non_blocking::AsyncSirenClient;
pub use siren_core::models;
pub use siren_core::{ApiError, ErrorDetail, Result, SdkError, SdkErrorKind, SirenError};
pub use transport::{AsyncTransport, ReqwestTransport, Transport, UreqTransport};
