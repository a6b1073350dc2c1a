//! # storefront-checkout
//!
//! Runs the storefront-core pricing pipeline for one checkout, under a
//! loaded configuration and with structured logging.
//!
//! ## Usage
//! ```rust,no_run
//! use storefront_checkout::{telemetry, CheckoutConfig, CheckoutSession};
//! # fn run(form: storefront_core::SummaryFormData,
//! #        hsn: Vec<storefront_core::HsnReference>) -> storefront_checkout::CheckoutResult<()> {
//! let config = CheckoutConfig::load_or_default(None);
//! telemetry::init_tracing(&config.logging.filter);
//!
//! let mut session = CheckoutSession::new(config, form);
//! session.apply_taxes(&hsn);
//! session.recalculate_totals();
//!
//! let body = session.payload_json()?;
//! // POST `body` to /orders or /quotes
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;

pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use session::CheckoutSession;
