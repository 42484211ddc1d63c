//! A small client for PayPal's Orders API, plus the `paypalctl` command-line tool built on it.
//!
//! ```no_run
//! # async fn demo() -> Result<(), paypalctl::api::ApiError> {
//! use paypalctl::api::{ClientConfig, PaypalClient};
//!
//! let config = ClientConfig::new("sandbox", "client-id", "client-secret")?;
//! let mut client = PaypalClient::new(config);
//! let order = client
//!     .create_order(&serde_json::json!({
//!         "intent": "CAPTURE",
//!         "purchase_units": [{"amount": {"currency_code": "USD", "value": "10.00"}}],
//!     }))
//!     .await?;
//! println!("created {}", order["id"]);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod storage;
