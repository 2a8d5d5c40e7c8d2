//! UCI wireless categorizer for configuration templates
//!
//! This library reshapes the flat `wireless` config of an OpenWrt router
//! (as returned by `ubus call uci get '{"config":"wireless"}'`) into groups
//! of access-point interfaces keyed by radio mode, so templates can emit one
//! block per band.
//!
//! # Modules
//!
//! - [`record`] - Typed UCI sections with required-field validation
//! - [`categorize`] - Grouping of interfaces by their radio's `hwmode`
//! - [`filter`] - Tera filter and template rendering helpers
//! - [`config`] - User settings stored as TOML
//! - [`error`] - Custom error types for the library
//!
//! # Example Usage
//!
//! ```
//! use serde_json::json;
//! use uci_wireless::{categorize, WirelessConfig};
//!
//! let config = WirelessConfig::from_value(&json!({
//!     "radio0": {
//!         ".type": "wifi-device", ".name": "radio0", ".index": 0,
//!         ".anonymous": false, "hwmode": "11g", "htmode": "HT20"
//!     },
//!     "cfg01": {
//!         ".type": "wifi-iface", ".name": "cfg01", ".index": 1,
//!         ".anonymous": true, "device": "radio0"
//!     }
//! })).unwrap();
//!
//! let groups = categorize(&config).unwrap();
//! assert_eq!(groups.group("11g").unwrap()[0].iface, "cfg01");
//! assert_eq!(groups.all().len(), 1);
//! ```

/// Categorizer turning parsed sections into per-mode interface groups.
pub mod categorize;

/// Configuration module for the CLI's saved defaults.
pub mod config;

/// Error module defining custom error types for the library.
/// Uses `thiserror` for ergonomic error handling.
pub mod error;

/// Tera integration exposing `categorize_wireless` to templates.
pub mod filter;

/// Parsing of raw UCI JSON into typed wireless sections.
pub mod record;

pub use categorize::{
    categorize, categorize_value, categorize_with, Categorized, InterfaceOrder, WirelessEntry,
    ALL_GROUP,
};

pub use error::{CategorizeError, CategorizeResult};

pub use filter::{register_filters, render, render_summary};

pub use record::{WifiDevice, WifiIface, WirelessConfig, WirelessSection};
