//! Typed view over a UCI `wireless` dump.
//!
//! `ubus call uci get '{"config":"wireless"}'` returns one JSON object per
//! section, keyed by section name. Each section carries the reserved UCI
//! fields (`.type`, `.name`, `.index`, `.anonymous`) next to its options.
//! This module validates the fields the categorizer needs up front, so a
//! malformed section is rejected while parsing instead of halfway through
//! grouping.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use uci_wireless::record::WirelessConfig;
//!
//! let config = WirelessConfig::from_value(&json!({
//!     "radio0": {
//!         ".type": "wifi-device", ".name": "radio0", ".index": 0,
//!         ".anonymous": false, "hwmode": "11a", "htmode": "VHT80"
//!     }
//! })).unwrap();
//!
//! assert_eq!(config.device("radio0").unwrap().hwmode, "11a");
//! ```

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CategorizeError, CategorizeResult};

/// `.type` of a section describing a physical radio.
pub const WIFI_DEVICE: &str = "wifi-device";

/// `.type` of a section describing an access-point interface.
pub const WIFI_IFACE: &str = "wifi-iface";

/// A physical radio (`config wifi-device`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiDevice {
    /// Key of the section in the input mapping. Interfaces refer to it.
    pub key: String,
    pub name: String,
    pub index: i64,
    pub anonymous: bool,
    /// Band/mode identifier such as `11a` or `11g`.
    pub hwmode: String,
    /// Channel width such as `HT20` or `VHT80`.
    pub htmode: String,
}

/// An access-point interface bound to a radio (`config wifi-iface`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiIface {
    pub key: String,
    pub name: String,
    pub index: i64,
    pub anonymous: bool,
    /// Key of the owning `wifi-device` section.
    pub device: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WirelessSection {
    Device(WifiDevice),
    Iface(WifiIface),
    /// Any section type the categorizer does not use (e.g. `wifi-vlan`).
    Other {
        key: String,
        name: String,
        section_type: String,
    },
}

impl WirelessSection {
    /// Parses one section, checking the fields its `.type` requires.
    pub fn from_value(key: &str, value: &Value) -> CategorizeResult<Self> {
        let map = value.as_object().ok_or_else(|| CategorizeError::NotAMapping {
            key: key.to_string(),
        })?;
        let fields = SectionFields { key, map };

        let section_type = fields.text(".type")?;
        let name = fields.text(".name")?;

        let section = match section_type.as_str() {
            WIFI_DEVICE => WirelessSection::Device(WifiDevice {
                key: key.to_string(),
                name,
                index: fields.integer(".index")?,
                anonymous: fields.boolean(".anonymous")?,
                hwmode: fields.text("hwmode")?,
                htmode: fields.text("htmode")?,
            }),
            WIFI_IFACE => WirelessSection::Iface(WifiIface {
                key: key.to_string(),
                name,
                index: fields.integer(".index")?,
                anonymous: fields.boolean(".anonymous")?,
                device: fields.text("device")?,
            }),
            _ => WirelessSection::Other {
                key: key.to_string(),
                name,
                section_type,
            },
        };

        Ok(section)
    }

    pub fn key(&self) -> &str {
        match self {
            WirelessSection::Device(d) => &d.key,
            WirelessSection::Iface(i) => &i.key,
            WirelessSection::Other { key, .. } => key,
        }
    }
}

/// The parsed `wireless` config, sections kept in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WirelessConfig {
    sections: Vec<WirelessSection>,
}

impl WirelessConfig {
    /// Parses a `wireless` dump.
    ///
    /// Accepts either the bare section mapping or the ubus reply envelope
    /// `{"values": {...}}`.
    pub fn from_value(value: &Value) -> CategorizeResult<Self> {
        let map = value.as_object().ok_or(CategorizeError::InputNotAMapping)?;
        let map = unwrap_envelope(map);

        let sections = map
            .iter()
            .map(|(key, section)| WirelessSection::from_value(key, section))
            .collect::<CategorizeResult<Vec<_>>>()?;

        let config = WirelessConfig { sections };
        debug!(
            sections = config.sections.len(),
            devices = config.devices().count(),
            interfaces = config.interfaces().count(),
            "parsed wireless config"
        );
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> CategorizeResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn sections(&self) -> &[WirelessSection] {
        &self.sections
    }

    pub fn devices(&self) -> impl Iterator<Item = &WifiDevice> {
        self.sections.iter().filter_map(|s| match s {
            WirelessSection::Device(d) => Some(d),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &WifiIface> {
        self.sections.iter().filter_map(|s| match s {
            WirelessSection::Iface(i) => Some(i),
            _ => None,
        })
    }

    /// Looks up a radio by section key.
    pub fn device(&self, key: &str) -> Option<&WifiDevice> {
        self.devices().find(|d| d.key == key)
    }
}

fn unwrap_envelope(map: &Map<String, Value>) -> &Map<String, Value> {
    if map.len() != 1 {
        return map;
    }
    match map.get("values") {
        // A section that happens to be named "values" has a `.type`.
        Some(Value::Object(inner)) if !inner.contains_key(".type") => inner,
        _ => map,
    }
}

struct SectionFields<'a> {
    key: &'a str,
    map: &'a Map<String, Value>,
}

impl SectionFields<'_> {
    fn get(&self, field: &str) -> CategorizeResult<&Value> {
        self.map.get(field).ok_or_else(|| CategorizeError::MissingField {
            key: self.key.to_string(),
            field: field.to_string(),
        })
    }

    fn invalid(&self, field: &str, expected: &'static str) -> CategorizeError {
        CategorizeError::InvalidField {
            key: self.key.to_string(),
            field: field.to_string(),
            expected,
        }
    }

    fn text(&self, field: &str) -> CategorizeResult<String> {
        self.get(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    fn integer(&self, field: &str) -> CategorizeResult<i64> {
        self.get(field)?
            .as_i64()
            .ok_or_else(|| self.invalid(field, "an integer"))
    }

    fn boolean(&self, field: &str) -> CategorizeResult<bool> {
        self.get(field)?
            .as_bool()
            .ok_or_else(|| self.invalid(field, "a boolean"))
    }
}
