//! Grouping of access-point interfaces by radio mode.
//!
//! Every `wifi-iface` section is joined with the `wifi-device` it names and
//! flattened into a [`WirelessEntry`]. Entries are collected under their
//! radio's `hwmode` and, in addition, under the aggregate [`ALL_GROUP`] key:
//!
//! ```text
//! {
//!   "11a": [{"device": "radio0", "htmode": "VHT80", "hwmode": "11a", "iface": "cfg033579"}],
//!   "11g": [{"device": "radio1", "htmode": "HT20",  "hwmode": "11g", "iface": "cfg063579"}],
//!   "all": [ both of the above ]
//! }
//! ```
//!
//! The first unresolved reference or malformed section aborts the whole
//! call; there is no partial result.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{CategorizeError, CategorizeResult};
use crate::record::{WifiDevice, WifiIface, WirelessConfig};

/// Group key that collects every entry regardless of mode.
pub const ALL_GROUP: &str = "all";

/// One interface joined with its radio's settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessEntry {
    pub device: String,
    pub htmode: String,
    pub hwmode: String,
    pub iface: String,
}

impl WirelessEntry {
    fn new(device: &WifiDevice, iface: &WifiIface) -> Self {
        WirelessEntry {
            device: device.name.clone(),
            htmode: device.htmode.clone(),
            hwmode: device.hwmode.clone(),
            iface: iface.name.clone(),
        }
    }
}

/// Order in which interfaces are appended to their groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceOrder {
    /// UCI section index, ties broken by name.
    #[default]
    Index,
    /// Section name.
    Name,
    /// Order of the sections in the input document.
    Input,
}

impl InterfaceOrder {
    /// Same names as the clap and serde derives; `test_order_names_agree` keeps them in step.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceOrder::Index => "index",
            InterfaceOrder::Name => "name",
            InterfaceOrder::Input => "input",
        }
    }

    fn sort(&self, ifaces: &mut [&WifiIface]) {
        match self {
            InterfaceOrder::Index => {
                ifaces.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)))
            }
            InterfaceOrder::Name => ifaces.sort_by(|a, b| a.name.cmp(&b.name)),
            InterfaceOrder::Input => {}
        }
    }
}

impl fmt::Display for InterfaceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceOrder {
    type Err = CategorizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, false)
            .map_err(|_| CategorizeError::UnknownOrder(s.to_string()))
    }
}

/// Interfaces grouped by `hwmode`, plus the [`ALL_GROUP`] aggregate.
///
/// Serializes as a plain JSON object with keys in lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Categorized {
    groups: BTreeMap<String, Vec<WirelessEntry>>,
}

impl Categorized {
    fn new() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(ALL_GROUP.to_string(), Vec::new());
        Categorized { groups }
    }

    /// Appends to the entry's mode group and to the aggregate. A radio whose
    /// `hwmode` is literally `all` therefore lands in the aggregate twice.
    fn push(&mut self, entry: WirelessEntry) {
        if !self.groups.contains_key(&entry.hwmode) {
            debug!(hwmode = %entry.hwmode, "new mode group");
        }
        self.groups
            .entry(entry.hwmode.clone())
            .or_default()
            .push(entry.clone());
        self.groups.entry(ALL_GROUP.to_string()).or_default().push(entry);
    }

    pub fn all(&self) -> &[WirelessEntry] {
        self.groups.get(ALL_GROUP).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn group(&self, hwmode: &str) -> Option<&[WirelessEntry]> {
        self.groups.get(hwmode).map(Vec::as_slice)
    }

    /// Distinct modes seen, excluding the aggregate key.
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.groups
            .keys()
            .map(String::as_str)
            .filter(|k| *k != ALL_GROUP)
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<WirelessEntry>> {
        &self.groups
    }

    pub fn into_value(self) -> CategorizeResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Groups interfaces by radio mode, ordered by UCI section index.
pub fn categorize(config: &WirelessConfig) -> CategorizeResult<Categorized> {
    categorize_with(config, InterfaceOrder::default())
}

pub fn categorize_with(
    config: &WirelessConfig,
    order: InterfaceOrder,
) -> CategorizeResult<Categorized> {
    let devices: HashMap<&str, &WifiDevice> =
        config.devices().map(|d| (d.key.as_str(), d)).collect();

    let mut ifaces: Vec<&WifiIface> = config.interfaces().collect();
    order.sort(&mut ifaces);

    let mut categorized = Categorized::new();
    for iface in ifaces {
        let device = devices.get(iface.device.as_str()).ok_or_else(|| {
            CategorizeError::DanglingReference {
                iface: iface.key.clone(),
                device: iface.device.clone(),
            }
        })?;
        categorized.push(WirelessEntry::new(device, iface));
    }

    debug!(
        interfaces = categorized.all().len(),
        modes = categorized.modes().count(),
        %order,
        "categorized wireless interfaces"
    );
    Ok(categorized)
}

/// Parses a raw `wireless` dump and categorizes it in one step.
pub fn categorize_value(value: &Value, order: InterfaceOrder) -> CategorizeResult<Categorized> {
    let config = WirelessConfig::from_value(value)?;
    categorize_with(&config, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "cfg033579": {
                ".anonymous": true,
                ".index": 1,
                ".name": "cfg033579",
                ".type": "wifi-iface",
                "device": "radio0",
                "encryption": "none",
                "mode": "ap",
                "network": "lan",
                "ssid": "OpenWrt"
            },
            "cfg063579": {
                ".anonymous": true,
                ".index": 3,
                ".name": "cfg063579",
                ".type": "wifi-iface",
                "device": "radio1",
                "encryption": "none",
                "mode": "ap",
                "network": "lan",
                "ssid": "OpenWrt"
            },
            "radio0": {
                ".anonymous": false,
                ".index": 0,
                ".name": "radio0",
                ".type": "wifi-device",
                "channel": "36",
                "disabled": "1",
                "htmode": "VHT80",
                "hwmode": "11a",
                "path": "pci0000:00/0000:00:00.0/0000:01:00.0",
                "type": "mac80211"
            },
            "radio1": {
                ".anonymous": false,
                ".index": 2,
                ".name": "radio1",
                ".type": "wifi-device",
                "channel": "11",
                "disabled": "1",
                "htmode": "HT20",
                "hwmode": "11g",
                "path": "pci0000:00/0000:00:01.0/0000:02:00.0",
                "type": "mac80211"
            }
        })
    }

    fn iface(name: &str, index: i64, device: &str) -> Value {
        json!({
            ".anonymous": true,
            ".index": index,
            ".name": name,
            ".type": "wifi-iface",
            "device": device
        })
    }

    #[test]
    fn test_categorize_wireless() {
        let result = categorize_value(&fixture(), InterfaceOrder::Index)
            .unwrap()
            .into_value()
            .unwrap();

        let expected = json!({
            "11a": [{"device": "radio0", "htmode": "VHT80", "iface": "cfg033579", "hwmode": "11a"}],
            "11g": [{"device": "radio1", "htmode": "HT20", "iface": "cfg063579", "hwmode": "11g"}],
            "all": [
                {"device": "radio0", "htmode": "VHT80", "iface": "cfg033579", "hwmode": "11a"},
                {"device": "radio1", "htmode": "HT20", "iface": "cfg063579", "hwmode": "11g"}
            ]
        });
        assert_eq!(result, expected);
    }

    #[test]
    fn test_no_interfaces_yields_empty_all() {
        let mut input = fixture();
        let map = input.as_object_mut().unwrap();
        map.remove("cfg033579");
        map.remove("cfg063579");

        let result = categorize_value(&input, InterfaceOrder::Index).unwrap();
        assert_eq!(result.into_value().unwrap(), json!({ "all": [] }));

        let empty = categorize_value(&json!({}), InterfaceOrder::Index).unwrap();
        assert_eq!(empty.into_value().unwrap(), json!({ "all": [] }));
    }

    #[test]
    fn test_all_counts_every_mode_entry() {
        let mut input = fixture();
        input["cfg0a"] = iface("cfg0a", 4, "radio0");
        input["cfg0b"] = iface("cfg0b", 5, "radio1");
        input["cfg0c"] = iface("cfg0c", 6, "radio0");

        let result = categorize_value(&input, InterfaceOrder::Index).unwrap();
        let per_mode: usize = result
            .modes()
            .map(|m| result.group(m).unwrap().len())
            .sum();

        assert_eq!(result.all().len(), 5);
        assert_eq!(per_mode, result.all().len());
        assert_eq!(result.group("11a").unwrap().len(), 3);
    }

    #[test]
    fn test_mode_groups_preserve_all_order() {
        let mut input = fixture();
        input["cfg0a"] = iface("cfg0a", 4, "radio0");
        input["cfg0b"] = iface("cfg0b", 5, "radio1");

        let result = categorize_value(&input, InterfaceOrder::Index).unwrap();
        for mode in result.modes() {
            let from_all: Vec<&WirelessEntry> =
                result.all().iter().filter(|e| e.hwmode == mode).collect();
            let group: Vec<&WirelessEntry> = result.group(mode).unwrap().iter().collect();
            assert_eq!(group, from_all);
        }
    }

    #[test]
    fn test_idempotent_and_input_untouched() {
        let input = fixture();
        let before = input.clone();

        let first = categorize_value(&input, InterfaceOrder::Index).unwrap();
        let second = categorize_value(&input, InterfaceOrder::Index).unwrap();

        assert_eq!(first, second);
        assert_eq!(input, before);
    }

    #[test]
    fn test_dangling_device() {
        let mut input = fixture();
        input["cfg0x"] = iface("cfg0x", 9, "radio7");

        let err = categorize_value(&input, InterfaceOrder::Index).unwrap_err();
        match err {
            CategorizeError::DanglingReference { iface, device } => {
                assert_eq!(iface, "cfg0x");
                assert_eq!(device, "radio7");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_device_pointing_at_iface_is_dangling() {
        let mut input = fixture();
        input["cfg0x"] = iface("cfg0x", 9, "cfg033579");

        assert!(matches!(
            categorize_value(&input, InterfaceOrder::Index),
            Err(CategorizeError::DanglingReference { .. })
        ));
    }

    #[test]
    fn test_other_sections_ignored() {
        let mut input = fixture();
        input["vlan0"] = json!({ ".type": "wifi-vlan", ".name": "vlan0" });

        let result = categorize_value(&input, InterfaceOrder::Index).unwrap();
        assert_eq!(result.all().len(), 2);
    }

    #[test]
    fn test_interface_orders() {
        let input = json!({
            "radio0": {
                ".anonymous": false, ".index": 0, ".name": "radio0",
                ".type": "wifi-device", "hwmode": "11g", "htmode": "HT20"
            },
            "zeta": iface("zeta", 1, "radio0"),
            "alpha": iface("alpha", 2, "radio0")
        });
        let names = |order| -> Vec<String> {
            categorize_value(&input, order)
                .unwrap()
                .all()
                .iter()
                .map(|e| e.iface.clone())
                .collect()
        };

        assert_eq!(names(InterfaceOrder::Index), vec!["zeta", "alpha"]);
        assert_eq!(names(InterfaceOrder::Name), vec!["alpha", "zeta"]);
        assert_eq!(names(InterfaceOrder::Input), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_mode_named_all_appends_twice() {
        let input = json!({
            "radio0": {
                ".anonymous": false, ".index": 0, ".name": "radio0",
                ".type": "wifi-device", "hwmode": "all", "htmode": "HT20"
            },
            "cfg01": iface("cfg01", 1, "radio0")
        });

        let result = categorize_value(&input, InterfaceOrder::Index).unwrap();
        assert_eq!(result.all().len(), 2);
        assert_eq!(result.all()[0], result.all()[1]);
        assert_eq!(result.all()[0].iface, "cfg01");
        assert_eq!(result.modes().count(), 0);
    }

    #[test]
    fn test_order_from_str() {
        assert_eq!("name".parse::<InterfaceOrder>().unwrap(), InterfaceOrder::Name);
        assert_eq!(InterfaceOrder::Input.to_string(), "input");
        assert!("random".parse::<InterfaceOrder>().is_err());
    }

    #[test]
    fn test_order_names_agree() {
        for order in InterfaceOrder::value_variants() {
            let cli = order.to_possible_value().unwrap();
            assert_eq!(cli.get_name(), order.as_str());
            assert_eq!(serde_json::to_value(order).unwrap(), json!(order.as_str()));
            assert_eq!(order.as_str().parse::<InterfaceOrder>().unwrap(), *order);
        }
    }
}
