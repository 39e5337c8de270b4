//! Proxy kind classification
//!
//! Every kind carries a fixed tag string and a group flag. Both live in a
//! single static table so the classification stays in one place.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::codec::DecodeError;

/// Protocol or selection-group classification of a proxy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKind {
    Direct,
    Reject,
    RejectDrop,
    Compatible,
    Pass,
    Shadowsocks,
    ShadowsocksR,
    Snell,
    Socks5,
    Http,
    Vmess,
    Vless,
    Trojan,
    Hysteria,
    Hysteria2,
    Tuic,
    WireGuard,
    Dns,
    Ssh,
    Mieru,
    Relay,
    Selector,
    Fallback,
    URLTest,
    LoadBalance,
    Unknown,
}

/// Tag string and group flag for each kind, in declaration order.
static KIND_TABLE: [(ProxyKind, &str, bool); 26] = [
    (ProxyKind::Direct, "Direct", false),
    (ProxyKind::Reject, "Reject", false),
    (ProxyKind::RejectDrop, "RejectDrop", false),
    (ProxyKind::Compatible, "Compatible", false),
    (ProxyKind::Pass, "Pass", false),
    (ProxyKind::Shadowsocks, "Shadowsocks", false),
    (ProxyKind::ShadowsocksR, "ShadowsocksR", false),
    (ProxyKind::Snell, "Snell", false),
    (ProxyKind::Socks5, "Socks5", false),
    (ProxyKind::Http, "Http", false),
    (ProxyKind::Vmess, "Vmess", false),
    (ProxyKind::Vless, "Vless", false),
    (ProxyKind::Trojan, "Trojan", false),
    (ProxyKind::Hysteria, "Hysteria", false),
    (ProxyKind::Hysteria2, "Hysteria2", false),
    (ProxyKind::Tuic, "Tuic", false),
    (ProxyKind::WireGuard, "WireGuard", false),
    (ProxyKind::Dns, "Dns", false),
    (ProxyKind::Ssh, "Ssh", false),
    (ProxyKind::Mieru, "Mieru", false),
    (ProxyKind::Relay, "Relay", true),
    (ProxyKind::Selector, "Selector", true),
    (ProxyKind::Fallback, "Fallback", true),
    (ProxyKind::URLTest, "URLTest", true),
    (ProxyKind::LoadBalance, "LoadBalance", true),
    (ProxyKind::Unknown, "Unknown", false),
];

impl ProxyKind {
    /// All kinds, in declaration order.
    pub const ALL: [ProxyKind; 26] = [
        ProxyKind::Direct,
        ProxyKind::Reject,
        ProxyKind::RejectDrop,
        ProxyKind::Compatible,
        ProxyKind::Pass,
        ProxyKind::Shadowsocks,
        ProxyKind::ShadowsocksR,
        ProxyKind::Snell,
        ProxyKind::Socks5,
        ProxyKind::Http,
        ProxyKind::Vmess,
        ProxyKind::Vless,
        ProxyKind::Trojan,
        ProxyKind::Hysteria,
        ProxyKind::Hysteria2,
        ProxyKind::Tuic,
        ProxyKind::WireGuard,
        ProxyKind::Dns,
        ProxyKind::Ssh,
        ProxyKind::Mieru,
        ProxyKind::Relay,
        ProxyKind::Selector,
        ProxyKind::Fallback,
        ProxyKind::URLTest,
        ProxyKind::LoadBalance,
        ProxyKind::Unknown,
    ];

    fn entry(self) -> &'static (ProxyKind, &'static str, bool) {
        // Discriminants follow declaration order, same as KIND_TABLE.
        &KIND_TABLE[self as usize]
    }

    /// Get the tag string used by both text and binary encodings
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Whether this kind is a selection group rather than a concrete endpoint
    pub fn is_group(self) -> bool {
        self.entry().2
    }

    /// Look up a kind by its exact tag string.
    pub fn from_name(name: &str) -> Option<ProxyKind> {
        KIND_TABLE
            .iter()
            .find(|(_, tag, _)| *tag == name)
            .map(|(kind, _, _)| *kind)
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProxyKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProxyKind::from_name(s).ok_or_else(|| DecodeError::UnknownKind(s.to_string()))
    }
}

impl Serialize for ProxyKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ProxyKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KindVisitor;

        impl<'de> Visitor<'de> for KindVisitor {
            type Value = ProxyKind;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a proxy kind name")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                ProxyKind::from_name(value)
                    .ok_or_else(|| E::custom(format!("unknown proxy kind `{}`", value)))
            }
        }

        deserializer.deserialize_str(KindVisitor)
    }
}
