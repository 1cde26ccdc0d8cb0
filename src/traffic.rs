//! Traffic data types shared by the demo, session and topology modules.
//!
//! The JSON shapes use camelCase field names, matching the dashboard's
//! `/api/traffic` and `/api/devices` payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The local gateway; always present in the topology.
pub const GATEWAY_IP: &str = "192.168.1.1";
/// Addresses with this prefix are treated as local devices.
pub const LOCAL_PREFIX: &str = "192.168.";
/// Maximum number of packets retained in a session log.
pub const MAX_LOG_ENTRIES: usize = 500;
/// Number of most recent packets considered when building a topology.
pub const TOPOLOGY_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Http,
    Https,
    Arp,
    Icmp,
    Ssh,
    Dns,
    Quic,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
            Protocol::Arp => "ARP",
            Protocol::Icmp => "ICMP",
            Protocol::Ssh => "SSH",
            Protocol::Dns => "DNS",
            Protocol::Quic => "QUIC",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    #[serde(rename = "DoS/DDoS")]
    Dos,
    #[serde(rename = "Port Scan")]
    PortScan,
    #[serde(rename = "ARP Spoof")]
    ArpSpoof,
    #[serde(rename = "Malware C2")]
    MalwareC2,
    #[serde(rename = "Ransomware Beacon")]
    RansomwareBeacon,
    #[serde(rename = "SQL Injection")]
    SqlInjection,
    #[serde(rename = "MITM")]
    Mitm,
}

/// A single observed packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Packet {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub source_ip: String,
    pub dest_ip: String,
    pub protocol: Protocol,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_port: Option<u16>,
    pub info: String,
    pub is_attack: bool,
    pub attack_type: Option<AttackType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_mac: Option<String>,
}

impl Packet {
    /// Case-insensitive text match used by the packet log filter.
    ///
    /// IPs are compared against the lower-cased filter as-is; protocol, info
    /// and process name are lower-cased first. An empty filter matches.
    pub fn matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        self.source_ip.contains(&needle)
            || self.dest_ip.contains(&needle)
            || self.protocol.as_str().to_lowercase().contains(&needle)
            || self.info.to_lowercase().contains(&needle)
            || self
                .process_name
                .as_ref()
                .is_some_and(|p| p.to_lowercase().contains(&needle))
    }
}

/// Select packets for display: attacks only (if requested), then text filter.
pub fn filter_packets<'a>(
    packets: &'a [Packet],
    filter: &str,
    only_attacks: bool,
) -> Vec<&'a Packet> {
    packets
        .iter()
        .filter(|p| !only_attacks || p.is_attack)
        .filter(|p| p.matches(filter))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Mobile,
    Desktop,
    Server,
    Iot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub ip: String,
    pub mac: String,
    pub vendor: String,
    pub hostname: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub is_blocked: bool,
    pub last_seen: u64,
    /// Bytes.
    pub bandwidth_usage: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub cpu_usage: u8,
    pub ram_usage: u8,
    pub active_processes: u32,
    pub threat_level: ThreatLevel,
}

/// One poll worth of traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficBatch {
    pub packets: Vec<Packet>,
    pub system: SystemStats,
}

pub fn is_local(ip: &str) -> bool {
    ip.starts_with(LOCAL_PREFIX)
}

/// Friendly name for an address.
pub fn resolve_dns(ip: &str) -> &str {
    if ip == GATEWAY_IP {
        "Gateway"
    } else if ip.starts_with("192.168") {
        "Local Device"
    } else {
        ip
    }
}

#[cfg(test)]
pub(crate) fn packet(src: &str, dst: &str, protocol: Protocol, size: u64) -> Packet {
    Packet {
        id: format!("{}-{}-{}", src, dst, size),
        timestamp: 0,
        source_ip: src.to_string(),
        dest_ip: dst.to_string(),
        protocol,
        size,
        source_port: None,
        dest_port: None,
        info: String::new(),
        is_attack: false,
        attack_type: None,
        latency: None,
        process_name: None,
        process_id: None,
        device_mac: None,
    }
}
