//! Rolling packet log with cumulative session counters.
//!
//! The log keeps at most [`MAX_LOG_ENTRIES`] packets; the counters keep
//! counting past that cap until [`Session::clear`] is called.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::traffic::{MAX_LOG_ENTRIES, Packet};

/// One bar of the protocol distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolCount {
    pub name: String,
    pub value: u64,
}

/// Snapshot of the session counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub total_packets: u64,
    pub total_attacks: u64,
    pub bandwidth_in: u64,
    #[serde(rename = "activeIPs")]
    pub active_ips: usize,
    pub protocol_distribution: Vec<ProtocolCount>,
    pub online_devices: usize,
}

#[derive(Debug, Default)]
pub struct Session {
    log: Vec<Packet>,
    total_packets: u64,
    total_attacks: u64,
    bandwidth_in: u64,
    seen_ips: HashSet<String>,
    proto_counts: BTreeMap<String, u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a batch into the session. An empty batch changes nothing.
    pub fn ingest(&mut self, batch: Vec<Packet>) {
        if batch.is_empty() {
            return;
        }

        let mut new_bytes = 0u64;
        let mut new_attacks = 0u64;
        let count = batch.len() as u64;

        for p in batch {
            new_bytes += p.size;
            if p.is_attack {
                new_attacks += 1;
            }
            self.seen_ips.insert(p.source_ip.clone());
            self.seen_ips.insert(p.dest_ip.clone());
            *self
                .proto_counts
                .entry(p.protocol.as_str().to_string())
                .or_insert(0) += 1;
            self.log.push(p);
        }

        if self.log.len() > MAX_LOG_ENTRIES {
            let excess = self.log.len() - MAX_LOG_ENTRIES;
            self.log.drain(..excess);
        }

        self.total_packets += count;
        self.total_attacks += new_attacks;
        self.bandwidth_in += new_bytes;

        tracing::debug!(
            packets = count,
            attacks = new_attacks,
            bytes = new_bytes,
            retained = self.log.len(),
            "ingested batch"
        );
    }

    pub fn stats(&self, online_devices: usize) -> NetworkStats {
        NetworkStats {
            total_packets: self.total_packets,
            total_attacks: self.total_attacks,
            bandwidth_in: self.bandwidth_in,
            active_ips: self.seen_ips.len(),
            protocol_distribution: self
                .proto_counts
                .iter()
                .map(|(name, value)| ProtocolCount {
                    name: name.clone(),
                    value: *value,
                })
                .collect(),
            online_devices,
        }
    }

    /// Drop the log and reset every counter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_threats(&self) -> bool {
        self.total_attacks > 0
    }

    /// Retained packets, oldest first.
    pub fn packets(&self) -> &[Packet] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::{Protocol, packet};

    #[test]
    fn test_empty_batch_is_noop() {
        let mut s = Session::new();
        s.ingest(vec![]);
        assert!(s.is_empty());
        assert_eq!(s.stats(0).total_packets, 0);
    }

    #[test]
    fn test_counters() {
        let mut s = Session::new();
        let mut attack = packet("10.0.0.9", "192.168.1.10", Protocol::Tcp, 40);
        attack.is_attack = true;
        s.ingest(vec![
            packet("192.168.1.10", "8.8.8.8", Protocol::Https, 100),
            packet("192.168.1.10", "8.8.8.8", Protocol::Dns, 60),
            attack,
        ]);

        let stats = s.stats(2);
        assert_eq!(stats.total_packets, 3);
        assert_eq!(stats.total_attacks, 1);
        assert_eq!(stats.bandwidth_in, 200);
        assert_eq!(stats.active_ips, 3);
        assert_eq!(stats.online_devices, 2);
        let names: Vec<&str> = stats
            .protocol_distribution
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["DNS", "HTTPS", "TCP"]);
        assert!(s.has_threats());
    }

    #[test]
    fn test_stats_json_keys() {
        let mut s = Session::new();
        s.ingest(vec![packet("192.168.1.10", "8.8.8.8", Protocol::Https, 100)]);
        let v = serde_json::to_value(s.stats(2)).unwrap();
        assert_eq!(v["activeIPs"], 2);
        assert!(v.get("activeIps").is_none());
        assert_eq!(v["totalPackets"], 1);
        assert_eq!(v["bandwidthIn"], 100);
        assert_eq!(v["protocolDistribution"][0]["name"], "HTTPS");
        assert_eq!(v["onlineDevices"], 2);
    }

    #[test]
    fn test_log_is_capped_but_counters_are_not() {
        let mut s = Session::new();
        for i in 0..(MAX_LOG_ENTRIES + 20) {
            let mut p = packet("192.168.1.10", "8.8.8.8", Protocol::Udp, 1);
            p.id = i.to_string();
            s.ingest(vec![p]);
        }
        assert_eq!(s.len(), MAX_LOG_ENTRIES);
        assert_eq!(s.packets()[0].id, "20");
        assert_eq!(s.stats(0).total_packets, (MAX_LOG_ENTRIES + 20) as u64);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut s = Session::new();
        let mut attack = packet("10.0.0.9", "192.168.1.10", Protocol::Tcp, 40);
        attack.is_attack = true;
        s.ingest(vec![attack]);
        s.clear();

        assert!(s.is_empty());
        assert!(!s.has_threats());
        let stats = s.stats(1);
        assert_eq!(stats.active_ips, 0);
        assert!(stats.protocol_distribution.is_empty());
        assert_eq!(stats.online_devices, 1);
    }
}
