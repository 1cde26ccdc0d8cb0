//! Build a node/link graph from recent packets.
//!
//! Only the newest [`TOPOLOGY_WINDOW`] packets are considered. Links are
//! undirected and keyed by the sorted address pair. Traffic from a local
//! device to an external host is drawn as two hops through the gateway.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Serialize, Serializer};

use crate::traffic::{GATEWAY_IP, Packet, TOPOLOGY_WINDOW, is_local, resolve_dns};

/// Node role; serialized as its number (1 gateway .. 4 attacker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeGroup {
    Gateway = 1,
    Local = 2,
    External = 3,
    Attacker = 4,
}

impl Serialize for NodeGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub group: NodeGroup,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

fn link_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

pub fn build_topology(packets: &[Packet]) -> Topology {
    let start = packets.len().saturating_sub(TOPOLOGY_WINDOW);
    let window = &packets[start..];

    let mut active: BTreeSet<&str> = BTreeSet::new();
    let mut attackers: HashSet<&str> = HashSet::new();
    let mut links: BTreeMap<(String, String), u64> = BTreeMap::new();

    active.insert(GATEWAY_IP);

    for pkt in window {
        active.insert(&pkt.source_ip);
        active.insert(&pkt.dest_ip);
        if pkt.is_attack {
            attackers.insert(&pkt.source_ip);
        }

        let key = if is_local(&pkt.source_ip) && !is_local(&pkt.dest_ip) {
            *links
                .entry(link_key(&pkt.source_ip, GATEWAY_IP))
                .or_insert(0) += 1;
            link_key(GATEWAY_IP, &pkt.dest_ip)
        } else {
            link_key(&pkt.source_ip, &pkt.dest_ip)
        };
        *links.entry(key).or_insert(0) += 1;
    }

    let nodes = active
        .into_iter()
        .map(|id| {
            let group = if attackers.contains(id) {
                NodeGroup::Attacker
            } else if id == GATEWAY_IP {
                NodeGroup::Gateway
            } else if is_local(id) {
                NodeGroup::Local
            } else {
                NodeGroup::External
            };
            Node {
                id: id.to_string(),
                group,
                label: resolve_dns(id).to_string(),
            }
        })
        .collect();

    let links = links
        .into_iter()
        .map(|((source, target), value)| Link {
            source,
            target,
            value,
        })
        .collect();

    Topology { nodes, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::{Protocol, packet};

    #[test]
    fn test_empty_is_gateway_only() {
        let t = build_topology(&[]);
        assert_eq!(t.nodes.len(), 1);
        assert_eq!(t.nodes[0].id, GATEWAY_IP);
        assert_eq!(t.nodes[0].group, NodeGroup::Gateway);
        assert_eq!(t.nodes[0].label, "Gateway");
        assert!(t.links.is_empty());
    }

    #[test]
    fn test_external_traffic_hops_through_gateway() {
        let t = build_topology(&[
            packet("192.168.1.10", "8.8.8.8", Protocol::Https, 1),
            packet("192.168.1.10", "8.8.8.8", Protocol::Https, 1),
        ]);
        let find = |a: &str, b: &str| {
            t.links
                .iter()
                .find(|l| (l.source.as_str(), l.target.as_str()) == (a, b))
                .map(|l| l.value)
        };
        assert_eq!(find("192.168.1.1", "192.168.1.10"), Some(2));
        assert_eq!(find("192.168.1.1", "8.8.8.8"), Some(2));
        assert_eq!(t.links.len(), 2);
    }

    #[test]
    fn test_local_to_local_is_direct() {
        let t = build_topology(&[packet("192.168.1.22", "192.168.1.5", Protocol::Arp, 1)]);
        assert_eq!(t.links.len(), 1);
        assert_eq!(t.links[0].source, "192.168.1.22");
        assert_eq!(t.links[0].target, "192.168.1.5");
    }

    #[test]
    fn test_attacker_group_wins() {
        let mut attack = packet("192.168.1.22", "192.168.1.10", Protocol::Arp, 1);
        attack.is_attack = true;
        let t = build_topology(&[attack]);
        let node = t.nodes.iter().find(|n| n.id == "192.168.1.22").unwrap();
        assert_eq!(node.group, NodeGroup::Attacker);
        let victim = t.nodes.iter().find(|n| n.id == "192.168.1.10").unwrap();
        assert_eq!(victim.group, NodeGroup::Local);
    }

    #[test]
    fn test_group_serializes_as_number() {
        let v = serde_json::to_value(build_topology(&[])).unwrap();
        assert_eq!(v["nodes"][0]["group"], 1);

        let mut attack = packet("10.0.0.9", "192.168.1.10", Protocol::Tcp, 1);
        attack.is_attack = true;
        let v = serde_json::to_value(build_topology(&[attack])).unwrap();
        let groups: Vec<u64> = v["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["group"].as_u64().unwrap())
            .collect();
        // 10.0.0.9, 192.168.1.1, 192.168.1.10
        assert_eq!(groups, vec![4, 1, 2]);
    }

    #[test]
    fn test_nodes_and_links_sorted() {
        let t = build_topology(&[
            packet("192.168.1.5", "9.9.9.9", Protocol::Dns, 1),
            packet("192.168.1.22", "192.168.1.10", Protocol::Arp, 1),
            packet("1.1.1.1", "192.168.1.15", Protocol::Udp, 1),
        ]);

        let ids: Vec<&str> = t.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut sorted_ids = ids.clone();
        sorted_ids.sort();
        assert_eq!(ids, sorted_ids);
        assert_eq!(ids.len(), 7);

        let pairs: Vec<(&str, &str)> = t
            .links
            .iter()
            .map(|l| (l.source.as_str(), l.target.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1.1.1.1", "192.168.1.15"),
                ("192.168.1.1", "192.168.1.5"),
                ("192.168.1.1", "9.9.9.9"),
                ("192.168.1.10", "192.168.1.22"),
            ]
        );
        assert!(pairs.iter().all(|(a, b)| a < b));
    }

    #[test]
    fn test_window_limits_packets() {
        let mut packets = vec![packet("192.168.1.5", "1.1.1.1", Protocol::Dns, 1)];
        for _ in 0..TOPOLOGY_WINDOW {
            packets.push(packet("192.168.1.10", "192.168.1.15", Protocol::Udp, 1));
        }
        let t = build_topology(&packets);
        assert!(t.nodes.iter().all(|n| n.id != "1.1.1.1"));
    }
}
