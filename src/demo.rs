//! Offline traffic generator.
//!
//! Produces the same placeholder traffic the dashboard showed when its
//! backend was unreachable: a fixed pair of devices and one HTTPS packet per
//! poll, with plausible system load numbers.

use rand::Rng;

use crate::traffic::{Device, DeviceKind, Packet, Protocol, SystemStats, ThreatLevel, TrafficBatch};

pub const DEMO_INFO: &str = "Demo Mode (Backend Offline)";

/// The two devices shown when no backend is available.
pub fn mock_devices(now: u64) -> Vec<Device> {
    vec![
        Device {
            ip: "192.168.1.10".into(),
            mac: "AA:BB:CC:DD:EE:01".into(),
            vendor: "Apple Inc.".into(),
            hostname: "Admin-MacBook".into(),
            kind: DeviceKind::Desktop,
            is_blocked: false,
            last_seen: now,
            bandwidth_usage: 0,
        },
        Device {
            ip: "192.168.1.15".into(),
            mac: "AA:BB:CC:DD:EE:02".into(),
            vendor: "Samsung".into(),
            hostname: "Galaxy-S23".into(),
            kind: DeviceKind::Mobile,
            is_blocked: false,
            last_seen: now,
            bandwidth_usage: 0,
        },
    ]
}

/// Random 128-bit identifier as lowercase hex.
fn packet_id<R: Rng>(rng: &mut R) -> String {
    let mut buf = [0u8; 16];
    rng.fill(&mut buf[..]);
    buf.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Generate one poll worth of demo traffic stamped with `now` (ms).
pub fn generate_mock_traffic<R: Rng>(rng: &mut R, now: u64) -> TrafficBatch {
    let system = SystemStats {
        cpu_usage: rng.gen_range(10..=39),
        ram_usage: rng.gen_range(40..=59),
        active_processes: 150,
        threat_level: ThreatLevel::Low,
    };

    let packet = Packet {
        id: packet_id(rng),
        timestamp: now,
        source_ip: "192.168.1.10".into(),
        dest_ip: "8.8.8.8".into(),
        protocol: Protocol::Https,
        size: rng.gen_range(100..=1000),
        source_port: None,
        dest_port: None,
        info: DEMO_INFO.into(),
        is_attack: false,
        attack_type: None,
        latency: Some(20),
        process_name: None,
        process_id: None,
        device_mac: None,
    };

    TrafficBatch {
        packets: vec![packet],
        system,
    }
}
