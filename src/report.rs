//! Offline demo run and its human / JSON output.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::demo::{generate_mock_traffic, mock_devices};
use crate::devices::DeviceRegistry;
use crate::error::{GhostError, Result};
use crate::session::{NetworkStats, Session};
use crate::topology::{Topology, build_topology};
use crate::traffic::{Device, Packet, SystemStats, filter_packets, resolve_dns};

/// Milliseconds between demo polls.
pub const POLL_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub batches: usize,
    pub seed: Option<u64>,
    pub filter: String,
    pub attacks_only: bool,
    /// Device addresses whose block state is toggled before the run.
    pub block: Vec<String>,
    /// Clear the log and counters right after this many polls.
    pub clear_after: Option<usize>,
}

impl Default for DemoOptions {
    fn default() -> Self {
        DemoOptions {
            batches: 5,
            seed: None,
            filter: String::new(),
            attacks_only: false,
            block: Vec::new(),
            clear_after: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoReport {
    pub stats: NetworkStats,
    pub has_threats: bool,
    pub system: Option<SystemStats>,
    pub devices: Vec<Device>,
    pub packets: Vec<Packet>,
    pub topology: Topology,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Run the demo generator through a fresh session.
///
/// With a seed the clock starts at zero, so the whole report is reproducible.
pub fn run_demo(opts: &DemoOptions) -> Result<DemoReport> {
    if opts.batches == 0 {
        return Err(GhostError::InvalidArgument("batches must be at least 1".into()));
    }
    if opts.clear_after == Some(0) {
        return Err(GhostError::InvalidArgument("clear-after must be at least 1".into()));
    }

    let (mut rng, start) = match opts.seed {
        Some(seed) => (StdRng::seed_from_u64(seed), 0),
        None => (StdRng::from_entropy(), now_millis()),
    };

    let mut registry = DeviceRegistry::new(mock_devices(start));
    for ip in &opts.block {
        registry
            .toggle_block(ip)
            .ok_or_else(|| GhostError::InvalidArgument(format!("unknown device: {}", ip)))?;
    }

    let mut session = Session::new();
    let mut system = None;

    for i in 0..opts.batches {
        let batch = generate_mock_traffic(&mut rng, start + i as u64 * POLL_INTERVAL_MS);
        system = Some(batch.system);
        session.ingest(batch.packets);
        if opts.clear_after == Some(i + 1) {
            tracing::info!(after = i + 1, "session cleared");
            session.clear();
        }
    }
    tracing::info!(batches = opts.batches, retained = session.len(), "demo run complete");

    let packets = filter_packets(session.packets(), &opts.filter, opts.attacks_only)
        .into_iter()
        .cloned()
        .collect();

    Ok(DemoReport {
        stats: session.stats(registry.online_count()),
        has_threats: session.has_threats(),
        system,
        devices: registry.devices().to_vec(),
        packets,
        topology: build_topology(session.packets()),
    })
}

pub fn write_json<W: Write>(w: &mut W, report: &DemoReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}

fn heading<W: WriteColor>(w: &mut W, text: &str) -> std::io::Result<()> {
    w.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(w, "{}", text)?;
    w.reset()
}

pub fn write_human<W: WriteColor>(w: &mut W, report: &DemoReport) -> Result<()> {
    let stats = &report.stats;

    heading(w, "Session:")?;
    writeln!(w, "  packets:   {}", stats.total_packets)?;
    write!(w, "  attacks:   ")?;
    if report.has_threats {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    } else {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    }
    writeln!(w, "{}", stats.total_attacks)?;
    w.reset()?;
    writeln!(w, "  bandwidth: {} bytes", stats.bandwidth_in)?;
    writeln!(w, "  active IPs: {}", stats.active_ips)?;
    writeln!(w, "  devices:   {}", stats.online_devices)?;
    if let Some(sys) = &report.system {
        writeln!(
            w,
            "  system:    cpu {}% ram {}% processes {} threat {:?}",
            sys.cpu_usage, sys.ram_usage, sys.active_processes, sys.threat_level
        )?;
    }
    writeln!(w)?;

    heading(w, "Devices:")?;
    for d in &report.devices {
        write!(w, "  {:<15} {:<17} {}", d.ip, d.mac, d.hostname)?;
        if d.is_blocked {
            w.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(w, " [blocked]")?;
            w.reset()?;
        }
        writeln!(w)?;
    }
    writeln!(w)?;

    heading(w, "Protocols:")?;
    for p in &stats.protocol_distribution {
        writeln!(w, "  {:<6} {}", p.name, p.value)?;
    }
    writeln!(w)?;

    heading(w, &format!("Packets [{}]:", report.packets.len()))?;
    for p in &report.packets {
        if p.is_attack {
            w.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        }
        writeln!(
            w,
            "  {:>13} {:<5} {} -> {} {}B {}",
            p.timestamp,
            p.protocol,
            resolve_dns(&p.source_ip),
            resolve_dns(&p.dest_ip),
            p.size,
            p.info
        )?;
        w.reset()?;
    }
    writeln!(w)?;

    heading(w, "Topology:")?;
    for n in &report.topology.nodes {
        writeln!(w, "  {} ({:?}) {}", n.id, n.group, n.label)?;
    }
    for l in &report.topology.links {
        writeln!(w, "  {} <-> {} x{}", l.source, l.target, l.value)?;
    }
    w.flush()?;
    Ok(())
}
