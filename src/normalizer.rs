// Raw document -> ordered device list: CPU, RAM, disks (source order), network, GPUs (source order).

use crate::models::{
    Device, DeviceKind, RawCpu, RawDisk, RawGpu, RawNetwork, RawRam, RawSnapshot, Stat,
    as_number, format_number, format_value, parse_int_prefix,
};
use serde_json::Value;

/// Characters of the GPU driver string kept before the ellipsis.
const DRIVER_PREFIX_CHARS: usize = 15;
/// Not derived from any raw metric.
const SIGNAL_STRENGTH_PLACEHOLDER: &str = "Excellent";
const NETWORK_LABEL: &str = "Wi-Fi";

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub devices: Vec<Device>,
    /// `Some` when the document carries a CPU section; `None` leaves the indicator as it was.
    pub temp_alert: Option<bool>,
}

pub fn normalize(snapshot: &RawSnapshot, temp_alert_celsius: i64) -> Normalized {
    let mut devices = Vec::new();
    let mut temp_alert = None;

    if let Some(cpu) = &snapshot.cpu {
        let temp = parse_int_prefix(cpu.temp.as_ref());
        temp_alert = Some(temp.is_some_and(|t| t > temp_alert_celsius));
        devices.push(cpu_device(cpu));
    }
    if let Some(ram) = &snapshot.ram {
        devices.push(ram_device(ram));
    }
    for (i, disk) in snapshot.disks.iter().flatten().enumerate() {
        devices.push(disk_device(i, disk));
    }
    if let Some(net) = &snapshot.network {
        devices.push(network_device(net));
    }
    for (i, gpu) in snapshot.gpus.iter().flatten().enumerate() {
        devices.push(gpu_device(i, gpu));
    }

    Normalized {
        devices,
        temp_alert,
    }
}

fn usage(value: Option<&Value>) -> f64 {
    as_number(value).unwrap_or(0.0)
}

/// `"{temp}°C"` for a positive reading, `"--"` otherwise.
fn temperature(value: Option<&Value>) -> String {
    match as_number(value) {
        Some(t) if t > 0.0 => format_value(value, "°C"),
        _ => "--".into(),
    }
}

fn cpu_device(cpu: &RawCpu) -> Device {
    Device {
        id: "cpu".into(),
        kind: DeviceKind::Cpu,
        label: "CPU".into(),
        sub: format_value(cpu.name.as_ref(), ""),
        val: usage(cpu.usage.as_ref()),
        stats: vec![
            Stat::new("Base Speed", format_value(cpu.speed.as_ref(), " GHz")),
            Stat::new("Processes", format_value(cpu.procs.as_ref(), "")),
            Stat::new("Uptime", format_value(cpu.uptime.as_ref(), "")),
            Stat::new("Temperature", temperature(cpu.temp.as_ref())),
        ],
    }
}

fn ram_device(ram: &RawRam) -> Device {
    // Derived from usage alone, not from total/used.
    let available = match as_number(ram.usage.as_ref()) {
        Some(u) => format!("{}%", format_number(100.0 - u)),
        None => "--".into(),
    };
    Device {
        id: "ram".into(),
        kind: DeviceKind::Ram,
        label: "Memory".into(),
        sub: format_value(ram.total.as_ref(), ""),
        val: usage(ram.usage.as_ref()),
        stats: vec![
            Stat::new("In Use", format_value(ram.used.as_ref(), "")),
            Stat::new("Available", available),
            Stat::new("Committed", format_value(ram.committed.as_ref(), "")),
        ],
    }
}

fn disk_device(index: usize, disk: &RawDisk) -> Device {
    let read = format_value(disk.read.as_ref(), "");
    let write = format_value(disk.write.as_ref(), "");
    Device {
        id: format!("disk{index}"),
        kind: DeviceKind::Disk,
        label: format_value(disk.name.as_ref(), ""),
        sub: format!("{read} R / {write} W"),
        val: usage(disk.usage.as_ref()),
        stats: vec![
            Stat::new("Active Time", format_value(disk.usage.as_ref(), "%")),
            Stat::new("Read Speed", read),
            Stat::new("Write Speed", write),
            Stat::new("Response Time", format_value(disk.resp.as_ref(), " ms")),
        ],
    }
}

fn network_device(net: &RawNetwork) -> Device {
    Device {
        id: "net".into(),
        kind: DeviceKind::Network,
        label: NETWORK_LABEL.into(),
        sub: format_value(net.name.as_ref(), ""),
        val: usage(net.usage.as_ref()),
        stats: vec![
            Stat::new("Send", format_value(net.send.as_ref(), "")),
            Stat::new("Receive", format_value(net.recv.as_ref(), "")),
            Stat::new("Signal Strength", SIGNAL_STRENGTH_PLACEHOLDER),
        ],
    }
}

fn gpu_device(index: usize, gpu: &RawGpu) -> Device {
    // The ellipsis is appended whether or not anything was cut.
    let driver: String = format_value(gpu.driver.as_ref(), "")
        .chars()
        .take(DRIVER_PREFIX_CHARS)
        .collect();
    Device {
        id: format!("gpu{index}"),
        kind: DeviceKind::Gpu,
        label: format!("GPU {index}"),
        sub: format_value(gpu.name.as_ref(), ""),
        val: usage(gpu.usage.as_ref()),
        stats: vec![
            Stat::new("Utilization", format_value(gpu.usage.as_ref(), "%")),
            Stat::new("Temperature", temperature(gpu.temp.as_ref())),
            Stat::new("Driver", format!("{driver}...")),
            Stat::new("Memory", format_value(gpu.ram.as_ref(), "")),
        ],
    }
}
