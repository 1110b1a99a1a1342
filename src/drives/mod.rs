use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::process::Command;

/// One row of the target listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mountpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiskEntry {
    fn error_entry(message: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            size: None,
            kind: None,
            mountpoint: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(not(windows))]
#[derive(Debug, Deserialize)]
struct LsblkReport {
    #[serde(default)]
    blockdevices: Vec<LsblkDevice>,
}

#[cfg(not(windows))]
#[derive(Debug, Deserialize)]
struct LsblkDevice {
    name: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    mountpoint: Option<String>,
    #[serde(default)]
    children: Vec<LsblkDevice>,
}

/// Enumerates disks and partitions by shelling out to the platform's
/// listing utility.
pub struct DiskEnumerator;

impl DiskEnumerator {
    /// Best-effort listing. Enumeration failure yields a single
    /// descriptive error entry rather than an `Err`, so front ends always
    /// have something to render.
    pub fn list_all() -> Vec<DiskEntry> {
        match Self::enumerate() {
            Ok(entries) => entries,
            Err(e) => vec![DiskEntry::error_entry(format!("Unable to list disks: {:#}", e))],
        }
    }

    #[cfg(not(windows))]
    fn enumerate() -> Result<Vec<DiskEntry>> {
        let output = Command::new("lsblk")
            .args(["-o", "NAME,SIZE,TYPE,MOUNTPOINT", "-J"])
            .output()
            .context("failed to run lsblk")?;

        if !output.status.success() {
            bail!("lsblk exited with {}", output.status);
        }

        parse_lsblk(&output.stdout)
    }

    #[cfg(windows)]
    fn enumerate() -> Result<Vec<DiskEntry>> {
        let output = Command::new("wmic")
            .args(["logicaldisk", "get", "name,size,freespace"])
            .output()
            .context("failed to run wmic")?;

        if !output.status.success() {
            bail!("wmic exited with {}", output.status);
        }

        Ok(parse_wmic(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[cfg(not(windows))]
fn parse_lsblk(raw: &[u8]) -> Result<Vec<DiskEntry>> {
    let report: LsblkReport =
        serde_json::from_slice(raw).context("failed to parse lsblk JSON")?;

    let mut entries = Vec::new();
    for device in report.blockdevices {
        collect(device, &mut entries);
    }
    Ok(entries)
}

#[cfg(not(windows))]
fn collect(device: LsblkDevice, out: &mut Vec<DiskEntry>) {
    out.push(DiskEntry {
        name: device.name,
        size: device.size,
        kind: device.kind,
        mountpoint: device.mountpoint,
        error: None,
    });
    for child in device.children {
        collect(child, out);
    }
}

#[cfg(windows)]
fn parse_wmic(raw: &str) -> Vec<DiskEntry> {
    // Tabular output: a header line, then one whitespace-separated row per
    // logical disk.
    raw.lines()
        .skip(1)
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            Some(DiskEntry {
                name: name.to_string(),
                size: parts.next().map(str::to_string),
                kind: Some("logicaldisk".to_string()),
                mountpoint: None,
                error: None,
            })
        })
        .collect()
}
