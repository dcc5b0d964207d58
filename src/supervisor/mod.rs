//! Run-level safety rails: the free-space preflight, the host snapshot,
//! signal-driven cleanup, sleep inhibition, and the sudo keep-alive.
//!
//! Nothing in here runs an operation. The supervisor's job is to make
//! sure a run starts on a machine that can take it and ends cleanly no
//! matter how it exits.

pub mod guard;
pub mod inhibit;
pub mod keepalive;

use std::process::Command;

use crate::common::errors::MaintError;
use crate::report::EnvironmentSnapshot;

/// Root filesystem capacity as reported by `df -k /`
#[derive(Debug, Clone, Copy)]
pub struct DiskSpace {
    pub total_kb: u64,
    pub free_kb: u64,
}

impl DiskSpace {
    pub fn free_gb(&self) -> f64 {
        self.free_kb as f64 / 1_048_576.0
    }
}

/// Measure free space on the root filesystem
pub fn disk_space() -> Result<DiskSpace, MaintError> {
    let output = Command::new("df")
        .args(["-k", "/"])
        .output()
        .map_err(|e| MaintError::CommandFailed {
            program: "df".to_string(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(MaintError::CommandFailed {
            program: "df".to_string(),
            detail: format!("exit status {}", output.status),
        });
    }

    parse_df_output(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        MaintError::CommandFailed {
            program: "df".to_string(),
            detail: "unparseable output".to_string(),
        }
    })
}

/// Parse `df -k` output: header line, then
/// `Filesystem 1024-blocks Used Available ...`
fn parse_df_output(output: &str) -> Option<DiskSpace> {
    let line = output.lines().nth(1)?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    let total_kb = fields.get(1)?.parse().ok()?;
    let free_kb = fields.get(3)?.parse().ok()?;
    Some(DiskSpace { total_kb, free_kb })
}

/// Abort the run before it starts if the root filesystem is too full.
/// Returns the measurement so the caller can reuse it for the report.
pub fn preflight(min_free_gb: u64) -> Result<DiskSpace, MaintError> {
    let disk = disk_space()?;
    check_free_space(disk, min_free_gb)?;
    Ok(disk)
}

fn check_free_space(disk: DiskSpace, min_free_gb: u64) -> Result<(), MaintError> {
    if disk.free_gb() < min_free_gb as f64 {
        return Err(MaintError::PreflightFailed {
            needed_gb: min_free_gb,
            available_gb: disk.free_gb(),
        });
    }
    Ok(())
}

/// Capture the host facts the report renders. Every field degrades to a
/// placeholder rather than failing the run.
pub fn environment_snapshot(disk: &DiskSpace) -> EnvironmentSnapshot {
    EnvironmentSnapshot {
        os_version: os_version(),
        hostname: hostname(),
        disk_total_kb: disk.total_kb,
        disk_free_before_kb: disk.free_kb,
        disk_free_after_kb: 0,
    }
}

fn os_version() -> String {
    Command::new("sw_vers")
        .arg("-productVersion")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| format!("macOS {}", String::from_utf8_lossy(&o.stdout).trim()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn hostname() -> String {
    Command::new("hostname")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DF_SAMPLE: &str = "\
Filesystem    1024-blocks      Used Available Capacity iused     ifree %iused  Mounted on
/dev/disk3s1s1  482797652 390232528  74218372    85%  404102 742183720    0%   /
";

    #[test]
    fn test_parse_df_output() {
        let disk = parse_df_output(DF_SAMPLE).unwrap();
        assert_eq!(disk.total_kb, 482_797_652);
        assert_eq!(disk.free_kb, 74_218_372);
    }

    #[test]
    fn test_parse_df_garbage_is_none() {
        assert!(parse_df_output("").is_none());
        assert!(parse_df_output("Filesystem\nnot numbers at all").is_none());
    }

    #[test]
    fn test_free_gb_conversion() {
        let disk = DiskSpace {
            total_kb: 0,
            free_kb: 2 * 1_048_576,
        };
        assert!((disk.free_gb() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_preflight_passes_with_room() {
        let disk = DiskSpace {
            total_kb: 500_000_000,
            free_kb: 70 * 1_048_576,
        };
        assert!(check_free_space(disk, 5).is_ok());
    }

    #[test]
    fn test_preflight_fails_when_tight() {
        let disk = DiskSpace {
            total_kb: 500_000_000,
            free_kb: 3 * 1_048_576,
        };
        let err = check_free_space(disk, 5).unwrap_err();
        assert!(matches!(err, MaintError::PreflightFailed { needed_gb: 5, .. }));
    }

    #[test]
    fn test_preflight_boundary_is_inclusive() {
        let disk = DiskSpace {
            total_kb: 500_000_000,
            free_kb: 5 * 1_048_576,
        };
        assert!(check_free_space(disk, 5).is_ok());
    }
}
