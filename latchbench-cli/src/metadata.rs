//! System Metadata Collection
//!
//! Host details attached to JSON reports: crate version, UTC timestamp, OS,
//! architecture and available parallelism.

use chrono::Utc;
use latchbench_report::{ReportMeta, SystemInfo};

/// Build report metadata for the current host
pub fn build_report_meta() -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_cores: num_cpus(),
    };

    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
    }
}

/// Get number of available CPU cores
fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_describes_host() {
        let meta = build_report_meta();
        assert_eq!(meta.system.os, std::env::consts::OS);
        assert_eq!(meta.system.arch, std::env::consts::ARCH);
        assert!(meta.system.cpu_cores >= 1);
        assert!(!meta.version.is_empty());
    }
}
