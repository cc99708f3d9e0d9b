//! System metrics collection (spec §4.2 input contract — samples this
//! agent submits). CPU and memory come from a refreshed `sysinfo::System`;
//! disk usage is reported per mount point with a `mount` label so multiple
//! filesystems don't collide into one series.

use std::collections::BTreeMap;

use rackwatch_core::wire::SampleDto;
use sysinfo::{CpuRefreshKind, Disks, RefreshKind, System};

pub struct SystemCollector {
    system: System,
}

impl SystemCollector {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::everything()).with_memory(),
        );
        Self { system }
    }

    /// Refreshes the underlying `sysinfo` snapshot and returns one sample
    /// per metric/mount at `now`.
    pub fn collect(&mut self, now: i64) -> Vec<SampleDto> {
        self.system.refresh_cpu();
        self.system.refresh_memory();

        let mut samples = Vec::new();

        samples.push(SampleDto {
            metric_name: "cpu_usage_percent".to_string(),
            labels: BTreeMap::new(),
            value: self.system.global_cpu_info().cpu_usage() as f64,
            timestamp_utc_sec: now,
            value_kind_hint: None,
        });

        let total_memory = self.system.total_memory() as f64;
        let used_memory = self.system.used_memory() as f64;
        let memory_pct = if total_memory > 0.0 { used_memory / total_memory * 100.0 } else { 0.0 };
        samples.push(SampleDto {
            metric_name: "memory_usage_percent".to_string(),
            labels: BTreeMap::new(),
            value: memory_pct,
            timestamp_utc_sec: now,
            value_kind_hint: None,
        });
        samples.push(SampleDto {
            metric_name: "memory_used_bytes".to_string(),
            labels: BTreeMap::new(),
            value: used_memory,
            timestamp_utc_sec: now,
            value_kind_hint: Some(rackwatch_core::wire::ValueKindHint::Int),
        });

        let disks = Disks::new_with_refreshed_list();
        for disk in disks.list() {
            let total = disk.total_space() as f64;
            let available = disk.available_space() as f64;
            if total <= 0.0 {
                continue;
            }
            let used_pct = (total - available) / total * 100.0;
            let mount = disk.mount_point().to_string_lossy().to_string();
            let mut labels = BTreeMap::new();
            labels.insert("mount".to_string(), mount);
            samples.push(SampleDto {
                metric_name: "disk_usage_percent".to_string(),
                labels,
                value: used_pct,
                timestamp_utc_sec: now,
                value_kind_hint: None,
            });
        }

        samples
    }
}

impl Default for SystemCollector {
    fn default() -> Self {
        Self::new()
    }
}
