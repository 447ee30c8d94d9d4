//! Observability utilities: system CPU and memory gauges

use std::sync::Once;

use once_cell::sync::Lazy;
use prometheus::{Gauge, IntGauge};
use sysinfo::System;

static CPU_UTIL: Lazy<Gauge> = Lazy::new(|| {
    prometheus::register_gauge!("loadgen_cpu_utilization", "Average CPU utilization percent").unwrap()
});
static MEM_USED: Lazy<IntGauge> = Lazy::new(|| {
    prometheus::register_int_gauge!("loadgen_memory_used_bytes", "System memory used (bytes)").unwrap()
});
static MEM_TOTAL: Lazy<IntGauge> = Lazy::new(|| {
    prometheus::register_int_gauge!("loadgen_memory_total_bytes", "System memory total (bytes)").unwrap()
});

static POLLER: Once = Once::new();

pub fn init() {
    // Touch statics to ensure registration before the first scrape.
    let _ = &*CPU_UTIL;
    let _ = &*MEM_USED;
    let _ = &*MEM_TOTAL;
}

/// Refreshes the gauges once per second on a background task. Safe to call
/// more than once; only the first call spawns the loop.
pub fn spawn_system_polling() {
    POLLER.call_once(|| {
        tokio::spawn(async move {
            let mut sys = System::new();
            loop {
                sys.refresh_cpu_usage();
                sys.refresh_memory();
                CPU_UTIL.set(sys.global_cpu_info().cpu_usage() as f64);
                MEM_USED.set(sys.used_memory() as i64);
                MEM_TOTAL.set(sys.total_memory() as i64);
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            }
        });
    });
}
