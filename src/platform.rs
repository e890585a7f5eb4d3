//! Platform queries used by the help text
//!
//! The client help reports the largest combined socket buffer the operating
//! system allows. The value is queried each time it is needed so that a sysctl
//! change between runs is reflected without a rebuild.

use crate::defaults::FALLBACK_MAX_SOCKET_BUFFER;

/// Source of the platform's maximum combined socket buffer size in bytes
pub trait SocketBufferProbe {
    fn max_socket_buffer(&self) -> u64;
}

/// Queries the running operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSocketBuffer;

impl SocketBufferProbe for SystemSocketBuffer {
    fn max_socket_buffer(&self) -> u64 {
        query_max_socket_buffer().unwrap_or(FALLBACK_MAX_SOCKET_BUFFER)
    }
}

/// Always reports the same value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSocketBuffer(pub u64);

impl SocketBufferProbe for FixedSocketBuffer {
    fn max_socket_buffer(&self) -> u64 {
        self.0
    }
}

/// Sum of the send and receive buffer ceilings
#[cfg(target_os = "linux")]
fn query_max_socket_buffer() -> Option<u64> {
    let wmem = read_proc_value("/proc/sys/net/core/wmem_max")?;
    let rmem = read_proc_value("/proc/sys/net/core/rmem_max")?;
    Some(wmem.saturating_add(rmem))
}

#[cfg(target_os = "linux")]
fn read_proc_value(path: &str) -> Option<u64> {
    std::fs::read_to_string(path).ok().as_deref().and_then(parse_sysctl_value)
}

/// `kern.ipc.maxsockbuf` already covers both directions
#[cfg(target_os = "macos")]
fn query_max_socket_buffer() -> Option<u64> {
    let output = std::process::Command::new("sysctl")
        .args(["-n", "kern.ipc.maxsockbuf"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_sysctl_value(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn query_max_socket_buffer() -> Option<u64> {
    None
}

/// Parse a single positive integer as printed by sysctl or procfs
#[cfg_attr(not(any(target_os = "linux", target_os = "macos")), allow(dead_code))]
fn parse_sysctl_value(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|value| *value > 0)
}
