//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskquest_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // A tiny probe keeps core crate wiring verifiable independently
    // from any display-layer runtime setup.
    println!("taskquest_core ping={}", taskquest_core::ping());
    println!("taskquest_core version={}", taskquest_core::core_version());
}
