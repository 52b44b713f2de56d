//! Job description, per-run overlay plan and the streaming driver.

/// Streaming driver: `Init -> Configuring -> Streaming -> Completed | Failed`.
pub mod driver;
/// Job and region descriptions (JSON-loadable).
pub mod job;
/// Per-run overlay plan: geometry, warped overlay and mask computed once.
pub mod plan;
