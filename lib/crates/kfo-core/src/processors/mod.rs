//! Built-in fragment processors.

pub mod destinations;
pub mod share;

pub use destinations::DestinationGuard;
pub use share::ShareLogs;

use crate::processor::Processor;

/// The standard pipeline, in execution order.
///
/// The guard must run before sharing: the tag rewrite and the bridge labels
/// that sharing injects are both off limits to tenants themselves.
#[must_use]
pub fn default_processors() -> Vec<Box<dyn Processor + Send + Sync>> {
    vec![Box::new(DestinationGuard), Box::new(ShareLogs)]
}
