//! Tool host trait.

use crate::tools::{ToolArguments, ToolDescriptor, ToolError};
use std::future::Future;

/// Trait for tool catalog clients.
///
/// Implementations own one session with a tool host for their whole
/// lifetime. This is the boundary between the conversation loop and side
/// effects.
pub trait ToolHost: Send + Sync {
    /// Fetch the catalog from the host and cache it.
    ///
    /// Calling this again against an unchanged host yields the same catalog.
    fn bootstrap(&mut self)
    -> impl Future<Output = Result<Vec<ToolDescriptor>, ToolError>> + Send;

    /// The catalog fetched by the last bootstrap.
    fn catalog(&self) -> &[ToolDescriptor];

    /// Invoke a tool and return its text output.
    fn invoke(
        &self,
        name: &str,
        arguments: &ToolArguments,
    ) -> impl Future<Output = Result<String, ToolError>> + Send;

    /// Whether the catalog advertises a tool with this name.
    fn has_tool(&self, name: &str) -> bool {
        self.catalog().iter().any(|tool| tool.name == name)
    }
}
