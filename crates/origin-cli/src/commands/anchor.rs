//! Anchor command implementation.

use super::resolve_creator;
use crate::cli::AnchorArgs;
use crate::error::Result;
use crate::output::Formatter;
use origin_store::Registry;

/// Execute the anchor command.
pub fn execute_anchor(
    args: AnchorArgs,
    registry: &Registry,
    default_creator: Option<&str>,
    formatter: &Formatter,
) -> Result<String> {
    let creator = resolve_creator(args.creator, default_creator)?;
    let handle = registry.insert(
        args.fingerprint,
        args.locator,
        args.location,
        args.organization,
        creator,
    )?;
    formatter.record_anchored(handle.record())
}
