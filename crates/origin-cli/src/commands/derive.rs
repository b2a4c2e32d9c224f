//! Derive command implementation.

use super::resolve_creator;
use crate::cli::DeriveArgs;
use crate::error::Result;
use crate::output::Formatter;
use origin_domain::DerivativeRequest;
use origin_store::Registry;

/// Execute the derive command.
///
/// The parent is addressed by fingerprint and resolved to a handle first, so
/// an unknown parent surfaces as a lookup miss.
pub fn execute_derive(
    args: DeriveArgs,
    registry: &Registry,
    default_creator: Option<&str>,
    formatter: &Formatter,
) -> Result<String> {
    let creator = resolve_creator(args.creator, default_creator)?;
    let parent = registry.handle(&args.parent)?;

    let mut request = DerivativeRequest::new(args.fingerprint, args.locator, args.edit, creator);
    if let Some(location) = args.location {
        request = request.with_location_tag(location);
    }
    if let Some(organization) = args.organization {
        request = request.with_organization_tag(organization);
    }

    let handle = registry.insert_derivative(&parent, request)?;
    formatter.record_anchored(handle.record())
}
