//! Verify and show-lineage command implementations.

use crate::cli::{LineageArgs, VerifyArgs};
use crate::error::Result;
use crate::output::Formatter;
use origin_store::{Registry, RegistryError};

/// Execute the verify command.
///
/// Both outcomes succeed; only storage failures are errors.
pub fn execute_verify(args: VerifyArgs, registry: &Registry, formatter: &Formatter) -> Result<String> {
    match registry.lookup(&args.fingerprint) {
        Ok(record) => formatter.verification(&args.fingerprint, Some(&record)),
        Err(RegistryError::NotFound(_)) => formatter.verification(&args.fingerprint, None),
        Err(e) => Err(e.into()),
    }
}

/// Execute the show-lineage command.
pub fn execute_show_lineage(
    args: LineageArgs,
    registry: &Registry,
    formatter: &Formatter,
) -> Result<String> {
    let chain = registry.lineage(&args.fingerprint)?;
    formatter.format_records(&chain)
}
