use crate::common::config::RunConfiguration;
use crate::common::errors::MaintError;
use crate::registry::{OperationDescriptor, Registry};

/// Compute the ordered subset of operations to run.
///
/// Resolution rules, applied in order:
/// 1. `--operation <id>` selects exactly that operation (unknown ids fail);
/// 2. otherwise `--only-risk` keeps matching descriptors;
/// 3. `--skip` entries are then removed.
///
/// The output is always a duplicate-free strict subsequence of the
/// registry's declaration order; filters never reorder. An empty result is
/// valid and the same inputs always yield the same output.
pub fn resolve_selection(
    registry: &Registry,
    config: &RunConfiguration,
) -> Result<Vec<&'static OperationDescriptor>, MaintError> {
    if let Some(ref id) = config.single_operation {
        let desc = registry.get(id).ok_or_else(|| MaintError::UnknownOperation {
            id: id.clone(),
        })?;
        return Ok(vec![desc]);
    }

    let selected = registry
        .list()
        .iter()
        .filter(|d| config.risk_filter.map_or(true, |r| d.risk == r))
        .filter(|d| !config.skip_set.iter().any(|s| s == d.id))
        .collect();

    Ok(selected)
}
