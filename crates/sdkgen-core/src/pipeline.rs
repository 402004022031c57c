//! Run orchestration: extracted document + mapping state → something to do.

use crate::error::MappingError;
use crate::ir::ExtractedApi;
use crate::mapping::{MappingState, MappingTable, apply_mappings, group_by_service};
use crate::render::GenerationModel;
use crate::typemap::{FingerprintMode, TypeMapper};

/// Options that shape the model rather than its rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub fingerprint: FingerprintMode,
}

/// Outcome of preparing a run.
#[derive(Debug)]
pub enum Prepared {
    /// No mapping file existed. The identity table should be written for the
    /// user to edit; nothing is generated this run.
    Bootstrap(MappingTable),
    /// A renamed, grouped model ready for rendering.
    Ready(GenerationModel),
}

/// Turn extracted records and a mapping state into a bootstrap table or a
/// generation model. Each call builds its own type mapper.
pub fn prepare(
    api: ExtractedApi,
    state: MappingState,
    options: PipelineOptions,
) -> Result<Prepared, MappingError> {
    let table = match state {
        MappingState::Missing => {
            let table = MappingTable::identity(&api);
            log::info!(
                "no mapping table; bootstrapping {} operations and {} schemas",
                table.operations.len(),
                table.schemas.len()
            );
            return Ok(Prepared::Bootstrap(table));
        }
        MappingState::Present(table) => table,
    };

    let (operations, schemas) = apply_mappings(&api.operations, &api.schemas, &table)?;
    let groups = group_by_service(&operations, &table)?;
    let mapper = TypeMapper::new(&schemas, options.fingerprint);

    log::debug!(
        "prepared {} operations in {} groups",
        groups.operation_count(),
        groups.len()
    );

    Ok(Prepared::Ready(GenerationModel {
        info: api.info,
        base_url: api.base_url,
        schemas,
        operations,
        groups,
        mapper,
    }))
}
