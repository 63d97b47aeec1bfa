use super::{
    binder::{bind, TypeNameStrategy},
    schema::push_unique,
    types::{AnalysisRecord, Definition, SchemaTypes},
};

/// Merges a parsed definition with the schema analysis results. The first
/// binding found is reported as `binding`.
pub fn assemble(
    definition: Definition,
    schemas: &[SchemaTypes],
    imported_elements: Vec<String>,
    type_name: TypeNameStrategy,
) -> AnalysisRecord {
    let binding = definition
        .bindings
        .first()
        .and_then(|binding| binding.name.clone());

    let mut complex_types = Vec::new();
    for schema in schemas {
        push_unique(
            &mut complex_types,
            schema.names().into_iter().map(ToOwned::to_owned),
        );
    }

    AnalysisRecord {
        service_name: definition.service_name,
        target_namespace: definition.target_namespace,
        schema_location: definition.schema_location,
        messages: bind(definition.messages, schemas, type_name),
        operations: definition.operations,
        binding,
        bindings: definition.bindings,
        services: definition.services,
        imported_elements,
        complex_types,
    }
}
