use tracing::{debug, warn};
use url::Url;

use super::{
    error::Error,
    fetch::Fetch,
    load_url,
    namespaces::{Namespace, Namespaces},
    resolve_location,
    tree::Element,
    types::{ComplexType, Field, SchemaTypes},
};

/// Complex types of one schema plus the element names its imports declare.
#[derive(Debug, Clone, Default)]
pub struct SchemaAnalysis {
    pub types: SchemaTypes,
    pub imported_elements: Vec<String>,
}

/// Every named `complexType` below `schema`, with the fields of its direct
/// `sequence` child. Types without a sequence have no fields.
pub fn complex_types(schema: &Element) -> SchemaTypes {
    let mut types = SchemaTypes::new();

    for complex_type in schema.descendants(&Namespace::Schema, "complexType") {
        let name = match complex_type.attribute("name") {
            Some(name) => name.to_owned(),
            None => continue,
        };

        let fields = complex_type
            .child(&Namespace::Schema, "sequence")
            .map(|sequence| {
                sequence
                    .children(&Namespace::Schema, "element")
                    .map(|element| Field {
                        name: element.attribute("name").map(ToOwned::to_owned),
                        ty: element.attribute("type").map(ToOwned::to_owned),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some(previous) = types.insert(ComplexType { name, fields }) {
            warn!("complex type {} is defined more than once", previous.name);
        }
    }

    types
}

/// Names of every `element` declared anywhere below `schema`.
pub fn element_names(schema: &Element) -> Vec<String> {
    schema
        .descendants(&Namespace::Schema, "element")
        .into_iter()
        .filter_map(|element| element.attribute("name"))
        .map(ToOwned::to_owned)
        .collect()
}

pub(crate) fn push_unique(names: &mut Vec<String>, additions: impl IntoIterator<Item = String>) {
    for name in additions {
        if !names.contains(&name) {
            names.push(name);
        }
    }
}

pub struct SchemaAnalyzer<'a, F: ?Sized> {
    fetcher: &'a F,
    namespaces: &'a Namespaces,
    import_depth: usize,
}

impl<'a, F: Fetch + ?Sized> SchemaAnalyzer<'a, F> {
    pub fn new(fetcher: &'a F, namespaces: &'a Namespaces, import_depth: usize) -> Self {
        Self {
            fetcher,
            namespaces,
            import_depth,
        }
    }

    /// Analyzes a schema element. `location` is the document the element was
    /// read from and is the base for relative import locations.
    pub fn analyze(
        &self,
        schema: &Element,
        location: Option<&Url>,
    ) -> Result<SchemaAnalysis, Error> {
        let types = complex_types(schema);
        debug!(
            "found {} complex types in {}",
            types.len(),
            location.map_or_else(|| "embedded schema".to_owned(), Url::to_string)
        );

        Ok(SchemaAnalysis {
            types,
            imported_elements: self.resolve_imports(schema, location, self.import_depth)?,
        })
    }

    /// Follows every `import` carrying a `schemaLocation` and collects the
    /// element names of the imported documents. Imports of imported documents
    /// are followed while `depth` allows; a depth of zero follows nothing.
    pub fn resolve_imports(
        &self,
        schema: &Element,
        location: Option<&Url>,
        depth: usize,
    ) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        if depth == 0 {
            return Ok(names);
        }

        for import in schema.descendants(&Namespace::Schema, "import") {
            let schema_location = match import.attribute("schemaLocation") {
                Some(schema_location) => schema_location,
                None => {
                    debug!(
                        "skipping import of {:?} without schemaLocation",
                        import.attribute("namespace").unwrap_or_default()
                    );
                    continue;
                }
            };

            let url = resolve_location(schema_location, location)?;
            let imported = load_url(self.fetcher, self.namespaces, &url)?;

            push_unique(&mut names, element_names(&imported));
            push_unique(
                &mut names,
                self.resolve_imports(&imported, Some(&url), depth - 1)?,
            );
        }

        Ok(names)
    }
}
