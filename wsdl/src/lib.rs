use tracing::debug;
use url::Url;

mod assemble;
mod parser;

pub mod binder;
pub mod error;
pub mod fetch;
pub mod namespaces;
pub mod schema;
pub mod tree;
pub mod types;

pub use assemble::assemble;
pub use binder::TypeNameStrategy;
pub use error::Error;
pub use fetch::{Fetch, Fetcher};
pub use namespaces::Namespaces;
pub use types::AnalysisRecord;

use namespaces::Namespace;
use schema::SchemaAnalyzer;
use tree::Element;

/// Turns a URL or a local path into a URL. Relative locations are joined
/// onto `base` when one is given, otherwise they are treated as paths
/// relative to the working directory. The path is not checked for existence;
/// a missing file is reported when it is fetched.
pub fn resolve_location(location: &str, base: Option<&Url>) -> Result<Url, Error> {
    let parsed = match base {
        Some(base) => base.join(location),
        None => Url::parse(location),
    };

    match parsed {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = std::env::current_dir()
                .map_err(|source| Error::WorkingDirectoryError {
                    location: location.to_owned(),
                    source,
                })?
                .join(location);
            Url::from_file_path(&path).map_err(|()| Error::PathConversionError(location.to_owned()))
        }
        Err(source) => Err(Error::UrlParseError {
            location: location.to_owned(),
            source,
        }),
    }
}

/// Fetches and parses the document at `url`.
pub fn load_url<F: Fetch + ?Sized>(
    fetcher: &F,
    namespaces: &Namespaces,
    url: &Url,
) -> Result<Element, Error> {
    let bytes = fetcher
        .fetch(url)
        .map_err(|source| Error::fetch(url, source))?;
    tree::load(&bytes, namespaces).map_err(|source| Error::parse(url, source))
}

/// The whole pipeline: fetch, load, analyze the WSDL and its schemas, bind
/// and assemble.
pub struct Analyzer<F = Fetcher> {
    fetcher: F,
    namespaces: Namespaces,
    import_depth: usize,
    type_name: TypeNameStrategy,
}

impl Analyzer<Fetcher> {
    pub fn new() -> Result<Self, Error> {
        Ok(Self::with_fetcher(Fetcher::new(None)?))
    }
}

impl<F: Fetch> Analyzer<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            namespaces: Namespaces::STANDARD,
            import_depth: 1,
            type_name: binder::strip_prefix,
        }
    }

    pub fn import_depth(mut self, import_depth: usize) -> Self {
        self.import_depth = import_depth;
        self
    }

    pub fn type_names(mut self, type_name: TypeNameStrategy) -> Self {
        self.type_name = type_name;
        self
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Analyzes a URL or a local path.
    pub fn analyze_source<S: AsRef<str>>(&self, source: S) -> Result<AnalysisRecord, Error> {
        let url = resolve_location(source.as_ref(), None)?;
        self.analyze_url(&url)
    }

    pub fn analyze_url(&self, url: &Url) -> Result<AnalysisRecord, Error> {
        let root = load_url(&self.fetcher, &self.namespaces, url)?;
        self.analyze_tree(&root, Some(url))
    }

    /// Analyzes already fetched bytes. `location` names the document in
    /// errors and is the base for relative schema locations.
    pub fn analyze_bytes(
        &self,
        bytes: &[u8],
        location: Option<&Url>,
    ) -> Result<AnalysisRecord, Error> {
        let root = tree::load(bytes, &self.namespaces).map_err(|source| {
            Error::parse(
                location.map_or_else(|| "<input>".to_owned(), Url::to_string),
                source,
            )
        })?;
        self.analyze_tree(&root, location)
    }

    pub fn analyze_tree(
        &self,
        root: &Element,
        location: Option<&Url>,
    ) -> Result<AnalysisRecord, Error> {
        let definition = parser::parse(root);
        debug!(
            "parsed {} with {} messages and {} operations",
            definition.service_name,
            definition.messages.len(),
            definition.operations.len()
        );

        let schema_analyzer =
            SchemaAnalyzer::new(&self.fetcher, &self.namespaces, self.import_depth);
        let mut schemas = Vec::new();
        let mut imported_elements = Vec::new();

        for embedded in root.descendants(&Namespace::Schema, "schema") {
            let analysis = schema_analyzer.analyze(embedded, location)?;
            schemas.push(analysis.types);
            schema::push_unique(&mut imported_elements, analysis.imported_elements);
        }

        if let Some(schema_location) = &definition.schema_location {
            let url = resolve_location(schema_location, location)?;
            let included = load_url(&self.fetcher, &self.namespaces, &url)?;
            let analysis = schema_analyzer.analyze(&included, Some(&url))?;
            schemas.push(analysis.types);
            schema::push_unique(&mut imported_elements, analysis.imported_elements);
        }

        Ok(assemble(
            definition,
            &schemas,
            imported_elements,
            self.type_name,
        ))
    }
}
