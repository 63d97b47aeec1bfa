use std::{path::PathBuf, str::FromStr, time::Duration};

use structopt::StructOpt;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wsdlscan_wsdl as wsdl;
use wsdl::{binder, tree, AnalysisRecord, Analyzer, Fetch, Fetcher};

mod output;

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    AnalysisError(#[from] wsdl::Error),

    #[error("Unable to write output: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to serialize record: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Print {
    Wsdl,
    Json,
    Both,
}

impl FromStr for Print {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "wsdl" => Ok(Self::Wsdl),
            "json" => Ok(Self::Json),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown print option {}", other)),
        }
    }
}

/// Analyze a WSDL document and the schemas it references.
#[derive(StructOpt)]
struct Args {
    /// Directory the record is written to
    #[structopt(short, long, default_value = "N1-WSDL", parse(from_os_str))]
    output_dir: PathBuf,

    /// Print the record to stdout instead of writing a file
    #[structopt(long)]
    stdout: bool,

    /// Also print the raw WSDL, the JSON record, or both
    #[structopt(short, long, possible_values = &["wsdl", "json", "both"])]
    print: Option<Print>,

    /// Also produce the control/metadatos/datos layout
    #[structopt(long)]
    reshape: bool,

    /// Print the element outline of the WSDL and exit
    #[structopt(long)]
    outline: bool,

    /// How many levels of schema imports to follow
    #[structopt(long, default_value = "1")]
    import_depth: usize,

    /// HTTP timeout in seconds
    #[structopt(long)]
    timeout: Option<u64>,

    /// Upper-case the first letter of element names when matching types
    #[structopt(long)]
    capitalize_types: bool,

    #[structopt(short, long)]
    verbose: bool,

    /// URL or path of the WSDL document
    input: String,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn names<'a>(items: impl Iterator<Item = Option<&'a str>>) -> Vec<&'a str> {
    items.flatten().collect()
}

fn summarize(record: &AnalysisRecord) {
    info!(
        "messages: {:?}",
        names(record.messages.iter().map(|message| message.name.as_deref()))
    );
    info!("complex types: {:?}", record.complex_types);
    info!("messages named like a complex type: {:?}", record.matching_names());
    info!(
        "parts with complex types: {:?}",
        names(
            record
                .messages
                .iter()
                .flat_map(|message| message.bound_parts())
                .map(|part| part.name.as_deref())
        )
    );
    info!(
        "fault messages: {:?}",
        names(
            record
                .fault_messages()
                .into_iter()
                .map(|message| message.name.as_deref())
        )
    );
    info!("imported elements: {:?}", record.imported_elements);
}

fn run(args: Args) -> Result<(), Error> {
    let fetcher = Fetcher::new(args.timeout.map(Duration::from_secs))?;
    let url = wsdl::resolve_location(&args.input, None)?;
    let bytes = fetcher
        .fetch(&url)
        .map_err(|source| wsdl::Error::Fetch {
            location: url.clone(),
            source,
        })?;

    let mut analyzer = Analyzer::with_fetcher(fetcher).import_depth(args.import_depth);
    if args.capitalize_types {
        analyzer = analyzer.type_names(binder::capitalized);
    }

    if args.outline {
        let root = tree::load(&bytes, analyzer.namespaces()).map_err(|source| {
            wsdl::Error::Parse {
                location: url.to_string(),
                source,
            }
        })?;
        print!("{}", root.outline(analyzer.namespaces()));
        return Ok(());
    }

    let record = analyzer.analyze_bytes(&bytes, Some(&url))?;
    summarize(&record);

    let value = serde_json::to_value(&record)?;
    let reshaped = if args.reshape {
        Some(output::reshape(value.clone()))
    } else {
        None
    };

    if let Some(Print::Wsdl | Print::Both) = args.print {
        println!("{}", String::from_utf8_lossy(&bytes));
    }
    if let Some(Print::Json | Print::Both) = args.print {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    if args.stdout {
        let shown = reshaped.as_ref().unwrap_or(&value);
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    let file_name = output::record_file_name(&record.service_name);
    let path = output::write_json(&args.output_dir, &file_name, &value)?;
    println!("{}", path.display());

    if let Some(reshaped) = reshaped {
        let reshaped_name = format!("{}{}", output::RESHAPED_PREFIX, file_name);
        let path = output::write_json(&args.output_dir, &reshaped_name, &reshaped)?;
        println!("{}", path.display());
    }

    Ok(())
}

#[paw::main]
fn main(args: Args) {
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
