use clap::{Parser, Subcommand, ValueEnum};
use rtc_core::{Diagnostics, DiagnosticsSink, TracingSink};
use rtc_graph::ControlGroup;
use rtc_import::{ImportReport, import_all};
use rtc_records::{DataItemCatalogue, ImportDocument, RecordsError};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rtc-cli")]
#[command(about = "RTC import - legacy real-time control records to control groups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an import document
    Validate {
        /// Path to the YAML or JSON import document
        document_path: PathBuf,
    },
    /// List the structures of an import document
    Structures {
        /// Path to the YAML or JSON import document
        document_path: PathBuf,
    },
    /// Import every structure into control groups
    Import {
        /// Path to the YAML or JSON import document
        document_path: PathBuf,
        /// Format of the written control groups
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rewrite an import document as YAML or JSON, chosen by the output extension
    Convert {
        document_path: PathBuf,
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Records(#[from] RecordsError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{count} structure(s) could not be imported")]
    ImportFailed { count: usize },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Serialize)]
struct ImportOutput<'a> {
    groups: &'a [ControlGroup],
    failures: Vec<FailureOutput<'a>>,
}

#[derive(Serialize)]
struct FailureOutput<'a> {
    structure_id: &'a str,
    error: String,
}

impl<'a> ImportOutput<'a> {
    fn new(report: &'a ImportReport) -> Self {
        Self {
            groups: &report.groups,
            failures: report
                .failures
                .iter()
                .map(|f| FailureOutput {
                    structure_id: &f.structure_id,
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { document_path } => cmd_validate(&document_path),
        Commands::Structures { document_path } => cmd_structures(&document_path),
        Commands::Import {
            document_path,
            format,
            output,
        } => cmd_import(&document_path, format, output.as_deref()),
        Commands::Convert {
            document_path,
            output,
        } => cmd_convert(&document_path, &output),
    }
}

fn cmd_validate(document_path: &Path) -> CliResult<()> {
    println!("Validating document: {}", document_path.display());
    // loading migrates and validates
    let document = rtc_records::load(document_path)?;
    println!(
        "✓ Document is valid ({} structures, {} controllers, {} triggers)",
        document.structures.len(),
        document.controllers.len(),
        document.triggers.len()
    );
    Ok(())
}

fn cmd_structures(document_path: &Path) -> CliResult<()> {
    let document = rtc_records::load(document_path)?;

    if document.structures.is_empty() {
        println!("No structures found in document");
    } else {
        println!("Structures in document:");
        for structure in &document.structures {
            println!(
                "  {} - {} ({:?}, {} controllers)",
                structure.structure_id,
                structure.name,
                structure.kind,
                structure.controller_ids.len()
            );
        }
    }
    Ok(())
}

fn cmd_import(document_path: &Path, format: Format, output: Option<&Path>) -> CliResult<()> {
    let document = rtc_records::load(document_path)?;
    let (report, diagnostics) = run_import(&document);

    let mut forward = TracingSink;
    for diagnostic in diagnostics.entries() {
        forward.report(diagnostic.clone());
    }

    let rendered = match format {
        Format::Yaml => serde_yaml::to_string(&ImportOutput::new(&report))?,
        Format::Json => serde_json::to_string_pretty(&ImportOutput::new(&report))?,
    };
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!("✓ Control groups written to {}", path.display());
        }
        None => io::stdout().write_all(rendered.as_bytes())?,
    }

    eprintln!(
        "{} group(s), {} warning(s), {} error(s)",
        report.groups.len(),
        diagnostics.warnings().count(),
        diagnostics.errors().count()
    );

    if report.failures.is_empty() {
        Ok(())
    } else {
        for failure in &report.failures {
            tracing::error!(structure = %failure.structure_id, "{}", failure.error);
        }
        Err(CliError::ImportFailed {
            count: report.failures.len(),
        })
    }
}

fn run_import(document: &ImportDocument) -> (ImportReport, Diagnostics) {
    let catalogue = DataItemCatalogue::new(document.catalogue.clone());
    let mut diagnostics = Diagnostics::new();
    let report = import_all(document, &catalogue, &mut diagnostics);
    (report, diagnostics)
}

fn cmd_convert(document_path: &Path, output: &Path) -> CliResult<()> {
    let document = rtc_records::load(document_path)?;
    match output.extension().and_then(|e| e.to_str()) {
        Some("json") => rtc_records::save_json(output, &document)?,
        _ => rtc_records::save_yaml(output, &document)?,
    }
    println!("✓ Document written to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_import_serializes() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/weir_and_pump.yaml");
        let document = rtc_records::load(&path).unwrap();
        let (report, diagnostics) = run_import(&document);
        assert_eq!(diagnostics.errors().count(), 1);

        let json = serde_json::to_value(ImportOutput::new(&report)).unwrap();
        assert_eq!(json["groups"].as_array().unwrap().len(), 2);
        assert_eq!(json["groups"][0]["name"], "Control group of weir1");
        assert!(json["failures"].as_array().unwrap().is_empty());
    }

    #[test]
    fn cli_parses_import_flags() {
        let cli = Cli::parse_from(["rtc-cli", "import", "doc.yaml", "--format", "json", "-o", "out.json"]);
        let Commands::Import { format, output, .. } = cli.command else {
            panic!("import command expected");
        };
        assert!(matches!(format, Format::Json));
        assert_eq!(output, Some(PathBuf::from("out.json")));
    }
}
