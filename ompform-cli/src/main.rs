//! `ompform` inspects oh-my-posh segment schemas from the command line:
//! the editor form a segment type maps to, the defaults a new segment starts
//! with, and whether a theme satisfies the schema.

use std::fmt::Write as FmtWrite;
use std::io::{self, Read};
use std::path::Path;

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use ompform::{
    DocumentFormat, EditorSession, OutputDestination, OutputOptions, SegmentForm, emit,
    form_blueprint, format_label, parse_document_with_fallback, read_document, validate_theme,
};

const LOG_ENV: &str = "OMPFORM_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "ompform",
    version,
    about = "Inspect oh-my-posh segment schemas as editor forms"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output destinations ("-" writes to stdout). Defaults to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DEST",
        global = true,
        num_args = 1..,
        action = ArgAction::Append
    )]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty", global = true)]
    no_pretty: bool,

    /// Log debug details to stderr (overridden by OMPFORM_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the form for one or more segment types
    Segment(SegmentArgs),
    /// Print a new segment seeded with schema defaults
    Defaults(DefaultsArgs),
    /// Check a theme against the schema
    Validate(ValidateArgs),
    /// Print the display label for identifiers
    Label {
        #[arg(value_name = "IDENT", required = true)]
        idents: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct SchemaArg {
    /// Schema spec: file path, inline payload, or "-" for stdin
    #[arg(short = 's', long = "schema", value_name = "SPEC")]
    schema: String,
}

#[derive(Debug, Args)]
struct SegmentArgs {
    #[arg(value_name = "TYPE", required = true)]
    segment_types: Vec<String>,

    #[command(flatten)]
    schema: SchemaArg,

    /// Print control descriptors instead of property definitions
    #[arg(long = "controls", conflicts_with = "blueprint")]
    controls: bool,

    /// Print the renderer blueprint of each form
    #[arg(long = "blueprint")]
    blueprint: bool,
}

#[derive(Debug, Args)]
struct DefaultsArgs {
    #[arg(value_name = "TYPE")]
    segment_type: String,

    #[command(flatten)]
    schema: SchemaArg,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[command(flatten)]
    schema: SchemaArg,

    /// Theme spec: file path, inline payload, or "-" for stdin
    #[arg(short = 't', long = "theme", value_name = "SPEC")]
    theme: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut diagnostics = DiagnosticCollector::default();
    let output = build_output_options(&cli, &mut diagnostics);
    diagnostics.into_result()?;

    match &cli.command {
        Command::Segment(args) => run_segment(args, &output),
        Command::Defaults(args) => run_defaults(args, &output),
        Command::Validate(args) => run_validate(args, &output),
        Command::Label { idents } => {
            let labels: Map<String, Value> = idents
                .iter()
                .map(|ident| (ident.clone(), Value::String(format_label(ident))))
                .collect();
            write_output(&Value::Object(labels), &output)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ompform=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_segment(args: &SegmentArgs, output: &OutputOptions) -> Result<()> {
    let schema = load_value(&args.schema.schema, "schema")?;
    let mut session = EditorSession::new(schema);
    let forms = session.segment_forms(&args.segment_types);

    let mut rendered = Map::new();
    let mut failures = Vec::new();
    for (segment_type, form) in forms {
        match form {
            Ok(form) => {
                if let Some(notice) = form.notice() {
                    eprintln!("{notice}");
                }
                rendered.insert(segment_type, render_form(&form, args));
            }
            Err(err) => {
                eprintln!("{err}");
                failures.push(segment_type);
            }
        }
    }

    if !rendered.is_empty() {
        let payload = if args.segment_types.len() == 1 {
            rendered.into_iter().next().map(|(_, value)| value).unwrap_or(Value::Null)
        } else {
            Value::Object(rendered)
        };
        write_output(&payload, output)?;
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(eyre!("no schema for segment type(s): {}", failures.join(", ")))
    }
}

fn render_form(form: &SegmentForm, args: &SegmentArgs) -> Value {
    if args.blueprint {
        return form_blueprint(form);
    }
    if args.controls {
        serde_json::to_value(&form.controls).unwrap_or(Value::Null)
    } else {
        Value::Array(form.properties.iter().map(|p| p.to_value()).collect())
    }
}

fn run_defaults(args: &DefaultsArgs, output: &OutputOptions) -> Result<()> {
    let schema = load_value(&args.schema.schema, "schema")?;
    let mut session = EditorSession::new(schema);
    let segment = session
        .new_segment(&args.segment_type)
        .wrap_err("cannot seed segment")?;
    write_output(&segment, output)
}

fn run_validate(args: &ValidateArgs, output: &OutputOptions) -> Result<()> {
    if args.schema.schema == "-" && args.theme == "-" {
        return Err(eyre!(
            "cannot read schema and theme from stdin at once; pass one inline or as a file"
        ));
    }
    let schema = load_value(&args.schema.schema, "schema")?;
    let theme = load_value(&args.theme, "theme")?;
    let report = validate_theme(&schema, &theme).map_err(|err| eyre!("{err:#}"))?;

    write_output(&json!({"valid": report.is_valid(), "issues": report.issues}), output)?;
    if report.is_valid() {
        Ok(())
    } else {
        Err(eyre!("theme has {} schema violation(s)", report.issues.len()))
    }
}

fn write_output(value: &Value, options: &OutputOptions) -> Result<()> {
    emit(value, options).map_err(|err| eyre!("{err:#}"))
}

/// Loads a SPEC: `-` reads stdin, an existing file goes through
/// [`read_document`], anything else is parsed as an inline payload.
fn load_value(spec: &str, label: &str) -> Result<Value> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return parse_inline(&buffer, label);
    }

    let path = Path::new(spec);
    if path.is_file() {
        return read_document(path)
            .map_err(|err| eyre!("failed to load {label} from {}: {err:#}", path.display()));
    }
    tracing::debug!(label, "spec is not a file, parsing it inline");
    parse_inline(spec, &format!("inline {label}"))
}

fn parse_inline(contents: &str, label: &str) -> Result<Value> {
    parse_document_with_fallback(contents, DocumentFormat::default())
        .map_err(|err| eyre!("failed to parse {label}: {err:#}"))
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_output_options(cli: &Cli, diagnostics: &mut DiagnosticCollector) -> OutputOptions {
    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let file_paths: Vec<&Path> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.as_path()),
            OutputDestination::Stdout => None,
        })
        .collect();
    let format = infer_format_from_files(&file_paths, diagnostics).unwrap_or_default();

    OutputOptions::new(format)
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations)
}

fn infer_format_from_files(
    file_paths: &[&Path],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match DocumentFormat::from_path(path) {
            Some(format) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other outputs use {existing}",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            None => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use one of {}",
                path.display(),
                format_list()
            )),
        }
    }
    detected
}
