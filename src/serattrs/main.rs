use clap::Parser;
use serattrs::error::{AttrError, Result};
use serattrs::{AttrValue, FileRecord, FormatKind, Record, Schema, SchemaConfig, TypeRegistry};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

const LOG_ENV: &str = "SERATTRS_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Decode {
            blob,
            schema,
            format,
        } => handle_decode(&blob, schema.as_deref(), format),
        Commands::Encode {
            input,
            output,
            schema,
            format,
        } => handle_encode(&input, &output, schema.as_deref(), format),
        Commands::Set {
            blob,
            schema,
            assignments,
        } => handle_set(blob, &schema, &assignments),
        Commands::Fields { schema } => handle_fields(&schema),
    }
}

fn load_schema(path: &Path, format: Option<FormatKind>) -> Result<Schema> {
    let mut config = SchemaConfig::load(path)?;
    if let Some(format) = format {
        config.formatter = format;
    }
    debug!(path = %path.display(), fields = config.fields.len(), "loaded schema");
    config.build(&TypeRegistry::default())
}

fn print_json(body: Map<String, Value>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&Value::Object(body))?);
    Ok(())
}

fn handle_decode(blob: &Path, schema: Option<&Path>, format: Option<FormatKind>) -> Result<()> {
    let bytes = fs::read(blob)?;
    match schema {
        Some(path) => {
            let schema = load_schema(path, format)?;
            let projection = schema.materialize(Some(bytes.as_slice()), false)?;
            print_json(schema.encode_body(projection.data())?)
        }
        None => {
            let formatter = format.unwrap_or_default().formatter();
            print_json(formatter.decode(Some(bytes.as_slice()))?)
        }
    }
}

fn handle_encode(
    input: &Path,
    output: &Path,
    schema: Option<&Path>,
    format: Option<FormatKind>,
) -> Result<()> {
    let content = fs::read_to_string(input)?;
    let body = match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => map,
        other => {
            return Err(AttrError::Config(format!(
                "{} must hold a JSON object, found {}",
                input.display(),
                AttrValue::from_json(other).type_name()
            )))
        }
    };

    let bytes = match schema {
        Some(path) => {
            let schema = load_schema(path, format)?;
            let data = schema.parse_body(body)?;
            schema.formatter().encode(&schema.encode_body(&data)?)?
        }
        None => format.unwrap_or_default().formatter().encode(&body)?,
    }
    .unwrap_or_default();

    fs::write(output, &bytes)?;
    println!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

fn parse_assignment(assignment: &str) -> Result<(&str, AttrValue)> {
    let (name, raw) = assignment.split_once('=').ok_or_else(|| {
        AttrError::Config(format!("expected name=value, got '{}'", assignment))
    })?;
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(json) => AttrValue::from_json(json),
        Err(_) => AttrValue::from(raw),
    };
    Ok((name, value))
}

fn handle_set(blob: PathBuf, schema: &Path, assignments: &[String]) -> Result<()> {
    let schema = Arc::new(load_schema(schema, None)?);
    let mut record = Record::new(schema, FileRecord::open(blob)?);

    for assignment in assignments {
        let (name, value) = parse_assignment(assignment)?;
        if !record.schema().include(name) {
            return Err(AttrError::Config(format!("'{}' is not a declared attribute", name)));
        }
        record.set(name, value)?;
    }
    record.save_checked()?;

    for name in record.changed() {
        if let Some((previous, current)) = record.change(&name)? {
            println!("{}: {} -> {}", name, previous, current);
        }
    }
    Ok(())
}

fn handle_fields(schema: &Path) -> Result<()> {
    let schema = load_schema(schema, None)?;
    println!("{} (stored in {})", schema.field_name(), schema.blob_field());
    for (name, field) in schema.fields() {
        if field.ty().has_default() {
            println!("  {}\t{}\tdefault {}", name, field.tag(), field.ty().default());
        } else {
            println!("  {}\t{}", name, field.tag());
        }
    }
    Ok(())
}
