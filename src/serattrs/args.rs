use clap::{Parser, Subcommand};
use serattrs::FormatKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "serattrs")]
#[command(about = "Inspect and edit serialized attribute blobs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a blob's contents as JSON
    #[command(alias = "d")]
    Decode {
        /// Blob file
        blob: PathBuf,

        /// Schema definition; parses declared fields and drops the rest
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Container format (defaults to the schema's, then json)
        #[arg(short, long, value_enum)]
        format: Option<FormatKind>,
    },

    /// Write a blob from a JSON object
    #[command(alias = "e")]
    Encode {
        /// JSON file holding an object
        input: PathBuf,

        /// Blob file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Schema definition; values are typed before encoding
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Container format (defaults to the schema's, then json)
        #[arg(short, long, value_enum)]
        format: Option<FormatKind>,
    },

    /// Assign attributes in a blob and save it
    Set {
        /// Blob file (created if missing)
        blob: PathBuf,

        /// Schema definition
        #[arg(short, long)]
        schema: PathBuf,

        /// Assignments as name=value; values are read as JSON, else as text
        #[arg(required = true, num_args = 1..)]
        assignments: Vec<String>,
    },

    /// List the attributes a schema declares
    #[command(alias = "ls")]
    Fields {
        /// Schema definition
        #[arg(short, long)]
        schema: PathBuf,
    },
}
