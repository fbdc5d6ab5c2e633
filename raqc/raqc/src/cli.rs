use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use raqc::schema::DatabaseSchema;
use raqc::{codegen, opt, ParseResult};

/// Entrypoint called by [`crate::main`]
pub fn main() -> Result<()> {
    env_logger::builder().format_timestamp(None).init();
    let cli = Cli::parse();

    if let Err(error) = cli.command.run() {
        eprintln!("{error:#}");
        exit(1)
    }

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "raqc", about, version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse into an AST
    Parse {
        #[command(flatten)]
        io: IoArgs,

        #[arg(value_enum, long, default_value = "json")]
        format: Format,
    },

    /// Parse & validate against a schema
    Validate {
        #[command(flatten)]
        io: IoArgs,

        /// Path of the schema JSON file
        #[arg(long)]
        schema: PathBuf,
    },

    /// Parse, translate into relational algebra & optimize
    Compile {
        #[command(flatten)]
        io: IoArgs,

        /// Comma-separated heuristic ids (e.g. PUSH_DOWN_SELECTIONS);
        /// unknown ids are ignored, the default is the full pipeline
        #[arg(long)]
        heuristics: Option<String>,
    },

    /// Emit the node/edge graph of the translated tree
    Graph {
        #[command(flatten)]
        io: IoArgs,

        /// Render the optimized tree instead of the plain translation
        #[arg(long)]
        optimized: bool,

        /// Write a Mermaid flowchart instead of JSON
        #[arg(long)]
        mermaid: bool,
    },
}

#[derive(clap::Args, Debug)]
struct IoArgs {
    /// Path of the statement to read, or `-` for stdin
    #[arg(default_value = "-")]
    input: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Format {
    Json,
    Debug,
}

impl Command {
    fn run(&self) -> Result<()> {
        match self {
            Command::Parse { io, format } => {
                let source = io.read()?;
                let success = compile(&source, opt::DEFAULT_PIPELINE)?;
                match format {
                    Format::Json => println!("{}", serde_json::to_string_pretty(&success.ast)?),
                    Format::Debug => println!("{:#?}", success.ast),
                }
            }

            Command::Validate { io, schema } => {
                let source = io.read()?;
                let schema = load_schema(schema)?;

                let findings = raqc::validate(&source, &schema)
                    .map_err(|errors| compose(errors, &source))?;

                if findings.is_empty() {
                    eprintln!("OK");
                } else {
                    println!("{}", serde_json::to_string_pretty(&findings)?);
                    exit(1)
                }
            }

            Command::Compile { io, heuristics } => {
                let source = io.read()?;
                let heuristics = match heuristics {
                    Some(ids) => opt::parse_heuristics(ids.split(',')),
                    None => opt::DEFAULT_PIPELINE.to_vec(),
                };

                let success = compile(&source, &heuristics)?;
                println!("{}", success.translation_string);
                println!("{}", success.optimization_string);
                for rule in &success.optimization.applied_rules {
                    eprintln!("applied: {rule}");
                }
            }

            Command::Graph {
                io,
                optimized,
                mermaid,
            } => {
                let source = io.read()?;
                let success = compile(&source, opt::DEFAULT_PIPELINE)?;

                let tree = if *optimized {
                    &success.optimization.optimized
                } else {
                    &success.translation
                };
                let graph = codegen::render_graph(tree);

                if *mermaid {
                    print!("{}", codegen::write_mermaid(&graph));
                } else {
                    println!("{}", serde_json::to_string_pretty(&graph)?);
                }
            }
        }

        Ok(())
    }
}

impl IoArgs {
    fn read(&self) -> Result<String> {
        if self.input == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            Ok(buffer)
        } else {
            fs::read_to_string(&self.input).with_context(|| format!("reading {}", self.input))
        }
    }
}

fn compile(source: &str, heuristics: &[opt::Heuristic]) -> Result<Box<raqc::ParseSuccess>> {
    match raqc::parse_with(source, heuristics) {
        ParseResult::Success(success) => Ok(success),
        ParseResult::Failure(failure) => {
            anyhow::bail!(
                "{} error: {}\n{}",
                failure.stage,
                failure.message,
                failure.details.join("\n")
            )
        }
    }
}

fn load_schema(path: &PathBuf) -> Result<DatabaseSchema> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    DatabaseSchema::from_json(&json).map_err(|e| anyhow::anyhow!("{}", e.reason))
}

fn compose(errors: raqc::Errors, source: &str) -> anyhow::Error {
    anyhow::anyhow!("{}", raqc::ErrorMessages::from(errors).composed(source))
}
