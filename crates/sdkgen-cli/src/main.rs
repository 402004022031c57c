use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use sdkgen_core::config::{self, CONFIG_FILE_NAME, SdkgenConfig};
use sdkgen_core::ir::ExtractedApi;
use sdkgen_core::mapping::load_mapping;
use sdkgen_core::pipeline::{PipelineOptions, Prepared, prepare};
use sdkgen_core::typemap::{Declaration, TypeExpr, TypeMapper};
use sdkgen_core::{CodeGenerator, GeneratedFile, TargetLanguage, parse, transform};
use sdkgen_python::PythonGenerator;
use sdkgen_typescript::TypeScriptGenerator;

/// Exit status when a mapping file was bootstrapped and nothing generated.
const EXIT_MAPPING_BOOTSTRAPPED: u8 = 2;

#[derive(Parser)]
#[command(name = "sdkgen", about = "OpenAPI 3.x client SDK generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate client SDKs from an OpenAPI document
    Generate {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Path to the name-mapping file
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Output directory; each target gets a subdirectory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Targets to render (repeatable); defaults to the config's targets
        #[arg(long = "target", value_enum)]
        targets: Vec<TargetArg>,
    },

    /// Validate an OpenAPI document
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show the operations and schemas extracted from a document
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new sdkgen configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    Typescript,
    Python,
}

impl From<TargetArg> for TargetLanguage {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Typescript => TargetLanguage::Typescript,
            TargetArg::Python => TargetLanguage::Python,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            mapping,
            output,
            targets,
        } => cmd_generate(input, mapping, output, targets),

        Commands::Validate { input } => cmd_validate(input).map(|()| ExitCode::SUCCESS),

        Commands::Inspect { input, format } => {
            cmd_inspect(input, format).map(|()| ExitCode::SUCCESS)
        }

        Commands::Init { force } => cmd_init(force).map(|()| ExitCode::SUCCESS),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "sdkgen", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SdkgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Parse, validate and extract a document.
fn load_api(path: &Path) -> Result<ExtractedApi> {
    let spec = parse::load(path).with_context(|| format!("failed to load {}", path.display()))?;
    Ok(transform::extract(&spec))
}

fn get_generator(target: TargetLanguage) -> Box<dyn CodeGenerator> {
    match target {
        TargetLanguage::Typescript => Box::new(TypeScriptGenerator),
        TargetLanguage::Python => Box::new(PythonGenerator),
    }
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    fs::create_dir_all(base)
        .with_context(|| format!("failed to create output directory {}", base.display()))?;
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

/// External formatter commands per target, run in order inside the target's
/// output directory. A missing first command skips the rest.
fn formatter_steps(target: TargetLanguage) -> &'static [(&'static str, &'static [&'static str])] {
    match target {
        TargetLanguage::Typescript => &[("npx", &["@biomejs/biome", "check", "--write", "."])],
        TargetLanguage::Python => &[
            ("ruff", &["format", "."]),
            ("ruff", &["check", "--fix", "."]),
        ],
    }
}

/// Best-effort formatting; failures are reported, never fatal.
fn try_run_formatter(target: TargetLanguage, output_dir: &Path) {
    for (program, args) in formatter_steps(target) {
        let step = format!("{program} {}", args.join(" "));
        match Command::new(program).args(*args).current_dir(output_dir).output() {
            Ok(result) if result.status.success() => eprintln!("  ran `{step}`"),
            Ok(result) => {
                eprintln!("  warning: `{step}` exited with {}", result.status);
                log::debug!("{}", String::from_utf8_lossy(&result.stderr));
            }
            Err(err) => {
                eprintln!(
                    "  note: {program} not available ({err}); run `{step}` in {} to format",
                    output_dir.display()
                );
                return;
            }
        }
    }
}

fn cmd_generate(
    input: Option<PathBuf>,
    mapping: Option<PathBuf>,
    output: Option<PathBuf>,
    targets: Vec<TargetArg>,
) -> Result<ExitCode> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let mapping_path = mapping.unwrap_or_else(|| PathBuf::from(&cfg.mapping_file));
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let targets: Vec<TargetLanguage> = if targets.is_empty() {
        cfg.targets.clone()
    } else {
        targets.into_iter().map(TargetLanguage::from).collect()
    };

    let api = load_api(&input)?;
    let state = load_mapping(&mapping_path);

    let model = match prepare(api, state, cfg.pipeline_options())? {
        Prepared::Bootstrap(table) => {
            let json = table
                .to_json()
                .context("failed to serialize the mapping table")?;
            fs::write(&mapping_path, json)
                .with_context(|| format!("failed to write {}", mapping_path.display()))?;
            eprintln!(
                "Wrote {} with {} operations and {} schemas.",
                mapping_path.display(),
                table.operations.len(),
                table.schemas.len()
            );
            eprintln!("Mapping file generated; edit it if needed and re-run to apply.");
            return Ok(ExitCode::from(EXIT_MAPPING_BOOTSTRAPPED));
        }
        Prepared::Ready(model) => model,
    };

    if targets.is_empty() {
        eprintln!("No targets configured. Add a `targets` list to your config.");
        return Ok(ExitCode::SUCCESS);
    }

    // Render every target before touching the output directory.
    let options = cfg.generator_options();
    let mut rendered = Vec::with_capacity(targets.len());
    for target in targets {
        let files = get_generator(target)
            .generate(&model, &options)
            .with_context(|| format!("failed to generate the {target} client"))?;
        rendered.push((target, files));
    }

    for (target, files) in &rendered {
        let dir = output.join(target.as_str());
        eprintln!("Generating {} → {}", target, dir.display());
        write_files(&dir, files)?;
        if cfg.format {
            try_run_formatter(*target, &dir);
        }
        eprintln!("Generated {} files in {}", files.len(), dir.display());
    }

    eprintln!(
        "\nThe generated directories should not be edited manually; changes will be overwritten."
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let spec = parse::load(&input).with_context(|| format!("failed to load {}", input.display()))?;

    eprintln!("Valid OpenAPI {} document: {}", spec.openapi, spec.info.title);
    eprintln!("  Version: {}", spec.info.version);
    eprintln!("  Paths: {}", spec.paths.len());

    if let Some(ref components) = spec.components {
        eprintln!("  Schemas: {}", components.schemas.len());
    }

    let api = transform::extract(&spec);
    let streaming = api.operations.iter().filter(|op| op.is_streaming()).count();
    eprintln!("  Operations: {} ({} streaming)", api.operations.len(), streaming);
    eprintln!("  Declared schemas: {}", api.schemas.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let api = load_api(&input)?;

    let summary = build_inspect_summary(&api, cfg.pipeline_options());

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Compact, language-neutral rendering of a mapped type.
fn describe(expr: &TypeExpr) -> String {
    match expr {
        TypeExpr::String => "string".to_string(),
        TypeExpr::StringEnum(values) => format!("enum({})", values.join("|")),
        TypeExpr::Integer => "integer".to_string(),
        TypeExpr::Number => "number".to_string(),
        TypeExpr::Boolean => "boolean".to_string(),
        TypeExpr::Array(inner) => format!("array<{}>", describe(inner)),
        TypeExpr::Named(name) => name.clone(),
        TypeExpr::Map(value) => format!("map<{}>", describe(value)),
        TypeExpr::OpenObject => "object".to_string(),
        TypeExpr::Unknown => "unknown".to_string(),
    }
}

fn build_inspect_summary(api: &ExtractedApi, options: PipelineOptions) -> serde_json::Value {
    let mapper = TypeMapper::new(&api.schemas, options.fingerprint);

    let schemas: Vec<serde_json::Value> = api
        .schemas
        .iter()
        .map(|s| {
            serde_json::json!({
                "name": s.name,
                "kind": match mapper.declare(s) {
                    Declaration::Object { .. } => "object",
                    Declaration::Enum(_) => "enum",
                    Declaration::Alias(_) => "alias",
                },
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = api
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "id": op.id,
                "method": op.method.as_str(),
                "path": op.path,
                "path_params": op.path_params.iter().map(|p| &p.name).collect::<Vec<_>>(),
                "query_params": op.query_params.iter().map(|p| &p.name).collect::<Vec<_>>(),
                "body": op.request_body.as_ref().map(|b| describe(&mapper.map_shape(&b.shape))),
                "response": op.response.as_ref().map(|s| describe(&mapper.map_shape(s))),
                "streaming": op.streaming.as_ref().map(|s| s.kind.as_str()),
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": api.info.title,
            "version": api.info.version,
        },
        "base_url": api.base_url,
        "schemas": schemas,
        "operations": operations,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let expr = TypeExpr::Map(Box::new(TypeExpr::Array(Box::new(TypeExpr::Named(
            "Pet".into(),
        )))));
        assert_eq!(describe(&expr), "map<array<Pet>>");
        assert_eq!(
            describe(&TypeExpr::StringEnum(vec!["a".into(), "b".into()])),
            "enum(a|b)"
        );
    }

    #[test]
    fn test_formatter_steps() {
        assert_eq!(formatter_steps(TargetLanguage::Typescript)[0].0, "npx");
        let python = formatter_steps(TargetLanguage::Python);
        assert_eq!(python.len(), 2);
        assert_eq!(python[1].1, ["check", "--fix", "."]);
    }

    #[test]
    fn test_cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "sdkgen", "generate", "-i", "api.yaml", "-m", "names.json", "--target", "python",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                input,
                mapping,
                output,
                targets,
            } => {
                assert_eq!(input, Some(PathBuf::from("api.yaml")));
                assert_eq!(mapping, Some(PathBuf::from("names.json")));
                assert!(output.is_none());
                assert_eq!(
                    targets.into_iter().map(TargetLanguage::from).collect::<Vec<_>>(),
                    [TargetLanguage::Python]
                );
            }
            _ => panic!("expected generate"),
        }
    }
}
