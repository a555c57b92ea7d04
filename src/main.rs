use clap::{Args, Parser, Subcommand};
use orgair_contracts::config::AppConfig;
use orgair_contracts::contracts::numeric::checked_sum;
use orgair_contracts::contracts::{default_weights, Contract, ContractError, EntityKind};
use orgair_contracts::error::AppError;
use orgair_contracts::telemetry;
use orgair_contracts::tooling::{SchemaExporter, SyntheticGenerator};
use serde_json::{json, Map, Value};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "pe-orgair",
    about = "Inspect, export and exercise the PE Org-AI-R data contracts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the JSON Schema of one entity, or of every entity keyed by name
    Schema {
        #[arg(value_parser = parse_entity)]
        entity: Option<EntityKind>,
    },
    /// Write every schema to <dir>/<version>/exports/
    Export(ExportArgs),
    /// Validate a JSON document and print its canonical form
    Validate(ValidateArgs),
    /// Print seeded synthetic fixtures that satisfy the contracts
    Generate(GenerateArgs),
    /// Print the default dimension weights and their sum
    Weights,
}

#[derive(Args, Debug, Default)]
struct ExportArgs {
    /// Override the configured schema directory
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Override the configured schema version
    #[arg(long = "schema-version")]
    schema_version: Option<String>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Entity to construct (e.g. company, sector_calibration)
    #[arg(value_parser = parse_entity)]
    entity: EntityKind,
    /// JSON file to validate, or '-' for stdin
    input: PathBuf,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Seed for reproducible output; overrides ORGAIR_SEED
    #[arg(long)]
    seed: Option<u64>,
    /// Sector the generated company and calibration belong to
    #[arg(long, default_value = "technology")]
    sector_id: String,
    /// Display name of the generated sector calibration
    #[arg(long, default_value = "Technology")]
    sector_name: String,
    /// Number of dimension score inputs to generate
    #[arg(long, default_value_t = 3)]
    scores: usize,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(?config.environment, "org-ai-r contract tooling ready");

    match cli.command {
        Command::Schema { entity } => print_json(&schema_document(entity)),
        Command::Export(args) => run_export(&config, args),
        Command::Validate(args) => run_validate(args),
        Command::Generate(args) => run_generate(&config, args),
        Command::Weights => print_json(&weights_document()),
    }
}

fn parse_entity(raw: &str) -> Result<EntityKind, String> {
    raw.parse::<EntityKind>().map_err(|err| {
        let known: Vec<&str> = EntityKind::ordered().iter().map(|kind| kind.slug()).collect();
        format!("{err}; expected one of: {}", known.join(", "))
    })
}

fn print_json(value: &Value) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn schema_document(entity: Option<EntityKind>) -> Value {
    match entity {
        Some(kind) => kind.schema(),
        None => Value::Object(
            EntityKind::ordered()
                .into_iter()
                .map(|kind| (kind.slug().to_string(), kind.schema()))
                .collect::<Map<_, _>>(),
        ),
    }
}

fn run_export(config: &AppConfig, args: ExportArgs) -> Result<(), AppError> {
    let mut export = config.export.clone();
    if let Some(dir) = args.dir {
        export.schema_dir = dir;
    }
    if let Some(version) = args.schema_version {
        export.version = version;
    }

    let exporter = SchemaExporter::from_config(&export);
    for path in exporter.export_all()? {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&args.input)?
    };
    let document: Value = serde_json::from_str(&raw)?;

    match args.entity.validate(&document) {
        Ok(canonical) => print_json(&canonical),
        Err(ContractError::Invalid(errors)) => {
            warn!(entity = %args.entity, violations = errors.len(), "document rejected");
            Err(errors.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn run_generate(config: &AppConfig, args: GenerateArgs) -> Result<(), AppError> {
    let seed = args.seed.or(config.generator.seed);
    let mut generator = SyntheticGenerator::new(seed);

    let company = generator.company(&args.sector_id)?;
    let calibration = generator.sector_calibration(&args.sector_id, &args.sector_name)?;
    let mut scores = Vec::with_capacity(args.scores);
    for _ in 0..args.scores {
        scores.push(generator.dimension_score_input()?.to_value()?);
    }

    info!(seed = ?seed, scores = scores.len(), "generated synthetic fixtures");
    print_json(&json!({
        "company": company.to_value()?,
        "sector_calibration": calibration.to_value()?,
        "dimension_scores": scores,
    }))
}

fn weights_document() -> Value {
    let weights = default_weights();
    let sum = checked_sum(weights.values());
    json!({
        "weights": weights,
        "sum": sum,
    })
}
