use clap::{Args, Parser, Subcommand};
use ial_eligibility::catalog::QualificationCatalog;
use ial_eligibility::config::{AppConfig, OutputFormat};
use ial_eligibility::eligibility::{
    CheckMode, DualVerdict, EligibilityEngine, QualificationId, SelectionContext, Verdict,
};
use ial_eligibility::error::AppError;
use ial_eligibility::history::HistoryImporter;
use ial_eligibility::telemetry;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "ial-eligibility",
    about = "Check which International A Level qualifications a set of units can be cashed in for",
    version
)]
struct Cli {
    /// JSON catalog to use instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List subjects and the qualifications they award
    Catalog,
    /// Check one qualification or every qualification of a subject
    Check(CheckArgs),
    /// Check every mathematics qualification at once
    Maths(SelectionArgs),
    /// Check two qualifications that must be met from separate units
    Dual(DualArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Subject key, e.g. BIOLOGY
    #[arg(long, conflicts_with = "qualification")]
    subject: Option<String>,
    /// Qualification exam code, e.g. YMA01
    #[arg(long)]
    qualification: Option<String>,
    #[command(flatten)]
    selection: SelectionArgs,
}

impl CheckArgs {
    fn mode(&self) -> CheckMode {
        match (&self.qualification, &self.subject) {
            (Some(id), _) => CheckMode::Single(QualificationId::new(normalize_code(id))),
            (None, Some(subject)) => CheckMode::Subject(normalize_code(subject)),
            (None, None) => CheckMode::Subject(String::new()),
        }
    }
}

#[derive(Args, Debug)]
struct DualArgs {
    /// Qualification awarded from the required units plus one pair
    #[arg(long, default_value = "YMA01")]
    primary: String,
    /// Qualification awarded from the remaining units
    #[arg(long, default_value = "YFM01")]
    secondary: String,
    #[command(flatten)]
    selection: SelectionArgs,
}

#[derive(Args, Debug, Default)]
struct SelectionArgs {
    /// Completed unit codes, comma or space separated
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    units: Vec<String>,
    /// Units already cashed in towards an award
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    cashed_in: Vec<String>,
    /// CSV export of previously awarded qualifications
    #[arg(long)]
    history: Option<PathBuf>,
}

impl SelectionArgs {
    fn context(&self, catalog: &QualificationCatalog) -> Result<SelectionContext, AppError> {
        let mut context = SelectionContext::new(split_codes(&self.units))
            .with_cashed_in(split_codes(&self.cashed_in));

        if let Some(path) = &self.history {
            context = context.with_history(HistoryImporter::from_path(path, catalog)?);
        }

        Ok(context)
    }
}

#[derive(Debug, Serialize)]
struct CheckResponse<'a> {
    mode: &'a CheckMode,
    selected_units: &'a BTreeSet<String>,
    verdict: &'a Verdict,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(path) = cli.catalog {
        config.eligibility.catalog_path = Some(path);
    }
    if cli.json {
        config.eligibility.output = OutputFormat::Json;
    }

    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    let catalog = match &config.eligibility.catalog_path {
        Some(path) => QualificationCatalog::from_path(path)?,
        None => QualificationCatalog::standard(),
    };
    let engine = EligibilityEngine::new(catalog);
    let output = config.eligibility.output;

    let rendered = match cli.command {
        Command::Catalog => match output {
            OutputFormat::Json => engine.catalog().to_json()?,
            OutputFormat::Text => render_catalog(engine.catalog()),
        },
        Command::Check(args) => {
            let context = args.selection.context(engine.catalog())?;
            let mode = args.mode();
            let verdict = engine.check(&mode, &context)?;
            render_verdict(&mode, &context, &verdict, output)?
        }
        Command::Maths(args) => {
            let context = args.context(engine.catalog())?;
            let mode = CheckMode::AllMathematics;
            let verdict = engine.check(&mode, &context)?;
            render_verdict(&mode, &context, &verdict, output)?
        }
        Command::Dual(args) => {
            let context = args.selection.context(engine.catalog())?;
            let outcome = engine.check_dual(
                &QualificationId::new(normalize_code(&args.primary)),
                &QualificationId::new(normalize_code(&args.secondary)),
                &context,
            )?;
            render_dual(&outcome, output)?
        }
    };

    println!("{rendered}");
    info!("eligibility run complete");
    Ok(())
}

fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Accepts `--units WMA11,WMA12` as well as `--units "WMA11 WMA12"`.
fn split_codes(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split([',', ' ']))
        .map(normalize_code)
        .filter(|code| !code.is_empty())
        .collect()
}

fn render_verdict(
    mode: &CheckMode,
    context: &SelectionContext,
    verdict: &Verdict,
    output: OutputFormat,
) -> Result<String, AppError> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&CheckResponse {
            mode,
            selected_units: &context.selected_units,
            verdict,
        })?),
        OutputFormat::Text => Ok(verdict_lines(verdict).join("\n")),
    }
}

fn verdict_lines(verdict: &Verdict) -> Vec<String> {
    let mut lines = Vec::new();

    if verdict.eligible.is_empty() {
        lines.push("Eligible: none".to_string());
    } else {
        lines.push("Eligible".to_string());
        for result in &verdict.eligible {
            lines.push(format!("- {} ({})", result.display_name, result.exam_code));
        }
    }

    if !verdict.missing.is_empty() {
        lines.push(String::new());
        lines.push("Missing requirements".to_string());
        for requirement in &verdict.missing {
            lines.push(format!(
                "- {} ({}): {}",
                requirement.display_name,
                requirement.exam_code,
                requirement.summary()
            ));
        }
    }

    lines
}

fn render_dual(outcome: &DualVerdict, output: OutputFormat) -> Result<String, AppError> {
    if output == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(outcome)?);
    }

    let mut lines = verdict_lines(&outcome.verdict);
    lines.push(String::new());

    match &outcome.allocation {
        Some(allocation) => {
            // An allocation implies both qualifications are eligible, primary first.
            let name = |index: usize| {
                outcome
                    .verdict
                    .eligible
                    .get(index)
                    .map(|result| result.display_name.as_str())
                    .unwrap_or("?")
            };
            lines.push("Dual allocation".to_string());
            lines.push(format!(
                "- {}: {}",
                name(0),
                allocation.primary.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
            lines.push(format!(
                "- {}: {}",
                name(1),
                allocation.secondary.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
        None => {
            lines.push("Dual allocation: not possible".to_string());
            lines.extend(outcome.notes.iter().map(|note| format!("- {note}")));
        }
    }

    Ok(lines.join("\n"))
}

fn render_catalog(catalog: &QualificationCatalog) -> String {
    let mut lines = Vec::new();

    for subject in catalog.subjects() {
        lines.push(format!("{} [{}]", subject.name, subject.key));
        if let Some(note) = &subject.note {
            lines.push(format!("  note: {note}"));
        }
        let units: Vec<&str> = subject.units.iter().map(|unit| unit.code.as_str()).collect();
        lines.push(format!("  units: {}", units.join(", ")));
        for qualification in catalog
            .qualifications()
            .iter()
            .filter(|qualification| qualification.subject == subject.key)
        {
            lines.push(format!(
                "  - {} {} ({})",
                qualification.exam_code,
                qualification.display_name,
                qualification.rule.kind()
            ));
        }
    }

    lines.join("\n")
}
