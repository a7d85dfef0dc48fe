use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use roster_search::aggregate::{self, PartyBreakdown};
use roster_search::io::excel_read::load_workbook;
use roster_search::lookup;
use roster_search::matching;
use roster_search::model::{CountsSummary, Dataset, Record, SheetOutcome};
use roster_search::{Result, RosterError};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| RosterError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Search(args) => execute_search(args),
        Command::Positions(args) => execute_positions(args),
        Command::Parties(args) => execute_parties(args),
        Command::Lookup(args) => execute_lookup(args),
    }
}

fn load_dataset(input: &PathBuf) -> Result<Dataset> {
    if !input.exists() {
        return Err(RosterError::MissingInput(input.clone()));
    }
    let report = load_workbook(input)?;
    for outcome in report.skipped() {
        if let SheetOutcome::Skipped { sheet, reason } = outcome {
            eprintln!("note: sheet '{sheet}' skipped: {reason}");
        }
    }
    Ok(report.dataset)
}

fn execute_search(args: SearchArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let mut hits = matching::match_records(&dataset, &args.name);
    if let Some(year) = &args.year {
        hits.retain(|record| &record.source_year == year);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    if hits.is_empty() {
        println!("no records found for '{}'", args.name);
        return Ok(());
    }
    println!("{} record(s) found for '{}':", hits.len(), args.name);
    for record in hits {
        print_record(&dataset.columns, record);
        println!();
    }
    Ok(())
}

fn execute_positions(args: YearArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let records = dataset.records_for_year(&args.year);
    let Some(summary) = aggregate::position_distribution(&dataset, &records) else {
        println!("no position/title column in this workbook");
        return Ok(());
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    print_summary(&args.year, &summary);
    Ok(())
}

fn execute_parties(args: PartiesArgs) -> Result<()> {
    let dataset = load_dataset(&args.common.input)?;
    let records = dataset.records_for_year(&args.common.year);
    let Some(breakdown) = aggregate::party_distribution(&dataset, &records) else {
        println!("no party-membership column in this workbook");
        return Ok(());
    };

    match &args.party {
        Some(party) => print_party_drilldown(&dataset, &records, &breakdown, party, args.common.json),
        None if args.common.json => {
            println!("{}", serde_json::to_string_pretty(&breakdown.summary)?);
            Ok(())
        }
        None => {
            print_summary(&args.common.year, &breakdown.summary);
            Ok(())
        }
    }
}

fn print_party_drilldown(
    dataset: &Dataset,
    records: &[&Record],
    breakdown: &PartyBreakdown,
    party: &str,
    json: bool,
) -> Result<()> {
    let members: Vec<&Record> = breakdown
        .indices_for(party)
        .into_iter()
        .map(|index| records[index])
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&members)?);
        return Ok(());
    }
    if members.is_empty() {
        println!("no records in party group '{party}'");
        return Ok(());
    }
    println!("{} record(s) in party group '{party}':", members.len());
    for record in members {
        print_record(&dataset.columns, record);
        println!();
    }
    Ok(())
}

fn execute_lookup(args: LookupArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(RosterError::MissingInput(args.input));
    }
    match lookup::search_person(&args.input, &args.name)? {
        Some(hits) => {
            for record in &hits.records {
                // Transposed: one column per line in sheet order, easiest
                // to eyeball.
                for column in &hits.columns {
                    println!("{column}: {}", record.value(column).unwrap_or("-"));
                }
                println!();
            }
        }
        None => println!("name '{}' not found in any sheet", args.name),
    }
    Ok(())
}

fn print_record(columns: &[String], record: &Record) {
    for column in columns {
        println!("  {column}: {}", record.value(column).unwrap_or("-"));
    }
}

fn print_summary(year: &str, summary: &CountsSummary) {
    if summary.is_empty() {
        println!("no values recorded for {year}");
        return;
    }
    for row in &summary.rows {
        println!("{:>6}  {}", row.count, row.label);
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Search and summarise personnel rosters spread across yearly workbook sheets."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find a person's records across all years, tolerating full-name vs.
    /// initials spellings.
    Search(SearchArgs),
    /// Ranked position/title counts for one year.
    Positions(YearArgs),
    /// Party-membership groups for one year, with optional drill-down.
    Parties(PartiesArgs),
    /// Exact per-sheet lookup, printed transposed.
    Lookup(LookupArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Workbook to search (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Name to look up, full or initials form.
    #[arg(long)]
    name: String,

    /// Restrict matches to one source year.
    #[arg(long)]
    year: Option<String>,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct YearArgs {
    /// Workbook to summarise (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Source year (sheet name) to summarise.
    #[arg(long)]
    year: String,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PartiesArgs {
    #[command(flatten)]
    common: YearArgs,

    /// Drill into one party group and list its records.
    #[arg(long)]
    party: Option<String>,
}

#[derive(Args)]
struct LookupArgs {
    /// Workbook to search (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Exact name to find (case and surrounding whitespace ignored).
    #[arg(long)]
    name: String,
}
