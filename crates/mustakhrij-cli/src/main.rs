use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use anyhow::Context as _;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;

use mustakhrij_core::record::ExtractedRecord;
use mustakhrij_core::reconcile::reconcile_day;
use mustakhrij_core::schema::ExtractionSchema;
use mustakhrij_core::timetable::Timetable;
use mustakhrij_core::validate::ValidationReport;
use mustakhrij_docx::read_input_text;
use mustakhrij_docx::write_journal;
use mustakhrij_llm::ChatClient;
use mustakhrij_llm::ChatSession;
use mustakhrij_llm::CompletionParams;
use mustakhrij_llm::LLMClient;
use mustakhrij_llm::LLMConfig;
use mustakhrij_llm::LLMProvider;
use mustakhrij_metadata::Enrichment;
use mustakhrij_metadata::TmdbClient;
use mustakhrij_metadata::TmdbConfig;
use mustakhrij_prompts::extract_lessons::extract_lessons;
use mustakhrij_prompts::extract_report::extract_movie_comparison;
use mustakhrij_prompts::extract_report::extract_movie_report;
use mustakhrij_prompts::PromptEngine;
use mustakhrij_store::ReportRow;
use mustakhrij_store::ReportStore;

/// The field that names a lesson's activity in the extracted records
const ACTIVITY_FIELD: &str = "النشاط";

#[derive(Parser, Debug)]
#[command(
    name = "mustakhrij",
    version,
    about = "Structured extraction from hosted model replies",
    author
)]
struct Cli {
    /// Provider: cerebras|groq|openai (default: cerebras, or MUSTAKHRIJ_PROVIDER)
    #[arg(long)]
    provider: Option<String>,
    /// Model override
    #[arg(long)]
    model: Option<String>,
    /// API key (or MUSTAKHRIJ_API_KEY)
    #[arg(long, env = "MUSTAKHRIJ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract lesson records from notes and fill the daily journal
    Lessons {
        /// Notes document (.docx) or plain-text file
        input: PathBuf,
        /// Day to reconcile against, e.g. "الأحد"
        #[arg(long)]
        day: String,
        /// Write the filled journal document here (.docx)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also print the extracted records as JSON
        #[arg(long)]
        json: bool,
        /// Timetable override: JSON array of {day, time, activity} slots
        #[arg(long)]
        timetable: Option<PathBuf>,
    },
    /// Structured movie report; two to five titles switch to comparison mode
    Report {
        /// Film title(s)
        #[arg(required = true)]
        titles: Vec<String>,
        /// Append the report(s) to this SQLite store
        #[arg(long)]
        store: Option<PathBuf>,
        /// Skip metadata enrichment
        #[arg(long)]
        no_enrich: bool,
    },
    /// Streamed conversation; "/new" resets the context, "/quit" exits
    Chat,
    /// Show the most recent stored reports
    Recent {
        /// Store path
        #[arg(long, default_value = "reports.db")]
        store: PathBuf,
        /// Number of rows
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = build_llm_config(&cli)?;

    match cli.cmd {
        Commands::Lessons {
            input,
            day,
            out,
            json,
            timetable,
        } => cmd_lessons(config, &input, &day, out.as_deref(), json, timetable.as_deref()).await,
        Commands::Report {
            titles,
            store,
            no_enrich,
        } => cmd_report(config, &titles, store.as_deref(), no_enrich).await,
        Commands::Chat => cmd_chat(config).await,
        Commands::Recent { store, limit } => cmd_recent(&store, limit),
    }
}

fn build_llm_config(cli: &Cli) -> Result<LLMConfig> {
    let mut config = LLMConfig::default();
    config.from_env();

    if let Some(name) = &cli.provider {
        let Some(provider) = LLMProvider::parse(name) else {
            bail!("unknown provider '{}'; expected cerebras, groq or openai", name);
        };
        let api_key = std::mem::take(&mut config.api_key);
        config = LLMConfig::for_provider(provider);
        config.api_key = api_key;
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(key) = &cli.api_key {
        config.api_key = key.clone();
    }
    Ok(config)
}

async fn cmd_lessons(
    config: LLMConfig,
    input: &Path,
    day: &str,
    out: Option<&Path>,
    json: bool,
    timetable_path: Option<&Path>,
) -> Result<()> {
    let timetable = match timetable_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading timetable {}", path.display()))?;
            Timetable::from_json_str(&text)?
        }
        None => Timetable::default(),
    };
    let slots = timetable.day(day);
    if slots.is_empty() {
        bail!(
            "no slots for day '{}'; known days: {}",
            day,
            timetable.days().join("، ")
        );
    }

    let subject = read_input_text(input).with_context(|| format!("reading {}", input.display()))?;

    let client = ChatClient::new(config)?;
    let engine = PromptEngine::new()?;
    let schema = ExtractionSchema::lesson();

    let spinner = spinner("analyzing notes...")?;
    let result = extract_lessons(&engine, &client, &schema, &subject).await;
    spinner.finish_and_clear();
    let report = report_or_show_raw(result)?;

    println!(
        "extracted {} record(s), {} incomplete",
        report.records.len(),
        report.incomplete
    );
    if report.invalid > 0 {
        eprintln!(
            "skipped {} malformed candidate(s): {}",
            report.invalid,
            report.first_invalid.as_deref().unwrap_or("")
        );
    }

    let rows = reconcile_day(&slots, &report.records, ACTIVITY_FIELD);
    println!("\n{}:", day);
    for row in &rows {
        match &row.record {
            Some(record) => println!(
                "  {}  {}  ←  {}",
                row.slot.time,
                row.slot.activity,
                record.text("الموضوع")
            ),
            None => println!("  {}  {}  ←  —", row.slot.time, row.slot.activity),
        }
    }

    if json {
        let values: Vec<_> = report.records.iter().map(ExtractedRecord::to_json).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    }

    if let Some(out) = out {
        write_journal(day, &rows, out)?;
        println!("journal written to {}", out.display());
    }

    Ok(())
}

async fn cmd_report(
    config: LLMConfig,
    titles: &[String],
    store_path: Option<&Path>,
    no_enrich: bool,
) -> Result<()> {
    let client = ChatClient::new(config)?;
    let engine = PromptEngine::new()?;
    let schema = ExtractionSchema::movie();

    let tmdb = if no_enrich {
        None
    } else {
        let mut metadata_config = TmdbConfig::default();
        metadata_config.from_env();
        match TmdbClient::new(metadata_config) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "metadata enrichment unavailable");
                None
            }
        }
    };

    let store = match store_path {
        Some(path) => Some(ReportStore::open(path)?),
        None => None,
    };

    if titles.len() == 1 {
        let spinner = spinner("writing report...")?;
        let result = extract_movie_report(&engine, &client, &schema, &titles[0]).await;
        spinner.finish_and_clear();
        let report = report_or_show_raw(result)?;

        store_and_print(&report.records, &schema, tmdb.as_ref(), store.as_ref(), "critique").await?;
    } else {
        let summary_schema = ExtractionSchema::movie_comparison();
        let spinner = spinner("comparing films...")?;
        let result =
            extract_movie_comparison(&engine, &client, &schema, &summary_schema, titles).await;
        spinner.finish_and_clear();
        let comparison = match result {
            Ok(comparison) => comparison,
            Err(e) => {
                show_raw_reply(&e);
                return Err(e.into());
            }
        };

        store_and_print(
            &comparison.subjects.records,
            &schema,
            tmdb.as_ref(),
            store.as_ref(),
            "comparison",
        )
        .await?;

        if let Some(summary) = &comparison.summary {
            println!("\nverdict: {}", summary.text("winner"));
            println!("{}", summary.text("rationale"));
        } else {
            eprintln!("the reply carried no comparison summary");
        }
    }

    Ok(())
}

async fn store_and_print(
    records: &[ExtractedRecord],
    schema: &ExtractionSchema,
    tmdb: Option<&TmdbClient>,
    store: Option<&ReportStore>,
    kind: &str,
) -> Result<()> {
    for record in records {
        let enrichment = match tmdb {
            Some(client) => client.enrich(&record.text("title")).await,
            None => None,
        };

        print_record(record, enrichment.as_ref());

        if let Some(store) = store {
            store.append(&to_report_row(record, enrichment.as_ref(), kind, &schema.sentinel))?;
        }
    }
    if store.is_some() {
        println!("\nappended {} report(s) to the store", records.len());
    }
    Ok(())
}

fn print_record(record: &ExtractedRecord, enrichment: Option<&Enrichment>) {
    println!("\n{} ({})", record.text("title"), record.text("year"));
    println!("  director: {}", record.text("director"));
    println!("  genres:   {}", record.text("genres"));
    println!("  score:    {}", record.text("score"));
    println!("  {}", record.text("review"));
    if !record.is_complete() {
        println!("  [missing: {}]", record.missing_fields().join(", "));
    }
    if let Some(enrichment) = enrichment {
        if let Some(url) = &enrichment.trailer_url {
            println!("  trailer:  {}", url);
        }
        if !enrichment.recommendations.is_empty() {
            println!("  see also: {}", enrichment.recommendations.join(", "));
        }
    }
}

fn to_report_row(
    record: &ExtractedRecord,
    enrichment: Option<&Enrichment>,
    kind: &str,
    sentinel: &str,
) -> ReportRow {
    let mut director = record.text("director");
    if director.is_empty() || director == sentinel {
        if let Some(name) = enrichment.and_then(|e| e.director.clone()) {
            director = name;
        }
    }

    let mut genres = list_field(record, "genres");
    if genres.is_empty() {
        if let Some(e) = enrichment {
            genres = e.genres.clone();
        }
    }

    let score = number_field(record, "score").or_else(|| enrichment.and_then(|e| e.score));
    let year = number_field(record, "year")
        .map(|y| y as i64)
        .or_else(|| enrichment.and_then(|e| e.year.map(i64::from)));

    ReportRow::new(record.text("title"), director, genres, score, year, kind)
}

fn number_field(record: &ExtractedRecord, name: &str) -> Option<f64> {
    record.get(name).and_then(serde_json::Value::as_f64)
}

fn list_field(record: &ExtractedRecord, name: &str) -> Vec<String> {
    record
        .get(name)
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

async fn cmd_chat(config: LLMConfig) -> Result<()> {
    let client = ChatClient::new(config)?;
    let mut session = ChatSession::with_system("أنت مساعد ودود يجيب بإيجاز وبالعربية الفصحى.");

    println!("chat started; /new resets the conversation, /quit exits");

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match input {
            "/quit" | "/exit" => break,
            "/new" => {
                session.reset();
                println!("(new conversation)");
                continue;
            }
            _ => {}
        }

        session.push_user(input);
        let params = CompletionParams {
            max_tokens: Some(1000),
            temperature: Some(0.7),
            ..Default::default()
        };

        let mut print_delta = |delta: &str| {
            print!("{}", delta);
            let _ = std::io::stdout().flush();
        };

        match client
            .complete_streaming(&session.messages(), &params, &mut print_delta)
            .await
        {
            Ok(full) => {
                println!();
                session.push_assistant(full);
            }
            Err(e) => {
                // roll the failed turn back so a retry starts clean
                session.pop();
                eprintln!("\nerror: {} (try again)", e);
            }
        }
    }

    Ok(())
}

fn cmd_recent(store_path: &Path, limit: usize) -> Result<()> {
    let store = ReportStore::open(store_path)?;
    let rows = store.recent(limit)?;
    if rows.is_empty() {
        println!("no stored reports");
        return Ok(());
    }

    for row in rows {
        let when = chrono::DateTime::from_timestamp(row.created_at, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| row.created_at.to_string());
        println!(
            "{}  {}  ({})  {}  [{}]",
            when,
            row.title,
            row.year.map_or_else(|| "—".to_string(), |y| y.to_string()),
            row.director,
            row.kind
        );
    }
    Ok(())
}

/// Show the raw model reply next to an extraction failure, then bubble the
/// error up
fn report_or_show_raw(result: mustakhrij_core::Result<ValidationReport>) -> Result<ValidationReport> {
    match result {
        Ok(report) => Ok(report),
        Err(e) => {
            show_raw_reply(&e);
            Err(e.into())
        }
    }
}

fn show_raw_reply(e: &mustakhrij_core::Error) {
    if let Some(raw) = e.raw_reply() {
        eprintln!("raw model reply follows:\n---\n{}\n---", raw);
    }
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
