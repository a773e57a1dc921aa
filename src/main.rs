mod db;
mod extract;
mod output;
mod parser;
mod records;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;

use output::OutputPaths;
use records::{ArticleIds, Regulation, RegulationType};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "pojk_to_db",
    about = "Convert POJK/SEOJK PDF into JSON and optional SQLite DB; ignores Penjelasan"
)]
struct Cli {
    /// Path to PDF
    #[arg(long)]
    pdf: PathBuf,
    /// Regulation category
    #[arg(long = "type", value_enum)]
    kind: RegulationType,
    /// Regulation number, e.g. "12/POJK.03/2021"
    #[arg(long)]
    number: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    year: i32,
    /// Regulation id stamped on every article
    #[arg(long, default_value_t = 1)]
    id: i64,
    /// YYYY-MM-DD
    #[arg(long)]
    effective_date: Option<NaiveDate>,
    #[arg(long, default_value = "active")]
    status: String,
    #[arg(long)]
    source_url: Option<String>,
    /// Number of the regulation this one replaces
    #[arg(long)]
    replaces: Option<String>,
    /// Number of the regulation amending this one
    #[arg(long)]
    amended_by: Option<String>,
    /// Number of the regulation revoking this one
    #[arg(long)]
    revoked_by: Option<String>,
    /// Output directory (default: $POJK_OUTDIR or "out")
    #[arg(long)]
    outdir: Option<PathBuf>,
    /// Also build a SQLite database with a full-text index
    #[arg(long)]
    build_db: bool,
}

impl Cli {
    fn regulation(&self) -> Regulation {
        Regulation {
            id: self.id,
            kind: self.kind,
            number_text: self.number.clone(),
            title: self.title.clone(),
            year: self.year,
            effective_date: self.effective_date,
            status: self.status.clone(),
            replaces_number: self.replaces.clone(),
            amended_by_number: self.amended_by.clone(),
            revoked_by_number: self.revoked_by.clone(),
            source_url: self.source_url.clone(),
            pdf_path: file_name(&self.pdf),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let outdir = cli.outdir.clone().unwrap_or_else(|| settings.outdir.clone());
    fs::create_dir_all(&outdir).with_context(|| format!("Failed to create {:?}", outdir))?;
    let paths = OutputPaths::new(&outdir, &settings.db_name);

    let text = extract::extract_text(&cli.pdf)?;

    let regulation = cli.regulation();
    let clauses = parser::process_text(&text);
    let mut ids = ArticleIds::new();
    let articles = records::build_articles(&regulation, clauses, &mut ids);
    let regulations = vec![regulation];
    info!(articles = articles.len(), "segmented {:?}", cli.pdf);

    output::write_json(&paths.regulations, &regulations)?;
    output::write_json(&paths.articles, &articles)?;
    println!("{}", wrote_line(&paths.regulations, regulations.len()));
    println!("{}", wrote_line(&paths.articles, articles.len()));

    if cli.build_db {
        let stats = db::build_database(&paths.database, &regulations, &articles)?;
        println!("{}", built_line(&paths.database, stats.articles));
    }

    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}

fn wrote_line(path: &Path, count: usize) -> String {
    let unit = if count == 1 { "item" } else { "items" };
    format!("[✓] Wrote {} ({} {})", path.display(), count, unit)
}

fn built_line(path: &Path, articles: usize) -> String {
    format!("[✓] Built SQLite database: {} ({} articles)", path.display(), articles)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
