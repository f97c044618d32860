//! CLI wrapper over the reconciliation pipeline.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use qbank::config::ReconcilerConfig;
use qbank::reconciler::Reconciler;

#[derive(Debug, Parser)]
#[command(
    name = "reconcile",
    disable_help_subcommand = true,
    about = "Reconcile question-bank datasets across export generations",
    long_about = "Extract question IDs from text dumps and CSV exports, merge them by \
                  tier priority, diff the generations, and write merged CSV/JSON \
                  artifacts plus reports.",
    after_help = "Inputs are optional; an absent input loads as an empty source so \
                  partial reconciliation runs still work."
)]
struct ReconcileCli {
    #[arg(
        long = "base-dump-root",
        value_name = "PATH",
        help = "Directory of raw baseline text dumps"
    )]
    base_dump_root: Option<PathBuf>,
    #[arg(
        long = "web-display-file",
        value_name = "PATH",
        help = "Curated web-display generation text file"
    )]
    web_display_file: Option<PathBuf>,
    #[arg(
        long = "notion-csv",
        value_name = "PATH",
        help = "Hosted-database CSV export (highest-priority tier)"
    )]
    notion_csv: Option<PathBuf>,
    #[arg(
        long = "restore-csv",
        value_name = "PATH",
        help = "Backfill/restore CSV export (middle tier)"
    )]
    restore_csv: Option<PathBuf>,
    #[arg(
        long = "output-dir",
        value_name = "PATH",
        default_value = "reconciled",
        help = "Directory artifacts are written into"
    )]
    output_dir: PathBuf,
    #[arg(
        long = "expected-per-year",
        value_name = "COUNT",
        help = "Expected question count per exam year (omit to disable the finding)"
    )]
    expected_per_year: Option<usize>,
    #[arg(
        long = "id-column-token",
        value_name = "TOKEN",
        help = "Header token identifying the question-ID column in CSV exports"
    )]
    id_column_token: Option<String>,
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = ReconcileCli::parse();
    let mut config = ReconcilerConfig::new(cli.output_dir)
        .with_expected_per_year(cli.expected_per_year);
    if let Some(root) = cli.base_dump_root {
        config = config.with_base_dump_root(root);
    }
    if let Some(path) = cli.web_display_file {
        config = config.with_web_display_file(path);
    }
    if let Some(path) = cli.notion_csv {
        config = config.with_notion_csv(path);
    }
    if let Some(path) = cli.restore_csv {
        config = config.with_restore_csv(path);
    }
    if let Some(token) = cli.id_column_token {
        config = config.with_id_column_token(token);
    }

    match Reconciler::new(config).run_and_export() {
        Ok((outcome, paths)) => {
            print!("{}", outcome.report.render_markdown());
            eprintln!("artifacts written under {}", paths.merged_csv.parent().map(|p| p.display().to_string()).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("reconciliation failed: {err}");
            ExitCode::FAILURE
        }
    }
}
