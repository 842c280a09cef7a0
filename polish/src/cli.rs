//! Command-line arguments and the non-interactive `diff` subcommand.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use polish_core::{ChangeKind, DiffOptions, DiffStrategy, Segment, SegmentStore};

#[derive(Parser, Debug)]
#[command(name = "polish")]
#[command(about = "Review AI-polished proposal text sentence by sentence", long_about = None)]
pub struct Args {
    /// SQLite database holding drafts and polish history
    #[arg(long, default_value = ".polish/drafts.db")]
    pub db: String,

    /// Draft id to open (default: the most recently updated draft)
    #[arg(long)]
    pub draft: Option<String>,

    /// Title for a new draft when none exists yet
    #[arg(long, default_value = "未命名提案")]
    pub title: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the segments between two text files and exit
    Diff {
        /// File with the original text
        original: PathBuf,
        /// File with the revised text
        revised: PathBuf,
        /// Use Myers diff instead of the lookahead diff
        #[arg(long)]
        myers: bool,
    },
}

/// Runs a non-interactive subcommand and returns its report, or `None` when
/// the interactive review should start. Writes nothing to disk.
pub fn run_subcommand(args: &Args, options: DiffOptions) -> std::io::Result<Option<String>> {
    match &args.command {
        Some(Commands::Diff { original, revised, myers }) => {
            run_diff(original, revised, *myers, options).map(Some)
        }
        None => Ok(None),
    }
}

/// Runs `polish diff` against the two files and returns the report.
pub fn run_diff(
    original: &Path,
    revised: &Path,
    myers: bool,
    mut options: DiffOptions,
) -> std::io::Result<String> {
    let original = std::fs::read_to_string(original)?;
    let revised = std::fs::read_to_string(revised)?;
    if myers {
        options.strategy = DiffStrategy::Myers;
    }
    let store = SegmentStore::new(original.trim_end(), revised.trim_end(), options);
    Ok(render_plain(&store))
}

/// Plain-text report: one block per segment, removed runs as `[-…-]` and
/// added runs as `{+…+}`, then the change count.
pub fn render_plain(store: &SegmentStore) -> String {
    let mut out = String::new();
    for (i, segment) in store.segments().iter().enumerate() {
        let state = if segment.has_changes { "~" } else { "=" };
        let _ = writeln!(out, "#{} {state} {}", i + 1, plain_diff(segment));
    }
    let _ = writeln!(out, "{} 处修改", store.change_count());
    out
}

fn plain_diff(segment: &Segment) -> String {
    segment
        .diff
        .iter()
        .map(|change| match change.kind {
            ChangeKind::Same => change.text.clone(),
            ChangeKind::Added => format!("{{+{}+}}", change.text),
            ChangeKind::Removed => format!("[-{}-]", change.text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn diff_subcommand_parses() {
        let args = Args::parse_from(["polish", "diff", "a.txt", "b.txt", "--myers"]);
        match args.command {
            Some(Commands::Diff { myers, .. }) => assert!(myers),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(args.db, ".polish/drafts.db");
    }

    #[test]
    fn plain_report_marks_runs() {
        let store = SegmentStore::new(
            "学校食堂饭菜太贵。宿舍很好。",
            "学校食堂饭菜价格偏高。宿舍很好。",
            DiffOptions::default(),
        );
        assert_eq!(
            render_plain(&store),
            "#1 ~ 学校食堂饭菜{+价格偏高+}[-太贵-]。\n#2 = 宿舍很好。\n1 处修改\n"
        );
    }

    #[test]
    fn run_diff_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "建议降价。\n").unwrap();
        std::fs::write(&b, "建议适当降价。\n").unwrap();

        let report = run_diff(&a, &b, true, DiffOptions::default()).unwrap();

        assert!(report.ends_with("1 处修改\n"));
        assert!(report.contains("{+"));
    }

    #[test]
    fn diff_subcommand_leaves_data_dir_alone() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "建议降价。").unwrap();
        std::fs::write(&b, "建议降价。").unwrap();
        let data_dir = dir.path().join("data");
        let db = data_dir.join("drafts.db");

        let args = Args::parse_from([
            OsStr::new("polish"),
            OsStr::new("--db"),
            db.as_os_str(),
            OsStr::new("diff"),
            a.as_os_str(),
            b.as_os_str(),
        ]);
        let report = run_subcommand(&args, DiffOptions::default()).unwrap();

        assert_eq!(report.as_deref(), Some("#1 = 建议降价。\n0 处修改\n"));
        assert!(!data_dir.exists());
    }

    #[test]
    fn no_subcommand_starts_review() {
        let args = Args::parse_from(["polish"]);
        assert_eq!(run_subcommand(&args, DiffOptions::default()).unwrap(), None);
    }
}
