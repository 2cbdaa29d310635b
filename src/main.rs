//! topicseg CLI - Embedding-based Topic Segmentation
//!
//! Command-line interface for segmenting embedded corpora and scoring the
//! predictions against gold annotations.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use log::{error, info};
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use topicseg::{
    Config, CorpusEvaluator, DocumentEmbeddings, EmbeddingSegmenter, EvaluationDocument,
    MergePolicy, Provenance, Result, Segment, SegmentCount, TopicSegError, WindowPolicy,
};

#[derive(Parser)]
#[command(name = "topicseg")]
#[command(author = "topicseg Contributors")]
#[command(version)]
#[command(about = "Embedding-based topic segmentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment every document of an embedded corpus
    Segment {
        /// Corpus file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Configuration file (JSON); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Produce exactly this many segments per document
        #[arg(short, long)]
        segments: Option<usize>,

        /// Print the segments as JSON
        #[arg(long)]
        json: bool,

        /// Show the deviation series of every document
        #[arg(long)]
        debug: bool,
    },

    /// Segment a corpus and score it against its gold segments
    Evaluate {
        /// Corpus file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Configuration file (JSON); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Window size policy for Pk and WindowDiff
        #[arg(short, long, value_enum)]
        window: Option<WindowArg>,

        /// Fixed window size, used with `--window fixed`
        #[arg(short = 'k', long)]
        window_size: Option<usize>,

        /// Merge adjacent segments that share a label
        #[arg(long)]
        merge_same_label: bool,

        /// Use the gold segment count of each document
        #[arg(long)]
        oracle: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum WindowArg {
    Corpus,
    Document,
    Fixed,
}

/// Corpus file layout.
#[derive(Debug, Deserialize)]
struct CorpusFile {
    /// Class names of the `class_scores` columns.
    #[serde(default)]
    labels: Vec<String>,
    documents: Vec<DocumentRecord>,
}

#[derive(Debug, Deserialize)]
struct DocumentRecord {
    id: String,
    embeddings: Vec<Vec<f64>>,
    #[serde(default)]
    backward: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    segments: Vec<SegmentRecord>,
    #[serde(default)]
    class_scores: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SegmentRecord {
    begin: usize,
    end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

#[derive(Debug, Serialize)]
struct SegmentedDocument<'a> {
    id: &'a str,
    segments: Vec<SegmentRecord>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Segment {
            input,
            config,
            segments,
            json,
            debug,
        } => segment_corpus(input, config, segments, json, debug),

        Commands::Evaluate {
            input,
            config,
            window,
            window_size,
            merge_same_label,
            oracle,
            json,
        } => evaluate_corpus(
            input,
            config,
            window,
            window_size,
            merge_same_label,
            oracle,
            json,
        ),

        Commands::Config => show_config(),
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(&path),
        None => Ok(Config::default()),
    }
}

fn load_corpus(path: &Path) -> Result<CorpusFile> {
    if !path.exists() {
        return Err(TopicSegError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let corpus: CorpusFile = serde_json::from_str(&content)?;
    if corpus.documents.is_empty() {
        return Err(TopicSegError::EmptyInput(format!(
            "{} contains no documents",
            path.display()
        )));
    }
    info!("Loaded {} documents from {}", corpus.documents.len(), path.display());
    Ok(corpus)
}

/// Builds a matrix from JSON rows. An empty row list yields a `0 x 0` matrix.
fn to_matrix(rows: &[Vec<f64>], what: &str, id: &str) -> Result<Array2<f64>> {
    let cols = rows.first().map_or(0, |r| r.len());
    if let Some(row) = rows.iter().find(|r| r.len() != cols) {
        return Err(TopicSegError::InvalidParameter(format!(
            "ragged {} in document {}: expected {} columns, got {}",
            what,
            id,
            cols,
            row.len()
        )));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), cols), flat)
        .map_err(|e| TopicSegError::InvalidParameter(format!("{} of {}: {}", what, id, e)))
}

fn to_document(record: &DocumentRecord) -> Result<EvaluationDocument> {
    let forward = to_matrix(&record.embeddings, "embeddings", &record.id)?;
    let embeddings = match &record.backward {
        Some(rows) => {
            let backward = to_matrix(rows, "backward embeddings", &record.id)?;
            DocumentEmbeddings::bidirectional(forward, backward)?
        }
        None => DocumentEmbeddings::new(forward),
    };
    let class_scores = record
        .class_scores
        .as_deref()
        .map(|rows| to_matrix(rows, "class scores", &record.id))
        .transpose()?;
    let gold = record
        .segments
        .iter()
        .map(|s| Segment {
            label: s.label.clone(),
            ..Segment::new(s.begin, s.end, Provenance::Gold)
        })
        .collect();

    Ok(EvaluationDocument {
        id: record.id.clone(),
        embeddings,
        gold,
        class_scores,
    })
}

/// Gold segment count handed to the segmenter. A non-empty document without
/// gold segments has none, so an oracle request fails instead of collapsing
/// to a single segment.
fn gold_count(doc: &EvaluationDocument) -> Option<usize> {
    if doc.gold.is_empty() && doc.sentence_count() > 0 {
        None
    } else {
        Some(doc.gold.len())
    }
}

fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
        .map(|s| s.progress_chars("█▓▒░  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message);
    pb
}

fn segment_corpus(
    input: PathBuf,
    config_path: Option<PathBuf>,
    segments: Option<usize>,
    json: bool,
    debug: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let mut config = load_config(config_path)?;
    if let Some(n) = segments {
        config.segmenter.segment_count = SegmentCount::Fixed(n);
    }
    config.validate()?;

    let corpus = load_corpus(&input)?;
    let documents: Vec<EvaluationDocument> =
        corpus.documents.iter().map(to_document).collect::<Result<_>>()?;

    let segmenter = EmbeddingSegmenter::with_config(config.segmenter)?;
    let pb = progress_bar(documents.len(), "Segmenting documents (parallel)...");
    let results = documents
        .par_iter()
        .map(|doc| {
            let result = segmenter.segment(&doc.embeddings, gold_count(doc));
            pb.inc(1);
            result
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_and_clear();

    if json {
        let output: Vec<SegmentedDocument<'_>> = documents
            .iter()
            .zip(results.iter())
            .map(|(doc, result)| SegmentedDocument {
                id: &doc.id,
                segments: result
                    .segments
                    .iter()
                    .map(|s| SegmentRecord {
                        begin: s.begin,
                        end: s.end,
                        label: s.label.clone(),
                    })
                    .collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (doc, result) in documents.iter().zip(results.iter()) {
        println!("{} ({} sentences)", doc.id, doc.embeddings.sentence_count());
        if debug {
            for (t, &d) in result.deviation.iter().enumerate() {
                let marker = if result.edges.is_boundary(t) { " <-- BOUNDARY" } else { "" };
                println!("    {:>4}: {:.4}{}", t, d, marker);
            }
        }
        for segment in &result.segments {
            println!("  [{}, {})", segment.begin, segment.end);
        }
    }

    println!();
    println!(
        "✓ Segmented {} documents in {}",
        documents.len(),
        HumanDuration(start_time.elapsed())
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn evaluate_corpus(
    input: PathBuf,
    config_path: Option<PathBuf>,
    window: Option<WindowArg>,
    window_size: Option<usize>,
    merge_same_label: bool,
    oracle: bool,
    json: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let mut config = load_config(config_path)?;

    match window {
        Some(WindowArg::Corpus) => config.evaluation.window = WindowPolicy::CorpusFixed,
        Some(WindowArg::Document) => config.evaluation.window = WindowPolicy::PerDocument,
        Some(WindowArg::Fixed) => {
            let k = window_size.ok_or_else(|| {
                TopicSegError::InvalidParameter("--window fixed needs --window-size".to_string())
            })?;
            config.evaluation.window = WindowPolicy::Fixed(k);
        }
        None => {
            if let Some(k) = window_size {
                config.evaluation.window = WindowPolicy::Fixed(k);
            }
        }
    }
    if merge_same_label {
        config.evaluation.merge = MergePolicy::MergeSameLabel;
    }
    if oracle {
        config.segmenter.segment_count = SegmentCount::Oracle;
    }

    let corpus = load_corpus(&input)?;
    let documents: Vec<EvaluationDocument> =
        corpus.documents.iter().map(to_document).collect::<Result<_>>()?;

    let evaluator = CorpusEvaluator::new(config, corpus.labels)?;
    let pb = progress_bar(documents.len(), "Evaluating documents (parallel)...");
    let result = evaluator.evaluate_with_progress(&documents, || pb.inc(1))?;
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
    } else {
        print!("{}", result.report);
        println!();
        println!(
            "✓ Evaluated {} documents in {}",
            documents.len(),
            HumanDuration(start_time.elapsed())
        );
    }
    Ok(())
}

fn show_config() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&Config::default())?);
    Ok(())
}
