use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use studyreel::assembler::TimelineAssembler;
use studyreel::manifest::load_and_validate_job;
use studyreel::metadata::{generate_upload_metadata, thumbnail_brief};

#[derive(Debug, Parser)]
#[command(name = "studyreel")]
#[command(about = "Timeline compiler for bilingual study videos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compile a job manifest into a render plan.
    Plan {
        job: PathBuf,
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
        /// Seed for the bookend style variation.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Also write the upload metadata sidecar here.
        #[arg(long)]
        metadata: Option<PathBuf>,
    },
    /// Validate a job manifest without producing output.
    Check {
        job: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            job,
            output,
            seed,
            metadata,
        } => run_plan(&job, &output, seed, metadata.as_deref()),
        Commands::Check { job } => run_check(&job),
    }
}

fn run_check(job_path: &Path) -> Result<()> {
    let job = load_and_validate_job(job_path)?;

    // A rough runtime estimate for scheduling; the planner computes the
    // exact figure from measured clip durations.
    let narration: f64 = job
        .sentences
        .iter()
        .map(|sentence| {
            2.0 * sentence.source_clip.duration_seconds + sentence.target_clip.duration_seconds
        })
        .sum();
    let estimate = narration
        + job.sentences.len() as f64
            * (2.0 * job.config.audio_lead_gap_seconds
                + 3.0 * job.config.pause_after_audio_seconds
                + job.config.pause_before_repeat_seconds)
        + 2.0 * job.config.bookend_seconds;

    println!(
        "OK: {} ({} sentences, music: {}, ~{:.1}s)",
        job_path.display(),
        job.sentences.len(),
        if job.music.is_some() { "yes" } else { "no" },
        estimate
    );
    Ok(())
}

fn run_plan(
    job_path: &Path,
    output_path: &Path,
    seed: u64,
    metadata_path: Option<&Path>,
) -> Result<()> {
    let job = load_and_validate_job(job_path)?;

    let sentences = job.sentence_pairs();
    let clips = job.sentence_clips();
    let backgrounds = job.backgrounds();
    let music = job.music_asset();

    let assembler = TimelineAssembler::new(job.config.clone(), seed);
    let timeline = assembler
        .assemble(
            &sentences,
            &clips,
            &backgrounds,
            music.as_ref(),
            &job.title,
            &job.subtitle,
        )
        .with_context(|| format!("failed to assemble timeline for {}", job_path.display()))?;

    eprintln!(
        "assembled {} segments, {:.2}s total",
        timeline.segments.len(),
        timeline.total_seconds
    );

    let rendered =
        serde_json::to_string_pretty(&timeline).context("failed to serialize render plan")?;
    fs::write(output_path, rendered)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    if let Some(metadata_path) = metadata_path {
        let today = chrono::Local::now().date_naive();
        let metadata = generate_upload_metadata(&sentences, timeline.total_seconds, today);
        fs::write(metadata_path, metadata.to_sidecar_text())
            .with_context(|| format!("failed to write {}", metadata_path.display()))?;

        let brief = thumbnail_brief(&backgrounds, sentences.len());
        eprintln!(
            "metadata written; thumbnail brief: {} sentences, background {}",
            brief.sentence_count,
            brief
                .background
                .map(|asset| asset.path.display().to_string())
                .unwrap_or_else(|| "none".to_owned())
        );
    }

    println!("Wrote {}", output_path.display());
    Ok(())
}
