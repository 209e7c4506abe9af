use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::schema::JobManifest;

/// Read, parse, and validate a job manifest. Asset paths are resolved
/// relative to the manifest's directory and must exist on disk; the
/// collaborators that produced them ran before the planner does.
pub fn load_and_validate_job(path: &Path) -> Result<JobManifest> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read job manifest {}", path.display()))?;
    let mut job: JobManifest = serde_yaml::from_str(&contents).map_err(|error| {
        let location = error
            .location()
            .map(|location| format!("line {}, column {}", location.line(), location.column()))
            .unwrap_or_else(|| "unknown location".to_owned());
        anyhow!(
            "failed to parse yaml in {} at {}: {}",
            path.display(),
            location,
            error
        )
    })?;

    validate_job(&mut job, path)?;
    Ok(job)
}

fn validate_job(job: &mut JobManifest, manifest_path: &Path) -> Result<()> {
    job.config
        .validate()
        .with_context(|| format!("invalid config in {}", manifest_path.display()))?;

    let manifest_dir = manifest_path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    for (index, sentence) in job.sentences.iter_mut().enumerate() {
        sentence
            .source_clip
            .validate(&format!("sentence {index} source_clip"))?;
        sentence
            .target_clip
            .validate(&format!("sentence {index} target_clip"))?;

        sentence.source_clip.path = resolve_and_validate_asset_path(
            &manifest_dir,
            &sentence.source_clip.path,
            &format!("sentence {index} source_clip"),
        )?;
        sentence.target_clip.path = resolve_and_validate_asset_path(
            &manifest_dir,
            &sentence.target_clip.path,
            &format!("sentence {index} target_clip"),
        )?;

        if sentence.background.as_os_str().is_empty() {
            bail!("sentence {index} background path cannot be empty");
        }
        sentence.background = resolve_and_validate_asset_path(
            &manifest_dir,
            &sentence.background,
            &format!("sentence {index} background"),
        )?;
    }

    if let Some(music) = &mut job.music {
        music.validate("music")?;
        music.path = resolve_and_validate_asset_path(&manifest_dir, &music.path, "music")?;
    }

    Ok(())
}

fn resolve_and_validate_asset_path(
    manifest_dir: &Path,
    source_path: &Path,
    label: &str,
) -> Result<PathBuf> {
    let resolved = if source_path.is_absolute() {
        source_path.to_path_buf()
    } else {
        manifest_dir.join(source_path)
    };

    if !resolved.exists() {
        bail!("{label} does not exist: {}", resolved.display());
    }
    if !resolved.is_file() {
        bail!("{label} is not a file: {}", resolved.display());
    }

    Ok(resolved)
}
