//! Single-file skill distribution builder.
//!
//! Each skill lives in its own directory of markdown fragments with a
//! `SKILL.md` entry point. Building concatenates the fragments in a fixed
//! order, prepends a generated header and table of contents, and writes
//! one file per skill to the dist directory — plus a combined all-skills
//! file when more than one skill exists.

mod toc;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use tracing::{debug, info, instrument};

use skillpress_shared::{BundleConfig, Result, SkillPressError};

pub use toc::{extract_toc_headings, generate_toc, is_real_section_heading};

/// File name for the combined all-skills distribution.
const COMBINED_FILE: &str = "all-skills.md";

/// A built skill distribution.
#[derive(Debug, Clone)]
pub struct BuiltSkill {
    /// Skill name (directory name).
    pub name: String,
    /// Path of the written dist file.
    pub path: PathBuf,
    /// Line count of the built file.
    pub lines: usize,
    /// Size of the built file in bytes.
    pub size_bytes: usize,
}

/// Result of a full bundle run.
#[derive(Debug, Clone, Default)]
pub struct BundleReport {
    /// Skills built, in directory order.
    pub skills: Vec<BuiltSkill>,
    /// Path of the combined file, when two or more skills were built.
    pub combined: Option<PathBuf>,
}

static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\s*\n.*?\n---\s*\n").expect("frontmatter regex"));

/// Remove a leading YAML frontmatter block from markdown content.
pub fn strip_frontmatter(content: &str) -> &str {
    match FRONTMATTER_RE.find(content) {
        Some(m) => &content[m.end()..],
        None => content,
    }
}

// ---------------------------------------------------------------------------
// Bundle building
// ---------------------------------------------------------------------------

/// Build every skill under the configured skills directory.
///
/// Cleans the dist directory, builds each skill directory containing a
/// `SKILL.md` (in sorted order), and writes the combined file when more
/// than one skill exists.
#[instrument(skip_all, fields(skills_dir = %config.skills_dir))]
pub fn build_all(config: &BundleConfig) -> Result<BundleReport> {
    let skills_dir = Path::new(&config.skills_dir);
    let dist_dir = Path::new(&config.dist_dir);

    clean_dist(dist_dir)?;

    let mut skill_dirs: Vec<PathBuf> = std::fs::read_dir(skills_dir)
        .map_err(|e| SkillPressError::io(skills_dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir() && p.join("SKILL.md").exists())
        .collect();
    skill_dirs.sort();

    let mut built: Vec<(BuiltSkill, String)> = Vec::new();
    for dir in &skill_dirs {
        built.push(build_skill(dir, config)?);
    }

    let combined = build_combined(&built, config)?;

    info!(
        skills = built.len(),
        combined = combined.is_some(),
        "bundle complete"
    );

    Ok(BundleReport {
        skills: built.into_iter().map(|(b, _)| b).collect(),
        combined,
    })
}

/// Build a single skill directory into one markdown file.
///
/// Returns the built metadata and the full file content (used again for
/// the combined build).
#[instrument(skip(config), fields(skill_dir = %skill_dir.display()))]
pub fn build_skill(skill_dir: &Path, config: &BundleConfig) -> Result<(BuiltSkill, String)> {
    let skill_name = skill_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            SkillPressError::Bundle(format!(
                "invalid skill directory name: {}",
                skill_dir.display()
            ))
        })?
        .to_string();

    // Collect content from all files
    let mut parts: Vec<String> = Vec::new();
    for md_file in ordered_files(skill_dir, &config.file_order)? {
        let content =
            std::fs::read_to_string(&md_file).map_err(|e| SkillPressError::io(&md_file, e))?;

        if md_file.file_name().is_some_and(|n| n == "SKILL.md") {
            parts.push(strip_frontmatter(&content).to_string());
        } else {
            // Separator between sections
            parts.push("\n---\n".to_string());
            parts.push(content);
        }
    }
    let body = parts.join("\n");

    let headings = toc::extract_toc_headings(&body, &config.heading_denylist);
    let toc_block = toc::generate_toc(&headings);

    let header = file_header(&skill_name, &config.repo_url);
    let combined = format!("{header}{toc_block}\n{body}");

    let output_file = Path::new(&config.dist_dir).join(format!("{skill_name}.md"));
    std::fs::write(&output_file, &combined)
        .map_err(|e| SkillPressError::io(&output_file, e))?;

    let built = BuiltSkill {
        name: skill_name,
        path: output_file,
        lines: combined.lines().count(),
        size_bytes: combined.len(),
    };
    debug!(skill = %built.name, lines = built.lines, bytes = built.size_bytes, "skill built");

    Ok((built, combined))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Remove stale files from the dist directory and ensure it exists.
fn clean_dist(dist_dir: &Path) -> Result<()> {
    if dist_dir.exists() {
        for entry in std::fs::read_dir(dist_dir).map_err(|e| SkillPressError::io(dist_dir, e))? {
            let path = entry.map_err(|e| SkillPressError::io(dist_dir, e))?.path();
            if path.is_file() {
                std::fs::remove_file(&path).map_err(|e| SkillPressError::io(&path, e))?;
            }
        }
    }
    std::fs::create_dir_all(dist_dir).map_err(|e| SkillPressError::io(dist_dir, e))
}

/// Collect a skill directory's markdown files in bundle order:
/// `SKILL.md` first, then the configured order, then the rest alphabetically.
fn ordered_files(skill_dir: &Path, file_order: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let skill_md = skill_dir.join("SKILL.md");
    if skill_md.exists() {
        files.push(skill_md);
    }

    for name in file_order {
        let f = skill_dir.join(name);
        if f.exists() && !files.contains(&f) {
            files.push(f);
        }
    }

    let mut remaining: Vec<PathBuf> = std::fs::read_dir(skill_dir)
        .map_err(|e| SkillPressError::io(skill_dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "md") && !files.contains(p))
        .collect();
    remaining.sort();
    files.extend(remaining);

    Ok(files)
}

/// Generated-file header comment with provenance and install hints.
fn file_header(skill_name: &str, repo_url: &str) -> String {
    let today = Utc::now().format("%Y-%m-%d");
    format!(
        "<!--
  Skill: {skill_name}
  Generated: {today}
  Source: {repo_url}

  Install (per-project):
    curl -fsSL {repo_url}/raw/main/dist/{skill_name}.md -o <FILE>

  Per-project locations:
    Claude Code: CLAUDE.md
    OpenCode:    AGENTS.md
    Cursor:      .cursor/rules/{skill_name}.mdc
-->

"
    )
}

/// Build the combined all-skills file. Only emitted for two or more skills.
fn build_combined(
    skills: &[(BuiltSkill, String)],
    config: &BundleConfig,
) -> Result<Option<PathBuf>> {
    if skills.len() <= 1 {
        return Ok(None);
    }

    let names: Vec<&str> = skills.iter().map(|(b, _)| b.name.as_str()).collect();
    let today = Utc::now().format("%Y-%m-%d");

    let mut parts = vec![format!(
        "<!--
  Skills (All)
  Generated: {today}
  Source: {}

  Contains: {}
-->

# Skills

All skills, combined into one file.
",
        config.repo_url,
        names.join(", ")
    )];

    for (built, content) in skills {
        parts.push(format!("\n---\n\n# Skill: {}\n\n", built.name));
        parts.push(strip_header_comment(content).to_string());
    }

    let combined = parts.concat();
    let output_file = Path::new(&config.dist_dir).join(COMBINED_FILE);
    std::fs::write(&output_file, &combined)
        .map_err(|e| SkillPressError::io(&output_file, e))?;

    debug!(path = %output_file.display(), "combined file written");
    Ok(Some(output_file))
}

/// Strip the leading generated-header comment from a built skill file.
fn strip_header_comment(content: &str) -> &str {
    if content.starts_with("<!--") {
        if let Some(end) = content.find("-->") {
            return content[end + 3..].trim_start();
        }
    }
    content
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
