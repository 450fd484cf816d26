//! Commit planning: ordering, bin-packing, and message synthesis.
//!
//! The classified file queue is ordered by category, sliced into chunks
//! that never span a category boundary, and assigned to `(day, index)`
//! slots in row-major order. The resulting plan partitions the full file
//! set: no file appears in two commits and no file is dropped.

use std::collections::HashSet;

use chrono::Utc;

use crate::classify::Category;
use crate::config::RunConfig;
use crate::error::PlanError;
use crate::source::SourceFile;

use super::{Day, Plan, PlanSettings, PlannedCommit};

/// Build a plan from classified files.
///
/// Chunk size is `max_files_per_commit` when supplied, otherwise the queue
/// is balanced across all `total_days x commits_per_day` slots. If the
/// chunks outnumber the slots, the final slot absorbs every remaining file;
/// a plan must never drop a file silently. Trailing empty slots and days
/// are omitted.
pub fn build_plan(
    files: &[(SourceFile, Category)],
    config: &RunConfig,
) -> Result<Plan, PlanError> {
    if config.total_days == 0 || config.commits_per_day == 0 {
        return Err(PlanError::EmptySchedule);
    }
    if files.is_empty() {
        return Err(PlanError::NoFiles);
    }

    let slots = config.total_days as usize * config.commits_per_day as usize;
    let chunk_size = config
        .max_files_per_commit
        .unwrap_or_else(|| files.len().div_ceil(slots))
        .max(1);

    // Order the queue by category, stable within each category, then slice
    // into chunks that stop at category boundaries.
    let mut chunks: Vec<Vec<&(SourceFile, Category)>> = Vec::new();
    for category in Category::PLAN_ORDER {
        let in_category: Vec<&(SourceFile, Category)> =
            files.iter().filter(|(_, c)| *c == category).collect();
        for chunk in in_category.chunks(chunk_size) {
            chunks.push(chunk.to_vec());
        }
    }

    // More chunks than slots: the final slot absorbs all remaining files.
    if chunks.len() > slots {
        let overflow: Vec<&(SourceFile, Category)> =
            chunks.split_off(slots).into_iter().flatten().collect();
        if let Some(last) = chunks.last_mut() {
            last.extend(overflow);
        }
    }

    let mut days: Vec<Day> = Vec::new();
    for (slot, chunk) in chunks.iter().enumerate() {
        let day_number = (slot / config.commits_per_day as usize) as u32 + 1;
        let index = (slot % config.commits_per_day as usize) as u32 + 1;

        if days.last().map(|d| d.day) != Some(day_number) {
            days.push(Day {
                day: day_number,
                summary: String::new(),
                commits: Vec::new(),
            });
        }

        let (first_file, category) = chunk[0];
        let scope = derive_scope(first_file);
        let commit = PlannedCommit {
            id: format!("d{day_number}-c{index}"),
            commit_type: category.commit_type(),
            scope,
            message: describe(*category).to_string(),
            files: chunk.iter().map(|(f, _)| f.path.clone()).collect(),
            category: *category,
            why: rationale(*category).to_string(),
        };

        // days.last_mut() is always present after the push above.
        if let Some(day) = days.last_mut() {
            day.commits.push(commit);
        }
    }

    for day in &mut days {
        day.summary = summarize_day(day);
    }

    Ok(Plan {
        project_id: config.project_id(),
        created_at: Utc::now(),
        total_days: config.total_days,
        commits_per_day: config.commits_per_day,
        settings: PlanSettings {
            source_dir: config.source.clone(),
            max_files_per_commit: config.max_files_per_commit,
            daily_run_hours: config.daily_run_hours,
            confirm_mode: config.confirm_mode,
            review_mode: config.review_mode,
            author: config.author.clone(),
        },
        days,
        approved: false,
    })
}

/// Scope is the basename of the first file's directory, if any.
fn derive_scope(file: &SourceFile) -> Option<String> {
    file.rel
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
}

fn describe(category: Category) -> &'static str {
    match category {
        Category::Scaffold => "add project scaffolding",
        Category::Build => "set up build tooling",
        Category::Skeleton => "add application entry points",
        Category::Feature => "implement core functionality",
        Category::Test => "add test coverage",
        Category::Docs => "write documentation",
        Category::Asset => "add static assets",
    }
}

fn rationale(category: Category) -> &'static str {
    match category {
        Category::Scaffold => "repository hygiene comes before any code",
        Category::Build => "the project must build at every commit boundary",
        Category::Skeleton => "entry points anchor the module layout",
        Category::Feature => "feature work lands on the skeleton it hangs off",
        Category::Test => "tests follow the features they cover",
        Category::Docs => "docs describe what already exists",
        Category::Asset => "assets support the shipped features",
    }
}

fn summarize_day(day: &Day) -> String {
    let mut categories: Vec<&str> = Vec::new();
    for commit in &day.commits {
        let name = commit.category.as_str();
        if !categories.contains(&name) {
            categories.push(name);
        }
    }
    let commit_word = if day.commits.len() == 1 { "commit" } else { "commits" };
    format!(
        "{} {} ({})",
        day.commits.len(),
        commit_word,
        categories.join(", ")
    )
}

/// Check that a plan partitions the given file set.
///
/// Returns an error message on the first violation: a planned file not in
/// the set, a file appearing in two commits, or a file dropped from the
/// plan. Returns `None` when the plan is a valid partition.
pub fn validate_partition(plan: &Plan, files: &[(SourceFile, Category)]) -> Option<String> {
    let all: HashSet<&std::path::Path> = files.iter().map(|(f, _)| f.path.as_path()).collect();
    let mut seen: HashSet<&std::path::Path> = HashSet::new();

    for commit in plan.iter_commits() {
        for file in &commit.files {
            if !all.contains(file.as_path()) {
                return Some(format!("Unknown file in {}: {}", commit.id, file.display()));
            }
            if !seen.insert(file.as_path()) {
                return Some(format!("Duplicate file across commits: {}", file.display()));
            }
        }
    }

    for (file, _) in files {
        if !seen.contains(file.path.as_path()) {
            return Some(format!("File not assigned to any commit: {}", file.path.display()));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::config::{ConfirmMode, ReviewMode};

    fn config(days: u32, per_day: u32, max_files: Option<usize>) -> RunConfig {
        RunConfig {
            source: PathBuf::from("/snapshot/demo"),
            target: PathBuf::from("/repo/demo"),
            total_days: days,
            commits_per_day: per_day,
            max_files_per_commit: max_files,
            ignore_patterns: Vec::new(),
            daily_run_hours: 8.0,
            confirm_mode: ConfirmMode::Auto,
            review_mode: ReviewMode::Skip,
            author: None,
            plan_only: false,
            verbose: false,
        }
    }

    fn file(rel: &str, category: Category) -> (SourceFile, Category) {
        (
            SourceFile {
                path: PathBuf::from("/snapshot/demo").join(rel),
                rel: PathBuf::from(rel),
            },
            category,
        )
    }

    #[test]
    fn test_scenario_two_days_two_commits() {
        // 7 files (2 scaffold, 1 build, 4 feature) with max 2 per commit
        // into 2 days x 2 commits.
        let files = vec![
            file("src/engine.rs", Category::Feature),
            file("src/codec.rs", Category::Feature),
            file(".gitignore", Category::Scaffold),
            file("LICENSE", Category::Scaffold),
            file("Cargo.toml", Category::Build),
            file("src/store.rs", Category::Feature),
            file("src/wire.rs", Category::Feature),
        ];
        let plan = build_plan(&files, &config(2, 2, Some(2))).unwrap();

        let commits: Vec<_> = plan.iter_commits().collect();
        assert_eq!(commits.len(), 4);
        assert_eq!(commits[0].id, "d1-c1");
        assert_eq!(commits[0].category, Category::Scaffold);
        assert_eq!(commits[0].commit_type.as_str(), "chore");
        assert_eq!(commits[0].files.len(), 2);
        assert_eq!(commits[1].id, "d1-c2");
        assert_eq!(commits[1].category, Category::Build);
        assert_eq!(commits[1].files.len(), 1);
        assert_eq!(commits[2].id, "d2-c1");
        assert_eq!(commits[2].commit_type.as_str(), "feat");
        assert_eq!(commits[2].files.len(), 2);
        assert_eq!(commits[3].id, "d2-c2");
        assert_eq!(commits[3].files.len(), 2);

        assert_eq!(validate_partition(&plan, &files), None);
    }

    #[test]
    fn test_partition_property() {
        let files: Vec<_> = (0..23)
            .map(|i| {
                let category = match i % 4 {
                    0 => Category::Feature,
                    1 => Category::Test,
                    2 => Category::Docs,
                    _ => Category::Asset,
                };
                file(&format!("src/mod_{i}.rs"), category)
            })
            .collect();

        let plan = build_plan(&files, &config(3, 2, None)).unwrap();
        assert_eq!(validate_partition(&plan, &files), None);
        let planned: usize = plan.iter_commits().map(|c| c.files.len()).sum();
        assert_eq!(planned, files.len());
    }

    #[test]
    fn test_order_property() {
        let files = vec![
            file("src/util.rs", Category::Feature),
            file("docs/guide.html", Category::Docs),
            file(".gitignore", Category::Scaffold),
            file("tests/util_test.rs", Category::Test),
            file("Cargo.toml", Category::Build),
            file("src/main.rs", Category::Skeleton),
            file("assets/logo.png", Category::Asset),
        ];
        let plan = build_plan(&files, &config(7, 1, Some(1))).unwrap();

        let order: Vec<Category> = plan.iter_commits().map(|c| c.category).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted, "plan order must follow category order");
        assert_eq!(order[0], Category::Scaffold);
        assert_eq!(order[6], Category::Asset);
    }

    #[test]
    fn test_final_slot_absorbs_overflow() {
        // 10 feature files, 2 slots, max 2 per commit: 5 chunks collapse to
        // 2 with the final slot absorbing the remaining 8 files.
        let files: Vec<_> = (0..10)
            .map(|i| file(&format!("src/f{i}.rs"), Category::Feature))
            .collect();
        let plan = build_plan(&files, &config(1, 2, Some(2))).unwrap();

        let commits: Vec<_> = plan.iter_commits().collect();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].files.len(), 2);
        assert_eq!(commits[1].files.len(), 8);
        assert_eq!(validate_partition(&plan, &files), None);
    }

    #[test]
    fn test_trailing_days_omitted() {
        let files = vec![
            file(".gitignore", Category::Scaffold),
            file("src/lib.rs", Category::Feature),
        ];
        let plan = build_plan(&files, &config(5, 3, Some(1))).unwrap();

        assert_eq!(plan.days.len(), 1);
        assert_eq!(plan.days[0].commits.len(), 2);
        assert_eq!(plan.total_commits(), 2);
    }

    #[test]
    fn test_balanced_chunk_size_when_no_max() {
        // 12 feature files across 2x2 slots: ceil(12/4) = 3 per commit.
        let files: Vec<_> = (0..12)
            .map(|i| file(&format!("src/f{i}.rs"), Category::Feature))
            .collect();
        let plan = build_plan(&files, &config(2, 2, None)).unwrap();

        let sizes: Vec<usize> = plan.iter_commits().map(|c| c.files.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_scope_from_first_file_directory() {
        let files = vec![file("src/parser/lexer.rs", Category::Feature)];
        let plan = build_plan(&files, &config(1, 1, None)).unwrap();
        let commit = plan.iter_commits().next().unwrap();
        assert_eq!(commit.scope.as_deref(), Some("parser"));
        assert_eq!(commit.full_message(), "feat(parser): implement core functionality");
    }

    #[test]
    fn test_root_file_has_no_scope() {
        let files = vec![file("LICENSE", Category::Scaffold)];
        let plan = build_plan(&files, &config(1, 1, None)).unwrap();
        let commit = plan.iter_commits().next().unwrap();
        assert_eq!(commit.scope, None);
        assert_eq!(commit.full_message(), "chore: add project scaffolding");
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            build_plan(&[], &config(2, 2, None)),
            Err(PlanError::NoFiles)
        ));
        let files = vec![file("src/lib.rs", Category::Feature)];
        assert!(matches!(
            build_plan(&files, &config(0, 2, None)),
            Err(PlanError::EmptySchedule)
        ));
    }

    #[test]
    fn test_validate_partition_detects_duplicates() {
        let files = vec![file("src/a.rs", Category::Feature)];
        let mut plan = build_plan(&files, &config(1, 1, None)).unwrap();
        let duplicate = plan.days[0].commits[0].clone();
        plan.days[0].commits.push(duplicate);
        assert!(validate_partition(&plan, &files)
            .unwrap()
            .contains("Duplicate"));
    }
}
