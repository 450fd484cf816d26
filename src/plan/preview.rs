//! Human-readable plan preview.

use super::Plan;

/// Render the flat day/commit/message listing shown during review and
/// written next to the plan document. Regenerated whenever the plan is
/// (re)written.
pub fn render_preview(plan: &Plan) -> String {
    let mut out = format!(
        "Plan for {}: {} commits across {} days\n",
        plan.project_id,
        plan.total_commits(),
        plan.days.len()
    );

    for day in &plan.days {
        out.push_str(&format!("\nDay {}: {}\n", day.day, day.summary));
        for commit in &day.commits {
            let file_word = if commit.files.len() == 1 { "file" } else { "files" };
            out.push_str(&format!(
                "  {}  {}  [{} {}]\n",
                commit.id,
                commit.full_message(),
                commit.files.len(),
                file_word
            ));
        }
    }

    out
}
