use jarcheck_core::{Progress, Registry};

const BAR_WIDTH: usize = 30;

/// Text table of the registry; the active record is marked with `>`.
pub fn render_table(registry: &Registry) -> String {
    let records = registry.records();
    let name_w = records
        .iter()
        .map(|r| r.artifact_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("File Name".len());

    let mut out = format!("  {:<name_w$}  {:<7}  Notes\n", "File Name", "Status");
    for (i, r) in records.iter().enumerate() {
        let marker = if registry.current() == Some(i) { '>' } else { ' ' };
        out.push_str(&format!("{marker} {:<name_w$}  {:<7}  {}\n", r.artifact_name, r.status.as_str(), r.notes));
    }
    out
}

pub fn render_progress(progress: &Progress) -> String {
    let filled = BAR_WIDTH * progress.percent as usize / 100;
    format!(
        "Progress: {}% [{}{}] {}/{}",
        progress.percent,
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress.resolved,
        progress.total
    )
}
