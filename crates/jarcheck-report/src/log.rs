use jarcheck_core::TestRecord;

/// `<file_name> - <status> - <notes>`
pub fn format_log_line(record: &TestRecord) -> String {
    format!("{} - {} - {}", record.artifact_name, record.status, record.notes)
}

pub fn render_log(records: &[TestRecord]) -> String {
    let mut out = String::new();
    for r in records {
        out.push_str(&format_log_line(r));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jarcheck_core::TestStatus;

    #[test]
    fn one_line_per_record() {
        let records = vec![
            TestRecord { artifact_name: "x.jar".into(), status: TestStatus::Fail, notes: "crashed".into() },
            TestRecord::pending("y.jar"),
        ];
        assert_eq!(render_log(&records), "x.jar - Fail - crashed\ny.jar - Pending - \n");
    }

    #[test]
    fn empty_registry_renders_empty_log() {
        assert_eq!(render_log(&[]), "");
    }
}
