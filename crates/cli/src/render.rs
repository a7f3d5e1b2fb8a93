//! Plain-text rendering of instance reports.

use diagsync_engine::InstanceReport;
use diagsync_model::BitStatus;
use std::fmt::Write;

/// One line per instance; non-OK (bit, language) rows indented below it.
pub fn render_reports(reports: &[InstanceReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(
            out,
            "{}  ({})  {}",
            report.name,
            report.data_type,
            report.status.as_str()
        );
        for row in &report.rows {
            if row.status == BitStatus::Ok {
                continue;
            }
            let _ = writeln!(
                out,
                "    {:<18} {:<6} {:<24} local={:?} template={:?}",
                row.operand,
                row.language,
                row.status.as_str(),
                row.local.as_deref().unwrap_or("<none>"),
                row.template
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagsync_engine::BitRow;
    use diagsync_model::InstanceStatus;

    #[test]
    fn renders_instance_line_and_flagged_rows_only() {
        let report = InstanceReport {
            name: "V002".into(),
            data_type: "MCP_Valve".into(),
            status: InstanceStatus::Issue,
            rows: vec![
                BitRow {
                    operand: ".iDiagnostic1.3".into(),
                    word: 0,
                    bit: 3,
                    language: "en-GB".into(),
                    local: Some("UF_03 Custom".into()),
                    template: "UF_03 Sensor fault".into(),
                    status: BitStatus::InconsistentOverride,
                },
                BitRow {
                    operand: ".iDiagnostic1.5".into(),
                    word: 0,
                    bit: 5,
                    language: "en-GB".into(),
                    local: Some("DO NOT USE".into()),
                    template: "DO NOT USE".into(),
                    status: BitStatus::Ok,
                },
            ],
        };

        let text = render_reports(&[report]);
        assert!(text.contains("V002  (MCP_Valve)  ISSUE"));
        assert!(text.contains("inconsistent_override"));
        assert!(!text.contains(".iDiagnostic1.5"), "OK rows stay hidden");
    }
}
