use super::{Report, DISCLAIMER};

pub(super) fn render_markdown(report: &Report) -> String {
    let mut content = String::new();

    content.push_str("# Rapport – Préquestionnaire de neurodiversité\n\n");
    content.push_str(&format!("- Code d’accès : {}\n", report.code));
    content.push_str(&format!("- Patient : {}\n", report.patient));
    content.push_str(&format!("- Date : {}\n\n", report.timestamp()));

    content.push_str("## Scores par dimension\n\n");
    for score in &report.scores {
        content.push_str(&format!(
            "- {} : {}/{}\n",
            score.label(),
            score.score,
            score.max
        ));
    }

    content.push_str("\n## Profil suggéré\n\n");
    for finding in report.classification.findings() {
        content.push_str(&format!("- {}\n", finding.label.summary()));
    }

    content.push_str(&format!("\n> ⚠️ {DISCLAIMER}\n"));
    content
}
