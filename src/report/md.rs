use crate::types::report::ReadinessReport;

pub fn to_markdown(report: &ReadinessReport) -> String {
    let mut output = String::new();
    output.push_str("# Interview Readiness\n\n");
    output.push_str(&format!(
        "Generated: {}\nHistorical offer rate: {:.3}\n\n",
        report.generated_at.to_rfc3339(),
        report.historical_offer_rate
    ));

    if report.interviews.is_empty() {
        output.push_str("No scheduled interviews.\n");
        return output;
    }

    for score in &report.interviews {
        let start = score
            .start
            .map(|start| start.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unscheduled".to_string());
        output.push_str(&format!("## {} ({})\n\n", score.title, score.interview_id));
        output.push_str(&format!("- starts: {start}\n"));
        output.push_str(&format!(
            "- success probability: {}%\n- confidence: {}%\n",
            score.result.raw_probability, score.result.confidence
        ));
        output.push_str(&format!(
            "- role match: {}\n- research done: {}\n- practice minutes: {}\n- mock sessions: {} (boost {})\n\n",
            score.result.role_match,
            if score.signals.research_done { "yes" } else { "no" },
            score.result.practice_minutes,
            score.signals.mock_count,
            score.signals.mock_boost
        ));

        output.push_str("### Next steps\n\n");
        for action in &score.result.actions {
            output.push_str(&format!("- {action}\n"));
        }
        output.push('\n');
    }

    output
}
