// src/services/prompts.rs

//! Prompt text for the two report stages and the analysis markdown layout.

use chrono::{DateTime, Local};

use crate::models::CaptureConfig;

pub const ANALYSIS_SYSTEM: &str = "You are an experienced physical performance coach. \
Read the attached test screenshots carefully and answer in Markdown only.";

pub const PROGRAM_SYSTEM: &str = "You are an expert physical performance coach. \
Return Markdown only. Keep the plan concise, structured, and actionable.";

/// `(label, filename prefix)` of every catalog entry, in capture order.
pub fn catalog_tests(capture: &CaptureConfig) -> Vec<(&str, &str)> {
    capture
        .modals
        .iter()
        .map(|m| (m.label.as_str(), m.prefix.as_str()))
        .chain(capture.tiles.iter().map(|t| (t.label.as_str(), t.prefix.as_str())))
        .collect()
}

/// User prompt for the image analysis of one athlete.
pub fn analysis_prompt(
    athlete: &str,
    cohort: &str,
    tests: &[(&str, &str)],
    images: &[String],
) -> String {
    let labels: Vec<&str> = tests.iter().map(|(label, _)| *label).collect();
    let mut prompt = format!(
        "These are the performance data of {athlete}, who is in the {cohort} cohort. \
The screenshots cover: {}. Analyze them carefully.\n\
Act as a physical coach. Extract the data, analyze it and give insights and \
improvements in a short bullet style.\n\n\
## Report structure\n\n",
        labels.join(", ")
    );
    for (i, (label, prefix)) in tests.iter().enumerate() {
        let shots: Vec<&str> = images
            .iter()
            .map(String::as_str)
            .filter(|name| has_prefix(name, prefix))
            .collect();
        prompt.push_str(&format!("### {}. {}\n\n", i + 1, label));
        if shots.is_empty() {
            prompt.push_str("* No screenshot for this test; write \"No data\".\n\n");
            continue;
        }
        prompt.push_str(&format!("* Images: {}\n", shots.join(", ")));
        prompt.push_str("* **Insights**: 3 short bullet points\n");
        prompt.push_str("* **Improvements**: 3 short bullet points\n\n");
    }
    prompt
}

fn has_prefix(file_name: &str, prefix: &str) -> bool {
    file_name
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('_'))
}

/// The analysis document: a fixed header followed by the model's text.
pub fn analysis_markdown(
    athlete: &str,
    team: &str,
    cohort: &str,
    generated: DateTime<Local>,
    images: &[String],
    body: &str,
) -> String {
    let team = if team.is_empty() { "(none)" } else { team };
    let mut lines = vec![
        format!("# {athlete} - Short Format Report"),
        String::new(),
        format!("- Team: {team}"),
        format!("- Cohort: {cohort}"),
        format!("- Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")),
        format!("- Images included ({}):", images.len()),
    ];
    lines.extend(images.iter().map(|name| format!("  - {name}")));
    lines.push(String::new());
    lines.push("---".into());
    lines.push(String::new());
    lines.push(body.trim().to_string());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Sub-headings of the weekly plan: "Weeks 1-2", "Weeks 3-4", ...
pub fn week_blocks(weeks: u32) -> Vec<String> {
    (1..=weeks)
        .step_by(2)
        .map(|start| {
            if start < weeks {
                format!("Weeks {}-{}", start, start + 1)
            } else {
                format!("Week {start}")
            }
        })
        .collect()
}

/// User prompt for the training program, with the analysis as context.
pub fn program_prompt(athlete: &str, cohort: &str, weeks: u32, analysis: &str) -> String {
    format!(
        "Act as a physical coach and give me a {weeks} weeks training program for {athlete}, \
an athlete in the {cohort} cohort.\n\
Don't make it too big. The training program should include at least:\n\
- Program Overview\n\
- Goals\n\
- Weekly plan\n\
- Progressions\n\
- Monitoring and Safety Notes\n\n\
Use the following analysis (generated from the athlete's test images) as context to tailor \
the plan. If something is unclear, make sensible, coaching-appropriate assumptions. \
Don't create any table, just plain text with headings. In the weekly plan, use {} as \
sub-headings, not as bullet points.\n\n\
--- BEGIN ATHLETE ANALYSIS (Markdown) ---\n\
{}\n\
--- END ATHLETE ANALYSIS ---",
        week_blocks(weeks).join(", "),
        analysis.trim()
    )
}

/// Title placed at the top of the program document.
pub fn program_title(athlete: &str, weeks: u32) -> String {
    format!("{athlete} - {weeks} Weeks Training Program")
}
