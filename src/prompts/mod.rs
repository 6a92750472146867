//! Prompt templates for AI-assisted content.
//!
//! One fixed template per generation operation. Placeholders in braces are
//! substituted verbatim in a single pass, so braces inside user input are
//! never expanded. No other escaping is applied.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Project idea suggestions. Placeholders: `{skills}`, `{goal}`, `{weeks}`.
pub const IDEAS_PROMPT: &str = "You are a product coach. Student skills: {skills}. Goal: {goal}. \
Time: {weeks} weeks. Suggest 3 recruiter-ready project ideas. For each: 1-line problem, \
1-line solution, tech stack, 1 measurable outcome. Return as JSON array with fields: \
problem, solution, techStack (array), outcome.";

/// Milestone breakdown. Placeholder: `{title}`.
pub const MILESTONES_PROMPT: &str = "Break the project '{title}' into 5 milestones with \
deliverables and acceptance criteria; each milestone completable in 5–10 hours. Return as \
JSON array with fields: title, description, deliverables (array), acceptanceCriteria (array), \
estHours.";

/// Implementation help. Placeholders: `{milestone}`, `{project}`.
pub const HELP_PROMPT: &str = "For milestone '{milestone}' of project '{project}', give a \
5-step implementation checklist and one short starter code snippet or CLI command. Return as \
JSON with fields: steps (array of strings), starterCode (string).";

/// Portfolio blurb. Placeholder: `{title}`.
pub const BLURB_PROMPT: &str = "Write a 120–150 word recruiter-friendly portfolio blurb for \
'{title}' describing problem, approach, tech stack, impact metric. Return as JSON with field: \
blurb (string).";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{([a-z]+)\}").expect("placeholder pattern is valid"))
}

/// Replace each `{name}` in `template` with its value. Unknown names are
/// left as written.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn build_ideas_prompt(skills: &[String], goal: &str, weeks: u32) -> String {
    fill(
        IDEAS_PROMPT,
        &[
            ("skills", skills.join(", ").as_str()),
            ("goal", goal),
            ("weeks", weeks.to_string().as_str()),
        ],
    )
}

pub fn build_milestones_prompt(project_title: &str) -> String {
    fill(MILESTONES_PROMPT, &[("title", project_title)])
}

pub fn build_help_prompt(milestone_title: &str, project_title: &str) -> String {
    fill(
        HELP_PROMPT,
        &[("milestone", milestone_title), ("project", project_title)],
    )
}

pub fn build_blurb_prompt(project_title: &str) -> String {
    fill(BLURB_PROMPT, &[("title", project_title)])
}
