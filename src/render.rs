//! Deterministic HTML rendering of the resume record tree.
//!
//! Selection happens here, before Tera sees the data: lists are cut to their
//! first N entries in file order and project names are title-cased. The
//! template itself only loops and skips empty fragments.
use crate::error::RenderError;
use crate::model::{Company, OtherItem, Position, Project, ResumeData};
use crate::templates::{CV_HTML, CV_TEMPLATE_NAME};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tera::{Context, Tera};

pub const MAX_RESPONSIBILITIES: usize = 6;
pub const MAX_TECHNOLOGIES: usize = 10;
pub const MAX_PROJECTS: usize = 4;
pub const MAX_TOPICS: usize = 5;

#[derive(Serialize)]
struct CvView<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    location: &'a str,
    summary: &'a str,
    corporate: Vec<CompanyView<'a>>,
    other: Vec<OtherView<'a>>,
    projects: Vec<ProjectView<'a>>,
}

#[derive(Serialize)]
struct CompanyView<'a> {
    name: &'a str,
    positions: Vec<PositionView<'a>>,
}

#[derive(Serialize)]
struct PositionView<'a> {
    title: &'a str,
    duration: &'a str,
    location: &'a str,
    kind: &'a str,
    responsibilities: &'a [String],
    /// Comma-joined stack; empty when the position lists none.
    technologies: String,
}

#[derive(Serialize)]
struct OtherView<'a> {
    title: &'a str,
    organization: &'a str,
    duration: &'a str,
    kind: &'a str,
    key_learnings: &'a [String],
}

#[derive(Serialize)]
struct ProjectView<'a> {
    name: String,
    language: &'a str,
    stars: u64,
    url: &'a str,
    description: &'a str,
    topics: &'a [String],
}

/// Render the resume into a standalone HTML document.
///
/// Total over any loaded `ResumeData`: missing text renders empty and empty
/// lists drop their fragment (or, for projects, the whole section).
pub fn render_html(data: &ResumeData) -> Result<String, RenderError> {
    let view = build_view(data);
    let mut tera = Tera::default();
    tera.set_escape_fn(escape_markup);
    tera.add_raw_template(CV_TEMPLATE_NAME, CV_HTML)?;
    let context = Context::from_serialize(&view)?;
    let html = tera.render(CV_TEMPLATE_NAME, &context)?;
    Ok(html)
}

fn build_view(data: &ResumeData) -> CvView<'_> {
    let info = &data.personal_info;
    CvView {
        name: &info.name,
        email: &info.email,
        phone: &info.phone,
        location: &info.location,
        summary: &data.about.summary,
        corporate: data.experience.corporate.iter().map(company_view).collect(),
        other: data.experience.other.iter().map(other_view).collect(),
        projects: first(&data.projects, MAX_PROJECTS)
            .iter()
            .map(project_view)
            .collect(),
    }
}

fn company_view(company: &Company) -> CompanyView<'_> {
    CompanyView {
        name: &company.company,
        positions: company.positions.iter().map(position_view).collect(),
    }
}

fn position_view(position: &Position) -> PositionView<'_> {
    PositionView {
        title: &position.title,
        duration: &position.duration,
        location: &position.location,
        kind: &position.kind,
        responsibilities: first(&position.responsibilities, MAX_RESPONSIBILITIES),
        technologies: first(&position.daily_stack, MAX_TECHNOLOGIES).join(", "),
    }
}

fn other_view(item: &OtherItem) -> OtherView<'_> {
    OtherView {
        title: &item.title,
        organization: &item.organization,
        duration: &item.duration,
        kind: &item.kind,
        key_learnings: &item.key_learnings,
    }
}

fn project_view(project: &Project) -> ProjectView<'_> {
    ProjectView {
        name: title_case(&project.name),
        language: &project.language,
        stars: project.stars,
        url: &project.url,
        description: &project.description,
        topics: first(&project.topics, MAX_TOPICS),
    }
}

fn first<T>(items: &[T], limit: usize) -> &[T] {
    &items[..items.len().min(limit)]
}

/// Capitalize each word: first character upper-cased, the rest lower-cased.
///
/// Words are separated by runs of `-`, whitespace, `(`, `{`, `[` or `<`.
/// Underscores, digits and dots stay inside a word, so `my-cool_repo2x`
/// becomes `My-Cool_repo2x`.
pub fn title_case(text: &str) -> String {
    static WORD_BREAK: OnceLock<Regex> = OnceLock::new();
    let breaks = WORD_BREAK
        .get_or_init(|| Regex::new(r"[-\s({\[<]+").expect("regex for title-case word breaks"));
    let mut out = String::with_capacity(text.len());
    let mut word_start = 0;
    for separator in breaks.find_iter(text) {
        push_capitalized(&mut out, &text[word_start..separator.start()]);
        out.push_str(separator.as_str());
        word_start = separator.end();
    }
    push_capitalized(&mut out, &text[word_start..]);
    out
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.extend(chars.flat_map(char::to_lowercase));
    }
}

/// Escape `&<>"'` only; slashes in URLs are left alone.
fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
