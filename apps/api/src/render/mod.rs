//! Template Renderer. Maps a `ResumeData` plus a `StyleId` onto a standalone,
//! print-ready HTML document.
//!
//! Rendering is pure: no I/O, no clock, no randomness. The same pair always yields
//! byte-identical output, so callers may re-render on every keystroke.
//!
//! # Layouts
//! - Single column (`single_column`): every style with a row in `theme::THEMES`.
//! - Two column (`two_column`): Modern, with its own fixed theme.
//!
//! # Pagination
//! Every entry is emitted as an `.entry-lead` block (header group + first bullet,
//! never split) followed by the remaining bullets, which may flow across pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::ResumeData;

pub mod single_column;
pub mod theme;
pub mod two_column;

/// The closed set of visual templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleId {
    Classic,
    Modern,
    TechMinimal,
    Creative,
    Compact,
    Executive,
}

impl StyleId {
    /// All styles, in the order they are offered to users.
    pub const ALL: [StyleId; 6] = [
        StyleId::Modern,
        StyleId::Classic,
        StyleId::TechMinimal,
        StyleId::Creative,
        StyleId::Compact,
        StyleId::Executive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleId::Classic => "classic",
            StyleId::Modern => "modern",
            StyleId::TechMinimal => "tech_minimal",
            StyleId::Creative => "creative",
            StyleId::Compact => "compact",
            StyleId::Executive => "executive",
        }
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown style '{0}'")]
pub struct UnknownStyle(pub String);

impl FromStr for StyleId {
    type Err = UnknownStyle;

    /// Accepts `tech_minimal`, `tech-minimal`, `TechMinimal` and `TECH_MINIMAL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        StyleId::ALL
            .into_iter()
            .find(|style| style.as_str().replace('_', "") == key)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Renders the resume under the given style. Total over any `ResumeData`.
pub fn render(data: &ResumeData, style: StyleId) -> String {
    match theme::theme_for(style) {
        Some(theme) => single_column::render(data, theme),
        None => two_column::render(data),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared fragments
// ────────────────────────────────────────────────────────────────────────────

/// Pagination hints shared by both layouts. The lead block holds the header group
/// and the first bullet together; the header group itself never splits and never
/// ends a page.
const PAGINATION_CSS: &str = "\
.entry-lead { break-inside: avoid; page-break-inside: avoid; }
.entry-header { break-inside: avoid; page-break-inside: avoid; break-after: avoid; page-break-after: avoid; }
.entry-lead > ul { margin-bottom: 0; }
ul.entry-rest { margin-top: 0; }
";

/// Escapes the five reserved markup characters. Every user-supplied string goes
/// through here before it reaches the document.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escaped contact channels joined with a bullet separator.
fn contact_line(data: &ResumeData) -> String {
    data.contact_segments()
        .into_iter()
        .map(escape)
        .collect::<Vec<_>>()
        .join(" • ")
}

/// Opening of the document up to and including `<style>`.
fn document_head(title: &str, web_font_url: &str) -> String {
    let mut head = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    head.push_str("<meta charset=\"utf-8\">\n");
    head.push_str(&format!("<title>{}</title>\n", escape(title)));
    head.push_str(&format!(
        "<link href=\"{}\" rel=\"stylesheet\">\n",
        escape(web_font_url)
    ));
    head.push_str("<style>\n");
    head
}

/// One entry: an unbreakable lead (header group + first bullet), then the rest.
/// `header_html` must already be escaped.
fn entry_block(header_html: &str, bullets: &[String]) -> String {
    let mut block = String::from("<div class=\"entry\">\n<div class=\"entry-lead\">\n");
    block.push_str("<div class=\"entry-header\">\n");
    block.push_str(header_html);
    block.push_str("</div>\n");

    let mut bullets = bullets.iter();
    if let Some(first) = bullets.next() {
        block.push_str(&format!(
            "<ul class=\"entry-bullets\"><li>{}</li></ul>\n",
            escape(first)
        ));
    }
    block.push_str("</div>\n");

    let rest: String = bullets
        .map(|bullet| format!("<li>{}</li>", escape(bullet)))
        .collect();
    if !rest.is_empty() {
        block.push_str(&format!(
            "<ul class=\"entry-bullets entry-rest\">{rest}</ul>\n"
        ));
    }
    block.push_str("</div>\n");
    block
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::resume::{Education, Project, ResumeData, WorkHistory};

    pub fn full_resume() -> ResumeData {
        ResumeData {
            name: "Grace Hopper".to_string(),
            contact_info: "grace@example.com | +1 555 0100 | github.com/grace".to_string(),
            summary: "Compiler engineer with a bias for shipping.".to_string(),
            experience: vec![
                WorkHistory {
                    company: "Remington Rand".to_string(),
                    role: "Senior Mathematician".to_string(),
                    duration: "1949 - 1971".to_string(),
                    location: "Philadelphia, PA".to_string(),
                    bullet_points: vec![
                        "Designed the A-0 compiler, cutting programming time by 60%".to_string(),
                        "Led a team of 8 on FLOW-MATIC".to_string(),
                        "Standardised COBOL across 4 vendors".to_string(),
                    ],
                },
                WorkHistory {
                    company: "Harvard".to_string(),
                    role: "Programmer".to_string(),
                    duration: "1944 - 1949".to_string(),
                    location: "Cambridge, MA".to_string(),
                    bullet_points: vec!["Programmed the Mark I".to_string()],
                },
            ],
            projects: vec![Project {
                title: "Nanosecond Wire".to_string(),
                technologies: "Copper, Teaching".to_string(),
                bullet_points: vec!["Explained latency to admirals".to_string()],
            }],
            education: vec![Education {
                school: "Yale University".to_string(),
                degree: "PhD Mathematics".to_string(),
                year: "1934".to_string(),
            }],
            skills: vec![
                "Languages: Kotlin, Go".to_string(),
                "Docker".to_string(),
            ],
        }
    }

    pub fn empty_resume(name: &str) -> ResumeData {
        ResumeData {
            name: name.to_string(),
            ..ResumeData::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{empty_resume, full_resume};
    use super::*;

    #[test]
    fn test_escape_all_reserved_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_is_deterministic_for_every_style() {
        let data = full_resume();
        for style in StyleId::ALL {
            assert_eq!(render(&data, style), render(&data, style), "{style}");
        }
    }

    #[test]
    fn test_styles_produce_distinct_documents() {
        let data = full_resume();
        let docs: Vec<String> = StyleId::ALL.iter().map(|s| render(&data, *s)).collect();
        for (i, a) in docs.iter().enumerate() {
            for b in docs.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_empty_resume_renders_name_and_no_section_content() {
        for style in StyleId::ALL {
            let html = render(&empty_resume("Nobody Yet"), style);
            assert!(html.starts_with("<!DOCTYPE html>"), "{style}");
            assert!(html.trim_end().ends_with("</html>"), "{style}");
            assert!(html.contains("Nobody Yet"), "{style}");
            assert!(html.contains("Candidate"), "{style}");
            assert!(!html.contains("<li>"), "{style}");
            assert!(!html.contains("class=\"entry\""), "{style}");
            assert!(!html.contains("class=\"skill-"), "{style}");
            assert!(!html.contains("class=\"summary\""), "{style}");
        }
    }

    #[test]
    fn test_script_in_name_is_escaped() {
        let mut data = full_resume();
        data.name = "<script>alert('x')</script>".to_string();
        for style in StyleId::ALL {
            let html = render(&data, style);
            assert!(!html.contains("<script>"), "{style}");
            assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        }
    }

    #[test]
    fn test_hostile_fields_never_leave_raw_markup() {
        let mut data = full_resume();
        data.experience[0].bullet_points[1] = "</li></ul><h1>pwned".to_string();
        data.skills.push("<b>: </b>".to_string());
        data.contact_info = "<i>x</i> | \"quoted\"".to_string();
        for style in StyleId::ALL {
            let html = render(&data, style);
            assert!(!html.contains("<h1>pwned"), "{style}");
            assert!(!html.contains("<b>"), "{style}");
            assert!(!html.contains("<i>x"), "{style}");
            assert!(html.contains("&quot;quoted&quot;"), "{style}");
        }
    }

    #[test]
    fn test_contact_line_joined_with_bullet_separator() {
        let html = render(&full_resume(), StyleId::Classic);
        assert!(html.contains("grace@example.com • +1 555 0100 • github.com/grace"));
    }

    #[test]
    fn test_header_group_and_first_bullet_share_one_lead_block() {
        let data = full_resume();
        for style in StyleId::ALL {
            let html = render(&data, style);
            assert!(html.contains(PAGINATION_CSS), "{style}");
            assert!(!html.contains("break-before"), "{style}");
            assert!(!html.contains("always"), "{style}");

            for job in &data.experience {
                let header_at = html.find(&escape(&job.company)).unwrap();
                let first_at = html.find(&escape(&job.bullet_points[0])).unwrap();
                assert!(header_at < first_at, "{style}");
                let between = &html[header_at..first_at];
                assert!(!between.contains("entry-rest"), "{style}");
                assert!(!between.contains("class=\"entry\""), "{style}");
            }
        }
    }

    #[test]
    fn test_remaining_bullets_may_split() {
        let html = render(&full_resume(), StyleId::TechMinimal);
        let rest_at = html.find("entry-bullets entry-rest").unwrap();
        let second = html.find("Led a team of 8 on FLOW-MATIC").unwrap();
        assert!(rest_at < second);
    }

    #[test]
    fn test_style_id_parsing() {
        assert_eq!("tech_minimal".parse::<StyleId>(), Ok(StyleId::TechMinimal));
        assert_eq!("Tech-Minimal".parse::<StyleId>(), Ok(StyleId::TechMinimal));
        assert_eq!("EXECUTIVE".parse::<StyleId>(), Ok(StyleId::Executive));
        assert_eq!(
            "baroque".parse::<StyleId>(),
            Err(UnknownStyle("baroque".to_string()))
        );
    }

    #[test]
    fn test_style_id_serde_uses_snake_case() {
        let json = serde_json::to_string(&StyleId::TechMinimal).unwrap();
        assert_eq!(json, r#""tech_minimal""#);
        let style: StyleId = serde_json::from_str(r#""compact""#).unwrap();
        assert_eq!(style, StyleId::Compact);
    }
}
