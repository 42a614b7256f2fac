//! Single-column layout, shared by every table-driven style.
//!
//! Section order is fixed: Summary, Skills, Experience, Projects, Education.

use crate::models::resume::{split_skill, ResumeData, SkillLine};
use crate::render::theme::Theme;
use crate::render::{contact_line, document_head, entry_block, escape, PAGINATION_CSS};

/// Body styles. Only references the `:root` variables, never concrete values.
const LAYOUT_CSS: &str = "\
* { box-sizing: border-box; }
body { font-family: var(--font-main); margin: 0; padding: 0; color: var(--color-sec); line-height: var(--line-height); font-size: var(--font-size-base); background: #fff; }
h1 { font-size: 2.2em; color: var(--color-primary); margin: 0 0 2px 0; text-transform: uppercase; text-align: var(--header-align); font-weight: 700; letter-spacing: 0.5px; }
.role { text-align: var(--header-align); font-size: 1.1em; color: var(--color-sec); margin-bottom: 4px; font-weight: 500; }
.contact-info { margin-bottom: 10px; text-align: var(--header-align); font-size: 0.9em; padding-bottom: 5px; }
h2 { font-size: 1.0em; text-transform: uppercase; border-bottom: var(--border-style); padding-bottom: 2px; margin-top: 10px; margin-bottom: 6px; color: var(--color-primary); letter-spacing: 0.5px; font-weight: 700; break-after: avoid; page-break-after: avoid; }
.summary { margin-top: 2px; text-align: justify; }
.entry { margin-bottom: 8px; }
.entry-title { display: flex; justify-content: space-between; font-weight: 700; color: var(--color-primary); font-size: 1.0em; }
.entry-sub { display: flex; justify-content: space-between; font-style: italic; margin-bottom: 2px; font-size: 0.95em; }
ul { margin: 2px 0 0 14px; padding: 0; }
li { margin-bottom: 1px; text-align: justify; }
.skills { margin-top: 4px; line-height: 1.4; }
.skill-cat { font-weight: 700; color: var(--color-primary); }
";

pub fn render(data: &ResumeData, theme: &Theme) -> String {
    let mut html = document_head(&data.name, theme.web_font_url);
    html.push_str(&theme.css_variables());
    html.push_str(&format!(
        "@page {{ size: A4; margin: {}mm; }}\n",
        theme.page_margin_mm
    ));
    html.push_str(LAYOUT_CSS);
    html.push_str(PAGINATION_CSS);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(&data.name)));
    html.push_str(&format!(
        "<div class=\"role\">{}</div>\n",
        escape(data.display_title())
    ));
    html.push_str(&format!(
        "<div class=\"contact-info\">{}</div>\n",
        contact_line(data)
    ));
    html.push_str("</header>\n");

    html.push_str(&section("Professional Summary", &summary(data)));
    html.push_str(&section("Technical Skills", &skills(data)));
    html.push_str(&section("Experience", &experience(data)));
    html.push_str(&section("Personal Projects", &projects(data)));
    html.push_str(&section("Education", &education(data)));

    html.push_str("</body>\n</html>\n");
    html
}

fn section(title: &str, body: &str) -> String {
    format!("<section>\n<h2>{title}</h2>\n{body}</section>\n")
}

fn summary(data: &ResumeData) -> String {
    if data.summary.trim().is_empty() {
        return String::new();
    }
    format!("<p class=\"summary\">{}</p>\n", escape(&data.summary))
}

fn skills(data: &ResumeData) -> String {
    if data.skills.is_empty() {
        return String::new();
    }
    let mut out = String::from("<div class=\"skills\">\n");
    for skill in &data.skills {
        match split_skill(skill) {
            SkillLine::Categorized { category, items } => out.push_str(&format!(
                "<div class=\"skill-line\"><span class=\"skill-cat\">{}</span>: <span class=\"skill-items\">{}</span></div>\n",
                escape(category),
                escape(items)
            )),
            SkillLine::Plain(skill) => out.push_str(&format!(
                "<div class=\"skill-line skill-plain\">• {}</div>\n",
                escape(skill)
            )),
        }
    }
    out.push_str("</div>\n");
    out
}

fn experience(data: &ResumeData) -> String {
    data.experience
        .iter()
        .map(|job| {
            let header = format!(
                "<div class=\"entry-title\"><span>{}</span><span>{}</span></div>\n\
                 <div class=\"entry-sub\"><span>{}</span><span>{}</span></div>\n",
                escape(&job.company),
                escape(&job.duration),
                escape(&job.role),
                escape(&job.location),
            );
            entry_block(&header, &job.bullet_points)
        })
        .collect()
}

fn projects(data: &ResumeData) -> String {
    data.projects
        .iter()
        .map(|project| {
            let header = format!(
                "<div class=\"entry-title\"><span>{}</span></div>\n\
                 <div class=\"entry-sub\"><span>{}</span></div>\n",
                escape(&project.title),
                escape(&project.technologies),
            );
            entry_block(&header, &project.bullet_points)
        })
        .collect()
}

fn education(data: &ResumeData) -> String {
    data.education
        .iter()
        .map(|edu| {
            let header = format!(
                "<div class=\"entry-title\"><span>{}</span><span>{}</span></div>\n\
                 <div>{}</div>\n",
                escape(&edu.school),
                escape(&edu.year),
                escape(&edu.degree),
            );
            entry_block(&header, &[])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::full_resume;
    use crate::render::theme::theme_for;
    use crate::render::StyleId;

    fn classic(data: &ResumeData) -> String {
        render(data, theme_for(StyleId::Classic).unwrap())
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let html = classic(&full_resume());
        let order = [
            "Professional Summary",
            "Technical Skills",
            "<h2>Experience</h2>",
            "Personal Projects",
            "<h2>Education</h2>",
        ];
        let positions: Vec<usize> = order.iter().map(|h| html.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_categorized_skill_splits_label_and_body() {
        let html = classic(&full_resume());
        assert!(html.contains(
            "<span class=\"skill-cat\">Languages</span>: <span class=\"skill-items\">Kotlin, Go</span>"
        ));
    }

    #[test]
    fn test_plain_skill_renders_as_bulleted_line() {
        let html = classic(&full_resume());
        assert!(html.contains("<div class=\"skill-line skill-plain\">• Docker</div>"));
        assert!(!html.contains("<span class=\"skill-cat\">Docker"));
    }

    #[test]
    fn test_theme_variables_emitted_once_and_referenced_in_body_css() {
        let html = classic(&full_resume());
        assert_eq!(html.matches(":root {").count(), 1);
        assert!(html.contains("font-family: var(--font-main)"));
        assert!(html.contains("border-bottom: var(--border-style)"));
        assert!(html.contains("@page { size: A4; margin: 15mm; }"));
    }

    #[test]
    fn test_body_css_identical_across_themes() {
        let data = full_resume();
        let strip_root = |html: String| -> String {
            html.lines()
                .filter(|l| !l.starts_with(":root") && !l.starts_with("@page") && !l.starts_with("<link"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let compact = strip_root(render(&data, theme_for(StyleId::Compact).unwrap()));
        let creative = strip_root(render(&data, theme_for(StyleId::Creative).unwrap()));
        assert_eq!(compact, creative);
    }

    #[test]
    fn test_entry_without_bullets_has_no_list() {
        let mut data = full_resume();
        data.projects[0].bullet_points.clear();
        let html = classic(&data);
        let start = html.find("Nanosecond Wire").unwrap();
        let end = html.find("<h2>Education</h2>").unwrap();
        assert!(!html[start..end].contains("<ul"));
    }

    #[test]
    fn test_education_renders_school_year_and_degree() {
        let html = classic(&full_resume());
        assert!(html.contains("<span>Yale University</span><span>1934</span>"));
        assert!(html.contains("<div>PhD Mathematics</div>"));
    }
}
