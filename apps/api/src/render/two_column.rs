//! Two-column layout (Modern). Full-width header banner, then a ~68% primary
//! column (Profile, Experience, Projects) beside a ~30% secondary column
//! (Skills, Education). The theme is fixed and not table-driven.

use crate::models::resume::{split_skill, ResumeData, SkillLine};
use crate::render::{contact_line, document_head, entry_block, escape, PAGINATION_CSS};

const WEB_FONT_URL: &str =
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;600;700&display=swap";

const LAYOUT_CSS: &str = "\
@page { size: A4; margin: 10mm; }
* { box-sizing: border-box; }
body { font-family: 'Inter', sans-serif; margin: 0; padding: 0; color: #1f2937; line-height: 1.4; font-size: 11px; background: #fff; }
.header-container { padding: 10px 0 20px 0; border-bottom: 2px solid #e5e7eb; margin-bottom: 15px; }
.name { font-size: 24px; font-weight: 700; color: #111827; margin-bottom: 2px; text-transform: uppercase; }
.role { font-size: 14px; color: #4b5563; font-weight: 500; margin-bottom: 8px; }
.contact-bar { display: flex; gap: 12px; font-size: 10.5px; color: #6b7280; flex-wrap: wrap; }
.main-grid { display: grid; grid-template-columns: 68% 30%; gap: 2%; }
.col-right { background-color: #f9fafb; padding: 10px; border-radius: 4px; height: fit-content; }
h2 { font-size: 12px; font-weight: 700; color: #374151; text-transform: uppercase; letter-spacing: 1px; margin-bottom: 8px; border-bottom: 1px solid #d1d5db; padding-bottom: 3px; margin-top: 0; break-after: avoid; page-break-after: avoid; }
.section { margin-bottom: 15px; }
.summary { text-align: justify; }
.entry { margin-bottom: 10px; }
.entry-title { font-weight: 700; font-size: 12px; color: #000; }
.company-row { display: flex; justify-content: space-between; margin-bottom: 2px; font-size: 11px; color: #4b5563; }
ul { margin: 2px 0 0 12px; padding: 0; }
li { margin-bottom: 2px; text-align: justify; }
.skill-block { margin-bottom: 8px; }
.skill-cat { font-weight: 700; display: block; margin-bottom: 1px; font-size: 10.5px; }
.edu-block { margin-bottom: 10px; }
";

pub fn render(data: &ResumeData) -> String {
    let mut html = document_head(&data.name, WEB_FONT_URL);
    html.push_str(LAYOUT_CSS);
    html.push_str(PAGINATION_CSS);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<div class=\"header-container\">\n");
    html.push_str(&format!("<div class=\"name\">{}</div>\n", escape(&data.name)));
    html.push_str(&format!(
        "<div class=\"role\">{}</div>\n",
        escape(data.display_title())
    ));
    html.push_str(&format!(
        "<div class=\"contact-bar\">{}</div>\n",
        contact_line(data)
    ));
    html.push_str("</div>\n");

    html.push_str("<div class=\"main-grid\">\n<div class=\"col-left\">\n");
    html.push_str(&section("Profile", &summary(data)));
    html.push_str(&section("Experience", &experience(data)));
    html.push_str(&section("Projects", &projects(data)));
    html.push_str("</div>\n<div class=\"col-right\">\n");
    html.push_str(&section("Skills", &skills(data)));
    html.push_str(&section("Education", &education(data)));
    html.push_str("</div>\n</div>\n");

    html.push_str("</body>\n</html>\n");
    html
}

fn section(title: &str, body: &str) -> String {
    format!("<div class=\"section\">\n<h2>{title}</h2>\n{body}</div>\n")
}

fn summary(data: &ResumeData) -> String {
    if data.summary.trim().is_empty() {
        return String::new();
    }
    format!("<p class=\"summary\">{}</p>\n", escape(&data.summary))
}

fn experience(data: &ResumeData) -> String {
    data.experience
        .iter()
        .map(|job| {
            let header = format!(
                "<div class=\"entry-title\">{}</div>\n\
                 <div class=\"company-row\"><span>{}</span><span>{}</span></div>\n",
                escape(&job.role),
                escape(&job.company),
                escape(&job.duration),
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
                "<div class=\"entry-title\">{}</div>\n\
                 <div class=\"company-row\"><span>{}</span></div>\n",
                escape(&project.title),
                escape(&project.technologies),
            );
            entry_block(&header, &project.bullet_points)
        })
        .collect()
}

fn skills(data: &ResumeData) -> String {
    data.skills
        .iter()
        .map(|skill| match split_skill(skill) {
            SkillLine::Categorized { category, items } => format!(
                "<div class=\"skill-block\"><span class=\"skill-cat\">{}</span><span class=\"skill-items\">{}</span></div>\n",
                escape(category),
                escape(items)
            ),
            SkillLine::Plain(skill) => format!(
                "<div class=\"skill-line skill-plain\">• {}</div>\n",
                escape(skill)
            ),
        })
        .collect()
}

fn education(data: &ResumeData) -> String {
    data.education
        .iter()
        .map(|edu| {
            format!(
                "<div class=\"edu-block entry-header\"><strong>{}</strong><br><em>{}</em><br><small>{}</small></div>\n",
                escape(&edu.degree),
                escape(&edu.school),
                escape(&edu.year),
            )
        })
        .collect()
}
