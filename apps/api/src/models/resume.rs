use serde::{Deserialize, Serialize};

/// Display title used when the resume carries no usable role.
pub const DEFAULT_DISPLAY_TITLE: &str = "Candidate";

/// The canonical tailored resume record.
///
/// Produced by the tailoring provider and replaced wholesale on every change;
/// nothing mutates it in place. Every sequence may be empty but is never absent,
/// so missing JSON fields deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub name: String,
    /// Pipe-delimited contact channels, e.g. `"a@b.dev | +1 555 0100 | github.com/a"`.
    pub contact_info: String,
    pub summary: String,
    pub experience: Vec<WorkHistory>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    /// Either `"Category: item, item"` or a bare skill.
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkHistory {
    pub company: String,
    pub role: String,
    pub duration: String,
    pub location: String,
    pub bullet_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: String,
    pub technologies: String,
    pub bullet_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub year: String,
}

/// A skill line split into its optional category label and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillLine<'a> {
    Categorized { category: &'a str, items: &'a str },
    Plain(&'a str),
}

impl ResumeData {
    /// The candidate's headline: the most recent role, or "Candidate".
    pub fn display_title(&self) -> &str {
        self.experience
            .first()
            .map(|job| job.role.trim())
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_TITLE)
    }

    /// Contact channels split on `|`, trimmed, empty segments dropped.
    pub fn contact_segments(&self) -> Vec<&str> {
        self.contact_info
            .split('|')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Returns a copy with the manually edited fields applied.
    pub fn with_patch(&self, patch: FieldPatch) -> ResumeData {
        let mut patched = self.clone();
        if let Some(name) = patch.name {
            patched.name = name;
        }
        if let Some(contact_info) = patch.contact_info {
            patched.contact_info = contact_info;
        }
        if let Some(summary) = patch.summary {
            patched.summary = summary;
        }
        if let Some(skills) = patch.skills {
            patched.skills = skills.into_lines();
        }
        patched
    }
}

/// Splits on the first `:` only, so `"Cloud: AWS: EC2"` keeps `"AWS: EC2"` as the body.
pub fn split_skill(skill: &str) -> SkillLine<'_> {
    match skill.split_once(':') {
        Some((category, items)) => SkillLine::Categorized {
            category: category.trim(),
            items: items.trim(),
        },
        None => SkillLine::Plain(skill.trim()),
    }
}

/// Manual correction of the header fields and skills. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Option<SkillsInput>,
}

/// Skills arrive either as a list or as the one-per-line text of an edit form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

impl SkillsInput {
    fn into_lines(self) -> Vec<String> {
        let lines: Vec<String> = match self {
            SkillsInput::List(items) => items,
            SkillsInput::Text(text) => text.lines().map(String::from).collect(),
        };
        lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResumeData {
        ResumeData {
            name: "Ada Lovelace".to_string(),
            contact_info: "ada@example.com | +44 20 0000 | | github.com/ada".to_string(),
            summary: "Engineer.".to_string(),
            experience: vec![WorkHistory {
                company: "Analytical Engines Ltd".to_string(),
                role: "Staff Engineer".to_string(),
                duration: "2019 - Present".to_string(),
                location: "London".to_string(),
                bullet_points: vec!["Built the difference engine runtime".to_string()],
            }],
            skills: vec!["Languages: Rust, Go".to_string()],
            ..ResumeData::default()
        }
    }

    #[test]
    fn test_display_title_uses_first_role() {
        assert_eq!(sample().display_title(), "Staff Engineer");
    }

    #[test]
    fn test_display_title_falls_back_to_candidate() {
        let mut data = sample();
        data.experience.clear();
        assert_eq!(data.display_title(), "Candidate");

        data.experience.push(WorkHistory::default());
        assert_eq!(data.display_title(), "Candidate");
    }

    #[test]
    fn test_contact_segments_trim_and_skip_empty() {
        assert_eq!(
            sample().contact_segments(),
            vec!["ada@example.com", "+44 20 0000", "github.com/ada"]
        );
    }

    #[test]
    fn test_split_skill_categorized() {
        assert_eq!(
            split_skill("Languages: Kotlin, Go"),
            SkillLine::Categorized {
                category: "Languages",
                items: "Kotlin, Go"
            }
        );
    }

    #[test]
    fn test_split_skill_plain_and_first_colon_only() {
        assert_eq!(split_skill("Docker"), SkillLine::Plain("Docker"));
        assert_eq!(
            split_skill("Cloud: AWS: EC2"),
            SkillLine::Categorized {
                category: "Cloud",
                items: "AWS: EC2"
            }
        );
    }

    #[test]
    fn test_deserialize_defaults_missing_sequences_and_ignores_unknown() {
        let json = r#"{"name": "Ada", "summary": "Hi", "favouriteColour": "green"}"#;
        let data: ResumeData = serde_json::from_str(json).unwrap();
        assert_eq!(data.name, "Ada");
        assert!(data.experience.is_empty());
        assert!(data.projects.is_empty());
        assert!(data.education.is_empty());
        assert!(data.skills.is_empty());
        assert_eq!(data.contact_info, "");
    }

    #[test]
    fn test_deserialize_camel_case_fields() {
        let json = r#"{
            "name": "Ada",
            "contactInfo": "a | b",
            "experience": [{"company": "X", "role": "Y", "bulletPoints": ["one"]}]
        }"#;
        let data: ResumeData = serde_json::from_str(json).unwrap();
        assert_eq!(data.contact_info, "a | b");
        assert_eq!(data.experience[0].bullet_points, vec!["one".to_string()]);
        assert_eq!(data.experience[0].location, "");
    }

    #[test]
    fn test_with_patch_only_touches_given_fields() {
        let original = sample();
        let patched = original.with_patch(FieldPatch {
            summary: Some("New summary".to_string()),
            skills: Some(SkillsInput::Text("Rust\n\n  Docker  \n".to_string())),
            ..FieldPatch::default()
        });

        assert_eq!(patched.summary, "New summary");
        assert_eq!(patched.skills, vec!["Rust".to_string(), "Docker".to_string()]);
        assert_eq!(patched.name, original.name);
        assert_eq!(patched.experience, original.experience);
        assert_eq!(original.summary, "Engineer.", "original must stay untouched");
    }

    #[test]
    fn test_field_patch_accepts_skill_list_or_text() {
        let list: FieldPatch = serde_json::from_str(r#"{"skills": ["Rust", " "]}"#).unwrap();
        let text: FieldPatch = serde_json::from_str(r#"{"skills": "Rust\nGo"}"#).unwrap();
        let data = ResumeData::default();
        assert_eq!(data.with_patch(list).skills, vec!["Rust".to_string()]);
        assert_eq!(
            data.with_patch(text).skills,
            vec!["Rust".to_string(), "Go".to_string()]
        );
    }
}
