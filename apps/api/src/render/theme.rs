//! Visual theme table for the single-column layout.
//!
//! One row per style. Adding a style means adding a row here; the body generator
//! only ever references the CSS variables emitted by `Theme::css_variables`.

use std::fmt;

use crate::render::StyleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAlignment {
    Left,
    Center,
}

impl fmt::Display for HeaderAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderAlignment::Left => f.write_str("left"),
            HeaderAlignment::Center => f.write_str("center"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    Px(u8),
    Pt(u8),
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSize::Px(n) => write!(f, "{n}px"),
            FontSize::Pt(n) => write!(f, "{n}pt"),
        }
    }
}

/// Section divider rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width_px: u8,
    pub color: &'static str,
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px solid {}", self.width_px, self.color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub style: StyleId,
    /// Full CSS font stack; always ends in a generic family so an unreachable
    /// web font degrades to a local one.
    pub font_family: &'static str,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub base_font_size: FontSize,
    pub header_alignment: HeaderAlignment,
    pub border: Border,
    pub page_margin_mm: u8,
    pub line_height: f32,
    pub web_font_url: &'static str,
}

const INTER_URL: &str =
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;600;700&display=swap";

pub const THEMES: &[Theme] = &[
    Theme {
        style: StyleId::Classic,
        font_family: "'Merriweather', serif",
        primary_color: "#000",
        secondary_color: "#333",
        base_font_size: FontSize::Px(11),
        header_alignment: HeaderAlignment::Center,
        border: Border {
            width_px: 1,
            color: "#000",
        },
        page_margin_mm: 15,
        line_height: 1.4,
        web_font_url: "https://fonts.googleapis.com/css2?family=Merriweather:ital,wght@0,300;0,400;0,700;1,300&display=swap",
    },
    Theme {
        style: StyleId::TechMinimal,
        font_family: "'Inter', sans-serif",
        primary_color: "#000",
        secondary_color: "#222",
        base_font_size: FontSize::Pt(10),
        header_alignment: HeaderAlignment::Left,
        border: Border {
            width_px: 1,
            color: "#999",
        },
        page_margin_mm: 10,
        line_height: 1.28,
        web_font_url: INTER_URL,
    },
    Theme {
        style: StyleId::Creative,
        font_family: "'Lato', sans-serif",
        primary_color: "#7c3aed",
        secondary_color: "#4b5563",
        base_font_size: FontSize::Px(11),
        header_alignment: HeaderAlignment::Left,
        border: Border {
            width_px: 2,
            color: "#7c3aed",
        },
        page_margin_mm: 15,
        line_height: 1.4,
        web_font_url: "https://fonts.googleapis.com/css2?family=Lato:wght@300;400;700&display=swap",
    },
    Theme {
        style: StyleId::Compact,
        font_family: "'Inter', sans-serif",
        primary_color: "#000",
        secondary_color: "#222",
        base_font_size: FontSize::Px(10),
        header_alignment: HeaderAlignment::Center,
        border: Border {
            width_px: 1,
            color: "#ccc",
        },
        page_margin_mm: 8,
        line_height: 1.25,
        web_font_url: INTER_URL,
    },
    Theme {
        style: StyleId::Executive,
        font_family: "'Playfair Display', Georgia, serif",
        primary_color: "#1a1a1a",
        secondary_color: "#444",
        base_font_size: FontSize::Pt(11),
        header_alignment: HeaderAlignment::Center,
        border: Border {
            width_px: 2,
            color: "#000",
        },
        page_margin_mm: 18,
        line_height: 1.5,
        web_font_url: "https://fonts.googleapis.com/css2?family=Playfair+Display:wght@400;700&display=swap",
    },
];

/// Looks up the single-column theme row. `None` means the style has its own layout.
pub fn theme_for(style: StyleId) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.style == style)
}

impl Theme {
    /// The `:root` variable block. Emitted once per document. The page margin
    /// is not among them: `@page` does not resolve `var()`.
    pub fn css_variables(&self) -> String {
        format!(
            ":root {{ --font-main: {}; --color-primary: {}; --color-sec: {}; \
             --font-size-base: {}; --header-align: {}; --border-style: {}; \
             --line-height: {}; }}\n",
            self.font_family,
            self.primary_color,
            self.secondary_color,
            self.base_font_size,
            self.header_alignment,
            self.border,
            self.line_height,
        )
    }
}
