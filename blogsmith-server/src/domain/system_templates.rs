use serde_json::{Map, Value};

use crate::domain::template::{NewTemplate, TemplateStyle};

/// A built-in template, seeded into an empty template table at start-up.
#[derive(Debug, Clone, Copy)]
pub struct SystemTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub font_family: &'static str,
    pub background: &'static str,
    pub border: &'static str,
    pub border_radius: &'static str,
    pub color: &'static str,
}

impl SystemTemplate {
    pub fn to_new_template(&self) -> NewTemplate {
        let mut extra = Map::new();
        extra.insert(
            "borderRadius".to_string(),
            Value::String(self.border_radius.to_string()),
        );
        NewTemplate {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            style: TemplateStyle {
                font_family: Some(self.font_family.to_string()),
                background: Some(self.background.to_string()),
                border: Some(self.border.to_string()),
                color: Some(self.color.to_string()),
                extra,
            },
            preview_image: Some(String::new()),
        }
    }
}

pub static SYSTEM_TEMPLATES: &[SystemTemplate] = &[
    SystemTemplate {
        name: "Modern Glass",
        description: "Glassmorphism, rounded, blue accent, sans-serif",
        font_family: "Inter, sans-serif",
        background: "linear-gradient(135deg,#f0f4ff 0%,#f9e6ff 100%)",
        border: "2px solid #2563eb",
        border_radius: "1.5rem",
        color: "#18181b",
    },
    SystemTemplate {
        name: "Classic News",
        description: "Serif, white background, subtle border",
        font_family: "Merriweather, serif",
        background: "#fff",
        border: "1px solid #d1d5db",
        border_radius: "1.5rem",
        color: "#22223b",
    },
    SystemTemplate {
        name: "Minimal Dark",
        description: "Dark, mono font, no border",
        font_family: "Inconsolata, monospace",
        background: "linear-gradient(135deg,#232526 0%,#414345 100%)",
        border: "none",
        border_radius: "1.5rem",
        color: "#f8fafc",
    },
    SystemTemplate {
        name: "Sunset Card",
        description: "Warm gradient, rounded, bold headline",
        font_family: "Poppins, sans-serif",
        background: "linear-gradient(135deg,#ffecd2 0%,#fcb69f 100%)",
        border: "2px solid #f59e42",
        border_radius: "2rem",
        color: "#3d2c29",
    },
    SystemTemplate {
        name: "Emerald Note",
        description: "Green gradient, soft border, clean sans",
        font_family: "Nunito, sans-serif",
        background: "linear-gradient(135deg,#a8ff78 0%,#78ffd6 100%)",
        border: "2px solid #34d399",
        border_radius: "1.25rem",
        color: "#065f46",
    },
    SystemTemplate {
        name: "Royal Purple",
        description: "Purple gradient, elegant serif, white text",
        font_family: "Playfair Display, serif",
        background: "linear-gradient(135deg,#a18cd1 0%,#fbc2eb 100%)",
        border: "2px solid #a78bfa",
        border_radius: "1.5rem",
        color: "#fff",
    },
    SystemTemplate {
        name: "Oceanic",
        description: "Blue-green, modern, clean sans-serif",
        font_family: "Montserrat, sans-serif",
        background: "linear-gradient(135deg,#43cea2 0%,#185a9d 100%)",
        border: "2px solid #2563eb",
        border_radius: "1.5rem",
        color: "#f8fafc",
    },
    SystemTemplate {
        name: "Paper Sheet",
        description: "Paper white, subtle shadow, classic",
        font_family: "Georgia, serif",
        background: "#f9fafb",
        border: "1px solid #e5e7eb",
        border_radius: "0.75rem",
        color: "#22223b",
    },
    SystemTemplate {
        name: "Cyber Night",
        description: "Dark, neon border, futuristic mono",
        font_family: "Fira Mono, monospace",
        background: "linear-gradient(135deg,#232526 0%,#0f2027 100%)",
        border: "2px solid #0ff",
        border_radius: "1.5rem",
        color: "#e0e0e0",
    },
    SystemTemplate {
        name: "Peachy",
        description: "Peach gradient, soft border, playful",
        font_family: "Quicksand, sans-serif",
        background: "linear-gradient(135deg,#ffecd2 0%,#fcb69f 100%)",
        border: "2px solid #fbbf24",
        border_radius: "2rem",
        color: "#78350f",
    },
    SystemTemplate {
        name: "Slate Minimal",
        description: "Slate gray, minimal, mono font",
        font_family: "Source Code Pro, monospace",
        background: "#f1f5f9",
        border: "1px solid #64748b",
        border_radius: "1rem",
        color: "#334155",
    },
    SystemTemplate {
        name: "Sunrise",
        description: "Bright yellow-orange, rounded, bold",
        font_family: "Lato, sans-serif",
        background: "linear-gradient(135deg,#f7971e 0%,#ffd200 100%)",
        border: "2px solid #f59e42",
        border_radius: "2rem",
        color: "#78350f",
    },
    SystemTemplate {
        name: "Aqua Card",
        description: "Aqua gradient, clean, modern",
        font_family: "Open Sans, sans-serif",
        background: "linear-gradient(135deg,#43e97b 0%,#38f9d7 100%)",
        border: "2px solid #06b6d4",
        border_radius: "1.5rem",
        color: "#134e4a",
    },
    SystemTemplate {
        name: "Rose Elegant",
        description: "Rose gradient, elegant serif, white text",
        font_family: "PT Serif, serif",
        background: "linear-gradient(135deg,#f857a6 0%,#ff5858 100%)",
        border: "2px solid #f472b6",
        border_radius: "1.5rem",
        color: "#fff",
    },
];
