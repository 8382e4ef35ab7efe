//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Mocha Theme Color Palette
//!
//! Colors are from the official Catppuccin theme specification:
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const RED: Color = Color::Rgb(243, 139, 168); // Red
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

pub fn base_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

pub fn input_border_style() -> Style {
    Style::default().fg(CYAN)
}

pub fn placeholder_style() -> Style {
    Style::default().fg(COMMENT).add_modifier(Modifier::ITALIC)
}

pub fn results_border_style() -> Style {
    Style::default().fg(PURPLE)
}

pub fn index_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn loading_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(RED)
}

pub fn hint_style() -> Style {
    Style::default().fg(COMMENT).bg(CURRENT_LINE)
}
