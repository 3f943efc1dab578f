//! Presentational widgets.
//!
//! Everything here renders its props with the active [`Palette`] and keeps
//! no state between frames. `TextInput` owns its text because it is edited
//! in place by the pages, but drawing it goes through [`TextInputView`].

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};
use thiserror::Error;

use crate::model::{ProjectMemberRole, ProjectStatus};
use crate::theme::Palette;

// ---------------------------------------------------------------------------
// Text input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Url,
    Phone,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{0} is required")]
    Required(String),

    #[error("{label} must be at most {max} characters")]
    TooLong { label: String, max: usize },

    #[error("{label}: {reason}")]
    Invalid { label: String, reason: &'static str },
}

#[derive(Debug, Clone)]
pub struct TextInput {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub kind: InputKind,
    pub max_len: usize,
    pub required: bool,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            placeholder: String::new(),
            kind: InputKind::Text,
            max_len: 120,
            required: false,
        }
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Replace the value, cut to `max_len` characters
    #[cfg(test)]
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.max_len).collect();
    }

    /// Append a character; returns false when the input is full
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.value.chars().count() >= self.max_len {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn pop(&mut self) -> Option<char> {
        self.value.pop()
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Trimmed value, `None` when blank
    pub fn trimmed(&self) -> Option<&str> {
        Some(self.value.trim()).filter(|v| !v.is_empty())
    }

    pub fn validate(&self) -> Result<(), InputError> {
        let value = match self.trimmed() {
            Some(v) => v,
            None if self.required => return Err(InputError::Required(self.label.clone())),
            None => return Ok(()),
        };

        if value.chars().count() > self.max_len {
            return Err(InputError::TooLong {
                label: self.label.clone(),
                max: self.max_len,
            });
        }

        let reason = match self.kind {
            InputKind::Text => None,
            InputKind::Email => {
                let ok = value
                    .split_once('@')
                    .map(|(user, host)| !user.is_empty() && host.contains('.') && !host.ends_with('.'))
                    .unwrap_or(false);
                (!ok || value.contains(char::is_whitespace)).then_some("not a valid email address")
            }
            InputKind::Url => {
                let ok = value.starts_with("http://") || value.starts_with("https://");
                (!ok || value.contains(char::is_whitespace)).then_some("must start with http:// or https://")
            }
            InputKind::Phone => {
                let digits = value.chars().filter(char::is_ascii_digit).count();
                let allowed = value
                    .chars()
                    .all(|c| c.is_ascii_digit() || " +-().".contains(c));
                (!allowed || digits < 5).then_some("not a valid phone number")
            }
        };

        match reason {
            Some(reason) => Err(InputError::Invalid {
                label: self.label.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

pub struct TextInputView<'a> {
    pub input: &'a TextInput,
    pub palette: &'a Palette,
    pub focused: bool,
}

impl Widget for TextInputView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let border = if self.focused { p.accent } else { p.inactive };
        let mut title = format!(" {} ", self.input.label);
        if self.input.required {
            title.push_str("* ");
        }

        let block = Block::default()
            .title(Span::styled(title, Style::default().fg(border)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        let mut spans = if self.input.value.is_empty() {
            vec![Span::styled(
                self.input.placeholder.as_str(),
                Style::default().fg(p.text_dim).add_modifier(Modifier::ITALIC),
            )]
        } else {
            vec![Span::styled(self.input.value.as_str(), Style::default().fg(p.text))]
        };
        if self.focused {
            spans.push(Span::styled("▏", Style::default().fg(p.accent)));
        }

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct Loader<'a> {
    pub label: &'a str,
    pub tick: usize,
    pub palette: &'a Palette,
}

impl Loader<'_> {
    pub fn frame(tick: usize) -> &'static str {
        SPINNER[tick % SPINNER.len()]
    }
}

impl Widget for Loader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(Self::frame(self.tick), Style::default().fg(self.palette.accent)),
            Span::styled(format!(" {}", self.label), Style::default().fg(self.palette.text_dim)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

// ---------------------------------------------------------------------------
// Progress bar
// ---------------------------------------------------------------------------

/// Clamp to 0..=100; NaN counts as 0
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

pub struct ProgressBar<'a> {
    pub label: &'a str,
    pub percent: f64,
    pub palette: &'a Palette,
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let percent = clamp_percent(self.percent);
        let color = if percent >= 100.0 {
            self.palette.success
        } else {
            self.palette.accent
        };
        let label = if self.label.is_empty() {
            format!("{:.0}%", percent)
        } else {
            format!("{} {:.0}%", self.label, percent)
        };

        Gauge::default()
            .ratio(percent / 100.0)
            .label(Span::styled(label, Style::default().fg(self.palette.text)))
            .gauge_style(Style::default().fg(color).bg(self.palette.bg_selected))
            .render(area, buf);
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Accent,
    Success,
    Warning,
    Danger,
}

impl From<ProjectStatus> for Tone {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Forming => Tone::Accent,
            ProjectStatus::Active => Tone::Success,
            ProjectStatus::Paused => Tone::Warning,
            ProjectStatus::Completed => Tone::Neutral,
            ProjectStatus::Archived => Tone::Neutral,
        }
    }
}

impl From<ProjectMemberRole> for Tone {
    fn from(role: ProjectMemberRole) -> Self {
        match role {
            ProjectMemberRole::Owner => Tone::Accent,
            ProjectMemberRole::Admin => Tone::Success,
            ProjectMemberRole::Member => Tone::Neutral,
            ProjectMemberRole::Pending | ProjectMemberRole::Invited => Tone::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    pub text: &'a str,
    pub tone: Tone,
}

impl<'a> Tag<'a> {
    pub fn new(text: &'a str, tone: Tone) -> Self {
        Self { text, tone }
    }

    pub fn span(&self, palette: &Palette) -> Span<'a> {
        let color = match self.tone {
            Tone::Neutral => palette.text_dim,
            Tone::Accent => palette.accent_bright,
            Tone::Success => palette.success,
            Tone::Warning => palette.warning,
            Tone::Danger => palette.danger,
        };
        Span::styled(format!("[{}]", self.text), Style::default().fg(color))
    }
}

/// Tags separated by single spaces
pub fn tag_line<'a>(tags: impl IntoIterator<Item = Tag<'a>>, palette: &Palette) -> Line<'a> {
    let mut spans = Vec::new();
    for tag in tags {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(tag.span(palette));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Typography
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
pub struct Typography<'p> {
    palette: &'p Palette,
}

impl<'p> Typography<'p> {
    pub fn new(palette: &'p Palette) -> Self {
        Self { palette }
    }

    pub fn heading<'a>(&self, text: impl Into<std::borrow::Cow<'a, str>>) -> Span<'a> {
        Span::styled(
            text,
            Style::default()
                .fg(self.palette.header)
                .add_modifier(Modifier::BOLD),
        )
    }

    pub fn subheading<'a>(&self, text: impl Into<std::borrow::Cow<'a, str>>) -> Span<'a> {
        Span::styled(text, Style::default().fg(self.palette.accent))
    }

    pub fn body<'a>(&self, text: impl Into<std::borrow::Cow<'a, str>>) -> Span<'a> {
        Span::styled(text, Style::default().fg(self.palette.text))
    }

    pub fn caption<'a>(&self, text: impl Into<std::borrow::Cow<'a, str>>) -> Span<'a> {
        Span::styled(
            text,
            Style::default()
                .fg(self.palette.text_dim)
                .add_modifier(Modifier::ITALIC),
        )
    }
}
