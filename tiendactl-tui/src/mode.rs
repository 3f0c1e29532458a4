use ratatui::style::Color;

/// Input modes (vim-inspired)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigate rows and tabs, trigger actions
    Normal,

    /// Type into the record fields
    Edit,

    /// Type into the filter box
    Filter,
}

impl Mode {
    /// Get display name for status bar
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Edit => "EDIT",
            Mode::Filter => "FILTER",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Mode::Normal => Color::Cyan,
            Mode::Edit => Color::Green,
            Mode::Filter => Color::Magenta,
        }
    }

    /// Keybind hints for the status bar
    pub fn hints(&self) -> &'static str {
        match self {
            Mode::Normal => {
                "j/k:rows  1-5/Tab:tabs  i:edit  /:filter  s:save  u:update  d:delete  c:clear  r:refresh  ?:help  q:quit"
            }
            Mode::Edit => "Tab/Enter:next field  Shift-Tab:prev  Esc:done",
            Mode::Filter => "Enter:apply  Esc:cancel",
        }
    }
}
