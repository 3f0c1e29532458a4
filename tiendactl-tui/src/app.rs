use std::collections::VecDeque;

use tiendactl_core::{EntityKind, EntityPanel, Notice};

use crate::mode::Mode;

pub const HELP_TEXT: &str = "\
Normal mode
  j / Down       next row (loads it into the fields)
  k / Up         previous row
  1-5            switch tab
  Tab/Shift-Tab  next / previous tab
  i / Enter      edit fields
  /              edit filter
  s              save fields as a new record
  u              update the selected record
  d              delete the selected record
  c              clear fields and selection
  r              reload all records
  q / Ctrl-C     quit

Edit mode
  Tab / Enter    next field
  Shift-Tab      previous field
  Esc            back to normal mode

Filter mode
  Enter          apply (empty shows everything)
  Esc            back without applying";

/// Main application state
pub struct App {
    /// One panel per entity, in tab order
    pub panels: Vec<EntityPanel>,

    /// Index of the visible tab
    pub active: usize,

    pub mode: Mode,

    /// Pending notices, shown one at a time
    pub notices: VecDeque<Notice>,

    /// Help overlay text (None = hidden)
    pub help_text: Option<&'static str>,

    /// Database target shown in the header
    pub target: String,
}

impl App {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            panels: EntityKind::ALL.into_iter().map(EntityPanel::new).collect(),
            active: 0,
            mode: Mode::Normal,
            notices: VecDeque::new(),
            help_text: None,
            target: target.into(),
        }
    }

    pub fn active_panel(&self) -> &EntityPanel {
        &self.panels[self.active]
    }

    pub fn active_panel_mut(&mut self) -> &mut EntityPanel {
        &mut self.panels[self.active]
    }

    /// Switch to a tab by index; false if out of range
    pub fn switch_tab(&mut self, index: usize) -> bool {
        if index >= self.panels.len() {
            return false;
        }
        self.active = index;
        self.mode = Mode::Normal;
        true
    }

    pub fn next_tab(&mut self) {
        self.switch_tab((self.active + 1) % self.panels.len());
    }

    pub fn prev_tab(&mut self) {
        let len = self.panels.len();
        self.switch_tab((self.active + len - 1) % len);
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// Notice currently displayed as a modal
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    /// Whether a modal is covering the screen
    pub fn has_overlay(&self) -> bool {
        self.help_text.is_some() || !self.notices.is_empty()
    }

    /// Close whichever overlay is on top
    pub fn dismiss_overlay(&mut self) {
        if self.help_text.take().is_none() {
            self.dismiss_notice();
        }
    }

    pub fn show_help(&mut self) {
        self.help_text = Some(HELP_TEXT);
    }
}
