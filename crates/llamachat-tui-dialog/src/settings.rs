//! Settings dialog for viewing and editing persisted preferences.
//!
//! The dialog loads a [`SettingsBuffer`] from its store once at construction,
//! edits it locally, and writes every field back only on save.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tracing::{debug, info, warn};

use llamachat_core::{Mode, SettingKey, SettingsBuffer, MODEL_OPTIONS};
use llamachat_storage::Storage;
use llamachat_tui_core::Theme;

use crate::common::{centered_rect, help_spans, hit};

/// Longest run of mask glyphs shown for a hidden secret.
const MAX_MASK_LEN: usize = 24;

/// Width of the label column.
const LABEL_WIDTH: usize = 27;

const CLOSE_ICON: &str = " [x] ";
const SAVE_BUTTON: &str = " Save Settings ";

/// Settings tab categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SettingsTab {
    #[default]
    General,
    Credentials,
}

impl SettingsTab {
    /// Get all tabs in order.
    pub fn all() -> &'static [SettingsTab] {
        &[SettingsTab::General, SettingsTab::Credentials]
    }

    /// Get the display name for this tab.
    pub fn name(&self) -> &'static str {
        match self {
            SettingsTab::General => "General",
            SettingsTab::Credentials => "Credentials",
        }
    }

    /// Fields shown on this tab, top to bottom.
    pub fn fields(&self) -> &'static [SettingKey] {
        match self {
            SettingsTab::General => &[SettingKey::Model, SettingKey::Mode, SettingKey::SystemPrompt],
            SettingsTab::Credentials => &[SettingKey::ApiToken, SettingKey::DbConnectionString],
        }
    }

    /// Get the next tab.
    pub fn next(&self) -> Self {
        match self {
            SettingsTab::General => SettingsTab::Credentials,
            SettingsTab::Credentials => SettingsTab::General,
        }
    }

    /// Get the previous tab.
    pub fn prev(&self) -> Self {
        // Two tabs: previous and next coincide.
        self.next()
    }
}

/// Result from settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsResult {
    /// All fields were written; the dialog should close.
    Saved,
    /// Dismissed without saving; the dialog should close.
    Closed,
    /// No action (dialog still open).
    None,
}

/// Screen regions recorded at render time for mouse hit-testing.
#[derive(Debug, Clone, Default)]
struct HitAreas {
    dialog: Rect,
    close: Rect,
    save: Rect,
    tabs: Vec<(SettingsTab, Rect)>,
    fields: Vec<Rect>,
}

/// Settings dialog over a [`Storage`].
pub struct SettingsDialog<S> {
    /// Backing store, read at construction and written on save.
    store: S,
    /// Loaded and edited values.
    buffer: SettingsBuffer,
    /// Current tab.
    tab: SettingsTab,
    /// Selected field index within current tab.
    selected: usize,
    /// Whether in edit mode for current field.
    editing: bool,
    /// Edit buffer for text values.
    edit_buffer: String,
    /// Cursor position in edit buffer, in chars.
    edit_cursor: usize,
    /// Dropdown index for select values.
    select_index: usize,
    /// Show credentials in clear text.
    reveal_secrets: bool,
    /// Last save failure, shown until the next save.
    error: Option<String>,
    /// List state for rendering.
    list_state: ListState,
    /// Regions from the last render.
    hit_areas: Option<HitAreas>,
}

impl<S: Storage> SettingsDialog<S> {
    /// Create a settings dialog, loading every field from `store`.
    pub fn new(store: S) -> Self {
        let buffer = SettingsBuffer::load(&store);
        debug!(mode = buffer.get(SettingKey::Mode), "Settings dialog opened");

        Self {
            store,
            buffer,
            tab: SettingsTab::General,
            selected: 0,
            editing: false,
            edit_buffer: String::new(),
            edit_cursor: 0,
            select_index: 0,
            reveal_secrets: false,
            error: None,
            list_state: ListState::default().with_selected(Some(0)),
            hit_areas: None,
        }
    }

    /// The edit buffer.
    pub fn buffer(&self) -> &SettingsBuffer {
        &self.buffer
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current tab.
    pub fn tab(&self) -> SettingsTab {
        self.tab
    }

    /// The focused field.
    pub fn focused(&self) -> SettingKey {
        let fields = self.tab.fields();
        fields[self.selected.min(fields.len() - 1)]
    }

    /// Whether a field is being edited.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Whether credentials are shown in clear text.
    pub fn secrets_revealed(&self) -> bool {
        self.reveal_secrets
    }

    /// The last save failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check if there are unsaved changes.
    pub fn has_changes(&self) -> bool {
        self.buffer.has_changes()
    }

    /// Theme for the mode currently in the buffer.
    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.buffer.get(SettingKey::Mode))
    }

    /// Switch the visible tab. Field values are untouched.
    pub fn select_tab(&mut self, tab: SettingsTab) {
        if self.editing {
            self.confirm_edit();
        }
        if tab != self.tab {
            debug!(tab = tab.name(), "Switched settings tab");
        }
        self.tab = tab;
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    /// Replace a field value in the buffer verbatim.
    pub fn set_field(&mut self, key: SettingKey, value: impl Into<String>) {
        self.buffer.set(key, value);
    }

    /// Write all fields to the store.
    ///
    /// An edit in progress is committed first. On failure the dialog stays
    /// open and shows which fields could not be written.
    pub fn save(&mut self) -> SettingsResult {
        if self.editing {
            self.confirm_edit();
        }

        match self.buffer.save(&self.store) {
            Ok(()) => {
                self.error = None;
                SettingsResult::Saved
            }
            Err(e) => {
                warn!(error = %e, "Settings save incomplete");
                self.error = Some(e.to_string());
                SettingsResult::None
            }
        }
    }

    /// Dismiss the dialog, discarding edits.
    pub fn close(&mut self) -> SettingsResult {
        if self.buffer.has_changes() {
            info!("Settings dialog closed with unsaved changes");
        }
        self.cancel_edit();
        SettingsResult::Closed
    }

    fn field_count(&self) -> usize {
        self.tab.fields().len()
    }

    fn select_next_field(&mut self) {
        if self.selected < self.field_count().saturating_sub(1) {
            self.selected += 1;
            self.list_state.select(Some(self.selected));
        }
    }

    fn select_prev_field(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.list_state.select(Some(self.selected));
        }
    }

    /// Start editing the focused field.
    fn start_edit(&mut self) {
        let key = self.focused();
        let current = self.buffer.get(key).to_string();

        match options(key) {
            Some(options) => {
                self.select_index = options.iter().position(|(v, _)| *v == current).unwrap_or(0);
            }
            None => {
                self.edit_cursor = current.chars().count();
                self.edit_buffer = current;
            }
        }
        self.editing = true;
    }

    /// Commit the current edit to the buffer.
    fn confirm_edit(&mut self) {
        let key = self.focused();
        match options(key) {
            Some(options) => {
                if let Some((value, _)) = options.get(self.select_index) {
                    self.buffer.set(key, *value);
                }
            }
            None => {
                self.buffer.set(key, std::mem::take(&mut self.edit_buffer));
            }
        }
        self.cancel_edit();
    }

    /// Cancel the current edit.
    fn cancel_edit(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
        self.edit_cursor = 0;
    }

    /// Cycle a select field without opening the dropdown.
    fn cycle_focused(&mut self, forward: bool) {
        let key = self.focused();
        if let Some(options) = options(key) {
            let next = cycle(&options, self.buffer.get(key), forward);
            self.buffer.set(key, next);
        }
    }

    fn insert_char(&mut self, c: char) {
        let at = byte_offset(&self.edit_buffer, self.edit_cursor);
        self.edit_buffer.insert(at, c);
        self.edit_cursor += 1;
    }

    /// Insert text at the cursor. Line breaks are normalized to `\n` and kept
    /// only in multi-line fields; other control characters are dropped.
    fn insert_text(&mut self, text: &str) {
        let multiline = is_multiline(self.focused());
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for c in text.chars() {
            let keep = match c {
                '\n' | '\t' => multiline,
                c => !c.is_control(),
            };
            if keep {
                self.insert_char(c);
            }
        }
    }

    /// Handle pasted text. Only applies while a text field is being edited.
    pub fn handle_paste(&mut self, text: &str) {
        if self.editing && options(self.focused()).is_none() {
            self.insert_text(text);
        }
    }

    /// Handle a key event. Returns a SettingsResult.
    pub fn handle_key(&mut self, key: KeyEvent) -> SettingsResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => return self.save(),
                KeyCode::Char('r') => {
                    self.reveal_secrets = !self.reveal_secrets;
                    return SettingsResult::None;
                }
                _ => {}
            }
        }

        if self.editing {
            if options(self.focused()).is_some() {
                self.handle_select_key(key);
            } else {
                self.handle_text_key(key);
            }
            return SettingsResult::None;
        }

        // Normal navigation mode
        match key.code {
            KeyCode::Esc => return self.close(),
            KeyCode::Tab => self.select_tab(self.tab.next()),
            KeyCode::BackTab => self.select_tab(self.tab.prev()),
            KeyCode::Char('1') => self.select_tab(SettingsTab::General),
            KeyCode::Char('2') => self.select_tab(SettingsTab::Credentials),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev_field(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_field(),
            KeyCode::Enter | KeyCode::Char(' ') => self.start_edit(),
            KeyCode::Char('s') => return self.save(),
            KeyCode::Char('r') => {
                let key = self.focused();
                self.buffer.reset(key);
            }
            KeyCode::Char('l') | KeyCode::Right => self.cycle_focused(true),
            KeyCode::Char('h') | KeyCode::Left => self.cycle_focused(false),
            _ => {}
        }

        SettingsResult::None
    }

    fn handle_select_key(&mut self, key: KeyEvent) {
        let count = options(self.focused()).map(|o| o.len()).unwrap_or(0);
        match key.code {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter => self.confirm_edit(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_index = self.select_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.select_index < count.saturating_sub(1) {
                    self.select_index += 1;
                }
            }
            _ => {}
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        let len = self.edit_buffer.chars().count();
        let newline = key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter if newline && is_multiline(self.focused()) => self.insert_char('\n'),
            KeyCode::Enter => self.confirm_edit(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c);
            }
            KeyCode::Backspace => {
                if self.edit_cursor > 0 {
                    self.edit_cursor -= 1;
                    let at = byte_offset(&self.edit_buffer, self.edit_cursor);
                    self.edit_buffer.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.edit_cursor < len {
                    let at = byte_offset(&self.edit_buffer, self.edit_cursor);
                    self.edit_buffer.remove(at);
                }
            }
            KeyCode::Left => self.edit_cursor = self.edit_cursor.saturating_sub(1),
            KeyCode::Right => self.edit_cursor = (self.edit_cursor + 1).min(len),
            KeyCode::Home => self.edit_cursor = 0,
            KeyCode::End => self.edit_cursor = len,
            _ => {}
        }
    }

    /// Handle a mouse event. Clicks are resolved against the last render.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> SettingsResult {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return SettingsResult::None;
        }
        let Some(areas) = self.hit_areas.clone() else {
            return SettingsResult::None;
        };
        let (col, row) = (mouse.column, mouse.row);

        if !hit(areas.dialog, col, row) || hit(areas.close, col, row) {
            return self.close();
        }
        if hit(areas.save, col, row) {
            return self.save();
        }
        if let Some((tab, _)) = areas.tabs.iter().find(|(_, r)| hit(*r, col, row)) {
            self.select_tab(*tab);
            return SettingsResult::None;
        }
        if let Some(idx) = areas.fields.iter().position(|r| hit(*r, col, row)) {
            if self.editing {
                self.confirm_edit();
            }
            if idx == self.selected {
                self.start_edit();
            } else {
                self.selected = idx;
                self.list_state.select(Some(idx));
            }
        }

        SettingsResult::None
    }

    /// Render the settings dialog.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme();

        // Backdrop
        frame.render_widget(Block::default().style(theme.backdrop_style()), area);

        let dialog_width = (u32::from(area.width) * 60 / 100).clamp(56, 80) as u16;
        let dialog_area = centered_rect(dialog_width, 18, area);

        frame.render_widget(Clear, dialog_area);

        let title = if self.buffer.has_changes() {
            " Settings * "
        } else {
            " Settings "
        };
        let block = Block::default()
            .title_top(Line::from(Span::styled(title, theme.bold())))
            .title_top(Line::from(Span::styled(CLOSE_ICON, theme.muted_style())).right_aligned())
            .borders(Borders::ALL)
            .border_style(theme.border_active_style())
            .style(theme.panel_style());

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Tabs
                Constraint::Min(3),    // Fields
                Constraint::Length(2), // Description
                Constraint::Length(1), // Error
                Constraint::Length(1), // Buttons
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let tabs = self.render_tabs(frame, chunks[0], &theme);
        let fields = self.render_fields(frame, chunks[1], &theme);
        self.render_description(frame, chunks[2], &theme);
        self.render_error(frame, chunks[3], &theme);
        let save = self.render_buttons(frame, chunks[4], &theme);
        self.render_help(frame, chunks[5], &theme);

        let close_width = CLOSE_ICON.len() as u16;
        self.hit_areas = Some(HitAreas {
            dialog: dialog_area,
            close: Rect::new(
                dialog_area.right().saturating_sub(close_width + 1),
                dialog_area.y,
                close_width,
                1,
            ),
            save,
            tabs,
            fields,
        });
    }

    /// Render the tab bar. Returns each tab's label region.
    fn render_tabs(&self, frame: &mut Frame, area: Rect, theme: &Theme) -> Vec<(SettingsTab, Rect)> {
        let mut spans = Vec::new();
        let mut regions = Vec::new();
        let mut x = area.x;

        for (i, tab) in SettingsTab::all().iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
                x = x.saturating_add(1).min(area.right());
            }
            let label = format!(" {} ", tab.name());
            let width = label.len() as u16;
            let style = if *tab == self.tab {
                Style::default()
                    .fg(theme.background_panel)
                    .bg(theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme.muted_style()
            };
            spans.push(Span::styled(label, style));
            regions.push((*tab, Rect::new(x, area.y, width.min(area.right().saturating_sub(x)), 1)));
            x = x.saturating_add(width).min(area.right());
        }

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style());
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

        regions
    }

    /// Render the fields of the current tab. Returns each row's region.
    fn render_fields(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) -> Vec<Rect> {
        let items: Vec<ListItem> = self
            .tab
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, key)| {
                let key = *key;
                let is_selected = idx == self.selected;
                let dirty = self.buffer.is_dirty(key);

                let label_style = if dirty {
                    theme.warning_style()
                } else {
                    theme.text_style()
                };
                let mut spans = vec![Span::styled(
                    format!("{:<width$}", key.label(), width = LABEL_WIDTH),
                    label_style,
                )];

                if is_selected && self.editing {
                    spans.extend(self.editing_spans(key, theme));
                } else {
                    spans.push(Span::styled(self.display_value(key), theme.muted_style()));
                }

                if dirty {
                    spans.push(Span::styled(" *", theme.warning_style()));
                }

                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.background_element)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.list_state);

        (0..self.field_count() as u16)
            .filter(|i| *i < area.height)
            .map(|i| Rect::new(area.x, area.y + i, area.width, 1))
            .collect()
    }

    fn editing_spans(&self, key: SettingKey, theme: &Theme) -> Vec<Span<'static>> {
        let active = Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD);

        if let Some(options) = options(key) {
            let label = options
                .get(self.select_index)
                .map(|(_, label)| *label)
                .unwrap_or_default();
            return vec![Span::styled(format!("▼ {label}"), active)];
        }

        let shown = if key.is_secret() && !self.reveal_secrets {
            "•".repeat(self.edit_buffer.chars().count())
        } else {
            single_line(&self.edit_buffer)
        };
        let split = byte_offset(&shown, self.edit_cursor);
        vec![
            Span::styled(shown[..split].to_string(), active),
            Span::styled(
                "│",
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::RAPID_BLINK),
            ),
            Span::styled(shown[split..].to_string(), active),
        ]
    }

    /// Display string for a field outside edit mode.
    fn display_value(&self, key: SettingKey) -> String {
        let value = self.buffer.get(key);

        if let Some(options) = options(key) {
            if let Some((_, label)) = options.iter().find(|(v, _)| *v == value) {
                return (*label).to_string();
            }
            // Stored values outside the option list are shown as-is.
            return value.to_string();
        }

        if value.is_empty() {
            "(not set)".to_string()
        } else if key.is_secret() && !self.reveal_secrets {
            "•".repeat(value.chars().count().min(MAX_MASK_LEN))
        } else {
            single_line(value)
        }
    }

    /// Render the description area.
    fn render_description(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style());

        let para = Paragraph::new(Span::styled(description(self.focused()), theme.muted_style()))
            .block(block)
            .wrap(Wrap { trim: true });

        frame.render_widget(para, area);
    }

    fn render_error(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Some(error) = &self.error {
            let line = Line::from(Span::styled(format!("✗ {error}"), theme.error_style()));
            frame.render_widget(Paragraph::new(line), area);
        }
    }

    /// Render the save button. Returns its region.
    fn render_buttons(&self, frame: &mut Frame, area: Rect, theme: &Theme) -> Rect {
        let width = (SAVE_BUTTON.len() as u16).min(area.width);
        let button_area = Rect::new(area.right() - width, area.y, width, area.height.min(1));

        let style = Style::default()
            .fg(theme.background_panel)
            .bg(theme.primary)
            .add_modifier(Modifier::BOLD);
        frame.render_widget(Paragraph::new(Span::styled(SAVE_BUTTON, style)), button_area);

        button_area
    }

    /// Render the help line.
    fn render_help(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let pairs: &[(&str, &str)] = if self.editing && is_multiline(self.focused()) {
            &[
                ("Enter", "confirm"),
                ("Alt+Enter", "newline"),
                ("Esc", "cancel"),
            ]
        } else if self.editing {
            &[("Enter", "confirm"), ("Esc", "cancel"), ("Ctrl+S", "save")]
        } else {
            &[
                ("Tab", "tabs"),
                ("j/k", "nav"),
                ("Enter", "edit"),
                ("h/l", "cycle"),
                ("r", "reset"),
                ("Ctrl+R", "reveal"),
                ("s", "save"),
                ("Esc", "close"),
            ]
        };

        let help = Paragraph::new(Line::from(help_spans(pairs, theme))).alignment(Alignment::Center);
        frame.render_widget(help, area);
    }
}

/// Choices for a select field: `(value, label)`. `None` for text fields.
fn options(key: SettingKey) -> Option<Vec<(&'static str, &'static str)>> {
    match key {
        SettingKey::Mode => Some(Mode::all().iter().map(|m| (m.as_str(), m.name())).collect()),
        SettingKey::Model => Some(MODEL_OPTIONS.to_vec()),
        SettingKey::SystemPrompt | SettingKey::ApiToken | SettingKey::DbConnectionString => None,
    }
}

/// Whether a text field keeps line breaks.
fn is_multiline(key: SettingKey) -> bool {
    key == SettingKey::SystemPrompt
}

/// One-row rendering of a value: line breaks become `⏎` and tabs a space.
/// Keeps one char per input char so cursor offsets still apply.
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\n' => '⏎',
            '\t' => ' ',
            c => c,
        })
        .collect()
}

/// The option after (or before) `current`. Unknown values go to the first
/// (or last) option.
fn cycle(options: &[(&'static str, &'static str)], current: &str, forward: bool) -> &'static str {
    if options.is_empty() {
        return "";
    }
    let last = options.len() - 1;
    let idx = match options.iter().position(|(v, _)| *v == current) {
        Some(idx) if forward => (idx + 1) % options.len(),
        Some(0) => last,
        Some(idx) => idx - 1,
        None if forward => 0,
        None => last,
    };
    options[idx].0
}

fn description(key: SettingKey) -> &'static str {
    match key {
        SettingKey::Mode => "Light or dark color scheme.",
        SettingKey::Model => "Groq model used for chat completions.",
        SettingKey::SystemPrompt => "Instructions sent at the start of every conversation.",
        SettingKey::ApiToken => "Token used to authenticate with the Groq API. Stored unencrypted.",
        SettingKey::DbConnectionString => {
            "MongoDB URI where chat history is kept. Stored unencrypted."
        }
    }
}

/// Byte offset of the `char_idx`-th char, or the end of `s`.
fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use llamachat_core::SettingsRecord;
    use llamachat_test_utils::RecordingStorage;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(dialog: &mut SettingsDialog<RecordingStorage>, text: &str) {
        for c in text.chars() {
            dialog.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn render(dialog: &mut SettingsDialog<RecordingStorage>) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                dialog.render(f, area);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn stored() -> RecordingStorage {
        RecordingStorage::new()
            .with_string("settings/mode", "light")
            .with_string("settings/model", "llama3-70b-8192")
            .with_string("settings/systemPrompt", "Be terse.")
            .with_string("settings/apiToken", "gsk_secret")
            .with_string("settings/dbConnectionString", "mongodb://db:27017")
    }

    #[test]
    fn test_tabs() {
        assert_eq!(SettingsTab::default(), SettingsTab::General);
        assert_eq!(SettingsTab::General.next(), SettingsTab::Credentials);
        assert_eq!(SettingsTab::Credentials.prev(), SettingsTab::General);

        let mut all: Vec<SettingKey> = SettingsTab::all()
            .iter()
            .flat_map(|t| t.fields().iter().copied())
            .collect();
        all.sort_by_key(|k| SettingKey::ALL.iter().position(|a| a == k));
        assert_eq!(all, SettingKey::ALL.to_vec());
    }

    #[test]
    fn test_cycle() {
        let opts = MODEL_OPTIONS;
        assert_eq!(cycle(opts, "llama3-8b-8192", true), "llama3-70b-8192");
        assert_eq!(cycle(opts, "llama3-70b-8192", true), "");
        assert_eq!(cycle(opts, "", false), "llama3-70b-8192");
        assert_eq!(cycle(opts, "mixtral", true), "");
        assert_eq!(cycle(opts, "mixtral", false), "llama3-70b-8192");
    }

    #[test]
    fn test_new_with_empty_store_uses_defaults() {
        let store = RecordingStorage::new();
        let dialog = SettingsDialog::new(store.clone());

        assert_eq!(dialog.buffer().record(), &SettingsRecord::default());
        assert_eq!(dialog.tab(), SettingsTab::General);
        assert_eq!(store.reads().len(), 5);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_new_loads_stored_values() {
        let dialog = SettingsDialog::new(stored());
        let record = dialog.buffer().record();

        assert_eq!(record.mode, "light");
        assert_eq!(record.model, "llama3-70b-8192");
        assert_eq!(record.system_prompt, "Be terse.");
        assert_eq!(record.api_token, "gsk_secret");
        assert_eq!(record.db_connection_string, "mongodb://db:27017");
        assert_eq!(dialog.theme().name, "light");
    }

    #[test]
    fn test_switching_tabs_keeps_values() {
        let store = stored();
        let mut dialog = SettingsDialog::new(store.clone());
        let before = dialog.buffer().record().clone();

        dialog.handle_key(key(KeyCode::Tab));
        assert_eq!(dialog.tab(), SettingsTab::Credentials);
        assert_eq!(dialog.focused(), SettingKey::ApiToken);
        dialog.handle_key(key(KeyCode::Char('1')));
        assert_eq!(dialog.tab(), SettingsTab::General);
        dialog.handle_key(key(KeyCode::Char('2')));
        dialog.handle_key(key(KeyCode::BackTab));
        assert_eq!(dialog.tab(), SettingsTab::General);

        assert_eq!(dialog.buffer().record(), &before);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_edit_text_field_changes_only_that_field() {
        let mut dialog = SettingsDialog::new(stored());
        let before = dialog.buffer().record().clone();

        dialog.handle_key(key(KeyCode::Down));
        dialog.handle_key(key(KeyCode::Down));
        assert_eq!(dialog.focused(), SettingKey::SystemPrompt);

        dialog.handle_key(key(KeyCode::Enter));
        assert!(dialog.is_editing());
        // Replace the trailing "." with "!"
        dialog.handle_key(key(KeyCode::Backspace));
        type_text(&mut dialog, "!");
        dialog.handle_key(key(KeyCode::Enter));

        assert!(!dialog.is_editing());
        assert_eq!(dialog.buffer().get(SettingKey::SystemPrompt), "Be terse!");
        for k in SettingKey::ALL {
            if k != SettingKey::SystemPrompt {
                assert_eq!(dialog.buffer().get(k), before.get(k));
            }
        }
        assert!(dialog.has_changes());
    }

    #[test]
    fn test_text_editing_cursor_moves() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        dialog.handle_key(key(KeyCode::Char('2')));
        dialog.handle_key(key(KeyCode::Enter));

        type_text(&mut dialog, "ab");
        dialog.handle_key(key(KeyCode::Home));
        type_text(&mut dialog, "é");
        dialog.handle_key(key(KeyCode::End));
        type_text(&mut dialog, "c");
        dialog.handle_key(key(KeyCode::Left));
        dialog.handle_key(key(KeyCode::Delete));
        dialog.handle_key(key(KeyCode::Enter));

        assert_eq!(dialog.buffer().get(SettingKey::ApiToken), "éab");
    }

    #[test]
    fn test_escape_cancels_edit_then_closes() {
        let store = RecordingStorage::new();
        let mut dialog = SettingsDialog::new(store.clone());
        dialog.handle_key(key(KeyCode::Char('2')));
        dialog.handle_key(key(KeyCode::Enter));
        type_text(&mut dialog, "gsk");

        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), SettingsResult::None);
        assert!(!dialog.is_editing());
        assert_eq!(dialog.buffer().get(SettingKey::ApiToken), "");

        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), SettingsResult::Closed);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_cycle_model_select() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        assert_eq!(dialog.focused(), SettingKey::Model);

        dialog.handle_key(key(KeyCode::Right));
        assert_eq!(dialog.buffer().get(SettingKey::Model), "llama3-70b-8192");
        dialog.handle_key(key(KeyCode::Right));
        assert_eq!(dialog.buffer().get(SettingKey::Model), "");
        dialog.handle_key(key(KeyCode::Char('h')));
        assert_eq!(dialog.buffer().get(SettingKey::Model), "llama3-70b-8192");
    }

    #[test]
    fn test_mode_dropdown_switches_theme() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        assert_eq!(dialog.theme().name, "dark");

        dialog.handle_key(key(KeyCode::Down));
        dialog.handle_key(key(KeyCode::Enter));
        dialog.handle_key(key(KeyCode::Up));
        dialog.handle_key(key(KeyCode::Enter));

        assert_eq!(dialog.buffer().get(SettingKey::Mode), "light");
        assert_eq!(dialog.theme().name, "light");
    }

    #[test]
    fn test_save_writes_every_field_once() {
        let store = RecordingStorage::new();
        let mut dialog = SettingsDialog::new(store.clone());
        dialog.handle_key(key(KeyCode::Char('2')));
        dialog.handle_key(key(KeyCode::Enter));
        type_text(&mut dialog, "gsk_new");
        dialog.handle_key(key(KeyCode::Enter));

        assert_eq!(dialog.handle_key(key(KeyCode::Char('s'))), SettingsResult::Saved);

        let writes = store.writes();
        assert_eq!(writes.len(), 5);
        let keys: Vec<&str> = writes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "settings/mode",
                "settings/model",
                "settings/systemPrompt",
                "settings/apiToken",
                "settings/dbConnectionString",
            ]
        );
        assert_eq!(store.last_written("settings/apiToken").as_deref(), Some("gsk_new"));
        assert_eq!(store.last_written("settings/mode").as_deref(), Some("dark"));
    }

    #[test]
    fn test_ctrl_s_commits_edit_in_progress() {
        let store = RecordingStorage::new();
        let mut dialog = SettingsDialog::new(store.clone());
        dialog.handle_key(key(KeyCode::Char('j')));
        dialog.handle_key(key(KeyCode::Char('j')));
        dialog.handle_key(key(KeyCode::Enter));
        type_text(&mut dialog, "Be kind");

        assert_eq!(dialog.handle_key(ctrl('s')), SettingsResult::Saved);
        assert_eq!(
            store.last_written("settings/systemPrompt").as_deref(),
            Some("Be kind")
        );
    }

    #[test]
    fn test_save_twice_writes_identical_sets() {
        let store = stored();
        let mut dialog = SettingsDialog::new(store.clone());

        assert_eq!(dialog.save(), SettingsResult::Saved);
        assert_eq!(dialog.save(), SettingsResult::Saved);

        let writes = store.writes();
        assert_eq!(writes.len(), 10);
        assert_eq!(writes[..5], writes[5..]);
    }

    #[test]
    fn test_save_failure_keeps_dialog_open() {
        let store = RecordingStorage::new().fail_writes_to("settings/model");
        let mut dialog = SettingsDialog::new(store.clone());

        assert_eq!(dialog.handle_key(key(KeyCode::Char('s'))), SettingsResult::None);

        assert_eq!(store.write_attempts(), 5);
        assert_eq!(store.writes().len(), 4);
        let error = dialog.error().unwrap();
        assert!(error.contains("Model"), "unexpected error: {error}");
        assert!(render(&mut dialog).contains("failed to save Model"));
    }

    #[test]
    fn test_unknown_stored_values_are_kept() {
        let store = RecordingStorage::new()
            .with_string("settings/mode", "sepia")
            .with_string("settings/model", "mixtral-8x7b-32768");
        let mut dialog = SettingsDialog::new(store.clone());

        let screen = render(&mut dialog);
        assert!(screen.contains("sepia"));
        assert!(screen.contains("mixtral-8x7b-32768"));
        assert_eq!(dialog.theme().name, "dark");

        dialog.save();
        assert_eq!(store.last_written("settings/mode").as_deref(), Some("sepia"));
        assert_eq!(
            store.last_written("settings/model").as_deref(),
            Some("mixtral-8x7b-32768")
        );
    }

    #[test]
    fn test_reset_focused_field() {
        let mut dialog = SettingsDialog::new(stored());
        dialog.handle_key(key(KeyCode::Right));
        assert!(dialog.has_changes());

        dialog.handle_key(key(KeyCode::Char('r')));
        assert_eq!(dialog.buffer().get(SettingKey::Model), "llama3-70b-8192");
        assert!(!dialog.has_changes());
    }

    #[test]
    fn test_paste_into_text_field() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        dialog.handle_paste("ignored");
        assert_eq!(dialog.buffer().record(), &SettingsRecord::default());

        dialog.select_tab(SettingsTab::Credentials);
        dialog.handle_key(key(KeyCode::Down));
        dialog.handle_key(key(KeyCode::Enter));
        dialog.handle_paste("mongodb://host\n");
        dialog.handle_key(key(KeyCode::Enter));

        assert_eq!(
            dialog.buffer().get(SettingKey::DbConnectionString),
            "mongodb://host"
        );
    }

    #[test]
    fn test_pasted_multiline_prompt_is_saved_verbatim() {
        let store = RecordingStorage::new();
        let mut dialog = SettingsDialog::new(store.clone());
        dialog.handle_key(key(KeyCode::Down));
        dialog.handle_key(key(KeyCode::Down));
        dialog.handle_key(key(KeyCode::Enter));

        dialog.handle_paste("You are helpful.\r\nAnswer briefly.\n\tCite sources.");
        assert_eq!(dialog.save(), SettingsResult::Saved);

        assert_eq!(
            store.last_written("settings/systemPrompt").as_deref(),
            Some("You are helpful.\nAnswer briefly.\n\tCite sources.")
        );
    }

    #[test]
    fn test_alt_enter_inserts_newline_in_prompt() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        dialog.handle_key(key(KeyCode::Char('j')));
        dialog.handle_key(key(KeyCode::Char('j')));
        dialog.handle_key(key(KeyCode::Enter));

        type_text(&mut dialog, "One");
        dialog.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        type_text(&mut dialog, "Two");
        dialog.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut dialog, "Three");
        assert!(dialog.is_editing());
        assert!(render(&mut dialog).contains("One⏎Two⏎Three"));

        dialog.handle_key(key(KeyCode::Enter));
        assert!(!dialog.is_editing());
        assert_eq!(dialog.buffer().get(SettingKey::SystemPrompt), "One\nTwo\nThree");
        assert!(render(&mut dialog).contains("One⏎Two⏎Three"));
    }

    #[test]
    fn test_alt_enter_confirms_single_line_field() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        dialog.handle_key(key(KeyCode::Char('2')));
        dialog.handle_key(key(KeyCode::Enter));
        type_text(&mut dialog, "gsk");

        dialog.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));

        assert!(!dialog.is_editing());
        assert_eq!(dialog.buffer().get(SettingKey::ApiToken), "gsk");
    }

    #[test]
    fn test_render_very_wide_terminal() {
        let mut dialog = SettingsDialog::new(stored());
        let mut terminal = Terminal::new(TestBackend::new(1100, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                dialog.render(f, area);
            })
            .unwrap();

        let areas = dialog.hit_areas.as_ref().unwrap();
        assert_eq!(areas.dialog.width, 80);
        assert_eq!(areas.dialog.x, (1100 - 80) / 2);
    }

    #[test]
    fn test_render_general_tab() {
        let mut dialog = SettingsDialog::new(stored());
        let screen = render(&mut dialog);

        assert!(screen.contains("Settings"));
        assert!(screen.contains("[x]"));
        assert!(screen.contains("General"));
        assert!(screen.contains("Credentials"));
        assert!(screen.contains("Llama3-70B-8192"));
        assert!(screen.contains("Light"));
        assert!(screen.contains("Be terse."));
        assert!(screen.contains("Save Settings"));
        assert!(!screen.contains("Groq API Token"));
    }

    #[test]
    fn test_render_masks_secrets_until_revealed() {
        let mut dialog = SettingsDialog::new(stored());
        dialog.select_tab(SettingsTab::Credentials);

        let screen = render(&mut dialog);
        assert!(screen.contains("Groq API Token"));
        assert!(screen.contains("MongoDB Connection String"));
        assert!(!screen.contains("gsk_secret"));
        assert!(screen.contains("••••••••••"));

        dialog.handle_key(ctrl('r'));
        assert!(dialog.secrets_revealed());
        let screen = render(&mut dialog);
        assert!(screen.contains("gsk_secret"));
        assert!(screen.contains("mongodb://db:27017"));
    }

    #[test]
    fn test_render_marks_dirty_fields() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        assert!(!render(&mut dialog).contains("Settings *"));

        dialog.set_field(SettingKey::SystemPrompt, "Hi");
        assert!(render(&mut dialog).contains("Settings *"));
    }

    #[test]
    fn test_mouse_ignored_before_render() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        assert_eq!(dialog.handle_mouse(click(0, 0)), SettingsResult::None);
    }

    #[test]
    fn test_backdrop_click_closes_without_writes() {
        let store = RecordingStorage::new();
        let mut dialog = SettingsDialog::new(store.clone());
        dialog.set_field(SettingKey::Model, "llama3-70b-8192");
        render(&mut dialog);

        assert_eq!(dialog.handle_mouse(click(0, 0)), SettingsResult::Closed);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_close_icon_click_closes() {
        let store = RecordingStorage::new();
        let mut dialog = SettingsDialog::new(store.clone());
        render(&mut dialog);

        let close = dialog.hit_areas.as_ref().unwrap().close;
        assert_eq!(dialog.handle_mouse(click(close.x + 2, close.y)), SettingsResult::Closed);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_tab_click_switches_tab() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        render(&mut dialog);

        let (tab, rect) = dialog.hit_areas.as_ref().unwrap().tabs[1];
        assert_eq!(tab, SettingsTab::Credentials);
        assert_eq!(dialog.handle_mouse(click(rect.x + 1, rect.y)), SettingsResult::None);
        assert_eq!(dialog.tab(), SettingsTab::Credentials);
    }

    #[test]
    fn test_save_button_click_saves() {
        let store = RecordingStorage::new();
        let mut dialog = SettingsDialog::new(store.clone());
        render(&mut dialog);

        let save = dialog.hit_areas.as_ref().unwrap().save;
        assert_eq!(dialog.handle_mouse(click(save.x + 1, save.y)), SettingsResult::Saved);
        assert_eq!(store.writes().len(), 5);
    }

    #[test]
    fn test_field_click_focuses_then_edits() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        render(&mut dialog);

        let row = dialog.hit_areas.as_ref().unwrap().fields[2];
        dialog.handle_mouse(click(row.x + 3, row.y));
        assert_eq!(dialog.focused(), SettingKey::SystemPrompt);
        assert!(!dialog.is_editing());

        dialog.handle_mouse(click(row.x + 3, row.y));
        assert!(dialog.is_editing());
    }

    #[test]
    fn test_right_click_is_ignored() {
        let mut dialog = SettingsDialog::new(RecordingStorage::new());
        render(&mut dialog);

        let event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(dialog.handle_mouse(event), SettingsResult::None);
    }
}
