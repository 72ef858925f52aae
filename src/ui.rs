use crate::api::{HttpPostApi, PostApi};
use crate::manager::PostManager;
use crate::model::{Post, PostError};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::Duration;

pub fn run(manager: PostManager<HttpPostApi>, initial_error: Option<PostError>) -> Result<()> {
    let server = manager.api().base().to_string();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(manager, server);
    if let Some(err) = initial_error {
        app.status = failure_message("Loading posts", &err);
    }
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App<A> {
    manager: PostManager<A>,
    server: String,
    cursor: usize,
    list_offset: usize,
    focus: Focus,
    form: PostForm,
    search: FieldValue,
    status: String,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Focus {
    List,
    Form,
    Search,
}

struct PostForm {
    title: FieldValue,
    description: FieldValue,
    field: FormField,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum FormField {
    Title,
    Description,
}

#[derive(Clone)]
struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_char(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_char(self.cursor, &self.value);
    }

    fn move_up(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx == 0 {
            return;
        }
        let target_start = line_starts[line_idx - 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    fn move_down(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx + 1 >= line_starts.len() {
            return;
        }
        let target_start = line_starts[line_idx + 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }

    /// Line-editing keys shared by every input. Returns false if the key was not handled.
    fn edit(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(c)
            }
            _ => return false,
        }
        true
    }
}

impl<A: PostApi> App<A> {
    fn new(manager: PostManager<A>, server: String) -> Self {
        let status = format!("Loaded {} post(s) from {}", manager.items().len(), server);
        App {
            manager,
            server,
            cursor: 0,
            list_offset: 0,
            focus: Focus::List,
            form: PostForm::new(),
            search: FieldValue::new(""),
            status,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.focus {
            Focus::List => return self.handle_list_key(key),
            Focus::Form => self.handle_form_key(key),
            Focus::Search => self.handle_search_key(key),
        }
        false
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.manager.items().len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('n') | KeyCode::Tab => {
                self.focus = Focus::Form;
                self.status = if self.manager.state().is_editing() {
                    "Editing (Ctrl+S save, Esc cancel)".into()
                } else {
                    "Creating new post (Tab switch field, Ctrl+S save, Esc back)".into()
                };
            }
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                self.status = "Search by title (Enter search, Esc back)".into();
            }
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('r') => match self.manager.fetch_all() {
                Ok(()) => {
                    self.clamp_cursor();
                    self.status = format!("Reloaded {} post(s)", self.manager.items().len());
                }
                Err(err) => self.status = failure_message("Reload", &err),
            },
            KeyCode::Esc if self.manager.state().is_editing() => self.cancel_edit(),
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                if self.manager.state().is_editing() {
                    self.cancel_edit();
                } else {
                    self.status = "Back to list".into();
                }
                self.focus = Focus::List;
            }
            KeyCode::Tab | KeyCode::BackTab => self.form.toggle_field(),
            KeyCode::Char('s') if control => self.submit(),
            KeyCode::Enter if control => self.submit(),
            KeyCode::Enter => match self.form.field {
                FormField::Title => self.form.field = FormField::Description,
                FormField::Description => {
                    self.form.description.insert_char('\n');
                    self.push_inputs();
                }
            },
            _ => {
                if self.form.active_field_mut().edit(key) {
                    self.push_inputs();
                }
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::List;
                self.status = "Back to list".into();
            }
            KeyCode::Enter => {
                let query = self.search.value.clone();
                match self.manager.search(&query) {
                    Ok(()) => {
                        self.cursor = 0;
                        self.focus = Focus::List;
                        self.status = format!(
                            "{} result(s) for \"{}\"",
                            self.manager.items().len(),
                            query
                        );
                    }
                    Err(err) => self.status = failure_message("Search", &err),
                }
            }
            _ => {
                if self.search.edit(key) {
                    self.manager.set_search_query(self.search.value.clone());
                }
            }
        }
    }

    fn begin_edit(&mut self) {
        let Some(id) = self.selected_post().map(|p| p.id.clone()) else {
            self.status = "No post selected to edit".into();
            return;
        };
        match self.manager.begin_edit(&id) {
            Ok(()) => {
                self.pull_inputs();
                self.focus = Focus::Form;
                self.status = format!("Editing {} (Ctrl+S save, Esc cancel)", id);
            }
            Err(err) => self.status = failure_message("Edit", &err),
        }
    }

    fn cancel_edit(&mut self) {
        self.manager.cancel_edit();
        self.pull_inputs();
        self.status = "Edit canceled".into();
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_post().map(|p| p.id.clone()) else {
            self.status = "No post selected to delete".into();
            return;
        };
        match self.manager.delete(&id) {
            Ok(()) => {
                self.clamp_cursor();
                self.status = format!("Deleted {}", id);
            }
            Err(err) => self.status = failure_message("Delete", &err),
        }
    }

    fn submit(&mut self) {
        self.push_inputs();
        let editing = self.manager.state().is_editing();
        match self.manager.submit() {
            Ok(post) => {
                self.pull_inputs();
                self.clamp_cursor();
                self.focus = Focus::List;
                self.status = if editing {
                    format!("Updated {}", post.id)
                } else {
                    format!("Created {}", post.id)
                };
            }
            Err(err) => {
                let action = if editing { "Update" } else { "Create" };
                self.status = failure_message(action, &err);
            }
        }
    }

    fn push_inputs(&mut self) {
        self.manager
            .set_title_input(self.form.title.value.clone());
        self.manager
            .set_description_input(self.form.description.value.clone());
    }

    fn pull_inputs(&mut self) {
        let state = self.manager.state();
        self.form = PostForm::from_inputs(&state.title_input, &state.description_input);
    }

    fn selected_post(&self) -> Option<&Post> {
        self.manager.items().get(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        let len = self.manager.items().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(layout[1]);
        self.draw_form(f, body[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(body[1]);
        self.draw_search(f, right[0]);
        self.draw_list(f, right[1]);

        self.draw_footer(f, layout[2]);
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let synced = self
            .manager
            .synced_at()
            .map(|t| format!("synced {}", t.with_timezone(&Local).format("%H:%M:%S")))
            .unwrap_or_else(|| "not synced".into());
        let mode = if self.manager.state().is_editing() {
            "edit"
        } else {
            "create"
        };
        let title = Line::from(vec![
            Span::styled(
                "postmgr ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.server.clone(), Style::default().fg(Color::DarkGray)),
            Span::raw("  •  "),
            Span::styled(
                format!("{} post(s)", self.manager.items().len()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::styled(synced, Style::default().fg(Color::Gray)),
            Span::raw("  •  "),
            Span::styled(format!("mode {}", mode), Style::default().fg(Color::Magenta)),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_form(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Form;
        let title = match &self.manager.state().selected_id {
            Some(id) => format!("Edit Post {}", id),
            None => "Create Post".to_string(),
        };
        let accent = if self.manager.state().is_editing() {
            Color::LightYellow
        } else {
            Color::Cyan
        };
        let mut lines = Vec::new();
        lines.extend(field_lines(
            "Title",
            &self.form.title,
            focused && self.form.field == FormField::Title,
        ));
        lines.push(Line::from(""));
        lines.extend(field_lines(
            "Description",
            &self.form.description,
            focused && self.form.field == FormField::Description,
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            if self.manager.state().is_editing() {
                "Ctrl+S update • Esc cancel edit"
            } else {
                "Ctrl+S create • Esc back to list"
            },
            Style::default().fg(Color::Gray),
        )));

        let dialog = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Span::styled(
                        title,
                        Style::default().fg(accent).add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(if focused {
                        accent
                    } else {
                        Color::DarkGray
                    })),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(dialog, area);
    }

    fn draw_search(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Search;
        let text = if focused {
            self.search.with_caret()
        } else if self.search.value.is_empty() {
            "press / to search by title".to_string()
        } else {
            self.search.value.clone()
        };
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else if self.search.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let search = Paragraph::new(Span::styled(text, style)).block(
            Block::default()
                .title("Search")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused {
                    Color::Cyan
                } else {
                    Color::DarkGray
                })),
        );
        f.render_widget(search, area);
    }

    fn draw_list(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::List;
        let posts = self.manager.items();
        let width = area.width.saturating_sub(2);
        let selected_id = self.manager.state().selected_id.as_deref();
        let items = if posts.is_empty() {
            vec![ListItem::new("No posts")]
        } else {
            posts
                .iter()
                .enumerate()
                .map(|(idx, post)| {
                    post_item(
                        post,
                        width,
                        focused && idx == self.cursor,
                        selected_id == Some(post.id.as_str()),
                    )
                })
                .collect()
        };

        let viewport = (area.height.saturating_sub(2) / POST_ITEM_HEIGHT) as usize;
        self.list_offset = adjust_offset(self.cursor, self.list_offset, viewport, 1, posts.len());
        let mut state = ListState::default();
        if !posts.is_empty() {
            state.select(Some(self.cursor));
        }
        *state.offset_mut() = self.list_offset;

        let block = Block::default()
            .title(Span::styled(
                format!("All Posts ({})", posts.len()),
                Style::default()
                    .fg(if focused { Color::Cyan } else { Color::Gray })
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        let list = List::new(items).block(block);
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let status = Paragraph::new(self.status.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, bottom[0]);

        let detail = match self.selected_post() {
            Some(post) => selected_post_detail(post),
            None => Line::from("No post selected"),
        };
        let detail = Paragraph::new(detail).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Selected"),
        );
        f.render_widget(detail, bottom[1]);
    }

    fn footer_help_line(&self) -> Line<'static> {
        let spans = match self.focus {
            Focus::List => vec![
                Span::styled("↑↓ / j k", Style::default().fg(Color::LightCyan)),
                Span::raw(" browse  "),
                Span::styled("n", Style::default().fg(Color::LightMagenta)),
                Span::raw(" form  "),
                Span::styled("/", Style::default().fg(Color::LightCyan)),
                Span::raw(" search  "),
                Span::styled("e", Style::default().fg(Color::LightYellow)),
                Span::raw(" edit  "),
                Span::styled("d", Style::default().fg(Color::LightRed)),
                Span::raw(" delete  "),
                Span::styled("r", Style::default().fg(Color::LightGreen)),
                Span::raw(" reload  "),
                Span::styled("q", Style::default().fg(Color::LightRed)),
                Span::raw(" quit"),
            ],
            Focus::Form => vec![
                Span::styled("Tab", Style::default().fg(Color::LightCyan)),
                Span::raw(" switch field  "),
                Span::styled("Enter", Style::default().fg(Color::LightCyan)),
                Span::raw(" next / newline  "),
                Span::styled("Ctrl+S", Style::default().fg(Color::LightGreen)),
                Span::raw(" save  "),
                Span::styled("Esc", Style::default().fg(Color::LightRed)),
                Span::raw(" cancel"),
            ],
            Focus::Search => vec![
                Span::styled("Enter", Style::default().fg(Color::LightGreen)),
                Span::raw(" search  "),
                Span::styled("Esc", Style::default().fg(Color::LightRed)),
                Span::raw(" back"),
            ],
        };
        Line::from(spans)
    }
}

impl PostForm {
    fn new() -> Self {
        PostForm::from_inputs("", "")
    }

    fn from_inputs(title: &str, description: &str) -> Self {
        PostForm {
            title: FieldValue::new(title),
            description: FieldValue::new(description),
            field: FormField::Title,
        }
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        };
    }

    fn active_field_mut(&mut self) -> &mut FieldValue {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }
}

fn failure_message(action: &str, err: &PostError) -> String {
    if err.is_request_failure() {
        format!("{} failed: {} (details in log)", action, err)
    } else {
        format!("{} failed: {}", action, err)
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn adjust_offset(
    selected: usize,
    current_offset: usize,
    viewport: usize,
    scrolloff: usize,
    len: usize,
) -> usize {
    if viewport == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(viewport);
    let margin = scrolloff.min(viewport.saturating_sub(1));
    let mut offset = current_offset.min(max_offset);
    if selected < offset.saturating_add(margin) {
        offset = selected.saturating_sub(margin);
    } else {
        let upper = offset
            .saturating_add(viewport.saturating_sub(1))
            .saturating_sub(margin);
        if selected > upper {
            offset = selected.saturating_add(margin + 1).saturating_sub(viewport);
        }
    }
    offset.min(max_offset)
}

fn prev_char(cursor: usize, text: &str) -> usize {
    text[..cursor]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_char(cursor: usize, text: &str) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map(|ch| cursor + ch.len_utf8())
        .unwrap_or(text.len())
}

fn line_state(text: &str, cursor: usize) -> (Vec<usize>, usize, usize) {
    let mut starts = vec![0];
    starts.extend(
        text.char_indices()
            .filter(|(_, ch)| *ch == '\n')
            .map(|(idx, _)| idx + 1),
    );
    let line_idx = starts
        .iter()
        .rposition(|start| *start <= cursor)
        .unwrap_or(0);
    let col = text[starts[line_idx]..cursor].chars().count();
    (starts, line_idx, col)
}

fn index_at_col(text: &str, start: usize, target_col: usize) -> usize {
    let slice = &text[start..];
    let limit = slice.find('\n').unwrap_or(slice.len());
    slice[..limit]
        .char_indices()
        .nth(target_col)
        .map(|(idx, _)| start + idx)
        .unwrap_or(start + limit)
}

fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

const POST_ITEM_HEIGHT: u16 = 3;

fn post_item(post: &Post, width: u16, highlighted: bool, editing: bool) -> ListItem<'static> {
    let inner = width.saturating_sub(2).max(10) as usize;
    let marker = if editing { "✎ " } else { "" };
    let title = truncate_text(
        &format!("{}{}", marker, post.title),
        inner.saturating_sub(post.id.chars().count() + 3),
    );
    let description = post.description.lines().next().unwrap_or_default();
    let lines = vec![
        Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  [{}]", post.id), Style::default().fg(Color::DarkGray)),
        ]),
        Line::raw(format!(" {}", truncate_text(description, inner.saturating_sub(1)))),
        Line::raw(""),
    ];
    let style = if highlighted {
        Style::default()
            .bg(Color::Rgb(252, 214, 112))
            .fg(Color::Black)
    } else if editing {
        Style::default().fg(Color::LightYellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    ListItem::new(lines).style(style)
}

fn field_lines(label: &str, field: &FieldValue, active: bool) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let prefix = format!("{}: ", label);
    let spacer = " ".repeat(prefix.chars().count());
    let text = if active {
        field.with_caret()
    } else {
        field.value.clone()
    };
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| {
            Line::from(vec![
                Span::styled(
                    if idx == 0 {
                        prefix.clone()
                    } else {
                        spacer.clone()
                    },
                    label_style,
                ),
                Span::styled(line.to_string(), value_style),
            ])
        })
        .collect()
}

fn selected_post_detail(post: &Post) -> Line<'static> {
    let mut spans = vec![Span::styled(
        post.title.clone(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    if !post.description.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            post.description.clone(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use ratatui::backend::TestBackend;

    fn app(posts: Vec<Post>) -> App<FakeApi> {
        let mut manager = PostManager::new(FakeApi::with(posts));
        manager.fetch_all().unwrap();
        App::new(manager, "http://localhost:3500/".into())
    }

    fn press(app: &mut App<FakeApi>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App<FakeApi>, ch: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App<FakeApi>, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn render(app: &mut App<FakeApi>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn form_submit_creates_post_and_returns_to_list() {
        let mut app = app(vec![Post::new("1", "A", "d")]);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.focus, Focus::Form);
        type_text(&mut app, "B");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "e");
        ctrl(&mut app, 's');

        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.manager.items().len(), 2);
        assert!(app.form.title.value.is_empty());
        assert!(app.form.description.value.is_empty());
        assert!(app.status.starts_with("Created"));
    }

    #[test]
    fn empty_title_keeps_form_open() {
        let mut app = app(vec![]);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "only body");
        ctrl(&mut app, 's');

        assert_eq!(app.focus, Focus::Form);
        assert_eq!(app.form.description.value, "only body");
        assert_eq!(app.status, "Create failed: title is required");
    }

    #[test]
    fn edit_then_cancel_restores_create_mode() {
        let mut app = app(vec![Post::new("1", "A", "d"), Post::new("2", "B", "e")]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.focus, Focus::Form);
        assert_eq!(app.form.title.value, "B");
        assert_eq!(app.form.description.value, "e");
        assert_eq!(app.manager.state().selected_id.as_deref(), Some("2"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);
        assert!(app.manager.state().selected_id.is_none());
        assert!(app.form.title.value.is_empty());
        assert_eq!(app.manager.items().len(), 2);
    }

    #[test]
    fn edit_submit_updates_selected_post() {
        let mut app = app(vec![Post::new("1", "A", "d")]);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "Z");
        ctrl(&mut app, 's');

        assert_eq!(app.manager.items(), &[Post::new("1", "Z", "d")]);
        assert!(app.manager.state().selected_id.is_none());
        assert_eq!(app.status, "Updated 1");
    }

    #[test]
    fn delete_removes_highlighted_post() {
        let mut app = app(vec![Post::new("1", "A", "d"), Post::new("2", "B", "e")]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.manager.items(), &[Post::new("1", "A", "d")]);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn search_submits_typed_query() {
        let mut app = app(vec![Post::new("1", "A", "d"), Post::new("2", "B", "e")]);
        *app.manager.api().search_result.borrow_mut() = vec![Post::new("2", "B", "e")];
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "B");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.focus, Focus::List);
        assert_eq!(*app.manager.api().searches.borrow(), ["B"]);
        assert_eq!(app.manager.items(), &[Post::new("2", "B", "e")]);
        assert_eq!(app.status, "1 result(s) for \"B\"");
    }

    #[test]
    fn failed_delete_reports_in_status() {
        let mut app = app(vec![Post::new("1", "A", "d")]);
        app.manager.api().fail.set(true);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.manager.items().len(), 1);
        assert!(app.status.starts_with("Delete failed"));
    }

    #[test]
    fn q_quits_only_from_list() {
        let mut app = app(vec![]);
        press(&mut app, KeyCode::Char('n'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.form.title.value, "q");
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn renders_form_title_by_mode() {
        let mut app = app(vec![Post::new("1", "Alpha", "first")]);
        let screen = render(&mut app);
        assert!(screen.contains("Create Post"));
        assert!(screen.contains("Alpha"));

        press(&mut app, KeyCode::Char('e'));
        let screen = render(&mut app);
        assert!(screen.contains("Edit Post 1"));
    }

    #[test]
    fn field_cursor_moves_between_lines() {
        let mut field = FieldValue::new("abc\nde");
        field.move_up();
        assert_eq!(field.cursor, 2);
        field.move_down();
        assert_eq!(field.cursor, 6);
        field.backspace();
        assert_eq!(field.value, "abc\nd");
        field.insert_char('é');
        field.move_left();
        field.move_right();
        assert_eq!(field.cursor, field.value.len());
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
        assert_eq!(truncate_text("hello", 2), "he");
    }
}
