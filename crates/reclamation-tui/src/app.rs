use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use reclamation_core::{ComplaintDraft, EquipmentBrand, Field, MAX_PHOTOS};
use reclamation_service::ComplaintService;
use tokio::runtime::Runtime;

use crate::controller::{FormController, Notice, NoticeKind, SubmitOutcome};
use crate::host::HostContainer;
use crate::photos::collect_photos;

const TITLE: &str = "Форма рекламации для сервисного центра";
const PHOTOS_LABEL: &str = "Загрузить фото (до 10 файлов)";
const SUBMIT_LABEL: &str = "Отправить рекламацию";

/// Which control of the form has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    Photos,
    Submit,
}

impl Focus {
    pub const ORDER: &[Focus] = &[
        Focus::Field(Field::ContactPerson),
        Focus::Field(Field::Company),
        Focus::Field(Field::VinCode),
        Focus::Field(Field::EquipmentBrand),
        Focus::Field(Field::VisualResult),
        Focus::Photos,
        Focus::Submit,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Focus {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Focus {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// What the form is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Moving between controls and typing into them
    Editing,
    /// Equipment model picker
    BrandPick { list_state: ListState },
    /// Typing photo paths
    PhotoPick { input: String },
    /// Waiting for the endpoint to answer
    Submitting,
    /// Modal notification, dismissed by any key
    Notice { notice: Notice },
}

pub struct App<S: ComplaintService> {
    controller: FormController<S>,
    rt: Runtime,
    mode: Mode,
    focus: Focus,
    status_message: Option<String>,
    quit: bool,
}

impl<S: ComplaintService> App<S> {
    /// Build the view and run the host handshake.
    pub fn new(service: S, host: Option<Box<dyn HostContainer>>) -> Result<Self> {
        let mut controller = FormController::new(service, host);
        controller.initialize();
        Ok(Self {
            controller,
            rt: Runtime::new()?,
            mode: Mode::Editing,
            focus: Focus::Field(Field::ContactPerson),
            status_message: None,
            quit: false,
        })
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn draft(&self) -> &ComplaintDraft {
        self.controller.draft()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_showing_notice(&self) -> bool {
        matches!(self.mode, Mode::Notice { .. })
    }

    /// Whether the event loop should leave because the host asked to close.
    /// The success notice stays on screen until the user dismisses it.
    pub fn should_exit(&self, close_requested: bool) -> bool {
        close_requested && !self.is_showing_notice()
    }

    /// True once the user confirmed a complete form; the event loop draws
    /// the "sending" state and then calls `run_pending_submit`.
    pub fn has_pending_submit(&self) -> bool {
        matches!(self.mode, Mode::Submitting)
    }

    /// Perform the submission requested through the UI.
    pub fn run_pending_submit(&mut self) -> Option<SubmitOutcome> {
        if !self.has_pending_submit() {
            return None;
        }
        let outcome = self.rt.block_on(self.controller.submit());
        if outcome == SubmitOutcome::Sent {
            self.focus = Focus::Field(Field::ContactPerson);
        }
        self.mode = match self.controller.take_notice() {
            Some(notice) => Mode::Notice { notice },
            None => Mode::Editing,
        };
        Some(outcome)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match &self.mode.clone() {
            Mode::Editing => self.handle_editing(key),
            Mode::BrandPick { list_state } => self.handle_brand_pick(key, list_state.clone()),
            Mode::PhotoPick { input } => self.handle_photo_pick(key, input.clone()),
            // Input is ignored until the request finishes.
            Mode::Submitting => {}
            Mode::Notice { .. } => self.mode = Mode::Editing,
        }
    }

    fn handle_editing(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.request_submit();
            return;
        }

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::Field(Field::EquipmentBrand) => self.handle_brand_control(key),
                Focus::Field(field) => self.handle_text_input(key, field),
                Focus::Photos => self.handle_photos_control(key),
                Focus::Submit => {
                    if key.code == KeyCode::Enter {
                        self.request_submit();
                    }
                }
            },
        }
    }

    fn handle_text_input(&mut self, key: KeyEvent, field: Field) {
        let mut value = self.controller.draft().value(field).to_string();
        match key.code {
            KeyCode::Char(c) => {
                value.push(c);
                self.controller.update_field(field, &value);
            }
            KeyCode::Backspace => {
                if value.pop().is_some() {
                    self.controller.update_field(field, &value);
                }
            }
            KeyCode::Enter if field == Field::VisualResult => {
                value.push('\n');
                self.controller.update_field(field, &value);
            }
            KeyCode::Enter => self.focus = self.focus.next(),
            _ => {}
        }
    }

    fn handle_brand_control(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let selected = self
                    .controller
                    .draft()
                    .equipment_brand
                    .map(|b| b.index())
                    .unwrap_or(0);
                let mut list_state = ListState::default();
                list_state.select(Some(selected));
                self.mode = Mode::BrandPick { list_state };
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.controller.update_field(Field::EquipmentBrand, "");
            }
            _ => {}
        }
    }

    fn handle_photos_control(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.mode = Mode::PhotoPick {
                    input: String::new(),
                };
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.controller.update_files(Vec::new());
                self.status_message = Some("Фото удалены".into());
            }
            _ => {}
        }
    }

    fn handle_brand_pick(&mut self, key: KeyEvent, mut list_state: ListState) {
        let count = EquipmentBrand::ALL.len();
        match key.code {
            KeyCode::Esc => self.mode = Mode::Editing,
            KeyCode::Char('j') | KeyCode::Down => {
                let i = list_state.selected().unwrap_or(0);
                if i + 1 < count {
                    list_state.select(Some(i + 1));
                }
                self.mode = Mode::BrandPick { list_state };
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let i = list_state.selected().unwrap_or(0);
                list_state.select(Some(i.saturating_sub(1)));
                self.mode = Mode::BrandPick { list_state };
            }
            KeyCode::Enter => {
                if let Some(brand) = list_state
                    .selected()
                    .and_then(|i| EquipmentBrand::ALL.get(i))
                {
                    self.controller
                        .update_field(Field::EquipmentBrand, brand.as_str());
                    self.focus = self.focus.next();
                }
                self.mode = Mode::Editing;
            }
            _ => {}
        }
    }

    fn handle_photo_pick(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Editing,
            KeyCode::Enter => {
                match collect_photos(&input) {
                    Ok(photos) => {
                        let selected = photos.len();
                        self.controller.update_files(photos);
                        let kept = self.controller.draft().files.len();
                        self.status_message = Some(if selected > MAX_PHOTOS {
                            format!("Выбрано фото: {kept} (лишние {} отброшены)", selected - kept)
                        } else {
                            format!("Выбрано фото: {kept}")
                        });
                    }
                    Err(e) => self.status_message = Some(format!("Ошибка чтения: {e}")),
                }
                self.mode = Mode::Editing;
            }
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::PhotoPick { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::PhotoPick { input };
            }
            _ => {}
        }
    }

    /// Same gate as the browser's `required` check: nothing is sent while a
    /// field is blank.
    fn request_submit(&mut self) {
        let missing = self.controller.draft().missing_fields();
        if let Some(first) = missing.first() {
            let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
            self.status_message = Some(format!("Заполните поля: {}", names.join(", ")));
            self.focus = Focus::Field(*first);
            return;
        }
        self.mode = Mode::Submitting;
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.render_form(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays
        match &self.mode {
            Mode::Editing => {}
            Mode::BrandPick { list_state } => self.render_brand_pick(frame, list_state, area),
            Mode::PhotoPick { input } => {
                self.render_input_bar(frame, " Пути к фото (через ;) ", input, area)
            }
            Mode::Submitting => self.render_submitting(frame, area),
            Mode::Notice { notice } => self.render_notice(frame, notice, area),
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" VMC ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled("Рекламация", Style::default().fg(Color::Yellow)),
        ];
        if !self.controller.has_host() {
            spans.push(Span::styled(
                " (автономный режим)",
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Editing => match self.focus {
                Focus::Field(Field::EquipmentBrand) => {
                    vec![("Tab", "далее"), ("Enter", "выбрать"), ("Esc", "выход")]
                }
                Focus::Photos => vec![
                    ("Tab", "далее"),
                    ("Enter", "выбрать фото"),
                    ("Del", "очистить"),
                    ("Esc", "выход"),
                ],
                Focus::Submit => vec![("Enter", "отправить"), ("Esc", "выход")],
                Focus::Field(_) => vec![
                    ("Tab/Shift+Tab", "поля"),
                    ("Ctrl+S", "отправить"),
                    ("Esc", "выход"),
                ],
            },
            Mode::BrandPick { .. } => vec![("j/k", "выбор"), ("Enter", "ок"), ("Esc", "отмена")],
            Mode::PhotoPick { .. } => vec![("Enter", "ок"), ("Esc", "отмена")],
            Mode::Submitting => vec![],
            Mode::Notice { .. } => vec![("любая клавиша", "закрыть")],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let area = centered_column(72, area);
        let block = Block::default()
            .title(format!(" {TITLE} "))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(4),
                Constraint::Length(3),
            ])
            .split(inner);

        for (i, field) in Field::ALL.iter().enumerate() {
            self.render_field(frame, *field, rows[i]);
        }
        self.render_photos(frame, rows[5]);
        self.render_submit_button(frame, rows[6]);
    }

    fn control_block(&self, focus: Focus) -> Block<'static> {
        let color = if self.focus == focus && matches!(self.mode, Mode::Editing) {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
    }

    fn render_field(&self, frame: &mut Frame, field: Field, area: Rect) {
        let value = self.controller.draft().value(field);
        let text = if value.is_empty() {
            Text::from(Span::styled(field.label(), Style::default().fg(Color::DarkGray)))
        } else {
            Text::from(value.to_string())
        };
        let mut block = self.control_block(Focus::Field(field));
        if field == Field::EquipmentBrand {
            block = block.title(" ▾ ");
        }
        let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_photos(&self, frame: &mut Frame, area: Rect) {
        let files = &self.controller.draft().files;
        let block = self
            .control_block(Focus::Photos)
            .title(format!(" {PHOTOS_LABEL} "))
            .title_alignment(Alignment::Center);

        let lines: Vec<Line> = if files.is_empty() {
            vec![Line::from(Span::styled(
                "Файлы не выбраны",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            files
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    Line::from(vec![
                        Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::Yellow)),
                        Span::raw(f.file_name.clone()),
                    ])
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_submit_button(&self, frame: &mut Frame, area: Rect) {
        let style = if self.focus == Focus::Submit {
            Style::default().fg(Color::White).bg(Color::Blue).bold()
        } else {
            Style::default().fg(Color::Blue).bold()
        };
        let paragraph = Paragraph::new(Span::styled(SUBMIT_LABEL, style))
            .block(self.control_block(Focus::Submit))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_brand_pick(&self, frame: &mut Frame, list_state: &ListState, area: Rect) {
        let popup = centered_rect(50, 60, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", Field::EquipmentBrand.label()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));

        let current = self.controller.draft().equipment_brand;
        let items: Vec<ListItem> = EquipmentBrand::ALL
            .iter()
            .map(|b| {
                let marker = if current == Some(*b) { "* " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::raw(b.as_str()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Magenta).bold())
            .highlight_symbol("> ");

        let mut state = list_state.clone();
        frame.render_stateful_widget(list, popup, &mut state);
    }

    fn render_input_bar(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(3),
            width: area.width,
            height: 3.min(area.height),
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label.to_string());
        let paragraph = Paragraph::new(input.to_string()).block(block);
        frame.render_widget(paragraph, input_area);
    }

    fn render_submitting(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(40, 20, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let paragraph = Paragraph::new("Отправка рекламации...")
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }

    fn render_notice(&self, frame: &mut Frame, notice: &Notice, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Failure => Color::Red,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let text = format!("{}\n\n(любая клавиша)", notice.text);
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

/// Horizontally centered column at most `max_width` wide.
fn centered_column(max_width: u16, area: Rect) -> Rect {
    let width = max_width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
