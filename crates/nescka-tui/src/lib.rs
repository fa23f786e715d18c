// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use nescka_app::{
    AppCommand, AppEvent, AppState, ChatAuthor, ChatMessage, FilterChoice, Lead, LeadAttribute,
    LeadFormField, LeadFormInput, LeadPriority, LeadSource, LeadStatus, Likelihood, Tone,
    compose_outreach, filter_leads, pipeline_counts,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::format_description;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);
pub const COPIED_STATUS: &str = "Copied to clipboard!";

const APP_TITLE: &str = "Nescka Lead Tracker";
const APP_TAGLINE: &str = "Powered by Nescka AI";
const SEARCH_PLACEHOLDER: &str = "Search by name or message...";
const CHAT_PLACEHOLDER: &str = "Ask about your leads...";
const LIKELIHOOD_BAR_WIDTH: usize = 20;

pub trait AppRuntime {
    fn load_leads(&mut self) -> Result<Vec<Lead>>;
    /// Full chat transcript, oldest first. Implementations seed an empty
    /// transcript with the assistant greeting.
    fn load_transcript(&mut self) -> Result<Vec<ChatMessage>>;
    fn append_chat_message(&mut self, author: ChatAuthor, body: &str) -> Result<ChatMessage>;
    fn submit_lead_form(&mut self, input: &LeadFormInput) -> Result<()>;
    fn answer(&mut self, question: &str, leads: &[Lead]) -> String;
    fn assistant_delay(&self) -> Duration;
    fn spawn_answer(
        &mut self,
        request_id: u64,
        question: &str,
        leads: &[Lead],
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let body = self.answer(question, leads);
        let delay = self.assistant_delay();
        thread::Builder::new()
            .name(format!("assistant-{request_id}"))
            .spawn(move || {
                thread::sleep(delay);
                let _ = tx.send(InternalEvent::AssistantReply { request_id, body });
            })
            .context("spawn assistant worker")?;
        Ok(())
    }
    fn copy_to_clipboard(&mut self, text: &str) -> Result<()>;
    fn export_report(&mut self, lead: &Lead) -> Result<PathBuf>;
}

/// Presentation settings that do not belong to the reducer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub toast_duration: Duration,
    pub assistant_name: String,
    pub assistant_subtitle: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            toast_duration: DEFAULT_TOAST_DURATION,
            assistant_name: "Assistant".to_owned(),
            assistant_subtitle: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    AssistantReply { request_id: u64, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChatLine {
    author: ChatAuthor,
    body: String,
    sent_at: Option<OffsetDateTime>,
}

impl From<ChatMessage> for ChatLine {
    fn from(message: ChatMessage) -> Self {
        Self {
            author: message.author,
            body: message.body,
            sent_at: Some(message.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ChatUiState {
    input: String,
    transcript: Vec<ChatLine>,
    loaded: bool,
    pending_request: Option<u64>,
    next_request_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FormUiState {
    input: LeadFormInput,
    field_index: usize,
}

impl FormUiState {
    fn field(&self) -> LeadFormField {
        LeadFormField::ALL[self.field_index % LeadFormField::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    options: RunOptions,
    leads: Vec<Lead>,
    cursor: usize,
    search_editing: bool,
    detail_scroll: u16,
    form: FormUiState,
    chat: ChatUiState,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(options: RunOptions) -> Self {
        Self {
            options,
            leads: Vec::new(),
            cursor: 0,
            search_editing: false,
            detail_scroll: 0,
            form: FormUiState::default(),
            chat: ChatUiState::default(),
            help_visible: false,
            status_token: 0,
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: RunOptions,
) -> Result<()> {
    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_leads(runtime, &mut view_data) {
        emit_status(
            state,
            &mut view_data,
            &internal_tx,
            format!("load failed: {error:#}"),
        );
    }

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn refresh_leads<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    view_data.leads = runtime.load_leads().context("load leads")?;
    tracing::debug!(count = view_data.leads.len(), "leads loaded");
    Ok(())
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::AssistantReply { request_id, body } => {
                handle_assistant_reply(state, runtime, view_data, tx, request_id, body);
            }
        }
    }
}

// Replies land even if the chat panel was closed in the meantime.
fn handle_assistant_reply<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request_id: u64,
    body: String,
) {
    if view_data.chat.pending_request == Some(request_id) {
        view_data.chat.pending_request = None;
    }
    tracing::debug!(request_id, "assistant reply received");

    let line = match runtime.append_chat_message(ChatAuthor::Assistant, &body) {
        Ok(message) => ChatLine::from(message),
        Err(error) => {
            emit_status(
                state,
                view_data,
                tx,
                format!("chat save failed: {error:#}; check the data directory and retry"),
            );
            ChatLine {
                author: ChatAuthor::Assistant,
                body,
                sent_at: None,
            }
        }
    };
    view_data.chat.transcript.push(line);
    state.dispatch(AppCommand::AssistantFinished);
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch_command(
        state,
        view_data,
        internal_tx,
        AppCommand::SetStatus(message.into()),
    );
}

fn dispatch_command(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    for event in &events {
        match event {
            AppEvent::FilterChanged(filter) => {
                tracing::debug!(filter = %filter.describe(), "filter changed");
                clamp_cursor(state, view_data);
            }
            AppEvent::LeadSelected(_) => view_data.detail_scroll = 0,
            AppEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(
                    internal_tx,
                    view_data.status_token,
                    view_data.options.toast_duration,
                );
            }
            _ => {}
        }
    }
}

fn visible_leads<'a>(state: &AppState, view_data: &'a ViewData) -> Vec<&'a Lead> {
    filter_leads(&view_data.leads, &state.filter)
}

fn clamp_cursor(state: &AppState, view_data: &mut ViewData) {
    let count = visible_leads(state, view_data).len();
    view_data.cursor = view_data.cursor.min(count.saturating_sub(1));
}

fn selected_lead<'a>(state: &AppState, view_data: &'a ViewData) -> Option<&'a Lead> {
    let id = state.selected_lead?;
    view_data.leads.iter().find(|lead| lead.id == id)
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if state.chat.is_visible() {
        handle_chat_overlay_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if state.add_lead.is_visible() {
        handle_form_overlay_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if state.selected_lead.is_some() {
        handle_detail_overlay_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if view_data.search_editing {
        handle_search_key(state, view_data, internal_tx, key);
        return false;
    }

    handle_nav_key(state, runtime, view_data, internal_tx, key)
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let visible_count = visible_leads(state, view_data).len();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            if view_data.cursor + 1 < visible_count {
                view_data.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.cursor = view_data.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => view_data.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            view_data.cursor = visible_count.saturating_sub(1);
        }
        KeyCode::Enter => {
            let target = visible_leads(state, view_data)
                .get(view_data.cursor)
                .map(|lead| lead.id);
            if let Some(id) = target {
                dispatch_command(state, view_data, internal_tx, AppCommand::SelectLead(id));
            }
        }
        KeyCode::Char('/') => view_data.search_editing = true,
        KeyCode::Char('s') => {
            dispatch_command(state, view_data, internal_tx, AppCommand::CycleSourceFilter);
        }
        KeyCode::Char('t') => {
            dispatch_command(state, view_data, internal_tx, AppCommand::CycleStatusFilter);
        }
        KeyCode::Char('p') => {
            dispatch_command(
                state,
                view_data,
                internal_tx,
                AppCommand::CyclePriorityFilter,
            );
        }
        KeyCode::Char('x') => {
            dispatch_command(state, view_data, internal_tx, AppCommand::ClearFilters);
        }
        KeyCode::Char('a') => {
            view_data.form = FormUiState::default();
            dispatch_command(state, view_data, internal_tx, AppCommand::OpenAddLead);
        }
        KeyCode::Char('@') | KeyCode::Char('c') => {
            dispatch_command(state, view_data, internal_tx, AppCommand::OpenChat);
            if let Err(error) = ensure_transcript_loaded(runtime, view_data) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("chat history load failed: {error:#}; check the data directory and retry"),
                );
            }
        }
        KeyCode::Char('r') => {
            if let Err(error) = refresh_leads(runtime, view_data) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("load failed: {error:#}"),
                );
            }
            clamp_cursor(state, view_data);
        }
        KeyCode::Char('?') => view_data.help_visible = true,
        _ => {}
    }
    false
}

fn handle_search_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let mut search = state.filter.search.clone();
    match key.code {
        KeyCode::Enter => {
            view_data.search_editing = false;
            return;
        }
        KeyCode::Esc => {
            view_data.search_editing = false;
            search.clear();
        }
        KeyCode::Backspace => {
            search.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => search.clear(),
        KeyCode::Char(ch)
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
        {
            search.push(ch);
        }
        _ => return,
    }
    if search != state.filter.search {
        dispatch_command(state, view_data, internal_tx, AppCommand::SetSearch(search));
    }
}

fn handle_detail_overlay_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            dispatch_command(state, view_data, internal_tx, AppCommand::CloseLead);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.detail_scroll = view_data.detail_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.detail_scroll = view_data.detail_scroll.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            dispatch_command(state, view_data, internal_tx, AppCommand::PrevTone);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            dispatch_command(state, view_data, internal_tx, AppCommand::NextTone);
        }
        KeyCode::Char(digit @ '1'..='5') => {
            let index = digit as usize - '1' as usize;
            if let Some(tone) = Tone::ALL.get(index).copied() {
                dispatch_command(state, view_data, internal_tx, AppCommand::SetTone(tone));
            }
        }
        KeyCode::Char('g') => {
            dispatch_command(state, view_data, internal_tx, AppCommand::GenerateResponse);
        }
        KeyCode::Char('d') => {
            dispatch_command(state, view_data, internal_tx, AppCommand::HideResponse);
        }
        KeyCode::Char('y') => copy_generated_response(state, runtime, view_data, internal_tx),
        KeyCode::Char('e') => export_selected_report(state, runtime, view_data, internal_tx),
        _ => {}
    }
}

fn copy_generated_response<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if !state.response_preview.is_visible() {
        return;
    }
    let Some(lead) = selected_lead(state, view_data) else {
        return;
    };
    let draft = compose_outreach(lead, state.tone);
    match runtime.copy_to_clipboard(&draft) {
        Ok(()) => emit_status(state, view_data, internal_tx, COPIED_STATUS),
        Err(error) => tracing::warn!(error = %format!("{error:#}"), "failed to copy text"),
    }
}

fn export_selected_report<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(lead) = selected_lead(state, view_data) else {
        return;
    };
    let message = match runtime.export_report(lead) {
        Ok(path) => format!("report saved to {}", path.display()),
        Err(error) => format!("report export failed: {error:#}"),
    };
    emit_status(state, view_data, internal_tx, message);
}

fn handle_form_overlay_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let field_count = LeadFormField::ALL.len();
    let field = view_data.form.field();
    match key.code {
        KeyCode::Esc => {
            dispatch_command(state, view_data, internal_tx, AppCommand::CloseAddLead);
        }
        KeyCode::Tab | KeyCode::Down => {
            view_data.form.field_index = (view_data.form.field_index + 1) % field_count;
        }
        KeyCode::BackTab | KeyCode::Up => {
            view_data.form.field_index =
                (view_data.form.field_index + field_count - 1) % field_count;
        }
        KeyCode::Enter => {
            if let Err(error) = runtime.submit_lead_form(&view_data.form.input) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("add lead failed: {error:#}"),
                );
            }
            dispatch_command(state, view_data, internal_tx, AppCommand::SubmitAddLead);
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if field.is_choice() => {
            view_data.form.input.cycle_choice(field);
        }
        KeyCode::Backspace => view_data.form.input.pop_char(field),
        KeyCode::Char(ch)
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
        {
            view_data.form.input.push_char(field, ch);
        }
        _ => {}
    }
}

fn ensure_transcript_loaded<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    if !view_data.chat.loaded {
        view_data.chat.transcript = runtime
            .load_transcript()?
            .into_iter()
            .map(ChatLine::from)
            .collect();
        view_data.chat.loaded = true;
    }
    Ok(())
}

fn handle_chat_overlay_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            dispatch_command(state, view_data, internal_tx, AppCommand::CloseChat);
        }
        (KeyCode::Enter, _) => submit_chat_input(state, runtime, view_data, internal_tx),
        (KeyCode::Backspace, _) => {
            view_data.chat.input.pop();
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.chat.input.clear();
        }
        (KeyCode::Char(ch), modifiers) => {
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT {
                view_data.chat.input.push(ch);
            }
        }
        _ => {}
    }
}

fn submit_chat_input<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let question = view_data.chat.input.trim().to_owned();
    if question.is_empty() || state.is_thinking() {
        return;
    }
    view_data.chat.input.clear();

    let line = match runtime.append_chat_message(ChatAuthor::User, &question) {
        Ok(message) => ChatLine::from(message),
        Err(error) => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("chat save failed: {error:#}; check the data directory and retry"),
            );
            ChatLine {
                author: ChatAuthor::User,
                body: question.clone(),
                sent_at: None,
            }
        }
    };
    view_data.chat.transcript.push(line);

    dispatch_command(state, view_data, internal_tx, AppCommand::AssistantStarted);
    let request_id = view_data.chat.next_request_id;
    view_data.chat.next_request_id = request_id.saturating_add(1);
    view_data.chat.pending_request = Some(request_id);

    if let Err(error) =
        runtime.spawn_answer(request_id, &question, &view_data.leads, internal_tx.clone())
    {
        view_data.chat.pending_request = None;
        state.dispatch(AppCommand::AssistantFinished);
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("assistant failed: {error:#}"),
        );
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(view_data))
        .block(Block::default().title(APP_TITLE).borders(Borders::ALL))
        .style(Style::default().fg(Color::White));
    frame.render_widget(header, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(20)])
        .split(layout[1]);

    let sidebar = Paragraph::new(filter_sidebar_text(state))
        .block(Block::default().title("filters").borders(Borders::ALL));
    frame.render_widget(sidebar, body[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(body[1]);

    let (search_text, search_style) = search_line(state, view_data);
    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(Block::default().title("search").borders(Borders::ALL));
    frame.render_widget(search, main[0]);

    let visible = visible_leads(state, view_data);
    frame.render_widget(
        Paragraph::new(showing_text(visible.len(), view_data.leads.len()))
            .style(Style::default().fg(Color::Gray)),
        main[1],
    );
    render_lead_table(frame, main[2], &visible, view_data.cursor);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(lead) = selected_lead(state, view_data) {
        let area = centered_rect(84, 88, frame.area());
        frame.render_widget(Clear, area);
        let detail = Paragraph::new(detail_overlay_text(lead, state))
            .wrap(Wrap { trim: false })
            .scroll((view_data.detail_scroll, 0))
            .block(Block::default().title(lead.name.as_str()).borders(Borders::ALL));
        frame.render_widget(detail, area);
    }

    if state.add_lead.is_visible() {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let form = Paragraph::new(form_overlay_text(&view_data.form))
            .block(Block::default().title("Add New Lead").borders(Borders::ALL));
        frame.render_widget(form, area);
    }

    if state.chat.is_visible() {
        let area = centered_rect(64, 72, frame.area());
        frame.render_widget(Clear, area);
        let title = format!("{} AI", view_data.options.assistant_name);
        let chat = Paragraph::new(chat_overlay_text(state, view_data))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Magenta)),
            );
        frame.render_widget(chat, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn header_text(view_data: &ViewData) -> String {
    let counts = pipeline_counts(&view_data.leads);
    format!(
        "{APP_TAGLINE} | hot {} | warm {} | cold {} | high priority {} | due today {}",
        counts.hot, counts.warm, counts.cold, counts.high_priority, counts.due_today
    )
}

fn filter_sidebar_text(state: &AppState) -> String {
    let mut lines = Vec::new();
    push_filter_section::<LeadSource>(&mut lines, "Source", state.filter.source);
    lines.push(String::new());
    push_filter_section::<LeadStatus>(&mut lines, "Status", state.filter.status);
    lines.push(String::new());
    push_filter_section::<LeadPriority>(&mut lines, "Priority", state.filter.priority);
    lines.join("\n")
}

fn push_filter_section<T: LeadAttribute>(
    lines: &mut Vec<String>,
    title: &str,
    active: FilterChoice<T>,
) {
    lines.push(title.to_owned());
    for option in FilterChoice::<T>::options() {
        let marker = if option == active { '>' } else { ' ' };
        lines.push(format!("{marker} {}", option.label()));
    }
}

fn search_line(state: &AppState, view_data: &ViewData) -> (String, Style) {
    let search = &state.filter.search;
    if view_data.search_editing {
        (format!("{search}_"), Style::default().fg(Color::Cyan))
    } else if search.is_empty() {
        (
            SEARCH_PLACEHOLDER.to_owned(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (search.clone(), Style::default().fg(Color::White))
    }
}

fn showing_text(visible: usize, total: usize) -> String {
    format!("Showing {visible} of {total} leads")
}

fn empty_state_text() -> &'static str {
    "No leads found\nTry adjusting your filters or search query"
}

fn render_lead_table(frame: &mut ratatui::Frame<'_>, area: Rect, leads: &[&Lead], cursor: usize) {
    let block = Block::default().title("leads").borders(Borders::ALL);
    if leads.is_empty() {
        let empty = Paragraph::new(empty_state_text())
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        ["Name", "Source", "Message", "Status", "Priority", "Next Action"].map(|label| {
            Cell::from(label).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }),
    );

    let rows = leads.iter().enumerate().map(|(index, lead)| {
        let mut row_style = Style::default();
        if index == cursor {
            row_style = row_style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }
        Row::new(vec![
            Cell::from(lead.name.clone()),
            Cell::from(lead.source.label()),
            Cell::from(truncate_label(&lead.message_summary, 48)),
            Cell::from(lead.status.label()).style(Style::default().fg(status_color(lead.status))),
            Cell::from(lead.priority.label())
                .style(Style::default().fg(priority_color(lead.priority))),
            Cell::from(lead.next_action.clone()),
        ])
        .style(row_style)
    });

    let widths = [
        Constraint::Length(20),
        Constraint::Length(9),
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(20),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);
}

fn status_color(status: LeadStatus) -> Color {
    match status {
        LeadStatus::Hot => Color::Red,
        LeadStatus::Warm => Color::Yellow,
        LeadStatus::Cold => Color::Blue,
    }
}

fn priority_color(priority: LeadPriority) -> Color {
    match priority {
        LeadPriority::High => Color::Red,
        LeadPriority::Medium => Color::Yellow,
        LeadPriority::Low => Color::Green,
    }
}

fn likelihood_line(likelihood: Option<Likelihood>) -> String {
    match likelihood {
        Some(value) => {
            let filled = usize::from(value.get()) * LIKELIHOOD_BAR_WIDTH
                / usize::from(Likelihood::MAX);
            format!(
                "{}% [{}{}]",
                value.get(),
                "#".repeat(filled),
                "-".repeat(LIKELIHOOD_BAR_WIDTH - filled)
            )
        }
        None => format!("n/a [{}]", "-".repeat(LIKELIHOOD_BAR_WIDTH)),
    }
}

fn detail_overlay_text(lead: &Lead, state: &AppState) -> String {
    let mut text = String::new();
    let initial = lead.initial().map(String::from).unwrap_or_default();
    text.push_str(&format!("({initial}) {}\n", lead.name));
    text.push_str(&format!("{}\n\n", lead.source.label()));

    text.push_str(&format!(
        "Conversion Likelihood: {}\n",
        likelihood_line(lead.conversion_likelihood)
    ));
    text.push_str(&format!(
        "Estimated Rate: {} (per hour)\n",
        lead.estimated_rate.as_deref().unwrap_or("TBD")
    ));
    text.push_str(&format!(
        "Duration: {} (contract length)\n",
        lead.contract_duration.as_deref().unwrap_or("TBD")
    ));
    text.push_str(&format!(
        "Status: {} | {} priority\n",
        lead.status.label(),
        lead.priority.label()
    ));

    if let Some(summary) = &lead.ai_summary {
        text.push_str(&format!("\nAI Analysis\n  {summary}\n"));
    }
    if let Some(recommendation) = &lead.ai_recommendation {
        text.push_str(&format!("\nRecommended Action\n  {recommendation}\n"));
    }

    text.push_str(&format!("\nProject Summary\n  {}\n", lead.message_summary));

    if !lead.dialogue.is_empty() {
        text.push_str("\nConversation History\n");
        for turn in &lead.dialogue {
            // User turns are pushed right like the sender side of a chat.
            let indent = if turn.is_from_user() { "        " } else { "  " };
            text.push_str(&format!(
                "{indent}{} \u{2022} {}\n",
                turn.sender,
                turn.display_timestamp()
            ));
            for line in turn.message.lines() {
                text.push_str(&format!("{indent}  {line}\n"));
            }
        }
    }

    text.push_str(&format!(
        "\nNext Action\n  {}\n  [e] Email Me Next Steps (export report)\n",
        lead.next_action
    ));

    text.push_str("\nGenerate Sample Response\n  ");
    let tones = Tone::ALL
        .iter()
        .enumerate()
        .map(|(index, tone)| {
            if *tone == state.tone {
                format!("[{}:{}]", index + 1, tone.label())
            } else {
                format!(" {}:{} ", index + 1, tone.label())
            }
        })
        .collect::<Vec<_>>();
    text.push_str(&tones.join(" "));
    text.push_str(&format!(
        "\n  [g] Generate {} Response\n",
        state.tone.label()
    ));

    if state.response_preview.is_visible() {
        text.push_str("\nGenerated Response\n");
        for line in compose_outreach(lead, state.tone).lines() {
            text.push_str(&format!("  {line}\n"));
        }
        text.push_str("  [y] Copy to Clipboard | [d] dismiss\n");
    }

    text
}

fn form_overlay_text(form: &FormUiState) -> String {
    let active = form.field();
    let mut lines = Vec::new();
    for field in LeadFormField::ALL {
        let marker = if field == active { '>' } else { ' ' };
        let value = form.input.value(field);
        let rendered = if field.is_choice() {
            format!("< {value} >")
        } else if field == active {
            format!("{value}_")
        } else {
            value.to_owned()
        };
        lines.push(format!("{marker} {}: {rendered}", field.label()));
    }
    lines.push(String::new());
    lines.push("tab/shift+tab field | space cycle | enter add lead | esc cancel".to_owned());
    lines.join("\n")
}

fn chat_overlay_text(state: &AppState, view_data: &ViewData) -> String {
    let chat = &view_data.chat;
    let name = view_data.options.assistant_name.as_str();
    let mut lines = Vec::new();
    if !view_data.options.assistant_subtitle.is_empty() {
        lines.push(view_data.options.assistant_subtitle.clone());
        lines.push(String::new());
    }

    let keep = chat.transcript.len().saturating_sub(16);
    for line in chat.transcript.iter().skip(keep) {
        let label = match line.author {
            ChatAuthor::User => "you",
            ChatAuthor::Assistant => name,
        };
        let stamp = line
            .sent_at
            .and_then(|at| at.format(format_description!("[hour]:[minute]")).ok())
            .map(|at| format!(" {at}"))
            .unwrap_or_default();
        lines.push(format!("{label}{stamp}: {}", line.body));
    }

    if state.is_thinking() {
        lines.push(format!("{name}: ..."));
    }

    lines.push(String::new());
    if chat.input.is_empty() {
        lines.push(format!("> {CHAT_PLACEHOLDER}"));
    } else {
        lines.push(format!("> {}", chat.input));
    }
    lines.push("enter send | ctrl+u clear | esc close".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let hints = if state.chat.is_visible() {
        "enter send | esc close chat"
    } else if state.add_lead.is_visible() {
        "tab field | enter add | esc cancel"
    } else if state.selected_lead.is_some() {
        "h/l or 1-5 tone | g generate | y copy | e export | j/k scroll | esc close"
    } else if view_data.search_editing {
        "type to search | enter keep | esc clear"
    } else {
        "j/k move | enter open | / search | s/t/p filter | x clear | a add | @ chat | ? help | ctrl+q quit"
    };
    match &state.status_line {
        Some(status) => format!("{status} | {hints}"),
        None => hints.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q or ctrl+c quit\n\
list: j/k up/down move | g/G first/last | enter open lead | r reload | q quit\n\
filter: / search | s source | t status | p priority | x clear all\n\
lead: h/l or 1-5 tone | g generate | d dismiss | y copy | e export report | j/k scroll | esc close\n\
add lead: a open | tab/shift+tab field | space cycle choice | enter add | esc cancel\n\
chat: @ or c open | enter send | ctrl+u clear | esc close\n\
help: ? or esc close"
}

fn truncate_label(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{truncated}…")
    } else {
        truncated
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

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, COPIED_STATUS, ChatLine, InternalEvent, RunOptions, ViewData,
        chat_overlay_text, detail_overlay_text, filter_sidebar_text, form_overlay_text,
        handle_key_event, help_overlay_text, likelihood_line, process_internal_events,
        refresh_leads, render, showing_text, status_text, truncate_label, visible_leads,
    };
    use anyhow::{Result, anyhow, bail};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use nescka_app::{
        AppState, ChatAuthor, ChatMessage, ChatMessageId, FilterChoice, Lead, LeadFormInput,
        LeadId, LeadSource, Likelihood, Tone, Visibility, compose_outreach,
    };
    use nescka_db::seed_leads;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::time::Duration;
    use time::OffsetDateTime;

    const GREETING: &str = "hello from the assistant";

    #[derive(Debug, Default)]
    struct TestRuntime {
        leads: Vec<Lead>,
        saved: Vec<ChatMessage>,
        submitted: Vec<LeadFormInput>,
        questions: Vec<String>,
        copied: Vec<String>,
        exported: Vec<LeadId>,
        fail_clipboard: bool,
        // Replies are held back until released when set.
        hold_replies: bool,
        held: Vec<(u64, String)>,
    }

    impl TestRuntime {
        fn seeded() -> Self {
            Self {
                leads: seed_leads(),
                ..Self::default()
            }
        }

        fn release(&mut self, tx: &mpsc::Sender<InternalEvent>) {
            for (request_id, body) in self.held.drain(..) {
                let _ = tx.send(InternalEvent::AssistantReply { request_id, body });
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn load_leads(&mut self) -> Result<Vec<Lead>> {
            Ok(self.leads.clone())
        }

        fn load_transcript(&mut self) -> Result<Vec<ChatMessage>> {
            if self.saved.is_empty() {
                self.append_chat_message(ChatAuthor::Assistant, GREETING)?;
            }
            Ok(self.saved.clone())
        }

        fn append_chat_message(&mut self, author: ChatAuthor, body: &str) -> Result<ChatMessage> {
            let message = ChatMessage {
                id: ChatMessageId::new(self.saved.len() as i64 + 1),
                author,
                body: body.to_owned(),
                created_at: OffsetDateTime::UNIX_EPOCH,
            };
            self.saved.push(message.clone());
            Ok(message)
        }

        fn submit_lead_form(&mut self, input: &LeadFormInput) -> Result<()> {
            self.submitted.push(input.clone());
            Ok(())
        }

        fn answer(&mut self, question: &str, leads: &[Lead]) -> String {
            self.questions.push(question.to_owned());
            format!("{} leads considered", leads.len())
        }

        fn assistant_delay(&self) -> Duration {
            Duration::ZERO
        }

        fn spawn_answer(
            &mut self,
            request_id: u64,
            question: &str,
            leads: &[Lead],
            tx: mpsc::Sender<InternalEvent>,
        ) -> Result<()> {
            let body = self.answer(question, leads);
            if self.hold_replies {
                self.held.push((request_id, body));
                return Ok(());
            }
            tx.send(InternalEvent::AssistantReply { request_id, body })
                .map_err(|_| anyhow!("reply channel closed"))
        }

        fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
            if self.fail_clipboard {
                bail!("terminal refused clipboard write");
            }
            self.copied.push(text.to_owned());
            Ok(())
        }

        fn export_report(&mut self, lead: &Lead) -> Result<PathBuf> {
            self.exported.push(lead.id);
            Ok(PathBuf::from(format!("/tmp/lead-{}.html", lead.id)))
        }
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        view_data: ViewData,
        tx: mpsc::Sender<InternalEvent>,
        rx: mpsc::Receiver<InternalEvent>,
    }

    impl Harness {
        fn new() -> Result<Self> {
            let mut runtime = TestRuntime::seeded();
            let options = RunOptions {
                toast_duration: Duration::from_secs(60),
                assistant_name: "Alexis".to_owned(),
                assistant_subtitle: "Your Lead Assistant".to_owned(),
            };
            let mut view_data = ViewData::new(options);
            refresh_leads(&mut runtime, &mut view_data)?;
            let (tx, rx) = mpsc::channel();
            Ok(Self {
                state: AppState::default(),
                runtime,
                view_data,
                tx,
                rx,
            })
        }

        fn key(&mut self, code: KeyCode) -> bool {
            self.key_with(code, KeyModifiers::NONE)
        }

        fn key_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            let quit = handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                KeyEvent::new(code, modifiers),
            );
            self.pump();
            quit
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.key(KeyCode::Char(ch));
            }
        }

        fn pump(&mut self) {
            process_internal_events(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                &self.rx,
            );
        }

        fn visible_names(&self) -> Vec<String> {
            visible_leads(&self.state, &self.view_data)
                .into_iter()
                .map(|lead| lead.name.clone())
                .collect()
        }

        fn screen(&self, width: u16, height: u16) -> Result<String> {
            let mut terminal = Terminal::new(TestBackend::new(width, height))?;
            terminal.draw(|frame| render(frame, &self.state, &self.view_data))?;
            let buffer = terminal.backend().buffer();
            let mut text = String::new();
            for y in 0..buffer.area.height {
                for x in 0..buffer.area.width {
                    text.push_str(buffer[(x, y)].symbol());
                }
                text.push('\n');
            }
            Ok(text)
        }
    }

    #[test]
    fn filter_keys_cycle_and_clear() -> Result<()> {
        let mut harness = Harness::new()?;
        assert_eq!(harness.visible_names().len(), 8);

        harness.key(KeyCode::Char('s'));
        assert_eq!(
            harness.state.filter.source,
            FilterChoice::Only(LeadSource::Upwork)
        );
        assert_eq!(harness.visible_names().len(), 3);

        harness.key(KeyCode::Char('t'));
        harness.key(KeyCode::Char('p'));
        assert!(!harness.state.filter.is_default());

        harness.key(KeyCode::Char('x'));
        assert!(harness.state.filter.is_default());
        assert_eq!(harness.visible_names().len(), 8);
        Ok(())
    }

    #[test]
    fn search_mode_updates_filter_per_keystroke() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('/'));
        harness.type_text("SARAH");
        assert_eq!(harness.state.filter.search, "SARAH");
        assert_eq!(harness.visible_names(), vec!["Sarah Chen".to_owned()]);

        // 's' is text while searching, not the source filter.
        assert_eq!(harness.state.filter.source, FilterChoice::All);

        harness.key(KeyCode::Backspace);
        assert_eq!(harness.state.filter.search, "SARA");
        harness.key(KeyCode::Enter);
        assert!(!harness.view_data.search_editing);
        assert_eq!(harness.state.filter.search, "SARA");

        harness.key(KeyCode::Char('/'));
        harness.key(KeyCode::Esc);
        assert!(harness.state.filter.search.is_empty());
        Ok(())
    }

    #[test]
    fn cursor_is_clamped_when_filter_narrows() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('G'));
        assert_eq!(harness.view_data.cursor, 7);
        harness.key(KeyCode::Char('s'));
        assert_eq!(harness.view_data.cursor, 2);
        harness.key(KeyCode::Char('j'));
        assert_eq!(harness.view_data.cursor, 2);
        Ok(())
    }

    #[test]
    fn enter_opens_lead_under_cursor_and_esc_closes() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('j'));
        harness.key(KeyCode::Enter);
        assert_eq!(harness.state.selected_lead, Some(LeadId::new(2)));

        harness.key(KeyCode::Char('g'));
        assert_eq!(harness.state.response_preview, Visibility::Visible);

        harness.key(KeyCode::Esc);
        assert_eq!(harness.state.selected_lead, None);
        assert_eq!(harness.state.response_preview, Visibility::Hidden);
        Ok(())
    }

    #[test]
    fn tone_keys_drive_generated_response() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Enter);
        harness.key(KeyCode::Char('4'));
        assert_eq!(harness.state.tone, Tone::Concise);
        harness.key(KeyCode::Char('l'));
        assert_eq!(harness.state.tone, Tone::Enthusiastic);
        harness.key(KeyCode::Char('h'));
        harness.key(KeyCode::Char('g'));

        let lead = &harness.view_data.leads[0];
        let text = detail_overlay_text(lead, &harness.state);
        assert!(text.contains("[g] Generate Concise Response"));
        assert!(text.contains("Generated Response"));
        let first_line = compose_outreach(lead, Tone::Concise)
            .lines()
            .next()
            .map(str::to_owned)
            .unwrap_or_default();
        assert!(text.contains(&first_line));

        harness.key(KeyCode::Char('d'));
        let hidden = detail_overlay_text(&harness.view_data.leads[0], &harness.state);
        assert!(!hidden.contains("Generated Response"));
        Ok(())
    }

    #[test]
    fn copy_shows_toast_only_on_success() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Enter);

        // Nothing to copy before a response is generated.
        harness.key(KeyCode::Char('y'));
        assert!(harness.runtime.copied.is_empty());

        harness.key(KeyCode::Char('g'));
        harness.key(KeyCode::Char('y'));
        assert_eq!(
            harness.runtime.copied,
            vec![compose_outreach(
                &harness.view_data.leads[0],
                Tone::Professional
            )]
        );
        assert_eq!(harness.state.status_line.as_deref(), Some(COPIED_STATUS));

        harness.state.status_line = None;
        harness.runtime.fail_clipboard = true;
        harness.key(KeyCode::Char('y'));
        assert_eq!(harness.state.status_line, None);
        Ok(())
    }

    #[test]
    fn stale_toast_token_does_not_clear_newer_status() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Enter);
        harness.key(KeyCode::Char('g'));
        harness.key(KeyCode::Char('y'));
        let first = harness.view_data.status_token;
        harness.key(KeyCode::Char('e'));
        assert!(harness.view_data.status_token > first);

        harness
            .tx
            .send(InternalEvent::ClearStatus { token: first })?;
        harness.pump();
        assert!(harness.state.status_line.is_some());

        let current = harness.view_data.status_token;
        harness
            .tx
            .send(InternalEvent::ClearStatus { token: current })?;
        harness.pump();
        assert_eq!(harness.state.status_line, None);
        Ok(())
    }

    #[test]
    fn export_reports_saved_path() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('j'));
        harness.key(KeyCode::Char('j'));
        harness.key(KeyCode::Enter);
        harness.key(KeyCode::Char('e'));
        assert_eq!(harness.runtime.exported, vec![LeadId::new(3)]);
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("report saved to /tmp/lead-3.html")
        );
        Ok(())
    }

    #[test]
    fn chat_opens_with_greeting_and_answers() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('@'));
        assert!(harness.state.chat.is_visible());
        assert_eq!(harness.view_data.chat.transcript.len(), 1);
        assert_eq!(harness.view_data.chat.transcript[0].body, GREETING);

        harness.type_text("  how many hot leads  ");
        harness.key(KeyCode::Enter);

        assert_eq!(harness.runtime.questions, vec!["how many hot leads"]);
        assert!(harness.view_data.chat.input.is_empty());
        let bodies: Vec<&str> = harness
            .view_data
            .chat
            .transcript
            .iter()
            .map(|line| line.body.as_str())
            .collect();
        assert_eq!(
            bodies,
            vec![GREETING, "how many hot leads", "8 leads considered"]
        );
        assert!(!harness.state.is_thinking());
        assert_eq!(harness.runtime.saved.len(), 3);
        Ok(())
    }

    #[test]
    fn chat_ignores_blank_input_and_sends_while_thinking() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.runtime.hold_replies = true;
        harness.key(KeyCode::Char('c'));

        harness.type_text("   ");
        harness.key(KeyCode::Enter);
        assert!(harness.runtime.questions.is_empty());

        harness.key_with(KeyCode::Char('u'), KeyModifiers::CONTROL);
        harness.type_text("hi");
        harness.key(KeyCode::Enter);
        assert!(harness.state.is_thinking());

        harness.type_text("second");
        harness.key(KeyCode::Enter);
        assert_eq!(harness.runtime.questions, vec!["hi"]);
        assert_eq!(harness.view_data.chat.input, "second");
        assert!(chat_overlay_text(&harness.state, &harness.view_data).contains("Alexis: ..."));

        harness.runtime.release(&harness.tx);
        harness.pump();
        assert!(!harness.state.is_thinking());
        Ok(())
    }

    #[test]
    fn late_reply_lands_after_chat_closes() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.runtime.hold_replies = true;
        harness.key(KeyCode::Char('@'));
        harness.type_text("next");
        harness.key(KeyCode::Enter);
        harness.key(KeyCode::Esc);
        assert!(!harness.state.chat.is_visible());

        harness.runtime.release(&harness.tx);
        harness.pump();
        let last = harness.view_data.chat.transcript.last().cloned();
        assert_eq!(
            last.map(|line: ChatLine| line.body),
            Some("8 leads considered".to_owned())
        );
        assert!(!harness.state.is_thinking());
        Ok(())
    }

    #[test]
    fn add_lead_form_submits_without_changing_leads() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('a'));
        assert!(harness.state.add_lead.is_visible());

        harness.type_text("Ann Lee");
        harness.key(KeyCode::Tab);
        harness.key(KeyCode::Char(' '));
        harness.key(KeyCode::Tab);
        harness.key(KeyCode::Tab);
        harness.key(KeyCode::Tab);
        harness.type_text("Needs a site");
        harness.key(KeyCode::Enter);

        assert_eq!(harness.runtime.submitted.len(), 1);
        let submitted = &harness.runtime.submitted[0];
        assert_eq!(submitted.name, "Ann Lee");
        assert_eq!(submitted.source, LeadSource::LinkedIn);
        assert_eq!(submitted.message_summary, "Needs a site");
        assert_eq!(harness.view_data.leads.len(), 8);
        assert!(harness.state.add_lead.is_visible());

        let text = form_overlay_text(&harness.view_data.form);
        assert!(text.contains("> Message summary: Needs a site_"));

        harness.key(KeyCode::Esc);
        assert!(!harness.state.add_lead.is_visible());
        Ok(())
    }

    #[test]
    fn help_overlay_absorbs_keys() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('?'));
        assert!(harness.view_data.help_visible);
        assert!(!harness.key(KeyCode::Char('q')));
        assert!(harness.state.filter.is_default());
        harness.key(KeyCode::Esc);
        assert!(!harness.view_data.help_visible);
        assert!(harness.key(KeyCode::Char('q')));
        assert!(help_overlay_text().contains("e export report"));
        Ok(())
    }

    #[test]
    fn ctrl_q_quits_from_any_overlay() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('@'));
        assert!(harness.key_with(KeyCode::Char('q'), KeyModifiers::CONTROL));
        Ok(())
    }

    #[test]
    fn detail_text_lists_sections_and_fallbacks() -> Result<()> {
        let harness = Harness::new()?;
        let sarah = &harness.view_data.leads[0];
        let text = detail_overlay_text(sarah, &harness.state);
        let order = [
            "Conversion Likelihood",
            "Estimated Rate",
            "Duration",
            "Status",
            "AI Analysis",
            "Recommended Action",
            "Project Summary",
            "Conversation History",
            "Next Action",
            "Generate Sample Response",
        ];
        let mut last = 0;
        for heading in order {
            let position = text[last..]
                .find(heading)
                .ok_or_else(|| anyhow!("{heading} missing or out of order"))?;
            last += position;
        }

        let bare = Lead {
            estimated_rate: None,
            contract_duration: None,
            conversion_likelihood: None,
            ai_summary: None,
            ai_recommendation: None,
            dialogue: Vec::new(),
            ..sarah.clone()
        };
        let text = detail_overlay_text(&bare, &harness.state);
        assert!(text.contains("Estimated Rate: TBD"));
        assert!(text.contains("Conversion Likelihood: n/a"));
        assert!(!text.contains("AI Analysis"));
        assert!(!text.contains("Conversation History"));
        Ok(())
    }

    #[test]
    fn likelihood_bar_scales_to_width() {
        let full = likelihood_line(Likelihood::new(100));
        assert!(full.starts_with("100% ["));
        assert!(!full.contains('-'));
        let half = likelihood_line(Likelihood::new(50));
        assert_eq!(half.matches('#').count(), 10);
    }

    #[test]
    fn sidebar_marks_active_choices() -> Result<()> {
        let mut harness = Harness::new()?;
        harness.key(KeyCode::Char('t'));
        let text = filter_sidebar_text(&harness.state);
        assert!(text.contains("> Hot"));
        assert!(text.contains("  Warm"));
        assert!(text.contains("> All"));
        Ok(())
    }

    #[test]
    fn screen_shows_counts_and_empty_state() -> Result<()> {
        let mut harness = Harness::new()?;
        let screen = harness.screen(140, 40)?;
        assert!(screen.contains("Showing 8 of 8 leads"));
        assert!(screen.contains("Sarah Chen"));

        harness.key(KeyCode::Char('/'));
        harness.type_text("zzzz");
        let screen = harness.screen(140, 40)?;
        assert!(screen.contains("Showing 0 of 8 leads"));
        assert!(screen.contains("No leads found"));
        assert_eq!(showing_text(2, 8), "Showing 2 of 8 leads");
        Ok(())
    }

    #[test]
    fn status_hints_follow_overlay() -> Result<()> {
        let mut harness = Harness::new()?;
        assert!(status_text(&harness.state, &harness.view_data).contains("/ search"));
        harness.key(KeyCode::Enter);
        assert!(status_text(&harness.state, &harness.view_data).contains("g generate"));
        Ok(())
    }

    #[test]
    fn default_spawn_answer_replies_after_delay() -> Result<()> {
        struct DelayedRuntime(TestRuntime);

        impl AppRuntime for DelayedRuntime {
            fn load_leads(&mut self) -> Result<Vec<Lead>> {
                self.0.load_leads()
            }
            fn load_transcript(&mut self) -> Result<Vec<ChatMessage>> {
                self.0.load_transcript()
            }
            fn append_chat_message(
                &mut self,
                author: ChatAuthor,
                body: &str,
            ) -> Result<ChatMessage> {
                self.0.append_chat_message(author, body)
            }
            fn submit_lead_form(&mut self, input: &LeadFormInput) -> Result<()> {
                self.0.submit_lead_form(input)
            }
            fn answer(&mut self, question: &str, leads: &[Lead]) -> String {
                self.0.answer(question, leads)
            }
            fn assistant_delay(&self) -> Duration {
                Duration::from_millis(10)
            }
            fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
                self.0.copy_to_clipboard(text)
            }
            fn export_report(&mut self, lead: &Lead) -> Result<PathBuf> {
                self.0.export_report(lead)
            }
        }

        let mut runtime = DelayedRuntime(TestRuntime::seeded());
        let leads = seed_leads();
        let (tx, rx) = mpsc::channel();
        runtime.spawn_answer(7, "count", &leads, tx)?;
        let event = rx.recv_timeout(Duration::from_secs(5))?;
        assert_eq!(
            event,
            InternalEvent::AssistantReply {
                request_id: 7,
                body: "8 leads considered".to_owned(),
            }
        );
        Ok(())
    }

    #[test]
    fn truncate_label_appends_ellipsis() {
        assert_eq!(truncate_label("abcdef", 3), "abc…");
        assert_eq!(truncate_label("abc", 3), "abc");
    }
}
