// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::LeadFilter;
use crate::model::{FilterChoice, LeadPriority, LeadSource, LeadStatus, Tone};
use crate::LeadId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

impl Visibility {
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantActivity {
    Idle,
    Thinking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub filter: LeadFilter,
    pub add_lead: Visibility,
    /// The lead detail overlay is open exactly when this is set.
    pub selected_lead: Option<LeadId>,
    pub chat: Visibility,
    pub tone: Tone,
    pub response_preview: Visibility,
    pub assistant: AssistantActivity,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            filter: LeadFilter::default(),
            add_lead: Visibility::Hidden,
            selected_lead: None,
            chat: Visibility::Hidden,
            tone: Tone::Professional,
            response_preview: Visibility::Hidden,
            assistant: AssistantActivity::Idle,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SetSourceFilter(FilterChoice<LeadSource>),
    SetStatusFilter(FilterChoice<LeadStatus>),
    SetPriorityFilter(FilterChoice<LeadPriority>),
    CycleSourceFilter,
    CycleStatusFilter,
    CyclePriorityFilter,
    SetSearch(String),
    ClearFilters,
    OpenAddLead,
    CloseAddLead,
    SubmitAddLead,
    SelectLead(LeadId),
    CloseLead,
    SetTone(Tone),
    NextTone,
    PrevTone,
    GenerateResponse,
    HideResponse,
    OpenChat,
    CloseChat,
    AssistantStarted,
    AssistantFinished,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    FilterChanged(LeadFilter),
    AddLeadVisibilityChanged(Visibility),
    LeadSelected(LeadId),
    LeadClosed,
    ToneChanged(Tone),
    ResponsePreviewChanged(Visibility),
    ChatVisibilityChanged(Visibility),
    AssistantActivityChanged(AssistantActivity),
    AssistantBusy,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SetSourceFilter(choice) => {
                self.filter.source = choice;
                self.filter_changed()
            }
            AppCommand::SetStatusFilter(choice) => {
                self.filter.status = choice;
                self.filter_changed()
            }
            AppCommand::SetPriorityFilter(choice) => {
                self.filter.priority = choice;
                self.filter_changed()
            }
            AppCommand::CycleSourceFilter => {
                self.filter.source = self.filter.source.cycle();
                self.filter_changed()
            }
            AppCommand::CycleStatusFilter => {
                self.filter.status = self.filter.status.cycle();
                self.filter_changed()
            }
            AppCommand::CyclePriorityFilter => {
                self.filter.priority = self.filter.priority.cycle();
                self.filter_changed()
            }
            AppCommand::SetSearch(search) => {
                self.filter.search = search;
                self.filter_changed()
            }
            AppCommand::ClearFilters => {
                self.filter = LeadFilter::default();
                self.filter_changed()
            }
            AppCommand::OpenAddLead => {
                self.add_lead = Visibility::Visible;
                vec![AppEvent::AddLeadVisibilityChanged(self.add_lead)]
            }
            AppCommand::CloseAddLead => {
                self.add_lead = Visibility::Hidden;
                vec![AppEvent::AddLeadVisibilityChanged(self.add_lead)]
            }
            // Submission is not wired to any store yet.
            AppCommand::SubmitAddLead => Vec::new(),
            AppCommand::SelectLead(id) => {
                self.selected_lead = Some(id);
                self.response_preview = Visibility::Hidden;
                vec![AppEvent::LeadSelected(id)]
            }
            AppCommand::CloseLead => {
                let mut events = Vec::new();
                if self.selected_lead.take().is_some() {
                    events.push(AppEvent::LeadClosed);
                }
                if self.response_preview.is_visible() {
                    self.response_preview = Visibility::Hidden;
                    events.push(AppEvent::ResponsePreviewChanged(self.response_preview));
                }
                events
            }
            AppCommand::SetTone(tone) => self.set_tone(tone),
            AppCommand::NextTone => self.set_tone(self.tone.next()),
            AppCommand::PrevTone => self.set_tone(self.tone.prev()),
            AppCommand::GenerateResponse => {
                if self.selected_lead.is_none() {
                    return Vec::new();
                }
                self.response_preview = Visibility::Visible;
                vec![AppEvent::ResponsePreviewChanged(self.response_preview)]
            }
            AppCommand::HideResponse => {
                self.response_preview = Visibility::Hidden;
                vec![AppEvent::ResponsePreviewChanged(self.response_preview)]
            }
            AppCommand::OpenChat => {
                self.chat = Visibility::Visible;
                vec![AppEvent::ChatVisibilityChanged(self.chat)]
            }
            AppCommand::CloseChat => {
                self.chat = Visibility::Hidden;
                vec![AppEvent::ChatVisibilityChanged(self.chat)]
            }
            AppCommand::AssistantStarted => {
                if self.assistant == AssistantActivity::Thinking {
                    return vec![AppEvent::AssistantBusy];
                }
                self.assistant = AssistantActivity::Thinking;
                vec![AppEvent::AssistantActivityChanged(self.assistant)]
            }
            AppCommand::AssistantFinished => {
                self.assistant = AssistantActivity::Idle;
                vec![AppEvent::AssistantActivityChanged(self.assistant)]
            }
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// Pure form of [`AppState::dispatch`].
    pub fn reduce(mut self, command: AppCommand) -> (Self, Vec<AppEvent>) {
        let events = self.dispatch(command);
        (self, events)
    }

    pub const fn is_thinking(&self) -> bool {
        matches!(self.assistant, AssistantActivity::Thinking)
    }

    fn filter_changed(&self) -> Vec<AppEvent> {
        vec![AppEvent::FilterChanged(self.filter.clone())]
    }

    fn set_tone(&mut self, tone: Tone) -> Vec<AppEvent> {
        self.tone = tone;
        vec![AppEvent::ToneChanged(tone)]
    }
}
