// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::model::{FilterChoice, LeadAttribute, LeadPriority, LeadSource, LeadStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadFormField {
    Name,
    Source,
    Status,
    Priority,
    MessageSummary,
    NextAction,
}

impl LeadFormField {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Source,
        Self::Status,
        Self::Priority,
        Self::MessageSummary,
        Self::NextAction,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Source => "Source",
            Self::Status => "Status",
            Self::Priority => "Priority",
            Self::MessageSummary => "Message summary",
            Self::NextAction => "Next action",
        }
    }

    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Source | Self::Status | Self::Priority)
    }
}

/// Draft of a new lead as typed into the add-lead form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadFormInput {
    pub name: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub message_summary: String,
    pub next_action: String,
}

impl Default for LeadFormInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            source: LeadSource::Upwork,
            status: LeadStatus::Hot,
            priority: LeadPriority::High,
            message_summary: String::new(),
            next_action: String::new(),
        }
    }
}

impl LeadFormInput {
    pub fn value(&self, field: LeadFormField) -> &str {
        match field {
            LeadFormField::Name => &self.name,
            LeadFormField::Source => self.source.label(),
            LeadFormField::Status => self.status.label(),
            LeadFormField::Priority => self.priority.label(),
            LeadFormField::MessageSummary => &self.message_summary,
            LeadFormField::NextAction => &self.next_action,
        }
    }

    fn text_mut(&mut self, field: LeadFormField) -> Option<&mut String> {
        match field {
            LeadFormField::Name => Some(&mut self.name),
            LeadFormField::MessageSummary => Some(&mut self.message_summary),
            LeadFormField::NextAction => Some(&mut self.next_action),
            LeadFormField::Source | LeadFormField::Status | LeadFormField::Priority => None,
        }
    }

    pub fn push_char(&mut self, field: LeadFormField, ch: char) {
        if let Some(text) = self.text_mut(field) {
            text.push(ch);
        }
    }

    pub fn pop_char(&mut self, field: LeadFormField) {
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    /// Advance a choice field to its next option; text fields are untouched.
    pub fn cycle_choice(&mut self, field: LeadFormField) {
        match field {
            LeadFormField::Source => self.source = next_value(self.source),
            LeadFormField::Status => self.status = next_value(self.status),
            LeadFormField::Priority => self.priority = next_value(self.priority),
            LeadFormField::Name | LeadFormField::MessageSummary | LeadFormField::NextAction => {}
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("lead name is required -- enter a name and retry");
        }
        if self.message_summary.trim().is_empty() {
            bail!("message summary is required -- describe the inquiry and retry");
        }
        Ok(())
    }
}

fn next_value<T: LeadAttribute>(value: T) -> T {
    match FilterChoice::Only(value).cycle() {
        FilterChoice::Only(next) => next,
        FilterChoice::All => T::ALL.first().copied().unwrap_or(value),
    }
}

#[cfg(test)]
mod tests {
    use super::{LeadFormField, LeadFormInput};
    use crate::{LeadPriority, LeadSource, LeadStatus};

    #[test]
    fn defaults_select_first_options() {
        let input = LeadFormInput::default();
        assert_eq!(input.source, LeadSource::Upwork);
        assert_eq!(input.status, LeadStatus::Hot);
        assert_eq!(input.priority, LeadPriority::High);
        assert_eq!(input.value(LeadFormField::Name), "");
    }

    #[test]
    fn typing_only_touches_text_fields() {
        let mut input = LeadFormInput::default();
        for ch in "Ann".chars() {
            input.push_char(LeadFormField::Name, ch);
        }
        input.push_char(LeadFormField::Source, 'x');
        input.pop_char(LeadFormField::Name);
        assert_eq!(input.name, "An");
        assert_eq!(input.value(LeadFormField::Source), "Upwork");
    }

    #[test]
    fn choice_fields_wrap_around() {
        let mut input = LeadFormInput::default();
        for _ in 0..3 {
            input.cycle_choice(LeadFormField::Priority);
        }
        assert_eq!(input.priority, LeadPriority::High);
        input.cycle_choice(LeadFormField::Source);
        assert_eq!(input.source, LeadSource::LinkedIn);
        assert!(LeadFormField::Status.is_choice());
        assert!(!LeadFormField::NextAction.is_choice());
    }

    #[test]
    fn validate_requires_name_and_summary() {
        let mut input = LeadFormInput::default();
        let error = input.validate().expect_err("empty form should fail");
        assert!(error.to_string().contains("lead name is required"));

        input.name = "Ann Lee".to_owned();
        assert!(input.validate().is_err());

        input.message_summary = "Needs a website".to_owned();
        assert!(input.validate().is_ok());
    }
}
