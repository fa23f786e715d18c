// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::model::{FilterChoice, Lead, LeadAttribute, LeadPriority, LeadSource, LeadStatus};

/// Marker in `next_action` for follow-ups due within a day.
pub const DUE_TODAY_MARKER: &str = "1 day";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    pub source: FilterChoice<LeadSource>,
    pub status: FilterChoice<LeadStatus>,
    pub priority: FilterChoice<LeadPriority>,
    pub search: String,
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        self.source.matches(lead.source)
            && self.status.matches(lead.status)
            && self.priority.matches(lead.priority)
            && search_matches(&self.search, lead)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let FilterChoice::Only(source) = self.source {
            parts.push(format!("source {}", source.label()));
        }
        if let FilterChoice::Only(status) = self.status {
            parts.push(format!("status {}", status.label()));
        }
        if let FilterChoice::Only(priority) = self.priority {
            parts.push(format!("priority {}", priority.label()));
        }
        if !self.search.is_empty() {
            parts.push(format!("search \"{}\"", self.search));
        }
        if parts.is_empty() {
            return "all leads".to_owned();
        }
        parts.join(" | ")
    }
}

fn search_matches(search: &str, lead: &Lead) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    lead.name.to_lowercase().contains(&needle)
        || lead.message_summary.to_lowercase().contains(&needle)
}

/// Leads passing every active predicate, in their original order.
pub fn filter_leads<'a>(leads: &'a [Lead], filter: &LeadFilter) -> Vec<&'a Lead> {
    leads.iter().filter(|lead| filter.matches(lead)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineCounts {
    pub total: usize,
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub upwork: usize,
    pub linkedin: usize,
    pub email: usize,
    pub high_priority: usize,
    pub due_today: usize,
}

impl PipelineCounts {
    pub const fn status(&self, status: LeadStatus) -> usize {
        match status {
            LeadStatus::Hot => self.hot,
            LeadStatus::Warm => self.warm,
            LeadStatus::Cold => self.cold,
        }
    }

    pub const fn source(&self, source: LeadSource) -> usize {
        match source {
            LeadSource::Upwork => self.upwork,
            LeadSource::LinkedIn => self.linkedin,
            LeadSource::Email => self.email,
        }
    }
}

pub fn is_due_today(lead: &Lead) -> bool {
    lead.next_action.contains(DUE_TODAY_MARKER)
}

pub fn pipeline_counts(leads: &[Lead]) -> PipelineCounts {
    let mut counts = PipelineCounts {
        total: leads.len(),
        ..PipelineCounts::default()
    };
    for lead in leads {
        match lead.status {
            LeadStatus::Hot => counts.hot += 1,
            LeadStatus::Warm => counts.warm += 1,
            LeadStatus::Cold => counts.cold += 1,
        }
        match lead.source {
            LeadSource::Upwork => counts.upwork += 1,
            LeadSource::LinkedIn => counts.linkedin += 1,
            LeadSource::Email => counts.email += 1,
        }
        if lead.priority == LeadPriority::High {
            counts.high_priority += 1;
        }
        if is_due_today(lead) {
            counts.due_today += 1;
        }
    }
    counts
}
