// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Keyword-driven lead assistant.
//!
//! Replies come from an ordered rule table evaluated against the lowercased
//! question. The first rule whose keywords appear wins; otherwise a lead whose
//! name overlaps the question is described; otherwise a generic fallback
//! echoes the question back.

use nescka_app::{Lead, LeadAttribute, LeadPriority, is_due_today, pipeline_counts};
use std::thread;
use std::time::Duration;

pub const NAME: &str = "Alexis";
pub const SUBTITLE: &str = "Your Lead Assistant";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

pub const GREETING: &str = "Hey! I'm Alexis \u{1F44B}, your AI lead assistant. I can help you manage your leads, check follow-ups, and analyze your pipeline. What would you like to know?";

pub struct Rule {
    pub name: &'static str,
    /// Receives the lowercased question.
    pub matches: fn(&str) -> bool,
    pub respond: fn(&str, &[Lead]) -> String,
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "count",
        matches: |input| contains_any(input, &["how many", "count", "total"]),
        respond: respond_count,
    },
    Rule {
        name: "priority",
        matches: |input| contains_any(input, &["priority", "urgent"]),
        respond: respond_priority,
    },
    Rule {
        name: "next-action",
        matches: |input| contains_any(input, &["next", "follow up", "action"]),
        respond: respond_next_action,
    },
    Rule {
        name: "source",
        matches: |input| contains_any(input, &["upwork", "linkedin", "email", "source"]),
        respond: respond_source,
    },
    Rule {
        name: "greeting",
        matches: |input| contains_any(input, &["hi", "hello", "hey"]),
        respond: |_, _| {
            "Hey there! \u{1F44B} I'm Alexis, your AI lead assistant. I can help you track and manage your leads. Want to know how many hot leads you have, or what needs follow-up today?".to_owned()
        },
    },
    Rule {
        name: "help",
        matches: |input| contains_any(input, &["help", "what can you", "what do you"]),
        respond: |_, _| {
            "I can help you with:\n\u{2022} Lead counts by status or source\n\u{2022} Priority tracking\n\u{2022} Follow-up reminders\n\u{2022} Lead insights\n\nJust ask me anything about your leads!".to_owned()
        },
    },
];

/// Which branch produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match<'a> {
    Rule(&'static str),
    Lead(&'a Lead),
    Fallback,
}

fn contains_any(input: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| input.contains(keyword))
}

fn respond_count(input: &str, leads: &[Lead]) -> String {
    let counts = pipeline_counts(leads);
    if input.contains("hot") {
        format!(
            "You have {} hot leads currently. Should I break down who needs immediate attention?",
            counts.hot
        )
    } else if input.contains("warm") {
        format!(
            "You have {} warm leads. These are great opportunities to nurture!",
            counts.warm
        )
    } else if input.contains("cold") {
        format!(
            "You have {} cold leads. Consider a re-engagement campaign.",
            counts.cold
        )
    } else {
        format!(
            "You have {} total leads in your pipeline. Want details on any specific status?",
            counts.total
        )
    }
}

fn respond_priority(_: &str, leads: &[Lead]) -> String {
    let names: Vec<&str> = leads
        .iter()
        .filter(|lead| lead.priority == LeadPriority::High)
        .map(|lead| lead.name.as_str())
        .collect();
    format!(
        "You have {} high-priority leads: {}. These need immediate follow-up!",
        names.len(),
        names.join(", ")
    )
}

fn respond_next_action(_: &str, leads: &[Lead]) -> String {
    let due: Vec<&Lead> = leads.iter().filter(|lead| is_due_today(lead)).collect();
    let first = due
        .first()
        .map_or("your highest priority lead", |lead| lead.name.as_str());
    format!(
        "You have {} leads needing immediate follow-up today. Consider starting with {first}!",
        due.len()
    )
}

fn respond_source(_: &str, leads: &[Lead]) -> String {
    let counts = pipeline_counts(leads);
    format!(
        "Your leads are distributed across:\n\u{2022} Upwork: {}\n\u{2022} LinkedIn: {}\n\u{2022} Email: {}\n\nWhich channel is performing best for you?",
        counts.upwork, counts.linkedin, counts.email
    )
}

fn describe_lead(lead: &Lead) -> String {
    format!(
        "Here's what I know about {}:\n\u{2022} Source: {}\n\u{2022} Status: {}\n\u{2022} Priority: {}\n\u{2022} Message: {}\n\u{2022} {}",
        lead.name,
        lead.source.label(),
        lead.status.label(),
        lead.priority.label(),
        lead.message_summary,
        lead.next_action
    )
}

fn fallback(input: &str) -> String {
    format!(
        "I understand you're asking about \"{input}\". I can help you track your leads, check follow-ups, analyze your pipeline by status or source. What would you like to know?"
    )
}

pub fn matched_rule<'a>(input: &str, leads: &'a [Lead]) -> Match<'a> {
    let lowered = input.to_lowercase();
    if let Some(rule) = RULES.iter().find(|rule| (rule.matches)(&lowered)) {
        return Match::Rule(rule.name);
    }
    leads
        .iter()
        .find(|lead| {
            let name = lead.name.to_lowercase();
            name.contains(&lowered) || lowered.contains(&name)
        })
        .map_or(Match::Fallback, Match::Lead)
}

/// Answer `input` from the current lead collection.
pub fn respond(input: &str, leads: &[Lead]) -> String {
    let lowered = input.to_lowercase();
    match matched_rule(input, leads) {
        Match::Rule(name) => RULES
            .iter()
            .find(|rule| rule.name == name)
            .map_or_else(|| fallback(input), |rule| (rule.respond)(&lowered, leads)),
        Match::Lead(lead) => describe_lead(lead),
        Match::Fallback => fallback(input),
    }
}

/// Assistant with an artificial thinking pause before each reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assistant {
    delay: Duration,
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Assistant {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn answer(&self, input: &str, leads: &[Lead]) -> String {
        match matched_rule(input, leads) {
            Match::Rule(name) => tracing::debug!(rule = name, "assistant rule matched"),
            Match::Lead(lead) => tracing::debug!(lead_id = lead.id.get(), "assistant lead matched"),
            Match::Fallback => tracing::debug!("assistant fell back"),
        }
        respond(input, leads)
    }

    /// Block the calling thread for the configured delay, then answer.
    pub fn reply_after_delay(&self, input: &str, leads: &[Lead]) -> String {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.answer(input, leads)
    }
}

#[cfg(test)]
mod tests {
    use super::{Assistant, Match, RULES, contains_any, matched_rule};
    use std::time::{Duration, Instant};

    #[test]
    fn rule_order_is_stable() {
        let names: Vec<&str> = RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            vec!["count", "priority", "next-action", "source", "greeting", "help"]
        );
    }

    #[test]
    fn keywords_match_substrings() {
        assert!(contains_any("what's the total?", &["total"]));
        assert!(!contains_any("nothing here", &["total"]));
    }

    #[test]
    fn earlier_rules_shadow_later_ones() {
        // "count" beats "priority" and "hey".
        assert_eq!(
            matched_rule("hey, count my priority leads", &[]),
            Match::Rule("count")
        );
        // "this" contains "hi", so the greeting rule fires.
        assert_eq!(matched_rule("is this working", &[]), Match::Rule("greeting"));
    }

    #[test]
    fn reply_after_delay_waits() {
        let assistant = Assistant::new(Duration::from_millis(20));
        let started = Instant::now();
        let reply = assistant.reply_after_delay("how many leads", &[]);
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(
            reply,
            "You have 0 total leads in your pipeline. Want details on any specific status?"
        );
    }
}
