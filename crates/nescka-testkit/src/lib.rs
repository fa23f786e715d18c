// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use nescka_app::{
    DialogueTurn, DialogueTurnId, FilterChoice, Lead, LeadAttribute, LeadFilter, LeadId,
    Likelihood, USER_SENDER,
};
use std::path::PathBuf;
use time::macros::datetime;
use time::{Duration, PrimitiveDateTime};

const FIRST_NAMES: [&str; 16] = [
    "Nora", "Felix", "Priya", "Mateo", "Ines", "Omar", "Greta", "Hugo", "Leila", "Tobias",
    "Yuki", "Anya", "Marcus", "Sofia", "Dev", "Clara",
];
const LAST_NAMES: [&str; 18] = [
    "Okafor", "Lindqvist", "Nakamura", "Haddad", "Moreau", "Kowalski", "Brennan", "Silva",
    "Patel", "Novak", "Fischer", "Castillo", "Ahmed", "Larsen", "Whitfield", "Romano", "Chowdhury",
    "Vance",
];

const SUMMARY_OPENERS: [&str; 8] = [
    "Looking for",
    "Need help with",
    "Interested in",
    "Requesting a quote for",
    "Quick question about",
    "Potential long-term",
    "Brief inquiry about",
    "Exploring options for",
];
const SUMMARY_SUBJECTS: [&str; 10] = [
    "a mobile app rebuild",
    "AI integration",
    "web development pricing",
    "a data pipeline",
    "an e-commerce storefront",
    "dashboard design",
    "API consulting",
    "a marketing site",
    "cloud migration",
    "payment processing",
];

const RATES: [&str; 6] = [
    "$40-50/hr",
    "$60-80/hr",
    "$75-95/hr",
    "$85-100/hr",
    "$90-110/hr",
    "Not discussed",
];
const DURATIONS: [&str; 6] = [
    "2 weeks",
    "3 months",
    "4 months",
    "6 months",
    "6-12 months",
    "Unknown",
];
const FOLLOW_UP_DAYS: [u8; 7] = [1, 2, 3, 4, 5, 7, 10];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for plausible leads and filter selections.
#[derive(Debug, Clone)]
pub struct LeadFaker {
    rng: DeterministicRng,
    next_id: i64,
    next_turn_id: i64,
}

impl LeadFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
            next_turn_id: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn lead(&mut self) -> Lead {
        let id = LeadId::new(self.next_id);
        self.next_id += 1;

        let name = format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES));
        let summary = format!(
            "{} {}",
            self.pick(&SUMMARY_OPENERS),
            self.pick(&SUMMARY_SUBJECTS)
        );
        let days = FOLLOW_UP_DAYS[self.rng.int_n(FOLLOW_UP_DAYS.len())];
        let next_action = if days == 1 {
            "Follow up in 1 day".to_owned()
        } else {
            format!("Follow up in {days} days")
        };

        let with_details = self.rng.bool();
        let turn_count = self.rng.int_n(7);
        let dialogue: Vec<DialogueTurn> = (0..turn_count)
            .map(|index| self.dialogue_turn(&name, index))
            .collect();

        Lead {
            id,
            source: self.attribute(),
            status: self.attribute(),
            priority: self.attribute(),
            message_summary: summary,
            next_action,
            estimated_rate: with_details.then(|| self.pick(&RATES).to_owned()),
            contract_duration: with_details.then(|| self.pick(&DURATIONS).to_owned()),
            conversion_likelihood: with_details
                .then(|| Likelihood::new(self.rng.int_n(101) as u8))
                .flatten(),
            ai_summary: with_details.then(|| format!("{name} is a promising fit.")),
            ai_recommendation: with_details.then(|| "Schedule a discovery call.".to_owned()),
            dialogue,
            name,
        }
    }

    pub fn leads(&mut self, count: usize) -> Vec<Lead> {
        (0..count).map(|_| self.lead()).collect()
    }

    /// A random selection; the search text is drawn from `leads` when possible
    /// and its casing is scrambled.
    pub fn filter(&mut self, leads: &[Lead]) -> LeadFilter {
        LeadFilter {
            source: self.choice(),
            status: self.choice(),
            priority: self.choice(),
            search: self.search_text(leads),
        }
    }

    pub fn search_text(&mut self, leads: &[Lead]) -> String {
        if leads.is_empty() || self.rng.int_n(3) == 0 {
            return String::new();
        }
        let lead = &leads[self.rng.int_n(leads.len())];
        let haystack = if self.rng.bool() {
            lead.name.as_str()
        } else {
            lead.message_summary.as_str()
        };
        let chars: Vec<char> = haystack.chars().collect();
        let start = self.rng.int_n(chars.len());
        let len = 1 + self.rng.int_n((chars.len() - start).min(6));
        chars[start..start + len]
            .iter()
            .map(|ch| {
                if self.rng.bool() {
                    ch.to_ascii_uppercase()
                } else {
                    ch.to_ascii_lowercase()
                }
            })
            .collect()
    }

    fn choice<T: LeadAttribute>(&mut self) -> FilterChoice<T> {
        let options = FilterChoice::<T>::options();
        options[self.rng.int_n(options.len())]
    }

    fn attribute<T: LeadAttribute>(&mut self) -> T {
        T::ALL[self.rng.int_n(T::ALL.len())]
    }

    fn dialogue_turn(&mut self, name: &str, index: usize) -> DialogueTurn {
        let id = DialogueTurnId::new(self.next_turn_id);
        self.next_turn_id += 1;
        let sender = if index % 2 == 0 { name } else { USER_SENDER };
        let offset = Duration::minutes((index as i64) * 45 + self.rng.int_n(30) as i64);
        DialogueTurn {
            id,
            sender: sender.to_owned(),
            message: format!("Message {} about {}", index + 1, self.pick(&SUMMARY_SUBJECTS)),
            sent_at: reference_time() + offset,
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn reference_time() -> PrimitiveDateTime {
    datetime!(2024-01-15 09:00)
}

pub fn temp_export_dir() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let reports = dir.path().join("reports");
    Ok((dir, reports))
}
