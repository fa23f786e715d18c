// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::ids::*;

/// Closed set of labelled values a lead attribute can take.
pub trait LeadAttribute: Copy + Eq + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadSource {
    Upwork,
    LinkedIn,
    Email,
}

impl LeadAttribute for LeadSource {
    const ALL: &'static [Self] = &[Self::Upwork, Self::LinkedIn, Self::Email];

    fn label(self) -> &'static str {
        match self {
            Self::Upwork => "Upwork",
            Self::LinkedIn => "LinkedIn",
            Self::Email => "Email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    Hot,
    Warm,
    Cold,
}

impl LeadAttribute for LeadStatus {
    const ALL: &'static [Self] = &[Self::Hot, Self::Warm, Self::Cold];

    fn label(self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Warm => "Warm",
            Self::Cold => "Cold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadPriority {
    High,
    Medium,
    Low,
}

impl LeadAttribute for LeadPriority {
    const ALL: &'static [Self] = &[Self::High, Self::Medium, Self::Low];

    fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// A filter selection over one attribute: the wildcard or a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterChoice<T> {
    All,
    Only(T),
}

impl<T> Default for FilterChoice<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: LeadAttribute> FilterChoice<T> {
    pub fn matches(self, value: T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(value) => value.label(),
        }
    }

    /// Every selectable option in sidebar order, wildcard first.
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(T::ALL.iter().copied().map(Self::Only))
            .collect()
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::All => T::ALL.first().copied().map_or(Self::All, Self::Only),
            Self::Only(value) => {
                let position = T::ALL.iter().position(|candidate| *candidate == value);
                match position.and_then(|index| T::ALL.get(index + 1)) {
                    Some(next) => Self::Only(*next),
                    None => Self::All,
                }
            }
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        T::parse(value).map(Self::Only)
    }
}

/// Conversion likelihood as a percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Likelihood(u8);

impl Likelihood {
    pub const MAX: u8 = 100;

    pub const fn new(value: u8) -> Option<Self> {
        if value > Self::MAX {
            None
        } else {
            Some(Self(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Likelihood {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
            .ok_or_else(|| format!("conversion likelihood must be within 0..=100, got {value}"))
    }
}

impl From<Likelihood> for u8 {
    fn from(value: Likelihood) -> Self {
        value.0
    }
}

pub const USER_SENDER: &str = "You";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub id: DialogueTurnId,
    pub sender: String,
    pub message: String,
    pub sent_at: PrimitiveDateTime,
}

impl DialogueTurn {
    pub fn is_from_user(&self) -> bool {
        self.sender == USER_SENDER
    }

    pub fn display_timestamp(&self) -> String {
        self.sent_at
            .format(&format_description!(
                "[year]-[month]-[day] [hour]:[minute]"
            ))
            .unwrap_or_else(|_| self.sent_at.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub message_summary: String,
    pub next_action: String,
    pub estimated_rate: Option<String>,
    pub contract_duration: Option<String>,
    pub conversion_likelihood: Option<Likelihood>,
    pub ai_summary: Option<String>,
    pub ai_recommendation: Option<String>,
    pub dialogue: Vec<DialogueTurn>,
}

impl Lead {
    pub fn first_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or(&self.name)
    }

    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }

    /// The trailing `count` dialogue turns, oldest first.
    pub fn recent_dialogue(&self, count: usize) -> &[DialogueTurn] {
        let start = self.dialogue.len().saturating_sub(count);
        &self.dialogue[start..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatAuthor {
    User,
    Assistant,
}

impl ChatAuthor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub author: ChatAuthor,
    pub body: String,
    pub created_at: OffsetDateTime,
}

impl ChatMessage {
    pub const fn is_assistant(&self) -> bool {
        matches!(self.author, ChatAuthor::Assistant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Casual,
    Concise,
    Enthusiastic,
}

impl Tone {
    pub const ALL: [Self; 5] = [
        Self::Professional,
        Self::Friendly,
        Self::Casual,
        Self::Concise,
        Self::Enthusiastic,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Friendly => "Friendly",
            Self::Casual => "Casual",
            Self::Concise => "Concise",
            Self::Enthusiastic => "Enthusiastic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(value))
    }

    pub fn next(self) -> Self {
        self.rotate(1)
    }

    pub fn prev(self) -> Self {
        self.rotate(-1)
    }

    fn rotate(self, delta: isize) -> Self {
        let current = Self::ALL
            .iter()
            .position(|tone| *tone == self)
            .unwrap_or(0) as isize;
        let len = Self::ALL.len() as isize;
        Self::ALL[(current + delta).rem_euclid(len) as usize]
    }
}
