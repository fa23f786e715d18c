// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{Lead, Tone};

pub const SIGNATURE: &str = "[Your Name]";

/// Render the outreach draft for `lead` in the requested tone.
///
/// Output depends only on the lead's name and summary, so repeated calls
/// with the same inputs produce identical text.
pub fn compose_outreach(lead: &Lead, tone: Tone) -> String {
    let first = lead.first_name();
    match tone {
        Tone::Professional => format!(
            "Dear {first},\n\n\
             Thank you for reaching out regarding the {summary}.\n\n\
             Based on your requirements, I'm confident we can deliver a solution that meets your needs. \
             I would appreciate the opportunity to discuss this project in detail and provide you with a comprehensive proposal.\n\n\
             I'm available for a call this week at your convenience. Please let me know what time works best for you.\n\n\
             Best regards,\n{SIGNATURE}",
            summary = lead.message_summary.to_lowercase(),
        ),
        Tone::Friendly => format!(
            "Hi {first}! \u{1F44B}\n\n\
             Thanks for getting in touch about {summary}! I'm excited about the opportunity to work together.\n\n\
             I'd love to learn more about your vision and how I can help bring it to life. \
             Would you be open to a quick call this week? I'm flexible with timing!\n\n\
             Looking forward to chatting!\n\n\
             Best,\n{SIGNATURE}",
            summary = lead.message_summary.to_lowercase(),
        ),
        Tone::Casual => format!(
            "Hey {first}!\n\n\
             Just saw your message about the project - sounds cool! \
             I've worked on similar stuff before and would be stoked to help out.\n\n\
             Wanna hop on a quick call this week to discuss? Happy to work around your schedule.\n\n\
             Cheers!\n{SIGNATURE}"
        ),
        Tone::Concise => format!(
            "{first},\n\n\
             Interested in discussing your project. Available for a call this week.\n\n\
             Best,\n{SIGNATURE}"
        ),
        Tone::Enthusiastic => format!(
            "Hi {first}!\n\n\
             This is fantastic! \u{1F389} Your project sounds amazing and I'm genuinely excited about the possibility of working together.\n\n\
             {summary} is exactly the kind of challenge I love taking on! \
             I'd be thrilled to dive deeper into your vision and show you how I can make this a reality.\n\n\
             Let's schedule a call ASAP - I'm eager to get started!\n\n\
             Excited to connect,\n{SIGNATURE} \u{1F4AA}",
            summary = lead.message_summary,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{SIGNATURE, compose_outreach};
    use crate::{Lead, LeadId, LeadPriority, LeadSource, LeadStatus, Tone};

    fn sarah() -> Lead {
        Lead {
            id: LeadId::new(1),
            name: "Sarah Chen".to_owned(),
            source: LeadSource::Upwork,
            status: LeadStatus::Hot,
            priority: LeadPriority::High,
            message_summary: "Looking for a full-stack developer for a 6-month project".to_owned(),
            next_action: "Follow up in 1 day".to_owned(),
            estimated_rate: None,
            contract_duration: None,
            conversion_likelihood: None,
            ai_summary: None,
            ai_recommendation: None,
            dialogue: Vec::new(),
        }
    }

    fn has_emoji(text: &str) -> bool {
        text.chars().any(|ch| ch as u32 >= 0x1F300)
    }

    #[test]
    fn concise_uses_first_name_and_signature() {
        let draft = compose_outreach(&sarah(), Tone::Concise);
        assert_eq!(
            draft,
            "Sarah,\n\nInterested in discussing your project. Available for a call this week.\n\nBest,\n[Your Name]"
        );
        assert!(!has_emoji(&draft));
    }

    #[test]
    fn professional_lowercases_summary() {
        let draft = compose_outreach(&sarah(), Tone::Professional);
        assert!(draft.starts_with("Dear Sarah,\n\n"));
        assert!(draft.contains(
            "regarding the looking for a full-stack developer for a 6-month project.\n\n"
        ));
        assert!(draft.contains("I'm confident we can deliver a solution that meets your needs. I would appreciate"));
        assert!(draft.ends_with("Best regards,\n[Your Name]"));
        assert!(!has_emoji(&draft));
    }

    #[test]
    fn enthusiastic_keeps_summary_casing() {
        let draft = compose_outreach(&sarah(), Tone::Enthusiastic);
        assert!(draft.contains(
            "\n\nLooking for a full-stack developer for a 6-month project is exactly the kind of challenge"
        ));
        assert!(draft.ends_with("[Your Name] \u{1F4AA}"));
    }

    #[test]
    fn friendly_and_casual_greet_by_first_name() {
        let friendly = compose_outreach(&sarah(), Tone::Friendly);
        assert!(friendly.starts_with("Hi Sarah! \u{1F44B}\n\n"));
        assert!(friendly.contains("getting in touch about looking for a full-stack"));
        let casual = compose_outreach(&sarah(), Tone::Casual);
        assert!(casual.starts_with("Hey Sarah!\n\nJust saw your message about the project - sounds cool! I've worked"));
        assert!(casual.ends_with("Cheers!\n[Your Name]"));
    }

    #[test]
    fn every_tone_is_deterministic_and_signed() {
        let lead = sarah();
        for tone in Tone::ALL {
            let first = compose_outreach(&lead, tone);
            assert_eq!(first, compose_outreach(&lead, tone));
            assert!(first.contains(SIGNATURE), "{tone:?} lacks signature");
        }
    }
}
