// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use nescka_app::{
    DialogueTurn, DialogueTurnId, Lead, LeadId, LeadPriority, LeadSource, LeadStatus, Likelihood,
};
use time::PrimitiveDateTime;
use time::macros::datetime;

struct SeedTurn {
    sender: &'static str,
    message: &'static str,
    sent_at: PrimitiveDateTime,
}

const fn turn(sender: &'static str, message: &'static str, sent_at: PrimitiveDateTime) -> SeedTurn {
    SeedTurn {
        sender,
        message,
        sent_at,
    }
}

struct SeedLead {
    name: &'static str,
    source: LeadSource,
    message_summary: &'static str,
    status: LeadStatus,
    priority: LeadPriority,
    next_action: &'static str,
    estimated_rate: &'static str,
    contract_duration: &'static str,
    conversion_likelihood: u8,
    ai_summary: &'static str,
    ai_recommendation: &'static str,
    dialogue: &'static [SeedTurn],
}

const SEED_LEADS: &[SeedLead] = &[
    SeedLead {
        name: "Sarah Chen",
        source: LeadSource::Upwork,
        message_summary: "Looking for a full-stack developer for a 6-month project",
        status: LeadStatus::Hot,
        priority: LeadPriority::High,
        next_action: "Follow up in 1 day",
        estimated_rate: "$75-95/hr",
        contract_duration: "6 months",
        conversion_likelihood: 85,
        ai_summary: "Sarah is actively hiring and impressed with your portfolio. She mentioned budget flexibility and needs to move quickly. Her communication is professional and decisive.",
        ai_recommendation: "Send the proposal document today with specific timeline. Offer a quick call to discuss technical architecture. This lead is ready to convert with the right proposal.",
        dialogue: &[
            turn("Sarah Chen", "Hi! I saw your profile on Upwork and was impressed with your React and Node.js work. I need a full-stack developer for a 6-month project building a SaaS platform.", datetime!(2024-01-15 09:00)),
            turn("You", "Thanks Sarah! I'd love to learn more about your platform. What's the timeline and what features are you looking to build?", datetime!(2024-01-15 09:15)),
            turn("Sarah Chen", "We need to launch an MVP in 3 months, then scale features over the next 3 months. Key features: user auth, subscription billing, dashboard analytics, and API integrations.", datetime!(2024-01-15 09:30)),
            turn("You", "Sounds exciting! I've built similar platforms before. I can work 40 hours/week and provide daily updates. Would you like to see my portfolio samples?", datetime!(2024-01-15 10:00)),
            turn("Sarah Chen", "Yes please! Also, what's your rate range? Budget is flexible for the right developer.", datetime!(2024-01-15 10:30)),
        ],
    },
    SeedLead {
        name: "Michael Rodriguez",
        source: LeadSource::LinkedIn,
        message_summary: "Interested in discussing a potential collaboration",
        status: LeadStatus::Warm,
        priority: LeadPriority::Medium,
        next_action: "Follow up in 3 days",
        estimated_rate: "$60-80/hr",
        contract_duration: "3-4 months",
        conversion_likelihood: 60,
        ai_summary: "Michael is exploring options and considering multiple developers. He's budget-conscious but appreciates quality. The project is still in early planning stages.",
        ai_recommendation: "Send a detailed case study showing ROI from similar projects. Offer a free 30-minute consultation to discuss his vision. Focus on demonstrating long-term value.",
        dialogue: &[
            turn("Michael Rodriguez", "Hi! I found your LinkedIn profile and saw you specialize in e-commerce platforms. I'm looking to revamp our online store.", datetime!(2024-01-14 14:20)),
            turn("You", "Hi Michael! Happy to help. What's the current state of your store and what improvements are you looking for?", datetime!(2024-01-14 15:00)),
            turn("Michael Rodriguez", "We're using an old Magento setup. Looking to modernize to a React-based solution with better mobile experience.", datetime!(2024-01-14 16:15)),
            turn("You", "Got it! I have experience migrating legacy e-commerce to modern stacks. Could we schedule a call to discuss your specific requirements?", datetime!(2024-01-14 17:00)),
            turn("Michael Rodriguez", "Let me check with my team first. I'll get back to you soon with more details.", datetime!(2024-01-14 18:30)),
        ],
    },
    SeedLead {
        name: "Emily Johnson",
        source: LeadSource::Email,
        message_summary: "Need help with AI integration in existing platform",
        status: LeadStatus::Hot,
        priority: LeadPriority::High,
        next_action: "Follow up in 2 days",
        estimated_rate: "$85-100/hr",
        contract_duration: "4 months",
        conversion_likelihood: 90,
        ai_summary: "Emily has a clear understanding of what she needs and has budget approved. She respects your expertise and is open to your recommendations. This is a high-value project.",
        ai_recommendation: "Provide a detailed technical proposal within 48 hours. Highlight your AI/ML experience with specific examples. She's ready to make a decision quickly.",
        dialogue: &[
            turn("Emily Johnson", "Hello! We met at the AI conference last month. I need someone to help integrate ChatGPT API into our customer service platform.", datetime!(2024-01-13 11:00)),
            turn("You", "Hi Emily! Great to hear from you. What's your current tech stack and what kind of AI features are you envisioning?", datetime!(2024-01-13 11:30)),
            turn("Emily Johnson", "We use Node.js backend with PostgreSQL. Looking to add intelligent ticket routing, automated responses, and sentiment analysis for our support team.", datetime!(2024-01-13 12:00)),
            turn("You", "Perfect! I've built exactly this kind of system. I can integrate OpenAI APIs, build the routing logic, and create a dashboard for monitoring. Budget approved?", datetime!(2024-01-13 13:00)),
            turn("Emily Johnson", "Yes, budget is set aside. Can you send me a proposal with timeline by EOW? We want to start asap.", datetime!(2024-01-13 14:00)),
        ],
    },
    SeedLead {
        name: "David Kim",
        source: LeadSource::Upwork,
        message_summary: "Quick question about pricing for web development",
        status: LeadStatus::Cold,
        priority: LeadPriority::Low,
        next_action: "Follow up in 5 days",
        estimated_rate: "$40-50/hr",
        contract_duration: "2 weeks",
        conversion_likelihood: 30,
        ai_summary: "David appears to be shopping around for the lowest price. His project scope is unclear and budget seems limited. Not much engagement.",
        ai_recommendation: "Send a standard price range and template portfolio link. Don't invest much time unless he clarifies scope and shows serious intent.",
        dialogue: &[
            turn("David Kim", "Hi, how much do you charge for web development?", datetime!(2024-01-12 09:00)),
            turn("You", "Hi David! It depends on the project. Could you tell me more about what you're looking to build?", datetime!(2024-01-12 10:00)),
            turn("David Kim", "Just a simple website. What's your rate?", datetime!(2024-01-12 14:00)),
            turn("You", "For simple sites, typically $50-75/hr. What kind of site are you envisioning? Portfolio, e-commerce, business?", datetime!(2024-01-12 15:00)),
            turn("David Kim", "Ok thanks, I'll let you know", datetime!(2024-01-12 16:00)),
        ],
    },
    SeedLead {
        name: "Lisa Thompson",
        source: LeadSource::LinkedIn,
        message_summary: "Potential long-term project starting next quarter",
        status: LeadStatus::Warm,
        priority: LeadPriority::Medium,
        next_action: "Follow up in 7 days",
        estimated_rate: "$70-85/hr",
        contract_duration: "6-12 months",
        conversion_likelihood: 70,
        ai_summary: "Lisa is planning ahead for Q2. She values long-term partnerships and quality work. Early discussions show good alignment on approach.",
        ai_recommendation: "Stay in touch monthly with valuable insights. Share relevant articles about her industry. Build relationship for the Q2 opportunity.",
        dialogue: &[
            turn("Lisa Thompson", "Hello! I saw your post about API architecture - very insightful! We might have a project starting in Q2.", datetime!(2024-01-10 10:00)),
            turn("You", "Hi Lisa! That sounds interesting. What kind of project are you planning?", datetime!(2024-01-10 11:00)),
            turn("Lisa Thompson", "Rebuilding our legacy system with microservices. Looking for someone who can architect the solution and lead implementation.", datetime!(2024-01-10 12:00)),
            turn("You", "That's right in my wheelhouse! I've architected several microservices transformations. Would love to discuss your current stack.", datetime!(2024-01-10 13:00)),
            turn("Lisa Thompson", "Perfect! Let me connect you with our CTO. Q2 kickoff, but we can start planning now.", datetime!(2024-01-10 14:00)),
        ],
    },
    SeedLead {
        name: "James Wilson",
        source: LeadSource::Email,
        message_summary: "Requesting a quote for mobile app development",
        status: LeadStatus::Hot,
        priority: LeadPriority::High,
        next_action: "Follow up in 1 day",
        estimated_rate: "$90-110/hr",
        contract_duration: "5 months",
        conversion_likelihood: 80,
        ai_summary: "James has a well-defined project with funding secured. He's tech-savvy and asks good questions. Strong interest in working with you.",
        ai_recommendation: "Send detailed proposal tomorrow. Include wireframes or mockups if available. He's evaluating 2-3 developers - stand out with specificity.",
        dialogue: &[
            turn("James Wilson", "Hi! I got your contact from a mutual friend. Need an iOS/Android app developer for a fintech startup.", datetime!(2024-01-16 08:00)),
            turn("You", "Hi James! Exciting space. Tell me about the app concept and tech requirements.", datetime!(2024-01-16 09:00)),
            turn("James Wilson", "We're building a P2P lending app using React Native. Need banking integrations, KYC verification, real-time payments. Series A funded.", datetime!(2024-01-16 10:00)),
            turn("You", "Sounds like a great project! I've worked with banking APIs and payment systems before. When do you plan to launch?", datetime!(2024-01-16 11:00)),
            turn("James Wilson", "Beta in 4 months, full launch in 6. We need someone full-time. Can you start in 2 weeks?", datetime!(2024-01-16 12:00)),
            turn("You", "Yes, I have capacity. Would love to discuss the full scope and see wireframes. I'm available for a call this week.", datetime!(2024-01-16 13:00)),
        ],
    },
    SeedLead {
        name: "Rachel Green",
        source: LeadSource::Upwork,
        message_summary: "Brief inquiry about availability",
        status: LeadStatus::Cold,
        priority: LeadPriority::Low,
        next_action: "Follow up in 10 days",
        estimated_rate: "Not discussed",
        contract_duration: "Unknown",
        conversion_likelihood: 20,
        ai_summary: "Rachel sent a generic inquiry with minimal details. Limited engagement and unclear project scope. Low urgency signals.",
        ai_recommendation: "Send a brief availability update. If no detailed response, mark as cold after 2 weeks.",
        dialogue: &[
            turn("Rachel Green", "Hi, are you available for a project?", datetime!(2024-01-11 15:00)),
            turn("You", "Hi Rachel! I might be. What kind of project are you working on?", datetime!(2024-01-11 16:00)),
            turn("Rachel Green", "Just checking availability. I'll reach out if I need help.", datetime!(2024-01-11 17:00)),
        ],
    },
    SeedLead {
        name: "Thomas Anderson",
        source: LeadSource::LinkedIn,
        message_summary: "Interested in your portfolio, let's connect",
        status: LeadStatus::Warm,
        priority: LeadPriority::Medium,
        next_action: "Follow up in 4 days",
        estimated_rate: "$65-80/hr",
        contract_duration: "3 months",
        conversion_likelihood: 55,
        ai_summary: "Thomas is networking and building connections. He has an interesting project idea but is still in the research phase.",
        ai_recommendation: "Continue LinkedIn engagement. Share relevant work samples. Nurture the relationship - he could convert when ready.",
        dialogue: &[
            turn("Thomas Anderson", "Great portfolio! Love your design work. Let's connect - might have something interesting.", datetime!(2024-01-09 10:00)),
            turn("You", "Thanks Thomas! What kind of work are you doing?", datetime!(2024-01-09 11:00)),
            turn("Thomas Anderson", "Building a SaaS for creators. Still in ideation but love your aesthetic. Will keep you posted!", datetime!(2024-01-09 12:00)),
        ],
    },
];

/// The demo pipeline every session starts with.
///
/// Lead ids follow seed order starting at 1; dialogue turn ids are numbered
/// across the whole set so they stay unique once stored.
pub fn seed_leads() -> Vec<Lead> {
    let mut next_turn_id = 1;
    SEED_LEADS
        .iter()
        .zip(1..)
        .map(|(seed, id)| {
            let dialogue = seed
                .dialogue
                .iter()
                .map(|turn| {
                    let id = DialogueTurnId::new(next_turn_id);
                    next_turn_id += 1;
                    DialogueTurn {
                        id,
                        sender: turn.sender.to_owned(),
                        message: turn.message.to_owned(),
                        sent_at: turn.sent_at,
                    }
                })
                .collect();
            Lead {
                id: LeadId::new(id),
                name: seed.name.to_owned(),
                source: seed.source,
                status: seed.status,
                priority: seed.priority,
                message_summary: seed.message_summary.to_owned(),
                next_action: seed.next_action.to_owned(),
                estimated_rate: Some(seed.estimated_rate.to_owned()),
                contract_duration: Some(seed.contract_duration.to_owned()),
                conversion_likelihood: Likelihood::new(seed.conversion_likelihood),
                ai_summary: Some(seed.ai_summary.to_owned()),
                ai_recommendation: Some(seed.ai_recommendation.to_owned()),
                dialogue,
            }
        })
        .collect()
}
