// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use base64::Engine;

use crate::model::{DialogueTurn, Lead, LeadAttribute, LeadPriority, LeadStatus, Tone};
use crate::outreach::compose_outreach;

pub const REPORT_TITLE: &str = "Nescka Lead Tracker";
pub const DATA_URI_PREFIX: &str = "data:text/html;charset=utf-8;base64,";
const RECENT_TURNS: usize = 3;
const MISSING_VALUE: &str = "TBD";
const BRAND_GRADIENT: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

struct StatusPalette {
    card: &'static str,
    label: &'static str,
    badge: &'static str,
    badge_text: &'static str,
}

const fn status_palette(status: LeadStatus) -> StatusPalette {
    match status {
        LeadStatus::Hot => StatusPalette {
            card: "#fee2e2",
            label: "#dc2626",
            badge: "#fca5a5",
            badge_text: "#991b1b",
        },
        LeadStatus::Warm => StatusPalette {
            card: "#fef3c7",
            label: "#d97706",
            badge: "#fcd34d",
            badge_text: "#92400e",
        },
        LeadStatus::Cold => StatusPalette {
            card: "#dbeafe",
            label: "#2563eb",
            badge: "#93c5fd",
            badge_text: "#1e40af",
        },
    }
}

const fn priority_color(priority: LeadPriority) -> &'static str {
    match priority {
        LeadPriority::High => "#dc2626",
        LeadPriority::Medium => "#d97706",
        LeadPriority::Low => "#6b7280",
    }
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a standalone HTML summary of `lead` suitable for email or a browser tab.
pub fn render_lead_report(lead: &Lead) -> String {
    let name = escape_html(&lead.name);
    let mut html = String::new();

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
         <title>Lead Summary: {name}</title>\n</head>\n"
    ));
    html.push_str(
        "<body style=\"margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif; background-color: #f3f4f6;\">\n  \
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"background-color: #f3f4f6; padding: 40px 20px;\">\n    \
         <tr>\n      <td align=\"center\">\n        \
         <table width=\"600\" cellpadding=\"0\" cellspacing=\"0\" style=\"background-color: #ffffff; border-radius: 16px; overflow: hidden; box-shadow: 0 10px 25px rgba(0,0,0,0.1);\">\n",
    );

    html.push_str(&banner());
    html.push_str(&lead_header(lead, &name));
    html.push_str(&metrics(lead));
    html.push_str(&status_and_priority(lead));
    if let Some(summary) = &lead.ai_summary {
        html.push_str(&accent_block(
            "AI Analysis",
            "linear-gradient(135deg, #eef2ff 0%, #e0e7ff 100%)",
            "#6366f1",
            "#4f46e5",
            "#1f2937",
            summary,
        ));
    }
    if let Some(recommendation) = &lead.ai_recommendation {
        html.push_str(&accent_block(
            "Recommended Action",
            "linear-gradient(135deg, #d1fae5 0%, #a7f3d0 100%)",
            "#10b981",
            "#059669",
            "#064e3b",
            recommendation,
        ));
    }
    html.push_str(&section(&format!(
        "<div style=\"background: #ffffff; border: 2px solid #e5e7eb; border-radius: 12px; padding: 25px;\">\n\
         <div style=\"font-size: 14px; color: #1f2937; font-weight: 700; margin-bottom: 12px;\">Project Summary</div>\n\
         <p style=\"margin: 0; color: #4b5563; font-size: 14px; line-height: 1.6;\">{}</p>\n\
         </div>",
        escape_html(&lead.message_summary)
    )));
    html.push_str(&accent_block(
        "Next Action",
        "linear-gradient(135deg, #fef3c7 0%, #fde68a 100%)",
        "#f59e0b",
        "#92400e",
        "#78350f",
        &lead.next_action,
    ));
    let recent = lead.recent_dialogue(RECENT_TURNS);
    if !recent.is_empty() {
        html.push_str(&conversation(recent));
    }
    html.push_str(&sample_responses(lead));
    html.push_str(&footer());

    html.push_str("        </table>\n      </td>\n    </tr>\n  </table>\n</body>\n</html>\n");
    html
}

fn section(inner: &str) -> String {
    format!("<tr>\n<td style=\"padding: 0 30px 30px 30px;\">\n{inner}\n</td>\n</tr>\n")
}

fn banner() -> String {
    format!(
        "<tr>\n<td style=\"background: {BRAND_GRADIENT}; padding: 40px 30px; text-align: center;\">\n\
         <h1 style=\"color: #ffffff; margin: 0; font-size: 28px; font-weight: 700;\">{REPORT_TITLE}</h1>\n\
         <p style=\"color: #e0e7ff; margin: 8px 0 0 0; font-size: 14px;\">Lead Summary Report</p>\n\
         </td>\n</tr>\n"
    )
}

fn lead_header(lead: &Lead, name: &str) -> String {
    let initial = lead
        .initial()
        .map(|ch| escape_html(&ch.to_string()))
        .unwrap_or_default();
    format!(
        "<tr>\n<td style=\"padding: 30px; border-bottom: 2px solid #f3f4f6;\">\n\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">\n<tr>\n\
         <td width=\"60\" valign=\"middle\">\n\
         <div style=\"width: 50px; height: 50px; background: {BRAND_GRADIENT}; border-radius: 50%; display: flex; align-items: center; justify-content: center; color: #ffffff; font-size: 24px; font-weight: 700;\">{initial}</div>\n\
         </td>\n\
         <td valign=\"middle\" style=\"padding-left: 20px;\">\n\
         <h2 style=\"margin: 0 0 5px 0; font-size: 24px; color: #1f2937; font-weight: 700;\">{name}</h2>\n\
         <p style=\"margin: 0; color: #6b7280; font-size: 14px;\">{source} Lead</p>\n\
         </td>\n</tr>\n</table>\n</td>\n</tr>\n",
        source = lead.source.label(),
    )
}

fn metrics(lead: &Lead) -> String {
    let (likelihood, bar_width) = match lead.conversion_likelihood {
        Some(value) => (format!("{}%", value.get()), value.get()),
        None => ("n/a".to_owned(), 0),
    };
    let rate = escape_html(lead.estimated_rate.as_deref().unwrap_or(MISSING_VALUE));
    let duration = escape_html(lead.contract_duration.as_deref().unwrap_or(MISSING_VALUE));
    format!(
        "<tr>\n<td style=\"padding: 30px;\">\n\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"margin-bottom: 20px;\">\n<tr>\n\
         <td width=\"50%\" style=\"padding: 15px; background: linear-gradient(135deg, #dbeafe 0%, #bfdbfe 100%); border-radius: 12px;\">\n\
         <div style=\"font-size: 12px; color: #1e40af; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 8px;\">Conversion Likelihood</div>\n\
         <div style=\"font-size: 32px; color: #1e3a8a; font-weight: 700; margin-bottom: 8px;\">{likelihood}</div>\n\
         <div style=\"width: 100%; background: #93c5fd; border-radius: 10px; height: 8px; overflow: hidden;\">\n\
         <div style=\"width: {bar_width}%; background: linear-gradient(90deg, #3b82f6 0%, #2563eb 100%); height: 100%;\"></div>\n\
         </div>\n</td>\n\
         <td width=\"50%\" style=\"padding-left: 10px;\">\n\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">\n\
         <tr>\n<td style=\"padding: 15px; background: linear-gradient(135deg, #d1fae5 0%, #a7f3d0 100%); border-radius: 12px;\">\n\
         <div style=\"font-size: 11px; color: #065f46; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 5px;\">Estimated Rate</div>\n\
         <div style=\"font-size: 20px; color: #064e3b; font-weight: 700;\">{rate}</div>\n\
         </td>\n</tr>\n\
         <tr>\n<td style=\"padding: 15px; background: linear-gradient(135deg, #f3e8ff 0%, #e9d5ff 100%); border-radius: 12px;\">\n\
         <div style=\"font-size: 11px; color: #6b21a8; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 5px;\">Duration</div>\n\
         <div style=\"font-size: 20px; color: #581c87; font-weight: 700;\">{duration}</div>\n\
         </td>\n</tr>\n</table>\n</td>\n</tr>\n</table>\n</td>\n</tr>\n"
    )
}

fn status_and_priority(lead: &Lead) -> String {
    let palette = status_palette(lead.status);
    format!(
        "<tr>\n<td style=\"padding: 0 30px 30px 30px;\">\n\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">\n<tr>\n\
         <td width=\"50%\" style=\"padding-right: 15px;\">\n\
         <div style=\"background: {card}; border-radius: 12px; padding: 20px;\">\n\
         <div style=\"font-size: 12px; color: {label}; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 8px;\">Status</div>\n\
         <div style=\"display: inline-block; padding: 6px 16px; background: {badge}; color: {badge_text}; border-radius: 20px; font-size: 14px; font-weight: 700;\">{status}</div>\n\
         </div>\n</td>\n\
         <td width=\"50%\" style=\"padding-left: 15px;\">\n\
         <div style=\"background: #f0fdf4; border-radius: 12px; padding: 20px;\">\n\
         <div style=\"font-size: 12px; color: #16a34a; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 8px;\">Priority</div>\n\
         <div style=\"color: {priority_color}; font-size: 16px; font-weight: 700;\">{priority}</div>\n\
         </div>\n</td>\n</tr>\n</table>\n</td>\n</tr>\n",
        card = palette.card,
        label = palette.label,
        badge = palette.badge,
        badge_text = palette.badge_text,
        status = lead.status.label(),
        priority_color = priority_color(lead.priority),
        priority = lead.priority.label(),
    )
}

fn accent_block(
    title: &str,
    background: &str,
    border: &str,
    title_color: &str,
    text_color: &str,
    body: &str,
) -> String {
    section(&format!(
        "<div style=\"background: {background}; border-radius: 12px; padding: 25px; border-left: 4px solid {border};\">\n\
         <div style=\"font-size: 14px; color: {title_color}; font-weight: 700; margin-bottom: 12px;\">{title}</div>\n\
         <p style=\"margin: 0; color: {text_color}; font-size: 14px; line-height: 1.6;\">{body}</p>\n\
         </div>",
        body = escape_html(body),
    ))
}

fn conversation(turns: &[DialogueTurn]) -> String {
    let mut inner = String::from(
        "<div style=\"background: #ffffff; border: 2px solid #e5e7eb; border-radius: 12px; padding: 25px;\">\n\
         <div style=\"font-size: 14px; color: #1f2937; font-weight: 700; margin-bottom: 15px;\">Recent Conversation</div>\n",
    );
    for turn in turns {
        let mine = turn.is_from_user();
        let (justify, bubble, meta, text) = if mine {
            ("flex-end", BRAND_GRADIENT, "#e0e7ff", "#ffffff")
        } else {
            ("flex-start", "#f3f4f6", "#6b7280", "#1f2937")
        };
        inner.push_str(&format!(
            "<div style=\"margin-bottom: 15px;\">\n\
             <div style=\"display: flex; justify-content: {justify};\">\n\
             <div style=\"max-width: 80%;\">\n\
             <div style=\"background: {bubble}; padding: 12px 16px; border-radius: 16px;\">\n\
             <div style=\"font-size: 11px; color: {meta}; font-weight: 600; margin-bottom: 6px;\">{sender} \u{2022} {timestamp}</div>\n\
             <div style=\"color: {text}; font-size: 13px; line-height: 1.5;\">{message}</div>\n\
             </div>\n</div>\n</div>\n</div>\n",
            sender = escape_html(&turn.sender),
            timestamp = turn.display_timestamp(),
            message = escape_html(&turn.message),
        ));
    }
    inner.push_str("</div>");
    section(&inner)
}

fn sample_responses(lead: &Lead) -> String {
    let mut inner = String::from(
        "<div style=\"background: linear-gradient(135deg, #ecfdf5 0%, #d1fae5 100%); border: 2px solid #a7f3d0; border-radius: 12px; padding: 25px;\">\n\
         <div style=\"font-size: 14px; color: #065f46; font-weight: 700; margin-bottom: 20px;\">Sample Response Suggestions</div>\n",
    );
    for (tone, label_color, spacing) in [
        (Tone::Professional, "#1e40af", " margin-bottom: 15px;"),
        (Tone::Enthusiastic, "#dc2626", ""),
    ] {
        inner.push_str(&format!(
            "<div style=\"background: #ffffff; border: 2px solid #e5e7eb; border-radius: 8px; padding: 20px;{spacing}\">\n\
             <div style=\"font-size: 12px; color: {label_color}; font-weight: 700; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 10px;\">{label}</div>\n\
             <p style=\"margin: 0; color: #4b5563; font-size: 13px; line-height: 1.6; white-space: pre-line;\">{draft}</p>\n\
             </div>\n",
            label = tone.label(),
            draft = escape_html(&compose_outreach(lead, tone)),
        ));
    }
    inner.push_str("</div>");
    section(&inner)
}

fn footer() -> String {
    format!(
        "<tr>\n<td style=\"background: #f9fafb; padding: 30px; text-align: center; border-top: 2px solid #e5e7eb;\">\n\
         <p style=\"margin: 0 0 10px 0; color: #6b7280; font-size: 13px;\">Generated by {REPORT_TITLE}</p>\n\
         <p style=\"margin: 0; color: #9ca3af; font-size: 12px;\">This is an automated summary of your lead. Login to your dashboard for full details.</p>\n\
         </td>\n</tr>\n"
    )
}

/// Wrap an HTML document in a base64 `data:` URI a browser can open directly.
pub fn report_data_uri(html: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(html.as_bytes());
    format!("{DATA_URI_PREFIX}{encoded}")
}

pub fn report_file_name(lead: &Lead) -> String {
    let mut slug = String::new();
    for ch in lead.name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("lead-{}.html", lead.id)
    } else {
        format!("lead-{}-{slug}.html", lead.id)
    }
}
