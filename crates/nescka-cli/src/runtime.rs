// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use nescka_app::{ChatAuthor, ChatMessage, Lead, LeadFormInput, render_lead_report, report_file_name};
use nescka_assistant::{Assistant, GREETING};
use nescka_db::{LeadRepository, Store};
use nescka_tui::InternalEvent;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

/// Destination for copied drafts.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard. The handle is opened on first copy and kept so
/// X11 and Wayland keep serving the selection after the call returns.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.handle.is_none() {
            let clipboard = arboard::Clipboard::new().context(
                "open system clipboard; copying needs a desktop session (X11, Wayland, macOS, or Windows)",
            )?;
            self.handle = Some(clipboard);
        }
        let Some(clipboard) = self.handle.as_mut() else {
            anyhow::bail!("system clipboard handle missing");
        };
        clipboard
            .set_text(text)
            .context("write text to system clipboard")?;
        Ok(())
    }
}

/// Wires the dashboard to a lead repository, the chat transcript store, the
/// assistant and the clipboard.
pub struct Runtime<'a, R: LeadRepository, C: ClipboardSink> {
    leads: &'a R,
    chat: &'a Store,
    assistant: Assistant,
    report_dir: PathBuf,
    clipboard: C,
}

impl<'a, R: LeadRepository, C: ClipboardSink> Runtime<'a, R, C> {
    pub fn new(
        leads: &'a R,
        chat: &'a Store,
        assistant: Assistant,
        report_dir: PathBuf,
        clipboard: C,
    ) -> Self {
        Self {
            leads,
            chat,
            assistant,
            report_dir,
            clipboard,
        }
    }
}

impl<R: LeadRepository, C: ClipboardSink> nescka_tui::AppRuntime for Runtime<'_, R, C> {
    fn load_leads(&mut self) -> Result<Vec<Lead>> {
        self.leads.list_leads()
    }

    fn load_transcript(&mut self) -> Result<Vec<ChatMessage>> {
        let transcript = self.chat.load_transcript()?;
        if !transcript.is_empty() {
            return Ok(transcript);
        }
        let greeting = self
            .chat
            .append_chat_message(ChatAuthor::Assistant, GREETING)?;
        Ok(vec![greeting])
    }

    fn append_chat_message(&mut self, author: ChatAuthor, body: &str) -> Result<ChatMessage> {
        self.chat.append_chat_message(author, body)
    }

    fn submit_lead_form(&mut self, input: &LeadFormInput) -> Result<()> {
        self.leads.submit_lead_form(input)
    }

    fn answer(&mut self, question: &str, leads: &[Lead]) -> String {
        self.assistant.answer(question, leads)
    }

    fn assistant_delay(&self) -> Duration {
        self.assistant.delay()
    }

    fn spawn_answer(
        &mut self,
        request_id: u64,
        question: &str,
        leads: &[Lead],
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let assistant = self.assistant;
        let question = question.to_owned();
        let leads = leads.to_vec();
        thread::Builder::new()
            .name(format!("assistant-{request_id}"))
            .spawn(move || {
                let body = assistant.reply_after_delay(&question, &leads);
                let _ = tx.send(InternalEvent::AssistantReply { request_id, body });
            })
            .context("spawn assistant worker")?;
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text)
    }

    fn export_report(&mut self, lead: &Lead) -> Result<PathBuf> {
        export_report(&self.report_dir, lead)
    }
}

pub fn export_report(dir: &Path, lead: &Lead) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| {
        format!(
            "create report directory {}; set [report].output_dir to a writable path",
            dir.display()
        )
    })?;
    let path = dir.join(report_file_name(lead));
    fs::write(&path, render_lead_report(lead))
        .with_context(|| format!("write report {}", path.display()))?;
    tracing::info!(lead_id = lead.id.get(), path = %path.display(), "report exported");
    Ok(path)
}
