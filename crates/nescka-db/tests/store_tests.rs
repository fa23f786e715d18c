// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use nescka_app::{ChatAuthor, LeadFormInput, LeadId, LeadSource, LeadStatus};
use nescka_db::{LeadRepository, SeedLeads, Store, seed_leads};
use nescka_testkit::LeadFaker;

fn seeded_store() -> Result<Store> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.seed_demo_data()?;
    Ok(store)
}

#[test]
fn seeded_store_matches_seed_set() -> Result<()> {
    let store = seeded_store()?;
    let leads = store.list_leads()?;
    assert_eq!(leads, seed_leads());

    let names: Vec<&str> = leads.iter().map(|lead| lead.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Sarah Chen",
            "Michael Rodriguez",
            "Emily Johnson",
            "David Kim",
            "Lisa Thompson",
            "James Wilson",
            "Rachel Green",
            "Thomas Anderson",
        ]
    );
    Ok(())
}

#[test]
fn seeding_twice_is_idempotent() -> Result<()> {
    let store = seeded_store()?;
    store.seed_demo_data()?;
    store.bootstrap()?;
    assert_eq!(store.list_leads()?.len(), 8);
    let turns: i64 = store
        .raw_connection()
        .query_row("SELECT COUNT(*) FROM dialogue_turns", [], |row| row.get(0))?;
    assert_eq!(turns, 37);
    Ok(())
}

#[test]
fn get_lead_attaches_dialogue() -> Result<()> {
    let store = seeded_store()?;
    let james = store
        .get_lead(LeadId::new(6))?
        .ok_or_else(|| anyhow::anyhow!("lead 6 missing"))?;
    assert_eq!(james.name, "James Wilson");
    assert_eq!(james.source, LeadSource::Email);
    assert_eq!(james.status, LeadStatus::Hot);
    assert_eq!(james.dialogue.len(), 6);
    assert_eq!(james.dialogue[0].display_timestamp(), "2024-01-16 08:00");
    assert!(james.dialogue[5].is_from_user());

    assert!(store.get_lead(LeadId::new(99))?.is_none());
    Ok(())
}

#[test]
fn bootstrap_rejects_schema_missing_required_column() -> Result<()> {
    let store = Store::open_memory()?;
    store.raw_connection().execute_batch(
        "
        CREATE TABLE leads (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
        CREATE TABLE dialogue_turns (id INTEGER PRIMARY KEY);
        CREATE TABLE chat_messages (id INTEGER PRIMARY KEY);
        ",
    )?;

    let error = store
        .bootstrap()
        .expect_err("bootstrap should reject incomplete schema");
    let message = error.to_string();
    assert!(message.contains("table `leads` is missing required columns"));
    assert!(message.contains("conversion_likelihood"));
    Ok(())
}

#[test]
fn bootstrap_rejects_missing_table() -> Result<()> {
    let store = Store::open_memory()?;
    store
        .raw_connection()
        .execute_batch("CREATE TABLE unrelated (id INTEGER PRIMARY KEY);")?;
    let error = store.bootstrap().expect_err("missing tables should fail");
    assert!(error.to_string().contains("missing required table `leads`"));
    Ok(())
}

#[test]
fn out_of_range_likelihood_is_rejected_on_read() -> Result<()> {
    let store = seeded_store()?;
    store.raw_connection().execute(
        "UPDATE leads SET conversion_likelihood = 150 WHERE id = 1",
        [],
    )?;
    let error = store.list_leads().expect_err("likelihood 150 must not decode");
    assert!(format!("{error:#}").contains("outside 0..=100"));
    Ok(())
}

#[test]
fn unknown_status_is_rejected_on_read() -> Result<()> {
    let store = seeded_store()?;
    store
        .raw_connection()
        .execute("UPDATE leads SET status = 'Lukewarm' WHERE id = 2", [])?;
    assert!(store.get_lead(LeadId::new(2)).is_err());
    Ok(())
}

#[test]
fn transcript_is_append_only_and_ordered() -> Result<()> {
    let store = seeded_store()?;
    assert!(store.load_transcript()?.is_empty());

    let greeting = store.append_chat_message(ChatAuthor::Assistant, "hello")?;
    let question = store.append_chat_message(ChatAuthor::User, "how many hot leads")?;
    store.append_chat_message(ChatAuthor::User, "how many hot leads")?;
    assert!(question.id > greeting.id);

    let transcript = store.load_transcript()?;
    let bodies: Vec<&str> = transcript.iter().map(|msg| msg.body.as_str()).collect();
    assert_eq!(bodies, vec!["hello", "how many hot leads", "how many hot leads"]);
    assert!(transcript[0].is_assistant());
    assert!(!transcript[1].is_assistant());
    assert_eq!(
        transcript[0].created_at.unix_timestamp(),
        greeting.created_at.unix_timestamp()
    );
    Ok(())
}

#[test]
fn submitting_lead_form_leaves_collection_unchanged() -> Result<()> {
    let store = seeded_store()?;
    let input = LeadFormInput {
        name: "Ann Lee".to_owned(),
        message_summary: "Needs a website".to_owned(),
        ..LeadFormInput::default()
    };
    store.submit_lead_form(&input)?;
    assert_eq!(store.list_leads()?.len(), 8);

    let seeds = SeedLeads::default();
    seeds.submit_lead_form(&input)?;
    assert_eq!(seeds.list_leads()?.len(), 8);
    Ok(())
}

#[test]
fn repositories_agree_on_lookup() -> Result<()> {
    let store = seeded_store()?;
    let seeds = SeedLeads::default();
    let repositories: [&dyn LeadRepository; 2] = [&store, &seeds];
    for repository in repositories {
        let lead = repository
            .get_lead(LeadId::new(3))?
            .ok_or_else(|| anyhow::anyhow!("lead 3 missing"))?;
        assert_eq!(lead.name, "Emily Johnson");
    }
    Ok(())
}

#[test]
fn generated_leads_round_trip_through_seed_repository() -> Result<()> {
    let mut faker = LeadFaker::new(17);
    let leads = faker.leads(12);
    let repository = SeedLeads(leads.clone());
    assert_eq!(repository.list_leads()?, leads);
    Ok(())
}
