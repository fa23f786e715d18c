// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use nescka_app::{
    FilterChoice, LeadFilter, LeadSource, Tone, compose_outreach, filter_leads,
};
use nescka_testkit::LeadFaker;

const SEEDS: std::ops::RangeInclusive<u64> = 1..=64;

#[test]
fn output_is_an_order_preserving_subsequence() {
    for seed in SEEDS {
        let mut faker = LeadFaker::new(seed);
        let count = faker.int_n(25);
        let leads = faker.leads(count);
        let filter = faker.filter(&leads);

        let visible = filter_leads(&leads, &filter);
        let mut cursor = 0;
        for lead in &visible {
            let position = leads[cursor..]
                .iter()
                .position(|candidate| candidate.id == lead.id)
                .unwrap_or_else(|| panic!("seed {seed}: {} out of order", lead.id));
            cursor += position + 1;
            assert!(filter.matches(lead), "seed {seed}: {} fails predicate", lead.id);
        }
    }
}

#[test]
fn every_excluded_lead_fails_some_predicate() {
    for seed in SEEDS {
        let mut faker = LeadFaker::new(seed);
        let leads = faker.leads(15);
        let filter = faker.filter(&leads);
        let visible = filter_leads(&leads, &filter);
        let excluded = leads
            .iter()
            .filter(|lead| !visible.iter().any(|shown| shown.id == lead.id));
        for lead in excluded {
            assert!(!filter.matches(lead));
        }
    }
}

#[test]
fn wildcard_equals_removing_the_predicate() {
    for seed in SEEDS {
        let mut faker = LeadFaker::new(seed);
        let leads = faker.leads(20);
        let filter = faker.filter(&leads);

        let widened = LeadFilter {
            source: FilterChoice::All,
            ..filter.clone()
        };
        let expected: Vec<_> = leads
            .iter()
            .filter(|lead| {
                filter.status.matches(lead.status)
                    && filter.priority.matches(lead.priority)
                    && LeadFilter {
                        search: filter.search.clone(),
                        ..LeadFilter::default()
                    }
                    .matches(lead)
            })
            .map(|lead| lead.id)
            .collect();
        let actual: Vec<_> = filter_leads(&leads, &widened)
            .into_iter()
            .map(|lead| lead.id)
            .collect();
        assert_eq!(actual, expected, "seed {seed}");
    }
}

#[test]
fn search_ignores_case() {
    for seed in SEEDS {
        let mut faker = LeadFaker::new(seed);
        let leads = faker.leads(10);
        let needle = faker.search_text(&leads);
        if needle.is_empty() {
            continue;
        }
        let lower = LeadFilter {
            search: needle.to_lowercase(),
            ..LeadFilter::default()
        };
        let upper = LeadFilter {
            search: needle.to_uppercase(),
            ..LeadFilter::default()
        };
        let lower_ids: Vec<_> = filter_leads(&leads, &lower).iter().map(|l| l.id).collect();
        let upper_ids: Vec<_> = filter_leads(&leads, &upper).iter().map(|l| l.id).collect();
        assert_eq!(lower_ids, upper_ids, "seed {seed}");
        assert!(!lower_ids.is_empty(), "seed {seed}: needle {needle:?} drawn from leads");
    }
}

#[test]
fn source_filter_keeps_exactly_that_source() {
    let mut faker = LeadFaker::new(99);
    let leads = faker.leads(40);
    let filter = LeadFilter {
        source: FilterChoice::Only(LeadSource::Upwork),
        ..LeadFilter::default()
    };
    let expected = leads
        .iter()
        .filter(|lead| lead.source == LeadSource::Upwork)
        .count();
    let visible = filter_leads(&leads, &filter);
    assert_eq!(visible.len(), expected);
    assert!(visible.iter().all(|lead| lead.source == LeadSource::Upwork));
}

#[test]
fn outreach_is_referentially_transparent() {
    let mut faker = LeadFaker::new(5);
    for lead in faker.leads(10) {
        for tone in Tone::ALL {
            assert_eq!(compose_outreach(&lead, tone), compose_outreach(&lead, tone));
        }
        let concise = compose_outreach(&lead, Tone::Concise);
        assert!(concise.starts_with(&format!("{},", lead.first_name())));
        assert!(concise.ends_with("[Your Name]"));
    }
}
