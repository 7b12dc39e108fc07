//! Parser for free-text plant recommendations
//!
//! The generation model is asked to answer with repeating blocks:
//!
//! ```text
//! Plant: [Plant Name]
//! Reason: [Why this plant is suitable for these conditions]
//! Care: [Basic care instructions]
//! ```
//!
//! Parsing is a small state machine over lines with one pending record.
//! A `Plant:` line flushes the pending record and starts a new one;
//! `Reason:` and `Care:` lines fill fields of the pending record, the last
//! occurrence winning. Incomplete blocks are kept.

use crate::models::{PlantRecommendation, RecommendationSet};

const NO_MARKERS: &str = "no `Plant:` markers found in model output";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Plant,
    Reason,
    Care,
}

impl Marker {
    const ALL: [(Marker, &'static str); 3] = [
        (Marker::Plant, "Plant:"),
        (Marker::Reason, "Reason:"),
        (Marker::Care, "Care:"),
    ];
}

/// Parse recommendation blocks out of model text. Never fails; when no
/// block is found the set is empty and carries a diagnostic.
pub fn parse_recommendations(raw_text: &str) -> RecommendationSet {
    let mut recommendations = Vec::new();
    let mut pending: Option<PlantRecommendation> = None;

    for line in raw_text.lines() {
        let Some((marker, value)) = classify_line(line) else {
            continue;
        };

        match marker {
            Marker::Plant => {
                if let Some(done) = pending.take() {
                    recommendations.push(done);
                }
                pending = Some(PlantRecommendation {
                    name: value,
                    ..PlantRecommendation::default()
                });
            }
            Marker::Reason => match pending.as_mut() {
                Some(current) => current.reason = Some(value),
                None => tracing::debug!("Ignoring Reason line outside a plant block"),
            },
            Marker::Care => match pending.as_mut() {
                Some(current) => current.care = Some(value),
                None => tracing::debug!("Ignoring Care line outside a plant block"),
            },
        }
    }

    if let Some(done) = pending.take() {
        recommendations.push(done);
    }

    let parse_error = if recommendations.is_empty() {
        Some(NO_MARKERS.to_string())
    } else {
        None
    };

    RecommendationSet {
        recommendations,
        parse_error,
    }
}

/// Match a line against the three markers, with or without `**` bold and
/// list bullets in front. Returns the marker and its cleaned value.
fn classify_line(line: &str) -> Option<(Marker, String)> {
    let line = strip_bullet(line.trim());
    let undecorated = line.strip_prefix("**").unwrap_or(line);

    Marker::ALL.iter().find_map(|(marker, label)| {
        undecorated
            .strip_prefix(label)
            .map(|rest| (*marker, clean_value(rest)))
    })
}

fn clean_value(rest: &str) -> String {
    rest.trim().replace("**", "").trim().to_string()
}

fn strip_bullet(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim_start();
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..]
            .strip_prefix(". ")
            .or_else(|| line[digits..].strip_prefix(") "))
        {
            return rest.trim_start();
        }
    }

    line
}
