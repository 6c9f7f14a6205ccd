//! Line-oriented extraction of lodging zones and prose callouts
//!
//! Documents are scanned line by line with a two-state machine: outside a
//! zone section, or inside one. A "Zone N:" heading opens a section, any
//! other heading closes it. Buffered section lines are then mined for the
//! summary run, bold-labeled scalar and list fields, and the ratings block.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{CityKnowledge, LodgingZone, ReferenceDocument, slugify};

static ZONE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#{1,6}\s*zone\s*\d+\s*:\s*(.+?)\s*$").unwrap());
static ANY_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}\s+\S").unwrap());
static BOLD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+?)\*\*\s*:?\s*(.*)$").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*•]\s+(.*)$").unwrap());
static RATING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•]\s+\*\*([^*]+?)\*\*\s*:?\s*(.*)$").unwrap());

/// Headings whose title contains one of these mark caller-facing callouts
const PAIN_KEYWORDS: &[&str] = &["gap", "challenge", "warning", "pain", "alert"];

/// Extract everything the prompt builder needs from a city's documents
#[must_use]
pub fn extract_city_knowledge(docs: &[ReferenceDocument]) -> CityKnowledge {
    CityKnowledge {
        zones: extract_zones(docs),
        highlights: extract_section_paragraphs(docs, "Executive Summary"),
        pain_points: extract_pain_points(docs),
        tables: extract_tables(docs),
    }
}

/// Extract and cross-document-merge lodging zones
#[must_use]
pub fn extract_zones(docs: &[ReferenceDocument]) -> Vec<LodgingZone> {
    let mut merged: Vec<LodgingZone> = Vec::new();

    for doc in docs {
        for zone in zones_in_document(doc) {
            match merged
                .iter_mut()
                .find(|existing| existing.name.to_lowercase() == zone.name.to_lowercase())
            {
                Some(existing) => merge_zone(existing, zone),
                None => merged.push(zone),
            }
        }
    }

    debug!(zones = merged.len(), "extracted lodging zones");
    merged
}

fn zones_in_document(doc: &ReferenceDocument) -> Vec<LodgingZone> {
    let mut zones = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in doc.body.lines() {
        if let Some(caps) = ZONE_HEADING.captures(line.trim()) {
            if let Some((heading, lines)) = current.take() {
                zones.extend(build_zone(&heading, &lines));
            }
            current = Some((caps[1].to_string(), Vec::new()));
        } else if ANY_HEADING.is_match(line.trim()) {
            if let Some((heading, lines)) = current.take() {
                zones.extend(build_zone(&heading, &lines));
            }
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line.to_string());
        }
    }

    if let Some((heading, lines)) = current.take() {
        zones.extend(build_zone(&heading, &lines));
    }

    zones
}

/// Split the heading tail once on a dash-surrounded separator into
/// name and optional recommendation tag
fn split_heading_tail(tail: &str) -> (String, Option<String>) {
    for sep in [" – ", " — ", " - "] {
        if let Some(idx) = tail.find(sep) {
            let name = tail[..idx].trim().to_string();
            let tag = tail[idx + sep.len()..].trim();
            let tag = (!tag.is_empty()).then(|| tag.to_string());
            return (name, tag);
        }
    }
    (tail.trim().to_string(), None)
}

/// Strip a trailing parenthesized suffix from the name into the descriptor
fn split_descriptor(name: &str) -> (String, Option<String>) {
    let name = name.trim();
    if name.ends_with(')') {
        if let Some(open) = name.rfind('(') {
            let descriptor = name[open + 1..name.len() - 1].trim();
            let stripped = name[..open].trim();
            if !stripped.is_empty() && !descriptor.is_empty() {
                return (stripped.to_string(), Some(descriptor.to_string()));
            }
        }
    }
    (name.to_string(), None)
}

fn label_matches(label: &str, names: &[&str]) -> bool {
    let normalized = label.trim().trim_end_matches(':').trim().to_lowercase();
    names.contains(&normalized.as_str())
}

fn build_zone(heading_tail: &str, lines: &[String]) -> Option<LodgingZone> {
    let (name_part, recommendation) = split_heading_tail(heading_tail);
    let (name, descriptor) = split_descriptor(&name_part);
    if name.is_empty() {
        return None;
    }

    let mut summary_lines: Vec<String> = Vec::new();
    let mut summary_done = false;
    let mut area = String::new();
    let mut price_range: Option<String> = None;
    let mut traveler_profiles = Vec::new();
    let mut advantages = Vec::new();
    let mut disadvantages = Vec::new();
    let mut ratings = std::collections::BTreeMap::new();

    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();

        if trimmed.is_empty() {
            if !summary_lines.is_empty() {
                summary_done = true;
            }
            i += 1;
            continue;
        }

        if let Some(caps) = BOLD_LABEL.captures(trimmed) {
            summary_done = true;
            let label = caps[1].to_string();
            let inline = caps[2].trim().to_string();

            if label_matches(&label, &["area", "geographic area", "location"]) {
                if area.is_empty() && !inline.is_empty() {
                    area = inline;
                }
                i += 1;
            } else if label_matches(&label, &["price range", "price", "prices"]) {
                if price_range.is_none() && !inline.is_empty() {
                    price_range = Some(inline);
                }
                i += 1;
            } else if label_matches(&label, &["ratings", "scores"]) {
                i += 1;
                while i < lines.len() {
                    let candidate = lines[i].trim();
                    match RATING_BULLET.captures(candidate) {
                        Some(rc) => {
                            let key = rc[1].trim().trim_end_matches(':').trim().to_string();
                            ratings.entry(key).or_insert_with(|| rc[2].trim().to_string());
                            i += 1;
                        }
                        None => break,
                    }
                }
            } else {
                let target = if label_matches(&label, &["best for", "good for", "who it suits"]) {
                    Some(&mut traveler_profiles)
                } else if label_matches(&label, &["pros", "advantages", "upsides"]) {
                    Some(&mut advantages)
                } else if label_matches(&label, &["cons", "disadvantages", "drawbacks"]) {
                    Some(&mut disadvantages)
                } else {
                    None
                };

                match target {
                    Some(items) => {
                        if !inline.is_empty() {
                            items.push(inline);
                        }
                        i += 1;
                        while i < lines.len() {
                            let candidate = lines[i].trim();
                            if candidate.is_empty() || BOLD_LABEL.is_match(candidate) {
                                break;
                            }
                            match BULLET.captures(candidate) {
                                Some(bc) => {
                                    let item = bc[1].trim().to_string();
                                    if !item.is_empty() {
                                        items.push(item);
                                    }
                                    i += 1;
                                }
                                None => break,
                            }
                        }
                    }
                    // Unknown label: skip the line, leave its bullets to the
                    // summary/ignore path
                    None => i += 1,
                }
            }
            continue;
        }

        if !summary_done {
            summary_lines.push(trimmed.to_string());
        }
        i += 1;
    }

    let mut source_text = String::new();
    source_text.push_str(heading_tail.trim());
    for line in lines {
        source_text.push('\n');
        source_text.push_str(line);
    }

    Some(LodgingZone {
        id: slugify(&name),
        name,
        descriptor,
        recommendation,
        summary: summary_lines.join(" "),
        area,
        traveler_profiles,
        advantages,
        disadvantages,
        ratings,
        price_range,
        source_text,
    })
}

/// Merge a later document's zone into the first-seen record: scalars are
/// first-document-wins with empty fallback, lists are unioned, and the
/// earlier document's rating keys take precedence.
fn merge_zone(existing: &mut LodgingZone, later: LodgingZone) {
    if existing.descriptor.is_none() {
        existing.descriptor = later.descriptor;
    }
    if existing.recommendation.is_none() {
        existing.recommendation = later.recommendation;
    }
    if existing.summary.is_empty() {
        existing.summary = later.summary;
    }
    if existing.area.is_empty() {
        existing.area = later.area;
    }
    if existing.price_range.is_none() {
        existing.price_range = later.price_range;
    }

    union_into(&mut existing.traveler_profiles, later.traveler_profiles);
    union_into(&mut existing.advantages, later.advantages);
    union_into(&mut existing.disadvantages, later.disadvantages);

    for (key, value) in later.ratings {
        existing.ratings.entry(key).or_insert(value);
    }

    existing.source_text.push_str("\n\n");
    existing.source_text.push_str(&later.source_text);
}

fn union_into(items: &mut Vec<String>, additions: Vec<String>) {
    for addition in additions {
        if !items
            .iter()
            .any(|existing| existing.to_lowercase() == addition.to_lowercase())
        {
            items.push(addition);
        }
    }
}

/// Return the blank-line-delimited paragraphs of the first sections whose
/// heading contains `section_title`, flattened across documents
#[must_use]
pub fn extract_section_paragraphs(docs: &[ReferenceDocument], section_title: &str) -> Vec<String> {
    let needle = section_title.to_lowercase();
    let mut paragraphs = Vec::new();

    for doc in docs {
        let mut in_section = false;
        let mut run: Vec<&str> = Vec::new();

        for line in doc.body.lines() {
            let trimmed = line.trim();
            if ANY_HEADING.is_match(trimmed) {
                if !run.is_empty() {
                    paragraphs.push(run.join(" "));
                    run.clear();
                }
                let title = trimmed.trim_start_matches('#').trim().to_lowercase();
                in_section = title.contains(&needle);
                continue;
            }
            if !in_section {
                continue;
            }
            if trimmed.is_empty() {
                if !run.is_empty() {
                    paragraphs.push(run.join(" "));
                    run.clear();
                }
            } else {
                run.push(trimmed);
            }
        }
        if !run.is_empty() {
            paragraphs.push(run.join(" "));
        }
    }

    paragraphs
}

/// Collect deduplicated callout lines from headings mentioning any pain
/// keyword (gap/challenge/warning/pain/alert)
#[must_use]
pub fn extract_pain_points(docs: &[ReferenceDocument]) -> Vec<String> {
    let mut points: Vec<String> = Vec::new();

    for doc in docs {
        let mut in_section = false;
        for line in doc.body.lines() {
            let trimmed = line.trim();
            if ANY_HEADING.is_match(trimmed) {
                let title = trimmed.trim_start_matches('#').trim().to_lowercase();
                in_section = PAIN_KEYWORDS.iter().any(|kw| title.contains(kw));
                continue;
            }
            if !in_section || trimmed.is_empty() {
                continue;
            }
            let point = match BULLET.captures(trimmed) {
                Some(caps) => caps[1].trim().to_string(),
                None => trimmed.to_string(),
            };
            if !point.is_empty()
                && !points
                    .iter()
                    .any(|existing| existing.to_lowercase() == point.to_lowercase())
            {
                points.push(point);
            }
        }
    }

    points
}

/// Capture contiguous runs of two or more pipe-prefixed lines verbatim;
/// shorter runs are discarded as noise
#[must_use]
pub fn extract_tables(docs: &[ReferenceDocument]) -> Vec<String> {
    let mut tables = Vec::new();

    for doc in docs {
        let mut block: Vec<&str> = Vec::new();
        for line in doc.body.lines() {
            if line.trim_start().starts_with('|') {
                block.push(line);
            } else {
                if block.len() >= 2 {
                    tables.push(block.join("\n"));
                }
                block.clear();
            }
        }
        if block.len() >= 2 {
            tables.push(block.join("\n"));
        }
    }

    tables
}
