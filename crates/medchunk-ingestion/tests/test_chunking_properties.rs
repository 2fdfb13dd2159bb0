//! End-to-end chunking properties over realistic clinical notes.
//!
//! ```bash
//! cargo test --package medchunk-ingestion --test test_chunking_properties
//! ```

use medchunk_ingestion::models::{ChunkingOutcome, FallbackReason, RawDocument};
use medchunk_ingestion::{chunk_document, chunk_text, ChunkerConfig};

const DISCHARGE_NOTE: &str = "\
# Discharge Summary: DS-20431

* **Patient ID:** pat-123
* **Clinician ID:** clin-77
* **Date Created:** 2024-02-11

## History of Present Illness

58-year-old presenting with chest pain.
Pain radiates to the left arm.

## Medications

### Inpatient
- Aspirin 81 mg daily
- Atorvastatin 40 mg nightly

### Discharge
- Aspirin 81 mg daily

## Plan

Follow up with cardiology in 2 weeks.
";

fn normalise(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn test_discharge_note_chunks() {
    let doc = chunk_document(&RawDocument::new("ds.md", DISCHARGE_NOTE), &ChunkerConfig::default());
    assert_eq!(doc.outcome, ChunkingOutcome::Hierarchical);

    let chains: Vec<Vec<&str>> = doc
        .chunks
        .iter()
        .map(|c| c.heading_chain.iter().map(String::as_str).collect())
        .collect();
    assert_eq!(
        chains,
        vec![
            vec!["Discharge Summary: DS-20431"],
            vec!["Discharge Summary: DS-20431", "History of Present Illness"],
            vec!["Discharge Summary: DS-20431", "Medications", "Inpatient"],
            vec!["Discharge Summary: DS-20431", "Medications", "Discharge"],
            vec!["Discharge Summary: DS-20431", "Plan"],
        ]
    );

    let meta = &doc.metadata;
    assert_eq!(meta.document_id.as_deref(), Some("DS-20431"));
    assert_eq!(meta.patient_id.as_deref(), Some("pat-123"));
    assert_eq!(meta.clinician_id.as_deref(), Some("clin-77"));
    assert_eq!(meta.date_created.as_deref(), Some("2024-02-11"));

    for chunk in &doc.chunks {
        assert!(!chunk.content.is_empty());
        assert_eq!(chunk.metadata, doc.metadata);
        assert_eq!(chunk.content_hash.len(), 64);
    }
    assert_eq!(
        doc.chunks[1].content,
        "58-year-old presenting with chest pain.\nPain radiates to the left arm."
    );
}

#[test]
fn test_positions_contiguous_and_body_preserved() {
    let doc = chunk_document(&RawDocument::new("ds.md", DISCHARGE_NOTE), &ChunkerConfig::default());
    for (i, chunk) in doc.chunks.iter().enumerate() {
        assert_eq!(chunk.position, i);
    }

    let body: String = DISCHARGE_NOTE
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let joined: String = doc
        .chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(normalise(&joined), normalise(&body));
}

#[test]
fn test_long_note_with_odd_headings_keeps_all_body() {
    let labs: Vec<String> = (0..70)
        .map(|i| format!("- Sodium draw {i}: 140 mmol/L, within reference range, repeat in the morning."))
        .collect();
    let mut body_lines: Vec<String> = labs.clone();
    body_lines.extend(
        ["####### Sub-detail", "Potassium trending down.", "##", "CT unremarkable.", "Follow up in clinic."]
            .map(String::from),
    );

    let text = format!(
        "# Progress Note\n## Labs\n{}\n####### Sub-detail\nPotassium trending down.\n##\n\
         #### Imaging\nCT unremarkable.\n## Plan\nFollow up in clinic.\n",
        labs.join("\n")
    );
    assert!(text.chars().count() > 4000);

    let doc = chunk_document(&RawDocument::new("pn.md", text), &ChunkerConfig::default());
    assert_eq!(doc.outcome, ChunkingOutcome::Hierarchical);

    let chains: Vec<Vec<&str>> = doc
        .chunks
        .iter()
        .map(|c| c.heading_chain.iter().map(String::as_str).collect())
        .collect();
    assert_eq!(
        chains,
        vec![
            vec!["Progress Note", "Labs"],
            vec!["Progress Note", "Labs", "Imaging"],
            vec!["Progress Note", "Plan"],
        ]
    );
    assert_eq!(doc.chunks[2].content, "Follow up in clinic.");

    let joined: String = doc
        .chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(normalise(&joined), normalise(&body_lines.join("\n")));
}

#[test]
fn test_zero_headings_single_bounded_chunk() {
    let prose = "The patient reports improved sleep and appetite. ".repeat(70);
    assert!(prose.chars().count() > 3000);
    let chunks = chunk_text(&prose);
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].heading_chain.is_empty());
    assert_eq!(chunks[0].content.chars().count(), 2000);
    assert!(prose.starts_with(&chunks[0].content));
}

#[test]
fn test_idempotent() {
    let a = chunk_text(DISCHARGE_NOTE);
    let b = chunk_text(DISCHARGE_NOTE);
    assert_eq!(a, b);
}

#[test]
fn test_shared_body_same_hash_across_documents() {
    let a = chunk_text("# Note 1\n- Patient ID: A\n## Allergies\nPenicillin (rash).\n");
    let b = chunk_text("# Note 2\n- Patient ID: B\n## Known Allergies\nPenicillin (rash).\n");
    let ha = a.iter().find(|c| c.content == "Penicillin (rash).").unwrap();
    let hb = b.iter().find(|c| c.content == "Penicillin (rash).").unwrap();
    assert_eq!(ha.content_hash, hb.content_hash);
    assert_ne!(ha.metadata, hb.metadata);
}

#[test]
fn test_patient_id_layouts() {
    for text in ["* Patient ID: X1", "Patient ID: X1", "Pat. ID: X1"] {
        let doc = chunk_document(&RawDocument::new("p", text), &ChunkerConfig::default());
        assert_eq!(doc.metadata.patient_id.as_deref(), Some("X1"), "layout: {text}");
    }
}

#[test]
fn test_bold_patient_id() {
    let doc = chunk_document(
        &RawDocument::new("p", "**Patient ID:** pat-123\n"),
        &ChunkerConfig::default(),
    );
    assert_eq!(doc.metadata.patient_id.as_deref(), Some("pat-123"));
}

#[test]
fn test_empty_input_yields_no_chunks() {
    assert!(chunk_text("").is_empty());
    assert!(chunk_text("\n \t\n").is_empty());
}

#[test]
fn test_headings_only_falls_back() {
    let doc = chunk_document(&RawDocument::new("h", "# Title\n## Section\n"), &ChunkerConfig::default());
    assert_eq!(doc.outcome, ChunkingOutcome::Fallback { reason: FallbackReason::NoContent });
    assert_eq!(doc.chunks.len(), 1);
    assert!(doc.chunks[0].heading_chain.is_empty());
    assert_eq!(doc.chunks[0].content, "# Title\n## Section");
}

#[test]
fn test_fallback_hash_matches_trimmed_text() {
    let a = chunk_text("no headings, just a note\n");
    let b = chunk_text("no headings, just a note");
    assert_eq!(a[0].content, "no headings, just a note");
    assert_eq!(a[0].content_hash, b[0].content_hash);
}

#[test]
fn test_concurrent_invocations_agree() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| chunk_text(DISCHARGE_NOTE)))
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
