//! Header-hierarchy splitter.
//!
//! Walks the document line by line keeping the open headings on an
//! index-addressed stack. Each heading closes the region owned by the
//! previous chain; the region is emitted with the chain that owned it.
//!
//! ```text
//! # Title            stack: [Title]
//! ## History         stack: [Title, History]        -> region for [Title]
//! Body...
//! ## Plan            stack: [Title, Plan]           -> region for [Title, History]
//! ```
//!
//! Skipped depths (`#` then `###`) simply extend the chain. Text before the
//! first heading becomes a region with an empty chain. Lines that only look
//! like headings (a run deeper than `max_depth`, a bare `##`) stay in the
//! body of the open region.

use thiserror::Error;
use tracing::debug;

/// Splitter knobs. See `medchunk_common::ChunkerSettings`.
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub marker: char,
    pub max_depth: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self { marker: '#', max_depth: 6 }
    }
}

/// Text between two headings, tagged with the chain that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub heading_chain: Vec<String>,
    pub body: String,
    /// 1-based line number where the body starts.
    pub start_line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("document has no headings")]
    NoHeadings,

    #[error("every section body is empty")]
    NoContent,
}

#[derive(Debug)]
struct OpenHeading {
    depth: usize,
    text: String,
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Heading { depth: usize, text: &'a str },
    Body,
}

/// Fenced code block state: fence character and opening length.
type Fence = Option<(char, usize)>;

/// Split `text` into heading-owned regions, in document order.
/// Whitespace-only regions are dropped.
pub fn split_sections(text: &str, config: &SplitterConfig) -> Result<Vec<Region>, SplitError> {
    let mut stack: Vec<OpenHeading> = Vec::new();
    let mut regions = Vec::new();
    let mut body = String::new();
    let mut body_start = 1;
    let mut fence: Fence = None;
    let mut headings = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(next) = fence_transition(line, fence) {
            fence = next;
            push_line(&mut body, line);
            continue;
        }
        if fence.is_some() {
            push_line(&mut body, line);
            continue;
        }

        match classify(line, config) {
            LineKind::Heading { depth, text } => {
                close_region(&stack, &mut body, body_start, &mut regions);

                while stack.last().map_or(false, |open| open.depth >= depth) {
                    stack.pop();
                }
                stack.push(OpenHeading { depth, text: text.to_string() });
                headings += 1;
                body_start = line_no + 1;
            }
            LineKind::Body => push_line(&mut body, line),
        }
    }
    close_region(&stack, &mut body, body_start, &mut regions);

    if headings == 0 {
        return Err(SplitError::NoHeadings);
    }
    if regions.is_empty() {
        return Err(SplitError::NoContent);
    }

    debug!(headings, regions = regions.len(), "Document split by headings");
    Ok(regions)
}

fn push_line(body: &mut String, line: &str) {
    body.push_str(line);
    body.push('\n');
}

fn close_region(stack: &[OpenHeading], body: &mut String, start_line: usize, regions: &mut Vec<Region>) {
    let text = std::mem::take(body);
    if text.trim().is_empty() {
        return;
    }
    regions.push(Region {
        heading_chain: stack.iter().map(|open| open.text.clone()).collect(),
        body: text,
        start_line,
    });
}

/// Heading iff: at most 3 spaces of indent, a run of 1..=max_depth markers,
/// whitespace, then non-empty text. `#hashtag` is body text.
fn classify<'a>(line: &'a str, config: &SplitterConfig) -> LineKind<'a> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return LineKind::Body;
    }
    let rest = &line[indent..];
    let depth = rest.chars().take_while(|c| *c == config.marker).count();
    if depth == 0 || depth > config.max_depth {
        return LineKind::Body;
    }

    let after = &rest[depth * config.marker.len_utf8()..];
    if !after.is_empty() && !after.starts_with(char::is_whitespace) {
        return LineKind::Body;
    }

    // Closing sequence (`## Plan ##`) is not part of the heading text.
    let text = after.trim();
    let text = match text.trim_end_matches(config.marker) {
        stripped if stripped.is_empty() || stripped.ends_with(char::is_whitespace) => stripped.trim_end(),
        _ => text,
    };
    if text.is_empty() {
        return LineKind::Body;
    }
    LineKind::Heading { depth, text }
}

/// Returns the new fence state when `line` opens or closes a fenced block.
fn fence_transition(line: &str, fence: Fence) -> Option<Fence> {
    let trimmed = line.trim_start();
    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = trimmed.chars().take_while(|c| *c == ch).count();
    if run < 3 {
        return None;
    }
    match fence {
        None => Some(Some((ch, run))),
        Some((open, len)) if open == ch && run >= len && trimmed[run..].trim().is_empty() => Some(None),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Result<Vec<Region>, SplitError> {
        split_sections(text, &SplitterConfig::default())
    }

    fn chains(regions: &[Region]) -> Vec<Vec<&str>> {
        regions
            .iter()
            .map(|r| r.heading_chain.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_title_and_section() {
        let regions = split("# Title\n## Section\nBody text.").unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(chains(&regions), vec![vec!["Title", "Section"]]);
        assert_eq!(regions[0].body, "Body text.\n");
        assert_eq!(regions[0].start_line, 3);
    }

    #[test]
    fn test_sibling_sections_pop_stack() {
        let text = "# Note\nIntro\n## History\nH body\n## Plan\nP body\n# Addendum\nA body\n";
        let regions = split(text).unwrap();
        assert_eq!(
            chains(&regions),
            vec![
                vec!["Note"],
                vec!["Note", "History"],
                vec!["Note", "Plan"],
                vec!["Addendum"],
            ]
        );
    }

    #[test]
    fn test_arbitrary_nesting() {
        let text = "# A\n## B\n### C\n#### D\ndeep\n### E\nshallower\n";
        let regions = split(text).unwrap();
        assert_eq!(
            chains(&regions),
            vec![vec!["A", "B", "C", "D"], vec!["A", "B", "E"]]
        );
    }

    #[test]
    fn test_skipped_depth_extends_chain() {
        let regions = split("# Title\n### Deep\nbody\n## Mid\nmid body\n").unwrap();
        assert_eq!(
            chains(&regions),
            vec![vec!["Title", "Deep"], vec!["Title", "Mid"]]
        );
    }

    #[test]
    fn test_duplicate_headings_are_distinct_regions() {
        let regions = split("## Vitals\nBP 120/80\n## Vitals\nBP 130/85\n").unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].heading_chain, regions[1].heading_chain);
        assert_ne!(regions[0].body, regions[1].body);
    }

    #[test]
    fn test_empty_region_dropped_but_chain_kept() {
        let regions = split("# Title\n\n   \n## Child\nchild body\n").unwrap();
        assert_eq!(chains(&regions), vec![vec!["Title", "Child"]]);
    }

    #[test]
    fn test_preamble_has_empty_chain() {
        let regions = split("Preamble line\n# Title\nBody\n").unwrap();
        assert_eq!(regions[0].heading_chain, Vec::<String>::new());
        assert_eq!(regions[0].body, "Preamble line\n");
        assert_eq!(chains(&regions)[1], vec!["Title"]);
    }

    #[test]
    fn test_no_headings() {
        assert_eq!(split("plain prose\nmore prose").unwrap_err(), SplitError::NoHeadings);
        assert_eq!(split("#hashtag is not a heading").unwrap_err(), SplitError::NoHeadings);
        assert_eq!(split("    # indented code").unwrap_err(), SplitError::NoHeadings);
    }

    #[test]
    fn test_headings_without_content() {
        assert_eq!(split("# Title\n## Section\n\n").unwrap_err(), SplitError::NoContent);
    }

    #[test]
    fn test_marker_run_too_deep_is_body() {
        let regions = split("# Title\nok\n####### too deep\nmore\n## Plan\nrest\n").unwrap();
        assert_eq!(chains(&regions), vec![vec!["Title"], vec!["Title", "Plan"]]);
        assert_eq!(regions[0].body, "ok\n####### too deep\nmore\n");
    }

    #[test]
    fn test_bare_marker_run_is_body() {
        let regions = split("# Title\nbody\n##\n### ###\nafter\n").unwrap();
        assert_eq!(chains(&regions), vec![vec!["Title"]]);
        assert_eq!(regions[0].body, "body\n##\n### ###\nafter\n");
    }

    #[test]
    fn test_only_pseudo_headings_means_no_headings() {
        assert_eq!(split("##\n####### deep\ntext\n").unwrap_err(), SplitError::NoHeadings);
    }

    #[test]
    fn test_closing_markers_stripped() {
        let regions = split("## Plan ##\nRest\n").unwrap();
        assert_eq!(chains(&regions), vec![vec!["Plan"]]);
        let regions = split("## C#\nRest\n").unwrap();
        assert_eq!(chains(&regions), vec![vec!["C#"]]);
    }

    #[test]
    fn test_fenced_code_is_body() {
        let text = "# Orders\n```\n# not a heading\n```\nafter\n";
        let regions = split(text).unwrap();
        assert_eq!(regions.len(), 1);
        assert!(regions[0].body.contains("# not a heading"));
        assert!(regions[0].body.contains("after"));
    }

    #[test]
    fn test_custom_marker() {
        let config = SplitterConfig { marker: '=', max_depth: 3 };
        let regions = split_sections("= Top\n== Sub\nbody\n", &config).unwrap();
        assert_eq!(chains(&regions), vec![vec!["Top", "Sub"]]);
    }

    #[test]
    fn test_crlf_lines() {
        let regions = split("# Title\r\n## Section\r\nBody\r\n").unwrap();
        assert_eq!(chains(&regions), vec![vec!["Title", "Section"]]);
        assert_eq!(regions[0].body, "Body\n");
    }
}
