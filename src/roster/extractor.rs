use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::Entry;

/// Width of the numeric identifiers that delimit entries in the roster documents we receive.
pub const DEFAULT_MARKER_WIDTH: usize = 4;

// A number left alone on its line (optionally followed by a period): glue it to the next line.
static NUMBER_LINE_BREAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\.?\s*\n").expect("valid number line-break regex"));

// A line break between two non-digits is a wrapped name, not an entry boundary.
static WRAPPED_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^0-9])\n([^0-9])").expect("valid wrapped-name regex"));

// Stray yeh left by the text extractor at the end of a line. CRLF mode so that
// `$` also matches before the `\r` of Windows line endings.
static TRAILING_YEH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mR)\x{064A}\s*$").expect("valid trailing-yeh regex"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Repairs the line structure of extracted PDF text and flattens it to a single line.
pub fn preprocess(raw_text: &str) -> String {
    let text = NUMBER_LINE_BREAK_REGEX.replace_all(raw_text, "${1} ");
    let text = WRAPPED_NAME_REGEX.replace_all(&text, "${1} ${2}");
    let text = TRAILING_YEH_REGEX.replace_all(&text, "");
    WHITESPACE_REGEX.replace_all(&text, " ").into_owned()
}

/// Splits roster text into `(number, name)` entries.
///
/// Every run of exactly `marker_width` ASCII digits starts an entry; the name is
/// whatever follows it up to the next marker or the end of the text, minus
/// separators and stray digits. Candidates with fewer than two characters are
/// extraction noise and are dropped. Text before the first marker is ignored.
#[derive(Debug, Clone)]
pub struct EntryExtractor {
    marker: Regex,
    marker_width: usize,
}

impl EntryExtractor {
    pub fn new(marker_width: usize) -> Result<Self, regex::Error> {
        let marker = Regex::new(&format!("[0-9]{{{}}}", marker_width))?;
        Ok(Self {
            marker,
            marker_width,
        })
    }

    pub fn marker_width(&self) -> usize {
        self.marker_width
    }

    pub fn extract(&self, raw_text: &str) -> Vec<Entry> {
        let text = preprocess(raw_text);
        let markers: Vec<_> = self.marker.find_iter(&text).collect();

        let mut entries = Vec::with_capacity(markers.len());
        for (i, marker) in markers.iter().enumerate() {
            let region_end = markers
                .get(i + 1)
                .map_or(text.len(), |next| next.start());
            let region = text[marker.end()..region_end]
                .trim_start_matches(|c: char| c.is_whitespace() || c == '.');

            let without_digits: String = region.chars().filter(|c| !c.is_ascii_digit()).collect();
            let name = without_digits.trim();

            if name.chars().count() <= 1 {
                debug!(target: "roster", number = marker.as_str(), "Skipping marker without a name");
                continue;
            }

            entries.push(Entry::new(marker.as_str(), name));
        }

        debug!(
            target: "roster",
            markers = markers.len(),
            entries = entries.len(),
            "Roster segmentation finished"
        );
        entries
    }
}

impl Default for EntryExtractor {
    fn default() -> Self {
        static DEFAULT_MARKER_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new("[0-9]{4}").expect("valid default marker regex"));

        Self {
            marker: DEFAULT_MARKER_REGEX.clone(),
            marker_width: DEFAULT_MARKER_WIDTH,
        }
    }
}
