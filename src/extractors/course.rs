// src/extractors/course.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

// --- Constants ---
/// Number of characters after a match that are inspected for status markers.
pub const TRAILING_WINDOW_CHARS: usize = 50;

/// Markers that, when found in the trailing window, drop the candidate.
/// `Excluded` = not counted towards GPA, `Registered` = still in progress.
pub const STATUS_MARKERS: [&str; 2] = ["Excluded", "Registered"];

// --- Regex Patterns (Lazy Static) ---
// Separator set used between fields and inside titles.
// Includes BOM (U+FEFF), excludes NEL (U+0085).
const SEPARATOR_CLASS: &str =
    r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

// SUBJECT  NUMBER  TITLE  LEVEL  GRADE  CREDITS
// Two-character grades come before their one-character prefix so `A-` never
// matches as `A` plus a stray `-`.
static COURSE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    let sep = format!("[{}]+", SEPARATOR_CLASS);
    let pattern = format!(
        concat!(
            r"(?P<subject>[A-Z]+){sep}",
            r"(?P<number>[0-9]{{3,4}}[A-Z]?){sep}",
            r"(?P<title>[\p{{L}}{class}.&\-']+?){sep}",
            r"(?P<level>UG|GR|FDY){sep}",
            r"(?P<grade>A\+|A-|A|B\+|B-|B|C\+|C-|C|D\+|D-|D|F|S|U|W|I){sep}",
            r"[0-9]+\.[0-9]+",
        ),
        sep = sep,
        class = SEPARATOR_CLASS,
    );
    Regex::new(&pattern).expect("Failed to compile COURSE_LINE_RE")
});

/// Membership test for the same set as `SEPARATOR_CLASS`.
fn is_separator(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
            | '\u{A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}

// --- Data Structures ---

/// Letter grade as printed on the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
    /// Satisfactory
    #[serde(rename = "S")]
    S,
    /// Unsatisfactory
    #[serde(rename = "U")]
    U,
    /// Withdrawn
    #[serde(rename = "W")]
    W,
    /// Incomplete
    #[serde(rename = "I")]
    I,
}

impl Grade {
    pub const ALL: [Grade; 17] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::F,
        Grade::S,
        Grade::U,
        Grade::W,
        Grade::I,
    ];

    /// Parses a grade token exactly as it appears in the text (case-sensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.as_str() == token)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
            Grade::S => "S",
            Grade::U => "U",
            Grade::W => "W",
            Grade::I => "I",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CourseRecord {
    pub code: String,  // subject + catalog number, e.g. "CS101"
    pub title: String, // trimmed course name
    pub grade: Grade,
}

/// One grammar match found while scanning, before duplicate resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseMatch {
    pub record: CourseRecord,
    pub start: usize, // byte offset of the match in the scanned text
    pub end: usize,   // byte offset just past the credit value
    pub excluded: bool,
}

/// Course records keyed by code.
///
/// Keys keep the position of their first insertion; inserting an existing
/// code replaces the whole record in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSet {
    records: Vec<CourseRecord>,
    index: HashMap<String, usize>,
}

impl CourseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record`, returning the record it replaced, if any.
    pub fn insert(&mut self, record: CourseRecord) -> Option<CourseRecord> {
        match self.index.get(&record.code) {
            Some(&pos) => Some(std::mem::replace(&mut self.records[pos], record)),
            None => {
                self.index.insert(record.code.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&CourseRecord> {
        self.index.get(code).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CourseRecord> {
        self.records.iter()
    }

    /// Course codes in key order.
    pub fn codes(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.code.as_str()).collect()
    }

    /// Renders the set as a JSON object indented with two spaces.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a CourseSet {
    type Item = &'a CourseRecord;
    type IntoIter = std::slice::Iter<'a, CourseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for CourseSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.code, record)?;
        }
        map.end()
    }
}

// --- Main Extractor Structure ---
#[derive(Debug, Default, Clone, Copy)]
pub struct CourseExtractor;

impl CourseExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// Extracts course records from transcript text.
    ///
    /// Never fails: text without any course line yields an empty set.
    pub fn extract(&self, text: &str) -> CourseSet {
        self.resolve(self.scan(text))
    }

    /// Applies exclusion and last-occurrence-wins to matches in scan order.
    pub fn resolve(&self, matches: Vec<CourseMatch>) -> CourseSet {
        let mut courses = CourseSet::new();
        let mut excluded = 0usize;

        for candidate in matches {
            if candidate.excluded {
                tracing::debug!(
                    "Skipping {} at byte {}: status marker in trailing text",
                    candidate.record.code,
                    candidate.start
                );
                excluded += 1;
                continue;
            }

            if let Some(previous) = courses.insert(candidate.record) {
                tracing::trace!("Replaced earlier occurrence of {}", previous.code);
            }
        }

        tracing::info!(
            "Extracted {} courses ({} excluded or in progress)",
            courses.len(),
            excluded
        );
        courses
    }

    /// Returns every grammar match in scan order, flagged but not filtered.
    pub fn scan(&self, text: &str) -> Vec<CourseMatch> {
        COURSE_LINE_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                // The grade group only admits known tokens.
                let grade = Grade::from_token(&caps["grade"])?;
                let record = CourseRecord {
                    code: format!("{}{}", &caps["subject"], &caps["number"]),
                    title: caps["title"].trim_matches(is_separator).to_string(),
                    grade,
                };
                Some(CourseMatch {
                    record,
                    start: whole.start(),
                    end: whole.end(),
                    excluded: has_status_marker(&text[whole.end()..]),
                })
            })
            .collect()
    }
}

/// Convenience wrapper around [`CourseExtractor::extract`].
pub fn extract_courses(text: &str) -> CourseSet {
    CourseExtractor::new().extract(text)
}

/// Checks the first [`TRAILING_WINDOW_CHARS`] characters of `rest`.
fn has_status_marker(rest: &str) -> bool {
    let window_end = rest
        .char_indices()
        .nth(TRAILING_WINDOW_CHARS)
        .map_or(rest.len(), |(idx, _)| idx);
    let window = &rest[..window_end];
    STATUS_MARKERS.iter().any(|marker| window.contains(marker))
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, title: &str, grade: Grade) -> CourseRecord {
        CourseRecord {
            code: code.to_string(),
            title: title.to_string(),
            grade,
        }
    }

    #[test]
    fn test_empty_and_unmatched_text() {
        assert!(extract_courses("").is_empty());
        assert!(extract_courses("Official Transcript  Student ID 12345  Page 1 of 2").is_empty());
        // lowercase subject, unknown level, missing credits
        assert!(extract_courses("cs 101 Intro UG A 3.0").is_empty());
        assert!(extract_courses("CS 101 Intro XX A 3.0").is_empty());
        assert!(extract_courses("CS 101 Intro UG A").is_empty());
    }

    #[test]
    fn test_two_courses_end_to_end() {
        let text = "CS 101 Intro to Computing UG A 3.0 MATH 201 Calculus I UG B+ 4.0";
        let courses = extract_courses(text);

        assert_eq!(courses.codes(), vec!["CS101", "MATH201"]);
        assert_eq!(
            courses.get("CS101"),
            Some(&record("CS101", "Intro to Computing", Grade::A))
        );
        assert_eq!(
            courses.get("MATH201"),
            Some(&record("MATH201", "Calculus I", Grade::BPlus))
        );
    }

    #[test]
    fn test_single_occurrence() {
        let courses = extract_courses("HIST 1050 World History GR B 3.00");
        assert_eq!(courses.len(), 1);
        assert_eq!(
            courses.get("HIST1050"),
            Some(&record("HIST1050", "World History", Grade::B))
        );
    }

    #[test]
    fn test_two_character_grade_wins() {
        let courses = extract_courses("MATH 201 Calculus I UG A- 4.0");
        assert_eq!(courses.get("MATH201").map(|r| r.grade), Some(Grade::AMinus));
    }

    #[test]
    fn test_excluded_single_occurrence_is_dropped() {
        let courses = extract_courses("CS 101 Intro to Computing UG A 3.0 Excluded per policy");
        assert!(courses.is_empty());
        assert_eq!(courses.to_json_pretty().unwrap(), "{}");
    }

    #[test]
    fn test_registered_is_dropped() {
        let text = "PHYS 110 Mechanics UG I 4.0 Registered  CHEM 101 General Chemistry UG C 4.0";
        let courses = extract_courses(text);
        assert_eq!(courses.codes(), vec!["CHEM101"]);
    }

    #[test]
    fn test_marker_outside_window_is_ignored() {
        let padding = " ".repeat(TRAILING_WINDOW_CHARS);
        let text = format!("CS 101 Intro to Computing UG A 3.0{}Excluded", padding);
        let courses = extract_courses(&text);
        assert!(courses.contains("CS101"));

        // Marker starting on the last character of the window still counts.
        let padding = " ".repeat(TRAILING_WINDOW_CHARS - "Excluded".len());
        let text = format!("CS 101 Intro to Computing UG A 3.0{}Excluded", padding);
        assert!(extract_courses(&text).is_empty());
    }

    #[test]
    fn test_last_occurrence_wins() {
        let text = "CS 101 Programming UG C 3.0 MATH 201 Calculus I UG B 4.0 \
                    CS 101 Programming Retake UG A 3.0";
        let courses = extract_courses(text);

        // First-insertion key order, latest value.
        assert_eq!(courses.codes(), vec!["CS101", "MATH201"]);
        assert_eq!(
            courses.get("CS101"),
            Some(&record("CS101", "Programming Retake", Grade::A))
        );
    }

    #[test]
    fn test_excluded_repeat_keeps_earlier_record() {
        let text = "CS 101 Programming UG B 3.0 Fall semester standing good and honors noted \
                    CS 101 Programming UG F 3.0 Excluded from GPA";
        let courses = extract_courses(text);
        assert_eq!(
            courses.get("CS101"),
            Some(&record("CS101", "Programming", Grade::B))
        );
    }

    #[test]
    fn test_marker_of_next_line_inside_window() {
        // Short lines: the marker after CS 102 also falls in CS 101's window.
        let text = "CS 101 Intro UG A 3.0 CS 102 Data UG B 3.0 Excluded";
        let matches = CourseExtractor::new().scan(text);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.excluded));
        assert!(extract_courses(text).is_empty());
    }

    #[test]
    fn test_unicode_and_punctuation_in_title() {
        let text = "FREN 3010 Français Avancé & Culture GR A+ 3.0 \
                    ENG 210A Writer's Work-Shop. UG S 1.5";
        let courses = extract_courses(text);

        assert_eq!(
            courses.get("FREN3010").map(|r| r.title.as_str()),
            Some("Français Avancé & Culture")
        );
        assert_eq!(
            courses.get("ENG210A"),
            Some(&record("ENG210A", "Writer's Work-Shop.", Grade::S))
        );
    }

    #[test]
    fn test_separator_set() {
        // BOM separates fields; NEL does not.
        let courses = extract_courses("CS\u{FEFF}101 Intro\u{A0}Course UG A 3.0");
        assert_eq!(
            courses.get("CS101"),
            Some(&record("CS101", "Intro\u{A0}Course", Grade::A))
        );
        assert!(extract_courses("CS\u{85}101 Intro UG A 3.0").is_empty());
        assert!(is_separator('\u{2003}'));
        assert!(!is_separator('\u{85}'));
    }

    #[test]
    fn test_title_trimmed_of_separators() {
        let courses = extract_courses("CS 101 \u{FEFF}Intro\u{FEFF} UG A 3.0");
        assert_eq!(courses.get("CS101").map(|r| r.title.as_str()), Some("Intro"));
    }

    #[test]
    fn test_foundation_year_level() {
        let courses = extract_courses("ENGL 0991 Academic English FDY W 0.0");
        assert_eq!(courses.get("ENGL0991").map(|r| r.grade), Some(Grade::W));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let text = "CS 101 Intro UG A 3.0 CS 102 Data Structures UG B- 3.0";
        let extractor = CourseExtractor::new();
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }

    #[test]
    fn test_scan_reports_spans_and_exclusion() {
        let text = "CS 101 Intro UG A 3.0 Excluded";
        let matches = CourseExtractor::new().scan(text);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 0);
        assert_eq!(&text[matches[0].start..matches[0].end], "CS 101 Intro UG A 3.0");
        assert!(matches[0].excluded);
    }

    #[test]
    fn test_grade_tokens() {
        for grade in Grade::ALL {
            assert_eq!(Grade::from_token(grade.as_str()), Some(grade));
        }
        assert_eq!(Grade::from_token("a"), None);
        assert_eq!(Grade::from_token("E"), None);
        assert_eq!(Grade::DMinus.to_string(), "D-");
    }

    #[test]
    fn test_json_rendering() {
        let courses = extract_courses("CS 101 Intro to Computing UG A 3.0");
        let expected = r#"{
  "CS101": {
    "code": "CS101",
    "title": "Intro to Computing",
    "grade": "A"
  }
}"#;
        assert_eq!(courses.to_json_pretty().unwrap(), expected);
    }
}
