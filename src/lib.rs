// src/lib.rs
//! Extracts course records (code, title, grade) from academic transcript text.
pub mod utils;
pub mod document;
pub mod extractors;
pub mod storage;

pub use document::{load_transcript_text, parse_transcript};
pub use extractors::{extract_courses, CourseExtractor, CourseRecord, CourseSet, Grade};
