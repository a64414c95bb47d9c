// src/extractors/mod.rs
pub mod course;

// Re-export key extraction types for convenience
pub use course::{
    extract_courses,
    CourseExtractor,
    CourseMatch,
    CourseRecord,
    CourseSet,
    Grade,
};
