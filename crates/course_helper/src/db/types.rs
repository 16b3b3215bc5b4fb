/// Database-side types for the course catalog
use crate::catalog::Course;

/// Separator between teacher names in the search column. Never typed by users.
const TEACHER_SEPARATOR: &str = "\u{1f}";

/// Lower-cased text columns stored beside each course document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchColumns {
    pub code_lc: String,
    pub name_zh_lc: String,
    pub name_en_lc: String,
    pub teachers_lc: String,
}

impl SearchColumns {
    pub fn from_course(course: &Course) -> Self {
        Self {
            code_lc: course.code.to_lowercase(),
            name_zh_lc: course.name.zh.to_lowercase(),
            name_en_lc: course.name.en.to_lowercase(),
            teachers_lc: course.teacher_names().join(TEACHER_SEPARATOR).to_lowercase(),
        }
    }
}

/// Case-insensitive literal substring filter over code, names and teachers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    needle: String,
}

impl CourseFilter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    /// The lower-cased search text.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn matches_all(&self) -> bool {
        self.needle.is_empty()
    }

    /// In-memory version of the SQL predicate.
    pub fn matches(&self, course: &Course) -> bool {
        if self.matches_all() {
            return true;
        }
        let cols = SearchColumns::from_course(course);
        cols.code_lc.contains(&self.needle)
            || cols.name_zh_lc.contains(&self.needle)
            || cols.name_en_lc.contains(&self.needle)
            || course
                .teacher
                .iter()
                .any(|t| t.name.to_lowercase().contains(&self.needle))
    }
}
