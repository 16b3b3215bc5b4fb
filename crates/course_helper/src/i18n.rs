//! Two-locale (zh/en) string table, resolved at the render boundary.

use crate::catalog::{BilingualName, Course, Day};
use crate::schedule::Conflict;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub fn toggle(self) -> Self {
        match self {
            Locale::Zh => Locale::En,
            Locale::En => Locale::Zh,
        }
    }

    /// Label on the language switch button.
    pub fn switch_label(self) -> &'static str {
        match self {
            Locale::Zh => "中文",
            Locale::En => "English",
        }
    }

    pub fn pick(self, name: &BilingualName) -> &str {
        match self {
            Locale::Zh => &name.zh,
            Locale::En => &name.en,
        }
    }
}

/// Fixed interface strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiText {
    AppTitle,
    CourseSelection,
    AvailableCourses,
    SelectedCourses,
    WeeklySchedule,
    PeriodHeader,
    SearchPlaceholder,
    Loading,
    NoResults,
    TotalCredits,
    TotalHours,
    Login,
}

pub fn text(locale: Locale, key: UiText) -> &'static str {
    match (key, locale) {
        (UiText::AppTitle, Locale::Zh) => "北科課程助手",
        (UiText::AppTitle, Locale::En) => "NTUT Course Helper",
        (UiText::CourseSelection, Locale::Zh) => "選課系統",
        (UiText::CourseSelection, Locale::En) => "Course Selection",
        (UiText::AvailableCourses, Locale::Zh) => "可選課程",
        (UiText::AvailableCourses, Locale::En) => "Available Courses",
        (UiText::SelectedCourses, Locale::Zh) => "已選課程",
        (UiText::SelectedCourses, Locale::En) => "Selected Courses",
        (UiText::WeeklySchedule, Locale::Zh) => "週課表",
        (UiText::WeeklySchedule, Locale::En) => "Weekly Schedule",
        (UiText::PeriodHeader, Locale::Zh) => "節次",
        (UiText::PeriodHeader, Locale::En) => "Period",
        (UiText::SearchPlaceholder, Locale::Zh) => "搜尋課號、課名或教師",
        (UiText::SearchPlaceholder, Locale::En) => "Search code, name or teacher",
        (UiText::Loading, Locale::Zh) => "載入中…",
        (UiText::Loading, Locale::En) => "Loading…",
        (UiText::NoResults, Locale::Zh) => "查無課程",
        (UiText::NoResults, Locale::En) => "No courses found",
        (UiText::TotalCredits, Locale::Zh) => "總學分",
        (UiText::TotalCredits, Locale::En) => "Total credits",
        (UiText::TotalHours, Locale::Zh) => "總時數",
        (UiText::TotalHours, Locale::En) => "Total hours",
        (UiText::Login, Locale::Zh) => "登入",
        (UiText::Login, Locale::En) => "Log in",
    }
}

/// Column header for a weekday.
pub fn weekday_label(locale: Locale, day: Day) -> &'static str {
    match (locale, day) {
        (Locale::Zh, Day::Sun) => "週日",
        (Locale::Zh, Day::Mon) => "週一",
        (Locale::Zh, Day::Tue) => "週二",
        (Locale::Zh, Day::Wed) => "週三",
        (Locale::Zh, Day::Thu) => "週四",
        (Locale::Zh, Day::Fri) => "週五",
        (Locale::Zh, Day::Sat) => "週六",
        (Locale::En, Day::Sun) => "Sun",
        (Locale::En, Day::Mon) => "Mon",
        (Locale::En, Day::Tue) => "Tue",
        (Locale::En, Day::Wed) => "Wed",
        (Locale::En, Day::Thu) => "Thu",
        (Locale::En, Day::Fri) => "Fri",
        (Locale::En, Day::Sat) => "Sat",
    }
}

pub fn course_name(locale: Locale, course: &Course) -> &str {
    locale.pick(&course.name)
}

/// Caption inside a grid block: course name, then classroom names.
pub fn block_caption(locale: Locale, course: &Course) -> String {
    let rooms: Vec<&str> = course.classroom.iter().map(|r| r.name.as_str()).collect();
    if rooms.is_empty() {
        course_name(locale, course).to_string()
    } else {
        format!("{}\n{}", course_name(locale, course), rooms.join(", "))
    }
}

pub fn conflict_message(locale: Locale, conflict: &Conflict) -> String {
    match (locale, conflict) {
        (Locale::Zh, Conflict::Duplicate { course }) => {
            format!("重複選課：{}", course.name.zh)
        }
        (Locale::En, Conflict::Duplicate { course }) => {
            format!("Already selected: {}", course.name.en)
        }
        (
            Locale::Zh,
            Conflict::TimeOverlap {
                course,
                existing,
                day,
                period,
            },
        ) => format!(
            "時間衝突：{} 與 {}（{} 第{}節）",
            course.name.zh,
            existing.name.zh,
            weekday_label(Locale::Zh, *day),
            period
        ),
        (
            Locale::En,
            Conflict::TimeOverlap {
                course,
                existing,
                day,
                period,
            },
        ) => format!(
            "Time conflict: {} overlaps {} ({} period {})",
            course.name.en,
            existing.name.en,
            weekday_label(Locale::En, *day),
            period
        ),
    }
}

/// Every message in a conflict report, in order.
pub fn report_messages(locale: Locale, report: &crate::schedule::ConflictReport) -> Vec<String> {
    report
        .conflicts()
        .iter()
        .map(|c| conflict_message(locale, c))
        .collect()
}
