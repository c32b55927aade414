// ============================================================
// TARGET ROW
// ============================================================
// Fixed 30-column shape of `school_ranking_arwu_chinese`

use chrono::NaiveDateTime;
use serde::Serialize;

/// Legacy metric columns. Always written as zero.
pub const LEGACY_METRIC_COLUMNS: [&str; 9] = [
    "quality_students",
    "cultivation_results",
    "scientific_research_scale",
    "quality_research",
    "top_results",
    "top_talent",
    "technology_services",
    "industry_university_research_cooperation",
    "achievement_conversion",
];

/// Category score columns. Header names in the CSV match these exactly.
pub const CATEGORY_COLUMNS: [&str; 10] = [
    "school_level",
    "subject_level",
    "school_resources",
    "teacher_scale_structure",
    "talent_training",
    "scientific_research",
    "serve_society",
    "academic_talent",
    "major_projects_achievements",
    "international_competitiveness",
];

/// All destination columns in insert order
pub const TARGET_COLUMNS: [&str; 30] = [
    "id",
    "school_id",
    "ranking",
    "ranking_text",
    "prev_ranking",
    "school_cname",
    "school_ename",
    "year_time",
    "update_date_time",
    "quality_students",
    "cultivation_results",
    "scientific_research_scale",
    "quality_research",
    "top_results",
    "top_talent",
    "technology_services",
    "industry_university_research_cooperation",
    "achievement_conversion",
    "overall_score",
    "country_id",
    "school_level",
    "subject_level",
    "school_resources",
    "teacher_scale_structure",
    "talent_training",
    "scientific_research",
    "serve_society",
    "academic_talent",
    "major_projects_achievements",
    "international_competitiveness",
];

/// A fully typed destination row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRow {
    pub id: String,
    pub school_id: String,
    pub ranking: i32,
    pub ranking_text: String,
    pub prev_ranking: i32,
    pub school_cname: String,
    pub school_ename: String,
    pub year_time: i32,
    pub update_date_time: NaiveDateTime,
    /// Values for `LEGACY_METRIC_COLUMNS`, same order
    pub legacy_metrics: [f64; 9],
    pub overall_score: f64,
    pub country_id: String,
    /// Values for `CATEGORY_COLUMNS`, same order
    pub category_scores: [f64; 10],
}

impl TargetRow {
    /// Timestamp in the `YYYY-MM-DD HH:MM:SS` form accepted by DATETIME columns
    pub fn update_date_time_text(&self) -> String {
        self.update_date_time.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn category_score(&self, column: &str) -> Option<f64> {
        CATEGORY_COLUMNS
            .iter()
            .position(|name| *name == column)
            .map(|idx| self.category_scores[idx])
    }
}
