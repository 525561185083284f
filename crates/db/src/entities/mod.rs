//! `SeaORM` entity definitions.

pub mod accounts;
pub mod assets;
pub mod cost_categories;
pub mod depreciation_entries;
pub mod journal_lines;
pub mod journals;
pub mod sea_orm_active_enums;
pub mod sequence_counters;
