//! Resume intelligence — every LLM-backed operation in ResuMatch.
//!
//! Error policy differs by operation, on purpose:
//!
//! | Operation       | Policy      | On failure                          |
//! |-----------------|-------------|-------------------------------------|
//! | resume analysis | fail-closed | error to the caller (nothing to show without it) |
//! | job matching    | fail-open   | empty or partial match list, warn log |
//! | skill gaps      | fail-open   | empty gap list, warn log            |
//!
//! A partial or absent recommendation is preferable to blocking the user
//! from seeing their score.

pub mod handlers;
pub mod matching;
pub mod resume;
pub mod skill_gap;
pub mod store;
