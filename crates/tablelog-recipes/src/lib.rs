//! # tablelog-recipes
//!
//! Table recipes with audited data access, run against a workspace
//! abstraction:
//!
//! 1. **Read a table**: pick a warehouse and a table, read every row, record
//!    `read` or `read_failed`.
//! 2. **Edit a table**: load, diff the edited rows, write them back with
//!    `INSERT OVERWRITE`, record `update` then `edit` or `edit_failed`.
//! 3. **Current user**: show the forwarded identity headers.
//!
//! `mock_data` provides a fictional workspace; no external API calls are made.

pub mod browse;
pub mod context;
pub mod current_user;
pub mod mock_data;
pub mod scenarios;
pub mod sql;
pub mod table_edit;
pub mod table_read;
pub mod workspace;

pub use context::{PageRequest, RecipeContext, TableSelection, UserNotice};
pub use workspace::{CellValue, ResultSet, Warehouse, Workspace};

// ── Tests ─────────────────────────────────────────────────────────────────────
