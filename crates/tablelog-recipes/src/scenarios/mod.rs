//! Scripted recipe runs.
//!
//! Each scenario drives real recipe code against the mock workspace and
//! prints what a user would have seen. The audit lines go wherever the
//! context's emitter is configured to send them.

pub mod current_user;
pub mod table_edit;
pub mod table_read;

use tablelog_contracts::error::TablelogResult;
use tablelog_core::{traits::NoticeSurface, Notice};

/// Prints emitter notices to stdout, standing in for a UI sidebar.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSurface;

impl NoticeSurface for ConsoleSurface {
    fn notify(&self, notice: &Notice) -> TablelogResult<()> {
        println!("  [sidebar] {notice}");
        Ok(())
    }
}
