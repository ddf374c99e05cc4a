//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable terminal output.

use tabled::builder::Builder;
use tabled::settings::{Padding, Style};

use crate::config::SystemConfiguration;

/// Trait for human-readable key-value output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for SystemConfiguration {
    fn pretty_print(&self) -> String {
        let mut builder = Builder::default();
        for (name, value) in self.entries() {
            builder.push_record([format!("{name}:"), value.to_string()]);
        }

        let mut table = builder.build();
        table.with(Style::blank()).with(Padding::new(0, 1, 0, 0));

        format!("Current configuration:\n{table}")
    }
}
