//! Cross-reference listing.
//!
//! For the chunk and then each nested function, prints every declared name
//! with the lines that reference it, its kind and its nesting level.

use std::fmt;

use crate::{DeclId, SymbolTable};

const NAME_WIDTH: usize = 16;
const NUMBERS_LABEL: &str = " Line numbers    ";
const NUMBERS_UNDERLINE: &str = " ------------    ";
const INDENT: &str = "                                 ";

/// Display adapter rendering the listing for a finished table.
pub struct CrossReference<'a> {
    table: &'a SymbolTable,
}

impl<'a> CrossReference<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        debug_assert_eq!(INDENT.len(), NAME_WIDTH + NUMBERS_LABEL.len());
        CrossReference { table }
    }

    fn routine(&self, f: &mut fmt::Formatter<'_>, id: DeclId) -> fmt::Result {
        let decl = self.table.decl(id);
        writeln!(f)?;
        writeln!(f, "*** {} {} ***", decl.kind.name(), decl.name)?;
        self.headings(f)?;

        let Some(routine) = decl.kind.routine() else {
            return Ok(());
        };
        if let Some(scope) = routine.scope {
            for entry in self.table.sorted_entries(scope) {
                self.entry(f, entry)?;
            }
        }
        for sub in &routine.subroutines {
            self.routine(f, *sub)?;
        }
        Ok(())
    }

    fn headings(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "{:<NAME_WIDTH$}{NUMBERS_LABEL}Type specification",
            "Identifier"
        )?;
        writeln!(
            f,
            "{:<NAME_WIDTH$}{NUMBERS_UNDERLINE}------------------",
            "----------"
        )
    }

    fn entry(&self, f: &mut fmt::Formatter<'_>, id: DeclId) -> fmt::Result {
        let decl = self.table.decl(id);
        write!(f, "{:<NAME_WIDTH$}", decl.name)?;
        for line in &decl.lines {
            write!(f, " {line:03}")?;
        }
        writeln!(f)?;
        writeln!(f, "{INDENT}Defined as: {}", decl.kind.name())?;
        writeln!(f, "{INDENT}Scope nesting level: {}", self.table.level_of(id))
    }
}

impl fmt::Display for CrossReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "===== CROSS-REFERENCE TABLE =====")?;
        match self.table.program() {
            Some(program) => self.routine(f, program),
            None => writeln!(f, "\tProgram id is missing"),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
