//! BIO label sequences to merged, attached, linearized instructions.

pub mod clause;
pub mod compiler;

pub use clause::{Attachments, Clause, ClauseKind, Instruction, Relation};
pub use compiler::{CompilerOptions, compile};
