//! Symbolic step references inside mapping sources.
//!
//! Mapping sources encode the producing step by its *number* (`${step_3.response.id}`),
//! while the binding the user meant is to the step's *identity*. Whenever steps change
//! position the numbers have to be rewritten so each reference keeps pointing at the same
//! producer. This module holds the pure pieces of that rewrite.

mod renumbering;
mod rewriter;

pub use renumbering::Renumbering;
pub use rewriter::{referenced_steps, references_step, rewrite_source, source_for};
