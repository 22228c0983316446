//! One module per pipeline step. Each step takes its inputs explicitly and
//! returns its output together with the model transactions it made.

pub mod assess;
pub mod consolidate;
pub mod deidentify;
pub mod recommend;
pub mod summarize;

use careguide_core::models::transaction::ModelTransaction;

/// A step's result plus the audit trail of its model calls.
#[derive(Debug, Clone)]
pub struct StepOutput<T> {
    pub output: T,
    pub transactions: Vec<ModelTransaction>,
}

impl<T> StepOutput<T> {
    /// A result produced without calling the model.
    pub fn local(output: T) -> Self {
        Self {
            output,
            transactions: Vec::new(),
        }
    }
}
