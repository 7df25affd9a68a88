use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSuccess {
    /// Position of the record in the submitted sequence.
    pub index: usize,
    /// Response body; `None` when the server replied without one.
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub index: usize,
    pub message: String,
}

/// Per-record result of a batch submission.
///
/// Every input index lands in exactly one of the two lists, and each list is
/// in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub ok: Vec<BatchSuccess>,
    pub errors: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.ok.len() + self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.errors.iter().map(|f| f.index).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentSuccess {
    pub recipient: String,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentFailure {
    pub recipient: String,
    pub message: String,
}

/// Per-recipient result of a fan-out, in the order recipients were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignmentOutcome {
    pub ok: Vec<AssignmentSuccess>,
    pub errors: Vec<AssignmentFailure>,
}

impl AssignmentOutcome {
    pub fn total(&self) -> usize {
        self.ok.len() + self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn failed_recipients(&self) -> Vec<&str> {
        self.errors.iter().map(|f| f.recipient.as_str()).collect()
    }
}
