//! Raw record form fields and their validation

use crate::domain::entity::RecordFields;
use crate::domain::value_object::{Measurement, Memo, parse_date};
use crate::error::GrowthResult;

/// Record fields as submitted (multipart text)
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    pub date: String,
    pub height: String,
    pub weight: String,
    pub memo: Option<String>,
}

impl RecordInput {
    /// Validate into record fields carrying `photo`
    pub(crate) fn validate(&self, photo: Option<String>) -> GrowthResult<RecordFields> {
        Ok(RecordFields {
            date: parse_date("date", &self.date)?,
            height: Measurement::parse("height", &self.height)?,
            weight: Measurement::parse("weight", &self.weight)?,
            memo: Memo::new(self.memo.as_deref())?,
            photo,
        })
    }
}
