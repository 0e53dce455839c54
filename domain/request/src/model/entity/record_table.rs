use std::collections::HashMap;

use anyhow::{anyhow, bail};

use super::RequestRecord;
use crate::model::vo::{RecordEvent, ReferenceNo, ReviewEntry};

/// Current state of every record, rebuilt from the record log.
#[derive(Debug, Default, Clone)]
pub struct RecordTable {
    records: Vec<RequestRecord>,
    index: HashMap<ReferenceNo, usize>,
}

impl RecordTable {
    pub fn replay(events: impl IntoIterator<Item = RecordEvent>) -> anyhow::Result<Self> {
        let mut table = Self::default();
        for event in events {
            table.apply(event)?;
        }
        Ok(table)
    }

    pub fn apply(&mut self, event: RecordEvent) -> anyhow::Result<()> {
        match event {
            RecordEvent::Created { record } => self.push(record),
            RecordEvent::Reviewed(entry) => self.review(&entry),
        }
    }

    fn push(&mut self, record: RequestRecord) -> anyhow::Result<()> {
        if let Some(reference_no) = &record.reference_no {
            if self.contains(reference_no) {
                bail!("Reference no: {reference_no} already exists.");
            }
            self.index.insert(reference_no.to_owned(), self.records.len());
        }
        self.records.push(record);
        Ok(())
    }

    fn review(&mut self, entry: &ReviewEntry) -> anyhow::Result<()> {
        let at = *self
            .index
            .get(&entry.reference_no)
            .ok_or(anyhow!("Review of unknown reference no: {}.", entry.reference_no))?;
        self.records[at].apply_review(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, reference_no: &ReferenceNo) -> Option<&RequestRecord> {
        self.index.get(reference_no).map(|&at| &self.records[at])
    }

    pub fn contains(&self, reference_no: &ReferenceNo) -> bool {
        self.index.contains_key(reference_no)
    }

    /// Records still waiting for a decision, in submission order.
    pub fn pending(&self) -> Vec<RequestRecord> {
        self.records.iter().filter(|el| el.status.is_pending()).cloned().collect()
    }

    pub fn records(&self) -> &[RequestRecord] {
        &self.records
    }
}
