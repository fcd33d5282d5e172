//! Record store backed by a JSON document of DOI resources.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::driver::RecordStore;
use crate::error::StoreError;
use crate::record::{records_from_json, records_to_json, Record};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// In-memory record list served page by page; updates are written back
/// into the list so the result can be saved.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    records: Vec<Record>,
    page_size: usize,
    cursor: usize,
}

impl JsonFileStore {
    pub fn new(records: Vec<Record>, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            cursor: 0,
        }
    }

    pub fn from_json_str(json: &str, page_size: usize) -> Result<Self, StoreError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::new(records_from_json(value)?, page_size))
    }

    pub fn open(path: impl AsRef<Path>, page_size: usize) -> Result<Self, StoreError> {
        Self::from_json_str(&fs::read_to_string(path)?, page_size)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn to_json(&self) -> Result<Value, StoreError> {
        records_to_json(&self.records)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.to_json()?)?;
        fs::write(path, text + "\n")?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn next_page(&mut self) -> Result<Option<Vec<Record>>, StoreError> {
        if self.cursor >= self.records.len() {
            return Ok(None);
        }
        let end = (self.cursor + self.page_size).min(self.records.len());
        let page = self.records[self.cursor..end].to_vec();
        self.cursor = end;
        Ok(Some(page))
    }

    fn update(&mut self, id: &str, attributes: &Value) -> Result<(), StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.attributes = attributes.clone();
        Ok(())
    }
}
