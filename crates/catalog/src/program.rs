use std::collections::HashMap;

use serde::Serialize;

use crate::errors::CatalogError;

/// A registration program (e.g. a camp session) with a fixed capacity limit.
/// The limit is advisory: it caps nothing by itself, callers decide what to
/// do with it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Program {
    pub id: String,
    pub limit: u64,
    pub display_name: Option<String>,
}

impl Program {
    /// Name to show on rendered pages; falls back to the identifier.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

impl From<&configs::ProgramEntry> for Program {
    fn from(entry: &configs::ProgramEntry) -> Self {
        Self {
            id: entry.id.trim().to_string(),
            limit: entry.limit,
            display_name: entry.name.clone(),
        }
    }
}

/// Ordered, validated program table. Iteration order is definition order,
/// which is also the order status views render in.
#[derive(Debug, Clone)]
pub struct Catalog {
    programs: Vec<Program>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(programs: Vec<Program>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(programs.len());
        for (i, p) in programs.iter().enumerate() {
            if p.id.trim().is_empty() {
                return Err(CatalogError::EmptyIdentifier);
            }
            if index.insert(p.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateIdentifier(p.id.clone()));
            }
        }
        Ok(Self { programs, index })
    }

    pub fn from_entries(entries: &[configs::ProgramEntry]) -> Result<Self, CatalogError> {
        Self::new(entries.iter().map(Program::from).collect())
    }

    pub fn get(&self, id: &str) -> Option<&Program> {
        self.index.get(id).map(|&i| &self.programs[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Program identifiers in definition order.
    pub fn ids(&self) -> Vec<String> {
        self.programs.iter().map(|p| p.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
