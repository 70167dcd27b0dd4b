// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Ordered technology rows with identities that survive insertion and removal.

use uuid::Uuid;

/// Unvalidated contents of one technology row, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTechEntry {
    pub title: String,
    /// Kept as text until validation coerces it to a number.
    pub knowledge: String,
}

/// Opaque identity of a row, distinct from its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TechRowId(Uuid);

impl TechRowId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// One editable row plus its stable identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechRow {
    id: TechRowId,
    pub entry: RawTechEntry,
}

impl TechRow {
    pub fn id(&self) -> TechRowId {
        self.id
    }
}

/// Insertion-ordered store of technology rows.
///
/// Rows keep their identity while neighbours are added or removed, so UI
/// bindings and validation-error paths stay attached to the right row.
/// Positional paths (`techs[1].title`) are derived on demand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TechList {
    rows: Vec<TechRow>,
}

impl TechList {
    /// Add one row at the end and return its identity.
    pub fn append(&mut self, entry: RawTechEntry) -> TechRowId {
        let id = TechRowId::generate();
        self.rows.push(TechRow { id, entry });
        id
    }

    /// Remove the row with the given identity. Returns false when unknown.
    pub fn remove(&mut self, id: TechRowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    pub fn entry_mut(&mut self, id: TechRowId) -> Option<&mut RawTechEntry> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .map(|row| &mut row.entry)
    }

    /// Current position of a row; recomputed after every mutation.
    #[allow(dead_code)]
    pub fn index_of(&self, id: TechRowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn rows(&self) -> &[TechRow] {
        &self.rows
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Snapshot of the current contents, however partially filled, in order.
    pub fn to_raw(&self) -> Vec<RawTechEntry> {
        self.rows.iter().map(|row| row.entry.clone()).collect()
    }
}
