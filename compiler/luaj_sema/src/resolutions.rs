//! Identifier-to-declaration side table.

use luaj_ir::NodeId;
use luaj_symtab::DeclId;
use rustc_hash::FxHashMap;

/// Declaration each identifier occurrence resolved to, keyed by node id.
///
/// Covers assignment targets, variable reads, callees, parameters and
/// function names. An occurrence that produced a semantic error may be
/// missing.
#[derive(Clone, Debug, Default)]
pub struct Resolutions {
    map: FxHashMap<NodeId, DeclId>,
}

impl Resolutions {
    pub fn get(&self, id: NodeId) -> Option<DeclId> {
        self.map.get(&id).copied()
    }

    pub(crate) fn insert(&mut self, id: NodeId, decl: DeclId) {
        self.map.insert(id, decl);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
