//! One level of the nested symbol table.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::DeclId;

/// Index of a scope in its [`SymbolTable`](crate::SymbolTable).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The predefined scope, always the first one created.
    pub const PREDEFINED: ScopeId = ScopeId(0);

    pub(crate) fn new(index: usize) -> Self {
        ScopeId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// Name-to-declaration map for one nesting level.
#[derive(Clone, Debug)]
pub struct Scope {
    level: u32,
    owner: Option<DeclId>,
    parent: Option<ScopeId>,
    names: FxHashMap<String, DeclId>,
    /// Insertion order, for deterministic iteration.
    order: Vec<DeclId>,
    next_slot: u32,
}

impl Scope {
    pub(crate) fn new(level: u32, owner: Option<DeclId>, parent: Option<ScopeId>) -> Self {
        Scope {
            level,
            owner,
            parent,
            names: FxHashMap::default(),
            order: Vec::new(),
            next_slot: 0,
        }
    }

    /// Nesting level, 0 for the predefined scope.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The function or chunk whose body this scope is.
    pub fn owner(&self) -> Option<DeclId> {
        self.owner
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn get(&self, name: &str) -> Option<DeclId> {
        self.names.get(name).copied()
    }

    /// Declarations in insertion order.
    pub fn entries(&self) -> &[DeclId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of local slots handed out so far.
    pub fn slot_count(&self) -> u32 {
        self.next_slot
    }

    pub(crate) fn insert(&mut self, name: &str, id: DeclId) {
        self.names.insert(name.to_string(), id);
        self.order.push(id);
    }

    pub(crate) fn next_slot(&mut self) -> u32 {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }
}
