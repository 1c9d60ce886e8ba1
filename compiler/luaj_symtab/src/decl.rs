//! Declarations: one per named binding.

use std::fmt;
use std::rc::Rc;

use luaj_ir::Block;
use smallvec::SmallVec;

use crate::{ScopeId, TypeDesc};

/// Index of a declaration in its [`SymbolTable`](crate::SymbolTable).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    pub(crate) fn new(index: usize) -> Self {
        DeclId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// A named binding in some scope.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    /// Scope the declaration was made in.
    pub scope: ScopeId,
    pub ty: Option<TypeDesc>,
    /// Source lines referencing the name, in visit order.
    pub lines: SmallVec<[u32; 4]>,
}

/// What a name denotes. Each case carries only the data it needs.
#[derive(Clone, Debug)]
pub enum DeclKind {
    Constant(i32),
    Type,
    /// Chunk-level variables have no slot; they are static fields.
    Variable {
        slot: Option<u32>,
    },
    ValueParameter {
        slot: u32,
    },
    Function(Routine),
    Chunk(Routine),
    Undefined,
}

impl DeclKind {
    /// Kind name as printed in the cross-reference listing.
    pub fn name(&self) -> &'static str {
        match self {
            DeclKind::Constant(_) => "constant",
            DeclKind::Type => "type",
            DeclKind::Variable { .. } => "variable",
            DeclKind::ValueParameter { .. } => "value parameter",
            DeclKind::Function(_) => "function",
            DeclKind::Chunk(_) => "chunk",
            DeclKind::Undefined => "undefined",
        }
    }

    pub fn is_routine(&self) -> bool {
        self.routine().is_some()
    }

    pub fn is_function(&self) -> bool {
        matches!(self, DeclKind::Function(_))
    }

    pub fn routine(&self) -> Option<&Routine> {
        match self {
            DeclKind::Function(routine) | DeclKind::Chunk(routine) => Some(routine),
            _ => None,
        }
    }

    pub fn routine_mut(&mut self) -> Option<&mut Routine> {
        match self {
            DeclKind::Function(routine) | DeclKind::Chunk(routine) => Some(routine),
            _ => None,
        }
    }

    /// Local slot of a variable or parameter.
    pub fn slot(&self) -> Option<u32> {
        match self {
            DeclKind::Variable { slot } => *slot,
            DeclKind::ValueParameter { slot } => Some(*slot),
            _ => None,
        }
    }
}

/// Routine data shared by functions and the chunk.
#[derive(Clone, Debug, Default)]
pub struct Routine {
    /// Body scope, set when the scope is pushed.
    pub scope: Option<ScopeId>,
    /// Parameters in declaration order.
    pub params: Vec<DeclId>,
    /// Functions defined directly inside this routine, in source order.
    pub subroutines: Vec<DeclId>,
    /// Body kept for code generation. `None` for predefined routines.
    pub body: Option<Rc<Block>>,
    /// Slot holding the return value, for value-returning functions.
    pub result_slot: Option<u32>,
}

impl Routine {
    pub fn returns_value(&self) -> bool {
        self.result_slot.is_some()
    }
}
