//! The symbol table: declaration and scope arenas plus the open-scope stack.

use smallvec::SmallVec;

use crate::{DeclId, DeclKind, Declaration, Routine, Scope, ScopeId, TypeDesc};

/// A routine name declared twice in the same scope.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{name}` is already declared in this scope")]
pub struct DuplicateDeclaration {
    pub name: String,
    /// The declaration that keeps the name.
    pub existing: DeclId,
}

/// All scopes and declarations of one compilation unit.
///
/// Created with the predefined scope open. The analyzer pushes a scope for
/// the chunk and one per function body, and pops each exactly once.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    decls: Vec<Declaration>,
    /// Open scopes, innermost last. Never empty.
    stack: Vec<ScopeId>,
    program: Option<DeclId>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table whose only open scope holds the predefined names.
    pub fn new() -> Self {
        let mut table = SymbolTable {
            scopes: vec![Scope::new(0, None, None)],
            decls: Vec::new(),
            stack: vec![ScopeId::PREDEFINED],
            program: None,
        };
        table.declare_predefined();
        table
    }

    fn declare_predefined(&mut self) {
        let predefined = [
            ("number", DeclKind::Type, TypeDesc::Number),
            ("false", DeclKind::Constant(0), TypeDesc::Boolean),
            ("true", DeclKind::Constant(1), TypeDesc::Boolean),
            ("print", DeclKind::Function(Routine::default()), TypeDesc::Nil),
        ];
        for (name, kind, ty) in predefined {
            let id = self.insert(name, kind);
            self.decls[id.index()].ty = Some(ty);
        }
    }

    /// Declare `name` in the innermost open scope.
    ///
    /// Declaring a routine under a name the scope already holds fails and
    /// leaves the table unchanged. Any other redeclaration returns the
    /// existing declaration.
    pub fn declare(&mut self, name: &str, kind: DeclKind) -> Result<DeclId, DuplicateDeclaration> {
        if let Some(existing) = self.lookup_local(name) {
            if kind.is_routine() {
                return Err(DuplicateDeclaration {
                    name: name.to_string(),
                    existing,
                });
            }
            return Ok(existing);
        }
        Ok(self.insert(name, kind))
    }

    fn insert(&mut self, name: &str, kind: DeclKind) -> DeclId {
        let scope = self.current_scope();
        let id = DeclId::new(self.decls.len());
        tracing::trace!(
            name,
            kind = kind.name(),
            level = self.scope(scope).level(),
            "declare"
        );
        self.decls.push(Declaration {
            name: name.to_string(),
            kind,
            scope,
            ty: None,
            lines: SmallVec::new(),
        });
        self.scopes[scope.index()].insert(name, id);
        id
    }

    /// Search the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<DeclId> {
        self.scope(self.current_scope()).get(name)
    }

    /// Search every open scope, innermost first.
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| self.scope(*scope).get(name))
    }

    /// Open a scope nested in the current one.
    ///
    /// When `owner` is a routine, the new scope becomes its body scope.
    pub fn push(&mut self, owner: Option<DeclId>) -> ScopeId {
        let parent = self.current_scope();
        let level = self.scope(parent).level() + 1;
        let id = ScopeId::new(self.scopes.len());
        self.scopes.push(Scope::new(level, owner, Some(parent)));
        self.stack.push(id);

        if let Some(routine) = owner.and_then(|o| self.decls[o.index()].kind.routine_mut()) {
            routine.scope = Some(id);
        }
        id
    }

    /// Close the innermost scope. The predefined scope is never closed.
    pub fn pop(&mut self) -> Option<ScopeId> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Hand out the next local slot of the innermost scope's routine.
    pub fn next_slot(&mut self) -> u32 {
        let scope = self.current_scope();
        self.scopes[scope.index()].next_slot()
    }

    pub fn current_scope(&self) -> ScopeId {
        self.stack
            .last()
            .copied()
            .unwrap_or(ScopeId::PREDEFINED)
    }

    pub fn current_level(&self) -> u32 {
        self.scope(self.current_scope()).level()
    }

    /// Record a source line referencing `id`.
    pub fn add_line(&mut self, id: DeclId, line: u32) {
        self.decls[id.index()].lines.push(line);
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    /// Routine data of a function or chunk declaration.
    pub fn routine(&self, id: DeclId) -> Option<&Routine> {
        self.decl(id).kind.routine()
    }

    pub fn routine_mut(&mut self, id: DeclId) -> Option<&mut Routine> {
        self.decl_mut(id).kind.routine_mut()
    }

    /// Declarations of `scope` sorted by name.
    pub fn sorted_entries(&self, scope: ScopeId) -> Vec<DeclId> {
        let mut entries = self.scope(scope).entries().to_vec();
        entries.sort_by(|a, b| self.decl(*a).name.cmp(&self.decl(*b).name));
        entries
    }

    /// Nesting level of the scope `id` was declared in.
    pub fn level_of(&self, id: DeclId) -> u32 {
        self.scope(self.decl(id).scope).level()
    }

    /// The chunk declaration, once analysis has declared it.
    pub fn program(&self) -> Option<DeclId> {
        self.program
    }

    pub fn set_program(&mut self, id: DeclId) {
        self.program = Some(id);
    }

    /// Total number of declarations, predefined ones included.
    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Depth of the open-scope stack, the predefined scope included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
