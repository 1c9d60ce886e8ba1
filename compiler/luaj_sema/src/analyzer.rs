//! The analysis walk.

use std::rc::Rc;

use luaj_diagnostic::{
    argument_count_mismatch, assign_to_function, redeclared_identifier, string_value,
    undeclared_function, DiagnosticQueue,
};
use luaj_ir::{
    ensure_sufficient_stack, Block, Call, Chunk, Expr, ExprKind, FunctionDef, Ident, Stmt,
    StmtKind,
};
use luaj_symtab::{DeclId, DeclKind, Routine, SymbolTable, TypeDesc};

use crate::{Resolutions, SemanticModel};

/// Scope level of the chunk body. Variables declared here are static fields.
const CHUNK_LEVEL: u32 = 1;

/// Analyze a parsed chunk.
///
/// Semantic errors are pushed to `queue`; the walk always covers the whole
/// tree. The returned model is complete only if no error was reported.
#[tracing::instrument(level = "debug", skip(chunk, queue))]
pub fn analyze(chunk: &Chunk, program_name: &str, queue: &mut DiagnosticQueue) -> SemanticModel {
    let mut symtab = SymbolTable::new();
    let program = symtab
        .declare(program_name, DeclKind::Chunk(Routine::default()))
        .unwrap_or_else(|dup| dup.existing);
    symtab.set_program(program);
    symtab.push(Some(program));

    let mut analyzer = Analyzer {
        symtab,
        resolutions: Resolutions::default(),
        queue,
    };
    analyzer.visit_block(&chunk.block);
    analyzer.symtab.pop();

    tracing::debug!(
        decls = analyzer.symtab.decl_count(),
        resolved = analyzer.resolutions.len(),
        errors = analyzer.queue.semantic_error_count(),
        "analyzed"
    );

    SemanticModel {
        symtab: analyzer.symtab,
        resolutions: analyzer.resolutions,
        program,
    }
}

struct Analyzer<'q> {
    symtab: SymbolTable,
    resolutions: Resolutions,
    queue: &'q mut DiagnosticQueue,
}

impl Analyzer<'_> {
    fn visit_block(&mut self, block: &Block) {
        for stmt in block {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| match &stmt.kind {
            StmtKind::Assign { target, value } => {
                self.visit_assign_target(target);
                self.visit_expr(value);
            }
            StmtKind::If(if_stmt) => {
                for branch in &if_stmt.branches {
                    self.visit_expr(&branch.cond);
                    self.visit_block(&branch.block);
                }
                if let Some(block) = &if_stmt.else_block {
                    self.visit_block(block);
                }
            }
            StmtKind::Repeat { body, until } => {
                self.visit_block(body);
                self.visit_expr(until);
            }
            StmtKind::Function(def) => self.visit_function(def),
            StmtKind::Call(call) => self.visit_call(call),
            StmtKind::Print(args) => {
                for arg in args.iter().filter(|arg| !is_string(arg)) {
                    self.visit_expr(arg);
                }
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
        });
    }

    fn visit_expr(&mut self, expr: &Expr) {
        ensure_sufficient_stack(|| match &expr.kind {
            ExprKind::Number(_) | ExprKind::Bool(_) => {}
            // Strings reach here only outside a `print` argument list.
            ExprKind::Str(_) => self.queue.push(string_value(expr.line)),
            ExprKind::Var(ident) => self.visit_name(ident),
            ExprKind::Call(call) => self.visit_call(call),
            ExprKind::Paren(inner) => self.visit_expr(inner),
            ExprKind::Unary { operand, .. } => self.visit_expr(operand),
            ExprKind::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
        });
    }

    /// Resolve `ident` in the innermost scope, declaring it on first use.
    fn resolve_local(&mut self, ident: &Ident) -> DeclId {
        let id = match self.symtab.lookup_local(&ident.name) {
            Some(id) => id,
            None => self.declare_variable(&ident.name),
        };
        self.symtab.add_line(id, ident.line);
        self.resolutions.insert(ident.id, id);
        id
    }

    fn declare_variable(&mut self, name: &str) -> DeclId {
        let slot = (self.symtab.current_level() > CHUNK_LEVEL).then(|| self.symtab.next_slot());
        let id = self
            .symtab
            .declare(name, DeclKind::Variable { slot })
            .unwrap_or_else(|dup| dup.existing);
        self.symtab.decl_mut(id).ty = Some(TypeDesc::Number);
        tracing::trace!(name, ?slot, "implicit variable");
        id
    }

    fn visit_assign_target(&mut self, target: &Ident) {
        let id = self.resolve_local(target);
        if self.symtab.decl(id).kind.is_function() {
            self.queue.push(assign_to_function(target.line, &target.name));
        }
    }

    /// A bare name. Naming a function in the current scope calls it with no
    /// arguments.
    fn visit_name(&mut self, ident: &Ident) {
        let id = self.resolve_local(ident);
        if let Some(routine) = self.symtab.decl(id).kind.routine() {
            let expected = routine.params.len();
            if expected != 0 {
                self.queue.push(argument_count_mismatch(
                    ident.line,
                    &ident.name,
                    expected,
                    0,
                ));
            }
        }
    }

    fn visit_call(&mut self, call: &Call) {
        let callee = &call.callee;
        match self.symtab.lookup(&callee.name) {
            Some(id) if self.symtab.decl(id).kind.is_function() => {
                self.symtab.add_line(id, callee.line);
                self.resolutions.insert(callee.id, id);
                let expected = self.symtab.routine(id).map_or(0, |r| r.params.len());
                if expected != call.args.len() {
                    self.queue.push(argument_count_mismatch(
                        callee.line,
                        &callee.name,
                        expected,
                        call.args.len(),
                    ));
                }
            }
            _ => self.queue.push(undeclared_function(callee.line, &callee.name)),
        }
        for arg in &call.args {
            self.visit_expr(arg);
        }
    }

    fn visit_function(&mut self, def: &FunctionDef) {
        let name = &def.name;
        let id = match self
            .symtab
            .declare(&name.name, DeclKind::Function(Routine::default()))
        {
            Ok(id) => id,
            Err(dup) => {
                let first = self.symtab.decl(dup.existing).lines.first().copied();
                self.queue
                    .push(redeclared_identifier(name.line, &dup.name, first));
                return;
            }
        };
        self.symtab.add_line(id, name.line);
        self.resolutions.insert(name.id, id);

        let returns_value = block_returns_value(&def.body);
        self.symtab.decl_mut(id).ty = Some(if returns_value {
            TypeDesc::Number
        } else {
            TypeDesc::Nil
        });

        let owner = self.symtab.scope(self.symtab.current_scope()).owner();
        if let Some(routine) = owner.and_then(|owner| self.symtab.routine_mut(owner)) {
            routine.subroutines.push(id);
        }

        self.symtab.push(Some(id));
        tracing::debug!(
            name = %name.name,
            params = def.params.len(),
            returns_value,
            level = self.symtab.current_level(),
            "function"
        );

        for param in &def.params {
            let slot = self.symtab.next_slot();
            let param_id = self
                .symtab
                .declare(&param.name, DeclKind::ValueParameter { slot })
                .unwrap_or_else(|dup| dup.existing);
            self.symtab.decl_mut(param_id).ty = Some(TypeDesc::Number);
            self.symtab.add_line(param_id, param.line);
            self.resolutions.insert(param.id, param_id);
            if let Some(routine) = self.symtab.routine_mut(id) {
                routine.params.push(param_id);
            }
        }

        let result_slot = returns_value.then(|| self.symtab.next_slot());
        if let Some(routine) = self.symtab.routine_mut(id) {
            routine.result_slot = result_slot;
            routine.body = Some(Rc::clone(&def.body));
        }

        self.visit_block(&def.body);
        self.symtab.pop();
    }
}

/// Whether a body contains `return exp` outside nested function definitions.
fn block_returns_value(block: &Block) -> bool {
    block.iter().any(|stmt| match &stmt.kind {
        StmtKind::Return(value) => value.is_some(),
        StmtKind::If(if_stmt) => {
            if_stmt
                .branches
                .iter()
                .any(|branch| block_returns_value(&branch.block))
                || if_stmt.else_block.as_ref().is_some_and(block_returns_value)
        }
        StmtKind::Repeat { body, .. } => block_returns_value(body),
        StmtKind::Assign { .. }
        | StmtKind::Function(_)
        | StmtKind::Call(_)
        | StmtKind::Print(_) => false,
    })
}

/// A string literal, possibly parenthesized.
fn is_string(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Str(_) => true,
        ExprKind::Paren(inner) => is_string(inner),
        _ => false,
    }
}
