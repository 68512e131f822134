//! The referential pass
//!
//! Walks every expression and verifies that names resolve: identifiers
//! and assignment targets against the live scopes or the current class's
//! feature chain, self-dispatches against the class, static dispatches
//! against their named target. Forward references within a class are
//! legal, which is why resolution falls back to the class's own feature
//! list when the scope stack misses.
//!
//! Misuse of `self` is reported here, before any typing happens: it can
//! neither name an attribute, nor be let-bound, nor be assigned.
//!
//! Type names in declarations are not this pass's business except for
//! the static dispatch target, which method resolution needs.

use crate::frontend::ast::{Attribute, Class, Expr, ExprKind, Feature, Method, Program};
use crate::frontend::intern::{Interner, Symbol};
use crate::semant::diagnostics::Diagnostics;
use crate::semant::hierarchy::ClassHierarchy;
use crate::semant::symbol_table::SymbolTable;
use crate::semant::{pop_scopes, push_class_scopes, Binding, WellKnown};
use log::trace;

pub struct ScopeChecker<'a> {
    hierarchy: &'a ClassHierarchy,
    known: &'a WellKnown,
    interner: &'a Interner,
    diagnostics: &'a mut Diagnostics,
    table: SymbolTable<Binding>,
    current_class: Symbol,
    current_file: Symbol,
}

impl<'a> ScopeChecker<'a> {
    pub fn new(
        hierarchy: &'a ClassHierarchy,
        known: &'a WellKnown,
        interner: &'a Interner,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            hierarchy,
            known,
            interner,
            diagnostics,
            table: SymbolTable::new(),
            current_class: known.object,
            current_file: known.basic_file,
        }
    }

    pub fn run(&mut self, program: &Program) {
        self.table.enter_scope();
        let hierarchy = self.hierarchy;
        for id in hierarchy.ids() {
            let name = hierarchy.node(id).name;
            self.table.add_id(name, Binding::class(name));
        }
        for class in &program.classes {
            self.check_class(class);
        }
        self.table.exit_scope();
        debug_assert!(self.table.is_empty());
    }

    fn check_class(&mut self, class: &Class) {
        let Some(id) = self.hierarchy.find(class.name) else {
            return;
        };
        self.current_class = class.name;
        self.current_file = class.filename;
        trace!("scope pass: class {}", self.interner.resolve(class.name));

        let frames = push_class_scopes(&mut self.table, self.hierarchy, id);
        for feature in &class.features {
            match feature {
                Feature::Attribute(attr) => self.check_attribute(attr),
                Feature::Method(method) => self.check_method(method),
            }
        }
        pop_scopes(&mut self.table, frames);
    }

    fn check_attribute(&mut self, attr: &Attribute) {
        if attr.name == self.known.self_ {
            self.error(attr.span.line, "'self' cannot be the name of an attribute.".to_string());
        } else {
            self.table
                .add_id(attr.name, Binding::variable(attr.declared_type));
        }
        if let Some(init) = &attr.init {
            self.check_expr(init);
        }
    }

    fn check_method(&mut self, method: &Method) {
        self.table.enter_scope();
        for formal in &method.formals {
            self.table
                .add_id(formal.name, Binding::variable(formal.declared_type));
        }
        self.check_expr(&method.body);
        self.table.exit_scope();
    }

    /// A name resolves if any live frame binds it or the current class
    /// itself declares it. Inherited features already sit in the ancestor
    /// frames; the own-class check is what makes a forward reference
    /// within one class legal.
    fn is_declared(&self, name: Symbol) -> bool {
        self.table.lookup(name).is_some()
            || self.hierarchy.feature_exists_on_class(self.current_class, name)
    }

    fn check_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::IntConst(_)
            | ExprKind::StrConst(_)
            | ExprKind::BoolConst(_)
            | ExprKind::New(_) => {}
            ExprKind::Ident(name) => {
                if *name != self.known.self_ && !self.is_declared(*name) {
                    self.error(
                        expr.span.line,
                        format!("Undeclared identifier {}.", self.name(*name)),
                    );
                }
            }
            ExprKind::Assign { target, value } => {
                if *target == self.known.self_ {
                    self.error(expr.span.line, "Cannot assign to 'self'.".to_string());
                } else if !self.is_declared(*target) {
                    self.error(
                        expr.span.line,
                        format!("Assignment to undeclared variable {}.", self.name(*target)),
                    );
                }
                self.check_expr(value);
            }
            ExprKind::Dispatch { receiver, method, args } => {
                self.check_expr(receiver);
                // Only a self dispatch can be resolved without type data;
                // any other receiver waits for the type pass.
                if is_self_ident(receiver, self.known) && !self.is_declared(*method) {
                    self.error(
                        expr.span.line,
                        format!("Dispatch to undefined method {}.", self.name(*method)),
                    );
                }
                self.check_args(args);
            }
            ExprKind::StaticDispatch { receiver, class, method, args } => {
                self.check_expr(receiver);
                if self.hierarchy.find(*class).is_none() {
                    self.error(
                        expr.span.line,
                        format!("Static dispatch to undefined class {}.", self.name(*class)),
                    );
                } else if !self.hierarchy.search_feature(*class, *method) {
                    self.error(
                        expr.span.line,
                        format!("Dispatch to undefined method {}.", self.name(*method)),
                    );
                }
                self.check_args(args);
            }
            ExprKind::If { cond, then_branch, else_branch } => {
                self.check_expr(cond);
                self.check_expr(then_branch);
                self.check_expr(else_branch);
            }
            ExprKind::While { cond, body } => {
                self.check_expr(cond);
                self.check_expr(body);
            }
            ExprKind::Block(exprs) => {
                for e in exprs {
                    self.check_expr(e);
                }
            }
            ExprKind::Let { name, declared_type, init, body } => {
                // The initializer sees the outer scope, not the binding
                if let Some(init) = init {
                    self.check_expr(init);
                }
                self.table.enter_scope();
                if *name == self.known.self_ {
                    self.error(
                        expr.span.line,
                        "'self' cannot be bound in a 'let' expression.".to_string(),
                    );
                } else {
                    self.table
                        .add_id(*name, Binding::variable(*declared_type));
                }
                self.check_expr(body);
                self.table.exit_scope();
            }
            ExprKind::Case { scrutinee, branches } => {
                self.check_expr(scrutinee);
                for branch in branches {
                    self.table.enter_scope();
                    self.table
                        .add_id(branch.name, Binding::variable(branch.declared_type));
                    self.check_expr(&branch.body);
                    self.table.exit_scope();
                }
            }
            ExprKind::IsVoid(operand) | ExprKind::Neg(operand) | ExprKind::Not(operand) => {
                self.check_expr(operand);
            }
            ExprKind::BinOp { lhs, rhs, .. } => {
                self.check_expr(lhs);
                self.check_expr(rhs);
            }
        }
    }

    /// Actual arguments get a frame of their own
    fn check_args(&mut self, args: &[Expr]) {
        self.table.enter_scope();
        for arg in args {
            self.check_expr(arg);
        }
        self.table.exit_scope();
    }

    fn error(&mut self, line: u32, message: String) {
        self.diagnostics.error(self.current_file, line, message);
    }

    fn name(&self, symbol: Symbol) -> &'a str {
        self.interner.resolve(symbol)
    }
}

fn is_self_ident(expr: &Expr, known: &WellKnown) -> bool {
    matches!(expr.kind, ExprKind::Ident(name) if name == known.self_)
}

#[cfg(test)]
mod tests {
    use crate::frontend::intern::Interner;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;
    use crate::semant::analyze;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> (usize, Vec<String>) {
        let mut interner = Interner::new();
        let lexer = Lexer::new(source, 0);
        let mut parser = Parser::new(lexer, &mut interner, "test.cl");
        let mut program = parser.parse_program().expect("parse failed");
        let analysis = analyze(&mut program, &mut interner);
        let messages = analysis
            .diagnostics
            .records()
            .iter()
            .map(|d| d.message.clone())
            .collect();
        (analysis.diagnostics.error_count(), messages)
    }

    #[test]
    fn test_undeclared_identifier() {
        let (errors, messages) = run("class Main { main() : Int { ghost }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Undeclared identifier ghost.");
    }

    #[test]
    fn test_attribute_forward_reference_is_legal() {
        let (errors, _) = run(
            "class Main { \
               a : Int <- b; \
               b : Int <- 1; \
               main() : Int { a }; \
             };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_method_forward_reference_is_legal() {
        let (errors, _) = run(
            "class Main { \
               main() : Int { helper() }; \
               helper() : Int { 1 }; \
             };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_inherited_attribute_resolves() {
        let (errors, _) = run(
            "class A { total : Int; }; \
             class B inherits A { bump() : Int { total <- total + 1 }; }; \
             class Main { main() : Int { (new B).bump() }; };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_formals_are_in_scope() {
        let (errors, _) = run(
            "class Main { \
               add(a : Int, b : Int) : Int { a + b }; \
               main() : Int { add(1, 2) }; \
             };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_let_initializer_sees_outer_scope_only() {
        let (errors, messages) =
            run("class Main { main() : Int { let x : Int <- x in 1 }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Undeclared identifier x.");
    }

    #[test]
    fn test_let_shadows_attribute() {
        let (errors, _) = run(
            "class Main { \
               x : String; \
               main() : Int { let x : Int <- 1 in x + 1 }; \
             };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_case_branch_binds_its_name() {
        let (errors, _) = run(
            "class Main { main() : Object { case 1 of n : Int => n + 1; esac }; };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_self_cannot_name_an_attribute() {
        let (errors, messages) =
            run("class Main { self : Int; main() : Int { 1 }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "'self' cannot be the name of an attribute.");
    }

    #[test]
    fn test_self_cannot_be_let_bound() {
        let (errors, messages) =
            run("class Main { main() : Int { let self : Int <- 1 in 2 }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "'self' cannot be bound in a 'let' expression.");
    }

    #[test]
    fn test_self_cannot_be_assigned() {
        let (errors, messages) = run("class Main { main() : Object { self <- new Main }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Cannot assign to 'self'.");
    }

    #[test]
    fn test_assignment_to_undeclared_variable() {
        let (errors, messages) = run("class Main { main() : Int { ghost <- 1 }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Assignment to undeclared variable ghost.");
    }

    #[test]
    fn test_self_dispatch_to_undefined_method() {
        let (errors, messages) = run("class Main { main() : Int { missing() }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Dispatch to undefined method missing.");
    }

    #[test]
    fn test_static_dispatch_to_undefined_class() {
        let (errors, messages) =
            run("class Main { main() : Object { (new Main)@Ghost.main() }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Static dispatch to undefined class Ghost.");
    }

    #[test]
    fn test_static_dispatch_to_missing_method() {
        let (errors, messages) = run(
            "class A { x : Int; }; \
             class Main { main() : Object { (new A)@A.f() }; };",
        );
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Dispatch to undefined method f.");
    }

    #[test]
    fn test_errors_accumulate_across_methods() {
        let (errors, _) = run(
            "class Main { \
               f() : Int { ghost }; \
               g() : Int { phantom }; \
               main() : Int { 0 }; \
             };",
        );
        assert_eq!(errors, 2);
    }
}
