//! The type pass
//!
//! Runs only when the hierarchy and the referential pass were clean, so
//! every name it meets resolves somewhere. The walk mirrors the scope
//! pass frame for frame, but bindings now carry declared types and
//! method signatures, and every expression node is annotated with the
//! static type the walk computes for it.
//!
//! Recovery keeps the pass total: a failed dispatch or assignment takes
//! the root class as its type, an unknown declared type is reported once
//! at its declaration and then conforms to everything, and a method with
//! duplicated formals skips its body because the parameter scope is
//! ambiguous.

use crate::frontend::ast::{Attribute, BinOp, Class, Expr, ExprKind, Feature, Method, Program};
use crate::frontend::intern::{Interner, Symbol};
use crate::semant::diagnostics::Diagnostics;
use crate::semant::hierarchy::{ClassHierarchy, FormalSig, MethodSig};
use crate::semant::symbol_table::SymbolTable;
use crate::semant::{pop_scopes, push_class_scopes, Binding, BindingKind, WellKnown};
use log::trace;

pub struct TypeChecker<'a> {
    hierarchy: &'a ClassHierarchy,
    known: &'a WellKnown,
    interner: &'a Interner,
    diagnostics: &'a mut Diagnostics,
    table: SymbolTable<Binding>,
    current_class: Symbol,
    current_file: Symbol,
}

impl<'a> TypeChecker<'a> {
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

    pub fn run(&mut self, program: &mut Program) {
        self.table.enter_scope();
        let hierarchy = self.hierarchy;
        for id in hierarchy.ids() {
            let name = hierarchy.node(id).name;
            self.table.add_id(name, Binding::class(name));
        }
        for class in &mut program.classes {
            self.check_class(class);
        }
        self.table.exit_scope();
        debug_assert!(self.table.is_empty());
    }

    fn check_class(&mut self, class: &mut Class) {
        let Some(id) = self.hierarchy.find(class.name) else {
            return;
        };
        self.current_class = class.name;
        self.current_file = class.filename;
        trace!("type pass: class {}", self.interner.resolve(class.name));

        let frames = push_class_scopes(&mut self.table, self.hierarchy, id);
        for feature in &mut class.features {
            match feature {
                Feature::Attribute(attr) => self.check_attribute(attr),
                Feature::Method(method) => self.check_method(method),
            }
        }
        pop_scopes(&mut self.table, frames);
    }

    fn check_attribute(&mut self, attr: &mut Attribute) {
        // Any variable binding already visible means a clash with an
        // inherited attribute or an earlier one in this class.
        let duplicate = matches!(
            self.table.lookup(attr.name),
            Some(binding) if binding.kind == BindingKind::Variable
        );
        if duplicate {
            self.error(
                attr.span.line,
                format!(
                    "Attribute {} is an attribute of an inherited class.",
                    self.name(attr.name)
                ),
            );
        }
        self.table
            .add_id(attr.name, Binding::variable(attr.declared_type));
        self.check_type_defined(attr.declared_type, attr.span.line);

        if let Some(init) = &mut attr.init {
            let init_ty = self.check_expr(init);
            if !self.hierarchy.is_subtype(init_ty, attr.declared_type, self.current_class) {
                self.error(
                    attr.span.line,
                    format!(
                        "Inferred type {} of initialization of attribute {} does not conform to declared type {}.",
                        self.name(init_ty),
                        self.name(attr.name),
                        self.name(attr.declared_type)
                    ),
                );
            }
        }
    }

    fn check_method(&mut self, method: &mut Method) {
        // Bind the signature before the body so later self dispatches in
        // this class resolve through the scope stack.
        let sig = MethodSig {
            name: method.name,
            formals: method
                .formals
                .iter()
                .map(|f| FormalSig {
                    name: f.name,
                    declared_type: f.declared_type,
                })
                .collect(),
            return_type: method.return_type,
        };
        self.table.add_id(method.name, Binding::method(sig));
        self.check_type_defined(method.return_type, method.span.line);

        let mut duplicated = false;
        for (i, formal) in method.formals.iter().enumerate() {
            if method.formals[..i].iter().any(|other| other.name == formal.name) {
                duplicated = true;
                self.diagnostics.error(
                    self.current_file,
                    formal.span.line,
                    format!("Formal parameter {} is multiply defined.", self.interner.resolve(formal.name)),
                );
            }
        }
        if duplicated {
            // The parameter scope is ambiguous; leave the body alone
            return;
        }

        self.table.enter_scope();
        for formal in &method.formals {
            self.check_type_defined(formal.declared_type, formal.span.line);
            self.table
                .add_id(formal.name, Binding::variable(formal.declared_type));
        }
        let body_ty = self.check_expr(&mut method.body);
        self.table.exit_scope();

        if !self.hierarchy.is_subtype(body_ty, method.return_type, self.current_class) {
            self.error(
                method.span.line,
                format!(
                    "Inferred return type {} of method {} does not conform to declared return type {}.",
                    self.name(body_ty),
                    self.name(method.name),
                    self.name(method.return_type)
                ),
            );
        }
    }

    /// Compute, record and return the expression's static type
    fn check_expr(&mut self, expr: &mut Expr) -> Symbol {
        let span = expr.span;
        let ty = match &mut expr.kind {
            ExprKind::IntConst(_) => self.known.int,
            ExprKind::StrConst(_) => self.known.string,
            ExprKind::BoolConst(_) => self.known.bool_,
            ExprKind::Ident(name) => {
                let name = *name;
                self.check_ident(name)
            }
            ExprKind::Assign { target, value } => {
                let target = *target;
                let value_ty = self.check_expr(value);
                let declared = self
                    .table
                    .lookup(target)
                    .and_then(|b| b.ty)
                    .or_else(|| self.hierarchy.attribute_on(self.current_class, target))
                    .unwrap_or(self.known.object);
                if self.hierarchy.is_subtype(value_ty, declared, self.current_class) {
                    declared
                } else {
                    self.error(
                        span.line,
                        format!(
                            "Type {} of assigned expression does not conform to declared type {} of identifier {}.",
                            self.name(value_ty),
                            self.name(declared),
                            self.name(target)
                        ),
                    );
                    self.known.object
                }
            }
            ExprKind::Dispatch { receiver, method, args } => {
                let method = *method;
                let receiver_ty = self.check_expr(receiver);
                let arg_types = self.check_args(args);
                self.check_dispatch(span.line, receiver_ty, None, method, &arg_types)
            }
            ExprKind::StaticDispatch { receiver, class, method, args } => {
                let (class, method) = (*class, *method);
                let receiver_ty = self.check_expr(receiver);
                let arg_types = self.check_args(args);
                if self.hierarchy.find(class).is_none() {
                    // Already reported by the referential pass
                    self.known.object
                } else {
                    if !self.hierarchy.is_subtype(receiver_ty, class, self.current_class) {
                        self.error(
                            span.line,
                            format!(
                                "Expression type {} does not conform to declared static dispatch type {}.",
                                self.name(receiver_ty),
                                self.name(class)
                            ),
                        );
                    }
                    self.check_dispatch(span.line, receiver_ty, Some(class), method, &arg_types)
                }
            }
            ExprKind::If { cond, then_branch, else_branch } => {
                let cond_ty = self.check_expr(cond);
                if cond_ty != self.known.bool_ {
                    self.error(span.line, "Predicate of 'if' does not have type Bool.".to_string());
                }
                let then_ty = self.check_expr(then_branch);
                let else_ty = self.check_expr(else_branch);
                self.hierarchy.lub(then_ty, else_ty, self.current_class)
            }
            ExprKind::While { cond, body } => {
                let cond_ty = self.check_expr(cond);
                if cond_ty != self.known.bool_ {
                    self.error(span.line, "Loop condition does not have type Bool".to_string());
                }
                self.check_expr(body);
                self.known.object
            }
            ExprKind::Block(exprs) => {
                let mut last = self.known.object;
                for e in exprs.iter_mut() {
                    last = self.check_expr(e);
                }
                last
            }
            ExprKind::Let { name, declared_type, init, body } => {
                let (name, declared_type) = (*name, *declared_type);
                self.check_type_defined(declared_type, span.line);
                if let Some(init) = init {
                    let init_ty = self.check_expr(init);
                    if !self.hierarchy.is_subtype(init_ty, declared_type, self.current_class) {
                        self.error(
                            span.line,
                            format!(
                                "Inferred type {} of initialization of {} does not conform to identifier's declared type {}.",
                                self.name(init_ty),
                                self.name(name),
                                self.name(declared_type)
                            ),
                        );
                    }
                }
                self.table.enter_scope();
                self.table
                    .add_id(name, Binding::variable(declared_type));
                let body_ty = self.check_expr(body);
                self.table.exit_scope();
                body_ty
            }
            ExprKind::Case { scrutinee, branches } => {
                self.check_expr(scrutinee);
                let mut branch_types = Vec::new();
                for branch in branches.iter_mut() {
                    self.check_type_defined(branch.declared_type, branch.span.line);
                    self.table.enter_scope();
                    self.table
                        .add_id(branch.name, Binding::variable(branch.declared_type));
                    branch_types.push(self.check_expr(&mut branch.body));
                    self.table.exit_scope();
                }
                self.hierarchy.lub_list(&branch_types, self.current_class)
            }
            ExprKind::New(class) => {
                let class = *class;
                if class == self.known.self_type {
                    self.known.self_type
                } else if self.hierarchy.find(class).is_none() {
                    self.error(
                        span.line,
                        format!("'new' used with undefined class {}.", self.name(class)),
                    );
                    self.known.object
                } else {
                    class
                }
            }
            ExprKind::IsVoid(operand) => {
                self.check_expr(operand);
                self.known.bool_
            }
            ExprKind::BinOp { op, lhs, rhs } => {
                let op = *op;
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                self.check_binop(span.line, op, lhs_ty, rhs_ty)
            }
            ExprKind::Neg(operand) => {
                let operand_ty = self.check_expr(operand);
                if operand_ty != self.known.int {
                    self.error(
                        span.line,
                        format!("Argument of '~' has type {} instead of Int.", self.name(operand_ty)),
                    );
                }
                self.known.int
            }
            ExprKind::Not(operand) => {
                let operand_ty = self.check_expr(operand);
                if operand_ty != self.known.bool_ {
                    self.error(
                        span.line,
                        format!("Argument of 'not' has type {} instead of Bool", self.name(operand_ty)),
                    );
                }
                self.known.bool_
            }
        };
        expr.ty = Some(ty);
        ty
    }

    /// `self` types as SELF_TYPE; everything else takes the type its
    /// binding recorded, falling back to the current class's feature
    /// chain for same-class forward references.
    fn check_ident(&mut self, name: Symbol) -> Symbol {
        if name == self.known.self_ {
            return self.known.self_type;
        }
        if let Some(binding) = self.table.lookup(name) {
            if let Some(ty) = binding.ty {
                return ty;
            }
        }
        if let Some(ty) = self.hierarchy.attribute_on(self.current_class, name) {
            return ty;
        }
        if let Some(sig) = self.hierarchy.method_on(self.current_class, name) {
            return sig.return_type;
        }
        // Unreachable after a clean referential pass
        self.known.object
    }

    /// Actual arguments get a frame of their own, as in the scope pass
    fn check_args(&mut self, args: &mut [Expr]) -> Vec<Symbol> {
        self.table.enter_scope();
        let types = args.iter_mut().map(|arg| self.check_expr(arg)).collect();
        self.table.exit_scope();
        types
    }

    /// Find the method the call binds to. A SELF_TYPE receiver resolves
    /// against the current class, preferring a signature the scope stack
    /// already holds; a static target overrides the receiver's type.
    fn resolve_method_sig(
        &self,
        receiver_ty: Symbol,
        static_target: Option<Symbol>,
        method: Symbol,
    ) -> Option<MethodSig> {
        if let Some(target) = static_target {
            return self.hierarchy.method_on(target, method).cloned();
        }
        let receiver = if receiver_ty == self.known.self_type {
            if let Some(binding) = self.table.lookup(method) {
                if binding.kind == BindingKind::Method {
                    if let Some(sig) = &binding.sig {
                        return Some(sig.clone());
                    }
                }
            }
            self.current_class
        } else {
            receiver_ty
        };
        self.hierarchy.method_on(receiver, method).cloned()
    }

    fn check_dispatch(
        &mut self,
        line: u32,
        receiver_ty: Symbol,
        static_target: Option<Symbol>,
        method: Symbol,
        arg_types: &[Symbol],
    ) -> Symbol {
        let Some(sig) = self.resolve_method_sig(receiver_ty, static_target, method) else {
            self.error(line, format!("Dispatch to undefined method {}.", self.name(method)));
            return self.known.object;
        };
        if sig.formals.len() != arg_types.len() {
            self.error(
                line,
                format!("Method {} called with wrong number of arguments.", self.name(method)),
            );
            return self.known.object;
        }
        for (formal, &actual) in sig.formals.iter().zip(arg_types) {
            if !self.hierarchy.is_subtype(actual, formal.declared_type, self.current_class) {
                self.error(
                    line,
                    format!(
                        "In call of method {}, type {} of parameter {} does not conform to declared type {}.",
                        self.name(method),
                        self.name(actual),
                        self.name(formal.name),
                        self.name(formal.declared_type)
                    ),
                );
            }
        }
        if sig.return_type == self.known.self_type {
            receiver_ty
        } else {
            sig.return_type
        }
    }

    fn check_binop(&mut self, line: u32, op: BinOp, lhs: Symbol, rhs: Symbol) -> Symbol {
        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                if lhs != self.known.int || rhs != self.known.int {
                    self.error(
                        line,
                        format!("non-Int arguments: {} {} {}", self.name(lhs), op, self.name(rhs)),
                    );
                }
                self.known.int
            }
            BinOp::Lt | BinOp::Le => {
                if lhs != self.known.int || rhs != self.known.int {
                    self.error(
                        line,
                        format!("non-Int arguments: {} {} {}", self.name(lhs), op, self.name(rhs)),
                    );
                }
                self.known.bool_
            }
            BinOp::Eq => {
                // Value classes compare only with themselves
                if (self.known.is_value_type(lhs) || self.known.is_value_type(rhs)) && lhs != rhs {
                    self.error(line, "Illegal comparison with a basic type".to_string());
                }
                self.known.bool_
            }
        }
    }

    /// Declared types must name a class; SELF_TYPE always qualifies
    fn check_type_defined(&mut self, ty: Symbol, line: u32) {
        if ty != self.known.self_type && self.hierarchy.find(ty).is_none() {
            self.error(line, format!("Class {} is undefined.", self.name(ty)));
        }
    }

    fn error(&mut self, line: u32, message: String) {
        self.diagnostics.error(self.current_file, line, message);
    }

    fn name(&self, symbol: Symbol) -> &'a str {
        self.interner.resolve(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;
    use crate::semant::analyze;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> (usize, Vec<String>) {
        let (_program, _interner, errors, messages) = analyze_program(source);
        (errors, messages)
    }

    fn analyze_program(source: &str) -> (Program, Interner, usize, Vec<String>) {
        let mut interner = Interner::new();
        let lexer = Lexer::new(source, 0);
        let mut parser = Parser::new(lexer, &mut interner, "test.cl");
        let mut program = parser.parse_program().expect("parse failed");
        let analysis = analyze(&mut program, &mut interner);
        let messages: Vec<String> = analysis
            .diagnostics
            .records()
            .iter()
            .map(|d| d.message.clone())
            .collect();
        let errors = analysis.diagnostics.error_count();
        (program, interner, errors, messages)
    }

    /// Body expression of Main.main in an analyzed program
    fn main_body<'a>(program: &'a Program, interner: &mut Interner) -> &'a Expr {
        let main_class = interner.intern("Main");
        let main_method = interner.intern("main");
        let class = program
            .classes
            .iter()
            .find(|c| c.name == main_class)
            .expect("no Main class");
        for feature in &class.features {
            if let Feature::Method(m) = feature {
                if m.name == main_method {
                    return &m.body;
                }
            }
        }
        panic!("no main method");
    }

    #[test]
    fn test_arithmetic_types_to_int() {
        let (program, mut interner, errors, _) =
            analyze_program("class Main { main() : Int { 1 + 2 * 3 }; };");
        assert_eq!(errors, 0);
        let body = main_body(&program, &mut interner);
        assert_eq!(body.ty, Some(interner.intern("Int")));
    }

    #[test]
    fn test_arithmetic_rejects_non_int_and_recovers() {
        // The sum still types as Int, so the only error is the operand one
        let (errors, messages) = run("class Main { main() : Int { 1 + \"s\" }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "non-Int arguments: Int + String");
    }

    #[test]
    fn test_isvoid_operand_makes_product_non_int() {
        // isvoid binds tighter than `*`, so the Bool lands in the product
        let (errors, messages) =
            run("class Main { x : Int; main() : Object { isvoid x * 3 }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "non-Int arguments: Bool * Int");
    }

    #[test]
    fn test_comparison_yields_bool() {
        let (errors, _) = run("class Main { main() : Bool { 1 < 2 }; };");
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_comparison_rejects_non_int() {
        let (errors, messages) = run("class Main { main() : Bool { 1 <= \"a\" }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "non-Int arguments: Int <= String");
    }

    #[test]
    fn test_equality_value_types_must_match() {
        let (errors, messages) = run("class Main { main() : Bool { 1 = \"s\" }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Illegal comparison with a basic type");
    }

    #[test]
    fn test_equality_between_objects_is_free() {
        let (errors, _) = run(
            "class A { x : Int; }; \
             class B { y : Int; }; \
             class Main { main() : Bool { (new A) = (new B) }; };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_if_predicate_must_be_bool() {
        let (errors, messages) =
            run("class Main { main() : Int { if 1 then 2 else 3 fi }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Predicate of 'if' does not have type Bool.");
    }

    #[test]
    fn test_if_result_is_lub_of_branches() {
        let (errors, _) = run(
            "class A { x : Int; }; \
             class B inherits A { y : Int; }; \
             class C inherits A { z : Int; }; \
             class Main { \
               p : Bool; \
               main() : A { if p then new B else new C fi }; \
             };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_while_takes_object_type() {
        let (program, mut interner, errors, _) =
            analyze_program("class Main { main() : Object { while false loop 1 pool }; };");
        assert_eq!(errors, 0);
        let body = main_body(&program, &mut interner);
        assert_eq!(body.ty, Some(interner.intern("Object")));
    }

    #[test]
    fn test_while_condition_must_be_bool() {
        let (errors, messages) =
            run("class Main { main() : Object { while 1 loop 2 pool }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Loop condition does not have type Bool");
    }

    #[test]
    fn test_block_takes_last_type() {
        let (program, mut interner, errors, _) =
            analyze_program("class Main { main() : Int { { \"side\"; 42; } }; };");
        assert_eq!(errors, 0);
        let body = main_body(&program, &mut interner);
        assert_eq!(body.ty, Some(interner.intern("Int")));
    }

    #[test]
    fn test_let_init_must_conform() {
        let (errors, messages) =
            run("class Main { main() : Int { let x : Int <- \"s\" in x }; };");
        assert_eq!(errors, 1);
        assert_eq!(
            messages[0],
            "Inferred type String of initialization of x does not conform to identifier's declared type Int."
        );
    }

    #[test]
    fn test_case_result_is_lub_of_branches() {
        let (program, mut interner, errors, _) = analyze_program(
            "class Main { \
               main() : Object { \
                 case 1 of \
                   n : Int => 2; \
                   s : String => \"x\"; \
                 esac \
               }; \
             };",
        );
        assert_eq!(errors, 0);
        let body = main_body(&program, &mut interner);
        assert_eq!(body.ty, Some(interner.intern("Object")));
    }

    #[test]
    fn test_new_self_type_conforms_to_self_type_return() {
        let (errors, _) = run(
            "class A { dup() : SELF_TYPE { new SELF_TYPE }; }; \
             class Main { main() : Object { (new A).dup() }; };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_self_type_return_takes_receiver_type() {
        let (program, mut interner, errors, _) = analyze_program(
            "class A { s() : SELF_TYPE { self }; }; \
             class B inherits A { x : Int; }; \
             class Main { main() : B { (new B).s() }; };",
        );
        assert_eq!(errors, 0);
        let body = main_body(&program, &mut interner);
        assert_eq!(body.ty, Some(interner.intern("B")));
    }

    #[test]
    fn test_self_body_conforms_to_concrete_return() {
        let (errors, _) = run(
            "class A { me() : A { self }; }; \
             class Main { main() : Object { (new A).me() }; };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_dispatch_wrong_arg_count_is_one_error() {
        let (errors, messages) = run(
            "class Main { \
               f(x : Int) : Int { x }; \
               main() : Object { f(1, 2) }; \
             };",
        );
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Method f called with wrong number of arguments.");
    }

    #[test]
    fn test_dispatch_argument_must_conform() {
        let (errors, messages) = run(
            "class Main { \
               f(x : Int) : Int { x }; \
               main() : Int { f(\"s\") }; \
             };",
        );
        assert_eq!(errors, 1);
        assert_eq!(
            messages[0],
            "In call of method f, type String of parameter x does not conform to declared type Int."
        );
    }

    #[test]
    fn test_dispatch_subtype_argument_is_fine() {
        let (errors, _) = run(
            "class A { x : Int; }; \
             class B inherits A { y : Int; }; \
             class Main { \
               f(a : A) : A { a }; \
               main() : A { f(new B) }; \
             };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_dispatch_on_receiver_without_method() {
        let (errors, messages) =
            run("class Main { main() : Object { (new Main).missing() }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Dispatch to undefined method missing.");
    }

    #[test]
    fn test_attribute_posing_as_method_is_caught_here() {
        // The referential pass accepts the name because the class does
        // declare it; binding it as a call only fails now.
        let (errors, messages) = run(
            "class Main { \
               f : Int; \
               main() : Object { f() }; \
             };",
        );
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Dispatch to undefined method f.");
    }

    #[test]
    fn test_static_dispatch_receiver_must_conform() {
        let (errors, messages) = run(
            "class A { f() : Int { 1 }; }; \
             class Main { main() : Int { (new Main)@A.f() }; };",
        );
        assert_eq!(errors, 1);
        assert_eq!(
            messages[0],
            "Expression type Main does not conform to declared static dispatch type A."
        );
    }

    #[test]
    fn test_static_dispatch_picks_the_named_ancestor() {
        let (errors, _) = run(
            "class A { f() : Int { 1 }; }; \
             class B inherits A { f() : Int { 2 }; }; \
             class Main { main() : Int { (new B)@A.f() }; };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_attribute_init_must_conform() {
        let (errors, messages) = run(
            "class Main { x : Int <- \"s\"; main() : Int { x }; };",
        );
        assert_eq!(errors, 1);
        assert_eq!(
            messages[0],
            "Inferred type String of initialization of attribute x does not conform to declared type Int."
        );
    }

    #[test]
    fn test_attribute_init_subtype_is_fine() {
        let (errors, _) = run(
            "class A { x : Int; }; \
             class B inherits A { y : Int; }; \
             class Main { a : A <- new B; main() : A { a }; };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_redefining_inherited_attribute() {
        let (errors, messages) = run(
            "class A { x : Int; }; \
             class B inherits A { x : Int; }; \
             class Main { main() : Int { 0 }; };",
        );
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Attribute x is an attribute of an inherited class.");
    }

    #[test]
    fn test_duplicate_formals_skip_the_body() {
        // The body's type mismatch must not be reported
        let (errors, messages) = run(
            "class Main { \
               f(a : Int, a : Int) : Int { \"s\" }; \
               main() : Int { 0 }; \
             };",
        );
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Formal parameter a is multiply defined.");
    }

    #[test]
    fn test_undefined_declared_type_reported_once() {
        let (errors, messages) = run(
            "class Main { x : Ghost; main() : Object { x }; };",
        );
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Class Ghost is undefined.");
    }

    #[test]
    fn test_new_with_undefined_class() {
        let (errors, messages) =
            run("class Main { main() : Object { new Ghost }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "'new' used with undefined class Ghost.");
    }

    #[test]
    fn test_assignment_result_is_declared_type() {
        let (program, mut interner, errors, _) = analyze_program(
            "class A { x : Int; }; \
             class B inherits A { y : Int; }; \
             class Main { a : A; main() : A { a <- new B }; };",
        );
        assert_eq!(errors, 0);
        let body = main_body(&program, &mut interner);
        assert_eq!(body.ty, Some(interner.intern("A")));
    }

    #[test]
    fn test_assignment_must_conform() {
        let (errors, messages) = run(
            "class Main { i : Int; main() : Object { i <- \"s\" }; };",
        );
        assert_eq!(errors, 1);
        assert_eq!(
            messages[0],
            "Type String of assigned expression does not conform to declared type Int of identifier i."
        );
    }

    #[test]
    fn test_neg_requires_int() {
        let (errors, messages) = run("class Main { main() : Int { ~true }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Argument of '~' has type Bool instead of Int.");
    }

    #[test]
    fn test_not_requires_bool() {
        let (errors, messages) = run("class Main { main() : Bool { not 1 }; };");
        assert_eq!(errors, 1);
        assert_eq!(messages[0], "Argument of 'not' has type Int instead of Bool");
    }

    #[test]
    fn test_isvoid_takes_any_operand() {
        let (errors, _) = run(
            "class A { x : Int; }; \
             class Main { main() : Bool { isvoid (new A) }; };",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_method_body_must_conform_to_return_type() {
        let (errors, messages) = run(
            "class Main { f() : Int { \"s\" }; main() : Int { 0 }; };",
        );
        assert_eq!(errors, 1);
        assert_eq!(
            messages[0],
            "Inferred return type String of method f does not conform to declared return type Int."
        );
    }

    #[test]
    fn test_string_builtins_chain() {
        let (program, mut interner, errors, _) = analyze_program(
            "class Main { main() : Int { \"a\".concat(\"b\").length() }; };",
        );
        assert_eq!(errors, 0);
        let body = main_body(&program, &mut interner);
        assert_eq!(body.ty, Some(interner.intern("Int")));
    }

    #[test]
    fn test_io_builtin_argument_mismatch() {
        let (errors, messages) = run(
            "class Main inherits IO { main() : SELF_TYPE { out_string(1) }; };",
        );
        assert_eq!(errors, 1);
        assert_eq!(
            messages[0],
            "In call of method out_string, type Int of parameter arg does not conform to declared type String."
        );
    }

    #[test]
    fn test_substr_signature() {
        let (errors, _) = run(
            "class Main { main() : String { \"hello\".substr(1, 3) }; };",
        );
        assert_eq!(errors, 0);
    }
}
