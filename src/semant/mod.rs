//! Semantic analysis for Cool programs
//!
//! Analysis runs as three phases with a gate between each:
//!
//! 1. hierarchy construction: class table, inheritance tree, preorder
//!    tags, and every structural error (duplicates, bad parents, cycles)
//! 2. program checks and the scope pass: the `Main` requirement plus a
//!    referential walk over every expression
//! 3. the type pass: type rules proper, annotating every expression with
//!    its static type
//!
//! A phase only runs when everything before it was clean, so the type
//! pass can assume every name it meets resolves somewhere. Within a
//! phase, errors are recorded and the walk continues, to surface as many
//! findings in one run as possible.

pub mod diagnostics;
pub mod hierarchy;
pub mod scope_check;
pub mod symbol_table;
pub mod type_check;

pub use diagnostics::Diagnostics;
pub use hierarchy::{ClassHierarchy, ClassId, MethodSig};
pub use symbol_table::SymbolTable;

use crate::frontend::ast::{Feature, Program};
use crate::frontend::intern::{Interner, Symbol};
use hierarchy::FeatureSig;
use log::debug;

/// Names both passes reach for constantly, interned once up front
#[derive(Debug, Clone, Copy)]
pub struct WellKnown {
    // Built-in classes
    pub object: Symbol,
    pub io: Symbol,
    pub int: Symbol,
    pub bool_: Symbol,
    pub string: Symbol,
    // Special type and identifier
    pub self_type: Symbol,
    pub self_: Symbol,
    // Program entry point
    pub main_class: Symbol,
    pub main_method: Symbol,
    // Built-in feature names
    pub abort: Symbol,
    pub type_name: Symbol,
    pub copy: Symbol,
    pub out_string: Symbol,
    pub out_int: Symbol,
    pub in_string: Symbol,
    pub in_int: Symbol,
    pub length: Symbol,
    pub concat: Symbol,
    pub substr: Symbol,
    // Formal names for the synthesized built-in signatures
    pub arg: Symbol,
    pub arg2: Symbol,
    /// Filename attributed to built-in declarations
    pub basic_file: Symbol,
}

impl WellKnown {
    pub fn new(interner: &mut Interner) -> Self {
        Self {
            object: interner.intern("Object"),
            io: interner.intern("IO"),
            int: interner.intern("Int"),
            bool_: interner.intern("Bool"),
            string: interner.intern("String"),
            self_type: interner.intern("SELF_TYPE"),
            self_: interner.intern("self"),
            main_class: interner.intern("Main"),
            main_method: interner.intern("main"),
            abort: interner.intern("abort"),
            type_name: interner.intern("type_name"),
            copy: interner.intern("copy"),
            out_string: interner.intern("out_string"),
            out_int: interner.intern("out_int"),
            in_string: interner.intern("in_string"),
            in_int: interner.intern("in_int"),
            length: interner.intern("length"),
            concat: interner.intern("concat"),
            substr: interner.intern("substr"),
            arg: interner.intern("arg"),
            arg2: interner.intern("arg2"),
            basic_file: interner.intern("<basic class>"),
        }
    }

    /// One of the five installed classes
    pub fn is_basic_class(&self, name: Symbol) -> bool {
        name == self.object
            || name == self.io
            || name == self.int
            || name == self.bool_
            || name == self.string
    }

    /// Int, Bool and String: closed under inheritance and compared by value
    pub fn is_value_type(&self, name: Symbol) -> bool {
        name == self.int || name == self.bool_ || name == self.string
    }
}

/// What a scope frame records about a name
#[derive(Debug, Clone)]
pub struct Binding {
    /// Declared type for variables, return type for methods
    pub ty: Option<Symbol>,
    pub kind: BindingKind,
    /// Full signature, methods only
    pub sig: Option<MethodSig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Variable,
    Method,
    Class,
}

impl Binding {
    pub fn variable(ty: Symbol) -> Self {
        Self {
            ty: Some(ty),
            kind: BindingKind::Variable,
            sig: None,
        }
    }

    pub fn method(sig: MethodSig) -> Self {
        Self {
            ty: Some(sig.return_type),
            kind: BindingKind::Method,
            sig: Some(sig),
        }
    }

    pub fn class(name: Symbol) -> Self {
        Self {
            ty: Some(name),
            kind: BindingKind::Class,
            sig: None,
        }
    }
}

/// Push one frame per ancestor of `class_id`, root outermost, populated
/// with the inherited feature bindings, then an empty frame for the class
/// itself. Returns how many frames to pop when the class is done.
pub(crate) fn push_class_scopes(
    table: &mut SymbolTable<Binding>,
    hierarchy: &ClassHierarchy,
    class_id: ClassId,
) -> usize {
    let ancestors = hierarchy.ancestors_root_first(class_id);
    for &ancestor in &ancestors {
        table.enter_scope();
        for feature in &hierarchy.node(ancestor).features {
            match feature {
                FeatureSig::Attribute { name, declared_type } => {
                    table.add_id(*name, Binding::variable(*declared_type));
                }
                FeatureSig::Method(sig) => {
                    table.add_id(sig.name, Binding::method(sig.clone()));
                }
            }
        }
    }
    table.enter_scope();
    ancestors.len() + 1
}

pub(crate) fn pop_scopes(table: &mut SymbolTable<Binding>, frames: usize) {
    for _ in 0..frames {
        table.exit_scope();
    }
}

/// Everything analysis produces: the class tree (with dispatch tables'
/// worth of signatures and tag ranges) and the findings.
pub struct Analysis {
    pub hierarchy: ClassHierarchy,
    pub diagnostics: Diagnostics,
}

/// Run the full analysis over a parsed program. The AST comes back with
/// every expression annotated when the run is clean.
pub fn analyze(program: &mut Program, interner: &mut Interner) -> Analysis {
    let known = WellKnown::new(interner);
    let mut diagnostics = Diagnostics::new();

    let hierarchy = ClassHierarchy::build(program, &known, interner, &mut diagnostics);
    if !diagnostics.is_clean() {
        debug!("stopping after hierarchy construction");
        return Analysis { hierarchy, diagnostics };
    }

    check_main(program, &known, &mut diagnostics);
    scope_check::ScopeChecker::new(&hierarchy, &known, interner, &mut diagnostics).run(program);
    if !diagnostics.is_clean() {
        debug!("stopping after scope checking");
        return Analysis { hierarchy, diagnostics };
    }

    type_check::TypeChecker::new(&hierarchy, &known, interner, &mut diagnostics).run(program);
    Analysis { hierarchy, diagnostics }
}

/// The program must define a class Main carrying its own main method
fn check_main(program: &Program, known: &WellKnown, diagnostics: &mut Diagnostics) {
    let Some(file) = program.classes.first().map(|c| c.filename) else {
        return;
    };
    match program.classes.iter().find(|c| c.name == known.main_class) {
        None => diagnostics.error(file, 0, "Class Main is not defined"),
        Some(main) => {
            let has_main = main
                .features
                .iter()
                .any(|f| matches!(f, Feature::Method(m) if m.name == known.main_method));
            if !has_main {
                diagnostics.error(main.filename, main.span.line, "No 'main' method in class Main");
            }
        }
    }
}
