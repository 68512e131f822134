//! The class inheritance graph
//!
//! Classes live in an arena indexed by `ClassId`. Construction installs
//! the built-in classes first, then attaches user classes in program
//! order, recording an error for every structural problem it finds:
//! duplicate names, redefinition of built-ins, inheriting from a value
//! class, undefined parents and inheritance cycles. The result is always
//! a usable tree; classes that could not be attached stay detached and
//! the caller stops after this phase if anything was reported.
//!
//! A preorder walk stamps every attached class with an entry tag and the
//! largest tag of its subtree, so the subtype test is two comparisons.

use crate::frontend::ast::{Feature, Program};
use crate::frontend::intern::{Interner, Symbol};
use crate::semant::diagnostics::Diagnostics;
use crate::semant::WellKnown;
use log::debug;
use std::collections::HashMap;

/// Handle for a class in the hierarchy arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

impl ClassId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Signature of one formal parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalSig {
    pub name: Symbol,
    pub declared_type: Symbol,
}

/// Method signature as dispatch resolution sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    pub name: Symbol,
    pub formals: Vec<FormalSig>,
    pub return_type: Symbol,
}

/// A feature signature, detached from any expression body
#[derive(Debug, Clone)]
pub enum FeatureSig {
    Attribute { name: Symbol, declared_type: Symbol },
    Method(MethodSig),
}

impl FeatureSig {
    pub fn name(&self) -> Symbol {
        match self {
            FeatureSig::Attribute { name, .. } => *name,
            FeatureSig::Method(sig) => sig.name,
        }
    }
}

/// One arena node
#[derive(Debug)]
pub struct HierarchyNode {
    pub name: Symbol,
    pub parent: Option<ClassId>,
    pub children: Vec<ClassId>,
    pub features: Vec<FeatureSig>,
    /// File and line of the declaration, for diagnostics
    pub file: Symbol,
    pub line: u32,
    /// Preorder entry tag
    pub tag: u32,
    /// Largest tag inside this node's subtree; equals `tag` for leaves
    pub max_subtree_tag: u32,
}

/// Attachment state used while resolving declared parents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attach {
    Pending,
    Visiting,
    Done,
    Broken,
}

pub struct ClassHierarchy {
    nodes: Vec<HierarchyNode>,
    by_name: HashMap<Symbol, ClassId>,
    root: ClassId,
    known: WellKnown,
}

impl ClassHierarchy {
    /// Build the hierarchy for a program. Every structural problem is
    /// recorded in `diagnostics`; the returned tree is always usable for
    /// the classes that did attach.
    pub fn build(
        program: &Program,
        known: &WellKnown,
        interner: &Interner,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut hierarchy = Self {
            nodes: Vec::new(),
            by_name: HashMap::new(),
            root: ClassId(0),
            known: *known,
        };
        hierarchy.install_basic_classes(known);

        // Reject duplicates up front; survivors enter the arena detached,
        // with their declared parent remembered for the resolution walk.
        let mut state = vec![Attach::Done; hierarchy.nodes.len()];
        let mut declared = vec![known.object; hierarchy.nodes.len()];
        let mut user_classes = Vec::new();
        for class in &program.classes {
            if hierarchy.by_name.contains_key(&class.name) {
                let message = if known.is_basic_class(class.name) {
                    format!("Redefinition of basic class {}.", interner.resolve(class.name))
                } else {
                    format!("Class {} was previously defined.", interner.resolve(class.name))
                };
                diagnostics.error(class.filename, class.span.line, message);
                continue;
            }
            let id = hierarchy.push_node(
                class.name,
                class.filename,
                class.span.line,
                class.features.iter().map(signature_of).collect(),
            );
            state.push(Attach::Pending);
            declared.push(class.parent.unwrap_or(known.object));
            user_classes.push(id);
        }

        for id in user_classes {
            hierarchy.resolve_attachment(id, &mut state, &declared, known, interner, diagnostics);
        }
        hierarchy.assign_tags();

        debug!(
            "hierarchy built: {} classes, {} errors",
            hierarchy.nodes.len(),
            diagnostics.error_count()
        );
        hierarchy
    }

    fn push_node(
        &mut self,
        name: Symbol,
        file: Symbol,
        line: u32,
        features: Vec<FeatureSig>,
    ) -> ClassId {
        let id = ClassId(self.nodes.len() as u32);
        self.nodes.push(HierarchyNode {
            name,
            parent: None,
            children: Vec::new(),
            features,
            file,
            line,
            tag: 0,
            max_subtree_tag: 0,
        });
        self.by_name.insert(name, id);
        id
    }

    /// The built-in classes, installed before any user class so that the
    /// root exists when attachment starts. Order fixes their tag ranges.
    fn install_basic_classes(&mut self, known: &WellKnown) {
        let object = self.push_node(
            known.object,
            known.basic_file,
            0,
            vec![
                method_sig(known.abort, vec![], known.object),
                method_sig(known.type_name, vec![], known.string),
                method_sig(known.copy, vec![], known.self_type),
            ],
        );
        self.root = object;

        let basics = [
            (
                known.io,
                vec![
                    method_sig(known.out_string, vec![(known.arg, known.string)], known.self_type),
                    method_sig(known.out_int, vec![(known.arg, known.int)], known.self_type),
                    method_sig(known.in_string, vec![], known.string),
                    method_sig(known.in_int, vec![], known.int),
                ],
            ),
            (known.int, vec![]),
            (known.bool_, vec![]),
            (
                known.string,
                vec![
                    method_sig(known.length, vec![], known.int),
                    method_sig(known.concat, vec![(known.arg, known.string)], known.string),
                    method_sig(
                        known.substr,
                        vec![(known.arg, known.int), (known.arg2, known.int)],
                        known.string,
                    ),
                ],
            ),
        ];
        for (name, features) in basics {
            let id = self.push_node(name, known.basic_file, 0, features);
            self.nodes[id.index()].parent = Some(object);
            self.nodes[object.index()].children.push(id);
        }
    }

    /// Walk the declared-parent chain from `start` until it reaches an
    /// attached class, closes a cycle, or falls off the known world, then
    /// attach or condemn everything on the walked path.
    fn resolve_attachment(
        &mut self,
        start: ClassId,
        state: &mut [Attach],
        declared: &[Symbol],
        known: &WellKnown,
        interner: &Interner,
        diagnostics: &mut Diagnostics,
    ) {
        if state[start.index()] != Attach::Pending {
            return;
        }
        let mut path = Vec::new();
        let mut cur = start;
        loop {
            match state[cur.index()] {
                Attach::Done => {
                    self.attach_path(&path, cur, state);
                    return;
                }
                Attach::Broken | Attach::Visiting => {
                    // A cycle, or a chain resting on one
                    self.break_path(&path, state, interner, diagnostics);
                    return;
                }
                Attach::Pending => {
                    state[cur.index()] = Attach::Visiting;
                    path.push(cur);
                    let parent_name = declared[cur.index()];
                    if known.is_value_type(parent_name) {
                        let node = &self.nodes[cur.index()];
                        diagnostics.error(
                            node.file,
                            node.line,
                            format!(
                                "Class {} cannot inherit class {}",
                                interner.resolve(node.name),
                                interner.resolve(parent_name)
                            ),
                        );
                        // Keep the class usable by attaching it under the root
                        cur = self.root;
                        continue;
                    }
                    match self.by_name.get(&parent_name).copied() {
                        Some(parent_id) => cur = parent_id,
                        None => {
                            self.break_path(&path, state, interner, diagnostics);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Attach the walked path back to front under `anchor`
    fn attach_path(&mut self, path: &[ClassId], anchor: ClassId, state: &mut [Attach]) {
        let mut parent = anchor;
        for &id in path.iter().rev() {
            self.nodes[id.index()].parent = Some(parent);
            self.nodes[parent.index()].children.push(id);
            state[id.index()] = Attach::Done;
            parent = id;
        }
    }

    /// Condemn every class on the walked path with its own cycle report
    fn break_path(
        &self,
        path: &[ClassId],
        state: &mut [Attach],
        interner: &Interner,
        diagnostics: &mut Diagnostics,
    ) {
        for &id in path {
            state[id.index()] = Attach::Broken;
            let node = &self.nodes[id.index()];
            let name = interner.resolve(node.name);
            diagnostics.error(
                node.file,
                node.line,
                format!(
                    "Class {}, or an ancestor of {}, is involved in an inheritance cycle.",
                    name, name
                ),
            );
        }
    }

    /// Preorder tag walk from the root. Detached classes keep tag zero;
    /// they are never queried because construction errors gate the run.
    fn assign_tags(&mut self) {
        fn walk(nodes: &mut [HierarchyNode], id: ClassId, next: &mut u32) -> u32 {
            let tag = *next;
            *next += 1;
            nodes[id.index()].tag = tag;
            let children = nodes[id.index()].children.clone();
            let mut max = tag;
            for child in children {
                max = max.max(walk(nodes, child, next));
            }
            nodes[id.index()].max_subtree_tag = max;
            max
        }
        let mut next = 0;
        walk(&mut self.nodes, self.root, &mut next);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn find(&self, name: Symbol) -> Option<ClassId> {
        self.by_name.get(&name).copied()
    }

    pub fn node(&self, id: ClassId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    pub fn root(&self) -> ClassId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All classes in the arena, built-ins included
    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.nodes.len() as u32).map(ClassId)
    }

    fn substitute(&self, ty: Symbol, current_class: Symbol) -> Symbol {
        if ty == self.known.self_type {
            current_class
        } else {
            ty
        }
    }

    /// Does `a` conform to `b`? SELF_TYPE operands are resolved against
    /// the class under analysis before comparing. Unknown names conform;
    /// they were already reported where they were declared.
    pub fn is_subtype(&self, a: Symbol, b: Symbol, current_class: Symbol) -> bool {
        let a = self.substitute(a, current_class);
        let b = self.substitute(b, current_class);
        if b == self.known.object {
            return true;
        }
        let (Some(na), Some(nb)) = (self.find(a), self.find(b)) else {
            return true;
        };
        let tag = self.nodes[na.index()].tag;
        let anchor = &self.nodes[nb.index()];
        anchor.tag <= tag && tag <= anchor.max_subtree_tag
    }

    /// Least upper bound of two types: the deepest class on both
    /// root paths. Unknown operands resolve to the root.
    pub fn lub(&self, a: Symbol, b: Symbol, current_class: Symbol) -> Symbol {
        let a = self.substitute(a, current_class);
        let b = self.substitute(b, current_class);
        if a == b {
            return a;
        }
        let (Some(na), Some(nb)) = (self.find(a), self.find(b)) else {
            return self.known.object;
        };
        let path_a = self.path_from_root(na);
        let path_b = self.path_from_root(nb);
        let mut deepest = self.root;
        for (x, y) in path_a.iter().zip(path_b.iter()) {
            if x == y {
                deepest = *x;
            } else {
                break;
            }
        }
        self.nodes[deepest.index()].name
    }

    /// Fold [`lub`] over a non-empty list, as `case` result typing needs
    pub fn lub_list(&self, types: &[Symbol], current_class: Symbol) -> Symbol {
        let mut iter = types.iter();
        let Some(&first) = iter.next() else {
            return self.known.object;
        };
        let mut acc = self.substitute(first, current_class);
        for &ty in iter {
            acc = self.lub(acc, ty, current_class);
        }
        acc
    }

    fn path_from_root(&self, id: ClassId) -> Vec<ClassId> {
        let mut path = vec![id];
        let mut cur = id;
        while let Some(parent) = self.nodes[cur.index()].parent {
            path.push(parent);
            cur = parent;
        }
        path.reverse();
        path
    }

    /// Ancestors of `id` ordered root first, the class itself excluded
    pub fn ancestors_root_first(&self, id: ClassId) -> Vec<ClassId> {
        let mut path = Vec::new();
        let mut cur = self.nodes[id.index()].parent;
        while let Some(parent) = cur {
            path.push(parent);
            cur = self.nodes[parent.index()].parent;
        }
        path.reverse();
        path
    }

    /// Is `name` a feature of `class` or any of its ancestors?
    pub fn search_feature(&self, class: Symbol, name: Symbol) -> bool {
        let Some(mut id) = self.find(class) else {
            return false;
        };
        loop {
            if self.nodes[id.index()].features.iter().any(|f| f.name() == name) {
                return true;
            }
            match self.nodes[id.index()].parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Same check restricted to the class's own feature list. This is
    /// what makes a forward reference within one class legal.
    pub fn feature_exists_on_class(&self, class: Symbol, name: Symbol) -> bool {
        self.find(class)
            .map(|id| self.nodes[id.index()].features.iter().any(|f| f.name() == name))
            .unwrap_or(false)
    }

    /// Nearest method signature up the ancestor chain; overrides win
    pub fn method_on(&self, class: Symbol, name: Symbol) -> Option<&MethodSig> {
        let mut id = self.find(class)?;
        loop {
            for feature in &self.nodes[id.index()].features {
                if let FeatureSig::Method(sig) = feature {
                    if sig.name == name {
                        return Some(sig);
                    }
                }
            }
            id = self.nodes[id.index()].parent?;
        }
    }

    /// Nearest attribute declaration up the ancestor chain
    pub fn attribute_on(&self, class: Symbol, name: Symbol) -> Option<Symbol> {
        let mut id = self.find(class)?;
        loop {
            for feature in &self.nodes[id.index()].features {
                if let FeatureSig::Attribute { name: attr, declared_type } = feature {
                    if *attr == name {
                        return Some(*declared_type);
                    }
                }
            }
            id = self.nodes[id.index()].parent?;
        }
    }
}

/// Detach a feature signature from its AST node
fn signature_of(feature: &Feature) -> FeatureSig {
    match feature {
        Feature::Attribute(attr) => FeatureSig::Attribute {
            name: attr.name,
            declared_type: attr.declared_type,
        },
        Feature::Method(method) => FeatureSig::Method(MethodSig {
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
        }),
    }
}

fn method_sig(name: Symbol, formals: Vec<(Symbol, Symbol)>, return_type: Symbol) -> FeatureSig {
    FeatureSig::Method(MethodSig {
        name,
        formals: formals
            .into_iter()
            .map(|(name, declared_type)| FormalSig { name, declared_type })
            .collect(),
        return_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::intern::Interner;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;

    fn build_from(source: &str) -> (ClassHierarchy, Diagnostics, Interner, WellKnown) {
        let mut interner = Interner::new();
        let known = WellKnown::new(&mut interner);
        let lexer = Lexer::new(source, 0);
        let mut parser = Parser::new(lexer, &mut interner, "test.cl");
        let program = parser.parse_program().expect("parse failed");
        let mut diagnostics = Diagnostics::new();
        let hierarchy = ClassHierarchy::build(&program, &known, &interner, &mut diagnostics);
        (hierarchy, diagnostics, interner, known)
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.records().iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_basic_classes_installed() {
        let (hierarchy, diagnostics, mut interner, known) =
            build_from("class Main { main() : Int { 0 }; };");
        assert!(diagnostics.is_clean());
        assert!(!hierarchy.is_empty());
        assert_eq!(hierarchy.len(), 6);
        for name in ["Object", "IO", "Int", "Bool", "String"] {
            let sym = interner.intern(name);
            assert!(hierarchy.find(sym).is_some(), "missing {}", name);
        }
        assert!(hierarchy.search_feature(known.string, known.substr));
        assert!(hierarchy.search_feature(known.io, known.copy));
    }

    #[test]
    fn test_subtype_reflexive_and_root() {
        let (hierarchy, _, mut interner, known) =
            build_from("class A { x : Int; }; class B inherits A { y : Int; };");
        let a = interner.intern("A");
        let b = interner.intern("B");
        assert!(hierarchy.is_subtype(a, a, known.object));
        assert!(hierarchy.is_subtype(b, a, known.object));
        assert!(hierarchy.is_subtype(b, known.object, known.object));
        assert!(!hierarchy.is_subtype(a, b, known.object));
        assert!(!hierarchy.is_subtype(known.object, a, known.object));
    }

    #[test]
    fn test_siblings_do_not_conform() {
        let (hierarchy, _, mut interner, known) =
            build_from("class A { x : Int; }; class B { y : Int; };");
        let a = interner.intern("A");
        let b = interner.intern("B");
        assert!(!hierarchy.is_subtype(a, b, known.object));
        assert!(!hierarchy.is_subtype(b, a, known.object));
    }

    #[test]
    fn test_self_type_substitution() {
        let (hierarchy, _, mut interner, known) =
            build_from("class A { x : Int; }; class B inherits A { y : Int; };");
        let a = interner.intern("A");
        let b = interner.intern("B");
        // Inside B, SELF_TYPE stands for B
        assert!(hierarchy.is_subtype(known.self_type, a, b));
        assert!(hierarchy.is_subtype(known.self_type, known.self_type, b));
        assert!(!hierarchy.is_subtype(a, known.self_type, b));
        assert_eq!(hierarchy.lub(known.self_type, a, b), a);
    }

    #[test]
    fn test_lub_commutative() {
        let (hierarchy, _, mut interner, known) = build_from(
            "class A { x : Int; }; \
             class B inherits A { y : Int; }; \
             class C inherits A { z : Int; };",
        );
        let a = interner.intern("A");
        let b = interner.intern("B");
        let c = interner.intern("C");
        assert_eq!(hierarchy.lub(b, c, known.object), a);
        assert_eq!(hierarchy.lub(c, b, known.object), a);
        assert_eq!(hierarchy.lub(b, a, known.object), a);
        assert_eq!(hierarchy.lub(b, known.int, known.object), known.object);
    }

    #[test]
    fn test_lub_list_folds_left() {
        let (hierarchy, _, mut interner, known) = build_from(
            "class A { x : Int; }; \
             class B inherits A { y : Int; }; \
             class C inherits B { z : Int; };",
        );
        let a = interner.intern("A");
        let b = interner.intern("B");
        let c = interner.intern("C");
        assert_eq!(hierarchy.lub_list(&[c, b, a], known.object), a);
        assert_eq!(hierarchy.lub_list(&[c], known.object), c);
        assert_eq!(hierarchy.lub_list(&[c, known.string], known.object), known.object);
    }

    #[test]
    fn test_preorder_tags_nest() {
        let (hierarchy, _, mut interner, known) = build_from(
            "class A { x : Int; }; \
             class B inherits A { y : Int; }; \
             class C inherits B { z : Int; };",
        );
        let root = hierarchy.node(hierarchy.root());
        assert_eq!(root.tag, 0);
        assert_eq!(root.name, known.object);

        let a = hierarchy.node(hierarchy.find(interner.intern("A")).unwrap());
        let b = hierarchy.node(hierarchy.find(interner.intern("B")).unwrap());
        let c = hierarchy.node(hierarchy.find(interner.intern("C")).unwrap());
        assert!(a.tag < b.tag && b.tag < c.tag);
        assert!(a.max_subtree_tag >= c.tag);
        assert!(b.max_subtree_tag >= c.tag);
        assert_eq!(c.max_subtree_tag, c.tag);
        assert_eq!(root.max_subtree_tag as usize, hierarchy.len() - 1);
    }

    #[test]
    fn test_duplicate_class() {
        let (_, diagnostics, _, _) =
            build_from("class A { x : Int; }; class A { y : Int; };");
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(messages(&diagnostics)[0], "Class A was previously defined.");
    }

    #[test]
    fn test_redefine_basic_class() {
        let (_, diagnostics, _, _) = build_from("class Int { x : Int; };");
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(messages(&diagnostics)[0], "Redefinition of basic class Int.");
    }

    #[test]
    fn test_inherit_value_class_recovers_under_root() {
        let (hierarchy, diagnostics, mut interner, known) =
            build_from("class A inherits String { x : Int; };");
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            messages(&diagnostics)[0],
            "Class A cannot inherit class String"
        );
        // Still attached and queryable
        let a = interner.intern("A");
        let id = hierarchy.find(a).unwrap();
        assert_eq!(hierarchy.node(id).parent, Some(hierarchy.root()));
        assert!(hierarchy.is_subtype(a, known.object, known.object));
        assert!(!hierarchy.is_subtype(a, known.string, known.object));
    }

    #[test]
    fn test_undefined_parent_reports_cycle() {
        let (_, diagnostics, _, _) = build_from("class A inherits Phantom { x : Int; };");
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            messages(&diagnostics)[0],
            "Class A, or an ancestor of A, is involved in an inheritance cycle."
        );
    }

    #[test]
    fn test_cycle_reports_every_member() {
        let (_, diagnostics, _, _) = build_from(
            "class A inherits B { x : Int; }; class B inherits A { y : Int; };",
        );
        assert_eq!(diagnostics.error_count(), 2);
        let found = messages(&diagnostics);
        assert!(found.contains(&String::from(
            "Class A, or an ancestor of A, is involved in an inheritance cycle."
        )));
        assert!(found.contains(&String::from(
            "Class B, or an ancestor of B, is involved in an inheritance cycle."
        )));
    }

    #[test]
    fn test_chain_onto_cycle_is_condemned_too() {
        let (_, diagnostics, _, _) = build_from(
            "class A inherits B { x : Int; }; \
             class B inherits A { y : Int; }; \
             class C inherits B { z : Int; };",
        );
        assert_eq!(diagnostics.error_count(), 3);
        assert!(messages(&diagnostics).contains(&String::from(
            "Class C, or an ancestor of C, is involved in an inheritance cycle."
        )));
    }

    #[test]
    fn test_self_inheritance_is_a_cycle() {
        let (_, diagnostics, _, _) = build_from("class A inherits A { x : Int; };");
        assert_eq!(diagnostics.error_count(), 1);
        assert!(messages(&diagnostics)[0].contains("inheritance cycle"));
    }

    #[test]
    fn test_search_feature_walks_ancestors() {
        let (hierarchy, _, mut interner, _) = build_from(
            "class A { greet() : Int { 0 }; }; \
             class B inherits A { x : Int; };",
        );
        let b = interner.intern("B");
        let greet = interner.intern("greet");
        let x = interner.intern("x");
        assert!(hierarchy.search_feature(b, greet));
        assert!(hierarchy.search_feature(b, x));
        // Own-class search ignores inherited features
        assert!(!hierarchy.feature_exists_on_class(b, greet));
        assert!(hierarchy.feature_exists_on_class(b, x));
    }

    #[test]
    fn test_method_on_prefers_override() {
        let (hierarchy, _, mut interner, known) = build_from(
            "class A { f() : Int { 1 }; }; \
             class B inherits A { f() : String { \"x\" }; };",
        );
        let a = interner.intern("A");
        let b = interner.intern("B");
        let f = interner.intern("f");
        assert_eq!(hierarchy.method_on(a, f).unwrap().return_type, known.int);
        assert_eq!(hierarchy.method_on(b, f).unwrap().return_type, known.string);
    }

    #[test]
    fn test_attribute_on_inherited() {
        let (hierarchy, _, mut interner, known) = build_from(
            "class A { total : Int; }; class B inherits A { x : Bool; };",
        );
        let b = interner.intern("B");
        let total = interner.intern("total");
        assert_eq!(hierarchy.attribute_on(b, total), Some(known.int));
        assert_eq!(hierarchy.attribute_on(b, interner.intern("ghost")), None);
    }

    #[test]
    fn test_ancestors_root_first() {
        let (hierarchy, _, mut interner, known) = build_from(
            "class A { x : Int; }; class B inherits A { y : Int; };",
        );
        let b = hierarchy.find(interner.intern("B")).unwrap();
        let chain: Vec<Symbol> = hierarchy
            .ancestors_root_first(b)
            .iter()
            .map(|&id| hierarchy.node(id).name)
            .collect();
        assert_eq!(chain, vec![known.object, interner.intern("A")]);
    }
}
