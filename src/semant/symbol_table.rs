//! Lexically scoped symbol table
//!
//! A stack of frames with innermost-wins lookup. Both analysis passes
//! drive the same table shape: a program frame, one frame per ancestor
//! class, a frame for the class itself, then method and block frames as
//! the walk descends.

use crate::frontend::intern::Symbol;
use std::collections::HashMap;

#[derive(Debug)]
pub struct SymbolTable<V> {
    frames: Vec<HashMap<Symbol, V>>,
}

impl<V> SymbolTable<V> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Open a new innermost frame
    pub fn enter_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Close the innermost frame, dropping its bindings
    pub fn exit_scope(&mut self) {
        debug_assert!(!self.frames.is_empty(), "exit_scope with no open frame");
        self.frames.pop();
    }

    /// Bind a name in the innermost frame, shadowing any outer binding
    pub fn add_id(&mut self, name: Symbol, value: V) {
        debug_assert!(!self.frames.is_empty(), "add_id with no open frame");
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, value);
        }
    }

    /// Innermost-to-outermost search
    pub fn lookup(&self, name: Symbol) -> Option<&V> {
        self.frames.iter().rev().find_map(|frame| frame.get(&name))
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::intern::Interner;

    #[test]
    fn test_inner_frame_shadows_outer() {
        let mut interner = Interner::new();
        let x = interner.intern("x");

        let mut table: SymbolTable<u32> = SymbolTable::new();
        table.enter_scope();
        table.add_id(x, 1);
        table.enter_scope();
        table.add_id(x, 2);

        assert_eq!(table.lookup(x), Some(&2));
        table.exit_scope();
        assert_eq!(table.lookup(x), Some(&1));
    }

    #[test]
    fn test_exit_drops_bindings() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let y = interner.intern("y");

        let mut table: SymbolTable<&str> = SymbolTable::new();
        table.enter_scope();
        table.add_id(x, "outer");
        table.enter_scope();
        table.add_id(y, "inner");
        assert!(table.lookup(y).is_some());

        table.exit_scope();
        assert!(table.lookup(y).is_none());
        assert_eq!(table.lookup(x), Some(&"outer"));
    }

    #[test]
    fn test_lookup_miss() {
        let mut interner = Interner::new();
        let ghost = interner.intern("ghost");

        let mut table: SymbolTable<u32> = SymbolTable::new();
        table.enter_scope();
        assert!(table.lookup(ghost).is_none());
        table.exit_scope();
        assert!(table.is_empty());
    }

    #[test]
    fn test_depth_tracks_frames() {
        let mut table: SymbolTable<u32> = SymbolTable::new();
        assert_eq!(table.depth(), 0);
        table.enter_scope();
        table.enter_scope();
        assert_eq!(table.depth(), 2);
        table.exit_scope();
        assert_eq!(table.depth(), 1);
    }
}
