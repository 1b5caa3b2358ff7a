//! Namespace tree and per-file views (`spec.md` §3, §4.3).
//!
//! [`World`] owns every `Namespace`, `Type`, `Function`, `Variable`,
//! `Expr` and `Stmt` node in index-addressed slabs (see the module doc
//! on `types.rs` for why slabs rather than a `bumpalo::Arena` of
//! pointers). [`PhoneyNamespace`] is the per-file overlay from the
//! original `LinxcPhoneyNamespace`: a file only sees the slice of the
//! global namespace tree it has actually `#include`d, represented here
//! as reference sets rather than copies, merged in as each include is
//! processed.

use crate::ast::{Expr, ExprId, Stmt, StmtId};
use crate::types::{FuncId, NamespaceId, Type, TypeId, Variable, VarId};
use linxc_base::{Interner, Symbol};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Namespace {
    pub name: Symbol,
    pub parent: Option<NamespaceId>,
    pub variables: HashMap<Symbol, VarId>,
    pub functions: HashMap<Symbol, Vec<FuncId>>,
    pub types: HashMap<Symbol, TypeId>,
    pub sub_namespaces: HashMap<Symbol, NamespaceId>,
}

impl Namespace {
    fn new(name: Symbol, parent: Option<NamespaceId>) -> Self {
        Namespace {
            name,
            parent,
            variables: HashMap::new(),
            functions: HashMap::new(),
            types: HashMap::new(),
            sub_namespaces: HashMap::new(),
        }
    }
}

/// A single file's view into the global namespace tree: only the
/// names actually brought in via `#include` (or declared locally) are
/// visible, grounded in the original's `LinxcPhoneyNamespace`.
#[derive(Debug, Clone, Default)]
pub struct PhoneyNamespace {
    pub variable_refs: HashMap<Symbol, VarId>,
    pub function_refs: HashMap<Symbol, Vec<FuncId>>,
    pub type_refs: HashMap<Symbol, TypeId>,
    /// `using`-style aliases: a local name mapped to a type defined
    /// elsewhere in the tree.
    pub typedefs: HashMap<Symbol, TypeId>,
    pub sub_namespaces: HashMap<Symbol, PhoneyNamespace>,
}

impl PhoneyNamespace {
    pub fn new() -> Self {
        PhoneyNamespace::default()
    }

    pub fn add_variable(&mut self, name: Symbol, id: VarId) {
        self.variable_refs.insert(name, id);
    }

    pub fn add_function(&mut self, name: Symbol, id: FuncId) {
        self.function_refs.entry(name).or_default().push(id);
    }

    pub fn add_type(&mut self, name: Symbol, id: TypeId) {
        self.type_refs.insert(name, id);
    }

    /// Merges the origin `Namespace`'s full contents into this view —
    /// the behavior backing `#include`'ing a whole namespace at once.
    /// Sub-namespaces are recursively merged as phoney views of their
    /// own, cloning on first touch rather than sharing storage with
    /// the origin (each file's view can diverge afterwards, e.g. via
    /// local `typedefs`).
    pub fn merge_namespace(&mut self, origin: &Namespace, world: &World) {
        for (&name, &id) in &origin.variables {
            self.variable_refs.insert(name, id);
        }
        for (&name, ids) in &origin.functions {
            self.function_refs.entry(name).or_default().extend(ids.iter().copied());
        }
        for (&name, &id) in &origin.types {
            self.type_refs.insert(name, id);
        }
        for (&name, &sub_id) in &origin.sub_namespaces {
            let sub_origin = world.namespace(sub_id);
            let entry = self.sub_namespaces.entry(name).or_default();
            entry.merge_namespace(sub_origin, world);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupScope {
    Namespace(NamespaceId),
    Type(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Function(FuncId),
    Variable(VarId),
    Type(TypeId),
    Namespace(NamespaceId),
}

/// Owns the full compiled universe: every namespace, type, function,
/// variable, expression and statement node ever allocated, addressed
/// by stable index.
pub struct World {
    pub interner: Interner,
    namespaces: Vec<Namespace>,
    types: Vec<Type>,
    functions: Vec<crate::types::Function>,
    variables: Vec<Variable>,
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    pub root: NamespaceId,
    pub primitive_types: HashMap<crate::types::PrimitiveKind, TypeId>,
    /// `(from, to) -> implicit` for every primitive-to-primitive cast
    /// `spec.md` §4.5 seeds by default, consulted by `can_assign`. A
    /// pair absent from this table has no default cast at all (a user
    /// type needs its own `OperatorImpl::Cast` overload instead).
    pub implicit_casts: HashMap<(TypeId, TypeId), bool>,
}

impl World {
    pub fn new() -> Self {
        let interner = Interner::new();
        let mut world = World {
            interner,
            namespaces: vec![Namespace::new(Symbol::EMPTY, None)],
            types: Vec::new(),
            functions: Vec::new(),
            variables: Vec::new(),
            exprs: Vec::new(),
            stmts: Vec::new(),
            root: NamespaceId(0),
            primitive_types: HashMap::new(),
            implicit_casts: HashMap::new(),
        };
        world.seed_primitives();
        world.seed_casts();
        world
    }

    fn seed_primitives(&mut self) {
        use crate::types::PrimitiveKind::*;
        let all = [
            U8, U16, U32, U64, I8, I16, I32, I64, Float, Double, Char, Void, Bool,
        ];
        for kind in all {
            let name = self.interner.intern(kind.name());
            let mut ty = Type::new(name, self.root, None);
            ty.primitive = Some(kind);
            let id = self.push_type(ty);
            self.namespaces[self.root.0 as usize].types.insert(name, id);
            self.primitive_types.insert(kind, id);
        }
    }

    /// Ported from the original `LinxcParser` constructor's default-cast
    /// seeding: every integer casts to every other integer (implicitly
    /// only when same signedness and widening — `spec.md` §4.5), every
    /// integer casts to `float`/`double` implicitly, and `float`/
    /// `double` cast to anything only explicitly.
    fn seed_casts(&mut self) {
        use crate::types::PrimitiveKind;
        let integers = PrimitiveKind::INTEGERS;
        for &from in &integers {
            for &to in &integers {
                if from == to {
                    continue;
                }
                let same_sign = from.is_signed() == to.is_signed();
                let widening = to.bit_width() > from.bit_width();
                let implicit = same_sign && widening;
                self.implicit_casts
                    .insert((self.primitive_types[&from], self.primitive_types[&to]), implicit);
            }
            self.implicit_casts
                .insert((self.primitive_types[&from], self.primitive_types[&PrimitiveKind::Float]), true);
            self.implicit_casts
                .insert((self.primitive_types[&from], self.primitive_types[&PrimitiveKind::Double]), true);
        }
        for &from in &[PrimitiveKind::Float, PrimitiveKind::Double] {
            for &to in &integers {
                self.implicit_casts.insert((self.primitive_types[&from], self.primitive_types[&to]), false);
            }
        }
        self.implicit_casts
            .insert((self.primitive_types[&PrimitiveKind::Float], self.primitive_types[&PrimitiveKind::Double]), false);
        self.implicit_casts
            .insert((self.primitive_types[&PrimitiveKind::Double], self.primitive_types[&PrimitiveKind::Float]), false);
    }

    pub fn new_namespace(&mut self, name: Symbol, parent: NamespaceId) -> NamespaceId {
        if let Some(&existing) = self.namespaces[parent.0 as usize].sub_namespaces.get(&name) {
            return existing;
        }
        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(Namespace::new(name, Some(parent)));
        self.namespaces[parent.0 as usize].sub_namespaces.insert(name, id);
        id
    }

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0 as usize]
    }

    pub fn namespace_mut(&mut self, id: NamespaceId) -> &mut Namespace {
        &mut self.namespaces[id.0 as usize]
    }

    pub fn push_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn type_(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn type_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.0 as usize]
    }

    pub fn push_function(&mut self, f: crate::types::Function) -> FuncId {
        let id = FuncId(self.functions.len() as u32);
        self.functions.push(f);
        id
    }

    pub fn function(&self, id: FuncId) -> &crate::types::Function {
        &self.functions[id.0 as usize]
    }

    pub fn function_mut(&mut self, id: FuncId) -> &mut crate::types::Function {
        &mut self.functions[id.0 as usize]
    }

    pub fn push_variable(&mut self, v: Variable) -> VarId {
        let id = VarId(self.variables.len() as u32);
        self.variables.push(v);
        id
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0 as usize]
    }

    pub fn push_expr(&mut self, e: Expr) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(e);
        id
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    pub fn push_stmt(&mut self, s: Stmt) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(s);
        id
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0 as usize]
    }

    pub fn declare_variable(&mut self, namespace: NamespaceId, v: Variable) -> VarId {
        let name = v.name;
        let id = self.push_variable(v);
        self.namespace_mut(namespace).variables.insert(name, id);
        id
    }

    pub fn declare_function(&mut self, namespace: NamespaceId, f: crate::types::Function) -> FuncId {
        let name = f.name;
        let id = self.push_function(f);
        self.namespace_mut(namespace).functions.entry(name).or_default().push(id);
        id
    }

    pub fn declare_type(&mut self, namespace: NamespaceId, ty: Type) -> TypeId {
        let name = ty.name;
        let id = self.push_type(ty);
        self.namespace_mut(namespace).types.insert(name, id);
        id
    }

    /// Looks up `name` per `spec.md` §4.3's resolution order:
    ///
    /// 1. If `scope_override` is given (a qualified lookup like
    ///    `Foo::bar` or `obj.field`), search *only* that scope.
    /// 2. Otherwise: local variables first, then each namespace walking
    ///    outward from `scopes[0]` to the root, then each type in
    ///    `enclosing_types` walking outward (the `this`-chain for a
    ///    method body).
    ///
    /// Within any single scope the search order is functions,
    /// variables, types, then (namespaces only) sub-namespaces — and
    /// the **first match wins silently**: no ambiguity diagnostic is
    /// raised even if a later scope also defines `name` (`spec.md` §9,
    /// preserved exactly).
    pub fn lookup(
        &self,
        scope_override: Option<LookupScope>,
        local_vars: &HashMap<Symbol, VarId>,
        scopes: &[NamespaceId],
        enclosing_types: &[TypeId],
        name: Symbol,
    ) -> Option<Resolved> {
        if let Some(scope) = scope_override {
            return self.lookup_in_scope(scope, name);
        }
        if let Some(&id) = local_vars.get(&name) {
            return Some(Resolved::Variable(id));
        }
        for &ns in scopes {
            if let Some(found) = self.lookup_in_scope(LookupScope::Namespace(ns), name) {
                return Some(found);
            }
        }
        for &ty in enclosing_types {
            if let Some(found) = self.lookup_in_scope(LookupScope::Type(ty), name) {
                return Some(found);
            }
        }
        None
    }

    fn lookup_in_scope(&self, scope: LookupScope, name: Symbol) -> Option<Resolved> {
        match scope {
            LookupScope::Namespace(id) => {
                let ns = self.namespace(id);
                if let Some(ids) = ns.functions.get(&name) {
                    if let Some(&f) = ids.first() {
                        return Some(Resolved::Function(f));
                    }
                }
                if let Some(&v) = ns.variables.get(&name) {
                    return Some(Resolved::Variable(v));
                }
                if let Some(&t) = ns.types.get(&name) {
                    return Some(Resolved::Type(t));
                }
                if let Some(&sub) = ns.sub_namespaces.get(&name) {
                    return Some(Resolved::Namespace(sub));
                }
                None
            }
            LookupScope::Type(id) => {
                let ty = self.type_(id);
                for &m in &ty.methods {
                    if self.function(m).name == name {
                        return Some(Resolved::Function(m));
                    }
                }
                for &v in &ty.variables {
                    if self.variable(v).name == name {
                        return Some(Resolved::Variable(v));
                    }
                }
                for &nested in &ty.nested_types {
                    if self.type_(nested).name == name {
                        return Some(Resolved::Type(nested));
                    }
                }
                None
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        World::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FuncOwner, Function, PrimitiveKind, TypeReference};

    #[test]
    fn seeds_all_thirteen_primitives() {
        let world = World::new();
        assert_eq!(world.primitive_types.len(), 13);
        assert!(world.primitive_types.contains_key(&PrimitiveKind::U8));
        assert!(world.primitive_types.contains_key(&PrimitiveKind::Void));
    }

    #[test]
    fn widening_same_signed_cast_is_implicit() {
        let world = World::new();
        let i32_ty = world.primitive_types[&PrimitiveKind::I32];
        let i64_ty = world.primitive_types[&PrimitiveKind::I64];
        assert_eq!(world.implicit_casts.get(&(i32_ty, i64_ty)), Some(&true));
    }

    #[test]
    fn narrowing_cast_is_explicit_only() {
        let world = World::new();
        let i64_ty = world.primitive_types[&PrimitiveKind::I64];
        let i32_ty = world.primitive_types[&PrimitiveKind::I32];
        assert_eq!(world.implicit_casts.get(&(i64_ty, i32_ty)), Some(&false));
    }

    #[test]
    fn integer_to_float_is_implicit_but_float_to_integer_is_not() {
        let world = World::new();
        let i32_ty = world.primitive_types[&PrimitiveKind::I32];
        let float_ty = world.primitive_types[&PrimitiveKind::Float];
        assert_eq!(world.implicit_casts.get(&(i32_ty, float_ty)), Some(&true));
        assert_eq!(world.implicit_casts.get(&(float_ty, i32_ty)), Some(&false));
    }

    #[test]
    fn declare_and_lookup_variable_in_namespace() {
        let mut world = World::new();
        let name = world.interner.intern("count");
        let u8_ty = world.primitive_types[&PrimitiveKind::U8];
        let var_id = world.declare_variable(
            world.root,
            Variable {
                name,
                type_ref: TypeReference::of(u8_ty),
                default_value: None,
                member_of: None,
                is_const: false,
            },
        );
        let found = world.lookup(None, &HashMap::new(), &[world.root], &[], name);
        assert_eq!(found, Some(Resolved::Variable(var_id)));
    }

    #[test]
    fn local_variable_shadows_namespace_scope() {
        let mut world = World::new();
        let name = world.interner.intern("x");
        let u8_ty = world.primitive_types[&PrimitiveKind::U8];
        world.declare_variable(
            world.root,
            Variable {
                name,
                type_ref: TypeReference::of(u8_ty),
                default_value: None,
                member_of: None,
                is_const: false,
            },
        );
        let mut locals = HashMap::new();
        let local_id = VarId(999);
        locals.insert(name, local_id);
        let found = world.lookup(None, &locals, &[world.root], &[], name);
        assert_eq!(found, Some(Resolved::Variable(local_id)));
    }

    #[test]
    fn function_beats_variable_of_the_same_name_in_one_scope() {
        let mut world = World::new();
        let name = world.interner.intern("thing");
        let u8_ty = world.primitive_types[&PrimitiveKind::U8];
        world.declare_variable(
            world.root,
            Variable {
                name,
                type_ref: TypeReference::of(u8_ty),
                default_value: None,
                member_of: None,
                is_const: false,
            },
        );
        let func_id = world.declare_function(
            world.root,
            Function {
                name,
                owner: FuncOwner::Namespace(world.root),
                return_type: TypeReference::of(u8_ty),
                params: Vec::new(),
                required_params: 0,
                template_params: Vec::new(),
                variadic: false,
                body: Vec::new(),
                is_method: false,
            },
        );
        let found = world.lookup(None, &HashMap::new(), &[world.root], &[], name);
        assert_eq!(found, Some(Resolved::Function(func_id)));
    }

    #[test]
    fn nested_namespace_does_not_see_sibling_declarations() {
        let mut world = World::new();
        let child_name = world.interner.intern("child");
        let child = world.new_namespace(child_name, world.root);
        let sibling_name = world.interner.intern("sibling");
        let _sibling = world.new_namespace(sibling_name, world.root);
        let var_name = world.interner.intern("v");
        let u8_ty = world.primitive_types[&PrimitiveKind::U8];
        world.declare_variable(
            child,
            Variable {
                name: var_name,
                type_ref: TypeReference::of(u8_ty),
                default_value: None,
                member_of: None,
                is_const: false,
            },
        );
        let found = world.lookup(None, &HashMap::new(), &[world.root], &[], var_name);
        assert_eq!(found, None, "declarations in `child` must not leak to root lookups");
    }

    #[test]
    fn scope_override_restricts_lookup_to_a_single_namespace() {
        let mut world = World::new();
        let child_name = world.interner.intern("child");
        let child = world.new_namespace(child_name, world.root);
        let var_name = world.interner.intern("v");
        let u8_ty = world.primitive_types[&PrimitiveKind::U8];
        let var_id = world.declare_variable(
            child,
            Variable {
                name: var_name,
                type_ref: TypeReference::of(u8_ty),
                default_value: None,
                member_of: None,
                is_const: false,
            },
        );
        let found = world.lookup(
            Some(LookupScope::Namespace(child)),
            &HashMap::new(),
            &[world.root],
            &[],
            var_name,
        );
        assert_eq!(found, Some(Resolved::Variable(var_id)));
    }

    #[test]
    fn phoney_namespace_merge_pulls_in_nested_sub_namespaces() {
        let mut world = World::new();
        let child_name = world.interner.intern("child");
        let child = world.new_namespace(child_name, world.root);
        let var_name = world.interner.intern("v");
        let u8_ty = world.primitive_types[&PrimitiveKind::U8];
        world.declare_variable(
            child,
            Variable {
                name: var_name,
                type_ref: TypeReference::of(u8_ty),
                default_value: None,
                member_of: None,
                is_const: false,
            },
        );
        let mut phoney = PhoneyNamespace::new();
        phoney.merge_namespace(world.namespace(world.root), &world);
        let sub = phoney.sub_namespaces.get(&child_name).expect("child namespace merged");
        assert!(sub.variable_refs.contains_key(&var_name));
    }
}
