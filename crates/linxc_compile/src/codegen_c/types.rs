//! CName mangling and C type spelling (`spec.md` §6).
//!
//! A type or free function's emitted C name is its fully-qualified
//! Linxc name with every enclosing namespace and parent-type name
//! joined by `_` — `Geometry::Point` becomes `Geometry_Point`, a method
//! `Point::length` becomes `Point_length`. The root namespace
//! contributes nothing (its `name` interns to the empty string).

use linxc_lang::{PrimitiveKind, TypeId, TypeReference, World};

pub(super) fn is_c_reserved(name: &str) -> bool {
    matches!(
        name,
        "auto" | "break" | "case" | "char" | "const" | "continue" | "default" | "do" | "double" | "else"
            | "enum" | "extern" | "float" | "for" | "goto" | "if" | "int" | "long" | "register" | "return"
            | "short" | "signed" | "sizeof" | "static" | "struct" | "switch" | "typedef" | "union"
            | "unsigned" | "void" | "volatile" | "while" | "inline" | "restrict" | "_Bool"
            | "bool" | "true" | "false" | "main"
    )
}

pub(super) fn escape_c_ident(name: &str) -> String {
    if is_c_reserved(name) || name.is_empty() {
        format!("linxc_{}", name)
    } else {
        name.to_string()
    }
}

/// The mangled fully-qualified C name of a type: every enclosing
/// namespace (skipping the anonymous root) and parent type, joined by
/// `_`, with the type's own name last.
pub fn mangled_type_name(world: &World, ty: TypeId) -> String {
    let t = world.type_(ty);
    let mut parts = Vec::new();
    if let Some(parent) = t.parent_type {
        parts.push(mangled_type_name(world, parent));
    } else {
        parts.push(mangled_namespace_prefix(world, t.namespace));
    }
    parts.push(world.interner.resolve(t.name).to_string());
    escape_c_ident(&parts.into_iter().filter(|p| !p.is_empty()).collect::<Vec<_>>().join("_"))
}

fn mangled_namespace_prefix(world: &World, ns: linxc_lang::NamespaceId) -> String {
    let n = world.namespace(ns);
    if n.parent.is_none() {
        return String::new();
    }
    let name = world.interner.resolve(n.name);
    let parent_prefix = mangled_namespace_prefix(world, n.parent.unwrap());
    if parent_prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", parent_prefix, name)
    }
}

/// The mangled C name of a free function or method: its owner's
/// mangled prefix (namespace chain, or owning type) joined to its own
/// name.
pub fn mangled_func_name(world: &World, func: linxc_lang::FuncId) -> String {
    let f = world.function(func);
    let own_name = world.interner.resolve(f.name);
    let prefix = match f.owner {
        linxc_lang::types::FuncOwner::Namespace(ns) => mangled_namespace_prefix(world, ns),
        linxc_lang::types::FuncOwner::Type(t) => mangled_type_name(world, t),
    };
    if prefix.is_empty() {
        escape_c_ident(own_name)
    } else {
        escape_c_ident(&format!("{}_{}", prefix, own_name))
    }
}

/// `spec.md` §6 pins `i32`'s spelling down to plain `int` (scenario 2),
/// so this targets the C89 built-ins throughout rather than `<stdint.h>`
/// — consistent with emitting portable C without assuming a C99 header
/// beyond the `<stdbool.h>` the `Linxc.h` include already pulls in.
fn primitive_c_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::U8 => "unsigned char",
        PrimitiveKind::U16 => "unsigned short",
        PrimitiveKind::U32 => "unsigned int",
        PrimitiveKind::U64 => "unsigned long long",
        PrimitiveKind::I8 => "signed char",
        PrimitiveKind::I16 => "short",
        PrimitiveKind::I32 => "int",
        PrimitiveKind::I64 => "long long",
        PrimitiveKind::Float => "float",
        PrimitiveKind::Double => "double",
        PrimitiveKind::Char => "char",
        PrimitiveKind::Void => "void",
        PrimitiveKind::Bool => "bool",
    }
}

/// Renders a `TypeReference` as a C declaration prefix: base type name
/// (mangled if it's a user type) plus `const` and `*` qualifiers, ready
/// to be followed by a declared identifier.
pub fn c_type_string(world: &World, tr: &TypeReference) -> String {
    let base = match tr.target {
        Some(id) => {
            let t = world.type_(id);
            match t.primitive {
                Some(kind) => primitive_c_name(kind).to_string(),
                None => mangled_type_name(world, id),
            }
        }
        None => tr
            .generic_name
            .map(|s| world.interner.resolve(s).to_string())
            .unwrap_or_else(|| "void".to_string()),
    };
    let const_prefix = if tr.is_const { "const " } else { "" };
    let stars = "*".repeat(tr.pointer_count as usize);
    if stars.is_empty() {
        format!("{}{}", const_prefix, base)
    } else {
        format!("{}{} {}", const_prefix, base, stars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linxc_lang::Type;

    #[test]
    fn mangles_a_nested_namespace_and_type_name() {
        let mut world = World::new();
        let geometry_sym = world.interner.intern("Geometry");
        let geo = world.new_namespace(geometry_sym, world.root);
        let name = world.interner.intern("Point");
        let ty = world.declare_type(geo, Type::new(name, geo, None));
        assert_eq!(mangled_type_name(&world, ty), "Geometry_Point");
    }

    #[test]
    fn root_level_type_has_no_namespace_prefix() {
        let mut world = World::new();
        let name = world.interner.intern("Counter");
        let ty = world.declare_type(world.root, Type::new(name, world.root, None));
        assert_eq!(mangled_type_name(&world, ty), "Counter");
    }

    #[test]
    fn escapes_c_reserved_identifiers() {
        assert_eq!(escape_c_ident("struct"), "linxc_struct");
        assert_eq!(escape_c_ident("length"), "length");
    }
}
