//! Portable-C emission (`spec.md` §6): the one area of this crate whose
//! exact textual output `spec.md` pins down. Everything else
//! about code generation is left to this module's judgment, but these
//! five behaviors are load-bearing and every test in this module checks
//! one of them:
//!
//! - a `.lx` input emits both a `.h` and a `.c` file, mirroring its
//!   include-relative directory structure under the output directory;
//! - the `.h` opens with `#pragma once`, then re-emits its `#include`s
//!   with `.lx` rewritten to `.h` and `\` normalized to `/` (`Linxc.h`
//!   additionally pulls in `<stdbool.h>`);
//! - a type becomes `typedef struct { ... } CName;` with `CName` the
//!   underscore-joined fully-qualified name;
//! - a method's C signature gets an implicit leading `SelfCName *this`;
//! - the `.c` file `#include`s its sibling header and holds only
//!   function bodies.

mod emit;
mod types;

use std::fs;
use std::path::{Path, PathBuf};

use linxc_lang::{StmtKind, World};

use crate::session::ParsedFile;
use types::{c_type_string, escape_c_ident, mangled_func_name, mangled_type_name};

/// Swaps a `.lx`/`.lxh` include path for its emitted C header name and
/// normalizes Windows-style separators, per `spec.md` §6.
fn rewrite_include_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    if let Some(stem) = normalized.strip_suffix(".lx").or_else(|| normalized.strip_suffix(".lxh")) {
        format!("{}.h", stem)
    } else {
        normalized
    }
}

fn output_path_for(output_dir: &Path, include_name: &str, extension: &str) -> PathBuf {
    let rewritten = include_name
        .strip_suffix(".lx")
        .or_else(|| include_name.strip_suffix(".lxh"))
        .unwrap_or(include_name);
    output_dir.join(format!("{}.{}", rewritten.replace('\\', "/"), extension))
}

fn write_header(world: &World, file: &ParsedFile) -> String {
    let mut out = String::new();
    out.push_str("#pragma once\n");

    for &id in &file.stmts {
        if let StmtKind::Include { path, is_angle_bracket } = world.stmt(id).kind {
            let raw = world.interner.resolve(path);
            let rewritten = rewrite_include_path(raw);
            if is_angle_bracket {
                out.push_str(&format!("#include <{}>\n", rewritten));
            } else {
                out.push_str(&format!("#include \"{}\"\n", rewritten));
            }
            if raw == "Linxc.h" {
                out.push_str("#include <stdbool.h>\n");
            }
        }
    }
    out.push('\n');

    for &ty in &file.defined_types {
        write_struct_typedef(world, ty, &mut out);
    }

    for &func in &file.defined_funcs {
        out.push_str(&function_signature(world, func, None));
        out.push_str(";\n");
    }
    for &ty in &file.defined_types {
        for &m in &world.type_(ty).methods {
            out.push_str(&function_signature(world, m, Some(ty)));
            out.push_str(";\n");
        }
    }
    out
}

fn write_struct_typedef(world: &World, ty: linxc_lang::TypeId, out: &mut String) {
    let t = world.type_(ty);
    if t.primitive.is_some() {
        return;
    }
    out.push_str("typedef struct {\n");
    for &v in &t.variables {
        let var = world.variable(v);
        out.push_str(&format!(
            "    {} {};\n",
            c_type_string(world, &var.type_ref),
            escape_c_ident(world.interner.resolve(var.name))
        ));
    }
    out.push_str(&format!("}} {};\n\n", mangled_type_name(world, ty)));
}

/// A function's C prototype, with the implicit `this` parameter already
/// baked into its `params` list by the parser (`spec.md` §6) — `owner`
/// is only used to pick the mangled name's prefix when `owner_type`
/// wasn't threaded through `FuncOwner` (methods and free functions
/// share this code path either way).
fn function_signature(world: &World, func: linxc_lang::FuncId, _owner: Option<linxc_lang::TypeId>) -> String {
    let f = world.function(func);
    let ret = c_type_string(world, &f.return_type);
    let name = mangled_func_name(world, func);
    let params: Vec<String> = f
        .params
        .iter()
        .map(|&p| {
            let var = world.variable(p);
            format!("{} {}", c_type_string(world, &var.type_ref), escape_c_ident(world.interner.resolve(var.name)))
        })
        .collect();
    let param_list = if params.is_empty() { "void".to_string() } else { params.join(", ") };
    format!("{} {}({})", ret, name, param_list)
}

fn write_source(world: &World, file: &ParsedFile, header_name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("#include \"{}\"\n\n", header_name));

    for &func in &file.defined_funcs {
        emit_function_body(world, func, &mut out);
    }
    for &ty in &file.defined_types {
        for &m in &world.type_(ty).methods {
            emit_function_body(world, m, &mut out);
        }
    }
    out
}

fn emit_function_body(world: &World, func: linxc_lang::FuncId, out: &mut String) {
    out.push_str(&function_signature(world, func, None));
    out.push_str(" {\n");
    let body = world.function(func).body.clone();
    for stmt in body {
        emit::codegen_stmt(world, stmt, out, 1);
    }
    out.push_str("}\n\n");
}

/// Writes `output_dir/<include-path-with-.h>` (and, unless the file is
/// header-only, its sibling `.c`) for one parsed file.
pub fn emit_file(world: &World, file: &ParsedFile, output_dir: &Path) -> Result<(), String> {
    let header_path = output_path_for(output_dir, &file.include_name, "h");
    if let Some(parent) = header_path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(&header_path, write_header(world, file)).map_err(|e| e.to_string())?;

    if file.must_emit_c {
        let source_path = output_path_for(output_dir, &file.include_name, "c");
        let header_name = header_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        fs::write(&source_path, write_source(world, file, &header_name)).map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use std::path::PathBuf;

    #[test]
    fn rewrites_lx_include_extension_and_backslashes() {
        assert_eq!(rewrite_include_path("util\\vector.lx"), "util/vector.h");
        assert_eq!(rewrite_include_path("stdio.h"), "stdio.h");
    }

    #[test]
    fn emits_header_and_source_for_a_simple_function() {
        let mut session = Session::new();
        session.parse_file(PathBuf::from("main.lx"), "main.lx".to_string(), "i32 main() { return 0; }");
        let out = tempfile::tempdir().unwrap();
        session.compile(out.path()).expect("clean file should compile");

        let header = fs::read_to_string(out.path().join("main.h")).unwrap();
        assert!(header.starts_with("#pragma once"));
        assert!(header.contains("main("));

        let source = fs::read_to_string(out.path().join("main.c")).unwrap();
        assert!(source.contains("#include \"main.h\""));
        assert!(source.contains("return 0;"));
    }

    #[test]
    fn struct_emits_as_typedef_with_mangled_name() {
        let mut session = Session::new();
        session.parse_file(
            PathBuf::from("point.lx"),
            "point.lx".to_string(),
            "struct Point { i32 x; i32 y; };",
        );
        let out = tempfile::tempdir().unwrap();
        session.compile(out.path()).unwrap();
        let header = fs::read_to_string(out.path().join("point.h")).unwrap();
        assert!(header.contains("typedef struct {"));
        assert!(header.contains("} Point;"));
    }

    #[test]
    fn header_only_file_does_not_get_a_c_file() {
        let mut session = Session::new();
        session.parse_file(PathBuf::from("decl.lxh"), "decl.lxh".to_string(), "struct Marker { i32 tag; };");
        let out = tempfile::tempdir().unwrap();
        session.compile(out.path()).unwrap();
        assert!(out.path().join("decl.h").exists());
        assert!(!out.path().join("decl.c").exists());
    }

    #[test]
    fn linxc_h_include_pulls_in_stdbool() {
        let mut session = Session::new();
        session.parse_file(
            PathBuf::from("main.lx"),
            "main.lx".to_string(),
            "#include <Linxc.h>\ni32 main() { return 0; }",
        );
        let out = tempfile::tempdir().unwrap();
        session.compile(out.path()).unwrap();
        let header = fs::read_to_string(out.path().join("main.h")).unwrap();
        assert!(header.contains("#include <stdbool.h>"));
    }
}
