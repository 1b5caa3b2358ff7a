//! Compilation session (`spec.md` §6): the in-process API a driver binds
//! against — `openSession`/`addIncludeDir`/`setStdlibLocation`/
//! `parseFile`/`fullPathFromIncludeName`/`compile`.
//!
//! A [`Session`] owns the single [`World`] every parsed file's
//! declarations land in, plus the list of [`ParsedFile`] records the
//! driver and the C emitter both read back from.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use linxc_base::{SpannedError, Symbol};
use linxc_lang::{parse_source, FuncId, NamespaceId, PhoneyNamespace, StmtId, StmtKind, TypeId, VarId, World};

use crate::codegen_c;
use crate::loader::resolve_include;

/// One parsed translation unit (`spec.md` §3's `ParsedFile`).
pub struct ParsedFile {
    /// The name it was `#include`d or requested by, e.g. `"geometry/point.lx"`.
    pub include_name: String,
    /// The resolved filesystem path its contents were read from.
    pub full_path: PathBuf,
    /// Object-like and function-like macros `#define`d in this file.
    pub macros: Vec<linxc_lang::macros::Macro>,
    /// Back-references into the session's `World` for the entities this
    /// file declared directly — the "symbol-table external view" of
    /// `spec.md` §6.
    pub defined_funcs: Vec<FuncId>,
    pub defined_types: Vec<TypeId>,
    pub defined_vars: Vec<VarId>,
    pub errors: Vec<SpannedError>,
    pub stmts: Vec<StmtId>,
    /// This file's overlay view of the global namespace tree: only the
    /// names it declared or pulled in via `#include` are visible here.
    pub file_view: PhoneyNamespace,
    /// `Linxc.h` itself, or a file whose only job is to declare symbols
    /// (`.lxh`) — such files never get a `.c` counterpart.
    pub is_linxc_header: bool,
    pub must_emit_c: bool,
}

impl ParsedFile {
    fn is_empty_of_errors(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Session {
    pub world: World,
    include_dirs: Vec<PathBuf>,
    stdlib_location: Option<PathBuf>,
    parsed_files: Vec<ParsedFile>,
    by_include_name: HashMap<String, usize>,
}

impl Session {
    /// `openSession` — a fresh `World` with the primitive lattice seeded
    /// and no include directories registered yet.
    pub fn new() -> Self {
        Session {
            world: World::new(),
            include_dirs: Vec::new(),
            stdlib_location: None,
            parsed_files: Vec::new(),
            by_include_name: HashMap::new(),
        }
    }

    pub fn add_include_dir(&mut self, path: impl Into<PathBuf>) {
        self.include_dirs.push(path.into());
    }

    pub fn set_stdlib_location(&mut self, path: impl Into<PathBuf>) {
        self.stdlib_location = Some(path.into());
    }

    /// Walks the registered include directories (stdlib last) for the
    /// first path whose file exists, per `spec.md` §6.
    pub fn full_path_from_include_name(&self, include_name: &str) -> Option<PathBuf> {
        resolve_include(&self.include_dirs, self.stdlib_location.as_deref(), include_name)
    }

    pub fn parsed_files(&self) -> &[ParsedFile] {
        &self.parsed_files
    }

    pub fn parsed_file(&self, include_name: &str) -> Option<&ParsedFile> {
        self.by_include_name.get(include_name).map(|&i| &self.parsed_files[i])
    }

    /// Parses one file's contents into the session's `World`, recording
    /// it as a `ParsedFile` and returning a reference to it. Declarations
    /// land directly in the root namespace (this front-end does not
    /// sandbox a file's own declarations — only what it can *see* of
    /// other files is restricted, via `file_view`).
    pub fn parse_file(&mut self, full_path: PathBuf, include_name: String, contents: &str) -> &ParsedFile {
        let namespace: NamespaceId = self.world.root;
        let (stmts, macros, errors) = parse_source(&mut self.world, contents, namespace);

        let (defined_funcs, defined_types, defined_vars) = collect_definitions(&self.world, &stmts);

        let mut file_view = PhoneyNamespace::new();
        file_view.merge_namespace(self.world.namespace(namespace), &self.world);

        let is_linxc_header = include_name == "Linxc.h";
        let must_emit_c = !include_name.ends_with(".lxh") && !is_linxc_header;

        let parsed = ParsedFile {
            include_name: include_name.clone(),
            full_path,
            macros,
            defined_funcs,
            defined_types,
            defined_vars,
            errors,
            stmts,
            file_view,
            is_linxc_header,
            must_emit_c,
        };

        let idx = self.parsed_files.len();
        self.parsed_files.push(parsed);
        self.by_include_name.insert(include_name, idx);
        &self.parsed_files[idx]
    }

    /// Resolves `include_name` via `full_path_from_include_name`, reads
    /// it from disk, and parses it — the convenience path a driver
    /// processing a raw `#include` line actually calls.
    pub fn parse_include(&mut self, include_name: &str) -> Result<&ParsedFile, String> {
        let path = self
            .full_path_from_include_name(include_name)
            .ok_or_else(|| format!("could not resolve include '{}' in any registered directory", include_name))?;
        let contents = fs::read_to_string(&path).map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
        Ok(self.parse_file(path, include_name.to_string(), &contents))
    }

    /// `compile(Session, outputDir) -> ok|errors` (`spec.md` §6):
    /// transpiles every parsed file whose error list is empty to
    /// `outputDir/<path>.h` (and `.c`, unless it's header-only); any file
    /// with errors is skipped, and the overall `Ok` only holds if *every*
    /// parsed file was clean.
    pub fn compile(&self, output_dir: &Path) -> Result<(), Vec<SpannedError>> {
        let mut all_errors = Vec::new();
        for file in &self.parsed_files {
            if !file.is_empty_of_errors() {
                all_errors.extend(file.errors.iter().cloned());
            }
        }
        if !all_errors.is_empty() {
            return Err(all_errors);
        }
        for file in &self.parsed_files {
            codegen_c::emit_file(&self.world, file, output_dir).map_err(|e| vec![SpannedError::structural(e, linxc_base::Span::default())])?;
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

/// Walks a file's top-level statements to build the `definedFuncs` /
/// `definedTypes` / `definedVars` back-reference lists `spec.md` §6
/// promises for a future linker/reflection consumer. Only top-level
/// declarations are collected — a method nested inside a `TypeDecl` is
/// reachable through the `Type`'s own `methods` list instead.
fn collect_definitions(world: &World, stmts: &[StmtId]) -> (Vec<FuncId>, Vec<TypeId>, Vec<VarId>) {
    let mut funcs = Vec::new();
    let mut types = Vec::new();
    let mut vars = Vec::new();
    for &id in stmts {
        match world.stmt(id).kind {
            StmtKind::FuncDecl(f) => funcs.push(f),
            StmtKind::TypeDecl(t) => types.push(t),
            StmtKind::VarDecl(v) => vars.push(v),
            _ => {}
        }
    }
    (funcs, types, vars)
}

/// Resolves an `#include`d name's `Symbol` form, used when wiring a
/// `PhoneyNamespace` typedef alias. Kept as a free function since it has
/// no session state beyond the interner.
pub fn intern_include_path(world: &mut World, path: &str) -> Symbol {
    world.interner.intern(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_a_file_records_its_top_level_definitions() {
        let mut session = Session::new();
        let parsed = session.parse_file(
            PathBuf::from("main.lx"),
            "main.lx".to_string(),
            "i32 main() { return 0; }",
        );
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.defined_funcs.len(), 1);
        assert!(parsed.must_emit_c);
        assert!(!parsed.is_linxc_header);
    }

    #[test]
    fn a_header_only_file_does_not_require_c_emission() {
        let mut session = Session::new();
        let parsed = session.parse_file(
            PathBuf::from("geometry.lxh"),
            "geometry.lxh".to_string(),
            "struct Point { i32 x; i32 y; };",
        );
        assert!(!parsed.must_emit_c);
    }

    #[test]
    fn include_dirs_are_searched_in_registration_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Linxc.h"), "").unwrap();
        let mut session = Session::new();
        session.add_include_dir(dir.path());
        let found = session.full_path_from_include_name("Linxc.h");
        assert_eq!(found, Some(dir.path().join("Linxc.h")));
    }

    #[test]
    fn compile_reports_every_parsed_files_errors_together() {
        let mut session = Session::new();
        session.parse_file(PathBuf::from("bad.lx"), "bad.lx".to_string(), "i32 x = ;");
        let out = tempfile::tempdir().unwrap();
        let result = session.compile(out.path());
        assert!(result.is_err());
    }
}
