//! Command-line interface for `linxc`.
//!
//! Two subcommands cover the driver surface `spec.md` §6 describes:
//! [`Commands::Compile`] walks an entry file's `#include` graph, parses
//! every reachable file into one [`Session`], and emits portable C for
//! the whole set; [`Commands::Check`] does the same parse-and-resolve
//! work but stops short of emission, for fast feedback during editing.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use linxc_compile::{diagnostic, Session};
use linxc_lang::StmtKind;

#[derive(Parser)]
#[command(name = "linxc")]
#[command(about = "Compiles Linxc source to portable C", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile an entry file and everything it `#include`s to portable C.
    Compile {
        /// Entry source file, e.g. `src/main.lx`.
        entry: PathBuf,

        /// Additional directory to search for `#include`s. May repeat.
        #[arg(long = "include", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,

        /// Directory holding the Linxc standard library headers.
        #[arg(long)]
        stdlib: Option<PathBuf>,

        /// Directory the generated `.h`/`.c` files are written into.
        #[arg(long, short = 'o', default_value = "out")]
        out: PathBuf,
    },

    /// Parse and resolve an entry file without emitting C.
    Check {
        entry: PathBuf,

        #[arg(long = "include", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,

        #[arg(long)]
        stdlib: Option<PathBuf>,
    },
}

pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compile { entry, include_dirs, stdlib, out } => cmd_compile(&entry, &include_dirs, stdlib.as_deref(), &out),
        Commands::Check { entry, include_dirs, stdlib } => cmd_check(&entry, &include_dirs, stdlib.as_deref()),
    }
}

fn open_session(entry: &Path, include_dirs: &[PathBuf], stdlib: Option<&Path>) -> Session {
    let mut session = Session::new();
    if let Some(parent) = entry.parent() {
        session.add_include_dir(parent);
    }
    for dir in include_dirs {
        session.add_include_dir(dir);
    }
    if let Some(dir) = stdlib {
        session.set_stdlib_location(dir);
    }
    session
}

/// Parses `entry` plus, transitively, every file its `#include`s
/// resolve to, skipping any include name already parsed (so a diamond
/// of includes is only ever parsed once per compilation).
fn parse_transitively(session: &mut Session, entry: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let entry_name = entry
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or("entry path has no file name")?
        .to_string();
    let contents = fs::read_to_string(entry)?;
    session.parse_file(entry.to_path_buf(), entry_name.clone(), &contents);

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(entry_name.clone());
    let mut frontier = vec![entry_name];

    while let Some(name) = frontier.pop() {
        let stmts = session
            .parsed_file(&name)
            .map(|f| f.stmts.clone())
            .unwrap_or_default();
        for id in stmts {
            let include_name = match session.world.stmt(id).kind {
                StmtKind::Include { path, .. } => session.world.interner.resolve(path).to_string(),
                _ => continue,
            };
            if !seen.insert(include_name.clone()) {
                continue;
            }
            if session.full_path_from_include_name(&include_name).is_none() {
                // Unresolvable includes (e.g. a bare system header with
                // no on-disk Linxc source) are left for the C compiler
                // that eventually consumes the emitted output.
                continue;
            }
            if session.parse_include(&include_name).is_ok() {
                frontier.push(include_name);
            }
        }
    }
    Ok(())
}

fn print_diagnostics(session: &Session) {
    for file in session.parsed_files() {
        if file.errors.is_empty() {
            continue;
        }
        let src = fs::read_to_string(&file.full_path).unwrap_or_default();
        eprint!("{}", diagnostic::render_all(&file.include_name, &src, &file.errors));
    }
}

fn cmd_compile(
    entry: &Path,
    include_dirs: &[PathBuf],
    stdlib: Option<&Path>,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(entry, include_dirs, stdlib);
    parse_transitively(&mut session, entry)?;

    match session.compile(out) {
        Ok(()) => {
            println!("Compiled {} -> {}", entry.display(), out.display());
            Ok(())
        }
        Err(_) => {
            print_diagnostics(&session);
            Err("compilation failed".into())
        }
    }
}

fn cmd_check(entry: &Path, include_dirs: &[PathBuf], stdlib: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(entry, include_dirs, stdlib);
    parse_transitively(&mut session, entry)?;

    let error_count: usize = session.parsed_files().iter().map(|f| f.errors.len()).sum();
    if error_count == 0 {
        println!("Check passed");
        Ok(())
    } else {
        print_diagnostics(&session);
        Err(format!("{} error(s)", error_count).into())
    }
}
