// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Supported code.golf languages.
//!
//! Every language identifier that code.golf hands out in its export maps to
//! a display name and the file extension that solutions written in it are
//! stored under. The table is closed: an identifier missing from it cannot
//! be mirrored.

/// A code.golf language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Identifier used by code.golf, e.g., "c-sharp".
    pub id: &'static str,

    /// Human readable name, e.g., "C#".
    pub name: &'static str,

    /// File extension without the leading dot.
    pub extension: &'static str,
}

impl Language {
    /// Look up language by its code.golf identifier.
    ///
    /// Identifiers are case-sensitive.
    pub fn lookup(id: impl AsRef<str>) -> Option<&'static Language> {
        LANGUAGES.iter().find(|language| language.id == id.as_ref())
    }

    /// Every known language.
    pub fn all() -> &'static [Language] {
        LANGUAGES
    }
}

macro_rules! languages {
    ($(($id:literal, $name:literal, $ext:literal)),* $(,)?) => {
        &[$(Language { id: $id, name: $name, extension: $ext }),*]
    };
}

static LANGUAGES: &[Language] = languages![
    ("fish", "><>", "fish"),
    ("assembly", "Assembly", "asm"),
    ("awk", "AWK", "awk"),
    ("bash", "Bash", "sh"),
    ("basic", "BASIC", "bas"),
    ("Berry", "Berry", "brr"),
    ("brainfuck", "Brainfuck", "bf"),
    ("c", "C", "c"),
    ("c-sharp", "C#", "cs"),
    ("cpp", "C++", "cpp"),
    ("cobol", "COBOL", "cob"),
    ("crystal", "Crystal", "cr"),
    ("d", "D", "d"),
    ("dart", "Dart", "dart"),
    ("elixir", "Elixir", "ex"),
    ("f-sharp", "F#", "fs"),
    ("factor", "Factor", "factor"),
    ("forth", "Forth", "fth"),
    ("fortran", "Fortran", "f"),
    ("go", "Go", "go"),
    ("golfscript", "GolfScript", "gs"),
    ("haskell", "Haskell", "hs"),
    ("hexagony", "Hexagony", "hxg"),
    ("j", "J", "ijs"),
    ("janet", "Janet", "janet"),
    ("java", "Java", "java"),
    ("javascript", "JavaScript", "js"),
    ("julia", "Julia", "jl"),
    ("k", "K", "k"),
    ("lisp", "Lisp", "lsp"),
    ("lua", "Lua", "lua"),
    ("nim", "Nim", "nim"),
    ("ocaml", "OCaml", "ml"),
    ("pascal", "Pascal", "pas"),
    ("perl", "Perl", "pl"),
    ("php", "PHP", "php"),
    ("powershell", "PowerShell", "ps1"),
    ("prolog", "Prolog", "pl"),
    ("python", "Python", "py"),
    ("r", "R", "r"),
    ("raku", "Raku", "raku"),
    ("ruby", "Ruby", "rb"),
    ("rust", "Rust", "rs"),
    ("sed", "sed", "sed"),
    ("sql", "SQL", "sql"),
    ("swift", "Swift", "swift"),
    ("tcl", "Tcl", "tcl"),
    ("tex", "TeX", "tex"),
    ("v", "V", "v"),
    ("viml", "VimL", "vim"),
    ("wren", "Wren", "wren"),
    ("zig", "Zig", "zig"),
];
