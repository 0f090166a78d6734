//! Reserved-word lookup used while reading declaration names.
//!
//! The parsers only ask one question of a keyword table: may this word be
//! used as a declared name? Callers can supply their own table through
//! [`ParserOptions`](super::ParserOptions).

use rustc_hash::FxHashSet;

use crate::base::Language;

/// Per-language reserved-word lookup.
pub trait KeywordTable: Send + Sync {
    /// Whether `word` is reserved and cannot name a declaration.
    fn is_reserved(&self, word: &str) -> bool;
}

const CSHARP_RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const VB_RESERVED: &[&str] = &[
    "addhandler", "addressof", "alias", "and", "andalso", "as", "boolean", "byref", "byte",
    "byval", "call", "case", "catch", "cbool", "cbyte", "cchar", "cdate", "cdbl", "cdec",
    "char", "cint", "class", "clng", "cobj", "const", "continue", "csbyte", "cshort", "csng",
    "cstr", "ctype", "cuint", "culng", "cushort", "date", "decimal", "declare", "default",
    "delegate", "dim", "directcast", "do", "double", "each", "else", "elseif", "end",
    "endif", "enum", "erase", "error", "event", "exit", "false", "finally", "for", "friend",
    "function", "get", "gettype", "getxmlnamespace", "global", "gosub", "goto", "handles",
    "if", "implements", "imports", "in", "inherits", "integer", "interface", "is", "isnot",
    "let", "lib", "like", "long", "loop", "me", "mod", "module", "mustinherit",
    "mustoverride", "mybase", "myclass", "namespace", "narrowing", "new", "next", "not",
    "nothing", "notinheritable", "notoverridable", "object", "of", "on", "operator",
    "option", "optional", "or", "orelse", "overloads", "overridable", "overrides",
    "paramarray", "partial", "private", "property", "protected", "public", "raiseevent",
    "readonly", "redim", "rem", "removehandler", "resume", "return", "sbyte", "select",
    "set", "shadows", "shared", "short", "single", "static", "step", "stop", "string",
    "structure", "sub", "synclock", "then", "throw", "to", "true", "try", "trycast",
    "typeof", "uinteger", "ulong", "ushort", "using", "variant", "wend", "when", "while",
    "widening", "with", "withevents", "writeonly", "xor",
];

/// The built-in reserved-word table of a language.
///
/// C# words are case-sensitive; Visual Basic words are matched ignoring case.
#[derive(Debug, Clone)]
pub struct DefaultKeywords {
    language: Language,
    words: FxHashSet<&'static str>,
}

impl DefaultKeywords {
    pub fn new(language: Language) -> Self {
        let words = match language {
            Language::CSharp => CSHARP_RESERVED,
            Language::VisualBasic => VB_RESERVED,
        };
        Self {
            language,
            words: words.iter().copied().collect(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl KeywordTable for DefaultKeywords {
    fn is_reserved(&self, word: &str) -> bool {
        match self.language {
            Language::CSharp => self.words.contains(word),
            Language::VisualBasic => self.words.contains(word.to_ascii_lowercase().as_str()),
        }
    }
}
