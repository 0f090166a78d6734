//! # arranger-base
//!
//! Core library for parsing C# and Visual Basic source into element trees
//! and rearranging those trees by rule.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project    → parallel arrangement of many files
//!   ↓
//! arrange    → filter / group / sort engine
//!   ↓
//! config     → rule tree, reference resolution
//!   ↓
//! condition  → FilterBy expression language
//!   ↓
//! parser     → scanner, C# and Visual Basic element parsers
//!   ↓
//! elements   → CodeElement tree
//!   ↓
//! base       → Position, Span, Language
//! ```
//!
//! ## Example
//!
//! ```rust
//! use arranger::{ArrangeConfiguration, Arranger, FileContext, parse_csharp};
//!
//! let tree = parse_csharp("class B { }\nclass A { }\n").unwrap();
//! let arranger = Arranger::new(&ArrangeConfiguration::standard()).unwrap();
//! let arranged = arranger.arrange(&tree, &FileContext::new("Sample.cs"));
//! assert_eq!(arranged[0].name, "A");
//! ```

// ============================================================================
// MODULES (dependency order: base → elements → parser → condition → config
//          → arrange → project)
// ============================================================================

/// Foundation types: Position, Span, Language
pub mod base;

/// The CodeElement tree shared by the parsers and the arranger
pub mod elements;

/// Scanner and per-language element parsers
pub mod parser;

/// Condition expressions for FilterBy
pub mod condition;

/// Arrangement configuration and reference resolution
pub mod config;

/// The arrangement engine
pub mod arrange;

/// Parallel arrangement of many files
pub mod project;

mod error;

pub use arrange::Arranger;
pub use base::{Language, Position, Span};
pub use condition::{Condition, FileContext};
pub use config::{ArrangeConfiguration, ConfigurationError};
pub use elements::{CodeElement, ElementKind, ElementType};
pub use error::{Error, Result};
pub use parser::{ParserOptions, SyntaxError, parse_csharp, parse_source, parse_vb};
