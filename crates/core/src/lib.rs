//! Core library for genlib
//!
//! This crate implements the **Functional Core** of the genlib application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! genlib generates Python modules the first time they are referenced. The
//! project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`genlib_core`** (this crate): Pure transformation functions with zero I/O
//! - **`genlib`**: the model client, the module store and the CLI (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Prompts are byte-identical for identical inputs
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`synth`]: the generation-request pipeline
//!   - [`synth::types`]: dotted names, caller info, cached modules, naming rules
//!   - [`synth::context`]: codebase and caller context blocks
//!   - [`synth::namespace`]: namespace-only import detection
//!   - [`synth::prompt`]: system and task prompts
//!   - [`synth::extract`]: markdown fence stripping
//!   - [`synth::validate`]: Python syntax validation
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use std::collections::BTreeMap;
//! use genlib_core::synth::{build_prompt, capitalized_is_class, codebase_context, DottedName, PromptInputs};
//!
//! let name = DottedName::parse("lib.totp.generate")?;
//! let context = codebase_context(&BTreeMap::new());
//!
//! let prompt = build_prompt(&PromptInputs {
//!     name: &name,
//!     description: "Time-based one-time passwords",
//!     cached_description: None,
//!     existing_code: None,
//!     codebase_context: &context,
//!     caller_context: "",
//!     namespace_only: false,
//!     naming_rule: capitalized_is_class,
//! });
//!
//! assert!(prompt.contains("with a function named 'generate'"));
//! ```

pub mod synth;
