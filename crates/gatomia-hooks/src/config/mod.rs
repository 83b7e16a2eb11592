//! Hook configuration loading and validation
//!
//! Hook files are YAML documents with a top-level `hooks:` list in the persisted
//! camelCase shape. Every hook is validated on load; scope hints are reported
//! separately and never reject a hook.

pub mod loader;
pub mod validator;

pub use loader::ConfigLoader;
pub use validator::HookValidator;
