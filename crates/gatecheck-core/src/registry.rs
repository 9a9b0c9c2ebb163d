//! The gate registry: the static, ordered collection of configured gates.
//!
//! Built once at startup from a TOML file or the builtin cargo chain,
//! validated up front, and read-only afterwards. Order is significant
//! and preserved exactly as declared - it encodes the intended
//! cheap-checks-first convention, which the registry does not enforce.

use crate::error::{GatecheckError, Result};
use crate::gate::{BuiltinGate, Gate};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Ordered, validated, immutable list of gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRegistry {
    gates: Vec<Gate>,
}

/// On-disk config shape: a sequence of `[[gate]]` tables.
#[derive(Debug, Deserialize)]
struct GateFile {
    #[serde(default, rename = "gate")]
    gates: Vec<Gate>,
}

impl GateRegistry {
    /// Build a registry from an ordered gate list.
    ///
    /// Fails if any gate has an empty name or command, or if two gates
    /// share a name, regardless of where in the list the duplicate sits.
    pub fn from_gates(gates: Vec<Gate>) -> Result<Self> {
        let mut seen = HashSet::new();
        for gate in &gates {
            if gate.name.trim().is_empty() {
                return Err(GatecheckError::EmptyGateName);
            }
            if gate.command.trim().is_empty() {
                return Err(GatecheckError::EmptyGateCommand {
                    gate: gate.name.clone(),
                });
            }
            if !seen.insert(gate.name.as_str()) {
                return Err(GatecheckError::DuplicateGate {
                    name: gate.name.clone(),
                });
            }
        }
        Ok(Self { gates })
    }

    /// Parse a registry from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: GateFile = toml::from_str(text)?;
        Self::from_gates(file.gates)
    }

    /// Load a registry from a TOML file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GatecheckError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The default cargo gate chain: fmt, check, clippy, test, doc.
    pub fn builtin() -> Self {
        // Static and known-valid, so no validation pass.
        Self {
            gates: vec![
                BuiltinGate::CargoFmt.gate(),
                BuiltinGate::CargoCheck.gate(),
                BuiltinGate::CargoClippy.gate(),
                BuiltinGate::CargoTest.gate(),
                BuiltinGate::CargoDoc.gate(),
            ],
        }
    }

    /// The gates in declaration order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn gate(name: &str) -> Gate {
        Gate::new(name, "echo", [name])
    }

    #[test]
    fn test_from_gates_preserves_order() {
        let registry =
            GateRegistry::from_gates(vec![gate("fmt"), gate("test"), gate("lint")]).unwrap();

        let names: Vec<_> = registry.gates().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["fmt", "test", "lint"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_empty_registry_allowed() {
        let registry = GateRegistry::from_gates(vec![]).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err =
            GateRegistry::from_gates(vec![gate("fmt"), gate("test"), gate("fmt")]).unwrap_err();
        assert!(matches!(err, GatecheckError::DuplicateGate { name } if name == "fmt"));
    }

    #[test]
    fn test_duplicate_name_rejected_at_any_position() {
        // Adjacent duplicate at the front
        let err = GateRegistry::from_gates(vec![gate("a"), gate("a"), gate("b")]).unwrap_err();
        assert!(matches!(err, GatecheckError::DuplicateGate { name } if name == "a"));

        // Duplicate at the tail of a longer list
        let err = GateRegistry::from_gates(vec![
            gate("a"),
            gate("b"),
            gate("c"),
            gate("d"),
            gate("b"),
        ])
        .unwrap_err();
        assert!(matches!(err, GatecheckError::DuplicateGate { name } if name == "b"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = GateRegistry::from_gates(vec![Gate::new("  ", "echo", ["hi"])]).unwrap_err();
        assert!(matches!(err, GatecheckError::EmptyGateName));
    }

    #[test]
    fn test_empty_command_rejected() {
        let err =
            GateRegistry::from_gates(vec![Gate::new("fmt", "", Vec::<String>::new())]).unwrap_err();
        assert!(matches!(err, GatecheckError::EmptyGateCommand { gate } if gate == "fmt"));
    }

    #[test]
    fn test_from_toml_str() {
        let text = r#"
            [[gate]]
            name = "fmt"
            command = "black"
            args = ["--check", "."]

            [[gate]]
            name = "types"
            command = "mypy"
            working_dir = "src"
        "#;

        let registry = GateRegistry::from_toml_str(text).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.gates()[0].name, "fmt");
        assert_eq!(registry.gates()[0].args, vec!["--check", "."]);
        assert!(registry.gates()[0].working_dir.is_none());
        assert_eq!(registry.gates()[1].working_dir, Some(PathBuf::from("src")));
    }

    #[test]
    fn test_from_toml_str_missing_command_rejected() {
        let text = r#"
            [[gate]]
            name = "fmt"
        "#;

        let err = GateRegistry::from_toml_str(text).unwrap_err();
        assert!(matches!(err, GatecheckError::ConfigParse(_)));
    }

    #[test]
    fn test_from_toml_str_empty_file_is_empty_registry() {
        let registry = GateRegistry::from_toml_str("").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_is_idempotent() {
        let text = r#"
            [[gate]]
            name = "fmt"
            command = "cargo"
            args = ["fmt", "--check"]

            [[gate]]
            name = "test"
            command = "cargo"
            args = ["test"]
        "#;

        let first = GateRegistry::from_toml_str(text).unwrap();
        let second = GateRegistry::from_toml_str(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gates.toml");
        std::fs::write(
            &path,
            "[[gate]]\nname = \"fmt\"\ncommand = \"cargo\"\nargs = [\"fmt\"]\n",
        )
        .unwrap();

        let registry = GateRegistry::from_path(&path).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.gates()[0].name, "fmt");
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GateRegistry::from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, GatecheckError::ConfigRead { .. }));
    }

    #[test]
    fn test_builtin_order() {
        let registry = GateRegistry::builtin();
        let names: Vec<_> = registry.gates().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["cargo_fmt", "cargo_check", "cargo_clippy", "cargo_test", "cargo_doc"]
        );
    }
}
