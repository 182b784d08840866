use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_ICON: &str = "📄";

/// Static configuration entry naming a JSON resource to load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, description: Option<&str>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.map(ToString::to_string),
            icon: icon.into(),
        }
    }
}

/// Registry used when no `--registry` file is given.
pub fn default_registry() -> Vec<FileDescriptor> {
    vec![FileDescriptor::new(
        "tasks.json",
        Some("Lista de tareas con 30 registros"),
        "📋",
    )]
}

pub fn parse_registry(text: &str) -> Result<Vec<FileDescriptor>> {
    let descriptors: Vec<FileDescriptor> =
        serde_json::from_str(text).context("registry must be a JSON array of descriptors")?;
    validate_registry(&descriptors)?;
    Ok(descriptors)
}

pub fn load_registry(path: &Path) -> Result<Vec<FileDescriptor>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read registry {}", path.display()))?;
    parse_registry(&text).with_context(|| format!("invalid registry {}", path.display()))
}

fn validate_registry(descriptors: &[FileDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, descriptor) in descriptors.iter().enumerate() {
        let name = descriptor.name.trim();
        if name.is_empty() {
            bail!("descriptor #{idx} has an empty name");
        }
        if !seen.insert(name) {
            bail!("duplicate descriptor name: {name}");
        }
    }
    Ok(())
}

pub const ADD_FILE_INSTRUCTIONS: &str = "\
To add a new JSON file:

1. Place the .json file next to the others (in the --base directory or site).
2. Open the registry file passed with --registry.
3. Append an entry:

   {
       \"name\": \"your-file.json\",
       \"description\": \"What the file contains\",
       \"icon\": \"📄\"
   }

4. Save and press Refresh.";
