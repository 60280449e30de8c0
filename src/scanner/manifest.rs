//! `package.xml` parsing.

use roxmltree::Document;

/// The parts of a package manifest discovery cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub is_metapackage: bool,
}

/// Parse a `package.xml` document.
///
/// A package is a metapackage when `<export>` contains a `<metapackage>`
/// element. Otherwise the name, the trimmed text of the root's `<name>`
/// child, must be present and non-empty.
pub fn parse_manifest(content: &str) -> Result<Manifest, String> {
    let doc = Document::parse(content).map_err(|e| format!("not well-formed XML: {}", e))?;
    let root = doc.root_element();

    let is_metapackage = root
        .children()
        .filter(|n| n.has_tag_name("export"))
        .any(|export| export.children().any(|n| n.has_tag_name("metapackage")));

    let name = root
        .children()
        .find(|n| n.has_tag_name("name"))
        .and_then(|n| n.text())
        .unwrap_or("")
        .trim();

    // Metapackages may omit <name>
    if is_metapackage {
        return Ok(Manifest {
            name: name.to_string(),
            is_metapackage,
        });
    }

    if root.children().all(|n| !n.has_tag_name("name")) {
        return Err("missing <name> element".to_string());
    }
    if name.is_empty() {
        return Err("empty <name> element".to_string());
    }

    Ok(Manifest {
        name: name.to_string(),
        is_metapackage,
    })
}
