use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sgp4::Elements;

use crate::catalog::error::CatalogError;
use crate::catalog::store::{CatalogEntry, CatalogSnapshot};
use crate::catalog::types::{CatalogFile, CatalogRecord, ObjectCategory, OrbitalObject};
use crate::orbit::{OrbitalElements, Propagator};

/// Builds catalog snapshots from a YAML catalog file and/or a folder of TLE files.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    catalog_file: Option<PathBuf>,
    tle_folder: Option<PathBuf>,
}

impl CatalogLoader {
    pub fn new(catalog_file: Option<PathBuf>, tle_folder: Option<PathBuf>) -> Self {
        Self {
            catalog_file,
            tle_folder,
        }
    }

    /// Load every configured source. Catalog file entries win over TLE folder entries.
    pub fn load(&self) -> Result<CatalogSnapshot, CatalogError> {
        let mut entries = BTreeMap::new();

        if let Some(folder) = &self.tle_folder {
            for entry in self.load_tle_folder(folder)? {
                entries.insert(entry.object.id.clone(), entry);
            }
        }

        if let Some(file) = &self.catalog_file {
            for entry in load_catalog_file(file)? {
                if entries.contains_key(&entry.object.id) {
                    log::debug!("Catalog file overrides TLE entry {}", entry.object.id);
                }
                entries.insert(entry.object.id.clone(), entry);
            }
        }

        log::info!("Loaded {} catalog objects", entries.len());
        Ok(CatalogSnapshot::new(entries))
    }

    fn load_tle_folder(&self, folder: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
        if !folder.exists() {
            return Err(CatalogError::DirectoryNotFound(folder.display().to_string()));
        }

        let mut results = Vec::new();
        for entry in fs::read_dir(folder)? {
            let path = entry?.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == "tle" || ext == "txt" {
                        match parse_tle_file(&path) {
                            Ok(entries) => results.extend(entries),
                            Err(e) => {
                                log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                            }
                        }
                    }
                }
            }
        }

        Ok(results)
    }
}

fn load_catalog_file(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let content = fs::read_to_string(path)?;
    parse_catalog(&content, &path.display().to_string())
}

pub fn parse_catalog(content: &str, source: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let file: CatalogFile =
        serde_yaml::from_str(content).map_err(|e| CatalogError::InvalidCatalog {
            file: source.to_string(),
            message: e.to_string(),
        })?;

    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::with_capacity(file.objects.len());
    for record in file.objects {
        if !seen.insert(record.id.clone()) {
            return Err(CatalogError::DuplicateId(record.id));
        }
        entries.push(entry_from_record(record)?);
    }
    Ok(entries)
}

pub fn entry_from_record(record: CatalogRecord) -> Result<CatalogEntry, CatalogError> {
    let propagator =
        Propagator::compile(&record.elements).map_err(|source| CatalogError::InvalidElements {
            id: record.id.clone(),
            source,
        })?;

    Ok(CatalogEntry {
        object: OrbitalObject {
            id: record.id,
            name: record.name,
            category: record.category,
            launch_date: record.launch_date,
            operator: record.operator,
            elements: record.elements,
            orbit: propagator.summary(),
        },
        propagator,
    })
}

/// Parse a single TLE file (may contain multiple satellites)
fn parse_tle_file(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    parse_tle_content(&content, &filename)
}

pub fn parse_tle_content(content: &str, filename: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let invalid = |message: String| CatalogError::InvalidTle {
        file: filename.to_string(),
        message,
    };

    let mut results = Vec::new();
    for (name, line1, line2) in parse_multi_tle(content) {
        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
            .map_err(|e| invalid(e.to_string()))?;
        let id = elements.norad_id.to_string();
        let name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
        let propagator = Propagator::from_sgp4(elements).map_err(|e| invalid(e.to_string()))?;

        results.push(CatalogEntry {
            object: OrbitalObject {
                id,
                name,
                category: ObjectCategory::Unknown,
                launch_date: None,
                operator: None,
                elements: OrbitalElements::Tle { line1, line2 },
                orbit: propagator.summary(),
            },
            propagator,
        });
    }

    Ok(results)
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // name line first
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{HST_LINE1, HST_LINE2, ISS_LINE1, ISS_LINE2};

    #[test]
    fn parses_two_and_three_line_sets() {
        let content = format!("ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n\n{HST_LINE1}\n{HST_LINE2}\n");
        let entries = parse_tle_content(&content, "stations.tle").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].object.id, "25544");
        assert_eq!(entries[0].object.name, "ISS (ZARYA)");
        assert_eq!(entries[1].object.name, "NORAD 20580");
        assert_eq!(entries[1].object.category, ObjectCategory::Unknown);
    }

    #[test]
    fn skips_unrecognized_lines() {
        let content = format!("# comment\nrandom\n{ISS_LINE1}\n{ISS_LINE2}\n");
        let entries = parse_tle_content(&content, "x.tle").unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn parses_catalog_yaml() {
        let yaml = format!(
            r#"
objects:
  - id: "25544"
    name: International Space Station
    category: human_spaceflight
    launch_date: 1998-11-20
    operator: NASA/Roscosmos
    elements:
      kind: tle
      line1: "{ISS_LINE1}"
      line2: "{ISS_LINE2}"
  - id: demo-1
    name: Demo Sat
    elements:
      kind: kepler
      epoch: 2024-01-01T00:00:00Z
      inclination_deg: 45.0
      period_minutes: 95.0
      node_longitude_deg: 0.0
"#
        );
        let entries = parse_catalog(&yaml, "catalog.yaml").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].object.category, ObjectCategory::HumanSpaceflight);
        assert_eq!(entries[0].object.operator.as_deref(), Some("NASA/Roscosmos"));
        assert_eq!(entries[1].object.category, ObjectCategory::Unknown);
        assert!((entries[1].object.orbit.period_minutes - 95.0).abs() < 1e-9);
    }

    #[test]
    fn shipped_demo_catalog_parses() {
        let entries = parse_catalog(include_str!("../../demos/catalog.yaml"), "demo").unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().any(|e| e.object.id == "demo-polar"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let yaml = r#"
objects:
  - id: a
    name: A
    elements: { kind: kepler, epoch: "2024-01-01T00:00:00Z", inclination_deg: 10, period_minutes: 100, node_longitude_deg: 0 }
  - id: a
    name: A again
    elements: { kind: kepler, epoch: "2024-01-01T00:00:00Z", inclination_deg: 10, period_minutes: 100, node_longitude_deg: 0 }
"#;
        assert!(matches!(
            parse_catalog(yaml, "dup.yaml"),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn loads_folder_and_file_with_file_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let tle_dir = dir.path().join("tle");
        fs::create_dir(&tle_dir).unwrap();
        fs::write(
            tle_dir.join("stations.tle"),
            format!("ISS\n{ISS_LINE1}\n{ISS_LINE2}\n{HST_LINE1}\n{HST_LINE2}\n"),
        )
        .unwrap();
        fs::write(tle_dir.join("broken.tle"), "1 nope\n2 nope\n").unwrap();
        fs::write(tle_dir.join("notes.md"), "ignored").unwrap();

        let catalog_path = dir.path().join("catalog.yaml");
        fs::write(
            &catalog_path,
            format!(
                "objects:\n  - id: \"25544\"\n    name: Space Station\n    elements:\n      kind: tle\n      line1: \"{ISS_LINE1}\"\n      line2: \"{ISS_LINE2}\"\n"
            ),
        )
        .unwrap();

        let loader = CatalogLoader::new(Some(catalog_path), Some(tle_dir));
        let snapshot = loader.load().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("25544").unwrap().object.name, "Space Station");
        assert!(snapshot.get("20580").is_some());
    }

    #[test]
    fn missing_folder_is_an_error() {
        let loader = CatalogLoader::new(None, Some(PathBuf::from("/definitely/not/here")));
        assert!(matches!(
            loader.load(),
            Err(CatalogError::DirectoryNotFound(_))
        ));
    }
}
