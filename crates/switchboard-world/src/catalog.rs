//! Loading simulation definitions from YAML files.
//!
//! Each file in the simulations directory describes one [`Simulation`].
//! Files are read in file-name order so that phone roster order is stable
//! between restarts. Every definition is validated before it is returned.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::WorldError;
use crate::simulation::Simulation;

/// Parse and validate one simulation definition.
///
/// `origin` is only used to label errors.
///
/// # Errors
///
/// Returns [`WorldError::Yaml`] on malformed input, or any validation
/// error from [`Simulation::validate`].
pub fn parse_simulation(yaml: &str, origin: &Path) -> Result<Simulation, WorldError> {
    let sim: Simulation = serde_yml::from_str(yaml).map_err(|source| WorldError::Yaml {
        path: origin.to_path_buf(),
        source,
    })?;
    sim.validate()?;
    Ok(sim)
}

/// Read, parse, and validate the simulation definition at `path`.
///
/// # Errors
///
/// Returns [`WorldError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_simulation`].
pub fn load_simulation_file(path: &Path) -> Result<Simulation, WorldError> {
    let contents = std::fs::read_to_string(path).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sim = parse_simulation(&contents, path)?;
    debug!(
        sim = %sim.id,
        panels = sim.panel_count(),
        path = %path.display(),
        "Simulation definition loaded"
    );
    Ok(sim)
}

/// Load every `*.yaml` / `*.yml` simulation definition in `dir`.
///
/// # Errors
///
/// Returns [`WorldError::Io`] if the directory cannot be listed,
/// [`WorldError::DuplicateSimulation`] if two files share a sim id, or
/// the first per-file error encountered.
pub fn load_simulation_dir(dir: &Path) -> Result<Vec<Simulation>, WorldError> {
    let io_err = |source| WorldError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_yaml(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut seen = BTreeSet::new();
    let mut sims = Vec::with_capacity(paths.len());
    for path in &paths {
        let sim = load_simulation_file(path)?;
        if !seen.insert(sim.id.clone()) {
            return Err(WorldError::DuplicateSimulation(sim.id));
        }
        sims.push(sim);
    }

    info!(
        dir = %dir.display(),
        simulations = sims.len(),
        "Simulation catalog loaded"
    );
    Ok(sims)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PANELS: &str = r"
id: S1
name: Example
panels:
  - id: A
    name: Alpha Panel
    neighbours:
      - panelId: B
  - id: B
    name: Bravo Panel
    neighbours:
      - panelId: A
";

    /// A scratch directory under the system temp dir, removed on drop.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(label: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "switchboard-catalog-{label}-{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);
            let _ = std::fs::create_dir_all(&dir);
            Self(dir)
        }

        fn write(&self, name: &str, contents: &str) {
            let _ = std::fs::write(self.0.join(name), contents);
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn parses_definition() {
        let sim = parse_simulation(TWO_PANELS, Path::new("inline"));
        assert!(sim.is_ok());
        let sim = sim.unwrap_or_else(|_| Simulation::new("x", "x"));
        assert_eq!(sim.id.as_str(), "S1");
        assert_eq!(sim.panel_count(), 2);
        assert_eq!(sim.panels.first().map(|p| p.name.as_str()), Some("Alpha Panel"));
    }

    #[test]
    fn invalid_topology_is_rejected_on_parse() {
        let yaml = "id: S1\npanels:\n  - id: A\n    name: A\n    neighbours:\n      - panelId: Z\n";
        assert!(matches!(
            parse_simulation(yaml, Path::new("inline")),
            Err(WorldError::UnknownNeighbour { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        assert!(matches!(
            parse_simulation("id: [unclosed", Path::new("inline")),
            Err(WorldError::Yaml { .. })
        ));
    }

    #[test]
    fn directory_load_is_sorted_and_filtered() {
        let scratch = ScratchDir::new("sorted");
        scratch.write("b.yaml", "id: S2\nname: Second\n");
        scratch.write("a.yml", TWO_PANELS);
        scratch.write("notes.txt", "not a sim");

        let sims = load_simulation_dir(&scratch.0).unwrap_or_default();
        let ids: Vec<&str> = sims.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2"]);
    }

    #[test]
    fn duplicate_sim_ids_across_files_rejected() {
        let scratch = ScratchDir::new("dupe");
        scratch.write("a.yaml", TWO_PANELS);
        scratch.write("b.yaml", TWO_PANELS);

        assert!(matches!(
            load_simulation_dir(&scratch.0),
            Err(WorldError::DuplicateSimulation(_))
        ));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let missing = std::env::temp_dir().join("switchboard-catalog-does-not-exist");
        assert!(matches!(
            load_simulation_dir(&missing),
            Err(WorldError::Io { .. })
        ));
    }
}
