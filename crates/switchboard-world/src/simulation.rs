//! Simulation topology: panels and the neighbour graph between them.
//!
//! A [`Simulation`] is owned by the world model and only read by the
//! directory. The neighbour relation is stored directed, exactly as the
//! definition gives it; [`Simulation::panels_adjacent_to`] answers the
//! reverse question ("which panels list this one as a neighbour?") that
//! speed-dial construction needs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use switchboard_types::{PanelId, SimId};

use crate::error::WorldError;

/// A reference from one panel to an adjacent panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighbour {
    /// The adjacent panel.
    pub panel_id: PanelId,
}

/// A fixed signalling position within a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Panel id, unique within its simulation.
    pub id: PanelId,
    /// Human-readable panel name, used as the panel phone's display name.
    pub name: String,
    /// Panels this panel is adjacent to.
    #[serde(default)]
    pub neighbours: Vec<Neighbour>,
}

impl Panel {
    /// Create a panel with no neighbours.
    pub fn new(id: impl Into<PanelId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            neighbours: Vec::new(),
        }
    }

    /// Add a neighbour reference, builder style.
    #[must_use]
    pub fn with_neighbour(mut self, panel_id: impl Into<PanelId>) -> Self {
        self.neighbours.push(Neighbour {
            panel_id: panel_id.into(),
        });
        self
    }

    /// Whether this panel lists `panel` among its neighbours.
    pub fn references(&self, panel: &PanelId) -> bool {
        self.neighbours.iter().any(|n| &n.panel_id == panel)
    }
}

/// One instance of the simulated signalling environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    /// Simulation id.
    pub id: SimId,
    /// Human-readable simulation name.
    #[serde(default)]
    pub name: String,
    /// Panels in definition order.
    #[serde(default)]
    pub panels: Vec<Panel>,
}

impl Simulation {
    /// Create an empty simulation.
    pub fn new(id: impl Into<SimId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            panels: Vec::new(),
        }
    }

    /// Append a panel, builder style.
    #[must_use]
    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    /// Look up a panel by id.
    pub fn panel(&self, id: &PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| &p.id == id)
    }

    /// Return the number of panels in the simulation.
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Every panel whose neighbour list references `panel`, in panel order.
    pub fn panels_adjacent_to<'a>(
        &'a self,
        panel: &'a PanelId,
    ) -> impl Iterator<Item = &'a Panel> + 'a {
        self.panels.iter().filter(move |p| p.references(panel))
    }

    /// Check the topology for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptySimulationId`] for a blank id,
    /// [`WorldError::DuplicatePanel`] if two panels share an id, or
    /// [`WorldError::UnknownNeighbour`] if a neighbour reference points
    /// outside the simulation.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.id.as_str().trim().is_empty() {
            return Err(WorldError::EmptySimulationId);
        }

        let mut seen = BTreeSet::new();
        for panel in &self.panels {
            if !seen.insert(&panel.id) {
                return Err(WorldError::DuplicatePanel {
                    sim: self.id.clone(),
                    panel: panel.id.clone(),
                });
            }
        }

        for panel in &self.panels {
            if let Some(missing) = panel
                .neighbours
                .iter()
                .find(|n| !seen.contains(&n.panel_id))
            {
                return Err(WorldError::UnknownNeighbour {
                    sim: self.id.clone(),
                    panel: panel.id.clone(),
                    neighbour: missing.panel_id.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_panel_sim() -> Simulation {
        Simulation::new("S1", "Test")
            .with_panel(Panel::new("P1", "One").with_neighbour("P2"))
            .with_panel(Panel::new("P2", "Two").with_neighbour("P1"))
            .with_panel(Panel::new("P3", "Three"))
    }

    #[test]
    fn adjacency_follows_references() {
        let sim = three_panel_sim();
        let p1 = PanelId::from("P1");
        let adjacent: Vec<&str> = sim.panels_adjacent_to(&p1).map(|p| p.id.as_str()).collect();
        assert_eq!(adjacent, vec!["P2"]);

        let p3 = PanelId::from("P3");
        assert_eq!(sim.panels_adjacent_to(&p3).count(), 0);
    }

    #[test]
    fn adjacency_is_looked_up_in_reverse() {
        // P1 lists P2, P2 lists nothing: asking about P2 finds P1.
        let sim = Simulation::new("S1", "Test")
            .with_panel(Panel::new("P1", "One").with_neighbour("P2"))
            .with_panel(Panel::new("P2", "Two"));
        let p2 = PanelId::from("P2");
        let adjacent: Vec<&str> = sim.panels_adjacent_to(&p2).map(|p| p.id.as_str()).collect();
        assert_eq!(adjacent, vec!["P1"]);
        let p1 = PanelId::from("P1");
        assert_eq!(sim.panels_adjacent_to(&p1).count(), 0);
    }

    #[test]
    fn valid_topology_passes() {
        assert!(three_panel_sim().validate().is_ok());
    }

    #[test]
    fn duplicate_panel_rejected() {
        let sim = Simulation::new("S1", "Test")
            .with_panel(Panel::new("P1", "One"))
            .with_panel(Panel::new("P1", "Again"));
        assert!(matches!(
            sim.validate(),
            Err(WorldError::DuplicatePanel { .. })
        ));
    }

    #[test]
    fn dangling_neighbour_rejected() {
        let sim = Simulation::new("S1", "Test").with_panel(Panel::new("P1", "One").with_neighbour("P9"));
        assert!(matches!(
            sim.validate(),
            Err(WorldError::UnknownNeighbour { ref neighbour, .. }) if neighbour.as_str() == "P9"
        ));
    }

    #[test]
    fn blank_id_rejected() {
        let sim = Simulation::new("  ", "Blank");
        assert!(matches!(sim.validate(), Err(WorldError::EmptySimulationId)));
    }

    #[test]
    fn panel_lookup() {
        let sim = three_panel_sim();
        assert_eq!(sim.panel(&PanelId::from("P2")).map(|p| p.name.as_str()), Some("Two"));
        assert!(sim.panel(&PanelId::from("P9")).is_none());
        assert_eq!(sim.panel_count(), 3);
    }

    #[test]
    fn neighbour_json_uses_panel_id_key() {
        let panel = Panel::new("A", "Alpha").with_neighbour("B");
        let value = serde_json::to_value(&panel).unwrap_or_default();
        assert_eq!(value["neighbours"][0]["panelId"], "B");
    }
}
