use std::collections::HashSet;

use s2k_deck::{AreaJoints, Model};
use serde::Serialize;

use crate::remap::{ElementsBySection, NodeIdMap, SectionPropertyMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub joint_records: usize,
    pub grid_points: usize,
    pub duplicate_joints: usize,
    pub frames: usize,
    pub frame_section_assignments: usize,
    pub unassigned_frames: usize,
    pub areas: usize,
    pub triangles: usize,
    pub quads: usize,
    pub area_section_assignments: usize,
    pub unassigned_areas: usize,
    pub property_sections: usize,
    pub element_sets: usize,
    pub unreferenced_joints: Vec<String>,
    pub undefined_joint_references: Vec<String>,
}

impl ModelSummary {
    pub fn from_model(model: &Model) -> Self {
        let node_ids = NodeIdMap::from_nodes(&model.nodes);
        let properties = SectionPropertyMap::from_model(model);
        let element_sets = ElementsBySection::from_model(model);

        let referenced: Vec<&str> = model
            .beams
            .iter()
            .flat_map(|b| [b.joint_i.as_str(), b.joint_j.as_str()])
            .chain(
                model
                    .areas
                    .iter()
                    .flat_map(|a| a.joints.as_slice().iter().map(String::as_str)),
            )
            .collect();
        let referenced_set: HashSet<&str> = referenced.iter().copied().collect();

        let unreferenced_joints = node_ids
            .iter()
            .map(|(_, node)| node.source_id.as_str())
            .filter(|id| !referenced_set.contains(id))
            .map(str::to_string)
            .collect();

        let mut seen_undefined = HashSet::new();
        let undefined_joint_references = referenced
            .iter()
            .filter(|id| node_ids.get(id).is_none() && seen_undefined.insert(**id))
            .map(|id| id.to_string())
            .collect();

        let triangles = model
            .areas
            .iter()
            .filter(|a| matches!(a.joints, AreaJoints::Tri(_)))
            .count();

        Self {
            joint_records: model.nodes.len(),
            grid_points: node_ids.len(),
            duplicate_joints: model.nodes.len() - node_ids.len(),
            frames: model.beams.len(),
            frame_section_assignments: model.beam_sections.len(),
            unassigned_frames: model
                .beams
                .iter()
                .filter(|b| model.beam_section(&b.frame_id).is_none())
                .count(),
            areas: model.areas.len(),
            triangles,
            quads: model.areas.len() - triangles,
            area_section_assignments: model.area_sections.len(),
            unassigned_areas: model
                .areas
                .iter()
                .filter(|a| model.area_section(&a.area_id).is_none())
                .count(),
            property_sections: properties.len(),
            element_sets: element_sets.len(),
            unreferenced_joints,
            undefined_joint_references,
        }
    }

    /// True when every frame and area corner resolves to a grid point.
    pub fn is_convertible(&self) -> bool {
        self.undefined_joint_references.is_empty()
    }
}
