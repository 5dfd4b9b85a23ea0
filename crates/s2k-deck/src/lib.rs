//! Extractor for the structural records of an S2K model file.
//!
//! Only five record shapes are recognized: joint coordinates, frame
//! connectivity, frame section assignments, area connectivity and area
//! section assignments. Every other line is ignored.

mod patterns;

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;

/// A joint in global cartesian coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub source_id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A straight frame between two joints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeamConnectivity {
    pub frame_id: String,
    pub joint_i: String,
    pub joint_j: String,
}

/// Section names attached to a frame.
///
/// Only `analysis` drives property numbering; `design` is kept as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeamSection {
    pub analysis: String,
    pub design: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaJoints {
    Tri([String; 3]),
    Quad([String; 4]),
}

impl AreaJoints {
    pub fn vertex_count(&self) -> usize {
        self.as_slice().len()
    }

    pub fn as_slice(&self) -> &[String] {
        match self {
            AreaJoints::Tri(joints) => joints,
            AreaJoints::Quad(joints) => joints,
        }
    }
}

/// A triangular or quadrilateral shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaConnectivity {
    pub area_id: String,
    pub joints: AreaJoints,
}

/// Everything extracted from one S2K file.
///
/// Lists keep source line order. Section maps keep the position of the first
/// record for a key while later records overwrite its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub nodes: Vec<Node>,
    pub beams: Vec<BeamConnectivity>,
    pub beam_sections: IndexMap<String, BeamSection>,
    pub areas: Vec<AreaConnectivity>,
    pub area_sections: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message} (in `{content}`)")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
    pub content: String,
}

impl Model {
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ParseError {
            line: 0,
            message: format!("failed to read file: {e}"),
            content: path.display().to_string(),
        })?;
        Self::parse_str(&raw)
    }

    pub fn parse_str(raw: &str) -> Result<Self, ParseError> {
        let model = raw
            .lines()
            .enumerate()
            .try_fold(Model::default(), |model, (i, line)| {
                model.apply_line(i + 1, line)
            })?;

        tracing::debug!(
            nodes = model.nodes.len(),
            beams = model.beams.len(),
            beam_sections = model.beam_sections.len(),
            areas = model.areas.len(),
            area_sections = model.area_sections.len(),
            "extracted S2K model"
        );
        Ok(model)
    }

    /// Folds one source line into the model.
    ///
    /// Every record shape is tested, so a line matching several shapes
    /// contributes to each of them.
    pub fn apply_line(mut self, line_no: usize, line: &str) -> Result<Self, ParseError> {
        let fail = |message: String| ParseError {
            line: line_no,
            message,
            content: line.trim().to_string(),
        };

        if let Some(node) = patterns::joint(line).map_err(fail)? {
            self.nodes.push(node);
        }
        if let Some(beam) = patterns::frame(line) {
            self.beams.push(beam);
        }
        if let Some((frame_id, section)) = patterns::frame_section(line) {
            self.beam_sections.insert(frame_id, section);
        }
        if let Some(area) = patterns::area(line).map_err(fail)? {
            self.areas.push(area);
        }
        if let Some((area_id, section)) = patterns::area_section(line) {
            self.area_sections.insert(area_id, section);
        }

        Ok(self)
    }

    pub fn beam_section(&self, frame_id: &str) -> Option<&BeamSection> {
        self.beam_sections.get(frame_id)
    }

    pub fn area_section(&self, area_id: &str) -> Option<&str> {
        self.area_sections.get(area_id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.beams.is_empty()
            && self.beam_sections.is_empty()
            && self.areas.is_empty()
            && self.area_sections.is_empty()
    }
}

/// Parses S2K text into a [`Model`].
pub fn parse(raw: &str) -> Result<Model, ParseError> {
    Model::parse_str(raw)
}
