//! S2K → Nastran conversion pipeline
//!
//! Reads the whole source, extracts the model, renders bulk data in memory
//! and only then touches the destination. The output file is replaced
//! atomically, so a failed run leaves any previous file untouched.

use std::fs;
use std::io::Write;
use std::path::Path;

use s2k_deck::{AreaJoints, Model};
use s2k_model::{ElementsBySection, ModelSummary, NodeIdMap, SectionPropertyMap};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::nastran::{BdfOptions, BdfWriter};

/// Converter from S2K text to Nastran bulk data
#[derive(Debug, Clone, Default)]
pub struct S2kToBdfConverter {
    options: BdfOptions,
}

impl S2kToBdfConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BdfOptions) -> Self {
        Self { options }
    }

    /// Convert S2K text to bulk data text.
    pub fn convert_str(&self, raw: &str) -> Result<String> {
        let model = Model::parse_str(raw)?;
        let (bdf, _) = self.convert_model(&model)?;
        Ok(bdf)
    }

    pub fn convert_model(&self, model: &Model) -> Result<(String, ConversionStats)> {
        let bdf = BdfWriter::new(model).with_options(self.options).render()?;
        let stats = ConversionStats::from_model(model);

        let summary = ModelSummary::from_model(model);
        if summary.duplicate_joints > 0 {
            tracing::warn!(
                duplicates = summary.duplicate_joints,
                "repeated joint ids; first definition kept"
            );
        }
        if !summary.unreferenced_joints.is_empty() {
            tracing::warn!(
                count = summary.unreferenced_joints.len(),
                "joints not used by any frame or area are still written as GRID"
            );
        }
        tracing::debug!(
            unassigned_frames = summary.unassigned_frames,
            unassigned_areas = summary.unassigned_areas,
            "elements without a section use the default property"
        );

        Ok((bdf, stats))
    }

    /// Convert `input` into `output`, replacing `output` only on success.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<ConversionStats> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let model = Model::parse_file(input)?;
        let (bdf, stats) = self.convert_model(&model)?;
        write_atomically(output, &bdf)?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            grid_points = stats.grid_points,
            bars = stats.bars,
            shells = stats.triangles + stats.quads,
            "converted S2K model to Nastran bulk data"
        );
        Ok(stats)
    }
}

/// Record counts of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub grid_points: usize,
    pub bars: usize,
    pub triangles: usize,
    pub quads: usize,
    pub property_sections: usize,
    pub element_sets: usize,
}

impl ConversionStats {
    pub fn from_model(model: &Model) -> Self {
        let triangles = model
            .areas
            .iter()
            .filter(|a| matches!(a.joints, AreaJoints::Tri(_)))
            .count();
        Self {
            grid_points: NodeIdMap::from_nodes(&model.nodes).len(),
            bars: model.beams.len(),
            triangles,
            quads: model.areas.len() - triangles,
            property_sections: SectionPropertyMap::from_model(model).len(),
            element_sets: ElementsBySection::from_model(model).len(),
        }
    }
}

fn write_atomically(path: &Path, body: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(body.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
