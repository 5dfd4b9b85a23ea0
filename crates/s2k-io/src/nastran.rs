//! Nastran bulk data writer
//!
//! Renders an extracted S2K model as free-field bulk data records:
//!
//! - `GRID` per joint, renumbered densely from 1 in first-seen order
//! - `CBAR` per frame, keeping the frame id
//! - `CTRIA3` / `CQUAD4` per area, keeping the area id
//! - one `SET` block per area section label
//!
//! The whole document is built in memory, so a failure never leaves a
//! partially written file behind.

use std::fmt::Write;

use s2k_deck::{AreaJoints, Model};
use s2k_model::{ElementsBySection, NodeIdMap, SectionLookup, SectionPropertyMap};

use crate::error::{ElementKind, IoError, Result};

/// Formatting knobs for bulk data output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BdfOptions {
    /// Digits after the decimal point in GRID coordinates
    pub coordinate_precision: usize,
    /// Element ids per line in SET blocks
    pub ids_per_line: usize,
}

impl Default for BdfOptions {
    fn default() -> Self {
        Self {
            coordinate_precision: 6,
            ids_per_line: 10,
        }
    }
}

const SET_CONTINUATION_INDENT: &str = "        ";

/// Bulk data writer for one model
pub struct BdfWriter<'a> {
    model: &'a Model,
    options: BdfOptions,
}

impl<'a> BdfWriter<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            options: BdfOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BdfOptions) -> Self {
        self.options = options;
        self
    }

    /// Render nodes, bars, shells and element sets, in that order.
    pub fn render(&self) -> Result<String> {
        let node_ids = NodeIdMap::from_nodes(&self.model.nodes);
        let properties = SectionPropertyMap::from_model(self.model);
        let element_sets = ElementsBySection::from_model(self.model);

        let mut out = String::new();
        self.write_grids(&mut out, &node_ids)?;
        self.write_bars(&mut out, &node_ids, &properties)?;
        self.write_shells(&mut out, &node_ids, &properties)?;
        self.write_sets(&mut out, &element_sets)?;
        Ok(out)
    }

    fn write_grids(&self, out: &mut String, node_ids: &NodeIdMap<'_>) -> Result<()> {
        let precision = self.options.coordinate_precision;
        writeln!(out, "$ Nodes in Nastran format")?;
        for (id, node) in node_ids.iter() {
            writeln!(
                out,
                "GRID,{id},,{:.p$},{:.p$},{:.p$}",
                node.x,
                node.y,
                node.z,
                p = precision
            )?;
        }
        Ok(())
    }

    fn write_bars(
        &self,
        out: &mut String,
        node_ids: &NodeIdMap<'_>,
        properties: &SectionPropertyMap<'_>,
    ) -> Result<()> {
        writeln!(out, "$ Beams in Nastran format")?;
        for beam in &self.model.beams {
            let resolve = |joint: &str| grid_id(node_ids, ElementKind::Frame, &beam.frame_id, joint);
            let node_i = resolve(&beam.joint_i)?;
            let node_j = resolve(&beam.joint_j)?;
            let pid = SectionLookup::for_beam(self.model, &beam.frame_id).property_id(properties);
            writeln!(out, "CBAR,{},{pid},{node_i},{node_j}", beam.frame_id)?;
        }
        Ok(())
    }

    fn write_shells(
        &self,
        out: &mut String,
        node_ids: &NodeIdMap<'_>,
        properties: &SectionPropertyMap<'_>,
    ) -> Result<()> {
        writeln!(out, "$ Areas in Nastran format")?;
        for area in &self.model.areas {
            let resolve = |joint: &str| grid_id(node_ids, ElementKind::Area, &area.area_id, joint);
            let pid = SectionLookup::for_area(self.model, &area.area_id).property_id(properties);
            match &area.joints {
                AreaJoints::Tri([a, b, c]) => {
                    let (n1, n2, n3) = (resolve(a)?, resolve(b)?, resolve(c)?);
                    writeln!(out, "CTRIA3,{},{pid},{n1},{n2},{n3}", area.area_id)?;
                }
                AreaJoints::Quad([a, b, c, d]) => {
                    let (n1, n2, n3, n4) = (resolve(a)?, resolve(b)?, resolve(c)?, resolve(d)?);
                    writeln!(out, "CQUAD4,{},{pid},{n1},{n2},{n3},{n4}", area.area_id)?;
                }
            }
        }
        Ok(())
    }

    fn write_sets(&self, out: &mut String, element_sets: &ElementsBySection<'_>) -> Result<()> {
        let per_line = self.options.ids_per_line.max(1);
        writeln!(out, "$ Element Sets in Nastran format")?;
        for (set_id, (label, ids)) in (1..).zip(element_sets.iter()) {
            writeln!(out, "$ *set name = Section=\"{label}\"")?;
            write!(out, "SET {set_id} = ")?;
            for (row, chunk) in ids.chunks(per_line).enumerate() {
                if row > 0 {
                    // A trailing comma continues the list on the next line.
                    write!(out, ",\n{SET_CONTINUATION_INDENT}")?;
                }
                write!(out, "{}", chunk.join(","))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

fn grid_id(
    node_ids: &NodeIdMap<'_>,
    element_kind: ElementKind,
    element_id: &str,
    joint: &str,
) -> Result<u32> {
    node_ids
        .get(joint)
        .ok_or_else(|| IoError::UnresolvedReference {
            element_kind,
            element_id: element_id.to_string(),
            joint: joint.to_string(),
        })
}

/// Renders a model as bulk data text with default options.
pub fn render(model: &Model) -> Result<String> {
    BdfWriter::new(model).render()
}
