//! Identifier tables built from an extracted model before writing bulk data.

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use s2k_deck::{Model, Node};

/// Label used for frames and areas without a section assignment.
pub const UNASSIGNED_SECTION: &str = "Unknown";

/// Property id used for frames and areas without a numbered section.
pub const DEFAULT_PROPERTY_ID: u32 = 1;

/// Dense 1-based grid ids in first-seen joint order.
///
/// A joint id that appears twice keeps its first position and coordinates.
#[derive(Debug, Clone, Default)]
pub struct NodeIdMap<'a> {
    entries: IndexMap<&'a str, &'a Node>,
}

impl<'a> NodeIdMap<'a> {
    pub fn from_nodes(nodes: &'a [Node]) -> Self {
        let mut entries = IndexMap::with_capacity(nodes.len());
        for node in nodes {
            entries.entry(node.source_id.as_str()).or_insert(node);
        }
        Self { entries }
    }

    pub fn get(&self, source_id: &str) -> Option<u32> {
        self.entries.get_index_of(source_id).map(to_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grid id and node, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &'a Node)> + '_ {
        self.entries
            .values()
            .enumerate()
            .map(|(index, node)| (to_id(index), *node))
    }
}

/// Dense 1-based property ids per section name.
///
/// Names are numbered in first-seen order: frame analysis sections in
/// assignment order, then area sections in assignment order.
#[derive(Debug, Clone, Default)]
pub struct SectionPropertyMap<'a> {
    names: IndexSet<&'a str>,
}

impl<'a> SectionPropertyMap<'a> {
    pub fn from_model(model: &'a Model) -> Self {
        let beam_names = model.beam_sections.values().map(|s| s.analysis.as_str());
        let area_names = model.area_sections.values().map(String::as_str);
        Self {
            names: beam_names.chain(area_names).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.names.get_index_of(name).map(to_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &'a str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (to_id(index), *name))
    }
}

/// Outcome of looking up the section of a frame or area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLookup<'a> {
    Found(&'a str),
    NotAssigned,
}

impl<'a> SectionLookup<'a> {
    /// Analysis section of a frame.
    pub fn for_beam(model: &'a Model, frame_id: &str) -> Self {
        model
            .beam_section(frame_id)
            .map_or(Self::NotAssigned, |s| Self::Found(s.analysis.as_str()))
    }

    pub fn for_area(model: &'a Model, area_id: &str) -> Self {
        model
            .area_section(area_id)
            .map_or(Self::NotAssigned, Self::Found)
    }

    pub fn label(&self) -> &'a str {
        match *self {
            Self::Found(name) => name,
            Self::NotAssigned => UNASSIGNED_SECTION,
        }
    }

    pub fn property_id(&self, properties: &SectionPropertyMap<'_>) -> u32 {
        match *self {
            Self::Found(name) => properties.get(name).unwrap_or(DEFAULT_PROPERTY_ID),
            Self::NotAssigned => DEFAULT_PROPERTY_ID,
        }
    }
}

/// Area ids grouped by section label, labels in first-seen area order.
#[derive(Debug, Clone, Default)]
pub struct ElementsBySection<'a> {
    groups: IndexMap<&'a str, Vec<&'a str>>,
}

impl<'a> ElementsBySection<'a> {
    pub fn from_model(model: &'a Model) -> Self {
        let mut groups: IndexMap<&'a str, Vec<&'a str>> = IndexMap::new();
        for area in &model.areas {
            let label = SectionLookup::for_area(model, &area.area_id).label();
            groups.entry(label).or_default().push(area.area_id.as_str());
        }
        for ids in groups.values_mut() {
            ids.sort_by(|a, b| compare_numeric_ids(a, b));
        }
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&[&'a str]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// Section label and its ascending area ids.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a str])> + '_ {
        self.groups.iter().map(|(label, ids)| (*label, ids.as_slice()))
    }
}

/// Orders decimal id strings by value without parsing them, so ids of any
/// length compare correctly. Non-digit ids fall back to plain string order.
pub fn compare_numeric_ids(a: &str, b: &str) -> Ordering {
    let is_decimal = |s: &str| !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit());
    if !(is_decimal(a) && is_decimal(b)) {
        return a.cmp(b);
    }
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.cmp(b))
}

fn to_id(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
