//! Record shapes recognized in S2K text.
//!
//! Each matcher searches a single line and returns `Ok(None)` when the line
//! does not have its shape. A line that has the shape but carries a field that
//! fails to convert is reported as `Err(message)`; the caller attaches the line
//! number.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{AreaConnectivity, AreaJoints, BeamConnectivity, BeamSection, Node};

const NUMBER: &str = r"[-+\d.eE]+";
// Any value token; conversion errors are reported by the matcher.
const VALUE: &str = r"\S+";
// Field value that is stored nowhere: a quoted string or a bare token.
const ANY: &str = r#"(?:"[^"]*"|\S+)"#;

static JOINT: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"\bJoint=(\S+)\s+CoordSys=GLOBAL\s+CoordType=Cartesian\s+XorR=({VALUE})\s+Y=({VALUE})\s+Z=({VALUE})"
    ))
});

// Length, centroid and GUID are required for the shape but not stored.
static FRAME: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"\bFrame=(\d+)\s+JointI=(\S+)\s+JointJ=(\S+)\s+IsCurved=No\s+Length={NUMBER}\s+CentroidX={NUMBER}\s+CentroidY={NUMBER}\s+CentroidZ={NUMBER}(?:\s+GUID=\S*)?"
    ))
});

static FRAME_SECTION: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r#"\bFrame=(\d+)\s+SectionType={ANY}\s+AutoSelect={ANY}\s+AnalSect="([^"]+)"\s+DesignSect="([^"]+)"\s+MatProp={ANY}"#
    ))
});

static AREA: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"\bArea=(\d+)\s+NumJoints=({VALUE})\s+Joint1=(\S+)\s+Joint2=(\S+)\s+Joint3=(\S+)(?:\s+Joint4=(\S+))?"
    ))
});

static AREA_SECTION: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r#"\bArea=(\d+)\s+Section="([^"]+)"\s+MatProp={ANY}"#
    ))
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid record pattern")
}

fn group(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn coordinate(caps: &Captures<'_>, index: usize, field: &str) -> Result<f64, String> {
    let raw = caps.get(index).map(|m| m.as_str()).unwrap_or_default();
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("invalid {field} coordinate '{raw}'"))
}

pub(crate) fn joint(line: &str) -> Result<Option<Node>, String> {
    let Some(caps) = JOINT.captures(line) else {
        return Ok(None);
    };
    Ok(Some(Node {
        source_id: group(&caps, 1),
        x: coordinate(&caps, 2, "XorR")?,
        y: coordinate(&caps, 3, "Y")?,
        z: coordinate(&caps, 4, "Z")?,
    }))
}

pub(crate) fn frame(line: &str) -> Option<BeamConnectivity> {
    FRAME.captures(line).map(|caps| BeamConnectivity {
        frame_id: group(&caps, 1),
        joint_i: group(&caps, 2),
        joint_j: group(&caps, 3),
    })
}

pub(crate) fn frame_section(line: &str) -> Option<(String, BeamSection)> {
    FRAME_SECTION.captures(line).map(|caps| {
        (
            group(&caps, 1),
            BeamSection {
                analysis: group(&caps, 2),
                design: group(&caps, 3),
            },
        )
    })
}

pub(crate) fn area(line: &str) -> Result<Option<AreaConnectivity>, String> {
    let Some(caps) = AREA.captures(line) else {
        return Ok(None);
    };
    let area_id = group(&caps, 1);
    let raw_count = group(&caps, 2);
    let vertex_count = raw_count
        .parse::<u32>()
        .map_err(|_| format!("invalid NumJoints '{raw_count}' for area {area_id}"))?;

    let corners = [group(&caps, 3), group(&caps, 4), group(&caps, 5)];
    let joints = match vertex_count {
        3 => AreaJoints::Tri(corners),
        4 => {
            let fourth = caps.get(6).map(|m| m.as_str().to_string()).ok_or_else(|| {
                format!("area {area_id} declares NumJoints=4 but has no Joint4")
            })?;
            let [a, b, c] = corners;
            AreaJoints::Quad([a, b, c, fourth])
        }
        other => {
            return Err(format!(
                "area {area_id} has unsupported NumJoints={other} (expected 3 or 4)"
            ));
        }
    };

    Ok(Some(AreaConnectivity { area_id, joints }))
}

pub(crate) fn area_section(line: &str) -> Option<(String, String)> {
    AREA_SECTION
        .captures(line)
        .map(|caps| (group(&caps, 1), group(&caps, 2)))
}
