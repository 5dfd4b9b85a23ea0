//! End-to-end conversion checks.
//!
//! Covers the golden output for a full SAP2000 export plus the structural
//! guarantees of the bulk data: dense grid ids, element references within
//! range, one shell shape per vertex count and complete element sets.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use s2k_io::{IoError, S2kToBdfConverter, parse, render};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

fn fields(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

#[test]
fn matches_golden_bulk_data() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let output = dir.path().join("deck_bay.dat");

    S2kToBdfConverter::new()
        .convert_file(fixture("deck_bay.s2k"), &output)
        .expect("conversion should succeed");

    let actual = fs::read_to_string(&output).expect("read output");
    let expected = fs::read_to_string(fixture("deck_bay.dat")).expect("read golden file");
    assert_eq!(actual, expected);
}

#[test]
fn bulk_data_structure_holds_for_fixture() {
    let raw = fs::read_to_string(fixture("deck_bay.s2k")).expect("read fixture");
    let model = parse(&raw).expect("parse");
    let bdf = render(&model).expect("render");

    let grid_ids: Vec<u32> = bdf
        .lines()
        .filter(|l| l.starts_with("GRID,"))
        .map(|l| fields(l)[1].parse().expect("numeric grid id"))
        .collect();
    let expected_ids: Vec<u32> = (1..=grid_ids.len() as u32).collect();
    assert_eq!(grid_ids, expected_ids, "grid ids are 1..N in order");

    let grid_count = grid_ids.len() as u32;
    for line in bdf.lines() {
        let (nodes_from, expected_len) = match fields(line)[0] {
            "CBAR" => (3, 5),
            "CTRIA3" => (3, 6),
            "CQUAD4" => (3, 7),
            _ => continue,
        };
        let f = fields(line);
        assert_eq!(f.len(), expected_len, "record shape of {line}");
        for raw_id in &f[nodes_from..] {
            let id: u32 = raw_id.parse().expect("numeric node id");
            assert!((1..=grid_count).contains(&id), "{line} references grid {id}");
        }
    }

    for area in &model.areas {
        let tri = format!("CTRIA3,{},", area.area_id);
        let quad = format!("CQUAD4,{},", area.area_id);
        let (wanted, unwanted) = if area.joints.vertex_count() == 3 {
            (tri, quad)
        } else {
            (quad, tri)
        };
        assert!(bdf.lines().any(|l| l.starts_with(&wanted)));
        assert!(!bdf.lines().any(|l| l.starts_with(&unwanted)));
    }

    let set_members: BTreeSet<String> = set_blocks(&bdf)
        .into_iter()
        .flat_map(|(_, ids)| ids)
        .collect();
    let area_ids: BTreeSet<String> = model.areas.iter().map(|a| a.area_id.clone()).collect();
    assert_eq!(set_members, area_ids);
}

#[test]
fn joint_scenario_writes_single_grid() {
    let bdf = S2kToBdfConverter::new()
        .convert_str("Joint=5 CoordSys=GLOBAL CoordType=Cartesian XorR=1.0 Y=2.0 Z=3.0\n")
        .expect("convert");
    assert!(bdf.contains("GRID,1,,1.000000,2.000000,3.000000"));
}

#[test]
fn area_section_scenario_lists_area_under_its_section() {
    let src = r#"
Joint=5 CoordSys=GLOBAL CoordType=Cartesian XorR=0 Y=0 Z=0
Joint=6 CoordSys=GLOBAL CoordType=Cartesian XorR=1 Y=0 Z=0
Joint=7 CoordSys=GLOBAL CoordType=Cartesian XorR=0 Y=1 Z=0
Area=20 NumJoints=3 Joint1=5 Joint2=6 Joint3=7
Area=20 Section="Deck" MatProp=X
"#;
    let bdf = S2kToBdfConverter::new().convert_str(src).expect("convert");
    let blocks = set_blocks(&bdf);
    assert_eq!(blocks, vec![("Deck".to_string(), vec!["20".to_string()])]);
}

#[test]
fn reassigned_area_section_moves_area_to_latest_set() {
    let src = r#"
Joint=5 CoordSys=GLOBAL CoordType=Cartesian XorR=0 Y=0 Z=0
Joint=6 CoordSys=GLOBAL CoordType=Cartesian XorR=1 Y=0 Z=0
Joint=7 CoordSys=GLOBAL CoordType=Cartesian XorR=0 Y=1 Z=0
Area=20 NumJoints=3 Joint1=5 Joint2=6 Joint3=7
Area=20 Section="A" MatProp=X
Area=20 Section="B" MatProp=X
"#;
    let bdf = S2kToBdfConverter::new().convert_str(src).expect("convert");
    assert!(bdf.contains("CTRIA3,20,1,1,2,3"));
    let blocks = set_blocks(&bdf);
    assert_eq!(blocks, vec![("B".to_string(), vec!["20".to_string()])]);
}

#[test]
fn undefined_joint_produces_no_output_file() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let input = dir.path().join("dangling.s2k");
    let output = dir.path().join("dangling.dat");
    fs::write(
        &input,
        "Joint=1 CoordSys=GLOBAL CoordType=Cartesian XorR=0 Y=0 Z=0\n\
         Area=3 NumJoints=3 Joint1=1 Joint2=1 Joint3=42\n",
    )
    .expect("write input");

    let err = S2kToBdfConverter::new()
        .convert_file(&input, &output)
        .expect_err("should fail");
    assert!(matches!(err, IoError::UnresolvedReference { ref joint, .. } if joint == "42"));
    assert!(!output.exists());
}

#[test]
fn malformed_coordinate_produces_no_output_file() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let input = dir.path().join("bad.s2k");
    let output = dir.path().join("bad.dat");
    fs::write(
        &input,
        "Joint=1 CoordSys=GLOBAL CoordType=Cartesian XorR=x1 Y=0 Z=0\n\
         Joint=2 CoordSys=GLOBAL CoordType=Cartesian XorR=1.2.3 Y=0 Z=0\n",
    )
    .expect("write input");

    let err = S2kToBdfConverter::new()
        .convert_file(&input, &output)
        .expect_err("should fail");
    match err {
        IoError::Parse(parse_err) => {
            assert_eq!(parse_err.line, 1);
            assert!(parse_err.content.contains("XorR=x1"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

/// Section label and member ids of every SET block.
fn set_blocks(bdf: &str) -> Vec<(String, Vec<String>)> {
    let mut blocks = Vec::new();
    let mut lines = bdf
        .lines()
        .skip_while(|l| *l != "$ Element Sets in Nastran format")
        .skip(1)
        .peekable();
    while let Some(comment) = lines.next() {
        let label = comment
            .trim_start_matches("$ *set name = Section=\"")
            .trim_end_matches('"')
            .to_string();
        let mut body = lines
            .next()
            .and_then(|l| l.split_once(" = "))
            .map(|(_, ids)| ids.to_string())
            .unwrap_or_default();
        while let Some(next) = lines.peek() {
            if next.starts_with("$") {
                break;
            }
            body.push_str(next.trim());
            lines.next();
        }
        let ids = body
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        blocks.push((label, ids));
    }
    blocks
}
