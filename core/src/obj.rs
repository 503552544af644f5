//! Wavefront OBJ parsing
//!
//! Reads the subset needed for a lit solid-color model: `v`, `vn` and `f`
//! statements. Polygons are fan-triangulated and flattened into an
//! unindexed triangle list. Faces without normals get their geometric
//! normal. Everything else (`vt`, groups, materials, smoothing) is skipped.

use glam::Vec3;
use thiserror::Error;

use crate::procedural::Mesh;

/// OBJ parse errors, with 1-based line numbers
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObjError {
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: expected 3 components, found {found}")]
    MissingComponents { line: usize, found: usize },
    #[error("line {line}: malformed face vertex '{token}'")]
    MalformedVertex { line: usize, token: String },
    #[error("line {line}: face needs at least 3 vertices, found {found}")]
    DegenerateFace { line: usize, found: usize },
    #[error("line {line}: {kind} index {index} out of range for {count} entries")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        count: usize,
    },
    #[error("model contains no faces")]
    NoFaces,
}

/// One `v/vt/vn` reference, already resolved to 0-based indices
#[derive(Debug, Clone, Copy)]
struct FaceVertex {
    position: usize,
    normal: Option<usize>,
}

fn parse_vec3<'a>(line: usize, mut tokens: impl Iterator<Item = &'a str>) -> Result<Vec3, ObjError> {
    let mut out = [0.0f32; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = tokens
            .next()
            .ok_or(ObjError::MissingComponents { line, found: i })?;
        *slot = token.parse().map_err(|_| ObjError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(Vec3::from_array(out))
}

/// Resolve a 1-based (or negative, relative) OBJ index
fn resolve_index(line: usize, kind: &'static str, token: &str, count: usize) -> Result<usize, ObjError> {
    let index: i64 = token.parse().map_err(|_| ObjError::InvalidNumber {
        line,
        token: token.to_string(),
    })?;
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => count as i64 + i,
        _ => -1,
    };
    if resolved < 0 || resolved >= count as i64 {
        return Err(ObjError::IndexOutOfRange {
            line,
            kind,
            index,
            count,
        });
    }
    Ok(resolved as usize)
}

fn parse_face_vertex(
    line: usize,
    token: &str,
    positions: usize,
    normals: usize,
) -> Result<FaceVertex, ObjError> {
    let mut parts = token.split('/');
    let malformed = || ObjError::MalformedVertex {
        line,
        token: token.to_string(),
    };

    // Texture coordinates are not used
    let (position, _texcoord, normal) = (parts.next(), parts.next(), parts.next());
    if parts.next().is_some() {
        return Err(malformed());
    }

    let position = match position {
        Some(p) if !p.is_empty() => resolve_index(line, "position", p, positions)?,
        _ => return Err(malformed()),
    };
    let normal = match normal {
        Some(n) if !n.is_empty() => Some(resolve_index(line, "normal", n, normals)?),
        _ => None,
    };

    Ok(FaceVertex { position, normal })
}

/// Parse OBJ source into an unindexed triangle mesh
pub fn parse_obj(source: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut mesh = Mesh::default();
    let mut face: Vec<FaceVertex> = Vec::with_capacity(8);

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let mut tokens = content.split_whitespace();

        match tokens.next() {
            Some("v") => positions.push(parse_vec3(line, tokens)?),
            Some("vn") => normals.push(parse_vec3(line, tokens)?),
            Some("f") => {
                face.clear();
                for token in tokens {
                    face.push(parse_face_vertex(line, token, positions.len(), normals.len())?);
                }
                if face.len() < 3 {
                    return Err(ObjError::DegenerateFace {
                        line,
                        found: face.len(),
                    });
                }
                for k in 1..face.len() - 1 {
                    add_triangle(&mut mesh, [face[0], face[k], face[k + 1]], &positions, &normals);
                }
            }
            _ => {}
        }
    }

    if mesh.is_empty() {
        return Err(ObjError::NoFaces);
    }
    Ok(mesh)
}

fn add_triangle(mesh: &mut Mesh, corners: [FaceVertex; 3], positions: &[Vec3], normals: &[Vec3]) {
    let p = corners.map(|c| positions[c.position]);
    let face_normal = (p[1] - p[0])
        .cross(p[2] - p[0])
        .try_normalize()
        .unwrap_or(Vec3::Y);

    for (corner, position) in corners.iter().zip(p) {
        let normal = corner
            .normal
            .and_then(|n| normals[n].try_normalize())
            .unwrap_or(face_normal);
        mesh.add_vertex(position, normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 2
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn test_parse_quad_fan() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.positions[0], [0.0, 0.0, 0.0]);
        assert_eq!(mesh.positions[4], [1.0, 1.0, 0.0]);
        assert_eq!(mesh.positions[5], [0.0, 1.0, 0.0]);
        // vn is normalised
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_all_face_vertex_forms() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1 2 3
f 1/1 2/1 3/1
f 1//1 2//1 3//1
f 1/1/1 2/1/1 3/1/1
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertex_count(), 12);
    }

    #[test]
    fn test_negative_indices() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_missing_normals_use_face_normal() {
        let src = "\
v 0 0 0
v 0 0 1
v 1 0 0
f 1 2 3
";
        let mesh = parse_obj(src).unwrap();
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_ignores_unused_statements() {
        let src = "\
mtllib dog.mtl
o dog
g body
s 1
usemtl fur
v 0 0 0 1.0
v 1 0 0
v 0 1 0 # trailing comment
f 1 2 3
";
        assert_eq!(parse_obj(src).unwrap().vertex_count(), 3);
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert_eq!(
            err,
            ObjError::InvalidNumber {
                line: 1,
                token: "zero".to_string()
            }
        );
    }

    #[test]
    fn test_missing_component() {
        let err = parse_obj("v 0 0\n").unwrap_err();
        assert_eq!(err, ObjError::MissingComponents { line: 1, found: 2 });
    }

    #[test]
    fn test_index_out_of_range() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        let err = parse_obj(src).unwrap_err();
        assert!(matches!(
            err,
            ObjError::IndexOutOfRange {
                line: 4,
                kind: "position",
                index: 4,
                count: 3
            }
        ));
    }

    #[test]
    fn test_zero_index_rejected() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(matches!(
            parse_obj(src),
            Err(ObjError::IndexOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let src = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        assert_eq!(
            parse_obj(src).unwrap_err(),
            ObjError::DegenerateFace { line: 3, found: 2 }
        );
    }

    #[test]
    fn test_malformed_vertex() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1/1 2 3\n";
        assert!(matches!(
            parse_obj(src),
            Err(ObjError::MalformedVertex { line: 4, .. })
        ));
    }

    #[test]
    fn test_malformed_vertex_checked_before_indices() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1/1/9/1 2 3\n";
        assert!(matches!(
            parse_obj(src),
            Err(ObjError::MalformedVertex { line: 5, .. })
        ));
    }

    #[test]
    fn test_no_faces() {
        assert_eq!(parse_obj("v 0 0 0\n").unwrap_err(), ObjError::NoFaces);
        assert_eq!(parse_obj("").unwrap_err(), ObjError::NoFaces);
    }
}
