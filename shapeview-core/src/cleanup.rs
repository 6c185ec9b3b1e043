//! Geometry cleanup applied to imported meshes before rendering
//!
//! These are the mesh-side counterparts of the cleanup passes a dataset
//! renderer runs after import: uniform rescaling, welding of duplicate
//! vertices, and hard-edge splitting so sharp features shade correctly.

use crate::{Point3f, TriangleMesh, Vector3f};
use std::collections::HashMap;

/// Default welding distance for [`remove_doubles`]
pub const DEFAULT_WELD_EPSILON: f32 = 1e-4;

/// Default sharp-edge angle for [`split_sharp_edges`], in radians (~76 degrees)
pub const DEFAULT_SPLIT_ANGLE: f32 = 1.32645;

/// Uniformly scale all vertices of the mesh in place.
pub fn scale(mesh: &mut TriangleMesh, factor: f32) {
    if factor == 1.0 {
        return;
    }
    for v in &mut mesh.vertices {
        v.coords *= factor;
    }
}

fn quantize(p: &Point3f, epsilon: f32) -> (i64, i64, i64) {
    let inv = 1.0 / epsilon;
    (
        (p.x * inv).round() as i64,
        (p.y * inv).round() as i64,
        (p.z * inv).round() as i64,
    )
}

/// Weld vertices closer than `epsilon` and drop faces that become
/// degenerate. Stored normals are discarded since vertex identity changes.
///
/// Vertices hash into a grid of `epsilon`-sized cells. Two vertices within
/// `epsilon` of each other land at most one cell apart on each axis, so the
/// 3x3x3 neighborhood of a cell covers every weld candidate.
pub fn remove_doubles(mesh: &mut TriangleMesh, epsilon: f32) {
    let mut cells: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
    let mut remap = vec![0usize; mesh.vertices.len()];
    let mut vertices: Vec<Point3f> = Vec::with_capacity(mesh.vertices.len());
    let eps_sq = epsilon * epsilon;

    for (i, v) in mesh.vertices.iter().enumerate() {
        let (cx, cy, cz) = quantize(v, epsilon);

        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(reps) = cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &r in reps {
                        if (vertices[r] - *v).norm_squared() <= eps_sq {
                            found = Some(r);
                            break 'search;
                        }
                    }
                }
            }
        }

        let idx = match found {
            Some(r) => r,
            None => {
                vertices.push(*v);
                cells.entry((cx, cy, cz)).or_default().push(vertices.len() - 1);
                vertices.len() - 1
            }
        };
        remap[i] = idx;
    }

    let faces = mesh
        .faces
        .iter()
        .map(|f| [remap[f[0]], remap[f[1]], remap[f[2]]])
        .filter(|f| f[0] != f[1] && f[1] != f[2] && f[0] != f[2])
        .collect();

    let welded = mesh.vertices.len() - vertices.len();
    if welded > 0 {
        log::debug!("remove_doubles welded {} vertices", welded);
    }

    mesh.vertices = vertices;
    mesh.faces = faces;
    mesh.normals = None;
}

fn quantize_normal(n: &Vector3f) -> (i32, i32, i32) {
    (
        (n.x * 1e4).round() as i32,
        (n.y * 1e4).round() as i32,
        (n.z * 1e4).round() as i32,
    )
}

/// Split vertices along sharp edges so each face corner carries a normal
/// averaged only over adjacent faces within `angle` radians of its own
/// face normal. Corners whose smoothed normals agree stay welded, so flat
/// regions keep shared vertices while edges sharper than `angle` shade hard.
pub fn split_sharp_edges(mesh: &mut TriangleMesh, angle: f32) {
    if mesh.is_empty() {
        return;
    }

    let face_normals = mesh.calculate_face_normals();
    let cos_limit = angle.cos();

    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); mesh.vertices.len()];
    for (fi, face) in mesh.faces.iter().enumerate() {
        for &vi in face {
            vertex_faces[vi].push(fi);
        }
    }

    let mut lookup: HashMap<(usize, (i32, i32, i32)), usize> = HashMap::new();
    let mut vertices: Vec<Point3f> = Vec::new();
    let mut normals: Vec<Vector3f> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(mesh.faces.len());

    for (fi, face) in mesh.faces.iter().enumerate() {
        let mut new_face = [0usize; 3];
        for (corner, &vi) in face.iter().enumerate() {
            // Average over the smoothing group of this corner
            let mut n = Vector3f::zeros();
            for &other in &vertex_faces[vi] {
                if face_normals[fi].dot(&face_normals[other]) >= cos_limit {
                    n += face_normals[other];
                }
            }
            let len = n.norm();
            let n = if len > 1e-12 { n / len } else { face_normals[fi] };

            let key = (vi, quantize_normal(&n));
            let idx = *lookup.entry(key).or_insert_with(|| {
                vertices.push(mesh.vertices[vi]);
                normals.push(n);
                vertices.len() - 1
            });
            new_face[corner] = idx;
        }
        faces.push(new_face);
    }

    mesh.vertices = vertices;
    mesh.faces = faces;
    mesh.normals = Some(normals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube() -> TriangleMesh {
        let vertices = vec![
            Point3f::new(-1.0, -1.0, -1.0),
            Point3f::new(1.0, -1.0, -1.0),
            Point3f::new(1.0, 1.0, -1.0),
            Point3f::new(-1.0, 1.0, -1.0),
            Point3f::new(-1.0, -1.0, 1.0),
            Point3f::new(1.0, -1.0, 1.0),
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(-1.0, 1.0, 1.0),
        ];
        let faces = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [1, 2, 6],
            [1, 6, 5],
            [0, 4, 7],
            [0, 7, 3],
        ];
        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }

    #[test]
    fn test_scale() {
        let mut mesh = cube();
        scale(&mut mesh, 2.0);
        assert_relative_eq!(mesh.vertices[1].x, 2.0);
        assert_relative_eq!(mesh.vertices[0].z, -2.0);
    }

    #[test]
    fn test_scale_identity_is_noop() {
        let mut mesh = cube();
        let before = mesh.vertices.clone();
        scale(&mut mesh, 1.0);
        assert_eq!(before, mesh.vertices);
    }

    #[test]
    fn test_remove_doubles_welds_duplicates() {
        // Two triangles sharing an edge, but with duplicated corner vertices
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        );
        remove_doubles(&mut mesh, DEFAULT_WELD_EPSILON);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn test_remove_doubles_welds_across_cell_boundary() {
        // A pair 2e-6 apart but straddling a quantization cell edge must
        // still weld.
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.49e-4, 0.0, 0.0),
                Point3f::new(0.51e-4, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 2, 3], [1, 2, 4]],
        );
        remove_doubles(&mut mesh, DEFAULT_WELD_EPSILON);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        // Both faces now share the welded corner
        assert_eq!(mesh.faces[0][0], mesh.faces[1][0]);
    }

    #[test]
    fn test_remove_doubles_drops_degenerate_faces() {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        remove_doubles(&mut mesh, DEFAULT_WELD_EPSILON);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_remove_doubles_clean_mesh_unchanged() {
        let mut mesh = cube();
        remove_doubles(&mut mesh, DEFAULT_WELD_EPSILON);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn test_split_sharp_edges_hardens_cube() {
        let mut mesh = cube();
        split_sharp_edges(&mut mesh, DEFAULT_SPLIT_ANGLE);

        // 90-degree edges exceed the threshold, so every face plane gets its
        // own four corners: 6 planes x 4 vertices.
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.face_count(), 12);

        let normals = mesh.normals.as_ref().unwrap();
        let face_normals = mesh.calculate_face_normals();
        for (fi, face) in mesh.faces.iter().enumerate() {
            for &vi in face {
                assert_relative_eq!(normals[vi].dot(&face_normals[fi]), 1.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_split_sharp_edges_keeps_flat_fan_smooth() {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        split_sharp_edges(&mut mesh, DEFAULT_SPLIT_ANGLE);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
    }
}
