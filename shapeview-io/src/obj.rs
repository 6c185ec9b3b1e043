//! OBJ format support

use crate::MeshReader;
use shapeview_core::{Error, Point3f, Result, TriangleMesh, Vector3f};
use std::path::Path;

pub struct ObjReader;

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let loaded = obj::Obj::load(path.as_ref())
            .map_err(|e| Error::InvalidData(format!("failed to parse OBJ: {}", e)))?;
        obj_data_to_mesh(&loaded.data)
    }
}

/// Convert parsed OBJ data into a triangle mesh, fan-triangulating
/// polygonal faces. Per-corner normal references collapse to per-vertex
/// normals; hard edges are recovered later by the edge-split cleanup pass.
pub fn obj_data_to_mesh(data: &obj::ObjData) -> Result<TriangleMesh> {
    let vertices: Vec<Point3f> = data
        .position
        .iter()
        .map(|p| Point3f::new(p[0], p[1], p[2]))
        .collect();

    let mut faces = Vec::new();
    let mut normals = if data.normal.is_empty() {
        None
    } else {
        Some(vec![Vector3f::zeros(); vertices.len()])
    };
    let mut has_normal = vec![false; vertices.len()];

    for object in &data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                let corners = &poly.0;
                if corners.len() < 3 {
                    return Err(Error::InvalidData(format!(
                        "face with {} vertices in OBJ",
                        corners.len()
                    )));
                }
                for c in &poly.0 {
                    if c.0 >= vertices.len() {
                        return Err(Error::InvalidData(format!(
                            "vertex index {} out of range in OBJ",
                            c.0
                        )));
                    }
                    if let (Some(normals), Some(ni)) = (normals.as_mut(), c.2) {
                        let n = data.normal.get(ni).ok_or_else(|| {
                            Error::InvalidData(format!("normal index {} out of range in OBJ", ni))
                        })?;
                        normals[c.0] = Vector3f::new(n[0], n[1], n[2]);
                        has_normal[c.0] = true;
                    }
                }
                for i in 1..corners.len() - 1 {
                    faces.push([corners[0].0, corners[i].0, corners[i + 1].0]);
                }
            }
        }
    }

    let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
    if let Some(normals) = normals {
        if has_normal.iter().all(|&b| b) {
            mesh.set_normals(normals);
        }
    }

    log::debug!(
        "loaded OBJ mesh: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}
