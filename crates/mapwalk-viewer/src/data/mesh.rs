//! CPU-side meshes: Wavefront OBJ loading and a few procedural shapes.

use crate::data::types::Vertex;
use anyhow::{bail, Context, Result};
use glam::Vec3;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Smallest y over all vertices (0 for an empty mesh).
    pub fn min_y(&self) -> f32 {
        if self.vertices.is_empty() {
            return 0.0;
        }
        self.vertices
            .iter()
            .map(|v| v.pos[1])
            .fold(f32::INFINITY, f32::min)
    }

    fn push_triangle(&mut self, corners: [Vertex; 3]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

/// Reads an OBJ file from disk.
pub fn load_obj(path: &Path) -> Result<MeshData> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mesh = parse_obj(file).with_context(|| format!("parsing {}", path.display()))?;

    if mesh.indices.is_empty() {
        bail!("{} contains no faces", path.display());
    }

    log::info!(
        "Loaded {} | {} triangles",
        path.display(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// One `v/vt/vn` corner of a face, as zero-based indices.
#[derive(Clone, Copy, Debug)]
struct Corner {
    v: usize,
    vt: Option<usize>,
    vn: Option<usize>,
}

/// Resolves a 1-based (or negative, relative) OBJ index against `len` items.
fn resolve_index(token: &str, len: usize) -> Result<usize> {
    let i: i64 = token
        .parse()
        .with_context(|| format!("bad index '{}'", token))?;

    let resolved = if i > 0 {
        i - 1
    } else if i < 0 {
        len as i64 + i
    } else {
        bail!("OBJ indices start at 1");
    };

    if resolved < 0 || resolved as usize >= len {
        bail!("index {} out of range (have {})", i, len);
    }
    Ok(resolved as usize)
}

fn parse_corner(token: &str, nv: usize, nvt: usize, nvn: usize) -> Result<Corner> {
    let mut parts = token.split('/');

    let v = resolve_index(parts.next().context("empty face corner")?, nv)?;
    let vt = match parts.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, nvt)?),
        _ => None,
    };
    let vn = match parts.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, nvn)?),
        _ => None,
    };

    Ok(Corner { v, vt, vn })
}

fn parse_floats<const N: usize>(parts: &mut std::str::SplitWhitespace<'_>) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = parts
            .next()
            .with_context(|| format!("missing component {}", i))?
            .parse()?;
    }
    Ok(out)
}

/// Parses positions, texture coordinates, normals and polygon faces
/// (fan-triangulated). Faces without normals get the flat face normal.
/// Texture `v` is flipped to a top-left image origin.
pub fn parse_obj<R: Read>(reader: R) -> Result<MeshData> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut mesh = MeshData::default();

    for (line_no, line_result) in BufReader::new(reader).lines().enumerate() {
        let line = line_result?;
        let mut parts = line.split_whitespace();

        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => positions.push(
                parse_floats::<3>(&mut parts).with_context(|| format!("line {}", line_no + 1))?,
            ),
            "vt" => {
                let [u, v] =
                    parse_floats::<2>(&mut parts).with_context(|| format!("line {}", line_no + 1))?;
                texcoords.push([u, 1.0 - v]);
            }
            "vn" => normals.push(
                parse_floats::<3>(&mut parts).with_context(|| format!("line {}", line_no + 1))?,
            ),
            "f" => {
                let corners = parts
                    .map(|t| parse_corner(t, positions.len(), texcoords.len(), normals.len()))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("line {}", line_no + 1))?;

                if corners.len() < 3 {
                    bail!("line {}: face with {} corners", line_no + 1, corners.len());
                }

                for i in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[i], corners[i + 1]];
                    let p = tri.map(|c| Vec3::from(positions[c.v]));
                    let flat = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero();

                    mesh.push_triangle(tri.map(|c| Vertex {
                        pos: positions[c.v],
                        normal: c.vn.map_or(flat.into(), |n| normals[n]),
                        uv: c.vt.map_or([0.0, 0.0], |t| texcoords[t]),
                    }));
                }
            }
            // Groups, materials and smoothing are irrelevant here.
            _ => {}
        }
    }

    Ok(mesh)
}

fn quad(mesh: &mut MeshData, corners: [Vec3; 4], normal: Vec3, uvs: [[f32; 2]; 4]) {
    let v = |i: usize| Vertex {
        pos: corners[i].into(),
        normal: normal.into(),
        uv: uvs[i],
    };
    mesh.push_triangle([v(0), v(1), v(2)]);
    mesh.push_triangle([v(0), v(2), v(3)]);
}

/// The map: a `2 * half_extent` square on `y = 0`, facing up, with the image
/// top edge along `z = -half_extent`.
pub fn ground_quad(half_extent: f32) -> MeshData {
    let h = half_extent;
    let mut mesh = MeshData::default();
    quad(
        &mut mesh,
        [
            Vec3::new(-h, 0.0, -h),
            Vec3::new(-h, 0.0, h),
            Vec3::new(h, 0.0, h),
            Vec3::new(h, 0.0, -h),
        ],
        Vec3::Y,
        [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]],
    );
    mesh
}

/// Axis-aligned box standing on `y = 0`, centered on the y axis.
pub fn box_mesh(half_width: f32, half_depth: f32, height: f32) -> MeshData {
    let (x, z) = (half_width, half_depth);
    let full = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];
    let mut mesh = MeshData::default();

    let c = |sx: f32, y: f32, sz: f32| Vec3::new(sx * x, y, sz * z);
    let faces = [
        // +z
        ([c(-1.0, height, 1.0), c(-1.0, 0.0, 1.0), c(1.0, 0.0, 1.0), c(1.0, height, 1.0)], Vec3::Z),
        // -z
        ([c(1.0, height, -1.0), c(1.0, 0.0, -1.0), c(-1.0, 0.0, -1.0), c(-1.0, height, -1.0)], Vec3::NEG_Z),
        // +x
        ([c(1.0, height, 1.0), c(1.0, 0.0, 1.0), c(1.0, 0.0, -1.0), c(1.0, height, -1.0)], Vec3::X),
        // -x
        ([c(-1.0, height, -1.0), c(-1.0, 0.0, -1.0), c(-1.0, 0.0, 1.0), c(-1.0, height, 1.0)], Vec3::NEG_X),
        // top
        ([c(-1.0, height, -1.0), c(-1.0, height, 1.0), c(1.0, height, 1.0), c(1.0, height, -1.0)], Vec3::Y),
        // bottom
        ([c(-1.0, 0.0, 1.0), c(-1.0, 0.0, -1.0), c(1.0, 0.0, -1.0), c(1.0, 0.0, 1.0)], Vec3::NEG_Y),
    ];

    for (corners, normal) in faces {
        quad(&mut mesh, corners, normal, full);
    }
    mesh
}

/// Upside-down square pyramid with its tip on `y = 0`: a map pin.
pub fn pin_mesh(radius: f32, height: f32) -> MeshData {
    let tip = Vec3::ZERO;
    let r = radius;
    let ring = [
        Vec3::new(-r, height, -r),
        Vec3::new(-r, height, r),
        Vec3::new(r, height, r),
        Vec3::new(r, height, -r),
    ];
    let mut mesh = MeshData::default();

    for i in 0..4 {
        let a = ring[i];
        let b = ring[(i + 1) % 4];
        let normal = (b - tip).cross(a - tip).normalize();
        let v = |p: Vec3, uv: [f32; 2]| Vertex {
            pos: p.into(),
            normal: normal.into(),
            uv,
        };
        mesh.push_triangle([v(tip, [0.5, 1.0]), v(a, [0.0, 0.0]), v(b, [1.0, 0.0])]);
    }

    // Cap
    quad(&mut mesh, [ring[0], ring[1], ring[2], ring[3]], Vec3::Y, [[0.0; 2]; 4]);
    mesh
}
