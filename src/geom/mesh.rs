use std::io::{self, Write};

/// Output buffers of a tessellated surface.
///
/// `positions` and `normals` are indexed identically; `faces` holds index triples into
/// them. Normals are accumulated face contributions and are not unit length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceMesh {
    pub positions: Vec<[f64; 3]>,
    pub normals: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, normals: Vec<[f64; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            normals,
            faces,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if any vertex position or normal contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .chain(self.normals.iter())
            .flatten()
            .any(|c| !c.is_finite())
    }

    /// Returns true if all face indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.faces.iter().flatten().all(|&i| (i as usize) < n)
    }

    /// Checks buffer lengths, finite coordinates and index bounds.
    ///
    /// # Errors
    ///
    /// A message describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.normals.len() != self.positions.len() {
            return Err(format!(
                "normal buffer length {} does not match vertex count {}",
                self.normals.len(),
                self.positions.len()
            ));
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex data (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        Ok(())
    }

    /// Position buffer as `[x0, y0, z0, x1, ...]`, without copying.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    /// Normal buffer as `[nx0, ny0, nz0, nx1, ...]`, without copying.
    #[must_use]
    pub fn normals_flat(&self) -> &[f64] {
        self.normals.as_flattened()
    }

    /// Index buffer as `[a0, b0, c0, a1, ...]`, without copying.
    #[must_use]
    pub fn indices_flat(&self) -> &[u32] {
        self.faces.as_flattened()
    }

    /// Single-precision copy of the positions, packed for vertex upload.
    #[must_use]
    pub fn positions_f32(&self) -> Vec<f32> {
        to_f32(self.positions_flat())
    }

    /// Single-precision copy of the normals, packed for vertex upload.
    #[must_use]
    pub fn normals_f32(&self) -> Vec<f32> {
        to_f32(self.normals_flat())
    }

    /// Writes the mesh as a Wavefront OBJ object named `name` (positions, normals, faces).
    ///
    /// # Errors
    ///
    /// Any I/O error from `w`.
    pub fn write_obj<W: Write>(&self, mut w: W, name: &str) -> io::Result<()> {
        writeln!(w, "# bezier-engine mesh_cli")?;
        writeln!(w, "o {name}")?;

        for p in &self.positions {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
        }
        for n in &self.normals {
            writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
        }
        for face in &self.faces {
            let [a, b, c] = face.map(|i| i + 1);
            writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        w.flush()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_f32(values: &[f64]) -> Vec<f32> {
    values.iter().map(|&v| v as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SurfaceMesh {
        SurfaceMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
            vec![[0.0, 0.0, 3.0]; 4],
            vec![[0, 1, 2], [1, 3, 2]],
        )
    }

    #[test]
    fn test_flat_views() {
        let mesh = quad();
        mesh.validate().expect("valid quad");
        assert_eq!(mesh.positions_flat().len(), 12);
        assert_eq!(mesh.normals_flat()[2], 3.0);
        assert_eq!(mesh.indices_flat(), &[0, 1, 2, 1, 3, 2]);
        assert_eq!(mesh.positions_f32()[3], 1.0_f32);
    }

    #[test]
    fn test_validate_rejects_bad_buffers() {
        let mut mesh = quad();
        mesh.faces.push([0, 1, 4]);
        assert!(mesh.validate().is_err());

        let mut mesh = quad();
        mesh.normals.pop();
        assert!(mesh.validate().is_err());

        let mut mesh = quad();
        mesh.positions[0][1] = f64::NAN;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_write_obj_uses_one_based_indices() {
        let mut out = Vec::new();
        quad().write_obj(&mut out, "quad").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("o quad"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 4);
        assert!(text.contains("f 1//1 2//2 3//3"));
        assert!(text.contains("f 2//2 4//4 3//3"));
    }

    struct FullWriter;

    impl Write for FullWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_obj_propagates_io_errors() {
        let err = quad().write_obj(FullWriter, "quad").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }
}
