//! Shared geometry for primitive shapes
//!
//! Each [`ShapeKind`] is generated once and uploaded once, on first use, and
//! then shared by every primitive of that kind until the cache is dropped.

use hashbrown::HashMap;
use tracing::debug;

use crate::procedural::{Mesh, ShapeKind, generate};
use crate::render::{MeshBuffers, MeshUpload, RenderContext, RenderError};

struct CacheEntry {
    mesh: Mesh,
    upload: MeshUpload,
}

/// Lazily populated cache of generated meshes and their GPU buffers
#[derive(Default)]
pub struct GeometryCache {
    entries: HashMap<ShapeKind, CacheEntry>,
    uploads: usize,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, kind: ShapeKind) -> &mut CacheEntry {
        self.entries.entry(kind).or_insert_with(|| {
            let mesh = generate(kind);
            debug!(
                "Generated {} mesh: {} vertices, {} indices",
                kind.name(),
                mesh.vertex_count(),
                mesh.index_count()
            );
            CacheEntry {
                mesh,
                upload: MeshUpload::default(),
            }
        })
    }

    /// The generated mesh for `kind`, generating it on first request
    pub fn mesh(&mut self, kind: ShapeKind) -> &Mesh {
        &self.entry(kind).mesh
    }

    /// GPU buffers for `kind`, uploading on first request
    ///
    /// A failed upload is retried on the next call, reusing any buffers it
    /// already created.
    pub fn buffers(
        &mut self,
        kind: ShapeKind,
        ctx: &mut dyn RenderContext,
    ) -> Result<MeshBuffers, RenderError> {
        let entry = self.entry(kind);
        if let Some(buffers) = entry.upload.buffers() {
            return Ok(buffers);
        }

        let buffers = entry.upload.upload(ctx, &entry.mesh)?;
        self.uploads += 1;
        debug!("Uploaded {} mesh buffers", kind.name());
        Ok(buffers)
    }

    /// Whether `kind` has been uploaded
    pub fn is_uploaded(&self, kind: ShapeKind) -> bool {
        self.entries
            .get(&kind)
            .is_some_and(|entry| entry.upload.buffers().is_some())
    }

    /// Number of successful uploads so far
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Number of shape kinds generated so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
