//! Externally loaded polygon model
//!
//! The OBJ file is read and parsed on a background thread. The render path
//! polls for the result once per frame and skips the model until it is
//! [`ModelStatus::Ready`]. A model that fails to load stays
//! [`ModelStatus::Failed`] and is skipped for the rest of the session.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use glam::{Mat4, Vec4};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::obj::{ObjError, parse_obj};
use crate::procedural::Mesh;
use crate::render::{MatrixUniform, MeshUpload, RenderContext, RenderError};
use crate::transform::Transform;

/// Errors from loading an external model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ObjError,
    },
    #[error("failed to spawn model loader thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("model loader thread exited without a result")]
    Disconnected,
}

/// Load progress of an external model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Ready,
    Failed,
}

enum LoadState {
    Loading(Receiver<Result<Mesh, ModelError>>),
    Ready {
        mesh: Mesh,
        upload: MeshUpload,
    },
    Failed,
}

/// Read and parse an OBJ file
pub fn load_obj(path: &Path) -> Result<Mesh, ModelError> {
    let source = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&source).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// A polygon model placed in the scene
pub struct ExternalModel {
    state: LoadState,
    pub color: Vec4,
    transform: Transform,
    normal_matrix: Mat4,
}

impl ExternalModel {
    /// Start loading `path` on a background thread
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                debug!("Loading model {}", path.display());
                // The receiver may be gone if the scene was dropped
                let _ = tx.send(load_obj(&path));
            });

        let state = match spawned {
            Ok(_) => LoadState::Loading(rx),
            Err(e) => {
                warn!("{}", ModelError::Spawn(e));
                LoadState::Failed
            }
        };

        Self::with_state(state)
    }

    /// A model that is ready immediately
    pub fn from_mesh(mesh: Mesh) -> Self {
        Self::with_state(LoadState::Ready {
            mesh,
            upload: MeshUpload::default(),
        })
    }

    fn with_state(state: LoadState) -> Self {
        Self {
            state,
            color: Vec4::ONE,
            transform: Transform::IDENTITY,
            normal_matrix: Mat4::IDENTITY,
        }
    }

    pub fn status(&self) -> ModelStatus {
        match self.state {
            LoadState::Loading(_) => ModelStatus::Loading,
            LoadState::Ready { .. } => ModelStatus::Ready,
            LoadState::Failed => ModelStatus::Failed,
        }
    }

    /// Check for a finished load without blocking
    pub fn poll(&mut self) -> ModelStatus {
        if let LoadState::Loading(rx) = &self.state {
            let result = match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return ModelStatus::Loading,
                Err(TryRecvError::Disconnected) => Err(ModelError::Disconnected),
            };

            self.state = match result {
                Ok(mesh) => {
                    info!("Model loaded: {} vertices", mesh.vertex_count());
                    LoadState::Ready {
                        mesh,
                        upload: MeshUpload::default(),
                    }
                }
                Err(e) => {
                    warn!("Model unavailable: {}", e);
                    LoadState::Failed
                }
            };
        }
        self.status()
    }

    /// The loaded mesh, once ready
    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.state {
            LoadState::Ready { mesh, .. } => Some(mesh),
            _ => None,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.normal_matrix = transform.normal_matrix();
    }

    /// Draw the model if it is ready, uploading it on the first draw
    ///
    /// Returns `Ok(false)` while loading or after a failed load.
    pub fn draw(&mut self, ctx: &mut dyn RenderContext) -> Result<bool, RenderError> {
        let LoadState::Ready { mesh, upload } = &mut self.state else {
            return Ok(false);
        };

        let uploaded = match upload.buffers() {
            Some(uploaded) => uploaded,
            None => {
                let uploaded = upload.upload(ctx, mesh)?;
                debug!("Uploaded model buffers");
                uploaded
            }
        };

        ctx.set_matrix(MatrixUniform::Model, self.transform.matrix());
        ctx.set_matrix(MatrixUniform::Normal, self.normal_matrix);
        ctx.set_color(self.color);
        uploaded.draw_all(ctx);
        Ok(true)
    }
}
